//! HTML serialization primitives shared by [`Node`](`crate::Node`) and the rendered mirror.
//!
//! Attribute values are written verbatim. Only inner markup can be escaped, through [`escape`].

use crate::node::Attrs;
use core::fmt::Write as _;

/// Tags that are emitted as a lone, unterminated opening tag.
///
/// Children and markup of elements with these tags are never serialized.
pub const VOID_TAGS: &[&str] = &["br", "wbr"];

/// The attribute name reserved for the synthetic element id.
pub(crate) const ID_KEY: &str = "id";

#[must_use]
pub fn is_void(tag: &str) -> bool {
	VOID_TAGS.contains(&tag)
}

/// Escapes a user-submitted string so it can be used as inner markup.
///
/// ```
/// assert_eq!(mirror_dom::escape("<a href='x'>&</a>"), "&lt;a href=&#39;x&#39;&gt;&amp;&lt;/a&gt;");
/// ```
#[must_use]
pub fn escape(text: &str) -> String {
	let mut escaped = String::with_capacity(text.len() + text.len() / 10);
	for c in text.chars() {
		match c {
			'&' => escaped.push_str("&amp;"),
			// Shorter than "&apos;".
			'\'' => escaped.push_str("&#39;"),
			'<' => escaped.push_str("&lt;"),
			'>' => escaped.push_str("&gt;"),
			// Shorter than "&quot;".
			'"' => escaped.push_str("&#34;"),
			c => escaped.push(c),
		}
	}
	escaped
}

/// Writes `<tag id="N" key key="value">`.
///
/// When `id` is [`Some`], any `"id"` entry in `attrs` is skipped.
pub(crate) fn write_opening_tag(out: &mut String, tag: &str, id: Option<u64>, attrs: &Attrs) {
	out.push('<');
	out.push_str(tag);
	if let Some(id) = id {
		// Writing into a `String` can't fail.
		let _ = write!(out, " id=\"{}\"", id);
	}
	for (key, value) in attrs {
		if id.is_some() && key == ID_KEY {
			continue;
		}
		out.push(' ');
		out.push_str(key);
		if !value.is_empty() {
			out.push_str("=\"");
			out.push_str(value);
			out.push('"');
		}
	}
	out.push('>');
}

pub(crate) fn write_closing_tag(out: &mut String, tag: &str) {
	out.push_str("</");
	out.push_str(tag);
	out.push('>');
}
