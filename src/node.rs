use crate::markup::{self, escape, is_void};
use std::collections::BTreeMap;

/// Element attributes.
///
/// Ordered by key, so serialization and attribute diffs are deterministic.
/// An empty value renders as a bare attribute name.
pub type Attrs = BTreeMap<String, String>;

/// A lightweight, logic-free description of an HTML element and its static subtree.
///
/// [`Node`]s have no identity. They are recreated on each render and matched against the rendered document by position only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
	pub tag: String,
	pub attrs: Attrs,
	pub content: NodeContent,
}

/// What populates a [`Node`]. Children and inner markup are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeContent {
	Children(Vec<Node>),
	/// Inner HTML, inserted verbatim.
	Markup(String),
}

impl Default for NodeContent {
	fn default() -> Self {
		Self::Children(Vec::new())
	}
}

impl Node {
	/// Creates an empty element without attributes.
	#[must_use]
	pub fn new(tag: impl Into<String>) -> Self {
		Self::with_children(tag, Attrs::new(), Vec::new())
	}

	#[must_use]
	pub fn with_children(tag: impl Into<String>, attrs: Attrs, children: Vec<Node>) -> Self {
		Self {
			tag: tag.into(),
			attrs,
			content: NodeContent::Children(children),
		}
	}

	/// Creates an element containing `text`, which is [`escape`]d.
	#[must_use]
	pub fn text(tag: impl Into<String>, attrs: Attrs, text: &str) -> Self {
		Self::html(tag, attrs, escape(text))
	}

	/// Creates an element with raw inner HTML. `html` must already be safe to insert.
	#[must_use]
	pub fn html(tag: impl Into<String>, attrs: Attrs, html: impl Into<String>) -> Self {
		Self {
			tag: tag.into(),
			attrs,
			content: NodeContent::Markup(html.into()),
		}
	}

	/// Adds or replaces an attribute.
	#[must_use]
	pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
		self.attrs.insert(key.into(), value.into());
		self
	}

	/// Serializes this subtree without synthetic element ids.
	///
	/// ```
	/// use mirror_dom::Node;
	///
	/// let node = Node::with_children("p", Default::default(), vec![Node::text("b", Default::default(), "1 < 2"), Node::new("br")]);
	/// assert_eq!(node.to_html(), "<p><b>1 &lt; 2</b><br></p>");
	/// ```
	#[must_use]
	pub fn to_html(&self) -> String {
		let mut out = String::new();
		self.write_html(&mut out);
		out
	}

	fn write_html(&self, out: &mut String) {
		markup::write_opening_tag(out, &self.tag, None, &self.attrs);
		if is_void(&self.tag) {
			return;
		}
		match &self.content {
			NodeContent::Children(children) => {
				for child in children {
					child.write_html(out)
				}
			}
			NodeContent::Markup(html) => out.push_str(html),
		}
		markup::write_closing_tag(out, &self.tag);
	}
}
