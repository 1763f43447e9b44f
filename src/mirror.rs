//! The renderer's record of what has actually been materialized in the document.
//!
//! Unlike [`Children`], a [`MirrorChildren`] never refers to live [`View`](`crate::View`)s,
//! only to value copies of what was rendered for them, so the mirror owns no views.

use crate::{
	markup::{self, is_void, ID_KEY},
	node::{Attrs, Node, NodeContent},
	scope::Scope,
	view::{Children, View, ViewRef},
};
use tracing::{error, trace_span};

/// One materialized element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MirrorNode {
	pub(crate) id: u64,
	pub(crate) tag: String,
	pub(crate) attrs: Attrs,
	pub(crate) children: MirrorChildren,
}

/// Mirrors [`Children`], but with materialized subtrees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorChildren {
	Views(Vec<MirrorNode>),
	Nodes(Vec<MirrorNode>),
	Markup(String),
}

impl Default for MirrorChildren {
	fn default() -> Self {
		Self::Nodes(Vec::new())
	}
}

impl MirrorNode {
	pub(crate) fn root(id: u64, tag: impl Into<String>) -> Self {
		Self {
			id,
			tag: tag.into(),
			attrs: Attrs::new(),
			children: MirrorChildren::default(),
		}
	}

	/// Snapshots `view`'s current subtree.
	///
	/// Materialized views count as reconciled and are resolved in `scope`.
	/// Each is pushed onto `mounted` in document order, for [`View::on_mount`](`crate::View::on_mount`) once inserted.
	///
	/// Children are left out for void tags, and below `depth_limit` further levels.
	pub(crate) fn from_view(view: &ViewRef, scope: &Scope, mounted: &mut Vec<ViewRef>, depth_limit: usize) -> Self {
		let span = trace_span!("Materializing view", id = view.id(), tag = view.tag());
		let _enter = span.enter();

		scope.resolve(view.id());
		mounted.push(ViewRef::clone(view));
		let attrs = without_id(view.attrs());
		let children = if is_void(view.tag()) {
			MirrorChildren::default()
		} else if depth_limit == 0 {
			error!("Depth limit reached. Children of the view are not materialized.");
			MirrorChildren::default()
		} else {
			MirrorChildren::from_children(view.children(), scope, mounted, depth_limit - 1)
		};
		Self {
			id: view.id(),
			tag: view.tag().to_owned(),
			attrs,
			children,
		}
	}

	/// Materializes `node` under a freshly minted id.
	pub(crate) fn from_node(node: Node, scope: &Scope, depth_limit: usize) -> Self {
		let Node { tag, attrs, content } = node;
		let id = scope.new_id();
		let children = if is_void(&tag) {
			MirrorChildren::default()
		} else {
			match content {
				NodeContent::Children(nodes) if depth_limit == 0 => {
					if !nodes.is_empty() {
						error!(id, "Depth limit reached. Child nodes are not materialized.");
					}
					MirrorChildren::default()
				}
				NodeContent::Children(nodes) => MirrorChildren::Nodes(nodes.into_iter().map(|node| Self::from_node(node, scope, depth_limit - 1)).collect()),
				NodeContent::Markup(html) => MirrorChildren::Markup(html),
			}
		};
		Self {
			id,
			tag,
			attrs: without_id(attrs),
			children,
		}
	}

	#[must_use]
	pub fn id(&self) -> u64 {
		self.id
	}

	#[must_use]
	pub fn tag(&self) -> &str {
		&self.tag
	}

	/// Attributes as last applied. Never contains `"id"`.
	#[must_use]
	pub fn attrs(&self) -> &Attrs {
		&self.attrs
	}

	#[must_use]
	pub fn children(&self) -> &MirrorChildren {
		&self.children
	}

	/// Ids of the direct child elements, in order.
	#[must_use]
	pub fn child_ids(&self) -> Vec<u64> {
		self.children.nodes().iter().map(|child| child.id).collect()
	}

	/// Serializes this subtree with an `id` attribute on each element, as passed to [`MutationSink`](`crate::MutationSink`)s.
	#[must_use]
	pub fn to_html(&self) -> String {
		let mut out = String::new();
		self.write_html(&mut out);
		out
	}

	fn write_html(&self, out: &mut String) {
		markup::write_opening_tag(out, &self.tag, Some(self.id), &self.attrs);
		if is_void(&self.tag) {
			return;
		}
		match &self.children {
			MirrorChildren::Views(children) | MirrorChildren::Nodes(children) => {
				for child in children {
					child.write_html(out)
				}
			}
			MirrorChildren::Markup(html) => out.push_str(html),
		}
		markup::write_closing_tag(out, &self.tag);
	}
}

impl MirrorChildren {
	fn from_children(children: Children, scope: &Scope, mounted: &mut Vec<ViewRef>, depth_limit: usize) -> Self {
		match children {
			Children::Views(views) => Self::Views(views.iter().map(|view| MirrorNode::from_view(view, scope, mounted, depth_limit)).collect()),
			Children::Nodes(nodes) => Self::Nodes(nodes.into_iter().map(|node| MirrorNode::from_node(node, scope, depth_limit)).collect()),
			Children::Markup(html) => Self::Markup(html),
		}
	}

	/// The child elements, or an empty slice for markup.
	#[must_use]
	pub fn nodes(&self) -> &[MirrorNode] {
		match self {
			Self::Views(nodes) | Self::Nodes(nodes) => nodes,
			Self::Markup(_) => &[],
		}
	}

	#[must_use]
	pub fn markup(&self) -> Option<&str> {
		match self {
			Self::Markup(html) => Some(html.as_str()),
			Self::Views(_) | Self::Nodes(_) => None,
		}
	}
}

fn without_id(mut attrs: Attrs) -> Attrs {
	attrs.remove(ID_KEY);
	attrs
}
