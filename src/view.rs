use crate::{
	markup::escape,
	node::{Attrs, Node},
	scope::Scope,
};
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;

/// A shared handle to a [`View`]. Parents refer to their child views through these.
pub type ViewRef = Rc<dyn View>;

/// The fixed identity of a [`View`], created through [`Scope::view`] or [`Scope::const_view`].
#[derive(Debug)]
pub struct ViewCore {
	scope: Scope,
	id: u64,
	tag: String,
	is_const: bool,
}

impl ViewCore {
	pub(crate) fn new(scope: Scope, id: u64, tag: String, is_const: bool) -> Self {
		Self { scope, id, tag, is_const }
	}

	#[must_use]
	pub fn id(&self) -> u64 {
		self.id
	}

	#[must_use]
	pub fn tag(&self) -> &str {
		&self.tag
	}

	#[must_use]
	pub fn is_const(&self) -> bool {
		self.is_const
	}

	#[must_use]
	pub fn scope(&self) -> &Scope {
		&self.scope
	}
}

/// A long-lived, identity-bearing part of the UI.
///
/// [`View::attrs`] and [`View::children`] are called again each time the view is diffed and must describe its *current* state.
/// After changing that state, call [`View::patch`], or the change won't be rendered.
///
/// Views use interior mutability for their state: the renderer only ever holds shared references.
pub trait View {
	fn core(&self) -> &ViewCore;

	/// Attributes of the root element. An `"id"` entry is ignored, as that attribute is reserved for the element's id.
	fn attrs(&self) -> Attrs {
		Attrs::new()
	}

	fn children(&self) -> Children {
		Children::default()
	}

	/// Runs after this view's element was freshly inserted into the document.
	fn on_mount(&self) {}

	fn id(&self) -> u64 {
		self.core().id()
	}

	fn tag(&self) -> &str {
		self.core().tag()
	}

	fn is_const(&self) -> bool {
		self.core().is_const()
	}

	/// Marks this view as needing a diff and patch.
	///
	/// # Correct Use
	///
	/// The view must be reachable from the root when the next pass runs,
	/// and its ancestors' child lists must not have changed structurally unless they were patched too.
	///
	/// Views patched while a pass is running are diffed on the following pass.
	fn patch(&self) {
		let core = self.core();
		core.scope().mark_dirty(core.id())
	}

	/// Scrolls this view's element into the viewport after the next pass.
	fn scroll_into_view(&self) {
		let core = self.core();
		core.scope().request_scroll(core.id())
	}
}

impl Debug for dyn View {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("View")
			.field("id", &self.id())
			.field("tag", &self.tag())
			.field("is_const", &self.is_const())
			.finish()
	}
}

/// What populates an element: a keyed list of views, a positional list of nodes or raw markup.
#[derive(Debug, Clone)]
pub enum Children {
	/// Matched by [`View::id`].
	Views(Vec<ViewRef>),
	/// Matched by position.
	Nodes(Vec<Node>),
	/// Inner HTML, inserted verbatim.
	Markup(String),
}

impl Default for Children {
	fn default() -> Self {
		Self::Nodes(Vec::new())
	}
}

impl Children {
	/// Inner text, which is [`escape`]d.
	#[must_use]
	pub fn text(text: &str) -> Self {
		Self::Markup(escape(text))
	}

	/// Raw inner HTML. `html` must already be safe to insert.
	#[must_use]
	pub fn html(html: impl Into<String>) -> Self {
		Self::Markup(html.into())
	}
}

impl From<Vec<ViewRef>> for Children {
	fn from(views: Vec<ViewRef>) -> Self {
		Self::Views(views)
	}
}

impl From<Vec<Node>> for Children {
	fn from(nodes: Vec<Node>) -> Self {
		Self::Nodes(nodes)
	}
}
