use crate::{
	diff::Reconciler,
	mirror::MirrorNode,
	scope::{Scope, ROOT_ID},
	sink::MutationSink,
	view::Children,
};
use core::fmt::{self, Debug, Formatter};
use tracing::{instrument, trace, trace_span};

/// The default maximum nesting depth diffed in one pass.
pub const DEFAULT_DEPTH_LIMIT: usize = 1024;

/// Nominal tag of the root element. It is never serialized.
const ROOT_TAG: &str = "body";

/// Keeps a document, represented by a [`MutationSink`], in sync with a tree of [`View`](`crate::View`)s.
///
/// Call [`Renderer::flush`] once per frame (or whenever convenient) to reconcile all views marked via [`View::patch`](`crate::View::patch`).
///
/// # Correct Use
///
/// The sink must start out with an empty root element with the id [`ROOT_ID`],
/// and nothing but this renderer may modify that element's subtree afterwards.
pub struct Renderer<S> {
	scope: Scope,
	sink: S,
	root: Children,
	rendered: MirrorNode,
	depth_limit: usize,
	before_flush: Option<Box<dyn FnMut()>>,
	after_flush: Option<Box<dyn FnMut()>>,
}

impl<S: MutationSink> Renderer<S> {
	#[must_use]
	pub fn new(sink: S) -> Self {
		Self::with_scope(Scope::new(), sink)
	}

	/// Creates a renderer sharing the id counter and dirty tracker of an existing [`Scope`].
	#[must_use]
	pub fn with_scope(scope: Scope, sink: S) -> Self {
		Self {
			scope,
			sink,
			root: Children::default(),
			rendered: MirrorNode::root(ROOT_ID, ROOT_TAG),
			depth_limit: DEFAULT_DEPTH_LIMIT,
			before_flush: None,
			after_flush: None,
		}
	}

	/// Limits how deeply nested elements are materialized and diffed. Deeper subtrees are left out with an error.
	#[must_use]
	pub fn with_depth_limit(mut self, depth_limit: usize) -> Self {
		self.depth_limit = depth_limit;
		self
	}

	/// Handle for creating views and marking them dirty.
	#[must_use]
	pub fn scope(&self) -> &Scope {
		&self.scope
	}

	#[must_use]
	pub fn sink(&self) -> &S {
		&self.sink
	}

	pub fn sink_mut(&mut self) -> &mut S {
		&mut self.sink
	}

	#[must_use]
	pub fn into_sink(self) -> S {
		self.sink
	}

	/// The root of the rendered mirror, as of the last pass.
	#[must_use]
	pub fn rendered(&self) -> &MirrorNode {
		&self.rendered
	}

	/// Replaces the root element's children. They are diffed in full on the next pass.
	pub fn set_root_children(&mut self, children: impl Into<Children>) {
		self.root = children.into();
		self.scope.mark_dirty(ROOT_ID)
	}

	/// Sets a function to run at the start of each [`Renderer::flush`], before dirty views are collected.
	pub fn set_before_flush(&mut self, hook: Option<Box<dyn FnMut()>>) {
		self.before_flush = hook
	}

	/// Sets a function to run at the end of each [`Renderer::flush`].
	pub fn set_after_flush(&mut self, hook: Option<Box<dyn FnMut()>>) {
		self.after_flush = hook
	}

	/// Runs one reconciliation pass.
	///
	/// Descends from the root only as far as needed to reach dirty views, diffs each of them fully,
	/// then applies the latest pending scroll request.
	#[instrument(skip(self))]
	pub fn flush(&mut self) {
		if let Some(before_flush) = self.before_flush.as_mut() {
			before_flush()
		}

		self.scope.begin_pass();
		{
			let mut reconciler = Reconciler::new(&self.scope, &mut self.sink);
			if self.scope.is_dirty(ROOT_ID) {
				let span = trace_span!("Diffing root children");
				let _enter = span.enter();
				reconciler.diff_children(&mut self.rendered, self.root.clone(), self.depth_limit);
				self.scope.resolve(ROOT_ID);
			} else if self.scope.dirty_count() != 0 {
				let span = trace_span!("Searching dirty views", count = self.scope.dirty_count());
				let _enter = span.enter();
				reconciler.find_dirty(&mut self.rendered.children, self.root.clone(), self.depth_limit);
			}
		}
		self.scope.end_pass();

		if let Some(id) = self.scope.take_scroll() {
			trace!(id, "Scrolling into view.");
			self.sink.scroll_into_view(id);
		}

		if let Some(after_flush) = self.after_flush.as_mut() {
			after_flush()
		}
	}
}

impl<S: Debug> Debug for Renderer<S> {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Renderer")
			.field("scope", &self.scope)
			.field("sink", &self.sink)
			.field("root", &self.root)
			.field("rendered", &self.rendered)
			.field("depth_limit", &self.depth_limit)
			.field("before_flush", &self.before_flush.is_some())
			.field("after_flush", &self.after_flush.is_some())
			.finish()
	}
}
