use crate::{dirty::DirtyTracker, view::ViewCore};
use std::{
	cell::{Cell, RefCell},
	rc::Rc,
};
use tracing::trace;

/// The id of the root element. No view or node is ever assigned it.
pub const ROOT_ID: u64 = 0;

/// Shared state of one [`Renderer`](`crate::Renderer`): the element id counter, the set of dirty views and the pending scroll request.
///
/// Cloning a [`Scope`] is cheap and yields a handle to the same state.
/// Views keep a handle to mark themselves dirty between passes.
#[derive(Debug, Clone)]
pub struct Scope(Rc<Shared>);

#[derive(Debug)]
struct Shared {
	next_id: Cell<u64>,
	dirty: RefCell<DirtyTracker>,
	scroll_to: Cell<Option<u64>>,
}

impl Default for Scope {
	fn default() -> Self {
		Self::new()
	}
}

impl Scope {
	#[must_use]
	pub fn new() -> Self {
		Self(Rc::new(Shared {
			next_id: Cell::new(ROOT_ID + 1),
			dirty: RefCell::new(DirtyTracker::new()),
			scroll_to: Cell::new(None),
		}))
	}

	/// Generates a new unique element id.
	#[must_use]
	pub fn new_id(&self) -> u64 {
		let id = self.0.next_id.get();
		self.0.next_id.set(id + 1);
		id
	}

	/// Creates the identity of a view whose root element has the given `tag`.
	#[must_use]
	pub fn view(&self, tag: impl Into<String>) -> ViewCore {
		ViewCore::new(self.clone(), self.new_id(), tag.into(), false)
	}

	/// Like [`Scope::view`], but the caller guarantees that neither the root element nor the subtree of the view ever change after the first render.
	#[must_use]
	pub fn const_view(&self, tag: impl Into<String>) -> ViewCore {
		ViewCore::new(self.clone(), self.new_id(), tag.into(), true)
	}

	pub fn mark_dirty(&self, id: u64) {
		self.0.dirty.borrow_mut().mark(id)
	}

	#[must_use]
	pub fn is_dirty(&self, id: u64) -> bool {
		self.0.dirty.borrow().contains(id)
	}

	#[must_use]
	pub fn dirty_count(&self) -> usize {
		self.0.dirty.borrow().len()
	}

	pub(crate) fn resolve(&self, id: u64) {
		if self.0.dirty.borrow_mut().resolve(id) {
			trace!(id, "Resolved dirty view.");
		}
	}

	pub(crate) fn begin_pass(&self) {
		self.0.dirty.borrow_mut().begin_pass()
	}

	pub(crate) fn end_pass(&self) {
		self.0.dirty.borrow_mut().end_pass()
	}

	/// Requests scrolling the element with `id` into view after the next pass. Later requests replace earlier ones.
	pub fn request_scroll(&self, id: u64) {
		self.0.scroll_to.set(Some(id))
	}

	pub(crate) fn take_scroll(&self) -> Option<u64> {
		self.0.scroll_to.take()
	}
}
