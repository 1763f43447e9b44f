use hashbrown::HashSet;
use tracing::{trace, warn};

/// Ids of views that need a diff and patch on the next pass.
///
/// While a pass is running, newly marked ids are buffered and only merged in once [`DirtyTracker::end_pass`] is called,
/// so a view marked from inside a pass is always picked up by the *next* pass.
#[derive(Debug, Default)]
pub(crate) struct DirtyTracker {
	pending: HashSet<u64>,
	deferred: Vec<u64>,
	in_pass: bool,
}

impl DirtyTracker {
	#[must_use]
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn mark(&mut self, id: u64) {
		if self.in_pass {
			trace!(id, "Deferring dirty mark to the next pass.");
			self.deferred.push(id)
		} else {
			self.pending.insert(id);
		}
	}

	#[must_use]
	pub(crate) fn contains(&self, id: u64) -> bool {
		self.pending.contains(&id)
	}

	/// Clears `id` once its view has been reconciled. Returns whether it was pending.
	pub(crate) fn resolve(&mut self, id: u64) -> bool {
		self.pending.remove(&id)
	}

	#[must_use]
	pub(crate) fn len(&self) -> usize {
		self.pending.len()
	}

	pub(crate) fn begin_pass(&mut self) {
		debug_assert!(!self.in_pass, "Reconciliation passes can't be nested");
		self.in_pass = true;
	}

	/// Drops ids that the pass couldn't reach, then merges marks deferred during the pass.
	pub(crate) fn end_pass(&mut self) {
		if !self.pending.is_empty() {
			warn!(
				"{} view(s) marked dirty were not reachable from the root and were dropped: {:?}\n\
				Views must be reachable (and not below a const view) when patched.",
				self.pending.len(),
				self.pending
			);
			self.pending.clear();
		}
		self.in_pass = false;
		self.pending.extend(self.deferred.drain(..));
	}
}
