//! The primitive document operations the reconciler emits.
//!
//! Elements are addressed by the synthetic `id` attribute that is part of all markup passed in here.
//! Every referenced id is guaranteed to exist in the document at the time of the call, if the sink applied all previous mutations in order.

/// Applies mutations to a live document.
pub trait MutationSink {
	/// Inserts `markup` as the last child of `parent`.
	fn append(&mut self, parent: u64, markup: &str);

	/// Inserts `markup` as the first child of `parent`.
	fn prepend(&mut self, parent: u64, markup: &str);

	/// Inserts `markup` directly before `sibling`.
	fn insert_before(&mut self, sibling: u64, markup: &str);

	/// Inserts `markup` directly after `sibling`.
	fn insert_after(&mut self, sibling: u64, markup: &str);

	/// Moves the existing element `id` to the front of `parent`'s children.
	fn move_prepend(&mut self, parent: u64, id: u64);

	/// Moves the existing element `id` directly after `sibling`.
	fn move_after(&mut self, sibling: u64, id: u64);

	fn set_inner_content(&mut self, id: u64, markup: &str);

	/// Replaces the element `id`, including itself, with `markup`. Its id may change.
	fn set_outer_content(&mut self, id: u64, markup: &str);

	/// Detaches the element `id` and its subtree.
	fn remove(&mut self, id: u64);

	fn set_attribute(&mut self, id: u64, key: &str, value: &str);

	fn remove_attribute(&mut self, id: u64, key: &str);

	fn scroll_into_view(&mut self, id: u64);
}

impl<S: MutationSink + ?Sized> MutationSink for &mut S {
	fn append(&mut self, parent: u64, markup: &str) {
		(**self).append(parent, markup)
	}
	fn prepend(&mut self, parent: u64, markup: &str) {
		(**self).prepend(parent, markup)
	}
	fn insert_before(&mut self, sibling: u64, markup: &str) {
		(**self).insert_before(sibling, markup)
	}
	fn insert_after(&mut self, sibling: u64, markup: &str) {
		(**self).insert_after(sibling, markup)
	}
	fn move_prepend(&mut self, parent: u64, id: u64) {
		(**self).move_prepend(parent, id)
	}
	fn move_after(&mut self, sibling: u64, id: u64) {
		(**self).move_after(sibling, id)
	}
	fn set_inner_content(&mut self, id: u64, markup: &str) {
		(**self).set_inner_content(id, markup)
	}
	fn set_outer_content(&mut self, id: u64, markup: &str) {
		(**self).set_outer_content(id, markup)
	}
	fn remove(&mut self, id: u64) {
		(**self).remove(id)
	}
	fn set_attribute(&mut self, id: u64, key: &str, value: &str) {
		(**self).set_attribute(id, key, value)
	}
	fn remove_attribute(&mut self, id: u64, key: &str) {
		(**self).remove_attribute(id, key)
	}
	fn scroll_into_view(&mut self, id: u64) {
		(**self).scroll_into_view(id)
	}
}

/// A recorded [`MutationSink`] call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Mutation {
	Append { parent: u64, markup: String },
	Prepend { parent: u64, markup: String },
	InsertBefore { sibling: u64, markup: String },
	InsertAfter { sibling: u64, markup: String },
	MovePrepend { parent: u64, id: u64 },
	MoveAfter { sibling: u64, id: u64 },
	SetInnerContent { id: u64, markup: String },
	SetOuterContent { id: u64, markup: String },
	Remove { id: u64 },
	SetAttribute { id: u64, key: String, value: String },
	RemoveAttribute { id: u64, key: String },
	ScrollIntoView { id: u64 },
}

impl Mutation {
	/// Replays this mutation into `sink`.
	pub fn apply<S: MutationSink + ?Sized>(&self, sink: &mut S) {
		match self {
			Self::Append { parent, markup } => sink.append(*parent, markup),
			Self::Prepend { parent, markup } => sink.prepend(*parent, markup),
			Self::InsertBefore { sibling, markup } => sink.insert_before(*sibling, markup),
			Self::InsertAfter { sibling, markup } => sink.insert_after(*sibling, markup),
			Self::MovePrepend { parent, id } => sink.move_prepend(*parent, *id),
			Self::MoveAfter { sibling, id } => sink.move_after(*sibling, *id),
			Self::SetInnerContent { id, markup } => sink.set_inner_content(*id, markup),
			Self::SetOuterContent { id, markup } => sink.set_outer_content(*id, markup),
			Self::Remove { id } => sink.remove(*id),
			Self::SetAttribute { id, key, value } => sink.set_attribute(*id, key, value),
			Self::RemoveAttribute { id, key } => sink.remove_attribute(*id, key),
			Self::ScrollIntoView { id } => sink.scroll_into_view(*id),
		}
	}
}

/// Records mutations in order, e.g. to ship them to the thread or process that owns the document.
impl MutationSink for Vec<Mutation> {
	fn append(&mut self, parent: u64, markup: &str) {
		self.push(Mutation::Append { parent, markup: markup.to_owned() })
	}
	fn prepend(&mut self, parent: u64, markup: &str) {
		self.push(Mutation::Prepend { parent, markup: markup.to_owned() })
	}
	fn insert_before(&mut self, sibling: u64, markup: &str) {
		self.push(Mutation::InsertBefore { sibling, markup: markup.to_owned() })
	}
	fn insert_after(&mut self, sibling: u64, markup: &str) {
		self.push(Mutation::InsertAfter { sibling, markup: markup.to_owned() })
	}
	fn move_prepend(&mut self, parent: u64, id: u64) {
		self.push(Mutation::MovePrepend { parent, id })
	}
	fn move_after(&mut self, sibling: u64, id: u64) {
		self.push(Mutation::MoveAfter { sibling, id })
	}
	fn set_inner_content(&mut self, id: u64, markup: &str) {
		self.push(Mutation::SetInnerContent { id, markup: markup.to_owned() })
	}
	fn set_outer_content(&mut self, id: u64, markup: &str) {
		self.push(Mutation::SetOuterContent { id, markup: markup.to_owned() })
	}
	fn remove(&mut self, id: u64) {
		self.push(Mutation::Remove { id })
	}
	fn set_attribute(&mut self, id: u64, key: &str, value: &str) {
		self.push(Mutation::SetAttribute {
			id,
			key: key.to_owned(),
			value: value.to_owned(),
		})
	}
	fn remove_attribute(&mut self, id: u64, key: &str) {
		self.push(Mutation::RemoveAttribute { id, key: key.to_owned() })
	}
	fn scroll_into_view(&mut self, id: u64) {
		self.push(Mutation::ScrollIntoView { id })
	}
}

#[cfg(test)]
mod tests {
	use super::{Mutation, MutationSink};

	#[test]
	fn replays_through_a_forwarding_sink() {
		let recorded = vec![
			Mutation::Prepend {
				parent: 0,
				markup: r#"<p id="1"></p>"#.to_owned(),
			},
			Mutation::MoveAfter { sibling: 2, id: 1 },
			Mutation::SetAttribute {
				id: 1,
				key: "class".to_owned(),
				value: "a".to_owned(),
			},
			Mutation::ScrollIntoView { id: 1 },
		];

		let mut replayed = Vec::<Mutation>::new();
		{
			let mut forwarding = &mut replayed;
			for mutation in &recorded {
				mutation.apply(&mut forwarding);
			}
		}
		assert_eq!(replayed, recorded);

		MutationSink::remove(&mut replayed, 1);
		assert_eq!(replayed.last(), Some(&Mutation::Remove { id: 1 }));
	}
}
