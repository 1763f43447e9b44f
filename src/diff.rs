use crate::{
	markup::{is_void, ID_KEY},
	mirror::{MirrorChildren, MirrorNode},
	node::{Attrs, Node, NodeContent},
	scope::Scope,
	sink::MutationSink,
	view::{Children, View, ViewRef},
};
use core::mem;
use hashbrown::{HashMap, HashSet};
use tracing::{error, trace, trace_span};

/// Diffs view and node descriptions against the [`MirrorNode`]s they were last rendered as,
/// updating the mirror in place and emitting the necessary mutations into a [`MutationSink`].
///
/// Views are only diffed when they are dirty or one of their ancestors is.
/// [`Reconciler::find_dirty`] is the entry point for the former case.
pub(crate) struct Reconciler<'a, S: ?Sized> {
	scope: &'a Scope,
	sink: &'a mut S,
	/// Freshly materialized views waiting for their [`View::on_mount`] call.
	mounted: Vec<ViewRef>,
}

impl<'a, S: MutationSink + ?Sized> Reconciler<'a, S> {
	pub(crate) fn new(scope: &'a Scope, sink: &'a mut S) -> Self {
		Self { scope, sink, mounted: Vec::new() }
	}

	/// Searches `children` for dirty views without diffing clean ones, and diffs each dirty view's subtree fully.
	///
	/// Returns as soon as no dirty views remain.
	pub(crate) fn find_dirty(&mut self, rendered: &mut MirrorChildren, children: Children, depth_limit: usize) {
		if depth_limit == 0 {
			return error!("Depth limit reached");
		}

		// Only views can be dirty.
		let views = match children {
			Children::Views(views) => views,
			Children::Nodes(_) | Children::Markup(_) => return,
		};
		let rendered = match rendered {
			MirrorChildren::Views(rendered) => rendered,
			MirrorChildren::Nodes(_) | MirrorChildren::Markup(_) => {
				return error!("Expected rendered views while searching for dirty views, but found nodes or markup. Was a parent view not patched?");
			}
		};

		for (position, view) in views.iter().enumerate() {
			if view.is_const() {
				continue;
			}

			let dom = match rendered.get_mut(position) {
				Some(dom) => dom,
				None => {
					return error!(
						id = view.id(),
						position,
						"Expected a rendered view beyond the end of the rendered children. Was a parent view not patched?"
					);
				}
			};
			if dom.id != view.id() {
				error!(
					id = view.id(),
					rendered_id = dom.id,
					position,
					"Rendered child doesn't match the view at its position. Was a parent view not patched? Skipping the subtree."
				);
				continue;
			}

			if self.scope.is_dirty(view.id()) {
				self.diff_view(dom, view, depth_limit - 1);
			} else if !is_void(&dom.tag) {
				let span = trace_span!("Searching clean view", id = view.id(), tag = view.tag());
				let _enter = span.enter();
				self.find_dirty(&mut dom.children, view.children(), depth_limit - 1);
			}

			if self.scope.dirty_count() == 0 {
				trace!("All dirty views reconciled.");
				return;
			}
		}
	}

	/// Diffs `view` and its whole subtree. Replaces the element if its identity changed.
	pub(crate) fn diff_view(&mut self, dom: &mut MirrorNode, view: &ViewRef, depth_limit: usize) {
		if depth_limit == 0 {
			return error!("Depth limit reached");
		}

		let span = trace_span!("Diffing view", id = view.id(), tag = view.tag());
		let _enter = span.enter();

		if dom.id != view.id() || dom.tag != view.tag() {
			trace!(previous_id = dom.id, previous_tag = dom.tag.as_str(), "Identity changed. Replacing the element.");
			let fresh = MirrorNode::from_view(view, self.scope, &mut self.mounted, depth_limit);
			return self.replace(dom, fresh);
		}

		if view.is_const() {
			// Its subtree was rendered once and never changes.
			return trace!("Skipping const view.");
		}

		self.diff_attrs(dom, view.attrs());
		if is_void(&dom.tag) {
			trace!("Void element. Skipping children.");
		} else {
			self.diff_children(dom, view.children(), depth_limit);
		}
		self.scope.resolve(view.id());
	}

	fn diff_node(&mut self, dom: &mut MirrorNode, node: Node, depth_limit: usize) {
		if depth_limit == 0 {
			return error!("Depth limit reached");
		}

		let span = trace_span!("Diffing node", id = dom.id, tag = node.tag.as_str());
		let _enter = span.enter();

		if dom.tag != node.tag {
			trace!(previous_tag = dom.tag.as_str(), "Tag changed. Replacing the element.");
			let fresh = MirrorNode::from_node(node, self.scope, depth_limit);
			return self.replace(dom, fresh);
		}

		let Node { attrs, content, .. } = node;
		self.diff_attrs(dom, attrs);
		if is_void(&dom.tag) {
			return trace!("Void element. Skipping children.");
		}
		let children = match content {
			NodeContent::Children(nodes) => Children::Nodes(nodes),
			NodeContent::Markup(html) => Children::Markup(html),
		};
		self.diff_children(dom, children, depth_limit);
	}

	fn replace(&mut self, dom: &mut MirrorNode, fresh: MirrorNode) {
		let previous_id = dom.id;
		*dom = fresh;
		trace!(previous_id, id = dom.id, "Setting outer content.");
		self.sink.set_outer_content(previous_id, &dom.to_html());
		self.mount_pending();
	}

	fn mount_pending(&mut self) {
		for view in mem::take(&mut self.mounted) {
			let span = trace_span!("Mounting view", id = view.id());
			let _enter = span.enter();
			view.on_mount();
		}
	}

	/// Brings `dom`'s attributes in line with `attrs`. The `"id"` attribute is never diffed.
	pub(crate) fn diff_attrs(&mut self, dom: &mut MirrorNode, mut attrs: Attrs) {
		attrs.remove(ID_KEY);
		let id = dom.id;

		let sink = &mut *self.sink;
		dom.attrs.retain(|key, _| {
			let keep = attrs.contains_key(key);
			if !keep {
				trace!(id, key = key.as_str(), "Removing attribute.");
				sink.remove_attribute(id, key);
			}
			keep
		});

		for (key, value) in attrs {
			if dom.attrs.get(&key) == Some(&value) {
				continue;
			}
			if cfg!(feature = "dangerous-logging") {
				trace!(id, key = key.as_str(), value = value.as_str(), "Setting attribute.");
			} else {
				trace!(id, key = key.as_str(), "Setting attribute.");
			}
			self.sink.set_attribute(id, &key, &value);
			dom.attrs.insert(key, value);
		}
	}

	pub(crate) fn diff_children(&mut self, dom: &mut MirrorNode, children: Children, depth_limit: usize) {
		if depth_limit == 0 {
			return error!("Depth limit reached");
		}

		match children {
			Children::Views(views) => {
				let previous = self.take_list(dom, true);
				let next = self.diff_keyed(dom.id, previous, &views, depth_limit);
				dom.children = MirrorChildren::Views(next);
			}
			Children::Nodes(nodes) => {
				let previous = self.take_list(dom, false);
				let next = self.diff_positional(dom.id, previous, nodes, depth_limit);
				dom.children = MirrorChildren::Nodes(next);
			}
			Children::Markup(html) => {
				if dom.children.markup() != Some(html.as_str()) {
					if cfg!(feature = "dangerous-logging") {
						trace!(id = dom.id, markup = html.as_str(), "Setting inner content.");
					} else {
						trace!(id = dom.id, "Setting inner content.");
					}
					self.sink.set_inner_content(dom.id, &html);
				}
				dom.children = MirrorChildren::Markup(html);
			}
		}
	}

	/// Takes `dom`'s rendered child list for a keyed (`keyed == true`) or positional diff.
	///
	/// Markup, and child lists of the other kind, are cleared from the document.
	fn take_list(&mut self, dom: &mut MirrorNode, keyed: bool) -> Vec<MirrorNode> {
		match mem::take(&mut dom.children) {
			MirrorChildren::Views(list) if keyed => list,
			MirrorChildren::Nodes(list) if !keyed => list,
			MirrorChildren::Markup(_) => {
				trace!(id = dom.id, "Clearing inner markup.");
				self.sink.set_inner_content(dom.id, "");
				Vec::new()
			}
			MirrorChildren::Views(list) | MirrorChildren::Nodes(list) => {
				if !list.is_empty() {
					trace!(id = dom.id, keyed, "Child list kind changed. Clearing children.");
					self.sink.set_inner_content(dom.id, "");
				}
				Vec::new()
			}
		}
	}

	/// Matches `previous` against `views` by id.
	///
	/// New views are inserted after the previously settled sibling (or prepended),
	/// retained views outside the longest run of unchanged relative order are moved there,
	/// and views that are gone are removed. The result is in the order of `views`.
	fn diff_keyed(&mut self, parent: u64, mut previous: Vec<MirrorNode>, views: &[ViewRef], depth_limit: usize) -> Vec<MirrorNode> {
		let span = trace_span!("Diffing keyed children", parent, "previous.len()" = previous.len(), "views.len()" = views.len());
		let _enter = span.enter();

		if previous.len() == views.len() && previous.iter().zip(views).all(|(dom, view)| dom.id == view.id()) {
			trace!("No structural change.");
			for (dom, view) in previous.iter_mut().zip(views) {
				self.diff_view(dom, view, depth_limit - 1);
			}
			return previous;
		}

		let mut seen = HashSet::with_capacity(views.len());
		let views: Vec<&ViewRef> = views
			.iter()
			.filter(|view| {
				let unique = seen.insert(view.id());
				if !unique {
					error!(id = view.id(), "Duplicate view id in keyed children. Skipping the repeated occurrence.");
				}
				unique
			})
			.collect();

		let mut existing: HashMap<u64, (usize, MirrorNode)> = previous.into_iter().enumerate().map(|(index, dom)| (dom.id, (index, dom))).collect();
		let sources: Vec<Option<usize>> = views.iter().map(|view| existing.get(&view.id()).map(|&(index, _)| index)).collect();
		let stable = stable_positions(&sources);

		let mut next = Vec::with_capacity(views.len());
		let mut last_settled: Option<u64> = None;
		for (position, view) in views.into_iter().enumerate() {
			let id = view.id();
			match existing.remove(&id) {
				None => {
					let fresh = MirrorNode::from_view(view, self.scope, &mut self.mounted, depth_limit - 1);
					let html = fresh.to_html();
					match last_settled {
						Some(sibling) => {
							trace!(id, sibling, "Inserting view after sibling.");
							self.sink.insert_after(sibling, &html)
						}
						None => {
							trace!(id, parent, "Prepending view.");
							self.sink.prepend(parent, &html)
						}
					}
					self.mount_pending();
					next.push(fresh);
				}
				Some((_, mut dom)) => {
					if !stable[position] {
						match last_settled {
							Some(sibling) => {
								trace!(id, sibling, "Moving view after sibling.");
								self.sink.move_after(sibling, id)
							}
							None => {
								trace!(id, parent, "Moving view to the front.");
								self.sink.move_prepend(parent, id)
							}
						}
					}
					self.diff_view(&mut dom, view, depth_limit - 1);
					next.push(dom);
				}
			}
			last_settled = Some(id);
		}

		let mut stale: Vec<(usize, MirrorNode)> = existing.into_iter().map(|(_, entry)| entry).collect();
		stale.sort_unstable_by_key(|&(index, _)| index);
		for (_, dom) in stale {
			trace!(id = dom.id, "Removing stale view.");
			self.sink.remove(dom.id);
		}

		next
	}

	/// Matches `previous` against `nodes` by position, appending or removing trailing elements as needed.
	fn diff_positional(&mut self, parent: u64, mut previous: Vec<MirrorNode>, nodes: Vec<Node>, depth_limit: usize) -> Vec<MirrorNode> {
		let span = trace_span!("Diffing positional children", parent, "previous.len()" = previous.len(), "nodes.len()" = nodes.len());
		let _enter = span.enter();

		let length = nodes.len();
		let mut nodes = nodes.into_iter();
		for dom in &mut previous {
			match nodes.next() {
				Some(node) => self.diff_node(dom, node, depth_limit - 1),
				None => break,
			}
		}

		for node in nodes {
			let fresh = MirrorNode::from_node(node, self.scope, depth_limit - 1);
			trace!(id = fresh.id, parent, "Appending node.");
			self.sink.append(parent, &fresh.to_html());
			previous.push(fresh);
		}

		if previous.len() > length {
			for dropped in previous.split_off(length).into_iter().rev() {
				trace!(id = dropped.id, "Removing trailing node.");
				self.sink.remove(dropped.id);
			}
		}

		previous
	}
}

/// For each new position, whether the retained child there keeps its place in the document.
///
/// `sources` holds each new position's previous index, or [`None`] for insertions.
/// The stable positions are a longest strictly increasing run of previous indices.
fn stable_positions(sources: &[Option<usize>]) -> Vec<bool> {
	// (previous index, position) of the smallest tail of each run length.
	let mut tails: Vec<(usize, usize)> = Vec::new();
	let mut predecessors: Vec<Option<usize>> = vec![None; sources.len()];
	for (position, source) in sources.iter().enumerate() {
		let source = match *source {
			Some(source) => source,
			None => continue,
		};
		let slot = tails.partition_point(|&(tail, _)| tail < source);
		predecessors[position] = slot.checked_sub(1).map(|previous| tails[previous].1);
		if slot == tails.len() {
			tails.push((source, position))
		} else {
			tails[slot] = (source, position)
		}
	}

	let mut stable = vec![false; sources.len()];
	let mut cursor = tails.last().map(|&(_, position)| position);
	while let Some(position) = cursor {
		stable[position] = true;
		cursor = predecessors[position];
	}
	stable
}

#[cfg(test)]
mod tests {
	use super::{stable_positions, Reconciler};
	use crate::{Mutation, MirrorNode, Scope, View, ViewCore, ViewRef};
	use std::{cell::Cell, rc::Rc};

	struct Mounting {
		core: ViewCore,
		mounts: Cell<usize>,
	}

	impl View for Mounting {
		fn core(&self) -> &ViewCore {
			&self.core
		}

		fn on_mount(&self) {
			self.mounts.set(self.mounts.get() + 1)
		}
	}

	#[test]
	fn identity_change_replaces_outer_content() {
		let scope = Scope::new();
		let view = Rc::new(Mounting {
			core: scope.view("p"),
			mounts: Cell::new(0),
		});
		let mut dom = MirrorNode::root(99, "div");
		let mut sink = Vec::<Mutation>::new();

		Reconciler::new(&scope, &mut sink).diff_view(&mut dom, &(view.clone() as ViewRef), 8);

		assert_eq!(
			sink,
			[Mutation::SetOuterContent {
				id: 99,
				markup: r#"<p id="1"></p>"#.to_owned()
			}]
		);
		assert_eq!((dom.id(), dom.tag()), (1, "p"));
		assert_eq!(view.mounts.get(), 1);
	}

	#[test]
	fn depth_limit_stops_descent() {
		let scope = Scope::new();
		let view: ViewRef = Rc::new(Mounting {
			core: scope.view("p"),
			mounts: Cell::new(0),
		});
		let mut dom = MirrorNode::root(7, "div");
		let mut sink = Vec::<Mutation>::new();

		Reconciler::new(&scope, &mut sink).diff_view(&mut dom, &view, 0);

		assert!(sink.is_empty());
		assert_eq!(dom.id(), 7);
	}

	#[test]
	fn unchanged_order_is_stable() {
		assert_eq!(stable_positions(&[Some(0), Some(1), Some(2)]), [true, true, true]);
	}

	#[test]
	fn insertions_are_never_stable() {
		assert_eq!(stable_positions(&[Some(0), None, Some(1)]), [true, false, true]);
	}

	#[test]
	fn swap_keeps_one_in_place() {
		assert_eq!(stable_positions(&[Some(1), None, Some(0)]), [false, false, true]);
	}

	#[test]
	fn rotation_moves_only_the_wrapped_child() {
		assert_eq!(stable_positions(&[Some(2), Some(0), Some(1)]), [false, true, true]);
		assert_eq!(stable_positions(&[Some(1), Some(2), Some(0)]), [true, true, false]);
	}

	#[test]
	fn empty() {
		assert!(stable_positions(&[]).is_empty());
	}
}
