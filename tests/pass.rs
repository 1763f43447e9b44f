use mirror_dom::{Attrs, Children, Mutation, Node, Renderer, View, ViewCore, ViewRef};
use std::{cell::Cell, rc::Rc};

use fixture_::{flush, renderer, views, TestView};

/// Patches itself each time it is mounted.
struct PatchOnMount {
	core: ViewCore,
	children_calls: Cell<usize>,
}

impl View for PatchOnMount {
	fn core(&self) -> &ViewCore {
		&self.core
	}

	fn children(&self) -> Children {
		self.children_calls.set(self.children_calls.get() + 1);
		Children::default()
	}

	fn on_mount(&self) {
		self.patch()
	}
}

#[test]
fn clean_views_are_only_searched() {
	let mut renderer = renderer();
	let scope = renderer.scope().clone();
	let parent = TestView::new(&scope, "div");
	let first = TestView::new(&scope, "p");
	let second = TestView::new(&scope, "p");
	let sibling = TestView::new(&scope, "aside");
	parent.set_children(views(&[&first, &second]));
	renderer.set_root_children(views(&[&parent, &sibling]));
	flush(&mut renderer);
	for view in &[&parent, &first, &second, &sibling] {
		view.reset_counts();
	}

	second.set_children(Children::text("changed"));
	second.patch();
	assert!(scope.is_dirty(second.id()));
	assert_eq!(
		flush(&mut renderer),
		[Mutation::SetInnerContent {
			id: second.id(),
			markup: "changed".to_owned()
		}]
	);

	assert_eq!(scope.dirty_count(), 0);
	assert_eq!(parent.attrs_calls.get(), 0);
	assert_eq!(first.attrs_calls.get(), 0);
	assert_eq!(second.reads(), 2);
	assert_eq!(sibling.reads(), 0);
}

#[test]
fn descendants_of_dirty_views_are_resolved_with_them() {
	let mut renderer = renderer();
	let scope = renderer.scope().clone();
	let a = TestView::new(&scope, "div");
	let b = TestView::new(&scope, "p");
	let s = TestView::new(&scope, "p");
	a.set_children(views(&[&b]));
	renderer.set_root_children(views(&[&a, &s]));
	flush(&mut renderer);
	s.reset_counts();

	a.patch();
	b.patch();
	assert_eq!(scope.dirty_count(), 2);
	assert!(flush(&mut renderer).is_empty());
	assert_eq!(scope.dirty_count(), 0);
	assert_eq!(s.reads(), 0);
}

#[test]
fn nothing_dirty_nothing_read() {
	let mut renderer = renderer();
	let view = TestView::new(renderer.scope(), "p");
	renderer.set_root_children(views(&[&view]));
	flush(&mut renderer);
	view.reset_counts();

	assert!(flush(&mut renderer).is_empty());
	assert_eq!(view.reads(), 0);
}

#[test]
fn const_views_are_read_once() {
	let mut renderer = renderer();
	let scope = renderer.scope().clone();
	let fixed = TestView::new_const(&scope, "p");
	fixed.set_children(Children::text("k"));
	renderer.set_root_children(views(&[&fixed]));
	assert_eq!(
		flush(&mut renderer),
		[Mutation::Prepend {
			parent: 0,
			markup: r#"<p id="1">k</p>"#.to_owned()
		}]
	);
	assert_eq!(fixed.reads(), 2);

	fixed.set_children(Children::text("changed"));
	fixed.patch();
	assert!(flush(&mut renderer).is_empty());
	assert_eq!(scope.dirty_count(), 0);

	renderer.set_root_children(views(&[&fixed]));
	assert!(flush(&mut renderer).is_empty());
	assert_eq!(fixed.reads(), 2);
}

#[test]
fn patches_during_a_pass_are_deferred() {
	let mut renderer = renderer();
	let scope = renderer.scope().clone();
	let view = Rc::new(PatchOnMount {
		core: scope.view("p"),
		children_calls: Cell::new(0),
	});
	renderer.set_root_children(vec![view.clone() as ViewRef]);

	flush(&mut renderer);
	assert_eq!(view.children_calls.get(), 1);
	assert!(scope.is_dirty(view.id()));

	assert!(flush(&mut renderer).is_empty());
	assert_eq!(view.children_calls.get(), 2);
	assert!(!scope.is_dirty(view.id()));
}

#[test]
fn unreachable_dirty_views_are_dropped() {
	let mut renderer = renderer();
	let scope = renderer.scope().clone();
	let shown = TestView::new(&scope, "p");
	renderer.set_root_children(views(&[&shown]));
	flush(&mut renderer);

	let hidden = TestView::new(&scope, "p");
	hidden.patch();
	assert!(flush(&mut renderer).is_empty());
	assert_eq!(scope.dirty_count(), 0);
	assert_eq!(hidden.reads(), 0);
}

#[test]
fn last_scroll_request_wins() {
	let mut renderer = renderer();
	let scope = renderer.scope().clone();
	let a = TestView::new(&scope, "p");
	let b = TestView::new(&scope, "p");
	renderer.set_root_children(views(&[&a, &b]));
	flush(&mut renderer);

	a.scroll_into_view();
	b.scroll_into_view();
	assert_eq!(flush(&mut renderer), [Mutation::ScrollIntoView { id: b.id() }]);
	assert!(flush(&mut renderer).is_empty());
}

#[test]
fn scroll_follows_the_pass_that_renders_the_element() {
	let mut renderer = renderer();
	let view = TestView::new(renderer.scope(), "p");
	view.scroll_into_view();
	renderer.set_root_children(views(&[&view]));
	assert_eq!(
		flush(&mut renderer),
		[
			Mutation::Prepend {
				parent: 0,
				markup: r#"<p id="1"></p>"#.to_owned()
			},
			Mutation::ScrollIntoView { id: 1 },
		]
	);
}

#[test]
fn flush_hooks() {
	let mut renderer = renderer();
	let view = TestView::new(renderer.scope(), "p");
	renderer.set_root_children(views(&[&view]));
	flush(&mut renderer);

	let changed = Rc::clone(&view);
	renderer.set_before_flush(Some(Box::new(move || {
		changed.set_children(Children::text("from hook"));
		changed.patch();
	})));
	let after = Rc::new(Cell::new(0));
	let after_count = Rc::clone(&after);
	renderer.set_after_flush(Some(Box::new(move || after_count.set(after_count.get() + 1))));

	assert_eq!(
		flush(&mut renderer),
		[Mutation::SetInnerContent {
			id: 1,
			markup: "from hook".to_owned()
		}]
	);
	assert_eq!(after.get(), 1);

	renderer.set_before_flush(None);
	assert!(flush(&mut renderer).is_empty());
	assert_eq!(after.get(), 2);
}

#[test]
fn depth_limit_skips_deep_subtrees() {
	let mut renderer = Renderer::new(Vec::<Mutation>::new()).with_depth_limit(1);
	let outer = TestView::new(renderer.scope(), "div");
	renderer.set_root_children(views(&[&outer]));
	renderer.flush();
	assert_eq!(renderer.sink().len(), 1);
	renderer.sink_mut().clear();

	outer.set_children(Children::text("deep"));
	outer.patch();
	renderer.flush();
	assert!(renderer.sink().is_empty());
}

#[test]
fn depth_limit_bounds_first_render() {
	let mut renderer = Renderer::new(Vec::<Mutation>::new()).with_depth_limit(3);
	let section = TestView::new(renderer.scope(), "section");
	section.set_children(vec![Node::with_children(
		"div",
		Attrs::new(),
		vec![Node::with_children("span", Attrs::new(), vec![Node::new("em")])],
	)]);
	renderer.set_root_children(views(&[&section]));
	renderer.flush();
	assert_eq!(
		renderer.sink(),
		&[Mutation::Prepend {
			parent: 0,
			markup: r#"<section id="1"><div id="2"><span id="3"></span></div></section>"#.to_owned()
		}]
	);
}

#[test]
fn shared_scope() {
	let scope = mirror_dom::Scope::new();
	let early = TestView::new(&scope, "p");
	let mut renderer = Renderer::with_scope(scope.clone(), Vec::<Mutation>::new());
	renderer.set_root_children(views(&[&early]));
	renderer.flush();
	assert_eq!(
		renderer.into_sink(),
		[Mutation::Prepend {
			parent: 0,
			markup: r#"<p id="1"></p>"#.to_owned()
		}]
	);
}
