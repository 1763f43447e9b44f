#![doc(html_root_url = "https://docs.rs/mirror-dom/0.1.0")]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! A virtual DOM renderer that reconciles [`View`]s against a cached mirror of the rendered document.
//!
//! Views are diffed only when they (or one of their ancestors) were marked via [`View::patch`].
//! The resulting changes are emitted as HTML-level mutations into a [`MutationSink`].

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

mod diff;
mod dirty;
pub mod markup;
pub mod mirror;
mod node;
mod renderer;
mod scope;
pub mod sink;
mod view;

#[cfg(feature = "web")]
pub mod web;

pub use markup::escape;
pub use mirror::{MirrorChildren, MirrorNode};
pub use node::{Attrs, Node, NodeContent};
pub use renderer::{Renderer, DEFAULT_DEPTH_LIMIT};
pub use scope::{Scope, ROOT_ID};
pub use sink::{Mutation, MutationSink};
pub use view::{Children, View, ViewCore, ViewRef};
