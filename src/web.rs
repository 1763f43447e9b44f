//! A [`MutationSink`] that applies mutations to a live browser document.

use crate::{scope::ROOT_ID, sink::MutationSink};
use tracing::{error, instrument, trace, warn};
use wasm_bindgen::UnwrapThrowExt;

/// Applies mutations to the document that owns a given root element, looking up elements by their `id` attribute.
///
/// # Correct Use
///
/// Rendered element ids are small integers, so other elements in the document shouldn't use numeric `id`s.
#[derive(Debug, Clone)]
pub struct DomSink {
	document: web_sys::Document,
}

impl DomSink {
	/// Clears `root` and assigns it the root id.
	#[must_use]
	#[instrument]
	pub fn new_for_root(root: &web_sys::Element) -> Self {
		let document = root.owner_document().expect_throw("mirror-dom: No owner document found for root element.");
		root.set_id(&ROOT_ID.to_string());
		root.set_inner_html("");
		Self { document }
	}

	fn element(&self, id: u64) -> Option<web_sys::Element> {
		let element = self.document.get_element_by_id(&id.to_string());
		if element.is_none() {
			error!(id, "Element not found. Skipping mutation.");
		}
		element
	}

	fn insert_adjacent(&self, id: u64, position: &str, markup: &str) {
		if let Some(element) = self.element(id) {
			trace!(id, position, "Inserting markup.");
			if let Err(error) = element.insert_adjacent_html(position, markup) {
				error!("Failed to insert markup {} element {}: {:?}", position, id, error)
			}
		}
	}

	fn move_adjacent(&self, anchor: u64, position: &str, id: u64) {
		if let (Some(anchor_element), Some(element)) = (self.element(anchor), self.element(id)) {
			trace!(anchor, position, id, "Moving element.");
			if let Err(error) = anchor_element.insert_adjacent_element(position, &element) {
				error!("Failed to move element {} {} element {}: {:?}", id, position, anchor, error)
			}
		}
	}
}

impl MutationSink for DomSink {
	fn append(&mut self, parent: u64, markup: &str) {
		self.insert_adjacent(parent, "beforeend", markup)
	}

	fn prepend(&mut self, parent: u64, markup: &str) {
		self.insert_adjacent(parent, "afterbegin", markup)
	}

	fn insert_before(&mut self, sibling: u64, markup: &str) {
		self.insert_adjacent(sibling, "beforebegin", markup)
	}

	fn insert_after(&mut self, sibling: u64, markup: &str) {
		self.insert_adjacent(sibling, "afterend", markup)
	}

	fn move_prepend(&mut self, parent: u64, id: u64) {
		self.move_adjacent(parent, "afterbegin", id)
	}

	fn move_after(&mut self, sibling: u64, id: u64) {
		self.move_adjacent(sibling, "afterend", id)
	}

	fn set_inner_content(&mut self, id: u64, markup: &str) {
		if let Some(element) = self.element(id) {
			element.set_inner_html(markup)
		}
	}

	fn set_outer_content(&mut self, id: u64, markup: &str) {
		if let Some(element) = self.element(id) {
			element.set_outer_html(markup)
		}
	}

	fn remove(&mut self, id: u64) {
		if let Some(element) = self.element(id) {
			element.remove()
		}
	}

	fn set_attribute(&mut self, id: u64, key: &str, value: &str) {
		if let Some(element) = self.element(id) {
			if let Err(error) = element.set_attribute(key, value) {
				error!("Could not set attribute {:?} on element {}: {:?}", key, id, error)
			}
		}
	}

	fn remove_attribute(&mut self, id: u64, key: &str) {
		if let Some(element) = self.element(id) {
			if let Err(error) = element.remove_attribute(key) {
				warn!("Could not remove attribute {:?} from element {}: {:?}", key, id, error)
			}
		}
	}

	fn scroll_into_view(&mut self, id: u64) {
		if let Some(element) = self.element(id) {
			element.scroll_into_view()
		}
	}
}
