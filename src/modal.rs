//! Modal dialogs populated from the data attributes of the button that opened them.
//!
//! This is a one-shot attribute copy per show event, independent of the visibility rules.

use crate::listener::Listeners;
use tracing::{debug, error, instrument, warn};
use wasm_bindgen::{JsCast, JsValue};

/// Where a [`ModalBinding`] writes the copied attribute value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalSink {
	/// `form.action = action_prefix + value`
	FormAction { form_id: String, action_prefix: String },
	/// `input.value = value`
	HiddenInput { input_id: String },
	/// `iframe.src = value`
	FrameSource { frame_id: String },
}
impl ModalSink {
	/// The string written for an attribute `value`.
	#[must_use]
	pub fn resolve(&self, value: &str) -> String {
		match self {
			Self::FormAction { action_prefix, .. } => format!("{}{}", action_prefix, value),
			Self::HiddenInput { .. } | Self::FrameSource { .. } => value.to_owned(),
		}
	}

	#[must_use]
	pub fn element_id(&self) -> &str {
		match self {
			Self::FormAction { form_id: id, .. } | Self::HiddenInput { input_id: id } | Self::FrameSource { frame_id: id } => id,
		}
	}
}

/// Copies `attribute` from a modal's triggering button into a [`ModalSink`] whenever the modal is about to show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModalBinding {
	modal_id: String,
	attribute: String,
	sink: ModalSink,
	show_event: String,
}
impl ModalBinding {
	/// Dispatched by Bootstrap before a modal opens, with the opening button as `relatedTarget`.
	pub const BOOTSTRAP_SHOW_EVENT: &'static str = "show.bs.modal";

	pub fn new(modal_id: impl Into<String>, attribute: impl Into<String>, sink: ModalSink) -> Self {
		Self {
			modal_id: modal_id.into(),
			attribute: attribute.into(),
			sink,
			show_event: Self::BOOTSTRAP_SHOW_EVENT.to_owned(),
		}
	}

	#[must_use]
	pub fn with_show_event(self, show_event: impl Into<String>) -> Self {
		Self {
			show_event: show_event.into(),
			..self
		}
	}

	#[must_use]
	pub fn modal_id(&self) -> &str {
		&self.modal_id
	}

	#[must_use]
	pub fn attribute(&self) -> &str {
		&self.attribute
	}

	#[must_use]
	pub fn sink(&self) -> &ModalSink {
		&self.sink
	}

	#[must_use]
	pub fn show_event(&self) -> &str {
		&self.show_event
	}

	/// Listens for the show event on the modal.
	///
	/// Returns `false` (after logging) if the modal isn't in `document` or the listener couldn't be added.
	#[instrument(skip(document, listeners))]
	pub fn bind(&self, document: &web_sys::Document, listeners: &mut Listeners) -> bool {
		let modal = match document.get_element_by_id(&self.modal_id) {
			Some(modal) => modal,
			None => {
				warn!("Modal {:?} not found.", self.modal_id);
				return false;
			}
		};

		let binding = self.clone();
		let document = document.clone();
		listeners.listen(&modal, &self.show_event, move |event| match related_target(&event) {
			Some(trigger) => binding.populate(&document, &trigger),
			None => warn!("{:?} on {:?} carries no triggering element.", binding.show_event, binding.modal_id),
		})
	}

	/// Copies the attribute from `trigger` into the sink right away.
	#[instrument(skip(document, trigger))]
	pub fn populate(&self, document: &web_sys::Document, trigger: &web_sys::Element) {
		let value = match trigger.get_attribute(&self.attribute) {
			Some(value) => value,
			None => return warn!("Triggering element {:?} has no {:?} attribute.", trigger.id(), self.attribute),
		};
		let resolved = self.sink.resolve(&value);

		let element = match document.get_element_by_id(self.sink.element_id()) {
			Some(element) => element,
			None => return warn!("Modal target {:?} not found.", self.sink.element_id()),
		};

		let written = match &self.sink {
			ModalSink::FormAction { .. } => element.dyn_ref::<web_sys::HtmlFormElement>().map(|form| form.set_action(&resolved)),
			ModalSink::HiddenInput { .. } => element.dyn_ref::<web_sys::HtmlInputElement>().map(|input| input.set_value(&resolved)),
			ModalSink::FrameSource { .. } => element.dyn_ref::<web_sys::HtmlIFrameElement>().map(|frame| frame.set_src(&resolved)),
		};
		match written {
			Some(()) => debug!("Wrote {:?} into {:?}.", resolved, self.sink.element_id()),
			None => error!("{:?} is not the element kind {:?} expects.", element.tag_name(), self.sink),
		}
	}
}

/// Binds all `bindings`, skipping (and logging) those whose modal is missing.
pub fn bind_all<'a>(document: &web_sys::Document, bindings: impl IntoIterator<Item = &'a ModalBinding>) -> Listeners {
	let mut listeners = Listeners::new();
	for binding in bindings {
		binding.bind(document, &mut listeners);
	}
	listeners
}

/// Bootstrap attaches the opening button as an extra `relatedTarget` property.
fn related_target(event: &web_sys::Event) -> Option<web_sys::Element> {
	let event: &JsValue = event.as_ref();
	let value = js_sys::Reflect::get(event, &JsValue::from_str("relatedTarget")).ok()?;
	value.dyn_into::<web_sys::Element>().ok()
}
