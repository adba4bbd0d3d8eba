//! [`Form`] over a live [`web_sys::Document`], and page registration.

use crate::{
	engine::RuleEngine,
	error::DeclarationError,
	form::Form,
	listener::Listeners,
	rule::{RuleDeclaration, RuleSet, Visibility},
};
use std::rc::Rc;
use tracing::{error, info, instrument, warn};
use wasm_bindgen::JsCast;

/// Looks fields up by id in a [`web_sys::Document`] and shows or hides them through their inline `display` style.
///
/// Hiding sets `display: none`. Showing removes the inline property again, so the stylesheet's value applies.
#[derive(Debug, Clone)]
pub struct DomForm {
	document: web_sys::Document,
}
impl DomForm {
	#[must_use]
	pub fn new(document: web_sys::Document) -> Self {
		Self { document }
	}

	#[must_use]
	pub fn document(&self) -> &web_sys::Document {
		&self.document
	}
}
impl Form for DomForm {
	type Element = web_sys::Element;

	fn find(&self, id: &str) -> Option<web_sys::Element> {
		self.document.get_element_by_id(id)
	}

	fn labels_for(&self, id: &str) -> Vec<web_sys::Element> {
		// Compared as properties to avoid escaping `id` into a selector.
		let labels = match self.document.query_selector_all("label[for]") {
			Ok(labels) => labels,
			Err(error) => {
				error!("Failed to query labels: {:?}", error);
				return Vec::new();
			}
		};
		(0..labels.length())
			.filter_map(|i| labels.get(i))
			.filter_map(|node| node.dyn_into::<web_sys::HtmlLabelElement>().ok())
			.filter(|label| label.html_for() == id)
			.map(Into::into)
			.collect()
	}

	fn is_checked(&self, element: &web_sys::Element) -> Option<bool> {
		element.dyn_ref::<web_sys::HtmlInputElement>().map(web_sys::HtmlInputElement::checked)
	}

	fn set_visibility(&self, element: &web_sys::Element, visibility: Visibility) {
		let style = match element.dyn_ref::<web_sys::HtmlElement>() {
			Some(html_element) => html_element.style(),
			None => return warn!("Can't set the visibility of non-HTML element {:?}.", element.tag_name()),
		};
		let result = match visibility {
			Visibility::Shown => style.remove_property("display").map(drop),
			Visibility::Hidden => style.set_property("display", "none"),
		};
		if let Err(error) = result {
			error!("Failed to set {:?} to {:?}: {:?}", element.id(), visibility, error);
		}
	}
}

/// A [`RuleSet`] bound to a document.
///
/// Dropping this removes the `change` listeners again. Use [`Registration::forget`] to keep them for the page's lifetime.
#[derive(Debug)]
pub struct Registration {
	engine: Rc<RuleEngine<DomForm>>,
	listeners: Listeners,
}
impl Registration {
	#[must_use]
	pub fn engine(&self) -> &RuleEngine<DomForm> {
		&self.engine
	}

	#[must_use]
	pub fn listener_count(&self) -> usize {
		self.listeners.len()
	}

	/// Leaks the listeners, keeping the rules active until the page unloads.
	pub fn forget(self) {
		let Self { engine, listeners } = self;
		drop(engine);
		listeners.forget();
	}
}

/// Binds one `change` listener per trigger in `rules` and evaluates every rule once.
///
/// Triggers missing from `document` are logged and skipped. Their rules stay inert.
#[must_use]
#[instrument(skip(document, rules), fields(rules = rules.len()))]
pub fn register(document: &web_sys::Document, rules: RuleSet) -> Registration {
	let engine = Rc::new(RuleEngine::new(DomForm::new(document.clone()), rules));
	let mut listeners = Listeners::new();

	for trigger in engine.rules().triggers() {
		let element = match engine.form().find(trigger) {
			Some(element) => element,
			None => {
				warn!("Trigger {:?} not found; its rules won't react to changes.", trigger);
				continue;
			}
		};
		let handler_engine = Rc::clone(&engine);
		let handler_trigger = trigger.clone();
		listeners.listen(&element, "change", move |_event| handler_engine.handle_change(&handler_trigger));
	}

	engine.evaluate_all();
	info!("Bound {} trigger(s).", listeners.len());
	Registration { engine, listeners }
}

/// Validates `declarations`, then [`register`]s them.
///
/// # Errors
///
/// Iff the declarations are malformed, in which case nothing is bound.
pub fn register_declarations(document: &web_sys::Document, declarations: impl IntoIterator<Item = RuleDeclaration>) -> Result<Registration, DeclarationError> {
	Ok(register(document, RuleSet::new(declarations)?))
}
