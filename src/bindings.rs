//! Script-facing entry points.
//!
//! Each export validates its input, binds to the current document and keeps its listeners until the page unloads.

use crate::{dom, error::RegisterError, load};
use wasm_bindgen::{prelude::wasm_bindgen, JsValue};

fn document() -> Result<web_sys::Document, RegisterError> {
	web_sys::window().and_then(|window| window.document()).ok_or(RegisterError::NoDocument)
}

fn to_js(error: RegisterError) -> JsValue {
	JsValue::from_str(&error.to_string())
}

/// Registers a JSON list of `{ trigger, targets, invert }` rules.
///
/// # Errors
///
/// Iff the rules are malformed or there is no document. Nothing is bound in that case.
#[wasm_bindgen(js_name = registerVisibilityRules)]
pub fn register_visibility_rules(json: &str) -> Result<(), JsValue> {
	let document = document().map_err(to_js)?;
	let rules = load::rule_set_from_json(json).map_err(|error| to_js(error.into()))?;
	dom::register(&document, rules).forget();
	Ok(())
}

/// Registers the rules embedded as JSON in the script element with id `script_id`.
///
/// # Errors
///
/// Iff the element is missing, its rules are malformed or there is no document.
#[wasm_bindgen(js_name = registerVisibilityRulesFromScript)]
pub fn register_visibility_rules_from_script(script_id: &str) -> Result<(), JsValue> {
	let document = document().map_err(to_js)?;
	let rules = load::rule_set_from_script(&document, script_id).map_err(to_js)?;
	dom::register(&document, rules).forget();
	Ok(())
}

/// Registers one of the [built-in rule tables](crate::forms) by name.
///
/// # Errors
///
/// Iff `name` is unknown or there is no document.
#[cfg(feature = "builtin-forms")]
#[wasm_bindgen(js_name = registerBuiltinForm)]
pub fn register_builtin_form(name: &str) -> Result<(), JsValue> {
	let declarations = crate::forms::by_name(name).ok_or_else(|| to_js(RegisterError::UnknownForm(name.to_owned())))?;
	let document = document().map_err(to_js)?;
	dom::register_declarations(&document, declarations)
		.map_err(|error| to_js(error.into()))?
		.forget();
	Ok(())
}

/// Binds the food licence batch modals.
///
/// # Errors
///
/// Iff there is no document. Missing modals are only logged.
#[cfg(feature = "builtin-forms")]
#[wasm_bindgen(js_name = registerLicenceBatchModals)]
pub fn register_licence_batch_modals(update_action_prefix: &str) -> Result<(), JsValue> {
	let document = document().map_err(to_js)?;
	let bindings = crate::forms::licence_batch_modals(update_action_prefix);
	crate::modal::bind_all(&document, &bindings).forget();
	Ok(())
}
