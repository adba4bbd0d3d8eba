use crate::{
	error::{DeclarationError, RegisterError},
	rule::{RuleDeclaration, RuleSet},
};
use tracing::debug;

/// Parses a JSON list of [`RuleDeclaration`]s into a [`RuleSet`].
///
/// # Errors
///
/// Iff the JSON doesn't describe a valid rule list.
pub fn rule_set_from_json(json: &str) -> Result<RuleSet, DeclarationError> {
	let declarations: Vec<RuleDeclaration> = serde_json::from_str(json)?;
	debug!("Parsed {} rule declaration(s).", declarations.len());
	RuleSet::new(declarations)
}

/// Reads the text of an embedded `<script type="application/json" id="…">` element as rule declarations.
///
/// # Errors
///
/// Iff the element is missing or its content isn't a valid rule list.
pub fn rule_set_from_script(document: &web_sys::Document, script_id: &str) -> Result<RuleSet, RegisterError> {
	let script = document
		.get_element_by_id(script_id)
		.ok_or_else(|| RegisterError::MissingDeclarationScript(script_id.to_owned()))?;
	let json = script.text_content().unwrap_or_default();
	Ok(rule_set_from_json(&json)?)
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_declaration_list() {
		let rules = rule_set_from_json(
			r#"[
				{ "trigger": "id_is_archived", "targets": ["id_is_active", "id_is_done"], "invert": true },
				{ "trigger": "id_has_food_prep", "targets": ["id_food_storage_prep_method"] }
			]"#,
		)
		.unwrap();
		assert_eq!(rules.len(), 2);
		assert!(rules.rules()[0].predicate().is_inverted());
		assert!(!rules.rules()[1].predicate().is_inverted());
		assert_eq!(rules.rules()[1].targets(), &["id_food_storage_prep_method".to_owned()]);
	}

	#[test]
	fn rejects_missing_targets_key() {
		let error = rule_set_from_json(r#"[{ "trigger": "id_has_food_prep" }]"#).unwrap_err();
		assert!(matches!(error, DeclarationError::Json(_)));
		assert!(error.to_string().contains("targets"));
	}

	#[test]
	fn rejects_unknown_keys() {
		let error = rule_set_from_json(r#"[{ "trigger": "id_a", "targets": ["id_b"], "inverted": true }]"#).unwrap_err();
		assert!(matches!(error, DeclarationError::Json(_)));
	}

	#[test]
	fn validates_after_parsing() {
		let error = rule_set_from_json(r#"[{ "trigger": "id_a", "targets": [] }]"#).unwrap_err();
		assert!(matches!(error, DeclarationError::MissingTargets { index: 0, .. }));
	}
}
