use crate::{
	form::Form,
	rule::{RuleSet, Visibility, VisibilityRule},
};
use core::cell::RefCell;
use hashbrown::HashMap;
use tracing::{error, instrument, trace, trace_span, warn};

/// Keeps the targets of a [`RuleSet`] in sync with their triggers on one [`Form`].
///
/// A target is shown only while every rule governing it says so.
/// A rule whose trigger the engine itself has hidden hides its targets too,
/// so a field is never shown below a hidden ancestor.
///
/// Field values are never read or written: hiding a field retains what was entered.
#[derive(Debug)]
pub struct RuleEngine<F: Form> {
	form: F,
	rules: RuleSet,
	applied: RefCell<HashMap<String, Visibility>>,
}
impl<F: Form> RuleEngine<F> {
	#[must_use]
	pub fn new(form: F, rules: RuleSet) -> Self {
		Self {
			form,
			rules,
			applied: RefCell::new(HashMap::new()),
		}
	}

	#[must_use]
	pub fn form(&self) -> &F {
		&self.form
	}

	#[must_use]
	pub fn rules(&self) -> &RuleSet {
		&self.rules
	}

	/// The visibility last applied to `id` as a target, if any.
	#[must_use]
	pub fn visibility_of(&self, id: &str) -> Option<Visibility> {
		self.applied.borrow().get(id).copied()
	}

	/// Evaluates every rule once, governing rules first.
	///
	/// Run this before any user interaction so that pre-filled forms match their bound values.
	#[instrument(skip(self), fields(rules = self.rules.len()))]
	pub fn evaluate_all(&self) {
		for &index in self.rules.evaluation_order() {
			self.evaluate(index);
		}
	}

	/// Re-evaluates the rules triggered by `trigger` and everything chained below them.
	#[instrument(skip(self))]
	pub fn handle_change(&self, trigger: &str) {
		let dispatch = self.rules.dispatch(trigger);
		if dispatch.is_empty() {
			return warn!("Change on {:?}, which triggers no rule.", trigger);
		}
		for &index in dispatch {
			self.evaluate(index);
		}
	}

	/// Applies rule `index` to its targets and their labels.
	///
	/// Returns the rule's own outcome, or [`None`] if it had to be skipped.
	/// Idempotent for an unchanged form.
	pub fn evaluate(&self, index: usize) -> Option<Visibility> {
		let rule = match self.rules.get(index) {
			Some(rule) => rule,
			None => {
				error!("No rule #{} in a set of {}.", index, self.rules.len());
				return None;
			}
		};

		let span = trace_span!("evaluate", index, trigger = rule.trigger());
		let _enter = span.enter();

		let outcome = match self.outcome(rule) {
			Some(outcome) => outcome,
			None => {
				warn!("Trigger {:?} is missing or not a checkbox; skipping its rule.", rule.trigger());
				return None;
			}
		};
		trace!(?outcome);

		for target in rule.targets() {
			let combined = self
				.rules
				.governors(target)
				.iter()
				.filter(|&&other| other != index)
				.filter_map(|&other| self.rules.get(other).and_then(|other| self.outcome(other)))
				.fold(outcome, Visibility::and);
			self.apply(target, combined);
		}
		Some(outcome)
	}

	fn outcome(&self, rule: &VisibilityRule) -> Option<Visibility> {
		let trigger = self.form.find(rule.trigger())?;
		let checked = self.form.is_checked(&trigger)?;
		if self.visibility_of(rule.trigger()) == Some(Visibility::Hidden) {
			return Some(Visibility::Hidden);
		}
		Some(rule.predicate().outcome(checked))
	}

	fn apply(&self, target: &str, visibility: Visibility) {
		match self.form.find(target) {
			Some(control) => self.form.set_visibility(&control, visibility),
			None => warn!("Target {:?} not found; skipping it.", target),
		}

		let labels = self.form.labels_for(target);
		if labels.is_empty() {
			trace!("No label for {:?}.", target);
		}
		for label in &labels {
			self.form.set_visibility(label, visibility);
		}

		self.applied.borrow_mut().insert(target.to_owned(), visibility);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{form::memory::MemoryForm, rule::RuleDeclaration};

	fn engine(form: MemoryForm, declarations: Vec<RuleDeclaration>) -> RuleEngine<MemoryForm> {
		RuleEngine::new(form, RuleSet::new(declarations).unwrap())
	}

	fn food_certificate_form(checked: bool) -> MemoryForm {
		MemoryForm::new()
			.checkbox("id_has_food_certificate", checked)
			.input("id_certificate_expiry_date")
			.input("id_food_registration_certificate")
	}

	fn food_certificate_rules() -> Vec<RuleDeclaration> {
		vec![RuleDeclaration::new(
			"id_has_food_certificate",
			vec!["id_certificate_expiry_date", "id_food_registration_certificate"],
		)]
	}

	fn message_filter(archived: bool, active: bool) -> RuleEngine<MemoryForm> {
		let engine = engine(
			MemoryForm::new()
				.checkbox("id_is_archived", archived)
				.checkbox("id_is_active", active)
				.checkbox("id_is_done", false),
			vec![
				RuleDeclaration::new("id_is_archived", vec!["id_is_active", "id_is_done"]).inverted(),
				RuleDeclaration::new("id_is_active", vec!["id_is_done"]).inverted(),
			],
		);
		engine.evaluate_all();
		engine
	}

	#[test]
	fn food_certificate_hidden_until_checked() {
		let engine = engine(food_certificate_form(false), food_certificate_rules());
		let form = engine.form();
		engine.evaluate_all();
		assert!(form.hidden("id_certificate_expiry_date"));
		assert!(form.hidden("id_food_registration_certificate"));
		assert_eq!(form.label_visibility("id_certificate_expiry_date"), Some(Visibility::Hidden));

		form.set_checked("id_has_food_certificate", true);
		engine.handle_change("id_has_food_certificate");
		assert!(form.shown("id_certificate_expiry_date"));
		assert!(form.shown("id_food_registration_certificate"));
		assert_eq!(form.label_visibility("id_food_registration_certificate"), Some(Visibility::Shown));

		form.type_value("id_certificate_expiry_date", "2026-12-31");
		form.set_checked("id_has_food_certificate", false);
		engine.handle_change("id_has_food_certificate");
		assert!(form.hidden("id_certificate_expiry_date"));
		assert!(form.hidden("id_food_registration_certificate"));
		assert_eq!(form.value("id_certificate_expiry_date"), "2026-12-31");
	}

	#[test]
	fn prefilled_trigger_shows_targets_at_load() {
		let engine = engine(food_certificate_form(true), food_certificate_rules());
		engine.evaluate_all();
		assert!(engine.form().shown("id_certificate_expiry_date"));
		assert!(engine.form().shown("id_food_registration_certificate"));
	}

	#[test]
	fn initial_evaluation_writes_each_target_once() {
		let engine = engine(food_certificate_form(false), food_certificate_rules());
		assert_eq!(engine.form().writes(), 0);
		engine.evaluate_all();
		// Two controls plus their two labels.
		assert_eq!(engine.form().writes(), 4);
	}

	#[test]
	fn evaluate_is_idempotent() {
		let engine = engine(food_certificate_form(true), food_certificate_rules());
		assert_eq!(engine.evaluate(0), Some(Visibility::Shown));
		let once = engine.form().visibility("id_certificate_expiry_date");
		assert_eq!(engine.evaluate(0), Some(Visibility::Shown));
		assert_eq!(engine.form().visibility("id_certificate_expiry_date"), once);
		assert_eq!(engine.visibility_of("id_certificate_expiry_date"), Some(Visibility::Shown));
	}

	#[test]
	fn inverted_rule_hides_while_checked() {
		let engine = engine(
			MemoryForm::new().checkbox("id_is_archived", true).checkbox("id_is_active", false),
			vec![RuleDeclaration::new("id_is_archived", vec!["id_is_active"]).inverted()],
		);
		engine.evaluate_all();
		assert!(engine.form().hidden("id_is_active"));

		engine.form().set_checked("id_is_archived", false);
		engine.handle_change("id_is_archived");
		assert!(engine.form().shown("id_is_active"));
	}

	#[test]
	fn archived_hides_whole_chain() {
		for &active in &[false, true] {
			let engine = message_filter(true, active);
			assert!(engine.form().hidden("id_is_active"));
			assert!(engine.form().hidden("id_is_done"));
		}
	}

	#[test]
	fn unarchived_and_inactive_shows_done() {
		let engine = message_filter(false, false);
		assert!(engine.form().shown("id_is_active"));
		assert!(engine.form().shown("id_is_done"));
	}

	#[test]
	fn unarchived_and_active_hides_done() {
		let engine = message_filter(false, true);
		assert!(engine.form().shown("id_is_active"));
		assert!(engine.form().hidden("id_is_done"));
	}

	#[test]
	fn chain_cascades_on_change() {
		let engine = message_filter(false, false);
		let form = engine.form();

		form.set_checked("id_is_archived", true);
		engine.handle_change("id_is_archived");
		assert!(form.hidden("id_is_active"));
		assert!(form.hidden("id_is_done"));

		// Hidden fields can still change state; the chain stays hidden.
		form.set_checked("id_is_active", true);
		engine.handle_change("id_is_active");
		assert!(form.hidden("id_is_done"));

		form.set_checked("id_is_archived", false);
		engine.handle_change("id_is_archived");
		assert!(form.shown("id_is_active"));
		assert!(form.hidden("id_is_done"));

		form.set_checked("id_is_active", false);
		engine.handle_change("id_is_active");
		assert!(form.shown("id_is_done"));
	}

	#[test]
	fn missing_target_leaves_other_rules_working() {
		let engine = engine(
			MemoryForm::new()
				.checkbox("id_trestle_required", true)
				.input("id_trestle_quantity")
				.checkbox("id_vehicle_on_site", true)
				.input("id_vehicle_length"),
			vec![
				RuleDeclaration::new("id_trestle_required", vec!["id_trestle_quantiy", "id_trestle_quantity"]),
				RuleDeclaration::new("id_vehicle_on_site", vec!["id_vehicle_length"]),
			],
		);
		engine.evaluate_all();
		assert!(engine.form().shown("id_trestle_quantity"));
		assert!(engine.form().shown("id_vehicle_length"));
		assert_eq!(engine.form().visibility("id_trestle_quantiy"), None);
	}

	#[test]
	fn missing_trigger_skips_only_its_rule() {
		let engine = engine(
			MemoryForm::new().input("id_event_power_first").checkbox("id_multi_site", false).container("required_sites"),
			vec![
				RuleDeclaration::new("id_power_required", vec!["id_event_power_first"]),
				RuleDeclaration::new("id_multi_site", vec!["required_sites"]),
			],
		);
		engine.evaluate_all();
		assert_eq!(engine.evaluate(0), None);
		assert_eq!(engine.form().visibility("id_event_power_first"), None);
		assert!(engine.form().hidden("required_sites"));
		assert_eq!(engine.form().label_visibility("required_sites"), None);
	}

	#[test]
	fn change_on_unknown_trigger_is_ignored() {
		let engine = engine(food_certificate_form(false), food_certificate_rules());
		engine.handle_change("id_not_a_trigger");
		assert_eq!(engine.form().writes(), 0);
		assert_eq!(engine.evaluate(7), None);
	}
}
