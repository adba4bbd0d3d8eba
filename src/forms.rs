//! Rule tables and modal bindings of the registration system's own pages.
//!
//! Ids are the server-rendered `id_<field>` ids, except for `required_sites`, which is an unlabelled container.

use crate::{
	modal::{ModalBinding, ModalSink},
	rule::RuleDeclaration,
};

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["food-certificate", "food-registration", "stall-registration", "message-filter"];

#[must_use]
pub fn by_name(name: &str) -> Option<Vec<RuleDeclaration>> {
	match name {
		"food-certificate" => Some(food_certificate()),
		"food-registration" => Some(food_registration()),
		"stall-registration" => Some(stall_registration()),
		"message-filter" => Some(message_filter()),
		_ => None,
	}
}

/// Food vendor details: certificate, consumption and on-site preparation.
#[must_use]
pub fn food_certificate() -> Vec<RuleDeclaration> {
	vec![
		RuleDeclaration::new("id_has_food_certificate", vec!["id_certificate_expiry_date", "id_food_registration_certificate"]),
		RuleDeclaration::new("id_food_fair_consumed", vec!["id_food_source"]),
		RuleDeclaration::new("id_has_food_prep", vec!["id_food_storage_prep_method"]),
	]
}

#[must_use]
pub fn food_registration() -> Vec<RuleDeclaration> {
	vec![RuleDeclaration::new("id_has_food_prep", vec!["id_food_storage_prep_method"])]
}

/// Trestles, vehicle, multiple sites and power.
#[must_use]
pub fn stall_registration() -> Vec<RuleDeclaration> {
	vec![
		RuleDeclaration::new("id_trestle_required", vec!["id_trestle_quantity"]),
		RuleDeclaration::new("id_vehicle_on_site", vec!["id_vehicle_length", "id_vehicle_width", "id_vehicle_image"]),
		RuleDeclaration::new("id_multi_site", vec!["required_sites"]),
		RuleDeclaration::new("id_power_required", vec!["id_event_power_first", "id_event_power_second"]),
	]
}

/// Message list filters: archived messages are neither active nor done, and active ones aren't done.
#[must_use]
pub fn message_filter() -> Vec<RuleDeclaration> {
	vec![
		RuleDeclaration::new("id_is_archived", vec!["id_is_active", "id_is_done"]).inverted(),
		RuleDeclaration::new("id_is_active", vec!["id_is_done"]).inverted(),
	]
}

/// The food licence batch list's update and PDF preview modals.
///
/// `update_action_prefix` is the batch update URL without the trailing batch id.
#[must_use]
pub fn licence_batch_modals(update_action_prefix: &str) -> [ModalBinding; 2] {
	[
		ModalBinding::new(
			"foodlicencebatchModal",
			"data-batch-id",
			ModalSink::FormAction {
				form_id: "updateForm".to_owned(),
				action_prefix: update_action_prefix.to_owned(),
			},
		),
		ModalBinding::new(
			"batchpdfModal",
			"data-batch-pdf",
			ModalSink::FrameSource {
				frame_id: "batchPdfIframe".to_owned(),
			},
		),
	]
}
