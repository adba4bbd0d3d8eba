//! Errors surfaced to the page integrator.
//!
//! Everything here is raised before any DOM binding happens.
//! Problems found *while* bound (missing elements, failed DOM calls) are logged instead.

use thiserror::Error;

/// A rule declaration was rejected.
#[derive(Debug, Error)]
pub enum DeclarationError {
	/// The rule has no trigger id.
	#[error("rule #{index}: missing trigger id")]
	MissingTrigger {
		/// Position of the rule in its declaration list.
		index: usize,
	},
	/// The rule has no targets.
	#[error("rule #{index} ({trigger:?}): no targets declared")]
	MissingTargets {
		/// Position of the rule in its declaration list.
		index: usize,
		/// The rule's trigger id.
		trigger: String,
	},
	/// One of the rule's target ids is empty.
	#[error("rule #{index} ({trigger:?}): target #{position} has an empty id")]
	EmptyTarget {
		/// Position of the rule in its declaration list.
		index: usize,
		/// The rule's trigger id.
		trigger: String,
		/// Position of the offending target.
		position: usize,
	},
	/// The rule's trigger is also one of its targets.
	#[error("rule #{index} ({trigger:?}): trigger is listed as its own target")]
	SelfTarget {
		/// Position of the rule in its declaration list.
		index: usize,
		/// The rule's trigger id.
		trigger: String,
	},
	/// The same target appears twice in one rule.
	#[error("rule #{index} ({trigger:?}): target {target:?} is listed more than once")]
	DuplicateTarget {
		/// Position of the rule in its declaration list.
		index: usize,
		/// The rule's trigger id.
		trigger: String,
		/// The repeated target id.
		target: String,
	},
	/// Chained rules loop back onto themselves.
	#[error("rules form a dependency cycle through {field:?}")]
	Cycle {
		/// A trigger on the cycle.
		field: String,
	},
	/// The declaration text isn't a valid rule list.
	#[error("malformed rule declaration: {0}")]
	Json(#[from] serde_json::Error),
}

/// A page-level registration could not be started.
#[derive(Debug, Error)]
pub enum RegisterError {
	#[error(transparent)]
	Declaration(#[from] DeclarationError),
	#[error("no document available to bind to")]
	NoDocument,
	#[error("declaration script element {0:?} not found")]
	MissingDeclarationScript(String),
	#[error("unknown built-in form {0:?}")]
	UnknownForm(String),
}
