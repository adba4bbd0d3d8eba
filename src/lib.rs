#![doc(html_root_url = "https://docs.rs/field-visibility-dom/0.1.0")]
#![warn(clippy::pedantic)]

//! Declarative show/hide rules for HTML form fields.
//!
//! A [`RuleSet`](rule::RuleSet) maps checkbox ***trigger*** fields to the ***target*** fields
//! (and their `<label>`s) whose visibility they decide.
//! [`RuleEngine`](engine::RuleEngine) keeps the targets in sync with the triggers,
//! and [`dom::register`] binds it to a live [`web_sys::Document`].

#[cfg(doctest)]
pub mod readme {
	doc_comment::doctest!("../README.md");
}

pub mod bindings;
pub mod dom;
pub mod engine;
pub mod error;
pub mod form;
#[cfg(feature = "builtin-forms")]
pub mod forms;
pub mod listener;
pub mod load;
pub mod modal;
pub mod rule;
