//! The boundary between [`RuleEngine`](crate::engine::RuleEngine) and the document it drives.

use crate::rule::Visibility;

/// Explicit element lookup plus the two DOM operations rules need.
///
/// Lookups return [`None`] rather than an empty selection, so that callers can report missing fields.
/// Implementations must not touch field values.
pub trait Form {
	type Element;

	/// Finds the control (or container) with id `id`.
	fn find(&self, id: &str) -> Option<Self::Element>;

	/// All labels whose `for` attribute names `id`. Often empty for containers.
	fn labels_for(&self, id: &str) -> Vec<Self::Element>;

	/// The checked state of a checkable input, or [`None`] if `element` isn't one.
	fn is_checked(&self, element: &Self::Element) -> Option<bool>;

	/// Sets (never toggles) whether `element` is displayed.
	fn set_visibility(&self, element: &Self::Element, visibility: Visibility);
}

#[cfg(test)]
pub(crate) mod memory {
	use super::Form;
	use crate::rule::Visibility;
	use hashbrown::HashMap;
	use std::cell::RefCell;

	#[derive(Clone, Debug, PartialEq, Eq, Hash)]
	pub enum Node {
		Control(String),
		Label(String),
	}

	#[derive(Debug)]
	struct Field {
		checked: Option<bool>,
		labelled: bool,
		value: String,
	}

	/// An in-memory stand-in for a rendered form.
	#[derive(Debug, Default)]
	pub struct MemoryForm {
		fields: RefCell<HashMap<String, Field>>,
		visibility: RefCell<HashMap<Node, Visibility>>,
		writes: RefCell<usize>,
	}
	impl MemoryForm {
		pub fn new() -> Self {
			Self::default()
		}

		pub fn checkbox(self, id: &str, checked: bool) -> Self {
			self.insert(id, Some(checked), true)
		}

		pub fn input(self, id: &str) -> Self {
			self.insert(id, None, true)
		}

		pub fn container(self, id: &str) -> Self {
			self.insert(id, None, false)
		}

		fn insert(self, id: &str, checked: Option<bool>, labelled: bool) -> Self {
			self.fields.borrow_mut().insert(
				id.to_owned(),
				Field {
					checked,
					labelled,
					value: String::new(),
				},
			);
			self
		}

		pub fn set_checked(&self, id: &str, checked: bool) {
			self.fields.borrow_mut().get_mut(id).expect("no such checkbox").checked = Some(checked);
		}

		pub fn type_value(&self, id: &str, value: &str) {
			self.fields.borrow_mut().get_mut(id).expect("no such input").value = value.to_owned();
		}

		pub fn value(&self, id: &str) -> String {
			self.fields.borrow()[id].value.clone()
		}

		/// [`None`] until the engine first writes to the control.
		pub fn visibility(&self, id: &str) -> Option<Visibility> {
			self.visibility.borrow().get(&Node::Control(id.to_owned())).copied()
		}

		pub fn label_visibility(&self, id: &str) -> Option<Visibility> {
			self.visibility.borrow().get(&Node::Label(id.to_owned())).copied()
		}

		pub fn shown(&self, id: &str) -> bool {
			self.visibility(id) == Some(Visibility::Shown)
		}

		pub fn hidden(&self, id: &str) -> bool {
			self.visibility(id) == Some(Visibility::Hidden)
		}

		pub fn writes(&self) -> usize {
			*self.writes.borrow()
		}
	}
	impl Form for MemoryForm {
		type Element = Node;

		fn find(&self, id: &str) -> Option<Node> {
			self.fields.borrow().get(id).map(|_| Node::Control(id.to_owned()))
		}

		fn labels_for(&self, id: &str) -> Vec<Node> {
			match self.fields.borrow().get(id) {
				Some(field) if field.labelled => vec![Node::Label(id.to_owned())],
				_ => Vec::new(),
			}
		}

		fn is_checked(&self, element: &Node) -> Option<bool> {
			match element {
				Node::Control(id) => self.fields.borrow().get(id).and_then(|field| field.checked),
				Node::Label(_) => None,
			}
		}

		fn set_visibility(&self, element: &Node, visibility: Visibility) {
			*self.writes.borrow_mut() += 1;
			self.visibility.borrow_mut().insert(element.clone(), visibility);
		}
	}
}
