//! Rule declarations and their validated, dependency-ordered form.

use crate::error::DeclarationError;
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Presentation state of a target field and its labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Visibility {
	Shown,
	Hidden,
}
impl Visibility {
	#[must_use]
	pub fn is_shown(self) -> bool {
		self == Self::Shown
	}

	/// [`Shown`](`Visibility::Shown`) only if both `self` and `other` are.
	#[must_use]
	pub fn and(self, other: Self) -> Self {
		if self.is_shown() && other.is_shown() {
			Self::Shown
		} else {
			Self::Hidden
		}
	}
}

/// Maps a trigger's checked state to the visibility of its targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Predicate {
	/// Targets are shown while the trigger is checked.
	WhenChecked,
	/// Targets are shown while the trigger is unchecked.
	WhenUnchecked,
}
impl Predicate {
	#[must_use]
	pub fn from_invert(invert: bool) -> Self {
		if invert {
			Self::WhenUnchecked
		} else {
			Self::WhenChecked
		}
	}

	#[must_use]
	pub fn is_inverted(self) -> bool {
		self == Self::WhenUnchecked
	}

	#[must_use]
	pub fn outcome(self, checked: bool) -> Visibility {
		match (self, checked) {
			(Self::WhenChecked, true) | (Self::WhenUnchecked, false) => Visibility::Shown,
			(Self::WhenChecked, false) | (Self::WhenUnchecked, true) => Visibility::Hidden,
		}
	}
}

/// One record of the declaration format, as authored by page integrators:
///
/// ```json
/// { "trigger": "id_has_food_prep", "targets": ["id_food_storage_prep_method"], "invert": false }
/// ```
///
/// Target labels are found through their `for` attribute, so each id names both a control and its `<label>`s.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleDeclaration {
	pub trigger: String,
	pub targets: Vec<String>,
	#[serde(default)]
	pub invert: bool,
}
impl RuleDeclaration {
	pub fn new<T: Into<String>>(trigger: impl Into<String>, targets: impl IntoIterator<Item = T>) -> Self {
		Self {
			trigger: trigger.into(),
			targets: targets.into_iter().map(Into::into).collect(),
			invert: false,
		}
	}

	/// Shows the targets while the trigger is *unchecked* instead.
	#[must_use]
	pub fn inverted(self) -> Self {
		Self { invert: true, ..self }
	}
}

/// A validated [`RuleDeclaration`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VisibilityRule {
	trigger: String,
	targets: Vec<String>,
	predicate: Predicate,
}
impl VisibilityRule {
	fn from_declaration(index: usize, declaration: RuleDeclaration) -> Result<Self, DeclarationError> {
		let RuleDeclaration { trigger, targets, invert } = declaration;
		if trigger.trim().is_empty() {
			return Err(DeclarationError::MissingTrigger { index });
		}
		if targets.is_empty() {
			return Err(DeclarationError::MissingTargets { index, trigger });
		}

		{
			let mut seen = HashSet::with_capacity(targets.len());
			for (position, target) in targets.iter().enumerate() {
				if target.trim().is_empty() {
					return Err(DeclarationError::EmptyTarget { index, trigger, position });
				}
				if *target == trigger {
					return Err(DeclarationError::SelfTarget { index, trigger });
				}
				if !seen.insert(target.as_str()) {
					let target = target.clone();
					return Err(DeclarationError::DuplicateTarget { index, trigger, target });
				}
			}
		}

		Ok(Self {
			trigger,
			targets,
			predicate: Predicate::from_invert(invert),
		})
	}

	#[must_use]
	pub fn trigger(&self) -> &str {
		&self.trigger
	}

	#[must_use]
	pub fn targets(&self) -> &[String] {
		&self.targets
	}

	#[must_use]
	pub fn predicate(&self) -> Predicate {
		self.predicate
	}
}

/// The rules of one form, validated and ordered so that chained rules settle before their dependents.
///
/// A [`RuleSet`] is immutable once constructed.
#[derive(Clone, Debug)]
pub struct RuleSet {
	rules: Vec<VisibilityRule>,
	order: Vec<usize>,
	triggers: Vec<String>,
	dispatch: HashMap<String, Vec<usize>>,
	governors: HashMap<String, Vec<usize>>,
}
impl RuleSet {
	/// Validates `declarations` as a whole.
	///
	/// # Errors
	///
	/// Iff any declaration is malformed or the rules are chained in a cycle.
	/// Nothing is partially accepted.
	pub fn new(declarations: impl IntoIterator<Item = RuleDeclaration>) -> Result<Self, DeclarationError> {
		let rules = declarations
			.into_iter()
			.enumerate()
			.map(|(index, declaration)| VisibilityRule::from_declaration(index, declaration))
			.collect::<Result<Vec<_>, _>>()?;

		// For each rule, the rules whose trigger it governs.
		let downstream: Vec<Vec<usize>> = rules
			.iter()
			.map(|rule| {
				rules
					.iter()
					.enumerate()
					.filter(|(_, other)| rule.targets.contains(&other.trigger))
					.map(|(j, _)| j)
					.collect()
			})
			.collect();

		let order = topological_order(&rules, &downstream)?;
		let mut rank = vec![0; rules.len()];
		for (position, &i) in order.iter().enumerate() {
			rank[i] = position;
		}

		let mut triggers: Vec<String> = Vec::new();
		for rule in &rules {
			if !triggers.contains(&rule.trigger) {
				triggers.push(rule.trigger.clone());
			}
		}

		let mut dispatch = HashMap::with_capacity(triggers.len());
		for trigger in &triggers {
			let mut reached = HashSet::new();
			let mut pending: Vec<usize> = rules
				.iter()
				.enumerate()
				.filter(|(_, rule)| &rule.trigger == trigger)
				.map(|(i, _)| i)
				.collect();
			while let Some(i) = pending.pop() {
				if reached.insert(i) {
					pending.extend(downstream[i].iter().copied());
				}
			}
			let mut affected: Vec<usize> = reached.into_iter().collect();
			affected.sort_by_key(|&i| rank[i]);
			dispatch.insert(trigger.clone(), affected);
		}

		let mut governors: HashMap<String, Vec<usize>> = HashMap::new();
		for (i, rule) in rules.iter().enumerate() {
			for target in &rule.targets {
				governors.entry(target.clone()).or_default().push(i);
			}
		}

		Ok(Self {
			rules,
			order,
			triggers,
			dispatch,
			governors,
		})
	}

	#[must_use]
	pub fn len(&self) -> usize {
		self.rules.len()
	}

	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.rules.is_empty()
	}

	/// The rules in declaration order.
	#[must_use]
	pub fn rules(&self) -> &[VisibilityRule] {
		&self.rules
	}

	#[must_use]
	pub fn get(&self, index: usize) -> Option<&VisibilityRule> {
		self.rules.get(index)
	}

	/// Rule indices, governing rules first and otherwise in declaration order.
	#[must_use]
	pub fn evaluation_order(&self) -> &[usize] {
		&self.order
	}

	/// Distinct trigger ids in order of first appearance.
	#[must_use]
	pub fn triggers(&self) -> &[String] {
		&self.triggers
	}

	/// The rules to re-evaluate (in order) after `trigger` changed, including transitively chained ones.
	#[must_use]
	pub fn dispatch(&self, trigger: &str) -> &[usize] {
		self.dispatch.get(trigger).map_or(&[][..], Vec::as_slice)
	}

	/// Indices of all rules that list `target`.
	#[must_use]
	pub fn governors(&self, target: &str) -> &[usize] {
		self.governors.get(target).map_or(&[][..], Vec::as_slice)
	}
}

/// Kahn's algorithm, always picking the lowest ready declaration index.
fn topological_order(rules: &[VisibilityRule], downstream: &[Vec<usize>]) -> Result<Vec<usize>, DeclarationError> {
	let mut in_degree = vec![0_usize; rules.len()];
	for edges in downstream {
		for &j in edges {
			in_degree[j] += 1;
		}
	}

	let mut ready: BTreeSet<usize> = (0..rules.len()).filter(|&i| in_degree[i] == 0).collect();
	let mut order = Vec::with_capacity(rules.len());
	while let Some(i) = ready.iter().next().copied() {
		ready.remove(&i);
		order.push(i);
		for &j in &downstream[i] {
			in_degree[j] -= 1;
			if in_degree[j] == 0 {
				ready.insert(j);
			}
		}
	}

	match (0..rules.len()).find(|&i| in_degree[i] > 0) {
		Some(stuck) => Err(DeclarationError::Cycle {
			field: rules[stuck].trigger.clone(),
		}),
		None => Ok(order),
	}
}
