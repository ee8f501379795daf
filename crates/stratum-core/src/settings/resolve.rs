//! Setting resolution as a state machine without I/O.
//!
//! The manager drives a [`Resolution`] from both its async and its blocking
//! API: the resolution asks for one scope at a time, the caller looks the
//! setting up in that scope and feeds back what it found.

use stratum_types::setting_store::SettingRecord;

use crate::prelude::*;

use super::types::{SettingDefinition, SettingScopes};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Step {
	/// Look the setting up in this scope and feed the result back
	Probe(ScopeKey),
	/// Raw stored value found in the given scope
	Found(ScopeKey, String),
	/// Nothing applicable is stored, use the definition default
	Default,
}

/// Walks User -> Company -> Application for one setting
#[derive(Debug)]
pub(crate) struct Resolution<'a> {
	def: &'a SettingDefinition,
	scopes: SettingScopes,
	company_id: Option<CompanyId>,
	user_id: Option<UserId>,
	next: Option<SettingLevel>,
	probing: Option<ScopeKey>,
}

impl<'a> Resolution<'a> {
	pub(crate) fn new(
		def: &'a SettingDefinition,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
	) -> Self {
		Self {
			def,
			scopes: def.scopes,
			company_id,
			user_id,
			next: Some(SettingLevel::User),
			probing: None,
		}
	}

	/// Starts the resolution at the given scope
	pub(crate) fn at(def: &'a SettingDefinition, scope: &ScopeKey) -> Self {
		Self::new(def, scope.company_id(), scope.user_id())
	}

	/// Restrict the levels considered to `scopes`
	pub(crate) fn within(mut self, scopes: SettingScopes) -> Self {
		self.scopes = self.scopes & scopes;
		self
	}

	pub(crate) fn start(&mut self) -> Step {
		self.advance()
	}

	/// Feed the value stored in the last probed scope, if any
	pub(crate) fn feed(&mut self, stored: Option<&str>) -> Step {
		match (stored, self.probing.take()) {
			(Some(value), Some(scope)) => Step::Found(scope, value.to_string()),
			(None, Some(_)) if !self.def.is_inherited => Step::Default,
			_ => self.advance(),
		}
	}

	fn advance(&mut self) -> Step {
		while let Some(level) = self.next {
			let probe = match level {
				SettingLevel::User => {
					self.next = Some(SettingLevel::Company);
					self.user_id.map(|user_id| {
						ScopeKey::User(UserIdentifier { company_id: self.company_id, user_id })
					})
				}
				SettingLevel::Company => {
					self.next = Some(SettingLevel::Application);
					self.company_id.map(ScopeKey::Company)
				}
				SettingLevel::Application => {
					self.next = None;
					Some(ScopeKey::Application)
				}
			};

			if let Some(scope) = probe.filter(|scope| self.scopes.allows(scope.level())) {
				self.probing = Some(scope);
				return Step::Probe(scope);
			}
		}
		Step::Default
	}
}

/// Store operation needed to persist a changed setting
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WriteAction {
	Create(SettingRecord),
	Update(SettingRecord),
	Delete(SettingRecord),
	Unchanged,
}

/// Decide how to persist `target` given the row currently stored at its scope.
///
/// A value equal to the inherited one is never stored: the existing row, if
/// any, is deleted so the scope inherits again.
pub(crate) fn plan_write(
	existing: Option<SettingRecord>,
	target: SettingRecord,
	matches_inherited: bool,
) -> WriteAction {
	match existing {
		Some(record) if matches_inherited => WriteAction::Delete(record),
		None if matches_inherited => WriteAction::Unchanged,
		None => WriteAction::Create(target),
		Some(record) if record.value == target.value => WriteAction::Unchanged,
		Some(mut record) => {
			record.value = target.value;
			WriteAction::Update(record)
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::collections::HashMap;

	fn def(scopes: SettingScopes, inherited: bool) -> SettingDefinition {
		SettingDefinition::builder("MySetting")
			.default_value("default")
			.scopes(scopes)
			.inherited(inherited)
			.build()
			.unwrap()
	}

	/// Runs a resolution against a map of stored values and records the probes
	fn run(mut res: Resolution<'_>, stored: &HashMap<ScopeKey, &str>) -> (Step, Vec<ScopeKey>) {
		let mut probes = Vec::new();
		let mut step = res.start();
		while let Step::Probe(scope) = step {
			probes.push(scope);
			step = res.feed(stored.get(&scope).copied());
		}
		(step, probes)
	}

	fn user(company: i32, user: i64) -> ScopeKey {
		ScopeKey::User(UserIdentifier::new(Some(CompanyId(company)), UserId(user)))
	}

	#[test]
	fn test_probes_most_specific_first() {
		let def = def(SettingScopes::ALL, true);
		let (step, probes) =
			run(Resolution::new(&def, Some(CompanyId(1)), Some(UserId(2))), &HashMap::new());

		assert_eq!(step, Step::Default);
		assert_eq!(
			probes,
			vec![user(1, 2), ScopeKey::Company(CompanyId(1)), ScopeKey::Application]
		);
	}

	#[test]
	fn test_stops_at_first_found() {
		let def = def(SettingScopes::ALL, true);
		let stored = HashMap::from([
			(ScopeKey::Company(CompanyId(1)), "company"),
			(ScopeKey::Application, "app"),
		]);
		let (step, probes) = run(Resolution::new(&def, Some(CompanyId(1)), Some(UserId(2))), &stored);

		assert_eq!(step, Step::Found(ScopeKey::Company(CompanyId(1)), "company".into()));
		assert_eq!(probes.len(), 2);
	}

	#[test]
	fn test_skips_levels_outside_scopes() {
		let def = def(SettingScopes::APPLICATION | SettingScopes::USER, true);
		let (_, probes) =
			run(Resolution::new(&def, Some(CompanyId(1)), Some(UserId(2))), &HashMap::new());

		assert_eq!(probes, vec![user(1, 2), ScopeKey::Application]);
	}

	#[test]
	fn test_skips_levels_without_ids() {
		let def = def(SettingScopes::ALL, true);
		let (_, probes) = run(Resolution::new(&def, None, None), &HashMap::new());
		assert_eq!(probes, vec![ScopeKey::Application]);

		let (_, probes) = run(Resolution::new(&def, None, Some(UserId(3))), &HashMap::new());
		assert_eq!(
			probes,
			vec![ScopeKey::User(UserIdentifier::host(UserId(3))), ScopeKey::Application]
		);
	}

	#[test]
	fn test_not_inherited_stops_after_first_miss() {
		let def = def(SettingScopes::APPLICATION | SettingScopes::COMPANY, false);
		let stored = HashMap::from([(ScopeKey::Application, "application value")]);

		let (step, probes) = run(Resolution::new(&def, Some(CompanyId(1)), None), &stored);
		assert_eq!(step, Step::Default);
		assert_eq!(probes, vec![ScopeKey::Company(CompanyId(1))]);

		let (step, _) = run(Resolution::new(&def, None, None), &stored);
		assert_eq!(step, Step::Found(ScopeKey::Application, "application value".into()));
	}

	#[test]
	fn test_within_restricts_levels() {
		let def = def(SettingScopes::ALL, true);
		let stored = HashMap::from([(user(1, 2), "user"), (ScopeKey::Application, "app")]);
		let res = Resolution::new(&def, Some(CompanyId(1)), Some(UserId(2)))
			.within(SettingScopes::APPLICATION | SettingScopes::COMPANY);

		let (step, _) = run(res, &stored);
		assert_eq!(step, Step::Found(ScopeKey::Application, "app".into()));
	}

	#[test]
	fn test_empty_scopes_resolve_to_default() {
		let def = def(SettingScopes::USER, true);
		let (step, probes) =
			run(Resolution::new(&def, Some(CompanyId(1)), None), &HashMap::new());
		assert_eq!(step, Step::Default);
		assert!(probes.is_empty());
	}

	fn record(value: &str) -> SettingRecord {
		SettingRecord::new(Some(CompanyId(1)), None, "MySetting", value)
	}

	#[test]
	fn test_plan_write() {
		assert_eq!(plan_write(None, record("a"), false), WriteAction::Create(record("a")));
		assert_eq!(plan_write(None, record("a"), true), WriteAction::Unchanged);
		assert_eq!(plan_write(Some(record("a")), record("a"), false), WriteAction::Unchanged);
		assert_eq!(plan_write(Some(record("a")), record("b"), false), WriteAction::Update(record("b")));
		assert_eq!(plan_write(Some(record("a")), record("b"), true), WriteAction::Delete(record("a")));
	}
}

// vim: ts=4
