//! Blocking twins of the setting manager API
//!
//! Each `_sync` method behaves exactly like its async counterpart; both drive
//! the same [`Resolution`] and [`plan_write`] logic and only differ in how the
//! store is called.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use stratum_types::setting_store::SettingRecord;

use crate::prelude::*;
use crate::settings::cache::ScopeSettings;
use crate::settings::resolve::{Resolution, Step, WriteAction, plan_write};
use crate::settings::types::{SettingDefinition, SettingScopes, SettingValue};

use super::{SettingManager, parse_value};

impl SettingManager {
	fn storage_scope_sync(&self, scope: ScopeKey) -> StResult<ScopeKey> {
		match scope {
			ScopeKey::Application if !self.multi_tenancy_enabled => {
				Ok(ScopeKey::Company(self.company_store()?.default_company_id_sync()?))
			}
			ScopeKey::User(UserIdentifier { company_id: None, user_id })
				if !self.multi_tenancy_enabled =>
			{
				let company_id = self.company_store()?.default_company_id_sync()?;
				Ok(ScopeKey::User(UserIdentifier::new(Some(company_id), user_id)))
			}
			scope => Ok(scope),
		}
	}

	fn session_sync(&self, ctx: &SessionContext) -> StResult<SessionContext> {
		if self.multi_tenancy_enabled || ctx.company_id.is_some() {
			return Ok(*ctx);
		}
		let default = self.company_store()?.default_company_id_sync()?;
		Ok(Self::with_default_company(ctx, Some(default)))
	}

	fn scope_settings_sync(&self, scope: ScopeKey) -> StResult<Arc<ScopeSettings>> {
		let storage = self.storage_scope_sync(scope)?;
		if let Some(settings) = self.cached(&storage) {
			return Ok(settings);
		}
		let records = self.store.list_settings_sync(storage.company_id(), storage.user_id())?;
		Ok(self.cache_scope(storage, records))
	}

	fn resolve_sync(&self, def: &SettingDefinition, mut res: Resolution<'_>) -> StResult<String> {
		let mut step = res.start();
		while let Step::Probe(scope) = step {
			let settings = self.scope_settings_sync(scope)?;
			step = res.feed(settings.get(&def.name));
		}
		self.reveal(def, step)
	}

	fn resolve_named_sync(
		&self,
		name: &str,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
	) -> StResult<String> {
		let def = self.registry.get(name)?;
		self.resolve_sync(def, Resolution::new(def, company_id, user_id))
	}

	fn inherited_value_sync(
		&self,
		def: &SettingDefinition,
		scope: &ScopeKey,
		storage: &ScopeKey,
	) -> StResult<String> {
		let mut res = Resolution::at(def, scope);
		let mut step = res.start();
		while let Step::Probe(probe) = step {
			if self.storage_scope_sync(probe)? == *storage {
				step = res.feed(None);
			} else {
				let settings = self.scope_settings_sync(probe)?;
				step = res.feed(settings.get(&def.name));
			}
		}
		self.reveal(def, step)
	}

	fn change_setting_sync(&self, scope: ScopeKey, name: &str, value: &str) -> StResult<()> {
		let def = self.registry.get(name)?;
		Self::check_scope(def, &scope)?;

		let storage = self.storage_scope_sync(scope)?;
		let inherited = self.inherited_value_sync(def, &scope, &storage)?;
		let existing = self.store.read_setting_sync(storage.company_id(), storage.user_id(), name)?;
		let target = SettingRecord::at(&storage, name, self.encryption.encrypt(def, value)?);

		let action = plan_write(existing, target, value == inherited);
		Self::log_write(&action, &storage, name);
		match &action {
			WriteAction::Create(record) => self.store.create_setting_sync(record)?,
			WriteAction::Update(record) => self.store.update_setting_sync(record)?,
			WriteAction::Delete(record) => self.store.delete_setting_sync(record)?,
			WriteAction::Unchanged => {}
		}

		self.cache.remove(&storage);
		Ok(())
	}

	fn all_setting_values_sync(
		&self,
		ctx: &SessionContext,
		scopes: SettingScopes,
	) -> StResult<Vec<SettingValue>> {
		let ctx = self.session_sync(ctx)?;
		let mut values = self
			.registry
			.list()
			.into_iter()
			.map(|def| {
				let res = Resolution::new(def, ctx.company_id, ctx.user_id).within(scopes);
				Ok(SettingValue::new(def.name.clone(), self.resolve_sync(def, res)?))
			})
			.collect::<StResult<Vec<_>>>()?;

		let mut orphans = BTreeMap::new();
		for scope in Self::session_scopes(&ctx, scopes) {
			let settings = self.scope_settings_sync(scope)?;
			self.merge_orphans(&mut orphans, &settings);
		}
		values.extend(orphans.into_iter().map(|(name, value)| SettingValue::new(name, value)));
		Ok(values)
	}

	fn scope_values_sync(&self, scope: ScopeKey) -> StResult<Vec<SettingValue>> {
		let settings = self.scope_settings_sync(scope)?;
		self.reveal_scope(&settings)
	}

	// Reads
	//*******

	pub fn get_setting_value_sync(&self, ctx: &SessionContext, name: &str) -> StResult<String> {
		let ctx = self.session_sync(ctx)?;
		self.resolve_named_sync(name, ctx.company_id, ctx.user_id)
	}

	pub fn get_setting_value_as_sync<T: FromStr>(
		&self,
		ctx: &SessionContext,
		name: &str,
	) -> StResult<T> {
		parse_value(name, self.get_setting_value_sync(ctx, name)?)
	}

	pub fn get_setting_value_for_application_sync(&self, name: &str) -> StResult<String> {
		self.resolve_named_sync(name, None, None)
	}

	pub fn get_setting_value_for_company_sync(
		&self,
		name: &str,
		company_id: CompanyId,
	) -> StResult<String> {
		self.resolve_named_sync(name, Some(company_id), None)
	}

	pub fn get_setting_value_for_user_sync(
		&self,
		name: &str,
		user: &UserIdentifier,
	) -> StResult<String> {
		self.resolve_named_sync(name, user.company_id, Some(user.user_id))
	}

	pub fn get_all_setting_values_sync(&self, ctx: &SessionContext) -> StResult<Vec<SettingValue>> {
		self.all_setting_values_sync(ctx, SettingScopes::ALL)
	}

	pub fn get_all_setting_values_in_sync(
		&self,
		ctx: &SessionContext,
		scopes: SettingScopes,
	) -> StResult<Vec<SettingValue>> {
		self.all_setting_values_sync(ctx, scopes)
	}

	pub fn get_all_setting_values_for_application_sync(&self) -> StResult<Vec<SettingValue>> {
		self.scope_values_sync(ScopeKey::Application)
	}

	pub fn get_all_setting_values_for_company_sync(
		&self,
		company_id: CompanyId,
	) -> StResult<Vec<SettingValue>> {
		self.scope_values_sync(ScopeKey::Company(company_id))
	}

	pub fn get_all_setting_values_for_user_sync(
		&self,
		user: &UserIdentifier,
	) -> StResult<Vec<SettingValue>> {
		self.scope_values_sync(ScopeKey::User(*user))
	}

	// Writes
	//********

	pub fn change_setting_for_application_sync(&self, name: &str, value: &str) -> StResult<()> {
		self.change_setting_sync(ScopeKey::Application, name, value)
	}

	pub fn change_setting_for_company_sync(
		&self,
		company_id: CompanyId,
		name: &str,
		value: &str,
	) -> StResult<()> {
		self.change_setting_sync(ScopeKey::Company(company_id), name, value)
	}

	pub fn change_setting_for_user_sync(
		&self,
		user: &UserIdentifier,
		name: &str,
		value: &str,
	) -> StResult<()> {
		self.change_setting_sync(ScopeKey::User(*user), name, value)
	}
}

// vim: ts=4
