//! Setting manager: resolution, enumeration and change of setting values
//!
//! Values are resolved User -> Company -> Application -> definition default,
//! reading each scope through the cache and loading it from the store on a
//! miss. Writes never store a value equal to the one the scope would inherit.
//!
//! The manager keeps no mutable state besides the cache. Concurrent writers to
//! the same setting at the same scope are not serialized here; callers are
//! expected to have a single writer per key.

use std::collections::BTreeMap;
use std::str::FromStr;
use std::sync::Arc;

use stratum_types::company_store::CompanyStore;
use stratum_types::setting_store::{SettingRecord, SettingStore};

use crate::config::SettingManagerOpts;
use crate::prelude::*;

use super::cache::{LruSettingCache, ScopeSettings, SettingCache};
use super::encryption::SettingEncryptionService;
use super::resolve::{Resolution, Step, WriteAction, plan_write};
use super::types::{FrozenSettingsRegistry, SettingDefinition, SettingScopes, SettingValue};

mod blocking;

/// Settings manager - main interface for reading and changing settings
pub struct SettingManager {
	registry: Arc<FrozenSettingsRegistry>,
	store: Arc<dyn SettingStore>,
	company_store: Option<Arc<dyn CompanyStore>>,
	cache: Arc<dyn SettingCache>,
	encryption: SettingEncryptionService,
	multi_tenancy_enabled: bool,
}

/// Builder for SettingManager
pub struct SettingManagerBuilder {
	registry: Arc<FrozenSettingsRegistry>,
	store: Arc<dyn SettingStore>,
	company_store: Option<Arc<dyn CompanyStore>>,
	cache: Option<Arc<dyn SettingCache>>,
	opts: SettingManagerOpts,
}

impl SettingManagerBuilder {
	pub fn new(registry: Arc<FrozenSettingsRegistry>, store: Arc<dyn SettingStore>) -> Self {
		Self { registry, store, company_store: None, cache: None, opts: SettingManagerOpts::default() }
	}

	pub fn opts(mut self, opts: SettingManagerOpts) -> Self {
		self.opts = opts;
		self
	}

	pub fn multi_tenancy(mut self, enabled: bool) -> Self {
		self.opts.multi_tenancy_enabled = enabled;
		self
	}

	/// Company store resolving the default company. Required when multi-tenancy is disabled.
	pub fn company_store(mut self, company_store: Arc<dyn CompanyStore>) -> Self {
		self.company_store = Some(company_store);
		self
	}

	/// Use a custom cache instead of an LRU cache sized by the options
	pub fn cache(mut self, cache: Arc<dyn SettingCache>) -> Self {
		self.cache = Some(cache);
		self
	}

	pub fn build(self) -> StResult<SettingManager> {
		if !self.opts.multi_tenancy_enabled && self.company_store.is_none() {
			return Err(Error::ConfigError(
				"A company store is required when multi-tenancy is disabled".into(),
			));
		}

		let encryption = SettingEncryptionService::new(&self.opts.encryption)?;
		let cache = self
			.cache
			.unwrap_or_else(|| Arc::new(LruSettingCache::new(self.opts.cache_capacity)));

		info!(
			"Setting manager ready: {} definitions, multi-tenancy {}",
			self.registry.len(),
			if self.opts.multi_tenancy_enabled { "enabled" } else { "disabled" }
		);

		Ok(SettingManager {
			registry: self.registry,
			store: self.store,
			company_store: self.company_store,
			cache,
			encryption,
			multi_tenancy_enabled: self.opts.multi_tenancy_enabled,
		})
	}
}

fn parse_value<T: FromStr>(name: &str, value: String) -> StResult<T> {
	value.parse().map_err(|_| Error::Parse { name: name.into(), value })
}

impl SettingManager {
	pub fn builder(
		registry: Arc<FrozenSettingsRegistry>,
		store: Arc<dyn SettingStore>,
	) -> SettingManagerBuilder {
		SettingManagerBuilder::new(registry, store)
	}

	pub fn registry(&self) -> &Arc<FrozenSettingsRegistry> {
		&self.registry
	}

	pub fn is_multi_tenancy_enabled(&self) -> bool {
		self.multi_tenancy_enabled
	}

	// Shared helpers of the async and blocking API
	//**********************************************

	fn company_store(&self) -> StResult<&Arc<dyn CompanyStore>> {
		self.company_store.as_ref().ok_or(Error::NotFound)
	}

	fn cached(&self, key: &ScopeKey) -> Option<Arc<ScopeSettings>> {
		let settings = self.cache.get(key);
		if settings.is_some() {
			debug!("Setting cache hit: {}", key);
		} else {
			debug!("Setting cache miss: {}", key);
		}
		settings
	}

	fn cache_scope(&self, key: ScopeKey, records: Vec<SettingRecord>) -> Arc<ScopeSettings> {
		let settings: Arc<ScopeSettings> = Arc::new(records.into_iter().collect());
		if settings.is_empty() {
			debug!("No settings stored for {}", key);
		} else {
			debug!("Loaded {} settings for {}", settings.len(), key);
		}
		self.cache.put(key, Arc::clone(&settings));
		settings
	}

	/// Turns a resolution outcome into the plaintext value
	fn reveal(&self, def: &SettingDefinition, step: Step) -> StResult<String> {
		match step {
			Step::Found(_, stored) => self.encryption.decrypt(def, &stored),
			Step::Default | Step::Probe(_) => Ok(def.default_value.clone()),
		}
	}

	/// Decrypts the rows of one scope. Names without a definition pass through unchanged.
	fn reveal_scope(&self, settings: &ScopeSettings) -> StResult<Vec<SettingValue>> {
		settings
			.iter()
			.map(|(name, stored)| {
				let value = match self.registry.find(name) {
					Some(def) => self.encryption.decrypt(def, stored)?,
					None => stored.to_string(),
				};
				Ok(SettingValue::new(name, value))
			})
			.collect()
	}

	/// Scopes an ambient enumeration reads, most general first
	fn session_scopes(ctx: &SessionContext, scopes: SettingScopes) -> Vec<ScopeKey> {
		let mut keys = Vec::with_capacity(3);
		if scopes.allows(SettingLevel::Application) {
			keys.push(ScopeKey::Application);
		}
		if let Some(company_id) = ctx.company_id.filter(|_| scopes.allows(SettingLevel::Company)) {
			keys.push(ScopeKey::Company(company_id));
		}
		if let Some(user) = ctx.user().filter(|_| scopes.allows(SettingLevel::User)) {
			keys.push(ScopeKey::User(user));
		}
		keys
	}

	/// Collects rows without a definition. Later scopes override earlier ones.
	fn merge_orphans(&self, orphans: &mut BTreeMap<Box<str>, String>, settings: &ScopeSettings) {
		for (name, stored) in settings.iter() {
			if self.registry.find(name).is_none() {
				orphans.insert(name.into(), stored.to_string());
			}
		}
	}

	/// Fills in the default company when multi-tenancy is disabled
	fn with_default_company(ctx: &SessionContext, default: Option<CompanyId>) -> SessionContext {
		SessionContext { company_id: ctx.company_id.or(default), user_id: ctx.user_id }
	}

	fn check_scope(def: &SettingDefinition, scope: &ScopeKey) -> StResult<()> {
		if def.scopes.allows(scope.level()) {
			Ok(())
		} else {
			warn!("Setting '{}' cannot be stored at {} level", def.name, scope.level());
			Err(Error::InvalidScope { name: def.name.clone(), level: scope.level() })
		}
	}

	fn log_write(action: &WriteAction, scope: &ScopeKey, name: &str) {
		match action {
			WriteAction::Create(_) => info!("Setting '{}' created for {}", name, scope),
			WriteAction::Update(_) => info!("Setting '{}' updated for {}", name, scope),
			WriteAction::Delete(_) => {
				info!("Setting '{}' deleted for {} (equals inherited value)", name, scope);
			}
			WriteAction::Unchanged => debug!("Setting '{}' unchanged for {}", name, scope),
		}
	}

	// Scope access
	//**************

	/// Maps a logical scope to the scope its rows are stored at. Without
	/// multi-tenancy, company-less application and user rows belong to the
	/// default company.
	async fn storage_scope(&self, scope: ScopeKey) -> StResult<ScopeKey> {
		match scope {
			ScopeKey::Application if !self.multi_tenancy_enabled => {
				Ok(ScopeKey::Company(self.company_store()?.default_company_id().await?))
			}
			ScopeKey::User(UserIdentifier { company_id: None, user_id })
				if !self.multi_tenancy_enabled =>
			{
				let company_id = self.company_store()?.default_company_id().await?;
				Ok(ScopeKey::User(UserIdentifier::new(Some(company_id), user_id)))
			}
			scope => Ok(scope),
		}
	}

	async fn session(&self, ctx: &SessionContext) -> StResult<SessionContext> {
		if self.multi_tenancy_enabled || ctx.company_id.is_some() {
			return Ok(*ctx);
		}
		let default = self.company_store()?.default_company_id().await?;
		Ok(Self::with_default_company(ctx, Some(default)))
	}

	/// Rows stored at a scope, from the cache or the store
	async fn scope_settings(&self, scope: ScopeKey) -> StResult<Arc<ScopeSettings>> {
		let storage = self.storage_scope(scope).await?;
		if let Some(settings) = self.cached(&storage) {
			return Ok(settings);
		}
		let records = self.store.list_settings(storage.company_id(), storage.user_id()).await?;
		Ok(self.cache_scope(storage, records))
	}

	async fn resolve(&self, def: &SettingDefinition, mut res: Resolution<'_>) -> StResult<String> {
		let mut step = res.start();
		while let Step::Probe(scope) = step {
			let settings = self.scope_settings(scope).await?;
			step = res.feed(settings.get(&def.name));
		}
		self.reveal(def, step)
	}

	async fn resolve_named(
		&self,
		name: &str,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
	) -> StResult<String> {
		let def = self.registry.get(name)?;
		self.resolve(def, Resolution::new(def, company_id, user_id)).await
	}

	/// Value the scope would have if nothing was stored at it
	async fn inherited_value(
		&self,
		def: &SettingDefinition,
		scope: &ScopeKey,
		storage: &ScopeKey,
	) -> StResult<String> {
		let mut res = Resolution::at(def, scope);
		let mut step = res.start();
		while let Step::Probe(probe) = step {
			if self.storage_scope(probe).await? == *storage {
				step = res.feed(None);
			} else {
				let settings = self.scope_settings(probe).await?;
				step = res.feed(settings.get(&def.name));
			}
		}
		self.reveal(def, step)
	}

	async fn change_setting(&self, scope: ScopeKey, name: &str, value: &str) -> StResult<()> {
		let def = self.registry.get(name)?;
		Self::check_scope(def, &scope)?;

		let storage = self.storage_scope(scope).await?;
		let inherited = self.inherited_value(def, &scope, &storage).await?;
		let existing =
			self.store.read_setting(storage.company_id(), storage.user_id(), name).await?;
		let target = SettingRecord::at(&storage, name, self.encryption.encrypt(def, value)?);

		let action = plan_write(existing, target, value == inherited);
		Self::log_write(&action, &storage, name);
		match &action {
			WriteAction::Create(record) => self.store.create_setting(record).await?,
			WriteAction::Update(record) => self.store.update_setting(record).await?,
			WriteAction::Delete(record) => self.store.delete_setting(record).await?,
			WriteAction::Unchanged => {}
		}

		self.cache.remove(&storage);
		Ok(())
	}

	async fn all_setting_values(
		&self,
		ctx: &SessionContext,
		scopes: SettingScopes,
	) -> StResult<Vec<SettingValue>> {
		let ctx = self.session(ctx).await?;
		let mut values = Vec::with_capacity(self.registry.len());
		for def in self.registry.list() {
			let res = Resolution::new(def, ctx.company_id, ctx.user_id).within(scopes);
			values.push(SettingValue::new(def.name.clone(), self.resolve(def, res).await?));
		}

		let mut orphans = BTreeMap::new();
		for scope in Self::session_scopes(&ctx, scopes) {
			let settings = self.scope_settings(scope).await?;
			self.merge_orphans(&mut orphans, &settings);
		}
		values.extend(orphans.into_iter().map(|(name, value)| SettingValue::new(name, value)));
		Ok(values)
	}

	async fn scope_values(&self, scope: ScopeKey) -> StResult<Vec<SettingValue>> {
		let settings = self.scope_settings(scope).await?;
		self.reveal_scope(&settings)
	}

	// Reads
	//*******

	/// Get the value of a setting for the session's user and company
	pub async fn get_setting_value(&self, ctx: &SessionContext, name: &str) -> StResult<String> {
		let ctx = self.session(ctx).await?;
		self.resolve_named(name, ctx.company_id, ctx.user_id).await
	}

	/// Get the value of a setting parsed into `T`
	pub async fn get_setting_value_as<T: FromStr>(
		&self,
		ctx: &SessionContext,
		name: &str,
	) -> StResult<T> {
		parse_value(name, self.get_setting_value(ctx, name).await?)
	}

	pub async fn get_setting_value_for_application(&self, name: &str) -> StResult<String> {
		self.resolve_named(name, None, None).await
	}

	pub async fn get_setting_value_for_company(
		&self,
		name: &str,
		company_id: CompanyId,
	) -> StResult<String> {
		self.resolve_named(name, Some(company_id), None).await
	}

	pub async fn get_setting_value_for_user(
		&self,
		name: &str,
		user: &UserIdentifier,
	) -> StResult<String> {
		self.resolve_named(name, user.company_id, Some(user.user_id)).await
	}

	/// Effective values of all defined settings for the session, followed by
	/// stored names without a definition
	pub async fn get_all_setting_values(&self, ctx: &SessionContext) -> StResult<Vec<SettingValue>> {
		self.all_setting_values(ctx, SettingScopes::ALL).await
	}

	/// Effective values of all defined settings, considering only the given levels
	pub async fn get_all_setting_values_in(
		&self,
		ctx: &SessionContext,
		scopes: SettingScopes,
	) -> StResult<Vec<SettingValue>> {
		self.all_setting_values(ctx, scopes).await
	}

	/// Values stored at application level, including names without a definition
	pub async fn get_all_setting_values_for_application(&self) -> StResult<Vec<SettingValue>> {
		self.scope_values(ScopeKey::Application).await
	}

	pub async fn get_all_setting_values_for_company(
		&self,
		company_id: CompanyId,
	) -> StResult<Vec<SettingValue>> {
		self.scope_values(ScopeKey::Company(company_id)).await
	}

	pub async fn get_all_setting_values_for_user(
		&self,
		user: &UserIdentifier,
	) -> StResult<Vec<SettingValue>> {
		self.scope_values(ScopeKey::User(*user)).await
	}

	// Writes
	//********

	pub async fn change_setting_for_application(&self, name: &str, value: &str) -> StResult<()> {
		self.change_setting(ScopeKey::Application, name, value).await
	}

	pub async fn change_setting_for_company(
		&self,
		company_id: CompanyId,
		name: &str,
		value: &str,
	) -> StResult<()> {
		self.change_setting(ScopeKey::Company(company_id), name, value).await
	}

	pub async fn change_setting_for_user(
		&self,
		user: &UserIdentifier,
		name: &str,
		value: &str,
	) -> StResult<()> {
		self.change_setting(ScopeKey::User(*user), name, value).await
	}
}

impl std::fmt::Debug for SettingManager {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingManager")
			.field("definitions", &self.registry.len())
			.field("store", &self.store)
			.field("multi_tenancy_enabled", &self.multi_tenancy_enabled)
			.finish_non_exhaustive()
	}
}

// vim: ts=4
