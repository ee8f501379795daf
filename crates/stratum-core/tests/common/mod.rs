//! Shared setting definitions, seeded rows and manager builders for tests

#![allow(dead_code)]

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use stratum_core::settings::{SettingDefinition, SettingScopes, SettingsRegistry};
use stratum_core::{SettingManager, SettingManagerBuilder};
use stratum_setting_store_memory::{MemorySettingStore, StaticCompanyStore};
use stratum_types::prelude::*;
use stratum_types::setting_store::{SettingRecord, SettingStore};

/// Initialize a tracing subscriber for test debugging
pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_max_level(tracing::Level::DEBUG)
		.try_init();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MyEnumType {
	Value1,
	Value2,
	Value3,
}

impl FromStr for MyEnumType {
	type Err = ();

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"Value1" => Ok(MyEnumType::Value1),
			"Value2" => Ok(MyEnumType::Value2),
			"Value3" => Ok(MyEnumType::Value3),
			_ => Err(()),
		}
	}
}

pub fn test_registry() -> SettingsRegistry {
	let mut registry = SettingsRegistry::new();
	let defs = [
		SettingDefinition::builder("MyAppLevelSetting").default_value("42"),
		SettingDefinition::builder("MyAllLevelsSetting")
			.default_value("application level default value")
			.scopes(SettingScopes::ALL),
		SettingDefinition::builder("MyNotInheritedSetting")
			.default_value("default-value")
			.scopes(SettingScopes::APPLICATION | SettingScopes::COMPANY)
			.inherited(false),
		SettingDefinition::builder("MyEnumTypeSetting").default_value("Value1"),
		SettingDefinition::builder("MyEncryptedSetting")
			.scopes(SettingScopes::ALL)
			.encrypted(true),
	];
	for def in defs {
		registry.register(def.build().unwrap()).unwrap();
	}
	registry
}

/// Rows stored at application level, company 1, users 1@1, 2@1 and host user 3
pub fn seeded_records() -> Vec<SettingRecord> {
	let c1 = Some(CompanyId(1));
	vec![
		SettingRecord::new(None, None, "MyAppLevelSetting", "48"),
		SettingRecord::new(None, None, "MyAllLevelsSetting", "application level stored value"),
		SettingRecord::new(None, None, "MyNotInheritedSetting", "application value"),
		SettingRecord::new(None, None, "MyEnumTypeSetting", "Value2"),
		SettingRecord::new(c1, None, "MyAllLevelsSetting", "company 1 stored value"),
		SettingRecord::new(c1, None, "MyCompanyOrphanSetting", "company orphan value"),
		SettingRecord::new(c1, Some(UserId(1)), "MyAllLevelsSetting", "user 1 stored value"),
		SettingRecord::new(c1, Some(UserId(2)), "MyAllLevelsSetting", "user 2 stored value"),
		SettingRecord::new(c1, Some(UserId(2)), "MyUserOrphanSetting", "user orphan value"),
		SettingRecord::new(None, Some(UserId(3)), "MyAllLevelsSetting", "user 3 stored value"),
		SettingRecord::new(None, Some(UserId(3)), "MyHostUserOrphanSetting", "host orphan value"),
	]
}

pub fn builder(store: Arc<dyn SettingStore>) -> SettingManagerBuilder {
	SettingManager::builder(Arc::new(test_registry().freeze()), store)
}

/// Manager over the seeded rows, multi-tenancy enabled
pub fn create_test_manager() -> (SettingManager, Arc<MemorySettingStore>) {
	setup_test_logging();
	let store = Arc::new(MemorySettingStore::with_settings(seeded_records()));
	let manager = builder(store.clone()).build().unwrap();
	(manager, store)
}

/// Manager over an empty store, multi-tenancy disabled with company 1 as default
pub fn create_single_tenant_manager() -> (SettingManager, Arc<MemorySettingStore>) {
	setup_test_logging();
	let store = Arc::new(MemorySettingStore::new());
	let manager = builder(store.clone())
		.multi_tenancy(false)
		.company_store(Arc::new(StaticCompanyStore::new(CompanyId(1))))
		.build()
		.unwrap();
	(manager, store)
}

pub fn user(company_id: i32, user_id: i64) -> UserIdentifier {
	UserIdentifier::new(Some(CompanyId(company_id)), UserId(user_id))
}

/// Store wrapper counting how often scopes are listed
#[derive(Debug)]
pub struct CountingStore {
	pub inner: MemorySettingStore,
	pub lists: AtomicUsize,
}

impl CountingStore {
	pub fn new(inner: MemorySettingStore) -> Self {
		Self { inner, lists: AtomicUsize::new(0) }
	}

	pub fn list_count(&self) -> usize {
		self.lists.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl SettingStore for CountingStore {
	async fn read_setting(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
		name: &str,
	) -> StResult<Option<SettingRecord>> {
		self.inner.read_setting(company_id, user_id, name).await
	}

	async fn list_settings(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
	) -> StResult<Vec<SettingRecord>> {
		self.lists.fetch_add(1, Ordering::SeqCst);
		self.inner.list_settings(company_id, user_id).await
	}

	async fn create_setting(&self, record: &SettingRecord) -> StResult<()> {
		self.inner.create_setting(record).await
	}

	async fn update_setting(&self, record: &SettingRecord) -> StResult<()> {
		self.inner.update_setting(record).await
	}

	async fn delete_setting(&self, record: &SettingRecord) -> StResult<()> {
		self.inner.delete_setting(record).await
	}

	fn read_setting_sync(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
		name: &str,
	) -> StResult<Option<SettingRecord>> {
		self.inner.read_setting_sync(company_id, user_id, name)
	}

	fn list_settings_sync(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
	) -> StResult<Vec<SettingRecord>> {
		self.lists.fetch_add(1, Ordering::SeqCst);
		self.inner.list_settings_sync(company_id, user_id)
	}

	fn create_setting_sync(&self, record: &SettingRecord) -> StResult<()> {
		self.inner.create_setting_sync(record)
	}

	fn update_setting_sync(&self, record: &SettingRecord) -> StResult<()> {
		self.inner.update_setting_sync(record)
	}

	fn delete_setting_sync(&self, record: &SettingRecord) -> StResult<()> {
		self.inner.delete_setting_sync(record)
	}
}

/// Store failing every operation
#[derive(Debug)]
pub struct FailingStore;

#[async_trait]
impl SettingStore for FailingStore {
	async fn read_setting(
		&self,
		_company_id: Option<CompanyId>,
		_user_id: Option<UserId>,
		_name: &str,
	) -> StResult<Option<SettingRecord>> {
		Err(Error::DbError)
	}

	async fn list_settings(
		&self,
		_company_id: Option<CompanyId>,
		_user_id: Option<UserId>,
	) -> StResult<Vec<SettingRecord>> {
		Err(Error::DbError)
	}

	async fn create_setting(&self, _record: &SettingRecord) -> StResult<()> {
		Err(Error::DbError)
	}

	async fn update_setting(&self, _record: &SettingRecord) -> StResult<()> {
		Err(Error::DbError)
	}

	async fn delete_setting(&self, _record: &SettingRecord) -> StResult<()> {
		Err(Error::DbError)
	}

	fn read_setting_sync(
		&self,
		_company_id: Option<CompanyId>,
		_user_id: Option<UserId>,
		_name: &str,
	) -> StResult<Option<SettingRecord>> {
		Err(Error::DbError)
	}

	fn list_settings_sync(
		&self,
		_company_id: Option<CompanyId>,
		_user_id: Option<UserId>,
	) -> StResult<Vec<SettingRecord>> {
		Err(Error::DbError)
	}

	fn create_setting_sync(&self, _record: &SettingRecord) -> StResult<()> {
		Err(Error::DbError)
	}

	fn update_setting_sync(&self, _record: &SettingRecord) -> StResult<()> {
		Err(Error::DbError)
	}

	fn delete_setting_sync(&self, _record: &SettingRecord) -> StResult<()> {
		Err(Error::DbError)
	}
}

// vim: ts=4
