//! In-memory adapters for the Stratum settings engine.
//!
//! [`MemorySettingStore`] keeps setting rows in a vector behind a lock and is
//! meant for tests, demos and single-process deployments that seed their
//! settings at startup. [`StaticCompanyStore`] always reports the same default
//! company.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use parking_lot::RwLock;
use std::fmt::Debug;

use stratum::company_store::CompanyStore;
use stratum::prelude::*;
use stratum::setting_store::{SettingRecord, SettingStore};

mod setting;

/// Company id used by single-tenant deployments
pub const DEFAULT_COMPANY_ID: CompanyId = CompanyId(1);

#[derive(Debug, Default)]
pub struct MemorySettingStore {
	rows: RwLock<Vec<SettingRecord>>,
}

impl MemorySettingStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Create a store seeded with rows. Later duplicates of a row are ignored.
	pub fn with_settings(records: impl IntoIterator<Item = SettingRecord>) -> Self {
		let mut rows = Vec::new();
		for record in records {
			if setting::create(&mut rows, &record).is_err() {
				debug!("Ignoring duplicate seed setting '{}'", record.name);
			}
		}
		Self { rows: RwLock::new(rows) }
	}

	/// Copy of all stored rows, in insertion order
	pub fn snapshot(&self) -> Vec<SettingRecord> {
		self.rows.read().clone()
	}

	pub fn len(&self) -> usize {
		self.rows.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.rows.read().is_empty()
	}
}

#[async_trait]
impl SettingStore for MemorySettingStore {
	async fn read_setting(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
		name: &str,
	) -> StResult<Option<SettingRecord>> {
		self.read_setting_sync(company_id, user_id, name)
	}

	async fn list_settings(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
	) -> StResult<Vec<SettingRecord>> {
		self.list_settings_sync(company_id, user_id)
	}

	async fn create_setting(&self, record: &SettingRecord) -> StResult<()> {
		self.create_setting_sync(record)
	}

	async fn update_setting(&self, record: &SettingRecord) -> StResult<()> {
		self.update_setting_sync(record)
	}

	async fn delete_setting(&self, record: &SettingRecord) -> StResult<()> {
		self.delete_setting_sync(record)
	}

	fn read_setting_sync(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
		name: &str,
	) -> StResult<Option<SettingRecord>> {
		Ok(setting::read(&self.rows.read(), company_id, user_id, name))
	}

	fn list_settings_sync(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
	) -> StResult<Vec<SettingRecord>> {
		Ok(setting::list(&self.rows.read(), company_id, user_id))
	}

	fn create_setting_sync(&self, record: &SettingRecord) -> StResult<()> {
		setting::create(&mut self.rows.write(), record)
	}

	fn update_setting_sync(&self, record: &SettingRecord) -> StResult<()> {
		setting::update(&mut self.rows.write(), record)
	}

	fn delete_setting_sync(&self, record: &SettingRecord) -> StResult<()> {
		setting::delete(&mut self.rows.write(), record)
	}
}

/// Company store with a fixed default company
#[derive(Debug, Clone, Copy)]
pub struct StaticCompanyStore {
	default_company_id: CompanyId,
}

impl StaticCompanyStore {
	pub fn new(default_company_id: CompanyId) -> Self {
		Self { default_company_id }
	}
}

impl Default for StaticCompanyStore {
	fn default() -> Self {
		Self::new(DEFAULT_COMPANY_ID)
	}
}

#[async_trait]
impl CompanyStore for StaticCompanyStore {
	async fn default_company_id(&self) -> StResult<CompanyId> {
		self.default_company_id_sync()
	}

	fn default_company_id_sync(&self) -> StResult<CompanyId> {
		Ok(self.default_company_id)
	}
}

// vim: ts=4
