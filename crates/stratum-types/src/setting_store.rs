//! Setting store trait. Persists setting values per company, user and name.
//!
//! A store holds at most one row per `(company_id, user_id, name)`. Values of
//! encrypted settings arrive here already encrypted; the store never interprets
//! them. Every operation has a blocking `_sync` twin that must behave exactly
//! like its async counterpart.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// A persisted setting value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingRecord {
	pub company_id: Option<CompanyId>,
	pub user_id: Option<UserId>,
	pub name: Box<str>,
	pub value: String,
}

impl SettingRecord {
	pub fn new(
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
		name: impl Into<Box<str>>,
		value: impl Into<String>,
	) -> Self {
		Self { company_id, user_id, name: name.into(), value: value.into() }
	}

	/// Creates a record stored at the given scope
	pub fn at(scope: &ScopeKey, name: impl Into<Box<str>>, value: impl Into<String>) -> Self {
		Self::new(scope.company_id(), scope.user_id(), name, value)
	}

	pub fn scope(&self) -> ScopeKey {
		ScopeKey::from_ids(self.company_id, self.user_id)
	}
}

#[async_trait]
pub trait SettingStore: Debug + Send + Sync {
	/// Reads the row stored for exactly this company, user and name
	async fn read_setting(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
		name: &str,
	) -> StResult<Option<SettingRecord>>;

	/// Lists all rows stored for exactly this company and user
	async fn list_settings(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
	) -> StResult<Vec<SettingRecord>>;

	async fn create_setting(&self, record: &SettingRecord) -> StResult<()>;
	async fn update_setting(&self, record: &SettingRecord) -> StResult<()>;
	async fn delete_setting(&self, record: &SettingRecord) -> StResult<()>;

	fn read_setting_sync(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
		name: &str,
	) -> StResult<Option<SettingRecord>>;
	fn list_settings_sync(
		&self,
		company_id: Option<CompanyId>,
		user_id: Option<UserId>,
	) -> StResult<Vec<SettingRecord>>;
	fn create_setting_sync(&self, record: &SettingRecord) -> StResult<()>;
	fn update_setting_sync(&self, record: &SettingRecord) -> StResult<()>;
	fn delete_setting_sync(&self, record: &SettingRecord) -> StResult<()>;
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_record_scope() {
		let record = SettingRecord::new(Some(CompanyId(1)), Some(UserId(2)), "MySetting", "x");
		assert_eq!(
			record.scope(),
			ScopeKey::User(UserIdentifier::new(Some(CompanyId(1)), UserId(2)))
		);

		let record = SettingRecord::at(&ScopeKey::Company(CompanyId(4)), "MySetting", "y");
		assert_eq!(record.company_id, Some(CompanyId(4)));
		assert_eq!(record.user_id, None);
	}

	#[test]
	fn test_record_serde() {
		let record = SettingRecord::new(Some(CompanyId(1)), None, "MySetting", "x");
		let json = serde_json::to_value(&record).unwrap();
		assert_eq!(json["companyId"], 1);
		assert!(json["userId"].is_null());
		assert_eq!(json["value"], "x");
	}
}

// vim: ts=4
