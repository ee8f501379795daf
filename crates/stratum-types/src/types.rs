//! Identifiers and resolution levels used throughout the settings engine.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::prelude::*;

// CompanyId //
//***********//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompanyId(pub i32);

impl std::fmt::Display for CompanyId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for CompanyId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i32(self.0)
	}
}

impl<'de> Deserialize<'de> for CompanyId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(CompanyId(i32::deserialize(deserializer)?))
	}
}

// UserId //
//********//
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub i64);

impl std::fmt::Display for UserId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl Serialize for UserId {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for UserId {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(UserId(i64::deserialize(deserializer)?))
	}
}

// UserIdentifier //
//****************//
/// A user together with the company owning it. Host users have no company.
///
/// Formatted as `<user>@<company>`, or just `<user>` for host users.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserIdentifier {
	pub company_id: Option<CompanyId>,
	pub user_id: UserId,
}

impl UserIdentifier {
	pub fn new(company_id: Option<CompanyId>, user_id: UserId) -> Self {
		Self { company_id, user_id }
	}

	pub fn host(user_id: UserId) -> Self {
		Self { company_id: None, user_id }
	}
}

impl std::fmt::Display for UserIdentifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self.company_id {
			Some(company_id) => write!(f, "{}@{}", self.user_id, company_id),
			None => write!(f, "{}", self.user_id),
		}
	}
}

impl FromStr for UserIdentifier {
	type Err = Error;

	fn from_str(s: &str) -> StResult<Self> {
		let invalid = || Error::ConfigError(format!("Invalid user identifier: {}", s));
		let (user, company) = match s.split_once('@') {
			Some((user, company)) => (user, Some(company)),
			None => (s, None),
		};
		let user_id = UserId(user.trim().parse().map_err(|_| invalid())?);
		let company_id = match company {
			Some(company) => Some(CompanyId(company.trim().parse().map_err(|_| invalid())?)),
			None => None,
		};
		Ok(Self { company_id, user_id })
	}
}

// SessionContext //
//****************//
/// Ambient company and user of a request, passed explicitly to the engine
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionContext {
	pub company_id: Option<CompanyId>,
	pub user_id: Option<UserId>,
}

impl SessionContext {
	/// Host context: no company, no user
	pub fn host() -> Self {
		Self::default()
	}

	pub fn for_company(company_id: CompanyId) -> Self {
		Self { company_id: Some(company_id), user_id: None }
	}

	pub fn for_user(user: UserIdentifier) -> Self {
		Self { company_id: user.company_id, user_id: Some(user.user_id) }
	}

	pub fn user(&self) -> Option<UserIdentifier> {
		self.user_id.map(|user_id| UserIdentifier { company_id: self.company_id, user_id })
	}
}

// SettingLevel //
//**************//
/// Resolution level, ordered from the most general to the most specific
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SettingLevel {
	#[serde(rename = "application")]
	Application,
	#[serde(rename = "company")]
	Company,
	#[serde(rename = "user")]
	User,
}

impl std::fmt::Display for SettingLevel {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(match self {
			SettingLevel::Application => "application",
			SettingLevel::Company => "company",
			SettingLevel::User => "user",
		})
	}
}

// ScopeKey //
//**********//
/// Identifies the set of rows stored at one resolution level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKey {
	Application,
	Company(CompanyId),
	User(UserIdentifier),
}

impl ScopeKey {
	pub fn level(&self) -> SettingLevel {
		match self {
			ScopeKey::Application => SettingLevel::Application,
			ScopeKey::Company(_) => SettingLevel::Company,
			ScopeKey::User(_) => SettingLevel::User,
		}
	}

	pub fn company_id(&self) -> Option<CompanyId> {
		match self {
			ScopeKey::Application => None,
			ScopeKey::Company(company_id) => Some(*company_id),
			ScopeKey::User(user) => user.company_id,
		}
	}

	pub fn user_id(&self) -> Option<UserId> {
		match self {
			ScopeKey::User(user) => Some(user.user_id),
			_ => None,
		}
	}

	/// Builds the key matching a `(company_id, user_id)` pair as stored in rows
	pub fn from_ids(company_id: Option<CompanyId>, user_id: Option<UserId>) -> Self {
		match (company_id, user_id) {
			(company_id, Some(user_id)) => ScopeKey::User(UserIdentifier { company_id, user_id }),
			(Some(company_id), None) => ScopeKey::Company(company_id),
			(None, None) => ScopeKey::Application,
		}
	}
}

impl std::fmt::Display for ScopeKey {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ScopeKey::Application => write!(f, "application"),
			ScopeKey::Company(company_id) => write!(f, "company:{}", company_id),
			ScopeKey::User(user) => write!(f, "user:{}", user),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_user_identifier_format() {
		let user = UserIdentifier::new(Some(CompanyId(1)), UserId(42));
		assert_eq!(user.to_string(), "42@1");
		assert_eq!(UserIdentifier::host(UserId(3)).to_string(), "3");
	}

	#[test]
	fn test_user_identifier_parse() {
		let user: UserIdentifier = "42@1".parse().unwrap();
		assert_eq!(user, UserIdentifier::new(Some(CompanyId(1)), UserId(42)));

		let host: UserIdentifier = "3".parse().unwrap();
		assert_eq!(host, UserIdentifier::host(UserId(3)));

		assert!("abc@1".parse::<UserIdentifier>().is_err());
		assert!("1@".parse::<UserIdentifier>().is_err());
	}

	#[test]
	fn test_scope_key_from_ids() {
		assert_eq!(ScopeKey::from_ids(None, None), ScopeKey::Application);
		assert_eq!(ScopeKey::from_ids(Some(CompanyId(2)), None), ScopeKey::Company(CompanyId(2)));

		let key = ScopeKey::from_ids(Some(CompanyId(2)), Some(UserId(5)));
		assert_eq!(key.level(), SettingLevel::User);
		assert_eq!(key.company_id(), Some(CompanyId(2)));
		assert_eq!(key.user_id(), Some(UserId(5)));

		let host = ScopeKey::from_ids(None, Some(UserId(3)));
		assert_eq!(host, ScopeKey::User(UserIdentifier::host(UserId(3))));
	}

	#[test]
	fn test_session_context() {
		let user = UserIdentifier::new(Some(CompanyId(1)), UserId(2));
		let ctx = SessionContext::for_user(user);
		assert_eq!(ctx.company_id, Some(CompanyId(1)));
		assert_eq!(ctx.user(), Some(user));
		assert_eq!(SessionContext::for_company(CompanyId(1)).user(), None);
	}

	#[test]
	fn test_setting_level_serde() {
		let json = serde_json::to_string(&SettingLevel::Company).unwrap();
		assert_eq!(json, "\"company\"");
		let level: SettingLevel = serde_json::from_str("\"user\"").unwrap();
		assert_eq!(level, SettingLevel::User);
	}
}

// vim: ts=4
