//! Settings types and definitions
//!
//! Setting definitions, their allowed scopes, and the registry they are kept in.

use std::collections::HashMap;
use std::fmt::Debug;
use std::ops::{BitAnd, BitOr};

use serde::{Deserialize, Serialize};

use crate::prelude::*;

/// Set of levels a setting may be stored at
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SettingScopes(u8);

impl SettingScopes {
	pub const APPLICATION: SettingScopes = SettingScopes(0b001);
	pub const COMPANY: SettingScopes = SettingScopes(0b010);
	pub const USER: SettingScopes = SettingScopes(0b100);
	pub const ALL: SettingScopes = SettingScopes(0b111);

	pub const fn empty() -> Self {
		SettingScopes(0)
	}

	pub const fn is_empty(self) -> bool {
		self.0 == 0
	}

	pub const fn contains(self, other: SettingScopes) -> bool {
		self.0 & other.0 == other.0
	}

	pub fn of(level: SettingLevel) -> Self {
		match level {
			SettingLevel::Application => SettingScopes::APPLICATION,
			SettingLevel::Company => SettingScopes::COMPANY,
			SettingLevel::User => SettingScopes::USER,
		}
	}

	/// Check if a value may be stored at the given level
	pub fn allows(self, level: SettingLevel) -> bool {
		self.contains(SettingScopes::of(level))
	}

	/// Levels in this set, most general first
	pub fn levels(self) -> impl Iterator<Item = SettingLevel> {
		[SettingLevel::Application, SettingLevel::Company, SettingLevel::User]
			.into_iter()
			.filter(move |level| self.allows(*level))
	}
}

impl BitOr for SettingScopes {
	type Output = SettingScopes;

	fn bitor(self, rhs: SettingScopes) -> SettingScopes {
		SettingScopes(self.0 | rhs.0)
	}
}

impl BitAnd for SettingScopes {
	type Output = SettingScopes;

	fn bitand(self, rhs: SettingScopes) -> SettingScopes {
		SettingScopes(self.0 & rhs.0)
	}
}

impl FromIterator<SettingLevel> for SettingScopes {
	fn from_iter<I: IntoIterator<Item = SettingLevel>>(iter: I) -> Self {
		iter.into_iter().fold(SettingScopes::empty(), |acc, level| acc | SettingScopes::of(level))
	}
}

impl Debug for SettingScopes {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_set().entries(self.levels()).finish()
	}
}

impl Serialize for SettingScopes {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.collect_seq(self.levels())
	}
}

impl<'de> Deserialize<'de> for SettingScopes {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Vec::<SettingLevel>::deserialize(deserializer)?.into_iter().collect())
	}
}

/// Setting definition - defines metadata for each setting
#[derive(Debug, Clone)]
pub struct SettingDefinition {
	/// Unique name (e.g., "App.UI.Theme")
	pub name: Box<str>,

	/// Value used when nothing is stored at any allowed level. Always plaintext.
	pub default_value: String,

	/// Levels where this setting can be stored
	pub scopes: SettingScopes,

	/// Whether a missing value falls back to the next more general level
	pub is_inherited: bool,

	/// Whether stored values are encrypted at rest
	pub is_encrypted: bool,

	pub description: Option<String>,

	/// Informational flag for UIs listing settings
	pub is_visible_to_clients: bool,
}

impl SettingDefinition {
	/// Create a builder for constructing a SettingDefinition
	pub fn builder(name: impl Into<Box<str>>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(name)
	}
}

/// Builder for SettingDefinition with fluent API
pub struct SettingDefinitionBuilder {
	name: Box<str>,
	default_value: String,
	scopes: SettingScopes,
	is_inherited: bool,
	is_encrypted: bool,
	description: Option<String>,
	is_visible_to_clients: bool,
}

impl SettingDefinitionBuilder {
	pub fn new(name: impl Into<Box<str>>) -> Self {
		Self {
			name: name.into(),
			default_value: String::new(),
			scopes: SettingScopes::APPLICATION,
			is_inherited: true,
			is_encrypted: false,
			description: None,
			is_visible_to_clients: false,
		}
	}

	pub fn default_value(mut self, value: impl Into<String>) -> Self {
		self.default_value = value.into();
		self
	}

	/// Set the allowed scopes (defaults to Application)
	pub fn scopes(mut self, scopes: SettingScopes) -> Self {
		self.scopes = scopes;
		self
	}

	pub fn inherited(mut self, is_inherited: bool) -> Self {
		self.is_inherited = is_inherited;
		self
	}

	pub fn encrypted(mut self, is_encrypted: bool) -> Self {
		self.is_encrypted = is_encrypted;
		self
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = Some(description.into());
		self
	}

	pub fn visible_to_clients(mut self, visible: bool) -> Self {
		self.is_visible_to_clients = visible;
		self
	}

	/// Build the SettingDefinition
	pub fn build(self) -> StResult<SettingDefinition> {
		if self.name.trim().is_empty() {
			return Err(Error::ConfigError("Setting name is required".into()));
		}
		if self.scopes.is_empty() {
			return Err(Error::ConfigError(format!(
				"Setting '{}' must allow at least one scope",
				self.name
			)));
		}

		Ok(SettingDefinition {
			name: self.name,
			default_value: self.default_value,
			scopes: self.scopes,
			is_inherited: self.is_inherited,
			is_encrypted: self.is_encrypted,
			description: self.description,
			is_visible_to_clients: self.is_visible_to_clients,
		})
	}
}

/// Resolved (plaintext) value of a setting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingValue {
	pub name: Box<str>,
	pub value: String,
}

impl SettingValue {
	pub fn new(name: impl Into<Box<str>>, value: impl Into<String>) -> Self {
		Self { name: name.into(), value: value.into() }
	}
}

/// Source of setting definitions, registered once at startup
pub trait SettingProvider {
	fn register_settings(&self, registry: &mut SettingsRegistry) -> StResult<()>;
}

/// Mutable registry used during initialization
pub struct SettingsRegistry {
	definitions: HashMap<Box<str>, SettingDefinition>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self { definitions: HashMap::new() }
	}

	/// Register a new setting definition
	pub fn register(&mut self, def: SettingDefinition) -> StResult<()> {
		if self.definitions.contains_key(&def.name) {
			return Err(Error::ConfigError(format!("Setting '{}' is already registered", def.name)));
		}

		debug!("Registering setting: {}", def.name);
		self.definitions.insert(def.name.clone(), def);
		Ok(())
	}

	/// Register all definitions of a provider
	pub fn register_provider(&mut self, provider: &dyn SettingProvider) -> StResult<()> {
		provider.register_settings(self)
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenSettingsRegistry {
		info!("Freezing settings registry with {} definitions", self.definitions.len());
		FrozenSettingsRegistry { definitions: self.definitions }
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

impl Default for SettingsRegistry {
	fn default() -> Self {
		Self::new()
	}
}

/// Immutable registry used at resolution time
pub struct FrozenSettingsRegistry {
	definitions: HashMap<Box<str>, SettingDefinition>,
}

impl FrozenSettingsRegistry {
	/// Get a setting definition by name
	pub fn get(&self, name: &str) -> StResult<&SettingDefinition> {
		self.definitions.get(name).ok_or_else(|| Error::SettingNotFound(name.into()))
	}

	pub fn find(&self, name: &str) -> Option<&SettingDefinition> {
		self.definitions.get(name)
	}

	/// List all registered settings, ordered by name
	pub fn list(&self) -> Vec<&SettingDefinition> {
		let mut defs: Vec<_> = self.definitions.values().collect();
		defs.sort_by(|a, b| a.name.cmp(&b.name));
		defs
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}


// vim: ts=4
