//! Setting providers built from static data

use serde::Deserialize;

use crate::prelude::*;

use super::types::{SettingDefinition, SettingProvider, SettingScopes, SettingsRegistry};

fn default_true() -> bool {
	true
}

/// Serialized form of a setting definition
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DefinitionEntry {
	name: String,
	#[serde(default)]
	default_value: String,
	scopes: SettingScopes,
	#[serde(default = "default_true")]
	is_inherited: bool,
	#[serde(default)]
	is_encrypted: bool,
	description: Option<String>,
	#[serde(default)]
	is_visible_to_clients: bool,
}

/// Provider holding a fixed list of definitions
#[derive(Debug, Clone, Default)]
pub struct StaticSettingProvider {
	definitions: Vec<SettingDefinition>,
}

impl StaticSettingProvider {
	pub fn new(definitions: Vec<SettingDefinition>) -> Self {
		Self { definitions }
	}

	/// Parse definitions from a JSON array
	///
	/// ```text
	/// [{ "name": "App.Theme", "defaultValue": "light", "scopes": ["application", "user"] }]
	/// ```
	pub fn from_json(json: &str) -> StResult<Self> {
		let entries: Vec<DefinitionEntry> = serde_json::from_str(json)
			.map_err(|e| Error::ConfigError(format!("Invalid setting definitions: {}", e)))?;

		let definitions = entries
			.into_iter()
			.map(|entry| {
				let mut builder = SettingDefinition::builder(entry.name)
					.default_value(entry.default_value)
					.scopes(entry.scopes)
					.inherited(entry.is_inherited)
					.encrypted(entry.is_encrypted)
					.visible_to_clients(entry.is_visible_to_clients);
				if let Some(description) = entry.description {
					builder = builder.description(description);
				}
				builder.build()
			})
			.collect::<StResult<Vec<_>>>()?;

		Ok(Self { definitions })
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

impl SettingProvider for StaticSettingProvider {
	fn register_settings(&self, registry: &mut SettingsRegistry) -> StResult<()> {
		for def in &self.definitions {
			registry.register(def.clone())?;
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_from_json() {
		let provider = StaticSettingProvider::from_json(
			r#"[
				{ "name": "App.Theme", "defaultValue": "light", "scopes": ["application", "user"] },
				{ "name": "App.Secret", "scopes": ["company"], "isEncrypted": true, "isInherited": false }
			]"#,
		)
		.unwrap();
		assert_eq!(provider.len(), 2);

		let mut registry = SettingsRegistry::new();
		registry.register_provider(&provider).unwrap();
		let registry = registry.freeze();

		let theme = registry.get("App.Theme").unwrap();
		assert_eq!(theme.default_value, "light");
		assert_eq!(theme.scopes, SettingScopes::APPLICATION | SettingScopes::USER);
		assert!(theme.is_inherited);

		let secret = registry.get("App.Secret").unwrap();
		assert!(secret.is_encrypted);
		assert!(!secret.is_inherited);
		assert_eq!(secret.default_value, "");
	}

	#[test]
	fn test_from_json_rejects_empty_scopes() {
		let res = StaticSettingProvider::from_json(r#"[{ "name": "X", "scopes": [] }]"#);
		assert!(matches!(res, Err(Error::ConfigError(_))));
	}

	#[test]
	fn test_from_json_rejects_garbage() {
		assert!(StaticSettingProvider::from_json("{").is_err());
	}
}

// vim: ts=4
