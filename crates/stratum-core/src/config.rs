//! Setting manager options

use serde::Deserialize;

use crate::prelude::*;
use crate::settings::encryption::EncryptionConfig;

pub const DEFAULT_CACHE_CAPACITY: usize = 1000;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SettingManagerOpts {
	/// When disabled, application level values are stored for the default company
	pub multi_tenancy_enabled: bool,
	/// Maximum number of scopes kept in the cache
	pub cache_capacity: usize,
	pub encryption: EncryptionConfig,
}

impl Default for SettingManagerOpts {
	fn default() -> Self {
		Self {
			multi_tenancy_enabled: true,
			cache_capacity: DEFAULT_CACHE_CAPACITY,
			encryption: EncryptionConfig::default(),
		}
	}
}

fn parse_bool(key: &str, value: &str) -> StResult<bool> {
	match value.trim().to_ascii_lowercase().as_str() {
		"1" | "true" | "yes" | "on" => Ok(true),
		"0" | "false" | "no" | "off" => Ok(false),
		_ => Err(Error::ConfigError(format!("{} must be a boolean, got '{}'", key, value))),
	}
}

impl SettingManagerOpts {
	/// Read options from `STRATUM_*` environment variables
	pub fn from_env() -> StResult<Self> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Read options through a variable lookup function. Missing variables keep their defaults.
	pub fn from_lookup<F>(lookup: F) -> StResult<Self>
	where
		F: Fn(&str) -> Option<String>,
	{
		let mut opts = Self::default();

		if let Some(value) = lookup("STRATUM_MULTI_TENANCY") {
			opts.multi_tenancy_enabled = parse_bool("STRATUM_MULTI_TENANCY", &value)?;
		}
		if let Some(value) = lookup("STRATUM_CACHE_CAPACITY") {
			opts.cache_capacity = value.trim().parse().map_err(|_| {
				Error::ConfigError(format!("STRATUM_CACHE_CAPACITY must be a number, got '{}'", value))
			})?;
		}
		if let Some(value) = lookup("STRATUM_PASS_PHRASE") {
			opts.encryption.pass_phrase = value.into();
		}
		if let Some(value) = lookup("STRATUM_SALT") {
			opts.encryption.salt = value.into();
		}
		if let Some(value) = lookup("STRATUM_INIT_VECTOR") {
			opts.encryption.init_vector = value.into();
		}

		Ok(opts)
	}
}


// vim: ts=4
