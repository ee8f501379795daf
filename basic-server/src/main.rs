//! Resolves every defined setting for one user and prints the effective values.
//!
//! Environment:
//! - `STRATUM_DEFINITIONS`: JSON file with setting definitions (built-in demo set if unset)
//! - `STRATUM_USER`: user to resolve for, `user@company` or `user` (host context if unset)
//! - `STRATUM_MULTI_TENANCY`, `STRATUM_CACHE_CAPACITY`, `STRATUM_PASS_PHRASE`, ...

use std::process::ExitCode;
use std::sync::Arc;
use std::{env, path};

use stratum_core::SettingManagerOpts;
use stratum_core::prelude::*;
use stratum_core::settings::{
	SettingDefinition, SettingManager, SettingProvider, SettingScopes, SettingsRegistry,
	StaticSettingProvider,
};
use stratum_setting_store_memory::{MemorySettingStore, StaticCompanyStore};
use stratum_types::setting_store::SettingRecord;

pub struct Config {
	pub definitions: Option<path::PathBuf>,
	pub user: Option<UserIdentifier>,
	pub opts: SettingManagerOpts,
}

impl Config {
	fn from_env() -> StResult<Self> {
		let user = env::var("STRATUM_USER").ok().map(|user| user.parse()).transpose()?;
		Ok(Config {
			definitions: env::var("STRATUM_DEFINITIONS").ok().map(path::PathBuf::from),
			user,
			opts: SettingManagerOpts::from_env()?,
		})
	}
}

struct DemoSettings;

impl SettingProvider for DemoSettings {
	fn register_settings(&self, registry: &mut SettingsRegistry) -> StResult<()> {
		registry.register(
			SettingDefinition::builder("App.UI.Theme")
				.default_value("light")
				.scopes(SettingScopes::ALL)
				.description("Color theme of the user interface")
				.visible_to_clients(true)
				.build()?,
		)?;
		registry.register(
			SettingDefinition::builder("App.Mail.SmtpPassword")
				.scopes(SettingScopes::APPLICATION | SettingScopes::COMPANY)
				.encrypted(true)
				.build()?,
		)?;
		registry.register(
			SettingDefinition::builder("App.Session.TimeoutMinutes")
				.default_value("30")
				.scopes(SettingScopes::APPLICATION | SettingScopes::COMPANY)
				.inherited(false)
				.build()?,
		)?;
		Ok(())
	}
}

async fn load_registry(config: &Config) -> StResult<SettingsRegistry> {
	let mut registry = SettingsRegistry::new();
	match &config.definitions {
		Some(file) => {
			let json = tokio::fs::read_to_string(file).await.map_err(|err| {
				Error::ConfigError(format!("Cannot read {}: {}", file.display(), err))
			})?;
			registry.register_provider(&StaticSettingProvider::from_json(&json)?)?;
		}
		None => registry.register_provider(&DemoSettings)?,
	}
	Ok(registry)
}

async fn run(config: Config) -> StResult<()> {
	let registry = Arc::new(load_registry(&config).await?.freeze());
	let store = Arc::new(MemorySettingStore::new());

	let multi_tenancy = config.opts.multi_tenancy_enabled;
	let mut builder = SettingManager::builder(registry, store.clone()).opts(config.opts);
	if !multi_tenancy {
		builder = builder.company_store(Arc::new(StaticCompanyStore::default()));
	}
	let manager = builder.build()?;

	if manager.registry().find("App.UI.Theme").is_some() {
		manager.change_setting_for_application("App.UI.Theme", "dark").await?;
	}

	let ctx = config.user.map(SessionContext::for_user).unwrap_or_default();
	for value in manager.get_all_setting_values(&ctx).await? {
		println!("{} = {}", value.name, value.value);
	}
	for scope in store.snapshot().iter().map(SettingRecord::scope) {
		debug!("Stored row at {}", scope);
	}

	Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
	tracing_subscriber::fmt()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.with_target(false)
		.init();

	let res = match Config::from_env() {
		Ok(config) => run(config).await,
		Err(err) => Err(err),
	};
	match res {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			error!("{}", err);
			ExitCode::FAILURE
		}
	}
}

// vim: ts=4
