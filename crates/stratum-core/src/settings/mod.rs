//! Settings subsystem with hierarchical resolution, encryption, and caching
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): Scopes, definitions and the definition registry
//! - **Provider** (`provider.rs`): Definitions loaded from static data
//! - **Encryption** (`encryption.rs`): Encryption of values at rest
//! - **Cache** (`cache.rs`): Per-scope cache of stored rows
//! - **Resolve** (`resolve.rs`): Resolution and write planning without I/O
//! - **Manager** (`manager.rs`): SettingManager with async and blocking API
//!
//! # Levels
//!
//! A value may be stored at three levels:
//! - **Application**: applies to every company and user
//! - **Company**: overrides the application value for one company
//! - **User**: overrides the company value for one user
//!
//! Inherited settings fall back level by level to the definition default.
//! Settings that are not inherited fall back straight to the default.

pub mod cache;
pub mod encryption;
pub mod manager;
pub mod provider;
pub(crate) mod resolve;
pub mod types;

pub use cache::{LruSettingCache, ScopeSettings, SettingCache};
pub use encryption::{EncryptionConfig, SettingEncryptionService};
pub use manager::{SettingManager, SettingManagerBuilder};
pub use provider::StaticSettingProvider;
pub use types::{
	FrozenSettingsRegistry, SettingDefinition, SettingDefinitionBuilder, SettingProvider,
	SettingScopes, SettingValue, SettingsRegistry,
};

// vim: ts=4
