//! Hierarchical multi-tenant setting resolution for the Stratum settings engine.
//!
//! Settings are declared once in a registry and resolved per user, company or
//! application through a [`SettingManager`](settings::SettingManager), which
//! caches stored values, encrypts sensitive ones and never persists a value
//! equal to the one it would inherit.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod config;
pub mod prelude;
pub mod settings;

pub use config::SettingManagerOpts;
pub use settings::{SettingManager, SettingManagerBuilder};

// vim: ts=4
