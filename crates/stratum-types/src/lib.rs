//! Shared types, store traits, and core error handling for the Stratum settings engine.
//!
//! This crate contains the foundational types that are shared between the
//! engine crate and all store adapter implementations. Keeping them separate
//! lets adapter crates depend on the store contract without pulling in the
//! resolution engine.

pub mod company_store;
pub mod error;
pub mod prelude;
pub mod setting_store;
pub mod types;

// vim: ts=4
