pub use stratum_types::prelude::*;

// vim: ts=4
