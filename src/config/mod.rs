//! Configuration loading and validation
//!
//! The synchronizer takes one explicit TOML configuration value; nothing is
//! resolved from ambient global state. Remote endpoints default to the
//! public archive and only need to be set for mirrors or tests.

mod parser;
mod types;
mod validation;

pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use types::{Config, DataConfig, RemoteConfig};
pub use validation::validate;
