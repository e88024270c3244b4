//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse, deserialize, environment overrides)
//!     → validation.rs (semantic checks)
//!     → FunderConfig (validated, immutable)
//!     → read once when the funding service is constructed
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a new service instance
//! - All fields have defaults to allow minimal configs
//! - Secrets (the funder key) never live in the file

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, load_or_default, ConfigError};
pub use schema::{
    BlockchainConfig, FunderConfig, FundingConfig, GasStationConfig, GasStationSource,
    ObservabilityConfig, RetryConfig,
};
