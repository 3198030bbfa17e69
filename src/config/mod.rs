//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → chain clients and handlers built once at startup
//! ```
//!
//! All fields have defaults so a minimal (or absent) file works.

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    EvmConfig, ListenerConfig, MoveChainConfig, ObservabilityConfig, RelayConfig,
    SecurityConfig, TimeoutConfig,
};
