//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → AgentConfig (validated, immutable)
//!     → HttpSource / SyncClient / host server
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the agent restarts to pick up changes
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{AgentConfig, AgentSection, HttpConfig, ObservabilityConfig, ServerConfig};
pub use validation::ValidationError;
