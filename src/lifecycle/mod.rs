//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load config → Init logging/metrics → initialize() → spawn poll loop → serve
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C → Shutdown::trigger → poll loop exits → server drains → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: a failed initial sync is fatal, the agent never serves empty rules
//! - Shutdown does not abort an in-flight refresh

pub mod shutdown;

pub use shutdown::{Shutdown, ShutdownSignal};
