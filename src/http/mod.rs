//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, trace layer)
//!     → SyncClient snapshot lookup (host, path)
//!     → redirect / page / 404
//! ```

pub mod server;

pub use server::{build_router, HttpServer};
