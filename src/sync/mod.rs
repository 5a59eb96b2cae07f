//! Snapshot synchronization subsystem.
//!
//! # Data Flow
//! ```text
//! poller.rs (interval tick) ─┐
//! SyncClient::refresh() ─────┼─▶ coordinator.rs
//! SyncClient::initialize() ──┘      → RemoteSource::version()
//!                                   → (changed) fetch_all + insert into fresh matchers
//!                                   → ArcSwap::store(new Snapshot)
//!                                   → reporter.rs (status / hit)
//!
//! SyncClient::match_*() ──▶ ArcSwap::load() ──▶ Snapshot ──▶ matcher.find()
//! ```
//!
//! # Design Decisions
//! - One writer (the coordinator), any number of lock-free readers
//! - Single-flight via try-acquire; losers return `Skipped` at once
//! - A failed refresh means stale rules, never missing rules

pub mod client;
pub mod coordinator;
pub mod poller;
pub mod reporter;
pub mod snapshot;
pub mod types;

pub use client::SyncClient;
pub use coordinator::RefreshCoordinator;
pub use snapshot::Snapshot;
pub use types::{AgentIdentity, RefreshOutcome, SyncError, SyncResult};
