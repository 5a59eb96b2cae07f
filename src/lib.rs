//! Rule agent library: keeps a local snapshot of redirect and page rules in
//! sync with a remote manager.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod matching;
pub mod observability;
pub mod remote;
pub mod sync;

pub use config::AgentConfig;
pub use http::HttpServer;
pub use lifecycle::{Shutdown, ShutdownSignal};
pub use remote::{HttpSource, RemoteSource};
pub use sync::{RefreshOutcome, SyncClient, SyncError};
