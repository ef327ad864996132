//! Offline cache agent for a browser worker runtime.
//!
//! The agent is installed once per origin and runs in a worker context
//! separate from the page. It reacts to three host-delivered lifecycle
//! signals and manages one named cache store holding a fixed asset list:
//!
//! - install: populate the version-named store best-effort (per-asset
//!   failures are logged and swallowed), then request immediate takeover
//! - activate: delete every store not named for this generation
//! - fetch: serve cache-first, fall back to one live network fetch on a
//!   miss, never write the result back
//!
//! # Architecture
//!
//! - `assets`: build-time asset manifest + agent configuration
//! - `fetch`: request/response types and the host network interface
//! - `cache`: named cache stores with a postcard snapshot for host persistence
//! - `events`: install/activate/fetch events and completion handles
//! - `lifecycle`: agent generation state machine (skip-waiting aware)
//! - `agent`: the offline cache agent itself
//! - `runtime`: cooperative driver delivering events and network outcomes
//!
//! Logging goes through the `log` facade; the host installs whatever
//! logger backs its console.

#![no_std]

extern crate alloc;

pub mod agent;
pub mod assets;
pub mod cache;
pub mod events;
pub mod fetch;
pub mod lifecycle;
pub mod runtime;

pub use agent::{AgentError, OfflineCacheAgent};
pub use assets::{AgentConfig, CACHE_ASSETS, CACHE_NAME};
pub use cache::{Cache, CacheError, CacheStorage, CachedResponse};
pub use events::{
    ActivateEvent, Completion, CompletionState, EventType, FetchEvent, InstallEvent, ResponseHandle,
};
pub use fetch::{
    FetchOutcome, FetchTicket, NetworkError, NetworkHost, Request, RequestMethod, Response,
};
pub use lifecycle::{AgentState, Lifecycle, LifecycleError};
pub use runtime::WorkerRuntime;
