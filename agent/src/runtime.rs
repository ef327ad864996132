//! Cooperative worker runtime driver.
//!
//! A thin stand-in for the host's single-threaded event loop: it owns
//! the cache storage, the network interface, and the agent, delivers the
//! three lifecycle events, and routes network outcomes back in. Each
//! dispatch returns the handle the host observes to keep the worker
//! alive until the handler's pending work settles.

use crate::agent::{AgentError, OfflineCacheAgent};
use crate::cache::CacheStorage;
use crate::events::{ActivateEvent, Completion, FetchEvent, InstallEvent, ResponseHandle};
use crate::fetch::{FetchOutcome, FetchTicket, NetworkHost, Request};

/// Worker runtime hosting one agent generation.
pub struct WorkerRuntime<N: NetworkHost> {
    caches: CacheStorage,
    net: N,
    agent: OfflineCacheAgent,
}

impl<N: NetworkHost> WorkerRuntime<N> {
    /// Runtime with empty cache storage.
    pub fn new(agent: OfflineCacheAgent, net: N) -> Self {
        Self::with_storage(agent, net, CacheStorage::new())
    }

    /// Runtime over existing storage (e.g. restored from a snapshot).
    pub fn with_storage(agent: OfflineCacheAgent, net: N, caches: CacheStorage) -> Self {
        Self { caches, net, agent }
    }

    /// Deliver `install`.
    pub fn install(&mut self) -> Result<Completion, AgentError> {
        let event = InstallEvent::new();
        let completion = event.completion();
        self.agent
            .handle_install(&event, &mut self.caches, &mut self.net)?;
        Ok(completion)
    }

    /// Deliver `activate`.
    ///
    /// A failed store sweep surfaces twice, deliberately: the returned
    /// completion is rejected (what the page-facing host observes) and
    /// the error comes back to the caller.
    pub fn activate(&mut self) -> Result<Completion, AgentError> {
        let event = ActivateEvent::new();
        let completion = event.completion();
        self.agent.handle_activate(&event, &mut self.caches)?;
        Ok(completion)
    }

    /// Deliver `fetch` for one outgoing page request.
    pub fn fetch(&mut self, request: Request) -> ResponseHandle {
        let event = FetchEvent::new(request);
        let handle = event.handle();
        self.agent.handle_fetch(&event, &self.caches, &mut self.net);
        handle
    }

    /// Deliver a settled network outcome for `ticket`.
    pub fn deliver(&mut self, ticket: FetchTicket, outcome: FetchOutcome) -> Result<(), AgentError> {
        self.agent.on_fetch_settled(ticket, outcome, &mut self.caches)
    }

    /// The agent hosted by this runtime.
    pub fn agent(&self) -> &OfflineCacheAgent {
        &self.agent
    }

    /// The origin's cache storage.
    pub fn caches(&self) -> &CacheStorage {
        &self.caches
    }

    /// The host network interface.
    pub fn network(&self) -> &N {
        &self.net
    }
}

// ── Tests ───────────────────────────────────────────────────
