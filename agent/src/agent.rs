//! The offline cache agent.
//!
//! Reacts to the three host-delivered events: install populates the
//! version-named store best-effort and signals immediate takeover,
//! activate sweeps superseded stores, fetch serves cache-first with a
//! live network fallback and no write-back on miss.

use alloc::string::{String, ToString};
use hashbrown::HashMap;

use crate::assets::AgentConfig;
use crate::cache::{CacheError, CacheStorage, CachedResponse};
use crate::events::{ActivateEvent, Completion, FetchEvent, InstallEvent, ResponseHandle};
use crate::fetch::{FetchOutcome, FetchTicket, NetworkHost, Request};
use crate::lifecycle::{AgentState, Lifecycle, LifecycleError};

// ── Errors ──────────────────────────────────────────────────

/// Agent error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentError {
    /// Lifecycle transition rejected.
    Lifecycle(LifecycleError),
    /// Cache storage failure.
    Cache(CacheError),
}

impl From<LifecycleError> for AgentError {
    fn from(err: LifecycleError) -> Self {
        Self::Lifecycle(err)
    }
}

impl From<CacheError> for AgentError {
    fn from(err: CacheError) -> Self {
        Self::Cache(err)
    }
}

impl core::fmt::Display for AgentError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            AgentError::Lifecycle(err) => write!(f, "{}", err),
            AgentError::Cache(err) => write!(f, "{}", err),
        }
    }
}

// ── Agent ───────────────────────────────────────────────────

/// What a settled ticket was for.
enum Pending {
    /// Install-time asset fetch for this URL.
    Asset(String),
    /// Cache-miss passthrough for a page request.
    Passthrough(ResponseHandle),
}

/// The offline cache agent for one origin.
///
/// Stateless across invocations except for the cache store it shares
/// with the host and the bookkeeping for outcomes it still waits on.
pub struct OfflineCacheAgent {
    config: AgentConfig,
    lifecycle: Lifecycle,
    /// In-flight network tickets and what they settle.
    pending: HashMap<FetchTicket, Pending>,
    /// Install completion, held until the last asset settles.
    install: Option<Completion>,
}

impl OfflineCacheAgent {
    /// Agent with the given configuration.
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::new(),
            pending: HashMap::new(),
            install: None,
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> AgentState {
        self.lifecycle.state()
    }

    /// Whether the agent asked the host for immediate activation.
    pub fn skip_requested(&self) -> bool {
        self.lifecycle.skip_requested()
    }

    /// Name of the current generation's cache store.
    pub fn cache_name(&self) -> &str {
        &self.config.cache_name
    }

    /// Install: eagerly fetch and cache the asset list.
    ///
    /// All per-asset fetches go out before the handler returns; each one
    /// settles independently through [`Self::on_fetch_settled`]. The
    /// install completion fulfills once every asset has settled — asset
    /// failures are logged and swallowed, never propagated.
    pub fn handle_install(
        &mut self,
        event: &InstallEvent,
        caches: &mut CacheStorage,
        net: &mut dyn NetworkHost,
    ) -> Result<(), AgentError> {
        self.lifecycle.begin_install()?;
        caches.open(&self.config.cache_name);

        log::info!("caching {} assets", self.config.assets.len());

        let completion = event.completion();
        if self.config.assets.is_empty() {
            self.finish_install(&completion)?;
            return Ok(());
        }

        let assets = self.config.assets.clone();
        for url in assets {
            let ticket = net.begin_fetch(Request::get(url.clone()));
            self.pending.insert(ticket, Pending::Asset(url));
        }
        self.install = Some(completion);

        Ok(())
    }

    /// Activate: delete every cache store not named for this generation.
    ///
    /// Deletion failures are not isolated per store; the first error
    /// rejects the whole activation and retires the generation.
    pub fn handle_activate(
        &mut self,
        event: &ActivateEvent,
        caches: &mut CacheStorage,
    ) -> Result<(), AgentError> {
        self.lifecycle.begin_activate()?;

        match self.sweep_old_stores(caches) {
            Ok(()) => {
                self.lifecycle.finish_activate()?;
                event.completion().fulfill();
                Ok(())
            }
            Err(err) => {
                self.lifecycle.fail_activate()?;
                event.completion().reject(err.to_string());
                Err(err.into())
            }
        }
    }

    /// Fetch: serve from cache when possible, otherwise go to the network.
    ///
    /// A hit is answered from the store without touching the network. A
    /// miss goes out as exactly one live fetch whose outcome settles the
    /// event's response handle later; the result is never written back.
    pub fn handle_fetch(
        &mut self,
        event: &FetchEvent,
        caches: &CacheStorage,
        net: &mut dyn NetworkHost,
    ) {
        match caches.match_url(&event.request().url) {
            Some(hit) => event.respond_with(hit.to_response()),
            None => {
                let ticket = net.begin_fetch(event.request().clone());
                self.pending.insert(ticket, Pending::Passthrough(event.handle()));
            }
        }
    }

    /// Host delivery of one network outcome.
    ///
    /// Unknown tickets (late, repeated, or never ours) are ignored.
    pub fn on_fetch_settled(
        &mut self,
        ticket: FetchTicket,
        outcome: FetchOutcome,
        caches: &mut CacheStorage,
    ) -> Result<(), AgentError> {
        match self.pending.remove(&ticket) {
            Some(Pending::Asset(url)) => {
                self.settle_asset(&url, outcome, caches);
                if !self.has_pending_assets() {
                    if let Some(completion) = self.install.take() {
                        self.finish_install(&completion)?;
                    }
                }
                Ok(())
            }
            Some(Pending::Passthrough(handle)) => {
                handle.respond(outcome);
                Ok(())
            }
            None => Ok(()),
        }
    }

    /// Delete every store whose name is not the current one.
    fn sweep_old_stores(&self, caches: &mut CacheStorage) -> Result<(), CacheError> {
        for name in caches.keys() {
            if name != self.config.cache_name {
                log::info!("removing old cache: {}", name);
                caches.delete(&name)?;
            }
        }
        Ok(())
    }

    /// Cache one settled asset, best-effort.
    fn settle_asset(&self, url: &str, outcome: FetchOutcome, caches: &mut CacheStorage) {
        match outcome {
            Ok(response) if response.ok() => {
                let captured = CachedResponse::capture(url, &response);
                if let Err(err) = caches.put(&self.config.cache_name, url, captured) {
                    log::warn!("failed to cache {}: {}", url, err);
                }
            }
            Ok(response) => log::warn!("failed to cache {}: {}", url, response.status),
            Err(err) => log::warn!("failed to cache {}: {}", url, err),
        }
    }

    /// Every asset settled: ask for immediate takeover, fulfill install.
    fn finish_install(&mut self, completion: &Completion) -> Result<(), AgentError> {
        self.lifecycle.skip_waiting();
        self.lifecycle.finish_install()?;
        completion.fulfill();
        Ok(())
    }

    fn has_pending_assets(&self) -> bool {
        self.pending
            .values()
            .any(|pending| matches!(pending, Pending::Asset(_)))
    }
}

impl Default for OfflineCacheAgent {
    fn default() -> Self {
        Self::new(AgentConfig::default())
    }
}

// ── Tests ───────────────────────────────────────────────────
