//! Worker events and completion handles.
//!
//! Each host-delivered event carries a promise-like handle that the host
//! observes to keep the worker alive until the handler's pending work
//! settles. Handles are shared (`Arc`) so a handler can resolve them
//! long after it returned — the fetch handler does exactly that on a
//! cache miss.

use alloc::string::String;
use alloc::sync::Arc;
use spin::Mutex;

use crate::fetch::{FetchOutcome, Request, Response};

// ── Completion handles ──────────────────────────────────────

/// Event kinds delivered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    /// New agent generation registered.
    Install,
    /// This generation takes control.
    Activate,
    /// Outgoing request from the controlled page.
    Fetch,
}

/// Settlement state of a completion handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionState {
    /// Work still outstanding; the host keeps the worker alive.
    Pending,
    /// Handler finished successfully.
    Fulfilled,
    /// Handler failed; the reason is surfaced to the host.
    Rejected(String),
}

/// Shared, promise-like completion signal (the wait-until pattern).
#[derive(Debug, Clone)]
pub struct Completion(Arc<Mutex<CompletionState>>);

impl Completion {
    /// Create a pending completion.
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(CompletionState::Pending)))
    }

    /// Settle successfully. Only the first settlement wins.
    pub fn fulfill(&self) {
        let mut state = self.0.lock();
        if matches!(*state, CompletionState::Pending) {
            *state = CompletionState::Fulfilled;
        }
    }

    /// Settle with a failure reason. Only the first settlement wins.
    pub fn reject(&self, reason: impl Into<String>) {
        let mut state = self.0.lock();
        if matches!(*state, CompletionState::Pending) {
            *state = CompletionState::Rejected(reason.into());
        }
    }

    /// Current settlement state.
    pub fn state(&self) -> CompletionState {
        self.0.lock().clone()
    }

    /// Whether the completion has settled either way.
    pub fn is_settled(&self) -> bool {
        !matches!(self.state(), CompletionState::Pending)
    }
}

impl Default for Completion {
    fn default() -> Self {
        Self::new()
    }
}

// ── Lifecycle events ────────────────────────────────────────

/// Install event: a new agent generation was registered.
#[derive(Debug, Clone)]
pub struct InstallEvent {
    completion: Completion,
}

impl InstallEvent {
    /// Create a new install event with a pending completion.
    pub fn new() -> Self {
        Self {
            completion: Completion::new(),
        }
    }

    /// Event kind.
    pub fn event_type(&self) -> EventType {
        EventType::Install
    }

    /// Handle the host observes until install work settles.
    pub fn completion(&self) -> Completion {
        self.completion.clone()
    }
}

impl Default for InstallEvent {
    fn default() -> Self {
        Self::new()
    }
}

/// Activate event: this agent generation takes control.
#[derive(Debug, Clone)]
pub struct ActivateEvent {
    completion: Completion,
}

impl ActivateEvent {
    /// Create a new activate event with a pending completion.
    pub fn new() -> Self {
        Self {
            completion: Completion::new(),
        }
    }

    /// Event kind.
    pub fn event_type(&self) -> EventType {
        EventType::Activate
    }

    /// Handle the host observes until the activation sweep settles.
    pub fn completion(&self) -> Completion {
        self.completion.clone()
    }
}

impl Default for ActivateEvent {
    fn default() -> Self {
        Self::new()
    }
}

// ── Fetch event ─────────────────────────────────────────────

/// Settlement state of a fetch response.
#[derive(Debug, Clone)]
enum ResponseState {
    Pending,
    Settled(FetchOutcome),
}

/// Handle through which a fetch event's response is eventually delivered.
#[derive(Debug, Clone)]
pub struct ResponseHandle(Arc<Mutex<ResponseState>>);

impl ResponseHandle {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(ResponseState::Pending)))
    }

    /// Deliver the outcome. Only the first settlement wins.
    pub fn respond(&self, outcome: FetchOutcome) {
        let mut state = self.0.lock();
        if matches!(*state, ResponseState::Pending) {
            *state = ResponseState::Settled(outcome);
        }
    }

    /// The outcome, if settled.
    pub fn outcome(&self) -> Option<FetchOutcome> {
        match &*self.0.lock() {
            ResponseState::Pending => None,
            ResponseState::Settled(outcome) => Some(outcome.clone()),
        }
    }

    /// Whether a response has been delivered.
    pub fn is_settled(&self) -> bool {
        self.outcome().is_some()
    }
}

/// Fetch event: one outgoing request from the controlled page.
#[derive(Debug, Clone)]
pub struct FetchEvent {
    request: Request,
    handle: ResponseHandle,
}

impl FetchEvent {
    /// Create a fetch event for `request`.
    pub fn new(request: Request) -> Self {
        Self {
            request,
            handle: ResponseHandle::new(),
        }
    }

    /// Event kind.
    pub fn event_type(&self) -> EventType {
        EventType::Fetch
    }

    /// The intercepted request.
    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Handle through which the response arrives.
    pub fn handle(&self) -> ResponseHandle {
        self.handle.clone()
    }

    /// Respond immediately with a response (the cache-hit path).
    pub fn respond_with(&self, response: Response) {
        self.handle.respond(Ok(response));
    }
}

// ── Tests ───────────────────────────────────────────────────
