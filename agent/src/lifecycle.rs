//! Agent generation lifecycle.
//!
//! One agent generation walks Parsed → Installing → Installed →
//! Activating → Activated; a failed activation retires it to Redundant.
//! Skip-waiting is a flag the install path raises so the host activates
//! the generation immediately instead of holding it in Installed until
//! the previous generation releases its pages.

// ── States ──────────────────────────────────────────────────

/// Agent generation states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    /// Registered, nothing dispatched yet.
    Parsed,
    /// `install` dispatched; asset caching in flight.
    Installing,
    /// Install settled; waiting to take control.
    Installed,
    /// `activate` dispatched; sweeping superseded stores.
    Activating,
    /// Controlling the origin's pages.
    Activated,
    /// Superseded or failed; no longer eligible to run.
    Redundant,
}

impl Default for AgentState {
    fn default() -> Self {
        Self::Parsed
    }
}

/// Lifecycle error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleError {
    /// The requested transition is not part of the lifecycle.
    InvalidTransition {
        /// State the agent was in.
        from: AgentState,
        /// State that was requested.
        to: AgentState,
    },
}

impl core::fmt::Display for LifecycleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LifecycleError::InvalidTransition { from, to } => {
                write!(f, "invalid lifecycle transition: {:?} -> {:?}", from, to)
            }
        }
    }
}

/// Check if a state transition is part of the lifecycle.
fn is_valid_transition(from: AgentState, to: AgentState) -> bool {
    use AgentState::*;

    matches!(
        (from, to),
        (Parsed, Installing)
            | (Installing, Installed)
            | (Installed, Activating)
            | (Activating, Activated)
            | (Activating, Redundant) // activation sweep failed
    )
}

// ── Lifecycle ───────────────────────────────────────────────

/// Lifecycle state for one agent generation.
#[derive(Debug, Default)]
pub struct Lifecycle {
    state: AgentState,
    skip_waiting: bool,
}

impl Lifecycle {
    /// Fresh lifecycle in `Parsed`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> AgentState {
        self.state
    }

    /// Whether this generation is controlling pages.
    pub fn is_active(&self) -> bool {
        self.state == AgentState::Activated
    }

    /// Whether immediate activation was requested.
    pub fn skip_requested(&self) -> bool {
        self.skip_waiting
    }

    /// Request immediate activation once install completes.
    pub fn skip_waiting(&mut self) {
        self.skip_waiting = true;
    }

    /// `install` delivered.
    pub fn begin_install(&mut self) -> Result<(), LifecycleError> {
        self.transition(AgentState::Installing)
    }

    /// Install work settled.
    pub fn finish_install(&mut self) -> Result<(), LifecycleError> {
        self.transition(AgentState::Installed)
    }

    /// `activate` delivered.
    pub fn begin_activate(&mut self) -> Result<(), LifecycleError> {
        self.transition(AgentState::Activating)
    }

    /// Activation sweep completed; this generation controls the origin.
    pub fn finish_activate(&mut self) -> Result<(), LifecycleError> {
        self.transition(AgentState::Activated)
    }

    /// Activation sweep failed; retire the generation.
    pub fn fail_activate(&mut self) -> Result<(), LifecycleError> {
        self.transition(AgentState::Redundant)
    }

    fn transition(&mut self, to: AgentState) -> Result<(), LifecycleError> {
        if !is_valid_transition(self.state, to) {
            return Err(LifecycleError::InvalidTransition {
                from: self.state,
                to,
            });
        }
        self.state = to;
        Ok(())
    }
}

// ── Tests ───────────────────────────────────────────────────
