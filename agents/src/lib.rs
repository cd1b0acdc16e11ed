pub mod alpha_beta;
pub mod arena;
pub mod config;
pub mod errors;
pub mod evaluation;
pub mod observer;
pub mod random;
pub mod search;
pub mod session;
pub mod transposition;
pub mod turn;

use battle_core::Action;

/// Lifecycle of a match-playing agent.
///
/// The host calls `initialize` once, then `select_action` once per half-move
/// for *both* players, and finally `finalize`. `last_action` is the action
/// played on the previous half-move, absent on the first call. When it is not
/// this agent's turn the answer is ignored, and [`Action::Noop`] is expected.
pub trait Agent {
    /// Starts a match. Invalid configurations are rejected and leave the
    /// agent uninitialized.
    fn initialize(&mut self, config: MatchConfig) -> Result<(), AgentError>;

    /// Answers one call from the host.
    fn select_action(&mut self, last_action: Option<Action>) -> Result<Action, AgentError>;

    /// Ends the match and drops per-match state. Calling it twice is harmless.
    fn finalize(&mut self, last_action: Option<Action>);

    /// Get the agent's name
    fn name(&self) -> &str;
}

pub use alpha_beta::{AlphaBetaAgent, SearchSettings};
pub use arena::{Match, MatchOutcome, MatchResult, MatchSettings, Violation};
pub use config::{AgentConfig, MatchConfig};
pub use errors::{AgentConfigError, AgentError};
pub use evaluation::*;
pub use observer::{AgentEvent, EventCallback};
pub use random::{LegalRandomAgent, RandomAgent};
pub use search::*;
