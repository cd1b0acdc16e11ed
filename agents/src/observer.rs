use crate::search::SearchProgress;
use battle_core::{Action, Geometry, Role};
use std::fmt;
use std::time::Duration;
use tracing::{event, Level};

/// Lifecycle events an agent reports while playing a match.
#[derive(Debug, Clone, PartialEq)]
pub enum AgentEvent {
    /// `initialize` accepted a configuration
    Started {
        role: Role,
        geometry: Geometry,
        play_clock: Duration,
    },
    /// `select_action` was called without a previous action
    FirstCall,
    /// The previous action was attributed to `mover`
    Observed { mover: Role, action: Action },
    /// An observed move was not legal for `mover` and was not applied
    Rejected { mover: Role, action: Action },
    /// A search iteration completed
    SearchDepth(SearchProgress),
    /// The action returned from `select_action`
    Chose { action: Action },
    /// `finalize` was called
    Finished { last_action: Option<Action> },
}

pub type EventCallback = Box<dyn Fn(&AgentEvent) + Send>;

/// Injected observability hook. Every event also goes to `tracing`.
#[derive(Default)]
pub struct Observer {
    callback: Option<EventCallback>,
}

impl Observer {
    pub fn new(callback: EventCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn emit(&self, agent: &str, event: AgentEvent) {
        match &event {
            AgentEvent::Rejected { mover, action } => {
                event!(Level::WARN, agent, %mover, %action, "Ignoring illegal observed move");
            }
            AgentEvent::SearchDepth(progress) => {
                event!(
                    Level::DEBUG,
                    agent,
                    depth = progress.depth,
                    score = progress.score,
                    nodes = progress.nodes,
                    time_ms = progress.time_ms,
                    "Search depth complete"
                );
            }
            other => event!(Level::TRACE, agent, kind = ?other, "Agent event"),
        }

        if let Some(callback) = &self.callback {
            callback(&event);
        }
    }
}

impl fmt::Debug for Observer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}
