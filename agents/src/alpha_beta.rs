use crate::observer::{AgentEvent, EventCallback, Observer};
use crate::search::{search_with_table, SearchLimits, SearchProgress};
use crate::session::TrackedSession;
use crate::transposition::TranspositionTable;
use crate::{Agent, AgentError, MatchConfig};
use battle_core::Action;
use std::time::Duration;
use tracing::{debug, instrument};

/// Tuning for [`AlphaBetaAgent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchSettings {
    /// Transposition table size, allocated per match
    pub tt_size_mb: usize,
    /// Time kept back from the play clock for the round trip to the host
    pub safety_margin: Duration,
    /// Optional cap on the iterative deepening depth
    pub max_depth: Option<u8>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            tt_size_mb: 16,
            safety_margin: Duration::from_millis(500),
            max_depth: None,
        }
    }
}

/// Tracks the board and answers with an iterative deepening alpha-beta
/// search bounded by the play clock.
#[derive(Debug)]
pub struct AlphaBetaAgent {
    name: String,
    settings: SearchSettings,
    observer: Observer,
    session: Option<TrackedSession>,
    tt: Option<TranspositionTable>,
}

impl AlphaBetaAgent {
    pub fn new(settings: SearchSettings) -> Self {
        let name = match settings.max_depth {
            Some(depth) => format!("AlphaBeta(depth={})", depth),
            None => "AlphaBeta(clock)".to_string(),
        };
        AlphaBetaAgent {
            name,
            settings,
            observer: Observer::default(),
            session: None,
            tt: None,
        }
    }

    pub fn with_depth(depth: u8) -> Self {
        Self::new(SearchSettings {
            max_depth: Some(depth),
            ..SearchSettings::default()
        })
    }

    pub fn with_observer(mut self, callback: EventCallback) -> Self {
        self.observer = Observer::new(callback);
        self
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }
}

impl Default for AlphaBetaAgent {
    fn default() -> Self {
        Self::new(SearchSettings::default())
    }
}

impl Agent for AlphaBetaAgent {
    #[instrument(level = "debug", skip_all, fields(agent = %self.name, role = %config.role))]
    fn initialize(&mut self, config: MatchConfig) -> Result<(), AgentError> {
        self.session = None;
        self.tt = None;
        self.session = Some(TrackedSession::start(config, &self.name, &self.observer)?);
        self.tt = Some(TranspositionTable::new(self.settings.tt_size_mb));
        Ok(())
    }

    fn select_action(&mut self, last_action: Option<Action>) -> Result<Action, AgentError> {
        let session = self.session.as_mut().ok_or(AgentError::NotInitialized)?;
        let tt = self.tt.as_mut().ok_or(AgentError::NotInitialized)?;
        let turn = session.begin_turn(last_action, &self.name, &self.observer);

        let action = if turn.own_turn {
            tt.new_search();
            let limits = SearchLimits::from_play_clock(
                session.session().play_clock(),
                self.settings.safety_margin,
            )
            .with_max_depth(self.settings.max_depth);

            let observer = &self.observer;
            let name = self.name.as_str();
            let report = |progress: &SearchProgress| {
                observer.emit(name, AgentEvent::SearchDepth(progress.clone()));
            };

            let report: &dyn Fn(&SearchProgress) = &report;
            let result = search_with_table(session.world(), limits, tt, Some(report));
            debug!(
                agent = name,
                depth = result.depth,
                score = result.score,
                nodes = result.nodes,
                stopped = result.stopped,
                "Search finished"
            );
            result.best_move.map_or(Action::Noop, Action::Play)
        } else {
            Action::Noop
        };

        self.observer.emit(&self.name, AgentEvent::Chose { action });
        Ok(action)
    }

    fn finalize(&mut self, last_action: Option<Action>) {
        self.tt = None;
        if self.session.take().is_some() {
            self.observer
                .emit(&self.name, AgentEvent::Finished { last_action });
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
