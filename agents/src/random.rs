use crate::observer::{AgentEvent, EventCallback, Observer};
use crate::session::{Session, TrackedSession};
use crate::{Agent, AgentError, MatchConfig};
use battle_core::{Action, Coord};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::instrument;

/// Baseline opponent: on its turn it plays two uniformly random squares.
///
/// It keeps no board, so the move is most likely illegal. It is meant as a
/// protocol smoke test and as the reference for the turn bookkeeping.
#[derive(Debug)]
pub struct RandomAgent {
    name: String,
    rng: StdRng,
    observer: Observer,
    session: Option<Session>,
}

impl RandomAgent {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        RandomAgent {
            name: "Random".to_string(),
            rng,
            observer: Observer::default(),
            session: None,
        }
    }

    pub fn with_observer(mut self, callback: EventCallback) -> Self {
        self.observer = Observer::new(callback);
        self
    }
}

impl Default for RandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for RandomAgent {
    #[instrument(level = "debug", skip_all, fields(agent = %self.name, role = %config.role))]
    fn initialize(&mut self, config: MatchConfig) -> Result<(), AgentError> {
        self.session = None;
        self.session = Some(Session::start(config, &self.name, &self.observer)?);
        Ok(())
    }

    fn select_action(&mut self, last_action: Option<Action>) -> Result<Action, AgentError> {
        let session = self.session.as_mut().ok_or(AgentError::NotInitialized)?;
        let turn = session.begin_turn(last_action, &self.name, &self.observer);

        let action = if turn.own_turn {
            let geometry = session.geometry();
            let from = Coord::new(
                self.rng.gen_range(1..=geometry.width),
                self.rng.gen_range(1..=geometry.height),
            );
            let to = Coord::new(
                self.rng.gen_range(1..=geometry.width),
                self.rng.gen_range(1..=geometry.height),
            );
            Action::play(from, to)
        } else {
            Action::Noop
        };

        self.observer.emit(&self.name, AgentEvent::Chose { action });
        Ok(action)
    }

    fn finalize(&mut self, last_action: Option<Action>) {
        if self.session.take().is_some() {
            self.observer
                .emit(&self.name, AgentEvent::Finished { last_action });
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Tracks the board and plays a uniformly random legal move on its turn.
#[derive(Debug)]
pub struct LegalRandomAgent {
    name: String,
    rng: StdRng,
    observer: Observer,
    session: Option<TrackedSession>,
}

impl LegalRandomAgent {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        LegalRandomAgent {
            name: "LegalRandom".to_string(),
            rng,
            observer: Observer::default(),
            session: None,
        }
    }

    pub fn with_observer(mut self, callback: EventCallback) -> Self {
        self.observer = Observer::new(callback);
        self
    }
}

impl Default for LegalRandomAgent {
    fn default() -> Self {
        Self::new()
    }
}

impl Agent for LegalRandomAgent {
    #[instrument(level = "debug", skip_all, fields(agent = %self.name, role = %config.role))]
    fn initialize(&mut self, config: MatchConfig) -> Result<(), AgentError> {
        self.session = None;
        self.session = Some(TrackedSession::start(config, &self.name, &self.observer)?);
        Ok(())
    }

    fn select_action(&mut self, last_action: Option<Action>) -> Result<Action, AgentError> {
        let session = self.session.as_mut().ok_or(AgentError::NotInitialized)?;
        let turn = session.begin_turn(last_action, &self.name, &self.observer);

        let action = if turn.own_turn {
            let moves = session.world().legal_moves(session.session().role());
            moves
                .choose(&mut self.rng)
                .map_or(Action::Noop, |mv| Action::Play(*mv))
        } else {
            Action::Noop
        };

        self.observer.emit(&self.name, AgentEvent::Chose { action });
        Ok(action)
    }

    fn finalize(&mut self, last_action: Option<Action>) {
        if self.session.take().is_some() {
            self.observer
                .emit(&self.name, AgentEvent::Finished { last_action });
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}
