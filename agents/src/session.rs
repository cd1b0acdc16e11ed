use crate::config::MatchConfig;
use crate::observer::{AgentEvent, Observer};
use crate::turn::{Turn, TurnTracker};
use battle_core::{Action, BattleState, ConfigError, Geometry, Role};
use std::time::Duration;

/// Per-match state owned by one agent between `initialize` and `finalize`.
#[derive(Debug, Clone)]
pub struct Session {
    config: MatchConfig,
    turn: TurnTracker,
}

impl Session {
    /// Validates the configuration and reports the start of the match.
    pub fn start(config: MatchConfig, agent: &str, observer: &Observer) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::open(config, agent, observer))
    }

    /// Starts a session on a configuration the caller already validated.
    fn open(config: MatchConfig, agent: &str, observer: &Observer) -> Self {
        observer.emit(
            agent,
            AgentEvent::Started {
                role: config.role,
                geometry: config.geometry,
                play_clock: config.play_clock,
            },
        );
        Self {
            turn: TurnTracker::new(config.role),
            config,
        }
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn role(&self) -> Role {
        self.config.role
    }

    pub fn geometry(&self) -> Geometry {
        self.config.geometry
    }

    pub fn play_clock(&self) -> Duration {
        self.config.play_clock
    }

    /// Attributes the received action, flips the turn and reports both.
    pub fn begin_turn(&mut self, last_action: Option<Action>, agent: &str, observer: &Observer) -> Turn {
        let turn = self.turn.advance(last_action.as_ref());
        match (last_action, turn.last_mover) {
            (Some(action), Some(mover)) => observer.emit(agent, AgentEvent::Observed { mover, action }),
            _ => observer.emit(agent, AgentEvent::FirstCall),
        }
        turn
    }
}

/// A [`Session`] that also keeps a board in sync with the moves it observes.
#[derive(Debug, Clone)]
pub struct TrackedSession {
    session: Session,
    world: BattleState,
}

impl TrackedSession {
    pub fn start(config: MatchConfig, agent: &str, observer: &Observer) -> Result<Self, ConfigError> {
        // Building the board is the validation.
        let world = config.starting_state()?;
        let session = Session::open(config, agent, observer);
        Ok(Self { session, world })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn world(&self) -> &BattleState {
        &self.world
    }

    /// Like [`Session::begin_turn`], and applies the received move to the
    /// board for the side that played it. Illegal moves are reported and
    /// left out of the board.
    pub fn begin_turn(&mut self, last_action: Option<Action>, agent: &str, observer: &Observer) -> Turn {
        let turn = self.session.begin_turn(last_action, agent, observer);

        if let (Some(Action::Play(mv)), Some(mover)) = (last_action, turn.last_mover) {
            if self.world.is_legal(mv, mover) {
                self.world.apply_move(mv, mover);
            } else {
                observer.emit(
                    agent,
                    AgentEvent::Rejected {
                        mover,
                        action: Action::Play(mv),
                    },
                );
            }
        }

        let role = self.session.role();
        if turn.own_turn && self.world.side_to_move() != role {
            self.world.set_side_to_move(role);
        }

        turn
    }
}
