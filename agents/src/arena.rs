//! Referee that plays two agents against each other under the host's
//! calling convention: both agents are called every half-move, White first,
//! and only the side to move's answer counts.

use crate::{Agent, AgentError, MatchConfig};
use battle_core::{Action, BattleState, ConfigError, Coord, Geometry, Move, Outcome, Role};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, event, instrument, trace, Level};

/// Shared parameters of a match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSettings {
    pub geometry: Geometry,
    pub play_clock: Duration,
    pub white_positions: Vec<Coord>,
    pub black_positions: Vec<Coord>,
    /// Stop after this many half-moves
    pub max_plies: Option<u32>,
}

impl MatchSettings {
    pub fn new(
        geometry: Geometry,
        play_clock: Duration,
        white_positions: Vec<Coord>,
        black_positions: Vec<Coord>,
    ) -> Self {
        Self {
            geometry,
            play_clock,
            white_positions,
            black_positions,
            max_plies: None,
        }
    }

    pub fn with_max_plies(mut self, max_plies: u32) -> Self {
        self.max_plies = Some(max_plies);
        self
    }

    /// What the agent playing `role` receives at `initialize`.
    pub fn config_for(&self, role: Role) -> MatchConfig {
        MatchConfig::new(
            role,
            self.geometry,
            self.play_clock,
            self.white_positions.clone(),
            self.black_positions.clone(),
        )
    }
}

/// Why the side to move lost by forfeit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("illegal action {0}")]
    IllegalAction(Action),

    #[error("passed while a move was due")]
    Passed,

    #[error("answered after {elapsed:?}")]
    Timeout { elapsed: Duration },

    #[error("agent failed: {0}")]
    AgentError(AgentError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchOutcome {
    Win(Role),
    Draw,
    Forfeit { role: Role, violation: Violation },
    PlyLimit,
}

impl MatchOutcome {
    /// The side credited with the game, if any.
    pub fn winner(&self) -> Option<Role> {
        match self {
            MatchOutcome::Win(role) => Some(*role),
            MatchOutcome::Forfeit { role, .. } => Some(role.opponent()),
            MatchOutcome::Draw | MatchOutcome::PlyLimit => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MatchResult {
    pub outcome: MatchOutcome,
    pub plies: u32,
    pub history: Vec<Move>,
    pub final_state: BattleState,
}

#[derive(Debug)]
pub struct Match {
    settings: MatchSettings,
    initial: BattleState,
}

impl Match {
    pub fn new(settings: MatchSettings) -> Result<Self, ConfigError> {
        let initial = settings.config_for(Role::White).starting_state()?;
        Ok(Self { settings, initial })
    }

    pub fn settings(&self) -> &MatchSettings {
        &self.settings
    }

    /// Plays one match. Only initialization failures are errors; everything
    /// an agent does wrong afterwards is a forfeit.
    #[instrument(level = "debug", skip_all, fields(white = %white.name(), black = %black.name()))]
    pub fn run(&self, white: &mut dyn Agent, black: &mut dyn Agent) -> Result<MatchResult, AgentError> {
        white.initialize(self.settings.config_for(Role::White))?;
        if let Err(e) = black.initialize(self.settings.config_for(Role::Black)) {
            white.finalize(None);
            return Err(e);
        }

        let mut state = self.initial.clone();
        let mut history = Vec::new();
        let mut last = None;

        let outcome = loop {
            if let Some(outcome) = state.outcome() {
                break match outcome {
                    Outcome::Win(role) => MatchOutcome::Win(role),
                    Outcome::Draw => MatchOutcome::Draw,
                };
            }
            if self.settings.max_plies.is_some_and(|max| history.len() as u32 >= max) {
                break MatchOutcome::PlyLimit;
            }

            let mover = state.side_to_move();
            let white_reply = timed(|| white.select_action(last));
            let black_reply = timed(|| black.select_action(last));
            let (reply, elapsed) = match mover {
                Role::White => white_reply,
                Role::Black => black_reply,
            };

            match self.referee(&state, mover, reply, elapsed) {
                Ok(mv) => {
                    trace!(%mover, %mv, ply = history.len(), "Move played");
                    state.apply_move(mv, mover);
                    history.push(mv);
                    last = Some(Action::Play(mv));
                }
                Err(violation) => {
                    event!(Level::WARN, %mover, %violation, "Forfeit");
                    break MatchOutcome::Forfeit {
                        role: mover,
                        violation,
                    };
                }
            }
        };

        white.finalize(last);
        black.finalize(last);

        debug!(?outcome, plies = history.len(), "Match finished");
        Ok(MatchResult {
            outcome,
            plies: history.len() as u32,
            history,
            final_state: state,
        })
    }

    fn referee(
        &self,
        state: &BattleState,
        mover: Role,
        reply: Result<Action, AgentError>,
        elapsed: Duration,
    ) -> Result<Move, Violation> {
        let action = reply.map_err(Violation::AgentError)?;
        if elapsed > self.settings.play_clock {
            return Err(Violation::Timeout { elapsed });
        }
        match action {
            Action::Noop => Err(Violation::Passed),
            Action::Play(mv) if state.is_legal(mv, mover) => Ok(mv),
            Action::Play(_) => Err(Violation::IllegalAction(action)),
        }
    }
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlphaBetaAgent, LegalRandomAgent, RandomAgent};

    /// Gives the same answer on every call, optionally after a delay.
    struct Scripted {
        reply: Result<Action, AgentError>,
        delay: Duration,
    }

    impl Scripted {
        fn new(reply: Result<Action, AgentError>) -> Self {
            Self {
                reply,
                delay: Duration::ZERO,
            }
        }
    }

    impl Agent for Scripted {
        fn initialize(&mut self, _config: MatchConfig) -> Result<(), AgentError> {
            Ok(())
        }

        fn select_action(&mut self, _last_action: Option<Action>) -> Result<Action, AgentError> {
            std::thread::sleep(self.delay);
            self.reply.clone()
        }

        fn finalize(&mut self, _last_action: Option<Action>) {}

        fn name(&self) -> &str {
            "Scripted"
        }
    }

    fn settings(width: u8, height: u8) -> MatchSettings {
        MatchSettings::new(
            Geometry::new(width, height).unwrap(),
            Duration::from_secs(1),
            vec![Coord::new(1, 1)],
            vec![Coord::new(width, height)],
        )
    }

    #[test_log::test]
    fn test_random_agent_forfeits() {
        let game = Match::new(settings(20, 20)).unwrap();
        let mut white = RandomAgent::with_seed(1);
        let mut black = LegalRandomAgent::with_seed(2);

        let result = game.run(&mut white, &mut black).unwrap();
        assert!(matches!(
            result.outcome,
            MatchOutcome::Forfeit {
                role: Role::White,
                violation: Violation::IllegalAction(_)
            }
        ));
        assert_eq!(result.plies, 0);
        assert_eq!(result.outcome.winner(), Some(Role::Black));
    }

    #[test_log::test]
    fn test_legal_agents_finish_the_game() {
        let game = Match::new(settings(5, 5)).unwrap();
        for seed in 0..5 {
            let mut white = LegalRandomAgent::with_seed(seed);
            let mut black = LegalRandomAgent::with_seed(seed + 100);
            let result = game.run(&mut white, &mut black).unwrap();

            assert!(
                matches!(result.outcome, MatchOutcome::Win(_) | MatchOutcome::Draw),
                "{:?}",
                result.outcome
            );
            assert_eq!(result.plies as usize, result.history.len());
            assert!(result.final_state.outcome().is_some());

            // The history replays legally from the start.
            let mut replay = game.initial.clone();
            for (ply, mv) in result.history.iter().enumerate() {
                let role = if ply % 2 == 0 { Role::White } else { Role::Black };
                assert!(replay.is_legal(*mv, role));
                replay.apply_move(*mv, role);
            }
            assert_eq!(replay, result.final_state);
        }
    }

    #[test_log::test]
    fn test_alpha_beta_beats_legal_random() {
        let game = Match::new(settings(5, 5)).unwrap();
        let mut white = AlphaBetaAgent::with_depth(3);
        let mut black = LegalRandomAgent::with_seed(7);

        let result = game.run(&mut white, &mut black).unwrap();
        assert!(
            matches!(result.outcome, MatchOutcome::Win(Role::White) | MatchOutcome::Draw),
            "{:?}",
            result.outcome
        );
    }

    #[test]
    fn test_agents_can_play_both_sides_in_turn() {
        let game = Match::new(settings(4, 4)).unwrap();
        let mut a = AlphaBetaAgent::with_depth(2);
        let mut b = LegalRandomAgent::with_seed(3);

        let first = game.run(&mut a, &mut b).unwrap();
        let second = game.run(&mut b, &mut a).unwrap();
        for result in [first, second] {
            assert!(!matches!(result.outcome, MatchOutcome::Forfeit { .. }));
        }
    }

    #[test]
    fn test_ply_limit() {
        let game = Match::new(settings(8, 8).with_max_plies(2)).unwrap();
        let mut white = LegalRandomAgent::with_seed(1);
        let mut black = LegalRandomAgent::with_seed(2);

        let result = game.run(&mut white, &mut black).unwrap();
        assert_eq!(result.outcome, MatchOutcome::PlyLimit);
        assert_eq!(result.plies, 2);
        assert_eq!(result.outcome.winner(), None);
    }

    #[test]
    fn test_forfeit_reasons() {
        let game = Match::new(settings(4, 4)).unwrap();
        let mut idle = LegalRandomAgent::with_seed(1);

        let mut passer = Scripted::new(Ok(Action::Noop));
        let result = game.run(&mut passer, &mut idle).unwrap();
        assert_eq!(
            result.outcome,
            MatchOutcome::Forfeit {
                role: Role::White,
                violation: Violation::Passed
            }
        );

        let mut broken = Scripted::new(Err(AgentError::NotInitialized));
        let result = game.run(&mut broken, &mut idle).unwrap();
        assert_eq!(
            result.outcome,
            MatchOutcome::Forfeit {
                role: Role::White,
                violation: Violation::AgentError(AgentError::NotInitialized)
            }
        );

        // Black answers with a move that only White could play.
        let mut cheat = Scripted::new(Ok(Action::from_coords([1, 1, 2, 2])));
        let result = game.run(&mut idle, &mut cheat).unwrap();
        assert!(matches!(
            result.outcome,
            MatchOutcome::Forfeit {
                role: Role::Black,
                violation: Violation::IllegalAction(_)
            }
        ));
        assert_eq!(result.plies, 1);
    }

    #[test]
    fn test_slow_mover_forfeits_on_time() {
        let mut settings = settings(4, 4);
        settings.play_clock = Duration::from_millis(20);
        let game = Match::new(settings).unwrap();

        let mut slow = Scripted {
            reply: Ok(Action::from_coords([1, 1, 1, 2])),
            delay: Duration::from_millis(60),
        };
        let mut idle = LegalRandomAgent::with_seed(1);
        let result = game.run(&mut slow, &mut idle).unwrap();
        assert!(matches!(
            result.outcome,
            MatchOutcome::Forfeit {
                role: Role::White,
                violation: Violation::Timeout { .. }
            }
        ));
    }

    #[test]
    fn test_invalid_settings_are_rejected() {
        let mut bad = settings(4, 4);
        bad.black_positions = vec![Coord::new(5, 5)];
        assert!(matches!(
            Match::new(bad),
            Err(ConfigError::PositionOutOfBounds { .. })
        ));

        let mut overlapping = settings(4, 4);
        overlapping.black_positions = vec![Coord::new(1, 1)];
        assert_eq!(
            Match::new(overlapping).unwrap_err(),
            ConfigError::OverlappingPositions(Coord::new(1, 1))
        );
    }
}
