//! # Configuration
//!
//! [`MatchConfig`] is what an agent receives at `initialize`: its role, the
//! board, the play clock and both sides' starting queens. [`AgentConfig`]
//! declares which strategy to build, so agents can be picked from JSON.
//!
//! ```json
//! {"type": "random", "seed": 7}
//! {"type": "legal_random"}
//! {"type": "alpha_beta", "tt_size_mb": 16, "safety_margin_ms": 500, "max_depth": 6}
//! ```
//!
//! A match configuration uses the host's plain types:
//!
//! ```json
//! {
//!   "role": "white",
//!   "width": 8,
//!   "height": 6,
//!   "play_clock": 10,
//!   "white_positions": [[1, 1], [8, 1]],
//!   "black_positions": [[1, 6], [8, 6]]
//! }
//! ```

use crate::errors::AgentConfigError;
use crate::{AlphaBetaAgent, Agent, LegalRandomAgent, RandomAgent, SearchSettings};
use battle_core::{BattleState, ConfigError, Coord, Geometry, Role};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Everything an agent learns about a match at `initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    pub role: Role,
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Per-move budget, whole seconds on the wire
    #[serde(with = "clock_secs")]
    pub play_clock: Duration,
    #[serde(default)]
    pub white_positions: Vec<Coord>,
    #[serde(default)]
    pub black_positions: Vec<Coord>,
}

impl MatchConfig {
    pub fn new(
        role: Role,
        geometry: Geometry,
        play_clock: Duration,
        white_positions: Vec<Coord>,
        black_positions: Vec<Coord>,
    ) -> Self {
        Self {
            role,
            geometry,
            play_clock,
            white_positions,
            black_positions,
        }
    }

    /// Builds and validates a configuration from the host's raw parameters.
    pub fn from_host(
        role: &str,
        width: u8,
        height: u8,
        play_clock_secs: u64,
        white_positions: &[[u8; 2]],
        black_positions: &[[u8; 2]],
    ) -> Result<Self, ConfigError> {
        let to_coords = |ps: &[[u8; 2]]| ps.iter().map(|&[x, y]| Coord::new(x, y)).collect();
        let config = Self::new(
            role.parse()?,
            Geometry::new(width, height)?,
            Duration::from_secs(play_clock_secs),
            to_coords(white_positions),
            to_coords(black_positions),
        );
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(json: &str) -> Result<Self, AgentConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.starting_state().map(|_| ())
    }

    /// The initial board, White to move. Fails on bad geometry, clock or
    /// positions.
    pub fn starting_state(&self) -> Result<BattleState, ConfigError> {
        if self.play_clock.is_zero() {
            return Err(ConfigError::InvalidPlayClock);
        }
        BattleState::new(self.geometry, &self.white_positions, &self.black_positions)
    }

    /// The same match seen from the other side.
    pub fn for_role(&self, role: Role) -> Self {
        Self {
            role,
            ..self.clone()
        }
    }
}

mod clock_secs {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(clock: &Duration, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_u64(clock.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_secs)
    }
}

/// Declarative choice of strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentConfig {
    /// Random coordinates, no legality check
    Random {
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Uniformly random legal move
    LegalRandom {
        #[serde(default)]
        seed: Option<u64>,
    },
    /// Iterative deepening alpha-beta under the play clock
    AlphaBeta {
        #[serde(default = "default_tt_size_mb")]
        tt_size_mb: usize,
        #[serde(default = "default_safety_margin_ms")]
        safety_margin_ms: u64,
        #[serde(default)]
        max_depth: Option<u8>,
    },
}

fn default_tt_size_mb() -> usize {
    16
}

fn default_safety_margin_ms() -> u64 {
    500
}

const MAX_TT_SIZE_MB: usize = 1024;

impl AgentConfig {
    pub fn from_json(json: &str) -> Result<Self, AgentConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AgentConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn validate(&self) -> Result<(), AgentConfigError> {
        if let AgentConfig::AlphaBeta {
            tt_size_mb,
            max_depth,
            ..
        } = self
        {
            if !(1..=MAX_TT_SIZE_MB).contains(tt_size_mb) {
                return Err(AgentConfigError::Validation(format!(
                    "tt_size_mb must be between 1 and {MAX_TT_SIZE_MB}, got {tt_size_mb}"
                )));
            }
            if *max_depth == Some(0) {
                return Err(AgentConfigError::Validation(
                    "max_depth must be at least 1".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Validates and builds the configured agent.
    pub fn build(&self) -> Result<Box<dyn Agent>, AgentConfigError> {
        self.validate()?;
        let agent: Box<dyn Agent> = match self {
            AgentConfig::Random { seed } => Box::new(match seed {
                Some(seed) => RandomAgent::with_seed(*seed),
                None => RandomAgent::new(),
            }),
            AgentConfig::LegalRandom { seed } => Box::new(match seed {
                Some(seed) => LegalRandomAgent::with_seed(*seed),
                None => LegalRandomAgent::new(),
            }),
            AgentConfig::AlphaBeta {
                tt_size_mb,
                safety_margin_ms,
                max_depth,
            } => Box::new(AlphaBetaAgent::new(SearchSettings {
                tt_size_mb: *tt_size_mb,
                safety_margin: Duration::from_millis(*safety_margin_ms),
                max_depth: *max_depth,
            })),
        };
        Ok(agent)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_match_config_from_json() {
        let config = MatchConfig::from_json(
            r#"{
                "role": "black",
                "width": 8,
                "height": 6,
                "play_clock": 10,
                "white_positions": [[1, 1], [8, 1]],
                "black_positions": [[1, 6]]
            }"#,
        )
        .unwrap();

        assert_eq!(config.role, Role::Black);
        assert_eq!(config.geometry, Geometry { width: 8, height: 6 });
        assert_eq!(config.play_clock, Duration::from_secs(10));
        assert_eq!(config.white_positions, vec![Coord::new(1, 1), Coord::new(8, 1)]);
        assert_eq!(config.black_positions, vec![Coord::new(1, 6)]);
    }

    #[test]
    fn test_match_config_json_round_trip() {
        let config =
            MatchConfig::from_host("white", 5, 4, 3, &[[1, 1]], &[[5, 4], [3, 4]]).unwrap();
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains(r#""play_clock":3"#));
        assert_eq!(MatchConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_positions_default_to_empty() {
        let config =
            MatchConfig::from_json(r#"{"role": "white", "width": 3, "height": 3, "play_clock": 1}"#)
                .unwrap();
        assert!(config.white_positions.is_empty());
        assert!(config.black_positions.is_empty());
    }

    #[test]
    fn test_match_config_rejections() {
        assert_eq!(
            MatchConfig::from_host("red", 8, 6, 10, &[], &[]),
            Err(ConfigError::UnknownRole("red".to_string()))
        );
        assert!(matches!(
            MatchConfig::from_host("white", 0, 6, 10, &[], &[]),
            Err(ConfigError::InvalidGeometry { .. })
        ));
        assert_eq!(
            MatchConfig::from_host("white", 8, 6, 0, &[], &[]),
            Err(ConfigError::InvalidPlayClock)
        );
        assert!(matches!(
            MatchConfig::from_host("white", 8, 6, 10, &[[9, 1]], &[]),
            Err(ConfigError::PositionOutOfBounds { .. })
        ));
        assert!(matches!(
            MatchConfig::from_json(r#"{"role": "green", "width": 3, "height": 3, "play_clock": 1}"#),
            Err(AgentConfigError::Json(_))
        ));
    }

    #[test]
    fn test_for_role_swaps_only_role() {
        let white = MatchConfig::from_host("white", 4, 4, 2, &[[1, 1]], &[[4, 4]]).unwrap();
        let black = white.for_role(Role::Black);
        assert_eq!(black.role, Role::Black);
        assert_eq!(black.geometry, white.geometry);
        assert_eq!(black.white_positions, white.white_positions);
    }

    #[test]
    fn test_agent_config_defaults() {
        let config = AgentConfig::from_json(r#"{"type": "alpha_beta"}"#).unwrap();
        assert_eq!(
            config,
            AgentConfig::AlphaBeta {
                tt_size_mb: 16,
                safety_margin_ms: 500,
                max_depth: None
            }
        );
        assert_eq!(
            AgentConfig::from_json(r#"{"type": "random"}"#).unwrap(),
            AgentConfig::Random { seed: None }
        );
    }

    #[test]
    fn test_agent_config_validation() {
        assert!(matches!(
            AgentConfig::from_json(r#"{"type": "alpha_beta", "tt_size_mb": 0}"#),
            Err(AgentConfigError::Validation(_))
        ));
        assert!(matches!(
            AgentConfig::from_json(r#"{"type": "alpha_beta", "max_depth": 0}"#),
            Err(AgentConfigError::Validation(_))
        ));
        assert!(matches!(
            AgentConfig::from_json(r#"{"type": "greedy"}"#),
            Err(AgentConfigError::Json(_))
        ));
    }

    #[test]
    fn test_agent_config_from_missing_file() {
        assert!(matches!(
            AgentConfig::from_file("/nonexistent/agent.json"),
            Err(AgentConfigError::Io(_))
        ));
    }

    #[test]
    fn test_build_agents() {
        let names: Vec<String> = [
            r#"{"type": "random", "seed": 1}"#,
            r#"{"type": "legal_random"}"#,
            r#"{"type": "alpha_beta", "tt_size_mb": 1, "max_depth": 2}"#,
        ]
        .iter()
        .map(|json| {
            AgentConfig::from_json(json)
                .unwrap()
                .build()
                .unwrap()
                .name()
                .to_string()
        })
        .collect();
        assert_eq!(names, vec!["Random", "LegalRandom", "AlphaBeta(depth=2)"]);
    }
}
