use crate::error::ActionParseError;
use crate::types::{Coord, Move};
use std::fmt;
use std::str::FromStr;

/// An action exchanged with the match host.
///
/// Rendered as `(play x1 y1 x2 y2)` for a move and `noop` for a pass.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Action {
    Play(Move),
    Noop,
}

impl Action {
    /// Builds a move action from the host's integer form `[x1, y1, x2, y2]`.
    pub fn from_coords(coords: [u8; 4]) -> Self {
        Action::Play(Move::from(coords))
    }

    pub fn play(from: Coord, to: Coord) -> Self {
        Action::Play(Move::new(from, to))
    }

    /// Returns the move, if this action is one.
    pub fn as_move(&self) -> Option<Move> {
        match self {
            Action::Play(mv) => Some(*mv),
            Action::Noop => None,
        }
    }

    pub fn is_noop(&self) -> bool {
        matches!(self, Action::Noop)
    }
}

impl From<Move> for Action {
    fn from(mv: Move) -> Self {
        Action::Play(mv)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Play(mv) => {
                let [x1, y1, x2, y2] = mv.to_array();
                write!(f, "(play {x1} {y1} {x2} {y2})")
            }
            Action::Noop => f.write_str("noop"),
        }
    }
}

impl FromStr for Action {
    type Err = ActionParseError;

    /// Accepts `noop` in any case (the base lifecycle sentinel is `NOOP`)
    /// and `(play x1 y1 x2 y2)` with arbitrary inner whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.eq_ignore_ascii_case("noop") {
            return Ok(Action::Noop);
        }

        let body = text
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .ok_or_else(|| ActionParseError::InvalidFormat(text.to_string()))?;

        let mut parts = body.split_whitespace();
        if parts.next() != Some("play") {
            return Err(ActionParseError::InvalidFormat(text.to_string()));
        }

        let numbers = parts
            .map(|p| {
                p.parse::<u8>()
                    .ok()
                    .filter(|n| *n > 0)
                    .ok_or_else(|| ActionParseError::InvalidNumber(p.to_string()))
            })
            .collect::<Result<Vec<u8>, _>>()?;

        let coords: [u8; 4] = numbers
            .as_slice()
            .try_into()
            .map_err(|_| ActionParseError::WrongArity(numbers.len()))?;

        Ok(Action::from_coords(coords))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_play() {
        let action = Action::from_coords([1, 2, 3, 4]);
        assert_eq!(action.to_string(), "(play 1 2 3 4)");
    }

    #[test]
    fn test_render_noop() {
        assert_eq!(Action::Noop.to_string(), "noop");
    }

    #[test]
    fn test_parse_play() {
        let action: Action = "  (play 8 6 1 1)\n".parse().unwrap();
        assert_eq!(
            action.as_move(),
            Some(Move::new(Coord::new(8, 6), Coord::new(1, 1)))
        );
        let spaced: Action = "( play  2 3 4 5 )".parse().unwrap();
        assert_eq!(spaced, Action::from_coords([2, 3, 4, 5]));
    }

    #[test]
    fn test_parse_noop_sentinels() {
        assert_eq!("noop".parse::<Action>().unwrap(), Action::Noop);
        assert_eq!("NOOP".parse::<Action>().unwrap(), Action::Noop);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            "play 1 2 3 4".parse::<Action>(),
            Err(ActionParseError::InvalidFormat(_))
        ));
        assert!(matches!(
            "(move 1 2 3 4)".parse::<Action>(),
            Err(ActionParseError::InvalidFormat(_))
        ));
        assert_eq!(
            "(play 1 2 3)".parse::<Action>(),
            Err(ActionParseError::WrongArity(3))
        );
        assert_eq!(
            "(play 1 2 x 4)".parse::<Action>(),
            Err(ActionParseError::InvalidNumber("x".to_string()))
        );
        assert_eq!(
            "(play 0 2 3 4)".parse::<Action>(),
            Err(ActionParseError::InvalidNumber("0".to_string()))
        );
    }
}
