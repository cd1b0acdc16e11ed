use battle_core::{BattleState, Coord, Move, Outcome, Role};
use std::collections::VecDeque;

/// Score of a won game. Anything with a larger magnitude than
/// [`MAX_HEURISTIC`] is a proven result.
pub const WIN_SCORE: i32 = 10_000;

/// Bound on the heuristic so it never reads as a proven result.
pub const MAX_HEURISTIC: i32 = 9_000;

const MOBILITY_WEIGHT: i32 = 5;
const TERRITORY_WEIGHT: i32 = 20;

/// Position evaluation for Queen Battle.
pub trait Evaluatable {
    /// Score from the perspective of the side to move.
    fn evaluate(&self) -> i32;

    /// Score from `role`'s perspective.
    fn evaluate_for(&self, role: Role) -> i32;

    /// Score from White's perspective (+ = White, - = Black).
    fn evaluate_absolute(&self) -> i32;
}

impl Evaluatable for BattleState {
    fn evaluate(&self) -> i32 {
        self.evaluate_for(self.side_to_move())
    }

    fn evaluate_for(&self, role: Role) -> i32 {
        match role {
            Role::White => self.evaluate_absolute(),
            Role::Black => -self.evaluate_absolute(),
        }
    }

    fn evaluate_absolute(&self) -> i32 {
        match self.outcome() {
            Some(Outcome::Win(Role::White)) => WIN_SCORE,
            Some(Outcome::Win(Role::Black)) => -WIN_SCORE,
            Some(Outcome::Draw) => 0,
            None => heuristic_score(self),
        }
    }
}

/// Mobility and territory balance from White's perspective, ignoring
/// whether the game is over.
pub fn heuristic_score(state: &BattleState) -> i32 {
    let mobility = state.mobility(Role::White) as i32 - state.mobility(Role::Black) as i32;
    let score = mobility * MOBILITY_WEIGHT + territory(state) * TERRITORY_WEIGHT;
    score.clamp(-MAX_HEURISTIC, MAX_HEURISTIC)
}

/// Empty squares White reaches in fewer queen moves than Black, minus the
/// reverse. Squares neither side can reach, or both reach equally fast, count
/// for nobody.
pub fn territory(state: &BattleState) -> i32 {
    let white = queen_distances(state, Role::White);
    let black = queen_distances(state, Role::Black);

    white
        .iter()
        .zip(&black)
        .map(|(w, b)| match (w, b) {
            (Some(w), Some(b)) if w < b => 1,
            (Some(w), Some(b)) if b < w => -1,
            (Some(_), None) => 1,
            (None, Some(_)) => -1,
            _ => 0,
        })
        .sum()
}

/// Multi-source BFS over queen moves through empty squares.
/// Occupied and burned squares stay `None`.
fn queen_distances(state: &BattleState, role: Role) -> Vec<Option<u16>> {
    let geometry = state.geometry();
    let mut dist = vec![None; geometry.area()];
    let mut queue: VecDeque<(Coord, u16)> = state.queens(role).map(|q| (q, 0)).collect();

    while let Some((from, d)) = queue.pop_front() {
        state.for_each_target(from, |to| {
            let slot = &mut dist[geometry.index(to)];
            if slot.is_none() {
                *slot = Some(d + 1);
                queue.push_back((to, d + 1));
            }
        });
    }

    dist
}

/// Cheap ordering key: moves towards the centre first.
pub fn move_order_score(state: &BattleState, mv: Move) -> i32 {
    20 - i32::from(mv.to.chebyshev(state.geometry().centre()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diagram(text: &str, to_move: Role) -> BattleState {
        BattleState::from_diagram(text, to_move).unwrap()
    }

    #[test]
    fn test_symmetric_position_is_balanced() {
        let state = diagram(
            "
            . . B
            . . .
            W . .
            ",
            Role::White,
        );
        assert_eq!(territory(&state), 0);
        assert_eq!(state.evaluate_absolute(), 0);
    }

    #[test]
    fn test_territory_counts_unreachable_side() {
        // Black alone reaches the square behind it.
        let state = diagram("W . . B .", Role::White);
        assert_eq!(territory(&state), -1);
        assert_eq!(heuristic_score(&state), (2 - 3) * 5 - 20);
    }

    #[test]
    fn test_perspective_evaluation() {
        let state = diagram(
            "
            . . . . B
            . . . . .
            . . . . .
            W . . . .
            . W . . .
            ",
            Role::White,
        );
        let mut black_to_move = state.clone();
        black_to_move.set_side_to_move(Role::Black);

        assert!(state.evaluate_absolute() > 0);
        assert_eq!(state.evaluate(), state.evaluate_absolute());
        assert_eq!(black_to_move.evaluate(), -state.evaluate_absolute());
        assert_eq!(state.evaluate_for(Role::Black), -state.evaluate_for(Role::White));
    }

    #[test]
    fn test_terminal_scores() {
        let lost = diagram(
            "
            . . . B
            . . . .
            # # . .
            W # . .
            ",
            Role::White,
        );
        assert_eq!(lost.evaluate_for(Role::White), -WIN_SCORE);
        assert_eq!(lost.evaluate_for(Role::Black), WIN_SCORE);

        let drawn = diagram(
            "
            # # # B
            # # # #
            # # # .
            W . . .
            ",
            Role::White,
        );
        assert_eq!(drawn.evaluate(), 0);
    }

    #[test]
    fn test_heuristic_is_bounded() {
        let mut rows = vec![". ".repeat(60); 60];
        rows[0] = format!("W {}", ". ".repeat(59));
        let state = diagram(&rows.join("\n"), Role::White);
        assert_eq!(heuristic_score(&state), MAX_HEURISTIC);
    }

    #[test]
    fn test_move_ordering_prefers_centre() {
        let state = diagram(
            "
            . . . . .
            . . . . .
            . . . . .
            . . . . .
            W . . . B
            ",
            Role::White,
        );
        let centre = Move::new(Coord::new(1, 1), Coord::new(3, 3));
        let edge = Move::new(Coord::new(1, 1), Coord::new(1, 5));
        assert!(move_order_score(&state, centre) > move_order_score(&state, edge));
    }
}
