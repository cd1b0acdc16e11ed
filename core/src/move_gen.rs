use crate::game_state::BattleState;
use crate::types::{Coord, Move, Role, Square, DIRECTIONS};

impl BattleState {
    /// Calls `f` with every square a queen on `from` could slide to.
    /// Rays stop at the board edge, at any queen and at burned squares.
    pub fn for_each_target(&self, from: Coord, mut f: impl FnMut(Coord)) {
        let geometry = self.geometry();
        for dir in DIRECTIONS {
            let mut distance = 1;
            while let Some(to) = geometry.step(from, dir, distance) {
                if !self.square(to).is_empty() {
                    break;
                }
                f(to);
                distance += 1;
            }
        }
    }

    /// Generates all legal moves for `role`, whoever is to move.
    pub fn legal_moves(&self, role: Role) -> Vec<Move> {
        let mut moves = Vec::new();
        for from in self.queens(role) {
            self.for_each_target(from, |to| moves.push(Move::new(from, to)));
        }
        moves
    }

    /// Returns the number of legal moves for `role`.
    pub fn mobility(&self, role: Role) -> usize {
        let mut count = 0;
        for from in self.queens(role) {
            self.for_each_target(from, |_| count += 1);
        }
        count
    }

    /// Returns true if `role` has at least one legal move.
    pub fn has_legal_move(&self, role: Role) -> bool {
        let geometry = self.geometry();
        self.queens(role).any(|from| {
            DIRECTIONS.iter().any(|&dir| {
                geometry
                    .step(from, dir, 1)
                    .is_some_and(|to| self.square(to).is_empty())
            })
        })
    }

    /// Checks a move for `role` against the rules, including board bounds.
    pub fn is_legal(&self, mv: Move, role: Role) -> bool {
        let geometry = self.geometry();
        if !geometry.contains(mv.from) || !geometry.contains(mv.to) {
            return false;
        }
        if self.square(mv.from) != Square::Queen(role) || mv.from == mv.to {
            return false;
        }

        let dx = i16::from(mv.to.x) - i16::from(mv.from.x);
        let dy = i16::from(mv.to.y) - i16::from(mv.from.y);
        if dx != 0 && dy != 0 && dx.abs() != dy.abs() {
            return false;
        }

        let dir = (dx.signum() as i8, dy.signum() as i8);
        let distance = dx.abs().max(dy.abs()) as u8;
        (1..=distance).all(|d| {
            geometry
                .step(mv.from, dir, d)
                .is_some_and(|sq| self.square(sq).is_empty())
        })
    }
}

/// Generates all legal moves for the side to move.
pub fn generate_legal_moves(state: &BattleState) -> Vec<Move> {
    state.legal_moves(state.side_to_move())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Geometry;

    fn c(x: u8, y: u8) -> Coord {
        Coord::new(x, y)
    }

    fn state(w: u8, h: u8, white: &[Coord], black: &[Coord]) -> BattleState {
        BattleState::new(Geometry::new(w, h).unwrap(), white, black).unwrap()
    }

    #[test]
    fn test_queen_moves_in_eight_directions() {
        let s = state(4, 4, &[c(2, 2)], &[c(4, 1)]);
        let moves = s.legal_moves(Role::White);

        assert!(moves.contains(&Move::new(c(2, 2), c(4, 4))));
        assert!(moves.contains(&Move::new(c(2, 2), c(1, 1))));
        assert!(moves.contains(&Move::new(c(2, 2), c(2, 4))));
        assert!(moves.contains(&Move::new(c(2, 2), c(1, 2))));
        assert!(moves.contains(&Move::new(c(2, 2), c(3, 1))));
        for mv in &moves {
            assert!(s.geometry().contains(mv.to), "{mv} leaves the board");
        }
        assert_eq!(moves.len(), s.mobility(Role::White));
    }

    #[test]
    fn test_small_board_move_count() {
        // Right: 2, up: 2, diagonal stops before the black queen: 1.
        let s = state(3, 3, &[c(1, 1)], &[c(3, 3)]);
        assert_eq!(s.legal_moves(Role::White).len(), 5);
        assert_eq!(generate_legal_moves(&s).len(), 5);
    }

    #[test]
    fn test_burned_square_blocks_path() {
        let mut s = state(4, 4, &[c(1, 1)], &[c(4, 4)]);
        s.set_square(c(1, 2), Square::Burned);

        let moves = s.legal_moves(Role::White);
        assert!(!moves.iter().any(|m| m.to.x == 1 && m.to.y > 1));
        assert!(!s.is_legal(Move::new(c(1, 1), c(1, 3)), Role::White));
    }

    #[test]
    fn test_queens_cannot_capture() {
        let s = state(4, 4, &[c(1, 1)], &[c(3, 3)]);
        assert!(!s.is_legal(Move::new(c(1, 1), c(3, 3)), Role::White));
        assert!(!s.is_legal(Move::new(c(1, 1), c(4, 4)), Role::White));
        assert!(s.is_legal(Move::new(c(1, 1), c(2, 2)), Role::White));
    }

    #[test]
    fn test_is_legal_rejects_bad_shapes() {
        let s = state(8, 6, &[c(1, 1)], &[c(8, 6)]);
        assert!(!s.is_legal(Move::new(c(1, 1), c(2, 3)), Role::White));
        assert!(!s.is_legal(Move::new(c(1, 1), c(1, 1)), Role::White));
        assert!(!s.is_legal(Move::new(c(1, 1), c(1, 7)), Role::White));
        assert!(!s.is_legal(Move::new(c(1, 1), c(2, 2)), Role::Black));
        assert!(!s.is_legal(Move::new(c(9, 1), c(8, 1)), Role::White));
    }

    #[test]
    fn test_legal_moves_agree_with_is_legal() {
        let mut s = state(5, 5, &[c(1, 1), c(3, 3)], &[c(5, 5), c(1, 5)]);
        s.set_square(c(2, 3), Square::Burned);
        for role in Role::ALL {
            let moves = s.legal_moves(role);
            assert!(!moves.is_empty());
            assert!(moves.iter().all(|&mv| s.is_legal(mv, role)));
            assert!(s.has_legal_move(role));
        }
    }

    #[test]
    fn test_walled_in_queen_has_no_moves() {
        let mut s = state(4, 4, &[c(1, 1)], &[c(4, 4)]);
        for sq in [c(1, 2), c(2, 1), c(2, 2)] {
            s.set_square(sq, Square::Burned);
        }
        assert!(s.legal_moves(Role::White).is_empty());
        assert!(!s.has_legal_move(Role::White));
        assert!(s.has_legal_move(Role::Black));
    }
}
