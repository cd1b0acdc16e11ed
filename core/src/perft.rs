use crate::game_state::BattleState;
use crate::move_gen::generate_legal_moves;
use crate::types::Move;

/// Performs perft test to given depth and returns node count.
/// Terminal positions are not cut short; only move generation is counted.
pub fn perft(state: &BattleState, depth: u8) -> u64 {
    let mut scratch = state.clone();
    perft_inner(&mut scratch, depth)
}

fn perft_inner(state: &mut BattleState, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }

    let moves = generate_legal_moves(state);

    if depth == 1 {
        return moves.len() as u64;
    }

    let role = state.side_to_move();
    let mut nodes = 0;
    for mv in moves {
        state.apply_move(mv, role);
        nodes += perft_inner(state, depth - 1);
        state.retract_move(mv, role);
    }

    nodes
}

/// Performs detailed perft test with move breakdown.
pub fn perft_divide(state: &BattleState, depth: u8) -> Vec<(Move, u64)> {
    let mut scratch = state.clone();
    let role = scratch.side_to_move();
    let mut results = Vec::new();

    for mv in generate_legal_moves(state) {
        scratch.apply_move(mv, role);
        let nodes = if depth <= 1 {
            1
        } else {
            perft_inner(&mut scratch, depth - 1)
        };
        scratch.retract_move(mv, role);
        results.push((mv, nodes));
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Coord, Geometry};

    fn three_by_three() -> BattleState {
        BattleState::new(
            Geometry::new(3, 3).unwrap(),
            &[Coord::new(1, 1)],
            &[Coord::new(3, 3)],
        )
        .unwrap()
    }

    #[test]
    fn test_perft_shallow() {
        let state = three_by_three();
        assert_eq!(perft(&state, 0), 1);
        assert_eq!(perft(&state, 1), 5);
        assert_eq!(perft(&state, 2), 22);
    }

    #[test]
    fn test_perft_divide_sums_to_perft() {
        let state = three_by_three();
        let divide = perft_divide(&state, 2);
        assert_eq!(divide.len(), 5);
        let total: u64 = divide.iter().map(|(_, n)| n).sum();
        assert_eq!(total, perft(&state, 2));
    }

    #[test]
    fn test_perft_leaves_state_untouched() {
        let state = three_by_three();
        let before = state.clone();
        perft(&state, 3);
        perft_divide(&state, 3);
        assert_eq!(state, before);
        assert_eq!(state.hash(), before.hash());
    }
}
