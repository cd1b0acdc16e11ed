//! Queen Battle world model: the board, whose turn it is and the position hash.
use crate::error::ConfigError;
use crate::types::*;
use crate::zobrist::ZobristKeys;
use std::sync::Arc;

/// Result of a finished game.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Outcome {
    Win(Role),
    Draw,
}

/// Complete state of a Queen Battle game.
#[derive(Clone, Debug)]
pub struct BattleState {
    geometry: Geometry,
    /// Square contents, indexed by [`Geometry::index`]
    squares: Vec<Square>,
    /// Which side is to move
    side_to_move: Role,
    /// Incrementally maintained zobrist hash
    hash: u64,
    keys: Arc<ZobristKeys>,
}

impl BattleState {
    /// Creates the starting position. White is to move.
    pub fn new(geometry: Geometry, white: &[Coord], black: &[Coord]) -> Result<Self, ConfigError> {
        geometry.validate()?;

        let mut state = Self::empty(geometry);
        for (role, positions) in [(Role::White, white), (Role::Black, black)] {
            for &coord in positions {
                if !geometry.contains(coord) {
                    return Err(ConfigError::PositionOutOfBounds { coord, geometry });
                }
                if !state.square(coord).is_empty() {
                    return Err(ConfigError::OverlappingPositions(coord));
                }
                state.set_square(coord, Square::Queen(role));
            }
        }

        Ok(state)
    }

    /// Creates an empty board with White to move.
    pub fn empty(geometry: Geometry) -> Self {
        Self {
            geometry,
            squares: vec![Square::Empty; geometry.area()],
            side_to_move: Role::White,
            hash: 0,
            keys: Arc::new(ZobristKeys::new(geometry)),
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn side_to_move(&self) -> Role {
        self.side_to_move
    }

    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Returns the contents of a square. The coordinate must be on the board.
    pub fn square(&self, coord: Coord) -> Square {
        self.squares[self.geometry.index(coord)]
    }

    /// Overwrites a square, keeping the hash in sync.
    pub fn set_square(&mut self, coord: Coord, square: Square) {
        let idx = self.geometry.index(coord);
        self.hash ^= self.keys.square_key(coord, self.squares[idx]);
        self.hash ^= self.keys.square_key(coord, square);
        self.squares[idx] = square;
    }

    /// Sets the side to move, keeping the hash in sync.
    pub fn set_side_to_move(&mut self, role: Role) {
        self.hash ^= self.keys.side_to_move_key(self.side_to_move);
        self.hash ^= self.keys.side_to_move_key(role);
        self.side_to_move = role;
    }

    /// Squares occupied by the given side's queens.
    pub fn queens(&self, role: Role) -> impl Iterator<Item = Coord> + '_ {
        self.squares
            .iter()
            .enumerate()
            .filter(move |(_, sq)| **sq == Square::Queen(role))
            .map(|(idx, _)| self.geometry.coord(idx))
    }

    pub fn empty_count(&self) -> usize {
        self.squares.iter().filter(|sq| sq.is_empty()).count()
    }

    pub fn burned_count(&self) -> usize {
        self.squares
            .iter()
            .filter(|sq| **sq == Square::Burned)
            .count()
    }

    /// Applies a move for `role`: the source square burns and the side to
    /// move passes to the opponent.
    /// This does NOT check if the move is legal.
    pub fn apply_move(&mut self, mv: Move, role: Role) {
        self.set_square(mv.from, Square::Burned);
        self.set_square(mv.to, Square::Queen(role));
        self.set_side_to_move(role.opponent());
    }

    /// Undoes [`BattleState::apply_move`] made by `role` from a position
    /// where `role` was to move.
    pub fn retract_move(&mut self, mv: Move, role: Role) {
        self.set_square(mv.to, Square::Empty);
        self.set_square(mv.from, Square::Queen(role));
        self.set_side_to_move(role);
    }

    /// Returns the game result if the position is terminal.
    ///
    /// The game is drawn once no more than `width` empty squares remain, or
    /// when neither side can move. A side left without a move loses.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.empty_count() <= usize::from(self.geometry.width) {
            return Some(Outcome::Draw);
        }

        match (
            self.has_legal_move(Role::White),
            self.has_legal_move(Role::Black),
        ) {
            (true, true) => None,
            (false, false) => Some(Outcome::Draw),
            (false, true) => Some(Outcome::Win(Role::Black)),
            (true, false) => Some(Outcome::Win(Role::White)),
        }
    }

    /// Recomputes the hash from scratch.
    pub fn compute_hash(&self) -> u64 {
        let squares = self
            .geometry
            .coords()
            .fold(0, |h, c| h ^ self.keys.square_key(c, self.square(c)));
        squares ^ self.keys.side_to_move_key(self.side_to_move)
    }
}

impl PartialEq for BattleState {
    fn eq(&self, other: &Self) -> bool {
        self.geometry == other.geometry
            && self.side_to_move == other.side_to_move
            && self.squares == other.squares
    }
}

impl Eq for BattleState {}
