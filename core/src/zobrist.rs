use crate::types::{Coord, Geometry, Role, Square};

/// Zobrist hashing for Queen Battle positions.
/// One pre-computed random number per square and square content.
#[derive(Debug, Clone)]
pub struct ZobristKeys {
    geometry: Geometry,
    /// Keys per square for white queen, black queen and burned
    square_keys: Vec<[u64; 3]>,
    /// Random value for side to move (XOR when black to move)
    black_to_move: u64,
}

impl ZobristKeys {
    /// Creates the keys for a board of the given size.
    /// Uses a fixed seed so that equal positions hash equally across runs.
    pub fn new(geometry: Geometry) -> Self {
        let mut rng = 0x123456789ABCDEFu64;
        let mut next_random = || {
            rng ^= rng << 13;
            rng ^= rng >> 7;
            rng ^= rng << 17;
            rng
        };

        let square_keys = (0..geometry.area())
            .map(|_| [next_random(), next_random(), next_random()])
            .collect();

        let black_to_move = next_random();

        Self {
            geometry,
            square_keys,
            black_to_move,
        }
    }

    /// Gets the key for a square's content. Empty squares hash to zero.
    pub fn square_key(&self, coord: Coord, square: Square) -> u64 {
        let keys = &self.square_keys[self.geometry.index(coord)];
        match square {
            Square::Empty => 0,
            Square::Queen(Role::White) => keys[0],
            Square::Queen(Role::Black) => keys[1],
            Square::Burned => keys[2],
        }
    }

    /// Gets the key for the side to move.
    pub fn side_to_move_key(&self, role: Role) -> u64 {
        match role {
            Role::White => 0,
            Role::Black => self.black_to_move,
        }
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }
}
