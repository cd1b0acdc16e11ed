use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One of the two sides of a match.
/// White is the first player and always moves first.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    White,
    Black,
}

impl Role {
    /// Both roles in move order.
    pub const ALL: [Role; 2] = [Role::White, Role::Black];

    /// Returns the other side.
    pub const fn opponent(self) -> Self {
        match self {
            Role::White => Role::Black,
            Role::Black => Role::White,
        }
    }

    /// Returns true for the side that moves first.
    pub const fn moves_first(self) -> bool {
        matches!(self, Role::White)
    }

    /// The protocol token for this role.
    pub const fn token(self) -> &'static str {
        match self {
            Role::White => "white",
            Role::Black => "black",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Role {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "white" => Ok(Role::White),
            "black" => Ok(Role::Black),
            other => Err(ConfigError::UnknownRole(other.to_string())),
        }
    }
}

/// Board dimensions, fixed for the lifetime of a match.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Geometry {
    pub width: u8,
    pub height: u8,
}

impl Geometry {
    /// Creates a geometry, rejecting empty boards.
    pub fn new(width: u8, height: u8) -> Result<Self, ConfigError> {
        let geometry = Self { width, height };
        geometry.validate()?;
        Ok(geometry)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::InvalidGeometry {
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Total number of squares on the board.
    pub fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }

    /// Returns true if the coordinate lies on the board.
    pub fn contains(&self, coord: Coord) -> bool {
        (1..=self.width).contains(&coord.x) && (1..=self.height).contains(&coord.y)
    }

    /// Dense index of a coordinate, column-major from (1, 1).
    /// The coordinate must be on the board.
    pub fn index(&self, coord: Coord) -> usize {
        debug_assert!(self.contains(coord), "{coord} is off a {self} board");
        usize::from(coord.x - 1) * usize::from(self.height) + usize::from(coord.y - 1)
    }

    /// Inverse of [`Geometry::index`].
    pub fn coord(&self, index: usize) -> Coord {
        let height = usize::from(self.height);
        Coord::new((index / height + 1) as u8, (index % height + 1) as u8)
    }

    /// Iterates over every square on the board.
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let height = self.height;
        (1..=self.width).flat_map(move |x| (1..=height).map(move |y| Coord::new(x, y)))
    }

    /// Steps `distance` squares from `from` along `dir`, if still on the board.
    pub fn step(&self, from: Coord, dir: (i8, i8), distance: u8) -> Option<Coord> {
        let x = i16::from(from.x) + i16::from(dir.0) * i16::from(distance);
        let y = i16::from(from.y) + i16::from(dir.1) * i16::from(distance);
        if x < 1 || y < 1 || x > i16::from(self.width) || y > i16::from(self.height) {
            return None;
        }
        Some(Coord::new(x as u8, y as u8))
    }

    /// The central square (rounded towards the origin on even sides).
    pub fn centre(&self) -> Coord {
        Coord::new(self.width.div_ceil(2), self.height.div_ceil(2))
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A 1-indexed board coordinate.
/// Serialized as a two element array `[x, y]`, the form the match host uses.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(from = "(u8, u8)", into = "(u8, u8)")]
pub struct Coord {
    pub x: u8,
    pub y: u8,
}

impl Coord {
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Chebyshev (king step) distance between two coordinates.
    pub fn chebyshev(self, other: Coord) -> u8 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl From<(u8, u8)> for Coord {
    fn from((x, y): (u8, u8)) -> Self {
        Coord::new(x, y)
    }
}

impl From<Coord> for (u8, u8) {
    fn from(c: Coord) -> Self {
        (c.x, c.y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A queen move from one square to another.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    pub from: Coord,
    pub to: Coord,
}

impl Move {
    pub const fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }

    /// The four numbers as the host sends them: `[x1, y1, x2, y2]`.
    pub const fn to_array(self) -> [u8; 4] {
        [self.from.x, self.from.y, self.to.x, self.to.y]
    }
}

impl From<[u8; 4]> for Move {
    fn from([x1, y1, x2, y2]: [u8; 4]) -> Self {
        Move::new(Coord::new(x1, y1), Coord::new(x2, y2))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Contents of a single board square.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Square {
    #[default]
    Empty,
    /// A square a queen has left. Nothing can enter or cross it again.
    Burned,
    Queen(Role),
}

impl Square {
    pub const fn is_empty(self) -> bool {
        matches!(self, Square::Empty)
    }
}

/// The eight queen directions.
pub const DIRECTIONS: [(i8, i8); 8] = [
    (0, 1),
    (0, -1),
    (1, 0),
    (-1, 0),
    (1, 1),
    (1, -1),
    (-1, 1),
    (-1, -1),
];
