use crate::error::DiagramError;
use crate::game_state::BattleState;
use crate::types::{Coord, Geometry, Role, Square};

/// Text diagrams of a board position.
///
/// One line per row, top line is `y = height`. Within a line, whitespace is
/// ignored and each character is one square: `W` white queen, `B` black
/// queen, `#` burned, `.` empty.
impl BattleState {
    /// Parses a diagram into a position with `side_to_move` to move.
    pub fn from_diagram(diagram: &str, side_to_move: Role) -> Result<Self, DiagramError> {
        let rows: Vec<Vec<char>> = diagram
            .lines()
            .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect::<Vec<_>>())
            .filter(|row| !row.is_empty())
            .collect();

        let width = rows.first().ok_or(DiagramError::Empty)?.len();
        let dim = |n: usize| u8::try_from(n).map_err(|_| DiagramError::TooLarge(n));
        let geometry = Geometry::new(dim(width)?, dim(rows.len())?)?;

        let mut state = BattleState::empty(geometry);
        for (row_idx, row) in rows.iter().enumerate() {
            if row.len() != width {
                return Err(DiagramError::RaggedRow {
                    row: row_idx + 1,
                    found: row.len(),
                    expected: width,
                });
            }
            let y = geometry.height - row_idx as u8;
            for (col, &ch) in row.iter().enumerate() {
                let square = parse_square(ch)?;
                state.set_square(Coord::new(col as u8 + 1, y), square);
            }
        }
        state.set_side_to_move(side_to_move);

        Ok(state)
    }

    /// Renders the position, one line per row, top row first.
    pub fn to_diagram(&self) -> String {
        let geometry = self.geometry();
        (1..=geometry.height)
            .rev()
            .map(|y| {
                (1..=geometry.width)
                    .map(|x| square_char(self.square(Coord::new(x, y))).to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn parse_square(ch: char) -> Result<Square, DiagramError> {
    match ch {
        '.' => Ok(Square::Empty),
        '#' => Ok(Square::Burned),
        'W' => Ok(Square::Queen(Role::White)),
        'B' => Ok(Square::Queen(Role::Black)),
        _ => Err(DiagramError::InvalidSquare(ch)),
    }
}

fn square_char(square: Square) -> char {
    match square {
        Square::Empty => '.',
        Square::Burned => '#',
        Square::Queen(Role::White) => 'W',
        Square::Queen(Role::Black) => 'B',
    }
}
