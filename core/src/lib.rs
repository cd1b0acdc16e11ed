pub mod action;
pub mod diagram;
pub mod error;
pub mod game_state;
pub mod move_gen;
pub mod perft;
pub mod types;
pub mod zobrist;

pub use action::Action;
pub use error::{ActionParseError, ConfigError, DiagramError};
pub use game_state::*;
pub use move_gen::*;
pub use perft::{perft, perft_divide};
pub use types::*;
pub use zobrist::ZobristKeys;
