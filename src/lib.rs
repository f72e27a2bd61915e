//! A depth-limited minimax agent for playing the board game 'Connect 4'
//!
//! This agent builds a fresh game tree from the current position every turn,
//! scores each reached position with a heuristic and picks a column with a
//! minimax search using alpha-beta pruning.
//!
//! # Basic Usage
//!
//! ```
//! use connect4_minimax::{ArrayBoard, MiniMax, SearchConfig, WindowHeuristic};
//!
//!# use std::error::Error;
//!# fn main() -> Result<(), Box<dyn Error>> {
//! let mut board = ArrayBoard::from_moves("112233")?;
//! let mut minimax = MiniMax::new(&mut board, WindowHeuristic, SearchConfig::default())?;
//! let best_move = minimax.get_move()?;
//!
//! // player 1 completes the bottom row
//! assert_eq!(best_move, 3);
//!# Ok(())
//!# }
//! ```

use static_assertions::*;
pub use anyhow;

pub mod board;

pub mod arrayboard;

pub mod heuristic;

pub mod config;

pub mod error;

pub mod node;

pub mod tree;

pub mod minimax;

mod test;

pub use arrayboard::ArrayBoard;
pub use board::{Board, Player};
pub use config::SearchConfig;
pub use error::SearchError;
pub use heuristic::{Scorer, WindowHeuristic};
pub use minimax::{minimax, MiniMax, SearchResult, SearchStats};
pub use node::{Node, Score};

/// The width of the game board in tiles
pub const WIDTH: usize = 7;

/// The height of the game board in tiles
pub const HEIGHT: usize = 6;

// a board needs room for at least one line of four
const_assert!(WIDTH >= 4 || HEIGHT >= 4);
const_assert!(WIDTH > 0 && HEIGHT > 0);
