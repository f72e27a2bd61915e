//! The interface the search needs from a game board

/// One of the two players
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The player who moves after this one
    pub fn other(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// The 1-based number of the player, as shown to users
    pub fn id(self) -> usize {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }
}

impl std::fmt::Display for Player {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.id())
    }
}

/// A mutable game state that can be walked depth-first
///
/// The search never copies the board. Every successful `attempt_move` is
/// followed by exactly one `revert_move` on the same column, in LIFO order,
/// so an implementation only has to undo the most recent move.
pub trait Board {
    /// The number of columns
    fn width(&self) -> usize;

    /// The player whose turn it is
    fn current_player(&self) -> Player;

    /// Tries to drop a tile for the current player into `column`.
    ///
    /// Returns `false` and leaves the board untouched if the move is illegal
    /// (column out of range or full, or the game is already won).
    fn attempt_move(&mut self, column: usize) -> bool;

    /// Undoes the most recent move, which must have been played in `column`
    fn revert_move(&mut self, column: usize);

    /// The winner of the position, if any
    fn winner(&self) -> Option<Player>;
}
