//! Depth-first construction of the game tree over a single shared board

use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::{
    board::{Board, Player},
    heuristic::Scorer,
    node::{Node, Score},
};

/// A move applied to a board, taken back again when the guard is dropped
///
/// The board can only be reached through the guard while the move is on it,
/// so the revert always pairs with the apply in the same stack frame.
pub struct MoveGuard<'a, B: Board + ?Sized> {
    board: &'a mut B,
    column: usize,
}

impl<'a, B: Board + ?Sized> MoveGuard<'a, B> {
    /// Plays `column`, or returns `None` if the move is illegal
    pub fn apply(board: &'a mut B, column: usize) -> Option<Self> {
        if board.attempt_move(column) {
            Some(Self { board, column })
        } else {
            None
        }
    }

    pub fn column(&self) -> usize {
        self.column
    }
}

impl<B: Board + ?Sized> Deref for MoveGuard<'_, B> {
    type Target = B;

    fn deref(&self) -> &Self::Target {
        self.board
    }
}

impl<B: Board + ?Sized> DerefMut for MoveGuard<'_, B> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.board
    }
}

impl<B: Board + ?Sized> Drop for MoveGuard<'_, B> {
    fn drop(&mut self) {
        self.board.revert_move(self.column);
    }
}

/// Scores the board for both players
pub fn score_position<B, S>(board: &B, scorer: &S) -> Score
where
    B: Board + ?Sized,
    S: Scorer<B> + ?Sized,
{
    Score::new(
        scorer.score(Player::One, board),
        scorer.score(Player::Two, board),
    )
}

/// Expands `node` with one child per legal column, recursing while
/// `depth < max_depth` and the reached position has no winner.
///
/// The board is left exactly as it was on entry.
pub fn construct_game_tree<B, S>(
    board: &mut B,
    scorer: &S,
    node: &mut Node,
    depth: usize,
    max_depth: usize,
) where
    B: Board + ?Sized,
    S: Scorer<B> + ?Sized,
{
    for column in 0..board.width() {
        let mut guard = match MoveGuard::apply(&mut *board, column) {
            Some(guard) => guard,
            None => {
                trace!(column, depth, "illegal move skipped");
                continue;
            }
        };

        let child = node.add(Node::new(score_position(&*guard, scorer), column));

        if depth < max_depth && guard.winner().is_none() {
            construct_game_tree(&mut *guard, scorer, child, depth + 1, max_depth);
        }
    }
}
