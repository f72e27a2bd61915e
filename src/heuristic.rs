//! Static evaluation of board positions

use crate::{
    arrayboard::{ArrayBoard, Cell},
    board::{Board, Player},
    HEIGHT, WIDTH,
};

/// The score of a won position for the winner (and its negation for the loser)
pub const WIN_SCORE: f64 = 1_000_000.0;

const FOUR_SCORE: f64 = 100.0;
const THREE_SCORE: f64 = 5.0;
const TWO_SCORE: f64 = 2.0;
const OPPONENT_THREE_SCORE: f64 = -4.0;
const CENTRE_SCORE: f64 = 3.0;

/// Evaluates a position from one player's point of view
///
/// Higher is better for `player`. The search calls this once per player for
/// every position it reaches.
pub trait Scorer<B: ?Sized> {
    fn score(&self, player: Player, board: &B) -> f64;
}

impl<B: ?Sized, F> Scorer<B> for F
where
    F: Fn(Player, &B) -> f64,
{
    fn score(&self, player: Player, board: &B) -> f64 {
        self(player, board)
    }
}

/// Counts the open lines of four each player can still complete
#[derive(Copy, Clone, Debug, Default)]
pub struct WindowHeuristic;

impl WindowHeuristic {
    fn score_window(window: [Cell; 4], player: Player) -> f64 {
        let own = Cell::from(player);
        let opponent = Cell::from(player.other());

        let own_count = window.iter().filter(|&&c| c == own).count();
        let opponent_count = window.iter().filter(|&&c| c == opponent).count();
        let empty_count = window.iter().filter(|c| c.is_empty()).count();

        match (own_count, opponent_count, empty_count) {
            (4, _, _) => FOUR_SCORE,
            (3, _, 1) => THREE_SCORE,
            (2, _, 2) => TWO_SCORE,
            (_, 3, 1) => OPPONENT_THREE_SCORE,
            _ => 0.0,
        }
    }
}

impl Scorer<ArrayBoard> for WindowHeuristic {
    fn score(&self, player: Player, board: &ArrayBoard) -> f64 {
        match board.winner() {
            Some(winner) if winner == player => return WIN_SCORE,
            Some(_) => return -WIN_SCORE,
            None => {}
        }

        let own = Cell::from(player);
        let centre = WIDTH / 2;
        let mut score = (0..HEIGHT)
            .filter(|&row| board.cell(centre, row) == own)
            .count() as f64
            * CENTRE_SCORE;

        // (dx, dy) for horizontal, vertical and both diagonals
        for &(dx, dy) in [(1i32, 0i32), (0, 1), (1, 1), (1, -1)].iter() {
            for column in 0..WIDTH as i32 {
                for row in 0..HEIGHT as i32 {
                    let end_x = column + 3 * dx;
                    let end_y = row + 3 * dy;
                    if end_x < 0 || end_x >= WIDTH as i32 || end_y < 0 || end_y >= HEIGHT as i32 {
                        continue;
                    }
                    let mut window = [Cell::Empty; 4];
                    for (i, cell) in window.iter_mut().enumerate() {
                        let i = i as i32;
                        *cell = board.cell((column + i * dx) as usize, (row + i * dy) as usize);
                    }
                    score += Self::score_window(window, player);
                }
            }
        }
        score
    }
}
