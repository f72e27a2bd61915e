use anyhow::{anyhow, Result};
use crossterm::{
    cursor::MoveTo,
    style::{style, Attribute, Color, PrintStyledContent},
    QueueableCommand,
};

use std::io::{stdout, Write};

use crate::{
    board::{Board, Player},
    HEIGHT, WIDTH,
};

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Cell {
    PlayerOne,
    PlayerTwo,
    Empty,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn owner(&self) -> Option<Player> {
        match self {
            Cell::PlayerOne => Some(Player::One),
            Cell::PlayerTwo => Some(Player::Two),
            Cell::Empty => None,
        }
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }
}

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

/// A 7x6 board stored as a flat array, with full move history so that moves
/// can be taken back
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct ArrayBoard {
    cells: [Cell; WIDTH * HEIGHT], // cells are stored left-to-right, bottom-to-top
    heights: [usize; WIDTH],
    player: Player,
    history: Vec<usize>,
    winner: Option<Player>,
}

impl ArrayBoard {
    pub fn new() -> Self {
        Self {
            cells: [Cell::Empty; WIDTH * HEIGHT],
            heights: [0; WIDTH],
            player: Player::One,
            history: Vec::with_capacity(WIDTH * HEIGHT),
            winner: None,
        }
    }

    /// Builds a board from a string of 1-indexed column digits
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self> {
        let mut board = Self::new();

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10) {
                Some(column) => {
                    board.play_checked(column as usize)?;
                }
                _ => return Err(anyhow!("could not parse '{}' as a valid move", column_char)),
            }
        }
        Ok(board)
    }

    /// Plays a 1-indexed column, as typed by a human player
    pub fn play_checked(&mut self, column_one_indexed: usize) -> Result<GameState> {
        if column_one_indexed < 1 || column_one_indexed > WIDTH {
            return Err(anyhow!(
                "Invalid move, column {} out of range. Columns must be between 1 and {}",
                column_one_indexed,
                WIDTH
            ));
        }
        if self.winner.is_some() {
            return Err(anyhow!("Invalid move, the game is already over"));
        }
        let column = column_one_indexed - 1;
        if !self.playable(column) {
            return Err(anyhow!("Invalid move, column {} full", column_one_indexed));
        }
        self.play(column);

        Ok(self.state())
    }

    pub fn state(&self) -> GameState {
        match self.winner {
            Some(Player::One) => GameState::PlayerOneWin,
            Some(Player::Two) => GameState::PlayerTwoWin,
            None if self.is_full() => GameState::Draw,
            None => GameState::Playing,
        }
    }

    pub fn cell(&self, column: usize, row: usize) -> Cell {
        self.cells[column + WIDTH * row]
    }

    pub fn num_moves(&self) -> usize {
        self.history.len()
    }

    pub fn is_full(&self) -> bool {
        self.num_moves() == WIDTH * HEIGHT
    }

    /// The moves played so far as 1-indexed column digits
    pub fn game(&self) -> String {
        self.history.iter().map(|c| (c + 1).to_string()).collect()
    }

    pub fn legal_moves(&self) -> impl Iterator<Item = usize> + '_ {
        (0..WIDTH).filter(move |&column| self.winner.is_none() && self.playable(column))
    }

    pub fn display(&self) -> Result<()> {
        let mut stdout = stdout();

        let cols: String = (1..=WIDTH).map(|x| x.to_string()).collect();
        stdout.queue(PrintStyledContent(style(cols + "\n")))?;
        for _ in 0..HEIGHT {
            stdout.queue(PrintStyledContent(style("\n")))?;
        }
        stdout.flush()?;

        let (origin_x, origin_y) = crossterm::cursor::position()?;

        for (idx, cell) in self.cells.iter().enumerate() {
            let (pos_x, pos_y) = (
                origin_x + (idx % WIDTH) as u16,
                origin_y - (idx / WIDTH) as u16,
            );

            stdout
                .queue(MoveTo(pos_x, pos_y))?
                .queue(PrintStyledContent(
                    style("O")
                        .attribute(Attribute::Bold)
                        .on(Color::DarkBlue)
                        .with(match cell {
                            Cell::PlayerOne => Color::Red,
                            Cell::PlayerTwo => Color::Yellow,
                            Cell::Empty => Color::DarkBlue,
                        }),
                ))?;
        }
        stdout
            .queue(MoveTo(origin_x + WIDTH as u16, origin_y))?
            .queue(PrintStyledContent(style("\n")))?;
        stdout.flush()?;
        Ok(())
    }

    fn playable(&self, column: usize) -> bool {
        column < WIDTH && self.heights[column] < HEIGHT
    }

    fn play(&mut self, column: usize) {
        if self.check_winning_move(column) {
            self.winner = Some(self.player);
        }
        self.cells[column + WIDTH * self.heights[column]] = self.player.into();
        self.heights[column] += 1;
        self.history.push(column);
        self.player = self.player.other();
    }

    /// Checks whether the current player would win by playing `column`
    pub fn check_winning_move(&self, column: usize) -> bool {
        let player = Cell::from(self.player);
        // check vertical alignment
        if self.heights[column] >= 3
            && self.cells[column + WIDTH * (self.heights[column] - 1)] == player
            && self.cells[column + WIDTH * (self.heights[column] - 2)] == player
            && self.cells[column + WIDTH * (self.heights[column] - 3)] == player
        {
            return true;
        }

        // check horizontal and diagonal alignment
        for dy_dx in -1i32..=1 {
            let mut run = 0;
            for dx in [-1i32, 1].iter() {
                let mut x = column as i32 + dx;
                let mut y = self.heights[column] as i32 + dx * dy_dx;
                loop {
                    if x < 0
                        || x >= WIDTH as i32
                        || y < 0
                        || y >= HEIGHT as i32
                        || self.cells[x as usize + WIDTH * y as usize] != player
                    {
                        break;
                    }
                    x += dx;
                    y += dx * dy_dx;
                    run += 1;
                }
            }
            if run >= 3 {
                return true;
            }
        }

        false
    }
}

impl Default for ArrayBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl Board for ArrayBoard {
    fn width(&self) -> usize {
        WIDTH
    }

    fn current_player(&self) -> Player {
        self.player
    }

    fn attempt_move(&mut self, column: usize) -> bool {
        if self.winner.is_some() || !self.playable(column) {
            return false;
        }
        self.play(column);
        true
    }

    fn revert_move(&mut self, column: usize) {
        let last = self.history.pop();
        assert_eq!(
            last,
            Some(column),
            "revert_move({}) does not match the last move played",
            column
        );
        self.heights[column] -= 1;
        self.cells[column + WIDTH * self.heights[column]] = Cell::Empty;
        self.player = self.player.other();
        // only the final move of a game can produce a winner
        self.winner = None;
    }

    fn winner(&self) -> Option<Player> {
        self.winner
    }
}
