use anyhow::{anyhow, Result};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing::info;
use tracing_subscriber::EnvFilter;

use std::io::{stdin, stdout, Write};
use std::time::Instant;

use connect4_minimax::arrayboard::GameState;
use connect4_minimax::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("connect4_minimax=info")),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        Some("selfplay") => self_play(&args[1..]),
        Some(other) => Err(anyhow!(
            "unknown command '{}', expected no arguments or 'selfplay [games] [depth]'",
            other
        )),
        None => play(),
    }
}

/// Asks a yes/no question until a valid answer is given
fn ask(question: &str) -> Result<bool> {
    let stdin = stdin();
    loop {
        let mut buffer = String::new();
        print!("{} y/n: ", question);
        stdout().flush().expect("failed to flush to stdout!");
        stdin.read_line(&mut buffer)?;
        match buffer.to_lowercase().chars().next() {
            Some('y') => return Ok(true),
            Some('n') => return Ok(false),
            _ => println!("Unknown answer given"),
        }
    }
}

fn ask_config() -> Result<SearchConfig> {
    let default = SearchConfig::from_env()?;
    let stdin = stdin();
    loop {
        let mut buffer = String::new();
        print!("Search depth (default {}): ", default.depth);
        stdout().flush().expect("failed to flush to stdout!");
        stdin.read_line(&mut buffer)?;
        if buffer.trim().is_empty() {
            return Ok(default);
        }
        match SearchConfig::parse(&buffer) {
            Ok(config) => return Ok(config),
            Err(err) => println!("{}", err),
        }
    }
}

fn play() -> Result<()> {
    let mut board = ArrayBoard::new();
    let stdin = stdin();

    println!("Welcome to Connect 4\n");

    let ai_players = (
        ask("Is player 1 AI controlled?")?,
        ask("Is player 2 AI controlled?")?,
    );
    let config = if ai_players.0 || ai_players.1 {
        ask_config()?
    } else {
        SearchConfig::default()
    };

    // game loop
    loop {
        board.display().expect("Failed to draw board!");

        match board.state() {
            GameState::Playing => {
                let ai_turn = match board.current_player() {
                    Player::One => ai_players.0,
                    Player::Two => ai_players.1,
                };
                let next_move = if ai_turn {
                    println!("AI is thinking...");
                    stdout().flush().expect("Failed to flush to stdout!");

                    // slow down play if both players are AI
                    if ai_players == (true, true) {
                        std::thread::sleep(std::time::Duration::new(1, 0));
                    }

                    let start = Instant::now();
                    let mut minimax = MiniMax::new(&mut board, WindowHeuristic, config)?;
                    let result = minimax.par_search()?;
                    info!(
                        column = result.column + 1,
                        score = result.score,
                        visited = minimax.stats.visited,
                        pruned = minimax.stats.pruned,
                        elapsed_ms = start.elapsed().as_millis() as u64,
                        "AI move chosen"
                    );

                    println!("Best move: {} (score {:.1})", result.column + 1, result.score);
                    result.column + 1

                // human player
                } else {
                    print!("Move input > ");
                    stdout().flush().expect("Failed to flush to stdout!");
                    let mut input_str = String::new();
                    stdin.read_line(&mut input_str)?;

                    match input_str.trim().parse::<usize>() {
                        Err(_) => {
                            println!("Invalid number: {}", input_str.trim());
                            continue;
                        }
                        Ok(column) => column,
                    }
                };

                if let Err(err) = board.play_checked(next_move) {
                    println!("{}", err);
                    // try the move again
                    continue;
                }
            }

            // end states
            GameState::PlayerOneWin => {
                println!("Player 1 wins!");
                break;
            }
            GameState::PlayerTwoWin => {
                println!("Player 2 wins!");
                break;
            }
            GameState::Draw => {
                println!("Draw!");
                break;
            }
        }
    }
    println!("Game record: {}", board.game());
    Ok(())
}

/// Plays one engine-vs-engine game from a two-move opening
fn self_play_game(game: usize, config: SearchConfig) -> Result<GameState> {
    let mut board = ArrayBoard::new();
    board.play_checked(game % WIDTH + 1)?;
    board.play_checked((game / WIDTH) % WIDTH + 1)?;

    while board.state() == GameState::Playing {
        let column = MiniMax::new(&mut board, WindowHeuristic, config)?.get_move()?;
        board.play_checked(column + 1)?;
    }
    Ok(board.state())
}

fn self_play(args: &[String]) -> Result<()> {
    let games = match args.get(0) {
        Some(games) => games.parse::<usize>()?,
        None => WIDTH * WIDTH,
    };
    let config = match args.get(1) {
        Some(depth) => SearchConfig::parse(depth)?,
        None => SearchConfig::from_env()?,
    };
    info!(games, depth = config.depth, "starting self-play");

    let start = Instant::now();
    let progress = ProgressBar::new(games as u64);
    progress.set_style(
        ProgressStyle::default_bar()
            .template("Self-play: {bar:40.cyan/blue} {pos}/{len} games ~{eta} remaining")
            .progress_chars("█▓▒░  "),
    );

    let results = (0..games)
        .into_par_iter()
        .map(|game| {
            let state = self_play_game(game, config);
            progress.inc(1);
            state
        })
        .collect::<Result<Vec<_>>>()?;
    progress.finish();

    let count = |wanted: GameState| results.iter().filter(|&&s| s == wanted).count();
    println!(
        "Player 1 wins: {}, Player 2 wins: {}, Draws: {} ({:.1}s)",
        count(GameState::PlayerOneWin),
        count(GameState::PlayerTwoWin),
        count(GameState::Draw),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}
