//! A depth-limited minimax agent with alpha-beta pruning

use rayon::prelude::*;
use tracing::{debug, trace};

use crate::{
    board::{Board, Player},
    config::SearchConfig,
    error::SearchError,
    heuristic::Scorer,
    node::Node,
    tree::{construct_game_tree, score_position, MoveGuard},
};

/// The column chosen by a search and its score for the player who asked
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub column: usize,
    pub score: f64,
}

/// Counters from the last search (for diagnostics only)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes visited by the search
    pub visited: usize,
    /// Children skipped by alpha-beta cutoffs
    pub pruned: usize,
}

/// An agent choosing moves for the side to play on a borrowed board
///
/// # Notes
/// Every search builds a fresh game tree from the current position by playing
/// and taking back moves on the board in place, then walks the tree with
/// minimax and alpha-beta pruning. Nothing is cached between searches.
///
/// # Tie Breaking
/// Children are visited in ascending column order and only a strictly better
/// score replaces the current best, so equal scores favour the leftmost column.
pub struct MiniMax<'a, B: Board, S: Scorer<B>> {
    board: &'a mut B,
    scorer: S,
    config: SearchConfig,

    pub stats: SearchStats,
}

impl<'a, B: Board, S: Scorer<B>> MiniMax<'a, B, S> {
    pub fn new(board: &'a mut B, scorer: S, config: SearchConfig) -> Result<Self, SearchError> {
        if board.width() == 0 {
            return Err(SearchError::ZeroWidth);
        }
        config.validate()?;
        Ok(Self {
            board,
            scorer,
            config,
            stats: SearchStats::default(),
        })
    }

    pub fn config(&self) -> SearchConfig {
        self.config
    }

    pub fn board(&self) -> &B {
        &*self.board
    }

    /// Builds the game tree rooted at the current position
    pub fn build_tree(&mut self) -> Node {
        let mut root = Node::root(score_position(&*self.board, &self.scorer));
        self.construct_game_tree(&mut root, 0);
        root
    }

    /// Expands `node`, which must represent the current board position
    pub fn construct_game_tree(&mut self, node: &mut Node, depth: usize) {
        construct_game_tree(&mut *self.board, &self.scorer, node, depth, self.config.depth);
    }

    /// Finds the best column for the player to move
    pub fn get_move(&mut self) -> Result<usize, SearchError> {
        self.search().map(|result| result.column)
    }

    /// Finds the best column for the player to move, along with its score
    pub fn search(&mut self) -> Result<SearchResult, SearchError> {
        let player = self.board.current_player();
        let root = self.build_tree();

        self.stats = SearchStats::default();
        let (column, score) =
            self.evaluate(&root, false, player, f64::NEG_INFINITY, f64::INFINITY);

        debug!(
            %player,
            ?column,
            score,
            tree_size = root.size(),
            visited = self.stats.visited,
            pruned = self.stats.pruned,
            "search complete"
        );

        column
            .map(|column| SearchResult { column, score })
            .ok_or(SearchError::NoLegalMove)
    }

    /// Scores `node` for `player`, returning the column of the chosen child
    ///
    /// A leaf returns its own column and score. `minimising` flips every ply.
    pub fn evaluate(
        &mut self,
        node: &Node,
        minimising: bool,
        player: Player,
        alpha: f64,
        beta: f64,
    ) -> (Option<usize>, f64) {
        alpha_beta(node, minimising, player, alpha, beta, &mut self.stats)
    }
}

impl<'a, B, S> MiniMax<'a, B, S>
where
    B: Board + Clone + Send + Sync,
    S: Scorer<B> + Sync,
{
    /// Searches each root move on its own copy of the board in parallel
    ///
    /// Each root move is searched with a full window, so the result is the
    /// same as `search`.
    pub fn par_search(&mut self) -> Result<SearchResult, SearchError> {
        let player = self.board.current_player();
        let width = self.board.width();
        let max_depth = self.config.depth;
        let scorer = &self.scorer;
        let board: &B = &*self.board;

        let results: Vec<(usize, f64, SearchStats)> = (0..width)
            .into_par_iter()
            .filter_map(|column| {
                let mut board = board.clone();
                let mut guard = MoveGuard::apply(&mut board, column)?;

                let mut child = Node::new(score_position(&*guard, scorer), column);
                if max_depth > 0 && guard.winner().is_none() {
                    construct_game_tree(&mut *guard, scorer, &mut child, 1, max_depth);
                }
                drop(guard);

                let mut stats = SearchStats::default();
                let (_, score) = alpha_beta(
                    &child,
                    true,
                    player,
                    f64::NEG_INFINITY,
                    f64::INFINITY,
                    &mut stats,
                );
                Some((column, score, stats))
            })
            .collect();

        self.stats = SearchStats {
            visited: 1 + results.iter().map(|r| r.2.visited).sum::<usize>(),
            pruned: results.iter().map(|r| r.2.pruned).sum(),
        };

        // collect keeps column order, so the same rule as the sequential root keeps the leftmost tie
        let mut best: Best = None;
        for &(column, score, _) in results.iter() {
            if improves(best, score, false) {
                best = Some((Some(column), score));
            }
        }

        debug!(
            %player,
            ?best,
            visited = self.stats.visited,
            pruned = self.stats.pruned,
            "parallel search complete"
        );
        match best {
            Some((Some(column), score)) => Ok(SearchResult { column, score }),
            _ => Err(SearchError::NoLegalMove),
        }
    }
}

/// The best child found so far: its column and score. `None` until the first child is scored.
type Best = Option<(Option<usize>, f64)>;

/// Whether `score` should replace `best`. The first child always does, after
/// that only a strictly better score.
fn improves(best: Best, score: f64, minimising: bool) -> bool {
    match best {
        None => true,
        Some((_, best_score)) if minimising => score < best_score,
        Some((_, best_score)) => score > best_score,
    }
}

pub(crate) fn alpha_beta(
    node: &Node,
    minimising: bool,
    player: Player,
    mut alpha: f64,
    mut beta: f64,
    stats: &mut SearchStats,
) -> (Option<usize>, f64) {
    stats.visited += 1;

    let children = node.children();
    let mut best: Best = None;
    for (i, child) in children.iter().enumerate() {
        let (_, score) = alpha_beta(child, !minimising, player, alpha, beta, stats);
        if improves(best, score, minimising) {
            best = Some((child.column(), score));
        }
        if let Some((_, best_score)) = best {
            if minimising {
                beta = beta.min(best_score);
            } else {
                alpha = alpha.max(best_score);
            }
        }
        if beta <= alpha {
            let pruned = children.len() - i - 1;
            stats.pruned += pruned;
            trace!(pruned, minimising, "cutoff");
            break;
        }
    }

    // a leaf is scored directly and returns the column that reached it
    best.unwrap_or_else(|| (node.column(), node.score().for_player(player)))
}

/// Plain minimax over the whole tree, without pruning
///
/// Breaks ties the same way as the pruned search and returns the same result.
pub fn minimax(node: &Node, minimising: bool, player: Player) -> (Option<usize>, f64) {
    let mut best: Best = None;
    for child in node.children() {
        let (_, score) = minimax(child, !minimising, player);
        if improves(best, score, minimising) {
            best = Some((child.column(), score));
        }
    }
    best.unwrap_or_else(|| (node.column(), node.score().for_player(player)))
}
