#[cfg(test)]
pub mod test {
    use anyhow::Result;
    use std::env::VarError;
    use std::ffi::OsString;
    use std::panic::{catch_unwind, AssertUnwindSafe};

    use crate::heuristic::WIN_SCORE;
    use crate::tree::MoveGuard;
    use crate::*;

    /// A complete 42-tile game in which nobody connects four
    const DRAWN_GAME: &str = "656173566152215676422337377473141445425321";

    const POSITIONS: [&str; 8] = [
        "",
        "4",
        "44",
        "4453",
        "112233",
        "334455",
        "121212",
        "1111112222",
    ];

    /// A board with no legal moves at all
    struct StubBoard {
        width: usize,
    }

    impl Board for StubBoard {
        fn width(&self) -> usize {
            self.width
        }
        fn current_player(&self) -> Player {
            Player::One
        }
        fn attempt_move(&mut self, _column: usize) -> bool {
            false
        }
        fn revert_move(&mut self, column: usize) {
            panic!("revert_move({}) without a move", column);
        }
        fn winner(&self) -> Option<Player> {
            None
        }
    }

    fn flat(_: Player, _: &StubBoard) -> f64 {
        0.0
    }

    #[test]
    pub fn attempt_and_revert() -> Result<()> {
        let mut board = ArrayBoard::from_moves("4453")?;
        let snapshot = board.clone();

        assert!(board.attempt_move(0));
        assert_eq!(board.current_player(), Player::Two);
        assert_eq!(board.num_moves(), 5);
        board.revert_move(0);

        assert_eq!(board, snapshot);
        Ok(())
    }

    #[test]
    pub fn illegal_moves_are_rejected() -> Result<()> {
        let mut board = ArrayBoard::from_moves("111111")?;
        let snapshot = board.clone();

        assert!(!board.attempt_move(0));
        assert!(!board.attempt_move(WIDTH));
        assert_eq!(board, snapshot);

        assert!(ArrayBoard::from_moves("1111111").is_err());
        assert!(ArrayBoard::from_moves("8").is_err());
        assert!(ArrayBoard::from_moves("1x").is_err());
        Ok(())
    }

    #[test]
    pub fn winner_detection() -> Result<()> {
        let mut board = ArrayBoard::from_moves("121212")?;
        assert_eq!(board.winner(), None);
        assert!(board.check_winning_move(0));

        assert!(board.attempt_move(0));
        assert_eq!(board.winner(), Some(Player::One));
        // no moves once the game is over
        assert!(!board.attempt_move(3));
        assert_eq!(board.legal_moves().count(), 0);

        board.revert_move(0);
        assert_eq!(board.winner(), None);
        assert_eq!(board, ArrayBoard::from_moves("121212")?);
        Ok(())
    }

    #[test]
    pub fn heuristic_scores() -> Result<()> {
        let centre = ArrayBoard::from_moves("4")?;
        let edge = ArrayBoard::from_moves("1")?;
        assert!(
            WindowHeuristic.score(Player::One, &centre) > WindowHeuristic.score(Player::One, &edge)
        );

        let won = ArrayBoard::from_moves("1212121")?;
        assert_eq!(WindowHeuristic.score(Player::One, &won), WIN_SCORE);
        assert_eq!(WindowHeuristic.score(Player::Two, &won), -WIN_SCORE);

        let empty = ArrayBoard::new();
        assert_eq!(WindowHeuristic.score(Player::One, &empty), 0.0);
        Ok(())
    }

    #[test]
    pub fn config_validation() {
        assert_eq!(SearchConfig::default().depth, config::DEFAULT_DEPTH);
        assert_eq!(SearchConfig::parse(" 3 \n"), Ok(SearchConfig { depth: 3 }));
        assert_eq!(
            SearchConfig::new(config::MAX_DEPTH + 1),
            Err(SearchError::DepthTooLarge {
                depth: config::MAX_DEPTH + 1,
                max: config::MAX_DEPTH
            })
        );
        assert_eq!(
            SearchConfig::parse("-1"),
            Err(SearchError::InvalidDepth("-1".to_string()))
        );

        let mut board = ArrayBoard::new();
        let too_deep = SearchConfig { depth: 99 };
        assert!(MiniMax::new(&mut board, WindowHeuristic, too_deep).is_err());
    }

    #[test]
    pub fn zero_width_board() {
        let mut board = StubBoard { width: 0 };
        let result = MiniMax::new(&mut board, flat, SearchConfig::default());
        assert!(matches!(result, Err(SearchError::ZeroWidth)));
    }

    #[test]
    pub fn guard_reverts_on_early_exit() -> Result<()> {
        let mut board = ArrayBoard::from_moves("4453")?;
        let snapshot = board.clone();

        fn bail(board: &mut ArrayBoard) -> Option<()> {
            let guard = MoveGuard::apply(board, 2)?;
            assert_eq!(guard.num_moves(), 5);
            None
        }
        assert_eq!(bail(&mut board), None);
        assert_eq!(board, snapshot);

        let unwound = catch_unwind(AssertUnwindSafe(|| {
            let _guard = MoveGuard::apply(&mut board, 6);
            panic!("unwinding through a guard");
        }));
        assert!(unwound.is_err());
        assert_eq!(board, snapshot);

        assert!(MoveGuard::apply(&mut ArrayBoard::from_moves("111111")?, 0).is_none());
        Ok(())
    }

    #[test]
    pub fn tree_construction_restores_board() -> Result<()> {
        for moves in POSITIONS.iter() {
            let mut board = ArrayBoard::from_moves(moves)?;
            let snapshot = board.clone();
            {
                let mut minimax = MiniMax::new(&mut board, WindowHeuristic, SearchConfig::new(3)?)?;
                minimax.build_tree();
                assert_eq!(minimax.board(), &snapshot);
                minimax.search()?;
            }
            assert_eq!(board, snapshot);
        }
        Ok(())
    }

    #[test]
    pub fn empty_board_tree_shape() -> Result<()> {
        let mut board = ArrayBoard::new();
        let mut minimax = MiniMax::new(&mut board, WindowHeuristic, SearchConfig::new(1)?)?;
        let root = minimax.build_tree();

        assert_eq!(root.column(), None);
        assert_eq!(root.children().len(), WIDTH);
        for (column, child) in root.children().iter().enumerate() {
            assert_eq!(child.column(), Some(column));
            assert_eq!(child.children().len(), WIDTH);
            assert!(child.children().iter().all(Node::is_leaf));
        }
        // the root's children are expanded `depth` more times
        assert_eq!(root.height(), 2);
        assert_eq!(root.size(), 1 + WIDTH + WIDTH * WIDTH);
        Ok(())
    }

    #[test]
    pub fn children_follow_legal_moves() -> Result<()> {
        let mut board = ArrayBoard::from_moves("1111115555")?;
        let mut minimax = MiniMax::new(&mut board, WindowHeuristic, SearchConfig::new(1)?)?;
        let root = minimax.build_tree();

        let columns: Vec<_> = root.children().iter().filter_map(Node::column).collect();
        assert_eq!(columns, vec![1, 2, 3, 4, 5, 6]);

        // column 5 still has room for one more tile
        let after_five = &root.children()[3];
        assert_eq!(after_five.column(), Some(4));
        let grandchildren: Vec<_> = after_five.children().iter().filter_map(Node::column).collect();
        assert_eq!(grandchildren, vec![1, 2, 3, 4, 5, 6]);
        Ok(())
    }

    #[test]
    pub fn winning_leaf_has_no_children() -> Result<()> {
        let mut board = ArrayBoard::from_moves("121212")?;
        let mut minimax = MiniMax::new(&mut board, WindowHeuristic, SearchConfig::default())?;
        let root = minimax.build_tree();

        let winning = &root.children()[0];
        assert_eq!(winning.column(), Some(0));
        assert!(winning.is_leaf());
        assert_eq!(winning.score().for_player(Player::One), WIN_SCORE);
        assert!(root.children()[1..].iter().all(|child| !child.is_leaf()));
        Ok(())
    }

    #[test]
    pub fn pruning_matches_exhaustive_search() -> Result<()> {
        for moves in POSITIONS.iter() {
            for depth in 0..=3 {
                let mut board = ArrayBoard::from_moves(moves)?;
                let player = board.current_player();
                let mut minimax =
                    MiniMax::new(&mut board, WindowHeuristic, SearchConfig::new(depth)?)?;
                let root = minimax.build_tree();

                let exhaustive = minimax::minimax(&root, false, player);
                minimax.stats = SearchStats::default();
                let pruned =
                    minimax.evaluate(&root, false, player, f64::NEG_INFINITY, f64::INFINITY);

                assert_eq!(pruned, exhaustive, "position '{}' depth {}", moves, depth);
                assert!(minimax.stats.visited + minimax.stats.pruned <= root.size());

                let result = minimax.search()?;
                assert_eq!(Some(result.column), exhaustive.0);
                assert_eq!(result.score, exhaustive.1);
            }
        }
        Ok(())
    }

    #[test]
    pub fn parallel_search_matches_search() -> Result<()> {
        for moves in POSITIONS.iter() {
            for depth in 0..=3 {
                let mut board = ArrayBoard::from_moves(moves)?;
                let mut minimax =
                    MiniMax::new(&mut board, WindowHeuristic, SearchConfig::new(depth)?)?;
                let sequential = minimax.search()?;
                let parallel = minimax.par_search()?;
                assert_eq!(sequential, parallel, "position '{}' depth {}", moves, depth);
            }
        }
        Ok(())
    }

    #[test]
    pub fn chosen_move_is_legal() -> Result<()> {
        for moves in POSITIONS.iter() {
            for depth in 1..=3 {
                let mut board = ArrayBoard::from_moves(moves)?;
                let column =
                    MiniMax::new(&mut board, WindowHeuristic, SearchConfig::new(depth)?)?
                        .get_move()?;
                assert!(column < WIDTH);
                assert!(board.legal_moves().any(|legal| legal == column));
            }
        }
        Ok(())
    }

    #[test]
    pub fn takes_immediate_win() -> Result<()> {
        for depth in 0..=config::DEFAULT_DEPTH {
            let mut board = ArrayBoard::from_moves("121212")?;
            let result =
                MiniMax::new(&mut board, WindowHeuristic, SearchConfig::new(depth)?)?.search()?;
            assert_eq!(result.column, 0);
            assert_eq!(result.score, WIN_SCORE);
        }

        let mut board = ArrayBoard::from_moves("112233")?;
        let column = MiniMax::new(&mut board, WindowHeuristic, SearchConfig::default())?.get_move()?;
        assert_eq!(column, 3);
        Ok(())
    }

    #[test]
    pub fn single_ply_follows_heuristic() -> Result<()> {
        let favour_six = |player: Player, board: &ArrayBoard| {
            (0..HEIGHT)
                .filter(|&row| board.cell(5, row).owner() == Some(player))
                .count() as f64
        };
        let mut board = ArrayBoard::new();
        let mut minimax = MiniMax::new(&mut board, favour_six, SearchConfig::new(0)?)?;
        assert_eq!(minimax.build_tree().children().len(), WIDTH);
        assert_eq!(minimax.search()?, SearchResult { column: 5, score: 1.0 });
        Ok(())
    }

    #[test]
    pub fn ties_favour_leftmost_column() -> Result<()> {
        let indifferent = |_: Player, _: &ArrayBoard| 0.0;
        for moves in ["", "1111112222"].iter() {
            let mut board = ArrayBoard::from_moves(moves)?;
            let first_legal = board.legal_moves().next();
            let mut minimax = MiniMax::new(&mut board, indifferent, SearchConfig::new(2)?)?;
            assert_eq!(Some(minimax.get_move()?), first_legal);
            assert_eq!(Some(minimax.par_search()?.column), first_legal);
        }
        Ok(())
    }

    #[test]
    pub fn no_legal_move() -> Result<()> {
        let mut stub = StubBoard { width: WIDTH };
        let mut minimax = MiniMax::new(&mut stub, flat, SearchConfig::default())?;
        let root = minimax.build_tree();
        assert!(root.is_leaf());
        assert_eq!(
            minimax.evaluate(&root, false, Player::One, f64::NEG_INFINITY, f64::INFINITY).0,
            None
        );
        assert_eq!(minimax.get_move(), Err(SearchError::NoLegalMove));

        // a finished game has no moves left either
        let mut won = ArrayBoard::from_moves("1212121")?;
        let mut minimax = MiniMax::new(&mut won, WindowHeuristic, SearchConfig::default())?;
        assert_eq!(minimax.search(), Err(SearchError::NoLegalMove));
        assert_eq!(minimax.par_search(), Err(SearchError::NoLegalMove));
        Ok(())
    }

    #[test]
    pub fn infinite_scores_still_pick_a_move() -> Result<()> {
        let hopeless = |_: Player, _: &ArrayBoard| f64::NEG_INFINITY;
        let certain = |_: Player, _: &ArrayBoard| f64::INFINITY;

        for depth in 0..=2 {
            let mut board = ArrayBoard::from_moves("4453")?;
            let player = board.current_player();
            let mut minimax = MiniMax::new(&mut board, hopeless, SearchConfig::new(depth)?)?;
            let root = minimax.build_tree();

            let result = minimax.search()?;
            assert_eq!(result, SearchResult { column: 0, score: f64::NEG_INFINITY });
            assert_eq!(minimax.par_search()?, result);
            assert_eq!(minimax::minimax(&root, false, player), (Some(0), f64::NEG_INFINITY));

            let mut board = ArrayBoard::from_moves("4453")?;
            let mut minimax = MiniMax::new(&mut board, certain, SearchConfig::new(depth)?)?;
            let result = minimax.search()?;
            assert_eq!(result, SearchResult { column: 0, score: f64::INFINITY });
            assert_eq!(minimax.par_search()?, result);
        }
        Ok(())
    }

    #[test]
    pub fn nan_scores_still_pick_a_move() -> Result<()> {
        let broken = |_: Player, _: &ArrayBoard| f64::NAN;
        let mut board = ArrayBoard::from_moves("1111112222")?;
        let mut minimax = MiniMax::new(&mut board, broken, SearchConfig::new(1)?)?;

        assert_eq!(minimax.get_move()?, 1);
        assert_eq!(minimax.par_search()?.column, 1);
        Ok(())
    }

    #[test]
    pub fn depth_from_environment_value() {
        assert_eq!(
            SearchConfig::from_var(Err(VarError::NotPresent)),
            Ok(SearchConfig::default())
        );
        assert_eq!(
            SearchConfig::from_var(Ok("2".to_string())),
            Ok(SearchConfig { depth: 2 })
        );
        assert_eq!(
            SearchConfig::from_var(Ok("deep".to_string())),
            Err(SearchError::InvalidDepth("deep".to_string()))
        );
        assert_eq!(
            SearchConfig::from_var(Err(VarError::NotUnicode(OsString::from("4x")))),
            Err(SearchError::InvalidDepth("4x".to_string()))
        );
    }

    #[test]
    pub fn full_board_has_no_move() -> Result<()> {
        let mut board = ArrayBoard::from_moves(DRAWN_GAME)?;
        assert_eq!(board.num_moves(), WIDTH * HEIGHT);
        assert!(board.is_full());
        assert_eq!(board.winner(), None);
        assert_eq!(board.state(), arrayboard::GameState::Draw);
        assert_eq!(board.legal_moves().count(), 0);
        let snapshot = board.clone();

        {
            let mut minimax = MiniMax::new(&mut board, WindowHeuristic, SearchConfig::default())?;
            assert!(minimax.build_tree().is_leaf());
            assert_eq!(minimax.get_move(), Err(SearchError::NoLegalMove));
            assert_eq!(minimax.search(), Err(SearchError::NoLegalMove));
            assert_eq!(minimax.par_search(), Err(SearchError::NoLegalMove));
        }
        assert_eq!(board, snapshot);

        // one tile earlier the last column is the only move
        let mut board = ArrayBoard::from_moves(&DRAWN_GAME[..DRAWN_GAME.len() - 1])?;
        let column = MiniMax::new(&mut board, WindowHeuristic, SearchConfig::default())?.get_move()?;
        assert_eq!(column, 0);
        Ok(())
    }
}
