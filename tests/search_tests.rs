//! Search driver integration tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use rust_boardgame::games::{Hasami, TicTacToe};
use rust_boardgame::{
    Board, GameConfig, GameResult, GameRng, GameRules, MoveRecord, OpCode, PlayerId, SearchConfig,
    SearchDriver, SquareGrid, StopFlag, Topology, MAX_PLY, WIN_VALUE,
};

// =============================================================================
// Helpers
// =============================================================================

fn tictactoe(moves: &[&str]) -> Board<TicTacToe> {
    let mut board = Board::new(TicTacToe::new(), 0);
    for text in moves {
        board.execute(&text.parse().unwrap());
    }
    board
}

/// Exact game value for the side to move: 1 win, 0 draw, -1 loss.
fn minimax(board: &mut Board<TicTacToe>, memo: &mut HashMap<u64, i32>) -> i32 {
    if let Some(outcome) = board.outcome() {
        return match outcome {
            GameResult::Winner(p) if p == board.player() => 1,
            GameResult::Winner(_) => -1,
            GameResult::Draw => 0,
        };
    }
    let digest = board.digest();
    if let Some(&value) = memo.get(&digest) {
        return value;
    }
    let mover = board.player();
    let mut best = -1;
    for mv in board.legal_moves() {
        board.execute(&mv);
        let value = minimax(board, memo);
        let value = if board.player() == mover { value } else { -value };
        board.unexecute(&mv);
        best = best.max(value);
    }
    memo.insert(digest, best);
    best
}

fn game_value(search_value: f64) -> i32 {
    let decided = WIN_VALUE - f64::from(MAX_PLY);
    if search_value >= decided {
        1
    } else if search_value <= -decided {
        -1
    } else {
        0
    }
}

/// Hasami with three of P1's five stones taken off.
fn lopsided_hasami() -> Board<Hasami> {
    let mut board = Board::new(Hasami::new(), 0);
    board.execute(&MoveRecord::edit(PlayerId::FIRST));
    for cell in ["a5", "b5", "c5"] {
        board.execute(&format!("P0 pick {cell}").parse().unwrap());
        board.execute(&"P0 drop #1".parse().unwrap());
    }
    board.execute(&MoveRecord::start(PlayerId::FIRST));
    board.settle();
    board
}

// =============================================================================
// Correctness
// =============================================================================

#[test]
fn test_tictactoe_matches_brute_force() {
    let mut memo = HashMap::new();
    let root = tictactoe(&[]);
    let mut positions = vec![root.clone()];
    for mv in root.legal_moves() {
        let mut next = root.clone();
        next.execute(&mv);
        positions.push(next);
    }

    for position in positions {
        let mut work = position.clone();
        let expected = minimax(&mut work, &mut memo);

        let mut driver = SearchDriver::new(SearchConfig::default().with_depth(9));
        let result = driver.search(&position);
        assert_eq!(game_value(result.value), expected);

        // the chosen move keeps the game value
        let mut after = position.clone();
        after.execute(&result.best_move);
        let value = minimax(&mut after, &mut memo);
        let value = if after.player() == position.player() { value } else { -value };
        assert_eq!(value, expected, "{} throws the game", result.best_move);
    }
}

#[test]
fn test_takes_win_within_two_plies() {
    // P0 wins at once on c1; a slower win must not be preferred
    let board = tictactoe(&["P0 move #0 a1", "P1 move #1 a2", "P0 move #0 b1", "P1 move #1 a3"]);
    let result = SearchDriver::new(SearchConfig::default().with_depth(9)).search(&board);
    assert_eq!(result.best_move.to_string(), "P0 move #0 c1");
    assert_eq!(result.value, WIN_VALUE - 1.0);
}

#[test]
fn test_transposition_table_does_not_change_choice() {
    let positions = [
        tictactoe(&[]),
        tictactoe(&["P0 move #0 b2"]),
        tictactoe(&["P0 move #0 a1", "P1 move #1 c3"]),
        tictactoe(&["P0 move #0 a1", "P1 move #1 b2", "P0 move #0 c3"]),
    ];

    let mut hits = 0;
    for board in &positions {
        for depth in 2..=6 {
            let with = SearchDriver::new(SearchConfig::default().with_depth(depth)).search(board);
            let without = SearchDriver::new(
                SearchConfig::default()
                    .with_depth(depth)
                    .with_transposition(false),
            )
            .search(board);

            assert_eq!(with.best_move, without.best_move, "depth {depth}");
            assert_eq!(with.value, without.value, "depth {depth}");
            assert_eq!(without.stats.tt_hits, 0);
            hits += with.stats.tt_hits;
        }
    }
    assert!(hits > 0);
}

#[test]
fn test_iterative_deepening_agrees_with_fixed_depth() {
    let board = tictactoe(&["P0 move #0 a1", "P1 move #1 b2"]);
    let fixed = SearchDriver::new(SearchConfig::default().with_depth(7)).search(&board);
    let iterative = SearchDriver::new(
        SearchConfig::default()
            .with_depth(7)
            .with_iterative_deepening(true),
    )
    .search(&board);

    assert_eq!(game_value(fixed.value), game_value(iterative.value));
    assert_eq!(iterative.depth, 7);
    assert_eq!(iterative.stats.completed_depth, 7);
}

#[test]
fn test_null_move_stays_close_with_big_advantage() {
    let board = lopsided_hasami();
    let plain = SearchDriver::new(SearchConfig::default().with_depth(5)).search(&board);
    let pruned = SearchDriver::new(
        SearchConfig::default()
            .with_depth(5)
            .with_null_move(true)
            .with_null_move_pruning(true),
    )
    .search(&board);

    assert!(plain.value > 200.0, "P0 should be well ahead, got {}", plain.value);
    assert!(
        (pruned.value - plain.value).abs() <= 250.0,
        "null-move {} vs plain {}",
        pruned.value,
        plain.value
    );
    assert!(board.legal_moves().contains(&pruned.best_move));
}

#[test]
fn test_verify_mode_on_hasami() {
    let board = lopsided_hasami();
    let config = SearchConfig::default()
        .with_depth(3)
        .with_verify_digests(true)
        .with_null_move_pruning(true)
        .with_static_ordering(true);
    let result = SearchDriver::new(config).search(&board);
    assert!(result.stats.nodes > 0);
}

// =============================================================================
// Move selection
// =============================================================================

#[test]
fn test_randomized_choice_varies_with_seed() {
    let board = Board::new(Hasami::new(), 0);
    let mut chosen = std::collections::HashSet::new();
    for seed in 0..20 {
        let config = SearchConfig::default()
            .with_depth(2)
            .with_seed(seed)
            .with_randomization(3, 1000.0);
        let result = SearchDriver::new(config).search(&board);
        assert!(board.legal_moves().contains(&result.best_move));
        chosen.insert(result.best_move);
    }
    assert!(chosen.len() > 1);
}

#[test]
fn test_randomization_never_gives_up_a_win() {
    let board = tictactoe(&["P0 move #0 a1", "P1 move #1 a2", "P0 move #0 b1", "P1 move #1 b2"]);
    for seed in 0..10 {
        let config = SearchConfig::default()
            .with_depth(3)
            .with_seed(seed)
            .with_randomization(5, 1e9);
        let result = SearchDriver::new(config).search(&board);
        assert_eq!(result.best_move.to_string(), "P0 move #0 c1");
    }
}

#[test]
fn test_good_enough_stops_at_first_root_move() {
    let board = tictactoe(&[]);
    let config = SearchConfig::default().with_depth(4).with_good_enough(-1e9);
    let result = SearchDriver::new(config).search(&board);

    assert_eq!(result.best_move, board.legal_moves()[0]);
    let searched = result.root_moves.iter().filter(|r| r.value.is_finite()).count();
    assert_eq!(searched, 1);
}

#[test]
fn test_good_enough_ends_iterative_deepening() {
    let board = tictactoe(&[]);
    let config = SearchConfig::default()
        .with_depth(6)
        .with_iterative_deepening(true)
        .with_good_enough(-1e9);
    let result = SearchDriver::new(config).search(&board);

    assert_eq!(result.depth, 1);
    assert_eq!(result.stats.completed_depth, 1);
    assert!(!result.stats.interrupted);
    assert_eq!(result.best_move, board.legal_moves()[0]);
    let searched = result.root_moves.iter().filter(|r| r.value.is_finite()).count();
    assert_eq!(searched, 1);
    // one root child, evaluated at depth 1
    assert_eq!(result.stats.evaluations, 1);
}

#[test]
fn test_principal_variation_reuse() {
    let mut board = tictactoe(&[]);
    let mut driver = SearchDriver::new(SearchConfig::default().with_depth(9).with_pv_reuse(true));

    let first = driver.search(&board);
    assert!(first.principal_variation.len() >= 3);
    board.execute(&first.principal_variation[0]);
    board.execute(&first.principal_variation[1]);

    let second = driver.search(&board);
    assert!(second.reused_pv);
    assert_eq!(second.best_move, first.principal_variation[2]);
    assert_eq!(second.stats.nodes, 0);
}

#[test]
fn test_unexpected_reply_searches_again() {
    let mut board = tictactoe(&[]);
    let mut driver = SearchDriver::new(SearchConfig::default().with_depth(9).with_pv_reuse(true));

    let first = driver.search(&board);
    board.execute(&first.best_move);
    let predicted = &first.principal_variation[1];
    let other = board
        .legal_moves()
        .into_iter()
        .find(|mv| mv != predicted)
        .unwrap();
    board.execute(&other);

    let second = driver.search(&board);
    assert!(!second.reused_pv);
    assert!(second.stats.nodes > 0);
}

// =============================================================================
// Termination
// =============================================================================

#[test]
fn test_stop_flag_returns_within_one_node() {
    let board = Board::new(Hasami::builder().size(7).build(), 0);
    let stop = StopFlag::new();
    let evaluations = Arc::new(AtomicU64::new(0));

    let count = Arc::clone(&evaluations);
    let flag = stop.clone();
    let evaluator = move |board: &Board<Hasami>, player: PlayerId| {
        if count.fetch_add(1, Ordering::SeqCst) + 1 == 25 {
            flag.stop();
        }
        board.rules().evaluate(board, player)
    };

    let mut driver = SearchDriver::new(SearchConfig::default().with_depth(8))
        .with_evaluator(evaluator)
        .with_stop_flag(stop);
    let result = driver.search(&board);

    assert!(result.stats.interrupted);
    assert_eq!(evaluations.load(Ordering::SeqCst), 25);
    assert!(board.legal_moves().contains(&result.best_move));
}

#[test]
fn test_time_limit() {
    let board = Board::new(Hasami::builder().size(7).build(), 0);
    let config = SearchConfig::default()
        .with_depth(40)
        .with_iterative_deepening(true)
        .with_time_limit_ms(50);
    let result = SearchDriver::new(config).search(&board);

    assert!(result.stats.interrupted);
    assert!(result.depth >= 1);
    assert!(board.legal_moves().contains(&result.best_move));
}

/// A game where the side to move is stuck without a legal move.
struct Stuck {
    config: GameConfig,
    grid: SquareGrid,
    can_pass: bool,
}

impl Stuck {
    fn new(can_pass: bool) -> Self {
        Self {
            config: GameConfig::new("stuck"),
            grid: SquareGrid::new(2, 2),
            can_pass,
        }
    }
}

impl GameRules for Stuck {
    fn config(&self) -> &GameConfig {
        &self.config
    }

    fn topology(&self) -> &dyn Topology {
        &self.grid
    }

    fn setup(&self, _board: &mut Board<Self>, _rng: &mut GameRng) {}

    fn legal_moves(&self, _board: &Board<Self>) -> Vec<MoveRecord> {
        Vec::new()
    }

    fn winner(&self, _board: &Board<Self>) -> Option<GameResult> {
        None
    }

    fn evaluate(&self, _board: &Board<Self>, _player: PlayerId) -> f64 {
        0.0
    }

    fn can_pass(&self, _board: &Board<Self>) -> bool {
        self.can_pass
    }
}

#[test]
fn test_fallback_moves() {
    let board = Board::new(Stuck::new(true), 0);
    let result = SearchDriver::new(SearchConfig::default()).search(&board);
    assert!(result.fallback);
    assert_eq!(result.best_move.op, OpCode::Pass);

    let mut board = Board::new(Stuck::new(false), 0);
    let result = SearchDriver::new(SearchConfig::default()).search(&board);
    assert_eq!(result.best_move.op, OpCode::Resign);
    board.execute(&result.best_move);
    board.execute(&MoveRecord::done(board.player()));
    assert_eq!(board.outcome(), Some(GameResult::Winner(PlayerId::SECOND)));
}
