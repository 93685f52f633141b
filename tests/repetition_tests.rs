//! Repetition tracking in live games and inside the search.

use rust_boardgame::games::Hasami;
use rust_boardgame::{
    Board, BoardPhase, GameResult, MoveRecord, OpCode, RepetitionTracker, SearchConfig,
    SearchDriver,
};

const SHUFFLE: [&str; 4] = ["P0 move a1 a2", "P1 move e5 e4", "P0 move a2 a1", "P1 move e4 e5"];

fn play(board: &mut Board<Hasami>, tracker: &mut RepetitionTracker, text: &str) {
    let mv: MoveRecord = text.parse().unwrap();
    board.execute(&mv);
    board.settle();
    tracker.observe(board);
}

#[test]
fn test_third_occurrence_enters_draw_pending() {
    let mut board = Board::new(Hasami::new(), 0);
    let mut tracker = RepetitionTracker::new();
    let start = board.digest();
    tracker.observe(&mut board);

    for text in SHUFFLE {
        play(&mut board, &mut tracker, text);
    }
    assert_eq!(tracker.occurrences(start), 2);
    assert_eq!(board.phase(), BoardPhase::Play);

    for text in SHUFFLE {
        play(&mut board, &mut tracker, text);
    }
    assert_eq!(tracker.occurrences(start), 3);
    assert_eq!(board.phase(), BoardPhase::DrawPending);

    // the claim is offered next to the normal moves
    let moves = board.legal_moves();
    assert!(moves.iter().any(|mv| mv.op == OpCode::Done));
    assert!(moves.iter().any(|mv| mv.op == OpCode::Move));
}

#[test]
fn test_claiming_the_draw() {
    let mut board = Board::new(Hasami::new(), 0);
    let mut tracker = RepetitionTracker::new();
    tracker.observe(&mut board);
    for text in SHUFFLE.iter().cycle().take(8) {
        play(&mut board, &mut tracker, text);
    }

    board.execute(&MoveRecord::done(board.player()));
    assert_eq!(board.outcome(), Some(GameResult::Draw));
    assert_eq!(board.phase(), BoardPhase::Gameover);
}

#[test]
fn test_playing_on_declines_the_draw() {
    let mut board = Board::new(Hasami::new(), 0);
    let mut tracker = RepetitionTracker::new();
    tracker.observe(&mut board);
    for text in SHUFFLE.iter().cycle().take(8) {
        play(&mut board, &mut tracker, text);
    }
    let pending_digest = board.digest();

    let mv: MoveRecord = "P0 move b1 b2".parse().unwrap();
    board.execute(&mv);
    assert_eq!(board.phase(), BoardPhase::Play);
    assert_eq!(board.player(), rust_boardgame::PlayerId::SECOND);

    board.unexecute(&mv);
    assert_eq!(board.phase(), BoardPhase::DrawPending);
    assert_eq!(board.digest(), pending_digest);
}

#[test]
fn test_take_back_forgets_occurrence() {
    let mut board = Board::new(Hasami::new(), 0);
    let mut tracker = RepetitionTracker::new();
    tracker.observe(&mut board);

    let mv: MoveRecord = SHUFFLE[0].parse().unwrap();
    board.execute(&mv);
    tracker.observe(&mut board);
    let after = board.digest();
    assert_eq!(tracker.occurrences(after), 1);

    tracker.forget(after);
    board.unexecute(&mv);
    assert_eq!(tracker.occurrences(after), 0);
}

/// One stone each, on a1 and e5, P0 to move.
fn lone_stones() -> Board<Hasami> {
    let mut board = Board::new(Hasami::new(), 0);
    board.execute(&MoveRecord::edit(board.player()));
    for (cell, pool) in [
        ("b1", "#0"),
        ("c1", "#0"),
        ("d1", "#0"),
        ("e1", "#0"),
        ("a5", "#1"),
        ("b5", "#1"),
        ("c5", "#1"),
        ("d5", "#1"),
    ] {
        board.execute(&format!("P0 pick {cell}").parse().unwrap());
        board.execute(&format!("P0 drop {pool}").parse().unwrap());
    }
    board.execute(&MoveRecord::start(rust_boardgame::PlayerId::FIRST));
    board.settle();
    board
}

#[test]
fn test_search_scores_path_repetition_as_draw() {
    // a1-a2, e5-e4, a2-a1, e4-e5 comes back to the root four plies down
    let board = lone_stones();
    let config = SearchConfig::default()
        .with_depth(5)
        .with_transposition(false)
        .with_killers(false);
    let result = SearchDriver::new(config).search(&board);
    assert!(result.stats.repetitions > 0);
}

#[test]
fn test_losing_side_claims_pending_draw() {
    // P1 is two stones down when the repetition draw is offered
    let mut board = Board::new(Hasami::new(), 0);
    board.execute(&MoveRecord::edit(board.player()));
    for cell in ["b5", "c5"] {
        board.execute(&format!("P0 pick {cell}").parse().unwrap());
        board.execute(&"P0 drop #1".parse().unwrap());
    }
    board.execute(&MoveRecord::start(rust_boardgame::PlayerId::SECOND));
    board.settle();

    let mut tracker = RepetitionTracker::new();
    tracker.observe(&mut board);
    let shuffle = ["P1 move e5 e4", "P0 move a1 a2", "P1 move e4 e5", "P0 move a2 a1"];
    for text in shuffle.iter().cycle().take(8) {
        play(&mut board, &mut tracker, text);
    }
    assert_eq!(board.phase(), BoardPhase::DrawPending);
    assert_eq!(board.player(), rust_boardgame::PlayerId::SECOND);

    let result = SearchDriver::new(SearchConfig::default().with_depth(2)).search(&board);
    assert_eq!(result.best_move.op, OpCode::Done);
    assert_eq!(result.value, 0.0);
}
