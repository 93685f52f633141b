//! `Board<G>`: occupancy, turn, phase and the undo journal.
//!
//! ## Mutation
//!
//! Only `execute` and `unexecute` are meant for callers that replay or
//! search. The interactive primitives (`pick`, `drop`, `unpick`, `undrop`,
//! `accept_placement`) are what `execute` is built from and are public for
//! UIs that drive a move one step at a time.
//!
//! ## Failure semantics
//!
//! Every invariant violation panics: illegal operands, operations in the
//! wrong phase, mismatched capture bookkeeping, out-of-order `unexecute`.
//! The board never repairs bad input.

use std::fmt;
use std::sync::Arc;

use im::Vector;
use smallvec::SmallVec;

use super::digest::DigestTable;
use super::journal::{Delta, ExecuteMark, PendingStep, Slot, StepKind};
use super::BoardPhase;
use crate::core::{CellId, GameConfig, GameRng, Piece, PlayerId, PlayerMap, PoolId};
use crate::moves::{Location, MoveRecord, OpCode};
use crate::rules::{GameResult, GameRules};
use crate::topology::{self, Coord, Topology};

type Stack = SmallVec<[Piece; 2]>;

/// A game board for rules `G`.
///
/// ```
/// use rust_boardgame::board::Board;
/// use rust_boardgame::games::TicTacToe;
///
/// let mut board = Board::new(TicTacToe::new(), 1);
/// let before = board.digest();
/// let mv = board.legal_moves()[4].clone();
///
/// board.execute(&mv);
/// assert_ne!(board.digest(), before);
/// board.unexecute(&mv);
/// assert_eq!(board.digest(), before);
/// ```
pub struct Board<G: GameRules> {
    rules: Arc<G>,
    digests: Arc<DigestTable>,
    seed: u64,

    // === Placement ===
    cells: Vec<Stack>,
    pools: Vec<Option<u32>>,
    occupied: usize,
    floating: Option<Piece>,
    pending: Vec<PendingStep>,

    // === Progression ===
    player: PlayerId,
    move_number: u32,
    phase: BoardPhase,
    resigned_from: Option<BoardPhase>,
    outcome: Option<GameResult>,

    // === Per-player ===
    captured: PlayerMap<u32>,
    counters: PlayerMap<Vec<i64>>,

    // === Undo ===
    journal: Vector<Delta>,
    marks: Vec<ExecuteMark>,
}

impl<G: GameRules> Board<G> {
    /// Create a board for `rules` and run its setup.
    ///
    /// `seed` feeds randomized setups only; the digest constants come
    /// from the game configuration.
    pub fn new(rules: G, seed: u64) -> Self {
        let rules = Arc::new(rules);
        let config = rules.config();
        let cell_count = rules.topology().cell_count();
        let digests = Arc::new(DigestTable::new(config, cell_count));
        let counters = PlayerMap::new(|_| config.counters.iter().map(|c| c.initial).collect());

        let mut board = Self {
            digests,
            seed,
            cells: vec![Stack::new(); cell_count],
            pools: config.pools.iter().map(|p| p.count).collect(),
            occupied: 0,
            floating: None,
            pending: Vec::new(),
            player: PlayerId::FIRST,
            move_number: 1,
            phase: if config.starts_in_setup {
                BoardPhase::Setup
            } else {
                BoardPhase::Play
            },
            resigned_from: None,
            outcome: None,
            captured: PlayerMap::with_value(0),
            counters,
            journal: Vector::new(),
            marks: Vec::new(),
            rules: Arc::clone(&rules),
        };

        let mut rng = GameRng::new(seed);
        rules.setup(&mut board, &mut rng);
        board.settle();
        board
    }

    // === Queries ===

    #[must_use]
    pub fn rules(&self) -> &G {
        &self.rules
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        self.rules.config()
    }

    #[must_use]
    pub fn topology(&self) -> &dyn Topology {
        self.rules.topology()
    }

    /// Seed the board was created with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Side to move.
    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    /// Turn counter, starting at 1 and advanced when the side to move changes.
    #[must_use]
    pub fn move_number(&self) -> u32 {
        self.move_number
    }

    #[must_use]
    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    #[must_use]
    pub fn outcome(&self) -> Option<GameResult> {
        self.outcome
    }

    /// Pieces stacked on `cell`, bottom first.
    #[must_use]
    pub fn stack(&self, cell: CellId) -> &[Piece] {
        &self.cells[cell.index()]
    }

    /// Top piece of `cell`.
    #[must_use]
    pub fn occupant(&self, cell: CellId) -> Option<Piece> {
        self.cells[cell.index()].last().copied()
    }

    /// Piece lifted by a pending pick.
    #[must_use]
    pub fn floating(&self) -> Option<Piece> {
        self.floating
    }

    /// Pieces left in a pool, `None` when inexhaustible.
    #[must_use]
    pub fn pool_count(&self, pool: PoolId) -> Option<u32> {
        self.pools[pool.index()]
    }

    /// Pieces captured by `player`.
    #[must_use]
    pub fn captured(&self, player: PlayerId) -> u32 {
        self.captured[player]
    }

    #[must_use]
    pub fn counter(&self, player: PlayerId, index: usize) -> i64 {
        self.counters[player][index]
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.cells.len() - self.occupied
    }

    /// Unconfirmed steps of the move in progress.
    #[must_use]
    pub fn pending(&self) -> &[PendingStep] {
        &self.pending
    }

    /// Pieces removed by the most recent unconfirmed drop.
    #[must_use]
    pub fn pending_captures(&self) -> &[(CellId, Piece)] {
        self.pending
            .iter()
            .rev()
            .find(|s| s.kind == StepKind::Drop)
            .map_or(&[], |s| &s.captures[..])
    }

    /// No move is in progress and the game is not over.
    #[must_use]
    pub fn is_turn_boundary(&self) -> bool {
        matches!(self.phase, BoardPhase::Play | BoardPhase::DrawPending)
            && self.pending.is_empty()
            && self.floating.is_none()
    }

    /// Number of executed moves that can still be unexecuted.
    #[must_use]
    pub fn undo_depth(&self) -> usize {
        self.marks.len()
    }

    /// Complete moves for the side to move.
    #[must_use]
    pub fn legal_moves(&self) -> Vec<MoveRecord> {
        match self.phase {
            BoardPhase::Gameover => Vec::new(),
            BoardPhase::Resign => vec![MoveRecord::done(self.player)],
            BoardPhase::DrawPending => {
                let mut moves = self.rules.legal_moves(self);
                moves.push(MoveRecord::done(self.player));
                moves
            }
            _ => self.rules.legal_moves(self),
        }
    }

    /// Where the floating piece may go, empty when nothing floats.
    #[must_use]
    pub fn legal_destinations(&self) -> Vec<Location> {
        let Some(step) = self.pending.last().filter(|s| s.kind == StepKind::Pick) else {
            return Vec::new();
        };
        let from = self.location_of(step.slot);
        let mut lifted = self.clone();
        lifted.rollback_to(step.journal_len);
        lifted.rules.legal_destinations(&lifted, from)
    }

    /// Cell at a coordinate. Panics when off the board.
    #[must_use]
    pub fn cell(&self, coord: Coord) -> CellId {
        self.topology()
            .cell_at(coord)
            .unwrap_or_else(|| panic!("{coord} is off the board"))
    }

    #[must_use]
    pub fn coord(&self, cell: CellId) -> Coord {
        self.topology().coord_of(cell)
    }

    #[must_use]
    pub fn location_of(&self, slot: Slot) -> Location {
        match slot {
            Slot::Cell(cell) => Location::Cell(self.coord(cell)),
            Slot::Pool(pool) => Location::Pool(pool),
        }
    }

    fn slot_of(&self, location: Location) -> Slot {
        match location {
            Location::Cell(coord) => Slot::Cell(self.cell(coord)),
            Location::Pool(pool) => {
                assert!(
                    pool.index() < self.pools.len(),
                    "pool {pool} does not exist"
                );
                Slot::Pool(pool)
            }
        }
    }

    // === Digest ===

    /// Fingerprint of the logical position.
    ///
    /// Covers occupancy, side to move, phase, the move in progress, finite
    /// pools, capture tallies, digested counters and the outcome. Journal
    /// depth and object identity never contribute.
    #[must_use]
    pub fn digest(&self) -> u64 {
        let t = &self.digests;
        let mut d = t.side_to_move(self.player) ^ t.phase(self.phase, self.player);

        for (i, stack) in self.cells.iter().enumerate() {
            for (level, &piece) in stack.iter().enumerate() {
                d ^= t.stacked(CellId::new(i as u16), piece, level);
            }
        }
        if let Some(piece) = self.floating {
            d ^= t.floating(piece);
        }
        for step in &self.pending {
            d ^= t.pending(step.kind, step.slot);
        }
        for (i, count) in self.pools.iter().enumerate() {
            if let Some(n) = count {
                d ^= t.pool(PoolId::new(i as u8), *n);
            }
        }

        let counters = &self.config().counters;
        for player in PlayerId::both() {
            d ^= t.captured(player, self.captured[player]);
            for (index, counter) in counters.iter().enumerate() {
                if counter.digest {
                    d ^= t.counter(player, index, self.counters[player][index]);
                }
            }
        }
        if let Some(result) = self.outcome {
            d ^= t.outcome(result);
        }
        d
    }

    /// Field-by-field comparison of the logical position.
    ///
    /// Panics if the positions agree but the digests do not.
    #[must_use]
    pub fn same_as(&self, other: &Board<G>) -> bool {
        let same = self.cells == other.cells
            && self.pools == other.pools
            && self.occupied == other.occupied
            && self.floating == other.floating
            && self.pending.len() == other.pending.len()
            && self
                .pending
                .iter()
                .zip(&other.pending)
                .all(|(a, b)| a.kind == b.kind && a.slot == b.slot && a.captures == b.captures)
            && self.player == other.player
            && self.move_number == other.move_number
            && self.phase == other.phase
            && self.resigned_from == other.resigned_from
            && self.outcome == other.outcome
            && self.captured == other.captured
            && self.counters == other.counters;

        if same {
            assert_eq!(
                self.digest(),
                other.digest(),
                "boards are structurally equal but digests differ"
            );
        }
        same
    }

    // === Execute / unexecute ===

    /// Apply a move. Panics if it is not executable in the current state.
    pub fn execute(&mut self, mv: &MoveRecord) {
        assert!(
            self.phase.is_active() || mv.op == OpCode::Edit,
            "{mv} executed after the game ended"
        );
        if self.phase != BoardPhase::Setup && !matches!(mv.op, OpCode::Start | OpCode::Edit) {
            assert_eq!(mv.player, self.player, "{mv} played out of turn");
        }
        assert_eq!(
            mv.operands.len(),
            mv.op.operand_count(),
            "{mv} has the wrong operand count"
        );

        self.marks.push(ExecuteMark {
            record: mv.clone(),
            journal_len: self.journal.len(),
        });

        match mv.op {
            OpCode::Start => self.start(mv.player),
            OpCode::Edit => self.edit(),
            OpCode::Pick => {
                let slot = self.slot_of(mv.operands[0]);
                if self.is_pending(StepKind::Drop, slot) && self.floating.is_none() {
                    self.undrop();
                } else {
                    self.pick_slot(slot);
                }
            }
            OpCode::Drop => {
                let slot = self.slot_of(mv.operands[0]);
                if self.is_pending(StepKind::Pick, slot) && self.floating.is_some() {
                    self.unpick();
                } else {
                    self.drop_slot(slot);
                }
            }
            OpCode::Move => {
                let from = self.slot_of(mv.operands[0]);
                let to = self.slot_of(mv.operands[1]);
                self.pick_slot(from);
                self.drop_slot(to);
                self.done();
            }
            OpCode::Done => self.done(),
            OpCode::Pass => self.pass(),
            OpCode::Resign => self.resign(),
        }
    }

    /// Whether `execute(mv)` would run without tripping an invariant.
    ///
    /// Covers phase, turn, operands, stacks, pools and the move in
    /// progress. Rule legality is not checked; compare against
    /// `legal_moves` for that.
    #[must_use]
    pub fn can_execute(&self, mv: &MoveRecord) -> bool {
        if !self.phase.is_active() && mv.op != OpCode::Edit {
            return false;
        }
        if self.phase != BoardPhase::Setup
            && !matches!(mv.op, OpCode::Start | OpCode::Edit)
            && mv.player != self.player
        {
            return false;
        }
        if mv.operands.len() != mv.op.operand_count() {
            return false;
        }
        let Some(slots) = mv
            .operands
            .iter()
            .map(|&location| self.find_slot(location))
            .collect::<Option<SmallVec<[Slot; 2]>>>()
        else {
            return false;
        };
        let idle = self.floating.is_none();

        match mv.op {
            OpCode::Start => self.phase == BoardPhase::Setup && idle,
            OpCode::Edit | OpCode::Done => idle,
            OpCode::Pass => idle && !matches!(self.phase, BoardPhase::Setup | BoardPhase::Resign),
            OpCode::Resign => true,
            OpCode::Pick => {
                let slot = slots[0];
                idle && (self.is_pending(StepKind::Drop, slot)
                    || (self.can_pick() && self.top_of(slot).is_some()))
            }
            OpCode::Drop => match self.floating {
                Some(_) if self.is_pending(StepKind::Pick, slots[0]) => true,
                Some(piece) => self.can_drop() && self.has_room(slots[0], piece, None),
                None => false,
            },
            OpCode::Move => {
                let (from, to) = (slots[0], slots[1]);
                idle
                    && self.can_pick()
                    && self.can_drop()
                    && self
                        .top_of(from)
                        .is_some_and(|piece| self.has_room(to, piece, Some(from)))
            }
        }
    }

    /// Reverse the most recent `execute`.
    ///
    /// Panics unless `mv` is the move that `execute` most recently applied.
    pub fn unexecute(&mut self, mv: &MoveRecord) {
        let mark = self
            .marks
            .pop()
            .unwrap_or_else(|| panic!("unexecute({mv}) with nothing executed"));
        assert_eq!(&mark.record, mv, "unexecute out of order");
        self.rollback_to(mark.journal_len);
    }

    /// Make history permanent: forget execute marks and the journal.
    ///
    /// Only valid at a rest point with no move in progress.
    pub fn settle(&mut self) {
        assert!(
            self.pending.is_empty() && self.floating.is_none(),
            "cannot settle with a move in progress"
        );
        self.journal = Vector::new();
        self.marks.clear();
    }

    // === Interactive primitives ===

    /// Lift the top piece of `from`.
    pub fn pick(&mut self, from: Location) {
        let slot = self.slot_of(from);
        self.pick_slot(slot);
    }

    /// Put the floating piece on `to`, resolving captures.
    pub fn drop(&mut self, to: Location) {
        let slot = self.slot_of(to);
        self.drop_slot(slot);
    }

    /// Take back a pending pick: the floating piece returns to its source.
    pub fn unpick(&mut self) {
        let step = match self.pending.last() {
            Some(step) if step.kind == StepKind::Pick && self.floating.is_some() => step.clone(),
            _ => panic!("unpick with no pending pick"),
        };
        self.cancel_back_to(step.journal_len);
        debug_assert_eq!(self.phase, step.prior_phase);
    }

    /// Take back a pending drop: the piece floats again and captures return.
    pub fn undrop(&mut self) {
        let step = match self.pending.last() {
            Some(step) if step.kind == StepKind::Drop && self.floating.is_none() => step.clone(),
            _ => panic!("undrop with no pending drop"),
        };
        self.cancel_back_to(step.journal_len);
        for &(cell, victim) in &step.captures {
            assert_eq!(
                self.occupant(cell),
                Some(victim),
                "capture bookkeeping mismatch at {}",
                self.coord(cell)
            );
        }
        debug_assert_eq!(self.phase, step.prior_phase);
    }

    /// Make the pending placement permanent.
    pub fn accept_placement(&mut self) {
        if !self.pending.is_empty() {
            let steps = std::mem::take(&mut self.pending);
            self.journal.push_back(Delta::Accepted { steps });
        }
    }

    /// Journaled update of a per-player counter.
    pub fn set_counter(&mut self, player: PlayerId, index: usize, value: i64) {
        let prior = std::mem::replace(&mut self.counters[player][index], value);
        if prior != value {
            self.journal.push_back(Delta::Counter {
                player,
                index,
                prior,
            });
        }
    }

    /// Place a piece directly on a cell. Used by setup code.
    pub fn place_piece(&mut self, cell: CellId, piece: Piece) {
        self.place(Slot::Cell(cell), piece);
    }

    /// Offer the side to move a draw by repetition.
    pub fn enter_draw_pending(&mut self) {
        assert!(
            self.phase == BoardPhase::Play && self.is_turn_boundary(),
            "a draw can only be offered at a turn boundary"
        );
        self.set_phase(BoardPhase::DrawPending);
    }

    // === Operation bodies ===

    fn is_pending(&self, kind: StepKind, slot: Slot) -> bool {
        self.pending
            .last()
            .is_some_and(|s| s.kind == kind && s.slot == slot)
    }

    fn find_slot(&self, location: Location) -> Option<Slot> {
        match location {
            Location::Cell(coord) => self.topology().cell_at(coord).map(Slot::Cell),
            Location::Pool(pool) => (pool.index() < self.pools.len()).then_some(Slot::Pool(pool)),
        }
    }

    /// Piece a pick from `slot` would lift.
    fn top_of(&self, slot: Slot) -> Option<Piece> {
        match slot {
            Slot::Cell(cell) => self.occupant(cell),
            Slot::Pool(pool) => match self.pools[pool.index()] {
                Some(0) => None,
                _ => Some(self.pool_piece(pool)),
            },
        }
    }

    /// Whether `slot` takes `piece`, after `lifted` gave up its top piece.
    fn has_room(&self, slot: Slot, piece: Piece, lifted: Option<Slot>) -> bool {
        match slot {
            Slot::Cell(cell) => {
                let freed = usize::from(lifted == Some(slot));
                self.cells[cell.index()].len() - freed < self.config().cell_capacity
            }
            Slot::Pool(pool) => self.pool_piece(pool) == piece,
        }
    }

    fn can_pick(&self) -> bool {
        !matches!(self.phase, BoardPhase::Resign | BoardPhase::Gameover)
    }

    fn can_drop(&self) -> bool {
        matches!(
            self.phase,
            BoardPhase::Setup | BoardPhase::Play | BoardPhase::DrawPending | BoardPhase::Confirm
        )
    }

    fn pick_slot(&mut self, slot: Slot) {
        assert!(self.floating.is_none(), "a piece is already floating");
        assert!(
            !matches!(self.phase, BoardPhase::Resign | BoardPhase::Gameover),
            "pick in phase {:?}",
            self.phase
        );
        let step = PendingStep {
            kind: StepKind::Pick,
            slot,
            prior_phase: self.phase,
            journal_len: self.journal.len(),
            captures: SmallVec::new(),
        };
        let piece = self.lift(slot);
        self.set_floating(Some(piece));
        self.push_pending(step);
    }

    fn drop_slot(&mut self, slot: Slot) {
        let piece = self
            .floating
            .unwrap_or_else(|| panic!("drop with nothing floating"));
        let mut step = PendingStep {
            kind: StepKind::Drop,
            slot,
            prior_phase: self.phase,
            journal_len: self.journal.len(),
            captures: SmallVec::new(),
        };
        self.place(slot, piece);
        self.set_floating(None);

        if let Slot::Cell(cell) = slot {
            let rules = Arc::clone(&self.rules);
            for victim_cell in rules.captures_after_drop(self, cell, piece) {
                let victim = self.lift(Slot::Cell(victim_cell));
                let tally = self.captured[piece.owner];
                self.set_captured(piece.owner, tally + 1);
                step.captures.push((victim_cell, victim));
            }
        }
        self.push_pending(step);

        match self.phase {
            BoardPhase::Setup => self.accept_placement(),
            BoardPhase::Play | BoardPhase::DrawPending => self.set_phase(BoardPhase::Confirm),
            BoardPhase::Confirm => {}
            phase => panic!("drop in phase {phase:?}"),
        }
    }

    fn done(&mut self) {
        assert!(self.floating.is_none(), "done with a piece floating");
        match self.phase {
            BoardPhase::Resign => {
                self.finish(GameResult::Winner(self.player.opponent()));
            }
            BoardPhase::DrawPending => {
                self.finish(GameResult::Draw);
            }
            BoardPhase::Setup => self.accept_placement(),
            BoardPhase::Play | BoardPhase::Confirm => {
                self.accept_placement();
                let rules = Arc::clone(&self.rules);
                let mover = self.player;
                rules.on_turn_end(self, mover);
                match rules.winner(self) {
                    Some(result) => self.finish(result),
                    None => self.advance_turn(),
                }
            }
            BoardPhase::Gameover => panic!("done after the game ended"),
        }
    }

    fn pass(&mut self) {
        assert!(self.floating.is_none(), "pass with a piece floating");
        assert!(
            self.phase != BoardPhase::Setup && self.phase != BoardPhase::Resign,
            "pass in phase {:?}",
            self.phase
        );
        self.accept_placement();
        self.advance_turn();
    }

    fn start(&mut self, player: PlayerId) {
        assert_eq!(self.phase, BoardPhase::Setup, "start outside setup");
        assert!(self.floating.is_none(), "start with a piece floating");
        self.accept_placement();
        self.set_turn(player, self.move_number);
        self.set_phase(BoardPhase::Play);
        let rules = Arc::clone(&self.rules);
        if let Some(result) = rules.winner(self) {
            self.finish(result);
        }
    }

    fn edit(&mut self) {
        assert!(self.floating.is_none(), "edit with a piece floating");
        self.accept_placement();
        self.set_outcome(None);
        self.set_resigned(None);
        self.set_phase(BoardPhase::Setup);
    }

    fn resign(&mut self) {
        match (self.phase, self.resigned_from) {
            (BoardPhase::Resign, Some(prior)) => {
                self.set_resigned(None);
                self.set_phase(prior);
            }
            (phase, _) => {
                self.set_resigned(Some(phase));
                self.set_phase(BoardPhase::Resign);
            }
        }
    }

    fn advance_turn(&mut self) {
        self.set_turn(self.player.opponent(), self.move_number + 1);
        self.set_phase(BoardPhase::Play);
    }

    fn finish(&mut self, result: GameResult) {
        self.set_outcome(Some(result));
        self.set_phase(BoardPhase::Gameover);
    }

    /// Roll back a take-back and drop the marks it cancels.
    fn cancel_back_to(&mut self, journal_len: usize) {
        self.rollback_to(journal_len);
        while self
            .marks
            .last()
            .is_some_and(|m| m.journal_len >= journal_len)
        {
            self.marks.pop();
        }
    }

    // === Journaled changes ===

    fn lift(&mut self, slot: Slot) -> Piece {
        let piece = self.raw_lift(slot);
        self.journal.push_back(Delta::Lift { slot, piece });
        piece
    }

    fn place(&mut self, slot: Slot, piece: Piece) {
        self.raw_place(slot, piece);
        self.journal.push_back(Delta::Place { slot, piece });
    }

    fn set_floating(&mut self, piece: Option<Piece>) {
        let prior = std::mem::replace(&mut self.floating, piece);
        self.journal.push_back(Delta::Floating { prior });
    }

    fn push_pending(&mut self, step: PendingStep) {
        self.pending.push(step);
        self.journal.push_back(Delta::PendingPushed);
    }

    fn set_phase(&mut self, phase: BoardPhase) {
        let prior = std::mem::replace(&mut self.phase, phase);
        if prior != phase {
            self.journal.push_back(Delta::Phase { prior });
        }
    }

    fn set_resigned(&mut self, value: Option<BoardPhase>) {
        let prior = std::mem::replace(&mut self.resigned_from, value);
        if prior != value {
            self.journal.push_back(Delta::Resigned { prior });
        }
    }

    fn set_turn(&mut self, player: PlayerId, move_number: u32) {
        self.journal.push_back(Delta::Turn {
            player: self.player,
            move_number: self.move_number,
        });
        self.player = player;
        self.move_number = move_number;
    }

    fn set_captured(&mut self, player: PlayerId, count: u32) {
        let prior = std::mem::replace(&mut self.captured[player], count);
        self.journal.push_back(Delta::Captured { player, prior });
    }

    fn set_outcome(&mut self, outcome: Option<GameResult>) {
        let prior = std::mem::replace(&mut self.outcome, outcome);
        if prior != outcome {
            self.journal.push_back(Delta::Outcome { prior });
        }
    }

    // === Raw changes, shared by forward and reverse paths ===

    fn raw_lift(&mut self, slot: Slot) -> Piece {
        match slot {
            Slot::Cell(cell) => {
                let stack = &mut self.cells[cell.index()];
                let Some(piece) = stack.pop() else {
                    panic!("no piece to lift at {}", self.coord(cell));
                };
                if stack.is_empty() {
                    self.occupied -= 1;
                }
                piece
            }
            Slot::Pool(pool) => {
                let piece = self.pool_piece(pool);
                match &mut self.pools[pool.index()] {
                    Some(0) => panic!("pool {pool} is exhausted"),
                    Some(n) => *n -= 1,
                    None => {}
                }
                piece
            }
        }
    }

    fn raw_place(&mut self, slot: Slot, piece: Piece) {
        match slot {
            Slot::Cell(cell) => {
                let capacity = self.config().cell_capacity;
                let stack = &mut self.cells[cell.index()];
                if stack.len() >= capacity {
                    panic!("cell {} is full", self.coord(cell));
                }
                if stack.is_empty() {
                    self.occupied += 1;
                }
                stack.push(piece);
            }
            Slot::Pool(pool) => {
                assert_eq!(
                    self.pool_piece(pool),
                    piece,
                    "piece does not belong in pool {pool}"
                );
                if let Some(n) = &mut self.pools[pool.index()] {
                    *n += 1;
                }
            }
        }
    }

    fn pool_piece(&self, pool: PoolId) -> Piece {
        let config = &self.config().pools[pool.index()];
        Piece::new(config.kind, config.owner)
    }

    fn rollback_to(&mut self, journal_len: usize) {
        assert!(journal_len <= self.journal.len(), "journal rolled back past its end");
        while self.journal.len() > journal_len {
            let Some(delta) = self.journal.pop_back() else {
                break;
            };
            self.revert(delta);
        }
        debug_assert!(self.census_ok(), "occupied counter out of sync");
    }

    fn revert(&mut self, delta: Delta) {
        match delta {
            Delta::Lift { slot, piece } => self.raw_place(slot, piece),
            Delta::Place { slot, piece } => {
                let lifted = self.raw_lift(slot);
                debug_assert_eq!(lifted, piece);
            }
            Delta::Floating { prior } => self.floating = prior,
            Delta::PendingPushed => {
                self.pending.pop();
            }
            Delta::Accepted { steps } => self.pending = steps,
            Delta::Phase { prior } => self.phase = prior,
            Delta::Resigned { prior } => self.resigned_from = prior,
            Delta::Turn {
                player,
                move_number,
            } => {
                self.player = player;
                self.move_number = move_number;
            }
            Delta::Captured { player, prior } => self.captured[player] = prior,
            Delta::Counter {
                player,
                index,
                prior,
            } => self.counters[player][index] = prior,
            Delta::Outcome { prior } => self.outcome = prior,
        }
    }

    fn census_ok(&self) -> bool {
        let occupied = self.cells.iter().filter(|s| !s.is_empty()).count();
        occupied == self.occupied && occupied + self.empty_count() == self.cells.len()
    }
}

impl<G: GameRules> Clone for Board<G> {
    fn clone(&self) -> Self {
        Self {
            rules: Arc::clone(&self.rules),
            digests: Arc::clone(&self.digests),
            seed: self.seed,
            cells: self.cells.clone(),
            pools: self.pools.clone(),
            occupied: self.occupied,
            floating: self.floating,
            pending: self.pending.clone(),
            player: self.player,
            move_number: self.move_number,
            phase: self.phase,
            resigned_from: self.resigned_from,
            outcome: self.outcome,
            captured: self.captured.clone(),
            counters: self.counters.clone(),
            journal: self.journal.clone(),
            marks: self.marks.clone(),
        }
    }
}

impl<G: GameRules> fmt::Debug for Board<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("variant", &self.config().name)
            .field("player", &self.player)
            .field("move_number", &self.move_number)
            .field("phase", &self.phase)
            .field("occupied", &self.occupied)
            .field("digest", &format_args!("{:#018x}", self.digest()))
            .finish_non_exhaustive()
    }
}

/// Text dump of the top pieces, highest row first.
impl<G: GameRules> fmt::Display for Board<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let topo = self.topology();
        let coords: Vec<Coord> = topology::cells(topo).map(|c| topo.coord_of(c)).collect();
        let width = coords.iter().map(|c| c.col).max().map_or(0, |c| c + 1);
        let height = coords.iter().map(|c| c.row).max().map_or(0, |r| r + 1);

        for row in (0..height).rev() {
            write!(f, "{:>2} ", u32::from(row) + 1)?;
            for col in 0..width {
                let glyph = match topo.cell_at(Coord::new(col, row)) {
                    Some(cell) => self
                        .occupant(cell)
                        .map_or('.', |p| self.config().glyph(p)),
                    None => ' ',
                };
                write!(f, " {glyph}")?;
            }
            writeln!(f)?;
        }
        write!(f, "   ")?;
        for col in 0..width {
            write!(f, " {}", (b'a' + col) as char)?;
        }
        writeln!(f)?;
        write!(f, "{} to move, {:?}", self.player, self.phase)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::{Hasami, TicTacToe};

    fn at(s: &str) -> Location {
        s.parse().unwrap()
    }

    fn mv(s: &str) -> MoveRecord {
        s.parse().unwrap()
    }

    #[test]
    fn test_new_board() {
        let board = Board::new(TicTacToe::new(), 0);
        assert_eq!(board.player(), PlayerId::FIRST);
        assert_eq!(board.phase(), BoardPhase::Play);
        assert_eq!(board.move_number(), 1);
        assert_eq!(board.empty_count(), 9);
        assert!(board.is_turn_boundary());
        assert_eq!(board.undo_depth(), 0);
    }

    #[test]
    fn test_move_round_trip() {
        let mut board = Board::new(TicTacToe::new(), 0);
        let copy = board.clone();
        let m = mv("P0 move #0 b2");

        board.execute(&m);
        assert_eq!(board.player(), PlayerId::SECOND);
        assert_eq!(board.move_number(), 2);
        assert_eq!(board.occupied_count(), 1);
        assert!(!board.same_as(&copy));

        board.unexecute(&m);
        assert!(board.same_as(&copy));
        assert_eq!(board.digest(), copy.digest());
    }

    #[test]
    fn test_pick_drop_done() {
        let mut board = Board::new(TicTacToe::new(), 0);
        let start = board.digest();

        board.execute(&mv("P0 pick #0"));
        assert!(board.floating().is_some());
        let floating = board.digest();
        assert_ne!(floating, start);

        board.execute(&mv("P0 drop c3"));
        assert_eq!(board.phase(), BoardPhase::Confirm);
        assert_ne!(board.digest(), floating);
        assert_eq!(board.player(), PlayerId::FIRST);

        board.execute(&mv("P0 done"));
        assert_eq!(board.phase(), BoardPhase::Play);
        assert_eq!(board.player(), PlayerId::SECOND);

        // step-by-step and one-shot reach the same position
        let mut direct = Board::new(TicTacToe::new(), 0);
        direct.execute(&mv("P0 move #0 c3"));
        assert!(board.same_as(&direct));
    }

    #[test]
    fn test_take_back_drop_then_pick() {
        let mut board = Board::new(TicTacToe::new(), 0);
        board.execute(&mv("P0 pick #0"));
        let lifted = board.clone();

        board.execute(&mv("P0 drop a1"));
        board.execute(&mv("P0 pick a1"));
        assert!(board.same_as(&lifted));
        assert_eq!(board.undo_depth(), 1);

        board.execute(&mv("P0 drop #0"));
        assert_eq!(board.undo_depth(), 0);
        assert!(board.floating().is_none());
        assert!(board.pending().is_empty());
        assert_eq!(board.phase(), BoardPhase::Play);
    }

    #[test]
    fn test_legal_destinations_of_floating_piece() {
        let mut board = Board::new(TicTacToe::new(), 0);
        board.execute(&mv("P0 move #0 a1"));
        board.execute(&mv("P1 pick #1"));
        let destinations = board.legal_destinations();
        assert_eq!(destinations.len(), 8);
        assert!(!destinations.contains(&at("a1")));
    }

    #[test]
    fn test_resign_twice_restores() {
        let mut board = Board::new(TicTacToe::new(), 0);
        let before = board.clone();

        board.execute(&mv("P0 resign"));
        assert_eq!(board.phase(), BoardPhase::Resign);
        assert_ne!(board.digest(), before.digest());

        board.execute(&mv("P0 resign"));
        assert!(board.same_as(&before));
    }

    #[test]
    fn test_resign_then_done_loses() {
        let mut board = Board::new(TicTacToe::new(), 0);
        board.execute(&mv("P0 resign"));
        board.execute(&mv("P0 done"));
        assert_eq!(board.phase(), BoardPhase::Gameover);
        assert_eq!(board.outcome(), Some(GameResult::Winner(PlayerId::SECOND)));
        assert!(board.legal_moves().is_empty());
    }

    #[test]
    fn test_pass_switches_side_only() {
        let mut board = Board::new(TicTacToe::new(), 0);
        let m = mv("P0 pass");
        let before = board.digest();

        board.execute(&m);
        assert_eq!(board.player(), PlayerId::SECOND);
        assert_eq!(board.occupied_count(), 0);
        assert_ne!(board.digest(), before);

        board.unexecute(&m);
        assert_eq!(board.digest(), before);
    }

    #[test]
    fn test_edit_and_start() {
        let mut board = Board::new(TicTacToe::new(), 0);
        board.execute(&mv("P0 edit"));
        assert_eq!(board.phase(), BoardPhase::Setup);

        // setup placement ignores turn order and confirms immediately
        board.execute(&mv("P1 pick #1"));
        board.execute(&mv("P1 drop b2"));
        assert!(board.pending().is_empty());
        assert_eq!(board.phase(), BoardPhase::Setup);

        board.execute(&mv("P0 start"));
        assert_eq!(board.phase(), BoardPhase::Play);
        assert_eq!(board.player(), PlayerId::FIRST);
        assert_eq!(board.occupied_count(), 1);
    }

    #[test]
    fn test_start_resolves_immediate_win() {
        let mut board = Board::new(TicTacToe::new(), 0);
        board.execute(&mv("P0 edit"));
        for cell in ["a1", "b1", "c1"] {
            board.execute(&mv(&format!("P0 move #0 {cell}")));
        }
        board.execute(&mv("P1 start"));
        assert_eq!(board.outcome(), Some(GameResult::Winner(PlayerId::FIRST)));
    }

    #[test]
    fn test_captures_are_reversible() {
        let mut board = Board::new(Hasami::new(), 0);
        let start = board.clone();
        let line = [
            "P0 move a1 a3",
            "P1 move b5 b3",
            "P0 move c1 c3",
        ];
        let moves: Vec<MoveRecord> = line.iter().map(|s| mv(s)).collect();
        for m in &moves {
            board.execute(m);
        }
        assert_eq!(board.captured(PlayerId::FIRST), 1);
        assert_eq!(board.occupant(board.cell(Coord::new(1, 2))), None);

        for m in moves.iter().rev() {
            board.unexecute(m);
        }
        assert!(board.same_as(&start));
    }

    #[test]
    fn test_pending_captures_and_undrop() {
        let mut board = Board::new(Hasami::new(), 0);
        board.execute(&mv("P0 move a1 a3"));
        board.execute(&mv("P1 move b5 b3"));
        let before = board.clone();

        board.execute(&mv("P0 pick c1"));
        board.execute(&mv("P0 drop c3"));
        assert_eq!(board.pending_captures().len(), 1);
        assert_eq!(board.captured(PlayerId::FIRST), 1);

        board.execute(&mv("P0 pick c3"));
        board.execute(&mv("P0 drop c1"));
        assert!(board.same_as(&before));
    }

    #[test]
    #[should_panic(expected = "unexecute out of order")]
    fn test_unexecute_out_of_order_panics() {
        let mut board = Board::new(TicTacToe::new(), 0);
        let first = mv("P0 move #0 a1");
        let second = mv("P1 move #1 b1");
        board.execute(&first);
        board.execute(&second);
        board.unexecute(&first);
    }

    #[test]
    #[should_panic(expected = "is full")]
    fn test_drop_on_full_cell_panics() {
        let mut board = Board::new(TicTacToe::new(), 0);
        board.execute(&mv("P0 move #0 a1"));
        board.execute(&mv("P1 move #1 a1"));
    }

    #[test]
    #[should_panic(expected = "played out of turn")]
    fn test_out_of_turn_panics() {
        let mut board = Board::new(TicTacToe::new(), 0);
        board.execute(&mv("P1 move #1 a1"));
    }

    #[test]
    #[should_panic(expected = "already floating")]
    fn test_double_pick_panics() {
        let mut board = Board::new(TicTacToe::new(), 0);
        board.execute(&mv("P0 pick #0"));
        board.execute(&mv("P0 pick #0"));
    }

    #[test]
    fn test_display_dump() {
        let mut board = Board::new(TicTacToe::new(), 0);
        board.execute(&mv("P0 move #0 a1"));
        let text = board.to_string();
        assert!(text.starts_with(" 3  . . ."));
        assert!(text.contains(" 1  X . ."));
        assert!(text.ends_with("P1 to move, Play"));
    }

    #[test]
    fn test_can_execute_guards_execute() {
        let mut board = Board::new(Hasami::new(), 0);
        for m in board.legal_moves() {
            assert!(board.can_execute(&m), "{m}");
        }
        assert!(!board.can_execute(&mv("P1 move e5 e4")));
        assert!(!board.can_execute(&mv("P0 move b3 b4")));
        assert!(!board.can_execute(&mv("P0 move a1 b1")));
        assert!(!board.can_execute(&mv("P0 move a1 a9")));
        // lifting a1 frees it again
        assert!(board.can_execute(&mv("P0 move a1 a1")));

        board.execute(&mv("P0 pick a1"));
        assert!(board.can_execute(&mv("P0 drop a1")));
        assert!(!board.can_execute(&mv("P0 done")));
        assert!(!board.can_execute(&mv("P0 pick b1")));
        assert!(!board.can_execute(&mv("P0 drop b1")));
    }
}
