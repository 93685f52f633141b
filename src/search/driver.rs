//! Depth-limited negamax alpha-beta over a `Board`.
//!
//! The driver works on a private clone of the caller's board, walking the
//! tree with `execute`/`unexecute`. Values are always from the point of
//! view of the side to move at the node, and are negated only when a move
//! actually hands the turn over.
//!
//! Bounds are fail-hard: a node never reports a value outside the window it
//! was searched with, so move choice does not depend on ordering.

use std::time::{Duration, Instant};

use rustc_hash::FxHashSet;
use tracing::{debug, trace, warn};

use super::config::SearchConfig;
use super::evaluator::{Evaluator, RulesEvaluator};
use super::node::{NodeId, SearchNode, Variation};
use super::ordering::{promote, KillerTable};
use super::stats::SearchStats;
use super::stop::StopFlag;
use super::transposition::TranspositionTable;
use crate::board::Board;
use crate::core::{GameRng, PlayerId};
use crate::moves::MoveRecord;
use crate::rules::{GameResult, GameRules};

/// Value of a won game at ply 0.
pub const WIN_VALUE: f64 = 1_000_000.0;

/// Deepest ply the driver will visit.
pub const MAX_PLY: u32 = 256;

const NULL_WINDOW: f64 = 1e-3;
const TIME_CHECK_INTERVAL: u64 = 64;

/// True for values that come from a decided game rather than evaluation.
#[must_use]
pub fn is_decided(value: f64) -> bool {
    value.abs() >= WIN_VALUE - f64::from(MAX_PLY)
}

/// A root move with its backed-up value.
#[derive(Clone, Debug)]
pub struct RootMove {
    pub mv: MoveRecord,
    pub value: f64,
    node: NodeId,
}

/// Outcome of one search.
#[derive(Clone, Debug)]
pub struct SearchResult {
    /// The chosen move, always executable on the searched board.
    pub best_move: MoveRecord,

    /// Value of the chosen move for the side to move.
    pub value: f64,

    /// Deepest completed iteration (0 when no search was needed).
    pub depth: u32,

    /// Expected line of play starting with `best_move`.
    pub principal_variation: Vec<MoveRecord>,

    /// Root moves in search order with their values.
    pub root_moves: Vec<RootMove>,

    pub stats: SearchStats,

    /// No legal move existed; `best_move` is a pass or a resignation.
    pub fallback: bool,

    /// Answered from the previous search's principal variation.
    pub reused_pv: bool,
}

struct Prediction {
    digest: u64,
    continuation: Vec<MoveRecord>,
}

/// How a root iteration ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Iteration {
    Complete,
    /// A root move reached `good_enough`; the whole search stops.
    GoodEnough,
    Interrupted,
}

/// Alpha-beta search context.
///
/// Owns its configuration, evaluator, transposition table and killer
/// table. Keep one driver per robot: the previous principal variation
/// carries over between searches.
pub struct SearchDriver<G: GameRules> {
    config: SearchConfig,
    evaluator: Box<dyn Evaluator<G>>,
    table: TranspositionTable,
    killers: KillerTable,
    variation: Variation,
    path: FxHashSet<u64>,
    /// Parent stream; every search selects with its next fork.
    streams: GameRng,
    rng: GameRng,
    stop: StopFlag,
    stats: SearchStats,
    prediction: Option<Prediction>,
    deadline: Option<Instant>,
    stopped: bool,
    in_null_move: bool,
    width_factor: f64,
}

impl<G: GameRules> SearchDriver<G> {
    /// Create a driver that evaluates with `GameRules::evaluate`.
    pub fn new(config: SearchConfig) -> Self {
        Self {
            table: TranspositionTable::new(config.transposition_capacity),
            streams: GameRng::new(config.seed),
            rng: GameRng::new(config.seed),
            config,
            evaluator: Box::new(RulesEvaluator),
            killers: KillerTable::new(),
            variation: Variation::new(),
            path: FxHashSet::default(),
            stop: StopFlag::new(),
            stats: SearchStats::default(),
            prediction: None,
            deadline: None,
            stopped: false,
            in_null_move: false,
            width_factor: 1.0,
        }
    }

    /// Set a custom evaluator.
    pub fn with_evaluator<E: Evaluator<G> + 'static>(mut self, evaluator: E) -> Self {
        self.evaluator = Box::new(evaluator);
        self
    }

    /// Share an externally owned stop flag.
    pub fn with_stop_flag(mut self, stop: StopFlag) -> Self {
        self.stop = stop;
        self
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn stop_flag(&self) -> StopFlag {
        self.stop.clone()
    }

    /// Statistics of the most recent search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Forget the principal variation of the previous search.
    pub fn clear_prediction(&mut self) {
        self.prediction = None;
    }

    /// Choose a move for the side to move on `board`.
    ///
    /// `board` itself is not modified.
    pub fn search(&mut self, board: &Board<G>) -> SearchResult {
        let started = Instant::now();
        self.stats.reset();
        self.table.clear();
        self.killers.clear();
        self.variation.clear();
        self.path.clear();
        self.stopped = false;
        self.in_null_move = false;
        self.width_factor = 1.0;
        self.rng = self.streams.fork();
        self.deadline = self
            .config
            .time_limit_ms
            .map(|ms| started + Duration::from_millis(ms));

        let moves = board.legal_moves();
        let mut result = if moves.is_empty() {
            self.fallback(board)
        } else if moves.len() == 1 {
            self.single_choice(board, moves)
        } else if let Some(result) = self.reuse_prediction(board, &moves) {
            result
        } else {
            let mut work = board.clone();
            self.search_root(&mut work, moves)
        };

        self.stats.time_us = started.elapsed().as_micros() as u64;
        result.stats = self.stats.clone();
        self.remember_prediction(board, &result.principal_variation);

        debug!(
            best = %result.best_move,
            value = result.value,
            depth = result.depth,
            nodes = self.stats.nodes,
            cutoffs = self.stats.cutoffs,
            tt_hits = self.stats.tt_hits,
            interrupted = self.stats.interrupted,
            time_us = self.stats.time_us,
            "search finished"
        );
        result
    }

    // === Root ===

    fn fallback(&mut self, board: &Board<G>) -> SearchResult {
        let player = board.player();
        let best_move = if board.rules().can_pass(board) {
            MoveRecord::pass(player)
        } else {
            MoveRecord::resign(player)
        };
        warn!(%player, fallback = %best_move, "no legal moves");
        SearchResult {
            principal_variation: vec![best_move.clone()],
            best_move,
            value: 0.0,
            depth: 0,
            root_moves: Vec::new(),
            stats: SearchStats::default(),
            fallback: true,
            reused_pv: false,
        }
    }

    fn single_choice(&mut self, board: &Board<G>, mut moves: Vec<MoveRecord>) -> SearchResult {
        let best_move = moves.remove(0);
        trace!(%best_move, "single legal move");
        SearchResult {
            principal_variation: vec![best_move.clone()],
            value: self.evaluate(board),
            best_move,
            depth: 0,
            root_moves: Vec::new(),
            stats: SearchStats::default(),
            fallback: false,
            reused_pv: false,
        }
    }

    fn reuse_prediction(
        &mut self,
        board: &Board<G>,
        moves: &[MoveRecord],
    ) -> Option<SearchResult> {
        if !self.config.use_pv_reuse {
            return None;
        }
        let prediction = self.prediction.take()?;
        let best_move = prediction.continuation.first()?.clone();
        if prediction.digest != board.digest() || !moves.contains(&best_move) {
            return None;
        }
        debug!(%best_move, "opponent played the predicted reply");
        Some(SearchResult {
            best_move,
            value: 0.0,
            depth: 0,
            principal_variation: prediction.continuation,
            root_moves: Vec::new(),
            stats: SearchStats::default(),
            fallback: false,
            reused_pv: true,
        })
    }

    /// Record the digest expected after our move and the predicted reply.
    fn remember_prediction(&mut self, board: &Board<G>, pv: &[MoveRecord]) {
        self.prediction = None;
        if !self.config.use_pv_reuse || pv.len() < 3 {
            return;
        }
        let mut probe = board.clone();
        for mv in &pv[..2] {
            if !probe.phase().is_active() || probe.player() != mv.player {
                return;
            }
            probe.execute(mv);
        }
        if probe.player() == board.player() && probe.is_turn_boundary() {
            self.prediction = Some(Prediction {
                digest: probe.digest(),
                continuation: pv[2..].to_vec(),
            });
        }
    }

    fn search_root(&mut self, board: &mut Board<G>, moves: Vec<MoveRecord>) -> SearchResult {
        if self.config.use_null_move {
            self.calibrate_width(board);
        }

        let mut root: Vec<RootMove> = moves
            .into_iter()
            .map(|mv| RootMove {
                mv,
                value: f64::NEG_INFINITY,
                node: NodeId::NONE,
            })
            .collect();

        let target = self.config.depth.max(1);
        let depths = if self.config.iterative_deepening {
            1..=target
        } else {
            target..=target
        };

        let mut completed: Option<(Vec<RootMove>, u32)> = None;
        for depth in depths {
            let iteration = self.search_iteration(board, &mut root, depth);
            if iteration == Iteration::Interrupted {
                break;
            }
            let best = root.iter().map(|r| r.value).fold(f64::NEG_INFINITY, f64::max);
            debug!(depth, best, nodes = self.stats.nodes, "iteration complete");
            self.stats.completed_depth = depth;
            completed = Some((root.clone(), depth));
            if iteration == Iteration::GoodEnough || best >= WIN_VALUE - f64::from(MAX_PLY) {
                break;
            }
            // best first for the next iteration
            root.sort_by(|a, b| b.value.total_cmp(&a.value));
        }

        let (root, depth) = completed.unwrap_or((root, 0));
        let chosen = self.select(&root, board.move_number());
        let pick = &root[chosen];
        let principal_variation = if pick.node.is_none() {
            vec![pick.mv.clone()]
        } else {
            self.variation.line(pick.node)
        };

        SearchResult {
            best_move: pick.mv.clone(),
            value: pick.value,
            depth,
            principal_variation,
            stats: SearchStats::default(),
            fallback: false,
            reused_pv: false,
            root_moves: root,
        }
    }

    /// Search every root move to `depth`.
    fn search_iteration(
        &mut self,
        board: &mut Board<G>,
        root: &mut [RootMove],
        depth: u32,
    ) -> Iteration {
        let digest = board.digest();
        self.path.insert(digest);

        let tolerance = if self.config.random_choices(board.move_number()) > 1 {
            self.config.random_tolerance
        } else {
            0.0
        };
        let width = self
            .config
            .width_at(0, self.width_factor)
            .unwrap_or(root.len());

        for entry in root.iter_mut() {
            entry.value = f64::NEG_INFINITY;
            entry.node = NodeId::NONE;
        }

        let mut best = f64::NEG_INFINITY;
        let mut outcome = Iteration::Complete;
        for entry in root.iter_mut().take(width) {
            if self.should_stop() {
                outcome = Iteration::Interrupted;
                break;
            }
            let alpha = best - tolerance;
            let (value, line) = self.search_child(board, &entry.mv, depth, 0, alpha, f64::INFINITY);
            if self.stopped {
                outcome = Iteration::Interrupted;
                break;
            }

            entry.value = value;
            entry.node = self.variation.alloc(SearchNode {
                mv: entry.mv.clone(),
                evaluation: value,
                depth_limited: !is_decided(value),
                continuation: line,
            });
            best = best.max(value);

            if self.config.good_enough.is_some_and(|good| value >= good) {
                trace!(mv = %entry.mv, value, "good enough");
                outcome = Iteration::GoodEnough;
                break;
            }
        }

        self.path.remove(&digest);
        outcome
    }

    /// Index of the root move to play.
    ///
    /// The first best move, or a random pick among the top moves within
    /// tolerance. A proven win is never randomized away.
    fn select(&mut self, root: &[RootMove], move_number: u32) -> usize {
        let mut best_idx = 0;
        for (i, entry) in root.iter().enumerate() {
            if entry.value > root[best_idx].value {
                best_idx = i;
            }
        }
        let best = root[best_idx].value;
        let choices = self.config.random_choices(move_number);
        if choices <= 1 || is_decided(best) {
            return best_idx;
        }

        let floor = best - self.config.random_tolerance;
        let mut others: Vec<usize> = (0..root.len())
            .filter(|&i| i != best_idx && root[i].value > floor)
            .collect();
        others.sort_by(|&a, &b| root[b].value.total_cmp(&root[a].value));

        let mut candidates = vec![best_idx];
        candidates.extend(others.into_iter().take(choices - 1));
        let pick = self.rng.choose_index(candidates.len()).unwrap_or(0);
        trace!(candidates = candidates.len(), pick, "randomized root choice");
        candidates[pick]
    }

    /// Measure what the opponent gains if we pass, and scale widths by it.
    fn calibrate_width(&mut self, board: &mut Board<G>) {
        if !board.is_turn_boundary() {
            return;
        }
        let reduced = self
            .config
            .depth
            .saturating_sub(1 + self.config.null_move_reduction);
        let standing = self.evaluate(board);

        let pass = MoveRecord::pass(board.player());
        self.in_null_move = true;
        board.execute(&pass);
        let (reply, _) = self.negamax(board, reduced, 1, f64::NEG_INFINITY, f64::INFINITY);
        board.unexecute(&pass);
        self.in_null_move = false;

        let swing = (standing - -reply).abs();
        self.width_factor = if swing >= self.config.serious_swing {
            self.config.serious_factor
        } else if swing <= self.config.casual_swing {
            self.config.casual_factor
        } else {
            1.0
        };
        trace!(swing, factor = self.width_factor, "null-move calibration");
    }

    // === Tree ===

    fn search_child(
        &mut self,
        board: &mut Board<G>,
        mv: &MoveRecord,
        depth: u32,
        ply: u32,
        alpha: f64,
        beta: f64,
    ) -> (f64, NodeId) {
        let mover = board.player();
        let before = self.config.verify_digests.then(|| board.clone());

        board.execute(mv);
        let result = if board.player() == mover {
            self.negamax(board, depth - 1, ply + 1, alpha, beta)
        } else {
            let (value, line) = self.negamax(board, depth - 1, ply + 1, -beta, -alpha);
            (-value, line)
        };
        board.unexecute(mv);

        if let Some(before) = before {
            assert_eq!(
                board.digest(),
                before.digest(),
                "digest changed by execute/unexecute of {mv}"
            );
            assert!(board.same_as(&before), "board changed by execute/unexecute of {mv}");
        }
        result
    }

    fn negamax(
        &mut self,
        board: &mut Board<G>,
        depth: u32,
        ply: u32,
        alpha: f64,
        beta: f64,
    ) -> (f64, NodeId) {
        if self.should_stop() {
            return (0.0, NodeId::NONE);
        }
        self.stats.nodes += 1;

        if let Some(outcome) = board.outcome() {
            return (self.terminal_value(outcome, board.player(), ply), NodeId::NONE);
        }
        if depth == 0 || ply >= MAX_PLY {
            return (self.evaluate(board), NodeId::NONE);
        }

        let digest = board.digest();
        if self.path.contains(&digest) {
            self.stats.repetitions += 1;
            return (fail_hard(self.config.draw_value, alpha, beta), NodeId::NONE);
        }

        let mut tt_move = None;
        if self.config.use_transposition {
            self.stats.tt_probes += 1;
            if let Some(entry) = self.table.get(digest) {
                if entry.depth >= depth {
                    self.stats.tt_hits += 1;
                    let value = TranspositionTable::value_at(entry, ply);
                    let line = match &entry.best_move {
                        Some(mv) => self.variation.alloc(SearchNode {
                            mv: mv.clone(),
                            evaluation: value,
                            depth_limited: !is_decided(value),
                            continuation: NodeId::NONE,
                        }),
                        None => NodeId::NONE,
                    };
                    return (fail_hard(value, alpha, beta), line);
                }
                tt_move = entry.best_move.clone();
            }
        }

        if self.null_move_prunes(board, depth, ply, beta) {
            return (beta, NodeId::NONE);
        }

        let mut moves = board.legal_moves();
        if moves.is_empty() {
            return (self.evaluate(board), NodeId::NONE);
        }
        if self.config.static_ordering && depth > 1 {
            self.order_statically(board, &mut moves);
        }
        let killers = if self.config.use_killers {
            self.killers.killers(ply as usize)
        } else {
            &[]
        };
        promote(&mut moves, tt_move.as_ref(), killers);
        let width = self
            .config
            .width_at(ply as usize, self.width_factor)
            .unwrap_or(moves.len());

        self.path.insert(digest);
        let alpha_orig = alpha;
        let mut alpha = alpha;
        let mut best_value = f64::NEG_INFINITY;
        let mut best_node = NodeId::NONE;
        let mut best_move = None;

        for mv in moves.iter().take(width) {
            if self.should_stop() {
                break;
            }
            let (value, line) = self.search_child(board, mv, depth, ply, alpha, beta);
            if self.stopped {
                break;
            }

            if value > best_value {
                best_value = value;
                best_move = Some(mv);
                best_node = self.variation.alloc(SearchNode {
                    mv: mv.clone(),
                    evaluation: value,
                    depth_limited: !is_decided(value),
                    continuation: line,
                });
            }
            if value > alpha {
                alpha = value;
            }
            if alpha >= beta {
                self.stats.cutoffs += 1;
                if self.config.use_killers {
                    self.killers.record(ply as usize, mv);
                }
                break;
            }
        }
        self.path.remove(&digest);

        if best_move.is_none() {
            return (0.0, NodeId::NONE);
        }
        if self.config.use_transposition
            && !self.stopped
            && board.is_turn_boundary()
            && alpha_orig < best_value
            && best_value < beta
        {
            self.table
                .store(digest, best_value, depth, ply, best_move.cloned());
        }
        (fail_hard(best_value, alpha_orig, beta), best_node)
    }

    /// Interior null-move pruning: pass, search reduced, cut if still >= beta.
    fn null_move_prunes(&mut self, board: &mut Board<G>, depth: u32, ply: u32, beta: f64) -> bool {
        if !self.config.null_move_pruning
            || self.in_null_move
            || ply == 0
            || depth < self.config.null_move_min_depth
            || !board.is_turn_boundary()
            || is_decided(beta)
            || !beta.is_finite()
        {
            return false;
        }

        let pass = MoveRecord::pass(board.player());
        let reduced = depth.saturating_sub(1 + self.config.null_move_reduction);
        self.in_null_move = true;
        board.execute(&pass);
        let (reply, _) = self.negamax(board, reduced, ply + 1, -beta, -beta + NULL_WINDOW);
        board.unexecute(&pass);
        self.in_null_move = false;

        let value = -reply;
        if value >= beta && !self.stopped {
            self.stats.null_prunes += 1;
            trace!(ply, depth, beta, "null-move cutoff");
            return true;
        }
        false
    }

    fn order_statically(&mut self, board: &mut Board<G>, moves: &mut Vec<MoveRecord>) {
        let mover = board.player();
        let mut scored = Vec::with_capacity(moves.len());
        for mv in moves.drain(..) {
            board.execute(&mv);
            let score = self.evaluator.evaluate(board, mover);
            board.unexecute(&mv);
            scored.push((score, mv));
        }
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        moves.extend(scored.into_iter().map(|(_, mv)| mv));
    }

    // === Leaves ===

    fn evaluate(&mut self, board: &Board<G>) -> f64 {
        self.stats.evaluations += 1;
        self.evaluator.evaluate(board, board.player())
    }

    fn terminal_value(&self, outcome: GameResult, to_move: PlayerId, ply: u32) -> f64 {
        match outcome {
            GameResult::Draw => self.config.draw_value,
            _ if outcome.is_winner(to_move) => WIN_VALUE - f64::from(ply),
            _ => -(WIN_VALUE - f64::from(ply)),
        }
    }

    fn should_stop(&mut self) -> bool {
        if self.stopped {
            return true;
        }
        let out_of_time = self.stats.nodes % TIME_CHECK_INTERVAL == 0
            && self.deadline.is_some_and(|d| Instant::now() >= d);
        let out_of_nodes = self
            .config
            .node_limit
            .is_some_and(|limit| self.stats.nodes >= limit);
        if self.stop.is_stopped() || out_of_time || out_of_nodes {
            self.stopped = true;
            self.stats.interrupted = true;
        }
        self.stopped
    }
}

fn fail_hard(value: f64, alpha: f64, beta: f64) -> f64 {
    if value >= beta {
        beta
    } else if value <= alpha {
        alpha
    } else {
        value
    }
}
