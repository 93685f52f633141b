//! Leaf evaluation.

use crate::board::Board;
use crate::core::PlayerId;
use crate::rules::GameRules;

/// Score of a position from `player`'s point of view.
///
/// Implemented for closures, so tests and robots can supply one inline.
pub trait Evaluator<G: GameRules>: Send {
    fn evaluate(&self, board: &Board<G>, player: PlayerId) -> f64;
}

/// Delegates to `GameRules::evaluate`.
#[derive(Clone, Copy, Debug, Default)]
pub struct RulesEvaluator;

impl<G: GameRules> Evaluator<G> for RulesEvaluator {
    fn evaluate(&self, board: &Board<G>, player: PlayerId) -> f64 {
        board.rules().evaluate(board, player)
    }
}

impl<G, F> Evaluator<G> for F
where
    G: GameRules,
    F: Fn(&Board<G>, PlayerId) -> f64 + Send,
{
    fn evaluate(&self, board: &Board<G>, player: PlayerId) -> f64 {
        self(board, player)
    }
}
