//! Reversible board deltas.
//!
//! Each delta records the value it overwrote. The board appends one delta
//! per primitive change and reverts them in reverse order; nothing is ever
//! edited in place.

use smallvec::SmallVec;

use super::BoardPhase;
use crate::core::{CellId, Piece, PlayerId, PoolId};
use crate::moves::MoveRecord;
use crate::rules::GameResult;

/// A place a piece can be lifted from or dropped on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Slot {
    Cell(CellId),
    Pool(PoolId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepKind {
    Pick,
    Drop,
}

/// One half of an unconfirmed move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PendingStep {
    pub kind: StepKind,
    pub slot: Slot,
    /// Phase before the step, restored by a take-back.
    pub prior_phase: BoardPhase,
    /// Journal length before the step.
    pub journal_len: usize,
    /// Pieces removed by a drop, in removal order.
    pub captures: SmallVec<[(CellId, Piece); 4]>,
}

/// A single reversible change.
#[derive(Clone, Debug)]
pub enum Delta {
    /// A piece was removed from the top of a slot.
    Lift { slot: Slot, piece: Piece },
    /// A piece was added to the top of a slot.
    Place { slot: Slot, piece: Piece },
    Floating { prior: Option<Piece> },
    PendingPushed,
    /// Pending steps were cleared by confirming a placement.
    Accepted { steps: Vec<PendingStep> },
    Phase { prior: BoardPhase },
    Resigned { prior: Option<BoardPhase> },
    Turn { player: PlayerId, move_number: u32 },
    Captured { player: PlayerId, prior: u32 },
    Counter { player: PlayerId, index: usize, prior: i64 },
    Outcome { prior: Option<GameResult> },
}

/// Start of an executed move in the journal.
#[derive(Clone, Debug)]
pub(crate) struct ExecuteMark {
    pub record: MoveRecord,
    pub journal_len: usize,
}
