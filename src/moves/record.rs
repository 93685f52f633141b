//! The `MoveRecord` value type.
//!
//! A move names an operation, the player making it and up to two board
//! locations. Everything needed to undo it (captured pieces, prior phase,
//! counters) lives in the board's journal, not here, so records stay small
//! and compare by value.

use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};

use crate::core::{PlayerId, PoolId};
use crate::topology::Coord;

/// Operation code of a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OpCode {
    /// Leave setup and begin turn-based play.
    Start,
    /// Return to free placement.
    Edit,
    /// Lift the top piece of a cell or pool.
    Pick,
    /// Put the floating piece down.
    Drop,
    /// Pick, drop and confirm in one step.
    Move,
    /// Confirm the pending placement and end the turn.
    Done,
    /// End the turn without moving.
    Pass,
    /// Resign, or withdraw a resignation.
    Resign,
}

impl OpCode {
    pub const ALL: [OpCode; 8] = [
        OpCode::Start,
        OpCode::Edit,
        OpCode::Pick,
        OpCode::Drop,
        OpCode::Move,
        OpCode::Done,
        OpCode::Pass,
        OpCode::Resign,
    ];

    /// Keyword used in move text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            OpCode::Start => "start",
            OpCode::Edit => "edit",
            OpCode::Pick => "pick",
            OpCode::Drop => "drop",
            OpCode::Move => "move",
            OpCode::Done => "done",
            OpCode::Pass => "pass",
            OpCode::Resign => "resign",
        }
    }

    /// Number of locations the operation carries.
    #[must_use]
    pub const fn operand_count(self) -> usize {
        match self {
            OpCode::Pick | OpCode::Drop => 1,
            OpCode::Move => 2,
            OpCode::Start | OpCode::Edit | OpCode::Done | OpCode::Pass | OpCode::Resign => 0,
        }
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a piece comes from or goes to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    Cell(Coord),
    Pool(PoolId),
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Cell(coord) => write!(f, "{coord}"),
            Location::Pool(pool) => write!(f, "{pool}"),
        }
    }
}

/// A single move as it travels between players, robots and transcripts.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MoveRecord {
    pub op: OpCode,
    pub player: PlayerId,
    pub operands: SmallVec<[Location; 2]>,
}

impl MoveRecord {
    fn bare(op: OpCode, player: PlayerId) -> Self {
        Self {
            op,
            player,
            operands: SmallVec::new(),
        }
    }

    #[must_use]
    pub fn start(player: PlayerId) -> Self {
        Self::bare(OpCode::Start, player)
    }

    #[must_use]
    pub fn edit(player: PlayerId) -> Self {
        Self::bare(OpCode::Edit, player)
    }

    #[must_use]
    pub fn done(player: PlayerId) -> Self {
        Self::bare(OpCode::Done, player)
    }

    #[must_use]
    pub fn pass(player: PlayerId) -> Self {
        Self::bare(OpCode::Pass, player)
    }

    #[must_use]
    pub fn resign(player: PlayerId) -> Self {
        Self::bare(OpCode::Resign, player)
    }

    #[must_use]
    pub fn pick(player: PlayerId, from: Location) -> Self {
        Self {
            op: OpCode::Pick,
            player,
            operands: smallvec![from],
        }
    }

    #[must_use]
    pub fn drop(player: PlayerId, to: Location) -> Self {
        Self {
            op: OpCode::Drop,
            player,
            operands: smallvec![to],
        }
    }

    /// A complete move from one location to another.
    #[must_use]
    pub fn moving(player: PlayerId, from: Location, to: Location) -> Self {
        Self {
            op: OpCode::Move,
            player,
            operands: smallvec![from, to],
        }
    }

    /// Where the piece comes from (`pick` and `move`).
    #[must_use]
    pub fn source(&self) -> Option<Location> {
        match self.op {
            OpCode::Pick | OpCode::Move => self.operands.first().copied(),
            _ => None,
        }
    }

    /// Where the piece goes (`drop` and `move`).
    #[must_use]
    pub fn destination(&self) -> Option<Location> {
        match self.op {
            OpCode::Drop => self.operands.first().copied(),
            OpCode::Move => self.operands.get(1).copied(),
            _ => None,
        }
    }
}
