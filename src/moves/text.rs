//! Canonical text form of moves: `P<n> <op> <operands...>`.
//!
//! ```
//! use rust_boardgame::moves::MoveRecord;
//!
//! let mv: MoveRecord = "P1 move a1 c3".parse().unwrap();
//! assert_eq!(mv.to_string(), "P1 move a1 c3");
//! ```

use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

use super::record::{Location, MoveRecord, OpCode};
use crate::core::{PlayerId, PoolId};
use crate::error::MoveParseError;
use crate::topology::Coord;

impl fmt::Display for MoveRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.player, self.op)?;
        for operand in &self.operands {
            write!(f, " {operand}")?;
        }
        Ok(())
    }
}

impl FromStr for OpCode {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OpCode::ALL
            .into_iter()
            .find(|op| op.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| MoveParseError::UnknownOp(s.to_string()))
    }
}

impl FromStr for Location {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || MoveParseError::BadOperand(s.to_string());
        if let Some(pool) = s.strip_prefix('#') {
            let id: u8 = pool.parse().map_err(|_| bad())?;
            return Ok(Location::Pool(PoolId::new(id)));
        }
        s.to_ascii_lowercase()
            .parse::<Coord>()
            .map(Location::Cell)
            .map_err(|()| bad())
    }
}

fn parse_player(token: &str) -> Result<PlayerId, MoveParseError> {
    token
        .strip_prefix('P')
        .or_else(|| token.strip_prefix('p'))
        .and_then(|n| n.parse::<u8>().ok())
        .filter(|&n| (n as usize) < crate::core::PLAYER_COUNT)
        .map(PlayerId::new)
        .ok_or_else(|| MoveParseError::BadPlayer(token.to_string()))
}

impl FromStr for MoveRecord {
    type Err = MoveParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut tokens = s.split_whitespace();
        let player = parse_player(tokens.next().ok_or(MoveParseError::Empty)?)?;
        let op: OpCode = tokens.next().ok_or(MoveParseError::MissingOp)?.parse()?;

        let operands = tokens
            .map(str::parse::<Location>)
            .collect::<Result<SmallVec<[Location; 2]>, _>>()?;
        if operands.len() != op.operand_count() {
            return Err(MoveParseError::OperandCount {
                op,
                expected: op.operand_count(),
                found: operands.len(),
            });
        }

        Ok(MoveRecord {
            op,
            player,
            operands,
        })
    }
}
