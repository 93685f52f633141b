//! Recorded games.
//!
//! A transcript is the variant name, the setup seed, the moves in order and
//! the digest of the final position. Replaying it against the same rules
//! must land on the same digest.
//!
//! Text form, one item per line:
//!
//! ```text
//! variant tictactoe
//! seed 0
//! digest 0x3f2a9c0d11e07b45
//! P0 move #0 b2
//! P1 move #1 a1
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{MoveRecord, OpCode};
use crate::board::{Board, RepetitionTracker};
use crate::error::{ReplayError, ReplayResult};
use crate::rules::GameRules;

/// A game as a replayable list of moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    pub variant: String,
    pub seed: u64,
    pub moves: Vec<MoveRecord>,
    /// Digest of the position after the last move.
    pub digest: u64,
}

impl Transcript {
    pub fn new(variant: impl Into<String>, seed: u64) -> Self {
        Self {
            variant: variant.into(),
            seed,
            moves: Vec::new(),
            digest: 0,
        }
    }

    /// Start a transcript for a freshly created board.
    pub fn for_board<G: GameRules>(board: &Board<G>) -> Self {
        let mut transcript = Self::new(board.config().name.clone(), board.seed());
        transcript.digest = board.digest();
        transcript
    }

    pub fn push(&mut self, mv: MoveRecord) {
        self.moves.push(mv);
    }

    /// Record the final position.
    pub fn finish<G: GameRules>(&mut self, board: &Board<G>) {
        self.digest = board.digest();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn to_text(&self) -> String {
        let mut text = format!(
            "variant {}\nseed {}\ndigest {:#018x}\n",
            self.variant, self.seed, self.digest
        );
        for mv in &self.moves {
            text.push_str(&mv.to_string());
            text.push('\n');
        }
        text
    }

    pub fn from_text(text: &str) -> ReplayResult<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());

        let variant = header(lines.next(), "variant")?.to_string();
        let seed = header(lines.next(), "seed")?
            .parse::<u64>()
            .map_err(|e| ReplayError::BadHeader(format!("seed: {e}")))?;
        let digest_text = header(lines.next(), "digest")?;
        let digest = u64::from_str_radix(digest_text.trim_start_matches("0x"), 16)
            .map_err(|e| ReplayError::BadHeader(format!("digest: {e}")))?;

        let moves = lines
            .enumerate()
            .map(|(index, line)| {
                line.parse::<MoveRecord>()
                    .map_err(|source| ReplayError::BadMove { index, source })
            })
            .collect::<ReplayResult<Vec<_>>>()?;

        Ok(Self {
            variant,
            seed,
            moves,
            digest,
        })
    }

    pub fn to_bytes(&self) -> ReplayResult<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> ReplayResult<Self> {
        Ok(bincode::deserialize(bytes)?)
    }

    /// Rebuild the game on a fresh board.
    ///
    /// Repetitions are tracked the way a live game tracks them, so positions
    /// that ended in a pending draw reproduce. Complete moves are checked
    /// against the rules before they are executed.
    pub fn replay<G: GameRules>(&self, rules: G) -> ReplayResult<Board<G>> {
        let expected = rules.config().name.clone();
        if expected != self.variant {
            return Err(ReplayError::VariantMismatch {
                expected,
                found: self.variant.clone(),
            });
        }

        let mut board = Board::new(rules, self.seed);
        let mut tracker = RepetitionTracker::new();
        tracker.observe(&mut board);

        for (index, mv) in self.moves.iter().enumerate() {
            if !playable(&board, mv) {
                return Err(ReplayError::IllegalMove {
                    index,
                    mv: mv.to_string(),
                });
            }
            board.execute(mv);
            tracker.observe(&mut board);
        }

        let actual = board.digest();
        if actual != self.digest {
            return Err(ReplayError::DigestMismatch {
                expected: self.digest,
                actual,
            });
        }
        debug!(variant = %self.variant, moves = self.moves.len(), "transcript replayed");
        Ok(board)
    }
}

fn header<'a>(line: Option<&'a str>, key: &str) -> ReplayResult<&'a str> {
    let line = line.ok_or_else(|| ReplayError::BadHeader(format!("missing {key} line")))?;
    line.strip_prefix(key)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| ReplayError::BadHeader(format!("expected {key}, found {line:?}")))
}

/// Foreign input must never reach an `execute` that would panic; complete
/// moves at a turn boundary must also be legal for the rules.
fn playable<G: GameRules>(board: &Board<G>, mv: &MoveRecord) -> bool {
    if !board.can_execute(mv) {
        return false;
    }
    mv.op != OpCode::Move || !board.is_turn_boundary() || board.legal_moves().contains(mv)
}
