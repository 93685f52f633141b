//! Move ordering: killer moves and the transposition move.

use smallvec::SmallVec;

use crate::moves::MoveRecord;

const KILLERS_PER_PLY: usize = 2;

/// Moves that caused beta cutoffs, per ply.
#[derive(Clone, Debug, Default)]
pub struct KillerTable {
    plies: Vec<SmallVec<[MoveRecord; KILLERS_PER_PLY]>>,
}

impl KillerTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Remember a cutoff move at `ply`, most recent first.
    pub fn record(&mut self, ply: usize, mv: &MoveRecord) {
        if self.plies.len() <= ply {
            self.plies.resize_with(ply + 1, SmallVec::new);
        }
        let slot = &mut self.plies[ply];
        if slot.first() == Some(mv) {
            return;
        }
        slot.retain(|k| k != mv);
        slot.insert(0, mv.clone());
        slot.truncate(KILLERS_PER_PLY);
    }

    #[must_use]
    pub fn killers(&self, ply: usize) -> &[MoveRecord] {
        self.plies.get(ply).map_or(&[], |s| &s[..])
    }

    pub fn clear(&mut self) {
        self.plies.clear();
    }
}

/// Stable reorder: `first`, then `killers` in order, then the rest.
///
/// Preferred moves that are not in `moves` are ignored.
pub fn promote(moves: &mut Vec<MoveRecord>, first: Option<&MoveRecord>, killers: &[MoveRecord]) {
    let mut front = 0;
    for preferred in first.into_iter().chain(killers) {
        if let Some(pos) = moves[front..].iter().position(|m| m == preferred) {
            let mv = moves.remove(front + pos);
            moves.insert(front, mv);
            front += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(s: &str) -> MoveRecord {
        s.parse().unwrap()
    }

    #[test]
    fn test_killers_keep_two_most_recent() {
        let mut killers = KillerTable::new();
        killers.record(3, &mv("P0 move #0 a1"));
        killers.record(3, &mv("P0 move #0 b1"));
        killers.record(3, &mv("P0 move #0 c1"));
        killers.record(3, &mv("P0 move #0 c1"));

        let at3 = killers.killers(3);
        assert_eq!(at3.len(), 2);
        assert_eq!(at3[0], mv("P0 move #0 c1"));
        assert_eq!(at3[1], mv("P0 move #0 b1"));
        assert!(killers.killers(0).is_empty());
        assert!(killers.killers(9).is_empty());
    }

    #[test]
    fn test_promote_is_stable() {
        let mut moves: Vec<_> = ["a1", "b1", "c1", "a2", "b2"]
            .iter()
            .map(|c| mv(&format!("P0 move #0 {c}")))
            .collect();
        let tt = mv("P0 move #0 b2");
        let killers = [mv("P0 move #0 c1"), mv("P0 move #0 c3")];

        promote(&mut moves, Some(&tt), &killers);

        let order: Vec<_> = moves.iter().map(|m| m.operands[1].to_string()).collect();
        assert_eq!(order, vec!["b2", "c1", "a1", "b1", "a2"]);
    }

    #[test]
    fn test_promote_ignores_duplicates_of_first() {
        let mut moves = vec![mv("P0 pass"), mv("P0 move #0 a1")];
        let first = mv("P0 move #0 a1");
        promote(&mut moves, Some(&first), std::slice::from_ref(&first));
        assert_eq!(moves[0], first);
        assert_eq!(moves.len(), 2);
    }
}
