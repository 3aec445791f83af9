//! Pattern definitions: ordered rounds of operations.

use super::operation::Operation;

/// One round of a pattern.
pub type Round = Vec<Operation>;

/// A pattern as an ordered list of rounds.
///
/// This is plain data; nothing is checked until the pattern is compiled into
/// a [`PatternGraph`](crate::graph::PatternGraph).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatternDef {
    rounds: Vec<Round>,
}

impl PatternDef {
    /// Create an empty pattern.
    pub fn new() -> Self {
        Self { rounds: Vec::new() }
    }

    /// Create a pattern that starts with the conventional `[Loop]` round.
    pub fn with_loop() -> Self {
        Self {
            rounds: vec![vec![Operation::Loop]],
        }
    }

    /// Create a pattern from a list of rounds.
    pub fn from_rounds(rounds: Vec<Round>) -> Self {
        Self { rounds }
    }

    /// Append a round.
    pub fn add_round(&mut self, round: Round) {
        self.rounds.push(round);
    }

    /// Builder-style [`add_round`](Self::add_round).
    pub fn round(mut self, round: Round) -> Self {
        self.rounds.push(round);
        self
    }

    /// All rounds.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    /// Number of rounds.
    pub fn num_rounds(&self) -> usize {
        self.rounds.len()
    }

    /// Total number of operations over all rounds.
    pub fn num_operations(&self) -> usize {
        self.rounds.iter().map(Vec::len).sum()
    }

    /// Number of operations in a round, or `None` if it does not exist.
    pub fn stitch_count(&self, round: usize) -> Option<usize> {
        self.rounds.get(round).map(Vec::len)
    }

    /// Advisory stitch-count check.
    ///
    /// Every round after the first must work into exactly as many stitches
    /// as the previous round has. A round's needs are the sum of
    /// [`Operation::required_stitches`]; the first stitch of a round always
    /// lands in one stitch, so a leading zero counts as one. Kinds with no
    /// requirement count as zero, and a round made only of such kinds (a
    /// closing `[FO]`) works into nothing and is not checked.
    pub fn check_valid(&self) -> bool {
        self.rounds.windows(2).all(|pair| {
            let (previous, round) = (&pair[0], &pair[1]);
            if round.iter().all(|op| op.required_stitches().is_none()) {
                return true;
            }
            let needed: usize = round
                .iter()
                .enumerate()
                .map(|(i, op)| match op.required_stitches() {
                    Some(0) if i == 0 => 1,
                    Some(n) => n,
                    None => 0,
                })
                .sum();
            needed == previous.len()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::expand;

    #[test]
    fn test_with_loop() {
        let def = PatternDef::with_loop();
        assert_eq!(def.num_rounds(), 1);
        assert_eq!(def.rounds()[0], vec![Operation::Loop]);
        assert!(def.check_valid());
    }

    #[test]
    fn test_check_valid_ball() {
        let mut inc_round = Vec::new();
        for _ in 0..6 {
            inc_round.push(Operation::SingleCrochet);
            inc_round.push(Operation::Increase);
        }

        let def = PatternDef::with_loop()
            .round(expand(Operation::MagicRing, 6))
            .round(inc_round)
            .round(vec![Operation::SingleCrochet; 12]);

        assert!(def.check_valid());
        assert_eq!(def.stitch_count(2), Some(12));
        assert_eq!(def.num_operations(), 1 + 6 + 12 + 12);
    }

    #[test]
    fn test_check_valid_rejects_mismatch() {
        let def = PatternDef::with_loop()
            .round(expand(Operation::MagicRing, 6))
            .round(vec![Operation::SingleCrochet; 5]);
        assert!(!def.check_valid());

        let def = PatternDef::with_loop()
            .round(expand(Operation::MagicRing, 6))
            .round(vec![Operation::Decrease; 3]);
        assert!(def.check_valid());
    }

    #[test]
    fn test_check_valid_closing_round() {
        let def = PatternDef::with_loop()
            .round(expand(Operation::MagicRing, 6))
            .round(vec![Operation::Decrease; 3])
            .round(vec![Operation::FinishOff]);
        assert!(def.check_valid());

        let def = PatternDef::with_loop()
            .round(expand(Operation::MagicRing, 6))
            .round(vec![Operation::SingleCrochet; 5])
            .round(vec![Operation::FinishOff]);
        assert!(!def.check_valid());
    }
}
