//! Height and round addressing for consensus instances.

use alloy_rlp::{RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies one attempt, within a chain height, to agree on a block.
///
/// Identifiers order lexicographically: every round of a height sorts below
/// every round of the next height, and within a height later rounds sort
/// higher.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    RlpEncodable,
    RlpDecodable,
)]
pub struct ConsensusRoundIdentifier {
    /// Chain height this round belongs to.
    pub sequence_number: u64,
    /// Zero-based round number within the height.
    pub round_number: u32,
}

impl ConsensusRoundIdentifier {
    /// Identifier for `round_number` at `sequence_number`.
    pub const fn new(sequence_number: u64, round_number: u32) -> Self {
        Self { sequence_number, round_number }
    }

    /// Identifier for the next round of the same height.
    pub const fn next_round(&self) -> Self {
        Self::new(self.sequence_number, self.round_number + 1)
    }
}

impl fmt::Display for ConsensusRoundIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "height {} round {}", self.sequence_number, self.round_number)
    }
}
