//! Deterministic proposer selection.

use alloy_primitives::Address;
use auto_impl::auto_impl;
use ferrite_types::{ConsensusRoundIdentifier, ValidatorSet};

/// Capability resolving the expected proposer of a consensus round.
///
/// Implementations must be deterministic: every honest node evaluating the
/// same round over the same validator set has to arrive at the same address,
/// otherwise the network cannot agree on whose proposal to accept.
#[auto_impl(&, Arc)]
pub trait ProposerSelector {
    /// Address expected to propose in the given round.
    fn select_proposer(&self, round: &ConsensusRoundIdentifier) -> Address;
}

/// Round-robin rotation over the ordered validator set.
///
/// The proposer index advances by one per round number. With
/// `change_each_height` set the starting index also rotates with the block
/// height, spreading round-zero proposals across the set.
#[derive(Debug, Clone)]
pub struct RoundRobinProposerSelector {
    validators: ValidatorSet,
    change_each_height: bool,
}

impl RoundRobinProposerSelector {
    /// Selector over the given validator set.
    pub const fn new(validators: ValidatorSet, change_each_height: bool) -> Self {
        Self { validators, change_each_height }
    }
}

impl ProposerSelector for RoundRobinProposerSelector {
    fn select_proposer(&self, round: &ConsensusRoundIdentifier) -> Address {
        let count = self.validators.len() as u64;
        let base = if self.change_each_height { round.sequence_number % count } else { 0 };
        let index = (base + u64::from(round.round_number)) % count;
        self.validators.addresses()[index as usize]
    }
}
