//! Quorum evidence carried inside ROUND-CHANGE and NEW-ROUND messages.

use crate::{
    payload::{PreparePayload, ProposalPayload},
    round_change::RoundChangePayload,
    signed_data::SignedData,
};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use ferrite_types::ConsensusRoundIdentifier;

/// Proof that a quorum prepared a specific block in a prior round.
///
/// The proposal stands in for the proposer's own attestation, so a complete
/// certificate carries one fewer prepare than the quorum size.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct PreparedCertificate {
    /// The proposal accepted in the prepared round.
    pub proposal: SignedData<ProposalPayload>,
    /// Prepare votes gathered for that proposal.
    pub prepares: Vec<SignedData<PreparePayload>>,
}

impl PreparedCertificate {
    /// Certificate from a proposal and its prepares.
    pub const fn new(
        proposal: SignedData<ProposalPayload>,
        prepares: Vec<SignedData<PreparePayload>>,
    ) -> Self {
        Self { proposal, prepares }
    }

    /// Round the certificate's proposal was accepted in.
    pub fn proposal_round(&self) -> ConsensusRoundIdentifier {
        self.proposal.payload().round_identifier
    }
}

/// The quorum of ROUND-CHANGE votes justifying the start of a new round.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct RoundChangeCertificate {
    /// One vote per distinct validator, all targeting the same round.
    pub round_change_messages: Vec<SignedData<RoundChangePayload>>,
}

impl RoundChangeCertificate {
    /// Certificate from the gathered votes.
    pub const fn new(round_change_messages: Vec<SignedData<RoundChangePayload>>) -> Self {
        Self { round_change_messages }
    }
}
