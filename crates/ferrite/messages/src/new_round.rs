//! NEW-ROUND payload: the justification for starting a later round.

use crate::{
    certificate::RoundChangeCertificate,
    payload::{Payload, ProposalPayload, codes},
    signed_data::SignedData,
};
use alloy_rlp::{RlpDecodable, RlpEncodable};
use ferrite_types::ConsensusRoundIdentifier;

/// NEW-ROUND payload: a round-change quorum plus the fresh proposal.
///
/// Sent by the proposer of the round being entered. The certificate proves
/// a quorum agreed to leave the previous round; the proposal re-opens the
/// three-phase exchange.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct NewRoundPayload {
    /// Round being started.
    pub round_identifier: ConsensusRoundIdentifier,
    /// Quorum of ROUND-CHANGE votes justifying the start.
    pub round_change_certificate: RoundChangeCertificate,
    /// Proposal for the new round, signed by its proposer.
    pub proposal: SignedData<ProposalPayload>,
}

impl NewRoundPayload {
    /// Payload for `round_identifier` carrying `round_change_certificate`
    /// and `proposal`.
    pub const fn new(
        round_identifier: ConsensusRoundIdentifier,
        round_change_certificate: RoundChangeCertificate,
        proposal: SignedData<ProposalPayload>,
    ) -> Self {
        Self { round_identifier, round_change_certificate, proposal }
    }
}

impl Payload for NewRoundPayload {
    fn round_identifier(&self) -> ConsensusRoundIdentifier {
        self.round_identifier
    }

    fn message_code(&self) -> u8 {
        codes::NEW_ROUND
    }
}
