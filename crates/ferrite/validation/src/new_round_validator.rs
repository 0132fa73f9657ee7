//! Validation of NEW-ROUND messages that open a round after a change.

use crate::{
    factory::RoundValidatorFactory, proposer::ProposerSelector,
    round_change_validator::RoundChangeValidator, round_validator::RoundMessageValidator,
};
use ferrite_messages::{NewRoundPayload, PreparedCertificate, RoundChangeCertificate, SignedData};
use ferrite_types::{ConsensusRoundIdentifier, ValidatorSet, required_quorum};
use tracing::debug;

/// Validator for NEW-ROUND messages within one chain height.
///
/// A NEW-ROUND message is the new proposer's claim that a quorum of
/// validators voted to abandon an earlier round, together with the proposal
/// for the round being opened. Everything about the claim is checked here:
/// the sender must be the round's proposer, the round-change certificate
/// must hold a quorum of valid votes for exactly this round, and when any
/// vote proves a prior round already prepared a block, the new proposal must
/// carry that same block rather than substitute another.
#[derive(Debug)]
pub struct NewRoundValidator<S, F> {
    validators: ValidatorSet,
    proposer_selector: S,
    validator_factory: F,
    fault_tolerance: usize,
    chain_height: u64,
}

impl<S, F> NewRoundValidator<S, F>
where
    S: ProposerSelector,
    F: RoundValidatorFactory,
{
    /// Validator tolerating `fault_tolerance` byzantine validators at
    /// `chain_height`.
    pub const fn new(
        validators: ValidatorSet,
        proposer_selector: S,
        validator_factory: F,
        fault_tolerance: usize,
        chain_height: u64,
    ) -> Self {
        Self { validators, proposer_selector, validator_factory, fault_tolerance, chain_height }
    }

    /// Validate a NEW-ROUND message.
    pub fn validate_new_round(&self, msg: &SignedData<NewRoundPayload>) -> bool {
        let payload = msg.payload();
        let target_round = payload.round_identifier;

        let expected_proposer = self.proposer_selector.select_proposer(&target_round);
        if msg.sender() != expected_proposer {
            debug!(
                target: "ferrite::validation",
                sender = %msg.sender(),
                expected = %expected_proposer,
                "new round is not from the target round's proposer"
            );
            return false;
        }

        // round zero opens a height and needs no justification
        if target_round.round_number == 0 {
            debug!(target: "ferrite::validation", "new round illegally targets round zero");
            return false;
        }

        if target_round.sequence_number != self.chain_height {
            debug!(
                target: "ferrite::validation",
                %target_round,
                chain_height = self.chain_height,
                "new round is for another height"
            );
            return false;
        }

        if !self.validate_certificate_votes(&payload.round_change_certificate, target_round) {
            return false;
        }

        if !self.proposal_matches_latest_prepared(payload) {
            return false;
        }

        let mut round_validator = self.validator_factory.create_at(&target_round);
        if !round_validator.add_signed_proposal(&payload.proposal) {
            debug!(target: "ferrite::validation", "new round proposal failed validation");
            return false;
        }
        true
    }

    /// Every vote in the certificate must target the entered round and pass
    /// round-change validation; one bad vote voids the whole certificate.
    fn validate_certificate_votes(
        &self,
        certificate: &RoundChangeCertificate,
        target_round: ConsensusRoundIdentifier,
    ) -> bool {
        let votes = &certificate.round_change_messages;
        let quorum = required_quorum(self.fault_tolerance);
        if votes.len() < quorum {
            debug!(
                target: "ferrite::validation",
                votes = votes.len(),
                quorum,
                "round change certificate does not reach quorum"
            );
            return false;
        }

        let round_change_validator = RoundChangeValidator::new(
            self.validators.clone(),
            quorum - 1,
            self.chain_height,
            &self.validator_factory,
        );

        votes.iter().all(|vote| {
            if vote.round_identifier() != target_round {
                debug!(
                    target: "ferrite::validation",
                    vote_round = %vote.round_identifier(),
                    %target_round,
                    "round change vote targets a different round"
                );
                return false;
            }
            let valid = round_change_validator.validate_round_change(vote);
            if !valid {
                debug!(
                    target: "ferrite::validation",
                    sender = %vote.sender(),
                    "embedded round change vote failed validation"
                );
            }
            valid
        })
    }

    /// When any vote proves an earlier round prepared a block, the proposal
    /// must carry the block of the highest such round.
    fn proposal_matches_latest_prepared(&self, payload: &NewRoundPayload) -> bool {
        let Some(latest) = Self::latest_prepared_certificate(&payload.round_change_certificate)
        else {
            return true;
        };
        let prepared_hash = latest.proposal.payload().digest();
        let proposed_hash = payload.proposal.payload().digest();
        if prepared_hash != proposed_hash {
            debug!(
                target: "ferrite::validation",
                %prepared_hash,
                %proposed_hash,
                "proposal does not carry the latest prepared block"
            );
            return false;
        }
        true
    }

    fn latest_prepared_certificate(
        certificate: &RoundChangeCertificate,
    ) -> Option<&PreparedCertificate> {
        certificate
            .round_change_messages
            .iter()
            .filter_map(|vote| vote.payload().prepared_certificate.as_ref())
            .fold(None::<&PreparedCertificate>, |latest, candidate| match latest {
                Some(current)
                    if candidate.proposal_round().round_number
                        > current.proposal_round().round_number =>
                {
                    Some(candidate)
                }
                None => Some(candidate),
                _ => latest,
            })
    }
}
