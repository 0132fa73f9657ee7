//! Validation of ROUND-CHANGE messages and their embedded evidence.

use crate::{factory::RoundValidatorFactory, round_validator::RoundMessageValidator};
use ferrite_messages::{PreparedCertificate, RoundChangePayload, SignedData};
use ferrite_types::{ConsensusRoundIdentifier, ValidatorSet};
use tracing::debug;

/// Validator for ROUND-CHANGE messages targeting rounds of one chain height.
///
/// A vote without evidence passes on sender and height checks alone. A vote
/// carrying a prepared certificate must additionally prove that the claimed
/// earlier round really reached the prepared state: the certificate's
/// proposal and every embedded prepare are replayed through a fresh round
/// validator scoped to that earlier round.
#[derive(Debug)]
pub struct RoundChangeValidator<F> {
    validators: ValidatorSet,
    /// Fewest embedded prepares that prove a prepared quorum. The proposer
    /// attests through its proposal, so this is one below quorum.
    prepare_threshold: usize,
    chain_height: u64,
    validator_factory: F,
}

impl<F> RoundChangeValidator<F>
where
    F: RoundValidatorFactory,
{
    /// Validator for round changes within `chain_height`.
    pub const fn new(
        validators: ValidatorSet,
        prepare_threshold: usize,
        chain_height: u64,
        validator_factory: F,
    ) -> Self {
        Self { validators, prepare_threshold, chain_height, validator_factory }
    }

    /// Validate a single ROUND-CHANGE message.
    pub fn validate_round_change(&self, msg: &SignedData<RoundChangePayload>) -> bool {
        if !self.validators.is_validator(&msg.sender()) {
            debug!(
                target: "ferrite::validation",
                sender = %msg.sender(),
                "round change is not from a known validator"
            );
            return false;
        }

        let target_round = msg.round_identifier();
        if target_round.sequence_number != self.chain_height {
            debug!(
                target: "ferrite::validation",
                %target_round,
                chain_height = self.chain_height,
                "round change is for another height"
            );
            return false;
        }

        match &msg.payload().prepared_certificate {
            Some(certificate) => self.validate_certificate(certificate, target_round),
            None => true,
        }
    }

    fn validate_certificate(
        &self,
        certificate: &PreparedCertificate,
        target_round: ConsensusRoundIdentifier,
    ) -> bool {
        let proposal_round = certificate.proposal_round();
        if proposal_round.sequence_number != target_round.sequence_number {
            debug!(
                target: "ferrite::validation",
                %proposal_round,
                %target_round,
                "prepared certificate is for another height"
            );
            return false;
        }
        if proposal_round.round_number >= target_round.round_number {
            debug!(
                target: "ferrite::validation",
                %proposal_round,
                %target_round,
                "prepared certificate is not from an earlier round"
            );
            return false;
        }

        let mut round_validator = self.validator_factory.create_at(&proposal_round);
        if !round_validator.add_signed_proposal(&certificate.proposal) {
            debug!(
                target: "ferrite::validation",
                %proposal_round,
                "embedded proposal failed replay validation"
            );
            return false;
        }

        if certificate.prepares.len() < self.prepare_threshold {
            debug!(
                target: "ferrite::validation",
                prepares = certificate.prepares.len(),
                required = self.prepare_threshold,
                "prepared certificate carries too few prepares"
            );
            return false;
        }

        certificate.prepares.iter().all(|prepare| {
            let valid = round_validator.validate_prepare(prepare);
            if !valid {
                debug!(
                    target: "ferrite::validation",
                    sender = %prepare.sender(),
                    "embedded prepare failed replay validation"
                );
            }
            valid
        })
    }
}
