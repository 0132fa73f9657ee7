//! Per-round validation of PROPOSE, PREPARE and COMMIT messages.

use crate::block_validator::BlockValidator;
use alloy_primitives::{Address, B256};
use ferrite_messages::{CommitPayload, PreparePayload, ProposalPayload, SignedData};
use ferrite_types::{ChainContext, ConsensusRoundIdentifier, Header, ValidatorSet, recover_signer};
use tracing::{debug, trace};

/// Message-admission interface of a single consensus round.
///
/// The round-change and new-round validators replay certificate evidence
/// through fresh instances of this interface, so deterministic doubles can
/// stand in for the production [`RoundValidator`] in tests.
pub trait RoundMessageValidator {
    /// Submit a PROPOSE message, recording it as the round's accepted
    /// proposal when it passes.
    fn add_signed_proposal(&mut self, msg: &SignedData<ProposalPayload>) -> bool;

    /// Validate a PREPARE message against the accepted proposal.
    fn validate_prepare(&self, msg: &SignedData<PreparePayload>) -> bool;

    /// Validate a COMMIT message against the accepted proposal.
    fn validate_commit(&self, msg: &SignedData<CommitPayload>) -> bool;
}

/// Stateful validator for one `(height, round)` consensus instance.
///
/// Holds at most one accepted proposal. Once a proposal is in, it can only
/// be reaffirmed by an identical re-announcement; a conflicting proposal is
/// rejected and signals proposer equivocation to the engine. PREPARE and
/// COMMIT messages are judged against the accepted proposal's block hash.
///
/// Rejections never mutate state. The single side effect is the
/// block-processing call made when the first acceptable proposal arrives.
#[derive(Debug)]
pub struct RoundValidator<B> {
    validators: ValidatorSet,
    expected_proposer: Address,
    round_identifier: ConsensusRoundIdentifier,
    block_validator: B,
    context: ChainContext,
    parent_header: Header,
    proposal: Option<SignedData<ProposalPayload>>,
}

impl<B> RoundValidator<B> {
    /// Validator for the given round with no accepted proposal yet.
    pub const fn new(
        validators: ValidatorSet,
        expected_proposer: Address,
        round_identifier: ConsensusRoundIdentifier,
        block_validator: B,
        context: ChainContext,
        parent_header: Header,
    ) -> Self {
        Self {
            validators,
            expected_proposer,
            round_identifier,
            block_validator,
            context,
            parent_header,
            proposal: None,
        }
    }

    /// The proposal accepted for this round, if any.
    pub const fn accepted_proposal(&self) -> Option<&SignedData<ProposalPayload>> {
        self.proposal.as_ref()
    }

    fn accepted_digest(&self) -> Option<B256> {
        self.proposal.as_ref().map(|msg| msg.payload().digest())
    }

    /// A re-announced proposal is valid only when it repeats the accepted
    /// one exactly; anything else is a conflicting proposal.
    fn check_subsequent_proposal(
        existing: &SignedData<ProposalPayload>,
        msg: &SignedData<ProposalPayload>,
    ) -> bool {
        if existing.sender() != msg.sender() {
            debug!(
                target: "ferrite::validation",
                accepted = %existing.sender(),
                sender = %msg.sender(),
                "subsequent proposal changed sender"
            );
            return false;
        }
        if existing.payload() != msg.payload() {
            debug!(
                target: "ferrite::validation",
                sender = %msg.sender(),
                "subsequent proposal changed content"
            );
            return false;
        }
        trace!(target: "ferrite::validation", sender = %msg.sender(), "proposal re-announced unchanged");
        true
    }

    fn validate_common(
        &self,
        sender: Address,
        round: ConsensusRoundIdentifier,
        kind: &str,
    ) -> bool {
        if self.proposal.is_none() {
            debug!(target: "ferrite::validation", kind, "message arrived before any accepted proposal");
            return false;
        }
        if !self.validators.is_validator(&sender) {
            debug!(target: "ferrite::validation", kind, %sender, "message is not from a known validator");
            return false;
        }
        if round != self.round_identifier {
            debug!(
                target: "ferrite::validation",
                kind,
                %round,
                active = %self.round_identifier,
                "message targets a different round"
            );
            return false;
        }
        true
    }

    fn digest_matches(&self, digest: B256, kind: &str) -> bool {
        let Some(accepted) = self.accepted_digest() else { return false };
        if digest != accepted {
            debug!(
                target: "ferrite::validation",
                kind,
                %digest,
                %accepted,
                "digest does not match the accepted proposal"
            );
            return false;
        }
        true
    }
}

impl<B> RoundMessageValidator for RoundValidator<B>
where
    B: BlockValidator,
{
    fn add_signed_proposal(&mut self, msg: &SignedData<ProposalPayload>) -> bool {
        if let Some(existing) = &self.proposal {
            return Self::check_subsequent_proposal(existing, msg);
        }

        if msg.sender() != self.expected_proposer {
            debug!(
                target: "ferrite::validation",
                sender = %msg.sender(),
                expected = %self.expected_proposer,
                "proposal is not from the round's proposer"
            );
            return false;
        }

        let payload = msg.payload();
        if payload.round_identifier != self.round_identifier {
            debug!(
                target: "ferrite::validation",
                round = %payload.round_identifier,
                active = %self.round_identifier,
                "proposal targets a different round"
            );
            return false;
        }

        let embedded_round = match payload.block.decode_extra_data() {
            Ok(extra) => extra.round,
            Err(err) => {
                debug!(
                    target: "ferrite::validation",
                    %err,
                    "proposal block carries undecodable extra data"
                );
                return false;
            }
        };
        if embedded_round != self.round_identifier.round_number {
            debug!(
                target: "ferrite::validation",
                embedded_round,
                round = self.round_identifier.round_number,
                "proposal block was built for a different round"
            );
            return false;
        }

        if self
            .block_validator
            .validate_and_process(&self.context, &payload.block, &self.parent_header)
            .is_none()
        {
            debug!(
                target: "ferrite::validation",
                block = %payload.digest(),
                "proposal block failed validation"
            );
            return false;
        }

        self.proposal = Some(msg.clone());
        true
    }

    fn validate_prepare(&self, msg: &SignedData<PreparePayload>) -> bool {
        if !self.validate_common(msg.sender(), msg.payload().round_identifier, "prepare") {
            return false;
        }
        // the proposer's commitment is its proposal, a prepare on top of it
        // is invalid input
        if msg.sender() == self.expected_proposer {
            debug!(
                target: "ferrite::validation",
                sender = %msg.sender(),
                "prepare sent by the round's proposer"
            );
            return false;
        }
        self.digest_matches(msg.payload().digest, "prepare")
    }

    fn validate_commit(&self, msg: &SignedData<CommitPayload>) -> bool {
        if !self.validate_common(msg.sender(), msg.payload().round_identifier, "commit") {
            return false;
        }
        let Some(accepted) = self.accepted_digest() else { return false };
        // the seal must attest to the accepted block, by the sender itself
        if recover_signer(&accepted, &msg.payload().commit_seal) != Some(msg.sender()) {
            debug!(
                target: "ferrite::validation",
                sender = %msg.sender(),
                "commit seal was not created by the message sender"
            );
            return false;
        }
        self.digest_matches(msg.payload().digest, "commit")
    }
}
