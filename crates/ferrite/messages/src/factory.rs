//! Produces signed consensus messages for one validator key.

use crate::{
    MessageError,
    certificate::{PreparedCertificate, RoundChangeCertificate},
    new_round::NewRoundPayload,
    payload::{CommitPayload, PreparePayload, ProposalPayload},
    round_change::RoundChangePayload,
    signed_data::SignedData,
};
use alloy_primitives::{Address, B256};
use ferrite_types::{ConsensusBlock, ConsensusRoundIdentifier, NodeKey};

/// Builds and signs the five consensus payload kinds with a node's key.
#[derive(Debug, Clone)]
pub struct MessageFactory {
    key: NodeKey,
}

impl MessageFactory {
    /// Factory signing with `key`.
    pub const fn new(key: NodeKey) -> Self {
        Self { key }
    }

    /// Address the factory signs as.
    pub fn address(&self) -> Address {
        self.key.address()
    }

    /// Signed PROPOSE message carrying `block` for `round_identifier`.
    pub fn create_signed_proposal(
        &self,
        round_identifier: ConsensusRoundIdentifier,
        block: ConsensusBlock,
    ) -> Result<SignedData<ProposalPayload>, MessageError> {
        SignedData::sign(ProposalPayload { round_identifier, block }, &self.key)
    }

    /// Signed PREPARE message for the block identified by `digest`.
    pub fn create_signed_prepare(
        &self,
        round_identifier: ConsensusRoundIdentifier,
        digest: B256,
    ) -> Result<SignedData<PreparePayload>, MessageError> {
        SignedData::sign(PreparePayload { round_identifier, digest }, &self.key)
    }

    /// Signed COMMIT message for the block identified by `digest`.
    ///
    /// The commit seal is a second signature over `digest` with the same
    /// key, verifiable on its own once embedded in a finalized block.
    pub fn create_signed_commit(
        &self,
        round_identifier: ConsensusRoundIdentifier,
        digest: B256,
    ) -> Result<SignedData<CommitPayload>, MessageError> {
        let commit_seal = self.key.sign_digest(digest)?;
        SignedData::sign(CommitPayload { round_identifier, digest, commit_seal }, &self.key)
    }

    /// Signed ROUND-CHANGE message with optional prepared-round evidence.
    pub fn create_signed_round_change(
        &self,
        round_identifier: ConsensusRoundIdentifier,
        prepared_certificate: Option<PreparedCertificate>,
    ) -> Result<SignedData<RoundChangePayload>, MessageError> {
        SignedData::sign(RoundChangePayload::new(round_identifier, prepared_certificate), &self.key)
    }

    /// Signed NEW-ROUND message justifying the start of `round_identifier`.
    pub fn create_signed_new_round(
        &self,
        round_identifier: ConsensusRoundIdentifier,
        round_change_certificate: RoundChangeCertificate,
        proposal: SignedData<ProposalPayload>,
    ) -> Result<SignedData<NewRoundPayload>, MessageError> {
        SignedData::sign(
            NewRoundPayload::new(round_identifier, round_change_certificate, proposal),
            &self.key,
        )
    }
}
