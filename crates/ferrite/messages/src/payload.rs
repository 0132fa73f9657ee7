//! Payload bodies for the three in-round message kinds.
//!
//! ROUND-CHANGE and NEW-ROUND live in their own modules; they nest
//! certificates and need hand-written RLP.

use alloy_primitives::{B256, Signature};
use alloy_rlp::{BufMut, Decodable, Encodable, RlpDecodable, RlpEncodable};
use ferrite_types::{ConsensusBlock, ConsensusRoundIdentifier};
use std::fmt;

/// One-byte wire codes for the five consensus message kinds.
pub mod codes {
    /// PROPOSE phase message.
    pub const PROPOSAL: u8 = 0;
    /// PREPARE phase message.
    pub const PREPARE: u8 = 1;
    /// COMMIT phase message.
    pub const COMMIT: u8 = 2;
    /// ROUND-CHANGE liveness message.
    pub const ROUND_CHANGE: u8 = 3;
    /// Round-start justification message.
    pub const NEW_ROUND: u8 = 4;
}

/// Behavior shared by every consensus payload body.
///
/// A payload is a plain RLP value; its canonical encoding is what the
/// envelope signature commits to.
pub trait Payload:
    Encodable + Decodable + Clone + PartialEq + Send + Sync + fmt::Debug
{
    /// Round this payload targets.
    fn round_identifier(&self) -> ConsensusRoundIdentifier;

    /// Wire code of the payload kind, one of [`codes`].
    fn message_code(&self) -> u8;
}

/// PROPOSE payload: the candidate block for a round.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct ProposalPayload {
    /// Round the proposal targets.
    pub round_identifier: ConsensusRoundIdentifier,
    /// Proposed block. Its embedded extra-data round must match
    /// `round_identifier` for the proposal to be meaningful.
    pub block: ConsensusBlock,
}

impl ProposalPayload {
    /// Hash of the proposed block.
    pub fn digest(&self) -> B256 {
        self.block.hash()
    }
}

impl Payload for ProposalPayload {
    fn round_identifier(&self) -> ConsensusRoundIdentifier {
        self.round_identifier
    }

    fn message_code(&self) -> u8 {
        codes::PROPOSAL
    }
}

/// PREPARE payload: a validator's vote for the proposed block.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct PreparePayload {
    /// Round the vote belongs to.
    pub round_identifier: ConsensusRoundIdentifier,
    /// Hash of the block being prepared.
    pub digest: B256,
}

impl Payload for PreparePayload {
    fn round_identifier(&self) -> ConsensusRoundIdentifier {
        self.round_identifier
    }

    fn message_code(&self) -> u8 {
        codes::PREPARE
    }
}

/// COMMIT payload: a validator's finalization vote plus its commit seal.
///
/// The seal is a second signature over `digest`, independent of the
/// envelope signature. Finalized blocks embed the gathered seals in their
/// extra-data, so each seal must verify on its own.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitPayload {
    /// Round the vote belongs to.
    pub round_identifier: ConsensusRoundIdentifier,
    /// Hash of the block being committed.
    pub digest: B256,
    /// Independent signature over `digest`.
    pub commit_seal: Signature,
}

impl CommitPayload {
    fn rlp_payload_length(&self) -> usize {
        self.round_identifier.length()
            + self.digest.length()
            + self.commit_seal.as_bytes().length()
    }
}

impl Encodable for CommitPayload {
    fn encode(&self, out: &mut dyn BufMut) {
        let payload_length = self.rlp_payload_length();
        alloy_rlp::Header { list: true, payload_length }.encode(out);
        self.round_identifier.encode(out);
        self.digest.encode(out);
        self.commit_seal.as_bytes().encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        alloy_rlp::Header { list: true, payload_length }.length() + payload_length
    }
}

impl Decodable for CommitPayload {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = alloy_rlp::Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let started_len = buf.len();
        if started_len < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        let round_identifier = ConsensusRoundIdentifier::decode(buf)?;
        let digest = B256::decode(buf)?;
        let seal = <[u8; 65]>::decode(buf)?;
        let consumed = started_len - buf.len();
        if consumed != header.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: consumed,
            });
        }
        let commit_seal = Signature::try_from(seal.as_slice())
            .map_err(|_| alloy_rlp::Error::Custom("malformed commit seal"))?;
        Ok(Self { round_identifier, digest, commit_seal })
    }
}

impl Payload for CommitPayload {
    fn round_identifier(&self) -> ConsensusRoundIdentifier {
        self.round_identifier
    }

    fn message_code(&self) -> u8 {
        codes::COMMIT
    }
}
