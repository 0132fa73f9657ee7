//! Candidate block representation and the consensus extra-data codec.
//!
//! Ferrite reuses the execution-layer header format and tucks its own
//! metadata into the header's `extra_data` field, so finalized blocks stay
//! readable by ordinary execution tooling while consensus can recover the
//! round a block was produced in and the seals that finalized it.

use alloy_primitives::{Address, B256, Bytes};
use alloy_rlp::{Decodable, Encodable, RlpDecodable, RlpEncodable};
use serde::{Deserialize, Serialize};

pub use alloy_consensus::Header;

/// Length of the opaque vanity prefix in the consensus extra-data blob.
pub const VANITY_DATA_LENGTH: usize = 32;

/// Chain-level facts handed to block validation alongside each candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainContext {
    /// Chain id the engine is validating for.
    pub chain_id: u64,
}

impl ChainContext {
    /// Context for `chain_id`.
    pub const fn new(chain_id: u64) -> Self {
        Self { chain_id }
    }
}

/// A candidate block circulated during consensus.
///
/// The body is a list of opaque encoded items; executing them is the block
/// validator capability's job, not this crate's.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct ConsensusBlock {
    /// Execution-layer header. Consensus metadata lives in its extra-data.
    pub header: Header,
    /// Opaque encoded body items.
    pub body: Vec<Bytes>,
}

impl ConsensusBlock {
    /// Block from a header and body.
    pub const fn new(header: Header, body: Vec<Bytes>) -> Self {
        Self { header, body }
    }

    /// Hash identifying this block, keccak256 of the RLP-encoded header.
    pub fn hash(&self) -> B256 {
        self.header.hash_slow()
    }

    /// Height the block claims.
    pub const fn number(&self) -> u64 {
        self.header.number
    }

    /// Decode the consensus metadata embedded in the header.
    pub fn decode_extra_data(&self) -> Result<BftExtraData, alloy_rlp::Error> {
        BftExtraData::decode(&self.header.extra_data)
    }
}

/// Consensus metadata carried in the header `extra_data` field.
///
/// Encoded as the RLP list `[vanity_data, commit_seals, round, validators]`.
/// While a block is in flight only the round and validator list matter;
/// commit seals are filled in once the block finalizes.
#[derive(Debug, Clone, PartialEq, Eq, RlpEncodable, RlpDecodable)]
pub struct BftExtraData {
    /// Exactly [`VANITY_DATA_LENGTH`] opaque bytes, free for the producer.
    pub vanity_data: Bytes,
    /// Commit seals gathered at finalization, 65 bytes each.
    pub commit_seals: Vec<Bytes>,
    /// Consensus round that produced the block.
    pub round: u32,
    /// Validator set of the block's height.
    pub validators: Vec<Address>,
}

impl BftExtraData {
    /// Metadata for an in-flight proposal: zeroed vanity, no seals yet.
    pub fn for_proposal(round: u32, validators: Vec<Address>) -> Self {
        Self {
            vanity_data: Bytes::from_static(&[0u8; VANITY_DATA_LENGTH]),
            commit_seals: Vec::new(),
            round,
            validators,
        }
    }

    /// RLP-encode into a header-ready blob.
    pub fn encoded(&self) -> Bytes {
        let mut out = Vec::with_capacity(self.length());
        self.encode(&mut out);
        out.into()
    }

    /// Decode from a header extra-data blob.
    ///
    /// Rejects blobs whose vanity section is not exactly
    /// [`VANITY_DATA_LENGTH`] bytes, and blobs with bytes after the list.
    pub fn decode(mut data: &[u8]) -> Result<Self, alloy_rlp::Error> {
        let extra = <Self as Decodable>::decode(&mut data)?;
        if !data.is_empty() {
            return Err(alloy_rlp::Error::UnexpectedLength);
        }
        if extra.vanity_data.len() != VANITY_DATA_LENGTH {
            return Err(alloy_rlp::Error::Custom("extra data vanity must be 32 bytes"));
        }
        Ok(extra)
    }
}
