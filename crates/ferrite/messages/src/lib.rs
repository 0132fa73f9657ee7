//! Signed consensus messages for the Ferrite BFT engine.
//!
//! Payload bodies for the five message kinds (PROPOSE, PREPARE, COMMIT,
//! ROUND-CHANGE, NEW-ROUND) are plain RLP values wrapped in a
//! [`SignedData`] envelope. The envelope's sender identity is recovered
//! from its signature, never read from the wire, so a message's authorship
//! and its integrity stand or fall together.
//!
//! [`MessageFactory`] signs outbound payloads with a node's key;
//! [`ConsensusMessage`] is the one-byte-code wire framing used between
//! peers.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod certificate;
pub mod factory;
pub mod message;
pub mod new_round;
pub mod payload;
pub mod round_change;
pub mod signed_data;

pub use certificate::{PreparedCertificate, RoundChangeCertificate};
pub use factory::MessageFactory;
pub use message::ConsensusMessage;
pub use new_round::NewRoundPayload;
pub use payload::{CommitPayload, Payload, PreparePayload, ProposalPayload, codes};
pub use round_change::RoundChangePayload;
pub use signed_data::SignedData;

use ferrite_types::SigningError;
use thiserror::Error;

/// Errors from building or decoding consensus messages.
///
/// Validation verdicts never pass through here, they are boolean. These
/// cover malformed wire data and local signing failures only.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MessageError {
    /// Wire data was empty.
    #[error("empty message data")]
    EmptyMessage,
    /// Leading code byte does not name a known message kind.
    #[error("unknown message code {0}")]
    UnknownMessageCode(u8),
    /// Envelope or payload RLP was malformed.
    #[error("malformed message encoding: {0}")]
    Rlp(#[from] alloy_rlp::Error),
    /// Signature does not recover to any sender address.
    #[error("signature does not recover to a sender")]
    UnrecoverableSignature,
    /// The local signer failed to produce a signature.
    #[error(transparent)]
    Signing(#[from] SigningError),
}
