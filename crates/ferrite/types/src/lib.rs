//! Core value types for the Ferrite BFT consensus engine.
//!
//! Ferrite reaches agreement through an IBFT-style three-phase exchange
//! (PROPOSE, PREPARE, COMMIT) with a ROUND-CHANGE sub-protocol for liveness.
//! This crate holds the pieces every layer above shares:
//!
//! - [`round`]: height and round addressing for consensus instances,
//! - [`validators`]: the ordered validator set and quorum arithmetic,
//! - [`block`]: the candidate block shape and the extra-data codec that
//!   embeds consensus metadata in execution headers,
//! - [`crypto`]: ECDSA signing and the sender-recovery helpers both message
//!   envelopes and commit seals rely on.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod block;
pub mod crypto;
pub mod round;
pub mod validators;

pub use block::{BftExtraData, ChainContext, ConsensusBlock, Header, VANITY_DATA_LENGTH};
pub use crypto::{NodeKey, SigningError, payload_digest, recover_signer};
pub use round::ConsensusRoundIdentifier;
pub use validators::{ValidatorSet, ValidatorSetError, fault_tolerance, required_quorum};
