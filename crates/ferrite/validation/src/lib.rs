//! Message validation for the Ferrite BFT consensus engine.
//!
//! The engine feeds every inbound signed message through a validator from
//! this crate and only tallies the ones that pass. Two validator families
//! exist:
//!
//! - [`RoundValidator`] guards one `(height, round)` instance: it admits at
//!   most one proposal and judges PREPARE and COMMIT messages against it.
//! - [`NewRoundValidator`] and [`RoundChangeValidator`] guard round
//!   transitions: they check that a quorum of round-change votes justifies
//!   the new round and replay any embedded prepared-state evidence.
//!
//! All verdicts are boolean. Malformed signatures, wrong senders and stale
//! rounds are expected byzantine inputs, not errors. External concerns
//! enter through capability traits ([`ProposerSelector`], [`BlockValidator`],
//! [`RoundValidatorFactory`]) so engines and tests can inject their own
//! implementations.

#![cfg_attr(not(test), warn(unused_crate_dependencies))]

pub mod block_validator;
pub mod factory;
pub mod new_round_validator;
pub mod proposer;
pub mod round_change_validator;
pub mod round_validator;

#[cfg(test)]
pub(crate) mod test_utils;

pub use block_validator::{BlockProcessingOutputs, BlockValidator};
pub use factory::{HeightValidatorFactory, RoundValidatorFactory};
pub use new_round_validator::NewRoundValidator;
pub use proposer::{ProposerSelector, RoundRobinProposerSelector};
pub use round_change_validator::RoundChangeValidator;
pub use round_validator::{RoundMessageValidator, RoundValidator};
