//! Round validator construction for a single chain height.

use crate::{
    block_validator::BlockValidator,
    proposer::ProposerSelector,
    round_validator::{RoundMessageValidator, RoundValidator},
};
use auto_impl::auto_impl;
use ferrite_types::{ChainContext, ConsensusRoundIdentifier, Header, ValidatorSet};

/// Capability creating round validators scoped to a given round.
///
/// Certificate replay depends on this: the round-change and new-round
/// validators fabricate a fresh, stateless-per-round validator for every
/// piece of embedded evidence instead of duplicating the admission rules.
#[auto_impl(&, Arc)]
pub trait RoundValidatorFactory {
    /// Validator type produced by this factory.
    type Validator: RoundMessageValidator;

    /// Fresh validator for `round` with no accepted proposal.
    fn create_at(&self, round: &ConsensusRoundIdentifier) -> Self::Validator;
}

/// Production [`RoundValidatorFactory`] for one chain height.
///
/// Created validators share this factory's validator set, chain context and
/// parent header; the expected proposer is derived per round from the
/// proposer selector.
#[derive(Debug, Clone)]
pub struct HeightValidatorFactory<S, B> {
    validators: ValidatorSet,
    proposer_selector: S,
    block_validator: B,
    context: ChainContext,
    parent_header: Header,
}

impl<S, B> HeightValidatorFactory<S, B> {
    /// Factory for the height building on `parent_header`.
    pub const fn new(
        validators: ValidatorSet,
        proposer_selector: S,
        block_validator: B,
        context: ChainContext,
        parent_header: Header,
    ) -> Self {
        Self { validators, proposer_selector, block_validator, context, parent_header }
    }
}

impl<S, B> RoundValidatorFactory for HeightValidatorFactory<S, B>
where
    S: ProposerSelector,
    B: BlockValidator + Clone,
{
    type Validator = RoundValidator<B>;

    fn create_at(&self, round: &ConsensusRoundIdentifier) -> Self::Validator {
        RoundValidator::new(
            self.validators.clone(),
            self.proposer_selector.select_proposer(round),
            *round,
            self.block_validator.clone(),
            self.context,
            self.parent_header.clone(),
        )
    }
}
