//! Capability interface to the execution layer's block validation.

use alloy_primitives::B256;
use auto_impl::auto_impl;
use ferrite_types::{ChainContext, ConsensusBlock, Header};

/// Outputs of a successful validate-and-process run.
///
/// Consensus only needs to know the run succeeded; the fields are carried
/// for the engine to reuse when the block finalizes instead of executing it
/// a second time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockProcessingOutputs {
    /// Root of the receipts produced by the block's body.
    pub receipts_root: B256,
    /// Total gas consumed by the block's body.
    pub gas_used: u64,
}

impl BlockProcessingOutputs {
    /// Outputs from a finished processing run.
    pub const fn new(receipts_root: B256, gas_used: u64) -> Self {
        Self { receipts_root, gas_used }
    }
}

/// Capability validating and processing a candidate block body.
///
/// `None` signals an invalid block. Whatever went wrong inside the
/// execution layer, consensus treats it uniformly as a rejectable proposal;
/// fatal conditions are the implementation's own concern.
#[auto_impl(&, Arc)]
pub trait BlockValidator {
    /// Validate `block` on top of `parent_header` and, on success, return
    /// the processing outputs.
    fn validate_and_process(
        &self,
        context: &ChainContext,
        block: &ConsensusBlock,
        parent_header: &Header,
    ) -> Option<BlockProcessingOutputs>;
}
