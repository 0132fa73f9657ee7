//! Shared fixtures and capability doubles for validator tests.

use crate::{
    block_validator::{BlockProcessingOutputs, BlockValidator},
    factory::RoundValidatorFactory,
    round_validator::RoundMessageValidator,
};
use alloy_primitives::{Address, B256};
use ferrite_messages::{CommitPayload, PreparePayload, ProposalPayload, SignedData};
use ferrite_types::{
    BftExtraData, ChainContext, ConsensusBlock, ConsensusRoundIdentifier, Header, NodeKey,
    ValidatorSet,
};
use std::{
    cell::{Cell, RefCell},
    collections::VecDeque,
    rc::Rc,
};

pub(crate) const CHAIN_ID: u64 = 1337;

pub(crate) fn chain_context() -> ChainContext {
    ChainContext::new(CHAIN_ID)
}

pub(crate) fn node_key(seed: u8) -> NodeKey {
    NodeKey::from_secret(B256::repeat_byte(seed)).unwrap()
}

/// Four validators with keys from fixed seeds, and their set.
pub(crate) fn standard_validators() -> (Vec<NodeKey>, ValidatorSet) {
    let keys: Vec<NodeKey> = (1u8..=4).map(node_key).collect();
    let validators = ValidatorSet::new(keys.iter().map(NodeKey::address).collect()).unwrap();
    (keys, validators)
}

/// The key behind a validator address.
pub(crate) fn key_for(keys: &[NodeKey], address: Address) -> NodeKey {
    keys.iter().find(|key| key.address() == address).cloned().unwrap()
}

/// Block proposable at the given height and round, listing `validators` in
/// its extra data.
pub(crate) fn block_for(validators: &ValidatorSet, height: u64, round: u32) -> ConsensusBlock {
    let extra = BftExtraData::for_proposal(round, validators.addresses().to_vec());
    let header = Header { number: height, extra_data: extra.encoded(), ..Default::default() };
    ConsensusBlock::new(header, Vec::new())
}

pub(crate) fn parent_header(height: u64) -> Header {
    Header { number: height - 1, ..Default::default() }
}

/// Block validator double that accepts everything.
#[derive(Clone, Copy, Debug)]
pub(crate) struct AcceptingBlockValidator;

impl BlockValidator for AcceptingBlockValidator {
    fn validate_and_process(
        &self,
        _context: &ChainContext,
        _block: &ConsensusBlock,
        _parent_header: &Header,
    ) -> Option<BlockProcessingOutputs> {
        Some(BlockProcessingOutputs::default())
    }
}

/// Block validator double that rejects everything.
#[derive(Clone, Copy, Debug)]
pub(crate) struct RejectingBlockValidator;

impl BlockValidator for RejectingBlockValidator {
    fn validate_and_process(
        &self,
        _context: &ChainContext,
        _block: &ConsensusBlock,
        _parent_header: &Header,
    ) -> Option<BlockProcessingOutputs> {
        None
    }
}

/// Block validator double that fails its first call and accepts afterwards.
#[derive(Debug)]
pub(crate) struct FlakyBlockValidator {
    fail_next: Cell<bool>,
}

impl FlakyBlockValidator {
    pub(crate) fn failing_once() -> Self {
        Self { fail_next: Cell::new(true) }
    }
}

impl BlockValidator for FlakyBlockValidator {
    fn validate_and_process(
        &self,
        _context: &ChainContext,
        _block: &ConsensusBlock,
        _parent_header: &Header,
    ) -> Option<BlockProcessingOutputs> {
        if self.fail_next.replace(false) { None } else { Some(BlockProcessingOutputs::default()) }
    }
}

#[derive(Debug)]
struct ScriptState {
    proposal_verdicts: RefCell<VecDeque<bool>>,
    prepare_verdict: Cell<bool>,
}

/// Round validator factory whose validators answer with scripted verdicts.
///
/// Unscripted calls return true, so a fresh factory behaves like a round
/// validator that accepts everything. Clones share the script.
#[derive(Clone, Debug)]
pub(crate) struct ScriptedFactory {
    state: Rc<ScriptState>,
}

impl ScriptedFactory {
    pub(crate) fn new() -> Self {
        Self {
            state: Rc::new(ScriptState {
                proposal_verdicts: RefCell::new(VecDeque::new()),
                prepare_verdict: Cell::new(true),
            }),
        }
    }

    /// Queue verdicts for upcoming proposal submissions, in call order.
    pub(crate) fn script_proposals(&self, verdicts: impl IntoIterator<Item = bool>) {
        self.state.proposal_verdicts.borrow_mut().extend(verdicts);
    }

    /// Fail every replayed prepare from now on.
    pub(crate) fn reject_prepares(&self) {
        self.state.prepare_verdict.set(false);
    }
}

#[derive(Debug)]
pub(crate) struct ScriptedValidator {
    state: Rc<ScriptState>,
}

impl RoundValidatorFactory for ScriptedFactory {
    type Validator = ScriptedValidator;

    fn create_at(&self, _round: &ConsensusRoundIdentifier) -> ScriptedValidator {
        ScriptedValidator { state: Rc::clone(&self.state) }
    }
}

impl RoundMessageValidator for ScriptedValidator {
    fn add_signed_proposal(&mut self, _msg: &SignedData<ProposalPayload>) -> bool {
        self.state.proposal_verdicts.borrow_mut().pop_front().unwrap_or(true)
    }

    fn validate_prepare(&self, _msg: &SignedData<PreparePayload>) -> bool {
        self.state.prepare_verdict.get()
    }

    fn validate_commit(&self, _msg: &SignedData<CommitPayload>) -> bool {
        true
    }
}
