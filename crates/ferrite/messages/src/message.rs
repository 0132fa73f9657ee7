//! Wire framing for the five consensus message kinds.

use crate::{
    MessageError,
    new_round::NewRoundPayload,
    payload::{CommitPayload, Payload, PreparePayload, ProposalPayload, codes},
    round_change::RoundChangePayload,
    signed_data::SignedData,
};
use alloy_primitives::{Address, Bytes};
use alloy_rlp::{Decodable, Encodable};
use ferrite_types::ConsensusRoundIdentifier;

/// A decoded consensus message of any kind.
///
/// On the wire a message is its one-byte code followed by the RLP of the
/// signed envelope. Decoding recovers the sender, so a successfully decoded
/// message always carries a well-formed authorship claim; whether that
/// sender is entitled to say what it says is the validation layer's call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsensusMessage {
    /// PROPOSE phase message.
    Proposal(SignedData<ProposalPayload>),
    /// PREPARE phase message.
    Prepare(SignedData<PreparePayload>),
    /// COMMIT phase message.
    Commit(SignedData<CommitPayload>),
    /// ROUND-CHANGE liveness message.
    RoundChange(SignedData<RoundChangePayload>),
    /// Round-start justification message.
    NewRound(SignedData<NewRoundPayload>),
}

impl ConsensusMessage {
    /// Wire code of this message kind.
    pub fn message_code(&self) -> u8 {
        match self {
            Self::Proposal(m) => m.payload().message_code(),
            Self::Prepare(m) => m.payload().message_code(),
            Self::Commit(m) => m.payload().message_code(),
            Self::RoundChange(m) => m.payload().message_code(),
            Self::NewRound(m) => m.payload().message_code(),
        }
    }

    /// Round the message targets.
    pub fn round_identifier(&self) -> ConsensusRoundIdentifier {
        match self {
            Self::Proposal(m) => m.round_identifier(),
            Self::Prepare(m) => m.round_identifier(),
            Self::Commit(m) => m.round_identifier(),
            Self::RoundChange(m) => m.round_identifier(),
            Self::NewRound(m) => m.round_identifier(),
        }
    }

    /// Validator that signed the message.
    pub fn sender(&self) -> Address {
        match self {
            Self::Proposal(m) => m.sender(),
            Self::Prepare(m) => m.sender(),
            Self::Commit(m) => m.sender(),
            Self::RoundChange(m) => m.sender(),
            Self::NewRound(m) => m.sender(),
        }
    }

    /// Encode as the code byte followed by the RLP envelope.
    pub fn encoded(&self) -> Bytes {
        let mut out = vec![self.message_code()];
        match self {
            Self::Proposal(m) => m.encode(&mut out),
            Self::Prepare(m) => m.encode(&mut out),
            Self::Commit(m) => m.encode(&mut out),
            Self::RoundChange(m) => m.encode(&mut out),
            Self::NewRound(m) => m.encode(&mut out),
        }
        out.into()
    }

    /// Decode a message from its wire form. The frame is exact, bytes after
    /// the envelope are an error.
    pub fn decode(data: &[u8]) -> Result<Self, MessageError> {
        let (&code, mut rest) = data.split_first().ok_or(MessageError::EmptyMessage)?;
        let buf = &mut rest;
        let message = match code {
            codes::PROPOSAL => Self::Proposal(SignedData::decode(buf)?),
            codes::PREPARE => Self::Prepare(SignedData::decode(buf)?),
            codes::COMMIT => Self::Commit(SignedData::decode(buf)?),
            codes::ROUND_CHANGE => Self::RoundChange(SignedData::decode(buf)?),
            codes::NEW_ROUND => Self::NewRound(SignedData::decode(buf)?),
            other => return Err(MessageError::UnknownMessageCode(other)),
        };
        if !rest.is_empty() {
            return Err(MessageError::Rlp(alloy_rlp::Error::UnexpectedLength));
        }
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        certificate::{PreparedCertificate, RoundChangeCertificate},
        factory::MessageFactory,
    };
    use alloy_primitives::B256;
    use ferrite_types::{BftExtraData, ConsensusBlock, Header, NodeKey};

    fn factory(seed: u8) -> MessageFactory {
        MessageFactory::new(NodeKey::from_secret(B256::repeat_byte(seed)).unwrap())
    }

    fn round(number: u32) -> ConsensusRoundIdentifier {
        ConsensusRoundIdentifier::new(2, number)
    }

    fn block(round_number: u32) -> ConsensusBlock {
        let validators = vec![Address::repeat_byte(1), Address::repeat_byte(2)];
        let header = Header {
            number: 2,
            extra_data: BftExtraData::for_proposal(round_number, validators).encoded(),
            ..Default::default()
        };
        ConsensusBlock::new(header, Vec::new())
    }

    #[test]
    fn prepare_roundtrips_through_the_wire() {
        let factory = factory(1);
        let prepare = factory.create_signed_prepare(round(0), B256::repeat_byte(3)).unwrap();
        let message = ConsensusMessage::Prepare(prepare);
        let decoded = ConsensusMessage::decode(&message.encoded()).unwrap();
        assert_eq!(decoded, message);
        assert_eq!(decoded.sender(), factory.address());
        assert_eq!(decoded.round_identifier(), round(0));
    }

    #[test]
    fn round_change_roundtrips_with_and_without_evidence() {
        let factory = factory(1);
        let bare = factory.create_signed_round_change(round(4), None).unwrap();
        let decoded = ConsensusMessage::decode(&ConsensusMessage::RoundChange(bare.clone()).encoded());
        assert_eq!(decoded.unwrap(), ConsensusMessage::RoundChange(bare));

        let proposal = factory.create_signed_proposal(round(1), block(1)).unwrap();
        let prepare = factory.create_signed_prepare(round(1), block(1).hash()).unwrap();
        let evidence = PreparedCertificate::new(proposal, vec![prepare]);
        let carrying =
            factory.create_signed_round_change(round(4), Some(evidence.clone())).unwrap();
        let message = ConsensusMessage::RoundChange(carrying);
        let decoded = ConsensusMessage::decode(&message.encoded()).unwrap();
        assert_eq!(decoded, message);
        match decoded {
            ConsensusMessage::RoundChange(m) => {
                assert_eq!(m.payload().prepared_certificate.as_ref(), Some(&evidence));
            }
            other => panic!("wrong kind: {other:?}"),
        }
    }

    #[test]
    fn new_round_roundtrips_through_the_wire() {
        let factory = factory(1);
        let proposal = factory.create_signed_proposal(round(4), block(4)).unwrap();
        let votes = vec![factory.create_signed_round_change(round(4), None).unwrap()];
        let new_round = factory
            .create_signed_new_round(round(4), RoundChangeCertificate::new(votes), proposal)
            .unwrap();
        let message = ConsensusMessage::NewRound(new_round);
        assert_eq!(ConsensusMessage::decode(&message.encoded()).unwrap(), message);
    }

    #[test]
    fn message_codes_match_the_payload_kind() {
        let factory = factory(1);
        let prepare = factory.create_signed_prepare(round(0), B256::repeat_byte(3)).unwrap();
        let commit = factory.create_signed_commit(round(0), B256::repeat_byte(3)).unwrap();
        assert_eq!(ConsensusMessage::Prepare(prepare).message_code(), codes::PREPARE);
        assert_eq!(ConsensusMessage::Commit(commit).message_code(), codes::COMMIT);
    }

    #[test]
    fn unknown_code_is_rejected() {
        let factory = factory(1);
        let prepare = factory.create_signed_prepare(round(0), B256::repeat_byte(3)).unwrap();
        let mut wire = ConsensusMessage::Prepare(prepare).encoded().to_vec();
        wire[0] = 9;
        assert_eq!(ConsensusMessage::decode(&wire), Err(MessageError::UnknownMessageCode(9)));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(ConsensusMessage::decode(&[]), Err(MessageError::EmptyMessage));
    }

    #[test]
    fn truncated_envelope_is_rejected() {
        let factory = factory(1);
        let prepare = factory.create_signed_prepare(round(0), B256::repeat_byte(3)).unwrap();
        let wire = ConsensusMessage::Prepare(prepare).encoded();
        assert!(ConsensusMessage::decode(&wire[..wire.len() - 10]).is_err());
    }

    #[test]
    fn trailing_bytes_after_the_envelope_are_rejected() {
        let factory = factory(1);
        let prepare = factory.create_signed_prepare(round(0), B256::repeat_byte(3)).unwrap();
        let mut wire = ConsensusMessage::Prepare(prepare).encoded().to_vec();
        wire.push(0x00);
        assert!(ConsensusMessage::decode(&wire).is_err());
    }
}
