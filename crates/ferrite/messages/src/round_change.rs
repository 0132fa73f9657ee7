//! ROUND-CHANGE payload with optional prepared-round evidence.

use crate::{
    certificate::PreparedCertificate,
    payload::{Payload, codes},
};
use alloy_rlp::{BufMut, Decodable, EMPTY_STRING_CODE, Encodable};
use ferrite_types::ConsensusRoundIdentifier;

/// ROUND-CHANGE payload: a vote to abandon the current round.
///
/// A validator that had already reached prepared state at this height
/// attaches the evidence; the proposer of the next round is then bound to
/// that block. An absent certificate encodes as the RLP empty string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundChangePayload {
    /// Round the sender wants to move to.
    pub round_identifier: ConsensusRoundIdentifier,
    /// Evidence of the latest round the sender prepared in, if any.
    pub prepared_certificate: Option<PreparedCertificate>,
}

impl RoundChangePayload {
    /// Payload targeting `round_identifier` with optional evidence.
    pub const fn new(
        round_identifier: ConsensusRoundIdentifier,
        prepared_certificate: Option<PreparedCertificate>,
    ) -> Self {
        Self { round_identifier, prepared_certificate }
    }

    fn rlp_payload_length(&self) -> usize {
        self.round_identifier.length()
            + self.prepared_certificate.as_ref().map_or(1, Encodable::length)
    }
}

impl Encodable for RoundChangePayload {
    fn encode(&self, out: &mut dyn BufMut) {
        let payload_length = self.rlp_payload_length();
        alloy_rlp::Header { list: true, payload_length }.encode(out);
        self.round_identifier.encode(out);
        match &self.prepared_certificate {
            Some(certificate) => certificate.encode(out),
            None => out.put_u8(EMPTY_STRING_CODE),
        }
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        alloy_rlp::Header { list: true, payload_length }.length() + payload_length
    }
}

impl Decodable for RoundChangePayload {
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
        let prepared_certificate = match buf.first() {
            Some(&EMPTY_STRING_CODE) => {
                *buf = &buf[1..];
                None
            }
            Some(_) => Some(PreparedCertificate::decode(buf)?),
            None => return Err(alloy_rlp::Error::InputTooShort),
        };
        let consumed = started_len - buf.len();
        if consumed != header.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: consumed,
            });
        }
        Ok(Self { round_identifier, prepared_certificate })
    }
}

impl Payload for RoundChangePayload {
    fn round_identifier(&self) -> ConsensusRoundIdentifier {
        self.round_identifier
    }

    fn message_code(&self) -> u8 {
        codes::ROUND_CHANGE
    }
}
