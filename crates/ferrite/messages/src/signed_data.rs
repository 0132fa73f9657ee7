//! Signed message envelope with recovery-derived sender identity.

use crate::{MessageError, payload::Payload};
use alloy_primitives::{Address, Signature};
use alloy_rlp::{BufMut, Decodable, Encodable};
use ferrite_types::{ConsensusRoundIdentifier, NodeKey, payload_digest, recover_signer};

/// A consensus payload bound to the validator that signed it.
///
/// The sender address is recovered from the signature over the payload's
/// canonical encoding when the envelope is built or decoded. It is never a
/// wire field, so tampering with either the payload or the signature shows
/// up as a different sender rather than as a forgeable claim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedData<P> {
    payload: P,
    signature: Signature,
    sender: Address,
}

impl<P: Payload> SignedData<P> {
    /// Sign `payload` with `key`. The resulting envelope's sender is the
    /// key's address.
    pub fn sign(payload: P, key: &NodeKey) -> Result<Self, MessageError> {
        let signature = key.sign_digest(payload_digest(&payload))?;
        Ok(Self { sender: key.address(), payload, signature })
    }

    /// Rebuild an envelope from a payload and signature, recovering the
    /// sender.
    pub fn from_signature(payload: P, signature: Signature) -> Result<Self, MessageError> {
        let digest = payload_digest(&payload);
        let sender =
            recover_signer(&digest, &signature).ok_or(MessageError::UnrecoverableSignature)?;
        Ok(Self { payload, signature, sender })
    }

    /// The signed payload body.
    pub const fn payload(&self) -> &P {
        &self.payload
    }

    /// The envelope signature.
    pub const fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Validator address recovered from the signature.
    pub const fn sender(&self) -> Address {
        self.sender
    }

    /// Round the signed payload targets.
    pub fn round_identifier(&self) -> ConsensusRoundIdentifier {
        self.payload.round_identifier()
    }

    fn rlp_payload_length(&self) -> usize {
        self.payload.length() + self.signature.as_bytes().length()
    }
}

impl<P: Payload> Encodable for SignedData<P> {
    fn encode(&self, out: &mut dyn BufMut) {
        let payload_length = self.rlp_payload_length();
        alloy_rlp::Header { list: true, payload_length }.encode(out);
        self.payload.encode(out);
        self.signature.as_bytes().encode(out);
    }

    fn length(&self) -> usize {
        let payload_length = self.rlp_payload_length();
        alloy_rlp::Header { list: true, payload_length }.length() + payload_length
    }
}

impl<P: Payload> Decodable for SignedData<P> {
    fn decode(buf: &mut &[u8]) -> alloy_rlp::Result<Self> {
        let header = alloy_rlp::Header::decode(buf)?;
        if !header.list {
            return Err(alloy_rlp::Error::UnexpectedString);
        }
        let started_len = buf.len();
        if started_len < header.payload_length {
            return Err(alloy_rlp::Error::InputTooShort);
        }
        let payload = P::decode(buf)?;
        let signature_bytes = <[u8; 65]>::decode(buf)?;
        let consumed = started_len - buf.len();
        if consumed != header.payload_length {
            return Err(alloy_rlp::Error::ListLengthMismatch {
                expected: header.payload_length,
                got: consumed,
            });
        }
        let signature = Signature::try_from(signature_bytes.as_slice())
            .map_err(|_| alloy_rlp::Error::Custom("malformed envelope signature"))?;
        Self::from_signature(payload, signature)
            .map_err(|_| alloy_rlp::Error::Custom("envelope signature does not recover"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payload::PreparePayload;
    use alloy_primitives::B256;

    fn key(seed: u8) -> NodeKey {
        NodeKey::from_secret(B256::repeat_byte(seed)).unwrap()
    }

    fn prepare(round: u32, digest: B256) -> PreparePayload {
        PreparePayload {
            round_identifier: ConsensusRoundIdentifier::new(2, round),
            digest,
        }
    }

    #[test]
    fn sender_is_the_signing_key_address() {
        let key = key(1);
        let signed = SignedData::sign(prepare(0, B256::repeat_byte(3)), &key).unwrap();
        assert_eq!(signed.sender(), key.address());
        assert_eq!(signed.round_identifier(), ConsensusRoundIdentifier::new(2, 0));
    }

    #[test]
    fn decode_rederives_the_sender() {
        let key = key(1);
        let signed = SignedData::sign(prepare(0, B256::repeat_byte(3)), &key).unwrap();
        let encoded = alloy_rlp::encode(&signed);
        let decoded = SignedData::<PreparePayload>::decode(&mut encoded.as_slice()).unwrap();
        assert_eq!(decoded, signed);
        assert_eq!(decoded.sender(), key.address());
    }

    #[test]
    fn substituted_payload_changes_the_sender() {
        // a signature over one payload does not authenticate another
        let key = key(1);
        let signed = SignedData::sign(prepare(0, B256::repeat_byte(3)), &key).unwrap();
        let reassembled =
            SignedData::from_signature(prepare(1, B256::repeat_byte(3)), *signed.signature());
        match reassembled {
            Ok(envelope) => assert_ne!(envelope.sender(), key.address()),
            Err(MessageError::UnrecoverableSignature) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn declared_length_matches_encoding() {
        let signed = SignedData::sign(prepare(0, B256::repeat_byte(3)), &key(1)).unwrap();
        assert_eq!(signed.length(), alloy_rlp::encode(&signed).len());
    }

    #[test]
    fn trailing_bytes_inside_the_envelope_are_rejected() {
        let signed = SignedData::sign(prepare(0, B256::repeat_byte(3)), &key(1)).unwrap();
        let encoded = alloy_rlp::encode(&signed);

        // same fields, list header widened by one stray byte
        let mut body = encoded.as_slice();
        let header = alloy_rlp::Header::decode(&mut body).unwrap();
        let mut tampered = Vec::new();
        alloy_rlp::Header { list: true, payload_length: header.payload_length + 1 }
            .encode(&mut tampered);
        tampered.extend_from_slice(body);
        tampered.push(alloy_rlp::EMPTY_STRING_CODE);

        let decoded = SignedData::<PreparePayload>::decode(&mut tampered.as_slice());
        assert!(matches!(decoded, Err(alloy_rlp::Error::ListLengthMismatch { .. })));
    }
}
