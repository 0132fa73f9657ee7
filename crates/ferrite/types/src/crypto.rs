//! ECDSA signing and sender recovery for consensus messages.
//!
//! Message envelopes and commit seals are both 65-byte recoverable
//! secp256k1 signatures over a keccak256 digest. The signer's address is
//! always re-derived from the signature, so authorship cannot be claimed
//! separately from holding the key.

use alloy_primitives::{Address, B256, Signature, keccak256};
use alloy_rlp::Encodable;
use alloy_signer::SignerSync;
use alloy_signer_local::PrivateKeySigner;
use std::fmt;
use thiserror::Error;

/// Errors raised while producing signatures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SigningError {
    /// The secret bytes are not a valid secp256k1 scalar.
    #[error("invalid secret key material")]
    InvalidSecretKey,
    /// The underlying signer rejected the digest.
    #[error("digest could not be signed")]
    DigestSigning,
}

/// An in-memory consensus signing key.
///
/// Key storage and rotation are the embedding node's concern; this type
/// only wraps already-loaded key material.
#[derive(Clone)]
pub struct NodeKey {
    signer: PrivateKeySigner,
}

impl NodeKey {
    /// Key from raw secret bytes.
    pub fn from_secret(secret: B256) -> Result<Self, SigningError> {
        let signer =
            PrivateKeySigner::from_bytes(&secret).map_err(|_| SigningError::InvalidSecretKey)?;
        Ok(Self { signer })
    }

    /// Address derived from the public key.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Recoverable signature over a 32-byte digest.
    pub fn sign_digest(&self, digest: B256) -> Result<Signature, SigningError> {
        self.signer.sign_hash_sync(&digest).map_err(|_| SigningError::DigestSigning)
    }
}

impl fmt::Debug for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // never print key material
        f.debug_struct("NodeKey").field("address", &self.address()).finish_non_exhaustive()
    }
}

/// Keccak256 digest of a payload's canonical RLP encoding.
///
/// This is the digest envelope signatures commit to and sender recovery
/// operates on.
pub fn payload_digest<T: Encodable>(payload: &T) -> B256 {
    keccak256(alloy_rlp::encode(payload))
}

/// Recover the address that produced `signature` over `digest`.
///
/// `None` means the signature does not correspond to any address. Callers
/// treat that exactly like a sender mismatch.
pub fn recover_signer(digest: &B256, signature: &Signature) -> Option<Address> {
    signature.recover_address_from_prehash(digest).ok()
}
