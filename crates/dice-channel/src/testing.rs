//! deterministic signature stand-ins for unit tests
//!
//! a mock signature is signer || message; no key material involved

use crate::proof::SignatureVerifier;
use crate::types::{AccountId, Signature, H256};

pub(crate) struct MockVerifier;

impl SignatureVerifier for MockVerifier {
    fn verify(&self, message: &H256, signature: &Signature, signer: &AccountId) -> bool {
        signature.0[..32] == signer.0 && signature.0[32..] == message.0
    }
}

pub(crate) fn mock_sign(signer: &AccountId, message: &H256) -> Signature {
    let mut bytes = [0u8; 64];
    bytes[..32].copy_from_slice(&signer.0);
    bytes[32..].copy_from_slice(&message.0);
    Signature(bytes)
}
