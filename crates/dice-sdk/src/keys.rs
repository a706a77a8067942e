//! ed25519 keys for channel participants
//!
//! the account id on the ledger is the verifying key; the ledger itself
//! only checks signatures through the SignatureVerifier seam

use dice_channel::{AccountId, PublicKey, Signature, SignatureVerifier, H256};
use ed25519_dalek::{Signer as _, SigningKey, VerifyingKey};

/// a participant's signing identity
#[derive(Clone)]
pub struct Keypair {
    signing: SigningKey,
}

impl Keypair {
    /// fresh random keypair
    pub fn generate() -> Self {
        use rand_core::OsRng;
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    /// deterministic keypair from a 32-byte seed
    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            signing: SigningKey::from_bytes(&seed),
        }
    }

    /// on-ledger identity
    pub fn account(&self) -> AccountId {
        PublicKey::from_raw(self.signing.verifying_key().to_bytes())
    }

    /// sign a 32-byte protocol message
    pub fn sign(&self, message: &H256) -> Signature {
        Signature::from_raw(self.signing.sign(&message.0).to_bytes())
    }
}

/// checks core signatures against ed25519 accounts
#[derive(Clone, Copy, Debug, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, message: &H256, signature: &Signature, signer: &AccountId) -> bool {
        let Ok(key) = VerifyingKey::from_bytes(&signer.0) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
        key.verify_strict(&message.0, &signature).is_ok()
    }
}
