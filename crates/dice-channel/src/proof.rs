//! balance and game proofs plus the signature verification seam

use scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

use crate::types::*;

/// verification oracle: does `signature` over `message` recover `signer`?
///
/// the ledger never signs, it only checks; implementations live with the
/// callers (ed25519 in dice-sdk, a deterministic mock in tests)
pub trait SignatureVerifier {
    fn verify(&self, message: &H256, signature: &Signature, signer: &AccountId) -> bool;
}

/// a sender's registered balance proof; only the highest nonce is authoritative
#[derive(Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq, Default)]
pub struct RegisteredProof {
    pub balance_hash: H256,
    pub nonce: Nonce,
}

/// a message acknowledged by both channel roles
///
/// the sender authored the message, the partner countersigned it; keeping
/// both roles in one record avoids transposing the signatures at call sites
#[derive(Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub struct Countersigned {
    pub message: H256,
    pub sender: AccountId,
    pub sender_sig: Signature,
    pub partner: AccountId,
    pub partner_sig: Signature,
}

impl Countersigned {
    pub fn verify_sender<V: SignatureVerifier>(&self, verifier: &V) -> bool {
        verifier.verify(&self.message, &self.sender_sig, &self.sender)
    }

    pub fn verify_partner<V: SignatureVerifier>(&self, verifier: &V) -> bool {
        verifier.verify(&self.message, &self.partner_sig, &self.partner)
    }
}

/// dual-signed agreement to one dice round
#[derive(Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub struct GameProof {
    pub round: u64,
    pub channel_id: ChannelId,
    pub initiator: AccountId,
    pub acceptor: AccountId,
    pub initiator_stake: Balance,
    pub acceptor_stake: Balance,
    /// bitmask of winning rolls for the initiator
    pub bet_mask: u64,
    pub modulo: u8,
    pub initiator_sig: Signature,
    pub acceptor_sig: Signature,
}

impl GameProof {
    /// message both participants signed (every field except the signatures)
    pub fn message(&self) -> H256 {
        game_message(
            self.round,
            &self.channel_id,
            &self.initiator,
            &self.acceptor,
            self.initiator_stake,
            self.acceptor_stake,
            self.bet_mask,
            self.modulo,
        )
    }

    pub fn verify_initiator<V: SignatureVerifier>(&self, verifier: &V) -> bool {
        verifier.verify(&self.message(), &self.initiator_sig, &self.initiator)
    }

    pub fn verify_acceptor<V: SignatureVerifier>(&self, verifier: &V) -> bool {
        verifier.verify(&self.message(), &self.acceptor_sig, &self.acceptor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{mock_sign, MockVerifier};

    #[test]
    fn test_countersigned_roles_are_distinct() {
        let sender = PublicKey::from_raw([1u8; 32]);
        let partner = PublicKey::from_raw([2u8; 32]);
        let message = H256([9u8; 32]);

        let record = Countersigned {
            message,
            sender,
            sender_sig: mock_sign(&sender, &message),
            partner,
            partner_sig: mock_sign(&partner, &message),
        };
        assert!(record.verify_sender(&MockVerifier));
        assert!(record.verify_partner(&MockVerifier));

        // transposed signatures must not verify
        let swapped = Countersigned {
            sender_sig: record.partner_sig,
            partner_sig: record.sender_sig,
            ..record
        };
        assert!(!swapped.verify_sender(&MockVerifier));
        assert!(!swapped.verify_partner(&MockVerifier));
    }

    #[test]
    fn test_game_proof_signatures_cover_all_fields() {
        let initiator = PublicKey::from_raw([1u8; 32]);
        let acceptor = PublicKey::from_raw([2u8; 32]);
        let mut proof = GameProof {
            round: 1,
            channel_id: H256([5u8; 32]),
            initiator,
            acceptor,
            initiator_stake: 1,
            acceptor_stake: 1,
            bet_mask: 0b101010,
            modulo: 6,
            initiator_sig: Signature::default(),
            acceptor_sig: Signature::default(),
        };
        proof.initiator_sig = mock_sign(&initiator, &proof.message());
        proof.acceptor_sig = mock_sign(&acceptor, &proof.message());

        assert!(proof.verify_initiator(&MockVerifier));
        assert!(proof.verify_acceptor(&MockVerifier));

        // any field change invalidates both signatures
        proof.bet_mask = 0b010101;
        assert!(!proof.verify_initiator(&MockVerifier));
        assert!(!proof.verify_acceptor(&MockVerifier));
    }
}
