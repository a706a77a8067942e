//! core types and message derivations for dice channels

use scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

/// 32-byte hash type
#[derive(
    Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq, PartialOrd, Ord, Default, Hash,
)]
pub struct H256(pub [u8; 32]);

impl H256 {
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }
}

impl From<&[u8; 32]> for H256 {
    fn from(bytes: &[u8; 32]) -> Self {
        Self(*bytes)
    }
}

/// 32-byte public key
#[derive(
    Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq, PartialOrd, Ord, Default, Hash,
)]
pub struct PublicKey(pub [u8; 32]);

impl PublicKey {
    pub fn from_raw(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// 64-byte signature
#[derive(Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub struct Signature(pub [u8; 64]);

impl Default for Signature {
    fn default() -> Self {
        Self([0u8; 64])
    }
}

impl Signature {
    pub fn from_raw(bytes: [u8; 64]) -> Self {
        Self(bytes)
    }
}

/// channel identifier (blake3 hash of participants + creation counter)
pub type ChannelId = H256;

/// randomness round identifier
pub type RandomId = H256;

/// channel participant (public key)
pub type AccountId = PublicKey;

/// balance in smallest unit
pub type Balance = u128;

/// balance proof nonce (monotonically increasing per sender)
pub type Nonce = u64;

/// ledger clock tick (block height)
pub type Tick = u64;

fn hash_encoded<T: Encode>(value: &T) -> H256 {
    H256::from(blake3::hash(&value.encode()).as_bytes())
}

/// channel id from the participant pair and the ledger's open counter
pub fn channel_id(initiator: &AccountId, counterparty: &AccountId, counter: u64) -> ChannelId {
    hash_encoded(&(initiator, counterparty, counter))
}

/// order-independent hash of a participant pair
pub fn peers_hash(a: &AccountId, b: &AccountId) -> H256 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    hash_encoded(&(lo, hi))
}

/// hash committed in a balance proof
pub fn balance_hash(transferred: Balance, locked: Balance, nonce: Nonce) -> H256 {
    hash_encoded(&(transferred, locked, nonce))
}

/// message a balance proof sender signs
pub fn proof_message(channel_id: &ChannelId, balance_hash: &H256, nonce: Nonce) -> H256 {
    hash_encoded(&(channel_id, balance_hash, nonce))
}

/// message both participants sign to agree on a game round
#[allow(clippy::too_many_arguments)]
pub fn game_message(
    round: u64,
    channel_id: &ChannelId,
    initiator: &AccountId,
    acceptor: &AccountId,
    initiator_stake: Balance,
    acceptor_stake: Balance,
    bet_mask: u64,
    modulo: u8,
) -> H256 {
    hash_encoded(&(
        round,
        channel_id,
        initiator,
        acceptor,
        initiator_stake,
        acceptor_stake,
        bet_mask,
        modulo,
    ))
}

/// randomness round id for a channel round
pub fn random_id(channel_id: &ChannelId, peers: &H256, round: u64) -> RandomId {
    hash_encoded(&(channel_id, peers, round))
}

/// message the initiator signs when committing its randomness
pub fn commit_message(
    random_id: &RandomId,
    initiator: &AccountId,
    acceptor: &AccountId,
    initiator_hash: &H256,
) -> H256 {
    hash_encoded(&(random_id, initiator, acceptor, initiator_hash))
}

/// message the acceptor signs; embeds the initiator's already-signed commitment
pub fn accept_message(commit_message: &H256, acceptor_secret: &H256) -> H256 {
    hash_encoded(&(commit_message, acceptor_secret))
}

/// hash of the initiator's secret, published at commit time
pub fn secret_hash(secret: &H256) -> H256 {
    hash_encoded(secret)
}

/// shared randomness from both contributions
pub fn final_random(secret_a: &H256, acceptor_secret: &H256) -> H256 {
    hash_encoded(&(secret_a, acceptor_secret))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peers_hash_order_independent() {
        let a = PublicKey::from_raw([1u8; 32]);
        let b = PublicKey::from_raw([2u8; 32]);

        assert_eq!(peers_hash(&a, &b), peers_hash(&b, &a));
        assert_ne!(peers_hash(&a, &b), peers_hash(&a, &a));
    }

    #[test]
    fn test_channel_id_unique_per_counter() {
        let a = PublicKey::from_raw([1u8; 32]);
        let b = PublicKey::from_raw([2u8; 32]);

        assert_ne!(channel_id(&a, &b, 1), channel_id(&a, &b, 2));
    }

    #[test]
    fn test_final_random_depends_on_both_secrets() {
        let secret_a = H256([7u8; 32]);
        let secret_b = H256([9u8; 32]);

        let base = final_random(&secret_a, &secret_b);
        assert_ne!(base, final_random(&H256([8u8; 32]), &secret_b));
        assert_ne!(base, final_random(&secret_a, &H256([8u8; 32])));
    }

    #[test]
    fn test_h256_encodes_as_raw_bytes() {
        // fixed-size arrays carry no length prefix
        let bytes: [u8; 32] = hex::decode(
            "0101010101010101010101010101010101010101010101010101010101010101",
        )
        .unwrap()
        .try_into()
        .unwrap();
        assert_eq!(H256(bytes).encode(), bytes);
        assert_eq!(PublicKey(bytes).encode(), bytes);
    }

    #[test]
    fn test_reveal_matches_commitment() {
        let secret = H256([3u8; 32]);
        assert_eq!(secret_hash(&secret), secret_hash(&secret));
        assert_ne!(secret_hash(&secret), secret_hash(&H256([4u8; 32])));
    }
}
