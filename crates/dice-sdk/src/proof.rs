//! off-ledger proof construction
//!
//! builders for everything a peer signs and exchanges before a dispute:
//! balance proofs, rebuttal countersignatures, game rounds and randomness
//! commitments; the on-ledger side only ever sees the resulting hashes
//! and signatures

use dice_channel::{
    accept_message, balance_hash, commit_message, game_message, proof_message, random_id,
    secret_hash, AccountId, Balance, ChannelId, GameProof, Nonce, RandomId, Signature, H256,
};

use crate::keys::Keypair;

/// a signed balance proof as exchanged between peers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SignedBalanceProof {
    pub channel_id: ChannelId,
    pub sender: AccountId,
    pub transferred: Balance,
    pub locked: Balance,
    pub nonce: Nonce,
    pub balance_hash: H256,
    pub signature: Signature,
}

impl SignedBalanceProof {
    /// state and sign the sender's cumulative transfers at `nonce`
    pub fn sign(
        keypair: &Keypair,
        channel_id: ChannelId,
        transferred: Balance,
        locked: Balance,
        nonce: Nonce,
    ) -> Self {
        let balance_hash = balance_hash(transferred, locked, nonce);
        let message = proof_message(&channel_id, &balance_hash, nonce);
        Self {
            channel_id,
            sender: keypair.account(),
            transferred,
            locked,
            nonce,
            balance_hash,
            signature: keypair.sign(&message),
        }
    }

    /// countersign a received proof for a settle-window rebuttal
    pub fn countersign(&self, keypair: &Keypair) -> Signature {
        keypair.sign(&proof_message(&self.channel_id, &self.balance_hash, self.nonce))
    }
}

/// game round terms agreed off-ledger, before any signature exists
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameDraft {
    pub round: u64,
    pub channel_id: ChannelId,
    pub initiator: AccountId,
    pub acceptor: AccountId,
    pub initiator_stake: Balance,
    pub acceptor_stake: Balance,
    pub bet_mask: u64,
    pub modulo: u8,
}

impl GameDraft {
    /// message both peers sign over these terms
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

    /// randomness round id these terms resolve against
    pub fn random_id(&self, peers_hash: &H256) -> RandomId {
        random_id(&self.channel_id, peers_hash, self.round)
    }

    /// both peers sign the identical terms into an admissible proof
    pub fn sign_both(self, initiator: &Keypair, acceptor: &Keypair) -> GameProof {
        let message = self.message();
        GameProof {
            round: self.round,
            channel_id: self.channel_id,
            initiator: self.initiator,
            acceptor: self.acceptor,
            initiator_stake: self.initiator_stake,
            acceptor_stake: self.acceptor_stake,
            bet_mask: self.bet_mask,
            modulo: self.modulo,
            initiator_sig: initiator.sign(&message),
            acceptor_sig: acceptor.sign(&message),
        }
    }
}

/// the initiator's randomness contribution: private secret, public hash
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomSecret {
    pub secret: H256,
    pub hash: H256,
}

impl RandomSecret {
    /// fresh random secret
    pub fn generate() -> Self {
        Self::from_secret(H256(rand::random()))
    }

    pub fn from_secret(secret: H256) -> Self {
        Self {
            secret,
            hash: secret_hash(&secret),
        }
    }
}

/// initiator's signature over its randomness commitment
pub fn sign_commit(
    keypair: &Keypair,
    random_id: &RandomId,
    initiator: &AccountId,
    acceptor: &AccountId,
    initiator_hash: &H256,
) -> Signature {
    keypair.sign(&commit_message(random_id, initiator, acceptor, initiator_hash))
}

/// acceptor's signature binding its cleartext secret to the commitment
pub fn sign_accept(
    keypair: &Keypair,
    random_id: &RandomId,
    initiator: &AccountId,
    acceptor: &AccountId,
    initiator_hash: &H256,
    acceptor_secret: &H256,
) -> Signature {
    let commit = commit_message(random_id, initiator, acceptor, initiator_hash);
    keypair.sign(&accept_message(&commit, acceptor_secret))
}
