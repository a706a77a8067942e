//! the execution context: channel and randomness tables plus every
//! on-ledger operation
//!
//! the ledger owns the two content-addressed maps; participants only submit
//! proposed transitions, each of which fully commits or fully rejects

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use scale_codec::Decode;

use crate::channel::{Channel, ChannelStatus, FinalState};
use crate::error::{
    AuthenticationError, ConsistencyError, OrderingError, Result, SignerRole, TimingError,
    ValidationError,
};
use crate::game;
use crate::proof::{Countersigned, GameProof, RegisteredProof, SignatureVerifier};
use crate::random::{Commitment, RandomRound};
use crate::types::*;

/// final transferable balances of a channel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settlement {
    pub party_a: AccountId,
    pub balance_a: Balance,
    pub party_b: AccountId,
    pub balance_b: Balance,
}

/// deterministic execution context for dice channels
pub struct Ledger<V: SignatureVerifier> {
    verifier: V,
    /// shortest settle window a channel may be opened with
    min_settle_window: Tick,
    channels: BTreeMap<ChannelId, Channel>,
    rounds: BTreeMap<RandomId, RandomRound>,
    /// peers-hash index: at most one live channel per pair
    pairs: BTreeMap<H256, ChannelId>,
    opened: u64,
}

impl<V: SignatureVerifier> Ledger<V> {
    pub fn new(verifier: V, min_settle_window: Tick) -> Self {
        Self {
            verifier,
            min_settle_window,
            channels: BTreeMap::new(),
            rounds: BTreeMap::new(),
            pairs: BTreeMap::new(),
            opened: 0,
        }
    }

    pub fn channel(&self, id: &ChannelId) -> Option<&Channel> {
        self.channels.get(id)
    }

    pub fn channel_by_pair(&self, a: &AccountId, b: &AccountId) -> Option<&Channel> {
        let id = self.pairs.get(&peers_hash(a, b))?;
        self.channels.get(id)
    }

    pub fn round(&self, id: &RandomId) -> Option<&RandomRound> {
        self.rounds.get(id)
    }

    /// create a channel and escrow the initiator's deposit
    pub fn open_channel(
        &mut self,
        initiator: AccountId,
        counterparty: AccountId,
        settle_window: Tick,
        deposit: Balance,
        now: Tick,
    ) -> Result<ChannelId> {
        if initiator == counterparty {
            return Err(ValidationError::SelfChannel.into());
        }
        if settle_window < self.min_settle_window {
            return Err(ValidationError::WindowTooShort.into());
        }
        if deposit == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        let pair = peers_hash(&initiator, &counterparty);
        // a settled game channel keeps its slot until unlocked; once
        // unlocked it is finished and the pair may open again
        if let Some(existing) = self.pairs.get(&pair) {
            let finished = self
                .channels
                .get(existing)
                .is_some_and(|c| c.status == ChannelStatus::Settled && c.unlocked);
            if !finished {
                return Err(ValidationError::ChannelExists.into());
            }
        }

        self.opened += 1;
        let id = channel_id(&initiator, &counterparty, self.opened);
        self.channels.insert(
            id,
            Channel::new(id, initiator, counterparty, deposit, settle_window, now),
        );
        self.pairs.insert(pair, id);
        Ok(id)
    }

    /// escrow additional value for one participant; only while Open
    pub fn deposit_channel(
        &mut self,
        id: &ChannelId,
        depositor: &AccountId,
        amount: Balance,
    ) -> Result<()> {
        if amount == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        let channel = self
            .channels
            .get_mut(id)
            .ok_or(ValidationError::UnknownChannel)?;
        if channel.status != ChannelStatus::Open {
            return Err(OrderingError::AlreadyClosed.into());
        }
        let peer = channel
            .peer_mut(depositor)
            .ok_or(ValidationError::UnknownParticipant)?;
        peer.deposit = peer.deposit.saturating_add(amount);
        Ok(())
    }

    /// unilaterally close, registering the counterparty's balance proof
    pub fn force_close(
        &mut self,
        id: &ChannelId,
        closer: &AccountId,
        balance_hash: H256,
        nonce: Nonce,
        signature: Signature,
        now: Tick,
    ) -> Result<()> {
        let channel = self
            .channels
            .get_mut(id)
            .ok_or(ValidationError::UnknownChannel)?;
        if channel.status != ChannelStatus::Open {
            return Err(OrderingError::AlreadyClosed.into());
        }
        let counterparty = channel
            .counterparty(closer)
            .ok_or(ValidationError::UnknownParticipant)?;

        let message = proof_message(id, &balance_hash, nonce);
        if !self.verifier.verify(&message, &signature, &counterparty) {
            return Err(AuthenticationError::BadSignature(SignerRole::Counterparty).into());
        }

        if let Some(peer) = channel.peer_mut(&counterparty) {
            peer.proof = Some(RegisteredProof {
                balance_hash,
                nonce,
            });
        }
        channel.status = ChannelStatus::Closed;
        channel.closed_at = Some(now);
        channel.closer = Some(*closer);
        Ok(())
    }

    /// the non-closing party's rebuttal: registers the closing party's
    /// balance proof, dual-acknowledged by both signatures over the same
    /// message; admissible only inside the settle window
    pub fn partner_commit_proof(
        &mut self,
        partner: &AccountId,
        closer: &AccountId,
        balance_hash: H256,
        nonce: Nonce,
        partner_sig: Signature,
        permit_sig: Signature,
        now: Tick,
    ) -> Result<()> {
        let id = *self
            .pairs
            .get(&peers_hash(partner, closer))
            .ok_or(ValidationError::UnknownChannel)?;
        let channel = self
            .channels
            .get_mut(&id)
            .ok_or(ValidationError::UnknownChannel)?;
        match channel.status {
            ChannelStatus::Open => return Err(OrderingError::NotClosed.into()),
            ChannelStatus::Settled => return Err(TimingError::WindowExpired.into()),
            ChannelStatus::Closed => {}
        }
        if !channel.window_open(now) {
            return Err(TimingError::WindowExpired.into());
        }
        // the permit must come from the party that actually closed
        if channel.closer != Some(*closer) {
            return Err(AuthenticationError::BadSignature(SignerRole::Closer).into());
        }

        let record = Countersigned {
            message: proof_message(&id, &balance_hash, nonce),
            sender: *closer,
            sender_sig: permit_sig,
            partner: *partner,
            partner_sig,
        };
        if !record.verify_sender(&self.verifier) {
            return Err(AuthenticationError::BadSignature(SignerRole::Closer).into());
        }
        if !record.verify_partner(&self.verifier) {
            return Err(AuthenticationError::BadSignature(SignerRole::Partner).into());
        }

        let peer = channel
            .peer_mut(closer)
            .ok_or(ValidationError::UnknownParticipant)?;
        if let Some(prev) = peer.proof {
            if nonce <= prev.nonce {
                return Err(OrderingError::StaleNonce.into());
            }
        }
        peer.proof = Some(RegisteredProof {
            balance_hash,
            nonce,
        });
        Ok(())
    }

    /// register the dual-signed game round on the disputed channel
    pub fn commit_game_proof(&mut self, proof: GameProof, now: Tick) -> Result<()> {
        let channel = self
            .channels
            .get_mut(&proof.channel_id)
            .ok_or(ValidationError::UnknownChannel)?;
        match channel.status {
            ChannelStatus::Open => return Err(OrderingError::NotClosed.into()),
            ChannelStatus::Settled => return Err(TimingError::WindowExpired.into()),
            ChannelStatus::Closed => {}
        }
        if !channel.window_open(now) {
            return Err(TimingError::WindowExpired.into());
        }
        if proof.initiator == proof.acceptor
            || !channel.is_participant(&proof.initiator)
            || !channel.is_participant(&proof.acceptor)
        {
            return Err(ValidationError::UnknownParticipant.into());
        }

        game::validate_params(proof.bet_mask, proof.modulo)?;
        if proof.initiator_stake == 0 || proof.acceptor_stake == 0 {
            return Err(ValidationError::ZeroAmount.into());
        }
        let initiator_deposit = channel.peer(&proof.initiator).map_or(0, |p| p.deposit);
        let acceptor_deposit = channel.peer(&proof.acceptor).map_or(0, |p| p.deposit);
        if proof.initiator_stake > initiator_deposit || proof.acceptor_stake > acceptor_deposit {
            return Err(ValidationError::StakeExceedsDeposit.into());
        }

        if !proof.verify_initiator(&self.verifier) {
            return Err(AuthenticationError::BadSignature(SignerRole::Initiator).into());
        }
        if !proof.verify_acceptor(&self.verifier) {
            return Err(AuthenticationError::BadSignature(SignerRole::Acceptor).into());
        }

        // rounds are monotone; a superseded round's resolution is unusable
        if let Some(existing) = &channel.game {
            if proof.round <= existing.round {
                return Err(OrderingError::StaleNonce.into());
            }
        }
        channel.game = Some(proof);
        Ok(())
    }

    /// register the initiator's opaque randomness commitment
    pub fn commit_random(
        &mut self,
        random_id: RandomId,
        initiator: AccountId,
        acceptor: AccountId,
        initiator_hash: H256,
        signature: Signature,
    ) -> Result<()> {
        if self.rounds.contains_key(&random_id) {
            return Err(OrderingError::ReplayedCommitment.into());
        }
        let commitment = Commitment {
            random_id,
            initiator,
            acceptor,
            initiator_hash,
        };
        if !self
            .verifier
            .verify(&commitment.message(), &signature, &initiator)
        {
            return Err(AuthenticationError::BadSignature(SignerRole::Initiator).into());
        }
        self.rounds
            .insert(random_id, RandomRound::CommittedByInitiator { commitment });
        Ok(())
    }

    /// the acceptor publishes its randomness in the clear, signing a hash
    /// that embeds the initiator's already-signed commitment; creates the
    /// round if the initiator never registered it on-ledger
    pub fn acceptor_commit(
        &mut self,
        random_id: RandomId,
        initiator: AccountId,
        acceptor: AccountId,
        initiator_hash: H256,
        initiator_sig: Signature,
        acceptor_secret: H256,
        acceptor_sig: Signature,
    ) -> Result<()> {
        let commitment = Commitment {
            random_id,
            initiator,
            acceptor,
            initiator_hash,
        };
        let commit_msg = commitment.message();
        if !self.verifier.verify(&commit_msg, &initiator_sig, &initiator) {
            return Err(AuthenticationError::BadSignature(SignerRole::Initiator).into());
        }
        let accept_msg = accept_message(&commit_msg, &acceptor_secret);
        if !self.verifier.verify(&accept_msg, &acceptor_sig, &acceptor) {
            return Err(AuthenticationError::BadSignature(SignerRole::Acceptor).into());
        }

        match self.rounds.entry(random_id) {
            Entry::Vacant(entry) => {
                entry.insert(RandomRound::AcceptedByBoth {
                    commitment,
                    acceptor_secret,
                });
                Ok(())
            }
            Entry::Occupied(mut entry) => {
                if entry.get().commitment() != &commitment {
                    return Err(ConsistencyError::ProofMismatch.into());
                }
                entry.get_mut().accept(acceptor_secret)
            }
        }
    }

    /// the initiator reveals last; fixes the shared randomness
    pub fn reveal(&mut self, random_id: &RandomId, secret_a: H256) -> Result<H256> {
        let round = self
            .rounds
            .get_mut(random_id)
            .ok_or(ValidationError::UnknownRound)?;
        round.reveal(secret_a)
    }

    /// fix transferable balances once the settle window elapsed; locked
    /// value stays escrowed pending unlock; callable by anyone
    pub fn settle(&mut self, id: &ChannelId, final_state: &[u8], now: Tick) -> Result<Settlement> {
        let channel = self
            .channels
            .get_mut(id)
            .ok_or(ValidationError::UnknownChannel)?;
        match channel.status {
            ChannelStatus::Open => return Err(OrderingError::NotClosed.into()),
            ChannelStatus::Settled => return Err(OrderingError::AlreadySettled.into()),
            ChannelStatus::Closed => {}
        }
        if !channel.settle_due(now) {
            return Err(TimingError::TooEarly.into());
        }

        let decoded = FinalState::decode(&mut &final_state[..])
            .map_err(|_| ValidationError::MalformedFinalState)?;
        // tuples may arrive in either order but must cover both peers
        let (for_a, for_b) = if decoded.party_a.account == channel.peers[0].account
            && decoded.party_b.account == channel.peers[1].account
        {
            (decoded.party_a, decoded.party_b)
        } else if decoded.party_b.account == channel.peers[0].account
            && decoded.party_a.account == channel.peers[1].account
        {
            (decoded.party_b, decoded.party_a)
        } else {
            return Err(ValidationError::UnknownParticipant.into());
        };

        for (peer, submitted) in channel.peers.iter().zip([&for_a, &for_b]) {
            match peer.proof {
                Some(registered) => {
                    if submitted.balance_hash() != registered.balance_hash
                        || submitted.nonce != registered.nonce
                    {
                        return Err(ConsistencyError::ProofMismatch.into());
                    }
                }
                // no registered proof: that sender transferred nothing
                None => {
                    if !submitted.is_empty() {
                        return Err(ConsistencyError::ProofMismatch.into());
                    }
                }
            }
        }

        let (balance_a, balance_b) = channel.settle_balances(&for_a, &for_b);
        channel.peers[0].locked = for_a.locked;
        channel.peers[1].locked = for_b.locked;
        channel.peers[0].settled = balance_a;
        channel.peers[1].settled = balance_b;
        channel.status = ChannelStatus::Settled;

        // a channel with no pending game is finished; free the pair slot
        if channel.game.is_none() {
            let pair = peers_hash(&channel.peers[0].account, &channel.peers[1].account);
            self.pairs.remove(&pair);
        }

        Ok(Settlement {
            party_a: channel.peers[0].account,
            balance_a,
            party_b: channel.peers[1].account,
            balance_b,
        })
    }

    /// resolve the pending game with the revealed randomness and release
    /// the escrowed amounts; consumes the resolution exactly once
    pub fn unlock(
        &mut self,
        random_id: &RandomId,
        party_a: &AccountId,
        party_b: &AccountId,
    ) -> Result<Settlement> {
        let pair = peers_hash(party_a, party_b);
        let id = *self
            .pairs
            .get(&pair)
            .ok_or(ValidationError::UnknownChannel)?;
        let channel = self
            .channels
            .get_mut(&id)
            .ok_or(ValidationError::UnknownChannel)?;
        if channel.status != ChannelStatus::Settled {
            return Err(OrderingError::NotSettled.into());
        }
        if channel.unlocked {
            return Err(OrderingError::AlreadyUnlocked.into());
        }
        let game = channel.game.ok_or(ValidationError::UnknownRound)?;
        // the resolution must belong to exactly this channel round
        if *random_id != crate::types::random_id(&id, &pair, game.round) {
            return Err(ValidationError::UnknownRound.into());
        }
        let round = self
            .rounds
            .get(random_id)
            .ok_or(ValidationError::UnknownRound)?;
        let random = round.final_random().ok_or(TimingError::TooEarly)?;

        let outcome = game::resolve(
            game.initiator_stake,
            game.acceptor_stake,
            game.bet_mask,
            game.modulo,
            &random,
        )?;

        let initiator_idx = channel
            .peer_index(&game.initiator)
            .ok_or(ValidationError::UnknownParticipant)?;
        let (winner, loser) = if outcome.initiator_wins {
            (initiator_idx, 1 - initiator_idx)
        } else {
            (1 - initiator_idx, initiator_idx)
        };
        // an underfunded escrow forfeits at most what it holds
        let moved = outcome.payout.min(channel.peers[loser].locked);
        channel.peers[loser].locked -= moved;
        channel.peers[winner].locked += moved;
        for peer in &mut channel.peers {
            peer.settled += peer.locked;
            peer.locked = 0;
        }
        channel.unlocked = true;

        Ok(Settlement {
            party_a: channel.peers[0].account,
            balance_a: channel.peers[0].settled,
            party_b: channel.peers[1].account,
            balance_b: channel.peers[1].settled,
        })
    }
}
