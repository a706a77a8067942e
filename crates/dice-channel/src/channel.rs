//! channel records and settlement arithmetic

use scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

use crate::proof::{GameProof, RegisteredProof};
use crate::types::*;

/// channel status; transitions only Open -> Closed -> Settled
#[derive(Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub enum ChannelStatus {
    /// both parties may deposit and transfer off-ledger
    Open,
    /// force-closed, settle window running
    Closed,
    /// balances fixed, locked value pending unlock
    Settled,
}

/// one side of a channel
#[derive(Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub struct ChannelPeer {
    pub account: AccountId,
    pub deposit: Balance,
    /// highest-nonce balance proof registered for this sender
    pub proof: Option<RegisteredProof>,
    /// value escrowed pending game resolution
    pub locked: Balance,
    /// transferable balance fixed at settlement
    pub settled: Balance,
}

impl ChannelPeer {
    pub fn new(account: AccountId, deposit: Balance) -> Self {
        Self {
            account,
            deposit,
            proof: None,
            locked: 0,
            settled: 0,
        }
    }
}

/// per-participant closing tuple submitted to settle
#[derive(Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub struct FinalBalance {
    pub account: AccountId,
    pub transferred: Balance,
    pub locked: Balance,
    pub nonce: Nonce,
}

impl FinalBalance {
    /// recomputed hash compared against the registered proof
    pub fn balance_hash(&self) -> H256 {
        balance_hash(self.transferred, self.locked, self.nonce)
    }

    pub fn is_empty(&self) -> bool {
        self.transferred == 0 && self.locked == 0 && self.nonce == 0
    }
}

/// both closing tuples, SCALE-encoded by whoever calls settle
#[derive(Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub struct FinalState {
    pub party_a: FinalBalance,
    pub party_b: FinalBalance,
}

/// on-ledger channel record
#[derive(Clone, Debug, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub struct Channel {
    pub id: ChannelId,
    pub status: ChannelStatus,
    pub peers: [ChannelPeer; 2],
    /// rebuttal window length in ticks
    pub settle_window: Tick,
    pub opened_at: Tick,
    pub closed_at: Option<Tick>,
    /// who force-closed; the other peer may rebut
    pub closer: Option<AccountId>,
    /// pending dual-signed game round, if any
    pub game: Option<GameProof>,
    /// set once the game escrow has been released
    pub unlocked: bool,
}

impl Channel {
    pub fn new(
        id: ChannelId,
        initiator: AccountId,
        counterparty: AccountId,
        deposit: Balance,
        settle_window: Tick,
        opened_at: Tick,
    ) -> Self {
        Self {
            id,
            status: ChannelStatus::Open,
            peers: [
                ChannelPeer::new(initiator, deposit),
                ChannelPeer::new(counterparty, 0),
            ],
            settle_window,
            opened_at,
            closed_at: None,
            closer: None,
            game: None,
            unlocked: false,
        }
    }

    pub fn peer_index(&self, account: &AccountId) -> Option<usize> {
        self.peers.iter().position(|p| &p.account == account)
    }

    pub fn is_participant(&self, account: &AccountId) -> bool {
        self.peer_index(account).is_some()
    }

    pub fn peer(&self, account: &AccountId) -> Option<&ChannelPeer> {
        self.peer_index(account).map(|i| &self.peers[i])
    }

    pub fn peer_mut(&mut self, account: &AccountId) -> Option<&mut ChannelPeer> {
        self.peer_index(account).map(|i| &mut self.peers[i])
    }

    /// the other participant
    pub fn counterparty(&self, account: &AccountId) -> Option<AccountId> {
        self.peer_index(account).map(|i| self.peers[1 - i].account)
    }

    /// tick at which the settle window ends
    pub fn window_end(&self) -> Option<Tick> {
        self.closed_at.map(|t| t + self.settle_window)
    }

    /// rebuttals admissible strictly before the window end
    pub fn window_open(&self, now: Tick) -> bool {
        matches!(self.window_end(), Some(end) if now < end)
    }

    /// settlement admissible at or after the window end
    pub fn settle_due(&self, now: Tick) -> bool {
        matches!(self.window_end(), Some(end) if now >= end)
    }

    /// transferable balances from the closing tuples
    ///
    /// balance_a = deposit_a + received - sent - locked_a, floored at zero
    /// and capped so both balances plus escrow never exceed the deposits
    pub fn settle_balances(&self, a: &FinalBalance, b: &FinalBalance) -> (Balance, Balance) {
        // amounts in a signed proof are attacker-controlled; saturate so an
        // extreme claim caps out instead of panicking the settlement
        let total = self.peers[0].deposit.saturating_add(self.peers[1].deposit);
        let available = total.saturating_sub(a.locked.saturating_add(b.locked));
        let balance_a = self.peers[0]
            .deposit
            .saturating_add(b.transferred)
            .saturating_sub(a.transferred.saturating_add(a.locked))
            .min(available);
        (balance_a, available - balance_a)
    }
}
