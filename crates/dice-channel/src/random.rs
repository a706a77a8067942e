//! commit-reveal randomness rounds
//!
//! the acceptor publishes its randomness in the clear and the initiator
//! reveals last, once all stakes and signatures are fixed; modeled as an
//! explicit three-state machine rather than boolean flags

use scale_codec::{Decode, Encode};
use scale_info::TypeInfo;

use crate::error::{ConsistencyError, OrderingError, Result, TimingError};
use crate::types::*;

/// the initiator's opaque contribution to one randomness round
#[derive(Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub struct Commitment {
    pub random_id: RandomId,
    pub initiator: AccountId,
    pub acceptor: AccountId,
    /// hash of the initiator's secret, the secret itself stays private
    pub initiator_hash: H256,
}

impl Commitment {
    /// message the initiator signed over this commitment
    pub fn message(&self) -> H256 {
        commit_message(
            &self.random_id,
            &self.initiator,
            &self.acceptor,
            &self.initiator_hash,
        )
    }
}

/// lifecycle of one shared randomness round
#[derive(Clone, Copy, Debug, Encode, Decode, TypeInfo, PartialEq, Eq)]
pub enum RandomRound {
    /// initiator's commitment registered, acceptor still missing
    CommittedByInitiator { commitment: Commitment },
    /// acceptor's cleartext randomness bound to the commitment
    AcceptedByBoth {
        commitment: Commitment,
        acceptor_secret: H256,
    },
    /// initiator revealed; the shared randomness is fixed
    Revealed {
        commitment: Commitment,
        acceptor_secret: H256,
        secret_a: H256,
        final_random: H256,
    },
}

impl RandomRound {
    pub fn commitment(&self) -> &Commitment {
        match self {
            Self::CommittedByInitiator { commitment }
            | Self::AcceptedByBoth { commitment, .. }
            | Self::Revealed { commitment, .. } => commitment,
        }
    }

    /// shared randomness, present only once revealed
    pub fn final_random(&self) -> Option<H256> {
        match self {
            Self::Revealed { final_random, .. } => Some(*final_random),
            _ => None,
        }
    }

    /// bind the acceptor's cleartext randomness to the commitment
    pub fn accept(&mut self, acceptor_secret: H256) -> Result<()> {
        match self {
            Self::CommittedByInitiator { commitment } => {
                *self = Self::AcceptedByBoth {
                    commitment: *commitment,
                    acceptor_secret,
                };
                Ok(())
            }
            _ => Err(OrderingError::AlreadyAccepted.into()),
        }
    }

    /// reveal the initiator's secret and fix the shared randomness
    pub fn reveal(&mut self, secret_a: H256) -> Result<H256> {
        match self {
            // nothing to combine with until the acceptor contributed
            Self::CommittedByInitiator { .. } => Err(TimingError::TooEarly.into()),
            Self::AcceptedByBoth {
                commitment,
                acceptor_secret,
            } => {
                if secret_hash(&secret_a) != commitment.initiator_hash {
                    return Err(ConsistencyError::RevealMismatch.into());
                }
                let random = final_random(&secret_a, acceptor_secret);
                *self = Self::Revealed {
                    commitment: *commitment,
                    acceptor_secret: *acceptor_secret,
                    secret_a,
                    final_random: random,
                };
                Ok(random)
            }
            Self::Revealed { .. } => Err(OrderingError::AlreadyRevealed.into()),
        }
    }
}
