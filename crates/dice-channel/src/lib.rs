//! two-party payment channels with a commit-reveal dice side game
//!
//! off-ledger, peers exchange signed balance proofs and, for a game round,
//! a dual-signed game proof plus a randomness commitment. on dispute a peer
//! submits its best proofs on-ledger: force close, an optional higher-nonce
//! rebuttal inside the settle window, timed settlement, and a commit-reveal
//! resolved unlock of the escrowed game stakes.

pub mod channel;
pub mod error;
pub mod game;
pub mod ledger;
pub mod proof;
pub mod random;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use channel::*;
pub use error::*;
pub use game::*;
pub use ledger::*;
pub use proof::*;
pub use random::*;
pub use types::*;
