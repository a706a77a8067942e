//! off-ledger peer side for dice channels
//!
//! keypairs and builders for the signed artifacts peers exchange: balance
//! proofs, game proofs and randomness commitments; everything on-ledger
//! lives in dice-channel

pub mod keys;
pub mod proof;

pub use keys::*;
pub use proof::*;
