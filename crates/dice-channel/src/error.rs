//! error taxonomy for channel operations
//!
//! every operation is all-or-nothing: any error leaves the ledger untouched

use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

/// signer role a signature failed to recover
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignerRole {
    Counterparty,
    Closer,
    Partner,
    Initiator,
    Acceptor,
}

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Error {
    #[error("validation: {0}")]
    Validation(#[from] ValidationError),
    #[error("authentication: {0}")]
    Authentication(#[from] AuthenticationError),
    #[error("ordering: {0}")]
    Ordering(#[from] OrderingError),
    #[error("timing: {0}")]
    Timing(#[from] TimingError),
    #[error("consistency: {0}")]
    Consistency(#[from] ConsistencyError),
}

/// malformed input
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be non-zero")]
    ZeroAmount,
    #[error("cannot open a channel with yourself")]
    SelfChannel,
    #[error("settle window below the configured minimum")]
    WindowTooShort,
    #[error("pair already has a live channel")]
    ChannelExists,
    #[error("unknown channel")]
    UnknownChannel,
    #[error("unknown randomness round")]
    UnknownRound,
    #[error("account is not a channel participant")]
    UnknownParticipant,
    #[error("invalid game parameters")]
    InvalidGameProof,
    #[error("stake exceeds the staker's deposit")]
    StakeExceedsDeposit,
    #[error("malformed final state encoding")]
    MalformedFinalState,
}

/// a signature failed to recover the expected signer
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AuthenticationError {
    #[error("signature does not recover the {0:?}")]
    BadSignature(SignerRole),
}

/// violation of a once-only or monotonic invariant
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum OrderingError {
    #[error("nonce does not exceed the registered nonce")]
    StaleNonce,
    #[error("channel is not open")]
    AlreadyClosed,
    #[error("channel is already settled")]
    AlreadySettled,
    #[error("randomness round already accepted")]
    AlreadyAccepted,
    #[error("randomness round already revealed")]
    AlreadyRevealed,
    #[error("channel already unlocked")]
    AlreadyUnlocked,
    #[error("randomness round id already committed")]
    ReplayedCommitment,
    #[error("channel is not closed")]
    NotClosed,
    #[error("channel is not settled")]
    NotSettled,
}

/// clock constraint violated
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TimingError {
    #[error("settle window still running")]
    TooEarly,
    #[error("settle window elapsed")]
    WindowExpired,
}

/// submitted data contradicts registered data
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum ConsistencyError {
    #[error("final state does not match the registered proof")]
    ProofMismatch,
    #[error("secret does not match the committed hash")]
    RevealMismatch,
}
