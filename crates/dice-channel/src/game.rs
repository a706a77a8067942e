//! dice resolution over the shared randomness
//!
//! pure function from (stakes, bet mask, modulo, randomness) to a payout;
//! the ledger applies the outcome to the locked amounts at unlock

use crate::error::{Result, ValidationError};
use crate::types::{Balance, H256};

/// highest roll addressable by a 64-bit bet mask
pub const MAX_MODULO: u8 = 64;

/// outcome of a resolved dice round
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GameOutcome {
    pub roll: u8,
    /// the roll's bit is set in the bet mask
    pub initiator_wins: bool,
    /// value moved from the loser's escrow to the winner's
    pub payout: Balance,
}

/// reject game parameters that cannot produce a fair round
pub fn validate_params(bet_mask: u64, modulo: u8) -> Result<()> {
    if modulo == 0 || modulo > MAX_MODULO || bet_mask == 0 {
        return Err(ValidationError::InvalidGameProof.into());
    }
    // the mask must only address rolls in [0, modulo)
    if modulo < MAX_MODULO && bet_mask >> u32::from(modulo) != 0 {
        return Err(ValidationError::InvalidGameProof.into());
    }
    Ok(())
}

/// resolve one dice round
pub fn resolve(
    initiator_stake: Balance,
    acceptor_stake: Balance,
    bet_mask: u64,
    modulo: u8,
    final_random: &H256,
) -> Result<GameOutcome> {
    validate_params(bet_mask, modulo)?;
    if initiator_stake == 0 || acceptor_stake == 0 {
        return Err(ValidationError::InvalidGameProof.into());
    }

    let mut raw = [0u8; 16];
    raw.copy_from_slice(&final_random.0[..16]);
    let roll = (u128::from_be_bytes(raw) % u128::from(modulo)) as u8;

    Ok(GameOutcome {
        roll,
        initiator_wins: bet_mask & (1u64 << u32::from(roll)) != 0,
        payout: initiator_stake.min(acceptor_stake),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn random_with_lead(byte: u8) -> H256 {
        let mut bytes = [0u8; 32];
        bytes[15] = byte; // low byte of the big-endian u128
        H256(bytes)
    }

    #[test]
    fn test_rejects_bad_params() {
        let err = Err(Error::Validation(ValidationError::InvalidGameProof));

        assert_eq!(validate_params(1, 0), err);
        assert_eq!(validate_params(1, 65), err);
        assert_eq!(validate_params(0, 6), err);
        // bit 6 cannot come up with modulo 6
        assert_eq!(validate_params(0b1000000, 6), err);
    }

    #[test]
    fn test_rejects_zero_stakes() {
        assert_eq!(
            resolve(0, 1, 0b1, 6, &H256::zero()),
            Err(Error::Validation(ValidationError::InvalidGameProof))
        );
        assert_eq!(
            resolve(1, 0, 0b1, 6, &H256::zero()),
            Err(Error::Validation(ValidationError::InvalidGameProof))
        );
    }

    #[test]
    fn test_full_width_mask() {
        assert!(validate_params(u64::MAX, 64).is_ok());
        assert!(validate_params(0b111111, 6).is_ok());
    }

    #[test]
    fn test_deterministic_roll() {
        // raw randomness 5 -> roll 5 with modulo 6
        let outcome = resolve(1, 1, 0b101010, 6, &random_with_lead(5)).unwrap();
        assert_eq!(outcome.roll, 5);
        assert!(outcome.initiator_wins);

        // raw randomness 8 -> roll 2, bit unset
        let outcome = resolve(1, 1, 0b101010, 6, &random_with_lead(8)).unwrap();
        assert_eq!(outcome.roll, 2);
        assert!(!outcome.initiator_wins);
    }

    #[test]
    fn test_payout_is_min_stake() {
        let outcome = resolve(5, 3, 0b1, 2, &random_with_lead(0)).unwrap();
        assert_eq!(outcome.payout, 3);
    }
}
