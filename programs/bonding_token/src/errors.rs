use anchor_lang::prelude::*;

use crate::math::fixed::FixedError;

#[error_code]
pub enum BondingTokenError {
    #[msg("Amount must be greater than zero")]
    InvalidAmount,
    #[msg("Trade would push the reserve past the liquidity goal")]
    LiquidityGoalExceeded,
    #[msg("Insufficient token balance")]
    InsufficientBalance,
    #[msg("Division by zero in curve math")]
    DivisionByZero,
    #[msg("Arithmetic overflow")]
    Overflow,
    #[msg("Reserve ratio must be within (0, 1_000_000] ppm")]
    InvalidReserveRatio,
    #[msg("Fee rate must be below 10_000 bps")]
    InvalidFeeRate,
    #[msg("Invalid curve configuration")]
    InvalidConfig,
    #[msg("Sale would take supply below the starting supply")]
    BelowStartingSupply,
    #[msg("Curve reserve cannot cover the payout")]
    InsufficientReserve,
    #[msg("Invalid account binding")]
    BadAccount,
}

impl From<FixedError> for Error {
    fn from(value: FixedError) -> Self {
        match value {
            FixedError::Overflow => BondingTokenError::Overflow.into(),
            FixedError::DivisionByZero => BondingTokenError::DivisionByZero.into(),
        }
    }
}
