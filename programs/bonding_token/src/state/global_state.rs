use anchor_lang::prelude::*;

use crate::constants::{BPS_DENOMINATOR, MAX_RESERVE_RATIO};
use crate::errors::BondingTokenError;
use crate::math::{CurveEngine, PowerCurve};

/// Immutable curve configuration, copied into every curve at launch.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, PartialEq, Eq, InitSpace)]
pub struct CurveParams {
    /// Reserve ratio in ppm, (0, 1_000_000]. Lower is steeper.
    pub reserve_ratio: u32,
    /// Fee skimmed from the reserve leg of every trade.
    pub fee_rate_bps: u16,
    /// Virtual seed supply the curve starts from.
    pub starting_supply: u64,
    /// Virtual seed reserve paired with the starting supply.
    pub seed_reserve: u64,
    /// Cap on net reserve contributed through buys.
    pub liquidity_goal: u64,
}

impl CurveParams {
    pub fn validate(&self) -> Result<()> {
        require!(
            self.reserve_ratio > 0 && self.reserve_ratio <= MAX_RESERVE_RATIO,
            BondingTokenError::InvalidReserveRatio
        );
        require!(
            (self.fee_rate_bps as u64) < BPS_DENOMINATOR,
            BondingTokenError::InvalidFeeRate
        );
        require!(self.starting_supply > 0, BondingTokenError::InvalidConfig);
        require!(self.seed_reserve > 0, BondingTokenError::InvalidConfig);
        require!(self.liquidity_goal > 0, BondingTokenError::InvalidConfig);
        require!(
            self.seed_reserve.checked_add(self.liquidity_goal).is_some(),
            BondingTokenError::InvalidConfig
        );

        // Filling the whole goal from the seed must be quotable; the curve is
        // path independent so no admissible sequence of buys can overflow.
        let minted = PowerCurve.purchase_return(
            self.starting_supply,
            self.seed_reserve,
            self.reserve_ratio,
            self.liquidity_goal,
        )?;
        require!(
            self.starting_supply.checked_add(minted).is_some(),
            BondingTokenError::Overflow
        );
        Ok(())
    }
}

#[account]
#[derive(InitSpace)]
pub struct GlobalState {
    pub owner: Pubkey,
    pub treasury: Pubkey,
    pub params: CurveParams,
    pub bump: u8,
}

// every coin launched reads its curve shape, fee and goal from `params`
