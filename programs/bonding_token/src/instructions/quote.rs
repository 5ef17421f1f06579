use anchor_lang::prelude::*;

use crate::constants::SEED_BONDING_CURVE;
use crate::state::BondingCurve;

/// Read-only view of a curve. Results go back through return data.
#[derive(Accounts)]
pub struct QuoteCurve<'info> {
    #[account(
        seeds = [SEED_BONDING_CURVE.as_bytes(), bonding_curve.token_mint.as_ref()],
        bump = bonding_curve.bump,
    )]
    pub bonding_curve: Account<'info, BondingCurve>,
}

impl<'info> QuoteCurve<'info> {
    pub fn quote_buy(&self, reserve_amount: u64) -> Result<u64> {
        self.bonding_curve.calculate_token_amount(reserve_amount)
    }

    pub fn quote_sell(&self, token_amount: u64) -> Result<u64> {
        self.bonding_curve.calculate_reserve_amount(token_amount)
    }

    pub fn liquidity_goal_reached(&self) -> Result<bool> {
        Ok(self.bonding_curve.is_capped())
    }
}
