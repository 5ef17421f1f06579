use anchor_lang::prelude::*;

use crate::constants::BPS_DENOMINATOR;
use crate::errors::BondingTokenError;
use crate::math::{CurveEngine, PowerCurve};
use crate::state::CurveParams;

/// Accounting state of one bonding curve token.
///
/// `total_supply` starts at `starting_supply` and `reserve_balance` at
/// `seed_reserve`; both seeds are virtual, no holder owns them. Only
/// [`BondingCurve::apply_buy`] and [`BondingCurve::apply_sell`] mutate the
/// trade fields, and only with a quote that was fully validated first.
#[account]
#[derive(InitSpace, Debug)]
pub struct BondingCurve {
    pub token_mint: Pubkey,
    pub treasury: Pubkey,

    pub total_supply: u64,
    pub reserve_balance: u64,
    // net reserve from buys minus gross reserve released by sells
    pub total_reserve_contributed: u64,
    pub treasury_claimable: u64,

    pub starting_supply: u64,
    pub seed_reserve: u64,
    pub liquidity_goal: u64,
    pub reserve_ratio: u32,
    pub fee_rate_bps: u16,

    pub bump: u8,
    pub escrow_bump: u8,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuyQuote {
    pub gross_amount: u64,
    pub fee: u64,
    pub net_amount: u64,
    pub tokens_out: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SellQuote {
    pub token_amount: u64,
    pub gross_return: u64,
    pub fee: u64,
    pub net_return: u64,
}

impl BondingCurve {
    pub fn new(
        params: &CurveParams,
        token_mint: Pubkey,
        treasury: Pubkey,
        bump: u8,
        escrow_bump: u8,
    ) -> Result<Self> {
        params.validate()?;
        Ok(Self {
            token_mint,
            treasury,
            total_supply: params.starting_supply,
            reserve_balance: params.seed_reserve,
            total_reserve_contributed: 0,
            treasury_claimable: 0,
            starting_supply: params.starting_supply,
            seed_reserve: params.seed_reserve,
            liquidity_goal: params.liquidity_goal,
            reserve_ratio: params.reserve_ratio,
            fee_rate_bps: params.fee_rate_bps,
            bump,
            escrow_bump,
        })
    }

    fn engine(&self) -> PowerCurve {
        PowerCurve
    }

    /// Tokens held by traders, i.e. supply above the virtual seed.
    pub fn circulating_supply(&self) -> u64 {
        self.total_supply - self.starting_supply
    }

    /// Capped once contributed reserve reaches the goal; buys are closed from
    /// then on while sells stay open.
    pub fn is_capped(&self) -> bool {
        self.total_reserve_contributed >= self.liquidity_goal
    }

    pub fn remaining_capacity(&self) -> u64 {
        self.liquidity_goal
            .saturating_sub(self.total_reserve_contributed)
    }

    /// Fee owed on `amount` of reserve currency. `amount - fee` is the net leg.
    pub fn fee_for(&self, amount: u64) -> u64 {
        // fee_rate_bps < 10_000, so the quotient is below `amount`
        ((amount as u128) * (self.fee_rate_bps as u128) / BPS_DENOMINATOR as u128) as u64
    }

    /// Largest gross deposit whose net amount still fits under the goal.
    pub fn max_buy_amount(&self) -> u64 {
        let remaining = self.remaining_capacity();
        if remaining == 0 {
            return 0;
        }
        let keep = BPS_DENOMINATOR - self.fee_rate_bps as u64;
        let estimate = (remaining as u128) * (BPS_DENOMINATOR as u128) / keep as u128;
        let mut gross = u64::try_from(estimate).unwrap_or(u64::MAX);

        // net(gross) is non-decreasing with unit steps, settle onto the edge
        while gross > 0 && gross - self.fee_for(gross) > remaining {
            gross -= 1;
        }
        while gross < u64::MAX && (gross + 1) - self.fee_for(gross + 1) <= remaining {
            gross += 1;
        }
        gross
    }

    /// Tokens the curve mints for `reserve_amount`, before any fee.
    pub fn calculate_token_amount(&self, reserve_amount: u64) -> Result<u64> {
        self.engine().purchase_return(
            self.total_supply,
            self.reserve_balance,
            self.reserve_ratio,
            reserve_amount,
        )
    }

    /// Reserve the curve releases for `token_amount`, before any fee.
    pub fn calculate_reserve_amount(&self, token_amount: u64) -> Result<u64> {
        self.engine().sale_return(
            self.total_supply,
            self.reserve_balance,
            self.reserve_ratio,
            token_amount,
        )
    }

    pub fn quote_buy(&self, gross_amount: u64) -> Result<BuyQuote> {
        require!(gross_amount > 0, BondingTokenError::InvalidAmount);

        let fee = self.fee_for(gross_amount);
        let net_amount = gross_amount - fee;

        // cap is on the curve-facing amount, fees do not count toward it
        let contributed = self
            .total_reserve_contributed
            .checked_add(net_amount)
            .ok_or(BondingTokenError::Overflow)?;
        if contributed > self.liquidity_goal {
            msg!(
                "liquidity goal exceeded: at most {} accepted, {} offered",
                self.max_buy_amount(),
                gross_amount
            );
            return err!(BondingTokenError::LiquidityGoalExceeded);
        }

        let tokens_out = self.calculate_token_amount(net_amount)?;
        self.total_supply
            .checked_add(tokens_out)
            .ok_or(BondingTokenError::Overflow)?;
        self.reserve_balance
            .checked_add(net_amount)
            .ok_or(BondingTokenError::Overflow)?;

        Ok(BuyQuote {
            gross_amount,
            fee,
            net_amount,
            tokens_out,
        })
    }

    pub fn quote_sell(&self, token_amount: u64) -> Result<SellQuote> {
        require!(token_amount > 0, BondingTokenError::InvalidAmount);
        require!(
            token_amount <= self.circulating_supply(),
            BondingTokenError::BelowStartingSupply
        );

        let gross_return = self.calculate_reserve_amount(token_amount)?;
        // unreachable while every quote truncates, kept as a guard
        require!(
            gross_return <= self.total_reserve_contributed,
            BondingTokenError::InsufficientReserve
        );

        let fee = self.fee_for(gross_return);
        Ok(SellQuote {
            token_amount,
            gross_return,
            fee,
            net_return: gross_return - fee,
        })
    }

    pub fn apply_buy(&mut self, quote: &BuyQuote) -> Result<()> {
        let reserve_balance = self
            .reserve_balance
            .checked_add(quote.net_amount)
            .ok_or(BondingTokenError::Overflow)?;
        let total_supply = self
            .total_supply
            .checked_add(quote.tokens_out)
            .ok_or(BondingTokenError::Overflow)?;
        let contributed = self
            .total_reserve_contributed
            .checked_add(quote.net_amount)
            .ok_or(BondingTokenError::Overflow)?;
        let claimable = self
            .treasury_claimable
            .checked_add(quote.fee)
            .ok_or(BondingTokenError::Overflow)?;

        self.reserve_balance = reserve_balance;
        self.total_supply = total_supply;
        self.total_reserve_contributed = contributed;
        self.treasury_claimable = claimable;
        Ok(())
    }

    pub fn apply_sell(&mut self, quote: &SellQuote) -> Result<()> {
        let reserve_balance = self
            .reserve_balance
            .checked_sub(quote.gross_return)
            .ok_or(BondingTokenError::InsufficientReserve)?;
        let contributed = self
            .total_reserve_contributed
            .checked_sub(quote.gross_return)
            .ok_or(BondingTokenError::InsufficientReserve)?;
        let total_supply = self
            .total_supply
            .checked_sub(quote.token_amount)
            .filter(|supply| *supply >= self.starting_supply)
            .ok_or(BondingTokenError::BelowStartingSupply)?;
        let claimable = self
            .treasury_claimable
            .checked_add(quote.fee)
            .ok_or(BondingTokenError::Overflow)?;

        self.reserve_balance = reserve_balance;
        self.total_supply = total_supply;
        self.total_reserve_contributed = contributed;
        self.treasury_claimable = claimable;
        Ok(())
    }
}
