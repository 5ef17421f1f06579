//! Buy and sell sequences, generic over the token ledger and reserve vault.
//!
//! On chain both collaborators are CPIs (see `instructions::trade_coin`); the
//! runtime write-locks the curve account for the whole transaction, so one
//! trade at a time reads and writes it. Every check runs inside the quote,
//! before any collaborator call or state write.

use anchor_lang::prelude::*;

use crate::errors::BondingTokenError;
use crate::state::{BondingCurve, BuyQuote, SellQuote};

/// Fungible token bookkeeping the curve mints into and burns from.
pub trait TokenLedger {
    fn balance_of(&self, account: &Pubkey) -> Result<u64>;
    fn mint(&mut self, to: &Pubkey, amount: u64) -> Result<()>;
    fn burn(&mut self, from: &Pubkey, amount: u64) -> Result<()>;
}

/// Custody of the reserve currency backing the curve.
pub trait ReserveVault {
    /// Moves `amount` from the trader into the vault.
    fn collect(&mut self, from: &Pubkey, amount: u64) -> Result<()>;
    /// Moves `amount` out of the vault to the trader.
    fn release(&mut self, to: &Pubkey, amount: u64) -> Result<()>;
}

pub fn buy<L>(
    curve: &mut BondingCurve,
    ledger: &mut L,
    trader: &Pubkey,
    gross_amount: u64,
) -> Result<BuyQuote>
where
    L: TokenLedger + ReserveVault,
{
    let quote = curve.quote_buy(gross_amount)?;

    ledger.collect(trader, quote.gross_amount)?;
    curve.apply_buy(&quote)?;
    ledger.mint(trader, quote.tokens_out)?;

    Ok(quote)
}

pub fn sell<L>(
    curve: &mut BondingCurve,
    ledger: &mut L,
    trader: &Pubkey,
    token_amount: u64,
) -> Result<SellQuote>
where
    L: TokenLedger + ReserveVault,
{
    require!(token_amount > 0, BondingTokenError::InvalidAmount);
    require!(
        ledger.balance_of(trader)? >= token_amount,
        BondingTokenError::InsufficientBalance
    );
    let quote = curve.quote_sell(token_amount)?;

    curve.apply_sell(&quote)?;
    ledger.burn(trader, quote.token_amount)?;
    ledger.release(trader, quote.net_return)?;

    Ok(quote)
}
