use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};
use anchor_spl::{
    associated_token::AssociatedToken,
    token_interface::{burn, mint_to, Burn, Mint, MintTo, TokenAccount, TokenInterface},
};

use crate::constants::{SEED_BONDING_CURVE, SEED_SOL_ESCROW};
use crate::errors::BondingTokenError;
use crate::events::{LiquidityGoalReached, TokensBought, TokensSold};
use crate::exchange::{self, ReserveVault, TokenLedger};
use crate::state::BondingCurve;

#[derive(Accounts)]
pub struct TradeCoin<'info> {
    #[account(mut)]
    pub trader: Signer<'info>,

    #[account(
        init_if_needed,
        payer = trader,
        associated_token::mint = token_mint,
        associated_token::authority = trader,
        associated_token::token_program = token_program,
    )]
    pub trader_token_account: InterfaceAccount<'info, TokenAccount>,

    #[account(
        mut,
        seeds = [SEED_SOL_ESCROW.as_bytes(), bonding_curve.key().as_ref()],
        bump = bonding_curve.escrow_bump,
    )]
    pub sol_escrow: SystemAccount<'info>,

    #[account(
        mut,
        seeds = [SEED_BONDING_CURVE.as_bytes(), token_mint.key().as_ref()],
        bump = bonding_curve.bump,
        has_one = token_mint,
    )]
    pub bonding_curve: Account<'info, BondingCurve>,

    #[account(mut)]
    pub token_mint: InterfaceAccount<'info, Mint>,
    pub token_program: Interface<'info, TokenInterface>,

    pub associated_token_program: Program<'info, AssociatedToken>,

    pub system_program: Program<'info, System>,
}

impl<'info> TradeCoin<'info> {
    pub fn buy_token(&mut self, reserve_amount: u64) -> Result<u64> {
        let trader = self.trader.key();
        let mut ledger = self.ledger();

        let was_capped = self.bonding_curve.is_capped();
        let quote = exchange::buy(&mut self.bonding_curve, &mut ledger, &trader, reserve_amount)?;

        let curve = &self.bonding_curve;
        msg!(
            "Bought {} tokens for {} lamports ({} fee)",
            quote.tokens_out,
            quote.gross_amount,
            quote.fee
        );
        emit!(TokensBought {
            token_mint: curve.token_mint,
            trader,
            gross_amount: quote.gross_amount,
            fee: quote.fee,
            tokens_minted: quote.tokens_out,
            total_supply: curve.total_supply,
            reserve_balance: curve.reserve_balance,
            timestamp: Clock::get()?.unix_timestamp,
        });

        if !was_capped && curve.is_capped() {
            msg!("Liquidity goal reached, curve is capped");
            emit!(LiquidityGoalReached {
                token_mint: curve.token_mint,
                total_reserve_contributed: curve.total_reserve_contributed,
                total_supply: curve.total_supply,
            });
        }

        Ok(quote.tokens_out)
    }

    pub fn sell_token(&mut self, token_amount: u64) -> Result<u64> {
        let trader = self.trader.key();
        let mut ledger = self.ledger();

        let quote = exchange::sell(&mut self.bonding_curve, &mut ledger, &trader, token_amount)?;

        let curve = &self.bonding_curve;
        msg!(
            "Sold {} tokens for {} lamports ({} fee)",
            quote.token_amount,
            quote.net_return,
            quote.fee
        );
        emit!(TokensSold {
            token_mint: curve.token_mint,
            trader,
            tokens_burned: quote.token_amount,
            fee: quote.fee,
            net_return: quote.net_return,
            total_supply: curve.total_supply,
            reserve_balance: curve.reserve_balance,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(quote.net_return)
    }

    fn ledger(&self) -> CpiLedger<'info> {
        CpiLedger {
            trader: self.trader.to_account_info(),
            trader_balance: self.trader_token_account.amount,
            trader_token_account: self.trader_token_account.to_account_info(),
            token_mint: self.token_mint.to_account_info(),
            bonding_curve: self.bonding_curve.to_account_info(),
            curve_bump: self.bonding_curve.bump,
            sol_escrow: self.sol_escrow.to_account_info(),
            escrow_bump: self.bonding_curve.escrow_bump,
            token_program: self.token_program.to_account_info(),
            system_program: self.system_program.to_account_info(),
        }
    }
}

/// Token ledger and reserve vault backed by SPL token and system program CPIs.
///
/// Bound to a single trader: any other account is rejected with `BadAccount`.
pub struct CpiLedger<'info> {
    trader: AccountInfo<'info>,
    trader_balance: u64,
    trader_token_account: AccountInfo<'info>,
    token_mint: AccountInfo<'info>,
    bonding_curve: AccountInfo<'info>,
    curve_bump: u8,
    sol_escrow: AccountInfo<'info>,
    escrow_bump: u8,
    token_program: AccountInfo<'info>,
    system_program: AccountInfo<'info>,
}

impl<'info> CpiLedger<'info> {
    fn check_trader(&self, account: &Pubkey) -> Result<()> {
        require_keys_eq!(*account, self.trader.key(), BondingTokenError::BadAccount);
        Ok(())
    }
}

impl<'info> TokenLedger for CpiLedger<'info> {
    fn balance_of(&self, account: &Pubkey) -> Result<u64> {
        self.check_trader(account)?;
        Ok(self.trader_balance)
    }

    fn mint(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        self.check_trader(to)?;

        let token_mint_key = self.token_mint.key();
        let seeds = &[
            SEED_BONDING_CURVE.as_bytes(),
            token_mint_key.as_ref(),
            &[self.curve_bump],
        ];
        let signer_seeds = &[&seeds[..]];

        let accounts = MintTo {
            mint: self.token_mint.clone(),
            to: self.trader_token_account.clone(),
            authority: self.bonding_curve.clone(),
        };
        let cpi_ctx = CpiContext::new_with_signer(self.token_program.clone(), accounts, signer_seeds);
        mint_to(cpi_ctx, amount)?;

        self.trader_balance = self
            .trader_balance
            .checked_add(amount)
            .ok_or(BondingTokenError::Overflow)?;
        Ok(())
    }

    fn burn(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        self.check_trader(from)?;

        let accounts = Burn {
            mint: self.token_mint.clone(),
            from: self.trader_token_account.clone(),
            authority: self.trader.clone(),
        };
        let cpi_ctx = CpiContext::new(self.token_program.clone(), accounts);
        burn(cpi_ctx, amount)?;

        self.trader_balance = self
            .trader_balance
            .checked_sub(amount)
            .ok_or(BondingTokenError::InsufficientBalance)?;
        Ok(())
    }
}

impl<'info> ReserveVault for CpiLedger<'info> {
    fn collect(&mut self, from: &Pubkey, amount: u64) -> Result<()> {
        self.check_trader(from)?;

        let transfer_accounts = Transfer {
            from: self.trader.clone(),
            to: self.sol_escrow.clone(),
        };
        let transfer_ctx = CpiContext::new(self.system_program.clone(), transfer_accounts);
        transfer(transfer_ctx, amount)
    }

    fn release(&mut self, to: &Pubkey, amount: u64) -> Result<()> {
        self.check_trader(to)?;
        if amount == 0 {
            return Ok(());
        }

        let bonding_curve_key = self.bonding_curve.key();
        let seeds = &[
            SEED_SOL_ESCROW.as_bytes(),
            bonding_curve_key.as_ref(),
            &[self.escrow_bump],
        ];
        let signer_seeds = &[&seeds[..]];

        let transfer_accounts = Transfer {
            from: self.sol_escrow.clone(),
            to: self.trader.clone(),
        };
        let cpi_ctx = CpiContext::new_with_signer(self.system_program.clone(), transfer_accounts, signer_seeds);
        transfer(cpi_ctx, amount)
    }
}
