/*
  Bonding Token

  Reserve-ratio bonding curve for SPL tokens. Every buy mints against the
  curve, every sell burns back into it, and the reserve follows

      price = reserve_balance / (total_supply * reserve_ratio)

   Price
   ^
   |                                 /
   |                              /
   |                          /
   |                     _/
   |              __--
   |_______----
   +---------------------------------> Supply

  A fee is skimmed from the reserve leg of both directions and booked for the
  treasury. Buys close once net contributed reserve reaches the liquidity goal;
  sells stay open.
*/

use anchor_lang::prelude::*;

pub mod constants;
pub mod errors;
pub mod events;
pub mod exchange;
pub mod instructions;
pub mod math;
pub mod state;

use instructions::*;
use state::CurveParams;

declare_id!("7FktHhtdQrpwX5tU8LKFfJTcEyyW8GK9igDV5DH6bGy1");

#[program]
pub mod bonding_token {
    use super::*;

    pub fn init_protocol(ctx: Context<InitProtocol>, treasury: Pubkey, params: CurveParams) -> Result<()> {
        ctx.accounts.init_protocol(treasury, params, ctx.bumps)
    }

    pub fn launch_coin(ctx: Context<LaunchCoin>, name: String, symbol: String, uri: String) -> Result<()> {
        ctx.accounts.launch_coin(name, symbol, uri, ctx.bumps)
    }

    pub fn buy_token(ctx: Context<TradeCoin>, reserve_amount: u64) -> Result<u64> {
        ctx.accounts.buy_token(reserve_amount)
    }

    pub fn sell_token(ctx: Context<TradeCoin>, token_amount: u64) -> Result<u64> {
        ctx.accounts.sell_token(token_amount)
    }

    pub fn quote_buy(ctx: Context<QuoteCurve>, reserve_amount: u64) -> Result<u64> {
        ctx.accounts.quote_buy(reserve_amount)
    }

    pub fn quote_sell(ctx: Context<QuoteCurve>, token_amount: u64) -> Result<u64> {
        ctx.accounts.quote_sell(token_amount)
    }

    pub fn liquidity_goal_reached(ctx: Context<QuoteCurve>) -> Result<bool> {
        ctx.accounts.liquidity_goal_reached()
    }
}
