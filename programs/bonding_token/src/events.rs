use anchor_lang::prelude::*;

#[event]
pub struct ProtocolInitialized {
    pub owner: Pubkey,
    pub treasury: Pubkey,
    pub reserve_ratio: u32,
    pub fee_rate_bps: u16,
    pub liquidity_goal: u64,
}

/// Emitted when a new token is launched on its curve.
#[event]
pub struct CoinLaunched {
    pub token_mint: Pubkey,
    pub bonding_curve: Pubkey,
    pub starting_supply: u64,
    pub seed_reserve: u64,
    pub liquidity_goal: u64,
    pub timestamp: i64,
}

// Emitted on successful buy (reserve -> token)
#[event]
pub struct TokensBought {
    pub token_mint: Pubkey,
    pub trader: Pubkey,
    pub gross_amount: u64, // paid by the trader, fee included
    pub fee: u64,
    pub tokens_minted: u64,
    pub total_supply: u64,
    pub reserve_balance: u64,
    pub timestamp: i64,
}

// Emitted on successful sell (token -> reserve)
#[event]
pub struct TokensSold {
    pub token_mint: Pubkey,
    pub trader: Pubkey,
    pub tokens_burned: u64,
    pub fee: u64,
    pub net_return: u64, // paid out to the trader
    pub total_supply: u64,
    pub reserve_balance: u64,
    pub timestamp: i64,
}

// Emitted by the buy that fills the liquidity goal, the signal for migration
#[event]
pub struct LiquidityGoalReached {
    pub token_mint: Pubkey,
    pub total_reserve_contributed: u64,
    pub total_supply: u64,
}
