use anchor_lang::prelude::*;

use crate::constants::SEED_GLOBAL_STATE;
use crate::events::ProtocolInitialized;
use crate::state::{CurveParams, GlobalState};

#[derive(Accounts)]
pub struct InitProtocol<'info> {
    #[account(mut)]
    pub payer: Signer<'info>,

    #[account(init,
    payer = payer,
    space = 8 + GlobalState::INIT_SPACE,
    seeds = [SEED_GLOBAL_STATE.as_bytes()],
    bump,
    )]
    pub global_state: Account<'info, GlobalState>,
    pub system_program: Program<'info, System>,
}

impl<'info> InitProtocol<'info> {
    pub fn init_protocol(&mut self, treasury: Pubkey, params: CurveParams, bumps: InitProtocolBumps) -> Result<()> {
        params.validate()?;

        self.global_state.set_inner(GlobalState {
            owner: self.payer.key(),
            treasury,
            params,
            bump: bumps.global_state,
        });

        msg!("Protocol initialized, treasury {}", treasury);
        emit!(ProtocolInitialized {
            owner: self.payer.key(),
            treasury,
            reserve_ratio: params.reserve_ratio,
            fee_rate_bps: params.fee_rate_bps,
            liquidity_goal: params.liquidity_goal,
        });

        Ok(())
    }
}
