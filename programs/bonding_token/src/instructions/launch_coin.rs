use anchor_lang::prelude::*;
use anchor_lang::system_program::{transfer, Transfer};
use anchor_spl::{
    metadata::{
        create_metadata_accounts_v3,
        mpl_token_metadata::types::DataV2,
        CreateMetadataAccountsV3,
        Metadata as Metaplex,
        mpl_token_metadata::ID as METAPLEX_ID,
    },
    token_interface::{Mint, TokenInterface},
};

use crate::constants::*;
use crate::events::CoinLaunched;
use crate::state::{BondingCurve, GlobalState};

/// # LaunchCoin Instruction
///
/// Creates a new SPL token whose only issuer is its bonding curve. The curve
/// PDA is the mint and freeze authority, so tokens exist only through `buy`
/// and disappear only through `sell`.
///
/// The curve starts from the protocol's `CurveParams`: a virtual starting
/// supply paired with a virtual seed reserve, neither of which is minted or
/// deposited. That gives the first buyer a well-defined, non-zero price.
#[derive(Accounts)]
pub struct LaunchCoin<'info> {
    /// Pays for every account created here and for the escrow's rent
    #[account(mut)]
    pub payer: Signer<'info>,

    /// Protocol configuration the curve is seeded from
    #[account(
        seeds = [SEED_GLOBAL_STATE.as_bytes()],
        bump = global_state.bump,
    )]
    pub global_state: Account<'info, GlobalState>,

    #[account(init,
    payer = payer,
    space = 8 + BondingCurve::INIT_SPACE,
    seeds = [SEED_BONDING_CURVE.as_bytes(), token_mint.key().as_ref()],
    bump,
    )]
    pub bonding_curve: Account<'info, BondingCurve>,

    /// Holds the reserve currency and the fees owed to the treasury
    #[account(
        mut,
        seeds = [SEED_SOL_ESCROW.as_bytes(), bonding_curve.key().as_ref()],
        bump,
    )]
    pub sol_escrow: SystemAccount<'info>,

    #[account(
        init,
        payer = payer,
        mint::decimals = TOKEN_DECIMALS,
        mint::authority = bonding_curve,
        mint::freeze_authority = bonding_curve,
    )]
    pub token_mint: InterfaceAccount<'info, Mint>,

    /// CHECK: created by the Metaplex program, address pinned by seeds
    #[account(
        mut,
        seeds = [SEED_METADATA.as_bytes(), METAPLEX_ID.as_ref(), token_mint.key().as_ref()],
        bump,
        seeds::program = token_metadata_program.key(),
    )]
    pub metadata: UncheckedAccount<'info>,

    pub token_program: Interface<'info, TokenInterface>,

    #[account(address = METAPLEX_ID)]
    pub token_metadata_program: Program<'info, Metaplex>,

    pub system_program: Program<'info, System>,

    pub rent: Sysvar<'info, Rent>,
}

impl<'info> LaunchCoin<'info> {
    pub fn launch_coin(&mut self, name: String, symbol: String, uri: String, bumps: LaunchCoinBumps) -> Result<()> {
        let params = self.global_state.params;

        let token_data = DataV2 {
            name,
            symbol,
            uri,
            seller_fee_basis_points: 0,
            creators: None,
            collection: None,
            uses: None,
        };

        let token_mint_key = self.token_mint.key();
        let seeds = &[
            SEED_BONDING_CURVE.as_bytes(),
            token_mint_key.as_ref(),
            &[bumps.bonding_curve],
        ];
        let signer = &[&seeds[..]];

        let metadata_ctx = CpiContext::new_with_signer(
            self.token_metadata_program.to_account_info(),
            CreateMetadataAccountsV3 {
                metadata: self.metadata.to_account_info(),
                mint: self.token_mint.to_account_info(),
                mint_authority: self.bonding_curve.to_account_info(),
                update_authority: self.bonding_curve.to_account_info(),
                payer: self.payer.to_account_info(),
                system_program: self.system_program.to_account_info(),
                rent: self.rent.to_account_info(),
            },
            signer,
        );

        // immutable metadata, curve signs as update authority
        create_metadata_accounts_v3(metadata_ctx, token_data, false, true, None)?;

        // the escrow only ever receives lamports, fund its rent up front so the
        // first buy of any size can land
        let rent_exempt = self.rent.minimum_balance(0);
        let escrow_shortfall = rent_exempt.saturating_sub(self.sol_escrow.to_account_info().lamports());
        if escrow_shortfall > 0 {
            transfer(
                CpiContext::new(
                    self.system_program.to_account_info(),
                    Transfer {
                        from: self.payer.to_account_info(),
                        to: self.sol_escrow.to_account_info(),
                    },
                ),
                escrow_shortfall,
            )?;
        }

        self.bonding_curve.set_inner(BondingCurve::new(
            &params,
            token_mint_key,
            self.global_state.treasury,
            bumps.bonding_curve,
            bumps.sol_escrow,
        )?);

        msg!("Launching coin {}", token_mint_key);
        emit!(CoinLaunched {
            token_mint: token_mint_key,
            bonding_curve: self.bonding_curve.key(),
            starting_supply: params.starting_supply,
            seed_reserve: params.seed_reserve,
            liquidity_goal: params.liquidity_goal,
            timestamp: Clock::get()?.unix_timestamp,
        });

        Ok(())
    }
}
