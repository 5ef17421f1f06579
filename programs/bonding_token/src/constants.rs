// Basis point denominator, 10_000 bps = 100.00%
pub const BPS_DENOMINATOR: u64 = 10_000;

// Reserve ratio is expressed in parts per million, 1_000_000 = ratio 1 (linear curve)
pub const MAX_RESERVE_RATIO: u32 = 1_000_000;

// Decimals of every mint launched by the program
pub const TOKEN_DECIMALS: u8 = 6;

// PDA seed strings
pub const SEED_GLOBAL_STATE: &str = "global_state";
pub const SEED_BONDING_CURVE: &str = "bonding_curve";
pub const SEED_SOL_ESCROW: &str = "bonding_curve_sol_escrow";
pub const SEED_METADATA: &str = "metadata";
