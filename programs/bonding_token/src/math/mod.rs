//! Constant reserve ratio pricing.
//!
//! For a curve with reserve ratio `r`, supply `S` and reserve `R`:
//!
//! ```text
//! purchase:  tokens  = S * ((1 + deposit / R)^r - 1)
//! sale:      reserve = R * (1 - (1 - amount / S)^(1 / r))
//! ```
//!
//! Marginal price is `R / (r * S)`, which grows as `S^(1/r - 1)` along the
//! curve. Both directions are evaluated as `expm1(r * ln(x))` compositions
//! with 128 fractional bits, the logarithm taken of the exact integer ratio
//! (`(R + d) / R` and `S / (S - a)`) so that tiny trades keep their relative
//! precision. Every step truncates: the trader is underpaid by at most the
//! rounding unit and never overpaid.
//!
//! Measured against a high-precision reference the returned amounts stay
//! within `1e-6` relative error plus one base unit of truncation.

pub mod fixed;

use anchor_lang::prelude::*;

use crate::constants::MAX_RESERVE_RATIO;
use crate::errors::BondingTokenError;

/// Pricing seam used by the token state machine.
pub trait CurveEngine {
    /// Tokens minted for depositing `deposit_amount` of reserve.
    fn purchase_return(
        &self,
        supply: u64,
        reserve_balance: u64,
        reserve_ratio: u32,
        deposit_amount: u64,
    ) -> Result<u64>;

    /// Reserve released for burning `sell_amount` tokens.
    fn sale_return(
        &self,
        supply: u64,
        reserve_balance: u64,
        reserve_ratio: u32,
        sell_amount: u64,
    ) -> Result<u64>;
}

/// Fractional-power curve evaluated with fixed-point ln/exp. Holds no state.
#[derive(Clone, Copy, Debug, Default)]
pub struct PowerCurve;

impl PowerCurve {
    fn check_domain(supply: u64, reserve_balance: u64, reserve_ratio: u32) -> Result<()> {
        require!(
            reserve_ratio > 0 && reserve_ratio <= MAX_RESERVE_RATIO,
            BondingTokenError::InvalidReserveRatio
        );
        require!(supply > 0, BondingTokenError::DivisionByZero);
        require!(reserve_balance > 0, BondingTokenError::DivisionByZero);
        Ok(())
    }
}

impl CurveEngine for PowerCurve {
    fn purchase_return(
        &self,
        supply: u64,
        reserve_balance: u64,
        reserve_ratio: u32,
        deposit_amount: u64,
    ) -> Result<u64> {
        Self::check_domain(supply, reserve_balance, reserve_ratio)?;
        if deposit_amount == 0 {
            return Ok(0);
        }

        // ratio 1: price is flat at R / S
        if reserve_ratio == MAX_RESERVE_RATIO {
            return Ok(fixed::mul_div(supply, deposit_amount, reserve_balance)?);
        }

        let grown = reserve_balance as u128 + deposit_amount as u128;
        let exponent = fixed::mul_ratio(
            fixed::ln_ratio(grown, reserve_balance as u128)?,
            reserve_ratio as u64,
            MAX_RESERVE_RATIO as u64,
        )?;
        let growth = fixed::expm1(exponent)?;
        Ok(fixed::scale(supply, growth)?)
    }

    fn sale_return(
        &self,
        supply: u64,
        reserve_balance: u64,
        reserve_ratio: u32,
        sell_amount: u64,
    ) -> Result<u64> {
        Self::check_domain(supply, reserve_balance, reserve_ratio)?;
        require!(sell_amount <= supply, BondingTokenError::InvalidAmount);
        if sell_amount == 0 {
            return Ok(0);
        }
        if sell_amount == supply {
            return Ok(reserve_balance);
        }

        if reserve_ratio == MAX_RESERVE_RATIO {
            return Ok(fixed::mul_div(reserve_balance, sell_amount, supply)?);
        }

        // -ln(1 - a/S) = ln(S / (S - a))
        let exponent = fixed::mul_ratio(
            fixed::ln_ratio(supply as u128, (supply - sell_amount) as u128)?,
            MAX_RESERVE_RATIO as u64,
            reserve_ratio as u64,
        )?;
        let share = fixed::one_minus_exp_neg(exponent)?;
        Ok(fixed::scale(reserve_balance, share)?)
    }
}

#[cfg(all(test, not(target_arch = "bpf")))]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const CURVE: PowerCurve = PowerCurve;

    fn exact_purchase(supply: u64, reserve: u64, ratio: u32, deposit: u64) -> f64 {
        let r = ratio as f64 / MAX_RESERVE_RATIO as f64;
        supply as f64 * (r * (deposit as f64 / reserve as f64).ln_1p()).exp_m1()
    }

    fn exact_sale(supply: u64, reserve: u64, ratio: u32, amount: u64) -> f64 {
        let r = ratio as f64 / MAX_RESERVE_RATIO as f64;
        let l = (amount as f64 / (supply - amount) as f64).ln_1p();
        -(reserve as f64) * (-l / r).exp_m1()
    }

    // within 1e-6 relative plus one unit of truncation, never above exact
    fn assert_within_tolerance(got: u64, exact: f64) {
        let got = got as f64;
        assert!(got <= exact * (1.0 + 1e-12) + 1e-6, "overpaid: {got} > {exact}");
        assert!(exact - got <= exact * 1e-6 + 1.0, "too far below: {got} vs {exact}");
    }

    #[test]
    fn zero_amounts_return_zero() {
        assert_eq!(CURVE.purchase_return(1_000, 1_000, 500_000, 0).unwrap(), 0);
        assert_eq!(CURVE.sale_return(1_000, 1_000, 500_000, 0).unwrap(), 0);
    }

    #[test]
    fn selling_whole_supply_drains_reserve() {
        for ratio in [1, 100_000, 333_333, 500_000, 1_000_000] {
            assert_eq!(
                CURVE.sale_return(7_654_321, 1_234_567, ratio, 7_654_321).unwrap(),
                1_234_567
            );
        }
    }

    #[test]
    fn selling_almost_whole_supply_stays_below_reserve() {
        let got = CURVE
            .sale_return(1_000_000_000, 5_000_000_000, 200_000, 999_999_999)
            .unwrap();
        assert!(got < 5_000_000_000);
        assert!(got >= 4_999_999_000);
    }

    #[test]
    fn ratio_one_is_linear() {
        assert_eq!(
            CURVE.purchase_return(1_000_000, 2_000_000, 1_000_000, 500_000).unwrap(),
            250_000
        );
        assert_eq!(
            CURVE.sale_return(1_000_000, 2_000_000, 1_000_000, 250_000).unwrap(),
            500_000
        );
        // truncates
        assert_eq!(CURVE.purchase_return(3, 2, 1_000_000, 1).unwrap(), 1);
    }

    #[test]
    fn square_root_curve_matches_closed_form() {
        // r = 1/2: tokens = S * (sqrt(1 + d/R) - 1); (1 + 3)^(1/2) - 1 = 1
        assert_eq!(
            CURVE.purchase_return(1_000_000_000, 1_000_000, 500_000, 3_000_000).unwrap(),
            999_999_999
        );
        // selling the minted half back from S = 2e9 returns 3/4 of R = 4e6
        let back = CURVE
            .sale_return(2_000_000_000, 4_000_000, 500_000, 1_000_000_000)
            .unwrap();
        assert!(back <= 3_000_000 && back >= 2_999_999);
    }

    #[test]
    fn matches_reference_across_operating_range() {
        let supply = 1_000_000_000_000;
        let reserve = 100_000_000;
        for ratio in [50_000, 250_000, 333_333, 500_000, 900_000] {
            for deposit in [1, 99, 10_000, 1_000_000_000, 400_000_000_000] {
                let got = CURVE.purchase_return(supply, reserve, ratio, deposit).unwrap();
                assert_within_tolerance(got, exact_purchase(supply, reserve, ratio, deposit));
            }
            for amount in [1, 1_000, 1_000_000_000, 999_999_999_999] {
                let got = CURVE.sale_return(supply, reserve, ratio, amount).unwrap();
                assert_within_tolerance(got, exact_sale(supply, reserve, ratio, amount));
            }
        }
    }

    #[test]
    fn small_sale_from_steep_deep_curve_keeps_precision() {
        // a/S = 1e-15 at ratio 0.001 and 0.01
        for (supply, reserve, ratio, amount) in [
            (1_000_000_000_000_000_000, 100_000_000_000_000_000, 1_000, 1_000),
            (1_000_000_000_000_000_000, 500_000_000_000_000_000, 10_000, 10_000),
            (u64::MAX, u64::MAX, 1, 1),
        ] {
            let got = CURVE.sale_return(supply, reserve, ratio, amount).unwrap();
            assert_within_tolerance(got, exact_sale(supply, reserve, ratio, amount));
        }
        assert_eq!(
            CURVE
                .sale_return(1_000_000_000_000_000_000, 100_000_000_000_000_000, 1_000, 1_000)
                .unwrap(),
            99_999
        );
    }

    #[test]
    fn small_purchase_into_deep_reserve_keeps_precision() {
        for (supply, reserve, ratio, deposit) in [
            (u64::MAX, 1_000_000_000_000_000_000, 999_999, 1_000),
            (1_000_000_000_000_000_000, u64::MAX, 500_000, 1),
        ] {
            let got = CURVE.purchase_return(supply, reserve, ratio, deposit).unwrap();
            assert_within_tolerance(got, exact_purchase(supply, reserve, ratio, deposit));
        }
    }

    #[test]
    fn zero_supply_or_reserve_is_division_by_zero() {
        let err: Error = BondingTokenError::DivisionByZero.into();
        assert_eq!(CURVE.purchase_return(0, 10, 500_000, 1).unwrap_err(), err);
        assert_eq!(CURVE.purchase_return(10, 0, 500_000, 1).unwrap_err(), err);
        assert_eq!(CURVE.sale_return(10, 0, 500_000, 1).unwrap_err(), err);
        assert_eq!(CURVE.sale_return(0, 10, 500_000, 0).unwrap_err(), err);
    }

    #[test]
    fn ratio_outside_range_is_rejected() {
        let err: Error = BondingTokenError::InvalidReserveRatio.into();
        assert_eq!(CURVE.purchase_return(10, 10, 0, 1).unwrap_err(), err);
        assert_eq!(CURVE.sale_return(10, 10, 1_000_001, 1).unwrap_err(), err);
    }

    #[test]
    fn selling_more_than_supply_is_invalid() {
        assert_eq!(
            CURVE.sale_return(10, 10, 500_000, 11).unwrap_err(),
            BondingTokenError::InvalidAmount.into()
        );
    }

    #[test]
    fn oversized_purchase_reports_overflow() {
        assert_eq!(
            CURVE
                .purchase_return(u64::MAX, 1, 500_000, u64::MAX / 2)
                .unwrap_err(),
            BondingTokenError::Overflow.into()
        );
        assert_eq!(
            CURVE
                .purchase_return(u64::MAX / 2, 1, 1_000_000, 4)
                .unwrap_err(),
            BondingTokenError::Overflow.into()
        );
    }

    proptest! {
        #[test]
        fn purchase_is_monotonic(
            supply in 1u64..1_000_000_000_000_000,
            reserve in 1u64..10_000_000_000_000,
            ratio in 1u32..=1_000_000,
            deposit in 0u64..1_000_000_000_000,
            extra in 1u64..1_000_000_000,
        ) {
            let lo = CURVE.purchase_return(supply, reserve, ratio, deposit);
            let hi = CURVE.purchase_return(supply, reserve, ratio, deposit + extra);
            if let (Ok(lo), Ok(hi)) = (lo, hi) {
                prop_assert!(hi >= lo);
            }
        }

        #[test]
        fn sale_is_monotonic_and_bounded(
            supply in 2u64..1_000_000_000_000_000,
            reserve in 1u64..10_000_000_000_000,
            ratio in 1u32..=1_000_000,
            seed in any::<u64>(),
        ) {
            let lo = seed % supply;
            let hi = lo + 1 + (seed >> 7) % (supply - lo);
            let lo_out = CURVE.sale_return(supply, reserve, ratio, lo).unwrap();
            let hi_out = CURVE.sale_return(supply, reserve, ratio, hi).unwrap();
            prop_assert!(hi_out >= lo_out);
            prop_assert!(hi_out <= reserve);
        }

        #[test]
        fn purchase_never_overpays(
            supply in 1_000u64..=u64::MAX,
            reserve in 1_000u64..=u64::MAX,
            ratio in 1u32..1_000_000,
            deposit in prop_oneof![1u64..1_000_000, 1u64..=u64::MAX],
        ) {
            if let Ok(got) = CURVE.purchase_return(supply, reserve, ratio, deposit) {
                let exact = exact_purchase(supply, reserve, ratio, deposit);
                prop_assert!(got as f64 <= exact * (1.0 + 1e-12) + 1e-6);
                prop_assert!(exact - got as f64 <= exact * 1e-6 + 1.0);
            }
        }

        #[test]
        fn sale_never_overpays(
            supply in 1_000u64..=u64::MAX,
            reserve in 1_000u64..=u64::MAX,
            ratio in 1u32..1_000_000,
            seed in any::<u64>(),
            small in any::<bool>(),
        ) {
            let span = if small { (supply - 1).min(1_000_000) } else { supply - 1 };
            let amount = 1 + seed % span;
            let got = CURVE.sale_return(supply, reserve, ratio, amount).unwrap();
            let exact = exact_sale(supply, reserve, ratio, amount);
            prop_assert!(got as f64 <= exact * (1.0 + 1e-12) + 1e-6);
            prop_assert!(exact - got as f64 <= exact * 1e-6 + 1.0);
        }
    }
}
