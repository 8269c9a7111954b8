//! Single-tick-range swap step, ported from the teacher's
//! `libraries/swap_math.rs`, plus the multi-destination fee split the
//! teacher's two-way (protocol/fund) model doesn't need.

use super::full_math::MulDiv;
use super::sqrt_price_math;
use crate::constants::{FEE_RATE_DENOM, UNSTAKED_FEE_DENOM};
use crate::error::{PoolError, PoolResult};

#[derive(Default, Debug, Clone, Copy)]
pub struct SwapStep {
    pub sqrt_ratio_next_x64: u128,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
}

/// Solves one Uniswap-v3 swap step: how far price moves under constant
/// `liquidity` before either the target price or `amount_remaining` is
/// exhausted, plus the gross fee taken from the input side.
///
/// `amount_remaining >= 0` means exact-input; `< 0` means exact-output
/// (the teacher's own sign convention, preserved here).
pub fn compute_swap_step(
    sqrt_ratio_current_x64: u128,
    sqrt_ratio_target_x64: u128,
    liquidity: u128,
    amount_remaining: i64,
    fee_rate: u32,
) -> PoolResult<SwapStep> {
    let zero_for_one = sqrt_ratio_current_x64 >= sqrt_ratio_target_x64;
    let exact_in = amount_remaining >= 0;
    let mut step = SwapStep::default();

    if exact_in {
        let amount_remaining_less_fee = (amount_remaining as u64)
            .mul_div_floor((FEE_RATE_DENOM - fee_rate) as u64, FEE_RATE_DENOM as u64)
            .ok_or(PoolError::AmountInOverflow)?;
        step.amount_in = if zero_for_one {
            sqrt_price_math::get_amount_0_delta_unsigned(
                sqrt_ratio_target_x64,
                sqrt_ratio_current_x64,
                liquidity,
                true,
            )?
        } else {
            sqrt_price_math::get_amount_1_delta_unsigned(
                sqrt_ratio_current_x64,
                sqrt_ratio_target_x64,
                liquidity,
                true,
            )?
        };
        step.sqrt_ratio_next_x64 = if amount_remaining_less_fee >= step.amount_in {
            sqrt_ratio_target_x64
        } else {
            sqrt_price_math::get_next_sqrt_price_from_input(
                sqrt_ratio_current_x64,
                liquidity,
                amount_remaining_less_fee,
                zero_for_one,
            )?
        };
    } else {
        step.amount_out = if zero_for_one {
            sqrt_price_math::get_amount_1_delta_unsigned(
                sqrt_ratio_target_x64,
                sqrt_ratio_current_x64,
                liquidity,
                false,
            )?
        } else {
            sqrt_price_math::get_amount_0_delta_unsigned(
                sqrt_ratio_current_x64,
                sqrt_ratio_target_x64,
                liquidity,
                false,
            )?
        };
        step.sqrt_ratio_next_x64 = if (-amount_remaining as u64) >= step.amount_out {
            sqrt_ratio_target_x64
        } else {
            sqrt_price_math::get_next_sqrt_price_from_output(
                sqrt_ratio_current_x64,
                liquidity,
                -amount_remaining as u64,
                zero_for_one,
            )?
        };
    }

    let max = sqrt_ratio_target_x64 == step.sqrt_ratio_next_x64;
    if zero_for_one {
        if !(max && exact_in) {
            step.amount_in = sqrt_price_math::get_amount_0_delta_unsigned(
                step.sqrt_ratio_next_x64,
                sqrt_ratio_current_x64,
                liquidity,
                true,
            )?;
        }
        if !(max && !exact_in) {
            step.amount_out = sqrt_price_math::get_amount_1_delta_unsigned(
                step.sqrt_ratio_next_x64,
                sqrt_ratio_current_x64,
                liquidity,
                false,
            )?;
        }
    } else {
        if !(max && exact_in) {
            step.amount_in = sqrt_price_math::get_amount_1_delta_unsigned(
                sqrt_ratio_current_x64,
                step.sqrt_ratio_next_x64,
                liquidity,
                true,
            )?;
        }
        if !(max && !exact_in) {
            step.amount_out = sqrt_price_math::get_amount_0_delta_unsigned(
                sqrt_ratio_current_x64,
                step.sqrt_ratio_next_x64,
                liquidity,
                false,
            )?;
        }
    }

    if !exact_in && step.amount_out > (-amount_remaining as u64) {
        step.amount_out = -amount_remaining as u64;
    }

    step.fee_amount = if exact_in && step.sqrt_ratio_next_x64 != sqrt_ratio_target_x64 {
        // target not reached: the dust between remaining and amount_in is granted as fee
        (amount_remaining as u64)
            .checked_sub(step.amount_in)
            .ok_or(PoolError::InsufficientAmount)?
    } else {
        step.amount_in
            .mul_div_ceil(fee_rate as u64, (FEE_RATE_DENOM - fee_rate) as u64)
            .ok_or(PoolError::FeeAmountOverflow)?
    };

    Ok(step)
}

/// One step's gross fee, split ref -> protocol -> gauge -> lp, per the
/// ordered rule in the swap engine's fee-distribution stage. Each cut uses
/// `mul_div_ceil` so the sum of the four legs never exceeds `fee`.
pub struct FeeSplit {
    pub ref_fee: u64,
    pub protocol_fee: u64,
    pub gauge_fee: u64,
    pub lp_fee: u64,
}

pub fn split_fee(
    fee: u64,
    ref_fee_rate: u32,
    protocol_fee_rate: u32,
    unstaked_fee_rate: u32,
    active_liquidity: u128,
    staked_liquidity: u128,
) -> PoolResult<FeeSplit> {
    let ref_fee = fee
        .mul_div_ceil(ref_fee_rate as u64, FEE_RATE_DENOM as u64)
        .ok_or(PoolError::InvalidRefFeeAmount)?;
    let remaining_fee = fee.checked_sub(ref_fee).ok_or(PoolError::InvalidRefFeeAmount)?;

    let protocol_fee = remaining_fee
        .mul_div_ceil(protocol_fee_rate as u64, FEE_RATE_DENOM as u64)
        .ok_or(PoolError::FeeAmountOverflow)?;
    let after_protocol = remaining_fee
        .checked_sub(protocol_fee)
        .ok_or(PoolError::FeeAmountOverflow)?;

    let gauge_fee = if active_liquidity == 0 {
        0
    } else if staked_liquidity >= active_liquidity {
        after_protocol
    } else if staked_liquidity > 0 {
        let staked_attributable = (after_protocol as u128)
            .mul_div_ceil(staked_liquidity, active_liquidity)
            .unwrap_or(after_protocol as u128);
        let staked_attributable = u64::try_from(staked_attributable).unwrap_or(after_protocol);
        staked_attributable
            .mul_div_ceil(unstaked_fee_rate as u64, UNSTAKED_FEE_DENOM as u64)
            .ok_or(PoolError::FeeAmountOverflow)?
    } else {
        after_protocol
            .mul_div_ceil(unstaked_fee_rate as u64, UNSTAKED_FEE_DENOM as u64)
            .ok_or(PoolError::FeeAmountOverflow)?
    };
    let lp_fee = after_protocol
        .checked_sub(gauge_fee)
        .ok_or(PoolError::FeeAmountOverflow)?;

    Ok(FeeSplit { ref_fee, protocol_fee, gauge_fee, lp_fee })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_split_sums_to_total() {
        let split = split_fee(1000, 100_000, 120_000, 500_000, 1_000_000, 400_000).unwrap();
        assert!(split.ref_fee + split.protocol_fee + split.gauge_fee + split.lp_fee <= 1000);
    }

    #[test]
    fn full_gauge_fee_when_fully_staked() {
        let split = split_fee(1000, 0, 0, 500_000, 1_000_000, 1_000_000).unwrap();
        assert_eq!(split.gauge_fee, 1000);
        assert_eq!(split.lp_fee, 0);
    }

    #[test]
    fn no_gauge_fee_without_liquidity() {
        let split = split_fee(1000, 0, 0, 500_000, 0, 0).unwrap();
        assert_eq!(split.gauge_fee, 0);
        assert_eq!(split.lp_fee, 1000);
    }
}
