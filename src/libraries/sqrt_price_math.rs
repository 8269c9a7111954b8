//! Next-sqrt-price and amount-delta formulas (Uniswap v3 §6.29-6.30),
//! ported from the teacher's `libraries/sqrt_price_math.rs`.

use crate::error::{PoolError, PoolResult};
use super::big_num::U256;
use super::fixed_point::{self, Q64};
use super::full_math::MulDiv;
use super::tick_math;
use super::unsafe_math::UnsafeMathTrait;

/// `√P' = √P * L / (L + Δx * √P)`, always rounded up.
///
/// Exact-input token-0-in moves price down without overshooting the target;
/// exact-output token-0-out moves price up to guarantee the output is met.
pub fn get_next_sqrt_price_from_amount_0_rounding_up(
    sqrt_p_x64: u128,
    liquidity: u128,
    amount: u64,
    add: bool,
) -> PoolResult<u128> {
    if amount == 0 {
        return Ok(sqrt_p_x64);
    }
    let numerator_1 = U256::from(liquidity) << fixed_point::RESOLUTION;

    if add {
        let product = U256::from(amount) * U256::from(sqrt_p_x64);
        let denominator = numerator_1 + product;
        if denominator >= numerator_1 {
            return numerator_1
                .mul_div_ceil(U256::from(sqrt_p_x64), denominator)
                .map(|v| v.as_u128())
                .ok_or(PoolError::AmountOutOverflow);
        }
        let denom = (numerator_1 / U256::from(sqrt_p_x64)) + U256::from(amount);
        Ok(numerator_1.div_rounding_up(denom).as_u128())
    } else {
        let product = U256::from(amount) * U256::from(sqrt_p_x64);
        if numerator_1 <= product {
            return Err(PoolError::AmountInOverflow);
        }
        let denominator = numerator_1 - product;
        numerator_1
            .mul_div_ceil(U256::from(sqrt_p_x64), denominator)
            .map(|v| v.as_u128())
            .ok_or(PoolError::AmountOutOverflow)
    }
}

/// `√P' = √P + Δy / L`, always rounded down.
pub fn get_next_sqrt_price_from_amount_1_rounding_down(
    sqrt_p_x64: u128,
    liquidity: u128,
    amount: u64,
    add: bool,
) -> PoolResult<u128> {
    if add {
        let quotient = (U256::from(amount) << fixed_point::RESOLUTION) / U256::from(liquidity);
        sqrt_p_x64
            .checked_add(quotient.as_u128())
            .ok_or(PoolError::AmountOutOverflow)
    } else {
        let quotient = (U256::from(amount) << fixed_point::RESOLUTION)
            .div_rounding_up(U256::from(liquidity));
        let quotient = quotient.as_u128();
        if sqrt_p_x64 <= quotient {
            return Err(PoolError::InsufficientLiquidity);
        }
        Ok(sqrt_p_x64 - quotient)
    }
}

pub fn get_next_sqrt_price_from_input(
    sqrt_p_x64: u128,
    liquidity: u128,
    amount_in: u64,
    zero_for_one: bool,
) -> PoolResult<u128> {
    if sqrt_p_x64 == 0 || liquidity == 0 {
        return Err(PoolError::ZeroLiquidity);
    }
    if zero_for_one {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_p_x64, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_p_x64, liquidity, amount_in, true)
    }
}

pub fn get_next_sqrt_price_from_output(
    sqrt_p_x64: u128,
    liquidity: u128,
    amount_out: u64,
    zero_for_one: bool,
) -> PoolResult<u128> {
    if sqrt_p_x64 == 0 || liquidity == 0 {
        return Err(PoolError::ZeroLiquidity);
    }
    if zero_for_one {
        get_next_sqrt_price_from_amount_1_rounding_down(sqrt_p_x64, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount_0_rounding_up(sqrt_p_x64, liquidity, amount_out, false)
    }
}

/// `Δx = L * (√P_upper - √P_lower) / (√P_upper * √P_lower)`.
pub fn get_amount_0_delta_unsigned(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> PoolResult<u64> {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    if sqrt_ratio_a_x64 == 0 {
        return Err(PoolError::InvalidPriceLimit);
    }

    let numerator_1 = U256::from(liquidity) << fixed_point::RESOLUTION;
    let numerator_2 = U256::from(sqrt_ratio_b_x64 - sqrt_ratio_a_x64);

    let amount = if round_up {
        let inner = numerator_1
            .mul_div_ceil(numerator_2, U256::from(sqrt_ratio_b_x64))
            .ok_or(PoolError::AmountInOverflow)?;
        inner.div_rounding_up(U256::from(sqrt_ratio_a_x64))
    } else {
        let inner = numerator_1
            .mul_div_floor(numerator_2, U256::from(sqrt_ratio_b_x64))
            .ok_or(PoolError::AmountInOverflow)?;
        inner / U256::from(sqrt_ratio_a_x64)
    };
    if amount > U256::from(u64::MAX) {
        return Err(PoolError::AmountInOverflow);
    }
    Ok(amount.as_u64())
}

/// `Δy = L * (√P_upper - √P_lower)`.
pub fn get_amount_1_delta_unsigned(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> PoolResult<u64> {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    let delta = sqrt_ratio_b_x64 - sqrt_ratio_a_x64;
    let amount = if round_up {
        liquidity.mul_div_ceil(delta, Q64)
    } else {
        liquidity.mul_div_floor(delta, Q64)
    }
    .ok_or(PoolError::AmountInOverflow)?;
    u64::try_from(amount).map_err(|_| PoolError::AmountInOverflow)
}

pub fn get_amount_0_delta_signed(
    sqrt_ratio_a_x64: u128,
    sqrt_ratio_b_x64: u128,
    liquidity: i128,
) -> PoolResult<i64> {
    if liquidity < 0 {
        let unsigned =
            get_amount_0_delta_unsigned(sqrt_ratio_a_x64, sqrt_ratio_b_x64, -liquidity as u128, false)?;
        Ok(-(unsigned as i64))
    } else {
        let unsigned =
            get_amount_0_delta_unsigned(sqrt_ratio_a_x64, sqrt_ratio_b_x64, liquidity as u128, true)?;
        i64::try_from(unsigned).map_err(|_| PoolError::AmountInOverflow)
    }
}

pub fn get_amount_1_delta_signed(
    sqrt_ratio_a_x64: u128,
    sqrt_ratio_b_x64: u128,
    liquidity: i128,
) -> PoolResult<i64> {
    if liquidity < 0 {
        let unsigned =
            get_amount_1_delta_unsigned(sqrt_ratio_a_x64, sqrt_ratio_b_x64, -liquidity as u128, false)?;
        Ok(-(unsigned as i64))
    } else {
        let unsigned =
            get_amount_1_delta_unsigned(sqrt_ratio_a_x64, sqrt_ratio_b_x64, liquidity as u128, true)?;
        i64::try_from(unsigned).map_err(|_| PoolError::AmountInOverflow)
    }
}

/// Token amounts owed/returned for a liquidity delta applied at `tick_current`
/// to a position spanning `[tick_lower, tick_upper)`.
pub fn get_amounts_delta_signed(
    tick_current: i32,
    tick_lower: i32,
    tick_upper: i32,
    liquidity_delta: i128,
) -> PoolResult<(i64, i64)> {
    let mut amount_0 = 0i64;
    let mut amount_1 = 0i64;
    if tick_current < tick_lower {
        amount_0 = get_amount_0_delta_signed(
            tick_math::get_sqrt_price_at_tick(tick_lower)?,
            tick_math::get_sqrt_price_at_tick(tick_upper)?,
            liquidity_delta,
        )?;
    } else if tick_current < tick_upper {
        amount_0 = get_amount_0_delta_signed(
            tick_math::get_sqrt_price_at_tick(tick_current)?,
            tick_math::get_sqrt_price_at_tick(tick_upper)?,
            liquidity_delta,
        )?;
        amount_1 = get_amount_1_delta_signed(
            tick_math::get_sqrt_price_at_tick(tick_lower)?,
            tick_math::get_sqrt_price_at_tick(tick_current)?,
            liquidity_delta,
        )?;
    } else {
        amount_1 = get_amount_1_delta_signed(
            tick_math::get_sqrt_price_at_tick(tick_lower)?,
            tick_math::get_sqrt_price_at_tick(tick_upper)?,
            liquidity_delta,
        )?;
    }
    Ok((amount_0, amount_1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_1_delta_round_trip() {
        let lo = tick_math::get_sqrt_price_at_tick(-60).unwrap();
        let hi = tick_math::get_sqrt_price_at_tick(60).unwrap();
        let down = get_amount_1_delta_unsigned(lo, hi, 1_000_000, false).unwrap();
        let up = get_amount_1_delta_unsigned(lo, hi, 1_000_000, true).unwrap();
        assert!(up >= down);
    }

    #[test]
    fn zero_amount_is_noop() {
        let p = 1u128 << 64;
        assert_eq!(
            get_next_sqrt_price_from_amount_0_rounding_up(p, 1_000_000, 0, true).unwrap(),
            p
        );
    }
}
