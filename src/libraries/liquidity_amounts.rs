//! Converts between token amounts and liquidity at a given price range,
//! ported from the teacher's `libraries/liquidity_amounts.rs` (Uniswap v3
//! formulae 6.29/6.30).

use super::fixed_point::Q64;
use super::full_math::MulDiv;
use super::unsafe_math::UnsafeMathTrait;

/// `ΔL = Δx * (√P_upper * √P_lower) / (√P_upper - √P_lower)`.
pub fn get_liquidity_for_amount_0(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    amount_0: u64,
) -> u128 {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    let intermediate = sqrt_ratio_a_x64
        .mul_div_floor(sqrt_ratio_b_x64, Q64)
        .unwrap();
    (amount_0 as u128)
        .mul_div_floor(intermediate, sqrt_ratio_b_x64 - sqrt_ratio_a_x64)
        .unwrap()
}

/// `ΔL = Δy / (√P_upper - √P_lower)`.
pub fn get_liquidity_for_amount_1(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    amount_1: u64,
) -> u128 {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    (amount_1 as u128)
        .mul_div_floor(Q64, sqrt_ratio_b_x64 - sqrt_ratio_a_x64)
        .unwrap()
}

/// Max liquidity obtainable for a given `(amount_0, amount_1)` at the
/// current price within `[sqrt_ratio_a_x64, sqrt_ratio_b_x64]`.
pub fn get_liquidity_for_amounts(
    sqrt_ratio_x64: u128,
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    amount_0: u64,
    amount_1: u64,
) -> u128 {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    if sqrt_ratio_x64 <= sqrt_ratio_a_x64 {
        get_liquidity_for_amount_0(sqrt_ratio_a_x64, sqrt_ratio_b_x64, amount_0)
    } else if sqrt_ratio_x64 < sqrt_ratio_b_x64 {
        u128::min(
            get_liquidity_for_amount_0(sqrt_ratio_x64, sqrt_ratio_b_x64, amount_0),
            get_liquidity_for_amount_1(sqrt_ratio_a_x64, sqrt_ratio_x64, amount_1),
        )
    } else {
        get_liquidity_for_amount_1(sqrt_ratio_a_x64, sqrt_ratio_b_x64, amount_1)
    }
}

/// `Δx = ΔL * (1/√P_lower - 1/√P_upper)`.
pub fn get_amount_0_for_liquidity(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> u64 {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    let numerator = (liquidity << 64)
        .mul_div_floor(sqrt_ratio_b_x64 - sqrt_ratio_a_x64, sqrt_ratio_b_x64)
        .unwrap();
    if round_up {
        numerator.div_rounding_up(sqrt_ratio_a_x64) as u64
    } else {
        (numerator / sqrt_ratio_a_x64) as u64
    }
}

/// `Δy = ΔL * (√P_upper - √P_lower)`.
pub fn get_amount_1_for_liquidity(
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> u64 {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    let delta = sqrt_ratio_b_x64 - sqrt_ratio_a_x64;
    if round_up {
        liquidity.mul_div_ceil(delta, Q64).unwrap() as u64
    } else {
        liquidity.mul_div_floor(delta, Q64).unwrap() as u64
    }
}

/// Both token amounts represented by `liquidity` at `sqrt_ratio_x64` within
/// `[sqrt_ratio_a_x64, sqrt_ratio_b_x64]`. `round_up` selects whether each
/// side rounds against the depositor (add) or in their favor (remove).
pub fn get_amounts_for_liquidity(
    sqrt_ratio_x64: u128,
    mut sqrt_ratio_a_x64: u128,
    mut sqrt_ratio_b_x64: u128,
    liquidity: u128,
    round_up: bool,
) -> (u64, u64) {
    if sqrt_ratio_a_x64 > sqrt_ratio_b_x64 {
        std::mem::swap(&mut sqrt_ratio_a_x64, &mut sqrt_ratio_b_x64);
    }
    if sqrt_ratio_x64 <= sqrt_ratio_a_x64 {
        (get_amount_0_for_liquidity(sqrt_ratio_a_x64, sqrt_ratio_b_x64, liquidity, round_up), 0)
    } else if sqrt_ratio_x64 < sqrt_ratio_b_x64 {
        (
            get_amount_0_for_liquidity(sqrt_ratio_x64, sqrt_ratio_b_x64, liquidity, round_up),
            get_amount_1_for_liquidity(sqrt_ratio_a_x64, sqrt_ratio_x64, liquidity, round_up),
        )
    } else {
        (0, get_amount_1_for_liquidity(sqrt_ratio_a_x64, sqrt_ratio_b_x64, liquidity, round_up))
    }
}
