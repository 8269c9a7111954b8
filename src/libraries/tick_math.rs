//! Tick index <-> sqrt-price bijection, tabulated via `1.0001^(tick/2)`.
//!
//! Ported from the teacher's `libraries/tick_math.rs`. The teacher represents
//! the Q64.64 intermediate with its own `U128` newtype (needed on Solana,
//! where native `u128` has alignment cost inside zero-copy accounts); this
//! crate has no such constraint, so the whole computation runs on native
//! `u128`, widening into `U256` only where a multiply would overflow it.

use crate::error::{PoolError, PoolResult};
use super::big_num::U256;

pub const MIN_TICK: i32 = -307_200;
pub const MAX_TICK: i32 = -MIN_TICK;

/// `get_sqrt_price_at_tick(MIN_TICK)`.
pub const MIN_SQRT_PRICE_X64: u128 = 3_939_943_522_091;
/// `get_sqrt_price_at_tick(MAX_TICK)`.
pub const MAX_SQRT_PRICE_X64: u128 = 86_367_321_006_760_116_002_434_269;

const BIT_PRECISION: u32 = 16;

pub fn min_tick() -> i32 {
    MIN_TICK
}

pub fn max_tick() -> i32 {
    MAX_TICK
}

pub fn min_sqrt_price() -> u128 {
    MIN_SQRT_PRICE_X64
}

pub fn max_sqrt_price() -> u128 {
    MAX_SQRT_PRICE_X64
}

/// `1.0001^(tick/2)` as a Q64.64 number. Each magic factor below is
/// `2^64 / 1.0001^(2^(i-1))` for `i` in `[0, 18)`.
pub fn get_sqrt_price_at_tick(tick: i32) -> PoolResult<u128> {
    let abs_tick = tick.unsigned_abs();
    if abs_tick > MAX_TICK as u32 {
        return Err(PoolError::InvalidTickRange);
    }

    let mut ratio: U256 = if abs_tick & 0x1 != 0 {
        U256::from(0xfffcb933bd6fb800u64)
    } else {
        U256::from(1u128 << 64)
    };
    macro_rules! step {
        ($mask:expr, $factor:expr) => {
            if abs_tick & $mask != 0 {
                ratio = (ratio * U256::from($factor as u64)) >> 64;
            }
        };
    }
    step!(0x2, 0xfff97272373d4000u64);
    step!(0x4, 0xfff2e50f5f657000u64);
    step!(0x8, 0xffe5caca7e10f000u64);
    step!(0x10, 0xffcb9843d60f7000u64);
    step!(0x20, 0xff973b41fa98e800u64);
    step!(0x40, 0xff2ea16466c9b000u64);
    step!(0x80, 0xfe5dee046a9a3800u64);
    step!(0x100, 0xfcbe86c7900bb000u64);
    step!(0x200, 0xf987a7253ac65800u64);
    step!(0x400, 0xf3392b0822bb6000u64);
    step!(0x800, 0xe7159475a2caf000u64);
    step!(0x1000, 0xd097f3bdfd2f2000u64);
    step!(0x2000, 0xa9f746462d9f8000u64);
    step!(0x4000, 0x70d869a156f31c00u64);
    step!(0x8000, 0x31be135f97ed3200u64);
    step!(0x10000, 0x9aa508b5b85a500u64);
    step!(0x20000, 0x5d6af8dedc582cu64);
    step!(0x40000, 0x2216e584f5fau64);

    if tick > 0 {
        ratio = U256::from(u128::MAX) / ratio;
    }

    Ok(ratio.as_u128())
}

/// Greatest tick such that `get_sqrt_price_at_tick(tick) <= sqrt_price_x64`.
pub fn get_tick_at_sqrt_price(sqrt_price_x64: u128) -> PoolResult<i32> {
    if sqrt_price_x64 < MIN_SQRT_PRICE_X64 || sqrt_price_x64 >= MAX_SQRT_PRICE_X64 {
        return Err(PoolError::InvalidPriceLimit);
    }

    let msb: u32 = 128 - sqrt_price_x64.leading_zeros() - 1;
    let log2p_integer_x32 = (i128::from(msb) - 64) << 32;

    let mut bit: i128 = 0x8000_0000_0000_0000i128;
    let mut precision = 0;
    let mut log2p_fraction_x64: i128 = 0;

    let mut r: u128 = if msb >= 64 {
        sqrt_price_x64 >> (msb - 63)
    } else {
        sqrt_price_x64 << (63 - msb)
    };

    while bit > 0 && precision < BIT_PRECISION {
        r *= r;
        let is_r_more_than_two = u32::try_from(r >> 127).unwrap();
        r >>= 63 + is_r_more_than_two;
        log2p_fraction_x64 += bit * i128::from(is_r_more_than_two);
        bit >>= 1;
        precision += 1;
    }
    let log2p_fraction_x32 = log2p_fraction_x64 >> 32;
    let log2p_x32 = log2p_integer_x32 + log2p_fraction_x32;

    let log_sqrt_10001_x64 = log2p_x32 * 59_543_866_431_248i128;

    let tick_low = i32::try_from((log_sqrt_10001_x64 - 184_467_440_737_095_516i128) >> 64).unwrap();
    let tick_high =
        i32::try_from((log_sqrt_10001_x64 + 15_793_534_762_490_258_745i128) >> 64).unwrap();

    Ok(if tick_low == tick_high {
        tick_low
    } else if get_sqrt_price_at_tick(tick_high)? <= sqrt_price_x64 {
        tick_high
    } else {
        tick_low
    })
}
