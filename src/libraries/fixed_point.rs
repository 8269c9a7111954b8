//! Q64.64 fixed-point scale shared by sqrt-price and every growth accumulator.

pub const RESOLUTION: u8 = 64;
pub const Q64: u128 = (u64::MAX as u128) + 1;
