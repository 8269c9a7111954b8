//! Overflow-resistant `val * num / denom` with explicit rounding mode.
//!
//! Adapted from the teacher's `libraries/full_math.rs`, which wraps a
//! Solana-friendly `U128` newtype; this crate targets a plain Rust `u128` so
//! the widening step goes straight to `U256`/`U512` and narrows back.
//!
//! `floor` is used for growth accrual and amount-out (§6); `ceil` is used for
//! fee splits and amount-in rounded against the user.

use super::big_num::{U256, U512};

pub trait MulDiv<RHS = Self> {
    type Output;

    /// `floor(self * num / denom)`. `None` only if the true result doesn't
    /// fit `Self::Output`.
    fn mul_div_floor(self, num: RHS, denom: RHS) -> Option<Self::Output>;

    /// `ceil(self * num / denom)`.
    fn mul_div_ceil(self, num: RHS, denom: RHS) -> Option<Self::Output>;
}

impl MulDiv for u64 {
    type Output = u64;

    fn mul_div_floor(self, num: Self, denom: Self) -> Option<Self::Output> {
        assert_ne!(denom, 0);
        let r = (U256::from(self) * U256::from(num)) / U256::from(denom);
        if r > U256::from(u64::MAX) {
            None
        } else {
            Some(r.as_u64())
        }
    }

    fn mul_div_ceil(self, num: Self, denom: Self) -> Option<Self::Output> {
        assert_ne!(denom, 0);
        let r = (U256::from(self) * U256::from(num) + U256::from(denom - 1)) / U256::from(denom);
        if r > U256::from(u64::MAX) {
            None
        } else {
            Some(r.as_u64())
        }
    }
}

impl MulDiv for u128 {
    type Output = u128;

    fn mul_div_floor(self, num: Self, denom: Self) -> Option<Self::Output> {
        assert_ne!(denom, 0);
        let r = (U256::from(self) * U256::from(num)) / U256::from(denom);
        if r > U256::from(u128::MAX) {
            None
        } else {
            Some(r.as_u128())
        }
    }

    fn mul_div_ceil(self, num: Self, denom: Self) -> Option<Self::Output> {
        assert_ne!(denom, 0);
        let r =
            (U256::from(self) * U256::from(num) + U256::from(denom - 1)) / U256::from(denom);
        if r > U256::from(u128::MAX) {
            None
        } else {
            Some(r.as_u128())
        }
    }
}

impl MulDiv for U256 {
    type Output = U256;

    fn mul_div_floor(self, num: Self, denom: Self) -> Option<Self::Output> {
        assert_ne!(denom, U256::zero());
        let r = (as_u512(self) * as_u512(num)) / as_u512(denom);
        if r > as_u512(U256::MAX) {
            None
        } else {
            Some(as_u256(r))
        }
    }

    fn mul_div_ceil(self, num: Self, denom: Self) -> Option<Self::Output> {
        assert_ne!(denom, U256::zero());
        let r = (as_u512(self) * as_u512(num) + as_u512(denom - 1)) / as_u512(denom);
        if r > as_u512(U256::MAX) {
            None
        } else {
            Some(as_u256(r))
        }
    }
}

fn as_u512(v: U256) -> U512 {
    U512([v.0[0], v.0[1], v.0[2], v.0[3], 0, 0, 0, 0])
}

fn as_u256(v: U512) -> U256 {
    U256([v.0[0], v.0[1], v.0[2], v.0[3]])
}

/// Saturate a widened intermediate down to `u64`, used when a growth
/// quantity is known to have already been bounded by a checked token
/// balance and must never actually overflow `u64` in practice.
pub fn u256_to_underflow_u64(v: U256) -> u64 {
    if v < U256::from(u64::MAX) {
        v.as_u64()
    } else {
        0
    }
}
