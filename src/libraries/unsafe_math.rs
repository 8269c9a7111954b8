//! Division that rounds toward positive infinity. Named after the teacher's
//! `UnsafeMathTrait`: "unsafe" because it panics on a zero divisor instead of
//! returning a `Result`, which is fine for call sites that have already
//! proven the divisor non-zero.

use super::big_num::U256;

pub trait UnsafeMathTrait {
    fn div_rounding_up(self, other: Self) -> Self;
}

impl UnsafeMathTrait for u64 {
    fn div_rounding_up(self, other: Self) -> Self {
        let quotient = self / other;
        let remainder = self % other;
        if remainder == 0 {
            quotient
        } else {
            quotient + 1
        }
    }
}

impl UnsafeMathTrait for u128 {
    fn div_rounding_up(self, other: Self) -> Self {
        let quotient = self / other;
        let remainder = self % other;
        if remainder == 0 {
            quotient
        } else {
            quotient + 1
        }
    }
}

impl UnsafeMathTrait for U256 {
    fn div_rounding_up(self, other: Self) -> Self {
        let quotient = self / other;
        let remainder = self % other;
        if remainder.is_zero() {
            quotient
        } else {
            quotient + U256::from(1u32)
        }
    }
}
