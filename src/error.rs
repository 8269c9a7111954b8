//! Closed error taxonomy for the pool core.
//!
//! The teacher defines its error enum with `#[anchor_lang::error_code]`,
//! which stamps each variant with a stable numeric code derived from
//! declaration order plus a fixed Anchor offset. There's no Anchor here, so
//! `code()` is written out explicitly instead of relying on enum-discriminant
//! order, which keeps the kind <-> code mapping stable even if a variant is
//! ever reordered.

use thiserror::Error;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    #[error("amount must be non-zero")]
    ZeroAmount,
    #[error("liquidity must be non-zero")]
    ZeroLiquidity,
    #[error("swap produced zero output")]
    ZeroOutputAmount,
    #[error("insufficient amount")]
    InsufficientAmount,
    #[error("insufficient liquidity")]
    InsufficientLiquidity,
    #[error("insufficient staked liquidity")]
    InsufficientStakedLiquidity,
    #[error("liquidity addition would overflow")]
    LiquidityAdditionOverflow,
    #[error("amount_in overflow")]
    AmountInOverflow,
    #[error("amount_out overflow")]
    AmountOutOverflow,
    #[error("fee amount overflow")]
    FeeAmountOverflow,
    #[error("invalid fee rate")]
    InvalidFeeRate,
    #[error("invalid referral fee rate")]
    InvalidRefFeeRate,
    #[error("invalid referral fee amount")]
    InvalidRefFeeAmount,
    #[error("invalid sqrt price limit")]
    InvalidPriceLimit,
    #[error("invalid tick range")]
    InvalidTickRange,
    #[error("invalid emission sync time")]
    InvalidSyncEmissionTime,
    #[error("invalid gauge capability")]
    InvalidGaugeCap,
    #[error("pool id mismatch")]
    PoolIdMismatch,
    #[error("partner id mismatch")]
    PartnerIdMismatch,
    #[error("partner id must be empty")]
    PartnerIdNotEmpty,
    #[error("position does not belong to this pool")]
    PositionPoolIdMismatch,
    #[error("position is staked")]
    PositionIsStaked,
    #[error("position is already staked")]
    StakeAlreadyStaked,
    #[error("position is not staked")]
    UnstakeNotStaked,
    #[error("pool is paused")]
    PoolPaused,
    #[error("pool is already paused")]
    PoolAlreadyPaused,
    #[error("pool is not paused")]
    PoolNotPaused,
    #[error("no next initialized tick")]
    NextTickNotFound,
    #[error("rewarder index not found")]
    RewarderIndexNotFound,
    #[error("gauger id not found")]
    GaugerIdNotFound,
    #[error("liquidity mismatch")]
    LiquidityMismatch,
    #[error("caller is not the owner")]
    NotOwner,
    #[error("invalid pool or partner id")]
    InvalidPoolOrPartnerId,
}

impl PoolError {
    /// Stable numeric code, independent of declaration order.
    pub const fn code(self) -> u32 {
        match self {
            PoolError::ZeroAmount => 1,
            PoolError::ZeroLiquidity => 2,
            PoolError::ZeroOutputAmount => 3,
            PoolError::InsufficientAmount => 4,
            PoolError::InsufficientLiquidity => 5,
            PoolError::InsufficientStakedLiquidity => 6,
            PoolError::LiquidityAdditionOverflow => 7,
            PoolError::AmountInOverflow => 8,
            PoolError::AmountOutOverflow => 9,
            PoolError::FeeAmountOverflow => 10,
            PoolError::InvalidFeeRate => 11,
            PoolError::InvalidRefFeeRate => 12,
            PoolError::InvalidRefFeeAmount => 13,
            PoolError::InvalidPriceLimit => 14,
            PoolError::InvalidTickRange => 15,
            PoolError::InvalidSyncEmissionTime => 16,
            PoolError::InvalidGaugeCap => 17,
            PoolError::PoolIdMismatch => 18,
            PoolError::PartnerIdMismatch => 19,
            PoolError::PartnerIdNotEmpty => 20,
            PoolError::PositionPoolIdMismatch => 21,
            PoolError::PositionIsStaked => 22,
            PoolError::StakeAlreadyStaked => 23,
            PoolError::UnstakeNotStaked => 24,
            PoolError::PoolPaused => 25,
            PoolError::PoolAlreadyPaused => 26,
            PoolError::PoolNotPaused => 27,
            PoolError::NextTickNotFound => 28,
            PoolError::RewarderIndexNotFound => 29,
            PoolError::GaugerIdNotFound => 30,
            PoolError::LiquidityMismatch => 31,
            PoolError::NotOwner => 32,
            PoolError::InvalidPoolOrPartnerId => 33,
        }
    }
}

pub type PoolResult<T> = Result<T, PoolError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_unique() {
        let all = [
            PoolError::ZeroAmount,
            PoolError::ZeroLiquidity,
            PoolError::ZeroOutputAmount,
            PoolError::InsufficientAmount,
            PoolError::InsufficientLiquidity,
            PoolError::InsufficientStakedLiquidity,
            PoolError::LiquidityAdditionOverflow,
            PoolError::AmountInOverflow,
            PoolError::AmountOutOverflow,
            PoolError::FeeAmountOverflow,
            PoolError::InvalidFeeRate,
            PoolError::InvalidRefFeeRate,
            PoolError::InvalidRefFeeAmount,
            PoolError::InvalidPriceLimit,
            PoolError::InvalidTickRange,
            PoolError::InvalidSyncEmissionTime,
            PoolError::InvalidGaugeCap,
            PoolError::PoolIdMismatch,
            PoolError::PartnerIdMismatch,
            PoolError::PartnerIdNotEmpty,
            PoolError::PositionPoolIdMismatch,
            PoolError::PositionIsStaked,
            PoolError::StakeAlreadyStaked,
            PoolError::UnstakeNotStaked,
            PoolError::PoolPaused,
            PoolError::PoolAlreadyPaused,
            PoolError::PoolNotPaused,
            PoolError::NextTickNotFound,
            PoolError::RewarderIndexNotFound,
            PoolError::GaugerIdNotFound,
            PoolError::LiquidityMismatch,
            PoolError::NotOwner,
            PoolError::InvalidPoolOrPartnerId,
        ];
        let mut codes: Vec<u32> = all.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
