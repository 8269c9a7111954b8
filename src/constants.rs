//! Pool-wide numeric constants, mirrored from the teacher's
//! `states/config.rs` (`FEE_RATE_DENOMINATOR_VALUE`) and extended with the
//! unstaked-fee and rewarder-count constants this crate's fee split and
//! emission subsystems need.

/// Denominator for `fee_rate`, `protocol_fee_rate` and `ref_fee_rate`.
pub const FEE_RATE_DENOM: u32 = 1_000_000;

/// Denominator for `unstaked_fee_rate` (the share of LP fee redirected to
/// the gauge when staked liquidity doesn't cover the active range).
pub const UNSTAKED_FEE_DENOM: u32 = 1_000_000;

/// Ceiling on any single fee rate (100%, expressed in `FEE_RATE_DENOM` units).
pub const MAX_FEE_RATE: u32 = FEE_RATE_DENOM;

/// Ceiling on `unstaked_fee_rate`.
pub const MAX_UNSTAKED_FEE_RATE: u32 = UNSTAKED_FEE_DENOM;

/// Number of independent reward streams a pool can host, mirrored from the
/// teacher's `REWARD_NUM`.
pub const REWARDER_NUM: usize = 3;
