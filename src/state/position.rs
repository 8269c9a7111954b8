//! A liquidity position's range, balance and accrued-but-unclaimed owed
//! amounts across every growth dimension.
//!
//! Generalizes the teacher's `states/personal_position.rs::PersonalPositionState`
//! (fee_growth_inside_last + token_fees_owed, same pattern for rewards) to
//! the fee/points/emission/reward growth dimensions this pool tracks, and
//! keeps the teacher's "overflow in the owed computation silently yields
//! zero delta rather than panicking" behavior, since a `mul_div` overflow
//! here means the grown amount hasn't yet been realized into u64 token
//! units and should simply wait for the next accrual.

use crate::constants::REWARDER_NUM;
use crate::libraries::fixed_point::Q64;
use crate::libraries::MulDiv;
use crate::state::tick::GrowthSnapshot;

#[derive(Debug, Clone, Copy)]
pub struct PositionInfo {
    pub pool_id: u64,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub growth_inside_snapshot: GrowthSnapshot,
    pub fee_owed_a: u64,
    pub fee_owed_b: u64,
    pub rewards_owed: [u64; REWARDER_NUM],
    pub points_owed: u128,
    pub emission_owed: u64,
    pub is_staked: bool,
}

impl PositionInfo {
    pub fn new(pool_id: u64, tick_lower: i32, tick_upper: i32) -> Self {
        PositionInfo {
            pool_id,
            tick_lower,
            tick_upper,
            liquidity: 0,
            growth_inside_snapshot: GrowthSnapshot::default(),
            fee_owed_a: 0,
            fee_owed_b: 0,
            rewards_owed: [0; REWARDER_NUM],
            points_owed: 0,
            emission_owed: 0,
            is_staked: false,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.liquidity == 0
            && self.fee_owed_a == 0
            && self.fee_owed_b == 0
            && self.rewards_owed.iter().all(|&r| r == 0)
            && self.points_owed == 0
            && self.emission_owed == 0
    }

    /// Folds `growth_inside_now - growth_inside_snapshot` (wrapping) into
    /// every owed accumulator, scaled by `liquidity`, then replaces the
    /// snapshot. Must be called with the *pre-mutation* `liquidity` whenever
    /// liquidity is about to change.
    pub fn accrue(&mut self, growth_inside_now: GrowthSnapshot) {
        let delta = growth_inside_now.wrapping_sub(&self.growth_inside_snapshot);
        let liquidity = self.liquidity;

        self.fee_owed_a = self.fee_owed_a.saturating_add(scale_to_u64(delta.fee_growth_a, liquidity));
        self.fee_owed_b = self.fee_owed_b.saturating_add(scale_to_u64(delta.fee_growth_b, liquidity));
        self.emission_owed =
            self.emission_owed.saturating_add(scale_to_u64(delta.emission_growth, liquidity));
        for i in 0..REWARDER_NUM {
            self.rewards_owed[i] =
                self.rewards_owed[i].saturating_add(scale_to_u64(delta.reward_growths[i], liquidity));
        }
        self.points_owed = self.points_owed.saturating_add(
            delta.points_growth.mul_div_floor(liquidity, Q64).unwrap_or(0),
        );

        self.growth_inside_snapshot = growth_inside_now;
    }
}

/// `floor(delta * liquidity / 2^64)`, saturating to zero on overflow rather
/// than panicking — mirrors the teacher's `update_rewards`, which treats an
/// unrealizable growth delta as "nothing accrued yet".
fn scale_to_u64(growth_delta: u128, liquidity: u128) -> u64 {
    growth_delta
        .mul_div_floor(liquidity, Q64)
        .and_then(|v| u64::try_from(v).ok())
        .unwrap_or(0)
}
