//! A single initialized tick and its growth-outside bookkeeping.
//!
//! Generalizes the teacher's `states/tick.rs::TickState`, which only tracks
//! two fee dimensions, to the five growth dimensions this pool needs (fee_a,
//! fee_b, points, emission, and a fixed bank of reward streams), and
//! switches every growth operation from `checked_sub` to `wrapping_sub` per
//! the wrapping-growth numeric domain.

use crate::constants::REWARDER_NUM;
use crate::error::{PoolError, PoolResult};
use crate::libraries::liquidity_math;

/// Growth accumulators captured at a tick boundary or snapshotted into a
/// position. One instance represents "everything on one side" of the split
/// invariant 5 describes.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GrowthSnapshot {
    pub fee_growth_a: u128,
    pub fee_growth_b: u128,
    pub points_growth: u128,
    pub emission_growth: u128,
    pub reward_growths: [u128; REWARDER_NUM],
}

impl GrowthSnapshot {
    pub fn wrapping_sub(&self, other: &GrowthSnapshot) -> GrowthSnapshot {
        let mut reward_growths = [0u128; REWARDER_NUM];
        for i in 0..REWARDER_NUM {
            reward_growths[i] = self.reward_growths[i].wrapping_sub(other.reward_growths[i]);
        }
        GrowthSnapshot {
            fee_growth_a: self.fee_growth_a.wrapping_sub(other.fee_growth_a),
            fee_growth_b: self.fee_growth_b.wrapping_sub(other.fee_growth_b),
            points_growth: self.points_growth.wrapping_sub(other.points_growth),
            emission_growth: self.emission_growth.wrapping_sub(other.emission_growth),
            reward_growths,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Tick {
    pub index: i32,
    pub liquidity_gross: u128,
    pub liquidity_net: i128,
    pub staked_liquidity_net: i128,
    pub growth_outside: GrowthSnapshot,
}

impl Tick {
    pub fn new(index: i32) -> Self {
        Tick {
            index,
            liquidity_gross: 0,
            liquidity_net: 0,
            staked_liquidity_net: 0,
            growth_outside: GrowthSnapshot::default(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.liquidity_gross != 0
    }

    /// Updates gross/net liquidity for a position endpoint touching this
    /// tick. `upper` flips the sign convention of `liquidity_delta` for
    /// `liquidity_net` (Uniswap v3 §6.3: lower ticks add, upper ticks
    /// subtract the same magnitude).
    pub fn update(
        &mut self,
        liquidity_delta: i128,
        upper: bool,
        current_global: &GrowthSnapshot,
        current_tick_index: i32,
    ) -> PoolResult<bool> {
        let was_initialized = self.is_initialized();
        self.liquidity_gross = liquidity_math::add_delta(self.liquidity_gross, liquidity_delta)?;

        self.liquidity_net = if upper {
            self.liquidity_net
                .checked_sub(liquidity_delta)
                .ok_or(PoolError::LiquidityAdditionOverflow)?
        } else {
            self.liquidity_net
                .checked_add(liquidity_delta)
                .ok_or(PoolError::LiquidityAdditionOverflow)?
        };

        if !was_initialized {
            if self.index <= current_tick_index {
                self.growth_outside = *current_global;
            } else {
                self.growth_outside = GrowthSnapshot::default();
            }
        }
        Ok(self.is_initialized() != was_initialized)
    }

    pub fn update_staked(&mut self, delta: i128, upper: bool) -> PoolResult<()> {
        self.staked_liquidity_net = if upper {
            self.staked_liquidity_net
                .checked_sub(delta)
                .ok_or(PoolError::InsufficientStakedLiquidity)?
        } else {
            self.staked_liquidity_net
                .checked_add(delta)
                .ok_or(PoolError::InsufficientStakedLiquidity)?
        };
        Ok(())
    }

    /// Flips every growth-outside dimension to `global - outside` (wrapping)
    /// and returns the signed liquidity deltas to apply to the pool's
    /// running `(active_liquidity, staked_liquidity)`.
    pub fn cross(&mut self, global: &GrowthSnapshot) -> (i128, i128) {
        self.growth_outside = global.wrapping_sub(&self.growth_outside);
        (self.liquidity_net, self.staked_liquidity_net)
    }
}

/// Growth accrued strictly inside `[tick_lower, tick_upper]` as seen from
/// `current_tick_index`, per invariant 5/6's below/above/result formula.
/// Uninitialized boundary ticks contribute zero growth-outside.
pub fn growth_inside(
    current_tick_index: i32,
    global: &GrowthSnapshot,
    tick_lower_index: i32,
    tick_lower: Option<&Tick>,
    tick_upper_index: i32,
    tick_upper: Option<&Tick>,
) -> GrowthSnapshot {
    let outside_lower = tick_lower.map(|t| t.growth_outside).unwrap_or_default();
    let outside_upper = tick_upper.map(|t| t.growth_outside).unwrap_or_default();

    let below = if current_tick_index >= tick_lower_index {
        outside_lower
    } else {
        global.wrapping_sub(&outside_lower)
    };
    let above = if current_tick_index < tick_upper_index {
        outside_upper
    } else {
        global.wrapping_sub(&outside_upper)
    };

    global.wrapping_sub(&below).wrapping_sub(&above)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_tick_seeds_growth_outside_below_current() {
        let global = GrowthSnapshot { fee_growth_a: 500, ..Default::default() };
        let mut t = Tick::new(-60);
        t.update(1_000_000, false, &global, 0).unwrap();
        assert_eq!(t.growth_outside.fee_growth_a, 500);
    }

    #[test]
    fn fresh_tick_above_current_seeds_zero() {
        let global = GrowthSnapshot { fee_growth_a: 500, ..Default::default() };
        let mut t = Tick::new(60);
        t.update(1_000_000, false, &global, 0).unwrap();
        assert_eq!(t.growth_outside.fee_growth_a, 0);
    }

    #[test]
    fn cross_flips_to_global_minus_outside() {
        let global = GrowthSnapshot { fee_growth_a: 500, ..Default::default() };
        let mut t = Tick::new(-60);
        t.update(1_000_000, false, &global, 0).unwrap();
        let global_later = GrowthSnapshot { fee_growth_a: 900, ..Default::default() };
        t.cross(&global_later);
        assert_eq!(t.growth_outside.fee_growth_a, 900 - 500);
    }

    #[test]
    fn growth_inside_full_range_equals_global() {
        let global = GrowthSnapshot { fee_growth_a: 700, ..Default::default() };
        let inside = growth_inside(0, &global, -60, None, 60, None);
        assert_eq!(inside.fee_growth_a, 700);
    }

    #[test]
    fn prune_when_gross_returns_to_zero() {
        let global = GrowthSnapshot::default();
        let mut t = Tick::new(-60);
        t.update(1_000_000, false, &global, 0).unwrap();
        t.update(-1_000_000, false, &global, 0).unwrap();
        assert!(!t.is_initialized());
    }
}
