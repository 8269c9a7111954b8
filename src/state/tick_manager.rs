//! Sparse tick storage with O(log n) swap-direction neighbour lookup.
//!
//! The teacher backs this with a fixed-size `TickArrayState` (80 ticks per
//! PDA-addressed account) plus a 1024-bit bitmap extension for locating
//! populated arrays, because Solana accounts can't grow. Off-chain there's
//! no such constraint, so a `BTreeMap<i32, Tick>` gives the same ordered
//! O(log n) neighbour queries directly.

use std::collections::BTreeMap;

use crate::error::{PoolError, PoolResult};
use crate::state::tick::{growth_inside, GrowthSnapshot, Tick};

#[derive(Debug, Default, Clone)]
pub struct TickManager {
    pub tick_spacing: u16,
    ticks: BTreeMap<i32, Tick>,
}

impl TickManager {
    pub fn new(tick_spacing: u16) -> Self {
        TickManager { tick_spacing, ticks: BTreeMap::new() }
    }

    pub fn get(&self, index: i32) -> Option<&Tick> {
        self.ticks.get(&index)
    }

    /// Next initialized tick strictly below `current_tick` when `a2b`, or
    /// at-or-above it otherwise. `None` means the swap has run off the edge
    /// of initialized liquidity.
    pub fn first_score_for_swap(&self, current_tick: i32, a2b: bool) -> Option<i32> {
        if a2b {
            self.ticks.range(..current_tick).next_back().map(|(k, _)| *k)
        } else {
            self.ticks.range((current_tick + 1)..).next().map(|(k, _)| *k)
        }
    }

    /// Growth accrued strictly inside `[tick_lower, tick_upper]`.
    pub fn growth_inside(
        &self,
        current_tick_index: i32,
        global: &GrowthSnapshot,
        tick_lower: i32,
        tick_upper: i32,
    ) -> GrowthSnapshot {
        growth_inside(
            current_tick_index,
            global,
            tick_lower,
            self.ticks.get(&tick_lower),
            tick_upper,
            self.ticks.get(&tick_upper),
        )
    }

    /// Applies a liquidity delta at one endpoint of a position, seeding
    /// growth-outside on first initialization and pruning on return to
    /// zero gross liquidity.
    pub fn update_liquidity(
        &mut self,
        index: i32,
        liquidity_delta: i128,
        upper: bool,
        global: &GrowthSnapshot,
        current_tick_index: i32,
    ) -> PoolResult<()> {
        let tick = self.ticks.entry(index).or_insert_with(|| Tick::new(index));
        tick.update(liquidity_delta, upper, global, current_tick_index)?;
        if !tick.is_initialized() {
            self.ticks.remove(&index);
        }
        Ok(())
    }

    pub fn update_staked_liquidity(&mut self, index: i32, delta: i128, upper: bool) -> PoolResult<()> {
        let tick = self.ticks.get_mut(&index).ok_or(PoolError::NextTickNotFound)?;
        tick.update_staked(delta, upper)
    }

    /// Crosses `index` during a swap: flips its growth-outside and applies
    /// the signed liquidity deltas to `(active_liquidity, staked_liquidity)`
    /// according to swap direction.
    pub fn cross_by_swap(
        &mut self,
        index: i32,
        a2b: bool,
        active_liquidity: u128,
        staked_liquidity: u128,
        global: &GrowthSnapshot,
    ) -> PoolResult<(u128, u128)> {
        let tick = self.ticks.get_mut(&index).ok_or(PoolError::NextTickNotFound)?;
        let (liquidity_net, staked_liquidity_net) = tick.cross(global);

        let (l_delta, ls_delta) = if a2b {
            (-liquidity_net, -staked_liquidity_net)
        } else {
            (liquidity_net, staked_liquidity_net)
        };

        let new_active = if l_delta < 0 {
            active_liquidity
                .checked_sub((-l_delta) as u128)
                .ok_or(PoolError::InsufficientLiquidity)?
        } else {
            active_liquidity
                .checked_add(l_delta as u128)
                .ok_or(PoolError::LiquidityAdditionOverflow)?
        };
        let new_staked = if ls_delta < 0 {
            staked_liquidity
                .checked_sub((-ls_delta) as u128)
                .ok_or(PoolError::InsufficientStakedLiquidity)?
        } else {
            staked_liquidity
                .checked_add(ls_delta as u128)
                .ok_or(PoolError::InsufficientStakedLiquidity)?
        };

        Ok((new_active, new_staked))
    }

    /// Sums `liquidity_net`/`staked_liquidity_net` over every initialized
    /// tick at or below `current_tick_index` — the live value of
    /// `(active_liquidity, staked_liquidity)` recomputed from scratch, used
    /// by the staked-liquidity recovery hatch.
    pub fn sum_nets_up_to(&self, current_tick_index: i32) -> (i128, i128) {
        self.ticks
            .range(..=current_tick_index)
            .fold((0i128, 0i128), |(l, ls), (_, t)| (l + t.liquidity_net, ls + t.staked_liquidity_net))
    }

    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_score_for_swap_finds_neighbour() {
        let mut m = TickManager::new(60);
        let g = GrowthSnapshot::default();
        m.update_liquidity(-60, 1_000_000, false, &g, 0).unwrap();
        m.update_liquidity(60, 1_000_000, true, &g, 0).unwrap();

        assert_eq!(m.first_score_for_swap(0, true), Some(-60));
        assert_eq!(m.first_score_for_swap(0, false), Some(60));
        assert_eq!(m.first_score_for_swap(-60, true), None);
    }

    #[test]
    fn pruned_when_liquidity_returns_to_zero() {
        let mut m = TickManager::new(60);
        let g = GrowthSnapshot::default();
        m.update_liquidity(-60, 1_000_000, false, &g, 0).unwrap();
        assert_eq!(m.len(), 1);
        m.update_liquidity(-60, -1_000_000, false, &g, 0).unwrap();
        assert_eq!(m.len(), 0);
    }

    #[test]
    fn cross_by_swap_updates_active_liquidity() {
        let mut m = TickManager::new(60);
        let g = GrowthSnapshot::default();
        m.update_liquidity(-60, 1_000_000, false, &g, 0).unwrap();
        m.update_liquidity(60, 1_000_000, true, &g, 0).unwrap();

        // crossing -60 going a2b (price falling through it) removes its net
        let (active, staked) = m.cross_by_swap(-60, true, 1_000_000, 0, &g).unwrap();
        assert_eq!(active, 0);
        assert_eq!(staked, 0);
    }
}
