//! Time-based emission distribution with a rollover bucket for intervals
//! with no staked liquidity.
//!
//! Has no direct teacher counterpart — the teacher's `RewardInfo` accrues
//! proportionally to *all* active liquidity (`update_reward_infos`), not a
//! separately staked subset, and has no rollover concept. Grounded directly
//! on this system's own §4.4 pseudocode; its accrual cadence (accrue-before-
//! mutate, time-delta-gated) follows the shape of the teacher's
//! `PoolState::update_reward_infos`.

use crate::error::{PoolError, PoolResult};
use crate::libraries::MulDiv;

#[derive(Debug, Default, Clone, Copy)]
pub struct EmissionDescriptor {
    /// Emission rate, Q64.64 tokens/sec.
    pub rate: u128,
    pub reserve: u64,
    pub period_finish: i64,
    /// Tokens that accrued while `staked_liquidity == 0`, never reclaimed
    /// automatically; folded back in by the next `sync_emission`.
    pub rollover: u64,
    pub last_updated: i64,
    pub growth_global: u128,
    /// Subset of active liquidity currently earning this emission stream.
    /// Owned here (per §4.4's state tuple) rather than duplicated on `Pool`;
    /// ticks still carry their own `staked_liquidity_net` deltas, applied to
    /// this field by the swap loop and by stake/unstake.
    pub staked_liquidity: u128,
}

impl EmissionDescriptor {
    /// Accrues emission up to `now`, returning the amount distributed this
    /// call. A no-op when `now == last_updated`.
    pub fn update_growth_global(&mut self, now: i64) -> PoolResult<u64> {
        let dt = now.checked_sub(self.last_updated).ok_or(PoolError::InvalidSyncEmissionTime)?;
        if dt == 0 {
            return Ok(0);
        }
        if dt < 0 {
            return Err(PoolError::InvalidSyncEmissionTime);
        }

        if self.reserve > 0 {
            let accrued = self.rate.mul_div_floor(dt as u128, 1u128 << 64).unwrap_or(0);
            let distributed = accrued.min(self.reserve as u128) as u64;
            self.reserve -= distributed;

            if self.staked_liquidity > 0 {
                let delta = (distributed as u128)
                    .mul_div_floor(1u128 << 64, self.staked_liquidity)
                    .unwrap_or(0);
                self.growth_global = self.growth_global.wrapping_add(delta);
            } else {
                self.rollover = self.rollover.checked_add(distributed).ok_or(PoolError::FeeAmountOverflow)?;
            }
            self.last_updated = now;
            return Ok(distributed);
        }

        self.last_updated = now;
        Ok(0)
    }

    /// Re-rates the gauge. Always accrues up to `now` first so the old rate
    /// never silently applies across the rate change.
    pub fn sync_emission(&mut self, rate: u128, reserve: u64, period_finish: i64, now: i64) -> PoolResult<()> {
        if period_finish < now {
            return Err(PoolError::InvalidSyncEmissionTime);
        }
        self.update_growth_global(now)?;
        self.rate = rate;
        self.reserve = reserve;
        self.period_finish = period_finish;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accrues_to_rollover_when_unstaked() {
        let mut e = EmissionDescriptor {
            rate: 10u128 << 64,
            reserve: 10_000,
            period_finish: 1000,
            last_updated: 0,
            ..Default::default()
        };
        let distributed = e.update_growth_global(100).unwrap();
        assert_eq!(distributed, 1000);
        assert_eq!(e.rollover, 1000);
        assert_eq!(e.growth_global, 0);
        assert_eq!(e.reserve, 9000);
    }

    #[test]
    fn accrues_to_growth_global_when_staked() {
        let mut e = EmissionDescriptor {
            rate: 10u128 << 64,
            reserve: 10_000,
            period_finish: 1000,
            last_updated: 0,
            ..Default::default()
        };
        e.update_growth_global(100).unwrap();
        e.staked_liquidity = 1_000_000;
        let distributed = e.update_growth_global(200).unwrap();
        assert_eq!(distributed, 1000);
        assert!(e.growth_global > 0);
    }

    #[test]
    fn zero_delta_is_noop() {
        let mut e = EmissionDescriptor { last_updated: 50, ..Default::default() };
        assert_eq!(e.update_growth_global(50).unwrap(), 0);
    }

    #[test]
    fn sync_rejects_past_period_finish() {
        let mut e = EmissionDescriptor { last_updated: 100, ..Default::default() };
        assert!(e.sync_emission(1, 1, 50, 100).is_err());
    }
}
