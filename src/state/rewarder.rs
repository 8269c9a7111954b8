//! Fixed bank of reward streams plus the points-growth accumulator, settled
//! once per entry point before any position growth snapshot is taken (§5
//! ordering guarantee).
//!
//! Generalizes the teacher's `states/pool.rs::RewardInfo` /
//! `update_reward_infos` (time-delta-gated accrual proportional to active
//! liquidity) into an ordered bank plus a parallel points stream. Unlike the
//! teacher's reward accrual, which is gated on the reward's own
//! `open_time`/`end_time` window, this crate gates accrual only on
//! `active_liquidity > 0`, since `Rewarder` carries no period fields of its
//! own (§3's `Rewarder` entity lists only `reward_token_type`,
//! `emission_per_second`, `growth_global`).

use crate::constants::REWARDER_NUM;
use crate::error::{PoolError, PoolResult};
use crate::libraries::MulDiv;

#[derive(Debug, Default, Clone, Copy)]
pub struct Rewarder {
    pub reward_token_type: u8,
    pub emission_per_second: u128,
    pub growth_global: u128,
    pub reward_total_emissioned: u64,
    pub reward_claimed: u64,
    initialized: bool,
}

impl Rewarder {
    pub fn initialized(&self) -> bool {
        self.initialized
    }
}

#[derive(Debug, Clone)]
pub struct RewarderManager {
    rewarders: Vec<Rewarder>,
    pub points_growth_global: u128,
    pub last_updated: i64,
}

impl Default for RewarderManager {
    fn default() -> Self {
        RewarderManager { rewarders: Vec::new(), points_growth_global: 0, last_updated: 0 }
    }
}

impl RewarderManager {
    pub fn new(now: i64) -> Self {
        RewarderManager { rewarders: Vec::new(), points_growth_global: 0, last_updated: now }
    }

    pub fn rewarders(&self) -> &[Rewarder] {
        &self.rewarders
    }

    pub fn rewarder_index(&self, reward_token_type: u8) -> Option<usize> {
        self.rewarders.iter().position(|r| r.initialized && r.reward_token_type == reward_token_type)
    }

    /// Appends a new reward stream. Never removed once added (§3).
    pub fn add_rewarder(&mut self, reward_token_type: u8, emission_per_second: u128) -> PoolResult<usize> {
        if self.rewarders.len() >= REWARDER_NUM {
            return Err(PoolError::RewarderIndexNotFound);
        }
        self.rewarders.push(Rewarder {
            reward_token_type,
            emission_per_second,
            growth_global: 0,
            reward_total_emissioned: 0,
            reward_claimed: 0,
            initialized: true,
        });
        Ok(self.rewarders.len() - 1)
    }

    pub fn update_emission(&mut self, index: usize, emission_per_second: u128) -> PoolResult<()> {
        let r = self.rewarders.get_mut(index).ok_or(PoolError::RewarderIndexNotFound)?;
        r.emission_per_second = emission_per_second;
        Ok(())
    }

    /// Accrues every reward stream and the points stream up to `now`,
    /// proportional to `active_liquidity`. Must run before any position
    /// takes a growth snapshot.
    pub fn settle(&mut self, now: i64, active_liquidity: u128) -> PoolResult<()> {
        let dt = now.checked_sub(self.last_updated).ok_or(PoolError::InvalidSyncEmissionTime)?;
        if dt < 0 {
            return Err(PoolError::InvalidSyncEmissionTime);
        }
        if dt == 0 {
            return Ok(());
        }
        if active_liquidity > 0 {
            for r in self.rewarders.iter_mut().filter(|r| r.initialized) {
                let emitted = r.emission_per_second.mul_div_floor(dt as u128, 1u128 << 64).unwrap_or(0);
                let delta = emitted.mul_div_floor(1u128 << 64, active_liquidity).unwrap_or(0);
                r.growth_global = r.growth_global.wrapping_add(delta);
                r.reward_total_emissioned = r.reward_total_emissioned.saturating_add(emitted as u64);
            }
            let points_delta = (dt as u128)
                .mul_div_floor(1u128 << 64, active_liquidity)
                .unwrap_or(0);
            self.points_growth_global = self.points_growth_global.wrapping_add(points_delta);
        }
        self.last_updated = now;
        Ok(())
    }
}
