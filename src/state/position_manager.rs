//! Owns every `PositionInfo` for a pool, keyed by position id.

use std::collections::BTreeMap;

use crate::error::{PoolError, PoolResult};
use crate::state::position::PositionInfo;
use crate::state::tick::GrowthSnapshot;

#[derive(Debug, Default, Clone)]
pub struct PositionManager {
    pub tick_spacing: u16,
    positions: BTreeMap<u64, PositionInfo>,
    next_id: u64,
}

impl PositionManager {
    pub fn new(tick_spacing: u16) -> Self {
        PositionManager { tick_spacing, positions: BTreeMap::new(), next_id: 1 }
    }

    pub fn get(&self, id: u64) -> PoolResult<&PositionInfo> {
        self.positions.get(&id).ok_or(PoolError::PositionPoolIdMismatch)
    }

    pub fn get_mut(&mut self, id: u64) -> PoolResult<&mut PositionInfo> {
        self.positions.get_mut(&id).ok_or(PoolError::PositionPoolIdMismatch)
    }

    /// Creates a zero-liquidity position over `[tick_lower, tick_upper]`.
    pub fn open(&mut self, pool_id: u64, tick_lower: i32, tick_upper: i32) -> PoolResult<u64> {
        if tick_lower >= tick_upper {
            return Err(PoolError::InvalidTickRange);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.positions.insert(id, PositionInfo::new(pool_id, tick_lower, tick_upper));
        Ok(id)
    }

    /// Removes a position. Fails unless every balance and owed amount is
    /// already zero.
    pub fn close(&mut self, id: u64) -> PoolResult<()> {
        let pos = self.get(id)?;
        if !pos.is_empty() {
            return Err(PoolError::LiquidityMismatch);
        }
        self.positions.remove(&id);
        Ok(())
    }

    pub fn increase_liquidity(
        &mut self,
        id: u64,
        delta: u128,
        growth_inside_now: GrowthSnapshot,
    ) -> PoolResult<()> {
        let pos = self.get_mut(id)?;
        pos.accrue(growth_inside_now);
        pos.liquidity = pos.liquidity.checked_add(delta).ok_or(PoolError::LiquidityAdditionOverflow)?;
        Ok(())
    }

    pub fn decrease_liquidity(
        &mut self,
        id: u64,
        delta: u128,
        growth_inside_now: GrowthSnapshot,
    ) -> PoolResult<()> {
        let pos = self.get_mut(id)?;
        pos.accrue(growth_inside_now);
        pos.liquidity = pos.liquidity.checked_sub(delta).ok_or(PoolError::InsufficientLiquidity)?;
        Ok(())
    }

    /// Recomputes and re-snapshots owed amounts without changing liquidity.
    pub fn update_accruals(&mut self, id: u64, growth_inside_now: GrowthSnapshot) -> PoolResult<()> {
        let pos = self.get_mut(id)?;
        pos.accrue(growth_inside_now);
        Ok(())
    }

    /// Zeroes `fee_owed_{a,b}`, returning the amounts to transfer out.
    pub fn reset_fee_owed(&mut self, id: u64) -> PoolResult<(u64, u64)> {
        let pos = self.get_mut(id)?;
        let amounts = (pos.fee_owed_a, pos.fee_owed_b);
        pos.fee_owed_a = 0;
        pos.fee_owed_b = 0;
        Ok(amounts)
    }

    pub fn reset_reward_owed(&mut self, id: u64, index: usize) -> PoolResult<u64> {
        let pos = self.get_mut(id)?;
        let amount = *pos.rewards_owed.get(index).ok_or(PoolError::RewarderIndexNotFound)?;
        pos.rewards_owed[index] = 0;
        Ok(amount)
    }

    pub fn reset_points_owed(&mut self, id: u64) -> PoolResult<u128> {
        let pos = self.get_mut(id)?;
        let amount = pos.points_owed;
        pos.points_owed = 0;
        Ok(amount)
    }

    pub fn reset_emission_owed(&mut self, id: u64) -> PoolResult<u64> {
        let pos = self.get_mut(id)?;
        let amount = pos.emission_owed;
        pos.emission_owed = 0;
        Ok(amount)
    }

    pub fn inited_rewards_count(&self, id: u64) -> PoolResult<usize> {
        Ok(self.get(id)?.rewards_owed.iter().filter(|&&r| r > 0).count())
    }

    pub fn set_staked(&mut self, id: u64, staked: bool) -> PoolResult<()> {
        self.get_mut(id)?.is_staked = staked;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn open_rejects_inverted_range() {
        let mut m = PositionManager::new(60);
        assert!(m.open(1, 60, -60).is_err());
    }

    #[test]
    fn close_rejects_nonempty_position() {
        let mut m = PositionManager::new(60);
        let id = m.open(1, -60, 60).unwrap();
        m.increase_liquidity(id, 1000, GrowthSnapshot::default()).unwrap();
        assert!(m.close(id).is_err());
    }

    #[test]
    fn close_succeeds_when_empty() {
        let mut m = PositionManager::new(60);
        let id = m.open(1, -60, 60).unwrap();
        assert!(m.close(id).is_ok());
    }
}
