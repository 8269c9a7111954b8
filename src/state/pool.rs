//! The pool aggregate: price/liquidity register, tick grid, positions,
//! rewarders and emission, plus the fee/reserve escrows every mutating
//! operation reads or writes.
//!
//! Mirrors the shape of the teacher's `states/pool.rs::PoolState`, expanded
//! from a two-destination (protocol/fund) fee model to the four-destination
//! (ref/protocol/gauge/lp) split and a staked-liquidity dimension the
//! teacher doesn't have.

use crate::constants::{FEE_RATE_DENOM, MAX_FEE_RATE, MAX_UNSTAKED_FEE_RATE};
use crate::error::{PoolError, PoolResult};
use crate::libraries::tick_math;
use crate::state::emission::EmissionDescriptor;
use crate::state::position_manager::PositionManager;
use crate::state::rewarder::RewarderManager;
use crate::state::tick::GrowthSnapshot;
use crate::state::tick_manager::TickManager;

#[derive(Debug, Clone)]
pub struct Pool {
    pub id: u64,
    pub index: u64,
    pub url: String,

    pub tick_spacing: u16,
    pub fee_rate: u32,
    /// `None` means "inherit `default_unstaked_fee_rate` from `GlobalConfig`
    /// at swap time" (§4.5 sentinel).
    pub unstaked_fee_rate: Option<u32>,

    pub current_sqrt_price: u128,
    pub current_tick_index: i32,
    pub active_liquidity: u128,

    pub fee_growth_global_a: u128,
    pub fee_growth_global_b: u128,

    pub protocol_fee_a: u64,
    pub protocol_fee_b: u64,
    pub gauge_fee_a: u64,
    pub gauge_fee_b: u64,

    pub reserve_a: u64,
    pub reserve_b: u64,

    /// Lifetime running totals, mirrored from the teacher's `PoolState`
    /// (`swap_in_amount`/`swap_out_amount`), minus its USD conversion.
    pub swap_in_amount: u128,
    pub swap_out_amount: u128,

    pub paused: bool,

    pub ticks: TickManager,
    pub positions: PositionManager,
    pub rewarders: RewarderManager,
    pub emission: EmissionDescriptor,
}

impl Pool {
    pub fn new(
        id: u64,
        index: u64,
        tick_spacing: u16,
        fee_rate: u32,
        initial_sqrt_price: u128,
        now: i64,
    ) -> PoolResult<Self> {
        if fee_rate > MAX_FEE_RATE {
            return Err(PoolError::InvalidFeeRate);
        }
        let current_tick_index = tick_math::get_tick_at_sqrt_price(initial_sqrt_price)?;
        Ok(Pool {
            id,
            index,
            url: String::new(),
            tick_spacing,
            fee_rate,
            unstaked_fee_rate: None,
            current_sqrt_price: initial_sqrt_price,
            current_tick_index,
            active_liquidity: 0,
            fee_growth_global_a: 0,
            fee_growth_global_b: 0,
            protocol_fee_a: 0,
            protocol_fee_b: 0,
            gauge_fee_a: 0,
            gauge_fee_b: 0,
            reserve_a: 0,
            reserve_b: 0,
            swap_in_amount: 0,
            swap_out_amount: 0,
            paused: false,
            ticks: TickManager::new(tick_spacing),
            positions: PositionManager::new(tick_spacing),
            rewarders: RewarderManager::new(now),
            emission: EmissionDescriptor::default(),
        })
    }

    pub fn staked_liquidity(&self) -> u128 {
        self.emission.staked_liquidity
    }

    /// Current value of every growth accumulator, assembled from the pool's
    /// own fee dimensions plus the rewarder bank and emission descriptor.
    pub fn current_global_growth(&self) -> GrowthSnapshot {
        let mut reward_growths = [0u128; crate::constants::REWARDER_NUM];
        for (i, r) in self.rewarders.rewarders().iter().enumerate() {
            reward_growths[i] = r.growth_global;
        }
        GrowthSnapshot {
            fee_growth_a: self.fee_growth_global_a,
            fee_growth_b: self.fee_growth_global_b,
            points_growth: self.rewarders.points_growth_global,
            emission_growth: self.emission.growth_global,
            reward_growths,
        }
    }

    pub fn require_not_paused(&self) -> PoolResult<()> {
        if self.paused {
            Err(PoolError::PoolPaused)
        } else {
            Ok(())
        }
    }

    pub fn pause(&mut self) -> PoolResult<()> {
        if self.paused {
            return Err(PoolError::PoolAlreadyPaused);
        }
        self.paused = true;
        Ok(())
    }

    pub fn unpause(&mut self) -> PoolResult<()> {
        if !self.paused {
            return Err(PoolError::PoolNotPaused);
        }
        self.paused = false;
        Ok(())
    }

    pub fn update_fee_rate(&mut self, new_rate: u32) -> PoolResult<()> {
        if new_rate == self.fee_rate || new_rate > MAX_FEE_RATE {
            return Err(PoolError::InvalidFeeRate);
        }
        self.fee_rate = new_rate;
        Ok(())
    }

    pub fn update_unstaked_liquidity_fee_rate(&mut self, new_rate: Option<u32>) -> PoolResult<()> {
        if let Some(rate) = new_rate {
            if rate > MAX_UNSTAKED_FEE_RATE {
                return Err(PoolError::InvalidFeeRate);
            }
        }
        self.unstaked_fee_rate = new_rate;
        Ok(())
    }

    pub fn effective_unstaked_fee_rate(&self, default_from_config: u32) -> u32 {
        self.unstaked_fee_rate.unwrap_or(default_from_config)
    }

    /// Moves accumulated protocol fees out as fresh balances and zeroes
    /// them. Requires the pool to be unpaused — see DESIGN.md Open Question
    /// 1 for why this resolves an apparent contradiction in §4.5.
    pub fn collect_protocol_fee(&mut self, requested_a: u64, requested_b: u64) -> PoolResult<(u64, u64)> {
        self.require_not_paused()?;
        let amount_a = requested_a.min(self.protocol_fee_a);
        let amount_b = requested_b.min(self.protocol_fee_b);
        self.protocol_fee_a -= amount_a;
        self.protocol_fee_b -= amount_b;
        Ok((amount_a, amount_b))
    }

    /// Recomputes `(active_liquidity, staked_liquidity)` from tick net sums
    /// at the current tick and asserts the recomputed active liquidity
    /// matches the live value before accepting the recomputed staked value.
    /// Recovery hatch for invariant 3.
    pub fn restore_staked_liquidity<F>(&mut self, sum_nets_at_or_below_current: F) -> PoolResult<()>
    where
        F: FnOnce(&TickManager, i32) -> (i128, i128),
    {
        let (net_l, net_ls) = sum_nets_at_or_below_current(&self.ticks, self.current_tick_index);
        if net_l < 0 || net_l as u128 != self.active_liquidity {
            return Err(PoolError::LiquidityMismatch);
        }
        if net_ls < 0 {
            return Err(PoolError::InsufficientStakedLiquidity);
        }
        self.emission.staked_liquidity = net_ls as u128;
        Ok(())
    }

    pub fn fee_rate_denom(&self) -> u32 {
        FEE_RATE_DENOM
    }
}
