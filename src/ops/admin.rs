//! Role-gated administrative entry points: pause, fee-rate updates,
//! protocol/gauge fee collection, rewarder and emission configuration.
//!
//! Ported from the teacher's `instructions/{update_pool_status,
//! update_amm_config,collect_protocol_fee,initialize_reward,
//! set_reward_params}.rs`, generalized to this crate's single `paused` bit
//! and four-destination fee split.

use crate::error::PoolResult;
use crate::events::{
    AddRewarderEvent, CollectGaugeFeeEvent, CollectProtocolFeeEvent, PauseEvent,
    SyncEmissionEvent, UnpauseEvent, UpdateEmissionEvent, UpdateFeeRateEvent,
    UpdateUnstakedFeeRateEvent, UpdateUrlEvent,
};
use crate::state::config::{GlobalConfig, Role};
use crate::state::pool::Pool;

pub fn pause(pool: &mut Pool, config: &GlobalConfig, caller: &[u8; 32]) -> PoolResult<PauseEvent> {
    config.require_role(Role::Admin, caller)?;
    pool.pause()?;
    Ok(PauseEvent { pool_id: pool.id })
}

pub fn unpause(pool: &mut Pool, config: &GlobalConfig, caller: &[u8; 32]) -> PoolResult<UnpauseEvent> {
    config.require_role(Role::Admin, caller)?;
    pool.unpause()?;
    Ok(UnpauseEvent { pool_id: pool.id })
}

pub fn update_fee_rate(
    pool: &mut Pool,
    config: &GlobalConfig,
    caller: &[u8; 32],
    new_rate: u32,
) -> PoolResult<UpdateFeeRateEvent> {
    config.require_role(Role::PoolManager, caller)?;
    let old_rate = pool.fee_rate;
    pool.update_fee_rate(new_rate)?;
    Ok(UpdateFeeRateEvent { pool_id: pool.id, old_rate, new_rate })
}

pub fn update_unstaked_liquidity_fee_rate(
    pool: &mut Pool,
    config: &GlobalConfig,
    caller: &[u8; 32],
    new_rate: Option<u32>,
) -> PoolResult<UpdateUnstakedFeeRateEvent> {
    config.require_role(Role::PoolManager, caller)?;
    pool.update_unstaked_liquidity_fee_rate(new_rate)?;
    Ok(UpdateUnstakedFeeRateEvent { pool_id: pool.id, new_rate })
}

pub fn update_url(
    pool: &mut Pool,
    config: &GlobalConfig,
    caller: &[u8; 32],
    url: String,
) -> PoolResult<UpdateUrlEvent> {
    config.require_role(Role::PoolManager, caller)?;
    pool.url = url.clone();
    Ok(UpdateUrlEvent { pool_id: pool.id, url })
}

/// Moves up to `(requested_a, requested_b)` of accumulated protocol fee out
/// of the pool. Caps to whatever is actually available rather than erroring
/// on an over-large request, mirroring the teacher's `collect_protocol_fee`.
pub fn collect_protocol_fee(
    pool: &mut Pool,
    config: &GlobalConfig,
    caller: &[u8; 32],
    requested_a: u64,
    requested_b: u64,
) -> PoolResult<CollectProtocolFeeEvent> {
    config.require_role(Role::ProtocolFeeClaimer, caller)?;
    let (amount_a, amount_b) = pool.collect_protocol_fee(requested_a, requested_b)?;
    Ok(CollectProtocolFeeEvent { pool_id: pool.id, amount_a, amount_b })
}

pub fn collect_gauge_fee(
    pool: &mut Pool,
    config: &GlobalConfig,
    caller: &[u8; 32],
    requested_a: u64,
    requested_b: u64,
) -> PoolResult<CollectGaugeFeeEvent> {
    config.require_role(Role::Admin, caller)?;
    pool.require_not_paused()?;
    let amount_a = requested_a.min(pool.gauge_fee_a);
    let amount_b = requested_b.min(pool.gauge_fee_b);
    pool.gauge_fee_a -= amount_a;
    pool.gauge_fee_b -= amount_b;
    Ok(CollectGaugeFeeEvent { pool_id: pool.id, amount_a, amount_b })
}

pub fn add_rewarder(
    pool: &mut Pool,
    config: &GlobalConfig,
    caller: &[u8; 32],
    reward_token_type: u8,
    emission_per_second: u128,
) -> PoolResult<AddRewarderEvent> {
    config.require_role(Role::PoolManager, caller)?;
    let index = pool.rewarders.add_rewarder(reward_token_type, emission_per_second)?;
    Ok(AddRewarderEvent { pool_id: pool.id, index, reward_token_type })
}

/// Re-rates an existing reward stream, settling all streams up to `now`
/// first so the old rate doesn't silently keep applying past this call.
pub fn update_emission(
    pool: &mut Pool,
    config: &GlobalConfig,
    caller: &[u8; 32],
    index: usize,
    emission_per_second: u128,
    now: i64,
) -> PoolResult<UpdateEmissionEvent> {
    config.require_role(Role::PoolManager, caller)?;
    pool.rewarders.settle(now, pool.active_liquidity)?;
    pool.rewarders.update_emission(index, emission_per_second)?;
    Ok(UpdateEmissionEvent { pool_id: pool.id, index, emission_per_second })
}

/// Re-rates the emission gauge; `EmissionDescriptor::sync_emission` accrues
/// up to `now` under the old rate before installing the new one.
pub fn sync_emission(
    pool: &mut Pool,
    config: &GlobalConfig,
    caller: &[u8; 32],
    rate: u128,
    reserve: u64,
    period_finish: i64,
    now: i64,
) -> PoolResult<SyncEmissionEvent> {
    config.require_role(Role::PoolManager, caller)?;
    pool.emission.sync_emission(rate, reserve, period_finish, now)?;
    Ok(SyncEmissionEvent { pool_id: pool.id, rate, reserve, period_finish })
}

/// Recovery hatch for invariant 3: recomputes `(active_liquidity,
/// staked_liquidity)` from tick net sums and reconciles the pool's running
/// values, rejecting the call if active liquidity has drifted (a bug
/// elsewhere, not something this hatch should paper over).
pub fn restore_staked_liquidity(
    pool: &mut Pool,
    config: &GlobalConfig,
    caller: &[u8; 32],
) -> PoolResult<crate::events::RestoreStakedLiquidityEvent> {
    config.require_role(Role::Admin, caller)?;
    pool.restore_staked_liquidity(|ticks, current| ticks.sum_nets_up_to(current))?;
    Ok(crate::events::RestoreStakedLiquidityEvent {
        pool_id: pool.id,
        active_liquidity: pool.active_liquidity,
        staked_liquidity: pool.staked_liquidity(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Pool, GlobalConfig) {
        let pool = Pool::new(1, 0, 60, 3000, 1u128 << 64, 0).unwrap();
        let config = GlobalConfig::new(1, 120_000, 500_000, [1; 32], [2; 32], [3; 32]).unwrap();
        (pool, config)
    }

    #[test]
    fn pause_rejects_wrong_caller() {
        let (mut pool, config) = setup();
        assert!(pause(&mut pool, &config, &[9; 32]).is_err());
        assert!(pause(&mut pool, &config, &[3; 32]).is_ok());
    }

    #[test]
    fn collect_protocol_fee_requires_role() {
        let (mut pool, config) = setup();
        pool.protocol_fee_a = 500;
        assert!(collect_protocol_fee(&mut pool, &config, &[3; 32], 500, 0).is_err());
        let event = collect_protocol_fee(&mut pool, &config, &[2; 32], 500, 0).unwrap();
        assert_eq!(event.amount_a, 500);
    }

    #[test]
    fn add_rewarder_requires_pool_manager() {
        let (mut pool, config) = setup();
        assert!(add_rewarder(&mut pool, &config, &[1; 32], 0, 10).is_ok());
        assert!(add_rewarder(&mut pool, &config, &[3; 32], 1, 10).is_err());
    }

    #[test]
    fn restore_staked_liquidity_matches_when_no_drift() {
        let (mut pool, config) = setup();
        let event = restore_staked_liquidity(&mut pool, &config, &[3; 32]).unwrap();
        assert_eq!(event.active_liquidity, 0);
        assert_eq!(event.staked_liquidity, 0);
    }
}
