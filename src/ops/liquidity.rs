//! Position lifecycle: open/close, add/remove liquidity, fee and reward
//! collection, and staking a position's liquidity into the gauge.
//!
//! Grounded on the teacher's `instructions/{open_position,increase_liquidity,
//! decrease_liquidity,collect_fee,collect_reward}.rs`, generalized from the
//! teacher's fixed two tick-array accounts to this crate's `TickManager`
//! lookups and carrying the rewarder-settle-before-snapshot ordering
//! guarantee every one of these entry points must honor.

use crate::collaborators::{AddLiquidityReceipt, RewardVault, TokenBalance};
use crate::error::{PoolError, PoolResult};
use crate::events::{
    AddLiquidityEvent, ClosePositionEvent, CollectPositionFeeEvent, CollectRewardEvent,
    OpenPositionEvent, RemoveLiquidityEvent, UpdateStakedLiquidityEvent,
};
use crate::libraries::{liquidity_amounts, tick_math};
use crate::state::pool::Pool;
use crate::state::tick::GrowthSnapshot;

/// Settles the rewarder bank and the emission gauge up to `now`, then
/// returns the resulting global growth snapshot. Must run before any
/// position growth snapshot is taken or compared (the ordering guarantee
/// every liquidity-mutating op in this module follows).
fn settle_and_snapshot(pool: &mut Pool, now: i64) -> PoolResult<GrowthSnapshot> {
    pool.rewarders.settle(now, pool.active_liquidity)?;
    pool.emission.update_growth_global(now)?;
    Ok(pool.current_global_growth())
}

fn validate_tick_range(pool: &Pool, tick_lower: i32, tick_upper: i32) -> PoolResult<()> {
    if tick_lower >= tick_upper {
        return Err(PoolError::InvalidTickRange);
    }
    if tick_lower < tick_math::min_tick() || tick_upper > tick_math::max_tick() {
        return Err(PoolError::InvalidTickRange);
    }
    if tick_lower % pool.tick_spacing as i32 != 0 || tick_upper % pool.tick_spacing as i32 != 0 {
        return Err(PoolError::InvalidTickRange);
    }
    Ok(())
}

fn in_range(pool: &Pool, tick_lower: i32, tick_upper: i32) -> bool {
    tick_lower <= pool.current_tick_index && pool.current_tick_index < tick_upper
}

pub fn open_position(pool: &mut Pool, tick_lower: i32, tick_upper: i32) -> PoolResult<(u64, OpenPositionEvent)> {
    pool.require_not_paused()?;
    validate_tick_range(pool, tick_lower, tick_upper)?;
    let position_id = pool.positions.open(pool.id, tick_lower, tick_upper)?;
    Ok((position_id, OpenPositionEvent { pool_id: pool.id, position_id, tick_lower, tick_upper }))
}

pub fn close_position(pool: &mut Pool, position_id: u64) -> PoolResult<ClosePositionEvent> {
    pool.require_not_paused()?;
    let pos = pool.positions.get(position_id)?;
    if pos.pool_id != pool.id {
        return Err(PoolError::PositionPoolIdMismatch);
    }
    pool.positions.close(position_id)?;
    Ok(ClosePositionEvent { pool_id: pool.id, position_id })
}

/// Shared core for both add-liquidity entry points: applies `liquidity_delta`
/// at both endpoints, updates active liquidity if the position is in range,
/// and folds the new growth-inside snapshot into the position.
fn apply_liquidity_delta(
    pool: &mut Pool,
    position_id: u64,
    liquidity_delta: u128,
    increase: bool,
    now: i64,
) -> PoolResult<(u64, u64)> {
    let pos = *pool.positions.get(position_id)?;
    if pos.pool_id != pool.id {
        return Err(PoolError::PositionPoolIdMismatch);
    }
    if pos.is_staked {
        return Err(PoolError::PositionIsStaked);
    }

    let global = settle_and_snapshot(pool, now)?;

    let sqrt_lower = tick_math::get_sqrt_price_at_tick(pos.tick_lower)?;
    let sqrt_upper = tick_math::get_sqrt_price_at_tick(pos.tick_upper)?;
    let (amount_a, amount_b) = liquidity_amounts::get_amounts_for_liquidity(
        pool.current_sqrt_price,
        sqrt_lower,
        sqrt_upper,
        liquidity_delta,
        increase,
    );

    let signed_delta = i128::try_from(liquidity_delta).map_err(|_| PoolError::LiquidityAdditionOverflow)?;
    let signed_delta = if increase { signed_delta } else { -signed_delta };

    pool.ticks.update_liquidity(pos.tick_lower, signed_delta, false, &global, pool.current_tick_index)?;
    pool.ticks.update_liquidity(pos.tick_upper, signed_delta, true, &global, pool.current_tick_index)?;

    if in_range(pool, pos.tick_lower, pos.tick_upper) {
        pool.active_liquidity = if increase {
            pool.active_liquidity.checked_add(liquidity_delta).ok_or(PoolError::LiquidityAdditionOverflow)?
        } else {
            pool.active_liquidity.checked_sub(liquidity_delta).ok_or(PoolError::InsufficientLiquidity)?
        };
    }

    let growth_inside_now = pool.ticks.growth_inside(pool.current_tick_index, &global, pos.tick_lower, pos.tick_upper);
    if increase {
        pool.positions.increase_liquidity(position_id, liquidity_delta, growth_inside_now)?;
    } else {
        pool.positions.decrease_liquidity(position_id, liquidity_delta, growth_inside_now)?;
    }

    Ok((amount_a, amount_b))
}

/// Adds `liquidity_delta` to an existing position, failing if either token
/// amount required exceeds its max.
pub fn add_liquidity(
    pool: &mut Pool,
    position_id: u64,
    liquidity_delta: u128,
    amount_a_max: u64,
    amount_b_max: u64,
    now: i64,
) -> PoolResult<(AddLiquidityReceipt, AddLiquidityEvent)> {
    pool.require_not_paused()?;
    if liquidity_delta == 0 {
        return Err(PoolError::ZeroLiquidity);
    }
    let (amount_a, amount_b) = apply_liquidity_delta(pool, position_id, liquidity_delta, true, now)?;
    if amount_a > amount_a_max || amount_b > amount_b_max {
        return Err(PoolError::InsufficientAmount);
    }
    pool.reserve_a = pool.reserve_a.checked_add(amount_a).ok_or(PoolError::AmountInOverflow)?;
    pool.reserve_b = pool.reserve_b.checked_add(amount_b).ok_or(PoolError::AmountInOverflow)?;

    let receipt = AddLiquidityReceipt::new(pool.id, amount_a, amount_b);
    let event = AddLiquidityEvent { pool_id: pool.id, position_id, liquidity_delta, amount_a, amount_b };
    Ok((receipt, event))
}

/// Adds liquidity sized so that exactly `fixed_amount` of one side is spent,
/// deriving `liquidity_delta` from it first.
pub fn add_liquidity_fix_coin(
    pool: &mut Pool,
    position_id: u64,
    fixed_amount: u64,
    fix_amount_a: bool,
    other_amount_max: u64,
    now: i64,
) -> PoolResult<(AddLiquidityReceipt, AddLiquidityEvent)> {
    pool.require_not_paused()?;
    let pos = *pool.positions.get(position_id)?;
    if pos.pool_id != pool.id {
        return Err(PoolError::PositionPoolIdMismatch);
    }
    let sqrt_lower = tick_math::get_sqrt_price_at_tick(pos.tick_lower)?;
    let sqrt_upper = tick_math::get_sqrt_price_at_tick(pos.tick_upper)?;
    let liquidity_delta = if fix_amount_a {
        liquidity_amounts::get_liquidity_for_amount_0(sqrt_lower, sqrt_upper, fixed_amount)
    } else {
        liquidity_amounts::get_liquidity_for_amount_1(sqrt_lower, sqrt_upper, fixed_amount)
    };
    if liquidity_delta == 0 {
        return Err(PoolError::ZeroLiquidity);
    }

    let (amount_a_max, amount_b_max) =
        if fix_amount_a { (fixed_amount, other_amount_max) } else { (other_amount_max, fixed_amount) };
    add_liquidity(pool, position_id, liquidity_delta, amount_a_max, amount_b_max, now)
}

/// Removes `liquidity_delta` from a position, returning the freed token
/// balances. Fails if either amount is below its caller-supplied minimum.
pub fn remove_liquidity(
    pool: &mut Pool,
    position_id: u64,
    liquidity_delta: u128,
    amount_a_min: u64,
    amount_b_min: u64,
    now: i64,
) -> PoolResult<(TokenBalance, TokenBalance, RemoveLiquidityEvent)> {
    pool.require_not_paused()?;
    if liquidity_delta == 0 {
        return Err(PoolError::ZeroLiquidity);
    }
    let (amount_a, amount_b) = apply_liquidity_delta(pool, position_id, liquidity_delta, false, now)?;
    if amount_a < amount_a_min || amount_b < amount_b_min {
        return Err(PoolError::InsufficientAmount);
    }
    pool.reserve_a = pool.reserve_a.checked_sub(amount_a).ok_or(PoolError::InsufficientAmount)?;
    pool.reserve_b = pool.reserve_b.checked_sub(amount_b).ok_or(PoolError::InsufficientAmount)?;

    let event = RemoveLiquidityEvent { pool_id: pool.id, position_id, liquidity_delta, amount_a, amount_b };
    Ok((TokenBalance(amount_a), TokenBalance(amount_b), event))
}

/// Settles owed fees for a position and withdraws them from the pool's
/// reserves (fees never left the reserve; they were already folded into it
/// on the swap side that generated them).
pub fn collect_fee(pool: &mut Pool, position_id: u64, now: i64) -> PoolResult<(TokenBalance, TokenBalance, CollectPositionFeeEvent)> {
    let pos = *pool.positions.get(position_id)?;
    if pos.pool_id != pool.id {
        return Err(PoolError::PositionPoolIdMismatch);
    }
    let global = settle_and_snapshot(pool, now)?;
    let growth_inside_now = pool.ticks.growth_inside(pool.current_tick_index, &global, pos.tick_lower, pos.tick_upper);
    pool.positions.update_accruals(position_id, growth_inside_now)?;
    let (amount_a, amount_b) = pool.positions.reset_fee_owed(position_id)?;

    pool.reserve_a = pool.reserve_a.checked_sub(amount_a).ok_or(PoolError::InsufficientAmount)?;
    pool.reserve_b = pool.reserve_b.checked_sub(amount_b).ok_or(PoolError::InsufficientAmount)?;

    let event = CollectPositionFeeEvent { pool_id: pool.id, position_id, amount_a, amount_b };
    Ok((TokenBalance(amount_a), TokenBalance(amount_b), event))
}

/// Settles and withdraws a single reward stream's owed amount from `vault`.
pub fn collect_reward<V: RewardVault>(
    pool: &mut Pool,
    position_id: u64,
    reward_index: usize,
    vault: &mut V,
    now: i64,
) -> PoolResult<(TokenBalance, CollectRewardEvent)> {
    let pos = *pool.positions.get(position_id)?;
    if pos.pool_id != pool.id {
        return Err(PoolError::PositionPoolIdMismatch);
    }
    let global = settle_and_snapshot(pool, now)?;
    let growth_inside_now = pool.ticks.growth_inside(pool.current_tick_index, &global, pos.tick_lower, pos.tick_upper);
    pool.positions.update_accruals(position_id, growth_inside_now)?;
    let amount = pool.positions.reset_reward_owed(position_id, reward_index)?;
    let balance = vault.withdraw_reward(reward_index, amount)?;

    let event = CollectRewardEvent { pool_id: pool.id, position_id, reward_index, amount };
    Ok((balance, event))
}

/// Marks a position's liquidity as staked into the gauge: folds it into
/// `staked_liquidity_net` at both endpoints and, if the position is
/// currently in range, into the pool's running `staked_liquidity`.
pub fn stake_position(pool: &mut Pool, position_id: u64, now: i64) -> PoolResult<UpdateStakedLiquidityEvent> {
    pool.require_not_paused()?;
    let pos = *pool.positions.get(position_id)?;
    if pos.pool_id != pool.id {
        return Err(PoolError::PositionPoolIdMismatch);
    }
    if pos.is_staked {
        return Err(PoolError::StakeAlreadyStaked);
    }
    if pos.liquidity == 0 {
        return Err(PoolError::ZeroLiquidity);
    }

    // Accrue emission under the old staked_liquidity before changing it.
    pool.emission.update_growth_global(now)?;

    let delta = i128::try_from(pos.liquidity).map_err(|_| PoolError::LiquidityAdditionOverflow)?;
    pool.ticks.update_staked_liquidity(pos.tick_lower, delta, false)?;
    pool.ticks.update_staked_liquidity(pos.tick_upper, delta, true)?;
    if in_range(pool, pos.tick_lower, pos.tick_upper) {
        pool.emission.staked_liquidity = pool
            .emission
            .staked_liquidity
            .checked_add(pos.liquidity)
            .ok_or(PoolError::LiquidityAdditionOverflow)?;
    }
    pool.positions.set_staked(position_id, true)?;

    Ok(UpdateStakedLiquidityEvent { pool_id: pool.id, staked_liquidity: pool.emission.staked_liquidity })
}

pub fn unstake_position(pool: &mut Pool, position_id: u64, now: i64) -> PoolResult<UpdateStakedLiquidityEvent> {
    pool.require_not_paused()?;
    let pos = *pool.positions.get(position_id)?;
    if pos.pool_id != pool.id {
        return Err(PoolError::PositionPoolIdMismatch);
    }
    if !pos.is_staked {
        return Err(PoolError::UnstakeNotStaked);
    }

    pool.emission.update_growth_global(now)?;

    let delta = i128::try_from(pos.liquidity).map_err(|_| PoolError::LiquidityAdditionOverflow)?;
    pool.ticks.update_staked_liquidity(pos.tick_lower, -delta, false)?;
    pool.ticks.update_staked_liquidity(pos.tick_upper, -delta, true)?;
    if in_range(pool, pos.tick_lower, pos.tick_upper) {
        pool.emission.staked_liquidity = pool
            .emission
            .staked_liquidity
            .checked_sub(pos.liquidity)
            .ok_or(PoolError::InsufficientStakedLiquidity)?;
    }
    pool.positions.set_staked(position_id, false)?;

    Ok(UpdateStakedLiquidityEvent { pool_id: pool.id, staked_liquidity: pool.emission.staked_liquidity })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_pool() -> Pool {
        Pool::new(1, 0, 60, 3000, 1u128 << 64, 0).unwrap()
    }

    #[test]
    fn open_and_add_liquidity_updates_active_liquidity() {
        let mut pool = setup_pool();
        let (pos_id, _) = open_position(&mut pool, -60, 60).unwrap();
        let (receipt, _event) = add_liquidity(&mut pool, pos_id, 1_000_000, u64::MAX, u64::MAX, 0).unwrap();
        assert_eq!(pool.active_liquidity, 1_000_000);
        receipt.consume(receipt.amount_a, receipt.amount_b).unwrap();
    }

    #[test]
    fn add_liquidity_out_of_range_does_not_change_active_liquidity() {
        let mut pool = setup_pool();
        let (pos_id, _) = open_position(&mut pool, 60, 120).unwrap();
        let (receipt, _event) = add_liquidity(&mut pool, pos_id, 1_000_000, u64::MAX, u64::MAX, 0).unwrap();
        assert_eq!(pool.active_liquidity, 0);
        receipt.consume(receipt.amount_a, receipt.amount_b).unwrap();
    }

    #[test]
    fn remove_liquidity_round_trips() {
        let mut pool = setup_pool();
        let (pos_id, _) = open_position(&mut pool, -60, 60).unwrap();
        let (receipt, _) = add_liquidity(&mut pool, pos_id, 1_000_000, u64::MAX, u64::MAX, 0).unwrap();
        receipt.consume(receipt.amount_a, receipt.amount_b).unwrap();
        let (a, b, _event) = remove_liquidity(&mut pool, pos_id, 1_000_000, 0, 0, 0).unwrap();
        assert_eq!(pool.active_liquidity, 0);
        assert!(a.value() > 0 || b.value() > 0);
    }

    #[test]
    fn stake_requires_liquidity() {
        let mut pool = setup_pool();
        let (pos_id, _) = open_position(&mut pool, -60, 60).unwrap();
        assert!(stake_position(&mut pool, pos_id, 0).is_err());
    }

    #[test]
    fn stake_then_unstake_round_trips_staked_liquidity() {
        let mut pool = setup_pool();
        let (pos_id, _) = open_position(&mut pool, -60, 60).unwrap();
        let (receipt, _) = add_liquidity(&mut pool, pos_id, 1_000_000, u64::MAX, u64::MAX, 0).unwrap();
        receipt.consume(receipt.amount_a, receipt.amount_b).unwrap();

        stake_position(&mut pool, pos_id, 1).unwrap();
        assert_eq!(pool.staked_liquidity(), 1_000_000);
        assert!(stake_position(&mut pool, pos_id, 1).is_err());

        unstake_position(&mut pool, pos_id, 2).unwrap();
        assert_eq!(pool.staked_liquidity(), 0);
    }

    #[test]
    fn cannot_add_liquidity_while_staked() {
        let mut pool = setup_pool();
        let (pos_id, _) = open_position(&mut pool, -60, 60).unwrap();
        let (receipt, _) = add_liquidity(&mut pool, pos_id, 1_000_000, u64::MAX, u64::MAX, 0).unwrap();
        receipt.consume(receipt.amount_a, receipt.amount_b).unwrap();
        stake_position(&mut pool, pos_id, 1).unwrap();
        assert!(add_liquidity(&mut pool, pos_id, 1000, u64::MAX, u64::MAX, 2).is_err());
    }

    #[test]
    fn close_position_rejects_nonempty() {
        let mut pool = setup_pool();
        let (pos_id, _) = open_position(&mut pool, -60, 60).unwrap();
        let (receipt, _) = add_liquidity(&mut pool, pos_id, 1_000_000, u64::MAX, u64::MAX, 0).unwrap();
        receipt.consume(receipt.amount_a, receipt.amount_b).unwrap();
        assert!(close_position(&mut pool, pos_id).is_err());
    }
}
