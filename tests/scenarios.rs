//! Seed scenario suite and pool-level invariants, exercised end to end
//! through the public `ops` entry points rather than internal state
//! shortcuts.

use clmm_pool_core::ops::{admin, liquidity, swap};
use clmm_pool_core::state::config::GlobalConfig;
use clmm_pool_core::{Pool, PoolError};

const Q64: u128 = 1u128 << 64;

fn pool_with_full_range_liquidity(liquidity_amount: u128) -> (Pool, u64) {
    let mut pool = Pool::new(1, 0, 60, 3000, Q64, 0).unwrap();
    let (position_id, _) = liquidity::open_position(&mut pool, -60, 60).unwrap();
    let (receipt, _) =
        liquidity::add_liquidity(&mut pool, position_id, liquidity_amount, u64::MAX, u64::MAX, 0).unwrap();
    receipt.consume(receipt.amount_a, receipt.amount_b).unwrap();
    (pool, position_id)
}

/// S1 — single-tick swap, exact input. The swap is far too small to reach
/// either tick boundary, so it stays within the single initialized range
/// and the fee/amount split matches the spec's worked example directly.
#[test]
fn s1_single_tick_swap_exact_input() {
    let (mut pool, _) = pool_with_full_range_liquidity(1_000_000);

    let params = swap::SwapParams {
        a2b: true,
        by_amount_in: true,
        sqrt_price_limit: clmm_pool_core::libraries::tick_math::min_sqrt_price(),
        amount: 1000,
        unstaked_fee_rate: 0,
        protocol_fee_rate: 120_000,
        ref_fee_rate: 0,
        now: 0,
    };
    let (result, event) = swap::swap_in_pool(&mut pool, params).unwrap();

    assert_eq!(result.fee_amount, 3);
    assert_eq!(result.amount_in + result.fee_amount, 1000);
    assert_eq!(result.protocol_fee, 1); // ceil(3 * 120_000 / 1_000_000) = 1
    assert!(pool.current_sqrt_price < Q64);
    assert!((-60..=0).contains(&pool.current_tick_index));
    assert_eq!(event.tick_index_after, pool.current_tick_index);
}

/// S2 — a swap far larger than the initialized range's liquidity can supply
/// runs off the edge of the tick grid; the read-only preview reports this
/// via `is_exceed` rather than silently succeeding.
#[test]
fn s2_tick_crossing_swap_exhausts_initialized_range() {
    let (pool, _) = pool_with_full_range_liquidity(1_000_000);

    let params = swap::SwapParams {
        a2b: true,
        by_amount_in: true,
        sqrt_price_limit: clmm_pool_core::libraries::tick_math::min_sqrt_price(),
        amount: 10_000_000,
        unstaked_fee_rate: 0,
        protocol_fee_rate: 0,
        ref_fee_rate: 0,
        now: 0,
    };
    let preview = swap::calculate_swap_result(&pool, params).unwrap();
    assert!(preview.is_exceed);
    assert!(preview.steps >= 1);
}

/// S3 — exact output, capped by a tight price limit rather than by the
/// requested output amount.
#[test]
fn s3_exact_output_capped_by_price_limit() {
    let (pool, _) = pool_with_full_range_liquidity(1_000_000);
    let limit = pool.current_sqrt_price + 1;

    let params = swap::SwapParams {
        a2b: false,
        by_amount_in: false,
        sqrt_price_limit: limit,
        amount: 500,
        unstaked_fee_rate: 0,
        protocol_fee_rate: 0,
        ref_fee_rate: 0,
        now: 0,
    };
    let preview = swap::calculate_swap_result(&pool, params).unwrap();
    assert!(preview.amount_out <= 500);
    assert_eq!(preview.steps, 1);
}

/// S4 — adding then immediately removing the same liquidity at an unchanged
/// price returns amounts no greater than what was deposited, and the
/// boundary ticks are pruned back out of storage.
#[test]
fn s4_liquidity_round_trip_is_conservative_and_prunes_ticks() {
    let mut pool = Pool::new(1, 0, 60, 3000, Q64, 0).unwrap();
    let (position_id, _) = liquidity::open_position(&mut pool, -120, 120).unwrap();
    let (receipt, _) =
        liquidity::add_liquidity(&mut pool, position_id, 1_000_000_000, u64::MAX, u64::MAX, 0).unwrap();
    let (deposited_a, deposited_b) = (receipt.amount_a, receipt.amount_b);
    receipt.consume(deposited_a, deposited_b).unwrap();
    assert_eq!(pool.ticks.len(), 2);

    let (a, b, _event) = liquidity::remove_liquidity(&mut pool, position_id, 1_000_000_000, 0, 0, 0).unwrap();
    assert!(a.value() <= deposited_a);
    assert!(b.value() <= deposited_b);
    assert!(deposited_a - a.value() <= 1);
    assert!(deposited_b - b.value() <= 1);
    assert_eq!(pool.ticks.len(), 0);

    liquidity::close_position(&mut pool, position_id).unwrap();
}

/// S5 — emission accrues to `rollover` while unstaked, then to
/// `growth_global` once staked liquidity is present.
#[test]
fn s5_emission_accrual_rollover_then_growth() {
    let (mut pool, position_id) = pool_with_full_range_liquidity(1_000_000);
    let config = GlobalConfig::new(1, 0, 0, [1; 32], [2; 32], [3; 32]).unwrap();

    admin::sync_emission(&mut pool, &config, &[1; 32], 10 * Q64, 10_000, 1_000, 0).unwrap();

    // 100s pass with nothing staked: the whole accrual goes to rollover.
    pool.emission.update_growth_global(100).unwrap();
    assert_eq!(pool.emission.rollover, 1000);
    assert_eq!(pool.emission.growth_global, 0);

    liquidity::stake_position(&mut pool, position_id, 100).unwrap();
    assert_eq!(pool.staked_liquidity(), 1_000_000);

    // another 100s pass, now staked: growth_global should move.
    pool.emission.update_growth_global(200).unwrap();
    assert!(pool.emission.growth_global > 0);
}

/// S6 — a flash swap repaid with the wrong amount is rejected.
#[test]
fn s6_flash_swap_repayment_mismatch_fails() {
    let (mut pool, _) = pool_with_full_range_liquidity(1_000_000);

    let params = swap::SwapParams {
        a2b: true,
        by_amount_in: true,
        sqrt_price_limit: clmm_pool_core::libraries::tick_math::min_sqrt_price(),
        amount: 1000,
        unstaked_fee_rate: 0,
        protocol_fee_rate: 0,
        ref_fee_rate: 0,
        now: 0,
    };
    let (result, receipt) = swap::flash_swap(&mut pool, params).unwrap();
    let pay_amount = result.amount_in + result.fee_amount;

    assert_eq!(swap::repay_flash_swap(&mut pool, receipt, pay_amount - 1), Err(PoolError::ZeroAmount));
}

/// Invariant 1/2/3 — active/staked liquidity and the current tick index
/// stay internally consistent across a sequence of ops.
#[test]
fn invariant_liquidity_and_tick_consistency_across_ops() {
    let mut pool = Pool::new(1, 0, 60, 3000, Q64, 0).unwrap();
    let (pos_a, _) = liquidity::open_position(&mut pool, -120, 120).unwrap();
    let (receipt, _) = liquidity::add_liquidity(&mut pool, pos_a, 2_000_000, u64::MAX, u64::MAX, 0).unwrap();
    receipt.consume(receipt.amount_a, receipt.amount_b).unwrap();

    let (pos_b, _) = liquidity::open_position(&mut pool, -60, 60).unwrap();
    let (receipt, _) = liquidity::add_liquidity(&mut pool, pos_b, 500_000, u64::MAX, u64::MAX, 0).unwrap();
    receipt.consume(receipt.amount_a, receipt.amount_b).unwrap();

    let (net_l, net_ls) = pool.ticks.sum_nets_up_to(pool.current_tick_index);
    assert_eq!(net_l as u128, pool.active_liquidity);
    assert!(net_ls >= 0);
    assert!(pool.staked_liquidity() <= pool.active_liquidity);

    let params = swap::SwapParams {
        a2b: true,
        by_amount_in: true,
        sqrt_price_limit: clmm_pool_core::libraries::tick_math::min_sqrt_price(),
        amount: 5000,
        unstaked_fee_rate: 0,
        protocol_fee_rate: 0,
        ref_fee_rate: 0,
        now: 1,
    };
    swap::swap_in_pool(&mut pool, params).unwrap();

    assert_eq!(
        clmm_pool_core::libraries::tick_math::get_tick_at_sqrt_price(pool.current_sqrt_price).unwrap(),
        pool.current_tick_index
    );
    assert!(pool.staked_liquidity() <= pool.active_liquidity);
}

/// Invariant 6 — two positions with identical ranges opened before any
/// growth accrual earn fees proportional to their liquidity.
#[test]
fn invariant_equal_range_positions_earn_fees_proportional_to_liquidity() {
    let mut pool = Pool::new(1, 0, 60, 3000, Q64, 0).unwrap();
    let (pos_small, _) = liquidity::open_position(&mut pool, -120, 120).unwrap();
    let (r1, _) = liquidity::add_liquidity(&mut pool, pos_small, 1_000_000, u64::MAX, u64::MAX, 0).unwrap();
    r1.consume(r1.amount_a, r1.amount_b).unwrap();

    let (pos_big, _) = liquidity::open_position(&mut pool, -120, 120).unwrap();
    let (r2, _) = liquidity::add_liquidity(&mut pool, pos_big, 3_000_000, u64::MAX, u64::MAX, 0).unwrap();
    r2.consume(r2.amount_a, r2.amount_b).unwrap();

    let params = swap::SwapParams {
        a2b: true,
        by_amount_in: true,
        sqrt_price_limit: clmm_pool_core::libraries::tick_math::min_sqrt_price(),
        amount: 100_000,
        unstaked_fee_rate: 0,
        protocol_fee_rate: 0,
        ref_fee_rate: 0,
        now: 0,
    };
    swap::swap_in_pool(&mut pool, params).unwrap();

    let (fee_a_small, _, _) = liquidity::collect_fee(&mut pool, pos_small, 0).unwrap();
    let (fee_a_big, _, _) = liquidity::collect_fee(&mut pool, pos_big, 0).unwrap();

    // big position holds 3x the liquidity of small, so should earn ~3x fees.
    let ratio = fee_a_big.value() as f64 / fee_a_small.value().max(1) as f64;
    assert!((2.5..3.5).contains(&ratio), "ratio was {ratio}");
}

/// Admin surface: pause blocks swaps and liquidity mutation, protocol fee
/// collection is role-gated.
#[test]
fn admin_pause_blocks_mutating_ops() {
    let (mut pool, position_id) = pool_with_full_range_liquidity(1_000_000);
    let config = GlobalConfig::new(1, 0, 0, [1; 32], [2; 32], [3; 32]).unwrap();

    admin::pause(&mut pool, &config, &[3; 32]).unwrap();

    let params = swap::SwapParams {
        a2b: true,
        by_amount_in: true,
        sqrt_price_limit: clmm_pool_core::libraries::tick_math::min_sqrt_price(),
        amount: 1000,
        unstaked_fee_rate: 0,
        protocol_fee_rate: 0,
        ref_fee_rate: 0,
        now: 0,
    };
    assert_eq!(swap::swap_in_pool(&mut pool, params).unwrap_err(), PoolError::PoolPaused);
    assert_eq!(
        liquidity::add_liquidity(&mut pool, position_id, 1000, u64::MAX, u64::MAX, 0).unwrap_err(),
        PoolError::PoolPaused
    );

    admin::unpause(&mut pool, &config, &[3; 32]).unwrap();
}
