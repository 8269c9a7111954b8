//! The swap engine: walks the tick grid one initialized tick at a time,
//! solving each segment with `compute_swap_step` under constant liquidity
//! and splitting the fee ref -> protocol -> gauge -> lp at every step.
//!
//! Ported from the teacher's `instructions/swap.rs::swap_internal`, whose
//! while-loop / `StepComputations` shape this follows almost line for line;
//! generalized from the teacher's two-way (protocol/fund) split to the
//! four-way split and the emission-growth advance this pool needs.

use crate::collaborators::FlashSwapReceipt;
use crate::error::{PoolError, PoolResult};
use crate::events::SwapEvent;
use crate::libraries::{swap_math, tick_math};
use crate::state::pool::Pool;

#[derive(Debug, Default, Clone, Copy)]
pub struct SwapResult {
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub protocol_fee: u64,
    pub ref_fee: u64,
    pub gauge_fee: u64,
    pub steps: u32,
    /// Set by the read-only preview when the tick iterator runs dry before
    /// `amount_remaining` drains.
    pub is_exceed: bool,
}

/// Parameters the host supplies per swap call; these come from collaborator
/// objects (`GlobalConfig`, `Partner`) the core itself doesn't own.
pub struct SwapParams {
    pub a2b: bool,
    pub by_amount_in: bool,
    pub sqrt_price_limit: u128,
    pub amount: u64,
    pub unstaked_fee_rate: u32,
    pub protocol_fee_rate: u32,
    pub ref_fee_rate: u32,
    pub now: i64,
}

fn validate_preconditions(pool: &Pool, p: &SwapParams) -> PoolResult<()> {
    pool.require_not_paused()?;
    if p.amount == 0 {
        return Err(PoolError::ZeroAmount);
    }
    if p.ref_fee_rate > crate::constants::FEE_RATE_DENOM {
        return Err(PoolError::InvalidRefFeeRate);
    }
    if p.a2b {
        if !(pool.current_sqrt_price > p.sqrt_price_limit && p.sqrt_price_limit >= tick_math::min_sqrt_price()) {
            return Err(PoolError::InvalidPriceLimit);
        }
    } else if !(pool.current_sqrt_price < p.sqrt_price_limit && p.sqrt_price_limit <= tick_math::max_sqrt_price()) {
        return Err(PoolError::InvalidPriceLimit);
    }
    Ok(())
}

/// Runs the swap loop against live pool state, mutating it in place.
/// `allow_exceed` turns `NextTickNotFound` into a partial result with
/// `is_exceed = true` instead of an error, for the read-only preview.
fn run_swap(pool: &mut Pool, p: &SwapParams, allow_exceed: bool) -> PoolResult<SwapResult> {
    validate_preconditions(pool, p)?;

    let mut remaining: i64 = if p.by_amount_in {
        i64::try_from(p.amount).map_err(|_| PoolError::AmountInOverflow)?
    } else {
        -i64::try_from(p.amount).map_err(|_| PoolError::AmountOutOverflow)?
    };

    let mut result = SwapResult::default();

    while remaining != 0 && pool.current_sqrt_price != p.sqrt_price_limit {
        let next_tick_index = match pool.ticks.first_score_for_swap(pool.current_tick_index, p.a2b) {
            Some(t) => t,
            None => {
                if allow_exceed {
                    result.is_exceed = true;
                    break;
                }
                return Err(PoolError::NextTickNotFound);
            }
        };
        let tick_sqrt_price = tick_math::get_sqrt_price_at_tick(next_tick_index)?;
        let target = if p.a2b {
            p.sqrt_price_limit.max(tick_sqrt_price)
        } else {
            p.sqrt_price_limit.min(tick_sqrt_price)
        };

        let step = swap_math::compute_swap_step(
            pool.current_sqrt_price,
            target,
            pool.active_liquidity,
            remaining,
            pool.fee_rate,
        )?;
        #[cfg(feature = "enable-log")]
        log::trace!(
            "swap step: current={} target={} amount_in={} amount_out={} fee={}",
            pool.current_sqrt_price, target, step.amount_in, step.amount_out, step.fee_amount
        );

        if p.by_amount_in {
            let consumed = step
                .amount_in
                .checked_add(step.fee_amount)
                .ok_or(PoolError::AmountInOverflow)?;
            remaining = remaining
                .checked_sub(consumed as i64)
                .ok_or(PoolError::InsufficientAmount)?;
        } else {
            remaining = remaining
                .checked_add(step.amount_out as i64)
                .ok_or(PoolError::InsufficientAmount)?;
        }

        let split = swap_math::split_fee(
            step.fee_amount,
            p.ref_fee_rate,
            p.protocol_fee_rate,
            p.unstaked_fee_rate,
            pool.active_liquidity,
            pool.staked_liquidity(),
        )?;

        if pool.active_liquidity > 0 {
            let delta = ((split.lp_fee as u128) << 64) / pool.active_liquidity;
            if p.a2b {
                pool.fee_growth_global_a = pool.fee_growth_global_a.wrapping_add(delta);
            } else {
                pool.fee_growth_global_b = pool.fee_growth_global_b.wrapping_add(delta);
            }
        }

        result.amount_in = result.amount_in.checked_add(step.amount_in).ok_or(PoolError::AmountInOverflow)?;
        result.amount_out = result.amount_out.checked_add(step.amount_out).ok_or(PoolError::AmountOutOverflow)?;
        result.fee_amount = result.fee_amount.checked_add(step.fee_amount).ok_or(PoolError::FeeAmountOverflow)?;
        result.protocol_fee = result.protocol_fee.checked_add(split.protocol_fee).ok_or(PoolError::FeeAmountOverflow)?;
        result.ref_fee = result.ref_fee.checked_add(split.ref_fee).ok_or(PoolError::FeeAmountOverflow)?;
        result.gauge_fee = result.gauge_fee.checked_add(split.gauge_fee).ok_or(PoolError::FeeAmountOverflow)?;
        result.steps += 1;

        if step.sqrt_ratio_next_x64 == tick_sqrt_price {
            pool.current_sqrt_price = target;
            pool.current_tick_index = if p.a2b { next_tick_index - 1 } else { next_tick_index };

            pool.emission.update_growth_global(p.now)?;

            let global = pool.current_global_growth();
            let (new_active, new_staked) = pool.ticks.cross_by_swap(
                next_tick_index,
                p.a2b,
                pool.active_liquidity,
                pool.staked_liquidity(),
                &global,
            )?;
            pool.active_liquidity = new_active;
            pool.emission.staked_liquidity = new_staked;
        } else if step.sqrt_ratio_next_x64 != pool.current_sqrt_price {
            pool.current_sqrt_price = step.sqrt_ratio_next_x64;
            pool.current_tick_index = tick_math::get_tick_at_sqrt_price(step.sqrt_ratio_next_x64)?;
        }
    }

    #[cfg(feature = "enable-log")]
    log::debug!("swap finished after {} steps, amount_in={} amount_out={}", result.steps, result.amount_in, result.amount_out);

    let (fee_side_a, fee_side_b) = if p.a2b {
        (result.protocol_fee, 0)
    } else {
        (0, result.protocol_fee)
    };
    pool.protocol_fee_a = pool.protocol_fee_a.checked_add(fee_side_a).ok_or(PoolError::FeeAmountOverflow)?;
    pool.protocol_fee_b = pool.protocol_fee_b.checked_add(fee_side_b).ok_or(PoolError::FeeAmountOverflow)?;

    pool.swap_in_amount = pool.swap_in_amount.saturating_add((result.amount_in + result.fee_amount) as u128);
    pool.swap_out_amount = pool.swap_out_amount.saturating_add(result.amount_out as u128);

    let (gauge_side_a, gauge_side_b) = if p.a2b {
        (result.gauge_fee, 0)
    } else {
        (0, result.gauge_fee)
    };
    pool.gauge_fee_a = pool.gauge_fee_a.checked_add(gauge_side_a).ok_or(PoolError::FeeAmountOverflow)?;
    pool.gauge_fee_b = pool.gauge_fee_b.checked_add(gauge_side_b).ok_or(PoolError::FeeAmountOverflow)?;

    Ok(result)
}

/// Executes a swap against live pool state and settles reserves directly
/// (no receipt — the caller's balances are assumed already available).
pub fn swap_in_pool(pool: &mut Pool, p: SwapParams) -> PoolResult<(SwapResult, SwapEvent)> {
    let result = run_swap(pool, &p, false)?;

    let (in_delta, out_delta) = if p.a2b {
        (result.amount_in + result.fee_amount, result.amount_out)
    } else {
        (result.amount_out, result.amount_in + result.fee_amount)
    };
    if p.a2b {
        pool.reserve_a = pool.reserve_a.checked_add(in_delta).ok_or(PoolError::AmountInOverflow)?;
        pool.reserve_b = pool.reserve_b.checked_sub(out_delta).ok_or(PoolError::InsufficientAmount)?;
    } else {
        pool.reserve_b = pool.reserve_b.checked_add(in_delta).ok_or(PoolError::AmountInOverflow)?;
        pool.reserve_a = pool.reserve_a.checked_sub(out_delta).ok_or(PoolError::InsufficientAmount)?;
    }

    let event = SwapEvent {
        pool_id: pool.id,
        a2b: p.a2b,
        amount_in: result.amount_in,
        amount_out: result.amount_out,
        fee_amount: result.fee_amount,
        protocol_fee_amount: result.protocol_fee,
        ref_fee_amount: result.ref_fee,
        gauge_fee_amount: result.gauge_fee,
        sqrt_price_after: pool.current_sqrt_price,
        tick_index_after: pool.current_tick_index,
    };
    Ok((result, event))
}

/// Read-only simulation against a cloned pool snapshot; never mutates the
/// caller's pool. Runs dry and sets `is_exceed` instead of erroring when the
/// tick iterator exhausts itself before `remaining` drains.
pub fn calculate_swap_result(pool: &Pool, p: SwapParams) -> PoolResult<SwapResult> {
    let mut scratch = pool.clone();
    run_swap(&mut scratch, &p, true)
}

/// Borrows `pay_amount` out of the pool ahead of repayment, returning a
/// receipt that must be consumed by a matching `repay_flash_swap`.
pub fn flash_swap(pool: &mut Pool, p: SwapParams) -> PoolResult<(SwapResult, FlashSwapReceipt)> {
    let result = run_swap(pool, &p, false)?;
    let pay_amount = result.amount_in.checked_add(result.fee_amount).ok_or(PoolError::AmountInOverflow)?;

    if p.a2b {
        pool.reserve_b = pool.reserve_b.checked_sub(result.amount_out).ok_or(PoolError::InsufficientAmount)?;
    } else {
        pool.reserve_a = pool.reserve_a.checked_sub(result.amount_out).ok_or(PoolError::InsufficientAmount)?;
    }

    let receipt = FlashSwapReceipt::new(
        pool.id,
        p.a2b,
        None,
        pay_amount,
        result.fee_amount,
        result.protocol_fee,
        result.ref_fee,
        result.gauge_fee,
    );
    Ok((result, receipt))
}

/// Repays a flash swap with no partner: the input-side paid balance must
/// equal `pay_amount` exactly and `ref_fee_amount` must be zero (there is
/// nowhere for a referral cut to go without a partner object).
pub fn repay_flash_swap(pool: &mut Pool, receipt: FlashSwapReceipt, paid_input_side: u64) -> PoolResult<()> {
    if receipt.pool_id != pool.id {
        return Err(PoolError::PoolIdMismatch);
    }
    if receipt.ref_fee_amount != 0 {
        return Err(PoolError::PartnerIdNotEmpty);
    }
    let a2b = receipt.a2b;
    let pay_amount = receipt.pay_amount;
    receipt.consume(paid_input_side, 0)?;
    if a2b {
        pool.reserve_a = pool.reserve_a.checked_add(pay_amount).ok_or(PoolError::AmountInOverflow)?;
    } else {
        pool.reserve_b = pool.reserve_b.checked_add(pay_amount).ok_or(PoolError::AmountInOverflow)?;
    }
    Ok(())
}

/// Repays a flash swap with a referral partner attached: `ref_fee_amount`
/// is split off to the partner, the remainder joins the reserve.
pub fn repay_flash_swap_with_partner<P: crate::collaborators::Partner>(
    pool: &mut Pool,
    receipt: FlashSwapReceipt,
    paid_input_side: u64,
    partner: &mut P,
) -> PoolResult<()> {
    if receipt.pool_id != pool.id {
        return Err(PoolError::PoolIdMismatch);
    }
    if receipt.partner_id != Some(partner.id()) {
        return Err(PoolError::PartnerIdMismatch);
    }
    let a2b = receipt.a2b;
    let pay_amount = receipt.pay_amount;
    let ref_fee_amount = receipt.ref_fee_amount;
    receipt.consume(paid_input_side, 0)?;

    let to_reserve = pay_amount.checked_sub(ref_fee_amount).ok_or(PoolError::InvalidRefFeeAmount)?;
    let ref_balance = crate::collaborators::TokenBalance(ref_fee_amount);
    if a2b {
        pool.reserve_a = pool.reserve_a.checked_add(to_reserve).ok_or(PoolError::AmountInOverflow)?;
        partner.receive_ref_fee_a(ref_balance)?;
    } else {
        pool.reserve_b = pool.reserve_b.checked_add(to_reserve).ok_or(PoolError::AmountInOverflow)?;
        partner.receive_ref_fee_b(ref_balance)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::pool::Pool;

    fn setup_pool() -> Pool {
        let mut pool = Pool::new(1, 0, 60, 3000, 1u128 << 64, 0).unwrap();
        let global = crate::state::tick::GrowthSnapshot::default();
        pool.ticks.update_liquidity(-60, 1_000_000, false, &global, 0).unwrap();
        pool.ticks.update_liquidity(60, 1_000_000, true, &global, 0).unwrap();
        pool.active_liquidity = 1_000_000;
        pool.reserve_a = 1_000_000_000;
        pool.reserve_b = 1_000_000_000;
        pool
    }

    #[test]
    fn s1_single_tick_exact_input_swap() {
        let mut pool = setup_pool();
        let params = SwapParams {
            a2b: true,
            by_amount_in: true,
            sqrt_price_limit: tick_math::min_sqrt_price(),
            amount: 1000,
            unstaked_fee_rate: 0,
            protocol_fee_rate: 120_000,
            ref_fee_rate: 0,
            now: 0,
        };
        let (result, _event) = swap_in_pool(&mut pool, params).unwrap();
        assert!(result.fee_amount > 0);
        assert_eq!(result.amount_in + result.fee_amount, 1000);
        assert!(pool.current_sqrt_price < 1u128 << 64);
        assert!(pool.current_tick_index >= -60 && pool.current_tick_index <= 0);
    }

    #[test]
    fn s2_tick_crossing_swap_runs_off_initialized_range() {
        let pool = setup_pool();
        let params = SwapParams {
            a2b: true,
            by_amount_in: true,
            sqrt_price_limit: tick_math::min_sqrt_price(),
            amount: 10_000_000,
            unstaked_fee_rate: 0,
            protocol_fee_rate: 0,
            ref_fee_rate: 0,
            now: 0,
        };
        // amount is large enough to cross the only initialized tick (-60) and
        // exhaust the grid; the read-only preview reports this instead of
        // erroring, the mutating call would reject it.
        let preview = calculate_swap_result(&pool, params).unwrap();
        assert!(preview.is_exceed);
        assert!(preview.steps >= 1);
    }

    #[test]
    fn s3_exact_output_with_price_limit_caps_loop() {
        let mut pool = setup_pool();
        let limit = pool.current_sqrt_price + 1;
        let params = SwapParams {
            a2b: false,
            by_amount_in: false,
            sqrt_price_limit: limit,
            amount: 500,
            unstaked_fee_rate: 0,
            protocol_fee_rate: 0,
            ref_fee_rate: 0,
            now: 0,
        };
        let preview = calculate_swap_result(&pool, params).unwrap();
        assert!(preview.amount_out <= 500);
    }

    #[test]
    fn s6_flash_swap_repayment_mismatch_fails() {
        let mut pool = setup_pool();
        let params = SwapParams {
            a2b: true,
            by_amount_in: true,
            sqrt_price_limit: tick_math::min_sqrt_price(),
            amount: 1000,
            unstaked_fee_rate: 0,
            protocol_fee_rate: 0,
            ref_fee_rate: 0,
            now: 0,
        };
        let (result, receipt) = flash_swap(&mut pool, params).unwrap();
        let pay_amount = result.amount_in + result.fee_amount;
        assert!(repay_flash_swap(&mut pool, receipt, pay_amount - 1).is_err());
    }

    #[test]
    fn rejects_zero_amount() {
        let mut pool = setup_pool();
        let params = SwapParams {
            a2b: true,
            by_amount_in: true,
            sqrt_price_limit: tick_math::min_sqrt_price(),
            amount: 0,
            unstaked_fee_rate: 0,
            protocol_fee_rate: 0,
            ref_fee_rate: 0,
            now: 0,
        };
        assert!(swap_in_pool(&mut pool, params).is_err());
    }

    #[test]
    fn rejects_swap_while_paused() {
        let mut pool = setup_pool();
        pool.pause().unwrap();
        let params = SwapParams {
            a2b: true,
            by_amount_in: true,
            sqrt_price_limit: tick_math::min_sqrt_price(),
            amount: 1000,
            unstaked_fee_rate: 0,
            protocol_fee_rate: 0,
            ref_fee_rate: 0,
            now: 0,
        };
        assert!(swap_in_pool(&mut pool, params).is_err());
    }
}
