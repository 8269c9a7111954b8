//! Hot-potato receipts and the collaborator traits the core consumes but
//! does not own: reward vaults, partner fee-split objects.
//!
//! The teacher has no equivalent — its swap/liquidity instructions settle
//! balances directly via CPI token transfers inside one Anchor instruction,
//! so there's no receipt type to linearly thread through. This module is
//! grounded directly on §3's `FlashSwapReceipt`/`AddLiquidityReceipt` entries
//! and the concurrency model's "hot-potato discipline" (§5): deliberately
//! non-`Copy`, non-`Clone`, consumed by value so a caller can't accidentally
//! retain or duplicate an unpaid obligation.

use crate::error::{PoolError, PoolResult};

/// A token balance moved out of the pool's reserves, pending repayment.
/// Non-`Copy` so it must be explicitly joined back or otherwise accounted
/// for exactly once.
#[derive(Debug)]
pub struct TokenBalance(pub u64);

impl TokenBalance {
    pub fn value(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
pub struct FlashSwapReceipt {
    pub pool_id: u64,
    pub a2b: bool,
    pub partner_id: Option<u64>,
    pub pay_amount: u64,
    pub fee_amount: u64,
    pub protocol_fee_amount: u64,
    pub ref_fee_amount: u64,
    pub gauge_fee_amount: u64,
    consumed: bool,
}

impl FlashSwapReceipt {
    pub fn new(
        pool_id: u64,
        a2b: bool,
        partner_id: Option<u64>,
        pay_amount: u64,
        fee_amount: u64,
        protocol_fee_amount: u64,
        ref_fee_amount: u64,
        gauge_fee_amount: u64,
    ) -> Self {
        FlashSwapReceipt {
            pool_id,
            a2b,
            partner_id,
            pay_amount,
            fee_amount,
            protocol_fee_amount,
            ref_fee_amount,
            gauge_fee_amount,
            consumed: false,
        }
    }

    /// Consumes the receipt after verifying the paid balance matches
    /// `pay_amount` on the input side and the other side is empty.
    pub fn consume(mut self, paid_input_side: u64, paid_other_side: u64) -> PoolResult<()> {
        if paid_input_side != self.pay_amount || paid_other_side != 0 {
            self.consumed = true; // still drop cleanly even on failure
            return Err(PoolError::ZeroAmount);
        }
        self.consumed = true;
        Ok(())
    }
}

impl Drop for FlashSwapReceipt {
    fn drop(&mut self) {
        debug_assert!(self.consumed, "FlashSwapReceipt dropped without being repaid");
    }
}

#[derive(Debug)]
pub struct AddLiquidityReceipt {
    pub pool_id: u64,
    pub amount_a: u64,
    pub amount_b: u64,
    consumed: bool,
}

impl AddLiquidityReceipt {
    pub fn new(pool_id: u64, amount_a: u64, amount_b: u64) -> Self {
        AddLiquidityReceipt { pool_id, amount_a, amount_b, consumed: false }
    }

    pub fn consume(mut self, paid_a: u64, paid_b: u64) -> PoolResult<()> {
        if paid_a != self.amount_a || paid_b != self.amount_b {
            self.consumed = true;
            return Err(PoolError::LiquidityMismatch);
        }
        self.consumed = true;
        Ok(())
    }
}

impl Drop for AddLiquidityReceipt {
    fn drop(&mut self) {
        debug_assert!(self.consumed, "AddLiquidityReceipt dropped without being repaid");
    }
}

/// External reward escrow the pool draws from when a position claims a
/// reward owed amount.
pub trait RewardVault {
    fn withdraw_reward(&mut self, reward_index: usize, amount: u64) -> PoolResult<TokenBalance>;
}

/// External referral-program object the swap fee split pays into.
pub trait Partner {
    fn receive_ref_fee_a(&mut self, balance: TokenBalance) -> PoolResult<()>;
    fn receive_ref_fee_b(&mut self, balance: TokenBalance) -> PoolResult<()>;
    fn current_ref_fee_rate(&self, now: i64) -> u32;
    fn id(&self) -> u64;
}
