//! Structured events emitted by every mutating operation.
//!
//! The teacher emits these via Anchor's `#[event]` + `emit!` macro
//! (`states/personal_position.rs`, `instructions/swap.rs`). There's no
//! on-chain event transport here, so each op returns its event value(s)
//! directly to the caller (who owns ordering and delivery) instead of
//! firing them through a global macro.

#[derive(Debug, Clone)]
pub struct OpenPositionEvent {
    pub pool_id: u64,
    pub position_id: u64,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[derive(Debug, Clone)]
pub struct ClosePositionEvent {
    pub pool_id: u64,
    pub position_id: u64,
}

#[derive(Debug, Clone)]
pub struct AddLiquidityEvent {
    pub pool_id: u64,
    pub position_id: u64,
    pub liquidity_delta: u128,
    pub amount_a: u64,
    pub amount_b: u64,
}

#[derive(Debug, Clone)]
pub struct RemoveLiquidityEvent {
    pub pool_id: u64,
    pub position_id: u64,
    pub liquidity_delta: u128,
    pub amount_a: u64,
    pub amount_b: u64,
}

#[derive(Debug, Clone)]
pub struct SwapEvent {
    pub pool_id: u64,
    pub a2b: bool,
    pub amount_in: u64,
    pub amount_out: u64,
    pub fee_amount: u64,
    pub protocol_fee_amount: u64,
    pub ref_fee_amount: u64,
    pub gauge_fee_amount: u64,
    pub sqrt_price_after: u128,
    pub tick_index_after: i32,
}

#[derive(Debug, Clone)]
pub struct CollectProtocolFeeEvent {
    pub pool_id: u64,
    pub amount_a: u64,
    pub amount_b: u64,
}

#[derive(Debug, Clone)]
pub struct CollectPositionFeeEvent {
    pub pool_id: u64,
    pub position_id: u64,
    pub amount_a: u64,
    pub amount_b: u64,
}

#[derive(Debug, Clone)]
pub struct CollectRewardEvent {
    pub pool_id: u64,
    pub position_id: u64,
    pub reward_index: usize,
    pub amount: u64,
}

#[derive(Debug, Clone)]
pub struct CollectGaugeFeeEvent {
    pub pool_id: u64,
    pub amount_a: u64,
    pub amount_b: u64,
}

#[derive(Debug, Clone)]
pub struct UpdateFeeRateEvent {
    pub pool_id: u64,
    pub old_rate: u32,
    pub new_rate: u32,
}

#[derive(Debug, Clone)]
pub struct UpdateUnstakedFeeRateEvent {
    pub pool_id: u64,
    pub new_rate: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct UpdateUrlEvent {
    pub pool_id: u64,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct PauseEvent {
    pub pool_id: u64,
}

#[derive(Debug, Clone)]
pub struct UnpauseEvent {
    pub pool_id: u64,
}

#[derive(Debug, Clone)]
pub struct UpdateFeeGrowthEvent {
    pub pool_id: u64,
    pub fee_growth_global_a: u128,
    pub fee_growth_global_b: u128,
}

#[derive(Debug, Clone)]
pub struct UpdateEmissionGrowthEvent {
    pub pool_id: u64,
    pub growth_global: u128,
    pub distributed: u64,
}

#[derive(Debug, Clone)]
pub struct UpdateStakedLiquidityEvent {
    pub pool_id: u64,
    pub staked_liquidity: u128,
}

#[derive(Debug, Clone)]
pub struct RestoreStakedLiquidityEvent {
    pub pool_id: u64,
    pub active_liquidity: u128,
    pub staked_liquidity: u128,
}

#[derive(Debug, Clone)]
pub struct AddRewarderEvent {
    pub pool_id: u64,
    pub index: usize,
    pub reward_token_type: u8,
}

#[derive(Debug, Clone)]
pub struct UpdateEmissionEvent {
    pub pool_id: u64,
    pub index: usize,
    pub emission_per_second: u128,
}

#[derive(Debug, Clone)]
pub struct InitGaugeEvent {
    pub pool_id: u64,
}

#[derive(Debug, Clone)]
pub struct SyncEmissionEvent {
    pub pool_id: u64,
    pub rate: u128,
    pub reserve: u64,
    pub period_finish: i64,
}

#[derive(Debug, Clone)]
pub enum PoolEvent {
    OpenPosition(OpenPositionEvent),
    ClosePosition(ClosePositionEvent),
    AddLiquidity(AddLiquidityEvent),
    RemoveLiquidity(RemoveLiquidityEvent),
    Swap(SwapEvent),
    CollectProtocolFee(CollectProtocolFeeEvent),
    CollectPositionFee(CollectPositionFeeEvent),
    CollectReward(CollectRewardEvent),
    CollectGaugeFee(CollectGaugeFeeEvent),
    UpdateFeeRate(UpdateFeeRateEvent),
    UpdateUnstakedFeeRate(UpdateUnstakedFeeRateEvent),
    UpdateUrl(UpdateUrlEvent),
    Pause(PauseEvent),
    Unpause(UnpauseEvent),
    UpdateFeeGrowth(UpdateFeeGrowthEvent),
    UpdateEmissionGrowth(UpdateEmissionGrowthEvent),
    UpdateStakedLiquidity(UpdateStakedLiquidityEvent),
    RestoreStakedLiquidity(RestoreStakedLiquidityEvent),
    AddRewarder(AddRewarderEvent),
    UpdateEmission(UpdateEmissionEvent),
    InitGauge(InitGaugeEvent),
    SyncEmission(SyncEmissionEvent),
}
