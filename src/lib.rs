//! Core state machine for a concentrated-liquidity AMM pool.
//!
//! Owns the tick grid, position accounting, swap engine and emission
//! distribution; has no on-chain runtime, RPC, or CLI surface of its own —
//! those are host integration concerns a caller wires up around this crate.

pub mod collaborators;
pub mod constants;
pub mod error;
pub mod events;
pub mod libraries;
pub mod ops;
pub mod state;

pub use collaborators::{AddLiquidityReceipt, FlashSwapReceipt, Partner, RewardVault, TokenBalance};
pub use error::{PoolError, PoolResult};
pub use events::PoolEvent;
pub use state::config::{GlobalConfig, Role};
pub use state::pool::Pool;
