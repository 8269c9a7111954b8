//! Protocol-wide parameters and role gating, mirrored from the teacher's
//! `states/config.rs::AmmConfig`.

use crate::constants::{FEE_RATE_DENOM, MAX_FEE_RATE, MAX_UNSTAKED_FEE_RATE, UNSTAKED_FEE_DENOM};
use crate::error::{PoolError, PoolResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    PoolManager,
    ProtocolFeeClaimer,
    Admin,
}

#[derive(Debug, Clone, Copy)]
pub struct GlobalConfig {
    pub package_version: u32,
    pub protocol_fee_rate: u32,
    pub default_unstaked_fee_rate: u32,
    pool_manager: [u8; 32],
    protocol_fee_claimer: [u8; 32],
    admin: [u8; 32],
}

impl GlobalConfig {
    pub fn new(
        package_version: u32,
        protocol_fee_rate: u32,
        default_unstaked_fee_rate: u32,
        pool_manager: [u8; 32],
        protocol_fee_claimer: [u8; 32],
        admin: [u8; 32],
    ) -> PoolResult<Self> {
        if protocol_fee_rate > MAX_FEE_RATE || default_unstaked_fee_rate > MAX_UNSTAKED_FEE_RATE {
            return Err(PoolError::InvalidFeeRate);
        }
        Ok(GlobalConfig {
            package_version,
            protocol_fee_rate,
            default_unstaked_fee_rate,
            pool_manager,
            protocol_fee_claimer,
            admin,
        })
    }

    pub fn protocol_fee_rate(&self) -> u32 {
        self.protocol_fee_rate
    }

    pub fn protocol_fee_rate_denom(&self) -> u32 {
        FEE_RATE_DENOM
    }

    pub fn default_unstaked_fee_rate(&self) -> u32 {
        self.default_unstaked_fee_rate
    }

    pub fn unstaked_liquidity_fee_rate_denom(&self) -> u32 {
        UNSTAKED_FEE_DENOM
    }

    pub fn require_role(&self, role: Role, caller: &[u8; 32]) -> PoolResult<()> {
        let authorized = match role {
            Role::PoolManager => &self.pool_manager,
            Role::ProtocolFeeClaimer => &self.protocol_fee_claimer,
            Role::Admin => &self.admin,
        };
        if authorized == caller {
            Ok(())
        } else {
            Err(PoolError::NotOwner)
        }
    }

    pub fn require_package_version(&self, version: u32) -> PoolResult<()> {
        if version == self.package_version {
            Ok(())
        } else {
            Err(PoolError::InvalidPoolOrPartnerId)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_fee_rate_above_cap() {
        assert!(GlobalConfig::new(1, MAX_FEE_RATE + 1, 0, [0; 32], [0; 32], [0; 32]).is_err());
    }

    #[test]
    fn role_check_rejects_wrong_caller() {
        let cfg = GlobalConfig::new(1, 1000, 1000, [1; 32], [2; 32], [3; 32]).unwrap();
        assert!(cfg.require_role(Role::PoolManager, &[1; 32]).is_ok());
        assert!(cfg.require_role(Role::PoolManager, &[9; 32]).is_err());
    }
}
