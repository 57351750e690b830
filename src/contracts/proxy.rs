// Proxy admin - upgrade registry for proxied contracts
//
// Tracks which logic each proxy address points at. Upgrades flip the
// pointer without touching proxy state, which is how the scenarios assert
// that vault configuration survives an implementation swap.

use crate::types::{Address, Hash};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::info;

/// Identifier for a deployed logic contract
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicId(Hash);

impl LogicId {
    /// Derive an id from a human-readable label and version.
    pub fn new(label: &str, version: u32) -> Self {
        let mut buf = Vec::with_capacity(label.len() + 4);
        buf.extend_from_slice(label.as_bytes());
        buf.extend_from_slice(&version.to_le_bytes());
        LogicId(Hash::hash(&buf))
    }
}

impl std::fmt::Display for LogicId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Proxy admin errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProxyError {
    #[error("caller is not the proxy admin owner")]
    NotOwner,

    #[error("unknown proxy: {0}")]
    UnknownProxy(Address),
}

/// Upgrade registry owned by governance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProxyAdmin {
    owner: Address,
    implementations: HashMap<Address, LogicId>,
}

impl ProxyAdmin {
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            implementations: HashMap::new(),
        }
    }

    pub fn owner(&self) -> Address {
        self.owner
    }

    pub fn implementation_of(&self, proxy: &Address) -> Option<LogicId> {
        self.implementations.get(proxy).copied()
    }

    /// Record a proxy and its current logic. Fixture-only seeding.
    pub(crate) fn register(&mut self, proxy: Address, logic: LogicId) {
        self.implementations.insert(proxy, logic);
    }

    /// Point `proxy` at `new_logic`. Owner only; the proxy must already
    /// be registered.
    pub fn upgrade(
        &mut self,
        caller: Address,
        proxy: Address,
        new_logic: LogicId,
    ) -> Result<(), ProxyError> {
        if caller != self.owner {
            return Err(ProxyError::NotOwner);
        }
        let slot = self
            .implementations
            .get_mut(&proxy)
            .ok_or(ProxyError::UnknownProxy(proxy))?;

        info!(proxy = %proxy, old = %*slot, new = %new_logic, "proxy upgraded");
        *slot = new_logic;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(seed: u8) -> Address {
        Address::from_bytes([seed; 20])
    }

    #[test]
    fn test_upgrade_flips_implementation() {
        let gov = account(1);
        let proxy = account(9);
        let v1 = LogicId::new("wrapper", 1);
        let v2 = LogicId::new("wrapper", 2);

        let mut admin = ProxyAdmin::new(gov);
        admin.register(proxy, v1);
        assert_eq!(admin.implementation_of(&proxy), Some(v1));

        admin.upgrade(gov, proxy, v2).unwrap();
        assert_eq!(admin.implementation_of(&proxy), Some(v2));
    }

    #[test]
    fn test_upgrade_requires_owner() {
        let gov = account(1);
        let rando = account(2);
        let proxy = account(9);
        let v1 = LogicId::new("wrapper", 1);

        let mut admin = ProxyAdmin::new(gov);
        admin.register(proxy, v1);

        assert_eq!(
            admin.upgrade(rando, proxy, LogicId::new("wrapper", 2)),
            Err(ProxyError::NotOwner)
        );
        assert_eq!(admin.implementation_of(&proxy), Some(v1));
    }

    #[test]
    fn test_upgrade_unknown_proxy_rejected() {
        let gov = account(1);
        let mut admin = ProxyAdmin::new(gov);

        let result = admin.upgrade(gov, account(9), LogicId::new("wrapper", 2));
        assert_eq!(result, Err(ProxyError::UnknownProxy(account(9))));
    }

    #[test]
    fn test_logic_ids_distinct_per_version() {
        assert_ne!(LogicId::new("wrapper", 1), LogicId::new("wrapper", 2));
        assert_ne!(LogicId::new("wrapper", 1), LogicId::new("gac", 1));
    }
}
