// Global Access Control - shared gating module for Sett vaults
//
// This contract manages:
// - The global pause switch (guardian can pause, only governance unpauses)
// - The blacklist role registry shared across vaults
// - The transferFrom kill-switch

use crate::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::debug;

/// Roles managed by the access-control registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Address barred from every vault operation
    Blacklisted,
    /// May trigger the global pause (in addition to guardian/governance)
    Pauser,
    /// May lift the global pause (in addition to governance)
    Unpauser,
}

/// Events emitted by the contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GacEvent {
    Paused { by: Address },
    Unpaused { by: Address },
    RoleGranted { role: Role, account: Address },
    RoleRevoked { role: Role, account: Address },
    TransferFromEnabled,
    TransferFromDisabled,
}

/// Access-control errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GacError {
    #[error("GAC: caller is not governance")]
    NotGovernance,

    #[error("GAC: caller cannot pause")]
    NotPauser,

    #[error("GAC: caller cannot unpause")]
    NotUnpauser,

    #[error("Pausable: paused")]
    AlreadyPaused,

    #[error("Pausable: not paused")]
    NotPaused,
}

/// Global Access Control module
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalAccessControl {
    /// Governance (dev multisig)
    dev_multisig: Address,

    /// War-room guardian, may pause but never unpause
    guardian: Address,

    /// Global pause switch
    paused: bool,

    /// While set, vault transferFrom is rejected across the board
    transfer_from_disabled: bool,

    /// Role membership
    roles: HashMap<Role, HashSet<Address>>,

    /// Events emitted (for auditing)
    #[serde(skip)]
    events: Vec<GacEvent>,
}

impl GlobalAccessControl {
    pub fn new(dev_multisig: Address, guardian: Address) -> Self {
        Self {
            dev_multisig,
            guardian,
            paused: false,
            transfer_from_disabled: false,
            roles: HashMap::new(),
            events: Vec::new(),
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn dev_multisig(&self) -> Address {
        self.dev_multisig
    }

    pub fn guardian(&self) -> Address {
        self.guardian
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn transfer_from_disabled(&self) -> bool {
        self.transfer_from_disabled
    }

    pub fn has_role(&self, role: Role, account: &Address) -> bool {
        self.roles
            .get(&role)
            .map(|members| members.contains(account))
            .unwrap_or(false)
    }

    pub fn is_blacklisted(&self, account: &Address) -> bool {
        self.has_role(Role::Blacklisted, account)
    }

    // =========================================================================
    // PAUSE SWITCH
    // =========================================================================

    /// Pause globally. Guardian, governance, or a `Pauser` role holder.
    pub fn pause(&mut self, caller: Address) -> Result<(), GacError> {
        if caller != self.guardian
            && caller != self.dev_multisig
            && !self.has_role(Role::Pauser, &caller)
        {
            return Err(GacError::NotPauser);
        }
        if self.paused {
            return Err(GacError::AlreadyPaused);
        }

        self.paused = true;
        self.events.push(GacEvent::Paused { by: caller });
        debug!(by = %caller, "GAC paused");
        Ok(())
    }

    /// Lift the global pause. Governance or an `Unpauser` role holder.
    pub fn unpause(&mut self, caller: Address) -> Result<(), GacError> {
        if caller != self.dev_multisig && !self.has_role(Role::Unpauser, &caller) {
            return Err(GacError::NotUnpauser);
        }
        if !self.paused {
            return Err(GacError::NotPaused);
        }

        self.paused = false;
        self.events.push(GacEvent::Unpaused { by: caller });
        debug!(by = %caller, "GAC unpaused");
        Ok(())
    }

    // =========================================================================
    // TRANSFER-FROM KILL-SWITCH
    // =========================================================================

    pub fn enable_transfer_from(&mut self, caller: Address) -> Result<(), GacError> {
        self.ensure_governance(caller)?;
        self.transfer_from_disabled = false;
        self.events.push(GacEvent::TransferFromEnabled);
        Ok(())
    }

    pub fn disable_transfer_from(&mut self, caller: Address) -> Result<(), GacError> {
        self.ensure_governance(caller)?;
        self.transfer_from_disabled = true;
        self.events.push(GacEvent::TransferFromDisabled);
        Ok(())
    }

    // =========================================================================
    // ROLES
    // =========================================================================

    pub fn grant_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), GacError> {
        self.ensure_governance(caller)?;

        if self.roles.entry(role).or_default().insert(account) {
            self.events.push(GacEvent::RoleGranted { role, account });
            debug!(?role, account = %account, "role granted");
        }
        Ok(())
    }

    pub fn revoke_role(
        &mut self,
        caller: Address,
        role: Role,
        account: Address,
    ) -> Result<(), GacError> {
        self.ensure_governance(caller)?;

        let removed = self
            .roles
            .get_mut(&role)
            .map(|members| members.remove(&account))
            .unwrap_or(false);
        if removed {
            self.events.push(GacEvent::RoleRevoked { role, account });
        }
        Ok(())
    }

    /// Seed the pause switch without an authorized caller. Fixture-only.
    pub(crate) fn force_pause(&mut self) {
        self.paused = true;
    }

    /// Seed the kill-switch without an authorized caller. Fixture-only.
    pub(crate) fn force_disable_transfer_from(&mut self) {
        self.transfer_from_disabled = true;
    }

    /// Drain emitted events (for auditing)
    pub fn drain_events(&mut self) -> Vec<GacEvent> {
        std::mem::take(&mut self.events)
    }

    fn ensure_governance(&self, caller: Address) -> Result<(), GacError> {
        if caller != self.dev_multisig {
            return Err(GacError::NotGovernance);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (GlobalAccessControl, Address, Address) {
        let gov = Address::from_bytes([0xAA; 20]);
        let guardian = Address::from_bytes([0xBB; 20]);
        (GlobalAccessControl::new(gov, guardian), gov, guardian)
    }

    #[test]
    fn test_guardian_can_pause_but_not_unpause() {
        let (mut gac, gov, guardian) = setup();

        gac.pause(guardian).unwrap();
        assert!(gac.paused());

        assert_eq!(gac.unpause(guardian), Err(GacError::NotUnpauser));
        gac.unpause(gov).unwrap();
        assert!(!gac.paused());
    }

    #[test]
    fn test_random_caller_cannot_pause() {
        let (mut gac, _gov, _guardian) = setup();
        let rando = Address::from_bytes([1; 20]);

        assert_eq!(gac.pause(rando), Err(GacError::NotPauser));
        assert!(!gac.paused());
    }

    #[test]
    fn test_double_pause_rejected() {
        let (mut gac, gov, _guardian) = setup();

        gac.pause(gov).unwrap();
        assert_eq!(gac.pause(gov), Err(GacError::AlreadyPaused));
    }

    #[test]
    fn test_unpause_without_pause_rejected() {
        let (mut gac, gov, _guardian) = setup();
        assert_eq!(gac.unpause(gov), Err(GacError::NotPaused));
    }

    #[test]
    fn test_pauser_role_holder_can_pause() {
        let (mut gac, gov, _guardian) = setup();
        let ops = Address::from_bytes([2; 20]);

        gac.grant_role(gov, Role::Pauser, ops).unwrap();
        gac.pause(ops).unwrap();
        assert!(gac.paused());
    }

    #[test]
    fn test_blacklist_grant_and_revoke() {
        let (mut gac, gov, _guardian) = setup();
        let exploiter = Address::from_bytes([3; 20]);

        assert!(!gac.is_blacklisted(&exploiter));
        gac.grant_role(gov, Role::Blacklisted, exploiter).unwrap();
        assert!(gac.is_blacklisted(&exploiter));
        gac.revoke_role(gov, Role::Blacklisted, exploiter).unwrap();
        assert!(!gac.is_blacklisted(&exploiter));
    }

    #[test]
    fn test_only_governance_manages_roles() {
        let (mut gac, _gov, guardian) = setup();
        let exploiter = Address::from_bytes([3; 20]);

        assert_eq!(
            gac.grant_role(guardian, Role::Blacklisted, exploiter),
            Err(GacError::NotGovernance)
        );
    }

    #[test]
    fn test_transfer_from_kill_switch() {
        let (mut gac, gov, guardian) = setup();

        gac.disable_transfer_from(gov).unwrap();
        assert!(gac.transfer_from_disabled());

        assert_eq!(gac.enable_transfer_from(guardian), Err(GacError::NotGovernance));
        gac.enable_transfer_from(gov).unwrap();
        assert!(!gac.transfer_from_disabled());
    }

    #[test]
    fn test_events_drain() {
        let (mut gac, gov, _guardian) = setup();

        gac.pause(gov).unwrap();
        gac.unpause(gov).unwrap();

        let events = gac.drain_events();
        assert_eq!(
            events,
            vec![
                GacEvent::Paused { by: gov },
                GacEvent::Unpaused { by: gov },
            ]
        );
        assert!(gac.drain_events().is_empty());
    }
}
