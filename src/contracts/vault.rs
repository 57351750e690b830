// Gated wrapper vault - share token over an underlying ERC20
//
// The wrapper holds deposited underlying and issues pro-rata shares.
// Every balance-affecting operation is gated by the vault's own pause flag,
// the Global Access Control pause switch, and the GAC blacklist. Withdrawals
// charge a basis-point fee credited to the treasury address.

use crate::contracts::gac::GlobalAccessControl;
use crate::contracts::token::{Erc20, TokenError};
use crate::types::{Address, Balance, Bps, Hash, MAX_BPS};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Vault errors. The `Display` strings for pause and blacklist gating are
/// the exact revert reasons callers assert on.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VaultError {
    #[error("Pausable: paused")]
    Paused,

    #[error("Pausable: not paused")]
    NotPaused,

    #[error("Pausable: GAC Paused")]
    GloballyPaused,

    #[error("blacklisted")]
    Blacklisted,

    #[error("transferFrom: disabled")]
    TransferFromDisabled,

    #[error("guestlist: proof rejected")]
    GuestListRejected,

    #[error("only governance")]
    NotGovernance,

    #[error("only governance or guardian")]
    NotPauser,

    #[error("withdraw amount exceeds shares: available={available}, required={required}")]
    InsufficientShares {
        available: Balance,
        required: Balance,
    },

    #[error("share allowance exceeded: available={available}, required={required}")]
    InsufficientAllowance {
        available: Balance,
        required: Balance,
    },

    #[error("math overflow")]
    MathOverflow,

    #[error(transparent)]
    Token(#[from] TokenError),
}

/// Gated wrapper vault state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatedVault {
    /// Address the vault occupies on chain (holds the underlying)
    pub address: Address,

    /// Governance of the wrapper
    affiliate: Address,

    pub manager: Address,
    pub guardian: Address,

    /// Receives withdrawal-fee proceeds
    treasury: Address,

    pub withdrawal_fee_bps: Bps,

    /// Carried for config parity; the wrapper holds all underlying itself so
    /// strategy withdrawals never deviate.
    pub withdrawal_max_deviation_bps: Bps,

    pub experimental_mode: bool,
    pub experimental_vault: Address,

    /// Optional deposit guest list. `None` admits everyone.
    guestlist_root: Option<Hash>,

    paused: bool,

    total_supply: Balance,
    shares: HashMap<Address, Balance>,
    allowances: HashMap<(Address, Address), Balance>,
}

/// Construction parameters for a wrapper vault
#[derive(Debug, Clone)]
pub struct VaultParams {
    pub address: Address,
    pub affiliate: Address,
    pub manager: Address,
    pub guardian: Address,
    pub treasury: Address,
    pub withdrawal_fee_bps: Bps,
    pub withdrawal_max_deviation_bps: Bps,
}

impl GatedVault {
    pub fn new(params: VaultParams) -> Self {
        Self {
            address: params.address,
            affiliate: params.affiliate,
            manager: params.manager,
            guardian: params.guardian,
            treasury: params.treasury,
            withdrawal_fee_bps: params.withdrawal_fee_bps,
            withdrawal_max_deviation_bps: params.withdrawal_max_deviation_bps,
            experimental_mode: false,
            experimental_vault: Address::ZERO,
            guestlist_root: None,
            paused: false,
            total_supply: 0,
            shares: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    pub fn affiliate(&self) -> Address {
        self.affiliate
    }

    pub fn treasury(&self) -> Address {
        self.treasury
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }

    pub fn balance_of(&self, owner: &Address) -> Balance {
        self.shares.get(owner).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Balance {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Underlying value of one full share scale, for inspection.
    /// Returns MAX_BPS when the vault is empty (1:1).
    pub fn price_per_share_bps(&self, token: &Erc20) -> Bps {
        if self.total_supply == 0 {
            return MAX_BPS;
        }
        let held = token.balance_of(&self.address);
        ((held.saturating_mul(MAX_BPS as Balance)) / self.total_supply) as Bps
    }

    // =========================================================================
    // ADMIN
    // =========================================================================

    /// Update the treasury address. Governance only.
    pub fn set_treasury(&mut self, caller: Address, treasury: Address) -> Result<(), VaultError> {
        self.ensure_governance(caller)?;
        debug!(old = %self.treasury, new = %treasury, "treasury updated");
        self.treasury = treasury;
        Ok(())
    }

    /// Set or clear the deposit guest list root. Governance only.
    pub fn set_guestlist_root(
        &mut self,
        caller: Address,
        root: Option<Hash>,
    ) -> Result<(), VaultError> {
        self.ensure_governance(caller)?;
        self.guestlist_root = root;
        Ok(())
    }

    /// Pause this vault. Governance or guardian.
    pub fn pause(&mut self, caller: Address) -> Result<(), VaultError> {
        if caller != self.affiliate && caller != self.guardian {
            return Err(VaultError::NotPauser);
        }
        if self.paused {
            return Err(VaultError::Paused);
        }
        self.paused = true;
        Ok(())
    }

    /// Unpause this vault. Governance only; works whether or not the GAC is
    /// itself paused.
    pub fn unpause(&mut self, caller: Address) -> Result<(), VaultError> {
        self.ensure_governance(caller)?;
        if !self.paused {
            return Err(VaultError::NotPaused);
        }
        self.paused = false;
        Ok(())
    }

    // =========================================================================
    // DEPOSITS
    // =========================================================================

    /// Deposit `amount` of underlying for the caller. Requires a prior
    /// underlying approval to the vault address. Returns minted shares.
    pub fn deposit(
        &mut self,
        token: &mut Erc20,
        gac: &GlobalAccessControl,
        caller: Address,
        amount: Balance,
        proof: &[Hash],
    ) -> Result<Balance, VaultError> {
        self.deposit_for(token, gac, caller, caller, amount, proof)
    }

    /// Deposit the caller's entire underlying balance.
    pub fn deposit_all(
        &mut self,
        token: &mut Erc20,
        gac: &GlobalAccessControl,
        caller: Address,
        proof: &[Hash],
    ) -> Result<Balance, VaultError> {
        let amount = token.balance_of(&caller);
        self.deposit_for(token, gac, caller, caller, amount, proof)
    }

    /// Deposit on behalf of `recipient`: the caller pays the underlying,
    /// the recipient receives the shares.
    pub fn deposit_for(
        &mut self,
        token: &mut Erc20,
        gac: &GlobalAccessControl,
        caller: Address,
        recipient: Address,
        amount: Balance,
        proof: &[Hash],
    ) -> Result<Balance, VaultError> {
        self.ensure_operational(gac)?;
        self.ensure_not_blacklisted(gac, &[caller, recipient])?;
        self.check_guestlist(&recipient, proof)?;

        // Price shares against holdings before the pull
        let held = token.balance_of(&self.address);
        let minted = if self.total_supply == 0 || held == 0 {
            amount
        } else {
            amount
                .checked_mul(self.total_supply)
                .ok_or(VaultError::MathOverflow)?
                / held
        };

        token.transfer_from(self.address, caller, self.address, amount)?;

        let balance = self.shares.entry(recipient).or_insert(0);
        *balance = balance.saturating_add(minted);
        self.total_supply = self.total_supply.saturating_add(minted);

        debug!(caller = %caller, recipient = %recipient, amount, minted, "deposit");
        Ok(minted)
    }

    // =========================================================================
    // WITHDRAWALS
    // =========================================================================

    /// Burn `shares` and pay out the pro-rata underlying, minus the
    /// withdrawal fee credited to the treasury. Returns the net payout.
    pub fn withdraw(
        &mut self,
        token: &mut Erc20,
        gac: &GlobalAccessControl,
        caller: Address,
        shares: Balance,
    ) -> Result<Balance, VaultError> {
        self.ensure_operational(gac)?;
        self.ensure_not_blacklisted(gac, &[caller])?;

        let held_shares = self.balance_of(&caller);
        if held_shares < shares {
            return Err(VaultError::InsufficientShares {
                available: held_shares,
                required: shares,
            });
        }

        let gross = if self.total_supply == 0 {
            0
        } else {
            let held = token.balance_of(&self.address);
            shares
                .checked_mul(held)
                .ok_or(VaultError::MathOverflow)?
                / self.total_supply
        };

        self.shares.insert(caller, held_shares - shares);
        self.total_supply -= shares;

        // Fee is capped at full scale so the payout can never underflow
        let fee_bps = self.withdrawal_fee_bps.min(MAX_BPS);
        let fee = gross
            .checked_mul(fee_bps as Balance)
            .ok_or(VaultError::MathOverflow)?
            / MAX_BPS as Balance;

        token.transfer(self.address, self.treasury, fee)?;
        token.transfer(self.address, caller, gross - fee)?;

        debug!(caller = %caller, shares, gross, fee, "withdraw");
        Ok(gross - fee)
    }

    /// Burn the caller's entire share balance.
    pub fn withdraw_all(
        &mut self,
        token: &mut Erc20,
        gac: &GlobalAccessControl,
        caller: Address,
    ) -> Result<Balance, VaultError> {
        let shares = self.balance_of(&caller);
        self.withdraw(token, gac, caller, shares)
    }

    // =========================================================================
    // SHARE TRANSFERS
    // =========================================================================

    pub fn transfer(
        &mut self,
        gac: &GlobalAccessControl,
        caller: Address,
        to: Address,
        amount: Balance,
    ) -> Result<(), VaultError> {
        self.ensure_operational(gac)?;
        self.ensure_not_blacklisted(gac, &[caller, to])?;
        self.move_shares(caller, to, amount)
    }

    /// Share approvals are deliberately ungated: a blacklisted holder may
    /// still approve, the spend itself is what gets rejected.
    pub fn approve(&mut self, caller: Address, spender: Address, amount: Balance) {
        self.allowances.insert((caller, spender), amount);
    }

    pub fn transfer_from(
        &mut self,
        gac: &GlobalAccessControl,
        caller: Address,
        from: Address,
        to: Address,
        amount: Balance,
    ) -> Result<(), VaultError> {
        self.ensure_operational(gac)?;
        self.ensure_not_blacklisted(gac, &[caller, from, to])?;
        if gac.transfer_from_disabled() {
            return Err(VaultError::TransferFromDisabled);
        }

        let allowed = self.allowance(&from, &caller);
        if allowed < amount {
            return Err(VaultError::InsufficientAllowance {
                available: allowed,
                required: amount,
            });
        }

        self.move_shares(from, to, amount)?;

        if allowed != Balance::MAX {
            self.allowances.insert((from, caller), allowed - amount);
        }
        Ok(())
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    /// Mint shares without moving underlying. Fixture-only seeding.
    pub(crate) fn seed_shares(&mut self, owner: Address, amount: Balance) {
        let balance = self.shares.entry(owner).or_insert(0);
        *balance = balance.saturating_add(amount);
        self.total_supply = self.total_supply.saturating_add(amount);
    }

    pub(crate) fn force_pause(&mut self) {
        self.paused = true;
    }

    fn move_shares(&mut self, from: Address, to: Address, amount: Balance) -> Result<(), VaultError> {
        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(VaultError::InsufficientShares {
                available: from_balance,
                required: amount,
            });
        }

        self.shares.insert(from, from_balance - amount);
        let to_balance = self.shares.entry(to).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);
        Ok(())
    }

    fn ensure_governance(&self, caller: Address) -> Result<(), VaultError> {
        if caller != self.affiliate {
            return Err(VaultError::NotGovernance);
        }
        Ok(())
    }

    /// Local pause is checked first, then the global switch.
    fn ensure_operational(&self, gac: &GlobalAccessControl) -> Result<(), VaultError> {
        if self.paused {
            return Err(VaultError::Paused);
        }
        if gac.paused() {
            return Err(VaultError::GloballyPaused);
        }
        Ok(())
    }

    fn ensure_not_blacklisted(
        &self,
        gac: &GlobalAccessControl,
        participants: &[Address],
    ) -> Result<(), VaultError> {
        if participants.iter().any(|p| gac.is_blacklisted(p)) {
            return Err(VaultError::Blacklisted);
        }
        Ok(())
    }

    fn check_guestlist(&self, recipient: &Address, proof: &[Hash]) -> Result<(), VaultError> {
        let Some(root) = self.guestlist_root else {
            return Ok(());
        };

        let mut acc = Hash::hash(recipient.as_bytes());
        for node in proof {
            acc = acc.combine(node);
        }
        if acc != root {
            return Err(VaultError::GuestListRejected);
        }
        Ok(())
    }
}
