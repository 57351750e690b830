// Underlying token - minimal ERC20-style ledger
// Stands in for the deposited asset held by the vault wrapper.

use crate::types::{Address, Balance};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// ERC20-style token ledger
///
/// An allowance of `Balance::MAX` is treated as infinite and is not
/// decremented by `transfer_from`, matching common ERC20 behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Erc20 {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    total_supply: Balance,
    balances: HashMap<Address, Balance>,
    allowances: HashMap<(Address, Address), Balance>,
}

/// Token errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("transfer amount exceeds balance: available={available}, required={required}")]
    InsufficientBalance {
        available: Balance,
        required: Balance,
    },

    #[error("transfer amount exceeds allowance: available={available}, required={required}")]
    InsufficientAllowance {
        available: Balance,
        required: Balance,
    },

    #[error("transfer to the zero address")]
    ZeroAddress,
}

impl Erc20 {
    pub fn new(name: &str, symbol: &str, decimals: u8) -> Self {
        Self {
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn total_supply(&self) -> Balance {
        self.total_supply
    }

    pub fn balance_of(&self, owner: &Address) -> Balance {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Balance {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Mint fresh supply to `to`. Fixture-only seeding; the scenarios never
    /// mint through the vault.
    pub fn mint(&mut self, to: Address, amount: Balance) {
        let balance = self.balances.entry(to).or_insert(0);
        *balance = balance.saturating_add(amount);
        self.total_supply = self.total_supply.saturating_add(amount);
    }

    pub fn transfer(
        &mut self,
        caller: Address,
        to: Address,
        amount: Balance,
    ) -> Result<(), TokenError> {
        self.move_balance(caller, to, amount)
    }

    pub fn approve(&mut self, caller: Address, spender: Address, amount: Balance) {
        self.allowances.insert((caller, spender), amount);
    }

    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Balance,
    ) -> Result<(), TokenError> {
        let allowed = self.allowance(&from, &caller);
        if allowed < amount {
            return Err(TokenError::InsufficientAllowance {
                available: allowed,
                required: amount,
            });
        }

        self.move_balance(from, to, amount)?;

        // Infinite approvals are never decremented
        if allowed != Balance::MAX {
            self.allowances.insert((from, caller), allowed - amount);
        }

        Ok(())
    }

    fn move_balance(
        &mut self,
        from: Address,
        to: Address,
        amount: Balance,
    ) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroAddress);
        }

        let from_balance = self.balance_of(&from);
        if from_balance < amount {
            return Err(TokenError::InsufficientBalance {
                available: from_balance,
                required: amount,
            });
        }

        self.balances.insert(from, from_balance - amount);
        let to_balance = self.balances.entry(to).or_insert(0);
        *to_balance = to_balance.saturating_add(amount);

        Ok(())
    }
}
