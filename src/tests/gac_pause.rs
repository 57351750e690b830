// Global pause suite
//
// The guardian pauses through the Global Access Control module, every
// vault operation reverts with the GAC reason, and only governance can
// lift the pause. Afterwards deposits, withdrawals, and share transfers
// all flow again.

use super::upgraded_fork;
use crate::contracts::gac::GacError;
use crate::contracts::proxy::LogicId;
use crate::fork::{Fork, TECH_OPS, VAULT_PROXY, WHALE};
use crate::scenarios;
use crate::types::Balance;

const GAC_PAUSED: &str = "Pausable: GAC Paused";

#[test]
fn test_upgrade_preserves_vault_config() {
    let mut fork = Fork::mainnet();

    let prev_affiliate = fork.vault.affiliate();
    let prev_manager = fork.vault.manager;
    let prev_guardian = fork.vault.guardian;
    let prev_fee = fork.vault.withdrawal_fee_bps;
    let prev_deviation = fork.vault.withdrawal_max_deviation_bps;
    let prev_experimental_mode = fork.vault.experimental_mode;
    let prev_experimental_vault = fork.vault.experimental_vault;

    scenarios::upgrade_vault(&mut fork).unwrap();

    assert_eq!(
        fork.proxy_admin.implementation_of(&VAULT_PROXY),
        Some(LogicId::new("byvWBTC", 2))
    );
    assert_eq!(fork.vault.affiliate(), prev_affiliate);
    assert_eq!(fork.vault.manager, prev_manager);
    assert_eq!(fork.vault.guardian, prev_guardian);
    assert_eq!(fork.vault.withdrawal_fee_bps, prev_fee);
    assert_eq!(fork.vault.withdrawal_max_deviation_bps, prev_deviation);
    assert_eq!(fork.vault.experimental_mode, prev_experimental_mode);
    assert_eq!(fork.vault.experimental_vault, prev_experimental_vault);
    assert_eq!(fork.vault.treasury(), TECH_OPS);
}

#[test]
fn test_gac_pause_blocks_every_vault_operation() {
    let mut fork = upgraded_fork();
    let guardian = fork.gac.guardian();
    let user = fork.dev_account(0);
    let other = fork.dev_account(1);

    // Whale hands 80% of their shares to the working account
    let whale_shares = fork.vault.balance_of(&WHALE);
    let user_shares = whale_shares * 8 / 10;
    fork.vault
        .transfer(&fork.gac, WHALE, user, user_shares)
        .unwrap();
    assert_eq!(fork.vault.balance_of(&user), user_shares);

    fork.gac.pause(guardian).unwrap();

    let err = fork
        .vault
        .withdraw(&mut fork.token, &fork.gac, user, 123)
        .unwrap_err();
    assert_eq!(err.to_string(), GAC_PAUSED);

    let err = fork
        .vault
        .withdraw_all(&mut fork.token, &fork.gac, user)
        .unwrap_err();
    assert_eq!(err.to_string(), GAC_PAUSED);

    let err = fork
        .vault
        .deposit(&mut fork.token, &fork.gac, user, 123, &[])
        .unwrap_err();
    assert_eq!(err.to_string(), GAC_PAUSED);

    let err = fork
        .vault
        .deposit_for(&mut fork.token, &fork.gac, user, other, 123, &[])
        .unwrap_err();
    assert_eq!(err.to_string(), GAC_PAUSED);

    let err = fork.vault.transfer(&fork.gac, user, other, 123).unwrap_err();
    assert_eq!(err.to_string(), GAC_PAUSED);

    let err = fork
        .vault
        .transfer_from(&fork.gac, other, user, other, 123)
        .unwrap_err();
    assert_eq!(err.to_string(), GAC_PAUSED);

    // Nothing moved while paused
    assert_eq!(fork.vault.balance_of(&user), user_shares);
    assert_eq!(fork.vault.balance_of(&other), 0);
}

#[test]
fn test_only_governance_lifts_the_pause() {
    let mut fork = upgraded_fork();
    let governance = fork.gac.dev_multisig();
    let guardian = fork.gac.guardian();

    fork.gac.pause(guardian).unwrap();
    assert_eq!(fork.gac.unpause(guardian), Err(GacError::NotUnpauser));
    assert!(fork.gac.paused());

    fork.gac.unpause(governance).unwrap();
    assert!(!fork.gac.paused());
}

#[test]
fn test_operations_flow_after_unpause() {
    let mut fork = upgraded_fork();
    let governance = fork.gac.dev_multisig();
    let guardian = fork.gac.guardian();
    let user = fork.dev_account(0);
    let spender = fork.dev_account(1);

    let whale_shares = fork.vault.balance_of(&WHALE);
    let user_shares = whale_shares * 8 / 10;
    fork.vault
        .transfer(&fork.gac, WHALE, user, user_shares)
        .unwrap();

    fork.gac.pause(guardian).unwrap();
    fork.gac.unpause(governance).unwrap();

    // Withdraw 60% of the shares; the fee lands at the treasury
    let treasury_before = fork.token.balance_of(&TECH_OPS);
    let to_withdraw = user_shares * 6 / 10;
    let net = fork
        .vault
        .withdraw(&mut fork.token, &fork.gac, user, to_withdraw)
        .unwrap();
    assert!(net > 0);
    assert!(fork.token.balance_of(&TECH_OPS) > treasury_before);
    assert_eq!(fork.token.balance_of(&user), net);
    assert_eq!(fork.vault.balance_of(&user), user_shares - to_withdraw);

    // Deposit half back, then the rest
    fork.token.approve(user, VAULT_PROXY, Balance::MAX);
    fork.vault
        .deposit(&mut fork.token, &fork.gac, user, net / 2, &[])
        .unwrap();
    fork.vault
        .deposit_all(&mut fork.token, &fork.gac, user, &[])
        .unwrap();
    assert_eq!(fork.token.balance_of(&user), 0);

    // Share transfers flow again, transferFrom included
    let quarter = fork.vault.balance_of(&user) / 4;
    fork.vault.approve(user, spender, quarter);
    fork.vault
        .transfer_from(&fork.gac, spender, user, spender, quarter)
        .unwrap();
    assert_eq!(fork.vault.balance_of(&spender), quarter);

    fork.vault.transfer(&fork.gac, user, WHALE, quarter).unwrap();
}

#[test]
fn test_vault_pause_reason_differs_from_gac_reason() {
    let mut fork = upgraded_fork();
    let guardian = fork.gac.guardian();
    let governance = fork.gac.dev_multisig();
    let user = fork.dev_account(0);

    // Local pause masks the global one
    fork.vault.pause(guardian).unwrap();
    fork.gac.pause(guardian).unwrap();
    let err = fork
        .vault
        .deposit(&mut fork.token, &fork.gac, user, 123, &[])
        .unwrap_err();
    assert_eq!(err.to_string(), "Pausable: paused");

    fork.vault.unpause(governance).unwrap();
    let err = fork
        .vault
        .deposit(&mut fork.token, &fork.gac, user, 123, &[])
        .unwrap_err();
    assert_eq!(err.to_string(), GAC_PAUSED);
}

#[test]
fn test_pause_scenario_runner() {
    let mut fork = Fork::mainnet();
    scenarios::run_pause(&mut fork).unwrap();
}
