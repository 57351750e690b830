// Incident-response scenarios
//
// Each runner drives a fresh fork through one of the byvWBTC incident
// playbooks and checks every observable effect along the way. The in-crate
// test suites exercise the same flows assert-by-assert; these runners are
// the CLI entry points.

use crate::fork::{Fork, EXPLOITERS, TECH_OPS, VAULT_PROXY, WHALE};
use crate::contracts::gac::Role;
use crate::contracts::proxy::LogicId;
use crate::types::{Address, Balance};
use anyhow::{bail, ensure, Context, Result};
use std::fmt::Display;
use tracing::info;

/// Assert that a call reverted with exactly `reason`.
pub fn expect_revert<T, E: Display>(result: std::result::Result<T, E>, reason: &str) -> Result<()> {
    match result {
        Ok(_) => bail!("expected revert '{reason}', but the call succeeded"),
        Err(err) => {
            let got = err.to_string();
            ensure!(got == reason, "expected revert '{reason}', got '{got}'");
            Ok(())
        }
    }
}

/// Upgrade the vault proxy to the gated implementation, verify the vault
/// configuration survived the swap, and point the treasury at tech ops.
pub fn upgrade_vault(fork: &mut Fork) -> Result<()> {
    let governance = fork.gac.dev_multisig();

    let prev_affiliate = fork.vault.affiliate();
    let prev_manager = fork.vault.manager;
    let prev_guardian = fork.vault.guardian;
    let prev_fee = fork.vault.withdrawal_fee_bps;
    let prev_deviation = fork.vault.withdrawal_max_deviation_bps;
    let prev_experimental_mode = fork.vault.experimental_mode;
    let prev_experimental_vault = fork.vault.experimental_vault;

    fork.proxy_admin
        .upgrade(
            fork.proxy_admin.owner(),
            VAULT_PROXY,
            LogicId::new("byvWBTC", 2),
        )
        .context("vault proxy upgrade")?;
    fork.advance_block();

    fork.vault.set_treasury(governance, TECH_OPS)?;

    ensure!(fork.vault.affiliate() == prev_affiliate, "affiliate changed");
    ensure!(fork.vault.manager == prev_manager, "manager changed");
    ensure!(fork.vault.guardian == prev_guardian, "guardian changed");
    ensure!(fork.vault.withdrawal_fee_bps == prev_fee, "withdrawal fee changed");
    ensure!(
        fork.vault.withdrawal_max_deviation_bps == prev_deviation,
        "max deviation changed"
    );
    ensure!(
        fork.vault.experimental_mode == prev_experimental_mode,
        "experimental mode changed"
    );
    ensure!(
        fork.vault.experimental_vault == prev_experimental_vault,
        "experimental vault changed"
    );
    ensure!(fork.vault.treasury() == TECH_OPS, "treasury not updated");

    info!("vault upgraded, config preserved, treasury -> tech ops");
    Ok(())
}

/// Unwind the incident locks so operations can flow again.
pub fn normalize(fork: &mut Fork) -> Result<()> {
    let governance = fork.gac.dev_multisig();

    if fork.vault.paused() {
        fork.vault.unpause(governance)?;
    }
    if fork.gac.paused() {
        fork.gac.unpause(governance)?;
    }
    if fork.gac.transfer_from_disabled() {
        fork.gac.enable_transfer_from(governance)?;
    }
    Ok(())
}

// =========================================================================
// SCENARIO: GLOBAL PAUSE
// =========================================================================

/// Guardian pauses through the GAC, every vault operation reverts with the
/// GAC reason, governance unpauses, everything flows again.
pub fn run_pause(fork: &mut Fork) -> Result<()> {
    upgrade_vault(fork)?;
    normalize(fork)?;

    let governance = fork.gac.dev_multisig();
    let guardian = fork.gac.guardian();
    let user = fork.dev_account(0);
    let spender = fork.dev_account(1);

    // Whale hands 80% of their shares to a working account
    let whale_shares = fork.vault.balance_of(&WHALE);
    let user_shares = whale_shares * 8 / 10;
    fork.vault.transfer(&fork.gac, WHALE, user, user_shares)?;

    fork.gac.pause(guardian)?;
    info!("GAC paused by guardian");

    const REASON: &str = "Pausable: GAC Paused";
    expect_revert(
        fork.vault.withdraw(&mut fork.token, &fork.gac, user, 123),
        REASON,
    )?;
    expect_revert(
        fork.vault.withdraw_all(&mut fork.token, &fork.gac, user),
        REASON,
    )?;
    expect_revert(
        fork.vault.deposit(&mut fork.token, &fork.gac, user, 123, &[]),
        REASON,
    )?;
    expect_revert(
        fork.vault
            .deposit_for(&mut fork.token, &fork.gac, user, spender, 123, &[]),
        REASON,
    )?;
    expect_revert(fork.vault.transfer(&fork.gac, user, spender, 123), REASON)?;
    expect_revert(
        fork.vault.transfer_from(&fork.gac, spender, user, spender, 123),
        REASON,
    )?;

    fork.gac.unpause(governance)?;
    info!("GAC unpaused by governance");

    // Withdraw 60% of the shares, fee goes to the treasury
    let treasury_before = fork.token.balance_of(&TECH_OPS);
    let to_withdraw = user_shares * 6 / 10;
    let net = fork
        .vault
        .withdraw(&mut fork.token, &fork.gac, user, to_withdraw)?;
    ensure!(net > 0, "withdrawal paid nothing out");
    ensure!(
        fork.token.balance_of(&TECH_OPS) > treasury_before,
        "no withdrawal fee accrued"
    );

    // Deposit half back, then everything that is left
    fork.token.approve(user, VAULT_PROXY, Balance::MAX);
    fork.vault
        .deposit(&mut fork.token, &fork.gac, user, net / 2, &[])?;
    fork.vault
        .deposit_all(&mut fork.token, &fork.gac, user, &[])?;
    ensure!(fork.token.balance_of(&user) == 0, "underlying left behind");

    // Share transfers flow again, transferFrom included
    let quarter = fork.vault.balance_of(&user) / 4;
    fork.vault.approve(user, spender, quarter);
    fork.vault
        .transfer_from(&fork.gac, spender, user, spender, quarter)?;
    fork.vault.transfer(&fork.gac, user, WHALE, quarter)?;

    info!("pause scenario complete at block {}", fork.block_number);
    Ok(())
}

// =========================================================================
// SCENARIO: BLACKLIST
// =========================================================================

/// Every known exploiter is blacklisted, then locked out of every vault
/// operation in every position: caller, recipient, source, and spender.
pub fn run_blacklist(fork: &mut Fork) -> Result<()> {
    upgrade_vault(fork)?;
    normalize(fork)?;

    let governance = fork.gac.dev_multisig();

    for exploiter in EXPLOITERS {
        fork.gac
            .grant_role(governance, Role::Blacklisted, exploiter)?;
    }
    info!(count = EXPLOITERS.len(), "exploiters blacklisted");

    for exploiter in EXPLOITERS {
        check_exploiter_locked_out(fork, exploiter)
            .with_context(|| format!("exploiter {exploiter}"))?;
    }

    // A clean user is untouched by the blacklist
    let user = fork.dev_account(0);
    let rando = fork.dev_account(2);
    let user_shares = fork.vault.balance_of(&WHALE) * 8 / 10;
    fork.vault.transfer(&fork.gac, WHALE, user, user_shares)?;

    let net = fork
        .vault
        .withdraw(&mut fork.token, &fork.gac, user, user_shares * 6 / 10)?;
    ensure!(net > 0, "clean withdrawal paid nothing out");

    fork.token.approve(user, VAULT_PROXY, Balance::MAX);
    fork.vault
        .deposit(&mut fork.token, &fork.gac, user, net / 2, &[])?;
    fork.vault
        .deposit_for(&mut fork.token, &fork.gac, user, rando, net / 4, &[])?;
    ensure!(fork.vault.balance_of(&rando) > 0, "depositFor minted nothing");

    let tenth = fork.vault.balance_of(&user) / 10;
    fork.vault.withdraw(&mut fork.token, &fork.gac, user, tenth)?;
    let slice = fork.vault.balance_of(&user) / 4;
    fork.vault.transfer(&fork.gac, user, rando, slice)?;

    let rest = fork.vault.balance_of(&user);
    fork.vault.approve(user, rando, rest);
    fork.vault
        .transfer_from(&fork.gac, rando, user, rando, rest)?;
    ensure!(fork.vault.balance_of(&user) == 0, "clean user shares left behind");

    let rando_net = fork.vault.withdraw_all(&mut fork.token, &fork.gac, rando)?;
    ensure!(rando_net > 0, "rando exit paid nothing out");

    info!("blacklist scenario complete at block {}", fork.block_number);
    Ok(())
}

fn check_exploiter_locked_out(fork: &mut Fork, exploiter: Address) -> Result<()> {
    const REASON: &str = "blacklisted";
    let clean = fork.dev_account(0);

    // Approvals still go through, the spend is what gets rejected
    fork.vault.approve(exploiter, clean, Balance::MAX);
    fork.vault.approve(WHALE, exploiter, Balance::MAX);

    // Exploiter as caller
    expect_revert(
        fork.vault
            .deposit(&mut fork.token, &fork.gac, exploiter, 123, &[]),
        REASON,
    )?;
    expect_revert(
        fork.vault
            .deposit_all(&mut fork.token, &fork.gac, exploiter, &[]),
        REASON,
    )?;
    expect_revert(
        fork.vault
            .withdraw(&mut fork.token, &fork.gac, exploiter, 123),
        REASON,
    )?;
    expect_revert(
        fork.vault.withdraw_all(&mut fork.token, &fork.gac, exploiter),
        REASON,
    )?;
    expect_revert(
        fork.vault.transfer(&fork.gac, exploiter, clean, 123),
        REASON,
    )?;

    // Exploiter as recipient
    expect_revert(fork.vault.transfer(&fork.gac, WHALE, exploiter, 123), REASON)?;
    expect_revert(
        fork.vault
            .deposit_for(&mut fork.token, &fork.gac, WHALE, exploiter, 123, &[]),
        REASON,
    )?;

    // Exploiter in any transferFrom position
    expect_revert(
        fork.vault
            .transfer_from(&fork.gac, exploiter, WHALE, clean, 123),
        REASON,
    )?;
    expect_revert(
        fork.vault
            .transfer_from(&fork.gac, clean, exploiter, clean, 123),
        REASON,
    )?;
    expect_revert(
        fork.vault
            .transfer_from(&fork.gac, clean, WHALE, exploiter, 123),
        REASON,
    )?;

    Ok(())
}

// =========================================================================
// SCENARIO: TREASURY WITHDRAWAL FEE
// =========================================================================

/// Withdrawal fees accrue to the treasury and nowhere else, and only
/// governance can repoint the treasury.
pub fn run_treasury(fork: &mut Fork) -> Result<()> {
    upgrade_vault(fork)?;
    normalize(fork)?;

    let governance = fork.gac.dev_multisig();
    let rando = fork.dev_account(5);

    let treasury_before = fork.token.balance_of(&TECH_OPS);
    let governance_before = fork.token.balance_of(&governance);
    let whale_shares = fork.vault.balance_of(&WHALE);

    let net = fork.vault.withdraw_all(&mut fork.token, &fork.gac, WHALE)?;
    let fee = fork.token.balance_of(&TECH_OPS) - treasury_before;

    ensure!(fee > 0, "no fee accrued to the treasury");
    ensure!(fork.vault.balance_of(&WHALE) == 0, "whale shares not burned");
    ensure!(
        fork.token.balance_of(&governance) == governance_before,
        "fee leaked to governance"
    );
    info!(whale_shares, net, fee, "whale exited, fee accrued");

    // Whale cycles the proceeds back through the vault
    fork.token.approve(WHALE, VAULT_PROXY, Balance::MAX);
    fork.vault
        .deposit(&mut fork.token, &fork.gac, WHALE, net / 2, &[])?;
    let quarter = fork.vault.balance_of(&WHALE) / 4;
    fork.vault
        .withdraw(&mut fork.token, &fork.gac, WHALE, quarter)?;
    fork.vault
        .deposit_all(&mut fork.token, &fork.gac, WHALE, &[])?;
    ensure!(fork.token.balance_of(&WHALE) == 0, "underlying left behind");

    let spender = fork.dev_account(1);
    let cut = fork.vault.balance_of(&WHALE) / 4;
    fork.vault.approve(WHALE, spender, cut);
    fork.vault
        .transfer_from(&fork.gac, spender, WHALE, spender, cut)?;
    fork.vault.transfer(&fork.gac, WHALE, spender, cut)?;
    ensure!(
        fork.vault.balance_of(&spender) == cut * 2,
        "share transfers did not land"
    );

    expect_revert(fork.vault.set_treasury(rando, rando), "only governance")?;
    fork.vault.set_treasury(governance, governance)?;
    ensure!(fork.vault.treasury() == governance, "treasury not repointed");

    info!("treasury scenario complete at block {}", fork.block_number);
    Ok(())
}
