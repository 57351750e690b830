// Integration suites
// Each suite drives a fresh fork through one incident playbook:
// global pause, exploiter blacklist, treasury withdrawal fee.

pub mod gac_pause;

use crate::fork::Fork;
use crate::scenarios;

/// Fresh fork with the upgraded vault and the incident locks unwound.
/// Shared starting point for the suites.
pub fn upgraded_fork() -> Fork {
    let mut fork = Fork::mainnet();
    scenarios::upgrade_vault(&mut fork).unwrap();
    scenarios::normalize(&mut fork).unwrap();
    fork
}
