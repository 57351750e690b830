// Contract doubles exercised by the scenario suites
// Each module is a self-contained state machine with typed errors.

pub mod gac;
pub mod proxy;
pub mod token;
pub mod vault;
