// Fundamental types for the Sett test bench
// Principle: minimal, auditable, durable

pub mod primitives;

pub use primitives::*;
