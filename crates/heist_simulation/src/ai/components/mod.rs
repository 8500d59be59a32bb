//! AI components

pub mod fsm;
pub mod qte;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod fsm_tests;

pub use fsm::*;
pub use qte::*;
