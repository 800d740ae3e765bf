//! Test utilities for exercising deployment sessions in memory.

mod ledger;

pub use ledger::*;
