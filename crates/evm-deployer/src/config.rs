//! Session configuration supplied by the host process.

use crate::constants::DEFAULT_GAS_PRICE;

/// Network and gas parameters for one deployment session.
///
/// There is no CLI surface here; the host process parses whatever it parses
/// and hands the result over as one of these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionConfig {
    /// Fixed price per unit gas (in wei) attached to every transaction.
    pub gas_price: u128,
    /// Overrides the live transaction-count read at session start. Useful
    /// when resuming after a partial session whose ledger view lags, at the
    /// operator's own risk: a wrong value shifts every predicted address.
    pub starting_nonce: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { gas_price: DEFAULT_GAS_PRICE, starting_nonce: None }
    }
}

impl SessionConfig {
    /// Configuration with the default 2 gwei gas price and no nonce override.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the fixed gas price.
    pub const fn with_gas_price(mut self, gas_price: u128) -> Self {
        self.gas_price = gas_price;
        self
    }

    /// Sets the starting-nonce override.
    pub const fn with_starting_nonce(mut self, nonce: u64) -> Self {
        self.starting_nonce = Some(nonce);
        self
    }
}
