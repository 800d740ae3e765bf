//! Session-wide constants.

/// Default gas price (in wei) attached to every deployment transaction when
/// the session configuration does not override it: 2 gwei.
pub const DEFAULT_GAS_PRICE: u128 = 2_000_000_000;

/// Byte length of an address substituted into a library link slot.
pub const LINK_SLOT_LEN: usize = 20;
