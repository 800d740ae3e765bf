//! The shared address-resolution table.
//!
//! Every artifact's address goes through two phases: predicted (available as
//! soon as its planned nonce is known) and confirmed (available after the
//! ledger acknowledges its deployment). Consumers read whichever phase is
//! present; a forward reference is simply a read that happens while the
//! entry is still predicted. When a confirmation lands on a predicted entry
//! the two values must be byte-identical; the pipeline treats a mismatch as a
//! fatal invariant violation.

use std::collections::BTreeMap;

use alloy_primitives::Address;

/// An address known to the session, in one of its two phases.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedAddress {
    /// Computed from (identity, planned nonce) before submission. Valid only
    /// if the artifact is eventually deployed at exactly that nonce.
    Predicted(Address),
    /// Acknowledged by the ledger.
    Confirmed(Address),
}

impl ResolvedAddress {
    /// The address value, regardless of phase.
    #[inline]
    pub const fn address(&self) -> Address {
        match self {
            Self::Predicted(address) | Self::Confirmed(address) => *address,
        }
    }

    /// Whether the deployment backing this address has been confirmed.
    #[inline]
    pub const fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }
}

/// Name → address table built incrementally over one session.
///
/// Owned exclusively by the pipeline; represented explicitly (rather than as
/// closures capturing addresses) so the dependency graph stays inspectable
/// and testable without ledger I/O.
#[derive(Debug, Default)]
pub struct ResolutionTable {
    entries: BTreeMap<String, ResolvedAddress>,
}

impl ResolutionTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes the predicted address of `name`.
    pub fn publish_predicted(&mut self, name: impl Into<String>, address: Address) {
        self.entries.insert(name.into(), ResolvedAddress::Predicted(address));
    }

    /// Records an externally known, already deployed address (confirmed by
    /// definition).
    pub fn publish_confirmed(&mut self, name: impl Into<String>, address: Address) {
        self.entries.insert(name.into(), ResolvedAddress::Confirmed(address));
    }

    /// Promotes `name` to confirmed.
    ///
    /// Returns the predicted address the confirmation disagreed with, if any;
    /// `None` means the entry was absent, matched its prediction, or was
    /// already confirmed with the same value.
    #[must_use]
    pub fn confirm(&mut self, name: &str, confirmed: Address) -> Option<Address> {
        let previous = self.entries.insert(name.to_owned(), ResolvedAddress::Confirmed(confirmed));
        match previous {
            Some(entry) if entry.address() != confirmed => Some(entry.address()),
            _ => None,
        }
    }

    /// Looks up `name` in whichever phase it is in.
    pub fn get(&self, name: &str) -> Option<ResolvedAddress> {
        self.entries.get(name).copied()
    }

    /// Whether `name` is known to the table at all.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    const ADDR_A: Address = address!("00000000000000000000000000000000000000aa");
    const ADDR_B: Address = address!("00000000000000000000000000000000000000bb");

    #[test]
    fn predicted_then_confirmed_with_equal_value() {
        let mut table = ResolutionTable::new();
        table.publish_predicted("hub", ADDR_A);
        assert_eq!(table.get("hub"), Some(ResolvedAddress::Predicted(ADDR_A)));
        assert_eq!(table.get("hub").unwrap().address(), ADDR_A);

        assert_eq!(table.confirm("hub", ADDR_A), None);
        assert_eq!(table.get("hub"), Some(ResolvedAddress::Confirmed(ADDR_A)));
    }

    #[test]
    fn confirmation_mismatch_reports_the_predicted_value() {
        let mut table = ResolutionTable::new();
        table.publish_predicted("hub", ADDR_A);
        assert_eq!(table.confirm("hub", ADDR_B), Some(ADDR_A));
    }

    #[test]
    fn confirming_an_unknown_name_is_not_a_mismatch() {
        let mut table = ResolutionTable::new();
        assert_eq!(table.confirm("hub", ADDR_A), None);
        assert!(table.get("hub").unwrap().is_confirmed());
    }
}
