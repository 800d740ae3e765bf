//! Nonce reservation for a single deploying identity.
//!
//! The ledger rejects out-of-order nonces and derives contract addresses from
//! them, so the allocator hands out strictly increasing reservations and never
//! takes one back: a nonce is considered spent the moment it is issued, even
//! if the transaction carrying it later fails. Re-issuing would make the next
//! submission ambiguous and silently shift every downstream address
//! prediction.

use derive_more::Display;

/// A reservation of one transaction sequence number.
///
/// Issued by [`NonceAllocator::reserve`], bound to exactly one pending
/// transaction, and never reused within a session.
#[derive(Clone, Copy, Debug, Display, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonceReservation(u64);

impl NonceReservation {
    /// Returns the raw sequence number.
    #[inline]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<NonceReservation> for u64 {
    fn from(reservation: NonceReservation) -> Self {
        reservation.0
    }
}

/// Issues non-reusable, strictly increasing nonce reservations for one
/// deploying identity.
///
/// Initialized from the identity's live on-ledger transaction count (or a
/// configured override) at session start, and owned exclusively by one
/// pipeline for the session's duration.
#[derive(Debug)]
pub struct NonceAllocator {
    next: u64,
    issued: u64,
}

impl NonceAllocator {
    /// Creates an allocator whose first reservation will be `starting_nonce`.
    pub const fn new(starting_nonce: u64) -> Self {
        Self { next: starting_nonce, issued: 0 }
    }

    /// Reserves the next unused sequence number and advances the counter.
    ///
    /// There is no inverse operation. Once issued, the nonce is spent for
    /// planning purposes regardless of what happens to the transaction that
    /// consumes it.
    pub fn reserve(&mut self) -> NonceReservation {
        let reservation = NonceReservation(self.next);
        self.next += 1;
        self.issued += 1;
        reservation
    }

    /// The nonce the next call to [`reserve`](Self::reserve) will return.
    #[inline]
    pub const fn next(&self) -> u64 {
        self.next
    }

    /// Number of reservations issued so far.
    #[inline]
    pub const fn issued(&self) -> u64 {
        self.issued
    }
}
