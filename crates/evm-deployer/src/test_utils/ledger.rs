//! An in-memory ledger with real CREATE address semantics.

use std::collections::HashMap;

use alloy_primitives::{keccak256, Address, B256};

use crate::{Confirmation, ConfirmationStatus, DeployTransaction, Ledger, LedgerError, PendingDeploy};

/// Faults a [`MockLedger`] can inject, each triggered by the zero-based index
/// of a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Fault {
    /// Reject the n-th submission outright.
    Reject { at: usize },
    /// Confirm the n-th submission as reverted (no contract created).
    Revert { at: usize },
    /// Confirm the n-th submission at a corrupted address, as a broken
    /// derivation rule or wrong starting nonce would.
    TamperAddress { at: usize },
}

/// In-memory [`Ledger`] that mimics the chain's contract-creation semantics:
/// it tracks the account's live transaction count, rejects out-of-order
/// nonces, and places each created contract at the real
/// `keccak256(rlp([sender, nonce]))` address.
#[derive(Debug)]
pub struct MockLedger {
    identity: Address,
    transaction_count: u64,
    submitted: Vec<DeployTransaction>,
    pending: HashMap<B256, Confirmation>,
    fault: Option<Fault>,
    fail_count_reads: bool,
}

impl MockLedger {
    /// Creates a ledger for `identity` with the given live transaction count.
    pub fn new(identity: Address, transaction_count: u64) -> Self {
        Self {
            identity,
            transaction_count,
            submitted: Vec::new(),
            pending: HashMap::new(),
            fault: None,
            fail_count_reads: false,
        }
    }

    /// Rejects the n-th (zero-based) submission.
    pub fn reject_submission_at(mut self, index: usize) -> Self {
        self.fault = Some(Fault::Reject { at: index });
        self
    }

    /// Confirms the n-th (zero-based) submission as reverted.
    pub fn revert_at(mut self, index: usize) -> Self {
        self.fault = Some(Fault::Revert { at: index });
        self
    }

    /// Confirms the n-th (zero-based) submission at a corrupted address.
    pub fn tamper_address_at(mut self, index: usize) -> Self {
        self.fault = Some(Fault::TamperAddress { at: index });
        self
    }

    /// Makes every transaction-count read fail.
    pub fn fail_transaction_counts(mut self) -> Self {
        self.fail_count_reads = true;
        self
    }

    /// Every transaction accepted so far, in submission order.
    pub fn submitted(&self) -> &[DeployTransaction] {
        &self.submitted
    }

    /// The account's current transaction count.
    pub fn transaction_count_now(&self) -> u64 {
        self.transaction_count
    }
}

impl Ledger for MockLedger {
    fn transaction_count(&mut self, account: Address) -> Result<u64, LedgerError> {
        if self.fail_count_reads {
            return Err(LedgerError::Transport("transaction count unavailable".into()));
        }
        if account != self.identity {
            return Err(LedgerError::Transport(format!("unknown account {account}")));
        }
        Ok(self.transaction_count)
    }

    fn submit(&mut self, tx: DeployTransaction) -> Result<PendingDeploy, LedgerError> {
        let index = self.submitted.len();
        if self.fault == Some(Fault::Reject { at: index }) {
            return Err(LedgerError::Rejected("injected rejection".into()));
        }
        if tx.nonce != self.transaction_count {
            return Err(LedgerError::Rejected(format!(
                "nonce {} out of order, expected {}",
                tx.nonce, self.transaction_count
            )));
        }

        let created = self.identity.create(tx.nonce);
        let confirmation = match self.fault {
            Some(Fault::Revert { at }) if at == index => {
                Confirmation { address: None, status: ConfirmationStatus::Reverted }
            }
            Some(Fault::TamperAddress { at }) if at == index => {
                let mut corrupted = created;
                corrupted.0[19] ^= 0xff;
                Confirmation { address: Some(corrupted), status: ConfirmationStatus::Succeeded }
            }
            _ => Confirmation { address: Some(created), status: ConfirmationStatus::Succeeded },
        };

        let mut preimage = tx.nonce.to_be_bytes().to_vec();
        preimage.extend_from_slice(&tx.data);
        let handle = keccak256(&preimage);

        self.transaction_count += 1;
        self.submitted.push(tx);
        self.pending.insert(handle, confirmation);
        Ok(PendingDeploy(handle))
    }

    fn await_confirmation(&mut self, pending: PendingDeploy) -> Result<Confirmation, LedgerError> {
        self.pending
            .remove(&pending.0)
            .ok_or_else(|| LedgerError::Confirmation(format!("unknown transaction {}", pending.0)))
    }
}
