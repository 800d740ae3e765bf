//! The submission seam between the pipeline and the chain.
//!
//! The pipeline never talks to a node directly; it drives a [`Ledger`]
//! implementation. Submission is strictly sequential: the pipeline submits
//! one transaction, blocks on [`Ledger::await_confirmation`], and only then
//! builds the next nonce's transaction. Retry policy, timeouts and transport
//! details all live behind this trait, not in the core.

use alloy_primitives::{Address, Bytes, B256};

/// A contract-creation transaction ready for submission.
///
/// Deployment sessions only ever create contracts, so there is no `to` field;
/// the payload in `data` is the linked creation code with ABI-encoded
/// constructor arguments appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployTransaction {
    /// The reserved nonce this transaction consumes.
    pub nonce: u64,
    /// Fixed price per unit gas, in wei.
    pub gas_price: u128,
    /// Creation payload: linked bytecode plus encoded constructor arguments.
    pub data: Bytes,
}

/// Handle to a submitted, not yet confirmed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PendingDeploy(
    /// Hash identifying the pending transaction.
    pub B256,
);

/// Final status of a confirmed transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// The transaction executed successfully.
    Succeeded,
    /// The transaction was included but its execution reverted. The nonce is
    /// spent either way.
    Reverted,
}

/// The ledger's acknowledgment of a submitted transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Confirmation {
    /// Address of the created contract, if the creation succeeded.
    pub address: Option<Address>,
    /// Execution outcome.
    pub status: ConfirmationStatus,
}

/// Errors originating in the ledger or its transport.
///
/// The core surfaces these without retrying; see
/// [`DeployError`](crate::DeployError) for how each call site wraps them.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The ledger refused the transaction outright (malformed payload,
    /// insufficient funds, out-of-order nonce).
    #[error("transaction rejected: {0}")]
    Rejected(String),
    /// The node could not be reached or answered malformed data.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The confirmation wait was given up by the ledger layer.
    #[error("confirmation wait failed: {0}")]
    Confirmation(String),
}

/// Transaction submission interface consumed by the pipeline.
///
/// Implementations take `&mut self` because a ledger connection is stateful
/// (and the mock tracks its own transaction count); the pipeline owns its
/// ledger exclusively for the session's duration.
#[auto_impl::auto_impl(&mut, Box)]
pub trait Ledger {
    /// Returns the live transaction count of `account`, i.e. the next nonce
    /// the ledger will accept from it.
    fn transaction_count(&mut self, account: Address) -> Result<u64, LedgerError>;

    /// Submits a contract-creation transaction.
    ///
    /// A returned error means the transaction was not accepted into the pool;
    /// the nonce it carried is still treated as spent by the session.
    fn submit(&mut self, tx: DeployTransaction) -> Result<PendingDeploy, LedgerError>;

    /// Blocks until the submitted transaction is confirmed.
    ///
    /// No intrinsic deadline: if the ledger layer wants a timeout it reports
    /// one via [`LedgerError::Confirmation`].
    fn await_confirmation(&mut self, pending: PendingDeploy) -> Result<Confirmation, LedgerError>;
}
