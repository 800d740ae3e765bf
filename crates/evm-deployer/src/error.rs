//! Error taxonomy for a deployment session.
//!
//! Every variant aborts the remaining plan. Artifacts already confirmed stay
//! in the recorder so an operator can diagnose and resume manually; there is
//! no automatic rollback (deployments are irreversible) and no automatic
//! retry (nonces already spent must not be reused from the top).

use alloy_primitives::Address;

use crate::LedgerError;

/// Fatal failures of a deployment session.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    /// The live transaction count of the deploying identity could not be
    /// read, so the starting nonce is unknown. Raised before any submission.
    #[error("failed to read starting nonce for {identity}")]
    NonceRead {
        /// The deploying identity.
        identity: Address,
        /// The underlying ledger failure.
        #[source]
        source: LedgerError,
    },

    /// An artifact links a library that has no registered address.
    #[error("artifact `{artifact}` links library `{library}` which has no registered address")]
    UnresolvedLibrary {
        /// The artifact being linked.
        artifact: String,
        /// The missing library.
        library: String,
    },

    /// An artifact links a library that is planned, but not strictly before
    /// the artifact itself. This also rejects every cycle of
    /// required-before-deployment dependencies.
    #[error(
        "artifact `{artifact}` links library `{library}` which is not deployed before it; \
         linked libraries must be confirmed before their dependents are submitted"
    )]
    LibraryNotDeployedFirst {
        /// The artifact being linked.
        artifact: String,
        /// The library scheduled too late (or pointing back at a dependent).
        library: String,
    },

    /// A constructor argument references a name that is neither part of the
    /// plan nor already recorded in the resolution table.
    #[error("artifact `{artifact}` references `{reference}` which is not part of the session")]
    UnknownReference {
        /// The artifact holding the reference.
        artifact: String,
        /// The unresolvable name.
        reference: String,
    },

    /// Two planned artifacts share a name.
    #[error("artifact `{artifact}` is planned more than once")]
    DuplicateArtifact {
        /// The duplicated name.
        artifact: String,
    },

    /// A link slot's offsets do not fit inside the artifact's creation code.
    #[error(
        "link slot for `{library}` in `{artifact}` is out of bounds \
         (offset {offset}, code length {code_len})"
    )]
    LinkOutOfBounds {
        /// The artifact being linked.
        artifact: String,
        /// The library whose slot is malformed.
        library: String,
        /// The offending byte offset.
        offset: usize,
        /// Length of the creation code.
        code_len: usize,
    },

    /// The ledger rejected a submission. The nonce is spent; resumption must
    /// continue from the next unused nonce, never from zero.
    #[error("submission of `{artifact}` at nonce {nonce} was rejected")]
    SubmissionRejected {
        /// The artifact whose transaction was rejected.
        artifact: String,
        /// The nonce the rejected transaction carried.
        nonce: u64,
        /// The underlying ledger failure.
        #[source]
        source: LedgerError,
    },

    /// The confirmation wait failed at the ledger layer.
    #[error("confirmation of `{artifact}` at nonce {nonce} failed")]
    ConfirmationFailed {
        /// The artifact awaiting confirmation.
        artifact: String,
        /// The nonce of the pending transaction.
        nonce: u64,
        /// The underlying ledger failure.
        #[source]
        source: LedgerError,
    },

    /// The creation transaction was included but reverted.
    #[error("deployment of `{artifact}` at nonce {nonce} reverted")]
    DeploymentReverted {
        /// The artifact whose deployment reverted.
        artifact: String,
        /// The nonce consumed by the reverted transaction.
        nonce: u64,
    },

    /// A successful confirmation carried no contract address.
    #[error("no contract address returned for `{artifact}` at nonce {nonce}")]
    NoContractAddress {
        /// The artifact missing an address.
        artifact: String,
        /// The nonce of the confirmed transaction.
        nonce: u64,
    },

    /// A confirmed address differs from the value predicted for its nonce.
    ///
    /// This means the derivation rule or the starting-nonce assumption is
    /// wrong, and every forward reference already wired into deployed code is
    /// suspect. Never tolerated.
    #[error(
        "confirmed address {confirmed} of `{artifact}` does not match \
         the predicted address {predicted}"
    )]
    PredictionMismatch {
        /// The artifact whose addresses disagree.
        artifact: String,
        /// The address predicted before submission.
        predicted: Address,
        /// The address the ledger confirmed.
        confirmed: Address,
    },
}
