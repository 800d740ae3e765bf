//! Deterministic multi-contract deployment sessions for EVM chains.
//!
//! A session provisions a set of mutually-referencing contracts from a single
//! deploying account. Because a contract created by an externally-owned
//! account lands at `keccak256(rlp([sender, nonce]))[12..]`, the address of a
//! contract that has not been deployed yet can be computed ahead of time from
//! the deployer's transaction nonce. The [`DeploymentPipeline`] uses this to
//! wire genuinely circular address relationships (A's constructor takes B's
//! predicted address, B's constructor takes A's confirmed address) without
//! deploying anything twice or patching addresses after the fact.
//!
//! Library-linked artifacts are the one hard ordering constraint: a library's
//! code (not just its address) must exist on chain before an artifact linking
//! it can be submitted, so the [`LibraryLinker`] only substitutes addresses of
//! already-confirmed deployments.
//!
//! Transaction submission and confirmation go through the [`Ledger`] trait;
//! the crate ships a [`test_utils::MockLedger`] behind the `test-utils`
//! feature for exercising whole sessions in memory.
#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

pub mod constants;

mod artifact;
pub use artifact::*;

mod config;
pub use config::*;

mod error;
pub use error::*;

mod ledger;
pub use ledger::*;

mod linker;
pub use linker::*;

mod manifest;
pub use manifest::*;

mod nonce;
pub use nonce::*;

mod pipeline;
pub use pipeline::*;

mod predict;
pub use predict::*;

mod resolution;
pub use resolution::*;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
