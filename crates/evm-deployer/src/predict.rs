//! Deployment address prediction.
//!
//! For a contract created by an externally-owned account, the ledger derives
//! the contract address as `keccak256(rlp([sender, nonce]))[12..]`. Computing
//! the same value off-chain, before the creation transaction is broadcast, is
//! what allows constructor arguments to reference contracts that do not exist
//! yet. The derivation here must match the ledger's byte for byte; any
//! divergence wires wrong addresses into deployed code with no compile-time
//! detection, which is why the tests pin it against well-known mainnet
//! deployments and an independent RLP re-derivation.

use alloy_primitives::Address;

/// Predicts the address a contract creation will occupy when submitted by
/// `deployer` at `nonce`.
///
/// Pure and deterministic: the prediction is valid only if the corresponding
/// transaction is eventually submitted with exactly this nonce from exactly
/// this identity.
#[inline]
pub fn predict_create_address(deployer: Address, nonce: u64) -> Address {
    deployer.create(nonce)
}
