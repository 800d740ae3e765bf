//! Library address registration and bytecode linking.
//!
//! A library's address is only known once the library itself is deployed, so
//! linking is a hard ordering constraint: unlike forward address references
//! (which need only a prediction), a linked artifact needs the library's code
//! to exist on chain before its own submission. The pipeline registers each
//! confirmed library here and links dependents against the registry.

use std::collections::BTreeMap;

use alloy_primitives::{Address, Bytes};

use crate::{constants::LINK_SLOT_LEN, ArtifactSpec, DeployError};

/// Maps library artifact names to their confirmed addresses and substitutes
/// them into dependents' creation code.
#[derive(Debug, Default)]
pub struct LibraryLinker {
    registered: BTreeMap<String, Address>,
}

impl LibraryLinker {
    /// Creates an empty linker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the confirmed address of `library`.
    ///
    /// Re-registering a name overwrites the previous address; within one
    /// session the pipeline never does this because plan validation rejects
    /// duplicate artifact names.
    pub fn register(&mut self, library: impl Into<String>, address: Address) {
        self.registered.insert(library.into(), address);
    }

    /// Returns the registered address of `library`, if any.
    pub fn address_of(&self, library: &str) -> Option<Address> {
        self.registered.get(library).copied()
    }

    /// Resolves every link slot of `spec` and returns its creation code with
    /// the registered library addresses written into the 20-byte holes.
    ///
    /// Fails with [`DeployError::UnresolvedLibrary`] if any slot's library has
    /// not been registered, and with [`DeployError::LinkOutOfBounds`] if a
    /// slot does not fit inside the code.
    pub fn link(&self, spec: &ArtifactSpec) -> Result<Bytes, DeployError> {
        if spec.links.is_empty() {
            return Ok(spec.code.clone());
        }

        let mut code = spec.code.to_vec();
        for slot in &spec.links {
            let address = self.registered.get(&slot.library).ok_or_else(|| {
                DeployError::UnresolvedLibrary {
                    artifact: spec.name.clone(),
                    library: slot.library.clone(),
                }
            })?;
            for &offset in &slot.offsets {
                let end = offset.checked_add(LINK_SLOT_LEN).filter(|&end| end <= code.len());
                let Some(end) = end else {
                    return Err(DeployError::LinkOutOfBounds {
                        artifact: spec.name.clone(),
                        library: slot.library.clone(),
                        offset,
                        code_len: code.len(),
                    });
                };
                code[offset..end].copy_from_slice(address.as_slice());
            }
        }
        Ok(code.into())
    }
}
