//! Deployable units and their declarative descriptions.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{Address, Bytes};

use crate::ConfirmationStatus;

/// Whether an artifact is an ordinary contract or a separately addressable
/// library that other artifacts link against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactKind {
    /// An ordinary contract.
    Contract,
    /// A library. Once confirmed, its address is registered with the
    /// [`LibraryLinker`](crate::LibraryLinker) so later artifacts can link it.
    Library,
}

/// A set of byte offsets inside an artifact's creation code where one
/// library's 20-byte address must be substituted before submission.
///
/// Offsets are byte positions into the raw code blob, the way a compiler's
/// link references report them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkSlot {
    /// Name of the library artifact whose address fills the slot.
    pub library: String,
    /// Positions of the 20-byte holes in the creation code.
    pub offsets: Vec<usize>,
}

/// One constructor argument: either a literal ABI value or a reference to
/// another artifact's address within the same session.
///
/// An address reference does not require the referenced artifact to exist on
/// chain yet. It resolves through the session's resolution table, which holds
/// the predicted address until the referenced deployment confirms.
#[derive(Clone, Debug, PartialEq)]
pub enum ConstructorArg {
    /// A literal value, ABI-encoded as-is.
    Value(DynSolValue),
    /// The (possibly still predicted) address of the named artifact.
    ArtifactAddress(String),
}

/// A named deployable unit in the session's plan.
#[derive(Clone, Debug, PartialEq)]
pub struct ArtifactSpec {
    /// Human-readable artifact name, unique within a session.
    pub name: String,
    /// Contract or library.
    pub kind: ArtifactKind,
    /// Raw creation bytecode with link placeholders zeroed out.
    pub code: Bytes,
    /// Library link slots to substitute before submission.
    pub links: Vec<LinkSlot>,
    /// Ordered constructor arguments, appended ABI-encoded to the linked code.
    pub constructor_args: Vec<ConstructorArg>,
}

impl ArtifactSpec {
    /// Creates an ordinary contract spec with no links and no constructor
    /// arguments.
    pub fn contract(name: impl Into<String>, code: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            kind: ArtifactKind::Contract,
            code: code.into(),
            links: Vec::new(),
            constructor_args: Vec::new(),
        }
    }

    /// Creates a library spec.
    pub fn library(name: impl Into<String>, code: impl Into<Bytes>) -> Self {
        Self { kind: ArtifactKind::Library, ..Self::contract(name, code) }
    }

    /// Adds a link slot for `library` at the given byte offsets.
    pub fn with_link(mut self, library: impl Into<String>, offsets: Vec<usize>) -> Self {
        self.links.push(LinkSlot { library: library.into(), offsets });
        self
    }

    /// Appends a literal constructor argument.
    pub fn with_arg(mut self, value: DynSolValue) -> Self {
        self.constructor_args.push(ConstructorArg::Value(value));
        self
    }

    /// Appends a constructor argument referencing another artifact's address.
    pub fn with_address_ref(mut self, artifact: impl Into<String>) -> Self {
        self.constructor_args.push(ConstructorArg::ArtifactAddress(artifact.into()));
        self
    }

    /// Whether this artifact is a library.
    #[inline]
    pub fn is_library(&self) -> bool {
        self.kind == ArtifactKind::Library
    }
}

/// ABI-encodes resolved constructor argument values as they appear at the
/// tail of a deployment payload.
///
/// Returns an empty vector for an empty argument list.
pub fn encode_constructor_args(values: Vec<DynSolValue>) -> Vec<u8> {
    if values.is_empty() {
        return Vec::new();
    }
    DynSolValue::Tuple(values).abi_encode_params()
}

/// The outcome of one confirmed deployment. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployedArtifact {
    /// The artifact's name from its [`ArtifactSpec`].
    pub name: String,
    /// The ledger-confirmed contract address.
    pub address: Address,
    /// The nonce the creation transaction was submitted with.
    pub nonce: u64,
    /// Confirmation status reported by the ledger.
    pub status: ConfirmationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{address, bytes, U256};

    #[test]
    fn builder_accumulates_links_and_args() {
        let spec = ArtifactSpec::contract("hub", bytes!("6080"))
            .with_link("validation", vec![4, 40])
            .with_arg(DynSolValue::Uint(U256::from(50), 256))
            .with_address_ref("globals");

        assert_eq!(spec.kind, ArtifactKind::Contract);
        assert_eq!(spec.links, vec![LinkSlot { library: "validation".into(), offsets: vec![4, 40] }]);
        assert_eq!(spec.constructor_args.len(), 2);
        assert_eq!(
            spec.constructor_args[1],
            ConstructorArg::ArtifactAddress("globals".into())
        );
    }

    #[test]
    fn encodes_address_and_uint_args() {
        let encoded = encode_constructor_args(vec![
            DynSolValue::Address(address!("00000000000000000000000000000000000000aa")),
            DynSolValue::Uint(U256::from(50), 256),
        ]);
        assert_eq!(encoded.len(), 64);
        // Addresses are left-padded to 32 bytes.
        assert_eq!(encoded[12..32], address!("00000000000000000000000000000000000000aa")[..]);
        assert_eq!(encoded[63], 50);
    }

    #[test]
    fn empty_args_encode_to_nothing() {
        assert!(encode_constructor_args(Vec::new()).is_empty());
    }
}
