//! Recording of confirmed deployments and the session manifest.

use std::collections::BTreeMap;

use alloy_primitives::Address;
use serde::Serialize;

use crate::DeployedArtifact;

/// Append-only record of every deployment confirmed during one session.
///
/// Survives a session abort so the artifacts deployed before the failure can
/// still be inspected and the session resumed manually.
#[derive(Debug, Default)]
pub struct ArtifactRecorder {
    deployed: Vec<DeployedArtifact>,
}

impl ArtifactRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a confirmed deployment.
    pub fn record(&mut self, artifact: DeployedArtifact) {
        self.deployed.push(artifact);
    }

    /// Number of recorded deployments.
    pub fn len(&self) -> usize {
        self.deployed.len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.deployed.is_empty()
    }

    /// Iterates over recorded deployments in confirmation order.
    pub fn iter(&self) -> impl Iterator<Item = &DeployedArtifact> {
        self.deployed.iter()
    }

    /// Looks up a recorded deployment by artifact name.
    pub fn get(&self, name: &str) -> Option<&DeployedArtifact> {
        self.deployed.iter().find(|artifact| artifact.name == name)
    }

    /// Builds the flat name → address manifest of everything recorded so far.
    pub fn manifest(&self) -> DeploymentManifest {
        DeploymentManifest {
            addresses: self
                .deployed
                .iter()
                .map(|artifact| (artifact.name.clone(), artifact.address))
                .collect(),
        }
    }
}

/// Final mapping from artifact name to confirmed address.
///
/// The on-disk format is the host's concern; this type is `Serialize` and
/// ships a JSON rendering because that is what downstream tooling consumes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct DeploymentManifest {
    addresses: BTreeMap<String, Address>,
}

impl DeploymentManifest {
    /// Looks up the confirmed address of `name`.
    pub fn address_of(&self, name: &str) -> Option<Address> {
        self.addresses.get(name).copied()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    /// Whether the manifest is empty.
    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }

    /// Iterates over `(name, address)` entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        self.addresses.iter().map(|(name, address)| (name.as_str(), *address))
    }

    /// Renders the manifest as pretty-printed JSON.
    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
