//! The dependency-aware deployment pipeline.
//!
//! One pipeline instance owns one session: the ledger connection, the nonce
//! counter, the library registry, the address-resolution table and the
//! recorder are all fields of the instance, never ambient state, so sessions
//! compose and test in isolation.
//!
//! A session runs in two steps. [`plan`](DeploymentPipeline::plan) validates
//! the caller-supplied deployment order before anything touches the ledger:
//! every linked library must be scheduled (and thus confirmed) strictly
//! before its dependents, which rejects every cycle of bytecode dependencies,
//! while constructor address references may point anywhere in the plan
//! because they resolve through prediction. [`run`](DeploymentPipeline::run)
//! then reads the starting nonce once, derives the contiguous nonce window
//! for the whole plan, publishes a predicted address for every artifact, and
//! submits strictly in plan order, one transaction in flight at a time,
//! blocking on confirmation before the next nonce is used.
//!
//! Every confirmed address is checked against its prediction. A mismatch
//! means the derivation rule or the starting nonce was wrong and every
//! forward reference already wired into deployed code is suspect, so it
//! aborts the session as an invariant violation rather than an ordinary
//! error.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::Address;
use tracing::{debug, info};

use crate::{
    constants::LINK_SLOT_LEN, encode_constructor_args, predict_create_address, ArtifactRecorder,
    ArtifactSpec, ConfirmationStatus, ConstructorArg, DeployError, DeployTransaction,
    DeployedArtifact, DeploymentManifest, Ledger, LibraryLinker, NonceAllocator, ResolutionTable,
    ResolvedAddress, SessionConfig,
};

/// Lifecycle of one planned artifact within a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArtifactState {
    /// Validated, not yet scheduled onto a nonce.
    Planned,
    /// A nonce has been reserved (and is spent for planning purposes even if
    /// the deployment later fails).
    NonceReserved(u64),
    /// The creation transaction is in flight.
    Submitted(u64),
    /// Terminal: confirmed at this address.
    Confirmed(Address),
    /// Terminal: the deployment failed. Not retryable within the session.
    Failed,
}

#[derive(Debug)]
struct PlannedArtifact {
    spec: ArtifactSpec,
    state: ArtifactState,
}

/// Orchestrates one deterministic deployment session.
#[derive(Debug)]
pub struct DeploymentPipeline<L> {
    ledger: L,
    identity: Address,
    config: SessionConfig,
    linker: LibraryLinker,
    resolution: ResolutionTable,
    recorder: ArtifactRecorder,
    plan: Vec<PlannedArtifact>,
}

impl<L: Ledger> DeploymentPipeline<L> {
    /// Creates a pipeline for the given deploying identity.
    pub fn new(ledger: L, identity: Address, config: SessionConfig) -> Self {
        Self {
            ledger,
            identity,
            config,
            linker: LibraryLinker::new(),
            resolution: ResolutionTable::new(),
            recorder: ArtifactRecorder::new(),
            plan: Vec::new(),
        }
    }

    /// The deploying identity.
    pub const fn identity(&self) -> Address {
        self.identity
    }

    /// Registers a library that is already deployed on chain, making it
    /// linkable and referenceable without being part of the plan.
    pub fn register_existing_library(&mut self, name: impl Into<String>, address: Address) {
        let name = name.into();
        self.linker.register(name.clone(), address);
        self.resolution.publish_confirmed(name, address);
    }

    /// Publishes an already known external address so constructor arguments
    /// can reference it by name.
    pub fn register_existing_address(&mut self, name: impl Into<String>, address: Address) {
        self.resolution.publish_confirmed(name, address);
    }

    /// Validates and installs the session's deployment plan.
    ///
    /// The order of `specs` is the deployment order. Validation runs before
    /// any nonce is reserved:
    ///
    /// - artifact names must be unique;
    /// - every link slot must name a library scheduled strictly earlier in
    ///   the plan (or registered beforehand): a linked artifact needs the
    ///   library's *code* on chain, not just its address, so this is a hard
    ///   ordering constraint and any bytecode-dependency cycle fails here;
    /// - every constructor address reference must name some artifact of the
    ///   plan (any position, since a forward reference resolves via
    ///   prediction) or
    ///   an address registered beforehand;
    /// - link slots must fit inside the creation code.
    pub fn plan(&mut self, specs: Vec<ArtifactSpec>) -> Result<(), DeployError> {
        for (index, spec) in specs.iter().enumerate() {
            if specs[..index].iter().any(|earlier| earlier.name == spec.name) {
                return Err(DeployError::DuplicateArtifact { artifact: spec.name.clone() });
            }

            for slot in &spec.links {
                match specs.iter().position(|candidate| candidate.name == slot.library) {
                    Some(lib_index) if lib_index < index && specs[lib_index].is_library() => {}
                    Some(_) => {
                        return Err(DeployError::LibraryNotDeployedFirst {
                            artifact: spec.name.clone(),
                            library: slot.library.clone(),
                        })
                    }
                    None if self.linker.address_of(&slot.library).is_some() => {}
                    None => {
                        return Err(DeployError::UnresolvedLibrary {
                            artifact: spec.name.clone(),
                            library: slot.library.clone(),
                        })
                    }
                }
                for &offset in &slot.offsets {
                    let fits = offset
                        .checked_add(LINK_SLOT_LEN)
                        .is_some_and(|end| end <= spec.code.len());
                    if !fits {
                        return Err(DeployError::LinkOutOfBounds {
                            artifact: spec.name.clone(),
                            library: slot.library.clone(),
                            offset,
                            code_len: spec.code.len(),
                        });
                    }
                }
            }

            for arg in &spec.constructor_args {
                if let ConstructorArg::ArtifactAddress(reference) = arg {
                    let known = specs.iter().any(|candidate| &candidate.name == reference)
                        || self.resolution.contains(reference);
                    if !known {
                        return Err(DeployError::UnknownReference {
                            artifact: spec.name.clone(),
                            reference: reference.clone(),
                        });
                    }
                }
            }
        }

        self.plan = specs
            .into_iter()
            .map(|spec| PlannedArtifact { spec, state: ArtifactState::Planned })
            .collect();
        Ok(())
    }

    /// Executes the plan and returns the manifest of everything confirmed.
    ///
    /// Reads the starting nonce from the ledger (unless the configuration
    /// overrides it), publishes predicted addresses for the whole contiguous
    /// nonce window, then deploys strictly in plan order, blocking on each
    /// confirmation before building the next transaction.
    ///
    /// Any failure aborts the remaining plan. Artifacts confirmed before the
    /// failure stay recorded; read them with
    /// [`manifest`](Self::manifest) after the error.
    pub fn run(&mut self) -> Result<DeploymentManifest, DeployError> {
        let identity = self.identity;
        let starting_nonce = match self.config.starting_nonce {
            Some(nonce) => {
                debug!(nonce, "using configured starting-nonce override");
                nonce
            }
            None => self
                .ledger
                .transaction_count(identity)
                .map_err(|source| DeployError::NonceRead { identity, source })?,
        };

        // Predictions for the whole window come first so a forward reference
        // can read a later artifact's address before that artifact has
        // reserved its nonce. Prediction is pure, so this is safe for every
        // artifact whether or not it ends up forward-referenced.
        let names: Vec<String> =
            self.plan.iter().map(|planned| planned.spec.name.clone()).collect();
        for (index, name) in names.iter().enumerate() {
            let predicted = predict_create_address(identity, starting_nonce + index as u64);
            debug!(artifact = %name, address = %predicted, nonce = starting_nonce + index as u64, "predicted deployment address");
            self.resolution.publish_predicted(name.clone(), predicted);
        }

        info!(
            %identity,
            starting_nonce,
            artifacts = self.plan.len(),
            "starting deployment session"
        );

        let mut allocator = NonceAllocator::new(starting_nonce);
        for index in 0..self.plan.len() {
            let spec = self.plan[index].spec.clone();
            let nonce = allocator.reserve().get();
            self.plan[index].state = ArtifactState::NonceReserved(nonce);

            let linked = match self.linker.link(&spec) {
                Ok(code) => code,
                Err(err) => {
                    self.plan[index].state = ArtifactState::Failed;
                    return Err(err);
                }
            };

            let mut values = Vec::with_capacity(spec.constructor_args.len());
            for arg in &spec.constructor_args {
                match arg {
                    ConstructorArg::Value(value) => values.push(value.clone()),
                    ConstructorArg::ArtifactAddress(reference) => {
                        let Some(resolved) = self.resolution.get(reference) else {
                            self.plan[index].state = ArtifactState::Failed;
                            return Err(DeployError::UnknownReference {
                                artifact: spec.name.clone(),
                                reference: reference.clone(),
                            });
                        };
                        values.push(DynSolValue::Address(resolved.address()));
                    }
                }
            }

            let mut data = linked.to_vec();
            data.extend(encode_constructor_args(values));

            info!(artifact = %spec.name, nonce, payload_len = data.len(), "submitting deployment");
            let tx =
                DeployTransaction { nonce, gas_price: self.config.gas_price, data: data.into() };
            let pending = match self.ledger.submit(tx) {
                Ok(pending) => pending,
                Err(source) => {
                    self.plan[index].state = ArtifactState::Failed;
                    return Err(DeployError::SubmissionRejected {
                        artifact: spec.name.clone(),
                        nonce,
                        source,
                    });
                }
            };
            self.plan[index].state = ArtifactState::Submitted(nonce);

            let confirmation = match self.ledger.await_confirmation(pending) {
                Ok(confirmation) => confirmation,
                Err(source) => {
                    self.plan[index].state = ArtifactState::Failed;
                    return Err(DeployError::ConfirmationFailed {
                        artifact: spec.name.clone(),
                        nonce,
                        source,
                    });
                }
            };
            if confirmation.status == ConfirmationStatus::Reverted {
                self.plan[index].state = ArtifactState::Failed;
                return Err(DeployError::DeploymentReverted { artifact: spec.name.clone(), nonce });
            }
            let Some(confirmed) = confirmation.address else {
                self.plan[index].state = ArtifactState::Failed;
                return Err(DeployError::NoContractAddress { artifact: spec.name.clone(), nonce });
            };

            if let Some(predicted) = self.resolution.confirm(&spec.name, confirmed) {
                self.plan[index].state = ArtifactState::Failed;
                return Err(DeployError::PredictionMismatch {
                    artifact: spec.name.clone(),
                    predicted,
                    confirmed,
                });
            }

            if spec.is_library() {
                self.linker.register(spec.name.clone(), confirmed);
            }
            self.recorder.record(DeployedArtifact {
                name: spec.name.clone(),
                address: confirmed,
                nonce,
                status: confirmation.status,
            });
            self.plan[index].state = ArtifactState::Confirmed(confirmed);
            info!(artifact = %spec.name, address = %confirmed, nonce, "deployment confirmed");
        }

        Ok(self.recorder.manifest())
    }

    /// The manifest of everything confirmed so far, including partial
    /// progress after an aborted run.
    pub fn manifest(&self) -> DeploymentManifest {
        self.recorder.manifest()
    }

    /// The session's append-only deployment record.
    pub const fn recorder(&self) -> &ArtifactRecorder {
        &self.recorder
    }

    /// Current lifecycle state of a planned artifact.
    pub fn artifact_state(&self, name: &str) -> Option<ArtifactState> {
        self.plan.iter().find(|planned| planned.spec.name == name).map(|planned| planned.state)
    }

    /// Current resolution-table entry for a name, in whichever phase it is
    /// in.
    pub fn resolved_address(&self, name: &str) -> Option<ResolvedAddress> {
        self.resolution.get(name)
    }

    /// Number of nonces this session has reserved so far.
    pub fn nonces_reserved(&self) -> u64 {
        self.plan
            .iter()
            .filter(|planned| !matches!(planned.state, ArtifactState::Planned))
            .count() as u64
    }
}
