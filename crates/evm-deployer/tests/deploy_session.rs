//! End-to-end deployment sessions against the in-memory ledger.

use alloy_dyn_abi::DynSolValue;
use alloy_primitives::{address, Address, U256};
use evm_deployer::{
    predict_create_address, test_utils::MockLedger, ArtifactSpec, ArtifactState,
    DeploymentPipeline, ResolvedAddress, SessionConfig,
};

const IDENTITY: Address = address!("000000000000000000000000000000000000d00d");

/// 32-byte ABI word for an address argument.
fn abi_word(address: Address) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[12..].copy_from_slice(address.as_slice());
    word
}

#[test]
fn circular_session_with_forward_reference() {
    // Starting nonce 5, then
    //   LibA                                   (nonce 5)
    //   ArtifactB: links LibA, forward-references ArtifactC  (nonce 6)
    //   ArtifactC: references ArtifactB        (nonce 7)
    let mut ledger = MockLedger::new(IDENTITY, 5);
    let mut pipeline =
        DeploymentPipeline::new(&mut ledger, IDENTITY, SessionConfig::default());

    pipeline
        .plan(vec![
            ArtifactSpec::library("lib-a", vec![0x60, 0x0a, 0x60, 0x00]),
            ArtifactSpec::contract("artifact-b", vec![0u8; 64])
                .with_link("lib-a", vec![10])
                .with_address_ref("artifact-c"),
            ArtifactSpec::contract("artifact-c", vec![0x60, 0x80]).with_address_ref("artifact-b"),
        ])
        .unwrap();

    let manifest = pipeline.run().unwrap();

    let lib_a = predict_create_address(IDENTITY, 5);
    let artifact_b = predict_create_address(IDENTITY, 6);
    let artifact_c = predict_create_address(IDENTITY, 7);

    assert_eq!(manifest.len(), 3);
    assert_eq!(manifest.address_of("lib-a"), Some(lib_a));
    assert_eq!(manifest.address_of("artifact-b"), Some(artifact_b));
    assert_eq!(manifest.address_of("artifact-c"), Some(artifact_c));

    assert_eq!(pipeline.artifact_state("artifact-b"), Some(ArtifactState::Confirmed(artifact_b)));
    assert_eq!(
        pipeline.resolved_address("artifact-c"),
        Some(ResolvedAddress::Confirmed(artifact_c))
    );
    drop(pipeline);

    // Exactly three transactions, nonces 5, 6, 7 in order.
    let submitted = ledger.submitted();
    assert_eq!(submitted.len(), 3);
    assert_eq!(submitted.iter().map(|tx| tx.nonce).collect::<Vec<_>>(), [5, 6, 7]);

    // B's payload carries LibA's confirmed address in the link slot and C's
    // *predicted* address as its constructor argument.
    let b_payload = &submitted[1].data;
    assert_eq!(&b_payload[10..30], lib_a.as_slice());
    assert!(b_payload.ends_with(&abi_word(artifact_c)));

    // C's payload carries B's confirmed address.
    assert!(submitted[2].data.ends_with(&abi_word(artifact_b)));
}

#[test]
fn session_shaped_like_a_protocol_deployment() {
    // Globals with literal constructor args, two libraries, a hub linking
    // both and forward-referencing its proxy, then the proxy pointing back at
    // the hub implementation.
    let governance = address!("0000000000000000000000000000000000900001");
    let treasury = address!("0000000000000000000000000000000000900002");

    let mut ledger = MockLedger::new(IDENTITY, 0);
    let mut pipeline =
        DeploymentPipeline::new(&mut ledger, IDENTITY, SessionConfig::default());

    pipeline
        .plan(vec![
            ArtifactSpec::contract("module-globals", vec![0x60, 0x80])
                .with_arg(DynSolValue::Address(governance))
                .with_arg(DynSolValue::Address(treasury))
                .with_arg(DynSolValue::Uint(U256::from(50), 256)),
            ArtifactSpec::library("profile-lib", vec![0x60, 0x01]),
            ArtifactSpec::library("validation-lib", vec![0x60, 0x02]),
            ArtifactSpec::contract("hub-impl", vec![0u8; 96])
                .with_link("profile-lib", vec![8])
                .with_link("validation-lib", vec![40, 70])
                .with_address_ref("module-globals")
                .with_address_ref("hub-proxy"),
            ArtifactSpec::contract("hub-proxy", vec![0x3d, 0x60])
                .with_address_ref("hub-impl")
                .with_arg(DynSolValue::Address(IDENTITY)),
        ])
        .unwrap();

    let manifest = pipeline.run().unwrap();
    drop(pipeline);

    assert_eq!(manifest.len(), 5);
    for (index, name) in
        ["module-globals", "profile-lib", "validation-lib", "hub-impl", "hub-proxy"]
            .iter()
            .enumerate()
    {
        assert_eq!(
            manifest.address_of(name),
            Some(predict_create_address(IDENTITY, index as u64)),
            "artifact {name} not at its predicted address"
        );
    }

    let submitted = ledger.submitted();
    assert_eq!(submitted.iter().map(|tx| tx.nonce).collect::<Vec<_>>(), [0, 1, 2, 3, 4]);

    // The hub's link slots hold both library addresses.
    let hub_payload = &submitted[3].data;
    let profile_lib = predict_create_address(IDENTITY, 1);
    let validation_lib = predict_create_address(IDENTITY, 2);
    assert_eq!(&hub_payload[8..28], profile_lib.as_slice());
    assert_eq!(&hub_payload[40..60], validation_lib.as_slice());
    assert_eq!(&hub_payload[70..90], validation_lib.as_slice());

    // The hub's constructor tail: globals (confirmed), then the proxy's
    // forward-predicted address.
    let tail = &hub_payload[hub_payload.len() - 64..];
    assert_eq!(tail[..32], abi_word(predict_create_address(IDENTITY, 0)));
    assert_eq!(tail[32..], abi_word(predict_create_address(IDENTITY, 4)));

    // The proxy's constructor holds the hub implementation's real address.
    let proxy_payload = &submitted[4].data;
    let proxy_tail = &proxy_payload[proxy_payload.len() - 64..];
    assert_eq!(proxy_tail[..32], abi_word(predict_create_address(IDENTITY, 3)));
    assert_eq!(proxy_tail[32..], abi_word(IDENTITY));
}

#[test]
fn starting_nonce_override_skips_the_count_read() {
    // The ledger cannot even answer a count read; the override makes the
    // session independent of it.
    let mut ledger = MockLedger::new(IDENTITY, 9).fail_transaction_counts();
    let mut pipeline = DeploymentPipeline::new(
        &mut ledger,
        IDENTITY,
        SessionConfig::new().with_starting_nonce(9),
    );
    pipeline.plan(vec![ArtifactSpec::contract("solo", vec![0x60, 0x80])]).unwrap();

    let manifest = pipeline.run().unwrap();
    assert_eq!(manifest.address_of("solo"), Some(predict_create_address(IDENTITY, 9)));
}

#[test]
fn gas_price_from_config_is_attached_to_every_transaction() {
    let mut ledger = MockLedger::new(IDENTITY, 0);
    let mut pipeline = DeploymentPipeline::new(
        &mut ledger,
        IDENTITY,
        SessionConfig::new().with_gas_price(7_000_000_000),
    );
    pipeline
        .plan(vec![
            ArtifactSpec::contract("one", vec![0x60, 0x80]),
            ArtifactSpec::contract("two", vec![0x60, 0x80]),
        ])
        .unwrap();
    pipeline.run().unwrap();
    drop(pipeline);

    assert!(ledger.submitted().iter().all(|tx| tx.gas_price == 7_000_000_000));
}

#[test]
fn preregistered_library_links_without_redeployment() {
    let math = address!("00000000000000000000000000000000000000aa");
    let mut ledger = MockLedger::new(IDENTITY, 0);
    let mut pipeline =
        DeploymentPipeline::new(&mut ledger, IDENTITY, SessionConfig::default());
    pipeline.register_existing_library("math", math);
    pipeline
        .plan(vec![ArtifactSpec::contract("consumer", vec![0u8; 32]).with_link("math", vec![6])])
        .unwrap();
    pipeline.run().unwrap();
    drop(pipeline);

    let submitted = ledger.submitted();
    assert_eq!(submitted.len(), 1);
    assert_eq!(&submitted[0].data[6..26], math.as_slice());
}

#[test]
fn manifest_renders_as_json() {
    let mut ledger = MockLedger::new(IDENTITY, 0);
    let mut pipeline =
        DeploymentPipeline::new(&mut ledger, IDENTITY, SessionConfig::default());
    pipeline.plan(vec![ArtifactSpec::contract("solo", vec![0x60, 0x80])]).unwrap();
    let manifest = pipeline.run().unwrap();

    let json = manifest.to_json_pretty().unwrap();
    assert!(json.contains("\"solo\""));
    assert!(json.contains(&format!("{}", predict_create_address(IDENTITY, 0)).to_lowercase()));
}
