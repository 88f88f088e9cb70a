//! End-to-end coordination flows through the engine facade:
//! registration → task creation → signed response → completion, plus the
//! terminal-state and expiry paths.

use conclave_crypto::{Ed25519Verifier, ResponseSigner};
use conclave_engine::{
    Capability, CapabilityTable, CoordinationEngine, CoordinationEvent, EngineConfig, EngineError,
    InMemoryRoles, ManualClock,
};
use conclave_types::{Digest16, Identity, NodeType, Timestamp};
use std::sync::Arc;

const GENESIS: Timestamp = 1_700_000_000;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("conclave_engine=debug")
        .with_test_writer()
        .try_init();
}

struct TestNet {
    engine: CoordinationEngine,
    clock: Arc<ManualClock>,
    admin: Identity,
    aggregator: Identity,
}

fn testnet() -> TestNet {
    init_tracing();

    let clock = Arc::new(ManualClock::new(GENESIS));
    let admin = Identity::from_bytes([0xAD; 32]);
    let aggregator = Identity::from_bytes([0xA6; 32]);

    let mut roles = InMemoryRoles::new();
    roles.grant(admin, Capability::Admin);
    roles.grant(aggregator, Capability::Aggregator);

    TestNet {
        engine: CoordinationEngine::new(
            EngineConfig::default(),
            clock.clone(),
            Arc::new(Ed25519Verifier),
            Box::new(roles),
        ),
        clock,
        admin,
        aggregator,
    }
}

fn requester() -> Identity {
    Identity::from_bytes([0x5E; 32])
}

#[test]
fn full_task_lifecycle() {
    let mut net = testnet();
    let signer = ResponseSigner::from_seed(&[7u8; 32]);
    let worker = signer.identity();

    // Register worker W (type DATA).
    net.engine
        .register_worker(worker, NodeType::Data, Digest16::of(b"profile-w"))
        .unwrap();

    // Create a task: first id is 0, deadline = now + timeout.
    let task_id = net
        .engine
        .create_task(
            requester(),
            NodeType::Data,
            0,
            Digest16::of(b"https://feed.example/price"),
            3_600,
            Digest16::of(b"median-of-responses"),
        )
        .unwrap();
    assert_eq!(task_id, 0);
    assert_eq!(net.engine.task(0).unwrap().deadline, GENESIS + 3_600);

    // Signed response is accepted and credits the worker.
    let sig = signer.sign_response(task_id, b"price=42.17");
    net.engine
        .respond(worker, task_id, b"price=42.17", &sig)
        .unwrap();
    assert_eq!(net.engine.worker(&worker).unwrap().completed_tasks, 1);
    assert!(!net.engine.task(task_id).unwrap().completed);

    // Completion is privileged and single-shot.
    net.engine
        .complete_task(net.aggregator, task_id, b"final:42.17")
        .unwrap();
    let err = net
        .engine
        .complete_task(net.aggregator, task_id, b"final:43.00")
        .unwrap_err();
    assert!(matches!(err, EngineError::TaskAlreadyCompleted { task_id: 0 }));

    // The completion event reflects only the first payload.
    let completions: Vec<&CoordinationEvent> = net
        .engine
        .events()
        .iter()
        .filter(|e| matches!(e, CoordinationEvent::TaskCompleted { .. }))
        .collect();
    assert_eq!(completions.len(), 1);
    match completions[0] {
        CoordinationEvent::TaskCompleted {
            final_payload_digest,
            ..
        } => assert_eq!(*final_payload_digest, Digest16::of(b"final:42.17")),
        _ => unreachable!(),
    }

    // Post the computation summary for this task's computation digest.
    let comp_id = Digest16::of(b"median-of-responses");
    net.engine
        .post_computation(
            net.aggregator,
            comp_id,
            vec![worker],
            &[net.engine.worker(&worker).unwrap().reputation_tier as u16],
            Digest16::of(b"qos-proof"),
            Digest16::of(b"security-proof"),
        )
        .unwrap();
    let record = net.engine.computation(&comp_id).unwrap();
    assert_eq!(record.selected_workers, vec![worker]);
}

#[test]
fn expired_task_rejects_response_and_leaves_worker_untouched() {
    let mut net = testnet();
    let signer = ResponseSigner::from_seed(&[8u8; 32]);
    let worker = signer.identity();

    net.engine
        .register_worker(worker, NodeType::Data, Digest16::of(b"p"))
        .unwrap();
    let task_id = net
        .engine
        .create_task(
            requester(),
            NodeType::Data,
            0,
            Digest16::of(b"s"),
            3_600,
            Digest16::of(b"c"),
        )
        .unwrap();

    let before = net.engine.worker(&worker).unwrap().clone();
    net.clock.advance(3_601);

    let sig = signer.sign_response(task_id, b"late");
    let err = net.engine.respond(worker, task_id, b"late", &sig).unwrap_err();
    assert!(matches!(err, EngineError::TaskExpired { .. }));
    assert_eq!(net.engine.worker(&worker).unwrap(), &before);

    // Expired tasks are not swept; the record stays readable.
    assert!(!net.engine.task(task_id).unwrap().completed);
}

#[test]
fn duplicate_registration_fails_and_registry_is_unchanged() {
    let mut net = testnet();
    let worker = Identity::from_bytes([1u8; 32]);

    net.engine
        .register_worker(worker, NodeType::Attestation, Digest16::of(b"p1"))
        .unwrap();
    let err = net
        .engine
        .register_worker(worker, NodeType::Attestation, Digest16::of(b"p2"))
        .unwrap_err();

    assert!(matches!(err, EngineError::AlreadyRegistered { .. }));
    assert_eq!(net.engine.active_worker_total(), 1);
    assert_eq!(
        net.engine.worker(&worker).unwrap().profile_digest,
        Digest16::of(b"p1")
    );
}

#[test]
fn deactivated_worker_cannot_respond() {
    let mut net = testnet();
    let signer = ResponseSigner::from_seed(&[9u8; 32]);
    let worker = signer.identity();

    net.engine
        .register_worker(worker, NodeType::Data, Digest16::of(b"p"))
        .unwrap();
    let task_id = net
        .engine
        .create_task(
            requester(),
            NodeType::Data,
            0,
            Digest16::of(b"s"),
            3_600,
            Digest16::of(b"c"),
        )
        .unwrap();

    // Self-deactivation; strangers cannot deactivate others.
    let stranger = Identity::from_bytes([0x33; 32]);
    assert!(matches!(
        net.engine.deactivate_worker(stranger, worker).unwrap_err(),
        EngineError::Unauthorized { .. }
    ));
    net.engine.deactivate_worker(worker, worker).unwrap();
    assert_eq!(net.engine.active_worker_count(NodeType::Data), 0);

    let sig = signer.sign_response(task_id, b"obs");
    let err = net.engine.respond(worker, task_id, b"obs", &sig).unwrap_err();
    assert!(matches!(err, EngineError::WorkerNotActive { .. }));
}

#[test]
fn reputation_update_is_clamped_and_audited() {
    let mut net = testnet();
    let worker = Identity::from_bytes([2u8; 32]);
    net.engine
        .register_worker(worker, NodeType::Data, Digest16::of(b"p"))
        .unwrap();

    net.engine
        .update_reputation(net.admin, worker, 1_000, Digest16::of(b"proof"))
        .unwrap();
    assert_eq!(net.engine.worker(&worker).unwrap().reputation_tier, 255);

    let audit = net
        .engine
        .events()
        .iter()
        .find_map(|e| match e {
            CoordinationEvent::ReputationUpdated {
                raw_score,
                stored_score,
                ..
            } => Some((*raw_score, *stored_score)),
            _ => None,
        })
        .expect("reputation event");
    assert_eq!(audit, (1_000, 255));
}

#[test]
fn event_log_reconstructs_operation_order() {
    let mut net = testnet();
    let worker = Identity::from_bytes([3u8; 32]);

    net.engine
        .register_worker(worker, NodeType::Data, Digest16::of(b"p"))
        .unwrap();
    net.engine
        .create_task(
            requester(),
            NodeType::Data,
            0,
            Digest16::of(b"s"),
            3_600,
            Digest16::of(b"c"),
        )
        .unwrap();
    net.engine.complete_task(net.aggregator, 0, b"final").unwrap();

    let kinds: Vec<&str> = net
        .engine
        .events()
        .iter()
        .map(|e| match e {
            CoordinationEvent::WorkerRegistered { .. } => "registered",
            CoordinationEvent::TaskCreated { .. } => "created",
            CoordinationEvent::TaskCompleted { .. } => "completed",
            _ => "other",
        })
        .collect();
    assert_eq!(kinds, vec!["registered", "created", "completed"]);

    // Events serialize stably for external consumers.
    let json = serde_json::to_string(net.engine.events()).unwrap();
    assert!(json.contains("\"type\":\"TaskCreated\""));
}
