//! Coordination engine facade.
//!
//! All entity state lives in one constructible object; entry points are
//! externally serialized (the engine has no interior locking) and each one
//! follows the same shape: capability check, segment advance, validation,
//! mutation, one domain event. Failure paths return before any domain
//! mutation; the lazy segment rollover is the one time-driven transition
//! allowed to persist when the enclosing call fails.

use crate::auth::{Capability, CapabilityTable};
use crate::clock::Clock;
use crate::config::EngineConfig;
use crate::error::{EngineError, Result};
use crate::events::{CoordinationEvent, EventLog};
use crate::ledger::{Task, TaskLedger};
use crate::records::{ComputationRecord, RecordStore};
use crate::registry::{Worker, WorkerRegistry};
use crate::segments::{SegmentManager, TemporalSegment};
use crate::selection;
use conclave_crypto::{response_digest, ResponseVerifier};
use conclave_types::{Digest16, Identity, NodeType, Signature, TaskId, Timestamp};
use std::sync::Arc;
use tracing::info;

pub struct CoordinationEngine {
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    verifier: Arc<dyn ResponseVerifier>,
    roles: Box<dyn CapabilityTable>,
    segments: SegmentManager,
    registry: WorkerRegistry,
    ledger: TaskLedger,
    records: RecordStore,
    events: EventLog,
}

impl CoordinationEngine {
    /// Builds an engine with segment 1 anchored at the current clock reading.
    /// `roles` arrives pre-seeded with administrative and aggregator grants;
    /// table administration beyond registration grants is an external concern.
    pub fn new(
        config: EngineConfig,
        clock: Arc<dyn Clock>,
        verifier: Arc<dyn ResponseVerifier>,
        roles: Box<dyn CapabilityTable>,
    ) -> Self {
        let genesis = clock.now();
        let segments = SegmentManager::new(&config, genesis);

        info!(genesis, window = config.segment_window_secs, "🏛️ Coordination engine initialized");

        Self {
            config,
            clock,
            verifier,
            roles,
            segments,
            registry: WorkerRegistry::new(),
            ledger: TaskLedger::new(),
            records: RecordStore::new(),
            events: EventLog::new(),
        }
    }

    // ---- worker registry -------------------------------------------------

    /// Self-registration: the authenticated caller becomes an active worker
    /// of `node_type` and is granted the matching oracle capability.
    pub fn register_worker(
        &mut self,
        caller: Identity,
        node_type: NodeType,
        profile_digest: Digest16,
    ) -> Result<()> {
        let now = self.clock.now();
        self.roll_segments(now);

        self.registry.register(
            caller,
            node_type,
            profile_digest,
            self.config.baseline_reputation,
            now,
        )?;
        self.segments.record_worker_joined();
        self.roles.grant(caller, Capability::Oracle(node_type));

        info!(worker = %caller, node_type = %node_type, "🧾 Worker registered");
        self.events.record(CoordinationEvent::WorkerRegistered {
            worker: caller,
            node_type,
            profile_digest,
            timestamp: now,
        });

        Ok(())
    }

    /// Administrative bulk registration over parallel arrays. Entries whose
    /// identity is already active are silently skipped so a retried batch is
    /// idempotent. Returns the number of entries actually registered.
    pub fn batch_register(
        &mut self,
        caller: Identity,
        identities: &[Identity],
        node_types: &[NodeType],
        profile_digests: &[Digest16],
    ) -> Result<usize> {
        self.require(&caller, Capability::Admin)?;

        if identities.len() != node_types.len() {
            return Err(EngineError::LengthMismatch {
                left: identities.len(),
                right: node_types.len(),
            });
        }
        if identities.len() != profile_digests.len() {
            return Err(EngineError::LengthMismatch {
                left: identities.len(),
                right: profile_digests.len(),
            });
        }
        if identities.len() > self.config.max_batch_registrations {
            return Err(EngineError::BatchTooLarge {
                size: identities.len(),
                max: self.config.max_batch_registrations,
            });
        }

        let now = self.clock.now();
        self.roll_segments(now);

        let mut registered = 0;
        for i in 0..identities.len() {
            if self.registry.is_active(&identities[i]) {
                continue;
            }

            self.registry.register(
                identities[i],
                node_types[i],
                profile_digests[i],
                self.config.baseline_reputation,
                now,
            )?;
            self.segments.record_worker_joined();
            self.roles
                .grant(identities[i], Capability::Oracle(node_types[i]));
            self.events.record(CoordinationEvent::WorkerRegistered {
                worker: identities[i],
                node_type: node_types[i],
                profile_digest: profile_digests[i],
                timestamp: now,
            });
            registered += 1;
        }

        info!(batch = identities.len(), registered, "🧾 Batch registration");
        Ok(registered)
    }

    /// Privileged reputation override, posted by an aggregator with a proof
    /// digest (administrators qualify too). The stored score is clamped; the
    /// audit event carries the raw value and the proof digest.
    pub fn update_reputation(
        &mut self,
        caller: Identity,
        worker: Identity,
        new_score: u16,
        proof_digest: Digest16,
    ) -> Result<()> {
        self.require(&caller, Capability::Aggregator)?;
        let now = self.clock.now();
        self.roll_segments(now);

        let stored = self.registry.update_reputation(&worker, new_score, now)?;

        info!(worker = %worker, raw = new_score, stored, "⭐ Reputation updated");
        self.events.record(CoordinationEvent::ReputationUpdated {
            worker,
            raw_score: new_score,
            stored_score: stored,
            proof_digest,
            timestamp: now,
        });

        Ok(())
    }

    /// Soft-deactivation: by the worker itself, or administratively.
    pub fn deactivate_worker(&mut self, caller: Identity, worker: Identity) -> Result<()> {
        if caller != worker {
            self.require(&caller, Capability::Admin)?;
        }
        let now = self.clock.now();
        self.roll_segments(now);

        let node_type = self.registry.deactivate(&worker)?;
        self.segments.record_worker_left();

        info!(worker = %worker, node_type = %node_type, "🚪 Worker deactivated");
        self.events.record(CoordinationEvent::WorkerDeactivated {
            worker,
            node_type,
            timestamp: now,
        });

        Ok(())
    }

    // ---- task ledger -----------------------------------------------------

    /// Creates a task on behalf of the authenticated requester.
    pub fn create_task(
        &mut self,
        caller: Identity,
        required_type: NodeType,
        priority: u8,
        data_source_digest: Digest16,
        timeout_secs: Timestamp,
        computation_digest: Digest16,
    ) -> Result<TaskId> {
        let now = self.clock.now();
        self.roll_segments(now);

        let task_id = self.ledger.create(
            caller,
            required_type,
            priority,
            data_source_digest,
            timeout_secs,
            computation_digest,
            now,
        );
        self.segments.record_task_created();

        let deadline = now + timeout_secs;
        info!(task_id, requester = %caller, required_type = %required_type, deadline, "📋 Task created");
        self.events.record(CoordinationEvent::TaskCreated {
            task_id,
            requester: caller,
            required_type,
            deadline,
            computation_digest,
            timestamp: now,
        });

        Ok(task_id)
    }

    /// Worker response to an open task. All checks precede the single
    /// mutation (the worker's activity counters); the task itself is not
    /// mutated by responses.
    pub fn respond(
        &mut self,
        caller: Identity,
        task_id: TaskId,
        payload: &[u8],
        signature: &Signature,
    ) -> Result<()> {
        let now = self.clock.now();
        self.roll_segments(now);

        let required_type = self.ledger.get(task_id)?.required_type;
        self.require(&caller, Capability::Oracle(required_type))?;

        let worker = match self.registry.get(&caller) {
            Some(w) if w.is_active => w,
            _ => return Err(EngineError::WorkerNotActive { worker: caller }),
        };

        self.ledger.check_response_window(task_id, now)?;

        // Load shedding: under contention only standard-tier workers defer.
        let load = self.segments.pending_load();
        let tier = selection::classify(
            &self.config,
            worker.last_active_time,
            worker.completed_tasks,
            worker.reputation_tier,
            now,
        );
        if !selection::admit_under_load(&self.config, load, tier) {
            return Err(EngineError::Deferred {
                tier: tier.rank(),
                load,
            });
        }

        let digest = response_digest(task_id, payload);
        if !self.verifier.verify(&caller, &digest, signature) {
            return Err(EngineError::InvalidSignature {
                task_id,
                worker: caller,
            });
        }

        self.registry.record_response(&caller, now)?;

        info!(task_id, worker = %caller, "📨 Response accepted");
        self.events.record(CoordinationEvent::ResponseSubmitted {
            task_id,
            worker: caller,
            timestamp: now,
        });

        Ok(())
    }

    /// Finalizes a task. Aggregation and validation of the individual worker
    /// responses happened off-engine; this call only records the outcome.
    pub fn complete_task(
        &mut self,
        caller: Identity,
        task_id: TaskId,
        final_payload: &[u8],
    ) -> Result<()> {
        self.require(&caller, Capability::Aggregator)?;
        let now = self.clock.now();
        self.roll_segments(now);

        self.ledger.complete(task_id)?;
        self.segments.record_task_completed();

        let final_payload_digest = Digest16::of(final_payload);
        info!(task_id, payload_digest = %final_payload_digest, "✅ Task completed");
        self.events.record(CoordinationEvent::TaskCompleted {
            task_id,
            final_payload_digest,
            timestamp: now,
        });

        Ok(())
    }

    // ---- computation records ----------------------------------------------

    /// Posts (or overwrites) the summary record of an off-chain computation.
    pub fn post_computation(
        &mut self,
        caller: Identity,
        computation_id: Digest16,
        selected_workers: Vec<Identity>,
        reputation_scores: &[u16],
        qos_proof_digest: Digest16,
        security_proof_digest: Digest16,
    ) -> Result<()> {
        self.require(&caller, Capability::Aggregator)?;
        let now = self.clock.now();
        self.roll_segments(now);

        let worker_count = selected_workers.len();
        self.records.post(
            computation_id,
            selected_workers,
            reputation_scores,
            qos_proof_digest,
            security_proof_digest,
            now,
        )?;

        info!(computation_id = %computation_id, worker_count, "🧮 Computation record posted");
        self.events.record(CoordinationEvent::ComputationPosted {
            computation_id,
            worker_count,
            qos_proof_digest,
            security_proof_digest,
            timestamp: now,
        });

        Ok(())
    }

    // ---- selection (read-only) ---------------------------------------------

    /// Bounded, deterministic subset of eligible workers for a task of
    /// `required_type`. Mutates nothing.
    pub fn select_workers(&self, required_type: NodeType) -> Vec<Identity> {
        self.select_workers_bounded(required_type, self.config.max_selected_workers)
    }

    pub fn select_workers_bounded(
        &self,
        required_type: NodeType,
        max_selected: usize,
    ) -> Vec<Identity> {
        selection::select_for_task(
            &self.config,
            self.registry.active_of_type(required_type),
            self.registry.workers(),
            required_type,
            max_selected,
            self.clock.now(),
        )
    }

    // ---- read accessors ----------------------------------------------------

    pub fn worker(&self, identity: &Identity) -> Option<&Worker> {
        self.registry.get(identity)
    }

    pub fn task(&self, task_id: TaskId) -> Option<&Task> {
        self.ledger.get(task_id).ok()
    }

    pub fn computation(&self, computation_id: &Digest16) -> Option<&ComputationRecord> {
        self.records.get(computation_id)
    }

    pub fn current_segment(&self) -> &TemporalSegment {
        self.segments.current()
    }

    pub fn segment(&self, id: u32) -> Option<&TemporalSegment> {
        self.segments.get(id)
    }

    pub fn active_worker_count(&self, node_type: NodeType) -> usize {
        self.registry.active_count(node_type)
    }

    pub fn active_worker_total(&self) -> u64 {
        self.registry.active_total()
    }

    pub fn task_count(&self) -> usize {
        self.ledger.len()
    }

    pub fn total_savings_micros(&self) -> u64 {
        self.segments.total_savings_micros()
    }

    pub fn events(&self) -> &[CoordinationEvent] {
        self.events.events()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ---- internals ---------------------------------------------------------

    fn require(&self, caller: &Identity, capability: Capability) -> Result<()> {
        if self.roles.has(caller, capability) || self.roles.has(caller, Capability::Admin) {
            return Ok(());
        }
        Err(EngineError::Unauthorized {
            caller: *caller,
            capability: capability.as_str(),
        })
    }

    fn roll_segments(&mut self, now: Timestamp) {
        let live_workers = self.registry.active_total();
        for report in self.segments.advance(now, live_workers) {
            self.events.record(CoordinationEvent::SegmentRollover {
                closed_segment: report.closed_segment,
                opened_segment: report.opened_segment,
                start_time: report.start_time,
                end_time: report.end_time,
                active_workers: report.active_workers,
                timestamp: now,
            });
            self.events.record(CoordinationEvent::CostSavingsTracked {
                segment: report.closed_segment,
                savings_micros: report.savings_micros,
                total_savings_micros: report.total_savings_micros,
                timestamp: now,
            });
        }
    }
}
