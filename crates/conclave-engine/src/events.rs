//! Domain event log.
//!
//! Every state-changing engine operation appends exactly one event here
//! (segment rollovers add their own pair). The log is the sole mechanism for
//! external observers to reconstruct history; each append is mirrored to
//! `tracing` for operational visibility.

use conclave_types::{Digest16, Identity, NodeType, TaskId, Timestamp};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum CoordinationEvent {
    WorkerRegistered {
        worker: Identity,
        node_type: NodeType,
        profile_digest: Digest16,
        timestamp: Timestamp,
    },

    TaskCreated {
        task_id: TaskId,
        requester: Identity,
        required_type: NodeType,
        deadline: Timestamp,
        computation_digest: Digest16,
        timestamp: Timestamp,
    },

    ResponseSubmitted {
        task_id: TaskId,
        worker: Identity,
        timestamp: Timestamp,
    },

    TaskCompleted {
        task_id: TaskId,
        final_payload_digest: Digest16,
        timestamp: Timestamp,
    },

    ComputationPosted {
        computation_id: Digest16,
        worker_count: usize,
        qos_proof_digest: Digest16,
        security_proof_digest: Digest16,
        timestamp: Timestamp,
    },

    /// Carries the raw (unclamped) score alongside the stored one for audit.
    ReputationUpdated {
        worker: Identity,
        raw_score: u16,
        stored_score: u8,
        proof_digest: Digest16,
        timestamp: Timestamp,
    },

    WorkerDeactivated {
        worker: Identity,
        node_type: NodeType,
        timestamp: Timestamp,
    },

    SegmentRollover {
        closed_segment: u32,
        opened_segment: u32,
        start_time: Timestamp,
        end_time: Timestamp,
        active_workers: u64,
        timestamp: Timestamp,
    },

    CostSavingsTracked {
        segment: u32,
        savings_micros: u64,
        total_savings_micros: u64,
        timestamp: Timestamp,
    },
}

/// Append-only, in-order event log.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<CoordinationEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: CoordinationEvent) {
        debug!(event = ?event, "📜 Event recorded");
        self.events.push(event);
    }

    pub fn events(&self) -> &[CoordinationEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
