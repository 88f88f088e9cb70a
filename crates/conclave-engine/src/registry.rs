//! Worker records and per-type active indices.
//!
//! Workers are soft-deactivated, never deleted: a deactivated record keeps its
//! history and can be re-registered later. The active indices exist so that
//! selection scans only live workers of one type; removal is swap-with-last,
//! O(1), and index order carries no semantic meaning.

use crate::error::{EngineError, Result};
use conclave_types::{Digest16, Identity, NodeType, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    pub last_active_time: Timestamp,
    /// Saturates at `u32::MAX` rather than wrapping.
    pub completed_tasks: u32,
    /// Bounded score, clamped to the top of the `u8` range on update.
    pub reputation_tier: u8,
    pub node_type: NodeType,
    pub is_active: bool,
    pub profile_digest: Digest16,
}

#[derive(Debug, Default)]
pub struct WorkerRegistry {
    workers: HashMap<Identity, Worker>,
    active_index: HashMap<NodeType, Vec<Identity>>,
}

impl WorkerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `identity` as an active worker with baseline reputation.
    /// A deactivated record is overwritten and reactivated; an active one
    /// fails with `AlreadyRegistered`.
    pub fn register(
        &mut self,
        identity: Identity,
        node_type: NodeType,
        profile_digest: Digest16,
        baseline_reputation: u8,
        now: Timestamp,
    ) -> Result<()> {
        if self.is_active(&identity) {
            return Err(EngineError::AlreadyRegistered { worker: identity });
        }

        self.workers.insert(
            identity,
            Worker {
                last_active_time: now,
                completed_tasks: 0,
                reputation_tier: baseline_reputation,
                node_type,
                is_active: true,
                profile_digest,
            },
        );
        self.active_index.entry(node_type).or_default().push(identity);

        Ok(())
    }

    /// Clamps `new_score` into the bounded range and refreshes activity.
    /// Returns the stored (clamped) score.
    pub fn update_reputation(
        &mut self,
        identity: &Identity,
        new_score: u16,
        now: Timestamp,
    ) -> Result<u8> {
        let worker = self.active_mut(identity)?;
        let stored = new_score.min(u8::MAX as u16) as u8;
        worker.reputation_tier = stored;
        worker.last_active_time = now;
        Ok(stored)
    }

    /// Bumps the completed-task counter (saturating) and refreshes activity.
    pub fn record_response(&mut self, identity: &Identity, now: Timestamp) -> Result<()> {
        let worker = self.active_mut(identity)?;
        worker.completed_tasks = worker.completed_tasks.saturating_add(1);
        worker.last_active_time = now;
        Ok(())
    }

    /// Soft-deactivates the worker and swap-removes it from its type index.
    /// Returns the worker's node type for event emission.
    pub fn deactivate(&mut self, identity: &Identity) -> Result<NodeType> {
        let node_type = {
            let worker = self.active_mut(identity)?;
            worker.is_active = false;
            worker.node_type
        };

        if let Some(index) = self.active_index.get_mut(&node_type) {
            if let Some(pos) = index.iter().position(|id| id == identity) {
                index.swap_remove(pos);
            }
        }

        Ok(node_type)
    }

    pub fn get(&self, identity: &Identity) -> Option<&Worker> {
        self.workers.get(identity)
    }

    pub fn is_active(&self, identity: &Identity) -> bool {
        self.workers
            .get(identity)
            .map(|w| w.is_active)
            .unwrap_or(false)
    }

    /// Active workers of one type, in index (scan) order.
    pub fn active_of_type(&self, node_type: NodeType) -> &[Identity] {
        self.active_index
            .get(&node_type)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn active_count(&self, node_type: NodeType) -> usize {
        self.active_of_type(node_type).len()
    }

    /// Live registry size across all types.
    pub fn active_total(&self) -> u64 {
        self.active_index.values().map(|v| v.len() as u64).sum()
    }

    pub fn workers(&self) -> &HashMap<Identity, Worker> {
        &self.workers
    }

    fn active_mut(&mut self, identity: &Identity) -> Result<&mut Worker> {
        match self.workers.get_mut(identity) {
            Some(w) if w.is_active => Ok(w),
            _ => Err(EngineError::WorkerNotActive { worker: *identity }),
        }
    }
}
