//! Task records and lifecycle validation.
//!
//! Task identifiers are dense and 0-based, so the ledger is a plain vector.
//! `completed` flips false→true exactly once; expired tasks stay in storage
//! (the deadline is advisory data checked on response, there is no sweep).

use crate::error::{EngineError, Result};
use conclave_types::{Digest16, Identity, NodeType, TaskId, Timestamp};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub created_at: Timestamp,
    pub deadline: Timestamp,
    pub required_type: NodeType,
    pub priority: u8,
    pub completed: bool,
    pub requester: Identity,
    pub data_source_digest: Digest16,
    pub computation_digest: Digest16,
}

#[derive(Debug, Default)]
pub struct TaskLedger {
    tasks: Vec<Task>,
}

impl TaskLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a new task and returns its identifier. Identifiers are strictly
    /// increasing; freshness is the only duplicate prevention.
    #[allow(clippy::too_many_arguments)]
    pub fn create(
        &mut self,
        requester: Identity,
        required_type: NodeType,
        priority: u8,
        data_source_digest: Digest16,
        timeout_secs: Timestamp,
        computation_digest: Digest16,
        now: Timestamp,
    ) -> TaskId {
        let task_id = self.tasks.len() as TaskId;
        self.tasks.push(Task {
            created_at: now,
            deadline: now + timeout_secs,
            required_type,
            priority,
            completed: false,
            requester,
            data_source_digest,
            computation_digest,
        });
        task_id
    }

    pub fn get(&self, task_id: TaskId) -> Result<&Task> {
        self.tasks
            .get(task_id as usize)
            .ok_or(EngineError::TaskNotFound { task_id })
    }

    /// Validates that `task_id` can still accept responses. Read-only: the
    /// response itself does not mutate the task.
    pub fn check_response_window(&self, task_id: TaskId, now: Timestamp) -> Result<&Task> {
        let task = self.get(task_id)?;
        if task.completed {
            return Err(EngineError::TaskAlreadyCompleted { task_id });
        }
        if now > task.deadline {
            return Err(EngineError::TaskExpired {
                task_id,
                deadline: task.deadline,
                now,
            });
        }
        Ok(task)
    }

    /// Flips `completed` exactly once; any further mutation is rejected.
    pub fn complete(&mut self, task_id: TaskId) -> Result<()> {
        let task = self
            .tasks
            .get_mut(task_id as usize)
            .ok_or(EngineError::TaskNotFound { task_id })?;
        if task.completed {
            return Err(EngineError::TaskAlreadyCompleted { task_id });
        }
        task.completed = true;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
