use conclave_types::{Identity, TaskId, Timestamp};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("worker already registered: {worker}")]
    AlreadyRegistered { worker: Identity },

    #[error("worker not active: {worker}")]
    WorkerNotActive { worker: Identity },

    #[error("parallel input lengths differ: {left} vs {right}")]
    LengthMismatch { left: usize, right: usize },

    #[error("batch of {size} exceeds ceiling of {max}")]
    BatchTooLarge { size: usize, max: usize },

    #[error("task not found: {task_id}")]
    TaskNotFound { task_id: TaskId },

    #[error("task already completed: {task_id}")]
    TaskAlreadyCompleted { task_id: TaskId },

    #[error("task expired: {task_id}, deadline {deadline}, now {now}")]
    TaskExpired {
        task_id: TaskId,
        deadline: Timestamp,
        now: Timestamp,
    },

    #[error("invalid response signature for task {task_id} from {worker}")]
    InvalidSignature { task_id: TaskId, worker: Identity },

    #[error("deferred under load: tier {tier}, load {load}")]
    Deferred { tier: u8, load: u64 },

    #[error("caller {caller} lacks capability {capability}")]
    Unauthorized {
        caller: Identity,
        capability: &'static str,
    },
}

impl EngineError {
    /// `Deferred` is load-shedding, not a defect: the caller is expected to
    /// retry later. Every other variant is caller misuse or a terminal state.
    pub fn is_retryable(&self) -> bool {
        matches!(self, EngineError::Deferred { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_deferred_is_retryable() {
        assert!(EngineError::Deferred { tier: 0, load: 500 }.is_retryable());
        assert!(!EngineError::TaskAlreadyCompleted { task_id: 1 }.is_retryable());
        assert!(!EngineError::BatchTooLarge { size: 30, max: 25 }.is_retryable());
    }
}
