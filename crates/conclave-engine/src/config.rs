use conclave_types::Timestamp;

/// Tunable constants for the coordination engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Length of one temporal segment in seconds.
    pub segment_window_secs: Timestamp,
    /// Recency horizon for tier-1 classification.
    pub active_window_secs: Timestamp,
    /// Idle horizon past which a worker becomes a stale candidate.
    pub archive_threshold_secs: Timestamp,
    /// Pending-task count above which standard-tier responses are deferred.
    pub high_load_threshold: u64,
    /// Upper bound on workers selected per task.
    pub max_selected_workers: usize,
    /// Upper bound on entries per batch registration.
    pub max_batch_registrations: usize,
    /// Reputation assigned to freshly registered workers.
    pub baseline_reputation: u8,
    /// Reputation at or above which a worker classifies as premium.
    pub premium_reputation: u8,
    /// Completed-task count above which a worker classifies as experienced.
    pub experienced_tasks: u32,
    /// Estimated per-task bookkeeping saving attributed to segmentation,
    /// accumulated (saturating) at each rollover. Micro-units of gas cost.
    pub savings_per_task_micros: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            segment_window_secs: 86_400,        // 1 day
            active_window_secs: 86_400,         // 1 day
            archive_threshold_secs: 2_592_000,  // 30 days
            high_load_threshold: 100,
            max_selected_workers: 10,
            max_batch_registrations: 25,
            baseline_reputation: 100,
            premium_reputation: 200,
            experienced_tasks: 1_000,
            savings_per_task_micros: 1_200,
        }
    }
}
