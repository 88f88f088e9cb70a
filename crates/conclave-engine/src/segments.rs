//! Rolling time-window bookkeeping.
//!
//! Activity counters live in contiguous temporal segments so that queries and
//! lifecycle operations never scan unbounded history. Exactly one segment is
//! active at any time; rollover happens lazily, the first time an operation
//! observes the clock past the active window's end.

use crate::config::EngineConfig;
use conclave_types::Timestamp;
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalSegment {
    pub id: u32,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub active_tasks: u64,
    pub completed_tasks: u64,
    pub active_workers: u64,
    pub active: bool,
}

/// Data from one rollover, returned so the facade can emit events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolloverReport {
    pub closed_segment: u32,
    pub opened_segment: u32,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub active_workers: u64,
    pub savings_micros: u64,
    pub total_savings_micros: u64,
}

#[derive(Debug)]
pub struct SegmentManager {
    segments: Vec<TemporalSegment>,
    window: Timestamp,
    savings_per_task_micros: u64,
    total_savings_micros: u64,
}

impl SegmentManager {
    /// Opens segment 1 spanning `[genesis, genesis + window)`.
    pub fn new(config: &EngineConfig, genesis: Timestamp) -> Self {
        let first = TemporalSegment {
            id: 1,
            start_time: genesis,
            end_time: genesis + config.segment_window_secs - 1,
            active_tasks: 0,
            completed_tasks: 0,
            active_workers: 0,
            active: true,
        };

        Self {
            segments: vec![first],
            window: config.segment_window_secs,
            savings_per_task_micros: config.savings_per_task_micros,
            total_savings_micros: 0,
        }
    }

    /// Rolls the active segment forward until it covers `now`. No-op while
    /// `now` is inside the active window. A long quiet gap produces one
    /// report per skipped window so contiguity always holds.
    ///
    /// `live_workers` seeds each opened segment's worker counter with the
    /// current live registry size.
    pub fn advance(&mut self, now: Timestamp, live_workers: u64) -> Vec<RolloverReport> {
        let mut reports = Vec::new();

        while now > self.current().end_time {
            let closed = {
                let seg = self.current_mut();
                seg.active = false;
                seg.clone()
            };

            let savings = closed
                .active_tasks
                .saturating_mul(self.savings_per_task_micros);
            self.total_savings_micros = self.total_savings_micros.saturating_add(savings);

            let opened = TemporalSegment {
                id: closed.id + 1,
                start_time: closed.end_time + 1,
                end_time: closed.end_time + self.window,
                active_tasks: 0,
                completed_tasks: 0,
                active_workers: live_workers,
                active: true,
            };

            info!(
                closed = closed.id,
                opened = opened.id,
                start = opened.start_time,
                end = opened.end_time,
                live_workers,
                "🕰️ Segment rollover"
            );

            reports.push(RolloverReport {
                closed_segment: closed.id,
                opened_segment: opened.id,
                start_time: opened.start_time,
                end_time: opened.end_time,
                active_workers: live_workers,
                savings_micros: savings,
                total_savings_micros: self.total_savings_micros,
            });

            self.segments.push(opened);
        }

        reports
    }

    pub fn current(&self) -> &TemporalSegment {
        self.segments.last().expect("segment 1 exists from init")
    }

    fn current_mut(&mut self) -> &mut TemporalSegment {
        self.segments.last_mut().expect("segment 1 exists from init")
    }

    /// Segment lookup by id (1-based).
    pub fn get(&self, id: u32) -> Option<&TemporalSegment> {
        if id == 0 {
            return None;
        }
        self.segments.get(id as usize - 1)
    }

    pub fn record_task_created(&mut self) {
        let seg = self.current_mut();
        seg.active_tasks = seg.active_tasks.saturating_add(1);
    }

    pub fn record_task_completed(&mut self) {
        let seg = self.current_mut();
        seg.completed_tasks = seg.completed_tasks.saturating_add(1);
    }

    pub fn record_worker_joined(&mut self) {
        let seg = self.current_mut();
        seg.active_workers = seg.active_workers.saturating_add(1);
    }

    pub fn record_worker_left(&mut self) {
        let seg = self.current_mut();
        seg.active_workers = seg.active_workers.saturating_sub(1);
    }

    /// Tasks created but not yet completed in the active window; the load
    /// metric for response admission.
    pub fn pending_load(&self) -> u64 {
        let seg = self.current();
        seg.active_tasks.saturating_sub(seg.completed_tasks)
    }

    pub fn total_savings_micros(&self) -> u64 {
        self.total_savings_micros
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }
}
