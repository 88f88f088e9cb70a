//! Worker classification, load admission and task selection.
//!
//! Everything here is a pure function over worker state: selection never
//! mutates the registry, and two calls with the same inputs return the same
//! subset in the same order.

use crate::config::EngineConfig;
use crate::registry::Worker;
use conclave_types::{Identity, NodeType, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Priority classification of a worker. Checks run in a fixed order and the
/// first match wins: recency beats reputation beats experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Standard,
    RecentlyActive,
    Premium,
    Experienced,
    StaleCandidate,
}

impl Tier {
    /// Numeric rank as carried in events and error payloads.
    pub fn rank(&self) -> u8 {
        match self {
            Tier::Standard => 0,
            Tier::RecentlyActive => 1,
            Tier::Premium => 2,
            Tier::Experienced => 3,
            Tier::StaleCandidate => 4,
        }
    }

    /// Only recently-active and premium workers are eligible for selection.
    pub fn selectable(&self) -> bool {
        matches!(self, Tier::RecentlyActive | Tier::Premium)
    }
}

/// Classifies a worker from its activity, reputation and experience.
pub fn classify(
    config: &EngineConfig,
    last_active_time: Timestamp,
    completed_tasks: u32,
    reputation_tier: u8,
    now: Timestamp,
) -> Tier {
    if last_active_time > now - config.active_window_secs {
        Tier::RecentlyActive
    } else if reputation_tier >= config.premium_reputation {
        Tier::Premium
    } else if completed_tasks > config.experienced_tasks {
        Tier::Experienced
    } else if last_active_time < now - config.archive_threshold_secs {
        Tier::StaleCandidate
    } else {
        Tier::Standard
    }
}

/// Backpressure policy: under high load only standard-tier work is deferred;
/// every other tier always proceeds.
pub fn admit_under_load(config: &EngineConfig, load: u64, tier: Tier) -> bool {
    !(load > config.high_load_threshold && tier == Tier::Standard)
}

/// Scans `candidates` in index order and returns up to `max_selected` active
/// workers of `required_type` whose tier is selectable. Stable, deterministic
/// and read-only.
pub fn select_for_task(
    config: &EngineConfig,
    candidates: &[Identity],
    workers: &HashMap<Identity, Worker>,
    required_type: NodeType,
    max_selected: usize,
    now: Timestamp,
) -> Vec<Identity> {
    let mut selected = Vec::new();

    for candidate in candidates {
        if selected.len() >= max_selected {
            break;
        }

        let Some(worker) = workers.get(candidate) else {
            continue;
        };
        if !worker.is_active || worker.node_type != required_type {
            continue;
        }

        let tier = classify(
            config,
            worker.last_active_time,
            worker.completed_tasks,
            worker.reputation_tier,
            now,
        );
        if tier.selectable() {
            selected.push(*candidate);
        }
    }

    selected
}
