//! Off-chain computation result records.
//!
//! A record is a summary: the workers a computation used, a clamped snapshot
//! of their reputations at posting time, and the proof digests. Posting is
//! last-write-wins; records are read-only afterwards.

use crate::error::{EngineError, Result};
use conclave_types::{Digest16, Identity, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationRecord {
    pub selected_workers: Vec<Identity>,
    /// One clamped score per selected worker. Lossy by design: this is a
    /// snapshot summary, not authoritative reputation.
    pub reputation_snapshot: Vec<u8>,
    pub qos_proof_digest: Digest16,
    pub security_proof_digest: Digest16,
    pub timestamp: Timestamp,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    records: HashMap<Digest16, ComputationRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores (or overwrites) the record at `computation_id`.
    pub fn post(
        &mut self,
        computation_id: Digest16,
        selected_workers: Vec<Identity>,
        reputation_scores: &[u16],
        qos_proof_digest: Digest16,
        security_proof_digest: Digest16,
        now: Timestamp,
    ) -> Result<()> {
        if selected_workers.len() != reputation_scores.len() {
            return Err(EngineError::LengthMismatch {
                left: selected_workers.len(),
                right: reputation_scores.len(),
            });
        }

        let reputation_snapshot = reputation_scores
            .iter()
            .map(|&s| s.min(u8::MAX as u16) as u8)
            .collect();

        self.records.insert(
            computation_id,
            ComputationRecord {
                selected_workers,
                reputation_snapshot,
                qos_proof_digest,
                security_proof_digest,
                timestamp: now,
            },
        );

        Ok(())
    }

    pub fn get(&self, computation_id: &Digest16) -> Option<&ComputationRecord> {
        self.records.get(computation_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(byte: u8) -> Identity {
        Identity::from_bytes([byte; 32])
    }

    #[test]
    fn test_length_mismatch_rejected_before_write() {
        let mut store = RecordStore::new();
        let key = Digest16::of(b"comp");
        let err = store
            .post(
                key,
                vec![id(1), id(2)],
                &[100],
                Digest16::of(b"qos"),
                Digest16::of(b"sec"),
                1_000,
            )
            .unwrap_err();
        assert!(matches!(
            err,
            EngineError::LengthMismatch { left: 2, right: 1 }
        ));
        assert!(store.get(&key).is_none());
    }

    #[test]
    fn test_snapshot_scores_are_clamped() {
        let mut store = RecordStore::new();
        let key = Digest16::of(b"comp");
        store
            .post(
                key,
                vec![id(1), id(2)],
                &[1_000, 42],
                Digest16::of(b"qos"),
                Digest16::of(b"sec"),
                1_000,
            )
            .unwrap();
        assert_eq!(store.get(&key).unwrap().reputation_snapshot, vec![255, 42]);
    }

    #[test]
    fn test_repost_overwrites() {
        let mut store = RecordStore::new();
        let key = Digest16::of(b"comp");
        store
            .post(key, vec![id(1)], &[10], Digest16::of(b"q1"), Digest16::of(b"s1"), 1_000)
            .unwrap();
        store
            .post(key, vec![id(2)], &[20], Digest16::of(b"q2"), Digest16::of(b"s2"), 2_000)
            .unwrap();

        let record = store.get(&key).unwrap();
        assert_eq!(record.selected_workers, vec![id(2)]);
        assert_eq!(record.timestamp, 2_000);
        assert_eq!(store.len(), 1);
    }
}
