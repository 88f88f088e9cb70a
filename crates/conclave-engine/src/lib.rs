/*!
# Conclave Coordination Engine

Coordinates a pool of independent oracle worker nodes performing off-chain
computation on behalf of requesters: registration and reputation tracking,
rolling time-window bookkeeping, task lifecycle, and bounded worker selection.

## Design Principles

- **Externally serialized**: calls are applied one at a time in an
  externally-imposed total order; there is no interior locking and no
  suspension point inside a call. A concurrent host must wrap the engine in
  its own serialization (one mutex, or an actor draining a queue).
- **Fail before mutate**: every failure condition is checked before any
  domain state changes, so a failed call leaves no partial write.
- **Segments bound bookkeeping**: activity counters live in contiguous
  temporal segments that roll lazily with the clock, so no operation ever
  scans unbounded history.
- **One event per mutation**: each state-changing operation appends exactly
  one domain event to the in-order event log, the sole mechanism for
  observers to reconstruct history.

## Module Structure

- **engine**: the `CoordinationEngine` facade composing everything below
- **registry**: worker records, per-type active indices, reputation
- **segments**: temporal segment rollover and per-window counters
- **selection**: pure tier classification, load admission, task selection
- **ledger**: task records and lifecycle validation
- **records**: off-chain computation summary records
- **events**: domain event types and the append-only log
- **auth**: capability table seam checked at the facade
- **clock**: injected time source (system / manual)
- **error**: engine error taxonomy

## Collaborators

The engine trusts already-authenticated caller identities and delegates
response-signature verification to `conclave-crypto`. Persistence, economic
settlement and transport are external concerns.
*/

pub mod auth;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod ledger;
pub mod records;
pub mod registry;
pub mod segments;
pub mod selection;

pub use auth::{Capability, CapabilityTable, InMemoryRoles};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::EngineConfig;
pub use engine::CoordinationEngine;
pub use error::{EngineError, Result};
pub use events::{CoordinationEvent, EventLog};
pub use ledger::{Task, TaskLedger};
pub use records::{ComputationRecord, RecordStore};
pub use registry::{Worker, WorkerRegistry};
pub use segments::{RolloverReport, SegmentManager, TemporalSegment};
pub use selection::{admit_under_load, classify, select_for_task, Tier};
