//! Shared primitive types for the Conclave oracle coordination engine.
//!
//! Kept free of engine logic so that both the engine and its collaborators
//! (signature verification, external callers) can depend on a stable,
//! serialization-friendly vocabulary.

pub mod digest;
pub mod keys;
pub mod node;

pub use digest::Digest16;
pub use keys::{Identity, Signature};
pub use node::NodeType;

/// Unix timestamp, seconds resolution.
pub type Timestamp = i64;

/// Monotonically increasing task identifier, 0-based.
pub type TaskId = u64;
