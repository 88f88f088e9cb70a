//! Response-signature primitives for the Conclave coordination engine.
//!
//! Worker nodes sign a domain-separated digest of `(task_id, payload)` with
//! their Ed25519 identity key. The engine only needs the [`ResponseVerifier`]
//! seam; [`ResponseSigner`] is the worker-side counterpart, also used to
//! produce valid signatures in tests.

pub mod response;

pub use response::{
    response_digest, Ed25519Verifier, ResponseSigner, ResponseVerifier, RESPONSE_DOMAIN_TAG,
};
