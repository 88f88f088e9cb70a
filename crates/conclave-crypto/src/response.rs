use conclave_types::{Identity, Signature, TaskId};
use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

/// Domain-separation tag mixed into every response digest so a signature over
/// a task response can never be replayed in another signing context.
pub const RESPONSE_DOMAIN_TAG: &[u8] = b"conclave.task-response.v1";

/// Canonical digest of a worker response: BLAKE3 over
/// `tag || task_id (big-endian u64) || payload`.
pub fn response_digest(task_id: TaskId, payload: &[u8]) -> [u8; 32] {
    let mut hasher = blake3::Hasher::new();
    hasher.update(RESPONSE_DOMAIN_TAG);
    hasher.update(&task_id.to_be_bytes());
    hasher.update(payload);
    *hasher.finalize().as_bytes()
}

/// Checks that a response signature was produced by the claimed worker
/// identity. The engine computes the digest; implementations only decide
/// whether `signature` binds `claimed` to it.
pub trait ResponseVerifier: Send + Sync {
    fn verify(&self, claimed: &Identity, digest: &[u8; 32], signature: &Signature) -> bool;
}

/// Ed25519 verifier: the worker identity bytes are the verifying key.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl ResponseVerifier for Ed25519Verifier {
    fn verify(&self, claimed: &Identity, digest: &[u8; 32], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(claimed.as_bytes()) else {
            return false;
        };

        let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());

        verifying_key.verify(digest, &sig).is_ok()
    }
}

/// Worker-side signer over response digests.
pub struct ResponseSigner {
    signing_key: SigningKey,
    identity: Identity,
}

impl ResponseSigner {
    /// Create a signer from a fixed seed.
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        let signing_key = SigningKey::from_bytes(seed);
        let identity = Identity::from_bytes(signing_key.verifying_key().to_bytes());

        Self {
            signing_key,
            identity,
        }
    }

    /// Generate a signer with a random key.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        let identity = Identity::from_bytes(signing_key.verifying_key().to_bytes());

        Self {
            signing_key,
            identity,
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Sign the canonical digest of `(task_id, payload)`.
    pub fn sign_response(&self, task_id: TaskId, payload: &[u8]) -> Signature {
        let digest = response_digest(task_id, payload);
        let sig = self.signing_key.sign(&digest);
        Signature::from_bytes(sig.to_bytes())
    }
}
