use conclave_types::{Identity, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// Capabilities checked at the engine facade. Components below the facade
/// never see caller identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Capability {
    /// Registry administration: batch registration; implies every other
    /// capability at the facade.
    Admin,
    /// Computation aggregation: task completion, computation record posting,
    /// reputation updates.
    Aggregator,
    /// Granted to a worker on registration for its node type.
    Oracle(NodeType),
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Admin => "admin",
            Capability::Aggregator => "aggregator",
            Capability::Oracle(NodeType::Data) => "oracle:data",
            Capability::Oracle(NodeType::Attestation) => "oracle:attestation",
            Capability::Oracle(NodeType::Reserve) => "oracle:reserve",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Injected authorization seam. The engine trusts caller identities and only
/// consults this table for capability membership; administration of the table
/// itself is an external concern.
pub trait CapabilityTable: Send + Sync {
    fn has(&self, who: &Identity, capability: Capability) -> bool;
    fn grant(&mut self, who: Identity, capability: Capability);
    fn revoke(&mut self, who: &Identity, capability: Capability);
}

/// Plain in-memory capability table.
#[derive(Debug, Default)]
pub struct InMemoryRoles {
    grants: HashMap<Identity, HashSet<Capability>>,
}

impl InMemoryRoles {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CapabilityTable for InMemoryRoles {
    fn has(&self, who: &Identity, capability: Capability) -> bool {
        self.grants
            .get(who)
            .map(|caps| caps.contains(&capability))
            .unwrap_or(false)
    }

    fn grant(&mut self, who: Identity, capability: Capability) {
        self.grants.entry(who).or_default().insert(capability);
    }

    fn revoke(&mut self, who: &Identity, capability: Capability) {
        if let Some(caps) = self.grants.get_mut(who) {
            caps.remove(&capability);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grant_and_revoke() {
        let mut roles = InMemoryRoles::new();
        let who = Identity::from_bytes([1u8; 32]);

        assert!(!roles.has(&who, Capability::Admin));
        roles.grant(who, Capability::Admin);
        assert!(roles.has(&who, Capability::Admin));
        assert!(!roles.has(&who, Capability::Aggregator));

        roles.revoke(&who, Capability::Admin);
        assert!(!roles.has(&who, Capability::Admin));
    }

    #[test]
    fn test_oracle_capability_is_type_specific() {
        let mut roles = InMemoryRoles::new();
        let who = Identity::from_bytes([2u8; 32]);

        roles.grant(who, Capability::Oracle(NodeType::Data));
        assert!(roles.has(&who, Capability::Oracle(NodeType::Data)));
        assert!(!roles.has(&who, Capability::Oracle(NodeType::Attestation)));
    }
}
