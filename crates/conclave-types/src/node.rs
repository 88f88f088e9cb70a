use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of off-chain work a registered worker node performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    /// Fetches and reports external data.
    Data,
    /// Attests to the validity of other nodes' reports.
    Attestation,
    /// Standby capacity, promoted when active pools run thin.
    Reserve,
}

impl NodeType {
    pub const ALL: [NodeType; 3] = [NodeType::Data, NodeType::Attestation, NodeType::Reserve];

    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Data => "data",
            NodeType::Attestation => "attestation",
            NodeType::Reserve => "reserve",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_tag() {
        let json = serde_json::to_string(&NodeType::Attestation).unwrap();
        assert_eq!(json, "\"attestation\"");
        let back: NodeType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, NodeType::Attestation);
    }
}
