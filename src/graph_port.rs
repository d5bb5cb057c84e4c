//! The minimal read-only interface the engine needs from a graph store
//! (spec §4.2). Decouples traversal logic from storage so a production
//! deployment can back it with whatever store it likes; this crate ships
//! `memory_store::MemoryGraph` as the reference implementation.

use crate::model::{Edge, Node};

/// An edge incident to some node, already oriented so the caller can tell
/// which side is the queried node without re-comparing ids.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentEdge {
    pub edge: Edge,
    /// `true` if the queried node is `edge.source` (an outgoing edge from
    /// its point of view), `false` if it is `edge.target`.
    pub is_outgoing: bool,
}

/// Read-only access to the underlying graph. All node types returned by
/// `fetch_node`/`fetch_incident` are expected to already be in canonical
/// lowercase form (§3); a port backed by a PascalCase-labelled store should
/// normalize at this boundary, see [`normalize_label`].
pub trait GraphPort {
    type Error: std::error::Error + Send + Sync + 'static;

    fn fetch_node(&self, id: &str) -> Result<Option<Node>, Self::Error>;

    /// All edges touching `id`, both directions, in no particular order.
    fn fetch_incident(&self, id: &str) -> Result<Vec<IncidentEdge>, Self::Error>;
}

/// Canonical PascalCase → lowercase_snake_case label table. Hard-coded per
/// the Open Question decision in SPEC_FULL.md §12 rather than promoted into
/// the taxonomy config.
const LABEL_TABLE: &[(&str, &str)] = &[
    ("ETLJob", "etl_job"),
    ("DataDependency", "data_dependency"),
    ("DataFlow", "data_flow"),
    ("ModelVersion", "model_version"),
    ("AgentVersion", "agent_version"),
    ("AgenticSystem", "agentic_system"),
    ("AgenticSystemVersion", "agentic_system_version"),
    ("MCPServer", "mcp_server"),
    ("MCPResource", "mcp_resource"),
    ("MCPTool", "mcp_tool"),
    ("WorkspaceService", "workspace_service"),
    ("UseCase", "use_case"),
    ("DataConcept", "data_concept"),
];

/// Normalize a node-type label to the engine's canonical lowercase form.
/// Labels already in canonical form (or not present in the table) are
/// lowercased as a fallback rather than rejected — unknown labels are not
/// an error anywhere in this system (§9).
pub fn normalize_label(label: &str) -> String {
    for (pascal, canonical) in LABEL_TABLE {
        if *pascal == label {
            return (*canonical).to_string();
        }
    }
    label.to_lowercase()
}
