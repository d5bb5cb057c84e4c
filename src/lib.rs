//! Lineage traversal engine over a labeled property graph enterprise
//! metamodel: edges are classified by axis (lineage, hierarchy,
//! association, governance) against a taxonomy, and a BFS engine walks
//! the graph subject to per-axis reachability and direction-commitment
//! rules.

pub mod collapser;
pub mod engine;
pub mod error;
pub mod governance;
pub mod graph_port;
pub mod loader;
pub mod memory_store;
pub mod model;
pub mod taxonomy;

pub use collapser::{CollapsedPath, HopCollapser, LogicalStep};
pub use engine::{
    CancellationToken, EngineConfig, OneHopQuery, OneHopResult, PathEdgeRecord, PathRecord,
    TraversalEngine, TraversalMetadata, TraversalRequest, TraversalResponse,
};
pub use error::{ConfigError, EngineError};
pub use governance::GovernanceOverlay;
pub use graph_port::{normalize_label, GraphPort, IncidentEdge};
pub use memory_store::MemoryGraph;
pub use model::{Axis, Edge, Node, NodeRole, SemanticDirection, SemanticUp};
pub use taxonomy::TaxonomyCatalogue;
