//! Governance overlay: a flat, non-transitive, one-hop enrichment query
//! over G-axis edges. Never folded into BFS — described in spec §9 Design
//! Notes as a post-processing step, not a traversal axis.

use std::collections::HashMap;

use crate::error::EngineError;
use crate::graph_port::GraphPort;
use crate::model::{Edge, Node};
use crate::taxonomy::TaxonomyCatalogue;

pub struct GovernanceOverlay<'a, P: GraphPort> {
    port: &'a P,
    taxonomy: &'a TaxonomyCatalogue,
}

impl<'a, P: GraphPort> GovernanceOverlay<'a, P> {
    pub fn new(port: &'a P, taxonomy: &'a TaxonomyCatalogue) -> Self {
        Self { port, taxonomy }
    }

    /// For each given node, fetch its incident G-axis edges and return them
    /// grouped by node id. Nodes with no governance edges are omitted.
    pub fn enrich(&self, nodes: &[Node]) -> Result<HashMap<String, Vec<Edge>>, EngineError> {
        let g_edge_names = self.taxonomy.g_edge_names();
        if g_edge_names.is_empty() {
            return Ok(HashMap::new());
        }

        let mut out = HashMap::new();
        for node in nodes {
            let incident = self
                .port
                .fetch_incident(&node.id)
                .map_err(|e| EngineError::PortUnavailable(e.to_string()))?;

            let g_edges: Vec<Edge> = incident
                .into_iter()
                .map(|inc| inc.edge)
                .filter(|edge| g_edge_names.contains(&edge.edge_type.to_uppercase()))
                .collect();

            if !g_edges.is_empty() {
                out.insert(node.id.clone(), g_edges);
            }
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory_store::MemoryGraph;

    const TAXONOMY: &str = r#"
node_types:
  dataset:
    role: resource

g_governance:
  - edge_name: GOVERNED_BY
    source: dataset
    destination: policy
    description: governance link
"#;

    #[test]
    fn enrich_returns_only_g_edges() {
        let taxonomy = TaxonomyCatalogue::from_yaml_str(TAXONOMY).unwrap();
        let mut graph = MemoryGraph::new();
        graph.insert_node(Node::new("ds-001", "dataset"));
        graph.insert_node(Node::new("pol-001", "policy"));
        graph.insert_edge(Edge {
            edge_type: "GOVERNED_BY".into(),
            source: "ds-001".into(),
            target: "pol-001".into(),
            properties: Default::default(),
        });

        let overlay = GovernanceOverlay::new(&graph, &taxonomy);
        let nodes = vec![Node::new("ds-001", "dataset")];
        let result = overlay.enrich(&nodes).unwrap();
        assert_eq!(result.get("ds-001").map(|v| v.len()), Some(1));
    }

    #[test]
    fn enrich_is_empty_when_taxonomy_has_no_g_edges() {
        let taxonomy = TaxonomyCatalogue::from_yaml_str(
            r#"
node_types:
  dataset:
    role: resource
"#,
        )
        .unwrap();
        let graph = MemoryGraph::new();
        let overlay = GovernanceOverlay::new(&graph, &taxonomy);
        let nodes = vec![Node::new("ds-001", "dataset")];
        assert!(overlay.enrich(&nodes).unwrap().is_empty());
    }
}
