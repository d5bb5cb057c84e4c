//! Hop collapsing: folds `resource → transformer → resource` X-axis dyads
//! sharing a `hop_group` into single logical lineage steps (spec §4.4).
//!
//! Grounded in `examples/original_source/src/traversal/hop_collapsing.py`'s
//! `HopCollapser` — `_build_logical_steps`/`_is_hop_pattern`/
//! `_find_completing_edge` are carried over directly.

use std::collections::HashMap;
use std::sync::Arc;

use crate::engine::{PathEdgeRecord, PathRecord};
use crate::model::{Axis, Node, NodeRole};
use crate::taxonomy::TaxonomyCatalogue;

/// One logical step in a collapsed path: either a simple edge, or a
/// resource→transformer→resource dyad collapsed via `via`.
#[derive(Debug, Clone)]
pub struct LogicalStep {
    pub from: Node,
    pub to: Node,
    pub via: Option<Node>,
    pub hop_group: Option<String>,
    pub edge_names: Vec<String>,
}

#[derive(Debug, Clone)]
pub enum CollapsedPath {
    /// Non-X-axis paths pass through unmodified (spec §4.4).
    Passthrough(PathRecord),
    Collapsed {
        axis: Axis,
        z_hops: usize,
        logical_steps: Vec<LogicalStep>,
        original_path: Vec<String>,
        original_edges: Vec<PathEdgeRecord>,
    },
}

pub struct HopCollapser {
    taxonomy: Arc<TaxonomyCatalogue>,
}

impl HopCollapser {
    pub fn new(taxonomy: Arc<TaxonomyCatalogue>) -> Self {
        Self { taxonomy }
    }

    pub fn collapse_paths(&self, paths: &[PathRecord], nodes: &[Node]) -> Vec<CollapsedPath> {
        let node_lookup: HashMap<&str, &Node> =
            nodes.iter().map(|n| (n.id.as_str(), n)).collect();

        paths
            .iter()
            .map(|path| {
                if path.axis != Axis::X {
                    return CollapsedPath::Passthrough(path.clone());
                }

                let logical_steps = self.build_logical_steps(&path.edges, &node_lookup);

                CollapsedPath::Collapsed {
                    axis: path.axis,
                    z_hops: path.z_hops,
                    logical_steps,
                    original_path: path.path.clone(),
                    original_edges: path.edges.clone(),
                }
            })
            .collect()
    }

    fn build_logical_steps(
        &self,
        path_edges: &[PathEdgeRecord],
        node_lookup: &HashMap<&str, &Node>,
    ) -> Vec<LogicalStep> {
        let mut steps = Vec::new();
        let mut i = 0;

        while i < path_edges.len() {
            let edge_info = &path_edges[i];
            let source_id = edge_info.edge.source.as_str();
            let target_id = edge_info.edge.target.as_str();

            let (Some(source_node), Some(target_node)) =
                (node_lookup.get(source_id), node_lookup.get(target_id))
            else {
                i += 1;
                continue;
            };

            let source_role = self.taxonomy.node_role(&source_node.node_type);
            let target_role = self.taxonomy.node_role(&target_node.node_type);

            if is_hop_pattern(source_role, target_role, edge_info) {
                if let Some(completing) =
                    self.find_completing_edge(target_id, edge_info, &path_edges[i + 1..], node_lookup)
                {
                    steps.push(LogicalStep {
                        from: (*source_node).clone(),
                        to: completing.dest_node.clone(),
                        via: Some((*target_node).clone()),
                        hop_group: edge_info.hop_group.clone(),
                        edge_names: vec![
                            edge_info.edge.edge_type.clone(),
                            completing.edge_type.clone(),
                        ],
                    });
                    i += 2;
                    continue;
                }

                steps.push(LogicalStep {
                    from: (*source_node).clone(),
                    to: (*target_node).clone(),
                    via: None,
                    hop_group: edge_info.hop_group.clone(),
                    edge_names: vec![edge_info.edge.edge_type.clone()],
                });
                i += 1;
                continue;
            }

            steps.push(LogicalStep {
                from: (*source_node).clone(),
                to: (*target_node).clone(),
                via: None,
                hop_group: edge_info.hop_group.clone(),
                edge_names: vec![edge_info.edge.edge_type.clone()],
            });
            i += 1;
        }

        steps
    }

    fn find_completing_edge(
        &self,
        transformer_node_id: &str,
        first_edge: &PathEdgeRecord,
        rest: &[PathEdgeRecord],
        node_lookup: &HashMap<&str, &Node>,
    ) -> Option<CompletingEdge> {
        let next_edge = rest.first()?;

        if next_edge.edge.source != transformer_node_id {
            return None;
        }
        if next_edge.hop_group != first_edge.hop_group {
            return None;
        }

        let dest_node = node_lookup.get(next_edge.edge.target.as_str())?;
        let dest_role = self.taxonomy.node_role(&dest_node.node_type);
        if dest_role != NodeRole::Resource {
            return None;
        }

        Some(CompletingEdge {
            edge_type: next_edge.edge.edge_type.clone(),
            dest_node: (*dest_node).clone(),
        })
    }
}

struct CompletingEdge {
    edge_type: String,
    dest_node: Node,
}

fn is_hop_pattern(source_role: NodeRole, target_role: NodeRole, edge_info: &PathEdgeRecord) -> bool {
    if edge_info.hop_group.is_none() {
        return false;
    }
    matches!(
        (source_role, target_role),
        (NodeRole::Resource, NodeRole::Transformer) | (NodeRole::Transformer, NodeRole::Resource)
    )
}
