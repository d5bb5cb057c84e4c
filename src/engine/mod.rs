//! The traversal engine: BFS with per-path state tracking enforcing the
//! Z-reachability and Y-commitment rules of spec §4.3.
//!
//! Grounded in `examples/original_source/src/traversal/engine.py`'s
//! `TraversalEngine.traverse`/`_get_neighbors`/`_should_traverse_edge` —
//! the constraint logic is carried over field-for-field; only the shape
//! changes (a Neo4j session becomes a `GraphPort`, dataclasses become
//! structs, a `deque` becomes a `VecDeque`).

mod one_hop;

pub use one_hop::{OneHopQuery, OneHopResult};

use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use crate::graph_port::GraphPort;
use crate::model::{
    Axis, Edge, EdgeKey, Node, SemanticDirection, XDirectionFilter, YDirection, YDirectionFilter,
    ZDirectionFilter,
};
use crate::taxonomy::{EdgeClassification, TaxonomyCatalogue};

/// Engine construction-time tunables. The node cap is deliberately not a
/// per-request field — §6's wire schema for `TraversalRequest` doesn't list
/// it, and it is a deployment concern rather than a query parameter.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfig {
    pub node_cap: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { node_cap: 10_000 }
    }
}

/// Thin cooperative-cancellation flag, checked at queue-pop and at each
/// graph-port call boundary (§5). Cloning shares the same underlying flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Axis/direction parameters for a `traverse` call (spec §6).
#[derive(Debug, Clone)]
pub struct TraversalRequest {
    pub start_node_id: String,
    pub axes: Vec<Axis>,
    pub x_direction: XDirectionFilter,
    pub y_direction: YDirectionFilter,
    pub z_direction: ZDirectionFilter,
    pub max_z_hops: usize,
    pub max_depth: Option<usize>,
    pub include_transformers: bool,
}

impl TraversalRequest {
    pub fn new(start_node_id: impl Into<String>) -> Self {
        Self {
            start_node_id: start_node_id.into(),
            ..Self::default()
        }
    }
}

impl Default for TraversalRequest {
    fn default() -> Self {
        Self {
            start_node_id: String::new(),
            axes: vec![Axis::X, Axis::Y, Axis::Z],
            x_direction: XDirectionFilter::Both,
            y_direction: YDirectionFilter::Both,
            z_direction: ZDirectionFilter::Both,
            max_z_hops: 1,
            max_depth: None,
            include_transformers: true,
        }
    }
}

/// A single edge within a recorded path. Carries the full `classification`
/// per §6's wire schema (`{edge, axis, classification}`), plus `hop_group`/
/// `hop_role` pulled out as their own fields for the hop collapser's
/// convenience.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PathEdgeRecord {
    pub edge: Edge,
    pub axis: Axis,
    pub hop_group: Option<String>,
    pub hop_role: Option<String>,
    pub classification: EdgeClassification,
}

/// One discovered path, recorded the moment its final edge is admitted.
#[derive(Debug, Clone, serde::Serialize)]
pub struct PathRecord {
    pub path: Vec<String>,
    pub edges: Vec<PathEdgeRecord>,
    pub axis: Axis,
    pub z_hops: usize,
}

#[derive(Debug, Clone, Copy, Default, serde::Serialize)]
pub struct TraversalMetadata {
    pub total_nodes_visited: usize,
    pub total_edges_traversed: usize,
    pub total_paths: usize,
    pub max_z_hops: usize,
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct TraversalResponse {
    pub start_node: Node,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    pub paths: Vec<PathRecord>,
    pub metadata: TraversalMetadata,
}

/// A neighbor admitted past the axis/direction/Z-reachability/Y-commitment
/// checks, ready to extend a path.
struct NeighborInfo {
    node: Node,
    edge: Edge,
    axis: Axis,
    hop_group: Option<String>,
    hop_role: Option<String>,
    classification: EdgeClassification,
    x_direction: Option<SemanticDirection>,
    y_direction: Option<YDirection>,
}

/// Per-path BFS state. `y_direction_committed`/`has_gone_upstream`/
/// `has_gone_to_parent` are exactly the three fields spec §4.3.6/§4.3.5
/// describe as needing to survive across the whole path, not just one hop.
#[derive(Debug, Clone)]
struct PathState {
    node_id: String,
    node_type: String,
    node_sub_type: Option<String>,
    path: Vec<String>,
    z_hops_taken: usize,
    depth: usize,
    path_edges: Vec<PathEdgeRecord>,
    y_direction_committed: Option<YDirection>,
    has_gone_upstream: bool,
    has_gone_to_parent: bool,
}

type StateKey = (String, usize, Option<Axis>, Option<YDirection>, bool, bool);

pub struct TraversalEngine<P: GraphPort> {
    port: P,
    taxonomy: Arc<TaxonomyCatalogue>,
    config: EngineConfig,
}

impl<P: GraphPort> TraversalEngine<P> {
    pub fn new(port: P, taxonomy: Arc<TaxonomyCatalogue>, config: EngineConfig) -> Self {
        Self {
            port,
            taxonomy,
            config,
        }
    }

    fn fetch_node(&self, id: &str) -> EngineResult<Node> {
        self.port
            .fetch_node(id)
            .map_err(|e| EngineError::PortUnavailable(e.to_string()))?
            .ok_or_else(|| EngineError::NodeNotFound(id.to_string()))
    }

    /// Core neighbor-discovery step shared by `traverse` and `one_hop`,
    /// grounded in `_get_neighbors`/`_should_traverse_edge`.
    #[allow(clippy::too_many_arguments)]
    fn neighbors(
        &self,
        node_id: &str,
        node_type: &str,
        node_sub_type: Option<&str>,
        axes: &[Axis],
        x_direction: XDirectionFilter,
        y_direction: YDirectionFilter,
        z_direction: ZDirectionFilter,
        current_z_hops: usize,
        max_z_hops: usize,
        y_direction_committed: Option<YDirection>,
        has_gone_upstream: bool,
        has_gone_to_parent: bool,
    ) -> EngineResult<Vec<NeighborInfo>> {
        let incident = self
            .port
            .fetch_incident(node_id)
            .map_err(|e| EngineError::PortUnavailable(e.to_string()))?;

        let mut out = Vec::new();

        for inc in incident {
            let is_outgoing = inc.is_outgoing;
            let other_id = if is_outgoing {
                &inc.edge.target
            } else {
                &inc.edge.source
            };

            let other_node = match self.port.fetch_node(other_id) {
                Ok(Some(n)) => n,
                Ok(None) => {
                    warn!(node_id = %other_id, "edge endpoint not found, skipping");
                    continue;
                }
                Err(e) => return Err(EngineError::PortUnavailable(e.to_string())),
            };

            let (source_type, dest_type, source_sub_type, dest_sub_type) = if is_outgoing {
                (
                    node_type,
                    other_node.node_type.as_str(),
                    node_sub_type,
                    other_node.sub_type.as_deref(),
                )
            } else {
                (
                    other_node.node_type.as_str(),
                    node_type,
                    other_node.sub_type.as_deref(),
                    node_sub_type,
                )
            };

            let classification = match self.taxonomy.classify(
                &inc.edge.edge_type,
                source_type,
                dest_type,
                source_sub_type,
                dest_sub_type,
            ) {
                Some(c) => c,
                None => {
                    debug!(edge_type = %inc.edge.edge_type, "edge not classified, skipping");
                    continue;
                }
            };

            if !axes.contains(&classification.axis) {
                continue;
            }

            if classification.axis == Axis::Z {
                if current_z_hops >= max_z_hops {
                    debug!("z-hop rejected: path has reached its z-hop ceiling");
                    continue;
                }
                if has_gone_upstream {
                    debug!("z-hop rejected: path has gone upstream");
                    continue;
                }
                if has_gone_to_parent {
                    debug!("z-hop rejected: path has gone to a parent via y-axis");
                    continue;
                }
            }

            let actual_x_direction = x_direction_of(classification, is_outgoing);
            let actual_y_direction = y_direction_of(classification, is_outgoing);

            if !should_traverse(
                classification.axis,
                actual_x_direction,
                actual_y_direction,
                is_outgoing,
                x_direction,
                y_direction,
                z_direction,
            ) {
                continue;
            }

            if classification.axis == Axis::Y {
                if let Some(committed) = y_direction_committed {
                    if actual_y_direction != Some(committed) {
                        debug!("y-step rejected: would reverse committed y-direction");
                        continue;
                    }
                }
            }

            let neighbor_node = other_node;

            out.push(NeighborInfo {
                node: neighbor_node,
                edge: inc.edge,
                axis: classification.axis,
                hop_group: classification.hop_group.clone(),
                hop_role: classification.hop_role.clone(),
                classification: classification.clone(),
                x_direction: actual_x_direction,
                y_direction: actual_y_direction,
            });
        }

        Ok(out)
    }

    /// Full multi-axis BFS from a start node, per spec §4.3.
    pub fn traverse(
        &self,
        req: &TraversalRequest,
        cancel: &CancellationToken,
    ) -> EngineResult<TraversalResponse> {
        info!(start_node = %req.start_node_id, axes = ?req.axes, "traverse start");

        let start_node = self.fetch_node(&req.start_node_id)?;

        if let Some(sub_type) = &start_node.sub_type {
            let declared = self.taxonomy.declared_sub_types(&start_node.node_type);
            if !declared.is_empty() && !declared.iter().any(|d| d == sub_type) {
                warn!(
                    node_id = %start_node.id,
                    node_type = %start_node.node_type,
                    sub_type = %sub_type,
                    "start node sub_type not declared in taxonomy"
                );
            }
        }

        let mut visited_nodes: HashMap<String, Node> = HashMap::new();
        let mut visited_edges: HashMap<EdgeKey, Edge> = HashMap::new();
        let mut paths: Vec<PathRecord> = Vec::new();

        visited_nodes.insert(start_node.id.clone(), start_node.clone());

        let mut queue: VecDeque<PathState> = VecDeque::new();
        queue.push_back(PathState {
            node_id: start_node.id.clone(),
            node_type: start_node.node_type.clone(),
            node_sub_type: start_node.sub_type.clone(),
            path: vec![start_node.id.clone()],
            z_hops_taken: 0,
            depth: 0,
            path_edges: Vec::new(),
            y_direction_committed: None,
            has_gone_upstream: false,
            has_gone_to_parent: false,
        });

        let mut visited_states: HashSet<StateKey> = HashSet::new();
        visited_states.insert((start_node.id.clone(), 0, None, None, false, false));

        while let Some(current) = queue.pop_front() {
            if cancel.is_cancelled() {
                warn!("traverse cancelled mid-flight");
                return Err(EngineError::Cancelled);
            }

            if let Some(max_depth) = req.max_depth {
                if current.depth >= max_depth {
                    continue;
                }
            }

            let neighbors = self.neighbors(
                &current.node_id,
                &current.node_type,
                current.node_sub_type.as_deref(),
                &req.axes,
                req.x_direction,
                req.y_direction,
                req.z_direction,
                current.z_hops_taken,
                req.max_z_hops,
                current.y_direction_committed,
                current.has_gone_upstream,
                current.has_gone_to_parent,
            )?;

            for n in neighbors {
                let neighbor_id = n.node.id.clone();

                let new_z_hops = if n.axis == Axis::Z {
                    current.z_hops_taken + 1
                } else {
                    current.z_hops_taken
                };

                let new_y_direction_committed = if n.axis == Axis::Y && current.y_direction_committed.is_none() {
                    n.y_direction
                } else {
                    current.y_direction_committed
                };

                let new_has_gone_upstream = current.has_gone_upstream
                    || (n.axis == Axis::X && n.x_direction == Some(SemanticDirection::Upstream));

                let new_has_gone_to_parent = current.has_gone_to_parent
                    || (n.axis == Axis::Y && n.y_direction == Some(YDirection::Up));

                let state_key: StateKey = (
                    neighbor_id.clone(),
                    new_z_hops,
                    Some(n.axis),
                    new_y_direction_committed,
                    new_has_gone_upstream,
                    new_has_gone_to_parent,
                );

                if visited_states.contains(&state_key) {
                    continue;
                }
                visited_states.insert(state_key);

                if !visited_nodes.contains_key(&neighbor_id) {
                    if visited_nodes.len() >= self.config.node_cap {
                        warn!(cap = self.config.node_cap, "node cap exceeded during traverse");
                        return Err(EngineError::ResourceExceeded {
                            cap: self.config.node_cap,
                        });
                    }
                    visited_nodes.insert(neighbor_id.clone(), n.node.clone());
                }

                let edge_key = n.edge.key();
                visited_edges.entry(edge_key).or_insert_with(|| n.edge.clone());

                let mut new_path = current.path.clone();
                new_path.push(neighbor_id.clone());

                let mut new_path_edges = current.path_edges.clone();
                new_path_edges.push(PathEdgeRecord {
                    edge: n.edge.clone(),
                    axis: n.axis,
                    hop_group: n.hop_group.clone(),
                    hop_role: n.hop_role.clone(),
                    classification: n.classification.clone(),
                });

                paths.push(PathRecord {
                    path: new_path.clone(),
                    edges: new_path_edges.clone(),
                    axis: n.axis,
                    z_hops: new_z_hops,
                });

                queue.push_back(PathState {
                    node_id: neighbor_id,
                    node_type: n.node.node_type.clone(),
                    node_sub_type: n.node.sub_type.clone(),
                    path: new_path,
                    z_hops_taken: new_z_hops,
                    depth: current.depth + 1,
                    path_edges: new_path_edges,
                    y_direction_committed: new_y_direction_committed,
                    has_gone_upstream: new_has_gone_upstream,
                    has_gone_to_parent: new_has_gone_to_parent,
                });
            }
        }

        let metadata = TraversalMetadata {
            total_nodes_visited: visited_nodes.len(),
            total_edges_traversed: visited_edges.len(),
            total_paths: paths.len(),
            max_z_hops: req.max_z_hops,
        };

        info!(
            nodes = metadata.total_nodes_visited,
            edges = metadata.total_edges_traversed,
            paths = metadata.total_paths,
            "traverse end"
        );

        let mut nodes: Vec<Node> = visited_nodes.into_values().collect();
        let mut edges: Vec<Edge> = visited_edges.into_values().collect();

        if !req.include_transformers {
            self.drop_transformers(&mut nodes, &mut edges);
        }

        Ok(TraversalResponse {
            start_node,
            nodes,
            edges,
            paths,
            metadata,
        })
    }

    /// Presentation-only filter: drops transformer nodes (and any edge
    /// touching one) from the result. BFS expansion and `paths` are
    /// unaffected — a transformer hop is still a necessary step for
    /// `resource -> transformer -> resource` lineage, this only hides it
    /// from the flattened `nodes`/`edges` lists the caller sees.
    fn drop_transformers(&self, nodes: &mut Vec<Node>, edges: &mut Vec<Edge>) {
        use crate::model::NodeRole;

        let dropped: HashSet<String> = nodes
            .iter()
            .filter(|n| self.taxonomy.node_role(&n.node_type) == NodeRole::Transformer)
            .map(|n| n.id.clone())
            .collect();

        if dropped.is_empty() {
            return;
        }

        nodes.retain(|n| !dropped.contains(&n.id));
        edges.retain(|e| !dropped.contains(&e.source) && !dropped.contains(&e.target));
    }
}

fn x_direction_of(classification: &EdgeClassification, is_outgoing: bool) -> Option<SemanticDirection> {
    let semantic_dir = classification.semantic_direction?;
    Some(if is_outgoing {
        semantic_dir
    } else {
        semantic_dir.opposite()
    })
}

fn y_direction_of(classification: &EdgeClassification, is_outgoing: bool) -> Option<YDirection> {
    use crate::model::SemanticUp;
    let semantic_up = classification.semantic_up?;
    Some(match (semantic_up, is_outgoing) {
        (SemanticUp::Forward, true) => YDirection::Up,
        (SemanticUp::Forward, false) => YDirection::Down,
        (SemanticUp::Reverse, true) => YDirection::Down,
        (SemanticUp::Reverse, false) => YDirection::Up,
    })
}

#[allow(clippy::too_many_arguments)]
fn should_traverse(
    axis: Axis,
    actual_x_direction: Option<SemanticDirection>,
    actual_y_direction: Option<YDirection>,
    is_outgoing: bool,
    x_direction: XDirectionFilter,
    y_direction: YDirectionFilter,
    z_direction: ZDirectionFilter,
) -> bool {
    match axis {
        Axis::X => match x_direction {
            XDirectionFilter::Both => true,
            XDirectionFilter::Upstream => actual_x_direction == Some(SemanticDirection::Upstream),
            XDirectionFilter::Downstream => actual_x_direction == Some(SemanticDirection::Downstream),
        },
        Axis::Y => match y_direction {
            YDirectionFilter::Both => true,
            YDirectionFilter::Up => actual_y_direction == Some(YDirection::Up),
            YDirectionFilter::Down => actual_y_direction == Some(YDirection::Down),
        },
        Axis::Z => match z_direction {
            ZDirectionFilter::Both => true,
            ZDirectionFilter::Outgoing => is_outgoing,
            ZDirectionFilter::Incoming => !is_outgoing,
        },
        Axis::G => false,
    }
}
