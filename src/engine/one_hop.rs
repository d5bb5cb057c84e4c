//! Single-hop neighbor query, bucketed by axis and direction (spec §4.3.8).
//!
//! Grounded in `examples/original_source/src/traversal/engine.py`'s
//! `TraversalEngine.one_hop` — same neighbor-fetch and bucketing logic as
//! `traverse`, just capped to depth 1 and with no path/state bookkeeping.

use tracing::info;

use crate::error::EngineResult;
use crate::graph_port::GraphPort;
use crate::model::{
    Axis, Edge, Node, SemanticDirection, XDirectionFilter, YDirection, YDirectionFilter,
    ZDirectionFilter,
};

use super::TraversalEngine;

/// One bucketed neighbor entry: `{neighbour_node, edge, edge_type, axis}`
/// per spec §4.3.8 — `edge` carries the stored `source`/`target` so the
/// direction invariant of §3 survives this API too, not just `traverse`.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OneHopNeighbor {
    pub node: Node,
    pub edge: Edge,
    pub edge_type: String,
    pub axis: Axis,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct OneHopMetadata {
    pub total_x_upstream: usize,
    pub total_x_downstream: usize,
    pub total_y_up: usize,
    pub total_y_down: usize,
    pub total_z_outgoing: usize,
    pub total_z_incoming: usize,
    pub total_z: usize,
}

#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct OneHopResult {
    pub start_node: Option<Node>,
    pub x_upstream: Vec<OneHopNeighbor>,
    pub x_downstream: Vec<OneHopNeighbor>,
    pub y_up: Vec<OneHopNeighbor>,
    pub y_down: Vec<OneHopNeighbor>,
    pub z_outgoing: Vec<OneHopNeighbor>,
    pub z_incoming: Vec<OneHopNeighbor>,
    pub metadata: OneHopMetadata,
}

/// Parameters for a `one_hop` call. Unlike `traverse`, X/Y direction are
/// always `both` at the base node — only Z's incoming/outgoing bucketing
/// is a caller-facing filter, matching the original's `one_hop` signature.
#[derive(Debug, Clone)]
pub struct OneHopQuery {
    pub start_node_id: String,
    pub axes: Vec<Axis>,
    pub z_direction: ZDirectionFilter,
}

impl OneHopQuery {
    pub fn new(start_node_id: impl Into<String>) -> Self {
        Self {
            start_node_id: start_node_id.into(),
            axes: vec![Axis::X, Axis::Y, Axis::Z],
            z_direction: ZDirectionFilter::Both,
        }
    }
}

impl<P: GraphPort> TraversalEngine<P> {
    pub fn one_hop(&self, query: &OneHopQuery) -> EngineResult<OneHopResult> {
        info!(start_node = %query.start_node_id, "one_hop start");

        let start_node = self.fetch_node(&query.start_node_id)?;

        let neighbors = self.neighbors(
            &start_node.id,
            &start_node.node_type,
            start_node.sub_type.as_deref(),
            &query.axes,
            XDirectionFilter::Both,
            YDirectionFilter::Both,
            query.z_direction,
            0,
            1,
            None,
            false,
            false,
        )?;

        let mut result = OneHopResult {
            start_node: Some(start_node.clone()),
            ..OneHopResult::default()
        };

        for n in neighbors {
            let entry = OneHopNeighbor {
                node: n.node,
                edge_type: n.edge.edge_type.clone(),
                edge: n.edge.clone(),
                axis: n.axis,
            };
            match n.axis {
                Axis::X => match n.x_direction {
                    Some(SemanticDirection::Upstream) => result.x_upstream.push(entry),
                    _ => result.x_downstream.push(entry),
                },
                Axis::Y => match n.y_direction {
                    Some(YDirection::Up) => result.y_up.push(entry),
                    _ => result.y_down.push(entry),
                },
                Axis::Z => {
                    if n.edge.source == start_node.id {
                        result.z_outgoing.push(entry);
                    } else {
                        result.z_incoming.push(entry);
                    }
                }
                Axis::G => {}
            }
        }

        result.metadata = OneHopMetadata {
            total_x_upstream: result.x_upstream.len(),
            total_x_downstream: result.x_downstream.len(),
            total_y_up: result.y_up.len(),
            total_y_down: result.y_down.len(),
            total_z_outgoing: result.z_outgoing.len(),
            total_z_incoming: result.z_incoming.len(),
            total_z: result.z_outgoing.len() + result.z_incoming.len(),
        };

        info!(
            x_upstream = result.metadata.total_x_upstream,
            x_downstream = result.metadata.total_x_downstream,
            y_up = result.metadata.total_y_up,
            y_down = result.metadata.total_y_down,
            z_total = result.metadata.total_z,
            "one_hop end"
        );

        Ok(result)
    }
}
