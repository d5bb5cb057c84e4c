//! Core data types shared across the taxonomy, graph port, and engine.
//!
//! Node and Edge are the canonical, already-normalized shapes the engine
//! operates on — PascalCase labels and store-specific quirks are the graph
//! port's job to flatten away before these ever get built (see
//! `graph_port::normalize_label`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Scalar/JSON property bag carried by nodes and edges.
pub type Properties = HashMap<String, serde_json::Value>;

/// A node in the lineage graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_type: Option<String>,
    #[serde(default)]
    pub properties: Properties,
}

impl Node {
    pub fn new(id: impl Into<String>, node_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            sub_type: None,
            properties: Properties::new(),
        }
    }

    pub fn with_sub_type(mut self, sub_type: impl Into<String>) -> Self {
        self.sub_type = Some(sub_type.into());
        self
    }
}

/// A directed edge in the lineage graph. `source`/`target` preserve the
/// stored direction exactly as the graph port reported it — the engine
/// never rewrites an edge's direction, only interprets it (§3 invariant 2).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    #[serde(rename = "type")]
    pub edge_type: String,
    pub source: String,
    pub target: String,
    #[serde(default)]
    pub properties: Properties,
}

impl Edge {
    pub fn key(&self) -> EdgeKey {
        EdgeKey {
            source: self.source.clone(),
            edge_type: self.edge_type.clone(),
            target: self.target.clone(),
        }
    }
}

/// Dedup key for the visited-edges map: `source|type|target` per §4.3.7.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub source: String,
    pub edge_type: String,
    pub target: String,
}

/// The four semantic axes an edge can be classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
    G,
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
            Axis::G => "g",
        };
        f.write_str(s)
    }
}

/// X-axis semantic direction — intrinsic to the `(edge_type, src, dst)`
/// tuple, not the traversal direction (§3 invariant 2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticDirection {
    Upstream,
    Downstream,
}

impl SemanticDirection {
    pub fn opposite(self) -> Self {
        match self {
            SemanticDirection::Upstream => SemanticDirection::Downstream,
            SemanticDirection::Downstream => SemanticDirection::Upstream,
        }
    }
}

/// Y-axis: whether the stored direction climbs (`Forward`) or descends
/// (`Reverse`) the containment hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticUp {
    Forward,
    Reverse,
}

/// The engine's-eye-view direction of a Y-axis step once evaluated against
/// `is_outgoing` (§4.3.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YDirection {
    Up,
    Down,
}

/// Node role as recognised by the taxonomy. Only `Resource` and
/// `Transformer` are read by the hop collapser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    Resource,
    Transformer,
    Structural,
    Container,
    Qualifier,
}

/// Request-level axis direction filters (§4.3 parameters).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum XDirectionFilter {
    Upstream,
    Downstream,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum YDirectionFilter {
    Up,
    Down,
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZDirectionFilter {
    Outgoing,
    Incoming,
    Both,
}
