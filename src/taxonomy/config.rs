//! Raw YAML shapes for the taxonomy file (§6 of the spec). Kept separate
//! from the parsed/indexed `TaxonomyCatalogue` so the wire format can drift
//! independently of the lookup structures built from it.

use std::collections::HashMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct RawTaxonomy {
    #[serde(default)]
    pub node_types: HashMap<String, RawNodeType>,
    #[serde(default)]
    pub x_lineage: Vec<RawEdgeSpec>,
    #[serde(default)]
    pub y_hierarchy: Vec<RawEdgeSpec>,
    #[serde(default)]
    pub z_association: Vec<RawEdgeSpec>,
    #[serde(default)]
    pub g_governance: Vec<RawEdgeSpec>,
    #[serde(default)]
    pub hop_groups: HashMap<String, RawHopGroup>,
    #[serde(default)]
    pub traversal_rules: RawTraversalRules,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTraversalRules {
    #[serde(default)]
    pub z_axis: RawZAxisRule,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawZAxisRule {
    pub max_hops: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawNodeType {
    pub display_name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub sub_types: Vec<String>,
    #[serde(default)]
    pub collapse_to: Vec<String>,
}

fn default_true() -> bool {
    true
}

/// `source_sub_type`/`destination_sub_type` accept either a bare string or
/// a list in the YAML, mirroring the Python loader's `_normalize_sub_type`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SubTypeSpec {
    One(String),
    Many(Vec<String>),
}

impl SubTypeSpec {
    pub fn into_sorted_vec(self) -> Vec<String> {
        let mut v = match self {
            SubTypeSpec::One(s) => vec![s],
            SubTypeSpec::Many(v) => v,
        };
        v.sort();
        v
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawEdgeSpec {
    pub edge_name: String,
    pub source: String,
    pub destination: String,
    #[serde(default)]
    pub source_sub_type: Option<SubTypeSpec>,
    #[serde(default)]
    pub destination_sub_type: Option<SubTypeSpec>,
    /// required for x_lineage entries only
    pub semantic_direction: Option<String>,
    /// required for y_hierarchy entries only
    pub semantic_up: Option<String>,
    pub hop_group: Option<String>,
    pub hop_role: Option<String>,
    #[serde(default)]
    pub passthrough: bool,
    #[serde(default)]
    pub reverse: bool,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawHopGroup {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub resource_types: Vec<String>,
    #[serde(default)]
    pub transformer_type: String,
    #[serde(default)]
    pub upstream_edge: String,
    #[serde(default)]
    pub downstream_edge: String,
}
