//! Edge taxonomy: the single source of truth for how edges are classified
//! by axis and how nodes are typed, per spec §4.1.
//!
//! Grounded in `examples/original_source/src/traversal/taxonomy.py`'s
//! `EdgeTaxonomy` — the lookup protocol (exact match, then sub-type-relaxed
//! match, then containment scan) is carried over verbatim; only the shape
//! changes, from a Python dict-of-tuples to a typed Rust lookup table.

mod config;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::{info, warn};

use crate::error::{ConfigError, ConfigResult};
use crate::model::{Axis, NodeRole, SemanticDirection, SemanticUp};

use config::{RawEdgeSpec, RawTaxonomy};

/// Full classification metadata for a single edge type as declared in the
/// taxonomy file.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct EdgeClassification {
    pub edge_name: String,
    pub source_type: String,
    pub destination_type: String,
    pub source_sub_type: Option<Vec<String>>,
    pub destination_sub_type: Option<Vec<String>>,
    pub axis: Axis,
    pub semantic_direction: Option<SemanticDirection>,
    pub semantic_up: Option<SemanticUp>,
    pub hop_group: Option<String>,
    pub hop_role: Option<String>,
    pub passthrough: bool,
    pub reverse: bool,
    pub description: String,
}

/// Node type metadata: role, visibility, recognised sub-types.
#[derive(Debug, Clone)]
pub struct NodeTypeInfo {
    pub name: String,
    pub display_name: String,
    pub role: NodeRole,
    pub visible: bool,
    pub sub_types: Vec<String>,
    pub collapse_to: Vec<String>,
}

/// X-axis hop-group definition used by the hop collapser.
#[derive(Debug, Clone)]
pub struct HopGroup {
    pub name: String,
    pub description: String,
    pub resource_types: Vec<String>,
    pub transformer_type: String,
    pub upstream_edge: String,
    pub downstream_edge: String,
}

/// Lookup key: `(edge_name upper, source_type, dest_type, source_sub_types, dest_sub_types)`,
/// with sub-type lists sorted so the key is order-independent.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct EdgeLookupKey {
    edge_name: String,
    source_type: String,
    dest_type: String,
    source_sub_type: Option<Vec<String>>,
    dest_sub_type: Option<Vec<String>>,
}

impl EdgeLookupKey {
    fn new(
        edge_name: &str,
        source_type: &str,
        dest_type: &str,
        source_sub_type: Option<Vec<String>>,
        dest_sub_type: Option<Vec<String>>,
    ) -> Self {
        Self {
            edge_name: edge_name.to_uppercase(),
            source_type: source_type.to_string(),
            dest_type: dest_type.to_string(),
            source_sub_type,
            dest_sub_type,
        }
    }
}

fn parse_role(role: Option<&str>) -> NodeRole {
    match role {
        Some("transformer") => NodeRole::Transformer,
        Some("structural") => NodeRole::Structural,
        Some("container") => NodeRole::Container,
        Some("qualifier") => NodeRole::Qualifier,
        _ => NodeRole::Resource,
    }
}

fn parse_semantic_direction(s: &str) -> Option<SemanticDirection> {
    match s {
        "upstream" => Some(SemanticDirection::Upstream),
        "downstream" => Some(SemanticDirection::Downstream),
        _ => None,
    }
}

fn parse_semantic_up(s: &str) -> Option<SemanticUp> {
    match s {
        "forward" => Some(SemanticUp::Forward),
        "reverse" => Some(SemanticUp::Reverse),
        _ => None,
    }
}

/// The parsed, indexed edge taxonomy. Construction is fail-closed: any
/// `ConfigError` means no catalogue is produced (spec §7).
#[derive(Debug)]
pub struct TaxonomyCatalogue {
    node_types: HashMap<String, NodeTypeInfo>,
    x_edges: HashMap<EdgeLookupKey, EdgeClassification>,
    y_edges: HashMap<EdgeLookupKey, EdgeClassification>,
    z_edges: HashMap<EdgeLookupKey, EdgeClassification>,
    g_edges: HashMap<EdgeLookupKey, EdgeClassification>,
    hop_groups: HashMap<String, HopGroup>,
    max_z_hops: usize,
}

impl TaxonomyCatalogue {
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&text)
    }

    pub fn from_yaml_str(text: &str) -> ConfigResult<Self> {
        let raw: RawTaxonomy = serde_yaml::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: RawTaxonomy) -> ConfigResult<Self> {
        let node_types = raw
            .node_types
            .into_iter()
            .map(|(name, def)| {
                let info = NodeTypeInfo {
                    display_name: def.display_name.clone().unwrap_or_else(|| name.clone()),
                    role: parse_role(def.role.as_deref()),
                    visible: def.visible,
                    sub_types: def.sub_types,
                    collapse_to: def.collapse_to,
                    name: name.clone(),
                };
                (name, info)
            })
            .collect::<HashMap<_, _>>();

        let x_edges = parse_axis(raw.x_lineage, Axis::X)?;
        let y_edges = parse_axis(raw.y_hierarchy, Axis::Y)?;
        let z_edges = parse_axis(raw.z_association, Axis::Z)?;
        let g_edges = parse_axis(raw.g_governance, Axis::G)?;

        let hop_groups = raw
            .hop_groups
            .into_iter()
            .map(|(name, def)| {
                let group = HopGroup {
                    description: def.description,
                    resource_types: def.resource_types,
                    transformer_type: def.transformer_type,
                    upstream_edge: def.upstream_edge,
                    downstream_edge: def.downstream_edge,
                    name: name.clone(),
                };
                (name, group)
            })
            .collect::<HashMap<_, _>>();

        for group in hop_groups.values() {
            for edge_name in [&group.upstream_edge, &group.downstream_edge] {
                let found = x_edges
                    .keys()
                    .any(|k| k.edge_name == edge_name.to_uppercase());
                if !found {
                    return Err(ConfigError::UnknownHopGroupEdge {
                        group: group.name.clone(),
                        edge_name: edge_name.clone(),
                    });
                }
            }
        }

        let max_z_hops = raw.traversal_rules.z_axis.max_hops.unwrap_or(1);

        if x_edges.is_empty() {
            warn!("taxonomy has zero x_lineage entries");
        }
        if y_edges.is_empty() {
            warn!("taxonomy has zero y_hierarchy entries");
        }

        info!(
            node_types = node_types.len(),
            x_edges = x_edges.len(),
            y_edges = y_edges.len(),
            z_edges = z_edges.len(),
            g_edges = g_edges.len(),
            hop_groups = hop_groups.len(),
            "taxonomy loaded"
        );

        Ok(Self {
            node_types,
            x_edges,
            y_edges,
            z_edges,
            g_edges,
            hop_groups,
            max_z_hops,
        })
    }

    fn axis_maps(&self) -> [&HashMap<EdgeLookupKey, EdgeClassification>; 4] {
        [&self.x_edges, &self.y_edges, &self.z_edges, &self.g_edges]
    }

    /// Classify an edge by looking it up in the taxonomy, per §4.1's three-tier
    /// protocol: exact key match (incl. sub-types), then the same key with
    /// sub-types stripped, then a relaxed containment scan.
    pub fn classify(
        &self,
        edge_type: &str,
        source_type: &str,
        dest_type: &str,
        source_sub_type: Option<&str>,
        dest_sub_type: Option<&str>,
    ) -> Option<&EdgeClassification> {
        let source_sub_list = source_sub_type.map(|s| vec![s.to_string()]);
        let dest_sub_list = dest_sub_type.map(|s| vec![s.to_string()]);

        let key = EdgeLookupKey::new(
            edge_type,
            source_type,
            dest_type,
            source_sub_list,
            dest_sub_list,
        );
        for map in self.axis_maps() {
            if let Some(c) = map.get(&key) {
                return Some(c);
            }
        }

        let key_no_sub = EdgeLookupKey::new(edge_type, source_type, dest_type, None, None);
        for map in self.axis_maps() {
            if let Some(c) = map.get(&key_no_sub) {
                return Some(c);
            }
        }

        if source_sub_type.is_some() || dest_sub_type.is_some() {
            let edge_upper = edge_type.to_uppercase();
            for map in self.axis_maps() {
                for (stored_key, classification) in map {
                    if stored_key.edge_name != edge_upper
                        || stored_key.source_type != source_type
                        || stored_key.dest_type != dest_type
                    {
                        continue;
                    }

                    let src_match = match (source_sub_type, &stored_key.source_sub_type) {
                        (Some(s), Some(allowed)) => allowed.iter().any(|a| a == s),
                        (Some(_), None) => true,
                        (None, Some(_)) => false,
                        (None, None) => true,
                    };
                    let dst_match = match (dest_sub_type, &stored_key.dest_sub_type) {
                        (Some(s), Some(allowed)) => allowed.iter().any(|a| a == s),
                        (Some(_), None) => true,
                        (None, Some(_)) => false,
                        (None, None) => true,
                    };

                    if src_match && dst_match {
                        return Some(classification);
                    }
                }
            }
        }

        None
    }

    pub fn max_z_hops(&self) -> usize {
        self.max_z_hops
    }

    pub fn is_passthrough_node(&self, node_type: &str) -> bool {
        self.node_types
            .get(node_type)
            .map(|info| !info.visible)
            .unwrap_or(false)
    }

    pub fn node_role(&self, node_type: &str) -> NodeRole {
        self.node_types
            .get(node_type)
            .map(|info| info.role)
            .unwrap_or(NodeRole::Resource)
    }

    pub fn node_type_info(&self, node_type: &str) -> Option<&NodeTypeInfo> {
        self.node_types.get(node_type)
    }

    pub fn hop_group(&self, name: &str) -> Option<&HopGroup> {
        self.hop_groups.get(name)
    }

    pub fn hop_groups(&self) -> impl Iterator<Item = &HopGroup> {
        self.hop_groups.values()
    }

    /// Sub-types the taxonomy declares for this node type, if any — used to
    /// warn on a start node's sub-type mismatch rather than reject it.
    pub fn declared_sub_types(&self, node_type: &str) -> &[String] {
        self.node_types
            .get(node_type)
            .map(|info| info.sub_types.as_slice())
            .unwrap_or(&[])
    }

    pub fn g_edge_names(&self) -> std::collections::HashSet<String> {
        self.g_edges.keys().map(|k| k.edge_name.clone()).collect()
    }

    pub fn is_g_edge(&self, edge_type: &str) -> bool {
        let upper = edge_type.to_uppercase();
        self.g_edges.keys().any(|k| k.edge_name == upper)
    }
}

fn parse_axis(
    specs: Vec<RawEdgeSpec>,
    axis: Axis,
) -> ConfigResult<HashMap<EdgeLookupKey, EdgeClassification>> {
    let mut out = HashMap::new();
    for spec in specs {
        let source_sub_type = spec
            .source_sub_type
            .clone()
            .map(|s| s.into_sorted_vec());
        let dest_sub_type = spec
            .destination_sub_type
            .clone()
            .map(|s| s.into_sorted_vec());

        let (semantic_direction, semantic_up) = match axis {
            Axis::X => {
                let raw = spec.semantic_direction.as_deref().ok_or_else(|| {
                    ConfigError::MissingField {
                        edge_name: spec.edge_name.clone(),
                        axis: axis.to_string(),
                        field: "semantic_direction",
                    }
                })?;
                let parsed = parse_semantic_direction(raw).ok_or_else(|| {
                    ConfigError::InvalidSubType {
                        edge_name: spec.edge_name.clone(),
                        detail: format!("unrecognised semantic_direction {raw:?}"),
                    }
                })?;
                (Some(parsed), None)
            }
            Axis::Y => {
                let raw =
                    spec.semantic_up
                        .as_deref()
                        .ok_or_else(|| ConfigError::MissingField {
                            edge_name: spec.edge_name.clone(),
                            axis: axis.to_string(),
                            field: "semantic_up",
                        })?;
                let parsed = parse_semantic_up(raw).ok_or_else(|| ConfigError::InvalidSubType {
                    edge_name: spec.edge_name.clone(),
                    detail: format!("unrecognised semantic_up {raw:?}"),
                })?;
                (None, Some(parsed))
            }
            Axis::Z | Axis::G => (None, None),
        };

        let key = EdgeLookupKey::new(
            &spec.edge_name,
            &spec.source,
            &spec.destination,
            source_sub_type.clone(),
            dest_sub_type.clone(),
        );

        let classification = EdgeClassification {
            edge_name: spec.edge_name.clone(),
            source_type: spec.source.clone(),
            destination_type: spec.destination.clone(),
            source_sub_type,
            destination_sub_type: dest_sub_type,
            axis,
            semantic_direction,
            semantic_up,
            hop_group: spec.hop_group.clone(),
            hop_role: spec.hop_role.clone(),
            passthrough: spec.passthrough,
            reverse: spec.reverse,
            description: spec.description.clone(),
        };

        out.insert(key, classification);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
node_types:
  dataset:
    role: resource
    visible: true
    sub_types: ["raw", "curated", "feature_set"]
  etljob:
    role: transformer
    visible: false

x_lineage:
  - edge_name: PRODUCES
    source: etljob
    destination: dataset
    semantic_direction: downstream
    hop_group: ingest
    hop_role: downstream
  - edge_name: CONSUMES
    source: etljob
    destination: dataset
    semantic_direction: upstream
    hop_group: ingest
    hop_role: upstream

y_hierarchy:
  - edge_name: HAS_MEMBER
    source: workspace
    destination: dataset
    semantic_up: reverse

z_association:
  - edge_name: USES
    source: agent_version
    destination: dataset

hop_groups:
  ingest:
    resource_types: [dataset]
    transformer_type: etljob
    upstream_edge: CONSUMES
    downstream_edge: PRODUCES

traversal_rules:
  z_axis:
    max_hops: 1
"#;

    #[test]
    fn loads_and_classifies_exact() {
        let tax = TaxonomyCatalogue::from_yaml_str(SAMPLE).unwrap();
        let c = tax
            .classify("produces", "etljob", "dataset", None, None)
            .expect("should classify");
        assert_eq!(c.axis, Axis::X);
        assert_eq!(c.semantic_direction, Some(SemanticDirection::Downstream));
    }

    #[test]
    fn classify_is_case_insensitive_on_edge_name() {
        let tax = TaxonomyCatalogue::from_yaml_str(SAMPLE).unwrap();
        assert!(tax
            .classify("PRODUCES", "etljob", "dataset", None, None)
            .is_some());
    }

    #[test]
    fn relaxed_sub_type_match() {
        let tax = TaxonomyCatalogue::from_yaml_str(SAMPLE).unwrap();
        // no edge declares a sub_type filter, so any provided sub_type
        // should still relax-match against the no-sub_type entry.
        let c = tax.classify("produces", "etljob", "dataset", None, Some("curated"));
        assert!(c.is_some());
    }

    #[test]
    fn unknown_edge_is_none() {
        let tax = TaxonomyCatalogue::from_yaml_str(SAMPLE).unwrap();
        assert!(tax
            .classify("NOPE", "etljob", "dataset", None, None)
            .is_none());
    }

    #[test]
    fn passthrough_and_role() {
        let tax = TaxonomyCatalogue::from_yaml_str(SAMPLE).unwrap();
        assert!(tax.is_passthrough_node("etljob"));
        assert!(!tax.is_passthrough_node("dataset"));
        assert_eq!(tax.node_role("etljob"), NodeRole::Transformer);
        assert_eq!(tax.node_role("dataset"), NodeRole::Resource);
        assert_eq!(tax.node_role("unknown_type"), NodeRole::Resource);
    }

    #[test]
    fn g_edges_and_max_z_hops() {
        let tax = TaxonomyCatalogue::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(tax.max_z_hops(), 1);
        assert!(tax.g_edge_names().is_empty());
        assert!(!tax.is_g_edge("USES"));
    }

    #[test]
    fn hop_group_referencing_unknown_edge_is_rejected() {
        let bad = SAMPLE.replace("upstream_edge: CONSUMES", "upstream_edge: NONEXISTENT");
        let err = TaxonomyCatalogue::from_yaml_str(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownHopGroupEdge { .. }));
    }

    #[test]
    fn missing_semantic_direction_is_rejected() {
        let bad = SAMPLE.replace("semantic_direction: downstream\n    hop_group: ingest\n    hop_role: downstream", "hop_group: ingest\n    hop_role: downstream");
        let err = TaxonomyCatalogue::from_yaml_str(&bad).unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { .. }));
    }
}
