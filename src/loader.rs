//! Schema-validated instance-data loader (spec SPEC_FULL.md §11.1).
//!
//! Grounded in `examples/original_source/src/graph/loader.py`'s
//! `Metamodel`/`GraphLoader` split. This version loads directly into an
//! in-memory `MemoryGraph` instead of a Neo4j driver, and drops the
//! constraint-creation and GDS-projection steps (storage/analytics
//! concerns out of scope here) — schema parsing and the two validation
//! passes (`_validate_assets`, `_validate_relationships`) are carried over
//! closely, including the exact shape of the failures they raise.

use std::collections::{HashMap, HashSet};

use rayon::prelude::*;
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::memory_store::MemoryGraph;
use crate::model::{Edge, Node, Properties};

#[derive(Debug, Clone, Deserialize)]
struct RawSchema {
    node_types: HashMap<String, RawNodeTypeSchema>,
    #[serde(default)]
    relationships: Vec<RawRelationshipSchema>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct RawNodeTypeSchema {
    #[serde(default)]
    properties: Vec<RawPropertySpec>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawPropertySpec {
    name: String,
    #[serde(rename = "type", default = "default_prop_type")]
    type_name: String,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    unique: bool,
    #[serde(default)]
    allowed_values: Option<Vec<serde_yaml::Value>>,
}

fn default_prop_type() -> String {
    "string".to_string()
}

#[derive(Debug, Clone, Deserialize)]
struct RawRelationshipSchema {
    #[serde(rename = "type")]
    type_name: String,
    from: String,
    to: String,
}

#[derive(Debug, Clone, Deserialize)]
struct RawInstanceData {
    #[serde(default)]
    assets: HashMap<String, Vec<serde_yaml::Value>>,
    #[serde(default)]
    relationships: Vec<RawInstanceRelationship>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawInstanceRelationship {
    #[serde(rename = "type")]
    type_name: String,
    from: String,
    to: String,
}

#[derive(Debug, Clone)]
struct PropertySpec {
    type_name: String,
    required: bool,
    allowed_values: Option<Vec<serde_yaml::Value>>,
}

/// Parsed metamodel: node type -> property specs, and the allowed
/// `(from_type, to_type)` pairs per relationship type.
#[derive(Debug, Clone)]
pub struct Metamodel {
    node_types: HashMap<String, HashMap<String, PropertySpec>>,
    required_props: HashMap<String, HashSet<String>>,
    relationships: HashMap<String, HashSet<(String, String)>>,
}

fn safe_ident(name: &str) -> ConfigResult<&str> {
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(ConfigError::Schema(format!("unsafe identifier: {name:?}")));
    }
    Ok(name)
}

impl Metamodel {
    fn parse(raw: RawSchema) -> ConfigResult<Self> {
        if raw.node_types.is_empty() {
            return Err(ConfigError::Schema(
                "schema missing 'node_types' or it's empty".into(),
            ));
        }

        let mut node_types = HashMap::new();
        let mut required_props = HashMap::new();

        for (label, def) in &raw.node_types {
            let label = safe_ident(label)?.to_string();

            let mut prop_map = HashMap::new();
            let mut required = HashSet::new();

            for p in &def.properties {
                if p.name.is_empty() {
                    return Err(ConfigError::Schema(format!(
                        "property missing name in {label}"
                    )));
                }
                if p.required {
                    required.insert(p.name.clone());
                }
                prop_map.insert(
                    p.name.clone(),
                    PropertySpec {
                        type_name: p.type_name.clone(),
                        required: p.required,
                        allowed_values: p.allowed_values.clone(),
                    },
                );
            }

            let id_spec = prop_map
                .get("id")
                .ok_or_else(|| ConfigError::Schema(format!("node type {label} must define an 'id' property")))?;
            if !id_spec.required {
                return Err(ConfigError::Schema(format!(
                    "node type {label} 'id' must be required: true"
                )));
            }

            node_types.insert(label.clone(), prop_map);
            required_props.insert(label, required);
        }

        let mut relationships: HashMap<String, HashSet<(String, String)>> = HashMap::new();
        for r in &raw.relationships {
            let rtype = safe_ident(&r.type_name)?.to_string();
            let frm = safe_ident(&r.from)?.to_string();
            let to = safe_ident(&r.to)?.to_string();
            if !node_types.contains_key(&frm) || !node_types.contains_key(&to) {
                return Err(ConfigError::Schema(format!(
                    "relationship {rtype} references unknown node types {frm}->{to}"
                )));
            }
            relationships.entry(rtype).or_default().insert((frm, to));
        }

        Ok(Self {
            node_types,
            required_props,
            relationships,
        })
    }
}

fn coerce_type(value: &serde_yaml::Value, expected: &str) -> bool {
    if value.is_null() {
        return true;
    }
    match expected.to_lowercase().as_str() {
        "string" => value.is_string(),
        "boolean" => value.is_bool(),
        "int" | "integer" => value.as_i64().is_some() || value.as_u64().is_some(),
        "float" | "double" | "decimal" | "number" => value.is_number(),
        _ => true,
    }
}

fn yaml_to_json(value: &serde_yaml::Value) -> serde_json::Value {
    serde_json::to_value(value).unwrap_or(serde_json::Value::Null)
}

/// Validated, indexed instance assets: label -> list of (id, properties).
struct ValidatedAssets {
    by_label: HashMap<String, Vec<(String, Properties)>>,
    index_by_id: HashMap<String, String>, // id -> label
}

/// Per-label validation runs independently of every other label (the
/// duplicate-id check is scoped to a single label), so the outer loop over
/// `raw.assets` fans out across `rayon`'s thread pool.
fn validate_assets(mm: &Metamodel, raw: &RawInstanceData) -> ConfigResult<ValidatedAssets> {
    let validated: Vec<(String, Vec<(String, Properties)>)> = raw
        .assets
        .par_iter()
        .map(|(label, items)| validate_label_assets(mm, label, items))
        .collect::<ConfigResult<Vec<_>>>()?;

    let mut by_label: HashMap<String, Vec<(String, Properties)>> = HashMap::new();
    let mut index_by_id: HashMap<String, String> = HashMap::new();

    for (label, items) in validated {
        for (id, _) in &items {
            index_by_id.insert(id.clone(), label.clone());
        }
        by_label.insert(label, items);
    }

    Ok(ValidatedAssets {
        by_label,
        index_by_id,
    })
}

fn validate_label_assets(
    mm: &Metamodel,
    label: &str,
    items: &[serde_yaml::Value],
) -> ConfigResult<(String, Vec<(String, Properties)>)> {
    let label = safe_ident(label)?.to_string();
    let prop_specs = mm.node_types.get(&label).ok_or_else(|| {
        ConfigError::DataValidation(format!("unknown node type in assets: {label}"))
    })?;
    let required = &mm.required_props[&label];

    let mut out_items = Vec::new();
    let mut seen_ids: HashSet<String> = HashSet::new();

    for obj in items {
        let mapping = obj.as_mapping().ok_or_else(|| {
            ConfigError::DataValidation(format!("assets.{label} contains a non-object"))
        })?;

        let get = |key: &str| -> Option<&serde_yaml::Value> {
            mapping.get(&serde_yaml::Value::String(key.to_string()))
        };

        let missing: Vec<&str> = required
            .iter()
            .filter(|p| match get(p) {
                None => true,
                Some(v) => v.is_null() || v.as_str() == Some(""),
            })
            .map(|s| s.as_str())
            .collect();
        if !missing.is_empty() {
            return Err(ConfigError::DataValidation(format!(
                "{label} missing required properties: {missing:?}"
            )));
        }

        let mut properties = Properties::new();
        for (k, v) in mapping {
            let key = match k.as_str() {
                Some(s) => s.to_string(),
                None => continue,
            };
            if let Some(spec) = prop_specs.get(&key) {
                if !coerce_type(v, &spec.type_name) {
                    return Err(ConfigError::DataValidation(format!(
                        "{label}.{key} does not match declared type {}",
                        spec.type_name
                    )));
                }
                if let Some(allowed) = &spec.allowed_values {
                    if !v.is_null() && !allowed.contains(v) {
                        return Err(ConfigError::DataValidation(format!(
                            "{label}.{key} has invalid value, not in allowed_values"
                        )));
                    }
                }
            }
            properties.insert(key, yaml_to_json(v));
        }

        let id = get("id")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ConfigError::DataValidation(format!("{label} object missing 'id'")))?
            .to_string();

        if !seen_ids.insert(id.clone()) {
            return Err(ConfigError::DataValidation(format!(
                "duplicate id in assets for {label}: {id}"
            )));
        }

        out_items.push((id, properties));
    }

    Ok((label, out_items))
}

struct ValidatedRelationship {
    edge_type: String,
    from_id: String,
    to_id: String,
}

fn validate_relationships(
    mm: &Metamodel,
    assets: &ValidatedAssets,
    raw: &RawInstanceData,
) -> ConfigResult<Vec<ValidatedRelationship>> {
    let mut out = Vec::new();

    for r in &raw.relationships {
        let rtype = safe_ident(&r.type_name)?.to_string();
        if !mm.relationships.contains_key(&rtype) {
            return Err(ConfigError::DataValidation(format!(
                "unknown relationship type: {rtype}"
            )));
        }

        let from_label = assets.index_by_id.get(&r.from).ok_or_else(|| {
            ConfigError::DataValidation(format!(
                "relationship from id {:?} not found in assets",
                r.from
            ))
        })?;
        let to_label = assets.index_by_id.get(&r.to).ok_or_else(|| {
            ConfigError::DataValidation(format!(
                "relationship to id {:?} not found in assets",
                r.to
            ))
        })?;

        let allowed = &mm.relationships[&rtype];
        if !allowed.contains(&(from_label.clone(), to_label.clone())) {
            return Err(ConfigError::DataValidation(format!(
                "relationship {rtype} disallowed for {from_label}->{to_label}"
            )));
        }

        out.push(ValidatedRelationship {
            edge_type: rtype,
            from_id: r.from.clone(),
            to_id: r.to.clone(),
        });
    }

    Ok(out)
}

/// Parses a metamodel schema and instance-data YAML pair, validates the
/// instance data against the schema, and loads it into a fresh
/// `MemoryGraph`. Fails closed: any violation returns a `ConfigError`
/// rather than a partially loaded graph.
pub fn load_into_memory(schema_yaml: &str, data_yaml: &str) -> ConfigResult<MemoryGraph> {
    let raw_schema: RawSchema = serde_yaml::from_str(schema_yaml)?;
    let mm = Metamodel::parse(raw_schema)?;

    let raw_data: RawInstanceData = serde_yaml::from_str(data_yaml)?;
    let assets = validate_assets(&mm, &raw_data)?;
    let relationships = validate_relationships(&mm, &assets, &raw_data)?;

    let mut graph = MemoryGraph::new();
    for (label, items) in assets.by_label {
        for (id, properties) in items {
            let mut node = Node::new(id, label.clone());
            node.properties = properties;
            graph.insert_node(node);
        }
    }

    for rel in relationships {
        graph.insert_edge(Edge {
            edge_type: rel.edge_type,
            source: rel.from_id,
            target: rel.to_id,
            properties: Properties::new(),
        });
    }

    Ok(graph)
}
