//! Error taxonomies.
//!
//! Two separate enums, never mixed: `ConfigError` for taxonomy-construction
//! failures (fail-closed, no catalogue is produced), `EngineError` for
//! request-time failures. See spec §7.

use thiserror::Error;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;
pub type EngineResult<T> = std::result::Result<T, EngineError>;

/// Failures while building a `TaxonomyCatalogue` from YAML.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read taxonomy file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse taxonomy YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("edge spec {edge_name:?} on axis {axis} is missing required field {field}")]
    MissingField {
        edge_name: String,
        axis: String,
        field: &'static str,
    },

    #[error("edge spec {edge_name:?} has an unparsable sub-type entry: {detail}")]
    InvalidSubType { edge_name: String, detail: String },

    #[error(
        "hop group {group:?} references edge name {edge_name:?}, which no X-axis entry defines"
    )]
    UnknownHopGroupEdge { group: String, edge_name: String },

    /// Malformed metamodel schema (instance-data loader, §11.1) — mirrors
    /// the Python `SchemaError`.
    #[error("schema error: {0}")]
    Schema(String),

    /// Instance data that fails schema validation (§11.1) — mirrors the
    /// Python `DataValidationError`.
    #[error("data validation error: {0}")]
    DataValidation(String),
}

/// Failures while servicing a `traverse`/`one_hop` request.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("node not found: {0}")]
    NodeNotFound(String),

    #[error("request cancelled")]
    Cancelled,

    #[error("resource limit exceeded: visited more than {cap} nodes")]
    ResourceExceeded { cap: usize },

    #[error("graph port unavailable: {0}")]
    PortUnavailable(String),
}
