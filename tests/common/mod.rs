use std::sync::Arc;

use lineage_engine::{loader, CancellationToken, EngineConfig, TaxonomyCatalogue, TraversalEngine};

pub const TAXONOMY_YAML: &str = include_str!("../fixtures/taxonomy.yaml");
pub const SCHEMA_YAML: &str = include_str!("../fixtures/schema.yaml");
pub const SEED_DATA_YAML: &str = include_str!("../fixtures/seed_data.yaml");

pub fn build_engine() -> TraversalEngine<lineage_engine::MemoryGraph> {
    let taxonomy = Arc::new(
        TaxonomyCatalogue::from_yaml_str(TAXONOMY_YAML).expect("fixture taxonomy must parse"),
    );
    let graph = loader::load_into_memory(SCHEMA_YAML, SEED_DATA_YAML)
        .expect("fixture seed data must load");
    TraversalEngine::new(graph, taxonomy, EngineConfig::default())
}

pub fn no_cancel() -> CancellationToken {
    CancellationToken::new()
}
