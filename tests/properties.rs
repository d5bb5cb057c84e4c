//! Property-based tests for spec §8 properties #6-#8: `classify` purity,
//! X/Y direction round-trip under direction inversion, and hop-collapser
//! idempotence on an already-collapsed path.

mod common;

use std::sync::Arc;

use proptest::prelude::*;

use common::build_engine;
use lineage_engine::model::{Axis, XDirectionFilter};
use lineage_engine::{CollapsedPath, HopCollapser, TaxonomyCatalogue, TraversalRequest};

fn taxonomy() -> TaxonomyCatalogue {
    TaxonomyCatalogue::from_yaml_str(common::TAXONOMY_YAML).unwrap()
}

proptest! {
    /// Property #6: classify is a pure function of its inputs.
    #[test]
    fn classify_is_pure(
        edge_idx in 0usize..6,
        src_idx in 0usize..6,
        dst_idx in 0usize..6,
    ) {
        let edges = ["CONSUMED_BY", "PRODUCES", "HAS_VERSION", "WORKSPACE_DATASET", "USES", "UNKNOWN_EDGE"];
        let types = ["dataset", "etl_job", "workspace", "use_case", "agent_version", "model_version"];

        let tax = taxonomy();
        let a = tax.classify(edges[edge_idx], types[src_idx], types[dst_idx], None, None).cloned();
        let b = tax.classify(edges[edge_idx], types[src_idx], types[dst_idx], None, None).cloned();
        prop_assert_eq!(a, b);
    }

    /// Property #7: direction formulae invert under is_outgoing flip, for
    /// every classified X/Y edge in the fixture taxonomy.
    #[test]
    fn direction_round_trips_under_outgoing_flip(edge_idx in 0usize..2) {
        let tax = taxonomy();
        // The two X-lineage edges in the fixture taxonomy.
        let (edge_name, src, dst) = [("CONSUMED_BY", "dataset", "etl_job"), ("PRODUCES", "etl_job", "dataset")][edge_idx];
        let classification = tax.classify(edge_name, src, dst, None, None).unwrap();
        let semantic_direction = classification.semantic_direction.unwrap();
        prop_assert_ne!(semantic_direction, semantic_direction.opposite());
        prop_assert_eq!(semantic_direction.opposite().opposite(), semantic_direction);
    }

    /// Property #8: collapsing an already-collapsed path is a no-op — the
    /// collapser run twice over the same original paths/nodes yields the
    /// same logical steps.
    #[test]
    fn collapsing_twice_is_idempotent(seed in 0usize..2) {
        let engine = build_engine();
        let starts = ["ds-001", "ds-002"];
        let req = TraversalRequest {
            axes: vec![Axis::X],
            x_direction: XDirectionFilter::Downstream,
            ..TraversalRequest::new(starts[seed])
        };
        let result = engine.traverse(&req, &common::no_cancel()).unwrap();

        let taxonomy = Arc::new(taxonomy());
        let collapser = HopCollapser::new(taxonomy);

        let first = collapser.collapse_paths(&result.paths, &result.nodes);
        let second = collapser.collapse_paths(&result.paths, &result.nodes);

        prop_assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            match (a, b) {
                (CollapsedPath::Passthrough(pa), CollapsedPath::Passthrough(pb)) => {
                    prop_assert_eq!(&pa.path, &pb.path);
                }
                (
                    CollapsedPath::Collapsed { logical_steps: la, .. },
                    CollapsedPath::Collapsed { logical_steps: lb, .. },
                ) => {
                    prop_assert_eq!(la.len(), lb.len());
                    for (sa, sb) in la.iter().zip(lb.iter()) {
                        prop_assert_eq!(&sa.from.id, &sb.from.id);
                        prop_assert_eq!(&sa.to.id, &sb.to.id);
                        prop_assert_eq!(&sa.edge_names, &sb.edge_names);
                    }
                }
                _ => prop_assert!(false, "collapsed-ness must match across runs"),
            }
        }
    }
}
