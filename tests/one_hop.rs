//! One-hop query scenarios, grounded in
//! `examples/original_source/tests/test_traversal.py`'s one-hop coverage.

mod common;

use common::build_engine;
use lineage_engine::model::{Axis, ZDirectionFilter};
use lineage_engine::OneHopQuery;

#[test]
fn one_hop_all_axes_from_curated_transactions() {
    let engine = build_engine();
    let query = OneHopQuery::new("ds-002");

    let result = engine.one_hop(&query).unwrap();

    assert_eq!(result.start_node.as_ref().unwrap().id, "ds-002");
    assert!(result.x_downstream.iter().any(|n| n.node.id == "job-002"));
    assert!(result.x_upstream.iter().any(|n| n.node.id == "job-001"));
    assert!(result.y_down.iter().any(|n| n.node.id == "attr-001"));
    assert!(result.z_incoming.iter().any(|n| n.node.id == "ws-001") || result.z_outgoing.iter().any(|n| n.node.id == "ws-001"));
    assert!(result.z_incoming.iter().any(|n| n.node.id == "uc-001") || result.z_outgoing.iter().any(|n| n.node.id == "uc-001"));

    assert_eq!(
        result.metadata.total_z,
        result.metadata.total_z_outgoing + result.metadata.total_z_incoming
    );

    let job_002 = result
        .x_downstream
        .iter()
        .find(|n| n.node.id == "job-002")
        .expect("job-002 present in x_downstream");
    assert_eq!(job_002.edge.source, "ds-002");
    assert_eq!(job_002.edge.target, "job-002");
    assert_eq!(job_002.edge_type, "CONSUMED_BY");
    assert_eq!(job_002.axis, Axis::X);
}

#[test]
fn one_hop_z_axis_only_limits_buckets_to_z() {
    let engine = build_engine();
    let query = OneHopQuery {
        axes: vec![Axis::Z],
        ..OneHopQuery::new("ds-002")
    };

    let result = engine.one_hop(&query).unwrap();

    assert!(result.x_upstream.is_empty());
    assert!(result.x_downstream.is_empty());
    assert!(result.y_up.is_empty());
    assert!(result.y_down.is_empty());
    assert!(result.metadata.total_z > 0);
}

#[test]
fn one_hop_z_direction_outgoing_excludes_incoming_edges() {
    let engine = build_engine();
    let query = OneHopQuery {
        axes: vec![Axis::Z],
        z_direction: ZDirectionFilter::Outgoing,
        ..OneHopQuery::new("ds-002")
    };

    let result = engine.one_hop(&query).unwrap();

    assert!(result.z_incoming.is_empty());
    assert!(!result.z_outgoing.is_empty());
}

#[test]
fn one_hop_from_agent_version_surfaces_uses_targets() {
    let engine = build_engine();
    let query = OneHopQuery::new("agv-001");

    let result = engine.one_hop(&query).unwrap();
    let z_ids: std::collections::HashSet<_> = result
        .z_outgoing
        .iter()
        .chain(result.z_incoming.iter())
        .map(|n| n.node.id.clone())
        .collect();

    for expected in ["ds-004", "ds-006", "mv-003", "mcpt-001"] {
        assert!(z_ids.contains(expected), "expected {expected} among one-hop Z neighbors");
    }
    assert!(result.y_up.iter().any(|n| n.node.id == "asysv-001"));
}

#[test]
fn one_hop_on_unknown_node_is_not_found() {
    let engine = build_engine();
    let query = OneHopQuery::new("does-not-exist");

    let err = engine.one_hop(&query).unwrap_err();
    assert!(matches!(err, lineage_engine::EngineError::NodeNotFound(id) if id == "does-not-exist"));
}
