mod common;

use execlog::aggregator::ExecutionTree;
use execlog::flamegraph::{build_call_flame_chart, build_flame_chart, FlameCall, FlameChart, FlameChartConfig};
use execlog::utils::error::FlameChartError;
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn chart_at_depth(max_depth: usize) -> FlameChart {
    let events = common::sample_trace();
    let tree = ExecutionTree::from_events(&events);
    let config = FlameChartConfig::new().with_max_depth(max_depth);
    build_flame_chart(&tree, Some(&config)).unwrap()
}

fn record(id: u64, depth: usize, parent_id: Option<u64>, call_time: f64, ret_time: f64, name: &str) -> FlameCall {
    FlameCall {
        id,
        depth,
        parent_id,
        call_time,
        ret_time,
        name: name.to_string(),
        args: None,
        retval: None,
    }
}

#[test]
fn test_sample_flame_chart() {
    let chart = chart_at_depth(100);

    assert_eq!(chart.start_time, "2015-01-20T14:30:32.001000");
    assert_eq!(chart.total_seconds, 86400.0);
    assert_eq!(
        chart.calls,
        vec![
            record(1, 0, None, 0.0, 86400.0, "main"),
            record(2, 1, Some(1), 1.0, 3600.0, "somefunc"),
            record(3, 2, Some(2), 2.5, 3.0, "func3"),
            record(4, 1, Some(1), 7200.0, 43200.0, "someotherfunc"),
        ]
    );
}

#[test]
fn test_depth_limit_drops_deeper_calls() {
    let chart = chart_at_depth(1);

    assert_eq!(chart.total_seconds, 86400.0);
    // ids are allocated by the bounded walk, so the cut branch consumes none
    assert_eq!(
        chart.calls,
        vec![
            record(1, 0, None, 0.0, 86400.0, "main"),
            record(2, 1, Some(1), 1.0, 3600.0, "somefunc"),
            record(3, 1, Some(1), 7200.0, 43200.0, "someotherfunc"),
        ]
    );
}

#[test]
fn test_depth_zero_keeps_top_level_only() {
    let chart = chart_at_depth(0);
    assert_eq!(chart.calls, vec![record(1, 0, None, 0.0, 86400.0, "main")]);
}

#[test]
fn test_unterminated_call_is_omitted_but_numbered() {
    let mut events = common::sample_trace();
    // drop "return main" so the root never terminates
    events.pop();

    let tree = ExecutionTree::from_events(&events);
    let chart = build_flame_chart(&tree, None).unwrap();

    assert_eq!(chart.total_seconds, 0.0);
    let ids: Vec<u64> = chart.calls.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![2, 3, 4]);
    assert!(chart.calls.iter().all(|c| c.name != "main"));
    assert_eq!(chart.calls[0].parent_id, Some(1));
}

#[test]
fn test_empty_trace_is_an_error() {
    let events = common::sample_trace();
    // only returns: every one underflows and is dropped
    let returns: Vec<_> = events.into_iter().filter(|e| e.stack_change() < 0).collect();
    let tree = ExecutionTree::from_events(&returns);

    assert!(tree.is_empty());
    assert!(matches!(
        build_flame_chart(&tree, None),
        Err(FlameChartError::EmptyTrace)
    ));
}

#[test]
fn test_single_call_chart() {
    let events = common::sample_trace();
    let tree = ExecutionTree::from_events(&events);
    let somefunc = &tree.calls[0].sub_calls[0];

    let chart = build_call_flame_chart(somefunc, None);
    assert_eq!(chart.start_time, "2015-01-20T14:30:33.001000");
    assert_eq!(chart.total_seconds, 3599.0);
    assert_eq!(
        chart.calls,
        vec![
            record(1, 0, None, 0.0, 3599.0, "somefunc"),
            record(2, 1, Some(1), 1.5, 2.0, "func3"),
        ]
    );
}

#[test]
fn test_chart_json_field_names() {
    let value = serde_json::to_value(chart_at_depth(100)).unwrap();

    assert_eq!(value["total_seconds"], 86400.0);
    let first = &value["calls"][0];
    for field in ["id", "depth", "parent_id", "call_time", "ret_time", "name", "args", "retval"] {
        assert!(first.get(field).is_some(), "missing field {}", field);
    }
    assert!(first["parent_id"].is_null());
}

/// Record shape independent of id numbering: parent given by list position
fn shape(chart: &FlameChart) -> Vec<(usize, String, f64, f64, Option<usize>)> {
    chart
        .calls
        .iter()
        .map(|call| {
            let parent = call
                .parent_id
                .and_then(|id| chart.calls.iter().position(|c| c.id == id));
            (call.depth, call.name.clone(), call.call_time, call.ret_time, parent)
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_deeper_limit_only_adds_deeper_records(events in common::arb_trace(), depth in 0usize..5) {
        let tree = ExecutionTree::from_events(&events);
        prop_assume!(!tree.is_empty());

        let shallow = build_flame_chart(&tree, Some(&FlameChartConfig::new().with_max_depth(depth))).unwrap();
        let mut deep = build_flame_chart(&tree, Some(&FlameChartConfig::new().with_max_depth(depth + 1))).unwrap();

        prop_assert!(deep.calls.iter().all(|c| c.depth <= depth + 1));
        deep.calls.retain(|c| c.depth <= depth);
        prop_assert_eq!(shape(&shallow), shape(&deep));
        prop_assert_eq!(shallow.total_seconds, deep.total_seconds);
    }
}
