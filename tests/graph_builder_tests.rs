use callchain_studio::aggregator::{
    aggregate_chains, build_call_graph, ChainSelection, ColorScale, DurationFilter, EdgeClass, FunctionKey, GraphOptions,
};
use callchain_studio::parser::{CallEvent, ChainData, Direction, FunctionInfo, FunctionTable};
use pretty_assertions::assert_eq;

fn call(t: f64, addr: u64) -> CallEvent {
    CallEvent::call(t, addr, 1)
}

fn ret(t: f64, addr: u64) -> CallEvent {
    CallEvent::ret(t, addr, 1)
}

fn rx(addr: u64) -> FunctionKey {
    FunctionKey::new(Direction::Receive, addr)
}

/// Keeps every function of the second-scale chains below
fn wide_filter() -> DurationFilter {
    DurationFilter::new(0.0, 1e9)
}

fn edges(data: &ChainData, selection: ChainSelection) -> Vec<(String, String, u64)> {
    let options = GraphOptions {
        selection,
        duration_filter: wide_filter(),
        ..Default::default()
    };
    build_call_graph(data, &FunctionTable::new(), &options)
        .edges
        .into_iter()
        .map(|edge| (edge.source, edge.target, edge.weight))
        .collect()
}

#[test]
fn test_recursive_call_gives_single_self_edge() {
    // A -> B -> B
    let chain = vec![
        call(0.0, 0xA),
        call(0.25, 0xB),
        call(0.5, 0xB),
        ret(0.75, 0xB),
        ret(1.0, 0xB),
        ret(1.25, 0xA),
    ];
    let data = ChainData::new(vec![chain], Vec::new());

    assert_eq!(
        edges(&data, ChainSelection::All),
        vec![
            ("receive_10".to_string(), "receive_11".to_string(), 1),
            ("receive_11".to_string(), "receive_11".to_string(), 1),
        ]
    );
}

#[test]
fn test_identical_chains_sum_edge_weights() {
    let pattern = vec![call(0.0, 1), call(0.5, 2), ret(1.0, 2), ret(1.5, 1)];
    let data = ChainData::new(vec![pattern.clone(), pattern], Vec::new());

    let all = aggregate_chains(&data, ChainSelection::All);
    assert_eq!(all.edge_weight(rx(1), rx(2)), Some(2));

    for index in 0..2 {
        let single = aggregate_chains(&data, ChainSelection::Index(index));
        assert_eq!(single.edge_weight(rx(1), rx(2)), Some(1));
    }

    assert!(aggregate_chains(&data, ChainSelection::Index(2)).is_empty());
}

#[test]
fn test_reference_sequence_durations() {
    let chain = vec![call(0.0, 1), call(0.001, 2), ret(0.002, 2), ret(0.003, 1)];
    let data = ChainData::new(vec![chain], Vec::new());

    let graph = build_call_graph(&data, &FunctionTable::new(), &GraphOptions::default());

    let inner = graph.node("receive_2").unwrap();
    let outer = graph.node("receive_1").unwrap();
    assert!((inner.avg_duration - 1000.0).abs() < 1e-6);
    assert!((outer.avg_duration - 3000.0).abs() < 1e-6);
    assert_eq!(inner.call_count, 1);
}

#[test]
fn test_duration_filter_drops_nodes_and_their_edges() {
    // avg(1) = 2_000_000us, avg(2) = 500_000us
    let chain = vec![call(1.0, 1), call(1.5, 2), ret(2.0, 2), ret(3.0, 1)];
    let data = ChainData::new(vec![chain], Vec::new());

    let options = GraphOptions {
        duration_filter: DurationFilter::new(1_000_000.0, 3_000_000.0),
        ..Default::default()
    };
    let graph = build_call_graph(&data, &FunctionTable::new(), &options);

    assert_eq!(graph.nodes.len(), 1);
    assert_eq!(graph.nodes[0].id, "receive_1");
    assert!(graph.edges.is_empty());
    assert_eq!(graph.subtitle, "Duration: 1000000-3000000μs | Nodes: 1 | Links: 0");
}

#[test]
fn test_directions_are_kept_apart() {
    let chain = vec![call(0.0, 1), call(0.25, 2), ret(0.5, 2), ret(0.75, 1)];
    let data = ChainData::new(vec![chain.clone()], vec![chain]);
    let options = GraphOptions {
        duration_filter: wide_filter(),
        ..Default::default()
    };

    let graph = build_call_graph(&data, &FunctionTable::new(), &options);

    assert_eq!(graph.nodes.len(), 4);
    assert_eq!(graph.edges_of_class(EdgeClass::Receive).count(), 1);
    assert_eq!(graph.edges_of_class(EdgeClass::Send).count(), 1);
    assert_eq!(graph.edges_of_class(EdgeClass::Mixed).count(), 0);
    assert!(graph.node("send_2").unwrap().style.color.starts_with("hsl(35, 85%"));
}

#[test]
fn test_labels_come_from_function_table() {
    let table: FunctionTable = [(
        1,
        FunctionInfo {
            name: "__netif_receive_skb_core".to_string(),
            ..Default::default()
        },
    )]
    .into_iter()
    .collect();
    let chain = vec![call(0.0, 1), ret(0.5, 1), call(0.75, 255), ret(1.0, 255)];
    let data = ChainData::new(vec![chain], Vec::new());

    let options = GraphOptions {
        duration_filter: wide_filter(),
        ..Default::default()
    };
    let graph = build_call_graph(&data, &table, &options);

    assert_eq!(graph.node("receive_1").unwrap().display_name, "__netif_receive_s...");
    assert_eq!(graph.node("receive_255").unwrap().display_name, "0xff");
}

#[test]
fn test_function_without_return_keeps_zero_average() {
    // 1 never returns; 2 runs for 2^-10 s = 976.5625us
    let chain = vec![call(0.0, 1), call(0.0009765625, 2), ret(0.001953125, 2)];
    let data = ChainData::new(vec![chain], Vec::new());

    let options = GraphOptions {
        duration_filter: DurationFilter::default(),
        ..Default::default()
    };
    let graph = build_call_graph(&data, &FunctionTable::new(), &options);

    let open = graph.node("receive_1").unwrap();
    assert_eq!(open.avg_duration, 0.0);
    assert_eq!(open.call_count, 1);
    assert_eq!(open.min_duration, None);

    assert_eq!(graph.node("receive_2").unwrap().avg_duration, 976.5625);
    assert_eq!(graph.edge("receive_1", "receive_2").map(|edge| edge.weight), Some(1));

    // The zero average stays out of the color scale
    assert_eq!(
        graph.color_scales[&Direction::Receive],
        ColorScale {
            min_duration: 976.5625,
            max_duration: 976.5625,
        }
    );
}

#[test]
fn test_empty_data_gives_empty_graph() {
    let graph = build_call_graph(&ChainData::default(), &FunctionTable::new(), &GraphOptions::default());
    assert!(graph.nodes.is_empty());
    assert!(graph.edges.is_empty());
}

#[test]
fn test_build_is_idempotent() {
    let chain = vec![call(0.0, 1), call(0.25, 2), ret(0.5, 2), call(0.6, 3), ret(0.7, 3), ret(1.0, 1)];
    let data = ChainData::new(vec![chain.clone()], vec![chain]);
    let options = GraphOptions {
        duration_filter: wide_filter(),
        ..Default::default()
    };

    assert_eq!(
        build_call_graph(&data, &FunctionTable::new(), &options),
        build_call_graph(&data, &FunctionTable::new(), &options)
    );
}
