//! Integration tests for hn-graph.

use hn_graph::{Graph, GraphBuilder, GraphError, LoopSense, PortKind};

/// Two-pipe supply/return ladder with four cross-overs and a pseudo conduit
/// closing the first loop.
fn ladder() -> Graph {
    let mut b = GraphBuilder::new();
    let s: Vec<_> = (0..5).map(|i| b.add_node(format!("S{i}"))).collect();
    let r: Vec<_> = (0..5).map(|i| b.add_node(format!("R{i}"))).collect();

    let p1 = b.add_conduit("P1", s[0], s[1]);
    let p2 = b.add_conduit("P2", s[1], s[2]);
    let p3 = b.add_conduit("P3", s[2], s[3]);
    let p4 = b.add_conduit("P4", s[3], s[4]);
    let p5 = b.add_conduit("P5", s[1], r[1]);
    let p6 = b.add_conduit("P6", s[2], r[2]);
    let p7 = b.add_conduit("P7", s[3], r[3]);
    let p8 = b.add_conduit("P8", s[4], r[4]);
    let p9 = b.add_conduit("P9", r[4], r[3]);
    let p10 = b.add_conduit("P10", r[3], r[2]);
    let p11 = b.add_conduit("P11", r[2], r[1]);
    let p12 = b.add_conduit("P12", r[1], r[0]);
    let p13 = b.add_conduit("P13", r[0], s[0]);

    let cw = LoopSense::Clockwise;
    for (c, loops) in [
        (p1, vec!["L1"]),
        (p2, vec!["L2"]),
        (p3, vec!["L3"]),
        (p4, vec!["L4"]),
        (p5, vec!["L1", "L2"]),
        (p6, vec!["L2", "L3"]),
        (p7, vec!["L3", "L4"]),
        (p8, vec!["L4"]),
        (p9, vec!["L4"]),
        (p10, vec!["L3"]),
        (p11, vec!["L2"]),
        (p12, vec!["L1"]),
        (p13, vec!["L1"]),
    ] {
        b.assign_loops(c, &loops, cw).unwrap();
    }
    b.build().unwrap()
}

#[test]
fn ladder_topology() {
    let graph = ladder();
    assert_eq!(graph.nodes().len(), 10);
    assert_eq!(graph.conduits().len(), 13);
    assert_eq!(graph.ports().len(), 26);

    let names: Vec<&str> = graph.loops().iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["L1", "L2", "L3", "L4"]);

    let l1 = &graph.loops()[0];
    assert_eq!(l1.members.len(), 4);
    assert!(l1.members.iter().all(|m| m.sign == 1.0));
}

#[test]
fn shared_conduit_negated_in_second_loop() {
    let graph = ladder();
    let p5 = graph.conduit_by_name("P5").unwrap();
    let l1 = graph.loop_by_name("L1").unwrap();
    let l2 = graph.loop_by_name("L2").unwrap();

    let edge = graph.conduit(p5).unwrap();
    assert_eq!(edge.sign_in(l1), Some(1.0));
    assert_eq!(edge.sign_in(l2), Some(-1.0));

    let member = graph
        .loop_by_id(l2)
        .unwrap()
        .members
        .iter()
        .find(|m| m.conduit == p5)
        .unwrap();
    assert_eq!(member.sign, -1.0);
}

#[test]
fn node_adjacency_and_ends() {
    let graph = ladder();
    let s1 = graph.node_by_name("S1").unwrap();
    // P1 arrives, P2 and P5 leave
    let ports = graph.node_ports(s1);
    assert_eq!(ports.len(), 3);
    let leaving = ports
        .iter()
        .filter(|&&p| graph.port(p).unwrap().kind == PortKind::Start)
        .count();
    assert_eq!(leaving, 2);

    let p13 = graph.conduit_by_name("P13").unwrap();
    assert_eq!(graph.start_node(p13), graph.node_by_name("R0"));
    assert_eq!(graph.end_node(p13), graph.node_by_name("S0"));
}

#[test]
fn ladder_flow_paths_exclude_pseudo_conduit() {
    let graph = ladder();
    let s0 = graph.node_by_name("S0").unwrap();
    let r0 = graph.node_by_name("R0").unwrap();
    let p13 = graph.conduit_by_name("P13").unwrap();

    let paths = graph.flow_paths(s0, r0, |c| c != p13);
    let labels: Vec<String> = paths.iter().map(|p| p.label(&graph)).collect();
    assert_eq!(
        labels,
        vec![
            "P1-P2-P3-P4-P8-P9-P10-P11-P12",
            "P1-P2-P3-P7-P10-P11-P12",
            "P1-P2-P6-P11-P12",
            "P1-P5-P12",
        ]
    );
}

#[test]
fn open_loop_is_rejected() {
    let mut b = GraphBuilder::new();
    let a = b.add_node("A");
    let c = b.add_node("B");
    let p1 = b.add_conduit("P1", a, c);
    let p2 = b.add_conduit("P2", a, c);
    // both run A->B, so with equal sense they cannot close a loop
    b.assign_loops(p1, &["L1"], LoopSense::Clockwise).unwrap();
    b.assign_loops(p2, &["L1"], LoopSense::Clockwise).unwrap();

    let err = b.build().unwrap_err();
    assert!(matches!(err, GraphError::OpenLoop { ref loop_name, .. } if loop_name == "L1"));
}

#[test]
fn reversed_conduit_closes_with_counter_clockwise_sense() {
    let mut b = GraphBuilder::new();
    let a = b.add_node("A");
    let c = b.add_node("B");
    let p1 = b.add_conduit("P1", a, c);
    let p2 = b.add_conduit("P2", a, c);
    b.assign_loops(p1, &["L1"], LoopSense::Clockwise).unwrap();
    b.assign_loops(p2, &["L1"], LoopSense::CounterClockwise)
        .unwrap();

    let graph = b.build().unwrap();
    assert_eq!(graph.orientation(p2), -1.0);
}

#[test]
fn duplicate_conduit_name_rejected() {
    let mut b = GraphBuilder::new();
    let a = b.add_node("A");
    let c = b.add_node("B");
    b.add_conduit("P1", a, c);
    b.add_conduit("P1", c, a);
    let err = b.build().unwrap_err();
    assert!(matches!(err, GraphError::DuplicateName { what: "conduit", .. }));
}
