//! Shared test networks.

#![allow(dead_code)]

use hn_components::{Conduit, CrossSection, PipeGeometry};
use hn_core::units::{degc, kpa, lps, m, mm, pa};
use hn_fluids::{FluidState, Water};
use hn_graph::{GraphBuilder, LoopSense};
use hn_solver::PipeNetwork;

pub const CROSS_OVERS: [&str; 4] = ["P5", "P6", "P7", "P8"];

pub fn water_state() -> FluidState {
    FluidState::new(pa(300_000.0), degc(50.0)).unwrap()
}

pub fn copper(length_m: f64, d_mm: f64, design_lps: f64) -> Conduit {
    let g = PipeGeometry::new(m(length_m), CrossSection::circular(mm(d_mm)), mm(0.0015)).unwrap();
    Conduit::pipe(g, lps(design_lps))
}

/// Two identical pipes in parallel between A and B, forming one loop.
/// The loop-relative flows start at 0.7 and -0.3 L/s, i.e. 1 L/s from A to B
/// split 0.7/0.3.
pub fn parallel_pipes() -> PipeNetwork {
    let mut b = GraphBuilder::new();
    let a = b.add_node("A");
    let z = b.add_node("B");
    let p1 = b.add_conduit("P1", a, z);
    let p2 = b.add_conduit("P2", a, z);
    b.assign_loops(p1, &["L1"], LoopSense::Clockwise).unwrap();
    b.assign_loops(p2, &["L1"], LoopSense::CounterClockwise)
        .unwrap();
    let graph = b.build().unwrap();

    PipeNetwork::new(
        "parallel",
        graph,
        vec![copper(10.0, 20.0, 0.7), copper(10.0, 20.0, -0.3)],
        Box::new(Water),
        water_state(),
        a,
        z,
    )
    .unwrap()
}

/// A pipe from S to R closed by a pseudo conduit with a 39 kPa pressure rise.
///
/// With `reversed`, the pseudo conduit is entered from S to R instead and
/// runs counter-clockwise, so its rise drives the loop the other way round.
pub fn pumped_loop(reversed: bool) -> PipeNetwork {
    let mut b = GraphBuilder::new();
    let s = b.add_node("S");
    let r = b.add_node("R");
    let pipe = b.add_conduit("P1", s, r);
    let pump = if reversed {
        b.add_conduit("P2", s, r)
    } else {
        b.add_conduit("P2", r, s)
    };
    b.assign_loops(pipe, &["L1"], LoopSense::Clockwise).unwrap();
    let sense = if reversed {
        LoopSense::CounterClockwise
    } else {
        LoopSense::Clockwise
    };
    b.assign_loops(pump, &["L1"], sense).unwrap();
    let graph = b.build().unwrap();

    PipeNetwork::new(
        "pumped",
        graph,
        vec![copper(50.0, 20.0, 0.2), Conduit::pseudo(kpa(-39.0), lps(0.2))],
        Box::new(Water),
        water_state(),
        s,
        r,
    )
    .unwrap()
}

/// Supply/return ladder with four cross-overs (P5..P8) feeding heat emitters,
/// and a pseudo conduit P13 standing in for the boiler pump.
pub fn ladder() -> PipeNetwork {
    let mut b = GraphBuilder::new();
    let s: Vec<_> = (0..5).map(|i| b.add_node(format!("S{i}"))).collect();
    let r: Vec<_> = (0..5).map(|i| b.add_node(format!("R{i}"))).collect();

    // name, from, to, loops, length [m], diameter [mm], design flow [L/s]
    let table = [
        ("P1", s[0], s[1], vec!["L1"], 10.0, 26.0, 0.4),
        ("P2", s[1], s[2], vec!["L2"], 10.0, 22.0, 0.3),
        ("P3", s[2], s[3], vec!["L3"], 10.0, 18.0, 0.2),
        ("P4", s[3], s[4], vec!["L4"], 10.0, 16.0, 0.1),
        ("P5", s[1], r[1], vec!["L1", "L2"], 4.0, 16.0, 0.1),
        ("P6", s[2], r[2], vec!["L2", "L3"], 4.0, 16.0, 0.1),
        ("P7", s[3], r[3], vec!["L3", "L4"], 4.0, 16.0, 0.1),
        ("P8", s[4], r[4], vec!["L4"], 4.0, 16.0, 0.1),
        ("P9", r[4], r[3], vec!["L4"], 10.0, 16.0, 0.1),
        ("P10", r[3], r[2], vec!["L3"], 10.0, 18.0, 0.2),
        ("P11", r[2], r[1], vec!["L2"], 10.0, 22.0, 0.3),
        ("P12", r[1], r[0], vec!["L1"], 10.0, 26.0, 0.4),
    ];

    let mut conduits = Vec::new();
    for (name, from, to, loops, length, d, q) in &table {
        let id = b.add_conduit(*name, *from, *to);
        b.assign_loops(id, loops, LoopSense::Clockwise).unwrap();
        conduits.push(copper(*length, *d, *q));
    }
    let pump = b.add_conduit("P13", r[0], s[0]);
    b.assign_loops(pump, &["L1"], LoopSense::Clockwise).unwrap();
    conduits.push(Conduit::pseudo(kpa(-39.0), lps(0.4)));

    let graph = b.build().unwrap();
    let mut network = PipeNetwork::new(
        "ladder",
        graph,
        conduits,
        Box::new(Water),
        water_state(),
        s[0],
        r[0],
    )
    .unwrap();
    for name in CROSS_OVERS {
        network.add_fitting(name, 4.5, "emitter").unwrap();
    }
    network
}

/// The ladder with a balancing valve (3 kPa fully open) on every cross-over.
pub fn ladder_with_balancing_valves() -> PipeNetwork {
    let mut network = ladder();
    for name in CROSS_OVERS {
        network.add_balancing_valve(name, kpa(3.0)).unwrap();
    }
    network
}
