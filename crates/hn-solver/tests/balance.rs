//! Valve sizing, design-point balancing and the derived tables.

mod common;

use common::{CROSS_OVERS, ladder, ladder_with_balancing_valves};
use hn_components::ConduitKind;
use hn_core::units::{kpa, m3ps, pa};
use hn_solver::report::{
    balancing_valve_table, conduit_table, control_valve_table, fitting_table, flow_path_table,
    hydraulic_resistance,
};
use hn_solver::{FlowBasis, SolverError, SystemCurve, ValvePosition};

fn on_path(label: &str, conduit: &str) -> bool {
    label.split('-').any(|c| c == conduit)
}

#[test]
fn balanced_ladder_has_no_path_deficit() {
    let mut network = ladder_with_balancing_valves();
    let report = network.balance_network_at_design().unwrap();

    assert_eq!(report.settings.len(), 4);
    let rows = flow_path_table(&network, FlowBasis::Design).unwrap();
    assert_eq!(rows.len(), 4);
    for row in &rows {
        assert!(row.dp_deficit.value.abs() < 1.0, "{}: {:?}", row.path, row.dp_deficit);
        assert!((row.dp_total.value - report.reference_loss.value).abs() < 1.0);
    }

    for name in CROSS_OVERS {
        let valve = network
            .conduit_by_name(name)
            .unwrap()
            .balancing_valve()
            .unwrap();
        let kvr = valve.kvr().unwrap();
        if on_path(&report.critical_path, name) {
            assert_eq!(kvr, valve.kvs());
        } else {
            assert!(kvr < valve.kvs());
        }
    }
}

#[test]
fn farthest_cross_over_is_critical() {
    let mut network = ladder_with_balancing_valves();
    let report = network.balance_network_at_design().unwrap();
    assert_eq!(report.critical_path, "P1-P2-P3-P4-P8-P9-P10-P11-P12");

    // the nearest cross-over is throttled hardest
    let kvr = |name: &str| report.settings[name];
    assert!(kvr("P5") < kvr("P6"));
    assert!(kvr("P6") < kvr("P7"));
}

#[test]
fn rebalancing_is_stable() {
    let mut network = ladder_with_balancing_valves();
    let first = network.balance_network_at_design().unwrap();
    let second = network.balance_network_at_design().unwrap();
    assert_eq!(first.critical_path, second.critical_path);
    for (name, kvr) in &first.settings {
        assert!((kvr - second.settings[name]).abs() < 1e-9 * kvr);
    }
}

#[test]
fn smaller_valve_moves_the_critical_path() {
    let mut network = ladder_with_balancing_valves();
    // next smaller size: 8 kPa instead of 3 kPa fully open
    let kvs = network
        .conduit_by_name("P7")
        .unwrap()
        .balancing_valve()
        .unwrap()
        .kvs()
        * (3.0_f64 / 8.0).sqrt();
    network.set_balancing_valve_kvs("P7", kvs).unwrap();

    let (open, _) = network
        .heaviest_path(FlowBasis::Design, ValvePosition::FullyOpen)
        .unwrap()
        .unwrap();
    let (preset, _) = network.critical_path(FlowBasis::Design).unwrap().unwrap();
    assert_eq!(open, preset);
    assert_eq!(open.label(network.graph()), "P1-P2-P3-P7-P10-P11-P12");

    let report = network.balance_network_at_design().unwrap();
    assert_eq!(report.critical_path, "P1-P2-P3-P7-P10-P11-P12");
    assert_eq!(report.settings["P7"], kvs);
    for name in ["P5", "P6", "P8"] {
        let valve = network
            .conduit_by_name(name)
            .unwrap()
            .balancing_valve()
            .unwrap();
        assert!(report.settings[name] < valve.kvs(), "{name}");
    }
    for row in flow_path_table(&network, FlowBasis::Design).unwrap() {
        assert!(row.dp_deficit.value.abs() < 1.0, "{}: {:?}", row.path, row.dp_deficit);
        assert!((row.dp_total.value - report.reference_loss.value).abs() < 1.0);
    }
}

#[test]
fn shared_valve_that_cannot_serve_both_paths_is_infeasible() {
    let mut network = ladder();
    // P5 carries the critical path; P3 is the only valve of the P8 path and
    // also sits on the P7 path.
    network.add_balancing_valve("P5", kpa(60.0)).unwrap();
    network.add_balancing_valve("P3", kpa(3.0)).unwrap();
    network.add_balancing_valve("P7", kpa(20.0)).unwrap();

    let err = network.balance_network_at_design().unwrap_err();
    match &err {
        SolverError::InfeasibleBalancing { what } => {
            assert!(what.contains("valve P7"), "{what}");
            assert!(what.contains("P1-P2-P3-P7-P10-P11-P12"), "{what}");
        }
        other => panic!("unexpected error: {other}"),
    }

    // a failed balance leaves every valve untouched
    for name in ["P3", "P5", "P7"] {
        let valve = network
            .conduit_by_name(name)
            .unwrap()
            .balancing_valve()
            .unwrap();
        assert_eq!(valve.kvr(), None);
    }
}

#[test]
fn path_without_own_valve_is_infeasible() {
    let mut network = ladder();
    for name in ["P5", "P7", "P8"] {
        network.add_balancing_valve(name, kpa(3.0)).unwrap();
    }
    let err = network.balance_network_at_design().unwrap_err();
    match err {
        SolverError::InfeasibleBalancing { what } => {
            assert!(what.contains("P1-P2-P6-P11-P12"), "{what}");
            assert!(what.contains("no balancing valve"), "{what}");
        }
        other => panic!("unexpected error: {other}"),
    }
    for name in ["P5", "P7", "P8"] {
        let c = network.conduit_by_name(name).unwrap();
        assert_eq!(c.balancing_valve().unwrap().kvr(), None);
    }
}

#[test]
fn target_authority_must_be_a_fraction() {
    let mut network = ladder();
    for a in [0.0, 1.0, 1.5, -0.2, f64::NAN] {
        assert!(matches!(
            network.add_control_valve("P5", a),
            Err(SolverError::InvalidTargetAuthority { .. })
        ));
    }
    assert!(network.conduit_by_name("P5").unwrap().control_valve().is_none());
}

#[test]
fn control_valve_meets_its_target_authority() {
    let mut network = ladder();
    let (_, before) = network.critical_path(FlowBasis::Design).unwrap().unwrap();
    let kvs = network.add_control_valve("P8", 0.5).unwrap();
    assert!(kvs > 0.0);

    // the valve sits on the critical path, so it takes half of the new loss
    let rows = control_valve_table(&network).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].conduit, "P8");
    assert!((rows[0].pressure_drop.value - before.value).abs() < 1e-6 * before.value);
    assert!((rows[0].authority - 0.5).abs() < 1e-9);
}

#[test]
fn pump_sees_quadratic_system_curve() {
    let mut network = ladder_with_balancing_valves();
    let report = network.balance_network_at_design().unwrap();

    let q = network.inflow(FlowBasis::Design);
    let r = hydraulic_resistance(&network, FlowBasis::Design).unwrap();
    assert!((r * q.value * q.value - report.reference_loss.value).abs() < 1.0);

    let curve = SystemCurve::of(&network, FlowBasis::Design).unwrap();
    let points = curve.points(q * 2.0, 4);
    assert_eq!(points.len(), 5);
    assert_eq!(points[0].1, pa(0.0));
    assert!((points[2].1.value - report.reference_loss.value).abs() < 1.0);
    assert!((points[4].1.value / points[2].1.value - 4.0).abs() < 1e-9);
}

#[test]
fn analysed_resistance_matches_source_rise() {
    let mut network = ladder();
    for name in CROSS_OVERS {
        network.add_control_valve(name, 0.5).unwrap();
    }
    let rise = 39_000.0;

    network.analyze(pa(0.01), 500).unwrap();
    let q1 = network.inflow(FlowBasis::Current).value;
    let r1 = hydraulic_resistance(&network, FlowBasis::Current).unwrap();
    assert!((r1 * q1 * q1 - rise).abs() < 1.0, "R1 = {r1:e}");

    for name in ["P6", "P7"] {
        network.set_control_valve_opening(name, 50.0).unwrap();
    }
    network.analyze(pa(0.01), 500).unwrap();
    let q2 = network.inflow(FlowBasis::Current).value;
    let curve = SystemCurve::of(&network, FlowBasis::Current).unwrap();
    assert!((curve.pressure(m3ps(q2)).value - rise).abs() < 1.0);

    // throttling steepens the curve and cuts the supply flow
    assert!(curve.resistance > r1);
    assert!(q2 < q1);
}

#[test]
fn tables_list_every_part() {
    let mut network = ladder_with_balancing_valves();
    network.balance_network_at_design().unwrap();

    let conduits = conduit_table(&network).unwrap();
    assert_eq!(conduits.len(), 13);
    let pump = conduits.iter().find(|r| r.name == "P13").unwrap();
    assert_eq!(pump.kind, ConduitKind::FixedPressure);
    assert_eq!(pump.total, kpa(-39.0));
    let p5 = conduits.iter().find(|r| r.name == "P5").unwrap();
    assert_eq!(p5.kind, ConduitKind::BalancingValve);
    assert_eq!(p5.start_node, "S1");
    assert_eq!(p5.end_node, "R1");

    let fittings = fitting_table(&network).unwrap();
    assert_eq!(fittings.len(), 4);
    assert!(fittings.iter().all(|f| f.id == "emitter" && f.zeta == 4.5));

    let valves = balancing_valve_table(&network).unwrap();
    assert_eq!(valves.len(), 4);
    assert!(valves.iter().all(|v| v.kvr.is_some()));
}
