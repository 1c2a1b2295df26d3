//! Integration tests for hn-components with real fluid models.

use hn_components::fittings::STANDARD_ELBOW_ELR;
use hn_components::{
    BalancingValve, Conduit, ControlValve, CrossSection, PipeFitting, PipeGeometry, Tee, TeeFlow,
    ValveCharacteristic,
};
use hn_core::units::{degc, lps, m, mm, pa};
use hn_fluids::{FluidModel, FluidState, PropertyPack, Water};
use proptest::prelude::*;

fn water_50c() -> PropertyPack {
    let state = FluidState::new(pa(300_000.0), degc(50.0)).unwrap();
    Water.property_pack(&state).unwrap()
}

fn copper_pipe(length_m: f64, d_mm: f64, design_lps: f64) -> Conduit {
    let g = PipeGeometry::new(
        m(length_m),
        CrossSection::circular(mm(d_mm)),
        mm(0.0015),
    )
    .unwrap();
    Conduit::pipe(g, lps(design_lps))
}

#[test]
fn heating_branch_pressure_drop_is_plausible() {
    let props = water_50c();
    let mut c = copper_pipe(20.0, 16.0, 0.1);
    c.add_pipe_fitting(
        &PipeFitting::EquivalentLength(STANDARD_ELBOW_ELR),
        "elbow-1",
        &props,
    )
    .unwrap();
    let parts = c.pressure_drop_parts(&props, lps(0.1)).unwrap();

    // 0.1 L/s in 16 mm is about 0.5 m/s, a few hundred Pa per metre at most
    let v = c.velocity(lps(0.1)).value;
    assert!((v - 0.497).abs() < 0.01, "v = {v}");
    assert!(parts.friction.value > 20.0 * 50.0 && parts.friction.value < 20.0 * 400.0);
    assert!(parts.fittings.value > 0.0);
}

#[test]
fn tee_coefficients_attach_to_both_legs() {
    let props = water_50c();
    let mut run = copper_pipe(5.0, 22.0, 0.3);
    let mut branch = copper_pipe(5.0, 16.0, 0.1);
    let tee = Tee {
        flow: TeeFlow::Diverging,
        combined_area: run.geometry().unwrap().area(),
        branch_area: branch.geometry().unwrap().area(),
        combined_flow: lps(0.3),
        branch_flow: lps(0.1),
    };
    let k = tee.coefficients().unwrap();
    run.add_fitting(k.zeta_c, "tee-S1").unwrap();
    branch.add_fitting(k.zeta_b, "tee-S1").unwrap();

    let before = copper_pipe(5.0, 16.0, 0.1)
        .pressure_drop(&props, lps(0.1))
        .unwrap();
    let after = branch.pressure_drop(&props, lps(0.1)).unwrap();
    assert!(after > before);
}

#[test]
fn cross_over_carries_both_valves() {
    let props = water_50c();
    let mut c = copper_pipe(10.0, 16.0, 0.1);
    c.attach_balancing_valve(BalancingValve::new(1.6).unwrap())
        .unwrap();
    c.attach_control_valve(ControlValve::new(1.0).unwrap())
        .unwrap();
    let parts = c.pressure_drop_parts(&props, lps(0.1)).unwrap();
    assert!(parts.control_valve.value > parts.balancing_valve.value);
    let sum = parts.friction + parts.fittings + parts.control_valve + parts.balancing_valve;
    assert!((parts.total() - sum).value.abs() < 1e-9);
}

proptest! {
    #[test]
    fn closing_control_valve_never_lowers_drop(
        a in 1.0_f64..100.0,
        b in 1.0_f64..100.0,
        rangeability in 5.0_f64..80.0,
        q in 0.01_f64..0.5,
    ) {
        let props = water_50c();
        let (small, large) = if a <= b { (a, b) } else { (b, a) };
        let mut c = copper_pipe(10.0, 16.0, q);
        let valve = ControlValve::new(2.5)
            .unwrap()
            .with_characteristic(ValveCharacteristic::EqualPercentage { rangeability });
        c.attach_control_valve(valve).unwrap();

        c.set_control_valve_opening(large).unwrap();
        let open = c.pressure_drop(&props, lps(q)).unwrap();
        c.set_control_valve_opening(small).unwrap();
        let closed = c.pressure_drop(&props, lps(q)).unwrap();
        prop_assert!(closed.value >= open.value);
    }
}
