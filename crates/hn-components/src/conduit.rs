//! Conduit model: a pipe or duct with fittings and valves, or a pseudo
//! conduit that imposes a fixed pressure difference.

use crate::common::{EPSILON_FLOW, check_finite, check_non_negative, check_positive};
use crate::cross_section::CrossSection;
use crate::error::{ComponentError, ComponentResult};
use crate::fittings::{FittingContext, FittingList, PipeFitting};
use crate::friction::{darcy_friction_factor, reynolds};
use crate::valve::{BalancingValve, ControlValve};
use hn_core::units::{Area, Length, Pressure, Velocity, VolumeRate, mps, pa};
use hn_fluids::PropertyPack;

/// Straight-run geometry of a pipe or duct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipeGeometry {
    pub length: Length,
    pub cross_section: CrossSection,
    /// Absolute wall roughness.
    pub roughness: Length,
}

impl PipeGeometry {
    pub fn new(
        length: Length,
        cross_section: CrossSection,
        roughness: Length,
    ) -> ComponentResult<Self> {
        check_positive(length.value, "conduit length")?;
        check_non_negative(roughness.value, "wall roughness")?;
        cross_section.validate()?;
        Ok(Self {
            length,
            cross_section,
            roughness,
        })
    }

    pub fn area(&self) -> Area {
        self.cross_section.area()
    }

    pub fn hydraulic_diameter(&self) -> Length {
        self.cross_section.hydraulic_diameter()
    }

    pub fn relative_roughness(&self) -> f64 {
        self.roughness.value / self.hydraulic_diameter().value
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConduitMode {
    Pipe(PipeGeometry),
    /// Imposed start→end pressure drop; negative values are a pressure rise
    /// (a pump or the source of the network).
    Pseudo { fixed_pressure_drop: Pressure },
}

/// Reporting tag for a conduit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConduitKind {
    Normal,
    FixedPressure,
    ControlValve,
    BalancingValve,
}

/// Pressure drop split by origin. Every part carries the sign of the flow,
/// except `fixed` which is the imposed drop of a pseudo conduit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PressureDropParts {
    pub friction: Pressure,
    pub fittings: Pressure,
    pub control_valve: Pressure,
    pub balancing_valve: Pressure,
    pub fixed: Pressure,
}

impl PressureDropParts {
    fn zero() -> Self {
        Self {
            friction: pa(0.0),
            fittings: pa(0.0),
            control_valve: pa(0.0),
            balancing_valve: pa(0.0),
            fixed: pa(0.0),
        }
    }

    pub fn total(&self) -> Pressure {
        self.friction + self.fittings + self.control_valve + self.balancing_valve + self.fixed
    }

    /// Everything except the balancing valve; what a balancing valve has to
    /// make up for.
    pub fn without_balancing_valve(&self) -> Pressure {
        self.total() - self.balancing_valve
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Conduit {
    mode: ConduitMode,
    pub design_flow_rate: VolumeRate,
    /// Current estimate, signed relative to the conduit's first loop.
    pub flow_rate: VolumeRate,
    fittings: FittingList,
    balancing_valve: Option<BalancingValve>,
    control_valve: Option<ControlValve>,
}

impl Conduit {
    /// Pipe conduit; the flow estimate starts at the design flow.
    pub fn pipe(geometry: PipeGeometry, design_flow_rate: VolumeRate) -> Self {
        Self {
            mode: ConduitMode::Pipe(geometry),
            design_flow_rate,
            flow_rate: design_flow_rate,
            fittings: FittingList::new(),
            balancing_valve: None,
            control_valve: None,
        }
    }

    pub fn pseudo(fixed_pressure_drop: Pressure, design_flow_rate: VolumeRate) -> Self {
        Self {
            mode: ConduitMode::Pseudo {
                fixed_pressure_drop,
            },
            design_flow_rate,
            flow_rate: design_flow_rate,
            fittings: FittingList::new(),
            balancing_valve: None,
            control_valve: None,
        }
    }

    pub fn mode(&self) -> &ConduitMode {
        &self.mode
    }

    pub fn geometry(&self) -> Option<&PipeGeometry> {
        match &self.mode {
            ConduitMode::Pipe(g) => Some(g),
            ConduitMode::Pseudo { .. } => None,
        }
    }

    pub fn is_pseudo(&self) -> bool {
        matches!(self.mode, ConduitMode::Pseudo { .. })
    }

    pub fn fixed_pressure_drop(&self) -> Option<Pressure> {
        match self.mode {
            ConduitMode::Pseudo {
                fixed_pressure_drop,
            } => Some(fixed_pressure_drop),
            ConduitMode::Pipe(_) => None,
        }
    }

    /// A control valve takes precedence over a balancing valve.
    pub fn kind(&self) -> ConduitKind {
        if self.is_pseudo() {
            ConduitKind::FixedPressure
        } else if self.control_valve.is_some() {
            ConduitKind::ControlValve
        } else if self.balancing_valve.is_some() {
            ConduitKind::BalancingValve
        } else {
            ConduitKind::Normal
        }
    }

    fn pipe_geometry(&self, what: &'static str) -> ComponentResult<&PipeGeometry> {
        self.geometry().ok_or(ComponentError::NotSupported { what })
    }

    // ---- fittings ----

    pub fn fittings(&self) -> &FittingList {
        &self.fittings
    }

    pub fn add_fitting(&mut self, zeta: f64, id: impl Into<String>) -> ComponentResult<()> {
        self.pipe_geometry("fittings on a pseudo conduit")?;
        self.fittings.push(zeta, id)
    }

    /// Evaluate a fitting model against this conduit at design flow and attach
    /// the resulting coefficient. Returns the coefficient.
    pub fn add_pipe_fitting(
        &mut self,
        fitting: &PipeFitting,
        id: impl Into<String>,
        props: &PropertyPack,
    ) -> ComponentResult<f64> {
        let ctx = self.fitting_context(props)?;
        let zeta = fitting.zeta(&ctx)?;
        self.add_fitting(zeta, id)?;
        Ok(zeta)
    }

    /// Geometry and design Reynolds number for fitting models.
    pub fn fitting_context(&self, props: &PropertyPack) -> ComponentResult<FittingContext> {
        let g = self.pipe_geometry("fittings on a pseudo conduit")?;
        Ok(FittingContext {
            diameter: g.hydraulic_diameter(),
            area: g.area(),
            roughness: g.roughness,
            reynolds: self.reynolds(props, self.design_flow_rate),
        })
    }

    // ---- valves ----

    pub fn balancing_valve(&self) -> Option<&BalancingValve> {
        self.balancing_valve.as_ref()
    }

    pub fn control_valve(&self) -> Option<&ControlValve> {
        self.control_valve.as_ref()
    }

    pub fn attach_balancing_valve(&mut self, valve: BalancingValve) -> ComponentResult<()> {
        self.pipe_geometry("balancing valve on a pseudo conduit")?;
        self.balancing_valve = Some(valve);
        Ok(())
    }

    pub fn attach_control_valve(&mut self, valve: ControlValve) -> ComponentResult<()> {
        self.pipe_geometry("control valve on a pseudo conduit")?;
        self.control_valve = Some(valve);
        Ok(())
    }

    fn control_valve_mut(&mut self) -> ComponentResult<&mut ControlValve> {
        self.control_valve.as_mut().ok_or(ComponentError::NotSupported {
            what: "conduit has no control valve",
        })
    }

    fn balancing_valve_mut(&mut self) -> ComponentResult<&mut BalancingValve> {
        self.balancing_valve
            .as_mut()
            .ok_or(ComponentError::NotSupported {
                what: "conduit has no balancing valve",
            })
    }

    pub fn set_control_valve_opening(&mut self, percent_open: f64) -> ComponentResult<()> {
        self.control_valve_mut()?.set_opening(percent_open)
    }

    pub fn set_control_valve_kvs(&mut self, kvs: f64) -> ComponentResult<()> {
        self.control_valve_mut()?.set_kvs(kvs)
    }

    pub fn set_balancing_valve_kvr(&mut self, kvr: f64) -> ComponentResult<()> {
        self.balancing_valve_mut()?.set_kvr(kvr)
    }

    pub fn set_balancing_valve_kvs(&mut self, kvs: f64) -> ComponentResult<()> {
        self.balancing_valve_mut()?.set_kvs(kvs)
    }

    // ---- flow quantities ----

    /// Mean velocity at `flow`; zero for pseudo conduits.
    pub fn velocity(&self, flow: VolumeRate) -> Velocity {
        match self.geometry() {
            Some(g) => mps(flow.value / g.area().value),
            None => mps(0.0),
        }
    }

    /// Reynolds number on the hydraulic diameter; zero for pseudo conduits.
    pub fn reynolds(&self, props: &PropertyPack, flow: VolumeRate) -> f64 {
        match self.geometry() {
            Some(g) => reynolds(
                self.velocity(flow).value,
                g.hydraulic_diameter().value,
                props.nu(),
            ),
            None => 0.0,
        }
    }

    /// `0.5·ρ·v²`.
    pub fn velocity_pressure(&self, props: &PropertyPack, flow: VolumeRate) -> Pressure {
        let v = self.velocity(flow).value;
        pa(0.5 * props.rho.value * v * v)
    }

    /// Darcy friction factor at `flow`; zero when the conduit is stagnant.
    pub fn friction_factor(&self, props: &PropertyPack, flow: VolumeRate) -> ComponentResult<f64> {
        let g = self.pipe_geometry("friction factor of a pseudo conduit")?;
        if flow.value.abs() < EPSILON_FLOW {
            return Ok(0.0);
        }
        darcy_friction_factor(self.reynolds(props, flow), g.relative_roughness())
    }

    /// Sum of fitting and valve coefficients at the current valve settings.
    pub fn zeta_total(&self) -> f64 {
        let Some(g) = self.geometry() else {
            return 0.0;
        };
        let area = g.area();
        self.fittings.zeta_total()
            + self.control_valve.as_ref().map_or(0.0, |v| v.zeta(area))
            + self.balancing_valve.as_ref().map_or(0.0, |v| v.zeta(area))
    }

    // ---- pressure drop ----

    pub fn pressure_drop_parts(
        &self,
        props: &PropertyPack,
        flow: VolumeRate,
    ) -> ComponentResult<PressureDropParts> {
        let mut parts = PressureDropParts::zero();
        let g = match &self.mode {
            ConduitMode::Pseudo {
                fixed_pressure_drop,
            } => {
                parts.fixed = *fixed_pressure_drop;
                return Ok(parts);
            }
            ConduitMode::Pipe(g) => g,
        };
        let q = check_finite(flow.value, "conduit flow rate")?;
        if q.abs() < EPSILON_FLOW {
            return Ok(parts);
        }

        let sign = q.signum();
        let area = g.area();
        let pv = sign * self.velocity_pressure(props, flow).value;
        let f = self.friction_factor(props, flow)?;

        parts.friction = pa(f * g.length.value / g.hydraulic_diameter().value * pv);
        parts.fittings = pa(self.fittings.zeta_total() * pv);
        if let Some(v) = &self.control_valve {
            parts.control_valve = pa(check_finite(v.zeta(area) * pv, "closed control valve")?);
        }
        if let Some(v) = &self.balancing_valve {
            parts.balancing_valve = pa(v.zeta(area) * pv);
        }
        check_finite(parts.total().value, "conduit pressure drop")?;
        Ok(parts)
    }

    /// Start→end pressure drop at `flow`, odd in `flow` for pipes; the fixed
    /// value for pseudo conduits.
    pub fn pressure_drop(
        &self,
        props: &PropertyPack,
        flow: VolumeRate,
    ) -> ComponentResult<Pressure> {
        Ok(self.pressure_drop_parts(props, flow)?.total())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::valve::ValveCharacteristic;
    use hn_core::units::{kgpm3, lps, m, mm, pas};
    use proptest::prelude::*;

    fn characteristics() -> impl Strategy<Value = ValveCharacteristic> {
        prop_oneof![
            Just(ValveCharacteristic::Linear),
            Just(ValveCharacteristic::Quadratic),
            (2.0_f64..100.0).prop_map(|r| ValveCharacteristic::EqualPercentage { rangeability: r }),
        ]
    }

    fn throttled_pipe(characteristic: ValveCharacteristic) -> Conduit {
        let g = PipeGeometry::new(m(4.0), CrossSection::circular(mm(16.0)), mm(0.0015)).unwrap();
        let mut c = Conduit::pipe(g, lps(0.1));
        c.attach_control_valve(ControlValve::new(1.2).unwrap().with_characteristic(characteristic))
            .unwrap();
        c
    }

    proptest! {
        #[test]
        fn closing_control_valve_raises_drop(
            characteristic in characteristics(),
            a in 0.5_f64..=100.0,
            b in 0.5_f64..=100.0,
            q_lps in 0.01_f64..0.5,
        ) {
            let (less, more) = if a <= b { (a, b) } else { (b, a) };
            let props = PropertyPack::new(kgpm3(988.0), pas(5.44e-4)).unwrap();
            let mut c = throttled_pipe(characteristic);

            c.set_control_valve_opening(more).unwrap();
            let open = c.pressure_drop_parts(&props, lps(q_lps)).unwrap();
            c.set_control_valve_opening(less).unwrap();
            let shut = c.pressure_drop_parts(&props, lps(q_lps)).unwrap();

            prop_assert!(shut.control_valve.value >= open.control_valve.value * (1.0 - 1e-12));
            prop_assert!(shut.total().value >= open.total().value * (1.0 - 1e-12));
            prop_assert_eq!(shut.friction, open.friction);
        }
    }
}
