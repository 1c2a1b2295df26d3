//! Control and balancing valves described by their flow coefficient.
//!
//! `Kv` is the flow in m³/h of water (1000 kg/m³) at a pressure drop of
//! 1 bar, so `ΔP[bar] = SG·(Q[m³/h]/Kv)²` with `SG = ρ/1000`.

use crate::common::check_positive;
use crate::error::{ComponentError, ComponentResult};
use hn_core::units::constants::{PA_PER_BAR, RHO_KV_REF, SECONDS_PER_HOUR};
use hn_core::units::{Area, Density, Pressure, VolumeRate, pa};

/// Loss coefficient equivalent to a flow coefficient in a conduit of `area`.
///
/// Independent of density: `ζ = 2·ΔP/(ρ·v²) = 200·(3600·A/Kv)²`.
pub fn kv_to_zeta(kv: f64, area: Area) -> f64 {
    if kv <= 0.0 {
        return f64::INFINITY;
    }
    200.0 * (SECONDS_PER_HOUR * area.value / kv).powi(2)
}

/// Pressure drop across a valve of coefficient `kv` at `flow`.
pub fn valve_pressure_drop(flow: VolumeRate, kv: f64, rho: Density) -> Pressure {
    let q_h = flow.value.abs() * SECONDS_PER_HOUR;
    let sg = rho.value / RHO_KV_REF;
    pa(PA_PER_BAR * sg * (q_h / kv).powi(2))
}

/// Flow coefficient that produces `dp` at `flow`: `Kv = Q·sqrt(SG/ΔP)`.
pub fn kv_for_pressure_drop(flow: VolumeRate, dp: Pressure, rho: Density) -> ComponentResult<f64> {
    let q_h = check_positive(flow.value.abs(), "valve design flow")? * SECONDS_PER_HOUR;
    let dp_bar = check_positive(dp.value, "valve pressure drop")? / PA_PER_BAR;
    let sg = rho.value / RHO_KV_REF;
    Ok(q_h * (sg / dp_bar).sqrt())
}

/// Inherent characteristic: relative Kv as a function of relative opening.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValveCharacteristic {
    Linear,
    Quadratic,
    /// `Kv/Kvs = R^(h-1)` above the minimum controllable opening.
    EqualPercentage { rangeability: f64 },
}

impl ValveCharacteristic {
    /// Openings below this fraction are not characterized by the
    /// manufacturer; there Kv falls linearly to zero.
    pub const MIN_OPENING: f64 = 0.02;

    pub fn equal_percentage(rangeability: f64) -> ComponentResult<Self> {
        if !(rangeability.is_finite() && rangeability > 1.0) {
            return Err(ComponentError::InvalidArg {
                what: "rangeability must exceed 1",
            });
        }
        Ok(ValveCharacteristic::EqualPercentage { rangeability })
    }

    /// `Kv/Kvs` at relative opening `h` in 0..=1.
    pub fn relative_kv(&self, h: f64) -> f64 {
        let h = h.clamp(0.0, 1.0);
        if h < Self::MIN_OPENING {
            return self.characterized(Self::MIN_OPENING) * h / Self::MIN_OPENING;
        }
        self.characterized(h)
    }

    fn characterized(&self, h: f64) -> f64 {
        match *self {
            ValveCharacteristic::Linear => h,
            ValveCharacteristic::Quadratic => h * h,
            ValveCharacteristic::EqualPercentage { rangeability } => rangeability.powf(h - 1.0),
        }
    }
}

/// Two-way control valve with a percent-open setting.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlValve {
    kvs: f64,
    opening_pct: f64,
    pub characteristic: ValveCharacteristic,
}

impl ControlValve {
    /// Fully open valve with a linear characteristic.
    pub fn new(kvs: f64) -> ComponentResult<Self> {
        Ok(Self {
            kvs: check_positive(kvs, "control valve Kvs")?,
            opening_pct: 100.0,
            characteristic: ValveCharacteristic::Linear,
        })
    }

    pub fn with_characteristic(mut self, characteristic: ValveCharacteristic) -> Self {
        self.characteristic = characteristic;
        self
    }

    pub fn kvs(&self) -> f64 {
        self.kvs
    }

    pub fn set_kvs(&mut self, kvs: f64) -> ComponentResult<()> {
        self.kvs = check_positive(kvs, "control valve Kvs")?;
        Ok(())
    }

    pub fn opening(&self) -> f64 {
        self.opening_pct
    }

    /// Set the opening in percent, 0..=100.
    pub fn set_opening(&mut self, percent_open: f64) -> ComponentResult<()> {
        if !(0.0..=100.0).contains(&percent_open) {
            return Err(ComponentError::InvalidArg {
                what: "valve opening must lie in 0..=100 %",
            });
        }
        self.opening_pct = percent_open;
        Ok(())
    }

    /// Flow coefficient at the current opening.
    pub fn kv(&self) -> f64 {
        self.kvs * self.characteristic.relative_kv(self.opening_pct / 100.0)
    }

    pub fn zeta(&self, area: Area) -> f64 {
        kv_to_zeta(self.kv(), area)
    }
}

/// Manual balancing valve: `Kvs` is the valve size, `Kvr` the preset.
#[derive(Debug, Clone, PartialEq)]
pub struct BalancingValve {
    kvs: f64,
    kvr: Option<f64>,
}

impl BalancingValve {
    pub fn new(kvs: f64) -> ComponentResult<Self> {
        Ok(Self {
            kvs: check_positive(kvs, "balancing valve Kvs")?,
            kvr: None,
        })
    }

    pub fn kvs(&self) -> f64 {
        self.kvs
    }

    /// Resize the valve; any preset is dropped.
    pub fn set_kvs(&mut self, kvs: f64) -> ComponentResult<()> {
        self.kvs = check_positive(kvs, "balancing valve Kvs")?;
        self.kvr = None;
        Ok(())
    }

    pub fn kvr(&self) -> Option<f64> {
        self.kvr
    }

    /// Preset the valve; `0 < kvr <= kvs`.
    pub fn set_kvr(&mut self, kvr: f64) -> ComponentResult<()> {
        check_positive(kvr, "balancing valve Kvr")?;
        if kvr > self.kvs {
            return Err(ComponentError::InvalidArg {
                what: "balancing valve Kvr exceeds Kvs",
            });
        }
        self.kvr = Some(kvr);
        Ok(())
    }

    /// Kv in use: the preset, or Kvs when the valve is still fully open.
    pub fn kv(&self) -> f64 {
        self.kvr.unwrap_or(self.kvs)
    }

    pub fn zeta(&self, area: Area) -> f64 {
        kv_to_zeta(self.kv(), area)
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn characteristics() -> impl Strategy<Value = ValveCharacteristic> {
        prop_oneof![
            Just(ValveCharacteristic::Linear),
            Just(ValveCharacteristic::Quadratic),
            (2.0_f64..100.0).prop_map(|r| ValveCharacteristic::EqualPercentage { rangeability: r }),
        ]
    }

    proptest! {
        #[test]
        fn relative_kv_monotonic(c in characteristics(), a in 0.0_f64..1.0, b in 0.0_f64..1.0) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(c.relative_kv(lo) <= c.relative_kv(hi));
        }

        #[test]
        fn full_open_is_one(c in characteristics()) {
            prop_assert!((c.relative_kv(1.0) - 1.0).abs() < 1e-12);
        }
    }
}
