//! 90° tees with diverging or converging flow.
//!
//! Coefficients follow Idelchik's diagrams for a tee whose straight passage
//! has the combined-leg cross section. The run coefficient is attached to the
//! combined leg, the branch coefficient to the branch leg.

use crate::common::check_positive;
use crate::error::{ComponentError, ComponentResult};
use hn_core::units::{Area, VolumeRate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeeFlow {
    /// Combined flow splits into straight run and branch.
    Diverging,
    /// Straight run and branch join into the combined leg.
    Converging,
}

/// Tee geometry and flow split.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tee {
    pub flow: TeeFlow,
    pub combined_area: Area,
    pub branch_area: Area,
    pub combined_flow: VolumeRate,
    pub branch_flow: VolumeRate,
}

/// Loss coefficients of a tee, each referenced to its own leg's velocity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeeCoefficients {
    /// Straight-run loss, attached to the combined leg.
    pub zeta_c: f64,
    /// Branch loss, attached to the branch leg.
    pub zeta_b: f64,
}

impl Tee {
    pub fn coefficients(&self) -> ComponentResult<TeeCoefficients> {
        let a_c = check_positive(self.combined_area.value, "tee combined area")?;
        let a_b = check_positive(self.branch_area.value, "tee branch area")?;
        let q_c = self.combined_flow.value.abs();
        let q_b = self.branch_flow.value.abs();
        check_positive(q_c, "tee combined flow")?;
        check_positive(q_b, "tee branch flow")?;
        if q_b > q_c {
            return Err(ComponentError::InvalidArg {
                what: "tee branch flow exceeds combined flow",
            });
        }

        let q = q_b / q_c;
        // branch-to-combined velocity ratio
        let w_ratio = q * a_c / a_b;

        let (zeta_run, zeta_branch_c) = match self.flow {
            TeeFlow::Diverging => {
                let a = if w_ratio <= 0.8 { 1.0 } else { 0.9 };
                // straight passage keeps the combined area, so w_s/w_c = 1 - q
                let run = 0.4 * q * q;
                (run, a * (1.0 + w_ratio.powi(2)))
            }
            TeeFlow::Converging => {
                let run = 1.55 * q - q * q;
                (run, 1.0 + w_ratio.powi(2) - 2.0 * (1.0 - q).powi(2))
            }
        };

        // re-reference the branch coefficient from combined to branch velocity
        let zeta_b = zeta_branch_c.max(0.0) / w_ratio.powi(2);
        Ok(TeeCoefficients {
            zeta_c: zeta_run.max(0.0),
            zeta_b,
        })
    }
}
