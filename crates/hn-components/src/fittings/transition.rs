//! Gradual reducers and enlargers (Crane TP-410 cone formulas).

use crate::common::{check_non_negative, check_positive};
use crate::error::{ComponentError, ComponentResult};
use hn_core::units::Length;

/// Included cone angle [rad] from the diameter change over `length`.
/// A zero length is a sudden change (180°).
fn cone_angle(d_large: f64, d_small: f64, length: f64) -> f64 {
    if length == 0.0 {
        std::f64::consts::PI
    } else {
        2.0 * ((d_large - d_small) / (2.0 * length)).atan()
    }
}

fn diameters(
    d_large: Length,
    d_small: Length,
    length: Length,
) -> ComponentResult<(f64, f64, f64)> {
    let dl = check_positive(d_large.value, "large diameter")?;
    let ds = check_positive(d_small.value, "small diameter")?;
    let len = check_non_negative(length.value, "transition length")?;
    if ds > dl {
        return Err(ComponentError::InvalidArg {
            what: "small diameter exceeds large diameter",
        });
    }
    Ok((dl, ds, len))
}

/// Flow goes from the large to the small diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reducer {
    pub d_large: Length,
    pub d_small: Length,
    pub length: Length,
}

impl Reducer {
    /// Coefficient referenced to the velocity in the small (downstream) conduit.
    pub fn zeta_small(&self) -> ComponentResult<f64> {
        let (dl, ds, len) = diameters(self.d_large, self.d_small, self.length)?;
        let beta2 = (ds / dl).powi(2);
        let half = 0.5 * cone_angle(dl, ds, len);
        let k = if half <= std::f64::consts::FRAC_PI_8 {
            0.8 * half.sin() * (1.0 - beta2)
        } else {
            0.5 * (1.0 - beta2) * half.sin().sqrt()
        };
        Ok(k.max(0.0))
    }
}

/// Flow goes from the small to the large diameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Enlarger {
    pub d_small: Length,
    pub d_large: Length,
    pub length: Length,
}

impl Enlarger {
    /// Coefficient referenced to the velocity in the small (upstream) conduit.
    pub fn zeta_small(&self) -> ComponentResult<f64> {
        let (dl, ds, len) = diameters(self.d_large, self.d_small, self.length)?;
        let beta2 = (ds / dl).powi(2);
        let half = 0.5 * cone_angle(dl, ds, len);
        let k = if half <= std::f64::consts::FRAC_PI_8 {
            2.6 * half.sin() * (1.0 - beta2).powi(2)
        } else {
            (1.0 - beta2).powi(2)
        };
        Ok(k.max(0.0))
    }

    /// Coefficient referenced to the velocity in the large (downstream) conduit.
    pub fn zeta_large(&self) -> ComponentResult<f64> {
        let beta = self.d_small.value / self.d_large.value;
        Ok(self.zeta_small()? / beta.powi(4))
    }
}
