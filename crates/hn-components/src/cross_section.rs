//! Conduit cross sections.

use std::f64::consts::PI;

use crate::common::check_positive;
use crate::error::{ComponentError, ComponentResult};
use hn_core::units::{Area, Length, m, m2};

/// Internal shape of a pipe or duct.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CrossSection {
    Circular { diameter: Length },
    Rectangular { width: Length, height: Length },
    /// Two semicircles of diameter `minor` joined by flat sides.
    FlatOval { major: Length, minor: Length },
}

impl CrossSection {
    pub fn circular(diameter: Length) -> Self {
        CrossSection::Circular { diameter }
    }

    pub fn rectangular(width: Length, height: Length) -> Self {
        CrossSection::Rectangular { width, height }
    }

    pub fn flat_oval(major: Length, minor: Length) -> Self {
        CrossSection::FlatOval { major, minor }
    }

    /// Check that all dimensions are positive and the oval is not inverted.
    pub fn validate(&self) -> ComponentResult<()> {
        match *self {
            CrossSection::Circular { diameter } => {
                check_positive(diameter.value, "diameter")?;
            }
            CrossSection::Rectangular { width, height } => {
                check_positive(width.value, "duct width")?;
                check_positive(height.value, "duct height")?;
            }
            CrossSection::FlatOval { major, minor } => {
                check_positive(major.value, "flat-oval major axis")?;
                check_positive(minor.value, "flat-oval minor axis")?;
                if minor.value > major.value {
                    return Err(ComponentError::InvalidArg {
                        what: "flat-oval minor axis exceeds major axis",
                    });
                }
            }
        }
        Ok(())
    }

    pub fn area(&self) -> Area {
        let a = match *self {
            CrossSection::Circular { diameter } => PI * diameter.value.powi(2) / 4.0,
            CrossSection::Rectangular { width, height } => width.value * height.value,
            CrossSection::FlatOval { major, minor } => {
                PI * minor.value.powi(2) / 4.0 + minor.value * (major.value - minor.value)
            }
        };
        m2(a)
    }

    /// Wetted perimeter.
    pub fn perimeter(&self) -> Length {
        let p = match *self {
            CrossSection::Circular { diameter } => PI * diameter.value,
            CrossSection::Rectangular { width, height } => 2.0 * (width.value + height.value),
            CrossSection::FlatOval { major, minor } => {
                PI * minor.value + 2.0 * (major.value - minor.value)
            }
        };
        m(p)
    }

    /// `4·A/P`; used for Reynolds number and friction.
    pub fn hydraulic_diameter(&self) -> Length {
        match *self {
            CrossSection::Circular { diameter } => diameter,
            _ => m(4.0 * self.area().value / self.perimeter().value),
        }
    }

    /// Diameter of the circular duct with the same friction loss at equal flow
    /// (Huebscher).
    pub fn equivalent_diameter(&self) -> Length {
        match *self {
            CrossSection::Circular { diameter } => diameter,
            CrossSection::Rectangular { width, height } => {
                let (a, b) = (width.value, height.value);
                m(1.30 * (a * b).powf(0.625) / (a + b).powf(0.25))
            }
            CrossSection::FlatOval { .. } => {
                m(1.55 * self.area().value.powf(0.625) / self.perimeter().value.powf(0.25))
            }
        }
    }
}
