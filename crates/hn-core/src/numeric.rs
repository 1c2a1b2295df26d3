use crate::HnError;

/// Floating point type used throughout the workspace.
pub type Real = f64;

/// Absolute/relative tolerance pair.
#[derive(Clone, Copy, Debug)]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-12,
            rel: 1e-9,
        }
    }
}

pub fn nearly_equal(a: Real, b: Real, tol: Tolerances) -> bool {
    let diff = (a - b).abs();
    if diff <= tol.abs {
        return true;
    }
    diff <= tol.rel * a.abs().max(b.abs())
}

pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, HnError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(HnError::NonFinite { what, value: v })
    }
}

/// Sign of `v` with zero mapped to zero (unlike `f64::signum`).
pub fn sign(v: Real) -> Real {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Bisection on a monotonic function over `[lo, hi]`.
///
/// `f` must change sign over the bracket. Stops when the bracket is narrower
/// than `x_tol` or after `max_iter` halvings and returns the midpoint.
pub fn bisect<F>(
    mut f: F,
    mut lo: Real,
    mut hi: Real,
    x_tol: Real,
    max_iter: usize,
) -> Result<Real, HnError>
where
    F: FnMut(Real) -> Real,
{
    let mut f_lo = ensure_finite(f(lo), "bisection lower bound")?;
    let f_hi = ensure_finite(f(hi), "bisection upper bound")?;
    if f_lo == 0.0 {
        return Ok(lo);
    }
    if f_hi == 0.0 {
        return Ok(hi);
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(HnError::NoRootInBracket { lo, hi });
    }

    for _ in 0..max_iter {
        let mid = 0.5 * (lo + hi);
        let f_mid = ensure_finite(f(mid), "bisection midpoint")?;
        if f_mid == 0.0 || (hi - lo).abs() < x_tol {
            return Ok(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Ok(0.5 * (lo + hi))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn bisect_inverts_cubic(target in -50.0_f64..50.0) {
            let root = bisect(|x| x * x * x - target, -10.0, 10.0, 1e-12, 200).unwrap();
            prop_assert!((root.powi(3) - target).abs() < 1e-6);
        }
    }
}
