//! # Hill regulation model
//!
//! Two-variable autonomous system describing a pair of self-activating genes
//! with linear decay:
//!
//! ```text
//! dx/dt = k * x^(1/alpha) / (b^(1/alpha) + x^(1/alpha)) - gamma1 * x
//! dy/dt = k * y^(1/alpha) / (b^(1/alpha) + y^(1/alpha)) - gamma2 * y
//! ```
//!
//! `alpha` is swept over many decades (1e-3 down to 1e-14), so the exponent
//! `1/alpha` can reach 1e14 and a naive `powf` overflows immediately. The
//! evaluator therefore clamps the state into [1e-20, 1e20] and computes every
//! fractional power as `exp(clamp(ln(v)/alpha, -700, 700))`; exp(709) is the
//! edge of the f64 range, so the clamped argument can never overflow.
//!
//! The evaluator is called by the integrators many times per step: it is a
//! pure function of (state, parameters), allocation-free and reentrant.

use serde::{Deserialize, Serialize};

/// lower bound applied to the state before the fractional power is taken
pub const STATE_FLOOR: f64 = 1e-20;
/// upper bound applied to the state before the fractional power is taken
pub const STATE_CEIL: f64 = 1e20;
/// bound on the argument of exp(..); exp(709) is the last finite f64 power
pub const EXP_ARG_BOUND: f64 = 700.0;

/// Physical parameters of one grid point. `b` and `k` are the Hill threshold
/// and production scale, both 1 in every sweep of record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HillParams {
    pub alpha: f64,
    pub gamma1: f64,
    pub gamma2: f64,
    pub b: f64,
    pub k: f64,
}

impl HillParams {
    pub fn new(alpha: f64, gamma1: f64, gamma2: f64) -> Self {
        HillParams {
            alpha,
            gamma1,
            gamma2,
            b: 1.0,
            k: 1.0,
        }
    }
}

/// v^(1/alpha) in log space with the exponent argument clamped into the
/// finite range of exp
#[inline]
pub fn pow_inv_alpha(v: f64, inv_alpha: f64) -> f64 {
    (v.ln() * inv_alpha).clamp(-EXP_ARG_BOUND, EXP_ARG_BOUND).exp()
}

/// Right-hand side of the system. Returns (dx/dt, dy/dt); finite for any
/// state after clamping and any alpha > 0.
#[inline]
pub fn hill_rhs(p: &HillParams, x: f64, y: f64) -> (f64, f64) {
    let inv_alpha = 1.0 / p.alpha;
    let x = x.clamp(STATE_FLOOR, STATE_CEIL);
    let y = y.clamp(STATE_FLOOR, STATE_CEIL);
    let bp = pow_inv_alpha(p.b, inv_alpha);
    let xp = pow_inv_alpha(x, inv_alpha);
    let yp = pow_inv_alpha(y, inv_alpha);
    let dx = p.k * xp / (bp + xp) - p.gamma1 * x;
    let dy = p.k * yp / (bp + yp) - p.gamma2 * y;
    (dx, dy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_alpha_one_is_plain_hill() {
        // alpha = 1 degenerates to x/(1+x) - gamma*x
        let p = HillParams::new(1.0, 0.25, 0.5);
        let (dx, dy) = hill_rhs(&p, 1.0, 1.0);
        assert_relative_eq!(dx, 0.5 - 0.25, epsilon = 1e-12);
        assert_relative_eq!(dy, 0.5 - 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_small_alpha_switches_hard() {
        // with 1/alpha = 1e6 the Hill term is a step function around x = b
        let p = HillParams::new(1e-6, 0.0, 0.0);
        let (dx_hi, _) = hill_rhs(&p, 2.0, 2.0);
        let (dx_lo, _) = hill_rhs(&p, 0.5, 0.5);
        assert_relative_eq!(dx_hi, 1.0, epsilon = 1e-9);
        assert_relative_eq!(dx_lo, 0.0, epsilon = 1e-9);
        // exactly at the threshold both powers are 1 and the term is 1/2
        let (dx_mid, _) = hill_rhs(&p, 1.0, 1.0);
        assert_relative_eq!(dx_mid, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_never_produces_nan_or_inf() {
        // alpha over [1e-14, 1], state over the full clamp box in decades
        let alphas: Vec<f64> = (0..15).map(|i| 10f64.powi(-i)).collect();
        let states: Vec<f64> = (-22..22).map(|e| 10f64.powi(e)).collect();
        for &alpha in &alphas {
            let p = HillParams::new(alpha, 1.0, 0.3);
            for &x in &states {
                for &y in &states {
                    let (dx, dy) = hill_rhs(&p, x, y);
                    assert!(dx.is_finite(), "dx not finite at alpha={alpha} x={x}");
                    assert!(dy.is_finite(), "dy not finite at alpha={alpha} y={y}");
                }
            }
        }
    }

    #[test]
    fn test_state_outside_box_is_clamped() {
        let p = HillParams::new(0.1, 0.0, 0.0);
        let (dx_in, dy_in) = hill_rhs(&p, STATE_CEIL, STATE_FLOOR);
        let (dx_out, dy_out) = hill_rhs(&p, 1e30, 1e-30);
        assert_relative_eq!(dx_in, dx_out);
        assert_relative_eq!(dy_in, dy_out);
    }

    #[test]
    fn test_pow_inv_alpha_saturates() {
        // ln(10) * 1e14 is far beyond the clamp; result must stay finite
        let huge = pow_inv_alpha(10.0, 1e14);
        let tiny = pow_inv_alpha(0.1, 1e14);
        assert!(huge.is_finite());
        assert!(tiny >= 0.0 && tiny.is_finite());
        assert_relative_eq!(huge, EXP_ARG_BOUND.exp());
    }
}
