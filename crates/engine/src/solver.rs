//! Adaptive Dormand-Prince 5(4) integration for the two-zone ODE system.
//!
//! The method is explicit. Under strong heat release the zone equations
//! stiffen and the controller answers with very small steps; the step
//! budget then ends the episode as an integration failure rather than
//! stalling.

use crate::error::EngineError;

/// Tolerances and step budget for one integration call.
#[derive(Clone, Copy, Debug)]
pub struct OdeOptions {
    pub atol: f64,
    pub rtol: f64,
    pub max_steps: usize,
}

impl Default for OdeOptions {
    fn default() -> Self {
        Self {
            atol: 1e-8,
            rtol: 1e-4,
            max_steps: 100_000,
        }
    }
}

// Dormand-Prince 5(4) tableau.
const A2: [f64; 1] = [1.0 / 5.0];
const A3: [f64; 2] = [3.0 / 40.0, 9.0 / 40.0];
const A4: [f64; 3] = [44.0 / 45.0, -56.0 / 15.0, 32.0 / 9.0];
const A5: [f64; 4] = [
    19372.0 / 6561.0,
    -25360.0 / 2187.0,
    64448.0 / 6561.0,
    -212.0 / 729.0,
];
const A6: [f64; 5] = [
    9017.0 / 3168.0,
    -355.0 / 33.0,
    46732.0 / 5247.0,
    49.0 / 176.0,
    -5103.0 / 18656.0,
];
const B: [f64; 6] = [
    35.0 / 384.0,
    0.0,
    500.0 / 1113.0,
    125.0 / 192.0,
    -2187.0 / 6784.0,
    11.0 / 84.0,
];
// Fifth-order minus embedded fourth-order weights.
const E: [f64; 7] = [
    35.0 / 384.0 - 5179.0 / 57600.0,
    0.0,
    500.0 / 1113.0 - 7571.0 / 16695.0,
    125.0 / 192.0 - 393.0 / 640.0,
    -2187.0 / 6784.0 + 92097.0 / 339_200.0,
    11.0 / 84.0 - 187.0 / 2100.0,
    -1.0 / 40.0,
];
const C: [f64; 6] = [1.0 / 5.0, 3.0 / 10.0, 4.0 / 5.0, 8.0 / 9.0, 1.0, 1.0];

const SAFETY: f64 = 0.9;
const MIN_SCALE: f64 = 0.2;
const MAX_SCALE: f64 = 5.0;

/// Integrates `dy/dt = rhs(t, y)` from `t0` to `t1` with adaptive stepping.
///
/// The right-hand side is fallible; any error it reports aborts the
/// integration immediately. Exhausting the step budget or collapsing the
/// step size below machine resolution is an [`EngineError::Integration`].
pub fn integrate<const N: usize, F>(
    mut rhs: F,
    t0: f64,
    t1: f64,
    y0: [f64; N],
    opts: &OdeOptions,
) -> Result<[f64; N], EngineError>
where
    F: FnMut(f64, &[f64; N]) -> Result<[f64; N], EngineError>,
{
    if t1 <= t0 {
        return Ok(y0);
    }
    let mut t = t0;
    let mut y = y0;
    let mut h = (t1 - t0) / 16.0;
    let mut k1 = rhs(t, &y)?;

    for _ in 0..opts.max_steps {
        if t >= t1 {
            return Ok(y);
        }
        if t + h > t1 {
            h = t1 - t;
        }
        if h <= f64::EPSILON * t1.abs().max(1.0) {
            return Err(EngineError::Integration(format!(
                "step size collapsed at t = {t:.6e}"
            )));
        }

        let stage = |y: &[f64; N], ks: &[&[f64; N]], a: &[f64]| {
            let mut out = *y;
            for (k, &w) in ks.iter().zip(a.iter()) {
                for i in 0..N {
                    out[i] += h * w * k[i];
                }
            }
            out
        };

        let k2 = rhs(t + C[0] * h, &stage(&y, &[&k1], &A2))?;
        let k3 = rhs(t + C[1] * h, &stage(&y, &[&k1, &k2], &A3))?;
        let k4 = rhs(t + C[2] * h, &stage(&y, &[&k1, &k2, &k3], &A4))?;
        let k5 = rhs(t + C[3] * h, &stage(&y, &[&k1, &k2, &k3, &k4], &A5))?;
        let k6 = rhs(t + C[4] * h, &stage(&y, &[&k1, &k2, &k3, &k4, &k5], &A6))?;

        let mut y_next = y;
        for (k, &w) in [&k1, &k2, &k3, &k4, &k5, &k6].iter().zip(B.iter()) {
            for i in 0..N {
                y_next[i] += h * w * k[i];
            }
        }
        // FSAL: k7 is the derivative at the proposed endpoint.
        let k7 = rhs(t + h, &y_next)?;

        let mut err_norm: f64 = 0.0;
        for i in 0..N {
            let err = h
                * (E[0] * k1[i]
                    + E[1] * k2[i]
                    + E[2] * k3[i]
                    + E[3] * k4[i]
                    + E[4] * k5[i]
                    + E[5] * k6[i]
                    + E[6] * k7[i]);
            let scale = opts.atol + opts.rtol * y[i].abs().max(y_next[i].abs());
            err_norm = err_norm.max((err / scale).abs());
        }

        if err_norm <= 1.0 {
            t += h;
            y = y_next;
            k1 = k7;
        }
        let scale = if err_norm > 0.0 {
            (SAFETY * err_norm.powf(-0.2)).clamp(MIN_SCALE, MAX_SCALE)
        } else {
            MAX_SCALE
        };
        h *= scale;
    }

    if t >= t1 {
        Ok(y)
    } else {
        Err(EngineError::Integration(format!(
            "step budget of {} exhausted at t = {t:.6e} of {t1:.6e}",
            opts.max_steps
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_decay_matches_closed_form() {
        let y = integrate(
            |_, y: &[f64; 1]| Ok([-y[0]]),
            0.0,
            1.0,
            [1.0],
            &OdeOptions::default(),
        )
        .unwrap();
        assert!((y[0] - (-1.0f64).exp()).abs() < 1e-6);
    }

    #[test]
    fn harmonic_oscillator_conserves_energy() {
        let y = integrate(
            |_, y: &[f64; 2]| Ok([y[1], -y[0]]),
            0.0,
            2.0 * std::f64::consts::PI,
            [1.0, 0.0],
            &OdeOptions::default(),
        )
        .unwrap();
        assert!((y[0] - 1.0).abs() < 1e-5);
        assert!(y[1].abs() < 1e-5);
    }

    #[test]
    fn rhs_errors_abort_immediately() {
        let result = integrate(
            |t, _: &[f64; 1]| {
                if t > 0.5 {
                    Err(EngineError::Integration("blew up".into()))
                } else {
                    Ok([1.0])
                }
            },
            0.0,
            1.0,
            [0.0],
            &OdeOptions::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn empty_interval_returns_initial_state() {
        let y = integrate(
            |_, _: &[f64; 1]| Ok([1.0]),
            1.0,
            1.0,
            [42.0],
            &OdeOptions::default(),
        )
        .unwrap();
        assert!((y[0] - 42.0).abs() < 1e-15);
    }
}
