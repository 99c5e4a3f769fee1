// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Explicit Runge–Kutta integration of complex-valued ODE systems.
//!
//! Two schemes are available:
//! - Dormand–Prince 5(4) with adaptive step control (default)
//! - Classical RK4 with a fixed number of sub-steps per grid interval
//!
//! The adaptive stepper never steps past a requested output time: the step
//! is clipped so that each grid point is hit exactly, and the state there
//! is the integrated state itself rather than an interpolant.
//!
//! Ref: Hairer, Nørsett & Wanner, "Solving Ordinary Differential Equations I"
//! (1993), §II.4–II.5.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ndarray::Array1;
use num_complex::Complex64;
use tracing::{debug, trace};

use crate::config::{SolverConfig, SolverMethod};
use crate::error::{Error, Result};
use crate::grid::TimeGrid;

// Dormand–Prince nodes and coefficients.
const C2: f64 = 1.0 / 5.0;
const C3: f64 = 3.0 / 10.0;
const C4: f64 = 4.0 / 5.0;
const C5: f64 = 8.0 / 9.0;

const A21: f64 = 1.0 / 5.0;
const A31: f64 = 3.0 / 40.0;
const A32: f64 = 9.0 / 40.0;
const A41: f64 = 44.0 / 45.0;
const A42: f64 = -56.0 / 15.0;
const A43: f64 = 32.0 / 9.0;
const A51: f64 = 19372.0 / 6561.0;
const A52: f64 = -25360.0 / 2187.0;
const A53: f64 = 64448.0 / 6561.0;
const A54: f64 = -212.0 / 729.0;
const A61: f64 = 9017.0 / 3168.0;
const A62: f64 = -355.0 / 33.0;
const A63: f64 = 46732.0 / 5247.0;
const A64: f64 = 49.0 / 176.0;
const A65: f64 = -5103.0 / 18656.0;

// Fifth-order weights (also row 7 of the tableau, hence FSAL).
const B1: f64 = 35.0 / 384.0;
const B3: f64 = 500.0 / 1113.0;
const B4: f64 = 125.0 / 192.0;
const B5: f64 = -2187.0 / 6784.0;
const B6: f64 = 11.0 / 84.0;

// Difference between fifth- and fourth-order weights.
const E1: f64 = 71.0 / 57600.0;
const E3: f64 = -71.0 / 16695.0;
const E4: f64 = 71.0 / 1920.0;
const E5: f64 = -17253.0 / 339200.0;
const E6: f64 = 22.0 / 525.0;
const E7: f64 = -1.0 / 40.0;

const SAFETY: f64 = 0.9;
const MIN_FACTOR: f64 = 0.2;
const MAX_FACTOR: f64 = 5.0;

/// Configured ODE integrator.
///
/// The right-hand side is any `FnMut(t, &y) -> Result<dy/dt>`; an error
/// returned by it aborts integration and is passed through unchanged.
#[derive(Debug, Clone)]
pub struct Integrator {
    config: SolverConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl Default for Integrator {
    fn default() -> Self {
        Self {
            config: SolverConfig::default(),
            cancel: None,
        }
    }
}

impl Integrator {
    pub fn new(config: SolverConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cancel: None,
        })
    }

    /// Abort with [`Error::Cancelled`] once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Integrate from `grid.first()` and return the state at every grid
    /// time. Element 0 is `y0` itself.
    pub fn integrate<F>(
        &self,
        grid: &TimeGrid,
        y0: Array1<Complex64>,
        mut rhs: F,
    ) -> Result<Vec<Array1<Complex64>>>
    where
        F: FnMut(f64, &Array1<Complex64>) -> Result<Array1<Complex64>>,
    {
        let t0 = grid.first();
        if !all_finite(&y0) {
            return Err(Error::integration(t0, "initial state contains non-finite values"));
        }

        match self.config.method {
            SolverMethod::Dopri5 => self.dopri5(grid, y0, &mut rhs),
            SolverMethod::Rk4 => self.rk4(grid, y0, &mut rhs),
        }
    }

    pub(crate) fn check_cancelled(&self, t: f64) -> Result<()> {
        match &self.cancel {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(Error::Cancelled { time: t }),
            _ => Ok(()),
        }
    }

    fn dopri5<F>(
        &self,
        grid: &TimeGrid,
        y0: Array1<Complex64>,
        rhs: &mut F,
    ) -> Result<Vec<Array1<Complex64>>>
    where
        F: FnMut(f64, &Array1<Complex64>) -> Result<Array1<Complex64>>,
    {
        let cfg = &self.config;
        let times = grid.times();

        let mut t = times[0];
        let mut y = y0;
        let mut k1 = rhs(t, &y)?;
        if !all_finite(&k1) {
            return Err(Error::integration(t, "derivative is non-finite at the initial state"));
        }

        let mut h = match cfg.initial_step {
            Some(h) => h,
            None => initial_step(&y, &k1, cfg.rtol, cfg.atol),
        };
        if let Some(span) = grid.mean_step() {
            h = h.min(span);
        }

        let mut out = Vec::with_capacity(times.len());
        out.push(y.clone());

        let mut attempted = 0usize;
        let mut rejected = 0usize;
        let mut last_rejected = false;

        for &target in &times[1..] {
            while t < target {
                self.check_cancelled(t)?;
                if attempted >= cfg.max_steps {
                    return Err(Error::integration(
                        t,
                        format!("exceeded maximum of {} steps", cfg.max_steps),
                    ));
                }

                // Clip onto the grid point; also absorb a sliver that would
                // otherwise leave a vanishing final step.
                let remaining = target - t;
                let clipped = h >= remaining * (1.0 - 1e-10);
                let h_try = if clipped { remaining } else { h };

                let k2 = rhs(t + C2 * h_try, &combine(&y, h_try, &[(A21, &k1)]))?;
                let k3 = rhs(t + C3 * h_try, &combine(&y, h_try, &[(A31, &k1), (A32, &k2)]))?;
                let k4 = rhs(
                    t + C4 * h_try,
                    &combine(&y, h_try, &[(A41, &k1), (A42, &k2), (A43, &k3)]),
                )?;
                let k5 = rhs(
                    t + C5 * h_try,
                    &combine(&y, h_try, &[(A51, &k1), (A52, &k2), (A53, &k3), (A54, &k4)]),
                )?;
                let k6 = rhs(
                    t + h_try,
                    &combine(
                        &y,
                        h_try,
                        &[(A61, &k1), (A62, &k2), (A63, &k3), (A64, &k4), (A65, &k5)],
                    ),
                )?;
                let y_new = combine(
                    &y,
                    h_try,
                    &[(B1, &k1), (B3, &k3), (B4, &k4), (B5, &k5), (B6, &k6)],
                );
                let k7 = rhs(t + h_try, &y_new)?;
                attempted += 1;

                let err_vec = combine(
                    &Array1::zeros(y.len()),
                    h_try,
                    &[(E1, &k1), (E3, &k3), (E4, &k4), (E5, &k5), (E6, &k6), (E7, &k7)],
                );
                let err = error_norm(&err_vec, &y, &y_new, cfg.rtol, cfg.atol);

                let accepted = err.is_finite() && err <= 1.0 && all_finite(&k7);
                if accepted {
                    t = if clipped { target } else { t + h_try };
                    y = y_new;
                    k1 = k7;

                    let mut factor = if err == 0.0 {
                        MAX_FACTOR
                    } else {
                        (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, MAX_FACTOR)
                    };
                    if last_rejected {
                        factor = factor.min(1.0);
                    }
                    let proposed = h_try * factor;
                    h = if clipped { h.max(proposed) } else { proposed };
                    last_rejected = false;
                    trace!(t, h, err, "dopri5 step accepted");
                } else {
                    rejected += 1;
                    last_rejected = true;
                    let factor = if err.is_finite() {
                        (SAFETY * err.powf(-0.2)).clamp(MIN_FACTOR, 1.0)
                    } else {
                        MIN_FACTOR
                    };
                    h = h_try * factor;
                    trace!(t, h, err, "dopri5 step rejected");
                    if h < cfg.min_step {
                        return Err(Error::integration(
                            t,
                            format!(
                                "step size {:.3e} fell below minimum {:.3e}",
                                h, cfg.min_step
                            ),
                        ));
                    }
                }
            }
            out.push(y.clone());
        }

        debug!(
            points = out.len(),
            attempted,
            rejected,
            "dopri5 integration complete"
        );
        Ok(out)
    }

    fn rk4<F>(
        &self,
        grid: &TimeGrid,
        y0: Array1<Complex64>,
        rhs: &mut F,
    ) -> Result<Vec<Array1<Complex64>>>
    where
        F: FnMut(f64, &Array1<Complex64>) -> Result<Array1<Complex64>>,
    {
        let substeps = self.config.rk4_substeps;
        let times = grid.times();

        let mut out = Vec::with_capacity(times.len());
        let mut y = y0;
        out.push(y.clone());

        for pair in times.windows(2) {
            let (start, end) = (pair[0], pair[1]);
            self.check_cancelled(start)?;

            let h = (end - start) / substeps as f64;
            for s in 0..substeps {
                let t = start + s as f64 * h;
                y = rk4_step(&y, t, h, rhs)?;
                if !all_finite(&y) {
                    // `t` is the last time with a finite state
                    return Err(Error::integration(t, "state became non-finite"));
                }
            }
            out.push(y.clone());
        }

        debug!(
            points = out.len(),
            steps = (times.len() - 1) * substeps,
            "rk4 integration complete"
        );
        Ok(out)
    }
}

/// Single classical RK4 step.
fn rk4_step<F>(y: &Array1<Complex64>, t: f64, h: f64, rhs: &mut F) -> Result<Array1<Complex64>>
where
    F: FnMut(f64, &Array1<Complex64>) -> Result<Array1<Complex64>>,
{
    let k1 = rhs(t, y)?;
    let k2 = rhs(t + 0.5 * h, &combine(y, h, &[(0.5, &k1)]))?;
    let k3 = rhs(t + 0.5 * h, &combine(y, h, &[(0.5, &k2)]))?;
    let k4 = rhs(t + h, &combine(y, h, &[(1.0, &k3)]))?;

    Ok(combine(
        y,
        h,
        &[
            (1.0 / 6.0, &k1),
            (1.0 / 3.0, &k2),
            (1.0 / 3.0, &k3),
            (1.0 / 6.0, &k4),
        ],
    ))
}

/// y + h Σ c_i k_i
fn combine(
    y: &Array1<Complex64>,
    h: f64,
    terms: &[(f64, &Array1<Complex64>)],
) -> Array1<Complex64> {
    let mut out = y.clone();
    for &(c, k) in terms {
        out.scaled_add(Complex64::new(h * c, 0.0), k);
    }
    out
}

/// RMS of the local error scaled by `atol + rtol·max(|y|, |y_new|)`.
fn error_norm(
    err: &Array1<Complex64>,
    y: &Array1<Complex64>,
    y_new: &Array1<Complex64>,
    rtol: f64,
    atol: f64,
) -> f64 {
    if err.is_empty() {
        return 0.0;
    }
    let sum: f64 = err
        .iter()
        .zip(y.iter().zip(y_new.iter()))
        .map(|(e, (a, b))| {
            let sc = atol + rtol * a.norm().max(b.norm());
            (e.norm() / sc).powi(2)
        })
        .sum();
    (sum / err.len() as f64).sqrt()
}

/// Starting step from the scale of the state and its derivative.
fn initial_step(y: &Array1<Complex64>, f: &Array1<Complex64>, rtol: f64, atol: f64) -> f64 {
    let zeros = Array1::zeros(y.len());
    let d0 = error_norm(y, y, &zeros, rtol, atol);
    let d1 = error_norm(f, y, &zeros, rtol, atol);
    if d0 < 1e-5 || d1 < 1e-5 {
        1e-6
    } else {
        0.01 * d0 / d1
    }
}

fn all_finite(y: &Array1<Complex64>) -> bool {
    y.iter().all(|z| z.re.is_finite() && z.im.is_finite())
}
