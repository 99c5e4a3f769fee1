// Copyright 2026 Cavity QED Sim Contributors
// SPDX-License-Identifier: Apache-2.0

//! Strictly increasing sample-time grids.

use crate::error::{Error, Result};

/// Relative tolerance on step differences for a grid to count as uniform.
const UNIFORM_REL_TOL: f64 = 1e-9;

/// Largest interval count [`TimeGrid::from_step`] will allocate.
const MAX_STEP_INTERVALS: f64 = 1e8;

/// Ordered, strictly increasing, finite sample times.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeGrid {
    times: Vec<f64>,
}

impl TimeGrid {
    /// Wrap explicit sample times.
    pub fn new(times: Vec<f64>) -> Result<Self> {
        if times.is_empty() {
            return Err(Error::Grid("time grid is empty".into()));
        }
        if let Some(t) = times.iter().find(|t| !t.is_finite()) {
            return Err(Error::Grid(format!("time grid contains non-finite value {}", t)));
        }
        for (k, pair) in times.windows(2).enumerate() {
            if pair[1] <= pair[0] {
                return Err(Error::Grid(format!(
                    "time grid not strictly increasing at index {}: {} -> {}",
                    k + 1,
                    pair[0],
                    pair[1]
                )));
            }
        }
        Ok(Self { times })
    }

    /// `points` evenly spaced samples from `t0` to `t1` inclusive.
    pub fn uniform(t0: f64, t1: f64, points: usize) -> Result<Self> {
        if points < 2 {
            return Err(Error::Grid(format!(
                "uniform grid needs at least 2 points, got {}",
                points
            )));
        }
        let dt = (t1 - t0) / (points - 1) as f64;
        let mut times: Vec<f64> = (0..points).map(|k| t0 + k as f64 * dt).collect();
        // Land the last sample exactly on t1.
        times[points - 1] = t1;
        Self::new(times)
    }

    /// Samples `t0, t0 + dt, ...` up to and including `tmax` (within
    /// rounding).
    pub fn from_step(t0: f64, tmax: f64, dt: f64) -> Result<Self> {
        if dt.is_nan() || dt <= 0.0 {
            return Err(Error::Grid(format!("step must be positive, got {}", dt)));
        }
        let intervals = ((tmax - t0) / dt + 1e-9).floor();
        if !intervals.is_finite() || intervals > MAX_STEP_INTERVALS {
            return Err(Error::Grid(format!(
                "range [{}, {}] with step {} needs {} intervals, at most {} allowed",
                t0, tmax, dt, intervals, MAX_STEP_INTERVALS
            )));
        }
        if intervals < 1.0 {
            return Err(Error::Grid(format!(
                "range [{}, {}] shorter than one step {}",
                t0, tmax, dt
            )));
        }
        let n = intervals as usize;
        Self::new((0..=n).map(|k| t0 + k as f64 * dt).collect())
    }

    pub fn times(&self) -> &[f64] {
        &self.times
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    pub fn first(&self) -> f64 {
        self.times[0]
    }

    pub fn last(&self) -> f64 {
        self.times[self.times.len() - 1]
    }

    /// Mean step `(last − first) / (len − 1)`, `None` for a single sample.
    pub fn mean_step(&self) -> Option<f64> {
        if self.times.len() < 2 {
            return None;
        }
        Some((self.last() - self.first()) / (self.times.len() - 1) as f64)
    }

    /// Common step if every interval matches the mean step.
    pub fn uniform_step(&self) -> Option<f64> {
        let dt = self.mean_step()?;
        let tol = UNIFORM_REL_TOL * dt;
        let uniform = self
            .times
            .windows(2)
            .all(|pair| ((pair[1] - pair[0]) - dt).abs() <= tol);
        uniform.then_some(dt)
    }

    pub fn is_uniform(&self) -> bool {
        self.uniform_step().is_some()
    }
}
