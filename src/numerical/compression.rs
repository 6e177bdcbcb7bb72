//! # Trajectory compression
//!
//! Greedy Euclidean down-sampling of a solved trajectory under a single
//! scalar threshold `delta`: starting from the first point, every following
//! point is dropped while it stays within `delta` of the last retained point;
//! the first point that escapes is retained and the scan restarts from it.
//! The final sample is always appended, even when it sits within `delta` of
//! its predecessor, so a curve never loses its endpoint (at the cost of the
//! uniform-delta guarantee on the very last retained segment).
//!
//! `delta` trades fidelity for size: observed operating points between 1e-6
//! (< 1% of points removed) and 5e-2 (> 97% removed). It is a required
//! configuration input, not a constant of the algorithm.
//!
//! Some sweeps additionally bound the simulated-time gap a dropped segment
//! may span; `max_time_gap` keeps that variant available without changing
//! the default state-space-only behavior.

use serde::{Deserialize, Serialize};

use crate::numerical::ivp_api::Trajectory;

/// Compression knobs of one sweep.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CompressionOptions {
    /// Euclidean distance threshold in (x, y) space
    pub delta: f64,
    /// optional bound on the time span a dropped segment may cover
    #[serde(default)]
    pub max_time_gap: Option<f64>,
}

/// A trajectory re-indexed by its compression index set.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedTrajectory {
    pub t: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// indices into the source trajectory that were retained
    pub kept: Vec<usize>,
}

impl CompressedTrajectory {
    pub fn len(&self) -> usize {
        self.kept.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}

/// Compression index set of `(x, y)` under `delta`: strictly increasing,
/// starts at 0, ends at the last index. State-space distance only.
pub fn compress_indices(x: &[f64], y: &[f64], delta: f64) -> Vec<usize> {
    greedy_scan(None, x, y, delta, None)
}

/// Index-set scan shared by both metrics. `t` is only consulted when
/// `max_time_gap` is set.
fn greedy_scan(
    t: Option<&[f64]>,
    x: &[f64],
    y: &[f64],
    delta: f64,
    max_time_gap: Option<f64>,
) -> Vec<usize> {
    let n = x.len().min(y.len());
    if n == 0 {
        return Vec::new();
    }
    let mut kept = vec![0usize];
    let mut i = 0usize;
    'scan: loop {
        let mut j = i + 1;
        while j < n {
            let dist = ((x[j] - x[i]).powi(2) + (y[j] - y[i]).powi(2)).sqrt();
            let time_gap = match (t, max_time_gap) {
                (Some(t), Some(gap)) => t[j] - t[i] > gap,
                _ => false,
            };
            if dist > delta || time_gap {
                kept.push(j);
                i = j;
                continue 'scan;
            }
            j += 1;
        }
        // the tail never escaped delta from point i
        break;
    }
    if *kept.last().unwrap() != n - 1 {
        kept.push(n - 1);
    }
    kept
}

/// Compress a solved trajectory and re-index its arrays.
pub fn compress_trajectory(traj: &Trajectory, opts: &CompressionOptions) -> CompressedTrajectory {
    let kept = greedy_scan(
        Some(traj.t.as_slice()),
        &traj.x,
        &traj.y,
        opts.delta,
        opts.max_time_gap,
    );
    CompressedTrajectory {
        t: kept.iter().map(|&i| traj.t[i]).collect(),
        x: kept.iter().map(|&i| traj.x[i]).collect(),
        y: kept.iter().map(|&i| traj.y[i]).collect(),
        kept,
    }
}
