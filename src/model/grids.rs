//! Parameter grids and initial-condition families of a sweep.
//!
//! Grid values are produced once, at sweep start, from their generating
//! indices; downstream code keys records by those integer indices and never
//! compares recomputed floats.

use serde::{Deserialize, Serialize};

/// `points` equally spaced values over [start, stop], both ends included
pub fn linspace(start: f64, stop: f64, points: usize) -> Vec<f64> {
    if points == 0 {
        return Vec::new();
    }
    if points == 1 {
        return vec![start];
    }
    let step = (stop - start) / (points - 1) as f64;
    (0..points).map(|i| start + i as f64 * step).collect()
}

/// `points` values logarithmically spaced between 10^start_exponent and
/// 10^stop_exponent, both ends included
pub fn logspace(start_exponent: f64, stop_exponent: f64, points: usize) -> Vec<f64> {
    linspace(start_exponent, stop_exponent, points)
        .into_iter()
        .map(|e| 10f64.powf(e))
        .collect()
}

/// One axis of the parameter grid, as written in the run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GridSpec {
    /// explicit list of values
    Explicit(Vec<f64>),
    /// equally spaced values, ends included
    Linspace { start: f64, stop: f64, points: usize },
    /// decade grid, 10^start_exponent .. 10^stop_exponent
    Logspace {
        start_exponent: f64,
        stop_exponent: f64,
        points: usize,
    },
}

impl GridSpec {
    pub fn resolve(&self) -> Vec<f64> {
        match self {
            GridSpec::Explicit(values) => values.clone(),
            GridSpec::Linspace { start, stop, points } => linspace(*start, *stop, *points),
            GridSpec::Logspace {
                start_exponent,
                stop_exponent,
                points,
            } => logspace(*start_exponent, *stop_exponent, *points),
        }
    }
}

/// Family of initial states swept alongside the physical parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InitialConditionSpec {
    /// explicit (x0, y0) points
    List { points: Vec<[f64; 2]> },
    /// `count` points on a circle around `center`
    Circle {
        center: [f64; 2],
        radius: f64,
        count: usize,
    },
    /// base point shifted along the diagonal by each offset
    Shift { base: [f64; 2], offsets: Vec<f64> },
}

impl InitialConditionSpec {
    pub fn resolve(&self) -> Vec<(f64, f64)> {
        match self {
            InitialConditionSpec::List { points } => {
                points.iter().map(|p| (p[0], p[1])).collect()
            }
            InitialConditionSpec::Circle {
                center,
                radius,
                count,
            } => (0..*count)
                .map(|i| {
                    let angle = 2.0 * std::f64::consts::PI * i as f64 / *count as f64;
                    (
                        center[0] + radius * angle.cos(),
                        center[1] + radius * angle.sin(),
                    )
                })
                .collect(),
            InitialConditionSpec::Shift { base, offsets } => offsets
                .iter()
                .map(|o| (base[0] + o, base[1] + o))
                .collect(),
        }
    }
}
