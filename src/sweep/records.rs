//! # Solution records
//!
//! One record per parameter-grid cell, holding the compressed solution of
//! every method that succeeded there. Records are keyed by the integer grid
//! coordinates that generated the parameters, never by recomputed floats:
//! float-tuple keys break under any reordering of the arithmetic that builds
//! the grid, integer coordinates cannot.
//!
//! Time arrays are stored per method. Different methods legitimately
//! compress to different index sets, so a shared `t` column would only be
//! valid for whichever method happened to write it first.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::hill_model::HillParams;
use crate::numerical::compression::CompressedTrajectory;
use crate::numerical::ivp_api::{IntegrationFailure, Trajectory};
use crate::numerical::methods::Method;

/// Generating indices of one grid cell: initial condition, gamma1, gamma2,
/// alpha. The primary key of the record collection.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct GridKey {
    pub ic: usize,
    pub gamma1: usize,
    pub gamma2: usize,
    pub alpha: usize,
}

/// The physical five-tuple of a record, stored for consumers; immutable
/// once constructed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamSet {
    pub x0: f64,
    pub y0: f64,
    pub gamma1: f64,
    pub gamma2: f64,
    pub alpha: f64,
}

impl ParamSet {
    pub fn new(x0: f64, y0: f64, params: &HillParams) -> Self {
        ParamSet {
            x0,
            y0,
            gamma1: params.gamma1,
            gamma2: params.gamma2,
            alpha: params.alpha,
        }
    }
}

/// Compressed solution of one method at one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSolution {
    pub t: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl From<CompressedTrajectory> for MethodSolution {
    fn from(comp: CompressedTrajectory) -> Self {
        MethodSolution {
            t: comp.t,
            x: comp.x,
            y: comp.y,
        }
    }
}

/// One grid cell with its per-method solutions. At most one entry per
/// method; a re-run overwrites its own entry and nothing else.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionRecord {
    #[serde(flatten)]
    pub params: ParamSet,
    pub solutions: BTreeMap<Method, MethodSolution>,
}

/// Per-run entry of the uniqueness-filter pipeline, persisted flat without
/// merging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlatRun {
    #[serde(flatten)]
    pub params: ParamSet,
    pub method: Method,
    pub t: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub success: bool,
}

impl FlatRun {
    pub fn from_trajectory(params: ParamSet, method: Method, traj: Trajectory) -> Self {
        FlatRun {
            params,
            method,
            t: traj.t,
            x: traj.x,
            y: traj.y,
            success: true,
        }
    }
}

/// Failed grid point kept for post-sweep inspection.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub params: ParamSet,
    pub method: Method,
    pub reason: String,
}

impl From<IntegrationFailure> for FailureRecord {
    fn from(f: IntegrationFailure) -> Self {
        FailureRecord {
            params: ParamSet::new(f.x0, f.y0, &f.params),
            method: f.method,
            reason: f.reason,
        }
    }
}

/// The in-progress accumulation of a sweep, owned by the driver; no global
/// state anywhere.
#[derive(Debug, Default)]
pub struct SweepResults {
    /// merged records, compress mode
    pub records: BTreeMap<GridKey, SolutionRecord>,
    /// flat accepted runs, uniqueness mode
    pub unique_runs: Vec<FlatRun>,
    pub failures: Vec<FailureRecord>,
}

impl SweepResults {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create-or-extend merge: the record is created by the first method to
    /// succeed at `key`, later methods add (or overwrite) their own entry.
    pub fn insert_solution(
        &mut self,
        key: GridKey,
        params: ParamSet,
        method: Method,
        solution: MethodSolution,
    ) {
        self.records
            .entry(key)
            .or_insert_with(|| SolutionRecord {
                params,
                solutions: BTreeMap::new(),
            })
            .solutions
            .insert(method, solution);
    }

    pub fn push_unique_run(&mut self, run: FlatRun) {
        self.unique_runs.push(run);
    }

    pub fn record_failure(&mut self, failure: FailureRecord) {
        self.failures.push(failure);
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    pub fn method_entry_count(&self) -> usize {
        self.records.values().map(|r| r.solutions.len()).sum()
    }

    /// total points stored across all compressed solutions
    pub fn kept_point_count(&self) -> usize {
        self.records
            .values()
            .flat_map(|r| r.solutions.values())
            .map(|s| s.t.len())
            .sum()
    }
}
