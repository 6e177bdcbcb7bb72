//! # Result store
//!
//! The whole value of a sweep is one serialized artifact, written once at
//! the end. Compress-mode sweeps write an array of grouped records
//! (`{x0, y0, gamma1, gamma2, alpha, solutions: {METHOD: {t, x, y}}}`),
//! uniqueness-mode sweeps write a flat array of per-run entries. Earlier
//! tools wrote several related shapes (shared `t` columns, `(x, y)` pair
//! tuples instead of named maps), so the loader accepts all of them.
//!
//! A persistence error is fatal to the process: there is no partial-write
//! recovery, the caller is expected to terminate.

use std::collections::BTreeMap;
use std::error::Error;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use csv::Writer;
use log::info;

use crate::sweep::records::{SolutionRecord, SweepResults};
use crate::sweep::sweep_config::PostProcess;
use serde::Deserialize;

/// Write the sweep artifact for `results` under the configured mode.
pub fn save_results(
    results: &SweepResults,
    mode: &PostProcess,
    path: &str,
) -> Result<(), Box<dyn Error>> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    match mode {
        PostProcess::Compress { .. } => {
            let records: Vec<&SolutionRecord> = results.records.values().collect();
            serde_json::to_writer(writer, &records)?;
        }
        PostProcess::Unique { .. } => {
            serde_json::to_writer(writer, &results.unique_runs)?;
        }
    }
    info!("results written to {}", path);
    Ok(())
}

/// Solution payload as found on disk: either the named per-method shape or
/// the legacy `(x_seq, y_seq)` pair.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StoredSolution {
    Named {
        #[serde(default)]
        t: Option<Vec<f64>>,
        x: Vec<f64>,
        y: Vec<f64>,
    },
    Pair(Vec<f64>, Vec<f64>),
}

impl StoredSolution {
    pub fn xs(&self) -> &[f64] {
        match self {
            StoredSolution::Named { x, .. } => x,
            StoredSolution::Pair(x, _) => x,
        }
    }

    pub fn ys(&self) -> &[f64] {
        match self {
            StoredSolution::Named { y, .. } => y,
            StoredSolution::Pair(_, y) => y,
        }
    }
}

/// Grouped record as found on disk; `t` at record level is the legacy
/// shared time column.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredRecord {
    pub x0: f64,
    pub y0: f64,
    pub gamma1: f64,
    pub gamma2: f64,
    pub alpha: f64,
    #[serde(default)]
    pub t: Option<Vec<f64>>,
    pub solutions: BTreeMap<String, StoredSolution>,
}

/// Flat per-run entry as found on disk.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredFlatRun {
    pub x0: f64,
    pub y0: f64,
    pub gamma1: f64,
    pub gamma2: f64,
    pub alpha: f64,
    pub method: String,
    #[serde(default)]
    pub t: Option<Vec<f64>>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    #[serde(default = "default_success")]
    pub success: bool,
}

fn default_success() -> bool {
    true
}

/// Either artifact shape, decided by what is actually in the file.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LoadedResults {
    Grouped(Vec<StoredRecord>),
    Flat(Vec<StoredFlatRun>),
}

impl LoadedResults {
    pub fn len(&self) -> usize {
        match self {
            LoadedResults::Grouped(records) => records.len(),
            LoadedResults::Flat(runs) => runs.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Read back a sweep artifact of either shape.
pub fn load_results(path: &str) -> Result<LoadedResults, Box<dyn Error>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let loaded = serde_json::from_reader(reader)?;
    Ok(loaded)
}

/// CSV export of every merged record, one file per (record, method), columns
/// t / x / y. Returns the number of files written.
pub fn save_records_csv(results: &SweepResults, dir: &str) -> Result<usize, Box<dyn Error>> {
    std::fs::create_dir_all(dir)?;
    let mut written = 0usize;
    for (key, record) in &results.records {
        for (method, solution) in &record.solutions {
            let name = format!(
                "rec_ic{}_g1_{}_g2_{}_a{}_{}.csv",
                key.ic, key.gamma1, key.gamma2, key.alpha, method
            );
            let path = Path::new(dir).join(name);
            let file = File::create(path)?;
            let mut writer = Writer::from_writer(file);
            writer.write_record(["t", "x", "y"])?;
            for i in 0..solution.t.len() {
                writer.write_record(&[
                    solution.t[i].to_string(),
                    solution.x[i].to_string(),
                    solution.y[i].to_string(),
                ])?;
            }
            writer.flush()?;
            written += 1;
        }
    }
    info!("{} csv files written to {}", written, dir);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numerical::methods::Method;
    use crate::sweep::records::{GridKey, MethodSolution, ParamSet};
    use tempfile::tempdir;

    fn sample_results() -> SweepResults {
        let mut results = SweepResults::new();
        let key = GridKey {
            ic: 0,
            gamma1: 1,
            gamma2: 0,
            alpha: 3,
        };
        let params = ParamSet {
            x0: 1.0,
            y0: 1.0,
            gamma1: 0.25,
            gamma2: 0.0,
            alpha: 1e-6,
        };
        let solution = MethodSolution {
            t: vec![0.0, 0.5, 1.0],
            x: vec![1.0, 1.5, 2.0],
            y: vec![1.0, 0.7, 0.5],
        };
        results.insert_solution(key, params, Method::RK45, solution.clone());
        results.insert_solution(key, params, Method::GL4, solution);
        results
    }

    #[test]
    fn test_grouped_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.json");
        let path = path.to_str().unwrap();
        let results = sample_results();
        let mode = PostProcess::Compress {
            delta: 5e-2,
            max_time_gap: None,
        };
        save_results(&results, &mode, path).unwrap();
        match load_results(path).unwrap() {
            LoadedResults::Grouped(records) => {
                assert_eq!(records.len(), 1);
                let record = &records[0];
                assert_eq!(record.alpha, 1e-6);
                assert_eq!(record.solutions.len(), 2);
                let rk45 = &record.solutions["RK45"];
                assert_eq!(rk45.xs().len(), 3);
                assert_eq!(rk45.ys()[2], 0.5);
            }
            LoadedResults::Flat(_) => panic!("expected grouped shape"),
        }
    }

    #[test]
    fn test_flat_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("runs.json");
        let path = path.to_str().unwrap();
        let mut results = SweepResults::new();
        let params = ParamSet {
            x0: 0.5,
            y0: 1.5,
            gamma1: 0.1,
            gamma2: 0.2,
            alpha: 1e-3,
        };
        results.push_unique_run(crate::sweep::records::FlatRun {
            params,
            method: Method::RK4,
            t: vec![0.0, 1.0],
            x: vec![0.5, 0.6],
            y: vec![1.5, 1.4],
            success: true,
        });
        let mode = PostProcess::Unique { epsilon: 1e-5 };
        save_results(&results, &mode, path).unwrap();
        match load_results(path).unwrap() {
            LoadedResults::Flat(runs) => {
                assert_eq!(runs.len(), 1);
                assert_eq!(runs[0].method, "RK4");
                assert!(runs[0].success);
                assert_eq!(runs[0].x0, 0.5);
            }
            LoadedResults::Grouped(_) => panic!("expected flat shape"),
        }
    }

    #[test]
    fn test_loader_accepts_legacy_shared_t_and_pairs() {
        // artifact written by an older tool: shared time column, (x, y) pairs
        let legacy = r#"[{
            "x0": 1.0, "y0": 1.0, "gamma1": 0.0, "gamma2": 0.7, "alpha": 1e-6,
            "t": [0.0, 0.5, 1.0],
            "solutions": { "RK45": [[1.0, 1.5, 2.0], [1.0, 0.7, 0.5]] }
        }]"#;
        let dir = tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(&path, legacy).unwrap();
        match load_results(path.to_str().unwrap()).unwrap() {
            LoadedResults::Grouped(records) => {
                let record = &records[0];
                assert_eq!(record.t.as_ref().unwrap().len(), 3);
                let sol = &record.solutions["RK45"];
                assert_eq!(sol.xs(), &[1.0, 1.5, 2.0]);
                assert_eq!(sol.ys(), &[1.0, 0.7, 0.5]);
            }
            LoadedResults::Flat(_) => panic!("expected grouped shape"),
        }
    }

    #[test]
    fn test_save_fails_on_unwritable_path() {
        let results = sample_results();
        let mode = PostProcess::Compress {
            delta: 5e-2,
            max_time_gap: None,
        };
        let res = save_results(&results, &mode, "/nonexistent-dir/results.json");
        assert!(res.is_err());
    }

    #[test]
    fn test_csv_export_one_file_per_method() {
        let dir = tempdir().unwrap();
        let results = sample_results();
        let written = save_records_csv(&results, dir.path().to_str().unwrap()).unwrap();
        assert_eq!(written, 2);
        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 2);
    }
}
