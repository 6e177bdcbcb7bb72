//! # Sweep driver
//!
//! Iterates the Cartesian grid of initial conditions x gamma1 x gamma2 x
//! alpha x methods, runs one integration per point through the single-run
//! adapter, post-processes every success (compression or uniqueness
//! filtering) and merges it into the result collection. A failed grid point
//! is logged and skipped; nothing below the driver can abort a sweep. Only
//! configuration errors (at construction) and persistence errors (at
//! `save_result`) terminate.
//!
//! The reference process model is a single-threaded blocking loop. With
//! `parallel = true` the integrations run on the rayon pool as a
//! shared-nothing map step; the merge stays sequential and in grid order, so
//! the stored output is identical either way.
//!
//! ## Quick start
//! ```rust, ignore
//! let config = SweepConfig::from_toml_file("sweep.toml")?;
//! let mut solver = SweepSolver::new(config)?;
//! solver.solve();
//! solver.save_result()?;
//! ```

use std::collections::HashMap;
use std::error::Error;
use std::time::{Duration, Instant};

use itertools::iproduct;
use log::{info, warn};
use rayon::prelude::*;

use crate::Utils::logger::init_terminal_logging;
use crate::model::hill_model::HillParams;
use crate::numerical::compression::{CompressionOptions, compress_trajectory};
use crate::numerical::ivp_api::{IntegrationFailure, Trajectory, solve_ivp};
use crate::numerical::methods::Method;
use crate::numerical::uniqueness::UniquenessFilter;
use crate::sweep::records::{FlatRun, GridKey, ParamSet, SweepResults};
use crate::sweep::store::{save_records_csv, save_results};
use crate::sweep::sweep_config::{PostProcess, ResolvedSweep, SweepConfig};

/// One grid point: everything a single integration needs.
#[derive(Debug, Clone, Copy)]
struct Job {
    key: GridKey,
    params: HillParams,
    x0: f64,
    y0: f64,
    method: Method,
}

/// The sweep as an object: construct from a validated configuration, run,
/// inspect, persist.
pub struct SweepSolver {
    config: SweepConfig,
    resolved: ResolvedSweep,
    results: SweepResults,
    pub calc_statistics: HashMap<String, usize>,
}

impl SweepSolver {
    /// Validates the configuration fail-fast; a sweep never starts from a
    /// bad surface.
    pub fn new(config: SweepConfig) -> Result<Self, String> {
        config.validate()?;
        let resolved = config.resolve()?;
        Ok(SweepSolver {
            config,
            resolved,
            results: SweepResults::new(),
            calc_statistics: HashMap::new(),
        })
    }

    // wrapper around the main loop to implement logging
    pub fn solve(&mut self) {
        let is_logging_disabled = self
            .config
            .loglevel
            .as_ref()
            .map(|level| level == "off" || level == "none")
            .unwrap_or(false);

        if is_logging_disabled {
            self.main_loop();
        } else {
            init_terminal_logging(&self.config.loglevel);
            info!(
                "sweep started: {} grid cells x {} methods",
                self.resolved.grid_cells(),
                self.config.methods.len()
            );
            self.main_loop();
            info!("sweep ended");
        }
    }

    fn walltime(&self) -> Option<Duration> {
        if self.config.max_walltime_s > 0.0 {
            Some(Duration::from_secs_f64(self.config.max_walltime_s))
        } else {
            None
        }
    }

    fn jobs(&self) -> Vec<Job> {
        let grid = &self.resolved;
        let mut jobs =
            Vec::with_capacity(grid.grid_cells() * self.config.methods.len());
        for (ic, g1, g2, a) in iproduct!(
            0..grid.ics.len(),
            0..grid.gamma1.len(),
            0..grid.gamma2.len(),
            0..grid.alpha.len()
        ) {
            let key = GridKey {
                ic,
                gamma1: g1,
                gamma2: g2,
                alpha: a,
            };
            let params = HillParams::new(grid.alpha[a], grid.gamma1[g1], grid.gamma2[g2]);
            let (x0, y0) = grid.ics[ic];
            for &method in &self.config.methods {
                jobs.push(Job {
                    key,
                    params,
                    x0,
                    y0,
                    method,
                });
            }
        }
        jobs
    }

    fn main_loop(&mut self) {
        let begin = Instant::now();
        let jobs = self.jobs();
        let total = jobs.len();
        let t_end = self.config.t_end;
        let samples = self.config.samples;
        let walltime = self.walltime();

        let outcomes: Vec<(Job, Result<Trajectory, IntegrationFailure>)> =
            if self.config.parallel {
                // shared-nothing map step; the merge below stays sequential
                // and in grid order, so the stored output does not change
                jobs.par_iter()
                    .map(|job| {
                        (
                            *job,
                            solve_ivp(
                                &job.params,
                                job.x0,
                                job.y0,
                                job.method,
                                t_end,
                                samples,
                                walltime,
                            ),
                        )
                    })
                    .collect()
            } else {
                jobs.iter()
                    .map(|job| {
                        (
                            *job,
                            solve_ivp(
                                &job.params,
                                job.x0,
                                job.y0,
                                job.method,
                                t_end,
                                samples,
                                walltime,
                            ),
                        )
                    })
                    .collect()
            };

        let mut filter = match &self.config.postprocess {
            PostProcess::Unique { epsilon } => Some(UniquenessFilter::new(*epsilon)),
            PostProcess::Compress { .. } => None,
        };
        let compression = match &self.config.postprocess {
            PostProcess::Compress { delta, max_time_gap } => Some(CompressionOptions {
                delta: *delta,
                max_time_gap: *max_time_gap,
            }),
            PostProcess::Unique { .. } => None,
        };

        let mut attempted = 0usize;
        let mut succeeded = 0usize;
        let mut failed = 0usize;
        let mut rejected = 0usize;
        let mut points_kept = 0usize;
        let mut points_dropped = 0usize;

        for (job, outcome) in outcomes {
            attempted += 1;
            match outcome {
                Ok(traj) => {
                    succeeded += 1;
                    let params = ParamSet::new(job.x0, job.y0, &job.params);
                    if let Some(opts) = &compression {
                        let compressed = compress_trajectory(&traj, opts);
                        points_kept += compressed.len();
                        points_dropped += traj.len() - compressed.len();
                        self.results.insert_solution(
                            job.key,
                            params,
                            job.method,
                            compressed.into(),
                        );
                    } else if let Some(filter) = filter.as_mut() {
                        if filter.accept(&traj.x, &traj.y) {
                            points_kept += traj.len();
                            self.results.push_unique_run(FlatRun::from_trajectory(
                                params, job.method, traj,
                            ));
                        } else {
                            rejected += 1;
                        }
                    }
                }
                Err(failure) => {
                    failed += 1;
                    warn!("skipped: {}", failure);
                    self.results.record_failure(failure.into());
                }
            }
            if attempted % self.config.progress_every == 0 {
                info!(
                    "progress: {}/{} runs, {} succeeded, {} failed, {} duplicates",
                    attempted, total, succeeded, failed, rejected
                );
            }
        }

        let end = begin.elapsed();
        let time = end.as_secs_f64() as usize;
        self.calc_statistics
            .insert("runs attempted".to_string(), attempted);
        self.calc_statistics
            .insert("integrations succeeded".to_string(), succeeded);
        self.calc_statistics
            .insert("integrations failed".to_string(), failed);
        self.calc_statistics
            .insert("rejected as duplicates".to_string(), rejected);
        self.calc_statistics
            .insert("points kept".to_string(), points_kept);
        self.calc_statistics
            .insert("points dropped".to_string(), points_dropped);
        self.calc_statistics
            .insert("records merged".to_string(), self.results.record_count());
        self.calc_statistics
            .insert("time elapsed, s".to_string(), time);
        info!(
            "sweep statistics: {} runs, {} succeeded, {} failed, {} duplicates, {} records, {} points kept, {} points dropped, {} s",
            attempted,
            succeeded,
            failed,
            rejected,
            self.results.record_count(),
            points_kept,
            points_dropped,
            time
        );
    }

    pub fn get_result(&self) -> &SweepResults {
        &self.results
    }

    /// Write the sweep artifact (and the optional CSV exports). Persistence
    /// errors are fatal for the sweep's purpose and returned to the caller.
    pub fn save_result(&self) -> Result<(), Box<dyn Error>> {
        save_results(
            &self.results,
            &self.config.postprocess,
            &self.config.output_path,
        )?;
        if let Some(dir) = &self.config.csv_dir {
            save_records_csv(&self.results, dir)?;
        }
        Ok(())
    }
}
