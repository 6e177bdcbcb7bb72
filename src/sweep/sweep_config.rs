//! # Run configuration
//!
//! Everything a sweep needs is read from one TOML document and validated
//! before any integration starts: configuration errors are fatal at sweep
//! start, a half-swept grid with misleading output is worse than no output.
//!
//! ```toml
//! t_end = 1.0
//! samples = 500
//! methods = ["RK45", "GL4"]
//! output_path = "sweep_results.json"
//!
//! gamma1 = { start = 0.0, stop = 1.0, points = 5 }
//! gamma2 = { start = 0.0, stop = 1.0, points = 5 }
//! alpha = { start_exponent = -3.0, stop_exponent = -14.0, points = 12 }
//!
//! [initial_conditions]
//! kind = "list"
//! points = [[1.0, 1.0]]
//!
//! [postprocess]
//! mode = "compress"
//! delta = 5e-2
//! ```

use std::error::Error;
use std::fs;

use serde::{Deserialize, Serialize};

use crate::model::grids::{GridSpec, InitialConditionSpec};
use crate::numerical::methods::Method;

fn default_walltime() -> f64 {
    30.0
}

fn default_progress_every() -> usize {
    50
}

/// What happens to a successful trajectory before it is stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum PostProcess {
    /// down-sample every trajectory and merge per-method into records
    Compress {
        delta: f64,
        #[serde(default)]
        max_time_gap: Option<f64>,
    },
    /// keep full trajectories, store only those distinct from all kept ones
    Unique { epsilon: f64 },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepConfig {
    /// time horizon of every run
    pub t_end: f64,
    /// sample count per run, endpoints included
    pub samples: usize,
    /// wall-clock budget per integration call in seconds; 0 disables the guard
    #[serde(default = "default_walltime")]
    pub max_walltime_s: f64,
    pub gamma1: GridSpec,
    pub gamma2: GridSpec,
    pub alpha: GridSpec,
    pub initial_conditions: InitialConditionSpec,
    pub methods: Vec<Method>,
    pub postprocess: PostProcess,
    pub output_path: String,
    /// optional directory for per-record CSV exports
    #[serde(default)]
    pub csv_dir: Option<String>,
    /// "info", "warn", "error" or "none"/"off"; None means info
    #[serde(default)]
    pub loglevel: Option<String>,
    #[serde(default = "default_progress_every")]
    pub progress_every: usize,
    /// run grid points on the rayon pool; the stored output is identical
    #[serde(default)]
    pub parallel: bool,
}

/// The configuration with every axis resolved to concrete values.
#[derive(Debug, Clone)]
pub struct ResolvedSweep {
    pub ics: Vec<(f64, f64)>,
    pub gamma1: Vec<f64>,
    pub gamma2: Vec<f64>,
    pub alpha: Vec<f64>,
}

impl ResolvedSweep {
    pub fn grid_cells(&self) -> usize {
        self.ics.len() * self.gamma1.len() * self.gamma2.len() * self.alpha.len()
    }
}

impl SweepConfig {
    pub fn from_toml_file(path: &str) -> Result<SweepConfig, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        let config: SweepConfig = toml::from_str(&text)?;
        Ok(config)
    }

    /// Fail-fast validation of the whole surface; called before any
    /// integration is attempted.
    pub fn validate(&self) -> Result<(), String> {
        if !self.t_end.is_finite() || self.t_end <= 0.0 {
            return Err("`t_end` must be positive and finite.".to_string());
        }
        if self.samples < 2 {
            return Err("`samples` must be at least 2.".to_string());
        }
        if !self.max_walltime_s.is_finite() || self.max_walltime_s < 0.0 {
            return Err("`max_walltime_s` must be non-negative.".to_string());
        }
        if self.methods.is_empty() {
            return Err("`methods` must name at least one solver.".to_string());
        }
        if self.output_path.is_empty() {
            return Err("`output_path` must not be empty.".to_string());
        }
        if self.progress_every == 0 {
            return Err("`progress_every` must be positive.".to_string());
        }
        match &self.postprocess {
            PostProcess::Compress { delta, max_time_gap } => {
                if !delta.is_finite() || *delta <= 0.0 {
                    return Err("`delta` must be positive.".to_string());
                }
                if let Some(gap) = max_time_gap {
                    if !gap.is_finite() || *gap <= 0.0 {
                        return Err("`max_time_gap` must be positive when set.".to_string());
                    }
                }
            }
            PostProcess::Unique { epsilon } => {
                if !epsilon.is_finite() || *epsilon <= 0.0 {
                    return Err("`epsilon` must be positive.".to_string());
                }
            }
        }
        let resolved = self.resolve()?;
        if resolved.grid_cells() == 0 {
            return Err("the parameter grid is empty.".to_string());
        }
        Ok(())
    }

    /// Resolve every axis; rejects empty axes, non-finite values and
    /// non-positive alpha (the exponent 1/alpha must exist).
    pub fn resolve(&self) -> Result<ResolvedSweep, String> {
        let ics = self.initial_conditions.resolve();
        if ics.is_empty() {
            return Err("`initial_conditions` resolves to no points.".to_string());
        }
        let gamma1 = self.gamma1.resolve();
        let gamma2 = self.gamma2.resolve();
        let alpha = self.alpha.resolve();
        for (name, axis) in [("gamma1", &gamma1), ("gamma2", &gamma2), ("alpha", &alpha)] {
            if axis.is_empty() {
                return Err(format!("`{}` resolves to no values.", name));
            }
            if axis.iter().any(|v| !v.is_finite()) {
                return Err(format!("`{}` contains non-finite values.", name));
            }
        }
        if alpha.iter().any(|&a| a <= 0.0) {
            return Err("`alpha` values must be strictly positive.".to_string());
        }
        if ics
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err("`initial_conditions` contains non-finite points.".to_string());
        }
        Ok(ResolvedSweep {
            ics,
            gamma1,
            gamma2,
            alpha,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SweepConfig {
        SweepConfig {
            t_end: 1.0,
            samples: 100,
            max_walltime_s: 30.0,
            gamma1: GridSpec::Explicit(vec![0.0, 0.5]),
            gamma2: GridSpec::Explicit(vec![0.7]),
            alpha: GridSpec::Logspace {
                start_exponent: -3.0,
                stop_exponent: -6.0,
                points: 4,
            },
            initial_conditions: InitialConditionSpec::List {
                points: vec![[1.0, 1.0]],
            },
            methods: vec![Method::RK45, Method::RK4],
            postprocess: PostProcess::Compress {
                delta: 5e-2,
                max_time_gap: None,
            },
            output_path: "out.json".to_string(),
            csv_dir: None,
            loglevel: Some("none".to_string()),
            progress_every: 50,
            parallel: false,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(base_config().validate().is_ok());
        let resolved = base_config().resolve().unwrap();
        assert_eq!(resolved.grid_cells(), 1 * 2 * 1 * 4);
    }

    #[test]
    fn test_rejects_bad_time_axis() {
        let mut config = base_config();
        config.t_end = 0.0;
        assert!(config.validate().is_err());
        let mut config = base_config();
        config.samples = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_non_positive_alpha() {
        let mut config = base_config();
        config.alpha = GridSpec::Explicit(vec![1e-3, 0.0]);
        let err = config.validate().unwrap_err();
        assert!(err.contains("alpha"));
    }

    #[test]
    fn test_rejects_empty_methods_and_output() {
        let mut config = base_config();
        config.methods.clear();
        assert!(config.validate().is_err());
        let mut config = base_config();
        config.output_path.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_bad_thresholds() {
        let mut config = base_config();
        config.postprocess = PostProcess::Compress {
            delta: 0.0,
            max_time_gap: None,
        };
        assert!(config.validate().is_err());
        let mut config = base_config();
        config.postprocess = PostProcess::Unique { epsilon: -1.0 };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parses_full_toml_document() {
        let doc = r#"
            t_end = 1.0
            samples = 500
            methods = ["RK45", "GL4"]
            output_path = "sweep_results.json"
            loglevel = "info"

            gamma1 = { start = 0.0, stop = 1.0, points = 5 }
            gamma2 = [0.0, 0.7]
            alpha = { start_exponent = -3.0, stop_exponent = -14.0, points = 12 }

            [initial_conditions]
            kind = "circle"
            center = [1.0, 1.0]
            radius = 0.25
            count = 8

            [postprocess]
            mode = "compress"
            delta = 5e-2
        "#;
        let config: SweepConfig = toml::from_str(doc).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.methods, vec![Method::RK45, Method::GL4]);
        assert_eq!(config.samples, 500);
        let resolved = config.resolve().unwrap();
        assert_eq!(resolved.ics.len(), 8);
        assert_eq!(resolved.alpha.len(), 12);
        // defaults fill in what the document left out
        assert_eq!(config.progress_every, 50);
        assert!(!config.parallel);
    }

    #[test]
    fn test_unique_mode_toml() {
        let doc = r#"
            t_end = 2.0
            samples = 100
            methods = ["RK4"]
            output_path = "runs.json"
            gamma1 = [0.1]
            gamma2 = [0.2]
            alpha = [1e-3]

            [initial_conditions]
            kind = "list"
            points = [[1.0, 1.0], [0.5, 1.5]]

            [postprocess]
            mode = "unique"
            epsilon = 1e-5
        "#;
        let config: SweepConfig = toml::from_str(doc).unwrap();
        assert!(config.validate().is_ok());
        match config.postprocess {
            PostProcess::Unique { epsilon } => assert_eq!(epsilon, 1e-5),
            _ => panic!("expected unique mode"),
        }
    }
}
