//! examples of driving the sweep engine from code

use crate::model::grids::{GridSpec, InitialConditionSpec};
use crate::numerical::compression::compress_indices;
use crate::numerical::methods::Method;
use crate::sweep::driver::SweepSolver;
use crate::sweep::sweep_config::{PostProcess, SweepConfig};

/// A small but real sweep configuration: 2 x 2 gamma grid, four alpha
/// decades, explicit and stiff methods side by side.
pub fn demo_config(output_path: &str) -> SweepConfig {
    SweepConfig {
        t_end: 1.0,
        samples: 200,
        max_walltime_s: 30.0,
        gamma1: GridSpec::Explicit(vec![0.0, 0.5]),
        gamma2: GridSpec::Explicit(vec![0.5, 1.0]),
        alpha: GridSpec::Logspace {
            start_exponent: -1.0,
            stop_exponent: -4.0,
            points: 4,
        },
        initial_conditions: InitialConditionSpec::List {
            points: vec![[1.0, 1.0], [0.5, 1.5]],
        },
        methods: vec![Method::RK45, Method::GL4],
        postprocess: PostProcess::Compress {
            delta: 5e-2,
            max_time_gap: None,
        },
        output_path: output_path.to_string(),
        csv_dir: None,
        loglevel: Some("info".to_string()),
        progress_every: 10,
        parallel: false,
    }
}

/// End-to-end demo: sweep, merge, persist.
pub fn small_sweep_demo() {
    let config = demo_config("hillsweep_results.json");
    let mut solver = match SweepSolver::new(config) {
        Ok(solver) => solver,
        Err(msg) => {
            eprintln!("bad demo configuration: {}", msg);
            return;
        }
    };
    solver.solve();
    let results = solver.get_result();
    println!(
        "demo sweep: {} records, {} method entries, {} failures",
        results.record_count(),
        results.method_entry_count(),
        results.failures.len()
    );
    if let Err(e) = solver.save_result() {
        eprintln!("could not persist demo results: {}", e);
    }
}

/// Shows what delta does to a single synthetic trajectory.
pub fn compression_demo() {
    let n = 500;
    let t: Vec<f64> = (0..n).map(|i| i as f64 / (n - 1) as f64).collect();
    let x: Vec<f64> = t.iter().map(|&t| 1.0 + t).collect();
    let y: Vec<f64> = t.iter().map(|&t| (-0.7 * t).exp()).collect();
    for delta in [1e-6, 1e-3, 1e-2, 5e-2] {
        let kept = compress_indices(&x, &y, delta);
        println!(
            "delta = {:>7.0e}: kept {:>3} of {} points ({:.1} %)",
            delta,
            kept.len(),
            n,
            100.0 * kept.len() as f64 / n as f64
        );
    }
}
