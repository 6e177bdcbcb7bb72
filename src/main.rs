use std::env;
use std::process;

use hillsweep::Examples::sweep_examples::{compression_demo, small_sweep_demo};
use hillsweep::sweep::driver::SweepSolver;
use hillsweep::sweep::sweep_config::SweepConfig;

/// `hillsweep <config.toml>` runs the configured sweep; without arguments a
/// small built-in demo sweep and a compression demo run instead.
fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        compression_demo();
        small_sweep_demo();
        return;
    }
    let config = match SweepConfig::from_toml_file(&args[1]) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("could not read configuration {}: {}", args[1], e);
            process::exit(1);
        }
    };
    let mut solver = match SweepSolver::new(config) {
        Ok(solver) => solver,
        Err(msg) => {
            eprintln!("bad configuration: {}", msg);
            process::exit(1);
        }
    };
    solver.solve();
    // the sweep's entire value is the persisted artifact: failing to write
    // it terminates the process
    if let Err(e) = solver.save_result() {
        eprintln!("could not write results: {}", e);
        process::exit(1);
    }
}
