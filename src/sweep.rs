//! the sweep engine: run configuration, grid driver, solution records and the
//! persisted result store
/// run configuration parsed from TOML, validated fail-fast before a sweep
pub mod sweep_config;
/// solution records keyed by integer grid coordinates and their merge rules
pub mod records;
/// the sweep driver iterating initial conditions x parameter grid x methods
/// Example
/// ```rust, ignore
/// use hillsweep::Examples::sweep_examples::demo_config;
/// use hillsweep::sweep::driver::SweepSolver;
///
/// let mut solver = SweepSolver::new(demo_config("results.json")).unwrap();
/// solver.solve();
/// solver.save_result().unwrap();
/// ```
pub mod driver;
/// write-once JSON artifact, tolerant loader and CSV export
pub mod store;
