//! numerical machinery of the sweep: IVP solver methods and adapters,
//! trajectory compression and trajectory deduplication
/// enumeration of the IVP solver methods known to the engine
pub mod methods;
/// single-run adapter around the external IVP integrators
/// Example
/// ```rust, ignore
/// use hillsweep::model::hill_model::HillParams;
/// use hillsweep::numerical::ivp_api::solve_ivp;
/// use hillsweep::numerical::methods::Method;
///
/// let params = HillParams::new(1e-3, 0.2, 0.7);
/// let traj = solve_ivp(&params, 1.0, 1.0, Method::RK45, 1.0, 500, None).unwrap();
/// assert_eq!(traj.t[0], 0.0);
/// ```
pub mod ivp_api;
/// greedy Euclidean down-sampling of solved trajectories
pub mod compression;
/// deduplication of near-identical trajectories across the grid
pub mod uniqueness;
