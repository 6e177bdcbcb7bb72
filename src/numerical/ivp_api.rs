//! # Single-run solver adapter
//!
//! Wraps one call to an external IVP integrator for one
//! (parameter set, initial condition, method) triple and normalizes the
//! outcome: either a [`Trajectory`] sampled on the uniform grid over
//! `[0, t_end]`, or an [`IntegrationFailure`] carrying the method, the
//! parameters and the integrator diagnostic.
//!
//! The adapter never retries and never panics on a bad run; whether a failed
//! combination is retried or skipped is the sweep driver's decision (it
//! skips). A wall-clock budget can be attached to a run: the adaptive
//! steppers are stopped through their per-step callback once the budget is
//! spent, and the truncated output is reported as a failure. The fixed-step
//! backends are bounded by their step count and need no callback.
//!
//! ## Quick start
//! ```rust, ignore
//! let params = HillParams::new(1e-6, 0.0, 0.7);
//! match solve_ivp(&params, 1.0, 1.0, Method::RK45, 1.0, 500, None) {
//!     Ok(traj) => println!("{} samples", traj.len()),
//!     Err(failure) => println!("skipped: {}", failure),
//! }
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use ode_solvers::dop853::Dop853;
use ode_solvers::dopri5::Dopri5;
use ode_solvers::rk4::Rk4;
use ode_solvers::{System, Vector2};
use peroxide::fuga::{BasicODESolver, GL4, ODEProblem, ODESolver};

use crate::model::hill_model::{HillParams, hill_rhs};
use crate::numerical::methods::Method;

type State = Vector2<f64>;

/// One solved run: `t` strictly increasing, all arrays the same length,
/// every value finite.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub t: Vec<f64>,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.t.len()
    }

    pub fn is_empty(&self) -> bool {
        self.t.is_empty()
    }
}

/// Failure of a single integration, with full parameter context so the grid
/// point can be inspected later.
#[derive(Debug, Clone)]
pub struct IntegrationFailure {
    pub method: Method,
    pub params: HillParams,
    pub x0: f64,
    pub y0: f64,
    pub reason: String,
}

impl fmt::Display for IntegrationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} failed at alpha={:e}, gamma1={}, gamma2={}, x0={}, y0={}: {}",
            self.method,
            self.params.alpha,
            self.params.gamma1,
            self.params.gamma2,
            self.x0,
            self.y0,
            self.reason
        )
    }
}

impl std::error::Error for IntegrationFailure {}

/// Uniform sample grid over [0, t_end], both endpoints included.
pub fn sample_times(t_end: f64, samples: usize) -> Result<Vec<f64>, String> {
    if !t_end.is_finite() || t_end <= 0.0 {
        return Err("`t_end` must be positive and finite.".to_string());
    }
    if samples < 2 {
        return Err("`samples` must be at least 2.".to_string());
    }
    let dt = t_end / (samples - 1) as f64;
    Ok((0..samples).map(|i| i as f64 * dt).collect())
}

/// The Hill system bound to one parameter set, shared by every backend.
/// `deadline` drives the stop callback of the adaptive steppers.
pub struct HillSystem {
    params: HillParams,
    deadline: Option<Instant>,
}

impl HillSystem {
    pub fn new(params: HillParams, budget: Option<Duration>) -> Self {
        HillSystem {
            params,
            deadline: budget.map(|b| Instant::now() + b),
        }
    }

    fn out_of_time(&self) -> bool {
        self.deadline.map(|d| Instant::now() > d).unwrap_or(false)
    }
}

impl System<f64, State> for HillSystem {
    fn system(&self, _t: f64, y: &State, dy: &mut State) {
        let (dx, dy2) = hill_rhs(&self.params, y[0], y[1]);
        dy[0] = dx;
        dy[1] = dy2;
    }

    // Called after every accepted step; returning true stops the stepper.
    // The truncated output is then classified as a timeout by the caller.
    fn solout(&mut self, _t: f64, _y: &State, _dy: &State) -> bool {
        self.out_of_time()
    }
}

impl ODEProblem for HillSystem {
    fn rhs(&self, _t: f64, y: &[f64], dy: &mut [f64]) -> Result<(), anyhow::Error> {
        let (dx, dy2) = hill_rhs(&self.params, y[0], y[1]);
        dy[0] = dx;
        dy[1] = dy2;
        Ok(())
    }
}

/// Integrate the Hill system bound to `params` from `(x0, y0)` over
/// `[0, t_end]`, sampled on the uniform grid with `samples` points.
///
/// `walltime` is the optional per-call budget; exceeding it fails the run
/// instead of stalling the sweep on a pathological grid point.
pub fn solve_ivp(
    params: &HillParams,
    x0: f64,
    y0: f64,
    method: Method,
    t_end: f64,
    samples: usize,
    walltime: Option<Duration>,
) -> Result<Trajectory, IntegrationFailure> {
    let fail = |reason: String| IntegrationFailure {
        method,
        params: *params,
        x0,
        y0,
        reason,
    };
    if let Err(msg) = sample_times(t_end, samples) {
        return Err(fail(msg));
    }
    // dt is both the dense-output interval of the adaptive methods and the
    // fixed step of RK4/GL4, so every backend lands on the same grid
    let dt = t_end / (samples - 1) as f64;

    let raw = match method {
        Method::RK45 => {
            let system = HillSystem::new(*params, walltime);
            let mut stepper = Dopri5::new(
                system,
                0.0,
                t_end,
                dt,
                Vector2::new(x0, y0),
                method.default_rtol(),
                method.default_atol(),
            );
            match stepper.integrate() {
                Ok(_stats) => collect(stepper.x_out(), stepper.y_out()),
                Err(e) => return Err(fail(format!("integrator reported: {}", e))),
            }
        }
        Method::DOP853 => {
            let system = HillSystem::new(*params, walltime);
            let mut stepper = Dop853::new(
                system,
                0.0,
                t_end,
                dt,
                Vector2::new(x0, y0),
                method.default_rtol(),
                method.default_atol(),
            );
            match stepper.integrate() {
                Ok(_stats) => collect(stepper.x_out(), stepper.y_out()),
                Err(e) => return Err(fail(format!("integrator reported: {}", e))),
            }
        }
        Method::RK4 => {
            let system = HillSystem::new(*params, walltime);
            let mut stepper = Rk4::new(system, 0.0, Vector2::new(x0, y0), t_end, dt);
            match stepper.integrate() {
                Ok(_stats) => collect(stepper.x_out(), stepper.y_out()),
                Err(e) => return Err(fail(format!("integrator reported: {}", e))),
            }
        }
        Method::GL4 => {
            let system = HillSystem::new(*params, walltime);
            let solver = BasicODESolver::new(GL4::default());
            let initial_state = vec![x0, y0];
            match solver.solve(&system, (0.0, t_end), dt, &initial_state) {
                Ok((t_vec, y_vec)) => Trajectory {
                    x: y_vec.iter().map(|row| row[0]).collect(),
                    y: y_vec.iter().map(|row| row[1]).collect(),
                    t: t_vec,
                },
                Err(e) => return Err(fail(format!("integrator reported: {}", e))),
            }
        }
    };

    // normalize: the sweep only ever sees finite, strictly increasing,
    // complete trajectories. The dense-output grid may lose its very last
    // point to float accumulation, so truncation starts at 1.5 steps short.
    let last_t = raw.t.last().copied().unwrap_or(f64::NEG_INFINITY);
    let truncated = raw.len() < 2 || last_t < t_end - 1.5 * dt;
    if truncated {
        if walltime.is_some() {
            return Err(fail(format!(
                "wall clock budget exhausted, integration stopped at t={:.6}",
                last_t.max(0.0)
            )));
        }
        return Err(fail(format!(
            "integration stopped at t={:.6} before t_end={}",
            last_t.max(0.0),
            t_end
        )));
    }
    let finite = raw.t.iter().chain(raw.x.iter()).chain(raw.y.iter());
    if !finite.clone().all(|v| v.is_finite()) {
        return Err(fail("non-finite state in solution".to_string()));
    }
    if !raw.t.windows(2).all(|w| w[1] > w[0]) {
        return Err(fail("sample times are not strictly increasing".to_string()));
    }
    Ok(raw)
}

fn collect(t: &Vec<f64>, y: &Vec<State>) -> Trajectory {
    Trajectory {
        t: t.clone(),
        x: y.iter().map(|s| s[0]).collect(),
        y: y.iter().map(|s| s[1]).collect(),
    }
}
