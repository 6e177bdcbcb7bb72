//! # IVP solver methods
//!
//! The engine never implements integrators itself; it selects one of a fixed
//! set of external methods by name and treats the integration as a black box.
//!
//! | Method | Backend | Character | When to use |
//! |--------|---------|-----------|-------------|
//! | RK45   | Dormand-Prince 5(4), adaptive | explicit | general purpose |
//! | DOP853 | Dormand-Prince 8(5,3), adaptive | explicit | high accuracy |
//! | RK4    | classic Runge-Kutta, fixed step | explicit | cheap control runs |
//! | GL4    | Gauss-Legendre 4th order, implicit | stiff | near-singular alpha |

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Integration method identifier. String round-trip uses the exact names
/// above, which are also the keys of the persisted method maps.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
pub enum Method {
    RK45,
    DOP853,
    RK4,
    GL4,
}

impl Method {
    /// implicit method suited for stiff parameter combinations
    pub fn is_stiff(&self) -> bool {
        matches!(self, Method::GL4)
    }

    /// adaptive step-size control (the fixed-step methods step exactly on the
    /// sample grid instead)
    pub fn is_adaptive(&self) -> bool {
        matches!(self, Method::RK45 | Method::DOP853)
    }

    pub fn default_rtol(&self) -> f64 {
        match self {
            Method::RK45 => 1e-6,
            Method::DOP853 => 1e-8,
            Method::RK4 | Method::GL4 => 1e-6,
        }
    }

    pub fn default_atol(&self) -> f64 {
        match self {
            Method::RK45 => 1e-9,
            Method::DOP853 => 1e-10,
            Method::RK4 | Method::GL4 => 1e-9,
        }
    }
}
