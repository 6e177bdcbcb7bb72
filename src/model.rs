//! the physical model: Hill-type two-gene regulation system and the parameter
//! space it is explored over
/// right-hand side of the Hill regulation ODE with numerical safeguards
pub mod hill_model;
/// parameter grids (linear and logarithmic) and initial-condition families
pub mod grids;
