//! Error types for quadrature and ODE integration.

use thiserror::Error;

use crate::equation::EquationError;
use crate::scalar::Scalar;

pub type IntegrateResult<T> = Result<T, IntegrateError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrateError {
    #[error(transparent)]
    Equation(#[from] EquationError),

    /// The interval must be split into at least one sub-interval.
    #[error("separation count must be positive")]
    InvalidSeparations,

    /// An ODE solve must produce at least one point beyond the start.
    #[error("point count must be positive")]
    InvalidPointCount,

    /// An ODE step size of zero cannot advance the trajectory.
    #[error("step size must be nonzero")]
    ZeroStepSize,

    /// The integrand stayed undefined after displacing the sample point.
    #[error("sample at x = {x} is undefined even after displacement")]
    UnrecoverableSample { x: Scalar },

    /// Adaptive refinement hit its cap before the estimates settled.
    #[error("estimate still moved by {delta} after {refinements} refinements")]
    DidNotConverge { refinements: u32, delta: Scalar },
}
