//! Root finding for single equations and square systems.
//!
//! All solvers accept the same [`SolverOptions`] and report a rich result
//! carrying the final iterate, the residual `|f(x)|`, the step count and a
//! `converged` flag. Convergence always means `|f(x)| < 10^-precision`;
//! exhausting the step budget is not an error, the last candidate comes back
//! with `converged` unset.

mod bracketing;
mod iterative;
mod system;

pub use bracketing::{bisect, secant};
pub use iterative::{fixed_point, newton};
pub use system::{newton_system, SystemRoot};

use thiserror::Error;

use crate::equation::{Equation, EquationError};
use crate::linalg::LinalgError;
use crate::scalar::Scalar;

pub type RootsResult<T> = Result<T, RootsError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RootsError {
    #[error(transparent)]
    Equation(#[from] EquationError),

    /// A bracketing solver needs endpoints with opposite function signs.
    #[error("f(left) = {fa} and f(right) = {fb} have the same sign, no root is bracketed")]
    SameSignBracket { fa: Scalar, fb: Scalar },

    /// Newton's method cannot step through a vanishing derivative.
    #[error("derivative vanished at x = {x}")]
    ZeroDerivative { x: Scalar },

    /// The secant through the current bracket is horizontal.
    #[error("secant is flat: f({a}) = f({b})")]
    FlatSecant { a: Scalar, b: Scalar },

    /// The equation offers no `x = phi(x)` rearrangement.
    #[error("equation provides no fixed-point form")]
    FixedPointUnsupported,

    /// The method and the supplied parameters do not match.
    #[error("{method:?} expects {expected}")]
    InvalidParams {
        method: Method,
        expected: &'static str,
    },

    #[error(transparent)]
    Linalg(#[from] LinalgError),

    /// Initial guess size does not match the system.
    #[error("initial guess has {got} values, system has {expected} equations")]
    DimensionMismatch { expected: usize, got: usize },
}

/// Shared solver configuration.
///
/// `precision` sets the acceptance threshold `|f(x)| < 10^-precision`;
/// `max_steps` bounds the iteration count, `None` means unbounded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolverOptions {
    pub precision: u32,
    pub max_steps: Option<u64>,
}

impl Default for SolverOptions {
    fn default() -> Self {
        SolverOptions {
            precision: 20,
            max_steps: None,
        }
    }
}

impl SolverOptions {
    /// The acceptance threshold `10^-precision`.
    pub(crate) fn tolerance(&self) -> Scalar {
        Scalar::exp10(-(self.precision as i32))
    }

    pub(crate) fn exhausted(&self, steps: u64) -> bool {
        self.max_steps.is_some_and(|max| steps >= max)
    }
}

/// Outcome of a scalar root search.
#[derive(Debug, Clone, PartialEq)]
pub struct Root {
    pub x: Scalar,
    /// `|f(x)|` at the returned candidate.
    pub residual: Scalar,
    pub steps: u64,
    pub converged: bool,
}

/// Solver selector for the uniform [`solve`] entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Bisection,
    Secant,
    Newton,
    FixedPoint,
}

/// Parameters for [`solve`]: bracketing methods take an interval, iterative
/// methods a starting point.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamSpec {
    Interval { left: Scalar, right: Scalar },
    InitialGuess { x0: Scalar },
}

/// Uniform dispatcher over the four scalar solvers.
///
/// # Errors
///
/// [`RootsError::InvalidParams`] when the parameter shape does not fit the
/// method, plus whatever the chosen solver reports.
pub fn solve(
    method: Method,
    equation: &Equation,
    params: &ParamSpec,
    options: &SolverOptions,
) -> RootsResult<Root> {
    match (method, params) {
        (Method::Bisection, ParamSpec::Interval { left, right }) => {
            bisect(equation, left, right, options)
        }
        (Method::Secant, ParamSpec::Interval { left, right }) => {
            secant(equation, left, right, options)
        }
        (Method::Newton, ParamSpec::InitialGuess { x0 }) => newton(equation, x0, options),
        (Method::FixedPoint, ParamSpec::InitialGuess { x0 }) => {
            fixed_point(equation, x0, options)
        }
        (Method::Bisection | Method::Secant, _) => Err(RootsError::InvalidParams {
            method,
            expected: "an interval",
        }),
        (Method::Newton | Method::FixedPoint, _) => Err(RootsError::InvalidParams {
            method,
            expected: "an initial guess",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cubic() -> Equation {
        // x^3 + x^2 + 1, single real root near -1.4655712318767680267.
        Equation::polynomial(vec![
            Scalar::one(),
            Scalar::one(),
            Scalar::zero(),
            Scalar::one(),
        ])
        .unwrap()
    }

    #[test]
    fn test_dispatcher_routes_each_method() {
        let interval = ParamSpec::Interval {
            left: Scalar::from(-10),
            right: Scalar::from(10),
        };
        let guess = ParamSpec::InitialGuess {
            x0: Scalar::from(10),
        };
        let options = SolverOptions::default();

        let expected: Scalar = "-1.46557123187676802665".parse().unwrap();
        let tol = Scalar::exp10(-15);
        for (method, params) in [
            (Method::Bisection, &interval),
            (Method::Secant, &interval),
            (Method::Newton, &guess),
        ] {
            let root = solve(method, &cubic(), params, &options).unwrap();
            assert!(root.converged, "{method:?} did not converge");
            assert!((&root.x - &expected).abs() < tol, "{method:?} off target");
        }
    }

    #[test]
    fn test_dispatcher_rejects_mismatched_params() {
        let guess = ParamSpec::InitialGuess {
            x0: Scalar::from(1),
        };
        let err = solve(
            Method::Bisection,
            &cubic(),
            &guess,
            &SolverOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RootsError::InvalidParams {
                method: Method::Bisection,
                ..
            }
        ));

        let interval = ParamSpec::Interval {
            left: Scalar::zero(),
            right: Scalar::one(),
        };
        let err = solve(
            Method::Newton,
            &cubic(),
            &interval,
            &SolverOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(err, RootsError::InvalidParams { .. }));
    }
}
