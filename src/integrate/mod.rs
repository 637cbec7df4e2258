//! Definite integrals and initial value problems.
//!
//! # Quadrature
//!
//! Five fixed-separation rules over an [`Equation`]: [`left_rectangle`],
//! [`right_rectangle`], [`middle_rectangle`], [`trapezoid`] and [`simpson`],
//! plus [`trapezoid_adaptive`] which doubles the separation count until two
//! successive estimates agree. Intervals may be given in either orientation;
//! the signed step makes the integral antisymmetric under swapping the
//! bounds.
//!
//! Every sample goes through an undefined-point recovery: when the integrand
//! has no value at a sample `x`, the average of `f(x - h)` and `f(x + h)`
//! with `h = 10^-recovery_precision` stands in. This lets integrands like
//! `sin(x)/x` integrate straight across their removable singularities.
//!
//! # ODE solvers
//!
//! [`ode`] holds the fixed-step initial value problem solvers (Euler,
//! improved Euler, classical Runge-Kutta, Milne, Adams-Bashforth).

mod error;
pub mod ode;
mod quadrature;

pub use error::{IntegrateError, IntegrateResult};
pub use quadrature::{
    integrate, left_rectangle, middle_rectangle, right_rectangle, simpson, trapezoid,
    trapezoid_adaptive, Rule,
};

use crate::equation::{Equation, EquationError};
use crate::scalar::Scalar;

/// Configuration shared by the quadrature rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntegratorOptions {
    /// Number of sub-intervals for the fixed rules, and the starting count
    /// for adaptive refinement.
    pub separations: u64,
    /// Displacement exponent for undefined-sample recovery: `h = 10^-p`.
    pub recovery_precision: u32,
    /// Doubling cap for [`trapezoid_adaptive`].
    pub max_refinements: u32,
}

impl Default for IntegratorOptions {
    fn default() -> Self {
        IntegratorOptions {
            separations: 10,
            recovery_precision: 10,
            max_refinements: 30,
        }
    }
}

/// Samples the integrand at `x`, recovering from an undefined point by
/// averaging the two displaced samples.
fn sample(equation: &Equation, x: &Scalar, options: &IntegratorOptions) -> IntegrateResult<Scalar> {
    match equation.value(x) {
        Ok(v) => Ok(v),
        Err(EquationError::UndefinedAt { .. }) => {
            let h = Scalar::exp10(-(options.recovery_precision as i32));
            let displaced = |shifted: Scalar| match equation.value(&shifted) {
                Ok(v) => Ok(v),
                Err(EquationError::UndefinedAt { .. }) => {
                    Err(IntegrateError::UnrecoverableSample { x: x.clone() })
                }
                Err(e) => Err(e.into()),
            };
            let below = displaced(x - &h)?;
            let above = displaced(x + &h)?;
            Ok((below + above) / Scalar::from(2))
        }
        Err(e) => Err(e.into()),
    }
}
