//! Iterative solvers: Newton's method and fixed-point iteration.

use crate::equation::Equation;
use crate::roots::{Root, RootsError, RootsResult, SolverOptions};
use crate::scalar::Scalar;

/// Newton's method, `x <- x - f(x) / f'(x)`.
///
/// # Errors
///
/// [`RootsError::ZeroDerivative`] when the tangent is horizontal at the
/// current iterate; equation evaluation errors propagate.
pub fn newton(equation: &Equation, x0: &Scalar, options: &SolverOptions) -> RootsResult<Root> {
    iterative_loop(equation, x0, options, |eq, x| {
        let d = eq.derivative(x)?;
        if d.is_zero() {
            return Err(RootsError::ZeroDerivative { x: x.clone() });
        }
        Ok(x - eq.value(x)? / d)
    })
}

/// Fixed-point iteration, `x <- phi(x)`, over the equation's rearrangement.
///
/// # Errors
///
/// [`RootsError::FixedPointUnsupported`] when the equation has no `phi`;
/// equation evaluation errors propagate.
pub fn fixed_point(
    equation: &Equation,
    x0: &Scalar,
    options: &SolverOptions,
) -> RootsResult<Root> {
    if !equation.has_fixed_point() {
        return Err(RootsError::FixedPointUnsupported);
    }
    iterative_loop(equation, x0, options, |eq, x| Ok(eq.fixed_point(x)?))
}

/// Shared iterative protocol; `step` produces the next iterate.
fn iterative_loop(
    equation: &Equation,
    x0: &Scalar,
    options: &SolverOptions,
    step: impl Fn(&Equation, &Scalar) -> RootsResult<Scalar>,
) -> RootsResult<Root> {
    let tolerance = options.tolerance();
    let mut x = x0.clone();
    let mut steps = 0u64;
    loop {
        let residual = equation.value(&x)?.abs();
        if residual < tolerance {
            return Ok(Root {
                x,
                residual,
                steps,
                converged: true,
            });
        }
        if options.exhausted(steps) {
            return Ok(Root {
                x,
                residual,
                steps,
                converged: false,
            });
        }
        x = step(equation, &x)?;
        steps += 1;
    }
}
