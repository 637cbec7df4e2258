//! Newton's method for square systems of equations.

use crate::equation::EquationSystem;
use crate::linalg;
use crate::roots::{RootsError, RootsResult, SolverOptions};
use crate::vector::{Matrix, Vector};

/// Outcome of [`newton_system`].
#[derive(Debug, Clone, PartialEq)]
pub struct SystemRoot {
    pub x: Vector,
    /// `|f_i(x)|` for every equation at the returned iterate.
    pub residuals: Vector,
    pub steps: u64,
    pub converged: bool,
}

/// Multivariate Newton iteration.
///
/// Each step assembles the augmented system `[J | f(x)]` from the equations'
/// partial derivatives, solves it by Gaussian elimination and updates
/// `x <- x - delta`. Iteration stops once `max_i |delta_i| < 10^-precision`
/// or the step budget runs out.
///
/// # Errors
///
/// [`RootsError::DimensionMismatch`] when the guess does not match the
/// system, [`RootsError::Linalg`] for a singular Jacobian; equation
/// evaluation errors propagate.
pub fn newton_system(
    system: &EquationSystem,
    x0: &Vector,
    options: &SolverOptions,
) -> RootsResult<SystemRoot> {
    let n = system.len();
    if n == 0 || x0.len() != n {
        return Err(RootsError::DimensionMismatch {
            expected: n,
            got: x0.len(),
        });
    }

    let tolerance = options.tolerance();
    let mut x = x0.clone();
    let mut steps = 0u64;
    loop {
        if options.exhausted(steps) {
            let residuals = system.values(&x)?.abs();
            return Ok(SystemRoot {
                x,
                residuals,
                steps,
                converged: false,
            });
        }

        let mut rows = Vec::with_capacity(n);
        for equation in system.iter() {
            let mut row = Vector::zeros(n + 1);
            for j in 0..n {
                row[j] = equation.partial(&x, j)?;
            }
            row[n] = equation.value(&x)?;
            rows.push(row);
        }
        let delta = linalg::solve(&Matrix::new(rows))?.values;
        x = &x - &delta;
        steps += 1;

        if delta.max_abs() < tolerance {
            let residuals = system.values(&x)?.abs();
            return Ok(SystemRoot {
                x,
                residuals,
                steps,
                converged: true,
            });
        }
    }
}
