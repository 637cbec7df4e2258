//! Bracketing solvers: bisection and the secant (false position) method.
//!
//! Both follow the same protocol. Endpoints that are already roots return
//! immediately; endpoints with the same sign are rejected; afterwards the
//! bracket shrinks around the sign change, keeping the candidate on the
//! side opposite to `f(left)`.

use crate::equation::Equation;
use crate::roots::{Root, RootsError, RootsResult, SolverOptions};
use crate::scalar::Scalar;

/// Bisection: the candidate is the bracket midpoint.
///
/// # Errors
///
/// [`RootsError::SameSignBracket`] when no root is bracketed; equation
/// evaluation errors propagate.
pub fn bisect(
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    options: &SolverOptions,
) -> RootsResult<Root> {
    let two = Scalar::from(2);
    bracketing_loop(equation, left, right, options, move |a, b, _fa, _fb| {
        Ok((a + b) / &two)
    })
}

/// Secant method: the candidate is where the chord through the bracket
/// endpoints crosses zero.
///
/// # Errors
///
/// [`RootsError::SameSignBracket`] when no root is bracketed,
/// [`RootsError::FlatSecant`] when the chord is horizontal; equation
/// evaluation errors propagate.
pub fn secant(
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    options: &SolverOptions,
) -> RootsResult<Root> {
    bracketing_loop(equation, left, right, options, |a, b, fa, fb| {
        let denom = fb - fa;
        if denom.is_zero() {
            return Err(RootsError::FlatSecant {
                a: a.clone(),
                b: b.clone(),
            });
        }
        Ok((a * fb - b * fa) / denom)
    })
}

/// Shared bracketing protocol; `candidate` picks the next trial point from
/// the current bracket.
fn bracketing_loop(
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    options: &SolverOptions,
    candidate: impl Fn(&Scalar, &Scalar, &Scalar, &Scalar) -> RootsResult<Scalar>,
) -> RootsResult<Root> {
    let tolerance = options.tolerance();

    let fa = equation.value(left)?;
    if fa.abs() < tolerance {
        return Ok(at_root(left.clone(), fa.abs(), 0));
    }
    let fb = equation.value(right)?;
    if fb.abs() < tolerance {
        return Ok(at_root(right.clone(), fb.abs(), 0));
    }
    if fa.is_negative() == fb.is_negative() {
        return Err(RootsError::SameSignBracket { fa, fb });
    }

    let mut a = left.clone();
    let mut b = right.clone();
    let mut fa = fa;
    let mut fb = fb;
    let mut steps = 0u64;
    loop {
        let xi = candidate(&a, &b, &fa, &fb)?;
        let fxi = equation.value(&xi)?;
        steps += 1;
        if fxi.abs() < tolerance {
            return Ok(at_root(xi, fxi.abs(), steps));
        }
        if options.exhausted(steps) {
            return Ok(Root {
                x: xi,
                residual: fxi.abs(),
                steps,
                converged: false,
            });
        }
        // Keep the sign change inside the bracket.
        if fa.is_negative() != fxi.is_negative() {
            b = xi;
            fb = fxi;
        } else {
            a = xi;
            fa = fxi;
        }
    }
}

fn at_root(x: Scalar, residual: Scalar, steps: u64) -> Root {
    Root {
        x,
        residual,
        steps,
        converged: true,
    }
}
