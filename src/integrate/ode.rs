//! Fixed-step solvers for the initial value problem `y' = f(x, y)`.
//!
//! Every solver walks a uniform grid from `(x0, y0)` and eagerly collects
//! the whole trajectory: `point_count` steps produce `point_count + 1`
//! `(x, y)` pairs, the initial point included.
//!
//! The single-step family (Euler, improved Euler, classical Runge-Kutta)
//! shares one stepping loop and differs only in its slope estimate. The
//! multistep family (Milne, Adams-Bashforth) bootstraps its first four
//! points with a configurable single-step method, then advances with the
//! fixed four-point formulas, keeping the last four slope evaluations in a
//! ring buffer so every further step costs a single evaluation.

use std::collections::VecDeque;

use crate::equation::EquationResult;
use crate::integrate::{IntegrateError, IntegrateResult};
use crate::scalar::Scalar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SingleStepMethod {
    Euler,
    ImprovedEuler,
    RungeKutta4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultistepMethod {
    Milne,
    AdamsBashforth,
}

/// Grid configuration for the fixed-step solvers.
#[derive(Debug, Clone, PartialEq)]
pub struct OdeOptions {
    /// Signed grid spacing; negative values integrate backward.
    pub step_size: Scalar,
    /// Number of steps to take beyond the initial point.
    pub point_count: u64,
    /// Single-step method the multistep solvers bootstrap from.
    pub bootstrap: SingleStepMethod,
}

impl Default for OdeOptions {
    fn default() -> Self {
        OdeOptions {
            step_size: Scalar::exp10(-1),
            point_count: 10,
            bootstrap: SingleStepMethod::RungeKutta4,
        }
    }
}

/// A computed trajectory: `(x, y)` pairs on the uniform grid.
pub type Trajectory = Vec<(Scalar, Scalar)>;

/// Solves the IVP with a single-step method.
///
/// # Errors
///
/// [`IntegrateError::ZeroStepSize`] and [`IntegrateError::InvalidPointCount`]
/// for degenerate grids; right-hand side errors propagate unmodified.
pub fn solve_single_step<F>(
    method: SingleStepMethod,
    f: F,
    x0: &Scalar,
    y0: &Scalar,
    options: &OdeOptions,
) -> IntegrateResult<Trajectory>
where
    F: Fn(&Scalar, &Scalar) -> EquationResult<Scalar>,
{
    validate(options)?;
    let h = &options.step_size;
    let mut points = Vec::with_capacity(options.point_count as usize + 1);
    points.push((x0.clone(), y0.clone()));
    for _ in 0..options.point_count {
        let (x, y) = &points[points.len() - 1];
        let delta = slope(method, &f, x, y, h)?;
        let next = (x + h, y + h * &delta);
        points.push(next);
    }
    Ok(points)
}

/// Solves the IVP with a four-point multistep method.
///
/// With `point_count <= 3` the trajectory is entirely bootstrap output.
///
/// # Errors
///
/// Same as [`solve_single_step`].
pub fn solve_multistep<F>(
    method: MultistepMethod,
    f: F,
    x0: &Scalar,
    y0: &Scalar,
    options: &OdeOptions,
) -> IntegrateResult<Trajectory>
where
    F: Fn(&Scalar, &Scalar) -> EquationResult<Scalar>,
{
    validate(options)?;
    let h = &options.step_size;

    let bootstrap_options = OdeOptions {
        step_size: options.step_size.clone(),
        point_count: options.point_count.min(3),
        bootstrap: options.bootstrap,
    };
    let mut points = solve_single_step(options.bootstrap, &f, x0, y0, &bootstrap_options)?;
    if options.point_count <= 3 {
        return Ok(points);
    }
    points.reserve(options.point_count as usize - 3);

    // Front of the buffer is the oldest slope f_{n-3}, back is f_n.
    let mut slopes: VecDeque<Scalar> = points
        .iter()
        .map(|(x, y)| f(x, y))
        .collect::<EquationResult<_>>()?;

    let four_thirds_h = &(h * &Scalar::from(4)) / Scalar::from(3);
    let h_over_24 = h / Scalar::from(24);
    let (c2, c55, c59, c37, c9) = (
        Scalar::from(2),
        Scalar::from(55),
        Scalar::from(59),
        Scalar::from(37),
        Scalar::from(9),
    );

    for _ in 3..options.point_count {
        let y_next = match method {
            // y_{n+1} = y_{n-3} + 4h/3 (2 f_{n-2} - f_{n-1} + 2 f_n)
            MultistepMethod::Milne => {
                let y_old = &points[points.len() - 4].1;
                let combo = &(&c2 * &slopes[1]) - &slopes[2] + &c2 * &slopes[3];
                y_old + &four_thirds_h * &combo
            }
            // y_{n+1} = y_n + h/24 (55 f_n - 59 f_{n-1} + 37 f_{n-2} - 9 f_{n-3})
            MultistepMethod::AdamsBashforth => {
                let y_n = &points[points.len() - 1].1;
                let combo = &(&c55 * &slopes[3]) - &(&c59 * &slopes[2]) + &c37 * &slopes[1]
                    - &c9 * &slopes[0];
                y_n + &h_over_24 * &combo
            }
        };
        let x_next = &points[points.len() - 1].0 + h;
        let f_next = f(&x_next, &y_next)?;
        slopes.pop_front();
        slopes.push_back(f_next);
        points.push((x_next, y_next));
    }
    Ok(points)
}

/// Per-step slope estimate of the single-step methods.
fn slope<F>(
    method: SingleStepMethod,
    f: &F,
    x: &Scalar,
    y: &Scalar,
    h: &Scalar,
) -> EquationResult<Scalar>
where
    F: Fn(&Scalar, &Scalar) -> EquationResult<Scalar>,
{
    match method {
        SingleStepMethod::Euler => f(x, y),
        // Midpoint slope after half an Euler step.
        SingleStepMethod::ImprovedEuler => {
            let half = h / Scalar::from(2);
            let k = f(x, y)?;
            f(&(x + &half), &(y + &half * &k))
        }
        SingleStepMethod::RungeKutta4 => {
            let half = h / Scalar::from(2);
            let two = Scalar::from(2);
            let k1 = f(x, y)?;
            let k2 = f(&(x + &half), &(y + &half * &k1))?;
            let k3 = f(&(x + &half), &(y + &half * &k2))?;
            let k4 = f(&(x + h), &(y + h * &k3))?;
            Ok((&k1 + &(&two * &k2) + &two * &k3 + k4) / Scalar::from(6))
        }
    }
}

fn validate(options: &OdeOptions) -> IntegrateResult<()> {
    if options.step_size.is_zero() {
        return Err(IntegrateError::ZeroStepSize);
    }
    if options.point_count == 0 {
        return Err(IntegrateError::InvalidPointCount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::EquationError;

    fn s(text: &str) -> Scalar {
        text.parse().unwrap()
    }

    fn growth(_: &Scalar, y: &Scalar) -> EquationResult<Scalar> {
        // y' = y, exact solution e^x from (0, 1).
        Ok(y.clone())
    }

    fn options(step: &str, points: u64) -> OdeOptions {
        OdeOptions {
            step_size: s(step),
            point_count: points,
            bootstrap: SingleStepMethod::RungeKutta4,
        }
    }

    #[test]
    fn test_trajectory_lengths() {
        let opts = options("0.1", 25);
        for method in [
            SingleStepMethod::Euler,
            SingleStepMethod::ImprovedEuler,
            SingleStepMethod::RungeKutta4,
        ] {
            let t =
                solve_single_step(method, growth, &Scalar::zero(), &Scalar::one(), &opts).unwrap();
            assert_eq!(t.len(), 26);
        }
        for method in [MultistepMethod::Milne, MultistepMethod::AdamsBashforth] {
            let t =
                solve_multistep(method, growth, &Scalar::zero(), &Scalar::one(), &opts).unwrap();
            assert_eq!(t.len(), 26);
        }
    }

    #[test]
    fn test_euler_is_exact_on_constant_slope() {
        let t = solve_single_step(
            SingleStepMethod::Euler,
            |_, _| Ok(Scalar::from(2)),
            &Scalar::zero(),
            &Scalar::one(),
            &options("0.5", 4),
        )
        .unwrap();
        // y = 1 + 2x on the grid.
        let (x_end, y_end) = &t[4];
        assert!((x_end - Scalar::from(2)).abs() < Scalar::exp10(-40));
        assert!((y_end - Scalar::from(5)).abs() < Scalar::exp10(-40));
    }

    #[test]
    fn test_rk4_tracks_exponential() {
        let t = solve_single_step(
            SingleStepMethod::RungeKutta4,
            growth,
            &Scalar::zero(),
            &Scalar::one(),
            &options("0.1", 50),
        )
        .unwrap();
        let exact = Scalar::from(5).exp();
        assert!((&t[50].1 - &exact).abs() < s("0.01"));
    }

    #[test]
    fn test_method_accuracy_ordering() {
        let exact = Scalar::from(5).exp();
        let error = |t: &Trajectory| (&t[50].1 - &exact).abs();
        let opts = options("0.1", 50);
        let x0 = Scalar::zero();
        let y0 = Scalar::one();
        let euler =
            solve_single_step(SingleStepMethod::Euler, growth, &x0, &y0, &opts).unwrap();
        let improved =
            solve_single_step(SingleStepMethod::ImprovedEuler, growth, &x0, &y0, &opts).unwrap();
        let rk4 =
            solve_single_step(SingleStepMethod::RungeKutta4, growth, &x0, &y0, &opts).unwrap();
        assert!(error(&rk4) < error(&improved));
        assert!(error(&improved) < error(&euler));
    }

    #[test]
    fn test_multistep_tracks_rk4() {
        let exact = Scalar::from(5).exp();
        let opts = options("0.1", 50);
        for method in [MultistepMethod::Milne, MultistepMethod::AdamsBashforth] {
            let t = solve_multistep(method, growth, &Scalar::zero(), &Scalar::one(), &opts)
                .unwrap();
            let err = (&t[50].1 - &exact).abs();
            assert!(err < s("0.1"), "{method:?} error {err} too large");
        }
    }

    #[test]
    fn test_short_multistep_is_bootstrap_only() {
        let opts = options("0.1", 2);
        let multi = solve_multistep(
            MultistepMethod::Milne,
            growth,
            &Scalar::zero(),
            &Scalar::one(),
            &opts,
        )
        .unwrap();
        let single = solve_single_step(
            SingleStepMethod::RungeKutta4,
            growth,
            &Scalar::zero(),
            &Scalar::one(),
            &opts,
        )
        .unwrap();
        assert_eq!(multi, single);
    }

    #[test]
    fn test_backward_integration() {
        let t = solve_single_step(
            SingleStepMethod::RungeKutta4,
            growth,
            &Scalar::zero(),
            &Scalar::one(),
            &options("-0.1", 10),
        )
        .unwrap();
        let exact = Scalar::from(-1).exp();
        assert!((&t[10].1 - &exact).abs() < s("0.0001"));
    }

    #[test]
    fn test_degenerate_grids_rejected() {
        let zero_step = OdeOptions {
            step_size: Scalar::zero(),
            ..options("0.1", 10)
        };
        assert!(matches!(
            solve_single_step(
                SingleStepMethod::Euler,
                growth,
                &Scalar::zero(),
                &Scalar::one(),
                &zero_step
            ),
            Err(IntegrateError::ZeroStepSize)
        ));
        assert!(matches!(
            solve_multistep(
                MultistepMethod::Milne,
                growth,
                &Scalar::zero(),
                &Scalar::one(),
                &options("0.1", 0)
            ),
            Err(IntegrateError::InvalidPointCount)
        ));
    }

    #[test]
    fn test_rhs_error_propagates() {
        let result = solve_single_step(
            SingleStepMethod::Euler,
            |x: &Scalar, _: &Scalar| {
                if *x > s("0.5") {
                    Err(EquationError::UndefinedAt { x: x.clone() })
                } else {
                    Ok(Scalar::one())
                }
            },
            &Scalar::zero(),
            &Scalar::one(),
            &options("0.2", 10),
        );
        assert!(matches!(
            result,
            Err(IntegrateError::Equation(EquationError::UndefinedAt { .. }))
        ));
    }
}
