//! Fixed-separation quadrature rules and adaptive trapezoidal refinement.

use crate::equation::Equation;
use crate::integrate::{sample, IntegrateError, IntegrateResult, IntegratorOptions};
use crate::scalar::Scalar;

/// Rule selector for the uniform [`integrate`] entry point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    LeftRectangle,
    RightRectangle,
    MiddleRectangle,
    Trapezoid,
    Simpson,
}

/// Uniform dispatcher over the five fixed-separation rules.
pub fn integrate(
    rule: Rule,
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    options: &IntegratorOptions,
) -> IntegrateResult<Scalar> {
    match rule {
        Rule::LeftRectangle => left_rectangle(equation, left, right, options),
        Rule::RightRectangle => right_rectangle(equation, left, right, options),
        Rule::MiddleRectangle => middle_rectangle(equation, left, right, options),
        Rule::Trapezoid => trapezoid(equation, left, right, options),
        Rule::Simpson => simpson(equation, left, right, options),
    }
}

/// Left endpoint rectangle rule.
pub fn left_rectangle(
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    options: &IntegratorOptions,
) -> IntegrateResult<Scalar> {
    rectangle(equation, left, right, options, Offset::Start)
}

/// Right endpoint rectangle rule.
pub fn right_rectangle(
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    options: &IntegratorOptions,
) -> IntegrateResult<Scalar> {
    rectangle(equation, left, right, options, Offset::End)
}

/// Midpoint rectangle rule.
pub fn middle_rectangle(
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    options: &IntegratorOptions,
) -> IntegrateResult<Scalar> {
    rectangle(equation, left, right, options, Offset::Middle)
}

enum Offset {
    Start,
    Middle,
    End,
}

fn rectangle(
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    options: &IntegratorOptions,
    offset: Offset,
) -> IntegrateResult<Scalar> {
    let h = step_size(left, right, options)?;
    if h.is_zero() {
        return Ok(Scalar::zero());
    }
    let mut x = match offset {
        Offset::Start => left.clone(),
        Offset::Middle => left + &h / Scalar::from(2),
        Offset::End => left + &h,
    };
    let mut acc = Scalar::zero();
    for _ in 0..options.separations {
        acc = acc + sample(equation, &x, options)?;
        x = &x + &h;
    }
    Ok(acc * &h)
}

/// Composite trapezoidal rule. Each interior point is evaluated once and
/// shared between its two sub-intervals.
pub fn trapezoid(
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    options: &IntegratorOptions,
) -> IntegrateResult<Scalar> {
    let h = step_size(left, right, options)?;
    if h.is_zero() {
        return Ok(Scalar::zero());
    }
    let mut prev = sample(equation, left, options)?;
    let mut acc = Scalar::zero();
    let mut x = left.clone();
    for _ in 0..options.separations {
        x = &x + &h;
        let cur = sample(equation, &x, options)?;
        acc = acc + &prev + &cur;
        prev = cur;
    }
    Ok(acc * &h / Scalar::from(2))
}

/// Composite Simpson rule: endpoints plus the midpoint of every
/// sub-interval, with shared endpoint evaluations.
pub fn simpson(
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    options: &IntegratorOptions,
) -> IntegrateResult<Scalar> {
    let h = step_size(left, right, options)?;
    if h.is_zero() {
        return Ok(Scalar::zero());
    }
    let half = &h / Scalar::from(2);
    let four = Scalar::from(4);
    let mut prev = sample(equation, left, options)?;
    let mut acc = Scalar::zero();
    let mut x = left.clone();
    for _ in 0..options.separations {
        let mid = sample(equation, &(&x + &half), options)?;
        x = &x + &h;
        let cur = sample(equation, &x, options)?;
        acc = acc + &prev + &(&four * &mid) + &cur;
        prev = cur;
    }
    Ok(acc * &h / Scalar::from(6))
}

/// Trapezoidal rule with separation doubling.
///
/// Starts from `options.separations` sub-intervals and doubles the count
/// until two successive estimates differ by less than `tolerance`.
///
/// # Errors
///
/// [`IntegrateError::DidNotConverge`] once `options.max_refinements`
/// doublings pass without the estimates settling; the fixed-rule errors
/// propagate.
pub fn trapezoid_adaptive(
    equation: &Equation,
    left: &Scalar,
    right: &Scalar,
    tolerance: &Scalar,
    options: &IntegratorOptions,
) -> IntegrateResult<Scalar> {
    let mut opts = options.clone();
    let mut prev = trapezoid(equation, left, right, &opts)?;
    let mut delta = Scalar::zero();
    for _ in 0..options.max_refinements {
        opts.separations *= 2;
        let cur = trapezoid(equation, left, right, &opts)?;
        delta = (&cur - &prev).abs();
        if delta < *tolerance {
            return Ok(cur);
        }
        prev = cur;
    }
    Err(IntegrateError::DidNotConverge {
        refinements: options.max_refinements,
        delta,
    })
}

/// Signed step `(right - left) / separations`.
fn step_size(
    left: &Scalar,
    right: &Scalar,
    options: &IntegratorOptions,
) -> IntegrateResult<Scalar> {
    if options.separations == 0 {
        return Err(IntegrateError::InvalidSeparations);
    }
    Ok((right - left) / Scalar::from(options.separations))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::equation::{EquationError, Lambda};

    fn s(text: &str) -> Scalar {
        text.parse().unwrap()
    }

    fn square() -> Equation {
        // x^2
        Equation::Quadratic {
            a: Scalar::one(),
            b: Scalar::zero(),
            c: Scalar::zero(),
        }
    }

    #[test]
    fn test_simpson_is_exact_on_cubics() {
        // Simpson integrates polynomials up to degree 3 without error.
        let cubic: Equation = Lambda::new(|x| Ok(&(x * x) * x)).into();
        let v = simpson(
            &cubic,
            &Scalar::zero(),
            &Scalar::from(2),
            &IntegratorOptions::default(),
        )
        .unwrap();
        assert!((v - Scalar::from(4)).abs() < Scalar::exp10(-40));
    }

    #[test]
    fn test_rectangle_rules_bracket_increasing_integrand() {
        let options = IntegratorOptions::default();
        let exact = Scalar::one() / Scalar::from(3);
        let lo = left_rectangle(&square(), &Scalar::zero(), &Scalar::one(), &options).unwrap();
        let hi = right_rectangle(&square(), &Scalar::zero(), &Scalar::one(), &options).unwrap();
        let mid = middle_rectangle(&square(), &Scalar::zero(), &Scalar::one(), &options).unwrap();
        assert!(lo < exact && exact < hi);
        assert!((mid - &exact).abs() < s("0.001"));
    }

    #[test]
    fn test_trapezoid_accuracy() {
        let v = trapezoid(
            &square(),
            &Scalar::zero(),
            &Scalar::one(),
            &IntegratorOptions::default(),
        )
        .unwrap();
        let exact = Scalar::one() / Scalar::from(3);
        assert!((v - exact).abs() < s("0.002"));
    }

    #[test]
    fn test_signed_interval_antisymmetry() {
        let options = IntegratorOptions::default();
        for rule in [Rule::MiddleRectangle, Rule::Trapezoid, Rule::Simpson] {
            let forward =
                integrate(rule, &square(), &Scalar::zero(), &Scalar::one(), &options).unwrap();
            let backward =
                integrate(rule, &square(), &Scalar::one(), &Scalar::zero(), &options).unwrap();
            assert!(
                (forward + backward).abs() < Scalar::exp10(-40),
                "{rule:?} is not antisymmetric"
            );
        }
    }

    #[test]
    fn test_every_rule_dispatches() {
        let options = IntegratorOptions::default();
        for rule in [
            Rule::LeftRectangle,
            Rule::RightRectangle,
            Rule::MiddleRectangle,
            Rule::Trapezoid,
            Rule::Simpson,
        ] {
            let v =
                integrate(rule, &square(), &Scalar::zero(), &Scalar::one(), &options).unwrap();
            assert!((v - Scalar::one() / Scalar::from(3)).abs() < s("0.05"));
        }
    }

    #[test]
    fn test_zero_separations_rejected() {
        let options = IntegratorOptions {
            separations: 0,
            ..IntegratorOptions::default()
        };
        let err =
            trapezoid(&square(), &Scalar::zero(), &Scalar::one(), &options).unwrap_err();
        assert!(matches!(err, IntegrateError::InvalidSeparations));
    }

    #[test]
    fn test_zero_width_interval() {
        let v = simpson(
            &square(),
            &Scalar::one(),
            &Scalar::one(),
            &IntegratorOptions::default(),
        )
        .unwrap();
        assert!(v.is_zero());
    }

    #[test]
    fn test_integrates_across_removable_singularity() {
        // Integral of sin(x)/x over [-1, 1] is 2 Si(1).
        let sinc: Equation = Lambda::new(|x| {
            if x.is_zero() {
                Err(EquationError::UndefinedAt { x: x.clone() })
            } else {
                Ok(x.sin() / x)
            }
        })
        .into();
        let v = simpson(
            &sinc,
            &Scalar::from(-1),
            &Scalar::one(),
            &IntegratorOptions::default(),
        )
        .unwrap();
        assert!((v - s("1.89216614073436")).abs() < s("0.0001"));
    }

    #[test]
    fn test_adaptive_refines_to_tolerance() {
        let cubic: Equation = Lambda::new(|x| Ok(&(x * x) * x)).into();
        let tolerance = Scalar::exp10(-10);
        let v = trapezoid_adaptive(
            &cubic,
            &Scalar::zero(),
            &Scalar::one(),
            &tolerance,
            &IntegratorOptions::default(),
        )
        .unwrap();
        assert!((v - s("0.25")).abs() < Scalar::exp10(-9));
    }

    #[test]
    fn test_adaptive_reports_exhausted_refinement() {
        let options = IntegratorOptions {
            max_refinements: 2,
            ..IntegratorOptions::default()
        };
        let err = trapezoid_adaptive(
            &square(),
            &Scalar::zero(),
            &Scalar::one(),
            &Scalar::exp10(-60),
            &options,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            IntegrateError::DidNotConverge { refinements: 2, .. }
        ));
    }
}
