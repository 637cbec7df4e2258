//! Cross-family acceptance tests: the solver families must agree with each
//! other and with closed-form answers, and degenerate inputs must be
//! rejected with typed errors.

use numethods::approximate::{Approximator, BasisKind};
use numethods::equation::{
    Equation, EquationError, EquationSystem, Lambda, MultiEquation, TrigKind,
};
use numethods::integrate::ode::{
    solve_multistep, solve_single_step, MultistepMethod, OdeOptions, SingleStepMethod,
};
use numethods::integrate::{
    integrate, trapezoid, trapezoid_adaptive, IntegratorOptions, Rule,
};
use numethods::linalg;
use numethods::roots::{
    bisect, fixed_point, newton, newton_system, secant, RootsError, SolverOptions,
};
use numethods::scalar::Scalar;
use numethods::vector::{Matrix, Vector};

fn s(text: &str) -> Scalar {
    text.parse().unwrap()
}

fn v(line: &str) -> Vector {
    line.parse().unwrap()
}

/// x^3 + x^2 + 1, the benchmark cubic with one real root.
fn cubic() -> Equation {
    Equation::polynomial(vec![
        Scalar::one(),
        Scalar::one(),
        Scalar::zero(),
        Scalar::one(),
    ])
    .unwrap()
}

#[test]
fn all_scalar_solvers_agree_on_the_cubic_root() {
    let options = SolverOptions::default();
    let reference = newton(&cubic(), &Scalar::from(10), &options).unwrap();
    assert!(reference.converged);

    let bisected = bisect(&cubic(), &Scalar::from(-10), &Scalar::from(10), &options).unwrap();
    let secanted = secant(&cubic(), &Scalar::from(-10), &Scalar::from(10), &options).unwrap();

    // Same equation rearranged as x = -(1 + x^2)^(1/3) for fixed point.
    let third = Scalar::one() / Scalar::from(3);
    let rearranged: Equation = Lambda::new(|x| Ok(&(&(x * x) * x) + &(x * x) + Scalar::one()))
        .with_fixed_point(move |x| Ok(-(Scalar::one() + x * x).pow(&third)))
        .into();
    let fixed = fixed_point(&rearranged, &Scalar::from(-1), &options).unwrap();

    let tol = Scalar::exp10(-15);
    for root in [&bisected, &secanted, &fixed] {
        assert!(root.converged);
        assert!((&root.x - &reference.x).abs() < tol);
    }
}

#[test]
fn quadrature_rules_agree_on_a_smooth_integrand() {
    // Integral of sin over [0, 2] is 1 - cos 2.
    let sin = Equation::Trigonometric { kind: TrigKind::Sin };
    let exact = Scalar::one() - Scalar::from(2).cos();
    let options = IntegratorOptions {
        separations: 200,
        ..IntegratorOptions::default()
    };
    for rule in [
        Rule::LeftRectangle,
        Rule::RightRectangle,
        Rule::MiddleRectangle,
        Rule::Trapezoid,
        Rule::Simpson,
    ] {
        let estimate = integrate(rule, &sin, &Scalar::zero(), &Scalar::from(2), &options).unwrap();
        assert!(
            (estimate - &exact).abs() < s("0.01"),
            "{rule:?} disagrees with the closed form"
        );
    }
}

#[test]
fn quadrature_is_linear_in_the_integrand() {
    // trapezoid(2 f + 3 g) = 2 trapezoid(f) + 3 trapezoid(g), sample for
    // sample, up to rounding.
    let f = Equation::Trigonometric { kind: TrigKind::Sin };
    let g = Equation::Quadratic {
        a: Scalar::one(),
        b: Scalar::zero(),
        c: Scalar::zero(),
    };
    let combined = f.scale(&Scalar::from(2)).add(&g.scale(&Scalar::from(3)));
    let options = IntegratorOptions::default();
    let left = Scalar::zero();
    let right = Scalar::from(2);
    let lhs = trapezoid(&combined, &left, &right, &options).unwrap();
    let rhs = Scalar::from(2) * trapezoid(&f, &left, &right, &options).unwrap()
        + Scalar::from(3) * trapezoid(&g, &left, &right, &options).unwrap();
    assert!((lhs - rhs).abs() < Scalar::exp10(-40));
}

#[test]
fn adaptive_trapezoid_matches_simpson() {
    let sin = Equation::Trigonometric { kind: TrigKind::Sin };
    let exact = Scalar::one() - Scalar::from(2).cos();
    let adaptive = trapezoid_adaptive(
        &sin,
        &Scalar::zero(),
        &Scalar::from(2),
        &Scalar::exp10(-8),
        &IntegratorOptions::default(),
    )
    .unwrap();
    assert!((adaptive - &exact).abs() < Scalar::exp10(-7));
}

#[test]
fn ode_errors_order_by_method_accuracy() {
    let exact = Scalar::from(5).exp();
    let options = OdeOptions {
        step_size: Scalar::exp10(-1),
        point_count: 50,
        bootstrap: SingleStepMethod::RungeKutta4,
    };
    let rhs = |_: &Scalar, y: &Scalar| Ok(y.clone());
    let x0 = Scalar::zero();
    let y0 = Scalar::one();

    let final_error = |trajectory: &[(Scalar, Scalar)]| {
        assert_eq!(trajectory.len(), 51);
        (&trajectory[50].1 - &exact).abs()
    };

    let euler =
        solve_single_step(SingleStepMethod::Euler, rhs, &x0, &y0, &options).unwrap();
    let improved =
        solve_single_step(SingleStepMethod::ImprovedEuler, rhs, &x0, &y0, &options).unwrap();
    let rk4 =
        solve_single_step(SingleStepMethod::RungeKutta4, rhs, &x0, &y0, &options).unwrap();
    let milne = solve_multistep(MultistepMethod::Milne, rhs, &x0, &y0, &options).unwrap();
    let adams =
        solve_multistep(MultistepMethod::AdamsBashforth, rhs, &x0, &y0, &options).unwrap();

    assert!(final_error(&rk4) < final_error(&improved));
    assert!(final_error(&improved) < final_error(&euler));
    // The four-point methods sit between RK4 and the improved Euler.
    assert!(final_error(&milne) < final_error(&improved));
    assert!(final_error(&adams) < final_error(&improved));
}

#[test]
fn newton_system_solves_the_benchmark_pair() {
    let system = EquationSystem::new(vec![
        MultiEquation::new(|a: &Vector| {
            Ok(s("0.1") * &a[0] * &a[0] + &a[0] + s("0.2") * &a[1] * &a[1] - s("0.3"))
        }),
        MultiEquation::new(|a: &Vector| {
            Ok(s("0.2") * &a[0] * &a[0] + &a[1] - s("0.1") * &a[0] * &a[1] - s("0.7"))
        }),
    ]);
    let root = newton_system(&system, &v("0.25 0.75"), &SolverOptions::default()).unwrap();
    assert!(root.converged);
    assert!(root.residuals.max_abs() < Scalar::exp10(-18));

    // The solution also zeroes the system when checked independently.
    let values = system.values(&root.x).unwrap();
    assert!(values.abs().max_abs() < Scalar::exp10(-18));
}

#[test]
fn undefined_samples_recover_inside_quadrature() {
    // sin(x)/x integrates across its removable singularity at 0.
    let x_eq = Equation::Linear {
        k: Scalar::one(),
        b: Scalar::zero(),
    };
    let sinc = Equation::Trigonometric { kind: TrigKind::Sin }.div(&x_eq);
    let estimate = integrate(
        Rule::Simpson,
        &sinc,
        &Scalar::from(-1),
        &Scalar::one(),
        &IntegratorOptions {
            separations: 20,
            ..IntegratorOptions::default()
        },
    )
    .unwrap();
    assert!((estimate - s("1.89216614073436")).abs() < s("0.0001"));
}

#[test]
fn degenerate_inputs_are_rejected_not_mangled() {
    // Same-sign bracket.
    let positive = Equation::Quadratic {
        a: Scalar::one(),
        b: Scalar::zero(),
        c: Scalar::one(),
    };
    assert!(matches!(
        bisect(
            &positive,
            &Scalar::from(-1),
            &Scalar::one(),
            &SolverOptions::default()
        ),
        Err(RootsError::SameSignBracket { .. })
    ));

    // Polynomials below degree 2.
    assert!(matches!(
        Equation::polynomial(vec![Scalar::one(), Scalar::one()]),
        Err(EquationError::TooFewCoefficients { .. })
    ));

    // Singular linear system.
    let singular = Matrix::new(vec![v("1 1 2"), v("2 2 4")]);
    assert!(linalg::solve(&singular).is_err());
}

#[test]
fn outlier_exclusion_restores_a_clean_fit() {
    let xs = v("0 1 2 3 4 5 6");
    let ys = v("0 1 4 9 100 25 36");
    let mut approx = Approximator::new(BasisKind::Square);
    let (excluded, errors) = approx.fit_and_exclude(&xs, &ys).unwrap();
    assert_eq!(excluded, 4);
    assert!(errors.max_abs() < Scalar::exp10(-30));
    assert!((approx.predict(&s("10")).unwrap() - s("100")).abs() < Scalar::exp10(-25));
}
