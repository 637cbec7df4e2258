//! Runs the four scalar solvers against two benchmark equations and prints
//! the roots they find side by side.

use numethods::equation::{Equation, Lambda};
use numethods::roots::{solve, Method, ParamSpec, Root, SolverOptions};
use numethods::scalar::Scalar;

fn report(label: &str, method: Method, outcome: Result<Root, numethods::roots::RootsError>) {
    let method = format!("{method:?}");
    match outcome {
        Ok(root) => println!(
            "{label:<24} {method:<12} x = {:<26} |f(x)| = {:<12} steps = {:<6} converged = {}",
            root.x.beautify(),
            root.residual.beautify(),
            root.steps,
            root.converged
        ),
        Err(e) => println!("{label:<24} {method:<12} failed: {e}"),
    }
}

fn main() {
    let options = SolverOptions::default();

    // x^3 + x^2 + 1 = 0, one real root near -1.4656.
    let cubic = Equation::polynomial(vec![
        Scalar::one(),
        Scalar::one(),
        Scalar::zero(),
        Scalar::one(),
    ])
    .expect("three coefficients");
    let interval = ParamSpec::Interval {
        left: Scalar::from(-10),
        right: Scalar::from(10),
    };
    let guess = ParamSpec::InitialGuess {
        x0: Scalar::from(10),
    };
    for (method, params) in [
        (Method::Bisection, &interval),
        (Method::Secant, &interval),
        (Method::Newton, &guess),
    ] {
        report("x^3 + x^2 + 1", method, solve(method, &cubic, params, &options));
    }

    // The same cubic rearranged as x = -(1 + x^2)^(1/3) for fixed point.
    let third = Scalar::one() / Scalar::from(3);
    let rearranged: Equation = Lambda::new(|x| Ok(&(&(x * x) * x) + &(x * x) + Scalar::one()))
        .with_fixed_point(move |x| Ok(-(Scalar::one() + x * x).pow(&third)))
        .into();
    report(
        "x^3 + x^2 + 1",
        Method::FixedPoint,
        solve(
            Method::FixedPoint,
            &rearranged,
            &ParamSpec::InitialGuess {
                x0: Scalar::from(-1),
            },
            &options,
        ),
    );

    println!();

    // x + x^2 = 0 on [-0.5, 0.5]: the root sits at an endpoint-free zero.
    let small: Equation = Lambda::new(|x| Ok(x + x * x))
        .with_derivative(|x| Ok(Scalar::one() + Scalar::from(2) * x))
        .with_fixed_point(|x| Ok(-(x * x)))
        .into();
    let small_interval = ParamSpec::Interval {
        left: "-0.5".parse().unwrap(),
        right: "0.5".parse().unwrap(),
    };
    let small_guess = ParamSpec::InitialGuess {
        x0: "0.5".parse().unwrap(),
    };
    for (method, params) in [
        (Method::Bisection, &small_interval),
        (Method::Secant, &small_interval),
        (Method::Newton, &small_guess),
        (Method::FixedPoint, &small_guess),
    ] {
        report("x + x^2", method, solve(method, &small, params, &options));
    }
}
