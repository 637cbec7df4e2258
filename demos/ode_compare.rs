//! Integrates y' = y from (0, 1) with all five fixed-step methods, prints a
//! comparison table against e^x and renders the trajectories to
//! `ode_compare.png`.

use std::error::Error;

use plotters::prelude::*;

use numethods::integrate::ode::{
    solve_multistep, solve_single_step, MultistepMethod, OdeOptions, SingleStepMethod, Trajectory,
};
use numethods::scalar::Scalar;

fn main() -> Result<(), Box<dyn Error>> {
    let options = OdeOptions {
        step_size: Scalar::exp10(-1),
        point_count: 50,
        bootstrap: SingleStepMethod::RungeKutta4,
    };
    let rhs = |_: &Scalar, y: &Scalar| Ok(y.clone());
    let x0 = Scalar::zero();
    let y0 = Scalar::one();

    let trajectories: Vec<(&str, Trajectory)> = vec![
        (
            "Euler",
            solve_single_step(SingleStepMethod::Euler, rhs, &x0, &y0, &options)?,
        ),
        (
            "Improved Euler",
            solve_single_step(SingleStepMethod::ImprovedEuler, rhs, &x0, &y0, &options)?,
        ),
        (
            "Runge-Kutta 4",
            solve_single_step(SingleStepMethod::RungeKutta4, rhs, &x0, &y0, &options)?,
        ),
        (
            "Milne",
            solve_multistep(MultistepMethod::Milne, rhs, &x0, &y0, &options)?,
        ),
        (
            "Adams-Bashforth",
            solve_multistep(MultistepMethod::AdamsBashforth, rhs, &x0, &y0, &options)?,
        ),
    ];

    println!("{:<8} {:<16} {:<16}", "x", "method", "y - e^x");
    for i in (0..=50).step_by(10) {
        let x = &trajectories[0].1[i].0;
        let exact = x.exp();
        for (name, trajectory) in &trajectories {
            let error = (&trajectory[i].1 - &exact).beautify();
            println!("{:<8} {name:<16} {error}", x.beautify());
        }
        println!();
    }

    render_chart(&trajectories, "ode_compare.png")?;
    println!("wrote ode_compare.png");
    Ok(())
}

fn render_chart(trajectories: &[(&str, Trajectory)], path: &str) -> Result<(), Box<dyn Error>> {
    let root = BitMapBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE)?;

    let y_max = trajectories
        .iter()
        .flat_map(|(_, t)| t.iter().map(|(_, y)| y.to_f64()))
        .fold(f64::NEG_INFINITY, f64::max)
        .max(1.0);

    let mut chart = ChartBuilder::on(&root)
        .caption("y' = y from (0, 1), step 0.1", ("sans-serif", 40).into_font())
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.0..5.0, 0.0..(y_max * 1.1))?;

    chart
        .configure_mesh()
        .x_desc("x")
        .y_desc("y")
        .draw()?;

    let palette = [&RED, &BLUE, &GREEN, &MAGENTA, &BLACK];
    for ((name, trajectory), color) in trajectories.iter().zip(palette) {
        chart
            .draw_series(LineSeries::new(
                trajectory.iter().map(|(x, y)| (x.to_f64(), y.to_f64())),
                color,
            ))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}
