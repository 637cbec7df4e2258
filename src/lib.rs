//! Classical numerical analysis over arbitrary-precision arithmetic.
//!
//! Every algorithm in this crate works on [`scalar::Scalar`], a wrapper
//! around a multiple-precision float with a crate-wide working precision
//! (default 192 bits). That makes convergence thresholds like `10^-20`
//! meaningful in absolute terms instead of being swallowed by `f64`
//! rounding.
//!
//! # Modules
//!
//! - [`equation`] - single-variable and multivariate equations, built-in
//!   function families, closure-backed lambdas and named combinators
//! - [`roots`] - bisection, secant, Newton and fixed-point solvers plus
//!   Newton for square systems
//! - [`integrate`] - rectangle/trapezoid/Simpson quadrature, adaptive
//!   refinement and fixed-step ODE solvers
//! - [`interpolate`] - Lagrange and Newton polynomial interpolation
//! - [`approximate`] - least-squares fitting over small basis families
//! - [`linalg`] - Gaussian elimination with full pivoting
//! - [`scalar`], [`vector`] - the numeric substrate
//!
//! # Example
//!
//! ```
//! use numethods::equation::Equation;
//! use numethods::roots::{newton, SolverOptions};
//! use numethods::scalar::Scalar;
//!
//! // x^2 - 2 = 0
//! let eq = Equation::Quadratic {
//!     a: Scalar::one(),
//!     b: Scalar::zero(),
//!     c: Scalar::from(-2),
//! };
//! let root = newton(&eq, &Scalar::one(), &SolverOptions::default()).unwrap();
//! assert!(root.converged);
//! assert!((&root.x - &Scalar::from(2).sqrt()).abs() < Scalar::exp10(-19));
//! ```

pub mod approximate;
pub mod equation;
pub mod integrate;
pub mod interpolate;
pub mod linalg;
pub mod roots;
pub mod scalar;
pub mod vector;

pub use scalar::Scalar;
pub use vector::{Matrix, Vector};
