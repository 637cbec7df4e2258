//! Polynomial interpolation through exact sample points.
//!
//! Both interpolators precompute Newton-form coefficients at construction
//! and evaluate with nested multiplication. They build the same polynomial;
//! they differ in how the coefficients are derived (Lagrange-style sums of
//! inverse products versus a divided-difference table).

use thiserror::Error;

use crate::scalar::Scalar;
use crate::vector::Vector;

pub type InterpolateResult<T> = Result<T, InterpolateError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InterpolateError {
    #[error("sample sizes differ: {xs} abscissae, {ys} ordinates")]
    SizeMismatch { xs: usize, ys: usize },

    #[error("no sample points given")]
    NoSamples,

    /// Interpolation needs pairwise distinct abscissae.
    #[error("duplicate abscissa x = {x}")]
    DuplicateAbscissa { x: Scalar },
}

/// Newton-form interpolating polynomial with Lagrange-style coefficients.
#[derive(Debug, Clone, PartialEq)]
pub struct LagrangeInterpolator {
    xs: Vector,
    coefficients: Vector,
}

impl LagrangeInterpolator {
    /// # Errors
    ///
    /// [`InterpolateError::SizeMismatch`], [`InterpolateError::NoSamples`]
    /// and [`InterpolateError::DuplicateAbscissa`] on degenerate samples.
    pub fn new(xs: &Vector, ys: &Vector) -> InterpolateResult<Self> {
        validate(xs, ys)?;
        let n = xs.len();
        let mut coefficients = Vector::zeros(n);
        for idx in 0..n {
            let mut c = Scalar::zero();
            for i in 0..=idx {
                let mut denom = Scalar::one();
                for k in 0..=idx {
                    if k != i {
                        denom = denom * (&xs[i] - &xs[k]);
                    }
                }
                c = c + &ys[i] / &denom;
            }
            coefficients[idx] = c;
        }
        Ok(LagrangeInterpolator {
            xs: xs.clone(),
            coefficients,
        })
    }

    pub fn value(&self, x: &Scalar) -> Scalar {
        evaluate(&self.xs, &self.coefficients, x)
    }

    pub fn coefficients(&self) -> &Vector {
        &self.coefficients
    }
}

/// Newton-form interpolating polynomial via a divided-difference table.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonInterpolator {
    xs: Vector,
    coefficients: Vector,
}

impl NewtonInterpolator {
    /// # Errors
    ///
    /// Same as [`LagrangeInterpolator::new`].
    pub fn new(xs: &Vector, ys: &Vector) -> InterpolateResult<Self> {
        validate(xs, ys)?;
        let n = xs.len();
        let mut table: Vec<Scalar> = ys.iter().cloned().collect();
        let mut coefficients = Vector::zeros(n);
        coefficients[0] = table[0].clone();
        for order in 1..n {
            for i in 0..n - order {
                let num = &table[i + 1] - &table[i];
                let denom = &xs[i + order] - &xs[i];
                table[i] = num / denom;
            }
            coefficients[order] = table[0].clone();
        }
        Ok(NewtonInterpolator {
            xs: xs.clone(),
            coefficients,
        })
    }

    pub fn value(&self, x: &Scalar) -> Scalar {
        evaluate(&self.xs, &self.coefficients, x)
    }

    pub fn coefficients(&self) -> &Vector {
        &self.coefficients
    }
}

/// Nested evaluation: `c_0 + (x - x_0)(c_1 + (x - x_1)(...))`, unrolled as a
/// running product.
fn evaluate(xs: &Vector, coefficients: &Vector, x: &Scalar) -> Scalar {
    let mut result = Scalar::zero();
    let mut product = Scalar::one();
    for (i, c) in coefficients.iter().enumerate() {
        result = result + &product * c;
        product = product * (x - &xs[i]);
    }
    result
}

fn validate(xs: &Vector, ys: &Vector) -> InterpolateResult<()> {
    if xs.len() != ys.len() {
        return Err(InterpolateError::SizeMismatch {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if xs.is_empty() {
        return Err(InterpolateError::NoSamples);
    }
    for i in 0..xs.len() {
        for k in i + 1..xs.len() {
            if xs[i] == xs[k] {
                return Err(InterpolateError::DuplicateAbscissa { x: xs[i].clone() });
            }
        }
    }
    Ok(())
}
