//! Single-variable equations `f(x) = 0`.
//!
//! [`Equation`] is a closed enum over the built-in function families plus a
//! [`Lambda`] variant wrapping user closures. Every equation can report its
//! value and derivative at a point; the families that admit a fixed-point
//! rearrangement `x = phi(x)` also expose it for the fixed-point solver.
//!
//! Combined equations are built with the named combinators
//! ([`add`](Equation::add), [`mul`](Equation::mul), [`compose`](Equation::compose), ...)
//! which produce lazy [`Lambda`] equations whose derivatives follow the sum,
//! product, quotient and chain rules.

mod system;

pub use system::{EquationSystem, MultiEquation, MultiFn};

use std::rc::Rc;

use thiserror::Error;

use crate::scalar::Scalar;

pub type EquationResult<T> = Result<T, EquationError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EquationError {
    /// The function has no value at the given point.
    #[error("function is undefined at x = {x}")]
    UndefinedAt { x: Scalar },

    /// General polynomials start at degree 2; use the linear or quadratic
    /// families below that.
    #[error("a polynomial needs at least 3 coefficients, got {got}")]
    TooFewCoefficients { got: usize },

    /// Exponential and logarithmic bases must be positive and not 1.
    #[error("invalid base {base}: must be positive and not equal to 1")]
    InvalidBase { base: Scalar },

    /// The equation has no fixed-point rearrangement `x = phi(x)`.
    #[error("no fixed-point form is defined for this equation")]
    NoFixedPoint,
}

/// Trigonometric function selector for [`Equation::Trigonometric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrigKind {
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
}

/// Base selector for [`Equation::Logarithmic`].
#[derive(Debug, Clone, PartialEq)]
pub enum LogBase {
    Natural,
    Ten,
    Arbitrary(Scalar),
}

type ScalarFn = Rc<dyn Fn(&Scalar) -> EquationResult<Scalar>>;

/// Default forward-difference step exponent: step = 10^-10.
const DEFAULT_STEP_PRECISION: u32 = 10;

/// A user-supplied equation over closures.
///
/// The derivative closure is optional; without one, derivatives fall back to
/// a forward finite difference with step `10^-p` (`p` configurable through
/// [`with_step_precision`](Lambda::with_step_precision), default 10).
#[derive(Clone)]
pub struct Lambda {
    function: ScalarFn,
    derivative: Option<ScalarFn>,
    fixed_point: Option<ScalarFn>,
    step_precision: u32,
}

impl Lambda {
    pub fn new(f: impl Fn(&Scalar) -> EquationResult<Scalar> + 'static) -> Self {
        Lambda {
            function: Rc::new(f),
            derivative: None,
            fixed_point: None,
            step_precision: DEFAULT_STEP_PRECISION,
        }
    }

    pub fn with_derivative(
        mut self,
        df: impl Fn(&Scalar) -> EquationResult<Scalar> + 'static,
    ) -> Self {
        self.derivative = Some(Rc::new(df));
        self
    }

    pub fn with_fixed_point(
        mut self,
        phi: impl Fn(&Scalar) -> EquationResult<Scalar> + 'static,
    ) -> Self {
        self.fixed_point = Some(Rc::new(phi));
        self
    }

    /// Sets the finite-difference step to `10^-p`.
    pub fn with_step_precision(mut self, p: u32) -> Self {
        self.step_precision = p;
        self
    }
}

impl std::fmt::Debug for Lambda {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lambda")
            .field("derivative", &self.derivative.is_some())
            .field("fixed_point", &self.fixed_point.is_some())
            .field("step_precision", &self.step_precision)
            .finish()
    }
}

impl From<Lambda> for Equation {
    fn from(l: Lambda) -> Self {
        Equation::Lambda(l)
    }
}

/// A single-variable equation `f(x) = 0`.
#[derive(Debug, Clone)]
pub enum Equation {
    /// `k x + b`
    Linear { k: Scalar, b: Scalar },
    /// `a x^2 + b x + c`
    Quadratic { a: Scalar, b: Scalar, c: Scalar },
    /// General polynomial, coefficients ordered from the highest degree down.
    Polynomial { coefficients: Vec<Scalar> },
    Trigonometric { kind: TrigKind },
    /// `base^x`; natural `e^x` when `base` is `None`.
    Exponential { base: Option<Scalar> },
    /// `log_base(x)`.
    Logarithmic { base: LogBase },
    /// The sign step function, `-1 / +1` around zero. `zero_value`
    /// substitutes a value at `x = 0`, which is otherwise undefined.
    Sign {
        reversed: bool,
        zero_value: Option<Scalar>,
    },
    Lambda(Lambda),
}

impl Equation {
    /// Builds a general polynomial from coefficients ordered highest degree
    /// first.
    ///
    /// # Errors
    ///
    /// [`EquationError::TooFewCoefficients`] for fewer than 3 coefficients;
    /// the linear and quadratic variants cover those shapes.
    pub fn polynomial(coefficients: Vec<Scalar>) -> EquationResult<Equation> {
        if coefficients.len() < 3 {
            return Err(EquationError::TooFewCoefficients {
                got: coefficients.len(),
            });
        }
        Ok(Equation::Polynomial { coefficients })
    }

    /// Builds `base^x`, or `e^x` when `base` is `None`.
    ///
    /// # Errors
    ///
    /// [`EquationError::InvalidBase`] unless the base is positive and not 1.
    pub fn exponential(base: Option<Scalar>) -> EquationResult<Equation> {
        if let Some(ref b) = base {
            check_base(b)?;
        }
        Ok(Equation::Exponential { base })
    }

    /// Builds a logarithm in the given base.
    ///
    /// # Errors
    ///
    /// [`EquationError::InvalidBase`] for an arbitrary base that is not
    /// positive or equals 1.
    pub fn logarithmic(base: LogBase) -> EquationResult<Equation> {
        if let LogBase::Arbitrary(ref b) = base {
            check_base(b)?;
        }
        Ok(Equation::Logarithmic { base })
    }

    /// Evaluates `f(x)`.
    ///
    /// # Errors
    ///
    /// [`EquationError::UndefinedAt`] where the function has no value, and
    /// whatever a wrapped closure reports.
    pub fn value(&self, x: &Scalar) -> EquationResult<Scalar> {
        match self {
            Equation::Linear { k, b } => Ok(k * x + b),
            Equation::Quadratic { a, b, c } => Ok(&(&(a * x + b) * x) + c),
            Equation::Polynomial { coefficients } => Ok(horner(coefficients, x)),
            Equation::Trigonometric { kind } => trig_value(*kind, x),
            Equation::Exponential { base } => Ok(match base {
                None => x.exp(),
                Some(a) => a.pow(x),
            }),
            Equation::Logarithmic { base } => {
                if !x.is_positive() {
                    return Err(EquationError::UndefinedAt { x: x.clone() });
                }
                Ok(match base {
                    LogBase::Natural => x.ln(),
                    LogBase::Ten => x.log10(),
                    LogBase::Arbitrary(a) => x.log(a),
                })
            }
            Equation::Sign {
                reversed,
                zero_value,
            } => {
                if x.is_zero() {
                    return zero_value
                        .clone()
                        .ok_or_else(|| EquationError::UndefinedAt { x: x.clone() });
                }
                let positive = x.is_positive() != *reversed;
                Ok(if positive {
                    Scalar::one()
                } else {
                    -Scalar::one()
                })
            }
            Equation::Lambda(l) => (l.function)(x),
        }
    }

    /// Evaluates `f'(x)`, analytically for the built-in families.
    ///
    /// A [`Lambda`] without a derivative closure uses the forward difference
    /// `(f(x + h) - f(x)) / h` with `h = 10^-p`.
    pub fn derivative(&self, x: &Scalar) -> EquationResult<Scalar> {
        match self {
            Equation::Linear { k, .. } => Ok(k.clone()),
            Equation::Quadratic { a, b, .. } => Ok(&(&(a * x) * &Scalar::from(2)) + b),
            Equation::Polynomial { coefficients } => {
                // d/dx sum c_i x^(n-i) has coefficients (n-i) c_i.
                let n = coefficients.len().saturating_sub(1);
                let derived: Vec<Scalar> = coefficients
                    .iter()
                    .take(n)
                    .enumerate()
                    .map(|(i, c)| c * &Scalar::from(n - i))
                    .collect();
                Ok(horner(&derived, x))
            }
            Equation::Trigonometric { kind } => trig_derivative(*kind, x),
            Equation::Exponential { base } => {
                let value = self.value(x)?;
                Ok(match base {
                    None => value,
                    Some(a) => &value * &a.ln(),
                })
            }
            Equation::Logarithmic { base } => {
                if !x.is_positive() {
                    return Err(EquationError::UndefinedAt { x: x.clone() });
                }
                Ok(match base {
                    LogBase::Natural => x.recip(),
                    LogBase::Ten => (x * &Scalar::from(10).ln()).recip(),
                    LogBase::Arbitrary(a) => (x * &a.ln()).recip(),
                })
            }
            Equation::Sign { .. } => {
                if x.is_zero() {
                    Err(EquationError::UndefinedAt { x: x.clone() })
                } else {
                    Ok(Scalar::zero())
                }
            }
            Equation::Lambda(l) => match &l.derivative {
                Some(df) => df(x),
                None => {
                    let h = Scalar::exp10(-(l.step_precision as i32));
                    let ahead = (l.function)(&(x + &h))?;
                    let here = (l.function)(x)?;
                    Ok((ahead - here) / h)
                }
            },
        }
    }

    /// Evaluates the fixed-point rearrangement `phi(x)` where one exists.
    ///
    /// # Errors
    ///
    /// [`EquationError::NoFixedPoint`] for the families without one
    /// (trigonometric, exponential, logarithmic, sign and combined
    /// equations), [`EquationError::UndefinedAt`] where `phi` itself is
    /// undefined.
    pub fn fixed_point(&self, x: &Scalar) -> EquationResult<Scalar> {
        match self {
            Equation::Linear { k, b } => {
                if k.is_zero() {
                    Err(EquationError::NoFixedPoint)
                } else {
                    Ok(-b / k)
                }
            }
            // a x^2 + b x + c = 0  =>  x = -c / (a x + b)
            Equation::Quadratic { a, b, c } => {
                let denom = a * x + b;
                if denom.is_zero() {
                    Err(EquationError::UndefinedAt { x: x.clone() })
                } else {
                    Ok(-c / denom)
                }
            }
            // x g(x) + c = 0  =>  x = -c / g(x), g the all-but-last prefix.
            Equation::Polynomial { coefficients } => {
                let (last, prefix) = match coefficients.split_last() {
                    Some(parts) => parts,
                    None => return Err(EquationError::NoFixedPoint),
                };
                let denom = horner(prefix, x);
                if denom.is_zero() {
                    Err(EquationError::UndefinedAt { x: x.clone() })
                } else {
                    Ok(-last / denom)
                }
            }
            Equation::Lambda(l) => match &l.fixed_point {
                Some(phi) => phi(x),
                None => Err(EquationError::NoFixedPoint),
            },
            _ => Err(EquationError::NoFixedPoint),
        }
    }

    /// Whether [`fixed_point`](Self::fixed_point) is available at all.
    pub fn has_fixed_point(&self) -> bool {
        match self {
            Equation::Linear { k, .. } => !k.is_zero(),
            Equation::Quadratic { .. } | Equation::Polynomial { .. } => true,
            Equation::Lambda(l) => l.fixed_point.is_some(),
            _ => false,
        }
    }

    /// `self + other`, differentiating by the sum rule.
    pub fn add(&self, other: &Equation) -> Equation {
        let (f, g) = (self.clone(), other.clone());
        let (df, dg) = (self.clone(), other.clone());
        Lambda::new(move |x| Ok(f.value(x)? + g.value(x)?))
            .with_derivative(move |x| Ok(df.derivative(x)? + dg.derivative(x)?))
            .into()
    }

    /// `self - other`, differentiating by the sum rule.
    pub fn sub(&self, other: &Equation) -> Equation {
        let (f, g) = (self.clone(), other.clone());
        let (df, dg) = (self.clone(), other.clone());
        Lambda::new(move |x| Ok(f.value(x)? - g.value(x)?))
            .with_derivative(move |x| Ok(df.derivative(x)? - dg.derivative(x)?))
            .into()
    }

    /// `self * other`, differentiating by the product rule.
    pub fn mul(&self, other: &Equation) -> Equation {
        let (f, g) = (self.clone(), other.clone());
        let (df, dg) = (self.clone(), other.clone());
        Lambda::new(move |x| Ok(f.value(x)? * g.value(x)?))
            .with_derivative(move |x| {
                Ok(df.derivative(x)? * dg.value(x)? + df.value(x)? * dg.derivative(x)?)
            })
            .into()
    }

    /// `self / other`, differentiating by the quotient rule. A zero divisor
    /// surfaces as [`EquationError::UndefinedAt`] when evaluated, not when
    /// the combined equation is built.
    pub fn div(&self, other: &Equation) -> Equation {
        let (f, g) = (self.clone(), other.clone());
        let (df, dg) = (self.clone(), other.clone());
        Lambda::new(move |x| {
            let denom = g.value(x)?;
            if denom.is_zero() {
                Err(EquationError::UndefinedAt { x: x.clone() })
            } else {
                Ok(f.value(x)? / denom)
            }
        })
        .with_derivative(move |x| {
            let denom = dg.value(x)?;
            if denom.is_zero() {
                return Err(EquationError::UndefinedAt { x: x.clone() });
            }
            let num = df.derivative(x)? * &denom - df.value(x)? * dg.derivative(x)?;
            Ok(num / (&denom * &denom))
        })
        .into()
    }

    /// `-self`.
    pub fn neg(&self) -> Equation {
        let f = self.clone();
        let df = self.clone();
        Lambda::new(move |x| Ok(-f.value(x)?))
            .with_derivative(move |x| Ok(-df.derivative(x)?))
            .into()
    }

    /// `self(inner(x))`, differentiating by the chain rule.
    pub fn compose(&self, inner: &Equation) -> Equation {
        let (f, g) = (self.clone(), inner.clone());
        let (df, dg) = (self.clone(), inner.clone());
        Lambda::new(move |x| f.value(&g.value(x)?))
            .with_derivative(move |x| {
                let inner_value = dg.value(x)?;
                Ok(df.derivative(&inner_value)? * dg.derivative(x)?)
            })
            .into()
    }

    /// `c * self`.
    pub fn scale(&self, c: &Scalar) -> Equation {
        let f = self.clone();
        let df = self.clone();
        let (cf, cdf) = (c.clone(), c.clone());
        Lambda::new(move |x| Ok(&cf * &f.value(x)?))
            .with_derivative(move |x| Ok(&cdf * &df.derivative(x)?))
            .into()
    }
}

fn check_base(base: &Scalar) -> EquationResult<()> {
    if !base.is_positive() || *base == Scalar::one() {
        Err(EquationError::InvalidBase { base: base.clone() })
    } else {
        Ok(())
    }
}

/// Evaluates a polynomial with coefficients ordered highest degree first.
fn horner(coefficients: &[Scalar], x: &Scalar) -> Scalar {
    let mut acc = Scalar::zero();
    for c in coefficients {
        acc = &(&acc * x) + c;
    }
    acc
}

fn trig_value(kind: TrigKind, x: &Scalar) -> EquationResult<Scalar> {
    let checked_recip = |v: Scalar| {
        if v.is_zero() {
            Err(EquationError::UndefinedAt { x: x.clone() })
        } else {
            Ok(v.recip())
        }
    };
    match kind {
        TrigKind::Sin => Ok(x.sin()),
        TrigKind::Cos => Ok(x.cos()),
        TrigKind::Tan => {
            let c = x.cos();
            if c.is_zero() {
                Err(EquationError::UndefinedAt { x: x.clone() })
            } else {
                Ok(x.sin() / c)
            }
        }
        TrigKind::Cot => {
            let s = x.sin();
            if s.is_zero() {
                Err(EquationError::UndefinedAt { x: x.clone() })
            } else {
                Ok(x.cos() / s)
            }
        }
        TrigKind::Sec => checked_recip(x.cos()),
        TrigKind::Csc => checked_recip(x.sin()),
    }
}

fn trig_derivative(kind: TrigKind, x: &Scalar) -> EquationResult<Scalar> {
    match kind {
        TrigKind::Sin => Ok(x.cos()),
        TrigKind::Cos => Ok(-x.sin()),
        // sec^2, -csc^2, sec tan, -csc cot
        TrigKind::Tan => {
            let sec = trig_value(TrigKind::Sec, x)?;
            Ok(&sec * &sec)
        }
        TrigKind::Cot => {
            let csc = trig_value(TrigKind::Csc, x)?;
            Ok(-(&csc * &csc))
        }
        TrigKind::Sec => {
            let sec = trig_value(TrigKind::Sec, x)?;
            let tan = trig_value(TrigKind::Tan, x)?;
            Ok(&sec * &tan)
        }
        TrigKind::Csc => {
            let csc = trig_value(TrigKind::Csc, x)?;
            let cot = trig_value(TrigKind::Cot, x)?;
            Ok(-(&csc * &cot))
        }
    }
}
