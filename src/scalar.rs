//! Arbitrary-precision scalar arithmetic.
//!
//! `Scalar` wraps [`astro_float::BigFloat`] and routes every operation through
//! the crate-wide working precision, so the rest of the crate never deals with
//! precision or rounding-mode plumbing. The default precision of 192 bits
//! gives roughly 57 significant decimal digits.

use std::cell::RefCell;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};

use astro_float::{BigFloat, Consts, Radix, RoundingMode};
use thiserror::Error;

const RM: RoundingMode = RoundingMode::ToEven;

/// Working precision in bits, shared by every `Scalar` operation.
static PRECISION_BITS: AtomicUsize = AtomicUsize::new(192);

/// Number of fractional digits kept by [`Scalar::beautify`].
const BEAUTIFY_FRAC_DIGITS: usize = 17;

thread_local! {
    // Consts caches computed values of pi, e and ln(2); allocation of the
    // empty cache only fails when the allocator itself does.
    static CONSTS: RefCell<Consts> =
        RefCell::new(Consts::new().expect("failed to allocate constants cache"));
}

fn with_consts<T>(f: impl FnOnce(&mut Consts) -> T) -> T {
    CONSTS.with(|cc| f(&mut cc.borrow_mut()))
}

/// Returns the current working precision in bits.
pub fn precision_bits() -> usize {
    PRECISION_BITS.load(Ordering::Relaxed)
}

/// Sets the working precision in bits for all subsequent operations.
///
/// Values below 64 bits are raised to 64; extremely low precision makes the
/// convergence criteria of the solvers meaningless.
pub fn set_precision_bits(bits: usize) {
    PRECISION_BITS.store(bits.max(64), Ordering::Relaxed);
}

fn prec() -> usize {
    precision_bits()
}

/// Error returned when a string cannot be parsed as a [`Scalar`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("cannot parse `{input}` as a number")]
pub struct ParseScalarError {
    pub input: String,
}

/// An arbitrary-precision floating-point number.
///
/// All arithmetic operators are implemented for owned and borrowed operands.
/// Comparison is exact on the underlying representation.
///
/// # Example
///
/// ```
/// use numethods::scalar::Scalar;
///
/// let x: Scalar = "0,1".parse().unwrap();
/// let y: Scalar = "0.2".parse().unwrap();
/// assert_eq!((x + y).beautify(), "0.3");
/// ```
#[derive(Debug, Clone, PartialEq, PartialOrd)]
pub struct Scalar(BigFloat);

impl Scalar {
    pub fn zero() -> Self {
        Scalar(BigFloat::from_i64(0, prec()))
    }

    pub fn one() -> Self {
        Scalar(BigFloat::from_i64(1, prec()))
    }

    /// Builds `10^n` at full working precision. Used for tolerances such as
    /// `10^-precision` throughout the solver and integrator modules.
    pub fn exp10(n: i32) -> Self {
        let ten = BigFloat::from_i64(10, prec());
        if n >= 0 {
            Scalar(ten.powi(n as usize, prec(), RM))
        } else {
            let p = ten.powi(n.unsigned_abs() as usize, prec(), RM);
            Scalar(p.reciprocal(prec(), RM))
        }
    }

    pub fn abs(&self) -> Self {
        Scalar(self.0.abs())
    }

    pub fn sqrt(&self) -> Self {
        Scalar(self.0.sqrt(prec(), RM))
    }

    pub fn exp(&self) -> Self {
        Scalar(with_consts(|cc| self.0.exp(prec(), RM, cc)))
    }

    pub fn ln(&self) -> Self {
        Scalar(with_consts(|cc| self.0.ln(prec(), RM, cc)))
    }

    pub fn log10(&self) -> Self {
        Scalar(with_consts(|cc| self.0.log10(prec(), RM, cc)))
    }

    /// Logarithm of `self` in the given base.
    pub fn log(&self, base: &Scalar) -> Self {
        Scalar(with_consts(|cc| self.0.log(&base.0, prec(), RM, cc)))
    }

    /// Raises `self` to an arbitrary power.
    pub fn pow(&self, exponent: &Scalar) -> Self {
        Scalar(with_consts(|cc| self.0.pow(&exponent.0, prec(), RM, cc)))
    }

    /// Raises `self` to a non-negative integer power.
    pub fn powi(&self, n: usize) -> Self {
        Scalar(self.0.powi(n, prec(), RM))
    }

    pub fn sin(&self) -> Self {
        Scalar(with_consts(|cc| self.0.sin(prec(), RM, cc)))
    }

    pub fn cos(&self) -> Self {
        Scalar(with_consts(|cc| self.0.cos(prec(), RM, cc)))
    }

    pub fn tan(&self) -> Self {
        Scalar(with_consts(|cc| self.0.tan(prec(), RM, cc)))
    }

    /// Multiplicative inverse, `1 / self`.
    pub fn recip(&self) -> Self {
        Scalar(self.0.reciprocal(prec(), RM))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Sign bit test. Exact zero reports `false`.
    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_positive() && !self.0.is_zero()
    }

    pub fn is_nan(&self) -> bool {
        self.0.is_nan()
    }

    pub fn is_finite(&self) -> bool {
        !self.0.is_nan() && !self.0.is_inf()
    }

    /// Lossy conversion for plotting and display scaling.
    pub fn to_f64(&self) -> f64 {
        let s = with_consts(|cc| self.0.format(Radix::Dec, RM, cc))
            .unwrap_or_else(|_| String::from("NaN"));
        f64::from_str(&s).unwrap_or(f64::NAN)
    }

    /// Renders the value as a plain decimal string rounded to 17 fractional
    /// digits, with trailing zeros stripped. Exact zero renders as `"0"`.
    pub fn beautify(&self) -> String {
        self.render(Some(BEAUTIFY_FRAC_DIGITS))
    }

    /// Like [`beautify`](Self::beautify) but without the fractional rounding.
    pub fn beautify_full(&self) -> String {
        self.render(None)
    }

    fn render(&self, frac_digits: Option<usize>) -> String {
        if self.0.is_nan() {
            return String::from("NaN");
        }
        if self.0.is_inf() {
            return if self.0.is_negative() {
                String::from("-inf")
            } else {
                String::from("inf")
            };
        }
        if self.0.is_zero() {
            return String::from("0");
        }

        let sci = match with_consts(|cc| self.0.format(Radix::Dec, RM, cc)) {
            Ok(s) => s,
            Err(_) => return String::from("NaN"),
        };
        match render_sci(&sci, frac_digits) {
            Some(s) => s,
            None => sci,
        }
    }
}

/// Converts a `d.dddde±N` scientific string to a plain decimal string,
/// optionally rounding to `frac_digits` fractional digits (half-even).
fn render_sci(sci: &str, frac_digits: Option<usize>) -> Option<String> {
    let (negative, body) = match sci.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, sci),
    };
    let (mantissa, exp_part) = body.split_once('e')?;
    let mut exp: i64 = exp_part.parse().ok()?;
    let mut digits: Vec<u8> = mantissa
        .bytes()
        .filter(|&b| b != b'.')
        .map(|b| b.checked_sub(b'0'))
        .collect::<Option<Vec<u8>>>()?;

    // Digit i carries weight 10^(exp - i). Rounding to q fractional digits
    // keeps the digits with weight >= 10^-q, that is the first exp + q + 1.
    if let Some(q) = frac_digits {
        let keep = exp + q as i64 + 1;
        if keep < 0 {
            return Some(String::from("0"));
        }
        let keep = keep as usize;
        if keep < digits.len() {
            let round_up = match digits[keep].cmp(&5) {
                std::cmp::Ordering::Greater => true,
                std::cmp::Ordering::Less => false,
                std::cmp::Ordering::Equal => {
                    digits[keep + 1..].iter().any(|&d| d != 0)
                        || (keep > 0 && digits[keep - 1] % 2 == 1)
                }
            };
            digits.truncate(keep);
            if round_up {
                let mut carry = true;
                for d in digits.iter_mut().rev() {
                    if *d == 9 {
                        *d = 0;
                    } else {
                        *d += 1;
                        carry = false;
                        break;
                    }
                }
                if carry {
                    digits.insert(0, 1);
                    exp += 1;
                }
            }
        }
    }

    while digits.last() == Some(&0) {
        digits.pop();
    }
    if digits.is_empty() {
        return Some(String::from("0"));
    }

    let sign = if negative { "-" } else { "" };
    let digit_str: String = digits.iter().map(|&d| (b'0' + d) as char).collect();

    // Fall back to scientific notation outside a sane plain-decimal range.
    if !(-18..=40).contains(&exp) {
        let (head, tail) = digit_str.split_at(1);
        return Some(if tail.is_empty() {
            format!("{sign}{head}e{exp}")
        } else {
            format!("{sign}{head}.{tail}e{exp}")
        });
    }

    if exp < 0 {
        let zeros = "0".repeat((-exp - 1) as usize);
        Some(format!("{sign}0.{zeros}{digit_str}"))
    } else {
        let int_len = exp as usize + 1;
        if digits.len() > int_len {
            let (int_part, frac_part) = digit_str.split_at(int_len);
            Some(format!("{sign}{int_part}.{frac_part}"))
        } else {
            let zeros = "0".repeat(int_len - digits.len());
            Some(format!("{sign}{digit_str}{zeros}"))
        }
    }
}

impl Default for Scalar {
    fn default() -> Self {
        Scalar::zero()
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.beautify_full())
    }
}

/// Strict shape check; the underlying parser stops at the first character it
/// does not understand instead of rejecting the input.
fn is_well_formed_decimal(s: &str) -> bool {
    let s = s.strip_prefix(['+', '-']).unwrap_or(s);
    if s.eq_ignore_ascii_case("inf") || s.eq_ignore_ascii_case("nan") {
        return true;
    }
    let all_digits = |t: &str| t.bytes().all(|b| b.is_ascii_digit());
    let (mantissa, exponent) = match s.split_once(['e', 'E']) {
        Some((m, e)) => (m, Some(e)),
        None => (s, None),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some((i, f)) => (i, f),
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return false;
    }
    if !all_digits(int_part) || !all_digits(frac_part) {
        return false;
    }
    match exponent {
        Some(e) => {
            let e = e.strip_prefix(['+', '-']).unwrap_or(e);
            !e.is_empty() && all_digits(e)
        }
        None => true,
    }
}

impl FromStr for Scalar {
    type Err = ParseScalarError;

    /// Parses a decimal number, accepting `,` as the decimal separator in
    /// addition to `.`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(',', ".");
        if !is_well_formed_decimal(&normalized) {
            return Err(ParseScalarError { input: s.to_string() });
        }
        let parsed =
            with_consts(|cc| BigFloat::parse(&normalized, Radix::Dec, prec(), RM, cc));
        if parsed.is_nan() && !normalized.eq_ignore_ascii_case("nan") {
            return Err(ParseScalarError { input: s.to_string() });
        }
        Ok(Scalar(parsed))
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar(BigFloat::from_i64(v, prec()))
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::from(v as i64)
    }
}

impl From<u32> for Scalar {
    fn from(v: u32) -> Self {
        Scalar::from(v as i64)
    }
}

impl From<u64> for Scalar {
    fn from(v: u64) -> Self {
        Scalar(BigFloat::from_u64(v, prec()))
    }
}

impl From<usize> for Scalar {
    fn from(v: usize) -> Self {
        Scalar(BigFloat::from_u64(v as u64, prec()))
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar(BigFloat::from_f64(v, prec()))
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident) => {
        impl $trait<&Scalar> for &Scalar {
            type Output = Scalar;
            fn $method(self, rhs: &Scalar) -> Scalar {
                Scalar(self.0.$method(&rhs.0, prec(), RM))
            }
        }
        impl $trait<Scalar> for &Scalar {
            type Output = Scalar;
            fn $method(self, rhs: Scalar) -> Scalar {
                self.$method(&rhs)
            }
        }
        impl $trait<&Scalar> for Scalar {
            type Output = Scalar;
            fn $method(self, rhs: &Scalar) -> Scalar {
                (&self).$method(rhs)
            }
        }
        impl $trait<Scalar> for Scalar {
            type Output = Scalar;
            fn $method(self, rhs: Scalar) -> Scalar {
                (&self).$method(&rhs)
            }
        }
    };
}

impl_binop!(Add, add);
impl_binop!(Sub, sub);
impl_binop!(Mul, mul);
impl_binop!(Div, div);

impl Neg for &Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar(self.0.clone().neg())
    }
}

impl Neg for Scalar {
    type Output = Scalar;
    fn neg(self) -> Scalar {
        Scalar(self.0.neg())
    }
}
