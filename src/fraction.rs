//! Exact non-negative rationals for gamete and offspring probabilities.
//!
//! All probabilities in a cross are built from quarters, halves and the
//! recombination rate, so they stay exact as long as the rate itself is exact.
//! Values are kept reduced, which makes the derived `Eq`/`Hash` structural
//! equality coincide with numeric equality.

use crate::error::{CrossError, Result};
use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Largest denominator accepted when a float crosses into the engine.
pub const MAX_APPROX_DENOMINATOR: u64 = 1_000_000;

/// Reduced fraction `numer / denom` with `denom > 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fraction {
    numer: u64,
    denom: u64,
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

impl Fraction {
    /// Builds `numer / denom` in lowest terms. Returns `None` when `denom == 0`.
    pub fn new(numer: u64, denom: u64) -> Option<Self> {
        Self::from_wide(numer as u128, denom as u128)
    }

    fn from_wide(numer: u128, denom: u128) -> Option<Self> {
        if denom == 0 {
            return None;
        }
        let g = gcd(numer, denom).max(1);
        let (numer, denom) = (numer / g, denom / g);
        Some(Self {
            numer: u64::try_from(numer).ok()?,
            denom: u64::try_from(denom).ok()?,
        })
    }

    pub const HALF: Fraction = Fraction { numer: 1, denom: 2 };
    pub const QUARTER: Fraction = Fraction { numer: 1, denom: 4 };

    pub const fn zero() -> Self {
        Self { numer: 0, denom: 1 }
    }

    pub const fn one() -> Self {
        Self { numer: 1, denom: 1 }
    }

    pub fn numer(&self) -> u64 {
        self.numer
    }

    pub fn denom(&self) -> u64 {
        self.denom
    }

    pub fn is_zero(&self) -> bool {
        self.numer == 0
    }

    pub fn is_one(&self) -> bool {
        self.numer == self.denom
    }

    pub fn to_f64(&self) -> f64 {
        self.numer as f64 / self.denom as f64
    }

    /// `self - other`, or `None` if the result would be negative.
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        let lhs = self.numer as u128 * other.denom as u128;
        let rhs = other.numer as u128 * self.denom as u128;
        Self::from_wide(lhs.checked_sub(rhs)?, self.denom as u128 * other.denom as u128)
    }

    /// `self + other`, or `None` when the reduced result does not fit in `u64`.
    pub fn checked_add(self, other: Self) -> Option<Self> {
        let numer = (self.numer as u128 * other.denom as u128)
            .checked_add(other.numer as u128 * self.denom as u128)?;
        Self::from_wide(numer, self.denom as u128 * other.denom as u128)
    }

    /// `self * other`, or `None` when the reduced result does not fit in `u64`.
    pub fn checked_mul(self, other: Self) -> Option<Self> {
        Self::from_wide(
            self.numer as u128 * other.numer as u128,
            self.denom as u128 * other.denom as u128,
        )
    }

    pub fn try_add(self, other: Self) -> Result<Self> {
        self.checked_add(other)
            .ok_or_else(|| CrossError::overflow(format!("{} + {}", self, other)))
    }

    pub fn try_mul(self, other: Self) -> Result<Self> {
        self.checked_mul(other)
            .ok_or_else(|| CrossError::overflow(format!("{} * {}", self, other)))
    }

    /// Exact sum of `iter`, failing on the first overflow.
    pub fn try_sum<I: IntoIterator<Item = Self>>(iter: I) -> Result<Self> {
        iter.into_iter()
            .try_fold(Fraction::zero(), |acc, x| acc.try_add(x))
    }

    /// Halves the value, used for the per-strand share of a linked gamete.
    pub fn half(self) -> Result<Self> {
        self.try_mul(Fraction::HALF)
    }

    /// Formats as a percentage: `100%`, `25%`, or `22.50%` when not integral.
    pub fn percent(&self) -> String {
        let scaled = self.numer as u128 * 100;
        if scaled % self.denom as u128 == 0 {
            format!("{}%", scaled / self.denom as u128)
        } else {
            format!("{:.2}%", self.to_f64() * 100.0)
        }
    }

    /// Best rational approximation of `value` whose denominator does not exceed
    /// `max_denom`, found by walking the continued fraction expansion.
    ///
    /// Only used where a float enters from outside (CLI or Python); the engine
    /// itself never goes through floating point.
    pub fn approximate(value: f64, max_denom: u64) -> Option<Self> {
        if !value.is_finite() || value < 0.0 || max_denom == 0 {
            return None;
        }
        let (mut p0, mut q0, mut p1, mut q1) = (0u64, 1u64, 1u64, 0u64);
        let mut x = value;
        loop {
            let a = x.floor();
            if a > u64::MAX as f64 {
                return None;
            }
            let a = a as u64;
            let q2 = q0.checked_add(a.checked_mul(q1)?)?;
            if q2 > max_denom {
                break;
            }
            let p2 = p0.checked_add(a.checked_mul(p1)?)?;
            (p0, q0, p1, q1) = (p1, q1, p2, q2);
            let rem = x - a as f64;
            if rem <= f64::EPSILON * x.max(1.0) {
                return Self::new(p1, q1);
            }
            x = 1.0 / rem;
        }
        let k = (max_denom - q0) / q1;
        let bound1 = Self::new(
            p0.checked_add(k.checked_mul(p1)?)?,
            q0.checked_add(k.checked_mul(q1)?)?,
        )?;
        let bound2 = Self::new(p1, q1)?;
        if (bound2.to_f64() - value).abs() <= (bound1.to_f64() - value).abs() {
            Some(bound2)
        } else {
            Some(bound1)
        }
    }
}

impl Default for Fraction {
    fn default() -> Self {
        Self::zero()
    }
}

impl Ord for Fraction {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.numer as u128 * other.denom as u128).cmp(&(other.numer as u128 * self.denom as u128))
    }
}

impl PartialOrd for Fraction {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fraction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom == 1 {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl Serialize for Fraction {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Parses either `n/d` or a plain decimal such as `0.1`, `.25` or `1`.
/// Decimals are read digit by digit, so `0.1` is exactly `1/10`.
impl FromStr for Fraction {
    type Err = CrossError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let bad = || CrossError::parse(format!("`{}` is not a non-negative number", s));
        if let Some((n, d)) = s.split_once('/') {
            let n: u64 = n.trim().parse().map_err(|_| bad())?;
            let d: u64 = d.trim().parse().map_err(|_| bad())?;
            return Self::new(n, d).ok_or_else(bad);
        }
        let (int_part, frac_part) = s.split_once('.').unwrap_or((s, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return Err(bad());
        }
        let all_digits = |t: &str| t.chars().all(|c| c.is_ascii_digit());
        if !all_digits(int_part) || !all_digits(frac_part) || frac_part.len() > 18 {
            return Err(bad());
        }
        let int_value: u128 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().map_err(|_| bad())?
        };
        let frac_value: u128 = if frac_part.is_empty() {
            0
        } else {
            frac_part.parse().map_err(|_| bad())?
        };
        let scale = 10u128.pow(frac_part.len() as u32);
        let numer = int_value
            .checked_mul(scale)
            .and_then(|v| v.checked_add(frac_value))
            .ok_or_else(bad)?;
        Self::from_wide(numer, scale).ok_or_else(bad)
    }
}
