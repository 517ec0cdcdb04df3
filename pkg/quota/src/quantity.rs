//! Exact Kubernetes resource quantities.
//!
//! A quantity is stored as a signed count of nano-units, the finest
//! precision Kubernetes keeps. Anything smaller rounds up, away from zero.
//! Arithmetic is integer-only so large byte counts never lose precision.

use std::cmp::Ordering;
use std::fmt;
use std::ops::Sub;
use std::str::FromStr;

use thiserror::Error;

const NANO_EXPONENT: i64 = 9;
const NANOS_PER_UNIT: u128 = 1_000_000_000;

/// Magnitudes saturate here (10^21 units). Keeps `a - b` far from overflow.
const MAX_NANOS: i128 = 10i128.pow(30);

/// Significant digits kept exactly; i128 holds every 38-digit integer.
const MAX_DIGITS: usize = 38;

/// Characters allowed in a suffix before its optional signed digits.
const SUFFIX_LETTERS: &[u8] = b"eEinumkKMGTP";

const BINARY_SUFFIXES: [&str; 7] = ["", "Ki", "Mi", "Gi", "Ti", "Pi", "Ei"];

/// How a quantity is rendered back to a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Format {
    /// `1e3`, `5e-3`
    DecimalExponent,
    /// `1Ki`, `5Gi`
    BinarySI,
    /// `100m`, `2k`, `1500`
    #[default]
    DecimalSI,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum QuantityErrorKind {
    #[error("quantities must match the regular expression '^([+-]?[0-9.]+)([eEinumkKMGTP]*[-+]?[0-9]*)$'")]
    Format,
    #[error("unable to parse quantity's suffix")]
    Suffix,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind} (got {input:?})")]
pub struct QuantityError {
    pub input: String,
    pub kind: QuantityErrorKind,
}

/// A parsed quantity. Equality and ordering only look at the value,
/// never at the format: `1k == 1000`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quantity {
    nanos: i128,
    format: Format,
}

impl Quantity {
    pub fn zero() -> Self {
        Self::default()
    }

    /// Parse a quantity string. The empty string is zero.
    ///
    /// Only malformed strings fail. Magnitudes beyond 10^21 saturate at
    /// that bound, keeping their sign.
    pub fn parse(input: &str) -> Result<Self, QuantityError> {
        let fail = |kind| QuantityError {
            input: input.to_string(),
            kind,
        };

        if input.is_empty() {
            return Ok(Self::zero());
        }

        let (negative, rest) = match input.as_bytes()[0] {
            b'-' => (true, &input[1..]),
            b'+' => (false, &input[1..]),
            _ => (false, input),
        };

        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, rest) = rest.split_at(int_len);
        let (frac_digits, suffix) = match rest.strip_prefix('.') {
            Some(after) => {
                let frac_len = after.bytes().take_while(u8::is_ascii_digit).count();
                after.split_at(frac_len)
            }
            None => ("", rest),
        };

        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(fail(QuantityErrorKind::Format));
        }
        if !is_suffix_shaped(suffix) {
            return Err(fail(QuantityErrorKind::Format));
        }

        let (scale, format) = parse_suffix(suffix).ok_or_else(|| fail(QuantityErrorKind::Suffix))?;
        let nanos = to_nanos(int_digits, frac_digits, scale);

        Ok(Self {
            nanos: if negative { -nanos } else { nanos },
            format,
        })
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn is_zero(&self) -> bool {
        self.nanos == 0
    }

    pub fn is_negative(&self) -> bool {
        self.nanos < 0
    }

    /// The value in nano-units (`1` is `1000000000`).
    pub fn as_nanos(&self) -> i128 {
        self.nanos
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl PartialEq for Quantity {
    fn eq(&self, other: &Self) -> bool {
        self.nanos == other.nanos
    }
}

impl Eq for Quantity {}

impl PartialOrd for Quantity {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Quantity {
    fn cmp(&self, other: &Self) -> Ordering {
        self.nanos.cmp(&other.nanos)
    }
}

impl Sub for Quantity {
    type Output = Quantity;

    /// The result keeps the format of `self`, unless `self` is zero.
    fn sub(self, rhs: Self) -> Self::Output {
        let format = if self.is_zero() { rhs.format } else { self.format };
        Quantity {
            nanos: self.nanos - rhs.nanos,
            format,
        }
    }
}

impl fmt::Display for Quantity {
    /// Canonical form: the largest suffix that keeps the mantissa an integer.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nanos == 0 {
            return f.write_str("0");
        }
        let sign = if self.nanos < 0 { "-" } else { "" };
        let abs = self.nanos.unsigned_abs();

        // Binary rendering only for whole values of at least 1Ki.
        if self.format == Format::BinarySI
            && abs % NANOS_PER_UNIT == 0
            && abs / NANOS_PER_UNIT >= 1024
        {
            let mut units = abs / NANOS_PER_UNIT;
            let mut idx = 0;
            while idx + 1 < BINARY_SUFFIXES.len() && units % 1024 == 0 {
                units /= 1024;
                idx += 1;
            }
            return write!(f, "{}{}{}", sign, units, BINARY_SUFFIXES[idx]);
        }

        let max_exponent = match self.format {
            Format::DecimalExponent => i64::MAX,
            _ => 18,
        };
        let mut mantissa = abs;
        let mut exponent = -NANO_EXPONENT;
        while mantissa % 1000 == 0 && exponent + 3 <= max_exponent {
            mantissa /= 1000;
            exponent += 3;
        }

        match self.format {
            Format::DecimalExponent if exponent != 0 => {
                write!(f, "{}{}e{}", sign, mantissa, exponent)
            }
            Format::DecimalExponent => write!(f, "{}{}", sign, mantissa),
            _ => write!(f, "{}{}{}", sign, mantissa, decimal_suffix(exponent)),
        }
    }
}

/// Power of the base a suffix multiplies by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scale {
    Decimal(i64),
    Binary(u32),
}

/// Shape check from the Kubernetes grammar: `[eEinumkKMGTP]*[-+]?[0-9]*`.
fn is_suffix_shaped(suffix: &str) -> bool {
    let letters = suffix
        .bytes()
        .take_while(|b| SUFFIX_LETTERS.contains(b))
        .count();
    let tail = &suffix[letters..];
    let tail = tail.strip_prefix(['+', '-']).unwrap_or(tail);
    tail.bytes().all(|b| b.is_ascii_digit())
}

fn parse_suffix(suffix: &str) -> Option<(Scale, Format)> {
    let decimal = |exp| Some((Scale::Decimal(exp), Format::DecimalSI));
    let binary = |exp| Some((Scale::Binary(exp), Format::BinarySI));
    match suffix {
        "" => decimal(0),
        "n" => decimal(-9),
        "u" => decimal(-6),
        "m" => decimal(-3),
        "k" => decimal(3),
        "M" => decimal(6),
        "G" => decimal(9),
        "T" => decimal(12),
        "P" => decimal(15),
        "E" => decimal(18),
        "Ki" => binary(10),
        "Mi" => binary(20),
        "Gi" => binary(30),
        "Ti" => binary(40),
        "Pi" => binary(50),
        "Ei" => binary(60),
        _ => {
            let exponent = suffix.strip_prefix(['e', 'E'])?;
            if exponent.is_empty() {
                return None;
            }
            let exponent: i64 = exponent.parse().ok()?;
            Some((Scale::Decimal(exponent), Format::DecimalExponent))
        }
    }
}

fn decimal_suffix(exponent: i64) -> &'static str {
    match exponent {
        -9 => "n",
        -6 => "u",
        -3 => "m",
        3 => "k",
        6 => "M",
        9 => "G",
        12 => "T",
        15 => "P",
        18 => "E",
        _ => "",
    }
}

fn pow10(exponent: i64) -> Option<i128> {
    u32::try_from(exponent)
        .ok()
        .and_then(|e| 10i128.checked_pow(e))
}

/// `digits * scale` in nano-units, rounded up and saturated at `MAX_NANOS`.
fn to_nanos(int_digits: &str, frac_digits: &str, scale: Scale) -> i128 {
    let joined = format!("{}{}", int_digits, frac_digits);
    let significant = joined.trim_start_matches('0').trim_end_matches('0');
    if significant.is_empty() {
        return 0;
    }

    // value = significant * 10^exponent nano-units
    let trailing_zeros = joined.len() - joined.trim_end_matches('0').len();
    let mut exponent = NANO_EXPONENT - frac_digits.len() as i64 + trailing_zeros as i64;

    // Digits past MAX_DIGITS are dropped; the last one is non-zero, so the
    // kept prefix is strictly below the true value.
    let (kept, truncated) = if significant.len() > MAX_DIGITS {
        exponent += (significant.len() - MAX_DIGITS) as i64;
        (&significant[..MAX_DIGITS], true)
    } else {
        (significant, false)
    };
    let Ok(mut numerator) = kept.parse::<i128>() else {
        return MAX_NANOS;
    };

    match scale {
        Scale::Decimal(exp) => exponent = exponent.saturating_add(exp),
        Scale::Binary(bits) => match numerator.checked_mul(1i128 << bits) {
            Some(n) => numerator = n,
            None => return MAX_NANOS,
        },
    }

    let nanos = if exponent >= 0 {
        pow10(exponent)
            .and_then(|p| numerator.checked_mul(p))
            .map_or(MAX_NANOS, |n| n.saturating_add(i128::from(truncated)))
    } else {
        match exponent.checked_neg().and_then(pow10) {
            Some(denominator) => {
                let inexact = truncated || numerator % denominator != 0;
                numerator / denominator + i128::from(inexact)
            }
            // Non-zero but far below one nano-unit.
            None => 1,
        }
    };
    nanos.min(MAX_NANOS)
}
