//! Decimal arithmetic with a fixed precision contract
//!
//! Addition, subtraction, negation, absolute value and truncation are exact.
//! Multiplication and division are rounded to [`PRECISION`] significant
//! digits using round-half-even. Remainder is exact and takes the sign of
//! the dividend.
//!
//! Every result stays within [`MAX_SCALE`] powers of ten of the decimal
//! point. Exact operations refuse operands outside that range.

use crate::operators::ArithmeticFault;
use crate::Decimal;
use num_bigint::{BigInt, Sign};
use num_traits::{One, Signed, ToPrimitive, Zero};
use std::cmp::Ordering;

/// Significant digits kept by multiplication, division and `pow`
pub const PRECISION: u64 = 128;

/// Largest exponent magnitude accepted by `pow`
pub const MAX_EXPONENT: i64 = 999_999_999;

/// Largest scale, in either direction, of an operand or result
pub const MAX_SCALE: i64 = 100_000;

// A negative scale is only expanded into plain digits up to this many zeros.
const MAX_EXPANDED_ZEROS: i64 = PRECISION as i64;

fn ten_pow(exponent: u64) -> BigInt {
    num_traits::pow(BigInt::from(10u8), exponent as usize)
}

fn digit_count(value: &BigInt) -> u64 {
    if value.is_zero() {
        return 1;
    }
    value.magnitude().to_str_radix(10).len() as u64
}

/// Drop trailing fractional zeros, and expand small negative scales so that
/// integers carry a scale of zero.
pub fn canonical(value: &Decimal) -> Decimal {
    let (mantissa, scale) = value.as_bigint_and_exponent();
    canonical_parts(mantissa, scale)
}

fn canonical_parts(mut mantissa: BigInt, mut scale: i64) -> Decimal {
    if mantissa.is_zero() {
        return Decimal::zero();
    }
    if scale < 0 {
        if -scale > MAX_EXPANDED_ZEROS {
            return Decimal::new(mantissa, scale);
        }
        mantissa = mantissa * ten_pow(scale.unsigned_abs());
        return Decimal::new(mantissa, 0);
    }
    // Strip zeros a block at a time.
    for block in [64u64, 8, 1] {
        let divisor = ten_pow(block);
        while scale >= block as i64 && (&mantissa % &divisor).is_zero() {
            mantissa = mantissa / &divisor;
            scale -= block as i64;
        }
    }
    Decimal::new(mantissa, scale)
}

fn in_range(value: &Decimal) -> bool {
    value.as_bigint_and_exponent().1.abs() <= MAX_SCALE
}

fn out_of_range(operand: &Decimal, what: &str) -> ArithmeticFault {
    ArithmeticFault::new(
        operand.clone(),
        format!("{} is out of range (scale beyond {})", what, MAX_SCALE),
    )
}

/// Refuse an operand whose scale is beyond [`MAX_SCALE`]
fn check_operands(left: &Decimal, right: &Decimal) -> Result<(), ArithmeticFault> {
    match [left, right].into_iter().find(|value| !in_range(value)) {
        Some(value) => Err(out_of_range(value, "operand")),
        None => Ok(()),
    }
}

/// Pass `value` through if its scale is within [`MAX_SCALE`], otherwise
/// blame `operand`.
fn check_result(value: Decimal, operand: &Decimal) -> Result<Decimal, ArithmeticFault> {
    if in_range(&value) {
        Ok(value)
    } else {
        Err(out_of_range(operand, "result"))
    }
}

/// The operand with the larger scale magnitude
fn wider<'a>(left: &'a Decimal, right: &'a Decimal) -> &'a Decimal {
    let scale = |value: &Decimal| value.as_bigint_and_exponent().1.abs();
    if scale(right) > scale(left) {
        right
    } else {
        left
    }
}

/// Round `mantissa * 10^-scale` to [`PRECISION`] significant digits.
///
/// `inexact` reports a non-zero remainder already discarded below the last
/// digit of `mantissa`, so an apparent tie is rounded up instead of to even.
fn round_to_precision(mantissa: BigInt, scale: i64, inexact: bool) -> Decimal {
    let count = digit_count(&mantissa);
    if count <= PRECISION {
        return canonical_parts(mantissa, scale);
    }

    let dropped = count - PRECISION;
    let divisor = ten_pow(dropped);
    let negative = mantissa.sign() == Sign::Minus;
    let magnitude = mantissa.abs();

    let mut kept = &magnitude / &divisor;
    let discarded = &magnitude % &divisor;
    let half = &divisor / BigInt::from(2u8);

    let round_up = match discarded.cmp(&half) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => inexact || !(&kept % BigInt::from(2u8)).is_zero(),
    };
    if round_up {
        kept = kept + BigInt::one();
    }
    if negative {
        kept = -kept;
    }

    canonical_parts(kept, scale - dropped as i64)
}

pub fn add(left: &Decimal, right: &Decimal) -> Result<Decimal, ArithmeticFault> {
    check_operands(left, right)?;
    Ok(left + right)
}

pub fn subtract(left: &Decimal, right: &Decimal) -> Result<Decimal, ArithmeticFault> {
    check_operands(left, right)?;
    Ok(left - right)
}

pub fn multiply(left: &Decimal, right: &Decimal) -> Result<Decimal, ArithmeticFault> {
    check_result(rounded_product(left, right), wider(left, right))
}

fn rounded_product(left: &Decimal, right: &Decimal) -> Decimal {
    let (mantissa, scale) = (left * right).as_bigint_and_exponent();
    round_to_precision(mantissa, scale, false)
}

pub fn divide(dividend: &Decimal, divisor: &Decimal) -> Result<Decimal, ArithmeticFault> {
    if divisor.is_zero() {
        return Err(ArithmeticFault::new(divisor.clone(), "division by zero"));
    }
    check_result(divide_unchecked(dividend, divisor), wider(dividend, divisor))
}

/// Quotient rounded to [`PRECISION`] digits; `divisor` must not be zero.
fn divide_unchecked(dividend: &Decimal, divisor: &Decimal) -> Decimal {
    if dividend.is_zero() {
        return Decimal::zero();
    }

    let (numerator, numerator_scale) = dividend.as_bigint_and_exponent();
    let (denominator, denominator_scale) = divisor.as_bigint_and_exponent();

    // Pad the numerator so the integer quotient carries at least two digits
    // beyond the target precision.
    let padding = (PRECISION + 2 + digit_count(&denominator)).saturating_sub(digit_count(&numerator));
    let scaled = numerator * ten_pow(padding);
    let quotient = &scaled / &denominator;
    let inexact = !(&scaled % &denominator).is_zero();

    round_to_precision(
        quotient,
        numerator_scale - denominator_scale + padding as i64,
        inexact,
    )
}

/// `dividend - trunc(dividend / divisor) * divisor`, computed exactly
pub fn remainder(dividend: &Decimal, divisor: &Decimal) -> Result<Decimal, ArithmeticFault> {
    if divisor.is_zero() {
        return Err(ArithmeticFault::new(divisor.clone(), "remainder by zero"));
    }
    check_operands(dividend, divisor)?;

    let (left, left_scale) = dividend.as_bigint_and_exponent();
    let (right, right_scale) = divisor.as_bigint_and_exponent();
    let scale = left_scale.max(right_scale);
    let left = left * ten_pow((scale - left_scale) as u64);
    let right = right * ten_pow((scale - right_scale) as u64);

    Ok(canonical_parts(&left % &right, scale))
}

/// Truncate toward zero
pub fn truncate(value: &Decimal) -> Decimal {
    let (mantissa, scale) = value.as_bigint_and_exponent();
    if scale <= 0 {
        return value.clone();
    }
    if digit_count(&mantissa) <= scale as u64 {
        return Decimal::zero();
    }
    canonical_parts(mantissa / ten_pow(scale as u64), 0)
}

/// `base` raised to an integral `exponent`
pub fn power(base: &Decimal, exponent: &Decimal) -> Result<Decimal, ArithmeticFault> {
    let exponent_value = canonical(exponent);
    let (mantissa, scale) = exponent_value.as_bigint_and_exponent();
    if scale > 0 {
        return Err(ArithmeticFault::new(
            exponent.clone(),
            "exponent must be an integer",
        ));
    }

    let too_large = || {
        ArithmeticFault::new(
            exponent.clone(),
            format!("exponent magnitude must not exceed {}", MAX_EXPONENT),
        )
    };
    // Any integer written with more than 18 trailing zeros is out of range.
    if scale < -18 {
        return Err(too_large());
    }
    let exponent_int = (mantissa * ten_pow(scale.unsigned_abs()))
        .to_i64()
        .filter(|n| n.unsigned_abs() <= MAX_EXPONENT as u64)
        .ok_or_else(too_large)?;

    let mut result = Decimal::one();
    let mut square = base.clone();
    let mut remaining = exponent_int.unsigned_abs();
    while remaining > 0 {
        if remaining & 1 == 1 {
            result = rounded_product(&result, &square);
        }
        remaining >>= 1;
        if remaining > 0 {
            square = rounded_product(&square, &square);
        }
    }

    if exponent_int < 0 {
        if result.is_zero() {
            return Err(ArithmeticFault::new(
                base.clone(),
                "zero cannot be raised to a negative power",
            ));
        }
        result = divide_unchecked(&Decimal::one(), &result);
    }
    check_result(canonical(&result), exponent)
}

/// Render a decimal in plain positional notation.
///
/// Only integers with more than [`PRECISION`] trailing zeros, which can come
/// out of `pow`, fall back to `E` notation.
pub fn format_decimal(value: &Decimal) -> String {
    let (mantissa, scale) = value.as_bigint_and_exponent();
    let mut digits = mantissa.magnitude().to_str_radix(10);

    if scale <= 0 {
        if mantissa.is_zero() {
            return "0".to_string();
        }
        if -scale > MAX_EXPANDED_ZEROS {
            digits = format!("{}E+{}", digits, scale.unsigned_abs());
        } else {
            digits.push_str(&"0".repeat(scale.unsigned_abs() as usize));
        }
    } else {
        let scale = scale as usize;
        if digits.len() <= scale {
            digits = format!("{}{}", "0".repeat(scale - digits.len() + 1), digits);
        }
        digits.insert(digits.len() - scale, '.');
    }

    if mantissa.sign() == Sign::Minus {
        format!("-{}", digits)
    } else {
        digits
    }
}
