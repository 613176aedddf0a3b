// ABOUTME: String-backed arbitrary-precision decimal arithmetic for the `decimal` type

use crate::error::AislError;
use std::cmp::Ordering;

const DEFAULT_PRECISION: usize = 20;

struct Parsed {
    negative: bool,
    int_digits: String,
    frac_digits: String,
}

fn parse(s: &str) -> Result<Parsed, AislError> {
    let mut chars = s.chars().peekable();
    let negative = matches!(chars.peek(), Some('-'));
    if negative {
        chars.next();
    }
    let rest: String = chars.collect();
    let (int_part, frac_part) = match rest.split_once('.') {
        Some((i, f)) => (i, f),
        None => (rest.as_str(), ""),
    };
    if int_part.is_empty() || !int_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AislError::Runtime(format!("invalid decimal literal: {s}")));
    }
    if !frac_part.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AislError::Runtime(format!("invalid decimal literal: {s}")));
    }
    Ok(Parsed {
        negative,
        int_digits: int_part.to_string(),
        frac_digits: frac_part.to_string(),
    })
}

/// Parses then re-serializes into canonical form: optional `-`, no surplus
/// leading zeros in the integer part, no trailing zeros in the fractional
/// part, `0`/`-0` both collapse to `"0"`.
pub fn normalize(s: &str) -> Result<String, AislError> {
    let p = parse(s)?;
    compose(p.negative, &p.int_digits, &p.frac_digits)
}

fn compose(negative: bool, int_digits: &str, frac_digits: &str) -> Result<String, AislError> {
    let int_trimmed = int_digits.trim_start_matches('0');
    let int_trimmed = if int_trimmed.is_empty() { "0" } else { int_trimmed };
    let frac_trimmed = frac_digits.trim_end_matches('0');

    let is_zero = int_trimmed == "0" && frac_trimmed.is_empty();
    let sign = if negative && !is_zero { "-" } else { "" };

    if frac_trimmed.is_empty() {
        Ok(format!("{sign}{int_trimmed}"))
    } else {
        Ok(format!("{sign}{int_trimmed}.{frac_trimmed}"))
    }
}

fn pad_left(s: &str, len: usize) -> String {
    if s.len() >= len {
        s.to_string()
    } else {
        format!("{}{}", "0".repeat(len - s.len()), s)
    }
}

fn pad_right(s: &str, len: usize) -> String {
    if s.len() >= len {
        s.to_string()
    } else {
        format!("{}{}", s, "0".repeat(len - s.len()))
    }
}

fn strip_leading_zeros(s: &str) -> &str {
    let trimmed = s.trim_start_matches('0');
    if trimmed.is_empty() {
        "0"
    } else {
        trimmed
    }
}

fn cmp_magnitude_digits(a: &str, b: &str) -> Ordering {
    let a = strip_leading_zeros(a);
    let b = strip_leading_zeros(b);
    if a.len() != b.len() {
        a.len().cmp(&b.len())
    } else {
        a.cmp(b)
    }
}

/// a + b where both are plain unsigned decimal digit strings of equal length.
fn add_digit_strings(a: &str, b: &str) -> String {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut result = vec![0u8; a.len() + 1];
    let mut carry = 0u8;
    for i in (0..a.len()).rev() {
        let da = a[i] - b'0';
        let db = b[i] - b'0';
        let sum = da + db + carry;
        result[i + 1] = (sum % 10) + b'0';
        carry = sum / 10;
    }
    result[0] = carry + b'0';
    let s = String::from_utf8(result).unwrap();
    strip_leading_zeros(&s).to_string()
}

/// a - b where both are plain unsigned digit strings of equal length and a >= b.
fn sub_digit_strings(a: &str, b: &str) -> String {
    let a = a.as_bytes();
    let b = b.as_bytes();
    let mut result = vec![0i8; a.len()];
    let mut borrow = 0i8;
    for i in (0..a.len()).rev() {
        let da = (a[i] - b'0') as i8;
        let db = (b[i] - b'0') as i8;
        let mut diff = da - db - borrow;
        if diff < 0 {
            diff += 10;
            borrow = 1;
        } else {
            borrow = 0;
        }
        result[i] = diff;
    }
    let s: String = result.iter().map(|d| (*d as u8 + b'0') as char).collect();
    strip_leading_zeros(&s).to_string()
}

/// Aligns fractional lengths, then adds or subtracts magnitudes (whichever
/// `add`/`sub` on signed decimals requires), returning `(int_digits, frac_digits)`.
fn magnitude_add(ia: &str, fa: &str, ib: &str, fb: &str) -> (String, String) {
    let frac_len = fa.len().max(fb.len());
    let fa_p = pad_right(fa, frac_len);
    let fb_p = pad_right(fb, frac_len);
    let int_len = ia.len().max(ib.len());
    let ia_p = pad_left(ia, int_len);
    let ib_p = pad_left(ib, int_len);

    let combined_a = format!("{ia_p}{fa_p}");
    let combined_b = format!("{ib_p}{fb_p}");
    let sum = add_digit_strings(&combined_a, &combined_b);
    split_at_frac(&sum, frac_len)
}

fn magnitude_sub(ia: &str, fa: &str, ib: &str, fb: &str) -> (String, String) {
    let frac_len = fa.len().max(fb.len());
    let fa_p = pad_right(fa, frac_len);
    let fb_p = pad_right(fb, frac_len);
    let int_len = ia.len().max(ib.len());
    let ia_p = pad_left(ia, int_len);
    let ib_p = pad_left(ib, int_len);

    let combined_a = format!("{ia_p}{fa_p}");
    let combined_b = format!("{ib_p}{fb_p}");
    let diff = sub_digit_strings(&combined_a, &combined_b);
    split_at_frac(&diff, frac_len)
}

fn split_at_frac(combined: &str, frac_len: usize) -> (String, String) {
    if frac_len == 0 {
        return (combined.to_string(), String::new());
    }
    let padded = pad_left(combined, frac_len + 1);
    let split = padded.len() - frac_len;
    (padded[..split].to_string(), padded[split..].to_string())
}

fn cmp_aligned(ia: &str, fa: &str, ib: &str, fb: &str) -> Ordering {
    let frac_len = fa.len().max(fb.len());
    let fa_p = pad_right(fa, frac_len);
    let fb_p = pad_right(fb, frac_len);
    let int_cmp = cmp_magnitude_digits(ia, ib);
    if int_cmp != Ordering::Equal {
        return int_cmp;
    }
    fa_p.cmp(&fb_p)
}

pub fn add(a: &str, b: &str) -> Result<String, AislError> {
    let pa = parse(a)?;
    let pb = parse(b)?;
    let (negative, int_digits, frac_digits) = if pa.negative == pb.negative {
        let (i, f) = magnitude_add(&pa.int_digits, &pa.frac_digits, &pb.int_digits, &pb.frac_digits);
        (pa.negative, i, f)
    } else {
        match cmp_aligned(&pa.int_digits, &pa.frac_digits, &pb.int_digits, &pb.frac_digits) {
            Ordering::Equal => (false, "0".to_string(), String::new()),
            Ordering::Greater => {
                let (i, f) =
                    magnitude_sub(&pa.int_digits, &pa.frac_digits, &pb.int_digits, &pb.frac_digits);
                (pa.negative, i, f)
            }
            Ordering::Less => {
                let (i, f) =
                    magnitude_sub(&pb.int_digits, &pb.frac_digits, &pa.int_digits, &pa.frac_digits);
                (pb.negative, i, f)
            }
        }
    };
    compose(negative, &int_digits, &frac_digits)
}

pub fn sub(a: &str, b: &str) -> Result<String, AislError> {
    add(a, &neg(b)?)
}

pub fn neg(a: &str) -> Result<String, AislError> {
    let normalized = normalize(a)?;
    if normalized == "0" {
        Ok("0".to_string())
    } else if let Some(rest) = normalized.strip_prefix('-') {
        Ok(rest.to_string())
    } else {
        Ok(format!("-{normalized}"))
    }
}

pub fn abs(a: &str) -> Result<String, AislError> {
    let normalized = normalize(a)?;
    Ok(normalized.trim_start_matches('-').to_string())
}

/// Full multiplication of two unsigned digit strings (schoolbook, O(n*m)).
fn mul_digit_strings(a: &str, b: &str) -> String {
    let a: Vec<u32> = a.bytes().rev().map(|c| (c - b'0') as u32).collect();
    let b: Vec<u32> = b.bytes().rev().map(|c| (c - b'0') as u32).collect();
    let mut product = vec![0u32; a.len() + b.len()];
    for (i, &da) in a.iter().enumerate() {
        if da == 0 {
            continue;
        }
        let mut carry = 0u32;
        for (j, &db) in b.iter().enumerate() {
            let sum = product[i + j] + da * db + carry;
            product[i + j] = sum % 10;
            carry = sum / 10;
        }
        let mut k = i + b.len();
        while carry > 0 {
            let sum = product[k] + carry;
            product[k] = sum % 10;
            carry = sum / 10;
            k += 1;
        }
    }
    let s: String = product
        .iter()
        .rev()
        .map(|d| (*d as u8 + b'0') as char)
        .collect();
    strip_leading_zeros(&s).to_string()
}

pub fn mul(a: &str, b: &str) -> Result<String, AislError> {
    let pa = parse(a)?;
    let pb = parse(b)?;
    let da = format!("{}{}", pa.int_digits, pa.frac_digits);
    let db = format!("{}{}", pb.int_digits, pb.frac_digits);
    let product = mul_digit_strings(&da, &db);
    let frac_len = pa.frac_digits.len() + pb.frac_digits.len();
    let (int_digits, frac_digits) = split_at_frac(&product, frac_len);
    let negative = pa.negative != pb.negative;
    compose(negative, &int_digits, &frac_digits)
}

/// Schoolbook long division of unsigned digit string `dividend` by unsigned
/// digit string `divisor` (non-zero); returns the integer quotient digit
/// string (remainder discarded).
fn long_divide(dividend: &str, divisor: &str) -> String {
    let divisor = strip_leading_zeros(divisor);
    let mut quotient = String::new();
    let mut remainder = String::from("0");
    for ch in dividend.chars() {
        remainder = strip_leading_zeros(&format!("{remainder}{ch}")).to_string();
        let mut digit = 0u8;
        while cmp_magnitude_digits(&remainder, divisor) != Ordering::Less {
            remainder = sub_digit_strings(
                &pad_left(&remainder, remainder.len().max(divisor.len())),
                &pad_left(divisor, remainder.len().max(divisor.len())),
            );
            digit += 1;
        }
        quotient.push((digit + b'0') as char);
    }
    strip_leading_zeros(&quotient).to_string()
}

pub fn div(a: &str, b: &str, precision: Option<usize>) -> Result<String, AislError> {
    let precision = precision.unwrap_or(DEFAULT_PRECISION);
    let pa = parse(a)?;
    let pb = parse(b)?;
    if pb.int_digits.trim_start_matches('0').is_empty() && pb.frac_digits.trim_end_matches('0').is_empty() {
        return Err(AislError::DivisionByZero);
    }

    let scale_diff = pa.frac_digits.len() as i64 - pb.frac_digits.len() as i64;
    let shift = precision as i64 + (-scale_diff).max(0);

    let dividend = format!(
        "{}{}{}",
        pa.int_digits,
        pa.frac_digits,
        "0".repeat(shift as usize)
    );
    let divisor = format!("{}{}", pb.int_digits, pb.frac_digits);

    let quotient = long_divide(&dividend, &divisor);
    let frac_len = (precision as i64 + scale_diff.max(0)) as usize;
    let (int_digits, frac_digits) = split_at_frac(&quotient, frac_len);
    let negative = pa.negative != pb.negative;
    compose(negative, &int_digits, &frac_digits)
}

/// Returns -1/0/1 for a < b / a == b / a > b.
pub fn compare(a: &str, b: &str) -> Result<i32, AislError> {
    let pa = parse(a)?;
    let pb = parse(b)?;
    let a_zero = pa.int_digits.trim_start_matches('0').is_empty()
        && pa.frac_digits.trim_end_matches('0').is_empty();
    let b_zero = pb.int_digits.trim_start_matches('0').is_empty()
        && pb.frac_digits.trim_end_matches('0').is_empty();
    if a_zero && b_zero {
        return Ok(0);
    }
    if pa.negative != pb.negative {
        return Ok(if pa.negative { -1 } else { 1 });
    }
    let magnitude_order = cmp_aligned(&pa.int_digits, &pa.frac_digits, &pb.int_digits, &pb.frac_digits);
    let order = if pa.negative {
        magnitude_order.reverse()
    } else {
        magnitude_order
    };
    Ok(match order {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_zeros_and_collapses_negative_zero() {
        assert_eq!(normalize("007.500").unwrap(), "7.5");
        assert_eq!(normalize("-0").unwrap(), "0");
        assert_eq!(normalize("0.0").unwrap(), "0");
        assert_eq!(normalize("-0.000").unwrap(), "0");
    }

    #[test]
    fn normalize_is_idempotent() {
        for s in ["0.1", "42", "-3.1400", "007"] {
            let once = normalize(s).unwrap();
            let twice = normalize(&once).unwrap();
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn add_handles_classic_float_trap() {
        assert_eq!(add("0.1", "0.2").unwrap(), "0.3");
    }

    #[test]
    fn add_is_sign_aware() {
        assert_eq!(add("5", "-3").unwrap(), "2");
        assert_eq!(add("-5", "3").unwrap(), "-2");
        assert_eq!(add("-5", "-3").unwrap(), "-8");
        assert_eq!(add("5", "-5").unwrap(), "0");
    }

    #[test]
    fn add_is_associative_after_normalization() {
        let a = "1.1";
        let b = "2.22";
        let c = "-3.333";
        let left = add(a, &add(b, c).unwrap()).unwrap();
        let right = add(&add(a, b).unwrap(), c).unwrap();
        assert_eq!(normalize(&left).unwrap(), normalize(&right).unwrap());
    }

    #[test]
    fn sub_matches_add_neg() {
        assert_eq!(sub("10", "3").unwrap(), "7");
        assert_eq!(sub("3", "10").unwrap(), "-7");
    }

    #[test]
    fn neg_of_zero_is_zero() {
        assert_eq!(neg("0").unwrap(), "0");
        assert_eq!(neg("5").unwrap(), "-5");
        assert_eq!(neg("-5").unwrap(), "5");
    }

    #[test]
    fn add_neg_self_is_zero() {
        assert_eq!(add("12.345", &neg("12.345").unwrap()).unwrap(), "0");
    }

    #[test]
    fn mul_places_decimal_point_correctly() {
        assert_eq!(mul("1.5", "2").unwrap(), "3");
        assert_eq!(mul("0.1", "0.2").unwrap(), "0.02");
        assert_eq!(mul("-2", "3").unwrap(), "-6");
        assert_eq!(mul("1.23", "4.5").unwrap(), "5.535");
    }

    #[test]
    fn div_rejects_zero_divisor() {
        assert!(matches!(div("10", "0", None), Err(AislError::DivisionByZero)));
    }

    #[test]
    fn div_basic_cases() {
        assert_eq!(div("10", "2", None).unwrap(), "5");
        assert_eq!(div("1", "3", Some(5)).unwrap(), "0.33333");
        assert_eq!(div("-10", "2", None).unwrap(), "-5");
    }

    #[test]
    fn compare_orders_by_sign_then_magnitude() {
        assert_eq!(compare("1", "2").unwrap(), -1);
        assert_eq!(compare("2", "1").unwrap(), 1);
        assert_eq!(compare("1", "1.0").unwrap(), 0);
        assert_eq!(compare("-1", "1").unwrap(), -1);
        assert_eq!(compare("0", "-0").unwrap(), 0);
        assert_eq!(compare("-5", "-3").unwrap(), -1);
    }
}
