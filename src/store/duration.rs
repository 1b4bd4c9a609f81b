//! Combined-unit duration grammar (`1h30m`, `1m3s`, `1.5s`, `250ms`)

use super::value::ValueError;
use std::time::Duration;

const NANOSECOND: u128 = 1;
const MICROSECOND: u128 = 1_000 * NANOSECOND;
const MILLISECOND: u128 = 1_000 * MICROSECOND;
const SECOND: u128 = 1_000 * MILLISECOND;
const MINUTE: u128 = 60 * SECOND;
const HOUR: u128 = 60 * MINUTE;

/// Longest fraction we keep; anything past nanosecond precision of an hour is noise.
const MAX_FRACTION_DIGITS: u32 = 18;

fn unit_nanos(unit: &str) -> Option<u128> {
    match unit {
        "ns" => Some(NANOSECOND),
        "us" | "\u{b5}s" | "\u{3bc}s" => Some(MICROSECOND),
        "ms" => Some(MILLISECOND),
        "s" => Some(SECOND),
        "m" => Some(MINUTE),
        "h" => Some(HOUR),
        _ => None,
    }
}

/// Parse a duration string made of one or more `<number><unit>` terms.
///
/// A leading `+` is accepted, a bare `0` needs no unit, and negative
/// durations are rejected since `Duration` cannot hold them.
pub fn parse_duration(input: &str) -> Result<Duration, ValueError> {
    let invalid = || ValueError::malformed(format!("invalid duration {:?}", input));

    let mut rest = input;
    let mut negative = false;
    if let Some(stripped) = rest.strip_prefix('+') {
        rest = stripped;
    } else if let Some(stripped) = rest.strip_prefix('-') {
        rest = stripped;
        negative = true;
    }

    if rest == "0" {
        return Ok(Duration::ZERO);
    }
    if rest.is_empty() {
        return Err(invalid());
    }

    let mut total: u128 = 0;
    while !rest.is_empty() {
        let int_len = rest.bytes().take_while(u8::is_ascii_digit).count();
        let (int_digits, after_int) = rest.split_at(int_len);

        let (frac_digits, after_number) = match after_int.strip_prefix('.') {
            Some(after_dot) => {
                let frac_len = after_dot.bytes().take_while(u8::is_ascii_digit).count();
                after_dot.split_at(frac_len)
            }
            None => ("", after_int),
        };
        if int_digits.is_empty() && frac_digits.is_empty() {
            return Err(invalid());
        }

        let unit_len = after_number
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(after_number.len());
        let (unit, remainder) = after_number.split_at(unit_len);
        if unit.is_empty() {
            return Err(ValueError::malformed(format!(
                "missing unit in duration {:?}",
                input
            )));
        }
        let scale = unit_nanos(unit).ok_or_else(|| {
            ValueError::malformed(format!("unknown unit {:?} in duration {:?}", unit, input))
        })?;

        let whole: u128 = if int_digits.is_empty() {
            0
        } else {
            int_digits.parse().map_err(|_| invalid())?
        };
        let mut term = whole.checked_mul(scale).ok_or_else(invalid)?;

        if !frac_digits.is_empty() {
            let kept = &frac_digits[..frac_digits.len().min(MAX_FRACTION_DIGITS as usize)];
            let numerator: u128 = kept.parse().map_err(|_| invalid())?;
            let denominator = 10u128.pow(kept.len() as u32);
            term = term
                .checked_add(numerator * scale / denominator)
                .ok_or_else(invalid)?;
        }

        total = total.checked_add(term).ok_or_else(invalid)?;
        rest = remainder;
    }

    if negative && total > 0 {
        return Err(ValueError::malformed(format!(
            "negative duration {:?} is not supported",
            input
        )));
    }
    if total > u64::MAX as u128 {
        return Err(ValueError::malformed(format!(
            "duration {:?} is out of range",
            input
        )));
    }

    Ok(Duration::from_nanos(total as u64))
}

/// Render a duration in the same grammar `parse_duration` accepts.
///
/// Sub-second values use the largest fitting unit (`1.5ms`, `250ns`);
/// longer ones are spelled out as hours, minutes and seconds (`1h0m0s`).
pub fn format_duration(duration: Duration) -> String {
    let nanos = duration.as_nanos();
    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < MICROSECOND {
        return format!("{}ns", nanos);
    }
    if nanos < MILLISECOND {
        return format!("{}\u{b5}s", with_fraction(nanos, MICROSECOND));
    }
    if nanos < SECOND {
        return format!("{}ms", with_fraction(nanos, MILLISECOND));
    }

    let hours = nanos / HOUR;
    let minutes = (nanos % HOUR) / MINUTE;
    let seconds = with_fraction(nanos % MINUTE, SECOND);

    if hours > 0 {
        format!("{}h{}m{}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m{}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

fn with_fraction(value: u128, scale: u128) -> String {
    let whole = value / scale;
    let fraction = value % scale;
    if fraction == 0 {
        return whole.to_string();
    }

    let width = scale.to_string().len() - 1;
    let digits = format!("{:0width$}", fraction, width = width);
    format!("{}.{}", whole, digits.trim_end_matches('0'))
}
