//! Duration string parsing.
//!
//! Accepts the usual `h`/`m`/`s`/`ms`/`us`/`ns` unit grammar, extended with
//! a `d` suffix meaning days; day values are folded into hours (x24) before
//! the total is computed. Whitespace between a number and its unit is
//! tolerated so values reassembled from DSL tokens still parse.

use chrono::Duration;

use crate::error::{ErrorKind, ValidationError};

const NANOS_PER_DAY: f64 = 24.0 * NANOS_PER_HOUR;
const NANOS_PER_HOUR: f64 = 3_600_000_000_000.0;
const NANOS_PER_MINUTE: f64 = 60_000_000_000.0;
const NANOS_PER_SECOND: f64 = 1_000_000_000.0;
const NANOS_PER_MILLI: f64 = 1_000_000.0;
const NANOS_PER_MICRO: f64 = 1_000.0;

/// Parse a duration string such as `1h30m`, `4500ms`, or `2d12h`.
pub fn parse_duration(text: &str) -> Result<Duration, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ErrorKind::InvalidDuration.err().with_value(text));
    }

    // A bare zero needs no unit.
    if trimmed == "0" {
        return Ok(Duration::zero());
    }

    let mut chars = trimmed.chars().peekable();
    let mut negative = false;
    if chars.peek() == Some(&'-') {
        negative = true;
        chars.next();
    }

    let mut total_nanos = 0.0f64;
    let mut components = 0;

    loop {
        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        if chars.peek().is_none() {
            break;
        }

        // Numeric part, with an optional decimal fraction.
        let mut number = String::new();
        while chars.peek().is_some_and(|c| c.is_ascii_digit() || *c == '.') {
            number.push(chars.next().unwrap());
        }

        if number.is_empty() {
            return Err(ErrorKind::InvalidDuration.err().with_value(text));
        }

        let value: f64 = number
            .parse()
            .map_err(|_| ErrorKind::InvalidInteger.err().with_context(number.clone()))?;

        while chars.peek().is_some_and(|c| c.is_whitespace()) {
            chars.next();
        }

        // Unit part.
        let mut unit = String::new();
        while chars.peek().is_some_and(|c| c.is_alphabetic() || *c == 'µ') {
            unit.push(chars.next().unwrap());
        }

        let scale = match unit.as_str() {
            "ns" => 1.0,
            "us" | "µs" => NANOS_PER_MICRO,
            "ms" => NANOS_PER_MILLI,
            "s" => NANOS_PER_SECOND,
            "m" => NANOS_PER_MINUTE,
            "h" => NANOS_PER_HOUR,
            "d" => NANOS_PER_DAY,
            _ => return Err(ErrorKind::InvalidDuration.err().with_value(text)),
        };

        total_nanos += value * scale;
        components += 1;
    }

    if components == 0 {
        return Err(ErrorKind::InvalidDuration.err().with_value(text));
    }

    if negative {
        total_nanos = -total_nanos;
    }

    Ok(Duration::nanoseconds(total_nanos as i64))
}
