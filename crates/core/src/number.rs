//! Text <-> number conversion matching how the hub's form fields read and
//! print values.

/// Reads a number from user text. Returns `None` when the text is not a
/// number at all; infinities are returned as such so callers can reject them.
///
/// Blank text reads as `0`. Decimal literals may carry a sign, a fraction and
/// an exponent. Unsigned `0x`, `0o` and `0b` integer literals are accepted.
pub fn coerce_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }
    match trimmed {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    if let Some(value) = parse_radix_literal(trimmed) {
        return value;
    }
    if !is_decimal_literal(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

fn parse_radix_literal(text: &str) -> Option<Option<f64>> {
    let bytes = text.as_bytes();
    if bytes.len() < 2 || bytes[0] != b'0' {
        return None;
    }
    let radix = match bytes[1] {
        b'x' | b'X' => 16,
        b'o' | b'O' => 8,
        b'b' | b'B' => 2,
        _ => return None,
    };
    let digits = &text[2..];
    if digits.is_empty() {
        return Some(None);
    }
    let mut value = 0.0f64;
    for ch in digits.chars() {
        let Some(digit) = ch.to_digit(radix) else {
            return Some(None);
        };
        value = value * f64::from(radix) + f64::from(digit);
    }
    Some(Some(value))
}

fn is_decimal_literal(text: &str) -> bool {
    let mut chars = text.chars().peekable();
    if matches!(chars.peek(), Some('+') | Some('-')) {
        chars.next();
    }
    let mut mantissa_digits = 0usize;
    let mut seen_dot = false;
    while let Some(ch) = chars.peek().copied() {
        if ch.is_ascii_digit() {
            mantissa_digits += 1;
        } else if ch == '.' && !seen_dot {
            seen_dot = true;
        } else {
            break;
        }
        chars.next();
    }
    if mantissa_digits == 0 {
        return false;
    }
    match chars.next() {
        None => true,
        Some('e') | Some('E') => {
            if matches!(chars.peek(), Some('+') | Some('-')) {
                chars.next();
            }
            let mut exponent_digits = 0usize;
            for ch in chars {
                if !ch.is_ascii_digit() {
                    return false;
                }
                exponent_digits += 1;
            }
            exponent_digits > 0
        }
        Some(_) => false,
    }
}

/// Prints a number the way the hub displays coin values and results:
/// shortest round-trip digits, exponent form outside `[1e-6, 1e21)`, and
/// negative zero shown as `0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        return text.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }
    let magnitude = value.abs();
    if magnitude >= 1e21 || magnitude < 1e-6 {
        let raw = format!("{value:e}");
        return match raw.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{mantissa}e+{exponent}")
            }
            _ => raw,
        };
    }
    format!("{value}")
}
