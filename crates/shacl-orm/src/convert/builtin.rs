//! Built-in XSD converters.
//!
//! Each converter is a pair of plain functions. Encoders receive a value whose
//! variant the registry has already checked, so the fallback arm only guards
//! direct calls.

use crate::model::{Decimal, TypedValue, ValueType};
use crate::util::datetime;
use crate::vocab::xsd;

use super::Converter;

/// (datatype IRI, converter) pairs installed by `DatatypeRegistry::with_builtins`.
pub(crate) fn converters() -> Vec<(&'static str, Converter)> {
    let string = Converter::new(ValueType::String, decode_string, encode_string);
    vec![
        (xsd::STRING, string),
        (xsd::NORMALIZED_STRING, string),
        (xsd::TOKEN, string),
        (xsd::ANY_URI, string),
        (xsd::INTEGER, Converter::new(ValueType::Integer, decode_integer, encode_integer)),
        (xsd::LONG, Converter::new(ValueType::Integer, decode_integer, encode_integer)),
        (xsd::INT, Converter::new(ValueType::Integer, decode_int, encode_int)),
        (xsd::SHORT, Converter::new(ValueType::Integer, decode_short, encode_short)),
        (
            xsd::NON_NEGATIVE_INTEGER,
            Converter::new(ValueType::Integer, decode_non_negative, encode_non_negative),
        ),
        (
            xsd::POSITIVE_INTEGER,
            Converter::new(ValueType::Integer, decode_positive, encode_positive),
        ),
        (xsd::DECIMAL, Converter::new(ValueType::Decimal, decode_decimal, encode_decimal)),
        (xsd::DOUBLE, Converter::new(ValueType::Double, decode_double, encode_double)),
        (xsd::FLOAT, Converter::new(ValueType::Double, decode_float, encode_float)),
        (xsd::BOOLEAN, Converter::new(ValueType::Boolean, decode_boolean, encode_boolean)),
        (xsd::DATE, Converter::new(ValueType::Date, decode_date, encode_date)),
        (xsd::TIME, Converter::new(ValueType::Time, decode_time, encode_time)),
        (xsd::DATE_TIME, Converter::new(ValueType::DateTime, decode_datetime, encode_datetime)),
    ]
}

fn wrong_variant(value: &TypedValue) -> String {
    format!("unexpected {:?} value", value.value_type())
}

// =========================================================================
// Strings
// =========================================================================

fn decode_string(lexical: &str) -> Result<TypedValue, String> {
    Ok(TypedValue::String(lexical.to_string()))
}

fn encode_string(value: &TypedValue) -> Result<String, String> {
    match value {
        TypedValue::String(s) => Ok(s.clone()),
        other => Err(wrong_variant(other)),
    }
}

// =========================================================================
// Integers
// =========================================================================

fn parse_integer(lexical: &str, min: i64, max: i64) -> Result<TypedValue, String> {
    let digits = lexical.strip_prefix(['+', '-']).unwrap_or(lexical);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("not an integer".to_string());
    }
    let v: i64 = lexical
        .parse()
        .map_err(|_| "integer exceeds 64 bits".to_string())?;
    if v < min || v > max {
        return Err(format!("{} outside [{}, {}]", v, min, max));
    }
    Ok(TypedValue::Integer(v))
}

fn format_integer(value: &TypedValue, min: i64, max: i64) -> Result<String, String> {
    match value {
        TypedValue::Integer(v) if *v < min || *v > max => {
            Err(format!("{} outside [{}, {}]", v, min, max))
        }
        TypedValue::Integer(v) => Ok(v.to_string()),
        other => Err(wrong_variant(other)),
    }
}

fn decode_integer(lexical: &str) -> Result<TypedValue, String> {
    parse_integer(lexical, i64::MIN, i64::MAX)
}

fn encode_integer(value: &TypedValue) -> Result<String, String> {
    format_integer(value, i64::MIN, i64::MAX)
}

fn decode_int(lexical: &str) -> Result<TypedValue, String> {
    parse_integer(lexical, i32::MIN as i64, i32::MAX as i64)
}

fn encode_int(value: &TypedValue) -> Result<String, String> {
    format_integer(value, i32::MIN as i64, i32::MAX as i64)
}

fn decode_short(lexical: &str) -> Result<TypedValue, String> {
    parse_integer(lexical, i16::MIN as i64, i16::MAX as i64)
}

fn encode_short(value: &TypedValue) -> Result<String, String> {
    format_integer(value, i16::MIN as i64, i16::MAX as i64)
}

fn decode_non_negative(lexical: &str) -> Result<TypedValue, String> {
    parse_integer(lexical, 0, i64::MAX)
}

fn encode_non_negative(value: &TypedValue) -> Result<String, String> {
    format_integer(value, 0, i64::MAX)
}

fn decode_positive(lexical: &str) -> Result<TypedValue, String> {
    parse_integer(lexical, 1, i64::MAX)
}

fn encode_positive(value: &TypedValue) -> Result<String, String> {
    format_integer(value, 1, i64::MAX)
}

// =========================================================================
// Decimal and floating point
// =========================================================================

fn decode_decimal(lexical: &str) -> Result<TypedValue, String> {
    Decimal::parse(lexical)
        .map(TypedValue::Decimal)
        .map_err(str::to_string)
}

fn encode_decimal(value: &TypedValue) -> Result<String, String> {
    match value {
        TypedValue::Decimal(d) => Ok(d.to_string()),
        other => Err(wrong_variant(other)),
    }
}

/// XSD spells the specials `INF`, `-INF` and `NaN`; Rust's parser also takes
/// `inf` and `infinity`, which are not valid XSD.
fn parse_float<T>(lexical: &str, inf: T, nan: T) -> Result<T, String>
where
    T: std::str::FromStr + std::ops::Neg<Output = T>,
{
    match lexical {
        "INF" | "+INF" => return Ok(inf),
        "-INF" => return Ok(-inf),
        "NaN" => return Ok(nan),
        _ => {}
    }
    let plausible = !lexical.is_empty()
        && lexical
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !plausible {
        return Err("not a floating-point number".to_string());
    }
    lexical
        .parse()
        .map_err(|_| "not a floating-point number".to_string())
}

fn format_double(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v == f64::INFINITY {
        "INF".to_string()
    } else if v == f64::NEG_INFINITY {
        "-INF".to_string()
    } else {
        v.to_string()
    }
}

fn decode_double(lexical: &str) -> Result<TypedValue, String> {
    parse_float(lexical, f64::INFINITY, f64::NAN).map(TypedValue::Double)
}

fn encode_double(value: &TypedValue) -> Result<String, String> {
    match value {
        TypedValue::Double(v) => Ok(format_double(*v)),
        other => Err(wrong_variant(other)),
    }
}

fn decode_float(lexical: &str) -> Result<TypedValue, String> {
    let v: f32 = parse_float(lexical, f32::INFINITY, f32::NAN)?;
    Ok(TypedValue::Double(v as f64))
}

fn encode_float(value: &TypedValue) -> Result<String, String> {
    match value {
        TypedValue::Double(v) if v.is_nan() => Ok("NaN".to_string()),
        TypedValue::Double(v) if (*v as f32) as f64 != *v => {
            Err(format!("{} is not representable as xsd:float", v))
        }
        TypedValue::Double(v) if v.is_infinite() => Ok(format_double(*v)),
        TypedValue::Double(v) => Ok((*v as f32).to_string()),
        other => Err(wrong_variant(other)),
    }
}

// =========================================================================
// Boolean
// =========================================================================

fn decode_boolean(lexical: &str) -> Result<TypedValue, String> {
    match lexical {
        "true" | "1" => Ok(TypedValue::Boolean(true)),
        "false" | "0" => Ok(TypedValue::Boolean(false)),
        _ => Err("expected true, false, 1 or 0".to_string()),
    }
}

fn encode_boolean(value: &TypedValue) -> Result<String, String> {
    match value {
        TypedValue::Boolean(v) => Ok(v.to_string()),
        other => Err(wrong_variant(other)),
    }
}

// =========================================================================
// Date and time
// =========================================================================

const MICROS_PER_DAY: i64 = 86_400_000_000;
const MAX_OFFSET_MIN: i16 = 14 * 60;

fn check_offset(offset_min: Option<i16>) -> Result<(), String> {
    match offset_min {
        Some(m) if m.abs() > MAX_OFFSET_MIN => Err(format!("offset {} minutes out of range", m)),
        _ => Ok(()),
    }
}

fn decode_date(lexical: &str) -> Result<TypedValue, String> {
    let (days, offset_min) = datetime::parse_date(lexical).map_err(|e| e.to_string())?;
    Ok(TypedValue::Date { days, offset_min })
}

fn encode_date(value: &TypedValue) -> Result<String, String> {
    match value {
        TypedValue::Date { days, offset_min } => {
            check_offset(*offset_min)?;
            Ok(datetime::format_date(*days, *offset_min))
        }
        other => Err(wrong_variant(other)),
    }
}

fn decode_time(lexical: &str) -> Result<TypedValue, String> {
    let (micros, offset_min) = datetime::parse_time(lexical).map_err(|e| e.to_string())?;
    Ok(TypedValue::Time { micros, offset_min })
}

fn encode_time(value: &TypedValue) -> Result<String, String> {
    match value {
        TypedValue::Time { micros, .. } if !(0..MICROS_PER_DAY).contains(micros) => {
            Err(format!("{} microseconds is not a time of day", micros))
        }
        TypedValue::Time { micros, offset_min } => {
            check_offset(*offset_min)?;
            Ok(datetime::format_time(*micros, *offset_min))
        }
        other => Err(wrong_variant(other)),
    }
}

fn decode_datetime(lexical: &str) -> Result<TypedValue, String> {
    let (epoch_micros, offset_min) =
        datetime::parse_datetime(lexical).map_err(|e| e.to_string())?;
    Ok(TypedValue::DateTime {
        epoch_micros,
        offset_min,
    })
}

fn encode_datetime(value: &TypedValue) -> Result<String, String> {
    match value {
        TypedValue::DateTime {
            epoch_micros,
            offset_min,
        } => {
            check_offset(*offset_min)?;
            let shift = offset_min.map_or(0, |m| m as i64 * 60_000_000);
            if epoch_micros.checked_add(shift).is_none() {
                return Err("instant out of range".to_string());
            }
            Ok(datetime::format_datetime(*epoch_micros, *offset_min))
        }
        other => Err(wrong_variant(other)),
    }
}
