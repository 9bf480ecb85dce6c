//! Typed values produced by datatype converters.

use std::fmt;

/// The family of a [`TypedValue`]; each registered datatype produces exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    String,
    Integer,
    Decimal,
    Double,
    Boolean,
    Date,
    Time,
    DateTime,
}

/// Exact decimal: value = mantissa * 10^exponent.
///
/// Always normalized: a non-zero mantissa has no trailing decimal zeros, and
/// zero is `{0, 0}`. Two decimals are equal exactly when their values are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Decimal {
    mantissa: i64,
    exponent: i32,
}

impl Decimal {
    pub const ZERO: Decimal = Decimal {
        mantissa: 0,
        exponent: 0,
    };

    /// Creates a decimal, normalizing trailing zeros into the exponent.
    ///
    /// Returns `None` if normalization would overflow the exponent.
    pub fn new(mantissa: i64, exponent: i32) -> Option<Self> {
        if mantissa == 0 {
            return Some(Self::ZERO);
        }
        let mut mantissa = mantissa;
        let mut exponent = exponent;
        while mantissa % 10 == 0 {
            mantissa /= 10;
            exponent = exponent.checked_add(1)?;
        }
        Some(Self { mantissa, exponent })
    }

    pub fn mantissa(&self) -> i64 {
        self.mantissa
    }

    pub fn exponent(&self) -> i32 {
        self.exponent
    }

    /// Parses an `xsd:decimal` lexical form (`-12.50`, `+3`, `.5`, `7.`).
    pub fn parse(lexical: &str) -> Result<Self, &'static str> {
        let (negative, body) = match lexical.as_bytes().first() {
            Some(b'-') => (true, &lexical[1..]),
            Some(b'+') => (false, &lexical[1..]),
            _ => (false, lexical),
        };
        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };
        if int_part.is_empty() && frac_part.is_empty() {
            return Err("no digits");
        }
        if !int_part.bytes().chain(frac_part.bytes()).all(|b| b.is_ascii_digit()) {
            return Err("unexpected character");
        }

        let digits = format!("{}{}", int_part, frac_part);
        let significant = digits.trim_start_matches('0');
        let trimmed = significant.trim_end_matches('0');
        if trimmed.is_empty() {
            return Ok(Self::ZERO);
        }
        let trailing = (significant.len() - trimmed.len()) as i64;
        let exponent = trailing - frac_part.len() as i64;
        let exponent = i32::try_from(exponent).map_err(|_| "exponent out of range")?;

        let magnitude: u64 = trimmed.parse().map_err(|_| "mantissa exceeds 64 bits")?;
        let mantissa = if negative {
            0i64.checked_sub_unsigned(magnitude).ok_or("mantissa exceeds 64 bits")?
        } else {
            i64::try_from(magnitude).map_err(|_| "mantissa exceeds 64 bits")?
        };
        Ok(Self { mantissa, exponent })
    }
}

impl fmt::Display for Decimal {
    /// Writes the canonical lexical form: no exponent notation, no trailing
    /// fractional zeros, no decimal point for integral values.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.mantissa < 0 {
            f.write_str("-")?;
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        if self.exponent >= 0 {
            f.write_str(&digits)?;
            for _ in 0..self.exponent {
                f.write_str("0")?;
            }
            return Ok(());
        }
        let scale = self.exponent.unsigned_abs() as usize;
        if digits.len() > scale {
            let (int, frac) = digits.split_at(digits.len() - scale);
            write!(f, "{}.{}", int, frac)
        } else {
            f.write_str("0.")?;
            for _ in 0..(scale - digits.len()) {
                f.write_str("0")?;
            }
            f.write_str(&digits)
        }
    }
}

/// A literal converted to a native value.
#[derive(Debug, Clone, PartialEq)]
pub enum TypedValue {
    String(String),
    Integer(i64),
    Decimal(Decimal),
    /// IEEE 754 double. NaN is outside the round-trip domain.
    Double(f64),
    Boolean(bool),
    /// Calendar date.
    Date {
        /// Signed days since 1970-01-01.
        days: i32,
        /// Timezone offset in minutes, if the lexical form had one.
        offset_min: Option<i16>,
    },
    /// Time of day.
    Time {
        /// Microseconds since midnight (0 to 86,399,999,999).
        micros: i64,
        offset_min: Option<i16>,
    },
    /// Date and time.
    DateTime {
        /// Microseconds since the Unix epoch; UTC when an offset is present,
        /// otherwise the local wall-clock reading.
        epoch_micros: i64,
        offset_min: Option<i16>,
    },
}

impl TypedValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            TypedValue::String(_) => ValueType::String,
            TypedValue::Integer(_) => ValueType::Integer,
            TypedValue::Decimal(_) => ValueType::Decimal,
            TypedValue::Double(_) => ValueType::Double,
            TypedValue::Boolean(_) => ValueType::Boolean,
            TypedValue::Date { .. } => ValueType::Date,
            TypedValue::Time { .. } => ValueType::Time,
            TypedValue::DateTime { .. } => ValueType::DateTime,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TypedValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            TypedValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            TypedValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        TypedValue::String(s.to_string())
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        TypedValue::String(s)
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        TypedValue::Integer(v)
    }
}

impl From<bool> for TypedValue {
    fn from(v: bool) -> Self {
        TypedValue::Boolean(v)
    }
}

impl From<Decimal> for TypedValue {
    fn from(v: Decimal) -> Self {
        TypedValue::Decimal(v)
    }
}
