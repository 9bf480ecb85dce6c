//! Datatype conversion registry.
//!
//! Maps datatype IRIs to converter pairs:
//! - decode: lexical form → [`TypedValue`]
//! - encode: [`TypedValue`] → lexical form
//!
//! For every registered datatype and every value in its domain,
//! `decode(encode(v)) == v`.

mod builtin;

use lazy_static::lazy_static;
use rustc_hash::FxHashMap;

use crate::error::ConvertError;
use crate::model::{TypedValue, ValueType};

/// Parses a lexical form. The error is a human-readable reason.
pub type DecodeFn = fn(&str) -> Result<TypedValue, String>;

/// Renders a value in its canonical lexical form.
pub type EncodeFn = fn(&TypedValue) -> Result<String, String>;

/// A decode/encode pair for one datatype.
#[derive(Debug, Clone, Copy)]
pub struct Converter {
    /// The variant `decode` produces and `encode` accepts.
    pub value_type: ValueType,
    pub decode: DecodeFn,
    pub encode: EncodeFn,
}

impl Converter {
    pub fn new(value_type: ValueType, decode: DecodeFn, encode: EncodeFn) -> Self {
        Self {
            value_type,
            decode,
            encode,
        }
    }
}

lazy_static! {
    static ref BUILTIN: DatatypeRegistry = DatatypeRegistry::with_builtins();
}

/// Converters keyed by datatype IRI.
#[derive(Debug, Clone, Default)]
pub struct DatatypeRegistry {
    converters: FxHashMap<String, Converter>,
}

impl DatatypeRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in XSD converters.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for (iri, converter) in builtin::converters() {
            registry.register(iri, converter);
        }
        registry
    }

    /// Shared built-in registry, initialized on first use.
    pub fn builtin() -> &'static DatatypeRegistry {
        &BUILTIN
    }

    /// Adds a converter, replacing any existing one for the same IRI.
    pub fn register(&mut self, datatype: impl Into<String>, converter: Converter) {
        self.converters.insert(datatype.into(), converter);
    }

    pub fn get(&self, datatype: &str) -> Option<&Converter> {
        self.converters.get(datatype)
    }

    pub fn contains(&self, datatype: &str) -> bool {
        self.converters.contains_key(datatype)
    }

    /// The value type a datatype decodes to.
    pub fn value_type(&self, datatype: &str) -> Option<ValueType> {
        self.get(datatype).map(|c| c.value_type)
    }

    pub fn len(&self) -> usize {
        self.converters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.converters.is_empty()
    }

    fn converter(&self, datatype: &str) -> Result<&Converter, ConvertError> {
        self.get(datatype)
            .ok_or_else(|| ConvertError::UnsupportedDatatype {
                datatype: datatype.to_string(),
            })
    }

    /// Decodes a lexical form.
    pub fn decode(&self, datatype: &str, lexical: &str) -> Result<TypedValue, ConvertError> {
        let converter = self.converter(datatype)?;
        (converter.decode)(lexical).map_err(|reason| ConvertError::InvalidLiteral {
            datatype: datatype.to_string(),
            lexical: lexical.to_string(),
            reason,
        })
    }

    /// Encodes a value; the value's variant must match the datatype.
    pub fn encode(&self, datatype: &str, value: &TypedValue) -> Result<String, ConvertError> {
        let converter = self.converter(datatype)?;
        if value.value_type() != converter.value_type {
            return Err(ConvertError::ValueTypeMismatch {
                datatype: datatype.to_string(),
                expected: converter.value_type,
                found: value.value_type(),
            });
        }
        (converter.encode)(value).map_err(|reason| ConvertError::InvalidValue {
            datatype: datatype.to_string(),
            reason,
        })
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::model::Decimal;
    use crate::vocab::xsd;
    use proptest::prelude::*;

    fn roundtrip(datatype: &str, value: &TypedValue) -> TypedValue {
        let reg = DatatypeRegistry::builtin();
        let lexical = reg.encode(datatype, value).unwrap();
        reg.decode(datatype, &lexical).unwrap()
    }

    fn offset() -> impl Strategy<Value = Option<i16>> {
        prop::option::of(-840i16..=840)
    }

    proptest! {
        #[test]
        fn string_roundtrip(s in any::<String>()) {
            for dt in [xsd::STRING, xsd::NORMALIZED_STRING, xsd::TOKEN, xsd::ANY_URI] {
                let v = TypedValue::String(s.clone());
                prop_assert_eq!(roundtrip(dt, &v), v);
            }
        }

        #[test]
        fn integer_roundtrip(n in any::<i64>()) {
            let v = TypedValue::Integer(n);
            prop_assert_eq!(roundtrip(xsd::INTEGER, &v), v.clone());
            prop_assert_eq!(roundtrip(xsd::LONG, &v), v);
        }

        #[test]
        fn bounded_integer_roundtrip(n in any::<i16>(), m in any::<i32>(), k in 1i64..) {
            let short = TypedValue::Integer(n as i64);
            prop_assert_eq!(roundtrip(xsd::SHORT, &short), short);
            let int = TypedValue::Integer(m as i64);
            prop_assert_eq!(roundtrip(xsd::INT, &int), int);
            let positive = TypedValue::Integer(k);
            prop_assert_eq!(roundtrip(xsd::POSITIVE_INTEGER, &positive), positive.clone());
            prop_assert_eq!(roundtrip(xsd::NON_NEGATIVE_INTEGER, &positive), positive);
        }

        #[test]
        fn decimal_roundtrip(mantissa in any::<i64>(), exponent in -30i32..30) {
            if let Some(d) = Decimal::new(mantissa, exponent) {
                let v = TypedValue::Decimal(d);
                prop_assert_eq!(roundtrip(xsd::DECIMAL, &v), v);
            }
        }

        #[test]
        fn double_roundtrip(x in any::<f64>().prop_filter("NaN", |x| !x.is_nan())) {
            let v = TypedValue::Double(x);
            prop_assert_eq!(roundtrip(xsd::DOUBLE, &v), v);
        }

        #[test]
        fn float_roundtrip(x in any::<f32>().prop_filter("NaN", |x| !x.is_nan())) {
            let v = TypedValue::Double(x as f64);
            prop_assert_eq!(roundtrip(xsd::FLOAT, &v), v);
        }

        #[test]
        fn boolean_roundtrip(b in any::<bool>()) {
            let v = TypedValue::Boolean(b);
            prop_assert_eq!(roundtrip(xsd::BOOLEAN, &v), v);
        }

        #[test]
        fn date_roundtrip(days in -719_162i32..2_932_897, offset_min in offset()) {
            let v = TypedValue::Date { days, offset_min };
            prop_assert_eq!(roundtrip(xsd::DATE, &v), v);
        }

        #[test]
        fn time_roundtrip(micros in 0i64..86_400_000_000, offset_min in offset()) {
            let v = TypedValue::Time { micros, offset_min };
            prop_assert_eq!(roundtrip(xsd::TIME, &v), v);
        }

        #[test]
        fn datetime_roundtrip(
            epoch_micros in -62_000_000_000_000_000i64..253_000_000_000_000_000,
            offset_min in offset(),
        ) {
            let v = TypedValue::DateTime { epoch_micros, offset_min };
            prop_assert_eq!(roundtrip(xsd::DATE_TIME, &v), v);
        }
    }
}
