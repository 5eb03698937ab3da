//! FHIR primitive value types.
//!
//! Each type knows its FHIR name, its XML lexical form, its JSON form and
//! how it appears to FHIRPath. `boolean` maps to `bool`, `integer` to `i32`,
//! `decimal` to [`rust_decimal::Decimal`] and `string` to `String`; the
//! remaining string-backed types are newtypes so the FHIR type stays
//! visible in the model.

use std::fmt;
use std::str::FromStr;

use chrono::{FixedOffset, NaiveDate, NaiveTime, SecondsFormat};
use helios_fhirpath_support::PrimitiveValue;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{PrimitiveError, json_type_name};

/// A scalar that can sit in the `value` slot of an [`Element`](crate::Element).
pub trait PrimitiveType: Clone + PartialEq + fmt::Debug + 'static {
    /// FHIR type name (`boolean`, `dateTime`, ...).
    const TYPE_NAME: &'static str;

    /// The XML `value` attribute form.
    fn to_lexical(&self) -> String;

    fn from_lexical(lexical: &str) -> Result<Self, PrimitiveError>;

    fn to_json(&self) -> Value;

    fn from_json(value: &Value) -> Result<Self, PrimitiveError>;

    fn to_fhirpath(&self) -> PrimitiveValue;

    /// Heap bytes owned by the value.
    fn heap_size(&self) -> usize {
        0
    }
}

fn wrong_type(expected: &'static str, found: &Value) -> PrimitiveError {
    PrimitiveError::WrongJsonType {
        expected,
        found: json_type_name(found),
    }
}

impl PrimitiveType for bool {
    const TYPE_NAME: &'static str = "boolean";

    fn to_lexical(&self) -> String {
        self.to_string()
    }

    fn from_lexical(lexical: &str) -> Result<Self, PrimitiveError> {
        match lexical {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(PrimitiveError::invalid(
                Self::TYPE_NAME,
                lexical,
                "expected 'true' or 'false'",
            )),
        }
    }

    fn to_json(&self) -> Value {
        Value::Bool(*self)
    }

    fn from_json(value: &Value) -> Result<Self, PrimitiveError> {
        value.as_bool().ok_or_else(|| wrong_type("boolean", value))
    }

    fn to_fhirpath(&self) -> PrimitiveValue {
        PrimitiveValue::Boolean(*self)
    }
}

impl PrimitiveType for i32 {
    const TYPE_NAME: &'static str = "integer";

    fn to_lexical(&self) -> String {
        self.to_string()
    }

    fn from_lexical(lexical: &str) -> Result<Self, PrimitiveError> {
        lexical
            .parse()
            .map_err(|e| PrimitiveError::invalid(Self::TYPE_NAME, lexical, e))
    }

    fn to_json(&self) -> Value {
        Value::from(*self)
    }

    fn from_json(value: &Value) -> Result<Self, PrimitiveError> {
        match value {
            Value::Number(n) => Self::from_lexical(&n.to_string()),
            other => Err(wrong_type("number", other)),
        }
    }

    fn to_fhirpath(&self) -> PrimitiveValue {
        PrimitiveValue::Integer(i64::from(*self))
    }
}

macro_rules! unsigned_primitive {
    ($(#[$meta:meta])* $name:ident, $type_name:literal, $min:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub u32);

        impl PrimitiveType for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn to_lexical(&self) -> String {
                self.0.to_string()
            }

            fn from_lexical(lexical: &str) -> Result<Self, PrimitiveError> {
                let n: u32 = lexical
                    .parse()
                    .map_err(|e| PrimitiveError::invalid(Self::TYPE_NAME, lexical, e))?;
                if !($min..).contains(&n) {
                    return Err(PrimitiveError::invalid(
                        Self::TYPE_NAME,
                        lexical,
                        concat!("must be at least ", stringify!($min)),
                    ));
                }
                Ok(Self(n))
            }

            fn to_json(&self) -> Value {
                Value::from(self.0)
            }

            fn from_json(value: &Value) -> Result<Self, PrimitiveError> {
                match value {
                    Value::Number(n) => Self::from_lexical(&n.to_string()),
                    other => Err(wrong_type("number", other)),
                }
            }

            fn to_fhirpath(&self) -> PrimitiveValue {
                PrimitiveValue::Integer(i64::from(self.0))
            }
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                Self(value)
            }
        }
    };
}

unsigned_primitive!(
    /// An integer greater than zero.
    PositiveInt,
    "positiveInt",
    1
);
unsigned_primitive!(
    /// A non-negative integer.
    UnsignedInt,
    "unsignedInt",
    0
);

/// Decimals keep their scale, so `1.50` is written back as `1.50`.
impl PrimitiveType for Decimal {
    const TYPE_NAME: &'static str = "decimal";

    fn to_lexical(&self) -> String {
        self.to_string()
    }

    fn from_lexical(lexical: &str) -> Result<Self, PrimitiveError> {
        Decimal::from_str(lexical)
            .or_else(|_| Decimal::from_scientific(lexical))
            .map_err(|e| PrimitiveError::invalid(Self::TYPE_NAME, lexical, e))
    }

    fn to_json(&self) -> Value {
        let lexical = self.to_string();
        match serde_json::Number::from_str(&lexical) {
            Ok(n) => Value::Number(n),
            Err(_) => Value::String(lexical),
        }
    }

    fn from_json(value: &Value) -> Result<Self, PrimitiveError> {
        match value {
            Value::Number(n) => Self::from_lexical(&n.to_string()),
            other => Err(wrong_type("number", other)),
        }
    }

    fn to_fhirpath(&self) -> PrimitiveValue {
        PrimitiveValue::Decimal(*self)
    }
}

impl PrimitiveType for String {
    const TYPE_NAME: &'static str = "string";

    fn to_lexical(&self) -> String {
        self.clone()
    }

    fn from_lexical(lexical: &str) -> Result<Self, PrimitiveError> {
        Ok(lexical.to_string())
    }

    fn to_json(&self) -> Value {
        Value::String(self.clone())
    }

    fn from_json(value: &Value) -> Result<Self, PrimitiveError> {
        match value {
            Value::String(s) => Ok(s.clone()),
            other => Err(wrong_type("string", other)),
        }
    }

    fn to_fhirpath(&self) -> PrimitiveValue {
        PrimitiveValue::String(self.clone())
    }

    fn heap_size(&self) -> usize {
        self.len()
    }
}

fn accept_any(_lexical: &str) -> Result<(), String> {
    Ok(())
}

fn check_code(lexical: &str) -> Result<(), String> {
    if lexical.is_empty() || lexical.trim() != lexical {
        return Err("must be non-empty without surrounding whitespace".into());
    }
    Ok(())
}

fn check_id(lexical: &str) -> Result<(), String> {
    let valid_char = |c: char| c.is_ascii_alphanumeric() || c == '-' || c == '.';
    if lexical.is_empty() || lexical.len() > 64 || !lexical.chars().all(valid_char) {
        return Err("must be 1-64 characters of [A-Za-z0-9.-]".into());
    }
    Ok(())
}

/// `YYYY`, `YYYY-MM` or `YYYY-MM-DD`.
fn check_date(lexical: &str) -> Result<(), String> {
    let full = match lexical.len() {
        4 => format!("{lexical}-01-01"),
        7 => format!("{lexical}-01"),
        10 => lexical.to_string(),
        _ => return Err("expected YYYY, YYYY-MM or YYYY-MM-DD".into()),
    };
    NaiveDate::parse_from_str(&full, "%Y-%m-%d")
        .map(|_| ())
        .map_err(|e| e.to_string())
}

/// A partial date, or a full date and time with seconds and a timezone.
fn check_date_time(lexical: &str) -> Result<(), String> {
    if lexical.len() <= 10 {
        return check_date(lexical);
    }
    chrono::DateTime::parse_from_rfc3339(lexical)
        .map(|_| ())
        .map_err(|e| e.to_string())
}

fn check_time(lexical: &str) -> Result<(), String> {
    NaiveTime::parse_from_str(lexical, "%H:%M:%S%.f")
        .map(|_| ())
        .map_err(|e| e.to_string())
}

macro_rules! string_primitive {
    ($(#[$meta:meta])* $name:ident, $type_name:literal, $fhirpath:path, $check:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl PrimitiveType for $name {
            const TYPE_NAME: &'static str = $type_name;

            fn to_lexical(&self) -> String {
                self.0.clone()
            }

            fn from_lexical(lexical: &str) -> Result<Self, PrimitiveError> {
                $check(lexical)
                    .map_err(|reason| PrimitiveError::invalid(Self::TYPE_NAME, lexical, reason))?;
                Ok(Self(lexical.to_string()))
            }

            fn to_json(&self) -> Value {
                Value::String(self.0.clone())
            }

            fn from_json(value: &Value) -> Result<Self, PrimitiveError> {
                match value {
                    Value::String(s) => Self::from_lexical(s),
                    other => Err(wrong_type("string", other)),
                }
            }

            fn to_fhirpath(&self) -> PrimitiveValue {
                $fhirpath(self.0.clone())
            }

            fn heap_size(&self) -> usize {
                self.0.len()
            }
        }
    };
}

string_primitive!(Code, "code", PrimitiveValue::String, check_code);
string_primitive!(Id, "id", PrimitiveValue::String, check_id);
string_primitive!(Uri, "uri", PrimitiveValue::String, accept_any);
string_primitive!(Url, "url", PrimitiveValue::String, accept_any);
string_primitive!(Canonical, "canonical", PrimitiveValue::String, accept_any);
string_primitive!(Markdown, "markdown", PrimitiveValue::String, accept_any);
string_primitive!(
    /// A date with year, month or day precision.
    Date,
    "date",
    PrimitiveValue::Date,
    check_date
);
string_primitive!(
    /// A partial date, or a date and time with a timezone.
    DateTime,
    "dateTime",
    PrimitiveValue::DateTime,
    check_date_time
);
string_primitive!(Time, "time", PrimitiveValue::Time, check_time);

/// An instant in time, always with timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instant(pub chrono::DateTime<FixedOffset>);

impl PrimitiveType for Instant {
    const TYPE_NAME: &'static str = "instant";

    fn to_lexical(&self) -> String {
        self.0.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    }

    fn from_lexical(lexical: &str) -> Result<Self, PrimitiveError> {
        chrono::DateTime::parse_from_rfc3339(lexical)
            .map(Instant)
            .map_err(|e| PrimitiveError::invalid(Self::TYPE_NAME, lexical, e))
    }

    fn to_json(&self) -> Value {
        Value::String(self.to_lexical())
    }

    fn from_json(value: &Value) -> Result<Self, PrimitiveError> {
        match value {
            Value::String(s) => Self::from_lexical(s),
            other => Err(wrong_type("string", other)),
        }
    }

    fn to_fhirpath(&self) -> PrimitiveValue {
        PrimitiveValue::DateTime(self.to_lexical())
    }
}
