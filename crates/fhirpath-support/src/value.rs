//! Scalar values surfaced to FHIRPath from primitive elements.

use rust_decimal::Decimal;

/// The scalar carried by a FHIR primitive, in FHIRPath's system type terms.
///
/// Date and time values keep their lexical form since FHIR allows partial
/// precision (`1974`, `1974-12`) that an evaluator has to interpret itself.
#[derive(Debug, Clone, PartialEq)]
pub enum PrimitiveValue {
    Boolean(bool),
    Integer(i64),
    Decimal(Decimal),
    String(String),
    Date(String),
    DateTime(String),
    Time(String),
}

impl PrimitiveValue {
    /// The FHIRPath system type name of this value.
    pub fn system_type(&self) -> &'static str {
        match self {
            PrimitiveValue::Boolean(_) => "Boolean",
            PrimitiveValue::Integer(_) => "Integer",
            PrimitiveValue::Decimal(_) => "Decimal",
            PrimitiveValue::String(_) => "String",
            PrimitiveValue::Date(_) => "Date",
            PrimitiveValue::DateTime(_) => "DateTime",
            PrimitiveValue::Time(_) => "Time",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PrimitiveValue::String(s)
            | PrimitiveValue::Date(s)
            | PrimitiveValue::DateTime(s)
            | PrimitiveValue::Time(s) => Some(s),
            _ => None,
        }
    }
}
