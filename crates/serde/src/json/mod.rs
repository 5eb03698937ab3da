//! FHIR JSON.
//!
//! Encoding streams through `serde_json`'s serializer. Decoding parses the
//! document into a `serde_json::Value` first and then matches it against
//! the record schemas, so `resourceType` may appear anywhere in an object.
//!
//! ```
//! use helios_fhir::{Element, Patient};
//! use helios_serde::json::{from_json_str, to_json_string};
//!
//! let patient = Patient {
//!     active: Some(Element::new(true)),
//!     ..Patient::default()
//! };
//! let json = to_json_string(&patient)?;
//! assert_eq!(json, r#"{"resourceType":"Patient","active":true}"#);
//!
//! let back: Patient = from_json_str(&json)?;
//! assert_eq!(back, patient);
//! # Ok::<(), helios_serde::SerdeError>(())
//! ```

mod de;
mod ser;

use std::io;

use helios_fhir::FhirDocument;
use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use ser::JsonDocument;

/// Deserialize a FHIR resource from a JSON string.
///
/// `T` is either [`Resource`](helios_fhir::Resource) or a concrete
/// resource such as [`Patient`](helios_fhir::Patient), in which case a
/// document of another type fails with `WrongResourceType`.
pub fn from_json_str<T: FhirDocument>(s: &str) -> Result<T> {
    from_json_value(serde_json::from_str(s)?)
}

/// Deserialize a FHIR resource from a JSON byte slice.
pub fn from_json_slice<T: FhirDocument>(v: &[u8]) -> Result<T> {
    from_json_value(serde_json::from_slice(v)?)
}

/// Deserialize a FHIR resource from a JSON reader.
pub fn from_json_reader<R: io::Read, T: FhirDocument>(reader: R) -> Result<T> {
    from_json_value(serde_json::from_reader(reader)?)
}

/// Deserialize a FHIR resource from a `serde_json::Value`.
pub fn from_json_value<T: FhirDocument>(value: Value) -> Result<T> {
    de::decode_resource(&value)
        .and_then(crate::document_from_resource)
        .inspect_err(|e| debug!(error = %e, "FHIR JSON decode failed"))
}

/// Serialize a FHIR resource to a JSON string.
pub fn to_json_string<T: FhirDocument>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(&JsonDocument(value))?)
}

/// Serialize a FHIR resource to a pretty-printed JSON string.
pub fn to_json_string_pretty<T: FhirDocument>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(&JsonDocument(value))?)
}

/// Serialize a FHIR resource to a JSON byte vector.
pub fn to_json_vec<T: FhirDocument>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(&JsonDocument(value))?)
}

/// Serialize a FHIR resource to a writer.
pub fn to_json_writer<T: FhirDocument, W: io::Write>(value: &T, writer: W) -> Result<()> {
    Ok(serde_json::to_writer(writer, &JsonDocument(value))?)
}

/// Serialize a FHIR resource to a `serde_json::Value`.
pub fn to_json_value<T: FhirDocument>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(JsonDocument(value))?)
}
