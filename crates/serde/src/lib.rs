//! # Helios FHIR Serialization Module
//!
//! JSON and XML codecs for the `helios-fhir` data model. Both are written
//! against the model's record walk, so each FHIR wire rule is implemented
//! once per format rather than once per field.
//!
//! ## FHIR JSON ↔ XML Mapping
//!
//! | JSON Pattern | XML Pattern |
//! |--------------|-------------|
//! | `{"active": true}` | `<active value="true"/>` |
//! | `{"birthDate": "1974-12-25", "_birthDate": {"id": "123"}}` | `<birthDate id="123" value="1974-12-25"/>` |
//! | `{"given": ["John", "Doe"]}` | `<given value="John"/><given value="Doe"/>` |
//! | `{"given": ["A", null], "_given": [null, {"id": "123"}]}` | `<given value="A"/><given id="123"/>` |
//! | `{"valueQuantity": {"value": 1}}` | `<valueQuantity><value value="1"/></valueQuantity>` |
//! | `{"contained": [{"resourceType": "Patient"}]}` | `<contained><Patient/></contained>` |
//!
//! Decoding is strict: unknown keys, elements and attributes, a second
//! alternative of a choice member, and namespaces other than FHIR's (or
//! XHTML's for the narrative `div`) are errors.
//!
//! ## Examples
//!
//! ```
//! # #[cfg(feature = "xml")]
//! # fn main() -> helios_serde::Result<()> {
//! use helios_fhir::Resource;
//! use helios_serde::{from_json_str, to_xml_string};
//!
//! let resource: Resource = from_json_str(r#"{"resourceType":"Patient","active":true}"#)?;
//! let xml = to_xml_string(&resource)?;
//! assert!(xml.contains(r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/></Patient>"#));
//! # Ok(())
//! # }
//! # #[cfg(not(feature = "xml"))]
//! # fn main() {}
//! ```

use helios_fhir::{FhirDocument, Resource};

pub mod error;
pub mod json;
mod xhtml;
#[cfg(feature = "xml")]
pub mod xml;

pub use error::{ErrorKind, Result, SerdeError};

pub use json::{
    from_json_reader, from_json_slice, from_json_str, from_json_value, to_json_string,
    to_json_string_pretty, to_json_value, to_json_vec, to_json_writer,
};

#[cfg(feature = "xml")]
pub use xml::{
    from_xml_reader, from_xml_slice, from_xml_str, to_xml_string, to_xml_vec, to_xml_writer,
};

/// Narrows a decoded resource to the type the caller asked for.
pub(crate) fn document_from_resource<T: FhirDocument>(resource: Resource) -> Result<T> {
    let found = resource.resource_type();
    T::from_resource(resource).map_err(|_| SerdeError::WrongResourceType {
        expected: T::EXPECTED_TYPE.unwrap_or("Resource").to_string(),
        found: found.to_string(),
    })
}
