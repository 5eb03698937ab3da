//! FHIR XML.
//!
//! Both directions stream over `quick-xml` events; no intermediate tree is
//! built. The mapping from the record walk to XML is:
//!
//! - A primitive member is an element carrying its value in a `value`
//!   attribute and its `id` as an attribute, with extensions as children:
//!   `<birthDate id="bd1" value="1974-12-25"><extension url="..."/></birthDate>`.
//! - A repeated member is a sequence of sibling elements of the same name.
//! - A choice member uses its concrete name: `<valueQuantity>...</valueQuantity>`.
//! - `Element.id` and `Extension.url` are attributes of the record element.
//! - A resource is an element named by its type in the FHIR namespace. An
//!   embedded resource is wrapped in an element named by the member:
//!   `<contained><Patient>...</Patient></contained>`.
//! - The narrative `div` is XHTML, copied verbatim in both directions.
//!
//! ```
//! use helios_fhir::{Element, Patient};
//! use helios_serde::xml::{from_xml_str, to_xml_string};
//!
//! let patient = Patient {
//!     active: Some(Element::new(true)),
//!     ..Patient::default()
//! };
//! let xml = to_xml_string(&patient)?;
//! assert!(xml.ends_with(r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/></Patient>"#));
//!
//! let back: Patient = from_xml_str(&xml)?;
//! assert_eq!(back, patient);
//! # Ok::<(), helios_serde::SerdeError>(())
//! ```

pub mod de;
pub mod ser;
mod utils;

pub use de::{from_xml_reader, from_xml_slice, from_xml_str};
pub use ser::{XmlSerializer, to_xml_string, to_xml_vec, to_xml_writer};
