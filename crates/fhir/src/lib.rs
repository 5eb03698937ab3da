//! # helios-fhir
//!
//! The FHIR data model used by the Helios codecs.
//!
//! - [`Element`]: a Primitive Value, a scalar plus optional `id` and
//!   extensions. Aliases such as [`FhirString`], [`Code`] and [`DateTime`]
//!   name the element form of each [`primitives`] type.
//! - [`Extension`]: the recursive annotation attachable to any element.
//! - Choice members (`value[x]`) are closed enums implementing [`Choice`].
//! - Every record shape implements [`Record`], which exposes its members in
//!   schema order to a [`MemberVisitor`] and accepts them from a
//!   [`MemberDecoder`]. The JSON and XML codecs in `helios-serde` are
//!   written against those two traits only.
//! - [`Resource`] is the closed registry of resource shapes.
//!
//! Every node also implements
//! [`FhirNode`](helios_fhirpath_support::FhirNode) for FHIRPath evaluators.
//!
//! ```
//! use helios_fhir::{Element, HumanName, Patient, Resource};
//!
//! let patient = Patient {
//!     active: Some(Element::new(true)),
//!     name: vec![HumanName {
//!         family: Some("Chalmers".into()),
//!         ..HumanName::default()
//!     }],
//!     ..Patient::default()
//! };
//! let resource = Resource::from(patient);
//! assert_eq!(resource.resource_type(), "Patient");
//! ```

#[macro_use]
mod macros;

mod children;
pub mod choice;
pub mod datatypes;
pub mod element;
pub mod error;
pub mod extension;
pub mod footprint;
pub mod primitives;
pub mod record;
pub mod resource;
pub mod resources;

pub use choice::{Choice, decode_choice, drop_empty_choice};
pub use datatypes::*;
pub use element::{
    Boolean, Canonical, Code, Date, DateTime, Decimal, Element, FhirString, Id, Instant, Integer,
    Markdown, PositiveInt, Time, UnsignedInt, Uri, Url, Xhtml,
};
pub use error::{MissingMember, PrimitiveError, json_type_name};
pub use extension::{Extension, ExtensionValue};
pub use primitives::PrimitiveType;
pub use record::{MemberDecoder, MemberVisitor, Record};
pub use resource::{FhirDocument, RESOURCE_TYPES, Resource, ResourceBuilder, ResourceRecord};
pub use resources::*;

/// Namespace of FHIR XML elements.
pub const FHIR_NAMESPACE: &str = "http://hl7.org/fhir";

/// Namespace of the narrative `div`.
pub const XHTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";
