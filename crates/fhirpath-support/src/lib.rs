//! Bridge types between the FHIR model and FHIRPath evaluators.
//!
//! An evaluator never sees concrete FHIR structs. It walks a resource through
//! [`FhirNode`]: every element reports its [`TypeInfoResult`], enumerates its
//! children in schema order (optionally filtered by member name), and, for
//! primitives, exposes its scalar as a [`PrimitiveValue`].

pub mod node;
pub mod type_info;
pub mod value;

pub use node::{ChildNode, FhirNode};
pub use type_info::TypeInfoResult;
pub use value::PrimitiveValue;
