//! The schema interface between record shapes and the codecs.
//!
//! A record never serializes itself. It exposes its members, in schema
//! order, to a [`MemberVisitor`] (encoders, child enumeration, footprint) and
//! accepts members one at a time through a [`MemberDecoder`] (decoders).
//! The visitor and decoder methods are per member kind, so a codec handles
//! "primitive with metadata" or "repeated record" once, for every record.

use std::fmt::Debug;

use helios_fhirpath_support::FhirNode;
use helios_serde_support::choice_key;

use crate::choice::Choice;
use crate::error::MissingMember;
use crate::element::{Element, Xhtml};
use crate::primitives::PrimitiveType;
use crate::resource::Resource;

/// A Composite Record: a datatype, backbone element or resource body.
pub trait Record: FhirNode + Default + Clone + PartialEq + Debug + 'static {
    /// FHIR type name, used as the XML element name for resources.
    const TYPE_NAME: &'static str;

    /// Visits every member in schema order.
    fn walk<'a, V: MemberVisitor<'a>>(&'a self, visitor: &mut V) -> Result<(), V::Error>;

    /// Decodes the member called `name` (a concrete key for choice members).
    ///
    /// Returns `Ok(false)` if the record has no such member; the caller
    /// reports that as an unknown member.
    fn decode_member<D: MemberDecoder>(
        &mut self,
        name: &str,
        decoder: &mut D,
    ) -> Result<bool, D::Error>;

    /// Called by a decoder once every member has been read.
    ///
    /// Clears choice members whose alternative decoded empty and checks
    /// required members.
    fn finish_decode(&mut self) -> Result<(), MissingMember> {
        Ok(())
    }

    /// Advisory size of this record and everything it owns, in bytes.
    fn memory_footprint(&self) -> usize {
        crate::footprint::record_footprint(self)
    }
}

impl<R: Record> Record for Box<R> {
    const TYPE_NAME: &'static str = R::TYPE_NAME;

    fn walk<'a, V: MemberVisitor<'a>>(&'a self, visitor: &mut V) -> Result<(), V::Error> {
        (**self).walk(visitor)
    }

    fn decode_member<D: MemberDecoder>(
        &mut self,
        name: &str,
        decoder: &mut D,
    ) -> Result<bool, D::Error> {
        (**self).decode_member(name, decoder)
    }

    fn finish_decode(&mut self) -> Result<(), MissingMember> {
        (**self).finish_decode()
    }

    fn memory_footprint(&self) -> usize {
        (**self).memory_footprint()
    }
}

/// Receives the members of a record, one call per declared member.
///
/// Absent optional members are reported as `None`, empty repeated members
/// as empty slices; the visitor decides what absence means for its format.
pub trait MemberVisitor<'a>: Sized {
    type Error;

    /// A plain string carried as an XML attribute (`id`, `url`).
    fn attribute(&mut self, name: &str, value: Option<&'a String>) -> Result<(), Self::Error>;

    fn primitive<V: PrimitiveType>(
        &mut self,
        name: &str,
        value: Option<&'a Element<V>>,
    ) -> Result<(), Self::Error>;

    fn primitives<V: PrimitiveType>(
        &mut self,
        name: &str,
        values: &'a [Element<V>],
    ) -> Result<(), Self::Error>;

    fn record<R: Record>(&mut self, name: &str, value: Option<&'a R>) -> Result<(), Self::Error>;

    fn records<R: Record>(&mut self, name: &str, values: &'a [R]) -> Result<(), Self::Error>;

    /// A contained resource.
    fn resource(&mut self, name: &str, value: Option<&'a Resource>) -> Result<(), Self::Error>;

    fn resources(&mut self, name: &str, values: &'a [Resource]) -> Result<(), Self::Error>;

    fn xhtml(&mut self, name: &str, value: Option<&'a Xhtml>) -> Result<(), Self::Error>;

    /// A choice member. By default the selected alternative is visited
    /// under its concrete key (`value` + `Quantity`).
    fn choice<C: Choice>(&mut self, name: &str, value: Option<&'a C>) -> Result<(), Self::Error> {
        match value {
            Some(choice) => {
                let key = choice_key(name, choice.type_name());
                choice.walk(&key, self)
            }
            None => Ok(()),
        }
    }
}

/// Supplies the wire content of one member to a record's
/// [`Record::decode_member`].
///
/// Each method fills the slot of the matching kind. Decoders see the slot
/// as it stands, so a primitive split across two JSON keys or a repeated
/// XML element accumulates into the same slot.
pub trait MemberDecoder {
    type Error;

    fn attribute(&mut self, slot: &mut Option<String>) -> Result<(), Self::Error>;

    fn primitive<V: PrimitiveType>(
        &mut self,
        slot: &mut Option<Element<V>>,
    ) -> Result<(), Self::Error>;

    fn primitives<V: PrimitiveType>(
        &mut self,
        slot: &mut Vec<Element<V>>,
    ) -> Result<(), Self::Error>;

    fn record<R: Record>(&mut self, slot: &mut Option<R>) -> Result<(), Self::Error>;

    fn records<R: Record>(&mut self, slot: &mut Vec<R>) -> Result<(), Self::Error>;

    fn resource(&mut self, slot: &mut Option<Resource>) -> Result<(), Self::Error>;

    fn resources(&mut self, slot: &mut Vec<Resource>) -> Result<(), Self::Error>;

    fn xhtml(&mut self, slot: &mut Option<Xhtml>) -> Result<(), Self::Error>;

    /// The error for a second alternative of the choice member `field`.
    fn choice_conflict(&self, field: &str, first: &str, second: &str) -> Self::Error;
}
