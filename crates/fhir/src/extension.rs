//! `Extension`, the one record with a required member.

use helios_fhirpath_support::{ChildNode, FhirNode, TypeInfoResult};

use crate::choice::{decode_choice, drop_empty_choice};
use crate::datatypes::{
    Coding, CodeableConcept, HumanName, Identifier, Period, Quantity, Reference,
};
use crate::element::{
    Boolean, Canonical, Code, Date, DateTime, Decimal, FhirString, Id, Instant, Integer,
    Markdown, PositiveInt, Time, UnsignedInt, Uri, Url,
};
use crate::error::MissingMember;
use crate::record::{MemberDecoder, MemberVisitor, Record};

fhir_choice! {
    /// `Extension.value[x]`.
    pub enum ExtensionValue {
        Boolean(primitive Boolean),
        Integer(primitive Integer),
        PositiveInt(primitive PositiveInt),
        UnsignedInt(primitive UnsignedInt),
        Decimal(primitive Decimal),
        String(primitive FhirString),
        Code(primitive Code),
        Id(primitive Id),
        Uri(primitive Uri),
        Url(primitive Url),
        Canonical(primitive Canonical),
        Markdown(primitive Markdown),
        Date(primitive Date),
        DateTime(primitive DateTime),
        Time(primitive Time),
        Instant(primitive Instant),
        Coding(record Coding),
        CodeableConcept(record CodeableConcept),
        Identifier(record Identifier),
        HumanName(record HumanName),
        Period(record Period),
        Quantity(record Quantity),
        Reference(record Reference),
    }
}

/// An extension: a `url`-keyed value or nested extensions, attachable to
/// any element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Extension {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub url: String,
    pub value: Option<ExtensionValue>,
}

impl Extension {
    pub fn new(url: impl Into<String>, value: ExtensionValue) -> Self {
        Self {
            url: url.into(),
            value: Some(value),
            ..Self::default()
        }
    }

    /// A complex extension made of nested extensions.
    pub fn nested(url: impl Into<String>, extension: Vec<Extension>) -> Self {
        Self {
            url: url.into(),
            extension,
            ..Self::default()
        }
    }
}

impl Record for Extension {
    const TYPE_NAME: &'static str = "Extension";

    fn walk<'a, V: MemberVisitor<'a>>(&'a self, visitor: &mut V) -> Result<(), V::Error> {
        visitor.attribute("id", self.id.as_ref())?;
        visitor.attribute("url", Some(&self.url))?;
        visitor.records("extension", self.extension.as_slice())?;
        visitor.choice("value", self.value.as_ref())
    }

    fn decode_member<D: MemberDecoder>(
        &mut self,
        name: &str,
        decoder: &mut D,
    ) -> Result<bool, D::Error> {
        match name {
            "id" => decoder.attribute(&mut self.id)?,
            "url" => {
                let mut url = None;
                decoder.attribute(&mut url)?;
                self.url = url.unwrap_or_default();
            }
            "extension" => decoder.records(&mut self.extension)?,
            _ => return decode_choice(&mut self.value, "value", name, decoder),
        }
        Ok(true)
    }

    /// `url` is required and a FHIR string is never empty.
    fn finish_decode(&mut self) -> Result<(), MissingMember> {
        drop_empty_choice(&mut self.value);
        if self.url.is_empty() {
            return Err(MissingMember {
                type_name: Self::TYPE_NAME,
                member: "url",
            });
        }
        Ok(())
    }
}

impl FhirNode for Extension {
    fn type_info(&self) -> TypeInfoResult {
        TypeInfoResult::fhir("Extension")
    }

    fn children(&self, name: Option<&str>) -> Vec<ChildNode<'_>> {
        crate::children::collect_children(self, name)
    }
}
