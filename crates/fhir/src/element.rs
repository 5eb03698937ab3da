//! Primitive Values: a scalar plus optional `id` and extensions.

use helios_fhirpath_support::{ChildNode, FhirNode, PrimitiveValue, TypeInfoResult};

use crate::extension::Extension;
use crate::primitives::{self, PrimitiveType};

/// A primitive element.
///
/// On the wire the value and the metadata (`id`, `extension`) travel
/// separately: JSON puts the metadata in a `_`-prefixed sibling key, XML in
/// the element's `id` attribute and child `<extension>` elements. An
/// element with none of the three is equivalent to the member being absent.
#[derive(Debug, Clone, PartialEq)]
pub struct Element<V> {
    pub id: Option<String>,
    pub extension: Vec<Extension>,
    pub value: Option<V>,
}

impl<V> Default for Element<V> {
    fn default() -> Self {
        Self {
            id: None,
            extension: Vec::new(),
            value: None,
        }
    }
}

impl<V> Element<V> {
    pub fn new(value: V) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// An element with metadata only.
    pub fn metadata(id: Option<String>, extension: Vec<Extension>) -> Self {
        Self {
            id,
            extension,
            value: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_extension(mut self, extension: Extension) -> Self {
        self.extension.push(extension);
        self
    }

    /// True when the element carries an `id` or extensions.
    pub fn has_metadata(&self) -> bool {
        self.id.is_some() || !self.extension.is_empty()
    }

    /// True when there is nothing to encode.
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && !self.has_metadata()
    }
}

impl<V> From<V> for Element<V> {
    fn from(value: V) -> Self {
        Element::new(value)
    }
}

impl From<&str> for Element<String> {
    fn from(value: &str) -> Self {
        Element::new(value.to_string())
    }
}

impl<V: PrimitiveType> FhirNode for Element<V> {
    fn type_info(&self) -> TypeInfoResult {
        TypeInfoResult::fhir(V::TYPE_NAME)
    }

    fn children(&self, name: Option<&str>) -> Vec<ChildNode<'_>> {
        let mut children = Vec::new();
        if let Some(id) = &self.id
            && name.is_none_or(|n| n == "id")
        {
            children.push(ChildNode::new("id", id));
        }
        if name.is_none_or(|n| n == "extension") {
            children.extend(
                self.extension
                    .iter()
                    .map(|e| ChildNode::new("extension", e as &dyn FhirNode)),
            );
        }
        children
    }

    fn primitive_value(&self) -> Option<PrimitiveValue> {
        self.value.as_ref().map(PrimitiveType::to_fhirpath)
    }
}

/// The XHTML `div` of a narrative, kept as serialized markup.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Xhtml(pub String);

impl Xhtml {
    pub fn new(markup: impl Into<String>) -> Self {
        Self(markup.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FhirNode for Xhtml {
    fn type_info(&self) -> TypeInfoResult {
        TypeInfoResult::fhir("xhtml")
    }

    fn children(&self, _name: Option<&str>) -> Vec<ChildNode<'_>> {
        Vec::new()
    }

    fn primitive_value(&self) -> Option<PrimitiveValue> {
        Some(PrimitiveValue::String(self.0.clone()))
    }
}

pub type Boolean = Element<bool>;
pub type Integer = Element<i32>;
pub type PositiveInt = Element<primitives::PositiveInt>;
pub type UnsignedInt = Element<primitives::UnsignedInt>;
pub type Decimal = Element<rust_decimal::Decimal>;
pub type FhirString = Element<String>;
pub type Code = Element<primitives::Code>;
pub type Id = Element<primitives::Id>;
pub type Uri = Element<primitives::Uri>;
pub type Url = Element<primitives::Url>;
pub type Canonical = Element<primitives::Canonical>;
pub type Markdown = Element<primitives::Markdown>;
pub type Date = Element<primitives::Date>;
pub type DateTime = Element<primitives::DateTime>;
pub type Time = Element<primitives::Time>;
pub type Instant = Element<primitives::Instant>;
