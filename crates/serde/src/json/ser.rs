//! Streaming JSON encoding through `serde::Serializer`.
//!
//! Records are walked straight into a `SerializeMap`; nothing is buffered
//! beyond the entries of one repeated primitive.

use helios_fhir::{Element, FhirDocument, MemberVisitor, PrimitiveType, Record, Resource, Xhtml};
use helios_serde_support::metadata_key;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Discriminator key of a resource object.
pub(crate) const RESOURCE_TYPE_KEY: &str = "resourceType";

/// A resource document, or a contained resource.
pub(crate) struct JsonDocument<'a, T>(pub(crate) &'a T);

impl<T: FhirDocument> Serialize for JsonDocument<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry(RESOURCE_TYPE_KEY, self.0.resource_type())?;
        self.0.walk_document(&mut MapWriter { map: &mut map })?;
        map.end()
    }
}

struct JsonRecord<'a, R>(&'a R);

impl<R: Record> Serialize for JsonRecord<'_, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.0.walk(&mut MapWriter { map: &mut map })?;
        map.end()
    }
}

struct JsonRecords<'a, R>(&'a [R]);

impl<R: Record> Serialize for JsonRecords<'_, R> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(JsonRecord))
    }
}

struct JsonResources<'a>(&'a [Resource]);

impl Serialize for JsonResources<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(JsonDocument))
    }
}

/// The bare value of a primitive.
struct JsonScalar<'a, V>(&'a V);

impl<V: PrimitiveType> Serialize for JsonScalar<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.to_json().serialize(serializer)
    }
}

/// The `_name` sibling object of a primitive: its `id` and extensions.
struct JsonMetadata<'a, V>(&'a Element<V>);

impl<V> Serialize for JsonMetadata<'_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        if let Some(id) = &self.0.id {
            map.serialize_entry("id", id)?;
        }
        if !self.0.extension.is_empty() {
            map.serialize_entry("extension", &JsonRecords(self.0.extension.as_slice()))?;
        }
        map.end()
    }
}

/// Value array of a repeated primitive, `null` where an entry has no value.
struct JsonValueArray<'s, 'a, V>(&'s [&'a Element<V>]);

impl<V: PrimitiveType> Serialize for JsonValueArray<'_, '_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|e| e.value.as_ref().map(JsonScalar)))
    }
}

/// Metadata array of a repeated primitive, index-aligned with its values.
struct JsonMetadataArray<'s, 'a, V>(&'s [&'a Element<V>]);

impl<V> Serialize for JsonMetadataArray<'_, '_, V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(
            self.0
                .iter()
                .map(|e| e.has_metadata().then_some(JsonMetadata(*e))),
        )
    }
}

struct MapWriter<'m, M> {
    map: &'m mut M,
}

impl<'a, M: SerializeMap> MemberVisitor<'a> for MapWriter<'_, M> {
    type Error = M::Error;

    fn attribute(&mut self, name: &str, value: Option<&'a String>) -> Result<(), M::Error> {
        match value {
            Some(value) => self.map.serialize_entry(name, value),
            None => Ok(()),
        }
    }

    fn primitive<V: PrimitiveType>(
        &mut self,
        name: &str,
        value: Option<&'a Element<V>>,
    ) -> Result<(), M::Error> {
        let Some(element) = value else {
            return Ok(());
        };
        if let Some(value) = &element.value {
            self.map.serialize_entry(name, &JsonScalar(value))?;
        }
        if element.has_metadata() {
            self.map
                .serialize_entry(&metadata_key(name), &JsonMetadata(element))?;
        }
        Ok(())
    }

    fn primitives<V: PrimitiveType>(
        &mut self,
        name: &str,
        values: &'a [Element<V>],
    ) -> Result<(), M::Error> {
        let present: Vec<&Element<V>> = values.iter().filter(|e| !e.is_empty()).collect();
        if present.iter().any(|e| e.value.is_some()) {
            self.map.serialize_entry(name, &JsonValueArray(&present))?;
        }
        if present.iter().any(|e| e.has_metadata()) {
            self.map
                .serialize_entry(&metadata_key(name), &JsonMetadataArray(&present))?;
        }
        Ok(())
    }

    fn record<R: Record>(&mut self, name: &str, value: Option<&'a R>) -> Result<(), M::Error> {
        match value {
            Some(record) => self.map.serialize_entry(name, &JsonRecord(record)),
            None => Ok(()),
        }
    }

    fn records<R: Record>(&mut self, name: &str, values: &'a [R]) -> Result<(), M::Error> {
        if values.is_empty() {
            return Ok(());
        }
        self.map.serialize_entry(name, &JsonRecords(values))
    }

    fn resource(&mut self, name: &str, value: Option<&'a Resource>) -> Result<(), M::Error> {
        match value {
            Some(resource) => self.map.serialize_entry(name, &JsonDocument(resource)),
            None => Ok(()),
        }
    }

    fn resources(&mut self, name: &str, values: &'a [Resource]) -> Result<(), M::Error> {
        if values.is_empty() {
            return Ok(());
        }
        self.map.serialize_entry(name, &JsonResources(values))
    }

    fn xhtml(&mut self, name: &str, value: Option<&'a Xhtml>) -> Result<(), M::Error> {
        match value {
            Some(xhtml) => self.map.serialize_entry(name, xhtml.as_str()),
            None => Ok(()),
        }
    }
}
