//! JSON decoding from a parsed `serde_json::Value`.
//!
//! Each object key is matched against the record's declared members. A
//! primitive's bare key and its `_`-prefixed sibling are handed to the
//! record together, so their relative order in the document is irrelevant.

use helios_fhir::{
    Element, Extension, MemberDecoder, PrimitiveType, Record, Resource, ResourceBuilder,
    ResourceRecord, Xhtml, json_type_name,
};
use helios_serde_support::{aligned, metadata_key, split_metadata_key};
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::{Result, SerdeError};
use crate::json::ser::RESOURCE_TYPE_KEY;

/// Metadata objects are decoded under this type name in error reports.
const ELEMENT_TYPE_NAME: &str = "Element";

pub(crate) fn decode_resource(value: &Value) -> Result<Resource> {
    let Value::Object(object) = value else {
        return Err(SerdeError::unexpected(
            "resource",
            "JSON object",
            json_type_name(value),
        ));
    };
    let resource_type = match object.get(RESOURCE_TYPE_KEY) {
        Some(Value::String(tag)) => tag.as_str(),
        Some(other) => {
            return Err(SerdeError::invalid(
                "Resource",
                RESOURCE_TYPE_KEY,
                format!("expected string, found {}", json_type_name(other)),
            ));
        }
        None => return Err(SerdeError::MissingResourceType),
    };
    trace!(resource_type, "decoding JSON resource");

    let mut builder = ObjectBuilder { object };
    Resource::decode_by_type(resource_type, &mut builder)?
        .ok_or_else(|| SerdeError::UnknownResourceType(resource_type.to_string()))
}

struct ObjectBuilder<'v> {
    object: &'v Map<String, Value>,
}

impl ResourceBuilder for ObjectBuilder<'_> {
    type Error = SerdeError;

    fn build<R: ResourceRecord>(&mut self) -> Result<R> {
        decode_object(self.object, true)
    }
}

fn decode_object<R: Record>(object: &Map<String, Value>, is_resource: bool) -> Result<R> {
    let mut record = R::default();
    for (key, value) in object {
        if is_resource && key == RESOURCE_TYPE_KEY {
            continue;
        }
        let (name, is_metadata) = split_metadata_key(key);
        let (value, metadata) = if is_metadata {
            // decoded together with the bare key
            if object.contains_key(name) {
                continue;
            }
            (None, Some(value))
        } else {
            (Some(value), object.get(&metadata_key(name)))
        };

        let mut decoder = JsonMemberDecoder {
            type_name: R::TYPE_NAME,
            name,
            value,
            metadata,
        };
        if !record.decode_member(name, &mut decoder)? {
            return Err(SerdeError::UnknownMember {
                type_name: R::TYPE_NAME.to_string(),
                member: key.clone(),
            });
        }
    }
    record.finish_decode()?;
    Ok(record)
}

/// One member of a JSON object: the bare value and/or the metadata sibling.
struct JsonMemberDecoder<'v> {
    type_name: &'static str,
    name: &'v str,
    value: Option<&'v Value>,
    metadata: Option<&'v Value>,
}

impl<'v> JsonMemberDecoder<'v> {
    /// The bare value of a member that has no metadata sibling.
    fn plain_value(&self) -> Result<&'v Value> {
        if self.metadata.is_some() {
            return Err(SerdeError::UnknownMember {
                type_name: self.type_name.to_string(),
                member: metadata_key(self.name),
            });
        }
        self.value
            .ok_or_else(|| SerdeError::invalid(self.type_name, self.name, "missing value"))
    }

    fn object(&self, value: &'v Value) -> Result<&'v Map<String, Value>> {
        match value {
            Value::Object(object) => Ok(object),
            other => Err(self.wrong_shape(self.name, "object", other)),
        }
    }

    fn array(&self, member: &str, value: &'v Value) -> Result<&'v [Value]> {
        match value {
            Value::Array(items) => Ok(items.as_slice()),
            other => Err(self.wrong_shape(member, "array", other)),
        }
    }

    fn string(&self, value: &'v Value) -> Result<&'v str> {
        match value {
            Value::String(s) => Ok(s.as_str()),
            other => Err(self.wrong_shape(self.name, "string", other)),
        }
    }

    fn wrong_shape(&self, member: &str, expected: &str, found: &Value) -> SerdeError {
        SerdeError::invalid(
            self.type_name,
            member,
            format!("expected {expected}, found {}", json_type_name(found)),
        )
    }

    fn scalar<V: PrimitiveType>(&self, value: &Value) -> Result<V> {
        V::from_json(value).map_err(|e| SerdeError::invalid(self.type_name, self.name, e))
    }

    /// Reads a `_name` sibling object into `(id, extension)`.
    fn element_metadata(
        &self,
        member: &str,
        metadata: &'v Value,
    ) -> Result<(Option<String>, Vec<Extension>)> {
        let Value::Object(object) = metadata else {
            return Err(self.wrong_shape(member, "metadata object", metadata));
        };
        let mut id = None;
        let mut extension = Vec::new();
        for (key, value) in object {
            match key.as_str() {
                "id" => match value {
                    Value::String(s) => id = Some(s.clone()),
                    other => return Err(self.wrong_shape(member, "string id", other)),
                },
                "extension" => {
                    for item in self.array(member, value)? {
                        extension.push(decode_object(self.object(item)?, false)?);
                    }
                }
                other => {
                    return Err(SerdeError::UnknownMember {
                        type_name: ELEMENT_TYPE_NAME.to_string(),
                        member: other.to_string(),
                    });
                }
            }
        }
        Ok((id, extension))
    }
}

impl MemberDecoder for JsonMemberDecoder<'_> {
    type Error = SerdeError;

    fn attribute(&mut self, slot: &mut Option<String>) -> Result<()> {
        let value = self.plain_value()?;
        *slot = Some(self.string(value)?.to_string());
        Ok(())
    }

    fn primitive<V: PrimitiveType>(&mut self, slot: &mut Option<Element<V>>) -> Result<()> {
        let mut element = slot.take().unwrap_or_default();
        if let Some(value) = self.value {
            element.value = Some(self.scalar(value)?);
        }
        if let Some(metadata) = self.metadata {
            (element.id, element.extension) =
                self.element_metadata(&metadata_key(self.name), metadata)?;
        }
        if !element.is_empty() {
            *slot = Some(element);
        }
        Ok(())
    }

    fn primitives<V: PrimitiveType>(&mut self, slot: &mut Vec<Element<V>>) -> Result<()> {
        let metadata_name = metadata_key(self.name);
        let values: &[Value] = match self.value {
            Some(value) => self.array(self.name, value)?,
            None => &[],
        };
        let metadata: &[Value] = match self.metadata {
            Some(metadata) => self.array(&metadata_name, metadata)?,
            None => &[],
        };

        for (value, metadata) in aligned(values, metadata) {
            let mut element = Element::default();
            if let Some(value) = value.filter(|v| !v.is_null()) {
                element.value = Some(self.scalar(value)?);
            }
            if let Some(metadata) = metadata.filter(|m| !m.is_null()) {
                (element.id, element.extension) = self.element_metadata(&metadata_name, metadata)?;
            }
            if !element.is_empty() {
                slot.push(element);
            }
        }
        Ok(())
    }

    fn record<R: Record>(&mut self, slot: &mut Option<R>) -> Result<()> {
        let value = self.plain_value()?;
        *slot = Some(decode_object(self.object(value)?, false)?);
        Ok(())
    }

    fn records<R: Record>(&mut self, slot: &mut Vec<R>) -> Result<()> {
        let value = self.plain_value()?;
        for item in self.array(self.name, value)? {
            slot.push(decode_object(self.object(item)?, false)?);
        }
        Ok(())
    }

    fn resource(&mut self, slot: &mut Option<Resource>) -> Result<()> {
        *slot = Some(decode_resource(self.plain_value()?)?);
        Ok(())
    }

    fn resources(&mut self, slot: &mut Vec<Resource>) -> Result<()> {
        let value = self.plain_value()?;
        for item in self.array(self.name, value)? {
            slot.push(decode_resource(item)?);
        }
        Ok(())
    }

    fn xhtml(&mut self, slot: &mut Option<Xhtml>) -> Result<()> {
        let markup = self.string(self.plain_value()?)?;
        crate::xhtml::check_div(markup)?;
        *slot = Some(Xhtml::new(markup));
        Ok(())
    }

    fn choice_conflict(&self, field: &str, first: &str, second: &str) -> SerdeError {
        SerdeError::choice_conflict(self.type_name, field, first, second)
    }
}
