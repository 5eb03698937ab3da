//! XML decoding: a pull parser over `quick_xml::NsReader`.
//!
//! Namespaces are resolved for every element. Resource and member elements
//! must be in the FHIR namespace and the narrative `div` in the XHTML one.
//! Attributes are restricted to what each element kind allows: `id` and
//! `url` as declared by the record, `value` and `id` on primitives.

use std::io::BufRead;

use helios_fhir::{
    Element, Extension, FhirDocument, MemberDecoder, PrimitiveType, Record, Resource,
    ResourceBuilder, ResourceRecord, Xhtml,
};
use quick_xml::Writer;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::{debug, trace};

use crate::error::{Result, SerdeError};
use crate::xml::utils::{
    self, FHIR_NAMESPACE, XHTML_NAMESPACE, describe_event, is_namespace_declaration,
    is_whitespace_text, local_name, utf8,
};

/// Deserialize a FHIR resource from an XML string.
///
/// # Examples
///
/// ```
/// use helios_fhir::Patient;
/// use helios_serde::xml::from_xml_str;
///
/// let xml = r#"<?xml version="1.0"?>
/// <Patient xmlns="http://hl7.org/fhir">
///   <id value="example"/>
/// </Patient>"#;
/// let patient: Patient = from_xml_str(xml)?;
/// assert_eq!(patient.id.and_then(|id| id.value).unwrap().as_str(), "example");
/// # Ok::<(), helios_serde::SerdeError>(())
/// ```
pub fn from_xml_str<T: FhirDocument>(xml: &str) -> Result<T> {
    decode(NsReader::from_str(xml))
}

/// Deserialize a FHIR resource from XML bytes.
pub fn from_xml_slice<T: FhirDocument>(xml: &[u8]) -> Result<T> {
    decode(NsReader::from_reader(xml))
}

/// Deserialize a FHIR resource from an XML reader.
pub fn from_xml_reader<R: BufRead, T: FhirDocument>(reader: R) -> Result<T> {
    decode(NsReader::from_reader(reader))
}

fn decode<R: BufRead, T: FhirDocument>(reader: NsReader<R>) -> Result<T> {
    XmlDeserializer::new(reader)
        .read_document()
        .and_then(crate::document_from_resource)
        .inspect_err(|e| debug!(error = %e, "FHIR XML decode failed"))
}

/// Namespace an element resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Ns {
    Fhir,
    Xhtml,
    Absent,
    Other(String),
}

impl Ns {
    fn resolve(result: ResolveResult<'_>) -> Self {
        match result {
            ResolveResult::Bound(Namespace(ns)) if ns == FHIR_NAMESPACE.as_bytes() => Ns::Fhir,
            ResolveResult::Bound(Namespace(ns)) if ns == XHTML_NAMESPACE.as_bytes() => Ns::Xhtml,
            ResolveResult::Bound(Namespace(ns)) => {
                Ns::Other(String::from_utf8_lossy(ns).into_owned())
            }
            ResolveResult::Unbound => Ns::Absent,
            ResolveResult::Unknown(prefix) => Ns::Other(format!(
                "undeclared prefix '{}'",
                String::from_utf8_lossy(&prefix)
            )),
        }
    }

    fn describe(&self) -> String {
        match self {
            Ns::Fhir => FHIR_NAMESPACE.to_string(),
            Ns::Xhtml => XHTML_NAMESPACE.to_string(),
            Ns::Absent => "(none)".to_string(),
            Ns::Other(ns) => ns.clone(),
        }
    }
}

struct XmlDeserializer<R> {
    reader: NsReader<R>,
    buf: Vec<u8>,
}

impl<R: BufRead> XmlDeserializer<R> {
    fn new(mut reader: NsReader<R>) -> Self {
        reader.config_mut().trim_text(true);
        Self {
            reader,
            buf: Vec::new(),
        }
    }

    fn next(&mut self) -> Result<(Ns, Event<'static>)> {
        self.buf.clear();
        let (ns, event) = self.reader.read_resolved_event_into(&mut self.buf)?;
        Ok((Ns::resolve(ns), event.into_owned()))
    }

    fn read_document(&mut self) -> Result<Resource> {
        loop {
            let (ns, event) = self.next()?;
            match event {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
                Event::Text(text) if is_whitespace_text(&text) => {}
                Event::Start(start) => {
                    let resource = self.read_resource(ns, &start, false)?;
                    self.expect_end_of_input()?;
                    return Ok(resource);
                }
                Event::Empty(start) => {
                    let resource = self.read_resource(ns, &start, true)?;
                    self.expect_end_of_input()?;
                    return Ok(resource);
                }
                other => {
                    return Err(SerdeError::unexpected(
                        "document",
                        "resource element",
                        describe_event(&other),
                    ));
                }
            }
        }
    }

    fn expect_end_of_input(&mut self) -> Result<()> {
        loop {
            let (_, event) = self.next()?;
            match event {
                Event::Eof => return Ok(()),
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(text) if is_whitespace_text(&text) => {}
                other => {
                    return Err(SerdeError::unexpected(
                        "document",
                        "end of input",
                        describe_event(&other),
                    ));
                }
            }
        }
    }

    /// A resource element; its local name is the resource type.
    fn read_resource(&mut self, ns: Ns, start: &BytesStart<'_>, empty: bool) -> Result<Resource> {
        let resource_type = local_name(start)?;
        if ns != Ns::Fhir {
            return Err(SerdeError::WrongNamespace {
                element: resource_type,
                expected: FHIR_NAMESPACE.to_string(),
                found: ns.describe(),
            });
        }
        trace!(resource_type = %resource_type, "decoding XML resource");

        let mut builder = ElementBuilder {
            de: self,
            start,
            empty,
        };
        match Resource::decode_by_type(&resource_type, &mut builder)? {
            Some(resource) => Ok(resource),
            None => Err(SerdeError::UnknownResourceType(resource_type)),
        }
    }

    fn read_record<T: Record>(&mut self, start: &BytesStart<'_>, empty: bool) -> Result<T> {
        let mut record = T::default();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            let key = attr.key.as_ref();
            if is_namespace_declaration(key) {
                continue;
            }
            let name = utf8(key)?;
            let mut decoder = AttributeDecoder {
                element: T::TYPE_NAME,
                name,
                value: Some(attr.unescape_value()?.into_owned()),
            };
            if !record.decode_member(name, &mut decoder)? {
                return Err(SerdeError::UnknownAttribute {
                    element: T::TYPE_NAME.to_string(),
                    attribute: name.to_string(),
                });
            }
        }
        if !empty {
            self.read_members(&mut record)?;
        }
        record.finish_decode()?;
        Ok(record)
    }

    /// Child elements up to the record's end tag.
    fn read_members<T: Record>(&mut self, record: &mut T) -> Result<()> {
        loop {
            let (ns, event) = self.next()?;
            match event {
                Event::Start(start) => self.read_member(record, ns, &start, false)?,
                Event::Empty(start) => self.read_member(record, ns, &start, true)?,
                Event::End(_) => return Ok(()),
                Event::Comment(_) | Event::PI(_) => {}
                Event::Text(text) if is_whitespace_text(&text) => {}
                other => {
                    return Err(SerdeError::unexpected(
                        T::TYPE_NAME,
                        "child element",
                        describe_event(&other),
                    ));
                }
            }
        }
    }

    fn read_member<T: Record>(
        &mut self,
        record: &mut T,
        ns: Ns,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> Result<()> {
        let name = local_name(start)?;
        let mut decoder = ElementDecoder {
            de: self,
            type_name: T::TYPE_NAME,
            name: &name,
            ns,
            start,
            empty,
        };
        if !record.decode_member(&name, &mut decoder)? {
            return Err(SerdeError::UnknownMember {
                type_name: T::TYPE_NAME.to_string(),
                member: name.clone(),
            });
        }
        Ok(())
    }

    fn read_primitive<V: PrimitiveType>(
        &mut self,
        type_name: &str,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> Result<Element<V>> {
        let name = local_name(start)?;
        let mut element = Element::default();
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            match attr.key.as_ref() {
                b"value" => {
                    let lexical = attr.unescape_value()?;
                    let value = V::from_lexical(&lexical)
                        .map_err(|e| SerdeError::invalid(type_name, &name, e))?;
                    element.value = Some(value);
                }
                b"id" => element.id = Some(attr.unescape_value()?.into_owned()),
                key if is_namespace_declaration(key) => {}
                key => {
                    return Err(SerdeError::UnknownAttribute {
                        element: name,
                        attribute: String::from_utf8_lossy(key).into_owned(),
                    });
                }
            }
        }

        if !empty {
            loop {
                let (ns, event) = self.next()?;
                match event {
                    Event::Start(child) => {
                        let extension = self.read_primitive_extension::<V>(ns, &child, false)?;
                        element.extension.push(extension);
                    }
                    Event::Empty(child) => {
                        let extension = self.read_primitive_extension::<V>(ns, &child, true)?;
                        element.extension.push(extension);
                    }
                    Event::End(_) => break,
                    Event::Comment(_) | Event::PI(_) => {}
                    Event::Text(text) if is_whitespace_text(&text) => {}
                    other => {
                        return Err(SerdeError::unexpected(
                            name,
                            "extension element",
                            describe_event(&other),
                        ));
                    }
                }
            }
        }
        Ok(element)
    }

    /// The only child a primitive element may have.
    fn read_primitive_extension<V: PrimitiveType>(
        &mut self,
        ns: Ns,
        child: &BytesStart<'_>,
        empty: bool,
    ) -> Result<Extension> {
        let name = local_name(child)?;
        if name != "extension" {
            return Err(SerdeError::UnknownMember {
                type_name: V::TYPE_NAME.to_string(),
                member: name,
            });
        }
        if ns != Ns::Fhir {
            return Err(SerdeError::WrongNamespace {
                element: name,
                expected: FHIR_NAMESPACE.to_string(),
                found: ns.describe(),
            });
        }
        self.read_record(child, empty)
    }

    /// `<contained><Patient>...</Patient></contained>`: exactly one resource.
    fn read_wrapped_resource(
        &mut self,
        name: &str,
        start: &BytesStart<'_>,
        empty: bool,
    ) -> Result<Resource> {
        for attr in start.attributes() {
            let attr = attr.map_err(quick_xml::Error::from)?;
            if !is_namespace_declaration(attr.key.as_ref()) {
                return Err(SerdeError::UnknownAttribute {
                    element: name.to_string(),
                    attribute: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
                });
            }
        }
        if empty {
            return Err(SerdeError::unexpected(name, "resource element", "empty element"));
        }

        let mut resource = None;
        loop {
            let (ns, event) = self.next()?;
            let (child, child_empty) = match event {
                Event::Start(child) => (child, false),
                Event::Empty(child) => (child, true),
                Event::End(_) => break,
                Event::Comment(_) | Event::PI(_) => continue,
                Event::Text(text) if is_whitespace_text(&text) => continue,
                other => {
                    return Err(SerdeError::unexpected(
                        name,
                        "resource element",
                        describe_event(&other),
                    ));
                }
            };
            if resource.is_some() {
                return Err(SerdeError::unexpected(
                    name,
                    "a single resource",
                    describe_event(&Event::Start(child)),
                ));
            }
            resource = Some(self.read_resource(ns, &child, child_empty)?);
        }
        resource.ok_or_else(|| SerdeError::unexpected(name, "resource element", "end tag"))
    }

    /// Captures the narrative `div` verbatim, whitespace included.
    fn read_xhtml(&mut self, start: &BytesStart<'_>, empty: bool) -> Result<Xhtml> {
        let mut writer = Writer::new(Vec::new());
        let root = utils::with_xhtml_namespace(start.clone());
        if empty {
            writer.write_event(Event::Empty(root))?;
        } else {
            writer.write_event(Event::Start(root))?;
            self.reader.config_mut().trim_text(false);
            let copied = self.copy_xhtml_content(&mut writer);
            self.reader.config_mut().trim_text(true);
            copied?;
        }
        let markup =
            String::from_utf8(writer.into_inner()).map_err(|e| SerdeError::Custom(e.to_string()))?;
        crate::xhtml::check_div(&markup)?;
        Ok(Xhtml::new(markup))
    }

    fn copy_xhtml_content(&mut self, writer: &mut Writer<Vec<u8>>) -> Result<()> {
        let mut depth = 1usize;
        loop {
            let (_, event) = self.next()?;
            match &event {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => {
                    return Err(SerdeError::unexpected("div", "end tag </div>", "end of input"));
                }
                _ => {}
            }
            writer.write_event(event)?;
            if depth == 0 {
                return Ok(());
            }
        }
    }
}

struct ElementBuilder<'d, 's, R> {
    de: &'d mut XmlDeserializer<R>,
    start: &'s BytesStart<'s>,
    empty: bool,
}

impl<R: BufRead> ResourceBuilder for ElementBuilder<'_, '_, R> {
    type Error = SerdeError;

    fn build<T: ResourceRecord>(&mut self) -> Result<T> {
        self.de.read_record(self.start, self.empty)
    }
}

/// An attribute offered to a record. Only `attribute` members accept it.
struct AttributeDecoder<'n> {
    element: &'static str,
    name: &'n str,
    value: Option<String>,
}

impl AttributeDecoder<'_> {
    fn not_an_attribute(&self) -> SerdeError {
        SerdeError::UnknownAttribute {
            element: self.element.to_string(),
            attribute: self.name.to_string(),
        }
    }
}

impl MemberDecoder for AttributeDecoder<'_> {
    type Error = SerdeError;

    fn attribute(&mut self, slot: &mut Option<String>) -> Result<()> {
        *slot = self.value.take();
        Ok(())
    }

    fn primitive<V: PrimitiveType>(&mut self, _slot: &mut Option<Element<V>>) -> Result<()> {
        Err(self.not_an_attribute())
    }

    fn primitives<V: PrimitiveType>(&mut self, _slot: &mut Vec<Element<V>>) -> Result<()> {
        Err(self.not_an_attribute())
    }

    fn record<T: Record>(&mut self, _slot: &mut Option<T>) -> Result<()> {
        Err(self.not_an_attribute())
    }

    fn records<T: Record>(&mut self, _slot: &mut Vec<T>) -> Result<()> {
        Err(self.not_an_attribute())
    }

    fn resource(&mut self, _slot: &mut Option<Resource>) -> Result<()> {
        Err(self.not_an_attribute())
    }

    fn resources(&mut self, _slot: &mut Vec<Resource>) -> Result<()> {
        Err(self.not_an_attribute())
    }

    fn xhtml(&mut self, _slot: &mut Option<Xhtml>) -> Result<()> {
        Err(self.not_an_attribute())
    }

    fn choice_conflict(&self, field: &str, first: &str, second: &str) -> SerdeError {
        SerdeError::choice_conflict(self.element, field, first, second)
    }
}

/// A child element offered to a record. Every method consumes the element
/// through its end tag.
struct ElementDecoder<'d, R> {
    de: &'d mut XmlDeserializer<R>,
    type_name: &'static str,
    name: &'d str,
    ns: Ns,
    start: &'d BytesStart<'d>,
    empty: bool,
}

impl<R: BufRead> ElementDecoder<'_, R> {
    fn expect_namespace(&self, expected: Ns) -> Result<()> {
        if self.ns == expected {
            return Ok(());
        }
        Err(SerdeError::WrongNamespace {
            element: self.name.to_string(),
            expected: expected.describe(),
            found: self.ns.describe(),
        })
    }

    fn duplicate(&self) -> SerdeError {
        SerdeError::DuplicateMember {
            type_name: self.type_name.to_string(),
            member: self.name.to_string(),
        }
    }
}

impl<R: BufRead> MemberDecoder for ElementDecoder<'_, R> {
    type Error = SerdeError;

    fn attribute(&mut self, _slot: &mut Option<String>) -> Result<()> {
        Err(SerdeError::unexpected(
            self.type_name,
            format!("'{}' as an attribute", self.name),
            format!("element <{}>", self.name),
        ))
    }

    fn primitive<V: PrimitiveType>(&mut self, slot: &mut Option<Element<V>>) -> Result<()> {
        self.expect_namespace(Ns::Fhir)?;
        if slot.is_some() {
            return Err(self.duplicate());
        }
        let element = self.de.read_primitive(self.type_name, self.start, self.empty)?;
        if !element.is_empty() {
            *slot = Some(element);
        }
        Ok(())
    }

    fn primitives<V: PrimitiveType>(&mut self, slot: &mut Vec<Element<V>>) -> Result<()> {
        self.expect_namespace(Ns::Fhir)?;
        let element = self.de.read_primitive(self.type_name, self.start, self.empty)?;
        if !element.is_empty() {
            slot.push(element);
        }
        Ok(())
    }

    fn record<T: Record>(&mut self, slot: &mut Option<T>) -> Result<()> {
        self.expect_namespace(Ns::Fhir)?;
        if slot.is_some() {
            return Err(self.duplicate());
        }
        *slot = Some(self.de.read_record(self.start, self.empty)?);
        Ok(())
    }

    fn records<T: Record>(&mut self, slot: &mut Vec<T>) -> Result<()> {
        self.expect_namespace(Ns::Fhir)?;
        slot.push(self.de.read_record(self.start, self.empty)?);
        Ok(())
    }

    fn resource(&mut self, slot: &mut Option<Resource>) -> Result<()> {
        self.expect_namespace(Ns::Fhir)?;
        if slot.is_some() {
            return Err(self.duplicate());
        }
        *slot = Some(self.de.read_wrapped_resource(self.name, self.start, self.empty)?);
        Ok(())
    }

    fn resources(&mut self, slot: &mut Vec<Resource>) -> Result<()> {
        self.expect_namespace(Ns::Fhir)?;
        slot.push(self.de.read_wrapped_resource(self.name, self.start, self.empty)?);
        Ok(())
    }

    fn xhtml(&mut self, slot: &mut Option<Xhtml>) -> Result<()> {
        self.expect_namespace(Ns::Xhtml)?;
        if slot.is_some() {
            return Err(self.duplicate());
        }
        *slot = Some(self.de.read_xhtml(self.start, self.empty)?);
        Ok(())
    }

    fn choice_conflict(&self, field: &str, first: &str, second: &str) -> SerdeError {
        SerdeError::choice_conflict(self.type_name, field, first, second)
    }
}
