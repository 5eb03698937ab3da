//! XML encoding: the record walk written as quick-xml events.
//!
//! Each record element is walked twice, once to collect its attributes and
//! learn whether it has children, once to write the children.

use std::convert::Infallible;
use std::io::Write;

use helios_fhir::{Element, FhirDocument, MemberVisitor, PrimitiveType, Record, Resource, Xhtml};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};

use crate::error::SerdeError;
use crate::xml::utils::{self, FHIR_NAMESPACE};

/// Serialize a FHIR resource to an XML string.
///
/// # Examples
///
/// ```
/// use helios_fhir::{Element, Patient};
/// use helios_serde::xml::to_xml_string;
///
/// let patient = Patient {
///     active: Some(Element::new(true)),
///     ..Patient::default()
/// };
/// let xml = to_xml_string(&patient)?;
/// assert!(xml.ends_with(r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/></Patient>"#));
/// # Ok::<(), helios_serde::SerdeError>(())
/// ```
pub fn to_xml_string<T: FhirDocument>(value: &T) -> Result<String, SerdeError> {
    let buffer = to_xml_vec(value)?;
    String::from_utf8(buffer).map_err(|e| SerdeError::Custom(e.to_string()))
}

/// Serialize a FHIR resource to an XML byte vector.
pub fn to_xml_vec<T: FhirDocument>(value: &T) -> Result<Vec<u8>, SerdeError> {
    let mut serializer = XmlSerializer::new(Vec::new());
    serializer.write_document(value)?;
    Ok(serializer.into_inner())
}

/// Serialize a FHIR resource to an XML writer.
pub fn to_xml_writer<T: FhirDocument, W: Write>(value: &T, writer: W) -> Result<(), SerdeError> {
    let mut serializer = XmlSerializer::new(writer);
    serializer.write_document(value)
}

/// Members of an element, walked by the writer.
trait Members {
    fn walk_members<'a, V: MemberVisitor<'a>>(&'a self, visitor: &mut V) -> Result<(), V::Error>;
}

impl<R: Record> Members for R {
    fn walk_members<'a, V: MemberVisitor<'a>>(&'a self, visitor: &mut V) -> Result<(), V::Error> {
        self.walk(visitor)
    }
}

struct Document<'t, T>(&'t T);

impl<T: FhirDocument> Members for Document<'_, T> {
    fn walk_members<'a, V: MemberVisitor<'a>>(&'a self, visitor: &mut V) -> Result<(), V::Error> {
        self.0.walk_document(visitor)
    }
}

/// Writes FHIR XML events to an underlying writer.
pub struct XmlSerializer<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> XmlSerializer<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Writer::new(writer),
        }
    }

    /// Writes the XML declaration and the resource element, which carries
    /// the only FHIR namespace declaration of the document.
    pub fn write_document<T: FhirDocument>(&mut self, document: &T) -> Result<(), SerdeError> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write_element(document.resource_type(), &Document(document), Some(FHIR_NAMESPACE))
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }

    fn write_element<M: Members>(
        &mut self,
        name: &str,
        members: &M,
        namespace: Option<&str>,
    ) -> Result<(), SerdeError> {
        let mut head = ElementHead::default();
        let Ok(()) = members.walk_members(&mut head);

        let mut start = BytesStart::new(name);
        if let Some(namespace) = namespace {
            start.push_attribute(("xmlns", namespace));
        }
        for (key, value) in &head.attributes {
            start.push_attribute((key.as_str(), value.as_str()));
        }

        if !head.has_children {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        self.writer.write_event(Event::Start(start))?;
        members.walk_members(&mut ElementWriter { ser: self })?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_primitive<V: PrimitiveType>(
        &mut self,
        name: &str,
        element: &Element<V>,
    ) -> Result<(), SerdeError> {
        if element.is_empty() {
            return Ok(());
        }
        let mut start = BytesStart::new(name);
        if let Some(id) = &element.id {
            start.push_attribute(("id", id.as_str()));
        }
        if let Some(value) = &element.value {
            start.push_attribute(("value", value.to_lexical().as_str()));
        }

        if element.extension.is_empty() {
            self.writer.write_event(Event::Empty(start))?;
            return Ok(());
        }
        self.writer.write_event(Event::Start(start))?;
        for extension in &element.extension {
            self.write_element("extension", extension, None)?;
        }
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// `<contained><Patient>...</Patient></contained>`
    fn write_wrapped_resource(
        &mut self,
        name: &str,
        resource: &Resource,
    ) -> Result<(), SerdeError> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        self.write_element(resource.resource_type(), &Document(resource), None)?;
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    /// Copies the narrative markup event by event, declaring the XHTML
    /// namespace on its root if the markup does not.
    fn write_xhtml(&mut self, xhtml: &Xhtml) -> Result<(), SerdeError> {
        crate::xhtml::check_div(xhtml.as_str())?;
        let mut reader = Reader::from_str(xhtml.as_str());
        reader.config_mut().trim_text(false);

        let mut root_seen = false;
        loop {
            let event = reader
                .read_event()
                .map_err(|e| SerdeError::invalid("Narrative", "div", e))?;
            match event {
                Event::Eof => break,
                Event::Decl(_) => {}
                Event::Start(start) if !root_seen => {
                    root_seen = true;
                    self.writer
                        .write_event(Event::Start(utils::with_xhtml_namespace(start)))?;
                }
                Event::Empty(start) if !root_seen => {
                    root_seen = true;
                    self.writer
                        .write_event(Event::Empty(utils::with_xhtml_namespace(start)))?;
                }
                event => self.writer.write_event(event)?,
            }
        }
        Ok(())
    }
}

/// First pass over an element: its attributes and whether anything else
/// will be written inside it.
#[derive(Default)]
struct ElementHead<'a> {
    attributes: Vec<(String, &'a String)>,
    has_children: bool,
}

impl<'a> MemberVisitor<'a> for ElementHead<'a> {
    type Error = Infallible;

    fn attribute(&mut self, name: &str, value: Option<&'a String>) -> Result<(), Infallible> {
        if let Some(value) = value {
            self.attributes.push((name.to_string(), value));
        }
        Ok(())
    }

    fn primitive<V: PrimitiveType>(
        &mut self,
        _name: &str,
        value: Option<&'a Element<V>>,
    ) -> Result<(), Infallible> {
        self.has_children |= value.is_some_and(|e| !e.is_empty());
        Ok(())
    }

    fn primitives<V: PrimitiveType>(
        &mut self,
        _name: &str,
        values: &'a [Element<V>],
    ) -> Result<(), Infallible> {
        self.has_children |= values.iter().any(|e| !e.is_empty());
        Ok(())
    }

    fn record<R: Record>(&mut self, _name: &str, value: Option<&'a R>) -> Result<(), Infallible> {
        self.has_children |= value.is_some();
        Ok(())
    }

    fn records<R: Record>(&mut self, _name: &str, values: &'a [R]) -> Result<(), Infallible> {
        self.has_children |= !values.is_empty();
        Ok(())
    }

    fn resource(&mut self, _name: &str, value: Option<&'a Resource>) -> Result<(), Infallible> {
        self.has_children |= value.is_some();
        Ok(())
    }

    fn resources(&mut self, _name: &str, values: &'a [Resource]) -> Result<(), Infallible> {
        self.has_children |= !values.is_empty();
        Ok(())
    }

    fn xhtml(&mut self, _name: &str, value: Option<&'a Xhtml>) -> Result<(), Infallible> {
        self.has_children |= value.is_some();
        Ok(())
    }
}

/// Second pass: the child elements.
struct ElementWriter<'s, W: Write> {
    ser: &'s mut XmlSerializer<W>,
}

impl<'a, W: Write> MemberVisitor<'a> for ElementWriter<'_, W> {
    type Error = SerdeError;

    fn attribute(&mut self, _name: &str, _value: Option<&'a String>) -> Result<(), SerdeError> {
        Ok(())
    }

    fn primitive<V: PrimitiveType>(
        &mut self,
        name: &str,
        value: Option<&'a Element<V>>,
    ) -> Result<(), SerdeError> {
        match value {
            Some(element) => self.ser.write_primitive(name, element),
            None => Ok(()),
        }
    }

    fn primitives<V: PrimitiveType>(
        &mut self,
        name: &str,
        values: &'a [Element<V>],
    ) -> Result<(), SerdeError> {
        for element in values {
            self.ser.write_primitive(name, element)?;
        }
        Ok(())
    }

    fn record<R: Record>(&mut self, name: &str, value: Option<&'a R>) -> Result<(), SerdeError> {
        match value {
            Some(record) => self.ser.write_element(name, record, None),
            None => Ok(()),
        }
    }

    fn records<R: Record>(&mut self, name: &str, values: &'a [R]) -> Result<(), SerdeError> {
        for record in values {
            self.ser.write_element(name, record, None)?;
        }
        Ok(())
    }

    fn resource(&mut self, name: &str, value: Option<&'a Resource>) -> Result<(), SerdeError> {
        match value {
            Some(resource) => self.ser.write_wrapped_resource(name, resource),
            None => Ok(()),
        }
    }

    fn resources(&mut self, name: &str, values: &'a [Resource]) -> Result<(), SerdeError> {
        for resource in values {
            self.ser.write_wrapped_resource(name, resource)?;
        }
        Ok(())
    }

    fn xhtml(&mut self, _name: &str, value: Option<&'a Xhtml>) -> Result<(), SerdeError> {
        match value {
            Some(xhtml) => self.ser.write_xhtml(xhtml),
            None => Ok(()),
        }
    }
}
