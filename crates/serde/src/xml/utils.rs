//! Helpers shared by the XML reader and writer.

use quick_xml::events::{BytesStart, BytesText, Event};

use crate::error::{Result, SerdeError};

pub use helios_fhir::{FHIR_NAMESPACE, XHTML_NAMESPACE};

/// True for text made only of XML whitespace.
pub fn is_whitespace_text(text: &BytesText) -> bool {
    text.as_ref()
        .iter()
        .all(|b| matches!(b, b' ' | b'\n' | b'\r' | b'\t'))
}

/// True for `xmlns` and `xmlns:prefix` attributes.
pub fn is_namespace_declaration(key: &[u8]) -> bool {
    key == b"xmlns" || key.starts_with(b"xmlns:")
}

pub fn utf8(bytes: &[u8]) -> Result<&str> {
    std::str::from_utf8(bytes).map_err(|e| SerdeError::Custom(format!("invalid UTF-8 in XML: {e}")))
}

/// Local name of an element, without any prefix.
pub fn local_name(start: &BytesStart) -> Result<String> {
    utf8(start.local_name().as_ref()).map(str::to_owned)
}

/// Short description of an event for error messages.
pub fn describe_event(event: &Event) -> String {
    match event {
        Event::Start(start) | Event::Empty(start) => {
            format!("element <{}>", String::from_utf8_lossy(start.name().as_ref()))
        }
        Event::End(end) => format!("end tag </{}>", String::from_utf8_lossy(end.name().as_ref())),
        Event::Text(_) | Event::GeneralRef(_) => "text".to_string(),
        Event::CData(_) => "CDATA section".to_string(),
        Event::Comment(_) => "comment".to_string(),
        Event::Decl(_) => "XML declaration".to_string(),
        Event::PI(_) => "processing instruction".to_string(),
        Event::DocType(_) => "DOCTYPE".to_string(),
        Event::Eof => "end of input".to_string(),
    }
}

/// Returns `start` with a default XHTML namespace declaration, adding one
/// if it has none.
pub fn with_xhtml_namespace(start: BytesStart<'_>) -> BytesStart<'static> {
    let declared = start
        .attributes()
        .flatten()
        .any(|attr| attr.key.as_ref() == b"xmlns");
    let mut start = start.into_owned();
    if !declared {
        start.push_attribute(("xmlns", XHTML_NAMESPACE));
    }
    start
}
