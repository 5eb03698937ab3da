//! Shape check for narrative markup, shared by both codecs.
//!
//! `Narrative.div` travels as a string in JSON and as literal XHTML in XML,
//! so markup accepted from one format must be writable in the other: one
//! `div` root, unprefixed, in the XHTML namespace or with no default
//! namespace declaration at all.

use helios_fhir::XHTML_NAMESPACE;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::error::{Result, SerdeError};

pub(crate) fn check_div(markup: &str) -> Result<()> {
    let invalid = |message: String| SerdeError::invalid("Narrative", "div", message);

    let mut reader = Reader::from_str(markup);
    reader.config_mut().trim_text(false);
    let mut depth = 0usize;
    let mut root_seen = false;
    loop {
        let event = reader.read_event().map_err(|e| invalid(e.to_string()))?;
        match event {
            Event::Eof => break,
            Event::Start(ref start) | Event::Empty(ref start) if depth == 0 => {
                if root_seen {
                    return Err(invalid("more than one root element".to_string()));
                }
                check_root(start).map_err(invalid)?;
                root_seen = true;
                if matches!(event, Event::Start(_)) {
                    depth = 1;
                }
            }
            Event::Start(_) => depth += 1,
            Event::End(_) => depth = depth.saturating_sub(1),
            Event::Text(ref text) if depth == 0 => {
                if !text.iter().all(|b| b.is_ascii_whitespace()) {
                    return Err(invalid("text outside the div element".to_string()));
                }
            }
            Event::CData(_) | Event::GeneralRef(_) if depth == 0 => {
                return Err(invalid("text outside the div element".to_string()));
            }
            _ => {}
        }
    }

    if !root_seen {
        return Err(invalid("no div element".to_string()));
    }
    if depth != 0 {
        return Err(invalid("div element is not closed".to_string()));
    }
    Ok(())
}

fn check_root(start: &BytesStart<'_>) -> std::result::Result<(), String> {
    if start.name().as_ref() != b"div" {
        return Err(format!(
            "root element is <{}>, expected <div>",
            String::from_utf8_lossy(start.name().as_ref())
        ));
    }
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        if attr.key.as_ref() == b"xmlns" && attr.value.as_ref() != XHTML_NAMESPACE.as_bytes() {
            return Err(format!(
                "div is in namespace '{}', expected '{XHTML_NAMESPACE}'",
                String::from_utf8_lossy(&attr.value)
            ));
        }
    }
    Ok(())
}
