//! # fhir-convert
//!
//! Reads one FHIR resource as JSON or XML and writes it in the other
//! format. Decoding is strict, so the converter doubles as a validator
//! (`--check`).

pub mod config;

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::Context;
use helios_fhir::Resource;
use tracing::{debug, info};

pub use config::{ConvertConfig, Format};

/// Decodes one resource from `input`.
pub fn decode(input: &[u8], format: Format) -> helios_serde::Result<Resource> {
    match format {
        Format::Json => helios_serde::from_json_slice(input),
        Format::Xml => helios_serde::from_xml_slice(input),
    }
}

/// Encodes `resource` as a document of `format`.
pub fn encode(resource: &Resource, format: Format, pretty: bool) -> helios_serde::Result<String> {
    match (format, pretty) {
        (Format::Json, false) => helios_serde::to_json_string(resource),
        (Format::Json, true) => helios_serde::to_json_string_pretty(resource),
        (Format::Xml, _) => helios_serde::to_xml_string(resource),
    }
}

/// Converts a document between formats in memory.
///
/// ```
/// use helios_convert::{Format, convert};
///
/// let xml = convert(
///     br#"{"resourceType":"Patient","active":true}"#,
///     Format::Json,
///     Format::Xml,
///     false,
/// )?;
/// assert!(xml.ends_with(r#"<Patient xmlns="http://hl7.org/fhir"><active value="true"/></Patient>"#));
/// # Ok::<(), helios_serde::SerdeError>(())
/// ```
pub fn convert(
    input: &[u8],
    from: Format,
    to: Format,
    pretty: bool,
) -> helios_serde::Result<String> {
    let resource = decode(input, from)?;
    encode(&resource, to, pretty)
}

/// Runs one conversion as described by `config`.
///
/// Returns the decoded resource so callers can report on it.
pub fn run(config: &ConvertConfig) -> anyhow::Result<Resource> {
    let from = config
        .source_format()
        .context("input format cannot be inferred")?;
    let input = read_input(config.input.as_deref())?;
    debug!(bytes = input.len(), format = %from, "read input");

    let resource = decode(&input, from).with_context(|| format!("invalid FHIR {from} input"))?;
    info!(
        resource_type = resource.resource_type(),
        id = ?resource.id(),
        "decoded resource"
    );
    if config.check {
        return Ok(resource);
    }

    let to = config
        .target_format()
        .context("output format cannot be inferred")?;
    let output = encode(&resource, to, config.pretty)?;
    write_output(config.output.as_deref(), &output)?;
    info!(format = %to, bytes = output.len(), "wrote output");
    Ok(resource)
}

fn read_input(path: Option<&Path>) -> anyhow::Result<Vec<u8>> {
    match path {
        Some(path) => {
            fs::read(path).with_context(|| format!("failed to read {}", path.display()))
        }
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .lock()
                .read_to_end(&mut buffer)
                .context("failed to read standard input")?;
            Ok(buffer)
        }
    }
}

fn write_output(path: Option<&Path>, output: &str) -> anyhow::Result<()> {
    match path {
        Some(path) => {
            fs::write(path, output).with_context(|| format!("failed to write {}", path.display()))
        }
        None => {
            let mut stdout = io::stdout().lock();
            writeln!(stdout, "{output}").context("failed to write standard output")?;
            Ok(())
        }
    }
}

/// Initializes logging on standard error; `RUST_LOG` overrides `level`.
pub fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("helios_convert={level},helios_serde={level}"))
    });

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}
