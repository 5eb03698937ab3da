//! Converter configuration.
//!
//! Every option can also be set through the environment:
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `FHIR_CONVERT_INPUT` | stdin | Input file |
//! | `FHIR_CONVERT_OUTPUT` | stdout | Output file |
//! | `FHIR_CONVERT_FROM` | from input extension | Input format (`json`, `xml`) |
//! | `FHIR_CONVERT_TO` | from output extension, else the other format | Output format |
//! | `FHIR_CONVERT_PRETTY` | false | Pretty-print JSON output |
//! | `FHIR_CONVERT_LOG_LEVEL` | warn | Log level |
//!
//! ```rust
//! use helios_convert::{ConvertConfig, Format};
//!
//! let config = ConvertConfig {
//!     input: Some("patient.json".into()),
//!     ..Default::default()
//! };
//! assert_eq!(config.source_format(), Some(Format::Json));
//! assert_eq!(config.target_format(), Some(Format::Xml));
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use clap::{Parser, ValueEnum};

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// A FHIR wire format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Json,
    Xml,
}

impl Format {
    /// Infers the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            _ => None,
        }
    }

    pub fn other(self) -> Self {
        match self {
            Format::Json => Format::Xml,
            Format::Xml => Format::Json,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Json => f.write_str("json"),
            Format::Xml => f.write_str("xml"),
        }
    }
}

/// Options of one conversion run.
#[derive(Debug, Clone, Parser)]
#[command(name = "fhir-convert", version)]
#[command(about = "Convert a FHIR resource between JSON and XML")]
pub struct ConvertConfig {
    /// Input file. Reads standard input if absent.
    #[arg(short, long, env = "FHIR_CONVERT_INPUT")]
    pub input: Option<PathBuf>,

    /// Output file. Writes standard output if absent.
    #[arg(short, long, env = "FHIR_CONVERT_OUTPUT")]
    pub output: Option<PathBuf>,

    /// Input format. Inferred from the input extension if absent.
    #[arg(long, env = "FHIR_CONVERT_FROM", value_enum)]
    pub from: Option<Format>,

    /// Output format. Inferred from the output extension, else the
    /// opposite of the input format.
    #[arg(long, env = "FHIR_CONVERT_TO", value_enum)]
    pub to: Option<Format>,

    /// Pretty-print JSON output.
    #[arg(long, env = "FHIR_CONVERT_PRETTY", default_value = "false")]
    pub pretty: bool,

    /// Only decode the input and report whether it is valid.
    #[arg(long, default_value = "false")]
    pub check: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "FHIR_CONVERT_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            input: None,
            output: None,
            from: None,
            to: None,
            pretty: false,
            check: false,
            log_level: "warn".to_string(),
        }
    }
}

impl ConvertConfig {
    pub fn source_format(&self) -> Option<Format> {
        self.from
            .or_else(|| self.input.as_deref().and_then(Format::from_path))
    }

    pub fn target_format(&self) -> Option<Format> {
        self.to
            .or_else(|| self.output.as_deref().and_then(Format::from_path))
            .or_else(|| self.source_format().map(Format::other))
    }

    /// Validates the configuration and returns every problem found.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if self.source_format().is_none() {
            errors.push("Input format cannot be inferred; pass --from json|xml".to_string());
        }

        if !self.check {
            match self.target_format() {
                None => errors.push(
                    "Output format cannot be inferred; pass --to json|xml".to_string(),
                ),
                Some(Format::Xml) if self.pretty => {
                    errors.push("--pretty applies to JSON output only".to_string())
                }
                Some(_) => {}
            }
        }

        if !LOG_LEVELS.contains(&self.log_level.to_ascii_lowercase().as_str()) {
            errors.push(format!(
                "Unknown log level '{}'; expected one of {}",
                self.log_level,
                LOG_LEVELS.join(", ")
            ));
        }

        if let (Some(input), Some(output)) = (&self.input, &self.output)
            && input == output
        {
            errors.push("Input and output must be different files".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
