//! fhir-convert: FHIR JSON ⇄ XML on the command line.

use clap::Parser;
use helios_convert::{ConvertConfig, init_logging, run};
use tracing::info;

fn main() -> anyhow::Result<()> {
    let config = ConvertConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(2);
    }

    let resource = run(&config)?;
    if config.check {
        info!(resource_type = resource.resource_type(), "input is valid");
        eprintln!("OK: {}", resource.resource_type());
    }
    Ok(())
}
