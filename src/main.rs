mod catalog;
mod compare;
mod config;
mod heuristics;
mod interchange;
mod report;
mod spec_extract;
mod summary;

use spec_extract::SpecContent;
use std::fs;
use tracing::{info, warn};

const DEFAULT_CONFIG_PATH: &str = ".config/edi810_check.toml";

fn usage() -> String {
    "usage: edi810_check <interchange-file> <spec-file> [config.toml]".to_string()
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let (edi_path, spec_path) = match (args.first(), args.get(1)) {
        (Some(edi), Some(spec)) => (edi, spec),
        _ => {
            eprintln!("{}", usage());
            std::process::exit(2);
        }
    };
    let cfg = config::Config::load_or_default(
        args.get(2).map(String::as_str).unwrap_or(DEFAULT_CONFIG_PATH),
    )?;

    // init tracing
    tracing_subscriber::fmt()
        .with_target(true)
        .with_level(true)
        .with_env_filter(cfg.log_filter.as_str())
        .with_writer(std::io::stderr)
        .init();

    let edi_bytes = fs::read(edi_path)?;
    let spec_bytes = fs::read(spec_path)?;
    let edi_text = String::from_utf8_lossy(&edi_bytes).replace(char::REPLACEMENT_CHARACTER, "");

    let span = tracing::info_span!("submission", fingerprint = %report::fingerprint(edi_text.as_bytes()));
    let _guard = span.enter();
    info!(edi = %edi_path, spec = %spec_path, "Validating submission");

    let spec_lines = match spec_extract::extract_spec_lines(&spec_bytes, &cfg.extraction) {
        SpecContent::Lines(lines) => lines,
        SpecContent::ScannedImage => {
            warn!("Specification is scanned / image-only, using catalog defaults");
            Vec::new()
        }
        SpecContent::Error(e) => {
            warn!(error = %e, "Specification could not be read, using catalog defaults");
            Vec::new()
        }
    };

    let report = report::build_report(&edi_text, &spec_lines, cfg.output.include_projection);
    let json = if cfg.output.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{json}");

    Ok(())
}
