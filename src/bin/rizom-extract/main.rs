//! rizom-extract - Save RizomUV data from a scene into a container.
//!
//! Usage: rizom-extract <input-scene> <output-container>

use anyhow::{Context, Result};
use rizom_bridge::bridge::extract_file;
use rizom_bridge::report::TracingReporter;
use rizom_bridge::settings::Settings;
use rizom_bridge::util::logging::{self, split_verbosity_flags};
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (verbosity, rest) = split_verbosity_flags(args.get(1..).unwrap_or_default());
    logging::init(verbosity);

    let [input, output] = rest.as_slice() else {
        eprintln!("Usage: rizom-extract <input-scene> <output-container>");
        std::process::exit(1);
    };

    if let Err(e) = run(input, output) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(input: &str, output: &str) -> Result<()> {
    let settings = Settings::load();
    let summary = extract_file(Path::new(input), Path::new(output), &settings, &mut TracingReporter)
        .with_context(|| format!("extracting {}", input))?;

    println!(
        "SUCCESS: saved {} document and {} mesh properties, {} island arrays to {}",
        summary.document_properties, summary.geometry_properties, summary.auxiliary_arrays, output
    );
    Ok(())
}
