//! rizom-inject - Re-attach container data to an exported scene.
//!
//! Usage: rizom-inject <target-scene> <container> <output-scene>

use anyhow::{Context, Result};
use rizom_bridge::bridge::inject_file;
use rizom_bridge::report::TracingReporter;
use rizom_bridge::scene::io::WriterRegistry;
use rizom_bridge::settings::Settings;
use rizom_bridge::util::logging::{self, split_verbosity_flags};
use std::path::Path;

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let (verbosity, rest) = split_verbosity_flags(args.get(1..).unwrap_or_default());
    logging::init(verbosity);

    let [target, container, output] = rest.as_slice() else {
        eprintln!("Usage: rizom-inject <target-scene> <container> <output-scene>");
        std::process::exit(1);
    };

    if let Err(e) = run(target, container, output) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(target: &str, container: &str, output: &str) -> Result<()> {
    let settings = Settings::load();
    let summary = inject_file(
        Path::new(target),
        Path::new(container),
        Path::new(output),
        &settings,
        &WriterRegistry::default(),
        &mut TracingReporter,
    )
    .with_context(|| format!("injecting {} into {}", container, target))?;

    println!(
        "SUCCESS: {} meshes updated, {} island layers, {} skipped; saved {}",
        summary.matched, summary.layers, summary.skipped, output
    );
    Ok(())
}
