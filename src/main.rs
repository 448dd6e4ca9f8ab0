//! rizom-bridge CLI - Extract, inject and inspect RizomUV containers.

use anyhow::{bail, Context, Result};
use rizom_bridge::bridge::{extract_file, inject_file};
use rizom_bridge::cache::CacheManager;
use rizom_bridge::container::{ContainerReader, Record};
use rizom_bridge::report::TracingReporter;
use rizom_bridge::scene::io::WriterRegistry;
use rizom_bridge::settings::Settings;
use rizom_bridge::util::logging::{self, split_verbosity_flags};
use std::env;
use std::path::{Path, PathBuf};

fn main() {
    let args: Vec<String> = env::args().collect();
    let prog = args.first().map(String::as_str).unwrap_or("rizom-bridge");

    // Parse global flags
    let (verbosity, filtered_args) = split_verbosity_flags(args.get(1..).unwrap_or_default());
    logging::init(verbosity);

    if filtered_args.is_empty() {
        print_usage(prog);
        return;
    }

    let rest = &filtered_args[1..];
    let result = match filtered_args[0] {
        "extract" | "x" => cmd_extract(prog, rest),
        "inject" | "j" => cmd_inject(prog, rest),
        "dump" | "d" => cmd_dump(prog, rest),
        "cache" | "c" => cmd_cache(prog, rest),
        "config" => cmd_config(prog, rest),
        "-V" | "--version" | "version" => {
            println!("{}", logging::version_string());
            Ok(())
        }
        "help" | "h" | "-h" | "--help" => {
            print_usage(prog);
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other);
            print_usage(prog);
            std::process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn print_usage(prog: &str) {
    println!("rizom-bridge - Carry RizomUV data across scene re-exports");
    println!();
    println!("Usage: {} [options] <command> [args]", prog);
    println!();
    println!("Commands:");
    println!("  x, extract <scene> [container]          Save RizomUV data (default: cache)");
    println!("  j, inject <target> <container> <out>    Re-attach saved data to a scene");
    println!("  d, dump <container> [--json]            List container records");
    println!("  c, cache list                           List cached containers");
    println!("  c, cache path <scene>                   Show the cache file for a scene");
    println!("  c, cache delete <file>                  Delete one cached container");
    println!("  c, cache clear                          Delete all cached containers");
    println!("  config show | init                      Show or write the settings file");
    println!("  h, help                                 Show this help");
    println!();
    println!("Options:");
    println!("  -v, --verbose  Debug output");
    println!("  -vv, --trace   Trace output (very verbose)");
    println!("  -q, --quiet    Warnings and errors only");
    println!("  -V, --version  Show version");
}

fn usage_error(prog: &str, usage: &str) -> ! {
    eprintln!("Usage: {} {}", prog, usage);
    std::process::exit(1);
}

fn cmd_extract(prog: &str, args: &[&str]) -> Result<()> {
    let Some(input) = args.first() else {
        usage_error(prog, "extract <scene> [container]");
    };
    let settings = Settings::load();
    let output = match args.get(1) {
        Some(out) => PathBuf::from(out),
        None => {
            let cache = CacheManager::from_settings(&settings)?;
            cache.ensure_dir().context("creating cache directory")?;
            cache.cache_path(input)
        }
    };

    tracing::info!("Extracting {} -> {}", input, output.display());
    let summary = extract_file(Path::new(input), &output, &settings, &mut TracingReporter)
        .with_context(|| format!("extracting {}", input))?;

    println!("Saved: {}", output.display());
    println!("  Document properties: {}", summary.document_properties);
    println!("  Meshes:              {}", summary.meshes);
    println!("  Mesh properties:     {}", summary.geometry_properties);
    println!("  Island arrays:       {}", summary.auxiliary_arrays);
    Ok(())
}

fn cmd_inject(prog: &str, args: &[&str]) -> Result<()> {
    let [target, container, output] = args else {
        usage_error(prog, "inject <target> <container> <output>");
    };
    let settings = Settings::load();
    let container = resolve_container(&settings, container);

    tracing::info!("Injecting {} into {}", container.display(), target);
    let summary = inject_file(
        Path::new(target),
        &container,
        Path::new(output),
        &settings,
        &WriterRegistry::default(),
        &mut TracingReporter,
    )
    .with_context(|| format!("injecting {} into {}", container.display(), target))?;

    println!("Saved: {}", output);
    println!("  Document properties set: {}", summary.chain.values_set());
    println!("  Meshes matched:          {}", summary.matched);
    println!("  Meshes without data:     {}", summary.skipped);
    println!("  Mesh properties:         {}", summary.properties);
    println!("  Island layers:           {}", summary.layers);
    Ok(())
}

/// An existing path is used as is; otherwise try it as a cache file name.
fn resolve_container(settings: &Settings, arg: &str) -> PathBuf {
    let path = PathBuf::from(arg);
    if path.exists() {
        return path;
    }
    CacheManager::from_settings(settings)
        .map(|cache| cache.dir().join(arg))
        .ok()
        .filter(|p| p.exists())
        .unwrap_or(path)
}

fn cmd_dump(prog: &str, args: &[&str]) -> Result<()> {
    let json = args.contains(&"--json");
    let paths: Vec<&&str> = args.iter().filter(|a| **a != "--json").collect();
    let [path] = paths.as_slice() else {
        usage_error(prog, "dump <container> [--json]");
    };

    let reader = ContainerReader::open(path).with_context(|| format!("opening {}", path))?;
    let records = reader
        .collect::<rizom_bridge::Result<Vec<Record>>>()
        .with_context(|| format!("reading {}", path))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("Container: {}", path);
    println!("Records: {}", records.len());
    println!();
    for record in &records {
        match record {
            Record::DocumentProperty(p) | Record::GeometryProperty(p) => {
                println!(
                    "  {} {:<20} {:<24} {:<8} {}",
                    record.marker().as_char(),
                    p.owner,
                    p.name,
                    p.type_tag,
                    p.value
                );
            }
            Record::AuxiliaryArray(a) => {
                println!(
                    "  {} {:<20} {:<24} {:<8} {} elements",
                    record.marker().as_char(),
                    a.owner,
                    a.name,
                    "Int[]",
                    a.elements.len()
                );
            }
        }
    }
    Ok(())
}

fn cmd_cache(prog: &str, args: &[&str]) -> Result<()> {
    let settings = Settings::load();
    let cache = CacheManager::from_settings(&settings)?;

    match args {
        [] | ["list"] => {
            let entries = cache.list()?;
            println!("Cache: {}", cache.dir().display());
            if entries.is_empty() {
                println!("  (empty)");
            }
            for entry in entries {
                println!("  {:<32} {:>8.0} KB  ({})", entry.filename, entry.size_kb, entry.scene_name);
            }
        }
        ["path", scene] => println!("{}", cache.cache_path(scene).display()),
        ["delete", file] => {
            if cache.delete(file)? {
                println!("Deleted: {}", file);
            } else {
                bail!("no cached container named {}", file);
            }
        }
        ["clear"] => println!("Deleted {} cached container(s)", cache.clear()?),
        _ => usage_error(prog, "cache list | path <scene> | delete <file> | clear"),
    }
    Ok(())
}

fn cmd_config(prog: &str, args: &[&str]) -> Result<()> {
    let path = Settings::path();
    match args {
        [] | ["show"] => {
            match &path {
                Some(p) => println!("# {}", p.display()),
                None => println!("# no settings path available"),
            }
            println!("{}", serde_json::to_string_pretty(&Settings::load())?);
        }
        ["init"] => {
            let Some(path) = path else {
                bail!("no settings path available");
            };
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            Settings::default()
                .save_to(&path)
                .with_context(|| format!("writing {}", path.display()))?;
            println!("Wrote: {}", path.display());
        }
        _ => usage_error(prog, "config show | init"),
    }
    Ok(())
}
