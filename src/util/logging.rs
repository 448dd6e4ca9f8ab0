//! Command-line verbosity flags and tracing subscriber setup.

use tracing_subscriber::EnvFilter;

/// Output verbosity selected on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    /// Filter directive used when `RUST_LOG` is not set.
    pub fn directive(self) -> &'static str {
        match self {
            Verbosity::Quiet => "warn",
            Verbosity::Info => "info",
            Verbosity::Debug => "debug",
            Verbosity::Trace => "trace",
        }
    }
}

/// Split global verbosity flags out of the argument list.
///
/// Returns the selected verbosity and the remaining arguments in order.
/// The last verbosity flag wins.
pub fn split_verbosity_flags<S: AsRef<str>>(args: &[S]) -> (Verbosity, Vec<&str>) {
    let mut verbosity = Verbosity::default();
    let mut rest = Vec::with_capacity(args.len());
    for arg in args {
        match arg.as_ref() {
            "-v" | "--verbose" => verbosity = Verbosity::Debug,
            "-vv" | "--trace" => verbosity = Verbosity::Trace,
            "-q" | "--quiet" => verbosity = Verbosity::Quiet,
            other => rest.push(other),
        }
    }
    (verbosity, rest)
}

/// Install the global fmt subscriber on stderr. `RUST_LOG` overrides `verbosity`.
///
/// Calling this twice is harmless; the second call is ignored.
pub fn init(verbosity: Verbosity) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}

/// Version banner including the build stamp from `build.rs`.
pub fn version_string() -> String {
    let date = option_env!("RIZOM_BRIDGE_BUILD_DATE").unwrap_or("unknown");
    let time = option_env!("RIZOM_BRIDGE_BUILD_TIME").unwrap_or("unknown");
    format!("rizom-bridge {} (built {} {})", env!("CARGO_PKG_VERSION"), date, time)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_flags() {
        let args = ["-v", "extract", "in.scn", "-q", "out.dat"];
        let (verbosity, rest) = split_verbosity_flags(&args);
        assert_eq!(verbosity, Verbosity::Quiet);
        assert_eq!(rest, vec!["extract", "in.scn", "out.dat"]);
    }

    #[test]
    fn test_default_verbosity() {
        let args: [&str; 0] = [];
        let (verbosity, rest) = split_verbosity_flags(&args);
        assert_eq!(verbosity, Verbosity::Info);
        assert!(rest.is_empty());
        assert_eq!(Verbosity::Trace.directive(), "trace");
    }

    #[test]
    fn test_version_string() {
        assert!(version_string().starts_with("rizom-bridge "));
    }
}
