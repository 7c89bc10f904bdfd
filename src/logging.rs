use tracing_subscriber::EnvFilter;

/// All workspace crate targets that should receive log output.
const CRATE_TARGETS: &[&str] = &[
    "ipftools",
    "ipftools_grid",
    "ipftools_join",
    "ipftools_points",
    "ipftools_sample",
    "ipftools_stats",
];

/// Warnings listed individually before the rest is summarised.
const MAX_LISTED_WARNINGS: usize = 20;

/// Initialize tracing based on CLI verbosity level.
///
/// Mapping:
/// - 0 (none) -> warn
/// - 1 (-v)   -> info
/// - 2 (-vv)  -> debug
/// - 3+ (-vvv)-> trace
///
/// `RUST_LOG` env var overrides the CLI flag if set.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let default_filter: String = CRATE_TARGETS
        .iter()
        .map(|t| format!("{t}={level}"))
        .collect::<Vec<_>>()
        .join(",");

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// Print the warnings collected during a run to stderr.
pub fn print_warnings(warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("{} warning(s):", warnings.len());
    for w in warnings.iter().take(MAX_LISTED_WARNINGS) {
        eprintln!("  - {w}");
    }
    if warnings.len() > MAX_LISTED_WARNINGS {
        eprintln!("  ... and {} more", warnings.len() - MAX_LISTED_WARNINGS);
    }
}
