use anyhow::{Context, Result};
use tracing::{info, info_span};

use ipftools_join::{PointJoinConfig, join_points};
use ipftools_points::{read_ipf, write_ipf};

use crate::cli::JoinArgs;
use crate::config;
use crate::convert;
use crate::logging;

pub fn run(args: JoinArgs) -> Result<()> {
    let _cmd = info_span!("join").entered();

    // 1. Load config, CLI overrides the [join] section
    let mut config = config::load(args.config.as_deref())?;
    let section = &mut config.join;
    if let Some(join_type) = args.join_type {
        section.join_type = join_type;
    }
    if args.period_start.is_some() {
        section.period_start = args.period_start;
    }
    if args.period_end.is_some() {
        section.period_end = args.period_end;
    }
    if args.max_distance.is_some() {
        section.max_interpolation_distance_days = args.max_distance;
    }
    section.interpolate_ts2 |= args.interpolate;
    let ts_config = convert::build_join_config(section)?;

    // 2. Read both point files
    let left = read_ipf(&args.left)
        .with_context(|| format!("failed to read left points: {}", args.left.display()))?;
    let right = read_ipf(&args.right)
        .with_context(|| format!("failed to read right points: {}", args.right.display()))?;
    let mut warnings = left.warnings;
    warnings.extend(right.warnings);

    // 3. Resolve key columns
    let key_left = left
        .dataset
        .resolve_column(&args.key)
        .with_context(|| format!("invalid key column {:?} in left file", args.key))?;
    let right_key = args.right_key.as_deref().unwrap_or(&args.key);
    let key_right = right
        .dataset
        .resolve_column(right_key)
        .with_context(|| format!("invalid key column {right_key:?} in right file"))?;

    let join_config = PointJoinConfig::new(key_left, key_right)
        .with_join_type(ts_config.join_type())
        .with_timeseries(ts_config);

    // 4. Join and write
    let result =
        join_points(&left.dataset, &right.dataset, &join_config).context("point join failed")?;
    if let Some(parent) = args.output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| {
            format!("failed to create output directory: {}", parent.display())
        })?;
    }
    write_ipf(&args.output, &result.dataset)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(
        path = %args.output.display(),
        n_points = result.dataset.len(),
        n_matched = result.n_matched,
        "joined points written"
    );

    warnings.extend(result.warnings);
    logging::print_warnings(&warnings);
    Ok(())
}
