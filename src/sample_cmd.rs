use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug_span, info, info_span, warn};

use ipftools_grid::read_grid;
use ipftools_points::{IpfRead, read_ipf, write_atomic, write_ipf};
use ipftools_sample::{SampleSummary, sample, to_json};
use ipftools_stats::{ResidualStatistics, append_report};

use crate::cli::SampleArgs;
use crate::config;
use crate::convert;
use crate::logging;

/// JSON run summary written with `--summary`.
#[derive(Serialize)]
struct RunSummary {
    points: String,
    grids: Vec<GridRun>,
    warnings: Vec<String>,
}

#[derive(Serialize)]
struct GridRun {
    grid: String,
    output: String,
    summary: SampleSummary,
    statistics: Option<ResidualStatistics>,
}

pub fn run(args: SampleArgs) -> Result<()> {
    let _cmd = info_span!("sample").entered();

    // 1. Load config, CLI overrides the [sample] section
    let mut config = config::load(args.config.as_deref())?;
    let section = &mut config.sample;
    section.interpolate |= args.interpolate;
    section.skip_outside_extent |= args.skip_outside;
    section.skip_no_data |= args.skip_nodata;
    if let Some(obs) = args.observation {
        section.observation = Some(obs);
    }
    if let Some(nd) = args.nodata {
        section.no_data = Some(nd);
    }
    if let Some(decimals) = args.decimals {
        section.decimals = decimals;
    }
    if let Some(p) = args.pvalues.as_deref() {
        section.p_values = convert::parse_pvalues(p)?;
    }
    if args.report.is_some() {
        section.report = args.report;
    }

    // 2. Read points
    info!(path = %args.points.display(), "reading points");
    let IpfRead {
        dataset: points,
        mut warnings,
    } = read_ipf(&args.points)
        .with_context(|| format!("failed to read points: {}", args.points.display()))?;

    // 3. Resolve observation column and build the sample config
    let observation_column = section
        .observation
        .as_deref()
        .map(|column| {
            points
                .resolve_column(column)
                .with_context(|| format!("invalid observation column {column:?}"))
        })
        .transpose()?;
    let sample_config = convert::build_sample_config(section, observation_column)?;
    if section.report.is_some() && observation_column.is_none() {
        warn!("no observation column configured, report is not written");
    }

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory: {}",
            args.output_dir.display()
        )
    })?;
    let points_stem = file_stem(&args.points);

    // 4. Sample each grid in turn
    let mut runs = Vec::with_capacity(args.grid.len());
    for grid_path in &args.grid {
        let _grid_span = debug_span!("grid", path = %grid_path.display()).entered();
        let grid_name = grid_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| grid_path.display().to_string());

        let result = {
            let grid = read_grid(grid_path)
                .with_context(|| format!("failed to read grid: {}", grid_path.display()))?;
            sample(&points, &grid, &sample_config)
                .with_context(|| format!("sampling failed for {grid_name}"))?
        };

        let output = args
            .output_dir
            .join(format!("{points_stem}_{}.ipf", file_stem(grid_path)));
        write_ipf(&output, &result.dataset)
            .with_context(|| format!("failed to write {}", output.display()))?;
        info!(
            path = %output.display(),
            n_points = result.dataset.len(),
            "sampled points written"
        );

        let statistics = match observation_column {
            Some(_) => {
                let stats = ResidualStatistics::from_pairs(&result.pairs, &section.p_values)
                    .context("failed to compute residual statistics")?;
                if let Some(report) = &section.report {
                    append_report(report, &grid_name, &stats).with_context(|| {
                        format!("failed to append report: {}", report.display())
                    })?;
                }
                Some(stats)
            }
            None => None,
        };

        warnings.extend(result.warnings.iter().map(|w| format!("{grid_name}: {w}")));
        runs.push(GridRun {
            grid: grid_path.display().to_string(),
            output: output.display().to_string(),
            summary: result.summary,
            statistics,
        });
    }

    // 5. Optional JSON summary
    logging::print_warnings(&warnings);
    if let Some(path) = &args.summary {
        let summary = RunSummary {
            points: args.points.display().to_string(),
            grids: runs,
            warnings,
        };
        let json = to_json(&summary)?;
        write_atomic(path, json.as_bytes())
            .with_context(|| format!("failed to write summary: {}", path.display()))?;
        info!(path = %path.display(), "summary written");
    }

    Ok(())
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
