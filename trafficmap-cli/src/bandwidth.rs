//! Bandwidth command: locate the peak of a regional bandwidth table.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use trafficmap_core::BandwidthPeak;
use trafficmap_core::bandwidth::DEFAULT_AXIS_TICKS;
use trafficmap_data::load_bandwidth;

use crate::{
    ARG_BANDWIDTH_TABLE, ARG_TICKS, CliError, ENV_BANDWIDTH_TABLE, require_existing, write_report,
};

/// CLI arguments for the `bandwidth` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "bandwidth",
    long_about = "Read a bandwidth table with a `Time (EST)` column and one \
                 Gbps column per region, then report the stacked peak, where \
                 to annotate it, and the x-axis tick positions.",
    about = "Summarise a regional bandwidth table"
)]
#[ortho_config(prefix = "TRAFFICMAP")]
pub(crate) struct BandwidthArgs {
    /// Path to the bandwidth CSV.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) path: Option<Utf8PathBuf>,
    /// Number of x-axis ticks to aim for.
    #[arg(long = ARG_TICKS, value_name = "count")]
    #[serde(default)]
    pub(crate) ticks: Option<usize>,
}

/// One labelled x-axis tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct AxisTick {
    pub(crate) index: usize,
    pub(crate) label: String,
}

/// JSON report for the `bandwidth` subcommand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct BandwidthReport {
    pub(crate) samples: usize,
    pub(crate) regions: Vec<String>,
    pub(crate) peak: BandwidthPeak,
    pub(crate) axis_ticks: Vec<AxisTick>,
}

pub(crate) fn run_bandwidth_with(
    args: BandwidthArgs,
    writer: &mut dyn Write,
) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let path = merged.path.ok_or(CliError::MissingArgument {
        field: ARG_BANDWIDTH_TABLE,
        env: ENV_BANDWIDTH_TABLE,
    })?;
    require_existing(&path, ARG_BANDWIDTH_TABLE)?;
    let report = bandwidth_report(&path, merged.ticks.unwrap_or(DEFAULT_AXIS_TICKS))?;
    write_report(writer, &report)
}

pub(crate) fn bandwidth_report(
    path: &Utf8Path,
    ticks: usize,
) -> Result<BandwidthReport, CliError> {
    let series = load_bandwidth(path)?;
    let axis_ticks = series
        .axis_ticks(ticks)
        .into_iter()
        .map(|index| AxisTick {
            index,
            label: series.timestamps().get(index).cloned().unwrap_or_default(),
        })
        .collect();
    Ok(BandwidthReport {
        samples: series.len(),
        regions: series.regions().iter().map(|r| r.name.clone()).collect(),
        peak: series.peak(),
        axis_ticks,
    })
}
