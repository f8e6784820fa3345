//! Speed command: colour scale and statistics for a per-country speed table.

use camino::{Utf8Path, Utf8PathBuf};
use clap::Parser;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use trafficmap_core::{SpeedScale, SpeedSummary};
use trafficmap_data::load_speeds;

use crate::{ARG_SPEED_TABLE, CliError, ENV_SPEED_TABLE, require_existing, write_report};

/// CLI arguments for the `speed` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "speed",
    about = "Summarise a per-country download speed table"
)]
#[ortho_config(prefix = "TRAFFICMAP")]
pub(crate) struct SpeedArgs {
    /// Path to a CSV with `iso3`, `speed_mbps` and optional `country`
    /// columns.
    #[arg(value_name = "path")]
    #[serde(default)]
    pub(crate) path: Option<Utf8PathBuf>,
}

/// JSON report for the `speed` subcommand.
///
/// `scale` is always present; it falls back to 0 to 100 Mbps when no speed
/// is known, in which case `summary` is omitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct SpeedReport {
    pub(crate) countries: usize,
    pub(crate) scale: SpeedScale,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) summary: Option<SpeedSummary>,
}

pub(crate) fn run_speed_with(args: SpeedArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let merged = args.load_and_merge().map_err(CliError::Configuration)?;
    let path = merged.path.ok_or(CliError::MissingArgument {
        field: ARG_SPEED_TABLE,
        env: ENV_SPEED_TABLE,
    })?;
    require_existing(&path, ARG_SPEED_TABLE)?;
    write_report(writer, &speed_report(&path)?)
}

pub(crate) fn speed_report(path: &Utf8Path) -> Result<SpeedReport, CliError> {
    let countries = load_speeds(path)?;
    let summary = SpeedSummary::from_countries(&countries);
    let scale = summary.as_ref().map_or_else(SpeedScale::default, |s| s.scale);
    Ok(SpeedReport {
        countries: countries.len(),
        scale,
        summary,
    })
}
