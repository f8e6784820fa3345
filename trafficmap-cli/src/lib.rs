//! Command-line interface for the traffic map tools.
#![forbid(unsafe_code)]

use std::io::Write;

use camino::Utf8Path;
use clap::{Parser, Subcommand};
use serde::Serialize;

mod activity;
mod bandwidth;
mod error;
mod speed;

pub use error::CliError;

use activity::ActivityArgs;
use bandwidth::BandwidthArgs;
use speed::SpeedArgs;

pub(crate) const ARG_CITIES: &str = "cities";
pub(crate) const ARG_TRAFFIC: &str = "traffic";
pub(crate) const ARG_OUTPUT: &str = "output";
pub(crate) const ARG_GLOW_OUTPUT: &str = "glow-output";
pub(crate) const ARG_SEED: &str = "seed";
pub(crate) const ARG_POINT_SCALE: &str = "point-scale";
pub(crate) const ARG_MAX_POINTS_PER_CITY: &str = "max-points-per-city";
pub(crate) const ARG_MAX_TOTAL_POINTS: &str = "max-total-points";
pub(crate) const ARG_BANDWIDTH_TABLE: &str = "bandwidth-table";
pub(crate) const ARG_TICKS: &str = "ticks";
pub(crate) const ARG_SPEED_TABLE: &str = "speed-table";
pub(crate) const ENV_CITIES: &str = "TRAFFICMAP_CMDS_ACTIVITY_CITIES";
pub(crate) const ENV_TRAFFIC: &str = "TRAFFICMAP_CMDS_ACTIVITY_TRAFFIC";
pub(crate) const ENV_OUTPUT: &str = "TRAFFICMAP_CMDS_ACTIVITY_OUTPUT";
pub(crate) const ENV_BANDWIDTH_TABLE: &str = "TRAFFICMAP_CMDS_BANDWIDTH_PATH";
pub(crate) const ENV_SPEED_TABLE: &str = "TRAFFICMAP_CMDS_SPEED_PATH";

/// Run the traffic map CLI with the current process arguments and
/// environment, writing the command report to stdout.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    let mut stdout = std::io::stdout().lock();
    match cli.command {
        Command::Activity(args) => activity::run_activity_with(args, &mut stdout),
        Command::Bandwidth(args) => bandwidth::run_bandwidth_with(args, &mut stdout),
        Command::Speed(args) => speed::run_speed_with(args, &mut stdout),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "trafficmap",
    about = "Prepare download traffic, bandwidth and speed data for mapping",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Generate the download activity point cloud.
    Activity(ActivityArgs),
    /// Summarise a regional bandwidth table.
    Bandwidth(BandwidthArgs),
    /// Summarise a per-country speed table.
    Speed(SpeedArgs),
}

/// Fail unless `path` is an existing regular file.
fn require_existing(path: &Utf8Path, field: &'static str) -> Result<(), CliError> {
    match trafficmap_fs::file_is_file(path) {
        Ok(true) => Ok(()),
        Ok(false) => Err(CliError::SourcePathNotFile {
            field,
            path: path.to_path_buf(),
        }),
        Err(source) if source.kind() == std::io::ErrorKind::NotFound => {
            Err(CliError::MissingSourceFile {
                field,
                path: path.to_path_buf(),
            })
        }
        Err(source) => Err(CliError::InspectSourcePath {
            field,
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Write `report` as pretty JSON followed by a newline.
fn write_report<T: Serialize>(writer: &mut dyn Write, report: &T) -> Result<(), CliError> {
    let payload = serde_json::to_string_pretty(report).map_err(CliError::SerializeReport)?;
    writer
        .write_all(payload.as_bytes())
        .map_err(CliError::WriteReport)?;
    writer.write_all(b"\n").map_err(CliError::WriteReport)?;
    Ok(())
}

#[cfg(test)]
mod tests;
