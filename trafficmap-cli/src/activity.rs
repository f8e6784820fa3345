//! Activity command: ingest, generate and export the point cloud.

use camino::Utf8PathBuf;
use clap::Parser;
use log::info;
use ortho_config::{OrthoConfig, SubcmdConfigMerge};
use serde::{Deserialize, Serialize};
use std::io::Write;
use trafficmap_core::{PointCloudConfig, PointCloudDensityEngine, PointCloudSummary};
use trafficmap_data::{IngestReport, load_city_traffic, write_points};

use crate::{
    ARG_CITIES, ARG_GLOW_OUTPUT, ARG_MAX_POINTS_PER_CITY, ARG_MAX_TOTAL_POINTS, ARG_OUTPUT,
    ARG_POINT_SCALE, ARG_SEED, ARG_TRAFFIC, CliError, ENV_CITIES, ENV_OUTPUT, ENV_TRAFFIC,
    require_existing, write_report,
};

/// CLI arguments for the `activity` subcommand.
#[derive(Debug, Clone, Parser, Deserialize, Serialize, OrthoConfig, Default)]
#[command(
    name = "activity",
    long_about = "Spread each country's download traffic over its cities by \
                 population and sample a three-tier point cloud. Points are \
                 written as CSV and a summary is printed as JSON.",
    about = "Generate the download activity point cloud"
)]
#[ortho_config(prefix = "TRAFFICMAP")]
pub(crate) struct ActivityArgs {
    /// City table with `iso3`, `lat`, `lng` and `population` columns.
    #[arg(long = ARG_CITIES, value_name = "path")]
    #[serde(default)]
    pub(crate) cities: Option<Utf8PathBuf>,
    /// Traffic table with `iso3`, `country`, `value` and `unit` columns.
    #[arg(long = ARG_TRAFFIC, value_name = "path")]
    #[serde(default)]
    pub(crate) traffic: Option<Utf8PathBuf>,
    /// Destination for the point CSV.
    #[arg(long = ARG_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) output: Option<Utf8PathBuf>,
    /// Optional destination for the glow-layer subset.
    #[arg(long = ARG_GLOW_OUTPUT, value_name = "path")]
    #[serde(default)]
    pub(crate) glow_output: Option<Utf8PathBuf>,
    /// Seed for jitter and down-sampling.
    #[arg(long = ARG_SEED, value_name = "seed")]
    #[serde(default)]
    pub(crate) seed: Option<u64>,
    /// Points granted to the busiest city.
    #[arg(long = ARG_POINT_SCALE, value_name = "points")]
    #[serde(default)]
    pub(crate) point_scale: Option<f64>,
    /// Upper bound on any one city's points.
    #[arg(long = ARG_MAX_POINTS_PER_CITY, value_name = "points")]
    #[serde(default)]
    pub(crate) max_points_per_city: Option<u32>,
    /// Upper bound on the whole cloud.
    #[arg(long = ARG_MAX_TOTAL_POINTS, value_name = "points")]
    #[serde(default)]
    pub(crate) max_total_points: Option<usize>,
}

impl ActivityArgs {
    pub(crate) fn into_config(self) -> Result<ActivityConfig, CliError> {
        let merged = self.load_and_merge().map_err(CliError::Configuration)?;
        ActivityConfig::try_from(merged)
    }
}

/// Resolved `activity` command configuration.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ActivityConfig {
    pub(crate) cities: Utf8PathBuf,
    pub(crate) traffic: Utf8PathBuf,
    pub(crate) output: Utf8PathBuf,
    pub(crate) glow_output: Option<Utf8PathBuf>,
    pub(crate) engine: PointCloudConfig,
}

impl ActivityConfig {
    pub(crate) fn validate_sources(&self) -> Result<(), CliError> {
        require_existing(&self.cities, ARG_CITIES)?;
        require_existing(&self.traffic, ARG_TRAFFIC)?;
        Ok(())
    }
}

impl TryFrom<ActivityArgs> for ActivityConfig {
    type Error = CliError;

    fn try_from(args: ActivityArgs) -> Result<Self, Self::Error> {
        let cities = args.cities.ok_or(CliError::MissingArgument {
            field: ARG_CITIES,
            env: ENV_CITIES,
        })?;
        let traffic = args.traffic.ok_or(CliError::MissingArgument {
            field: ARG_TRAFFIC,
            env: ENV_TRAFFIC,
        })?;
        let output = args.output.ok_or(CliError::MissingArgument {
            field: ARG_OUTPUT,
            env: ENV_OUTPUT,
        })?;

        let defaults = PointCloudConfig::default();
        let engine = PointCloudConfig {
            point_scale: args.point_scale.unwrap_or(defaults.point_scale),
            max_points_per_city: args
                .max_points_per_city
                .unwrap_or(defaults.max_points_per_city),
            max_total_points: args.max_total_points.unwrap_or(defaults.max_total_points),
            random_seed: args.seed.unwrap_or(defaults.random_seed),
            ..defaults
        };
        engine.validate()?;

        Ok(Self {
            cities,
            traffic,
            output,
            glow_output: args.glow_output,
            engine,
        })
    }
}

/// JSON report printed after a successful run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub(crate) struct ActivityReport {
    pub(crate) ingest: IngestReport,
    pub(crate) summary: PointCloudSummary,
    pub(crate) output: Utf8PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) glow_output: Option<Utf8PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) glow_points: Option<usize>,
}

pub(crate) fn run_activity_with(args: ActivityArgs, writer: &mut dyn Write) -> Result<(), CliError> {
    let config = resolve_activity_config(args)?;
    let report = execute_activity(&config)?;
    write_report(writer, &report)
}

fn resolve_activity_config(args: ActivityArgs) -> Result<ActivityConfig, CliError> {
    let config = args.into_config()?;
    config.validate_sources()?;
    Ok(config)
}

pub(crate) fn execute_activity(config: &ActivityConfig) -> Result<ActivityReport, CliError> {
    let data = load_city_traffic(&config.cities, &config.traffic)?;
    let engine = PointCloudDensityEngine::new(config.engine.clone())?;
    let cloud = engine.generate(&data.records)?;

    write_points(&config.output, cloud.points())?;
    info!("wrote {} points to {}", cloud.points().len(), config.output);

    let glow_points = match &config.glow_output {
        Some(path) => {
            let glow = cloud.glow_subset(engine.config());
            write_points(path, &glow)?;
            info!("wrote {} glow points to {path}", glow.len());
            Some(glow.len())
        }
        None => None,
    };

    Ok(ActivityReport {
        ingest: data.report,
        summary: cloud.summary(engine.config()),
        output: config.output.clone(),
        glow_output: config.glow_output.clone(),
        glow_points,
    })
}

#[cfg(test)]
pub(crate) fn config_from_layers_for_test(
    layers: Vec<ortho_config::MergeLayer<'static>>,
) -> Result<ActivityConfig, CliError> {
    let merged = ActivityArgs::merge_from_layers(layers).map_err(CliError::from)?;
    ActivityConfig::try_from(merged)
}
