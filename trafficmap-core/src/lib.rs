//! Core numeric model for traffic map visualisations.
//!
//! The centrepiece is [`PointCloudDensityEngine`], which spreads each
//! country's download traffic over its cities by population, compresses the
//! result logarithmically, and samples a three-tier Gaussian point cloud per
//! city. Rendering the cloud is left to callers.
//!
//! Two smaller models back the companion charts: [`BandwidthSeries`] finds
//! the peak of a stacked regional bandwidth series, and [`SpeedScale`]
//! derives percentile colour ranges for per-country download speeds.
//!
//! All sampling is driven by an explicit seed. There is no global random
//! state, so identical inputs always yield identical output.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod allocation;
pub mod bandwidth;
pub mod config;
mod engine;
mod record;
mod sample;
pub mod speed;
mod summary;
mod tier;

pub use allocation::{Allocation, CityAllocation, point_budget};
pub use bandwidth::{BandwidthError, BandwidthPeak, BandwidthSeries, PeakPlacement, RegionSeries};
pub use config::{InvalidConfigurationError, PointCloudConfig, TierRatios, TierSigmas};
pub use engine::{PointCloud, PointCloudDensityEngine, PointCloudError};
pub use record::{CityTrafficRecord, InvalidRecordError};
pub use sample::SamplePoint;
pub use speed::{CountrySpeed, SpeedScale, SpeedSummary};
pub use summary::PointCloudSummary;
pub use tier::{Tier, TierCounts};
