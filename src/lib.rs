//! Facade crate for the traffic map tools.
//!
//! This crate re-exports the point-cloud engine and chart models, and exposes
//! the CSV ingestion layer behind the `ingest` feature.

#![forbid(unsafe_code)]

pub use trafficmap_core::{
    Allocation, BandwidthError, BandwidthPeak, BandwidthSeries, CityAllocation, CityTrafficRecord,
    CountrySpeed, InvalidConfigurationError, InvalidRecordError, PeakPlacement, PointCloud,
    PointCloudConfig, PointCloudDensityEngine, PointCloudError, PointCloudSummary, RegionSeries,
    SamplePoint, SpeedScale, SpeedSummary, Tier, TierCounts, TierRatios, TierSigmas,
};

#[cfg(feature = "ingest")]
pub use trafficmap_data::{
    CityTraffic, IngestError, IngestReport, load_bandwidth, load_city_traffic, load_speeds,
    write_points,
};
