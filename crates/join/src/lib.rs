//! # ipftools-join
//!
//! Joins time series on their timestamps with a sorted merge, optionally
//! interpolating the second series into gaps, and joins point datasets on a
//! key column.
//!
//! ## Quick Start
//!
//! ```
//! use chrono::NaiveDate;
//! use ipftools_join::{JoinConfig, JoinType, join_timeseries};
//! use ipftools_points::{TimeSeries, ValueColumn};
//!
//! let t = |d| NaiveDate::from_ymd_opt(2020, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap();
//! let heads = TimeSeries::new(vec![t(2)], vec![ValueColumn::new("head", -999.0, vec![1.0])]).unwrap();
//! let flux = TimeSeries::new(
//!     vec![t(1), t(3)],
//!     vec![ValueColumn::new("flux", -999.0, vec![10.0, 30.0])],
//! )
//! .unwrap();
//!
//! let config = JoinConfig::new()
//!     .with_join_type(JoinType::LeftOuter)
//!     .with_interpolate_ts2(true);
//! let joined = join_timeseries(&heads, &flux, &config).unwrap();
//! assert_eq!(joined.row(0), Some(vec![1.0, 20.0]));
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | `JoinType`, `JoinConfig`, `PointJoinConfig` |
//! | `timeseries` | sorted-merge time-series join |
//! | `points` | key-column point dataset join |
//! | `error` | error types |

mod config;
mod error;
mod points;
mod timeseries;

pub use config::{JoinConfig, JoinType, PointJoinConfig};
pub use error::JoinError;
pub use points::{PointJoinResult, join_points};
pub use timeseries::{TimeSeriesJoin, join_timeseries, join_timeseries_with_warnings};
