//! # ipftools-points
//!
//! Point datasets stored as IPF files, each point optionally carrying a
//! time series read from a companion text file.
//!
//! ## Quick Start
//!
//! ```
//! use std::path::Path;
//! use ipftools_points::parse_ipf;
//!
//! let text = "1\n3\nX\nY\nHEAD\n0,txt\n10.0,20.0,1.5\n";
//! let ds = parse_ipf(text, Path::new("heads.ipf")).unwrap();
//! assert_eq!(ds.points()[0].x, 10.0);
//! assert_eq!(ds.resolve_column("head").unwrap(), 2);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `dataset` | `Point`, `PointDataset`, column lookup |
//! | `timeseries` | `TimeSeries`, `ValueColumn` |
//! | `ipf` | IPF reader/writer, atomic file writes |
//! | `txt` | companion time-series reader/writer, timestamps |
//! | `number` | locale-tolerant number parsing |
//! | `record` | record splitting and quoting |
//! | `error` | error types |

mod dataset;
mod error;
mod ipf;
mod number;
mod record;
mod timeseries;
mod txt;

pub use dataset::{Point, PointDataset, unique_name};
pub use error::PointsError;
pub use ipf::{IpfRead, format_ipf, parse_ipf, read_ipf, write_atomic, write_ipf};
pub use number::{format_number, parse_number};
pub use timeseries::{TimeSeries, ValueColumn};
pub use txt::{format_timeseries, format_timestamp, parse_timeseries, parse_timestamp, read_timeseries};
