//! # ipftools-sample
//!
//! Samples a grid at every point of an IPF dataset and, given an
//! observation column, derives residuals (`modeled - measured`).
//!
//! ## Quick Start
//!
//! ```
//! use ipftools_grid::Grid;
//! use ipftools_points::{Point, PointDataset};
//! use ipftools_sample::{SampleConfig, sample};
//!
//! let grid = Grid::from_rows(&[vec![1.0, 2.0]], 0.0, 0.0, 1.0, -9999.0).unwrap();
//! let mut points = PointDataset::new(vec!["X".into(), "Y".into(), "H".into()]).unwrap();
//! points.push(Point::new(1.5, 0.5, vec!["1.5".into(), "0.5".into(), "1.5".into()])).unwrap();
//!
//! let config = SampleConfig::new().with_observation_column(Some(2));
//! let result = sample(&points, &grid, &config).unwrap();
//! assert_eq!(result.dataset.points()[0].value(3), Some("2.000"));
//! assert_eq!(result.dataset.points()[0].value(4), Some("0.500"));
//! assert_eq!(result.pairs, vec![(1.5, 2.0)]);
//! ```

mod config;
mod engine;
mod error;
mod output;

pub use config::SampleConfig;
pub use engine::sample;
pub use error::SampleError;
pub use output::{SampleResult, SampleSummary, to_json};
