//! # ipftools-grid
//!
//! Regular raster grids with a lower-left origin, read from binary IDF or
//! text ASC files, and sampled at arbitrary map coordinates.
//!
//! ## Quick Start
//!
//! ```
//! use ipftools_grid::Grid;
//!
//! let grid = Grid::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]], 0.0, 0.0, 1.0, -9999.0).unwrap();
//! assert_eq!(grid.value(0.0, 0.0), 3.0);           // lower-left cell
//! assert_eq!(grid.value(5.0, 0.0), -9999.0);       // outside -> NoData
//! assert_eq!(grid.interpolated_value(1.0, 1.0), 2.5);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `grid` | `Grid`, `Extent`, NoData tolerance |
//! | `sampler` | nearest-cell and bilinear lookups |
//! | `idf` | binary IDF reader/writer |
//! | `asc` | ASCII grid reader/writer |
//! | `reader` | extension-based format dispatch |
//! | `error` | error types |

mod asc;
mod error;
mod grid;
mod idf;
mod reader;
mod sampler;

pub use asc::{format_asc, parse_asc, read_asc, write_asc};
pub use error::GridError;
pub use grid::{ACCEPTED_ERROR, Extent, Grid, is_no_data};
pub use idf::{encode_idf, parse_idf, read_idf, write_idf};
pub use reader::{GridFormat, read_grid};
