//! Sparse uniform grid over world coordinates.
//!
//! This module provides the point and cell coordinate types and the
//! [`CellGrid`] that buckets a point snapshot into square cells.

pub mod cell_grid;
pub mod point_types;

pub use cell_grid::{Cell, CellGrid, validate_cell_size};
pub use point_types::{CellCoord, Locate, Point, WorldPoint};
