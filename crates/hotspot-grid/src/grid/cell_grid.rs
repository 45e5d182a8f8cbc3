//! Grid builder: buckets located points into square cells.

#![warn(missing_docs)]

use std::collections::BTreeMap;

use tracing::debug;

use super::{CellCoord, Locate, WorldPoint};
use crate::error::ClusterError;

/// Largest occupied extent, in cells, that `Display` will draw as a map.
const MAX_DISPLAY_CELLS: i64 = 80 * 80;

/// Checks that a cell size can be used as a grid resolution.
///
/// # Returns
/// * `Result<f64, ClusterError>` - The cell size, or an error if it is not a positive finite number
pub fn validate_cell_size(cell_size: f64) -> Result<f64, ClusterError> {
    if !cell_size.is_finite() {
        return Err(ClusterError::InvalidCellSize("Cell size must be finite"));
    }
    if cell_size <= 0.0 {
        return Err(ClusterError::InvalidCellSize("Cell size must be positive"));
    }
    Ok(cell_size)
}

/// One occupied grid cell and the points that fell into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell<'a, L> {
    coord: CellCoord,
    points: Vec<&'a L>,
}

impl<'a, L> Cell<'a, L> {
    fn new(coord: CellCoord) -> Self {
        Self { coord, points: Vec::new() }
    }

    /// Grid coordinates of this cell.
    pub fn coord(&self) -> CellCoord {
        self.coord
    }

    /// Number of points assigned to this cell. Never zero.
    pub fn count(&self) -> usize {
        self.points.len()
    }

    /// Points assigned to this cell, in insertion order.
    pub fn points(&self) -> &[&'a L] {
        &self.points
    }
}

/// A sparse uniform grid built from one point snapshot.
///
/// Only cells that received at least one point exist. The grid borrows the
/// snapshot it was built from and is meant to be dropped at the end of the
/// run that built it.
#[derive(Debug, Clone)]
pub struct CellGrid<'a, L> {
    /// Side length of a cell in world units
    cell_size: f64,
    /// Occupied cells keyed by coordinate
    cells: BTreeMap<CellCoord, Cell<'a, L>>,
    /// Number of input points without a usable position
    dropped: usize,
}

impl<'a, L: Locate> CellGrid<'a, L> {
    /// Buckets a point snapshot into square cells of side `cell_size`.
    ///
    /// Points without a usable position are skipped and counted in
    /// [`CellGrid::dropped`].
    ///
    /// # Arguments
    /// * `points` - The snapshot to bucket
    /// * `cell_size` - Side length of a cell in world units
    ///
    /// # Returns
    /// * `Result<Self, ClusterError>` - The built grid or an error if `cell_size` is invalid
    pub fn build(points: &'a [L], cell_size: f64) -> Result<Self, ClusterError> {
        validate_cell_size(cell_size).map(|cell_size| Self::bucket(points, cell_size))
    }

    /// Builds the grid with a cell size that has already been validated.
    pub(crate) fn bucket(points: &'a [L], cell_size: f64) -> Self {
        let mut cells: BTreeMap<CellCoord, Cell<'a, L>> = BTreeMap::new();
        let mut dropped = 0;

        for point in points {
            let Some(coord) = point.locate().and_then(|p| to_cell(p, cell_size)) else {
                dropped += 1;
                continue;
            };
            cells.entry(coord).or_insert_with(|| Cell::new(coord)).points.push(point);
        }

        debug!(
            points = points.len(),
            dropped,
            cells = cells.len(),
            cell_size,
            "Built cell grid"
        );

        Self { cell_size, cells, dropped }
    }
}

impl<'a, L> CellGrid<'a, L> {
    /// Side length of a cell in world units.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Converts a world position to the coordinates of the cell containing it.
    /// Returns None if the position is not finite.
    pub fn world_to_cell(&self, p: WorldPoint) -> Option<CellCoord> {
        to_cell(p, self.cell_size)
    }

    /// World position of the cell's near corner (minimum x and y).
    pub fn cell_origin(&self, c: CellCoord) -> WorldPoint {
        WorldPoint::new(c.x as f64 * self.cell_size, c.y as f64 * self.cell_size)
    }

    /// World position of the cell's center.
    pub fn cell_center(&self, c: CellCoord) -> WorldPoint {
        WorldPoint::new(
            (c.x as f64 + 0.5) * self.cell_size,
            (c.y as f64 + 0.5) * self.cell_size,
        )
    }

    /// Gets the occupied cell at `c`, if any.
    pub fn get(&self, c: CellCoord) -> Option<&Cell<'a, L>> {
        self.cells.get(&c)
    }

    /// Iterates occupied cells in coordinate order.
    pub fn iter(&self) -> impl Iterator<Item = &Cell<'a, L>> {
        self.cells.values()
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if no point landed in the grid.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Number of points that were assigned to a cell.
    pub fn total_points(&self) -> usize {
        self.cells.values().map(Cell::count).sum()
    }

    /// Number of points skipped for lacking a usable position.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Minimum and maximum occupied cell coordinates, or None for an empty grid.
    pub fn extent(&self) -> Option<(CellCoord, CellCoord)> {
        let mut coords = self.cells.keys();
        let first = *coords.next()?;
        Some(coords.fold((first, first), |(lo, hi), c| {
            (
                CellCoord::new(lo.x.min(c.x), lo.y.min(c.y)),
                CellCoord::new(hi.x.max(c.x), hi.y.max(c.y)),
            )
        }))
    }
}

fn to_cell(p: WorldPoint, cell_size: f64) -> Option<CellCoord> {
    if !p.is_finite() {
        return None;
    }
    let cx = (p.x / cell_size).floor();
    let cy = (p.y / cell_size).floor();
    // Tiny cell sizes or huge positions can push the index out of range;
    // saturating would fold distant points into one cell.
    if !in_cell_range(cx) || !in_cell_range(cy) {
        return None;
    }
    Some(CellCoord::new(cx as i64, cy as i64))
}

fn in_cell_range(c: f64) -> bool {
    // i64::MAX rounds up to 2^63 as f64, which is itself out of range.
    c >= i64::MIN as f64 && c < i64::MAX as f64
}

impl<L> std::fmt::Display for CellGrid<'_, L> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "CellGrid ({} cells, {} points, {} dropped, cell size: {:.3})",
            self.len(),
            self.total_points(),
            self.dropped,
            self.cell_size
        )?;

        let Some((lo, hi)) = self.extent() else {
            return Ok(());
        };
        writeln!(f, "Extent: {} .. {}", lo, hi)?;

        let span_x = hi.x.saturating_sub(lo.x).saturating_add(1);
        let span_y = hi.y.saturating_sub(lo.y).saturating_add(1);
        if span_x.saturating_mul(span_y) > MAX_DISPLAY_CELLS {
            return Ok(());
        }

        for y in lo.y..=hi.y {
            for x in lo.x..=hi.x {
                match self.get(CellCoord::new(x, y)) {
                    Some(cell) => write!(f, "{:4} ", cell.count())?,
                    None => write!(f, "{:>4} ", ".")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
