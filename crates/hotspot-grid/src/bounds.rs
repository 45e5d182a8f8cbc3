//! Bounds aggregation: reduces a cluster of cells to its world-space rectangle.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::grid::{Cell, WorldPoint};

/// Axis-aligned world-space box covering every cell of one cluster.
///
/// The minimum corner is the near corner of the lowest cell; the maximum
/// corner is the far edge of the highest cell, so the box always spans whole
/// cells. `min_x <= max_x` and `min_y <= max_y` hold for every value built
/// by [`ClusterBounds::from_cells`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterBounds {
    /// Minimum world x.
    pub min_x: f64,
    /// Minimum world y.
    pub min_y: f64,
    /// Maximum world x.
    pub max_x: f64,
    /// Maximum world y.
    pub max_y: f64,
    /// Sum of the point counts of all member cells.
    pub total_count: usize,
    /// Number of member cells.
    pub cell_count: usize,
}

impl ClusterBounds {
    /// Reduces a cluster to its bounding box and total point count.
    ///
    /// # Arguments
    /// * `cells` - The member cells of one cluster
    /// * `cell_size` - Side length of a cell in world units
    ///
    /// # Returns
    /// * `Option<Self>` - The bounds, or None if `cells` is empty
    pub fn from_cells<L>(cells: &[&Cell<'_, L>], cell_size: f64) -> Option<Self> {
        let (first, rest) = cells.split_first()?;
        let start = first.coord();
        let (mut lo_x, mut lo_y, mut hi_x, mut hi_y) = (start.x, start.y, start.x, start.y);
        let mut total_count = first.count();

        for cell in rest {
            let c = cell.coord();
            lo_x = lo_x.min(c.x);
            lo_y = lo_y.min(c.y);
            hi_x = hi_x.max(c.x);
            hi_y = hi_y.max(c.y);
            total_count += cell.count();
        }

        Some(Self {
            min_x: lo_x as f64 * cell_size,
            min_y: lo_y as f64 * cell_size,
            max_x: (hi_x as f64 + 1.0) * cell_size,
            max_y: (hi_y as f64 + 1.0) * cell_size,
            total_count,
            cell_count: cells.len(),
        })
    }

    /// Width of the box in world units.
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    /// Height of the box in world units.
    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Center of the box.
    pub fn center(&self) -> WorldPoint {
        WorldPoint::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    /// Returns true if `p` lies inside the box. The minimum edges are
    /// inclusive and the maximum edges exclusive, matching cell bucketing.
    pub fn contains(&self, p: WorldPoint) -> bool {
        p.x >= self.min_x && p.x < self.max_x && p.y >= self.min_y && p.y < self.max_y
    }
}

impl fmt::Display for ClusterBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.1}, {:.1})-({:.1}, {:.1}) count={} cells={}",
            self.min_x, self.min_y, self.max_x, self.max_y, self.total_count, self.cell_count
        )
    }
}
