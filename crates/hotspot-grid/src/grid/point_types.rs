//! Point and coordinate types shared by the grid.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Represents a point in world coordinates.
///
/// World coordinates are whatever space the caller samples positions in;
/// clusters are reported back in the same space.
#[derive(Debug, Default, Clone, Copy, PartialEq, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct WorldPoint {
    /// The x-coordinate.
    pub x: f64,
    /// The y-coordinate.
    pub y: f64,
}

impl WorldPoint {
    /// Creates a new `WorldPoint`.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns true if both coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl fmt::Display for WorldPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// Integer coordinates of a grid cell.
///
/// Unlike a bounded costmap index the grid is unbounded, so both axes are
/// signed and points left of or below the world origin get negative cells.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CellCoord {
    /// Column index.
    pub x: i64,
    /// Row index.
    pub y: i64,
}

impl CellCoord {
    /// Creates a new `CellCoord`.
    #[must_use]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// The eight surrounding coordinates, excluding `self`.
    /// Saturates at the edges of the `i64` range instead of overflowing.
    pub fn neighbors(&self) -> [CellCoord; 8] {
        let CellCoord { x, y } = *self;
        let (xl, xr) = (x.saturating_sub(1), x.saturating_add(1));
        let (yl, yr) = (y.saturating_sub(1), y.saturating_add(1));
        [
            CellCoord::new(xl, yl),
            CellCoord::new(x, yl),
            CellCoord::new(xr, yl),
            CellCoord::new(xl, y),
            CellCoord::new(xr, y),
            CellCoord::new(xl, yr),
            CellCoord::new(x, yr),
            CellCoord::new(xr, yr),
        ]
    }

    /// Chebyshev distance between two cells. Adjacent cells are at distance 1.
    pub fn chebyshev(&self, other: &CellCoord) -> u64 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.x, self.y)
    }
}

/// Anything that can report a position for clustering.
///
/// Returning `None` marks the entity as having no usable position; it is
/// skipped by the grid builder and counted as dropped.
pub trait Locate {
    /// The entity's position in world coordinates, if it has one.
    fn locate(&self) -> Option<WorldPoint>;
}

impl Locate for WorldPoint {
    fn locate(&self) -> Option<WorldPoint> {
        Some(*self)
    }
}

impl<L: Locate> Locate for &L {
    fn locate(&self) -> Option<WorldPoint> {
        (*self).locate()
    }
}

/// An entity position with an opaque payload.
///
/// Coordinates are optional because host registries routinely hold entities
/// whose position has not been populated yet. The payload is carried through
/// the grid untouched.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point<P = ()> {
    /// The x-coordinate, if known.
    pub x: Option<f64>,
    /// The y-coordinate, if known.
    pub y: Option<f64>,
    /// Caller data, ignored by the engine.
    pub payload: P,
}

impl<P> Point<P> {
    /// Creates a point with both coordinates present.
    pub const fn new(x: f64, y: f64, payload: P) -> Self {
        Self { x: Some(x), y: Some(y), payload }
    }

    /// Creates a point whose coordinates may be missing.
    pub const fn partial(x: Option<f64>, y: Option<f64>, payload: P) -> Self {
        Self { x, y, payload }
    }
}

impl Point<()> {
    /// Creates a payload-free point.
    pub const fn at(x: f64, y: f64) -> Self {
        Self::new(x, y, ())
    }
}

impl<P> Locate for Point<P> {
    // Presence check, not truthiness: 0.0 is a legitimate coordinate.
    fn locate(&self) -> Option<WorldPoint> {
        let p = WorldPoint::new(self.x?, self.y?);
        p.is_finite().then_some(p)
    }
}
