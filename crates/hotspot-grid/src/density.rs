//! Density filter over an occupied grid.

use crate::grid::{Cell, CellGrid};

/// Selects the cells holding at least `threshold` points.
///
/// A cell whose count equals the threshold qualifies. With a threshold of
/// zero every occupied cell qualifies. Cells come back in grid order.
pub fn dense_cells<'g, 'a, L>(grid: &'g CellGrid<'a, L>, threshold: usize) -> Vec<&'g Cell<'a, L>> {
    grid.iter().filter(|cell| cell.count() >= threshold).collect()
}
