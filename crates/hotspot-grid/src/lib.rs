#![warn(missing_docs)]
#![doc = "Grid-based density clustering for 2D point snapshots."]
#![doc = ""]
#![doc = "Points are bucketed into a sparse uniform grid, cells meeting a density"]
#![doc = "threshold are kept, adjacent dense cells (8-connectivity) are merged into"]
#![doc = "clusters, and each cluster is reduced to a bounding box and point count."]
#![doc = "Every run is independent: nothing is cached between calls."]

pub mod bounds;
pub mod density;
pub mod error;
pub mod grid;
pub mod merge;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

pub use bounds::ClusterBounds;
pub use density::dense_cells;
pub use error::ClusterError;
pub use grid::{Cell, CellCoord, CellGrid, Locate, Point, WorldPoint};
pub use merge::merge_adjacent;

/// Grid resolution and density threshold for one clustering run.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterParams {
    cell_size: f64,
    threshold: usize,
}

impl ClusterParams {
    /// Validate and construct clustering parameters.
    ///
    /// # Arguments
    ///
    /// * `cell_size`: Side length of a grid cell in world units.
    /// * `threshold`: Minimum number of points for a cell to count as dense.
    ///
    /// # Errors
    ///
    /// Returns `Err(ClusterError::InvalidCellSize)` if `cell_size` is not a positive finite number.
    pub fn new(cell_size: f64, threshold: usize) -> Result<Self, ClusterError> {
        let cell_size = grid::validate_cell_size(cell_size)?;
        Ok(Self { cell_size, threshold })
    }

    /// Returns the cell size.
    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    /// Returns the density threshold.
    pub fn threshold(&self) -> usize {
        self.threshold
    }
}

/// Outcome of one clustering run with diagnostic counters.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ClusterReport {
    /// One entry per cluster, in discovery order.
    pub clusters: Vec<ClusterBounds>,
    /// Cells that received at least one point.
    pub occupied_cells: usize,
    /// Cells that met the density threshold.
    pub dense_cells: usize,
    /// Points that were assigned to a cell.
    pub accepted_points: usize,
    /// Points skipped for lacking a usable position.
    pub dropped_points: usize,
}

impl ClusterReport {
    /// Number of clusters found.
    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Returns true if no cluster was found.
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }
}

/// Finds dense clusters in a point snapshot.
///
/// # Arguments
///
/// * `points`: The snapshot. Entries without a usable position are skipped.
/// * `cell_size`: Side length of a grid cell in world units.
/// * `threshold`: Minimum number of points for a cell to count as dense.
///
/// # Errors
///
/// Returns `Err(ClusterError::InvalidCellSize)` if `cell_size` is not a positive finite number.
pub fn cluster<L: Locate>(
    points: &[L],
    cell_size: f64,
    threshold: usize,
) -> Result<Vec<ClusterBounds>, ClusterError> {
    let params = ClusterParams::new(cell_size, threshold)?;
    Ok(cluster_with_report(points, &params).clusters)
}

/// Finds dense clusters in a point snapshot and reports run counters.
pub fn cluster_with_report<L: Locate>(points: &[L], params: &ClusterParams) -> ClusterReport {
    let grid = CellGrid::bucket(points, params.cell_size);
    let dense = dense_cells(&grid, params.threshold);

    let mut clusters = Vec::new();
    for members in merge_adjacent(&dense) {
        match ClusterBounds::from_cells(&members, params.cell_size) {
            Some(bounds) => clusters.push(bounds),
            None => error!("Cluster merger produced an empty cluster, skipping it"),
        }
    }

    let report = ClusterReport {
        clusters,
        occupied_cells: grid.len(),
        dense_cells: dense.len(),
        accepted_points: grid.total_points(),
        dropped_points: grid.dropped(),
    };

    debug!(
        clusters = report.cluster_count(),
        occupied_cells = report.occupied_cells,
        dense_cells = report.dense_cells,
        accepted_points = report.accepted_points,
        dropped_points = report.dropped_points,
        "Clustering run complete"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::BTreeSet;

    fn blob(rng: &mut StdRng, cx: f64, cy: f64, radius: f64, n: usize) -> Vec<Point> {
        (0..n)
            .map(|_| {
                Point::at(
                    cx + rng.random_range(-radius..radius),
                    cy + rng.random_range(-radius..radius),
                )
            })
            .collect()
    }

    /// Clusters as comparable values, independent of output order.
    fn as_set(clusters: &[ClusterBounds]) -> BTreeSet<(i64, i64, i64, i64, usize)> {
        clusters
            .iter()
            .map(|b| {
                (
                    b.min_x as i64,
                    b.min_y as i64,
                    b.max_x as i64,
                    b.max_y as i64,
                    b.total_count,
                )
            })
            .collect()
    }

    #[test]
    fn test_params_validation() {
        assert!(ClusterParams::new(50.0, 100).is_ok());
        assert!(matches!(
            ClusterParams::new(0.0, 100),
            Err(ClusterError::InvalidCellSize(_))
        ));
        assert!(matches!(
            cluster(&[Point::at(1.0, 1.0)], -1.0, 1),
            Err(ClusterError::InvalidCellSize(_))
        ));
    }

    #[test]
    fn test_single_dense_cell_scenario() {
        let mut rng = StdRng::seed_from_u64(7);
        let points: Vec<Point> = (0..150)
            .map(|_| Point::at(rng.random_range(0.0..=10.0), rng.random_range(0.0..=10.0)))
            .collect();

        let clusters = cluster(&points, 50.0, 100).unwrap();
        assert_eq!(clusters.len(), 1);
        let b = clusters[0];
        assert_eq!(b.total_count, 150);
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_two_separated_blobs() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut points = blob(&mut rng, 125.0, 125.0, 20.0, 60);
        points.extend(blob(&mut rng, 625.0, 625.0, 20.0, 60));

        let clusters = cluster(&points, 50.0, 10).unwrap();
        assert_eq!(clusters.len(), 2);
        for b in &clusters {
            let inside = points
                .iter()
                .filter_map(|p| p.locate())
                .filter(|p| b.contains(*p))
                .count();
            assert_eq!(inside, b.total_count);
        }
        assert!(clusters[0].max_x < clusters[1].min_x || clusters[1].max_x < clusters[0].min_x);
    }

    #[test]
    fn test_threshold_not_reached() {
        let mut rng = StdRng::seed_from_u64(3);
        let points = blob(&mut rng, 0.0, 0.0, 200.0, 300);
        assert!(cluster(&points, 50.0, 500).unwrap().is_empty());
    }

    #[test]
    fn test_empty_snapshot() {
        let points: Vec<Point> = Vec::new();
        let report = cluster_with_report(&points, &ClusterParams::new(50.0, 0).unwrap());
        assert!(report.is_empty());
        assert_eq!(report, ClusterReport::default());
    }

    #[test]
    fn test_points_at_origin_are_counted() {
        let points = vec![Point::at(0.0, 0.0); 3];
        let clusters = cluster(&points, 50.0, 3).unwrap();
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].total_count, 3);
    }

    #[test]
    fn test_report_counters() {
        let mut points = vec![Point::at(10.0, 10.0); 4];
        points.push(Point::at(60.0, 10.0));
        points.push(Point::at(500.0, 500.0));
        points.push(Point::partial(None, Some(3.0), ()));
        points.push(Point::at(f64::NAN, 3.0));

        let report = cluster_with_report(&points, &ClusterParams::new(50.0, 1).unwrap());
        assert_eq!(report.accepted_points, 6);
        assert_eq!(report.dropped_points, 2);
        assert_eq!(report.occupied_cells, 3);
        assert_eq!(report.dense_cells, 3);
        assert_eq!(report.cluster_count(), 2);

        let report = cluster_with_report(&points, &ClusterParams::new(50.0, 2).unwrap());
        assert_eq!(report.dense_cells, 1);
        assert_eq!(report.cluster_count(), 1);
        assert_eq!(report.clusters[0].total_count, 4);
    }

    #[test]
    fn test_idempotent_runs() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut points = blob(&mut rng, 0.0, 0.0, 120.0, 400);
        points.extend(blob(&mut rng, -400.0, 300.0, 60.0, 200));
        let params = ClusterParams::new(40.0, 5).unwrap();

        let first = cluster_with_report(&points, &params);
        let second = cluster_with_report(&points, &params);
        assert_eq!(as_set(&first.clusters), as_set(&second.clusters));
        assert_eq!(first, second);
    }

    #[test]
    fn test_cluster_counts_partition_dense_points() {
        let mut rng = StdRng::seed_from_u64(11);
        let points: Vec<Point> = (0..2_000)
            .map(|_| Point::at(rng.random_range(-500.0..500.0), rng.random_range(-500.0..500.0)))
            .collect();
        let params = ClusterParams::new(25.0, 3).unwrap();

        let grid = CellGrid::build(&points, params.cell_size()).unwrap();
        let dense_total: usize = dense_cells(&grid, params.threshold())
            .iter()
            .map(|c| c.count())
            .sum();
        let dense_count = dense_cells(&grid, params.threshold()).len();

        let report = cluster_with_report(&points, &params);
        assert_eq!(report.clusters.iter().map(|b| b.total_count).sum::<usize>(), dense_total);
        assert_eq!(report.clusters.iter().map(|b| b.cell_count).sum::<usize>(), dense_count);
        assert!(report.clusters.iter().all(|b| b.min_x <= b.max_x && b.min_y <= b.max_y));
    }
}
