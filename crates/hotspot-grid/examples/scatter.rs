use hotspot_grid::{CellGrid, ClusterParams, Point, cluster_with_report};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn main() {
    // Scatter background noise over a 1000x1000 area and drop three dense blobs into it.
    let mut rng = StdRng::seed_from_u64(2024);
    let mut points: Vec<Point<usize>> = (0..400)
        .map(|i| Point::new(rng.random_range(0.0..1000.0), rng.random_range(0.0..1000.0), i))
        .collect();

    for (cx, cy, n) in [(200.0, 200.0, 300), (230.0, 260.0, 200), (750.0, 600.0, 350)] {
        for _ in 0..n {
            let i = points.len();
            points.push(Point::new(
                cx + rng.random_range(-40.0..40.0),
                cy + rng.random_range(-40.0..40.0),
                i,
            ));
        }
    }

    // A few entities that have not been positioned yet.
    points.push(Point::partial(None, Some(10.0), points.len()));
    points.push(Point::partial(Some(10.0), None, points.len()));

    let params = ClusterParams::new(50.0, 20).unwrap();

    match CellGrid::build(&points, params.cell_size()) {
        Ok(grid) => println!("{}", grid),
        Err(e) => println!("Error building grid: {}", e),
    }

    let report = cluster_with_report(&points, &params);
    println!(
        "Found {} clusters ({} of {} occupied cells dense, {} points dropped)",
        report.cluster_count(),
        report.dense_cells,
        report.occupied_cells,
        report.dropped_points
    );
    for (i, bounds) in report.clusters.iter().enumerate() {
        println!("Cluster {}: {} center={}", i, bounds, bounds.center());
    }
}
