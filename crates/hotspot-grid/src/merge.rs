//! Merging of adjacent dense cells into clusters.

/*

Dense-cell merging is a flood fill over an implicit graph:

    nodes = cells that passed the density filter
    edges = pairs of nodes whose coordinates differ by at most 1 on both axes

For each node not yet visited:
    - start a new cluster and push the node onto a queue
    - pop nodes, add them to the cluster, and enqueue every unvisited
      neighbor that is itself a node
    - the cluster is complete when the queue is empty

Neighbors are looked up through a map keyed by cell coordinates, so each
probe is O(1) instead of a scan of the node list.

*/

use std::collections::{HashMap, HashSet, VecDeque};

use crate::grid::{Cell, CellCoord};

/// Groups dense cells into 8-connected clusters.
///
/// Clusters are discovered in input order and each cluster lists its cells
/// in breadth-first order from the first cell encountered. Every input
/// coordinate appears in exactly one cluster; if the same coordinate is
/// supplied twice, only its first occurrence is used.
pub fn merge_adjacent<'g, 'a, L>(cells: &[&'g Cell<'a, L>]) -> Vec<Vec<&'g Cell<'a, L>>> {
    let mut index: HashMap<CellCoord, &'g Cell<'a, L>> = HashMap::with_capacity(cells.len());
    for &cell in cells {
        index.entry(cell.coord()).or_insert(cell);
    }

    let mut visited: HashSet<CellCoord> = HashSet::with_capacity(cells.len());
    let mut clusters = Vec::new();
    let mut queue = VecDeque::new();

    for &seed in cells {
        if !visited.insert(seed.coord()) {
            continue;
        }

        let mut cluster = Vec::new();
        queue.push_back(index[&seed.coord()]);

        while let Some(current) = queue.pop_front() {
            cluster.push(current);
            for neighbor in current.coord().neighbors() {
                if visited.contains(&neighbor) {
                    continue;
                }
                if let Some(&next) = index.get(&neighbor) {
                    visited.insert(neighbor);
                    queue.push_back(next);
                }
            }
        }

        clusters.push(cluster);
    }

    clusters
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::dense_cells;
    use crate::grid::{CellGrid, Point};

    /// One point at the center of each listed unit cell.
    fn unit_cells(coords: &[(i64, i64)]) -> Vec<Point> {
        coords
            .iter()
            .map(|&(x, y)| Point::at(x as f64 + 0.5, y as f64 + 0.5))
            .collect()
    }

    fn cluster_coords(points: &[Point]) -> Vec<Vec<CellCoord>> {
        let grid = CellGrid::build(points, 1.0).unwrap();
        let dense = dense_cells(&grid, 1);
        let mut clusters: Vec<Vec<CellCoord>> = merge_adjacent(&dense)
            .into_iter()
            .map(|c| {
                let mut coords: Vec<_> = c.iter().map(|cell| cell.coord()).collect();
                coords.sort();
                coords
            })
            .collect();
        clusters.sort();
        clusters
    }

    #[test]
    fn test_empty_input() {
        let cells: Vec<&Cell<'_, Point>> = Vec::new();
        assert!(merge_adjacent(&cells).is_empty());
    }

    #[test]
    fn test_diagonal_neighbors_merge() {
        let points = unit_cells(&[(0, 0), (1, 1)]);
        let clusters = cluster_coords(&points);
        assert_eq!(clusters, vec![vec![CellCoord::new(0, 0), CellCoord::new(1, 1)]]);
    }

    #[test]
    fn test_gap_of_one_cell_separates() {
        let points = unit_cells(&[(0, 0), (2, 2)]);
        let clusters = cluster_coords(&points);
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_bridge_cell_connects() {
        let points = unit_cells(&[(0, 0), (2, 2), (1, 1)]);
        let clusters = cluster_coords(&points);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 3);
    }

    #[test]
    fn test_non_convex_shape_is_one_cluster() {
        // A "U" whose arms are only connected through the bottom row.
        let points = unit_cells(&[
            (0, 4), (0, 3), (0, 2), (0, 1), (0, 0),
            (1, 0), (2, 0), (3, 0), (4, 0),
            (4, 1), (4, 2), (4, 3), (4, 4),
        ]);
        let clusters = cluster_coords(&points);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 13);
    }

    #[test]
    fn test_negative_coordinates() {
        let points = unit_cells(&[(-1, -1), (0, 0), (-5, -5)]);
        let clusters = cluster_coords(&points);
        assert_eq!(
            clusters,
            vec![
                vec![CellCoord::new(-5, -5)],
                vec![CellCoord::new(-1, -1), CellCoord::new(0, 0)],
            ]
        );
    }

    #[test]
    fn test_duplicate_input_cells_are_visited_once() {
        let points = unit_cells(&[(0, 0), (0, 1)]);
        let grid = CellGrid::build(&points, 1.0).unwrap();
        let mut dense = dense_cells(&grid, 1);
        dense.extend(dense_cells(&grid, 1));

        let clusters = merge_adjacent(&dense);
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].len(), 2);
    }

    #[test]
    fn test_clusters_partition_the_input() {
        let points = unit_cells(&[
            (0, 0), (1, 0), (5, 5), (6, 6), (10, 0), (-3, 7), (-2, 8), (-1, 9),
        ]);
        let grid = CellGrid::build(&points, 1.0).unwrap();
        let dense = dense_cells(&grid, 1);
        let clusters = merge_adjacent(&dense);

        let mut seen = HashSet::new();
        for cell in clusters.iter().flatten() {
            assert!(seen.insert(cell.coord()), "cell {} in two clusters", cell.coord());
        }
        let expected: HashSet<_> = dense.iter().map(|c| c.coord()).collect();
        assert_eq!(seen, expected);
        assert!(clusters.iter().all(|c| !c.is_empty()));
        assert_eq!(clusters.len(), 4);
    }
}
