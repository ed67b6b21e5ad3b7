//! One-dimensional coordinate clustering
//!
//! Groups detection centers into row bands (y) or column bands (x) with a
//! two-phase pass: a greedy walk that binds each value to the first open
//! cluster whose *first-inserted* member lies within tolerance, followed by a
//! reassignment of every value to the nearest final cluster mean. The second
//! pass can move a value out of the cluster it was greedily inserted into;
//! both passes are kept as-is because they differ on boundary cases.

/// Default tolerance in position units, for both axes
pub const DEFAULT_EPS: f32 = 30.0;

/// Cluster the given 1-D coordinates with tolerance `eps`.
///
/// Returns one cluster index per input value, in input order. Cluster
/// indices are dense, ordered by ascending cluster position, and start
/// at zero. Non-positive or non-finite `eps` is a contract violation.
pub fn cluster_1d(values: &[f32], eps: f32) -> Vec<usize> {
    assert!(eps.is_finite() && eps > 0.0, "cluster tolerance must be positive");

    if values.is_empty() {
        return Vec::new();
    }

    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    // Phase 1: greedy first-member binding in ascending order
    let mut clusters: Vec<Vec<f32>> = Vec::new();
    for &idx in &order {
        let v = values[idx];
        let mut found = false;
        for cluster in clusters.iter_mut() {
            if (cluster[0] - v).abs() < eps {
                cluster.push(v);
                found = true;
                break;
            }
        }
        if !found {
            clusters.push(vec![v]);
        }
    }

    let centers: Vec<f32> = clusters
        .iter()
        .map(|c| c.iter().sum::<f32>() / c.len() as f32)
        .collect();

    // Phase 2: reassign every value to the nearest final mean,
    // ties broken by the first center found
    values
        .iter()
        .map(|&v| nearest_center(v, &centers))
        .collect()
}

fn nearest_center(value: f32, centers: &[f32]) -> usize {
    let mut best = 0;
    let mut best_dist = (value - centers[0]).abs();
    for (i, &center) in centers.iter().enumerate().skip(1) {
        let dist = (value - center).abs();
        if dist < best_dist {
            best = i;
            best_dist = dist;
        }
    }
    best
}

/// Number of clusters in an assignment vector
pub fn cluster_count(assignments: &[usize]) -> usize {
    assignments.iter().max().map_or(0, |&m| m + 1)
}
