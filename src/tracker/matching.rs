//! Matching utilities for center-distance association.

use nalgebra::Vector2;
use ndarray::Array2;
use tracing::warn;

/// Cost assigned to detection/track pairs that may never be matched.
pub const INVALID_COST: f32 = 1e6;

/// A detection or track reduced to what association looks at.
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    /// Ground-plane center
    pub center: Vector2<f32>,
    pub label: u32,
}

/// Compute the center distance matrix between detections (rows) and tracks
/// (columns).
///
/// Pairs with different labels, or farther apart than the detection's gate,
/// get [`INVALID_COST`].
pub fn center_distance(detections: &[Candidate], gates: &[f32], tracks: &[Candidate]) -> Array2<f32> {
    let mut dists = Array2::from_elem((detections.len(), tracks.len()), INVALID_COST);
    for (i, d) in detections.iter().enumerate() {
        for (j, t) in tracks.iter().enumerate() {
            if d.label != t.label {
                continue;
            }
            let dist = (d.center - t.center).norm();
            if dist <= gates[i] {
                dists[[i, j]] = dist;
            }
        }
    }
    dists
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AssignmentResult {
    /// (detection, track) pairs
    pub matches: Vec<(usize, usize)>,
    pub unmatched_detections: Vec<usize>,
    pub unmatched_tracks: Vec<usize>,
}

impl AssignmentResult {
    fn from_matches(matches: Vec<(usize, usize)>, num_rows: usize, num_cols: usize) -> Self {
        let mut row_used = vec![false; num_rows];
        let mut col_used = vec![false; num_cols];
        for &(r, c) in &matches {
            row_used[r] = true;
            col_used[c] = true;
        }
        Self {
            matches,
            unmatched_detections: (0..num_rows).filter(|&r| !row_used[r]).collect(),
            unmatched_tracks: (0..num_cols).filter(|&c| !col_used[c]).collect(),
        }
    }
}

/// Walk detections in order and give each one its nearest free track.
pub fn greedy_assignment(cost_matrix: &Array2<f32>) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();
    let mut col_taken = vec![false; num_cols];
    let mut matches = Vec::new();

    for i in 0..num_rows {
        let best = (0..num_cols)
            .filter(|&j| !col_taken[j])
            .map(|j| (j, cost_matrix[[i, j]]))
            .filter(|&(_, cost)| cost < INVALID_COST)
            .min_by(|a, b| a.1.total_cmp(&b.1));

        if let Some((j, _)) = best {
            col_taken[j] = true;
            matches.push((i, j));
        }
    }

    AssignmentResult::from_matches(matches, num_rows, num_cols)
}

/// Globally optimal assignment; pairs left at [`INVALID_COST`] stay unmatched.
pub fn linear_assignment(cost_matrix: &Array2<f32>) -> AssignmentResult {
    let (num_rows, num_cols) = cost_matrix.dim();

    if num_rows == 0 || num_cols == 0 {
        return AssignmentResult::from_matches(vec![], num_rows, num_cols);
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), INVALID_COST as f64);

    for i in 0..num_rows {
        for j in 0..num_cols {
            padded[[i, j]] = cost_matrix[[i, j]] as f64;
        }
    }

    let mut matches = vec![];
    match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => {
            for (row_idx, &col_idx) in row_to_col.iter().enumerate().take(num_rows) {
                if col_idx < num_cols && cost_matrix[[row_idx, col_idx]] < INVALID_COST {
                    matches.push((row_idx, col_idx));
                }
            }
        }
        Err(e) => {
            warn!("linear assignment failed, leaving all pairs unmatched: {e:?}");
        }
    }

    AssignmentResult::from_matches(matches, num_rows, num_cols)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn cand(x: f32, y: f32, label: u32) -> Candidate {
        Candidate {
            center: Vector2::new(x, y),
            label,
        }
    }

    #[test]
    fn test_center_distance_gates() {
        let dets = [cand(0.0, 0.0, 0), cand(10.0, 0.0, 8)];
        let tracks = [cand(3.0, 4.0, 0), cand(10.5, 0.0, 0), cand(10.5, 0.0, 8)];

        let dists = center_distance(&dets, &[5.0, 1.0], &tracks);
        assert!((dists[[0, 0]] - 5.0).abs() < 1e-6);
        assert_eq!(dists[[0, 1]], INVALID_COST); // beyond gate
        assert_eq!(dists[[1, 1]], INVALID_COST); // label mismatch
        assert!((dists[[1, 2]] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_greedy_follows_detection_order() {
        let cost = array![[1.0, 2.0], [0.5, 3.0]];

        let result = greedy_assignment(&cost);
        // detection 0 takes track 0 first even though detection 1 is closer to it
        assert_eq!(result.matches, vec![(0, 0), (1, 1)]);
        assert!(result.unmatched_detections.is_empty());
        assert!(result.unmatched_tracks.is_empty());
    }

    #[test]
    fn test_linear_assignment_is_optimal() {
        let cost = array![[1.0, 2.0], [0.5, 3.0]];

        let mut result = linear_assignment(&cost);
        result.matches.sort();
        assert_eq!(result.matches, vec![(0, 1), (1, 0)]);
    }

    #[test]
    fn test_invalid_pairs_stay_unmatched() {
        let cost = array![[INVALID_COST, 1.0], [INVALID_COST, INVALID_COST], [0.2, INVALID_COST]];

        for result in [greedy_assignment(&cost), linear_assignment(&cost)] {
            let mut matches = result.matches.clone();
            matches.sort();
            assert_eq!(matches, vec![(0, 1), (2, 0)]);
            assert_eq!(result.unmatched_detections, vec![1]);
            assert!(result.unmatched_tracks.is_empty());
        }
    }

    #[test]
    fn test_empty_inputs() {
        let cost = Array2::<f32>::zeros((0, 3));
        let result = linear_assignment(&cost);
        assert_eq!(result.unmatched_tracks, vec![0, 1, 2]);

        let cost = Array2::<f32>::zeros((2, 0));
        let result = greedy_assignment(&cost);
        assert_eq!(result.unmatched_detections, vec![0, 1]);
    }
}
