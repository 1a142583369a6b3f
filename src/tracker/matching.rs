//! Matching utilities for the proximity tracker.

use ndarray::Array2;

use crate::tracker::detection::Detection;

/// Cost used for pairs that may never be matched (different labels).
pub const FORBIDDEN_COST: f32 = f32::INFINITY;

/// Padding cost for the square matrix handed to the LAP solver.
const LAP_PAD_COST: f64 = 1e6;

/// Compute the centre distance matrix between current and previous detections.
///
/// Returns a matrix of shape (M, N) where M is the length of `current` and N
/// the length of `previous`. Pairs with differing labels get
/// [`FORBIDDEN_COST`].
pub fn center_distance(current: &[Detection], previous: &[Detection]) -> Array2<f32> {
    let mut dists = Array2::from_elem((current.len(), previous.len()), FORBIDDEN_COST);
    for (i, c) in current.iter().enumerate() {
        for (j, p) in previous.iter().enumerate() {
            if c.label == p.label {
                dists[[i, j]] = c.center_distance(p);
            }
        }
    }
    dists
}

/// Independent nearest-neighbour choice for every row.
///
/// Each row picks its minimum column (first one on ties) if that distance is
/// strictly below `thresh`. Rows do not compete: several rows may pick the
/// same column.
pub fn greedy_nearest(dists: &Array2<f32>, thresh: f32) -> Vec<Option<usize>> {
    dists
        .rows()
        .into_iter()
        .map(|row| {
            let mut best: Option<(usize, f32)> = None;
            for (j, &d) in row.iter().enumerate() {
                if best.is_none_or(|(_, best_d)| d < best_d) {
                    best = Some((j, d));
                }
            }
            best.filter(|&(_, d)| d < thresh).map(|(j, _)| j)
        })
        .collect()
}

/// One-to-one assignment minimizing total distance, solved with LAPJV.
///
/// Assigned pairs whose distance is not strictly below `thresh` are dropped.
pub fn exclusive_assignment(dists: &Array2<f32>, thresh: f32) -> Vec<Option<usize>> {
    let (num_rows, num_cols) = dists.dim();
    let mut assignment = vec![None; num_rows];

    if num_rows == 0 || num_cols == 0 {
        return assignment;
    }

    let size = num_rows.max(num_cols);
    let mut padded = Array2::<f64>::from_elem((size, size), LAP_PAD_COST);

    for i in 0..num_rows {
        for j in 0..num_cols {
            let d = dists[[i, j]];
            if d.is_finite() {
                padded[[i, j]] = (d as f64).min(LAP_PAD_COST);
            }
        }
    }

    match lapjv::lapjv(&padded) {
        Ok((row_to_col, _)) => {
            for (row_idx, &col_idx) in row_to_col.iter().enumerate().take(num_rows) {
                if col_idx < num_cols && dists[[row_idx, col_idx]] < thresh {
                    assignment[row_idx] = Some(col_idx);
                }
            }
        }
        Err(_) => {
            log::warn!("exclusive assignment failed, falling back to new tracks");
        }
    }

    assignment
}
