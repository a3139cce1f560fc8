/// Linear assignment between previous-frame and current-frame detections
///
/// Rows of the cost matrix are previous-frame detections, columns are
/// current-frame detections. The matrix may be rectangular; every result pairs
/// exactly `min(rows, cols)` rows with distinct columns.
use crate::config::SolverMode;
use crate::error::{Result, TrackError};
use ndarray::ArrayView2;
use pathfinding::prelude::{kuhn_munkres_min, Matrix};

/// Costs are handed to Kuhn-Munkres as integers with this many units per 1.0
const FIXED_POINT_SCALE: f64 = 1_000_000.0;

/// Result of an assignment
#[derive(Debug, Clone, PartialEq)]
pub struct AssignmentResult {
    /// Assignments as (row, col) pairs, ordered by row for the exact solver
    /// and by ascending cost for the greedy one
    pub assignments: Vec<(usize, usize)>,
    /// Rows left without a column
    pub unassigned_rows: Vec<usize>,
    /// Columns left without a row
    pub unassigned_cols: Vec<usize>,
    /// Sum of the original costs of all assignments
    pub total_cost: f64,
}

impl AssignmentResult {
    fn from_pairs(cost_matrix: ArrayView2<f64>, assignments: Vec<(usize, usize)>) -> Self {
        let (rows, cols) = cost_matrix.dim();
        let mut used_rows = vec![false; rows];
        let mut used_cols = vec![false; cols];
        for &(row, col) in &assignments {
            used_rows[row] = true;
            used_cols[col] = true;
        }

        let total_cost = assignments
            .iter()
            .map(|&(row, col)| cost_matrix[[row, col]])
            .sum();

        AssignmentResult {
            unassigned_rows: (0..rows).filter(|&i| !used_rows[i]).collect(),
            unassigned_cols: (0..cols).filter(|&j| !used_cols[j]).collect(),
            assignments,
            total_cost,
        }
    }
}

/// Assignment solver for the exact and greedy modes
pub struct AssignmentSolver;

impl AssignmentSolver {
    /// Solve the assignment problem with the configured mode
    pub fn solve(cost_matrix: ArrayView2<f64>, mode: SolverMode) -> Result<AssignmentResult> {
        check_finite(cost_matrix)?;
        match mode {
            SolverMode::Exact => Self::solve_exact(cost_matrix),
            SolverMode::Greedy => Ok(Self::solve_greedy(cost_matrix)),
        }
    }

    /// Globally optimal assignment via Kuhn-Munkres
    fn solve_exact(cost_matrix: ArrayView2<f64>) -> Result<AssignmentResult> {
        let (rows, cols) = cost_matrix.dim();
        if rows == 0 || cols == 0 {
            return Ok(AssignmentResult::from_pairs(cost_matrix, Vec::new()));
        }

        // kuhn_munkres_min needs rows <= columns
        let transposed = rows > cols;
        let (n, m) = if transposed { (cols, rows) } else { (rows, cols) };
        let mut weights = Matrix::new(n, m, 0i64);

        for ((row, col), &cost) in cost_matrix.indexed_iter() {
            let fixed = num::cast::<f64, i64>((cost * FIXED_POINT_SCALE).round())
                .ok_or(TrackError::NonFiniteCost { row, col })?;
            if transposed {
                weights[(col, row)] = fixed;
            } else {
                weights[(row, col)] = fixed;
            }
        }

        let (_, raw_assignments) = kuhn_munkres_min(&weights);

        let mut assignments: Vec<(usize, usize)> = raw_assignments
            .into_iter()
            .enumerate()
            .map(|(i, j)| if transposed { (j, i) } else { (i, j) })
            .collect();
        assignments.sort_unstable();

        Ok(AssignmentResult::from_pairs(cost_matrix, assignments))
    }

    /// Cheapest-first greedy assignment.
    ///
    /// All (row, col) pairs are enumerated row-major and stable-sorted by
    /// cost, so equal costs resolve in enumeration order. The result is not
    /// optimal: one early cheap pick can force expensive pairs later, and
    /// the gap to the optimum grows with matrix size and density.
    fn solve_greedy(cost_matrix: ArrayView2<f64>) -> AssignmentResult {
        let (rows, cols) = cost_matrix.dim();
        let wanted = rows.min(cols);

        let mut candidates: Vec<(f64, usize, usize)> = cost_matrix
            .indexed_iter()
            .map(|((row, col), &cost)| (cost, row, col))
            .collect();

        // Stable sort keeps row-major order among ties
        candidates.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

        let mut assignments = Vec::with_capacity(wanted);
        let mut used_rows = vec![false; rows];
        let mut used_cols = vec![false; cols];

        for (_cost, row, col) in candidates {
            if assignments.len() == wanted {
                break;
            }
            if !used_rows[row] && !used_cols[col] {
                assignments.push((row, col));
                used_rows[row] = true;
                used_cols[col] = true;
            }
        }

        AssignmentResult::from_pairs(cost_matrix, assignments)
    }
}

fn check_finite(cost_matrix: ArrayView2<f64>) -> Result<()> {
    match cost_matrix.indexed_iter().find(|(_, cost)| !cost.is_finite()) {
        Some(((row, col), _)) => Err(TrackError::NonFiniteCost { row, col }),
        None => Ok(()),
    }
}
