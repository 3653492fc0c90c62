//! Right-trimming of rows and grids.

use crate::cell::CellValue;
use crate::extract::Grid;

/// Remove trailing elements equal to `sentinel`.
///
/// Scans from the end and truncates after the last element that differs
/// from the sentinel. Total and idempotent: an all-sentinel or empty input
/// becomes (or stays) empty, and stripping twice is a no-op.
pub fn rstrip<T: PartialEq>(items: &mut Vec<T>, sentinel: &T) {
    let keep = items
        .iter()
        .rposition(|item| item != sentinel)
        .map_or(0, |idx| idx + 1);
    items.truncate(keep);
}

/// Strip trailing null cells from every row, then trailing empty rows from
/// the grid.
pub fn strip_grid(grid: &mut Grid) {
    for row in &mut *grid {
        rstrip(row, &CellValue::Null);
    }
    rstrip(grid, &Vec::new());
}
