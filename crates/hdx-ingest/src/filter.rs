//! Schema-agnostic row filter.

use hdx_model::RowFilterPolicy;

/// Outcome of classifying one data row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowClass {
    Keep,
    Empty,
    Metadata,
}

/// Every cell is blank or whitespace-only.
pub fn is_empty_row(cells: &[String]) -> bool {
    cells.iter().all(|c| c.trim().is_empty())
}

/// At least `metadata_threshold` of the non-blank cells start with the comment marker.
///
/// A row with no non-blank cells is never metadata.
pub fn is_metadata_row(cells: &[String], policy: &RowFilterPolicy) -> bool {
    let mut non_blank = 0usize;
    let mut marked = 0usize;
    for cell in cells {
        let value = cell.trim();
        if value.is_empty() {
            continue;
        }
        non_blank += 1;
        if value.starts_with(policy.comment_marker.as_str()) {
            marked += 1;
        }
    }
    non_blank > 0 && marked as f64 / non_blank as f64 >= policy.metadata_threshold
}

/// Empty takes precedence over metadata.
pub fn classify_row(cells: &[String], policy: &RowFilterPolicy) -> RowClass {
    if is_empty_row(cells) {
        RowClass::Empty
    } else if is_metadata_row(cells, policy) {
        RowClass::Metadata
    } else {
        RowClass::Keep
    }
}
