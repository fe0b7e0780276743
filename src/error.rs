use thiserror::Error;

/// Failures raised while building masks.
///
/// Geometric degeneracy and unsupported capabilities are not errors: empty
/// rectangles propagate as empty results and capabilities are checked with
/// the `can_*` predicates before mutating.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoiError {
    #[error("mask over {cells} cells exceeds the configured limit of {limit}")]
    MaskTooLarge { cells: u64, limit: u64 },

    #[error("plane holds {found} cells but its bounds cover {expected}")]
    PlaneLength { expected: usize, found: usize },

    #[error("stack holds {found} slices but its bounds span {expected}")]
    SliceCount { expected: usize, found: usize },

    #[error("expected a rank-{expected} mask, got rank {found}")]
    RankMismatch { expected: usize, found: usize },
}

pub type Result<T> = std::result::Result<T, RoiError>;
