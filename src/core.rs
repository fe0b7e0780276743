use log::{debug, trace, warn};
use serde::{Deserialize, Serialize};

use crate::error::{Result, RoiError};
use crate::mask::BooleanMask;
use crate::rect::Rank;
use crate::traits::Roi;

/// Configuration for mask building
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaskConfig {
    /// Largest number of cells a built mask may cover
    pub max_cells: u64,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            max_cells: 1 << 28, // 256M cells, one byte each
        }
    }
}

/// Front door for callers that rasterize ROIs of unknown size
#[derive(Debug, Clone, Default)]
pub struct MaskBuilder {
    config: MaskConfig,
}

impl MaskBuilder {
    pub fn new(config: MaskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MaskConfig {
        &self.config
    }

    /// Full-rank mask of `roi`, refused when its bounds exceed the cell budget
    pub fn build<R: Roi + ?Sized>(&self, roi: &R, inclusive: bool) -> Result<BooleanMask> {
        let cells = roi.bounds().volume();
        if cells > self.config.max_cells {
            warn!(
                "refusing rank-{} mask for roi {} over {} cells (limit {})",
                roi.rank().dims(),
                roi.id().value(),
                cells,
                self.config.max_cells
            );
            return Err(RoiError::MaskTooLarge {
                cells,
                limit: self.config.max_cells,
            });
        }

        debug!(
            "building rank-{} mask for roi {} over {} cells (inclusive={})",
            roi.rank().dims(),
            roi.id().value(),
            cells,
            inclusive
        );
        Ok(roi.boolean_mask(inclusive))
    }
}

/// Generic mask of `roi` at the trailing coordinates `fixed`.
///
/// The result has rank `roi.rank() - fixed.len()` and covers the ROI bounds
/// projected to that rank. Higher ranks are stacked from [`Roi::mask_at`] one
/// coordinate deeper, bottoming out at [`Roi::plane_mask`]. Coordinates outside
/// the bounds give an all-unset mask.
pub fn assemble<R: Roi + ?Sized>(roi: &R, fixed: &[i32], inclusive: bool) -> BooleanMask {
    let bounds = roi.bounds();
    let remaining = roi.rank().dims().saturating_sub(fixed.len());

    let Some(target) = Rank::from_dims(remaining) else {
        trace!("{} fixed coordinates leave no plane, answering empty", fixed.len());
        return BooleanMask::empty(bounds.with_rank(Rank::Two));
    };
    let slice_bounds = bounds.with_rank(target);

    let inside = fixed.iter().enumerate().all(|(i, &coord)| {
        let axis = remaining + i;
        coord >= bounds.min(axis) && coord < bounds.max(axis)
    });
    if !inside {
        trace!("slice {:?} outside roi {} bounds", fixed, roi.id().value());
        return BooleanMask::empty(slice_bounds);
    }

    if target == Rank::Two {
        let plane = roi.plane_mask(fixed, inclusive);
        if plane.bounds() == &slice_bounds {
            return plane;
        }
        return plane.fit_to(&slice_bounds);
    }

    let axis = target.last_axis();
    let slices = (bounds.min(axis)..bounds.max(axis))
        .map(|coord| {
            let mut deeper = Vec::with_capacity(fixed.len() + 1);
            deeper.push(coord);
            deeper.extend_from_slice(fixed);
            roi.mask_at(&deeper, inclusive)
        })
        .collect();

    BooleanMask::from_slices(slice_bounds, slices).unwrap_or_else(|err| {
        warn!("roi {} produced an inconsistent slice: {}", roi.id().value(), err);
        BooleanMask::empty(slice_bounds)
    })
}
