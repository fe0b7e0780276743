//! # ndroi
//!
//! N-dimensional region-of-interest geometry for bioimage analysis.
//!
//! Images are indexed on up to five axes (X, Y, Z, T, C). A ROI of rank 2 to 5
//! answers containment and intersection queries against ROIs of any rank,
//! using exact closed-form tests where the shape provides them and falling
//! back to recursively stacked boolean masks otherwise.

pub mod core;
pub mod dispatch;
pub mod document;
pub mod error;
pub mod mask;
pub mod rect;
pub mod shapes;
pub mod traits;
pub mod units;
pub mod utils;

pub use crate::core::{MaskBuilder, MaskConfig};
pub use document::{RoiDocument, SelectionSummary, UpdateGuard};
pub use error::{Result, RoiError};
pub use mask::BooleanMask;
pub use rect::{Axis, IntPoint, IntRect, Point, Rank, RealPoint, RealRect, Rect};
pub use shapes::{BoxRoi, EllipseRoi, MaskRoi};
pub use traits::{Overlay, Roi, RoiAttributes, RoiId};
