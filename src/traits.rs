use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::mask::BooleanMask;
use crate::rect::{IntPoint, IntRect, Rank, RealPoint, RealRect};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-wide unique identifier of a ROI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RoiId(u64);

impl RoiId {
    pub fn next() -> Self {
        RoiId(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(self) -> u64 {
        self.0
    }
}

pub const DEFAULT_OPACITY: f32 = 0.3;

/// Display and lifecycle attributes shared by every ROI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoiAttributes {
    id: RoiId,
    name: String,
    opacity: f32,
    read_only: bool,
    can_be_removed: bool,
}

impl RoiAttributes {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RoiId::next(),
            name: name.into(),
            opacity: DEFAULT_OPACITY,
            read_only: false,
            can_be_removed: true,
        }
    }

    pub fn id(&self) -> RoiId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Clamped to `[0, 1]`
    pub fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity.clamp(0.0, 1.0);
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub fn can_be_removed(&self) -> bool {
        self.can_be_removed
    }

    pub fn set_can_be_removed(&mut self, can_be_removed: bool) {
        self.can_be_removed = can_be_removed;
    }
}

/// Renderable representation of a ROI, owned by the view layer
pub trait Overlay: Debug {
    fn name(&self) -> &str;

    /// Opaque configuration panel handed to the host UI
    fn options_panel(&self) -> Option<&dyn Any> {
        None
    }
}

/// Region of interest of rank 2 to 5.
///
/// Implementors supply bounds and the XY cross-section at fixed higher
/// coordinates. Everything else has a generic, mask-based default that a shape
/// overrides when it knows better.
pub trait Roi {
    fn attributes(&self) -> &RoiAttributes;

    fn attributes_mut(&mut self) -> &mut RoiAttributes;

    fn rank(&self) -> Rank;

    /// Shape bounds in real coordinates
    fn real_bounds(&self) -> RealRect;

    /// Rasterize the XY plane at `fixed`, the coordinates of axes Z onwards
    /// (empty for a rank-2 ROI).
    ///
    /// With `inclusive` set, partially covered pixels are part of the mask.
    fn plane_mask(&self, fixed: &[i32], inclusive: bool) -> BooleanMask;

    fn id(&self) -> RoiId {
        self.attributes().id()
    }

    fn overlay(&self) -> Option<&dyn Overlay> {
        None
    }

    /// Integer rectangle enclosing the ROI
    fn bounds(&self) -> IntRect {
        self.real_bounds().to_integer()
    }

    /// Minimum corner of [`Roi::bounds`]
    fn position(&self) -> IntPoint {
        self.bounds().origin()
    }

    fn real_position(&self) -> RealPoint {
        self.real_bounds().origin()
    }

    fn can_set_bounds(&self) -> bool {
        false
    }

    fn set_bounds(&mut self, _bounds: RealRect) {}

    fn can_translate(&self) -> bool {
        false
    }

    /// Move by `delta`. Check [`Roi::can_translate`] first.
    fn translate(&mut self, _delta: &RealPoint) {}

    fn can_set_position(&self) -> bool {
        self.can_translate()
    }

    fn set_position(&mut self, position: &RealPoint) {
        if self.can_translate() {
            let delta = self.real_position().delta_to(position);
            self.translate(&delta);
        }
    }

    /// Mask of rank `rank - fixed.len()` at the trailing coordinates `fixed`
    fn mask_at(&self, fixed: &[i32], inclusive: bool) -> BooleanMask {
        crate::core::assemble(self, fixed, inclusive)
    }

    fn boolean_mask(&self, inclusive: bool) -> BooleanMask {
        self.mask_at(&[], inclusive)
    }

    /// Real bounds when the shape fills them exactly
    fn exact_box(&self) -> Option<RealRect> {
        None
    }

    fn exact_contains(&self, _other: &dyn Roi) -> Option<bool> {
        None
    }

    fn exact_within(&self, _outer: &dyn Roi) -> Option<bool> {
        None
    }

    fn exact_intersects(&self, _other: &dyn Roi) -> Option<bool> {
        None
    }

    fn exact_number_of_points(&self) -> Option<f64> {
        None
    }

    fn exact_number_of_contour_points(&self) -> Option<f64> {
        None
    }

    fn contains(&self, other: &dyn Roi) -> bool
    where
        Self: Sized,
    {
        crate::dispatch::contains(self, other)
    }

    fn intersects(&self, other: &dyn Roi) -> bool
    where
        Self: Sized,
    {
        crate::dispatch::intersects(self, other)
    }

    fn compute_number_of_points(&self) -> f64
    where
        Self: Sized,
    {
        crate::utils::number_of_points(self)
    }

    fn compute_number_of_contour_points(&self) -> f64
    where
        Self: Sized,
    {
        crate::utils::number_of_contour_points(self)
    }
}
