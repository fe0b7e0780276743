use std::f64::consts::PI;

use crate::mask::BooleanMask;
use crate::rect::{Axis, IntRect, Rank, RealPoint, RealRect};
use crate::traits::{Overlay, Roi, RoiAttributes};

/// Is the unit cell starting at `k` covered by `[min, max)`?
fn cell_covered(min: f64, max: f64, k: i32, inclusive: bool) -> bool {
    let lo = f64::from(k);
    let hi = lo + 1.0;
    if inclusive {
        lo < max && hi > min
    } else {
        lo >= min && hi <= max
    }
}

/// Axis-aligned box of any rank
#[derive(Debug)]
pub struct BoxRoi {
    attributes: RoiAttributes,
    bounds: RealRect,
    overlay: Option<Box<dyn Overlay>>,
}

impl BoxRoi {
    pub fn new(bounds: RealRect) -> Self {
        Self {
            attributes: RoiAttributes::new("Rectangle"),
            bounds,
            overlay: None,
        }
    }

    pub fn with_overlay(mut self, overlay: Box<dyn Overlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }
}

impl Roi for BoxRoi {
    fn attributes(&self) -> &RoiAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut RoiAttributes {
        &mut self.attributes
    }

    fn rank(&self) -> Rank {
        self.bounds.rank()
    }

    fn real_bounds(&self) -> RealRect {
        self.bounds
    }

    fn plane_mask(&self, fixed: &[i32], inclusive: bool) -> BooleanMask {
        let plane = self.bounds().with_rank(Rank::Two);
        let b = &self.bounds;
        let covered = |axis: Axis, k: i32| {
            let i = axis.index();
            cell_covered(b.min(i), b.max(i), k, inclusive)
        };

        let in_slice = Axis::ALL[2..]
            .iter()
            .zip(fixed)
            .all(|(&axis, &k)| covered(axis, k));
        if !in_slice {
            return BooleanMask::empty(plane);
        }

        BooleanMask::from_fn(plane, |p| {
            covered(Axis::X, p.get(Axis::X.index())) && covered(Axis::Y, p.get(Axis::Y.index()))
        })
    }

    fn overlay(&self) -> Option<&dyn Overlay> {
        self.overlay.as_deref()
    }

    fn can_set_bounds(&self) -> bool {
        true
    }

    fn set_bounds(&mut self, bounds: RealRect) {
        self.bounds = bounds.with_rank(self.bounds.rank());
    }

    fn can_translate(&self) -> bool {
        true
    }

    fn translate(&mut self, delta: &RealPoint) {
        self.bounds = self.bounds.translate(delta);
    }

    fn set_position(&mut self, position: &RealPoint) {
        self.bounds = self.bounds.with_origin(position);
    }

    fn exact_box(&self) -> Option<RealRect> {
        Some(self.bounds)
    }

    fn exact_contains(&self, other: &dyn Roi) -> Option<bool> {
        other.exact_box().map(|inner| self.bounds.contains(&inner))
    }

    fn exact_within(&self, outer: &dyn Roi) -> Option<bool> {
        outer.exact_box().map(|outer| outer.contains(&self.bounds))
    }

    fn exact_intersects(&self, other: &dyn Roi) -> Option<bool> {
        other.exact_box().map(|b| self.bounds.intersects(&b))
    }

    fn exact_number_of_points(&self) -> Option<f64> {
        Some(self.bounds.measure())
    }

    // Boundary measure: every axis contributes two faces spanned by the others
    fn exact_number_of_contour_points(&self) -> Option<f64> {
        let sizes = self.bounds.sizes();
        let faces = (0..sizes.len())
            .map(|skip| {
                let face: f64 = sizes
                    .iter()
                    .enumerate()
                    .filter(|(axis, _)| *axis != skip)
                    .map(|(_, size)| size)
                    .product();
                2.0 * face
            })
            .sum();
        Some(faces)
    }
}

/// Axis-aligned ellipse in the XY plane
#[derive(Debug)]
pub struct EllipseRoi {
    attributes: RoiAttributes,
    center: RealPoint,
    radius_x: f64,
    radius_y: f64,
    overlay: Option<Box<dyn Overlay>>,
}

impl EllipseRoi {
    pub fn new(center_x: f64, center_y: f64, radius_x: f64, radius_y: f64) -> Self {
        Self {
            attributes: RoiAttributes::new("Ellipse"),
            center: RealPoint::new(Rank::Two, &[center_x, center_y]),
            radius_x: radius_x.abs(),
            radius_y: radius_y.abs(),
            overlay: None,
        }
    }

    /// Ellipse inscribed in `bounds`
    pub fn inscribed(bounds: &RealRect) -> Self {
        let center = bounds.center();
        Self::new(
            center.get(0),
            center.get(1),
            bounds.size(0) / 2.0,
            bounds.size(1) / 2.0,
        )
    }

    pub fn with_overlay(mut self, overlay: Box<dyn Overlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    fn inside(&self, x: f64, y: f64) -> bool {
        if self.radius_x <= 0.0 || self.radius_y <= 0.0 {
            return false;
        }
        let dx = (x - self.center.get(0)) / self.radius_x;
        let dy = (y - self.center.get(1)) / self.radius_y;
        dx * dx + dy * dy <= 1.0
    }
}

impl Roi for EllipseRoi {
    fn attributes(&self) -> &RoiAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut RoiAttributes {
        &mut self.attributes
    }

    fn rank(&self) -> Rank {
        Rank::Two
    }

    fn real_bounds(&self) -> RealRect {
        RealRect::new(
            Rank::Two,
            &[
                self.center.get(0) - self.radius_x,
                self.center.get(1) - self.radius_y,
            ],
            &[2.0 * self.radius_x, 2.0 * self.radius_y],
        )
    }

    fn plane_mask(&self, _fixed: &[i32], inclusive: bool) -> BooleanMask {
        let (cx, cy) = (self.center.get(0), self.center.get(1));
        BooleanMask::from_fn(self.bounds(), |p| {
            let x = f64::from(p.get(0));
            let y = f64::from(p.get(1));
            if inclusive {
                // axis-aligned scaling keeps the nearest pixel point a clamp
                self.inside(cx.clamp(x, x + 1.0), cy.clamp(y, y + 1.0))
            } else {
                [(x, y), (x + 1.0, y), (x, y + 1.0), (x + 1.0, y + 1.0)]
                    .iter()
                    .all(|&(px, py)| self.inside(px, py))
            }
        })
    }

    fn overlay(&self) -> Option<&dyn Overlay> {
        self.overlay.as_deref()
    }

    fn can_set_bounds(&self) -> bool {
        true
    }

    fn set_bounds(&mut self, bounds: RealRect) {
        let center = bounds.center();
        self.center = RealPoint::new(Rank::Two, &[center.get(0), center.get(1)]);
        self.radius_x = bounds.size(0) / 2.0;
        self.radius_y = bounds.size(1) / 2.0;
    }

    fn can_translate(&self) -> bool {
        true
    }

    fn translate(&mut self, delta: &RealPoint) {
        self.center = self.center.offset(delta);
    }

    fn exact_number_of_points(&self) -> Option<f64> {
        Some(PI * self.radius_x * self.radius_y)
    }

    // Ramanujan's second-order approximation
    fn exact_number_of_contour_points(&self) -> Option<f64> {
        let (a, b) = (self.radius_x, self.radius_y);
        Some(PI * (3.0 * (a + b) - ((3.0 * a + b) * (a + 3.0 * b)).sqrt()))
    }
}

/// Painted area backed by its own mask. Fixed in place.
#[derive(Debug)]
pub struct MaskRoi {
    attributes: RoiAttributes,
    mask: BooleanMask,
    overlay: Option<Box<dyn Overlay>>,
}

impl MaskRoi {
    pub fn new(mask: BooleanMask) -> Self {
        Self {
            attributes: RoiAttributes::new("Area"),
            mask,
            overlay: None,
        }
    }

    pub fn with_overlay(mut self, overlay: Box<dyn Overlay>) -> Self {
        self.overlay = Some(overlay);
        self
    }

    pub fn mask(&self) -> &BooleanMask {
        &self.mask
    }

    // `fixed` lists axes from Z upwards, so walk it from the top axis down
    fn descend(&self, fixed: &[i32]) -> Option<&BooleanMask> {
        let mut mask = &self.mask;
        for &coord in fixed.iter().rev() {
            mask = mask.slice(coord)?;
        }
        Some(mask)
    }
}

impl Roi for MaskRoi {
    fn attributes(&self) -> &RoiAttributes {
        &self.attributes
    }

    fn attributes_mut(&mut self) -> &mut RoiAttributes {
        &mut self.attributes
    }

    fn rank(&self) -> Rank {
        self.mask.rank()
    }

    fn real_bounds(&self) -> RealRect {
        self.mask.bounds().to_floating()
    }

    fn bounds(&self) -> IntRect {
        *self.mask.bounds()
    }

    fn plane_mask(&self, fixed: &[i32], inclusive: bool) -> BooleanMask {
        self.mask_at(fixed, inclusive)
    }

    fn mask_at(&self, fixed: &[i32], _inclusive: bool) -> BooleanMask {
        let remaining = self.rank().dims().saturating_sub(fixed.len());
        let rank = Rank::from_dims(remaining).unwrap_or(Rank::Two);
        match self.descend(fixed) {
            Some(mask) if mask.rank() == rank => mask.clone(),
            _ => BooleanMask::empty(self.mask.bounds().with_rank(rank)),
        }
    }

    fn overlay(&self) -> Option<&dyn Overlay> {
        self.overlay.as_deref()
    }
}
