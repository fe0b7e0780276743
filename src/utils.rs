use crate::dispatch;
use crate::traits::Roi;

/// Number of points of `roi`: the shape's exact formula when it has one,
/// otherwise the mask estimate
pub fn number_of_points(roi: &dyn Roi) -> f64 {
    roi.exact_number_of_points()
        .unwrap_or_else(|| estimate_number_of_points(roi))
}

/// Number of contour points of `roi`, exact when the shape knows it
pub fn number_of_contour_points(roi: &dyn Roi) -> f64 {
    roi.exact_number_of_contour_points()
        .unwrap_or_else(|| estimate_number_of_contour_points(roi))
}

/// Approximation from the inclusive and exclusive masks: the mean of both
/// cell counts, divided by the rank
pub fn estimate_number_of_points(roi: &dyn Roi) -> f64 {
    let inclusive = roi.boolean_mask(true).cardinality() as f64;
    let exclusive = roi.boolean_mask(false).cardinality() as f64;

    ((inclusive + exclusive) / 2.0) / roi.rank().dims() as f64
}

/// Approximation from the edge cells of the exclusive mask, divided by the rank
pub fn estimate_number_of_contour_points(roi: &dyn Roi) -> f64 {
    let contour = roi.boolean_mask(false).contour_points().len() as f64;
    contour / roi.rank().dims() as f64
}

/// Count how many other ROIs the given one intersects
pub fn count_intersecting(roi: &dyn Roi, all: &[Box<dyn Roi>]) -> usize {
    all.iter()
        .filter(|other| {
            // Don't count self
            if other.id() == roi.id() {
                return false;
            }
            dispatch::intersects(roi, other.as_ref())
        })
        .count()
}
