use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::ops::{Add, Mul, Sub};

/// Number of coordinate slots carried by every point and rectangle (X, Y, Z, T, C)
pub const MAX_RANK: usize = 5;

/// Number of axes a geometric entity spans
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
}

impl Rank {
    pub const ALL: [Rank; 4] = [Rank::Two, Rank::Three, Rank::Four, Rank::Five];

    pub fn dims(self) -> usize {
        match self {
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
        }
    }

    pub fn from_dims(dims: usize) -> Option<Rank> {
        match dims {
            2 => Some(Rank::Two),
            3 => Some(Rank::Three),
            4 => Some(Rank::Four),
            5 => Some(Rank::Five),
            _ => None,
        }
    }

    /// Rank with the last axis dropped, `None` for the planar rank
    pub fn lower(self) -> Option<Rank> {
        Rank::from_dims(self.dims() - 1)
    }

    /// Rank with one more axis appended, `None` past the channel axis
    pub fn higher(self) -> Option<Rank> {
        Rank::from_dims(self.dims() + 1)
    }

    /// Index of the slowest-varying axis
    pub fn last_axis(self) -> usize {
        self.dims() - 1
    }

    /// Live axes, X first
    pub fn axes(self) -> &'static [Axis] {
        &Axis::ALL[..self.dims()]
    }

    pub(crate) fn index(self) -> usize {
        self.dims() - 2
    }
}

/// Named image axes, in storage order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
    T,
    C,
}

impl Axis {
    pub const ALL: [Axis; MAX_RANK] = [Axis::X, Axis::Y, Axis::Z, Axis::T, Axis::C];

    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
            Axis::T => 3,
            Axis::C => 4,
        }
    }
}

/// Scalar a coordinate can be expressed in (integer pixels or real positions)
pub trait Coord:
    Copy + Debug + PartialOrd + Add<Output = Self> + Sub<Output = Self> + Mul<Output = Self>
{
    const ZERO: Self;
    const ONE: Self;

    /// Addition that clamps at the representable range instead of overflowing
    fn saturating_add(self, rhs: Self) -> Self;

    fn saturating_sub(self, rhs: Self) -> Self;
}

impl Coord for i32 {
    const ZERO: Self = 0;
    const ONE: Self = 1;

    fn saturating_add(self, rhs: Self) -> Self {
        i32::saturating_add(self, rhs)
    }

    fn saturating_sub(self, rhs: Self) -> Self {
        i32::saturating_sub(self, rhs)
    }
}

impl Coord for f64 {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;

    fn saturating_add(self, rhs: Self) -> Self {
        self + rhs
    }

    fn saturating_sub(self, rhs: Self) -> Self {
        self - rhs
    }
}

fn smaller<S: Coord>(a: S, b: S) -> S {
    if b < a {
        b
    } else {
        a
    }
}

fn larger<S: Coord>(a: S, b: S) -> S {
    if b > a {
        b
    } else {
        a
    }
}

// NaN compares false both ways, so it lands on zero too
fn non_negative<S: Coord>(value: S) -> S {
    if value > S::ZERO {
        value
    } else {
        S::ZERO
    }
}

/// A point with one coordinate per live axis. Slots past the rank stay at zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<S> {
    rank: Rank,
    coords: [S; MAX_RANK],
}

pub type IntPoint = Point<i32>;
pub type RealPoint = Point<f64>;

impl Eq for Point<i32> {}

impl<S: Coord> Point<S> {
    /// Build a point from its leading coordinates; missing ones default to zero
    pub fn new(rank: Rank, coords: &[S]) -> Self {
        let mut slots = [S::ZERO; MAX_RANK];
        for (slot, value) in slots.iter_mut().zip(coords).take(rank.dims()) {
            *slot = *value;
        }
        Self {
            rank,
            coords: slots,
        }
    }

    pub fn origin(rank: Rank) -> Self {
        Self::new(rank, &[])
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Coordinate on `axis`, zero for axes past the rank
    pub fn get(&self, axis: usize) -> S {
        if axis < self.rank.dims() {
            self.coords[axis]
        } else {
            S::ZERO
        }
    }

    pub fn coords(&self) -> &[S] {
        &self.coords[..self.rank.dims()]
    }

    pub fn with_rank(&self, rank: Rank) -> Self {
        Self::new(rank, self.coords())
    }

    /// This point moved by `delta`, keeping this point's rank
    pub fn offset(&self, delta: &Point<S>) -> Self {
        let mut moved = *self;
        for axis in 0..self.rank.dims() {
            moved.coords[axis] = self.coords[axis].saturating_add(delta.get(axis));
        }
        moved
    }

    /// Per-axis difference `target - self`, at this point's rank
    pub fn delta_to(&self, target: &Point<S>) -> Self {
        let mut delta = Self::origin(self.rank);
        for axis in 0..self.rank.dims() {
            delta.coords[axis] = target.get(axis).saturating_sub(self.coords[axis]);
        }
        delta
    }
}

/// Axis-aligned box of rank 2 to 5.
///
/// Each live axis covers `[origin, origin + size)`. Axes past the rank are
/// held at origin 0, size 1 so two rectangles of the same rank compare equal
/// exactly when their live axes do.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect<S> {
    rank: Rank,
    origin: [S; MAX_RANK],
    size: [S; MAX_RANK],
}

pub type IntRect = Rect<i32>;
pub type RealRect = Rect<f64>;

impl Eq for Rect<i32> {}

impl<S: Coord> Rect<S> {
    fn unit(rank: Rank) -> Self {
        Self {
            rank,
            origin: [S::ZERO; MAX_RANK],
            size: [S::ONE; MAX_RANK],
        }
    }

    /// Build a rectangle from its leading origin and size components.
    /// Negative sizes are clamped to zero; missing components take origin 0, size 1.
    pub fn new(rank: Rank, origin: &[S], size: &[S]) -> Self {
        let mut rect = Self::unit(rank);
        for axis in 0..rank.dims() {
            if let Some(&value) = origin.get(axis) {
                rect.origin[axis] = value;
            }
            if let Some(&value) = size.get(axis) {
                rect.size[axis] = non_negative(value);
            }
        }
        rect
    }

    /// Smallest rectangle spanning two corner points
    pub fn from_corners(rank: Rank, a: &Point<S>, b: &Point<S>) -> Self {
        let mut rect = Self::unit(rank);
        for axis in 0..rank.dims() {
            let lo = smaller(a.get(axis), b.get(axis));
            let hi = larger(a.get(axis), b.get(axis));
            rect.origin[axis] = lo;
            rect.size[axis] = hi.saturating_sub(lo);
        }
        rect
    }

    pub fn rank(&self) -> Rank {
        self.rank
    }

    pub fn origin(&self) -> Point<S> {
        Point::new(self.rank, &self.origin)
    }

    pub fn sizes(&self) -> &[S] {
        &self.size[..self.rank.dims()]
    }

    pub fn size(&self, axis: usize) -> S {
        self.size[axis]
    }

    pub fn min(&self, axis: usize) -> S {
        self.origin[axis]
    }

    pub fn max(&self, axis: usize) -> S {
        self.origin[axis].saturating_add(self.size[axis])
    }

    pub fn is_empty(&self) -> bool {
        self.sizes().iter().any(|&size| non_negative(size) == S::ZERO)
    }

    pub fn contains_point(&self, point: &Point<S>) -> bool {
        let rank = self.rank.max(point.rank());
        let rect = self.with_rank(rank);
        !rect.is_empty()
            && (0..rank.dims()).all(|axis| {
                let value = point.get(axis);
                value >= rect.min(axis) && value < rect.max(axis)
            })
    }

    pub fn contains(&self, other: &Self) -> bool {
        let (a, b) = lift_pair(self, other);
        if a.is_empty() || b.is_empty() {
            return false;
        }
        (0..a.rank.dims()).all(|axis| b.min(axis) >= a.min(axis) && b.max(axis) <= a.max(axis))
    }

    pub fn intersects(&self, other: &Self) -> bool {
        let (a, b) = lift_pair(self, other);
        if a.is_empty() || b.is_empty() {
            return false;
        }
        (0..a.rank.dims()).all(|axis| b.min(axis) < a.max(axis) && b.max(axis) > a.min(axis))
    }

    /// Smallest rectangle covering both; an empty operand is ignored
    pub fn union(&self, other: &Self) -> Self {
        let (a, b) = lift_pair(self, other);
        if a.is_empty() {
            return b;
        }
        if b.is_empty() {
            return a;
        }

        let mut result = Self::unit(a.rank);
        for axis in 0..a.rank.dims() {
            let lo = smaller(a.min(axis), b.min(axis));
            let hi = larger(a.max(axis), b.max(axis));
            result.origin[axis] = lo;
            result.size[axis] = hi.saturating_sub(lo);
        }
        result
    }

    /// Overlap of both; disjoint axes collapse to size zero
    pub fn intersection(&self, other: &Self) -> Self {
        let (a, b) = lift_pair(self, other);
        let mut result = Self::unit(a.rank);
        for axis in 0..a.rank.dims() {
            let lo = larger(a.min(axis), b.min(axis));
            let hi = smaller(a.max(axis), b.max(axis));
            result.origin[axis] = lo;
            result.size[axis] = non_negative(hi.saturating_sub(lo));
        }
        result
    }

    /// Same rectangle at another rank: trailing axes are dropped when
    /// lowering and appended at origin 0, size 1 when raising
    pub fn with_rank(&self, rank: Rank) -> Self {
        let mut result = Self::unit(rank);
        let shared = rank.dims().min(self.rank.dims());
        result.origin[..shared].copy_from_slice(&self.origin[..shared]);
        result.size[..shared].copy_from_slice(&self.size[..shared]);
        result
    }

    pub fn project(&self) -> Option<Self> {
        self.rank.lower().map(|rank| self.with_rank(rank))
    }

    pub fn extend(&self) -> Option<Self> {
        self.rank.higher().map(|rank| self.with_rank(rank))
    }

    pub fn translate(&self, delta: &Point<S>) -> Self {
        let mut moved = *self;
        for axis in 0..self.rank.dims() {
            moved.origin[axis] = self.origin[axis].saturating_add(delta.get(axis));
        }
        moved
    }

    pub fn with_origin(&self, origin: &Point<S>) -> Self {
        let mut moved = *self;
        for axis in 0..self.rank.dims() {
            moved.origin[axis] = origin.get(axis);
        }
        moved
    }
}

fn lift_pair<S: Coord>(a: &Rect<S>, b: &Rect<S>) -> (Rect<S>, Rect<S>) {
    let rank = a.rank.max(b.rank);
    (a.with_rank(rank), b.with_rank(rank))
}

impl Rect<f64> {
    /// Integer rectangle enclosing this one (origin floored, far edge ceiled)
    pub fn to_integer(&self) -> IntRect {
        let mut result = IntRect::unit(self.rank);
        for axis in 0..self.rank.dims() {
            let lo = self.min(axis).floor();
            let hi = self.max(axis).ceil();
            result.origin[axis] = lo as i32;
            result.size[axis] = (hi - lo).max(0.0) as i32;
        }
        result
    }

    pub fn center(&self) -> RealPoint {
        let mut center = RealPoint::origin(self.rank);
        for axis in 0..self.rank.dims() {
            center.coords[axis] = self.origin[axis] + self.size[axis] / 2.0;
        }
        center
    }

    /// Product of the live sizes
    pub fn measure(&self) -> f64 {
        self.sizes().iter().product()
    }
}

impl Rect<i32> {
    pub fn to_floating(&self) -> RealRect {
        let mut result = RealRect::unit(self.rank);
        for axis in 0..self.rank.dims() {
            result.origin[axis] = f64::from(self.origin[axis]);
            result.size[axis] = f64::from(self.size[axis]);
        }
        result
    }

    /// Number of integer cells covered, saturating at `u64::MAX`
    pub fn volume(&self) -> u64 {
        (0..self.rank.dims())
            .try_fold(1u64, |acc, axis| acc.checked_mul(self.extent(axis) as u64))
            .unwrap_or(u64::MAX)
    }

    /// Number of integer positions along `axis`, stopping at `i32::MAX`
    pub fn extent(&self, axis: usize) -> usize {
        (i64::from(self.max(axis)) - i64::from(self.min(axis))).max(0) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect2(x: i32, y: i32, w: i32, h: i32) -> IntRect {
        IntRect::new(Rank::Two, &[x, y], &[w, h])
    }

    #[test]
    fn negative_size_is_clamped_to_empty() {
        let rect = rect2(3, 3, -4, 2);
        assert_eq!(rect.size(0), 0);
        assert!(rect.is_empty());
    }

    #[test]
    fn half_open_containment() {
        let rect = rect2(0, 0, 4, 4);
        assert!(rect.contains_point(&IntPoint::new(Rank::Two, &[0, 0])));
        assert!(rect.contains_point(&IntPoint::new(Rank::Two, &[3, 3])));
        assert!(!rect.contains_point(&IntPoint::new(Rank::Two, &[4, 0])));
        assert!(rect.contains(&rect2(1, 1, 3, 3)));
        assert!(!rect.contains(&rect2(1, 1, 4, 3)));
    }

    #[test]
    fn touching_rectangles_do_not_intersect() {
        let left = rect2(0, 0, 2, 2);
        let right = rect2(2, 0, 2, 2);
        assert!(!left.intersects(&right));
        assert!(left.intersection(&right).is_empty());
    }

    #[test]
    fn union_ignores_empty_operand() {
        let rect = rect2(1, 2, 3, 4);
        let empty = rect2(100, 100, 0, 0);
        assert_eq!(rect.union(&empty), rect);
        assert_eq!(empty.union(&rect), rect);
        assert_eq!(rect.union(&rect2(5, 0, 1, 1)), rect2(1, 0, 5, 6));
    }

    #[test]
    fn to_integer_rounds_outward() {
        let rect = RealRect::new(Rank::Three, &[0.5, -1.2, 2.0], &[1.0, 0.4, 1.0]);
        let int = rect.to_integer();
        assert_eq!(int, IntRect::new(Rank::Three, &[0, -2, 2], &[2, 2, 1]));
        assert!(int.to_floating().contains(&rect));
    }

    #[test]
    fn projection_drops_and_extension_appends_unit_axis() {
        let rect = IntRect::new(Rank::Five, &[1, 2, 3, 4, 5], &[6, 7, 8, 9, 10]);
        let projected = rect.project().unwrap();
        assert_eq!(projected.rank(), Rank::Four);
        assert_eq!(projected.sizes(), &[6, 7, 8, 9]);

        let restored = projected.extend().unwrap();
        assert_eq!(restored.origin().coords(), &[1, 2, 3, 4, 0]);
        assert_eq!(restored.sizes(), &[6, 7, 8, 9, 1]);
        assert!(rect2(0, 0, 1, 1).project().is_none());
    }

    #[test]
    fn mixed_rank_operands_are_lifted() {
        let plane = rect2(0, 0, 4, 4);
        let volume = IntRect::new(Rank::Three, &[1, 1, 0], &[2, 2, 1]);
        assert!(plane.contains(&volume));
        assert!(volume.intersects(&plane));

        let deeper = IntRect::new(Rank::Three, &[1, 1, 1], &[2, 2, 1]);
        assert!(!plane.intersects(&deeper));
    }

    #[test]
    fn corners_in_any_order() {
        let a = IntPoint::new(Rank::Two, &[5, 1]);
        let b = IntPoint::new(Rank::Two, &[2, 4]);
        assert_eq!(IntRect::from_corners(Rank::Two, &a, &b), rect2(2, 1, 3, 3));
        assert_eq!(IntRect::from_corners(Rank::Two, &b, &a), rect2(2, 1, 3, 3));

        // a missing Z coordinate reads as zero
        let deep = IntPoint::new(Rank::Three, &[0, 0, 6]);
        let rect = IntRect::from_corners(Rank::Three, &a, &deep);
        assert_eq!(rect, IntRect::new(Rank::Three, &[0, 0, 0], &[5, 1, 6]));
    }

    #[test]
    fn far_edges_saturate_instead_of_overflowing() {
        let edge = rect2(i32::MAX - 1, 0, 4, 4);
        assert_eq!(edge.max(0), i32::MAX);
        assert_eq!(edge.extent(0), 1);
        assert!(!edge.intersects(&rect2(0, 0, 4, 4)));
        assert!(edge.intersects(&rect2(i32::MAX - 2, 0, 2, 2)));
        assert_eq!(edge.union(&rect2(i32::MIN, 0, 1, 1)).size(0), i32::MAX);

        let huge = RealRect::new(Rank::Two, &[1e12, -1e12], &[5.0, 2e12]).to_integer();
        assert!(!huge.intersects(&rect2(0, 0, 4, 4)));
        assert!(huge.contains(&huge));
    }

    #[test]
    fn volume_saturates() {
        let rect = IntRect::new(Rank::Five, &[], &[65536, 65536, 65536, 65536, 2]);
        assert_eq!(rect.volume(), u64::MAX);
        assert_eq!(rect2(0, 0, 3, 4).volume(), 12);
    }

    #[test]
    fn nan_size_is_empty() {
        let rect = RealRect::new(Rank::Two, &[0.0, 0.0], &[f64::NAN, 2.0]);
        assert_eq!(rect.size(0), 0.0);
        assert!(rect.is_empty());
        assert!(!rect.intersects(&RealRect::new(Rank::Two, &[0.0, 0.0], &[1.0, 1.0])));
    }

    #[test]
    fn axes_follow_rank() {
        assert_eq!(Rank::Three.axes(), &[Axis::X, Axis::Y, Axis::Z]);
        assert_eq!(Rank::Five.axes().last(), Some(&Axis::C));
        let rect = IntRect::new(Rank::Four, &[0, 0, 0, 7], &[1, 1, 1, 2]);
        assert_eq!(rect.max(Axis::T.index()), 9);
    }

    #[test]
    fn with_origin_keeps_sizes() {
        let rect = rect2(1, 2, 3, 4);
        let moved = rect.with_origin(&IntPoint::new(Rank::Two, &[-5, 8]));
        assert_eq!(moved, rect2(-5, 8, 3, 4));
    }

    #[test]
    fn point_delta_round_trip() {
        let a = RealPoint::new(Rank::Three, &[1.0, 2.0, 3.0]);
        let b = RealPoint::new(Rank::Three, &[4.0, 0.0, 3.5]);
        assert_eq!(a.offset(&a.delta_to(&b)), b);
    }
}
