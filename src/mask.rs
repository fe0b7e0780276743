use log::trace;

use crate::error::{Result, RoiError};
use crate::rect::{IntPoint, IntRect, Rank, MAX_RANK};

/// Dense membership map over an integer rectangle.
///
/// A rank-2 mask stores its cells row-major (X fastest). Higher ranks hold one
/// child mask per coordinate of their last axis, each covering the parent's
/// bounds projected one rank down.
#[derive(Debug, Clone, PartialEq)]
pub struct BooleanMask {
    bounds: IntRect,
    cells: Cells,
}

#[derive(Debug, Clone, PartialEq)]
enum Cells {
    Plane(Vec<bool>),
    Slices(Vec<BooleanMask>),
}

fn plane_len(bounds: &IntRect) -> usize {
    bounds.extent(0) * bounds.extent(1)
}

impl BooleanMask {
    /// Mask with no cell set
    pub fn empty(bounds: IntRect) -> Self {
        match bounds.rank().lower() {
            None => Self {
                bounds,
                cells: Cells::Plane(vec![false; plane_len(&bounds)]),
            },
            Some(lower) => {
                let child = bounds.with_rank(lower);
                let depth = bounds.extent(bounds.rank().last_axis());
                Self {
                    bounds,
                    cells: Cells::Slices((0..depth).map(|_| Self::empty(child)).collect()),
                }
            }
        }
    }

    /// Rank-2 mask from row-major cells
    pub fn from_plane(bounds: IntRect, cells: Vec<bool>) -> Result<Self> {
        if bounds.rank() != Rank::Two {
            return Err(RoiError::RankMismatch {
                expected: 2,
                found: bounds.rank().dims(),
            });
        }

        let expected = plane_len(&bounds);
        if cells.len() != expected {
            return Err(RoiError::PlaneLength {
                expected,
                found: cells.len(),
            });
        }

        Ok(Self {
            bounds,
            cells: Cells::Plane(cells),
        })
    }

    /// Stack one child mask per coordinate of the last axis of `bounds`.
    /// Children whose bounds differ from the projected parent are refit onto it.
    pub fn from_slices(bounds: IntRect, slices: Vec<BooleanMask>) -> Result<Self> {
        let lower = bounds.rank().lower().ok_or(RoiError::RankMismatch {
            expected: 3,
            found: 2,
        })?;

        let expected = bounds.extent(bounds.rank().last_axis());
        if slices.len() != expected {
            return Err(RoiError::SliceCount {
                expected,
                found: slices.len(),
            });
        }

        let child_bounds = bounds.with_rank(lower);
        let mut fitted = Vec::with_capacity(expected);
        for slice in slices {
            if slice.rank() != lower {
                return Err(RoiError::RankMismatch {
                    expected: lower.dims(),
                    found: slice.rank().dims(),
                });
            }
            if slice.bounds == child_bounds {
                fitted.push(slice);
            } else {
                fitted.push(slice.fit_to(&child_bounds));
            }
        }

        Ok(Self {
            bounds,
            cells: Cells::Slices(fitted),
        })
    }

    /// Mask whose cells are set where `f` answers true
    pub fn from_fn<F>(bounds: IntRect, mut f: F) -> Self
    where
        F: FnMut(&IntPoint) -> bool,
    {
        let full = bounds.rank();
        Self::fill(bounds, full, &mut [0; MAX_RANK], &mut f)
    }

    fn fill<F>(bounds: IntRect, full: Rank, coords: &mut [i32; MAX_RANK], f: &mut F) -> Self
    where
        F: FnMut(&IntPoint) -> bool,
    {
        match bounds.rank().lower() {
            None => {
                let mut cells = Vec::with_capacity(plane_len(&bounds));
                for y in bounds.min(1)..bounds.max(1) {
                    for x in bounds.min(0)..bounds.max(0) {
                        coords[0] = x;
                        coords[1] = y;
                        cells.push(f(&IntPoint::new(full, &coords[..])));
                    }
                }
                Self {
                    bounds,
                    cells: Cells::Plane(cells),
                }
            }
            Some(lower) => {
                let axis = bounds.rank().last_axis();
                let child = bounds.with_rank(lower);
                let mut slices = Vec::with_capacity(bounds.extent(axis));
                for k in bounds.min(axis)..bounds.max(axis) {
                    coords[axis] = k;
                    slices.push(Self::fill(child, full, coords, f));
                }
                Self {
                    bounds,
                    cells: Cells::Slices(slices),
                }
            }
        }
    }

    pub fn rank(&self) -> Rank {
        self.bounds.rank()
    }

    pub fn bounds(&self) -> &IntRect {
        &self.bounds
    }

    /// Child mask at absolute coordinate `coord` of the last axis
    pub fn slice(&self, coord: i32) -> Option<&BooleanMask> {
        match &self.cells {
            Cells::Plane(_) => None,
            Cells::Slices(slices) => {
                let offset = i64::from(coord) - i64::from(self.bounds.min(self.rank().last_axis()));
                usize::try_from(offset).ok().and_then(|index| slices.get(index))
            }
        }
    }

    /// Child masks paired with their absolute last-axis coordinate
    pub fn slices(&self) -> impl Iterator<Item = (i32, &BooleanMask)> {
        let list: &[BooleanMask] = match &self.cells {
            Cells::Slices(slices) => slices,
            Cells::Plane(_) => &[],
        };
        let origin = self.bounds.min(self.rank().last_axis());
        list.iter()
            .enumerate()
            .map(move |(k, mask)| (origin + k as i32, mask))
    }

    pub fn get(&self, point: &IntPoint) -> bool {
        match &self.cells {
            Cells::Plane(_) => self.plane_get(point.get(0), point.get(1)),
            Cells::Slices(_) => self
                .slice(point.get(self.rank().last_axis()))
                .map_or(false, |slice| slice.get(point)),
        }
    }

    fn plane_index(&self, x: i32, y: i32) -> Option<usize> {
        let dx = i64::from(x) - i64::from(self.bounds.min(0));
        let dy = i64::from(y) - i64::from(self.bounds.min(1));
        let width = self.bounds.extent(0) as i64;
        let height = self.bounds.extent(1) as i64;
        if dx < 0 || dy < 0 || dx >= width || dy >= height {
            return None;
        }
        Some((dy * width + dx) as usize)
    }

    fn plane_get(&self, x: i32, y: i32) -> bool {
        match &self.cells {
            Cells::Plane(cells) => self.plane_index(x, y).map_or(false, |i| cells[i]),
            Cells::Slices(_) => false,
        }
    }

    /// Number of set cells
    pub fn cardinality(&self) -> usize {
        match &self.cells {
            Cells::Plane(cells) => cells.iter().filter(|&&set| set).count(),
            Cells::Slices(slices) => slices.iter().map(BooleanMask::cardinality).sum(),
        }
    }

    /// True when no cell is set
    pub fn is_empty(&self) -> bool {
        match &self.cells {
            Cells::Plane(cells) => !cells.iter().any(|&set| set),
            Cells::Slices(slices) => slices.iter().all(BooleanMask::is_empty),
        }
    }

    /// Tightest rectangle around the set cells, empty at the mask origin when none is set
    pub fn optimized_bounds(&self) -> IntRect {
        let rank = self.rank();
        let dims = rank.dims();
        let mut lo = [i32::MAX; MAX_RANK];
        let mut hi = [i32::MIN; MAX_RANK];
        let mut found = false;

        self.walk(rank, &mut [0; MAX_RANK], false, &mut |point| {
            found = true;
            for axis in 0..dims {
                lo[axis] = lo[axis].min(point.get(axis));
                hi[axis] = hi[axis].max(point.get(axis) + 1);
            }
        });

        if !found {
            return IntRect::new(rank, self.bounds.origin().coords(), &[0; MAX_RANK]);
        }

        let mut size = [0; MAX_RANK];
        for axis in 0..dims {
            size[axis] = hi[axis].saturating_sub(lo[axis]);
        }
        IntRect::new(rank, &lo, &size)
    }

    /// The same cells expressed over `bounds`; cells outside this mask read as unset.
    /// A lower-rank mask is lifted first, so the result has the higher of the two ranks.
    pub fn fit_to(&self, bounds: &IntRect) -> Self {
        let rank = self.rank().max(bounds.rank());
        if self.rank() != rank {
            return self.lift_to(rank).fit_to(&bounds.with_rank(rank));
        }
        Self::from_fn(bounds.with_rank(rank), |point| self.get(point))
    }

    /// Wrap into unit-extent masks at offset 0 until `rank` is reached.
    /// Never lowers the rank.
    pub fn lift_to(&self, rank: Rank) -> Self {
        let mut mask = self.clone();
        while mask.rank() < rank {
            let Some(higher) = mask.rank().higher() else {
                break;
            };
            let bounds = mask.bounds.with_rank(higher);
            mask = Self {
                bounds,
                cells: Cells::Slices(vec![mask]),
            };
        }
        mask
    }

    /// True when every set cell of `other` is also set here.
    /// Always false when either rectangle is empty.
    pub fn contains(&self, other: &BooleanMask) -> bool {
        if self.bounds.is_empty() || other.bounds.is_empty() {
            return false;
        }
        if self.rank() != other.rank() {
            let rank = self.rank().max(other.rank());
            return self.lift_to(rank).covers(&other.lift_to(rank));
        }
        self.covers(other)
    }

    fn covers(&self, other: &BooleanMask) -> bool {
        match (&self.cells, &other.cells) {
            (Cells::Plane(_), Cells::Plane(_)) => {
                let mut covered = true;
                other.walk(Rank::Two, &mut [0; MAX_RANK], false, &mut |point| {
                    covered &= self.plane_get(point.get(0), point.get(1));
                });
                covered
            }
            (Cells::Slices(_), Cells::Slices(_)) => other.slices().all(|(k, theirs)| match self.slice(k) {
                Some(mine) => mine.covers(theirs),
                None => theirs.is_empty(),
            }),
            _ => false,
        }
    }

    /// True when at least one cell is set in both masks
    pub fn intersects(&self, other: &BooleanMask) -> bool {
        if self.rank() != other.rank() {
            let rank = self.rank().max(other.rank());
            return self.lift_to(rank).intersects(&other.lift_to(rank));
        }
        if !self.bounds.intersects(&other.bounds) {
            return false;
        }
        self.overlaps(other)
    }

    fn overlaps(&self, other: &BooleanMask) -> bool {
        match (&self.cells, &other.cells) {
            (Cells::Plane(_), Cells::Plane(_)) => {
                let overlap = self.bounds.intersection(&other.bounds);
                (overlap.min(1)..overlap.max(1)).any(|y| {
                    (overlap.min(0)..overlap.max(0))
                        .any(|x| self.plane_get(x, y) && other.plane_get(x, y))
                })
            }
            (Cells::Slices(_), Cells::Slices(_)) => other.slices().any(|(k, theirs)| {
                self.slice(k).map_or(false, |mine| mine.overlaps(theirs))
            }),
            _ => false,
        }
    }

    /// Every set cell, last axis slowest and X fastest
    pub fn points(&self) -> Vec<IntPoint> {
        let mut points = Vec::with_capacity(self.cardinality());
        self.walk(self.rank(), &mut [0; MAX_RANK], false, &mut |point| {
            points.push(*point)
        });
        points
    }

    /// Set cells with at least one unset or out-of-bounds 4-neighbour in their plane
    pub fn contour_points(&self) -> Vec<IntPoint> {
        let mut points = Vec::new();
        self.walk(self.rank(), &mut [0; MAX_RANK], true, &mut |point| {
            points.push(*point)
        });
        trace!(
            "contour of rank-{} mask: {} points",
            self.rank().dims(),
            points.len()
        );
        points
    }

    fn walk<F>(&self, full: Rank, coords: &mut [i32; MAX_RANK], contour_only: bool, f: &mut F)
    where
        F: FnMut(&IntPoint),
    {
        match &self.cells {
            Cells::Plane(cells) => {
                let width = self.bounds.extent(0);
                let (x0, y0) = (self.bounds.min(0), self.bounds.min(1));
                for (i, _) in cells.iter().enumerate().filter(|(_, set)| **set) {
                    let x = x0 + (i % width) as i32;
                    let y = y0 + (i / width) as i32;
                    if contour_only && !self.on_edge(x, y) {
                        continue;
                    }
                    coords[0] = x;
                    coords[1] = y;
                    f(&IntPoint::new(full, &coords[..]));
                }
            }
            Cells::Slices(slices) => {
                let axis = self.rank().last_axis();
                let origin = self.bounds.min(axis);
                for (k, slice) in slices.iter().enumerate() {
                    coords[axis] = origin + k as i32;
                    slice.walk(full, coords, contour_only, f);
                }
            }
        }
    }

    fn on_edge(&self, x: i32, y: i32) -> bool {
        // a neighbour past the i32 range is outside the plane
        [
            x.checked_sub(1).map(|nx| (nx, y)),
            x.checked_add(1).map(|nx| (nx, y)),
            y.checked_sub(1).map(|ny| (x, ny)),
            y.checked_add(1).map(|ny| (x, ny)),
        ]
        .iter()
        .any(|neighbour| neighbour.map_or(true, |(nx, ny)| !self.plane_get(nx, ny)))
    }
}
