use log::trace;

use crate::rect::Rank;
use crate::traits::Roi;

/// Operand that answers a cross-rank comparison
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Owner {
    Lhs,
    Rhs,
}

/// Who owns a comparison and the rank both operands are compared at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub owner: Owner,
    pub rank: Rank,
}

const fn at(owner: Owner, rank: Rank) -> Resolution {
    Resolution { owner, rank }
}

// Rows: lhs rank 2..=5, columns: rhs rank 2..=5.
// The higher rank owns; ties stay with the left operand.
const TABLE: [[Resolution; 4]; 4] = [
    [
        at(Owner::Lhs, Rank::Two),
        at(Owner::Rhs, Rank::Three),
        at(Owner::Rhs, Rank::Four),
        at(Owner::Rhs, Rank::Five),
    ],
    [
        at(Owner::Lhs, Rank::Three),
        at(Owner::Lhs, Rank::Three),
        at(Owner::Rhs, Rank::Four),
        at(Owner::Rhs, Rank::Five),
    ],
    [
        at(Owner::Lhs, Rank::Four),
        at(Owner::Lhs, Rank::Four),
        at(Owner::Lhs, Rank::Four),
        at(Owner::Rhs, Rank::Five),
    ],
    [
        at(Owner::Lhs, Rank::Five),
        at(Owner::Lhs, Rank::Five),
        at(Owner::Lhs, Rank::Five),
        at(Owner::Lhs, Rank::Five),
    ],
];

pub fn resolve(lhs: Rank, rhs: Rank) -> Resolution {
    TABLE[lhs.index()][rhs.index()]
}

/// Does `lhs` contain `rhs`?
///
/// The owner's exact hook answers first. Otherwise both exclusive masks are
/// lifted to the resolved rank and compared cell by cell.
pub fn contains(lhs: &dyn Roi, rhs: &dyn Roi) -> bool {
    let resolution = resolve(lhs.rank(), rhs.rank());
    let exact = match resolution.owner {
        Owner::Lhs => lhs.exact_contains(rhs),
        Owner::Rhs => rhs.exact_within(lhs),
    };
    if let Some(answer) = exact {
        trace!(
            "contains({}, {}) answered exactly by {:?}",
            lhs.id().value(),
            rhs.id().value(),
            resolution.owner
        );
        return answer;
    }

    let outer = lhs.boolean_mask(false).lift_to(resolution.rank);
    let inner = rhs.boolean_mask(false).lift_to(resolution.rank);
    outer.contains(&inner)
}

/// Do `lhs` and `rhs` share at least one cell?
pub fn intersects(lhs: &dyn Roi, rhs: &dyn Roi) -> bool {
    let resolution = resolve(lhs.rank(), rhs.rank());
    let (owner, other) = match resolution.owner {
        Owner::Lhs => (lhs, rhs),
        Owner::Rhs => (rhs, lhs),
    };
    if let Some(answer) = owner.exact_intersects(other) {
        trace!(
            "intersects({}, {}) answered exactly by {:?}",
            lhs.id().value(),
            rhs.id().value(),
            resolution.owner
        );
        return answer;
    }

    let mine = owner.boolean_mask(true).lift_to(resolution.rank);
    let theirs = other.boolean_mask(true).lift_to(resolution.rank);
    mine.intersects(&theirs)
}
