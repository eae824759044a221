//! Merge strategies shared by every payload operation.
//!
//! Two behaviors build on one ordering comparison:
//!
//! - latest-wins: pick a whole payload by ordering value alone;
//! - patch: pick per field, where a present value beats a null one and the
//!   ordering value only breaks ties between two present values.

use std::cmp::Ordering;

use upsert_types::OrderingValue;

/// Which argument of a two-payload merge was chosen.
///
/// `Current` is the payload the merge was invoked on, `Other` its argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Current,
    Other,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Current => write!(f, "current"),
            Self::Other => write!(f, "other"),
        }
    }
}

/// Returns `true` if `candidate` is strictly newer than `baseline`.
///
/// Equal ordering values are never newer; each strategy decides its own tie.
pub fn is_strictly_newer(candidate: &OrderingValue, baseline: &OrderingValue) -> bool {
    candidate.is_after(baseline)
}

/// Ordering-only choice: `Other` wins only when strictly newer, ties keep
/// `Current`.
pub fn latest_wins(current: &OrderingValue, other: &OrderingValue) -> Side {
    if is_strictly_newer(other, current) {
        Side::Other
    } else {
        Side::Current
    }
}

/// Sort key that puts the higher ordering value first.
pub fn newest_first(current: &OrderingValue, other: &OrderingValue) -> Ordering {
    other.cmp(current)
}

/// Field-level tie-break.
///
/// Presence beats recency; recency only decides between two present values.
pub fn merge_value<T>(left: Option<T>, right: Option<T>, choose_left: bool) -> Option<T> {
    match (left, right) {
        (Some(l), Some(r)) => Some(if choose_left { l } else { r }),
        (Some(v), None) | (None, Some(v)) => Some(v),
        (None, None) => None,
    }
}
