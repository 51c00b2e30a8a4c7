//! Sequential reduction kernel.
//!
//! Every strategy in this crate must agree with [`find_max_odd`] for every
//! input, so it doubles as the oracle in tests.

/// Flat integer encoding of "no odd value", kept for callers that cannot
/// carry an `Option`.
pub const SENTINEL: i32 = i32::MIN;

/// Odd in the parity sense; `-3 % 2 == -1`, so negatives work too.
#[inline]
pub fn is_odd(value: i32) -> bool {
    value % 2 != 0
}

/// Folds one element into a running maximum of odd values.
#[inline]
pub fn fold_odd(acc: Option<i32>, value: i32) -> Option<i32> {
    if is_odd(value) {
        Some(acc.map_or(value, |current| current.max(value)))
    } else {
        acc
    }
}

/// Returns the largest odd element of `data`, or `None` if there is none.
pub fn find_max_odd(data: &[i32]) -> Option<i32> {
    data.iter().copied().fold(None, fold_odd)
}

pub fn to_sentinel(result: Option<i32>) -> i32 {
    result.unwrap_or(SENTINEL)
}
