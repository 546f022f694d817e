use std::cmp::Ordering;

/// Orders two values largest first with NaN after every number.
///
/// Infinities keep their numeric place, so `+inf` leads and `-inf` comes just before NaN.
pub fn descending_nan_last(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
    }
}
