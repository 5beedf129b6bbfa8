//! Shared helpers for the built-in function library

use mica_core::CellValue;
use std::cmp::Ordering;

/// Flatten arguments one level: list elements are spliced in, scalars kept
///
/// Depth-1 is deliberate: the evaluator hands a range to a function as a
/// single flat sequence argument, so one level is all there is to open up.
/// Nested lists (host-written tables) stay intact.
pub fn flatten_args(args: &[CellValue]) -> Vec<CellValue> {
    let mut out = Vec::with_capacity(args.len());
    for arg in args {
        match arg {
            CellValue::List(items) => out.extend(items.iter().cloned()),
            other => out.push(other.clone()),
        }
    }
    out
}

/// Lift a single value into a sequence; a list yields its elements
pub fn lift_sequence(value: &CellValue) -> Vec<CellValue> {
    match value {
        CellValue::List(items) => items.clone(),
        other => vec![other.clone()],
    }
}

/// Collect the numeric view of a value sequence
///
/// Finite numbers are kept; non-empty strings go through the permissive
/// numeric parser and are kept when finite. Everything else, logicals
/// included, is dropped silently.
pub fn to_number_array(values: &[CellValue]) -> Vec<f64> {
    values
        .iter()
        .filter_map(|v| v.as_number())
        .filter(|n| n.is_finite())
        .collect()
}

/// Ordering used by comparisons and lookups
///
/// Numbers compare numerically; anything else compares by string form,
/// lexicographically. Equal inputs compare equal.
pub fn compare(a: &CellValue, b: &CellValue) -> Ordering {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        _ => a.display_string().cmp(&b.display_string()),
    }
}

/// Identity on equal numbers, strings, and logicals; false otherwise
pub fn equals(a: &CellValue, b: &CellValue) -> bool {
    match (a, b) {
        (CellValue::Number(x), CellValue::Number(y)) => x == y,
        (CellValue::Text(x), CellValue::Text(y)) => x == y,
        (CellValue::Bool(x), CellValue::Bool(y)) => x == y,
        _ => false,
    }
}
