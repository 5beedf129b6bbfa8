//! Lookup functions
//!
//! Tables arrive as list values: either the flat sequence a range evaluates
//! to, or a host-written nested list stored directly in a cell (rows as
//! inner lists). These functions never read the workbook; they operate on
//! the materialized values they are handed.

use super::helpers::{compare, equals, lift_sequence};
use crate::error::FormulaResult;
use crate::evaluator::FunctionContext;
use mica_core::{CellValue, ErrorKind};
use std::cmp::Ordering;

fn to_index(value: &CellValue) -> Option<i64> {
    value.as_number().map(|n| n.trunc() as i64)
}

/// MATCH(lookup_value, lookup_array, [match_type])
///
/// match_type 0 is an exact match; 1 (the default) finds the position of the
/// largest value <= the target assuming ascending order; -1 finds the
/// smallest value >= the target assuming descending order. The result is a
/// 1-based position; no match is `#N/A` and an unknown type is `#VALUE!`.
///
/// The approximate modes assume sorted input; behavior on unsorted input is
/// the caller's responsibility.
pub fn fn_match(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    if args.len() < 2 || args.len() > 3 {
        return Ok(CellValue::error(
            ErrorKind::Value,
            "MATCH expects 2 or 3 arguments",
        ));
    }

    let target = &args[0];
    let candidates = lift_sequence(&args[1]);

    let match_type = match args.get(2) {
        None => 1,
        Some(v) => match to_index(v) {
            Some(t) => t,
            None => {
                return Ok(CellValue::error(
                    ErrorKind::Value,
                    "MATCH type must be -1, 0, or 1",
                ))
            }
        },
    };

    let position = match match_type {
        0 => candidates.iter().position(|v| equals(v, target)),
        1 => {
            // Largest value <= target, assuming ascending order
            let mut best = None;
            for (i, v) in candidates.iter().enumerate() {
                if compare(v, target) != Ordering::Greater {
                    best = Some(i);
                }
            }
            best
        }
        -1 => {
            // Smallest value >= target, assuming descending order
            let mut best = None;
            for (i, v) in candidates.iter().enumerate() {
                if compare(v, target) != Ordering::Less {
                    best = Some(i);
                }
            }
            best
        }
        _ => {
            return Ok(CellValue::error(
                ErrorKind::Value,
                "MATCH type must be -1, 0, or 1",
            ))
        }
    };

    match position {
        Some(i) => Ok(CellValue::Number((i + 1) as f64)),
        None => Ok(CellValue::error(
            ErrorKind::Na,
            format!("no match for {}", target.display_string()),
        )),
    }
}

/// INDEX(array, row_num, [column_num])
///
/// A list of lists indexes as `[row-1][col-1]`; a flat list as `[row-1]`.
/// Out-of-bounds indices are `#REF!`; a non-list first argument is `#VALUE!`.
pub fn fn_index(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    if args.len() < 2 || args.len() > 3 {
        return Ok(CellValue::error(
            ErrorKind::Value,
            "INDEX expects 2 or 3 arguments",
        ));
    }

    let CellValue::List(items) = &args[0] else {
        return Ok(CellValue::error(ErrorKind::Value, "INDEX expects an array"));
    };

    let Some(row) = to_index(&args[1]) else {
        return Ok(CellValue::error(
            ErrorKind::Value,
            "INDEX row must be a number",
        ));
    };
    if row < 1 || row as usize > items.len() {
        return Ok(CellValue::error(
            ErrorKind::Ref,
            format!("row {} out of bounds", row),
        ));
    }

    let entry = &items[(row - 1) as usize];

    match entry {
        CellValue::List(row_items) => {
            let col = match args.get(2) {
                Some(v) => match to_index(v) {
                    Some(c) => c,
                    None => {
                        return Ok(CellValue::error(
                            ErrorKind::Value,
                            "INDEX column must be a number",
                        ))
                    }
                },
                None => 1,
            };
            if col < 1 || col as usize > row_items.len() {
                return Ok(CellValue::error(
                    ErrorKind::Ref,
                    format!("column {} out of bounds", col),
                ));
            }
            Ok(row_items[(col - 1) as usize].clone())
        }
        scalar => Ok(scalar.clone()),
    }
}

/// VLOOKUP(lookup_value, table, col_index, [sorted])
///
/// The table is a sequence of rows; a flat sequence is promoted to
/// single-column rows. Sorted mode (the default) picks the last row whose
/// first-column value compares <= the target; exact mode picks the first
/// row whose first-column value equals it. No matching row is `#N/A`, a bad
/// column argument is `#VALUE!`, and a column index past the matched row is
/// `#REF!`.
pub fn fn_vlookup(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    if args.len() < 3 || args.len() > 4 {
        return Ok(CellValue::error(
            ErrorKind::Value,
            "VLOOKUP expects 3 or 4 arguments",
        ));
    }

    let target = &args[0];

    let CellValue::List(items) = &args[1] else {
        return Ok(CellValue::error(ErrorKind::Value, "VLOOKUP expects a table"));
    };
    let rows: Vec<Vec<CellValue>> = items
        .iter()
        .map(|item| match item {
            CellValue::List(row) => row.clone(),
            scalar => vec![scalar.clone()],
        })
        .collect();

    let col = match to_index(&args[2]) {
        Some(c) if c >= 1 => c as usize,
        _ => {
            return Ok(CellValue::error(
                ErrorKind::Value,
                "VLOOKUP column must be a positive number",
            ))
        }
    };

    let sorted = match args.get(3) {
        Some(v) => v.truthy(),
        None => true,
    };

    let matched = if sorted {
        let mut best = None;
        for row in &rows {
            let first = row.first().unwrap_or(&CellValue::Empty);
            if compare(first, target) != Ordering::Greater {
                best = Some(row);
            }
        }
        best
    } else {
        rows.iter()
            .find(|row| equals(row.first().unwrap_or(&CellValue::Empty), target))
    };

    let Some(row) = matched else {
        return Ok(CellValue::error(
            ErrorKind::Na,
            format!("no row matches {}", target.display_string()),
        ));
    };

    match row.get(col - 1) {
        Some(value) => Ok(value.clone()),
        None => Ok(CellValue::error(
            ErrorKind::Ref,
            format!("column {} out of row", col),
        )),
    }
}
