//! Counting functions

use super::criteria::Criterion;
use super::helpers::{flatten_args, lift_sequence};
use crate::error::FormulaResult;
use crate::evaluator::FunctionContext;
use mica_core::{CellValue, ErrorKind};

/// COUNTA(value1, ...) - count of values that are neither absent nor the
/// empty string
///
/// Unlike COUNT this counts text, logicals, and error values.
pub fn fn_counta(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let count = flatten_args(args)
        .iter()
        .filter(|v| !matches!(v, CellValue::Empty) && !matches!(v, CellValue::Text(s) if s.is_empty()))
        .count();
    Ok(CellValue::Number(count as f64))
}

/// COUNTIF(range, criteria) - count of range entries matching the criterion
///
/// A scalar first argument is lifted to a one-element sequence.
pub fn fn_countif(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    if args.len() != 2 {
        return Ok(CellValue::error(
            ErrorKind::Value,
            "COUNTIF expects 2 arguments",
        ));
    }

    let range = lift_sequence(&args[0]);
    let criterion = Criterion::parse(&args[1]);

    let count = range.iter().filter(|v| criterion.matches(v)).count();
    Ok(CellValue::Number(count as f64))
}
