//! Logical and comparison functions

use super::helpers::{compare, equals, flatten_args};
use crate::error::FormulaResult;
use crate::evaluator::FunctionContext;
use mica_core::{CellValue, ErrorKind};
use std::cmp::Ordering;

/// IF(condition, if_true, if_false)
pub fn fn_if(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let [condition, if_true, if_false] = args else {
        return Ok(CellValue::error(ErrorKind::Value, "IF expects 3 arguments"));
    };
    if condition.truthy() {
        Ok(if_true.clone())
    } else {
        Ok(if_false.clone())
    }
}

/// AND(value1, ...) - true when every flattened argument is truthy
pub fn fn_and(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    Ok(CellValue::Bool(
        flatten_args(args).iter().all(|v| v.truthy()),
    ))
}

/// OR(value1, ...) - true when any flattened argument is truthy
pub fn fn_or(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    Ok(CellValue::Bool(
        flatten_args(args).iter().any(|v| v.truthy()),
    ))
}

/// NOT(value)
pub fn fn_not(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let [value] = args else {
        return Ok(CellValue::error(ErrorKind::Value, "NOT expects 1 argument"));
    };
    Ok(CellValue::Bool(!value.truthy()))
}

/// IFERROR(value, value_if_error)
pub fn fn_iferror(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let [value, fallback] = args else {
        return Ok(CellValue::error(
            ErrorKind::Value,
            "IFERROR expects 2 arguments",
        ));
    };
    if value.is_error() {
        Ok(fallback.clone())
    } else {
        Ok(value.clone())
    }
}

fn comparison_args(args: &[CellValue], name: &str) -> Result<(CellValue, CellValue), CellValue> {
    match args {
        [a, b] => Ok((a.clone(), b.clone())),
        _ => Err(CellValue::error(
            ErrorKind::Value,
            format!("{} expects 2 arguments", name),
        )),
    }
}

/// EQ(a, b)
pub fn fn_eq(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    match comparison_args(args, "EQ") {
        Ok((a, b)) => Ok(CellValue::Bool(equals(&a, &b))),
        Err(e) => Ok(e),
    }
}

/// NE(a, b)
pub fn fn_ne(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    match comparison_args(args, "NE") {
        Ok((a, b)) => Ok(CellValue::Bool(!equals(&a, &b))),
        Err(e) => Ok(e),
    }
}

/// GT(a, b)
pub fn fn_gt(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    match comparison_args(args, "GT") {
        Ok((a, b)) => Ok(CellValue::Bool(compare(&a, &b) == Ordering::Greater)),
        Err(e) => Ok(e),
    }
}

/// GTE(a, b)
pub fn fn_gte(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    match comparison_args(args, "GTE") {
        Ok((a, b)) => Ok(CellValue::Bool(compare(&a, &b) != Ordering::Less)),
        Err(e) => Ok(e),
    }
}

/// LT(a, b)
pub fn fn_lt(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    match comparison_args(args, "LT") {
        Ok((a, b)) => Ok(CellValue::Bool(compare(&a, &b) == Ordering::Less)),
        Err(e) => Ok(e),
    }
}

/// LTE(a, b)
pub fn fn_lte(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    match comparison_args(args, "LTE") {
        Ok((a, b)) => Ok(CellValue::Bool(compare(&a, &b) != Ordering::Greater)),
        Err(e) => Ok(e),
    }
}
