//! Numeric aggregate and math functions

use super::criteria::Criterion;
use super::helpers::{flatten_args, lift_sequence, to_number_array};
use crate::error::FormulaResult;
use crate::evaluator::FunctionContext;
use mica_core::{CellValue, ErrorKind};

/// SUM(value1, ...) - flatten, coerce to numbers, add; empty set is 0
pub fn fn_sum(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let numbers = to_number_array(&flatten_args(args));
    Ok(CellValue::Number(numbers.iter().sum()))
}

/// AVERAGE(value1, ...) - mean of the coerced numbers; empty set is 0
pub fn fn_average(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let numbers = to_number_array(&flatten_args(args));
    if numbers.is_empty() {
        return Ok(CellValue::Number(0.0));
    }
    let sum: f64 = numbers.iter().sum();
    Ok(CellValue::Number(sum / numbers.len() as f64))
}

/// MIN(value1, ...) - smallest coerced number; empty set is 0
pub fn fn_min(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let numbers = to_number_array(&flatten_args(args));
    Ok(CellValue::Number(
        numbers.iter().copied().reduce(f64::min).unwrap_or(0.0),
    ))
}

/// MAX(value1, ...) - largest coerced number; empty set is 0
pub fn fn_max(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let numbers = to_number_array(&flatten_args(args));
    Ok(CellValue::Number(
        numbers.iter().copied().reduce(f64::max).unwrap_or(0.0),
    ))
}

/// COUNT(value1, ...) - count of finite numeric values
///
/// Strings are not coerced here, unlike the numeric aggregates above.
pub fn fn_count(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let count = flatten_args(args)
        .iter()
        .filter(|v| matches!(v, CellValue::Number(n) if n.is_finite()))
        .count();
    Ok(CellValue::Number(count as f64))
}

/// ABS(number)
pub fn fn_abs(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let [value] = args else {
        return Ok(CellValue::error(ErrorKind::Value, "ABS expects 1 argument"));
    };
    match value.as_number() {
        Some(n) if n.is_finite() => Ok(CellValue::Number(n.abs())),
        _ => Ok(CellValue::error(ErrorKind::Value, "ABS expects a number")),
    }
}

/// ROUND(number, [digits]) - half away from zero
pub fn fn_round(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    if args.is_empty() || args.len() > 2 {
        return Ok(CellValue::error(
            ErrorKind::Value,
            "ROUND expects 1 or 2 arguments",
        ));
    }
    let Some(n) = args[0].as_number().filter(|n| n.is_finite()) else {
        return Ok(CellValue::error(ErrorKind::Value, "ROUND expects a number"));
    };
    let digits = match args.get(1) {
        Some(v) => match v.as_number() {
            Some(d) if d.is_finite() => d.trunc() as i32,
            _ => {
                return Ok(CellValue::error(
                    ErrorKind::Value,
                    "ROUND digits must be a number",
                ))
            }
        },
        None => 0,
    };
    let factor = 10f64.powi(digits);
    Ok(CellValue::Number((n * factor).round() / factor))
}

/// SUMIF(range, criteria, [sum_range])
///
/// Counts matches in `range` and sums the parallel entries of `sum_range`
/// (defaulting to `range` itself). Only finite numbers contribute to the sum.
pub fn fn_sumif(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    if args.len() < 2 || args.len() > 3 {
        return Ok(CellValue::error(
            ErrorKind::Value,
            "SUMIF expects 2 or 3 arguments",
        ));
    }

    let range = lift_sequence(&args[0]);
    let criterion = Criterion::parse(&args[1]);
    let sum_range = match args.get(2) {
        Some(v) => lift_sequence(v),
        None => range.clone(),
    };

    let mut sum = 0.0;
    for (i, candidate) in range.iter().enumerate() {
        if criterion.matches(candidate) {
            if let Some(CellValue::Number(n)) = sum_range.get(i) {
                if n.is_finite() {
                    sum += n;
                }
            }
        }
    }

    Ok(CellValue::Number(sum))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::FunctionRegistry;
    use mica_core::Workbook;

    fn ctx_call(
        f: fn(&[CellValue], &FunctionContext) -> FormulaResult<CellValue>,
        args: &[CellValue],
    ) -> CellValue {
        let workbook = Workbook::new();
        let registry = FunctionRegistry::empty();
        let ctx = FunctionContext {
            workbook: &workbook,
            sheet: "S",
            registry: &registry,
        };
        f(args, &ctx).unwrap()
    }

    fn nums(values: &[f64]) -> CellValue {
        CellValue::List(values.iter().map(|n| CellValue::Number(*n)).collect())
    }

    #[test]
    fn test_sum() {
        assert_eq!(
            ctx_call(fn_sum, &[1.into(), 2.into(), 3.into()]),
            CellValue::Number(6.0)
        );
        assert_eq!(ctx_call(fn_sum, &[nums(&[1.0, 2.0, 3.0])]), CellValue::Number(6.0));
        // Numeric strings coerce, logicals and errors are dropped
        assert_eq!(
            ctx_call(
                fn_sum,
                &[
                    CellValue::Text("2".into()),
                    CellValue::Bool(true),
                    CellValue::error(ErrorKind::Na, "x"),
                    3.into(),
                ]
            ),
            CellValue::Number(5.0)
        );
        // Empty set sums to 0
        assert_eq!(ctx_call(fn_sum, &[]), CellValue::Number(0.0));
    }

    #[test]
    fn test_average() {
        assert_eq!(
            ctx_call(fn_average, &[nums(&[1.0, 2.0, 3.0])]),
            CellValue::Number(2.0)
        );
        assert_eq!(ctx_call(fn_average, &[]), CellValue::Number(0.0));
        assert_eq!(
            ctx_call(fn_average, &[CellValue::Text("x".into())]),
            CellValue::Number(0.0)
        );
    }

    #[test]
    fn test_min_max() {
        assert_eq!(
            ctx_call(fn_min, &[nums(&[5.0, 2.0, 8.0])]),
            CellValue::Number(2.0)
        );
        assert_eq!(
            ctx_call(fn_max, &[nums(&[5.0, 2.0, 8.0])]),
            CellValue::Number(8.0)
        );
        assert_eq!(ctx_call(fn_min, &[]), CellValue::Number(0.0));
        assert_eq!(ctx_call(fn_max, &[]), CellValue::Number(0.0));
    }

    #[test]
    fn test_count_ignores_strings() {
        assert_eq!(
            ctx_call(
                fn_count,
                &[
                    1.into(),
                    CellValue::Text("2".into()),
                    CellValue::Bool(true),
                    CellValue::Empty,
                    3.into(),
                ]
            ),
            CellValue::Number(2.0)
        );
    }

    #[test]
    fn test_abs_round() {
        assert_eq!(ctx_call(fn_abs, &[CellValue::Number(-5.0)]), CellValue::Number(5.0));
        assert!(ctx_call(fn_abs, &[CellValue::Bool(true)]).is_error());

        assert_eq!(
            ctx_call(fn_round, &[CellValue::Number(2.5)]),
            CellValue::Number(3.0)
        );
        assert_eq!(
            ctx_call(fn_round, &[CellValue::Number(3.14159), 2.into()]),
            CellValue::Number(3.14)
        );
    }

    #[test]
    fn test_sumif_defaults_to_criteria_range() {
        let range = nums(&[1.0, 5.0, 10.0]);
        assert_eq!(
            ctx_call(fn_sumif, &[range, CellValue::Text(">=5".into())]),
            CellValue::Number(15.0)
        );
    }

    #[test]
    fn test_sumif_parallel_range() {
        let keys = CellValue::List(vec![
            CellValue::Text("a".into()),
            CellValue::Text("b".into()),
            CellValue::Text("a".into()),
        ]);
        let amounts = nums(&[10.0, 20.0, 30.0]);
        assert_eq!(
            ctx_call(fn_sumif, &[keys, CellValue::Text("a".into()), amounts]),
            CellValue::Number(40.0)
        );
    }

    #[test]
    fn test_sumif_scalar_lifted() {
        assert_eq!(
            ctx_call(fn_sumif, &[7.into(), CellValue::Text(">5".into())]),
            CellValue::Number(7.0)
        );
    }
}
