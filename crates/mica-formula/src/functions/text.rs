//! Text functions
//!
//! All of these operate on the string form of their arguments (see
//! `CellValue::display_string`): integral numbers render without a decimal
//! point and the empty cell renders as "".

use super::helpers::flatten_args;
use crate::error::FormulaResult;
use crate::evaluator::FunctionContext;
use mica_core::{CellValue, ErrorKind};

/// CONCAT(value1, ...) - flatten, string-coerce, concatenate
pub fn fn_concat(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let mut out = String::new();
    for value in flatten_args(args) {
        out.push_str(&value.display_string());
    }
    Ok(CellValue::Text(out))
}

/// LEN(value) - length of the string form, in characters
pub fn fn_len(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let [value] = args else {
        return Ok(CellValue::error(ErrorKind::Value, "LEN expects 1 argument"));
    };
    Ok(CellValue::Number(
        value.display_string().chars().count() as f64
    ))
}

/// UPPER(value)
pub fn fn_upper(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let [value] = args else {
        return Ok(CellValue::error(ErrorKind::Value, "UPPER expects 1 argument"));
    };
    Ok(CellValue::Text(value.display_string().to_uppercase()))
}

/// LOWER(value)
pub fn fn_lower(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let [value] = args else {
        return Ok(CellValue::error(ErrorKind::Value, "LOWER expects 1 argument"));
    };
    Ok(CellValue::Text(value.display_string().to_lowercase()))
}

/// TRIM(value) - strip leading/trailing whitespace and collapse runs
pub fn fn_trim(args: &[CellValue], _ctx: &FunctionContext) -> FormulaResult<CellValue> {
    let [value] = args else {
        return Ok(CellValue::error(ErrorKind::Value, "TRIM expects 1 argument"));
    };
    let collapsed = value
        .display_string()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    Ok(CellValue::Text(collapsed))
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

    #[test]
    fn test_concat() {
        assert_eq!(
            ctx_call(fn_concat, &["a".into(), "b".into(), 1.into()]),
            CellValue::Text("ab1".into())
        );
        // Absent values contribute nothing
        assert_eq!(
            ctx_call(fn_concat, &["a".into(), CellValue::Empty, "b".into()]),
            CellValue::Text("ab".into())
        );
        // Ranges are flattened
        let range = CellValue::List(vec!["x".into(), "y".into()]);
        assert_eq!(
            ctx_call(fn_concat, &[range, "!".into()]),
            CellValue::Text("xy!".into())
        );
    }

    #[test]
    fn test_len() {
        assert_eq!(
            ctx_call(fn_len, &["hello".into()]),
            CellValue::Number(5.0)
        );
        assert_eq!(ctx_call(fn_len, &[123.into()]), CellValue::Number(3.0));
        assert_eq!(ctx_call(fn_len, &[CellValue::Empty]), CellValue::Number(0.0));
        assert!(ctx_call(fn_len, &[]).is_error());
    }

    #[test]
    fn test_upper_lower() {
        assert_eq!(
            ctx_call(fn_upper, &["abC".into()]),
            CellValue::Text("ABC".into())
        );
        assert_eq!(
            ctx_call(fn_lower, &["AbC".into()]),
            CellValue::Text("abc".into())
        );
        // Numbers go through their string form
        assert_eq!(
            ctx_call(fn_upper, &[1.5.into()]),
            CellValue::Text("1.5".into())
        );
    }

    #[test]
    fn test_trim() {
        assert_eq!(
            ctx_call(fn_trim, &["  a   b  ".into()]),
            CellValue::Text("a b".into())
        );
    }
}
