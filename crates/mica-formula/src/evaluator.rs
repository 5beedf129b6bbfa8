//! Formula evaluator
//!
//! Lazy, on-demand evaluation: reading a cell parses its formula (if any) and
//! recursively evaluates referenced cells against the workbook. There is no
//! dependency graph; cycle detection uses a visit set scoped to the current
//! call chain.

use crate::ast::{BinaryOperator, CellRef, Expr, RangeRef};
use crate::error::FormulaResult;
use crate::functions::FunctionRegistry;
use crate::parser;
use mica_core::cell::address::normalize;
use mica_core::{CellRange, CellValue, ErrorKind, Workbook};
use std::cell::RefCell;
use std::collections::HashSet;

/// Context handed to function implementations
///
/// Built-ins are pure over their evaluated arguments and do not read the
/// workbook; the context exists for user-registered functions that need the
/// surrounding document. Host side-effect channels can be captured in the
/// registered closure itself.
pub struct FunctionContext<'a> {
    /// The workbook being evaluated against
    pub workbook: &'a Workbook,
    /// The sheet the current formula lives on
    pub sheet: &'a str,
    /// The registry the current call was resolved from
    pub registry: &'a FunctionRegistry,
}

/// Walks expression trees against a workbook
///
/// One evaluator per entry-point call chain: the visit set that backs cycle
/// detection is keyed `sheet!ADDRESS`, grows only along the current chain,
/// and is restored on every exit path.
pub struct Evaluator<'a> {
    workbook: &'a Workbook,
    registry: &'a FunctionRegistry,
    visiting: RefCell<HashSet<String>>,
}

/// Removes its key from the visit set when dropped, so the set is restored
/// on every exit path out of a cell evaluation.
struct VisitGuard<'a> {
    visiting: &'a RefCell<HashSet<String>>,
    key: String,
}

impl<'a> VisitGuard<'a> {
    fn enter(visiting: &'a RefCell<HashSet<String>>, key: String) -> Self {
        visiting.borrow_mut().insert(key.clone());
        Self { visiting, key }
    }
}

impl Drop for VisitGuard<'_> {
    fn drop(&mut self) {
        self.visiting.borrow_mut().remove(&self.key);
    }
}

impl<'a> Evaluator<'a> {
    /// Create an evaluator over a workbook and registry
    pub fn new(workbook: &'a Workbook, registry: &'a FunctionRegistry) -> Self {
        Self {
            workbook,
            registry,
            visiting: RefCell::new(HashSet::new()),
        }
    }

    /// Evaluate a cell by address text
    ///
    /// The address may be sheet-qualified, in which case its sheet overrides
    /// the `sheet` argument. In-cell errors are returned as values; `Err` is
    /// reserved for invalid address text.
    pub fn evaluate_cell(&self, sheet: &str, address: &str) -> FormulaResult<CellValue> {
        let (sheet_name, canonical) = normalize(address, sheet)?;
        Ok(self.evaluate_at(&sheet_name, &canonical))
    }

    /// Evaluate a cell whose address is already canonical
    pub fn evaluate_at(&self, sheet: &str, canonical: &str) -> CellValue {
        let key = format!("{}!{}", sheet, canonical);

        if self.visiting.borrow().contains(&key) {
            return CellValue::error(
                ErrorKind::Cycle,
                format!("circular reference through {}", key),
            );
        }
        let _guard = VisitGuard::enter(&self.visiting, key.clone());

        let raw = match self.workbook.sheet(sheet).and_then(|s| s.get(canonical)) {
            Some(value) => value.clone(),
            None => return CellValue::Empty,
        };

        match raw {
            CellValue::Formula(text) => {
                let body = text.strip_prefix('=').unwrap_or(&text);
                match parser::parse(body) {
                    Ok(expr) => self.evaluate_expr(&expr, sheet),
                    Err(err) => {
                        log::warn!("formula parse failed at {}: {}", key, err);
                        CellValue::error(ErrorKind::Value, err.to_string())
                    }
                }
            }
            other => other,
        }
    }

    /// Evaluate an expression tree in the context of `sheet`
    pub fn evaluate_expr(&self, expr: &Expr, sheet: &str) -> CellValue {
        match expr {
            Expr::Number(n) => CellValue::Number(*n),
            Expr::Text(s) => CellValue::Text(s.clone()),
            Expr::Bool(b) => CellValue::Bool(*b),

            Expr::CellRef(cell_ref) => {
                let target_sheet = cell_ref.sheet.as_deref().unwrap_or(sheet);
                self.evaluate_at(target_sheet, &cell_ref.addr.to_a1_string())
            }

            Expr::Range(range_ref) => self.evaluate_range(range_ref, sheet),

            Expr::Call { name, args } => self.evaluate_call(name, args, sheet),

            Expr::BinaryOp { op, left, right } => self.evaluate_binary(*op, left, right, sheet),
        }
    }

    /// Ranges evaluate to a flat row-major sequence of cell values
    ///
    /// Errors in member cells are included as elements, not short-circuited.
    /// A lone sheet qualifier on either endpoint applies to both; endpoints
    /// resolving to different sheets are a `#REF!` error.
    fn evaluate_range(&self, range_ref: &RangeRef, sheet: &str) -> CellValue {
        let RangeRef { start, end } = range_ref;
        let start_sheet = resolve_endpoint_sheet(start, end, sheet);
        let end_sheet = resolve_endpoint_sheet(end, start, sheet);

        if start_sheet != end_sheet {
            return CellValue::error(
                ErrorKind::Ref,
                format!(
                    "range spans sheets '{}' and '{}'",
                    start_sheet, end_sheet
                ),
            );
        }

        let range = CellRange::new(start.addr, end.addr);
        let mut values = Vec::with_capacity(range.cell_count());
        for addr in range.cells() {
            values.push(self.evaluate_at(start_sheet, &addr.to_a1_string()));
        }
        CellValue::List(values)
    }

    /// Arguments are evaluated left-to-right before the name is resolved;
    /// a missing name is `#NAME?` and an `Err` from the implementation is
    /// converted to `#VALUE!` carrying the function's name.
    fn evaluate_call(&self, name: &str, args: &[Expr], sheet: &str) -> CellValue {
        let mut evaluated = Vec::with_capacity(args.len());
        for arg in args {
            evaluated.push(self.evaluate_expr(arg, sheet));
        }

        let func = match self.registry.get(name) {
            Some(f) => f,
            None => {
                return CellValue::error(
                    ErrorKind::Name,
                    format!("unknown function '{}'", name),
                )
            }
        };

        let ctx = FunctionContext {
            workbook: self.workbook,
            sheet,
            registry: self.registry,
        };

        match func.as_ref()(&evaluated, &ctx) {
            Ok(value) => value,
            Err(err) => CellValue::error(ErrorKind::Value, format!("{}: {}", name, err)),
        }
    }

    fn evaluate_binary(
        &self,
        op: BinaryOperator,
        left: &Expr,
        right: &Expr,
        sheet: &str,
    ) -> CellValue {
        let lhs = self.evaluate_expr(left, sheet);
        let rhs = self.evaluate_expr(right, sheet);

        let (l, r) = match (numeric_operand(&lhs), numeric_operand(&rhs)) {
            (Some(l), Some(r)) => (l, r),
            _ => {
                return CellValue::error(
                    ErrorKind::Value,
                    format!(
                        "arithmetic on non-numeric values '{}' and '{}'",
                        lhs.display_string(),
                        rhs.display_string()
                    ),
                )
            }
        };

        match op {
            BinaryOperator::Add => CellValue::Number(l + r),
            BinaryOperator::Subtract => CellValue::Number(l - r),
            BinaryOperator::Multiply => CellValue::Number(l * r),
            BinaryOperator::Divide => {
                if r == 0.0 {
                    CellValue::error(ErrorKind::Div0, "division by zero")
                } else {
                    CellValue::Number(l / r)
                }
            }
        }
    }
}

/// The sheet a range endpoint resolves against: its own qualifier, then the
/// other endpoint's, then the current sheet.
fn resolve_endpoint_sheet<'b>(endpoint: &'b CellRef, other: &'b CellRef, current: &'b str) -> &'b str {
    endpoint
        .sheet
        .as_deref()
        .or(other.sheet.as_deref())
        .unwrap_or(current)
}

/// Arithmetic operands must coerce to a finite number
fn numeric_operand(value: &CellValue) -> Option<f64> {
    value.as_number().filter(|n| n.is_finite())
}
