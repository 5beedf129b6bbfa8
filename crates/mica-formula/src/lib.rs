//! # mica-formula
//!
//! Formula parser and evaluator for the mica spreadsheet engine.
//!
//! This crate provides:
//! - Formula parsing (text without the leading `=` -> expression tree)
//! - Lazy, on-demand evaluation against a workbook, with cycle detection
//! - A case-insensitive function registry hosting the built-in library and
//!   user-registered functions
//!
//! ## Example
//!
//! ```rust
//! use mica_core::{CellValue, Workbook};
//! use mica_formula::{Evaluator, FunctionRegistry};
//!
//! let mut workbook = Workbook::new();
//! workbook.set_cell("S", "A1", CellValue::Number(2.0)).unwrap();
//! workbook.set_cell("S", "A2", CellValue::from("=A1*3")).unwrap();
//!
//! let registry = FunctionRegistry::new();
//! let evaluator = Evaluator::new(&workbook, &registry);
//! assert_eq!(
//!     evaluator.evaluate_cell("S", "A2").unwrap(),
//!     CellValue::Number(6.0)
//! );
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;

pub use ast::{BinaryOperator, CellRef, Expr, RangeRef};
pub use error::{FormulaError, FormulaResult};
pub use evaluator::{Evaluator, FunctionContext};
pub use functions::{Function, FunctionRegistry};
pub use parser::parse;
