//! # mica
//!
//! A spreadsheet calculation engine: a library that stores cells across
//! named sheets, parses A1-style formula expressions, and evaluates them
//! lazily, invoking registered functions and detecting circular references.
//!
//! The [`Engine`] type is the in-process API. One engine per document; it
//! owns its workbook and function registry, and there is no process-wide
//! state.
//!
//! ## Example
//!
//! ```rust
//! use mica::prelude::*;
//!
//! let mut engine = Engine::new();
//! engine.add_sheet("S");
//!
//! engine.set_cell("S", "A1", 2).unwrap();
//! engine.set_cell("S", "A2", "=A1*3").unwrap();
//!
//! assert_eq!(engine.evaluate_cell("S", "A2").unwrap(), CellValue::Number(6.0));
//! ```

pub mod engine;
pub mod prelude;
pub mod range;

pub use engine::Engine;
pub use range::{CellSnapshot, RangeData, RangeMode};

// Re-export core types
pub use mica_core::{
    CellAddress, CellRange, CellValue, Error, ErrorKind, ErrorValue, Result, Sheet, Workbook,
};

// Re-export formula types
pub use mica_formula::{
    BinaryOperator, CellRef, Evaluator, Expr, FormulaError, FormulaResult, Function,
    FunctionContext, FunctionRegistry, RangeRef,
};
