//! Convenience re-exports
//!
//! ```rust
//! use mica::prelude::*;
//! ```

pub use crate::engine::Engine;
pub use crate::range::{CellSnapshot, RangeData, RangeMode};
pub use mica_core::{
    CellAddress, CellRange, CellValue, Error, ErrorKind, ErrorValue, Result, Workbook,
};
pub use mica_formula::{
    Evaluator, FormulaError, FormulaResult, FunctionContext, FunctionRegistry,
};
