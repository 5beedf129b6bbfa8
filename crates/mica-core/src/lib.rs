//! # mica-core
//!
//! Core data structures for the mica spreadsheet engine.
//!
//! This crate provides the fundamental types used throughout mica:
//! - [`CellAddress`] and [`CellRange`] - A1-style cell addressing and ranges
//! - [`CellValue`] - The cell content union (numbers, text, logicals, errors,
//!   lists, formula strings)
//! - [`ErrorValue`] - In-cell error values (`#REF!`, `#CYCLE!`, ...)
//! - [`Workbook`] - The sheet-name keyed cell store
//!
//! ## Example
//!
//! ```rust
//! use mica_core::{CellValue, Workbook};
//!
//! let mut workbook = Workbook::new();
//! workbook.add_sheet("Sheet1");
//!
//! workbook.set_cell("Sheet1", "A1", CellValue::Number(42.0)).unwrap();
//! workbook.set_cell("Sheet1", "B1", CellValue::from("=A1*2")).unwrap();
//!
//! assert_eq!(
//!     workbook.get_cell("Sheet1", "a1").unwrap(),
//!     Some(&CellValue::Number(42.0))
//! );
//! ```

pub mod cell;
pub mod error;
pub mod workbook;

// Re-exports for convenience
pub use cell::address::{
    column_to_letters, is_valid_sheet_name, letters_to_column, normalize, parse_range,
    split_sheet, CellAddress, CellRange,
};
pub use cell::value::{parse_number, CellValue, ErrorKind, ErrorValue};
pub use error::{Error, Result};
pub use workbook::{Sheet, Workbook};
