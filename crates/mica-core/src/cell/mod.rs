//! Cell types: addresses, ranges, and values

pub mod address;
pub mod value;

pub use address::{CellAddress, CellRange};
pub use value::{CellValue, ErrorKind, ErrorValue};
