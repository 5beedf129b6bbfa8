//! Cell address and range types
//!
//! Addresses use A1-style notation: column letters followed by a row number,
//! with an optional `$` before either part. Columns and rows are 1-based
//! (A=1). The canonical textual form is upper-case letters plus the row
//! number with absolute markers stripped; every address stored in a sheet
//! map is in this form.

use crate::error::{Error, Result};
use std::fmt;
use std::str::FromStr;

/// A cell address (e.g., "A1", "$B$2")
///
/// The `$` markers are preserved from parsing but are syntactic only; they
/// do not affect evaluation and are not part of the canonical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellAddress {
    /// Column index (1-based, A=1)
    pub col: u32,
    /// Row index (1-based)
    pub row: u32,
    /// Whether the column reference carried a `$`
    pub col_absolute: bool,
    /// Whether the row reference carried a `$`
    pub row_absolute: bool,
}

impl CellAddress {
    /// Create a new cell address with relative references
    pub fn new(col: u32, row: u32) -> Self {
        Self {
            col,
            row,
            col_absolute: false,
            row_absolute: false,
        }
    }

    /// Parse a cell address from A1-style notation
    ///
    /// Accepts the grammar `$?[A-Za-z]+$?[0-9]+`, any letter case.
    ///
    /// # Examples
    /// ```
    /// use mica_core::CellAddress;
    ///
    /// let addr = CellAddress::parse("b2").unwrap();
    /// assert_eq!(addr.col, 2);
    /// assert_eq!(addr.row, 2);
    ///
    /// let addr = CellAddress::parse("$A$1").unwrap();
    /// assert!(addr.col_absolute);
    /// assert!(addr.row_absolute);
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Err(Error::InvalidAddress("empty address".into()));
        }

        let bytes = s.as_bytes();
        let mut pos = 0;

        // Column absolute marker
        let col_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        // Column letters
        let col_start = pos;
        while pos < bytes.len() && bytes[pos].is_ascii_alphabetic() {
            pos += 1;
        }
        if pos == col_start {
            return Err(Error::InvalidAddress(format!(
                "no column letters in '{}'",
                s
            )));
        }
        let col = letters_to_column(&s[col_start..pos])?;

        // Row absolute marker
        let row_absolute = if bytes.get(pos) == Some(&b'$') {
            pos += 1;
            true
        } else {
            false
        };

        // Row number
        let row_str = &s[pos..];
        if row_str.is_empty() {
            return Err(Error::InvalidAddress(format!("no row number in '{}'", s)));
        }
        if !row_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(Error::InvalidAddress(format!(
                "invalid row number in '{}'",
                s
            )));
        }

        let row: u32 = row_str
            .parse()
            .map_err(|_| Error::InvalidAddress(format!("invalid row number in '{}'", s)))?;
        if row == 0 {
            return Err(Error::InvalidAddress(format!(
                "row number must be >= 1 in '{}'",
                s
            )));
        }

        Ok(Self {
            col,
            row,
            col_absolute,
            row_absolute,
        })
    }

    /// Canonical A1 form: upper-case letters plus row number, no markers
    pub fn to_a1_string(&self) -> String {
        format!("{}{}", column_to_letters(self.col), self.row)
    }

    /// Create a range from this address to another
    pub fn to(&self, other: CellAddress) -> CellRange {
        CellRange::new(*self, other)
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

impl FromStr for CellAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Convert column letters to index (A=1, Z=26, AA=27, ...)
pub fn letters_to_column(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidAddress("empty column letters".into()));
    }

    let mut col: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidAddress(format!(
                "invalid column letter '{}'",
                c
            )));
        }
        col = col
            .checked_mul(26)
            .and_then(|v| v.checked_add(c.to_ascii_uppercase() as u32 - 'A' as u32 + 1))
            .ok_or_else(|| Error::InvalidAddress(format!("column too large: '{}'", letters)))?;
    }

    Ok(col)
}

/// Convert column index to letters (1 = A, 26 = Z, 27 = AA, ...)
///
/// Inverse of [`letters_to_column`]. Note the decrement before the modulus:
/// the alphabet has no zero digit.
pub fn column_to_letters(col: u32) -> String {
    let mut result = String::new();
    let mut n = col;

    while n > 0 {
        n -= 1;
        let c = ((n % 26) as u8 + b'A') as char;
        result.insert(0, c);
        n /= 26;
    }

    result
}

/// Check whether `name` is a legal sheet name (letters, digits, underscore)
pub fn is_valid_sheet_name(name: &str) -> bool {
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Split an optional `Sheet!` qualifier off an address or range endpoint
pub fn split_sheet(text: &str) -> Result<(Option<&str>, &str)> {
    match text.find('!') {
        Some(pos) => {
            let sheet = &text[..pos];
            if !is_valid_sheet_name(sheet) {
                return Err(Error::InvalidAddress(format!(
                    "invalid sheet name in '{}'",
                    text
                )));
            }
            Ok((Some(sheet), &text[pos + 1..]))
        }
        None => Ok((None, text)),
    }
}

/// Resolve address text to `(sheet_name, canonical_address)`
///
/// Accepts `Sheet!A1`, `A1`, `$A$1`, `A$1`, `$A1`, any letter case. An
/// unqualified address resolves against `default_sheet`.
pub fn normalize(text: &str, default_sheet: &str) -> Result<(String, String)> {
    let (sheet, rest) = split_sheet(text.trim())?;
    let addr = CellAddress::parse(rest)?;
    Ok((
        sheet.unwrap_or(default_sheet).to_string(),
        addr.to_a1_string(),
    ))
}

/// Parse range text to `(sheet_name, range)`
///
/// Accepts `A1:B2`, `Sheet!A1:B2`, and a qualifier on either endpoint; when
/// exactly one endpoint is qualified its sheet applies to both. Conflicting
/// qualifiers are rejected. A single address is a one-cell range.
pub fn parse_range(text: &str, default_sheet: &str) -> Result<(String, CellRange)> {
    let text = text.trim();

    match text.find(':') {
        Some(pos) => {
            let (left_sheet, left_addr) = split_sheet(text[..pos].trim())?;
            let (right_sheet, right_addr) = split_sheet(text[pos + 1..].trim())?;
            let start = CellAddress::parse(left_addr)?;
            let end = CellAddress::parse(right_addr)?;

            let sheet = match (left_sheet, right_sheet) {
                (Some(a), Some(b)) if a != b => {
                    return Err(Error::InvalidRange(format!(
                        "range '{}' spans two sheets",
                        text
                    )))
                }
                (Some(a), _) => a,
                (None, Some(b)) => b,
                (None, None) => default_sheet,
            };

            Ok((sheet.to_string(), CellRange::new(start, end)))
        }
        None => {
            let (sheet, addr_text) = split_sheet(text)?;
            let addr = CellAddress::parse(addr_text)?;
            Ok((
                sheet.unwrap_or(default_sheet).to_string(),
                CellRange::single(addr),
            ))
        }
    }
}

/// An inclusive rectangle of cells on a single sheet (e.g., "A1:B10")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRange {
    /// Start address (top-left after normalization)
    pub start: CellAddress,
    /// End address (bottom-right after normalization)
    pub end: CellAddress,
}

impl CellRange {
    /// Create a new range; endpoints are reordered so start is top-left
    pub fn new(start: CellAddress, end: CellAddress) -> Self {
        let (start_col, end_col) = if start.col <= end.col {
            (start.col, end.col)
        } else {
            (end.col, start.col)
        };
        let (start_row, end_row) = if start.row <= end.row {
            (start.row, end.row)
        } else {
            (end.row, start.row)
        };

        Self {
            start: CellAddress::new(start_col, start_row),
            end: CellAddress::new(end_col, end_row),
        }
    }

    /// Create a single-cell range
    pub fn single(addr: CellAddress) -> Self {
        Self::new(addr, addr)
    }

    /// Number of rows in the range
    pub fn row_count(&self) -> usize {
        (self.end.row - self.start.row + 1) as usize
    }

    /// Number of columns in the range
    pub fn col_count(&self) -> usize {
        (self.end.col - self.start.col + 1) as usize
    }

    /// Total number of cells in the range
    pub fn cell_count(&self) -> usize {
        self.row_count() * self.col_count()
    }

    /// Iterate over all cell addresses in the range, row-major
    pub fn cells(&self) -> CellRangeIterator {
        CellRangeIterator {
            range: *self,
            current_col: self.start.col,
            current_row: self.start.row,
        }
    }

    /// Format as an A1:B10 string; a one-cell range collapses to the address
    pub fn to_a1_string(&self) -> String {
        if self.start == self.end {
            self.start.to_a1_string()
        } else {
            format!("{}:{}", self.start.to_a1_string(), self.end.to_a1_string())
        }
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_a1_string())
    }
}

/// Iterator over cells in a range, row-major
pub struct CellRangeIterator {
    range: CellRange,
    current_col: u32,
    current_row: u32,
}

impl Iterator for CellRangeIterator {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current_row > self.range.end.row {
            return None;
        }

        let addr = CellAddress::new(self.current_col, self.current_row);

        self.current_col += 1;
        if self.current_col > self.range.end.col {
            self.current_col = self.range.start.col;
            self.current_row += 1;
        }

        Some(addr)
    }
}
