//! Workbook type - the sheet-name keyed cell store
//!
//! The store imposes no interpretation on values: a formula string is stored
//! as written, and a nested list placed into a cell by a host is stored
//! verbatim.

use crate::cell::address::normalize;
use crate::cell::value::CellValue;
use crate::error::Result;
use ahash::AHashMap;

/// A single sheet: canonical address -> cell content
#[derive(Debug, Default)]
pub struct Sheet {
    cells: AHashMap<String, CellValue>,
}

impl Sheet {
    /// Create an empty sheet
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw value at a canonical address
    pub fn get(&self, canonical: &str) -> Option<&CellValue> {
        self.cells.get(canonical)
    }

    /// Set the value at a canonical address
    pub fn set(&mut self, canonical: String, value: CellValue) {
        self.cells.insert(canonical, value);
    }

    /// Remove the value at a canonical address
    pub fn clear(&mut self, canonical: &str) -> Option<CellValue> {
        self.cells.remove(canonical)
    }

    /// Number of occupied cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Whether the sheet has no occupied cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Iterate over occupied cells as (canonical address, value)
    pub fn cells(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A workbook: sheet name (case-sensitive) -> sheet
///
/// Constructed empty. Sheets are added by name (idempotent) or created on
/// demand by [`Workbook::set_cell`]; read paths never create sheets.
#[derive(Debug, Default)]
pub struct Workbook {
    sheets: AHashMap<String, Sheet>,
}

impl Workbook {
    /// Create a new empty workbook
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a sheet by name; a no-op if the sheet already exists
    pub fn add_sheet<'a>(&mut self, name: &'a str) -> &'a str {
        self.sheets.entry(name.to_string()).or_default();
        name
    }

    /// Whether a sheet with this name exists
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.contains_key(name)
    }

    /// Get a sheet by name
    pub fn sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.get(name)
    }

    /// Sheet names, sorted for deterministic enumeration
    pub fn sheet_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.sheets.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Write a value, creating the sheet if missing
    ///
    /// The address is canonicalized; a sheet-qualified address overrides the
    /// `sheet` argument. Note the asymmetry with the range layer, which
    /// rejects unknown sheets instead of creating them.
    pub fn set_cell(&mut self, sheet: &str, address: &str, value: CellValue) -> Result<()> {
        let (sheet_name, canonical) = normalize(address, sheet)?;
        self.sheets
            .entry(sheet_name)
            .or_default()
            .set(canonical, value);
        Ok(())
    }

    /// Read the raw stored value; `None` for an absent sheet or cell
    pub fn get_cell(&self, sheet: &str, address: &str) -> Result<Option<&CellValue>> {
        let (sheet_name, canonical) = normalize(address, sheet)?;
        Ok(self
            .sheets
            .get(&sheet_name)
            .and_then(|s| s.get(&canonical)))
    }

    /// Remove a stored value; `None` if nothing was stored
    pub fn clear_cell(&mut self, sheet: &str, address: &str) -> Result<Option<CellValue>> {
        let (sheet_name, canonical) = normalize(address, sheet)?;
        Ok(self
            .sheets
            .get_mut(&sheet_name)
            .and_then(|s| s.clear(&canonical)))
    }
}
