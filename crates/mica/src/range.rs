//! Rectangular range reads and writes
//!
//! Higher-level access to rectangular regions as structured matrices of
//! per-cell snapshots. Unlike [`Engine::set_cell`], which creates a missing
//! sheet on demand, this layer rejects an unknown sheet: a range operation
//! against a sheet that does not exist is a caller mistake, not a request
//! to create one.

use crate::engine::Engine;
use mica_core::cell::address::parse_range;
use mica_core::{CellAddress, CellValue, Error, Result};
use mica_formula::Evaluator;

/// Which per-cell fields a range read populates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeMode {
    /// Raw stored values only
    Raw,
    /// Computed (evaluated) values only
    Computed,
    /// Both raw and computed values
    Both,
}

/// One cell of a range result
#[derive(Debug, Clone, PartialEq)]
pub struct CellSnapshot {
    /// Canonical address, e.g. "B2"
    pub address: String,
    /// Raw stored value; `None` when not requested or the cell is absent
    pub raw: Option<CellValue>,
    /// Computed value; `None` when not requested
    pub computed: Option<CellValue>,
}

/// Result of a range read or write
#[derive(Debug, Clone, PartialEq)]
pub struct RangeData {
    /// The sheet the range resolved to
    pub sheet: String,
    /// Canonical range text, min to max (e.g. "A1:B2")
    pub range: String,
    /// Row-major matrix of cell snapshots
    pub rows: Vec<Vec<CellSnapshot>>,
}

impl Engine {
    /// Read a rectangular range as a matrix of cell snapshots
    ///
    /// `range_text` accepts `A1:B2` and `Sheet!A1:B2`; endpoints may appear
    /// in any order. The sheet must already exist.
    pub fn get_range(&self, sheet: &str, range_text: &str, mode: RangeMode) -> Result<RangeData> {
        let (sheet_name, range) = parse_range(range_text, sheet)?;
        if !self.workbook().has_sheet(&sheet_name) {
            return Err(Error::SheetNotFound(sheet_name));
        }

        let evaluator = Evaluator::new(self.workbook(), self.registry());
        let sheet_store = self.workbook().sheet(&sheet_name);

        let mut rows = Vec::with_capacity(range.row_count());
        for row in range.start.row..=range.end.row {
            let mut cells = Vec::with_capacity(range.col_count());
            for col in range.start.col..=range.end.col {
                let canonical = CellAddress::new(col, row).to_a1_string();

                let raw = match mode {
                    RangeMode::Raw | RangeMode::Both => {
                        sheet_store.and_then(|s| s.get(&canonical)).cloned()
                    }
                    RangeMode::Computed => None,
                };
                let computed = match mode {
                    RangeMode::Computed | RangeMode::Both => {
                        Some(evaluator.evaluate_at(&sheet_name, &canonical))
                    }
                    RangeMode::Raw => None,
                };

                cells.push(CellSnapshot {
                    address: canonical,
                    raw,
                    computed,
                });
            }
            rows.push(cells);
        }

        Ok(RangeData {
            sheet: sheet_name,
            range: range.to_a1_string(),
            rows,
        })
    }

    /// Write a rectangular matrix of values into a range
    ///
    /// The matrix must be non-empty, rectangular, and shape-equal to the
    /// range. Each cell goes through the cell-level write path, so strings
    /// beginning with `=` become formulas. Returns the written region in
    /// [`RangeMode::Both`] form.
    pub fn set_range(
        &mut self,
        sheet: &str,
        range_text: &str,
        values: Vec<Vec<CellValue>>,
    ) -> Result<RangeData> {
        let (sheet_name, range) = parse_range(range_text, sheet)?;
        if !self.workbook().has_sheet(&sheet_name) {
            return Err(Error::SheetNotFound(sheet_name));
        }

        let expected_rows = range.row_count();
        let expected_cols = range.col_count();
        let actual_rows = values.len();
        let actual_cols = values.first().map(Vec::len).unwrap_or(0);

        let rectangular = values.iter().all(|row| row.len() == actual_cols);
        if actual_rows != expected_rows || actual_cols != expected_cols || !rectangular {
            return Err(Error::ShapeMismatch {
                expected_rows,
                expected_cols,
                actual_rows,
                actual_cols,
            });
        }

        for (i, row) in values.into_iter().enumerate() {
            for (j, value) in row.into_iter().enumerate() {
                let addr = CellAddress::new(range.start.col + j as u32, range.start.row + i as u32);
                self.workbook_mut()
                    .set_cell(&sheet_name, &addr.to_a1_string(), value)?;
            }
        }

        self.get_range(sheet, range_text, RangeMode::Both)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_range_modes() {
        let mut engine = Engine::new();
        engine.add_sheet("S");
        engine.set_cell("S", "A1", 1).unwrap();
        engine.set_cell("S", "A2", "=A1+1").unwrap();

        let raw = engine.get_range("S", "A1:A2", RangeMode::Raw).unwrap();
        assert_eq!(raw.rows[0][0].raw, Some(CellValue::Number(1.0)));
        assert_eq!(raw.rows[0][0].computed, None);
        assert!(matches!(
            raw.rows[1][0].raw,
            Some(CellValue::Formula(_))
        ));

        let computed = engine.get_range("S", "A1:A2", RangeMode::Computed).unwrap();
        assert_eq!(computed.rows[1][0].computed, Some(CellValue::Number(2.0)));
        assert_eq!(computed.rows[1][0].raw, None);

        let both = engine.get_range("S", "A1:A2", RangeMode::Both).unwrap();
        assert!(both.rows[1][0].raw.is_some());
        assert_eq!(both.rows[1][0].computed, Some(CellValue::Number(2.0)));
    }

    #[test]
    fn test_get_range_missing_sheet() {
        let engine = Engine::new();
        assert!(matches!(
            engine.get_range("Nope", "A1:A2", RangeMode::Raw),
            Err(Error::SheetNotFound(_))
        ));
    }

    #[test]
    fn test_get_range_canonicalizes() {
        let mut engine = Engine::new();
        engine.add_sheet("S");
        let data = engine.get_range("S", "b2:a1", RangeMode::Raw).unwrap();
        assert_eq!(data.range, "A1:B2");
        assert_eq!(data.rows[0][0].address, "A1");
        assert_eq!(data.rows[1][1].address, "B2");
    }

    #[test]
    fn test_set_range_shape_mismatch() {
        let mut engine = Engine::new();
        engine.add_sheet("S");

        let err = engine
            .set_range("S", "A1:B2", vec![vec![1.into(), 2.into()]])
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));

        // Ragged matrices are rejected too
        let err = engine
            .set_range(
                "S",
                "A1:B2",
                vec![vec![1.into(), 2.into()], vec![3.into()]],
            )
            .unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));

        let err = engine.set_range("S", "A1:B2", vec![]).unwrap_err();
        assert!(matches!(err, Error::ShapeMismatch { .. }));
    }

    #[test]
    fn test_set_range_missing_sheet() {
        let mut engine = Engine::new();
        assert!(matches!(
            engine.set_range("Nope", "A1", vec![vec![1.into()]]),
            Err(Error::SheetNotFound(_))
        ));
    }
}
