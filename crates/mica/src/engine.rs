//! The engine facade
//!
//! [`Engine`] ties a workbook to a function registry and exposes the
//! in-process API: cell reads and writes, lazy evaluation, function
//! registration, and the range operations in [`crate::range`].

use mica_core::{CellValue, Result, Workbook};
use mica_formula::{Evaluator, FormulaResult, FunctionContext, FunctionRegistry};

/// A spreadsheet calculation engine instance
///
/// One engine per document. The engine owns its workbook and registry; both
/// are constructed empty apart from the built-in function library. The
/// engine is single-threaded and synchronous: callers that evaluate
/// concurrently with writes must serialize externally.
pub struct Engine {
    workbook: Workbook,
    registry: FunctionRegistry,
}

impl Engine {
    /// Create an engine with an empty workbook and the built-in functions
    pub fn new() -> Self {
        Self {
            workbook: Workbook::new(),
            registry: FunctionRegistry::new(),
        }
    }

    /// The underlying workbook
    pub fn workbook(&self) -> &Workbook {
        &self.workbook
    }

    /// Mutable access to the underlying workbook
    pub fn workbook_mut(&mut self) -> &mut Workbook {
        &mut self.workbook
    }

    /// The function registry
    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Add a sheet by name; a no-op if it already exists
    pub fn add_sheet<'a>(&mut self, name: &'a str) -> &'a str {
        self.workbook.add_sheet(name)
    }

    /// Sheet names, sorted
    pub fn sheet_names(&self) -> Vec<&str> {
        self.workbook.sheet_names()
    }

    /// Write a raw value or formula string, creating the sheet if missing
    ///
    /// Strings beginning with `=` are stored as formulas; everything else is
    /// stored verbatim, nested lists included.
    pub fn set_cell<V: Into<CellValue>>(
        &mut self,
        sheet: &str,
        address: &str,
        value: V,
    ) -> Result<()> {
        self.workbook.set_cell(sheet, address, value.into())
    }

    /// Read the raw stored value; `None` for an absent sheet or cell
    pub fn get_cell(&self, sheet: &str, address: &str) -> Result<Option<&CellValue>> {
        self.workbook.get_cell(sheet, address)
    }

    /// Remove a stored value
    pub fn clear_cell(&mut self, sheet: &str, address: &str) -> Result<Option<CellValue>> {
        self.workbook.clear_cell(sheet, address)
    }

    /// Evaluate a cell lazily
    ///
    /// Formula cells are parsed and walked on demand; any other stored value
    /// is returned unchanged and an absent cell is `Empty`. In-cell errors
    /// (`#CYCLE!`, `#REF!`, ...) come back as values; `Err` is reserved for
    /// invalid address text.
    pub fn evaluate_cell(&self, sheet: &str, address: &str) -> FormulaResult<CellValue> {
        Evaluator::new(&self.workbook, &self.registry).evaluate_cell(sheet, address)
    }

    /// Register a function under a case-insensitive name
    ///
    /// Re-registering a name replaces the prior implementation. Host
    /// side-effect channels can be captured in the closure.
    pub fn register_function<F>(&mut self, name: &str, func: F)
    where
        F: Fn(&[CellValue], &FunctionContext<'_>) -> FormulaResult<CellValue>
            + Send
            + Sync
            + 'static,
    {
        self.registry.register(name, func);
    }

    /// Whether a function with this name is registered, case-insensitively
    pub fn has_function(&self, name: &str) -> bool {
        self.registry.has(name)
    }

    /// Registered function names in their original case, sorted
    pub fn function_names(&self) -> Vec<&str> {
        self.registry.names()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}
