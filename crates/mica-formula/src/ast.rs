//! Formula expression tree types

use mica_core::CellAddress;

/// Formula expression tree
///
/// Trees are transient: produced per evaluation, never cached.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// Numeric literal
    Number(f64),
    /// String literal
    Text(String),
    /// Boolean literal (bare TRUE/FALSE, any case)
    Bool(bool),

    /// Single cell reference
    CellRef(CellRef),
    /// Range reference
    Range(RangeRef),

    /// Function call; the name is canonicalized to upper case by the parser
    Call { name: String, args: Vec<Expr> },

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

/// Cell reference with optional sheet qualifier
#[derive(Debug, Clone, PartialEq)]
pub struct CellRef {
    pub sheet: Option<String>,
    pub addr: CellAddress,
}

/// Range reference
///
/// Each endpoint may carry its own sheet qualifier; the evaluator rejects
/// ranges whose resolved endpoints land on different sheets.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeRef {
    pub start: CellRef,
    pub end: CellRef,
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}
