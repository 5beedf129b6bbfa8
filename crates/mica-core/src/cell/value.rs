//! Cell value types

use std::cmp::Ordering;
use std::fmt;

/// Represents the value stored in (or produced by evaluating) a cell
///
/// Evaluation output is the same union as cell content: evaluating a formula
/// cell yields one of these values, and every other stored value passes
/// through evaluation unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Empty cell (no value)
    Empty,

    /// Numeric value
    Number(f64),

    /// Logical value
    Bool(bool),

    /// Text value
    Text(String),

    /// In-cell error value (#VALUE!, #REF!, etc.)
    Error(ErrorValue),

    /// An ordered sequence of values
    ///
    /// Produced by range evaluation (flat, row-major) and used by hosts to
    /// store row-oriented tables directly in a cell (rows as nested lists).
    /// The evaluator hands stored lists to functions verbatim.
    List(Vec<CellValue>),

    /// Formula source text, including the leading '='
    Formula(String),
}

impl CellValue {
    /// Create an error value
    pub fn error<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        CellValue::Error(ErrorValue::new(kind, message))
    }

    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Check if the cell contains a formula
    pub fn is_formula(&self) -> bool {
        matches!(self, CellValue::Formula(_))
    }

    /// Check if the cell contains an error
    pub fn is_error(&self) -> bool {
        matches!(self, CellValue::Error(_))
    }

    /// Get the error kind if this is an error value
    pub fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            CellValue::Error(e) => Some(e.kind()),
            _ => None,
        }
    }

    /// Get the formula text if this is a formula cell
    pub fn formula_text(&self) -> Option<&str> {
        match self {
            CellValue::Formula(text) => Some(text),
            _ => None,
        }
    }

    /// Try to coerce the value to a number
    ///
    /// Numbers coerce to themselves; text goes through the permissive numeric
    /// parser. Logicals, empties, errors, and lists do not coerce; arithmetic
    /// on them is a `#VALUE!` error.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Truthiness: non-zero, non-empty-string, non-false
    pub fn truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::Number(n) => *n != 0.0,
            CellValue::Bool(b) => *b,
            CellValue::Text(s) => !s.is_empty(),
            CellValue::Error(_) => true,
            CellValue::List(items) => !items.is_empty(),
            CellValue::Formula(_) => true,
        }
    }

    /// The string form of the value
    ///
    /// Integral numbers render without a decimal point, logicals as
    /// TRUE/FALSE, errors as their code, lists comma-joined, empty as "".
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Bool(true) => "TRUE".to_string(),
            CellValue::Bool(false) => "FALSE".to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Error(e) => e.to_string(),
            CellValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|v| v.display_string()).collect();
                parts.join(",")
            }
            CellValue::Formula(text) => text.clone(),
        }
    }
}

impl Default for CellValue {
    fn default() -> Self {
        CellValue::Empty
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_string())
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::from(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        if s.starts_with('=') {
            CellValue::Formula(s)
        } else {
            CellValue::Text(s)
        }
    }
}

impl From<Vec<CellValue>> for CellValue {
    fn from(items: Vec<CellValue>) -> Self {
        CellValue::List(items)
    }
}

impl From<ErrorValue> for CellValue {
    fn from(e: ErrorValue) -> Self {
        CellValue::Error(e)
    }
}

/// Permissive numeric parser used for text-to-number coercion
///
/// Trims whitespace and accepts anything `f64` parsing accepts. The empty
/// string is not a number.
pub fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// The closed set of in-cell error kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// #NAME? - Unrecognized function name
    Name,
    /// #REF! - Malformed or cross-sheet range, out-of-bounds index
    Ref,
    /// #VALUE! - Wrong type of argument or operand
    Value,
    /// #DIV/0! - Division by zero
    Div0,
    /// #N/A - Lookup or match not found
    Na,
    /// #NUM! - Numeric domain violation
    Num,
    /// #CYCLE! - Circular reference during evaluation
    Cycle,
}

impl ErrorKind {
    /// The display code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Name => "#NAME?",
            ErrorKind::Ref => "#REF!",
            ErrorKind::Value => "#VALUE!",
            ErrorKind::Div0 => "#DIV/0!",
            ErrorKind::Na => "#N/A",
            ErrorKind::Num => "#NUM!",
            ErrorKind::Cycle => "#CYCLE!",
        }
    }

    /// Parse an error code string
    pub fn from_code(s: &str) -> Option<Self> {
        match s.to_uppercase().as_str() {
            "#NAME?" => Some(ErrorKind::Name),
            "#REF!" => Some(ErrorKind::Ref),
            "#VALUE!" => Some(ErrorKind::Value),
            "#DIV/0!" => Some(ErrorKind::Div0),
            "#N/A" => Some(ErrorKind::Na),
            "#NUM!" => Some(ErrorKind::Num),
            "#CYCLE!" => Some(ErrorKind::Cycle),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// An in-cell error value: a kind plus a diagnostic message
///
/// The message exists for diagnostics only; the textual form of an error is
/// its code, and two error values compare equal when their kinds match.
#[derive(Debug, Clone)]
pub struct ErrorValue {
    kind: ErrorKind,
    message: String,
}

impl ErrorValue {
    /// Create a new error value
    pub fn new<S: Into<String>>(kind: ErrorKind, message: S) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// The diagnostic message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The display code (e.g. `#CYCLE!`)
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl PartialEq for ErrorValue {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for ErrorValue {}

impl PartialOrd for ErrorValue {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.code().partial_cmp(other.code())
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
