//! Criterion matching for COUNTIF and SUMIF
//!
//! A criterion is a comparison expression: an optional leading operator from
//! `>=`, `<=`, `<>`, `=`, `>`, `<` (default `=`) followed by a value. The
//! value is numbered when possible; candidates are coerced the same way
//! before the operator is applied.

use super::helpers::{compare, equals};
use mica_core::{parse_number, CellValue};
use std::cmp::Ordering;

/// A parsed criterion: operator plus target value
#[derive(Debug, Clone)]
pub struct Criterion {
    op: ComparisonOp,
    value: CellValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComparisonOp {
    Equal,
    NotEqual,
    LessThan,
    LessEqual,
    GreaterThan,
    GreaterEqual,
}

impl Criterion {
    /// Parse a criterion from an argument value
    ///
    /// Non-text values are equality targets as-is; text is split into an
    /// operator prefix and a trailing value.
    pub fn parse(expr: &CellValue) -> Self {
        match expr {
            CellValue::Text(s) => Self::parse_text(s),
            other => Self {
                op: ComparisonOp::Equal,
                value: other.clone(),
            },
        }
    }

    fn parse_text(s: &str) -> Self {
        let trimmed = s.trim();

        // Longer operators first
        let (op, rest) = if let Some(rest) = trimmed.strip_prefix(">=") {
            (ComparisonOp::GreaterEqual, rest)
        } else if let Some(rest) = trimmed.strip_prefix("<=") {
            (ComparisonOp::LessEqual, rest)
        } else if let Some(rest) = trimmed.strip_prefix("<>") {
            (ComparisonOp::NotEqual, rest)
        } else if let Some(rest) = trimmed.strip_prefix('=') {
            (ComparisonOp::Equal, rest)
        } else if let Some(rest) = trimmed.strip_prefix('>') {
            (ComparisonOp::GreaterThan, rest)
        } else if let Some(rest) = trimmed.strip_prefix('<') {
            (ComparisonOp::LessThan, rest)
        } else {
            (ComparisonOp::Equal, trimmed)
        };

        let rest = rest.trim();
        let value = match parse_number(rest) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(rest.to_string()),
        };

        Self { op, value }
    }

    /// Apply the criterion to a candidate value
    pub fn matches(&self, candidate: &CellValue) -> bool {
        // Coerce the candidate the way the target was coerced: when the
        // target is numeric, numeric text on the candidate side is numbered
        // before comparing.
        let coerced;
        let candidate = match (&self.value, candidate) {
            (CellValue::Number(_), CellValue::Text(s)) => match parse_number(s) {
                Some(n) => {
                    coerced = CellValue::Number(n);
                    &coerced
                }
                None => candidate,
            },
            _ => candidate,
        };

        match self.op {
            ComparisonOp::Equal => equals(candidate, &self.value),
            ComparisonOp::NotEqual => !equals(candidate, &self.value),
            ComparisonOp::GreaterThan => compare(candidate, &self.value) == Ordering::Greater,
            ComparisonOp::GreaterEqual => compare(candidate, &self.value) != Ordering::Less,
            ComparisonOp::LessThan => compare(candidate, &self.value) == Ordering::Less,
            ComparisonOp::LessEqual => compare(candidate, &self.value) != Ordering::Greater,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_number_criterion() {
        let c = Criterion::parse(&CellValue::Number(5.0));
        assert!(c.matches(&CellValue::Number(5.0)));
        assert!(!c.matches(&CellValue::Number(4.0)));
        // Numeric text is coerced before comparing
        assert!(c.matches(&CellValue::Text("5".into())));
    }

    #[test]
    fn test_comparison_criteria() {
        let c = Criterion::parse(&CellValue::Text(">=5".into()));
        assert!(c.matches(&CellValue::Number(5.0)));
        assert!(c.matches(&CellValue::Number(6.0)));
        assert!(!c.matches(&CellValue::Number(4.0)));

        let c = Criterion::parse(&CellValue::Text("<5".into()));
        assert!(c.matches(&CellValue::Number(4.0)));
        assert!(!c.matches(&CellValue::Number(5.0)));

        let c = Criterion::parse(&CellValue::Text("<>3".into()));
        assert!(c.matches(&CellValue::Number(2.0)));
        assert!(!c.matches(&CellValue::Number(3.0)));

        let c = Criterion::parse(&CellValue::Text("=7".into()));
        assert!(c.matches(&CellValue::Number(7.0)));
        assert!(!c.matches(&CellValue::Number(8.0)));
    }

    #[test]
    fn test_text_criterion() {
        let c = Criterion::parse(&CellValue::Text("apple".into()));
        assert!(c.matches(&CellValue::Text("apple".into())));
        assert!(!c.matches(&CellValue::Text("banana".into())));
        // Equality is identity, so case matters
        assert!(!c.matches(&CellValue::Text("APPLE".into())));
    }

    #[test]
    fn test_default_operator_is_equality() {
        let c = Criterion::parse(&CellValue::Text("10".into()));
        assert!(c.matches(&CellValue::Number(10.0)));
        assert!(!c.matches(&CellValue::Number(11.0)));
    }

    #[test]
    fn test_whitespace_around_value() {
        let c = Criterion::parse(&CellValue::Text(">= 5".into()));
        assert!(c.matches(&CellValue::Number(5.0)));
    }
}
