//! Formula parser
//!
//! A character-level recursive descent parser for formula expressions with
//! proper operator precedence. Input is the formula body without the leading
//! `=`; whitespace between tokens is insignificant.
//!
//! Grammar:
//!
//! ```text
//! expr      := add_sub
//! add_sub   := mul_div ( ('+'|'-') mul_div )*
//! mul_div   := term    ( ('*'|'/') term    )*
//! term      := '(' expr ')'
//!            | string_literal
//!            | number_literal            -- optional leading sign
//!            | Sheet '!' cell ( ':' endpoint )?
//!            | ident ( '(' args ')' | ':' endpoint | TRUE/FALSE | cell )
//! ```

use crate::ast::{BinaryOperator, CellRef, Expr, RangeRef};
use crate::error::{FormulaError, FormulaResult};
use mica_core::cell::address::is_valid_sheet_name;
use mica_core::CellAddress;

/// Parse a formula body (without the leading `=`) into an expression tree
///
/// # Example
/// ```
/// use mica_formula::parse;
///
/// let expr = parse("1+2*3").unwrap();
/// let expr = parse("SUM(A1:A10)").unwrap();
/// let expr = parse("IF(A1, \"yes\", \"no\")").unwrap();
/// ```
pub fn parse(input: &str) -> FormulaResult<Expr> {
    let mut parser = Parser::new(input);

    let expr = parser.parse_add_sub()?;

    parser.skip_whitespace();
    if !parser.is_at_end() {
        return Err(parser.error(format!(
            "unexpected trailing input '{}'",
            &parser.input[parser.pos..]
        )));
    }

    Ok(expr)
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    // === Helper methods ===

    fn peek_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.peek_char() {
            self.pos += c.len_utf8();
        }
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek_char() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, |c| c.is_whitespace()) {
            self.advance();
        }
    }

    fn is_at_end(&self) -> bool {
        self.pos >= self.input.len()
    }

    fn error<S: Into<String>>(&self, message: S) -> FormulaError {
        self.error_at(self.pos, message)
    }

    fn error_at<S: Into<String>>(&self, offset: usize, message: S) -> FormulaError {
        FormulaError::Parse {
            message: message.into(),
            offset,
        }
    }

    /// Scan a run of identifier characters (letters, digits, `_`, `$`)
    fn scan_name(&mut self) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek_char() {
            if c.is_ascii_alphanumeric() || c == '_' || c == '$' {
                self.advance();
            } else {
                break;
            }
        }
        &self.input[start..self.pos]
    }

    // === Expression parsing with precedence ===

    fn parse_add_sub(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_mul_div()?;

        loop {
            self.skip_whitespace();
            let op = match self.peek_char() {
                Some('+') => BinaryOperator::Add,
                Some('-') => BinaryOperator::Subtract,
                _ => break,
            };
            self.advance();

            let right = self.parse_mul_div()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_mul_div(&mut self) -> FormulaResult<Expr> {
        let mut left = self.parse_term()?;

        loop {
            self.skip_whitespace();
            let op = match self.peek_char() {
                Some('*') => BinaryOperator::Multiply,
                Some('/') => BinaryOperator::Divide,
                _ => break,
            };
            self.advance();

            let right = self.parse_term()?;
            left = Expr::BinaryOp {
                op,
                left: Box::new(left),
                right: Box::new(right),
            };
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> FormulaResult<Expr> {
        self.skip_whitespace();

        match self.peek_char() {
            Some('(') => {
                self.advance();
                let expr = self.parse_add_sub()?;
                self.skip_whitespace();
                if !self.eat(')') {
                    return Err(self.error("expected ')'"));
                }
                Ok(expr)
            }
            Some('"') => self.parse_string(),
            Some(c) if c.is_ascii_digit() || c == '+' || c == '-' => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => self.parse_ident(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
            None => Err(self.error("unexpected end of input")),
        }
    }

    /// Number literal: `[+-]? [0-9]+ ( '.' [0-9]+ )?`
    ///
    /// The sign belongs to the literal; there is no unary operator.
    fn parse_number(&mut self) -> FormulaResult<Expr> {
        let start = self.pos;

        if matches!(self.peek_char(), Some('+') | Some('-')) {
            self.advance();
        }

        let digits_start = self.pos;
        while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
            self.advance();
        }
        if self.pos == digits_start {
            return Err(self.error("expected digits after sign"));
        }

        if self.peek_char() == Some('.') {
            self.advance();
            let frac_start = self.pos;
            while self.peek_char().map_or(false, |c| c.is_ascii_digit()) {
                self.advance();
            }
            if self.pos == frac_start {
                return Err(self.error("expected digits after decimal point"));
            }
        }

        let text = &self.input[start..self.pos];
        let value: f64 = text
            .parse()
            .map_err(|_| self.error_at(start, format!("invalid number '{}'", text)))?;
        Ok(Expr::Number(value))
    }

    /// String literal with backslash escapes
    ///
    /// `\"`, `\\`, `\n`, `\t` yield the usual characters; any other escaped
    /// character yields itself.
    fn parse_string(&mut self) -> FormulaResult<Expr> {
        let start = self.pos;
        self.advance(); // opening quote

        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some('"') => {
                    self.advance();
                    return Ok(Expr::Text(text));
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some('n') => text.push('\n'),
                        Some('t') => text.push('\t'),
                        Some(c) => text.push(c),
                        None => {
                            return Err(self.error_at(start, "unterminated string literal"));
                        }
                    }
                    self.advance();
                }
                Some(c) => {
                    text.push(c);
                    self.advance();
                }
                None => return Err(self.error_at(start, "unterminated string literal")),
            }
        }
    }

    /// Identifier dispatch: sheet qualifier, function call, boolean literal,
    /// or cell reference (possibly extended to a range)
    fn parse_ident(&mut self) -> FormulaResult<Expr> {
        let start = self.pos;
        let token = self.scan_name();
        if token.is_empty() {
            return Err(self.error("expected identifier"));
        }

        // Sheet-qualified reference
        if self.peek_char() == Some('!') {
            if !is_valid_sheet_name(token) {
                return Err(self.error_at(start, format!("invalid sheet name '{}'", token)));
            }
            self.advance(); // '!'
            let addr = self.parse_cell_after_bang()?;
            let start_ref = CellRef {
                sheet: Some(token.to_string()),
                addr,
            };
            if self.eat(':') {
                let end = self.parse_range_endpoint()?;
                return Ok(Expr::Range(RangeRef {
                    start: start_ref,
                    end,
                }));
            }
            return Ok(Expr::CellRef(start_ref));
        }

        // Function call
        if self.peek_char() == Some('(') {
            self.advance();
            let mut args = Vec::new();
            self.skip_whitespace();
            if self.peek_char() != Some(')') {
                loop {
                    args.push(self.parse_add_sub()?);
                    self.skip_whitespace();
                    if !self.eat(',') {
                        break;
                    }
                }
            }
            if !self.eat(')') {
                return Err(self.error("expected ')' after arguments"));
            }
            return Ok(Expr::Call {
                name: token.to_uppercase(),
                args,
            });
        }

        // Boolean literals, any case
        if token.eq_ignore_ascii_case("TRUE") {
            return Ok(Expr::Bool(true));
        }
        if token.eq_ignore_ascii_case("FALSE") {
            return Ok(Expr::Bool(false));
        }

        // Cell reference, possibly the start of a range
        if let Ok(addr) = CellAddress::parse(token) {
            let start_ref = CellRef { sheet: None, addr };
            if self.eat(':') {
                let end = self.parse_range_endpoint()?;
                return Ok(Expr::Range(RangeRef {
                    start: start_ref,
                    end,
                }));
            }
            return Ok(Expr::CellRef(start_ref));
        }

        Err(self.error_at(start, format!("unrecognized token '{}'", token)))
    }

    /// Cell reference immediately following a `!`
    fn parse_cell_after_bang(&mut self) -> FormulaResult<CellAddress> {
        let start = self.pos;
        let token = self.scan_name();
        CellAddress::parse(token)
            .map_err(|_| self.error_at(start, format!("expected cell reference after '!', got '{}'", token)))
    }

    /// Range endpoint after `:`, with its own optional sheet qualifier
    fn parse_range_endpoint(&mut self) -> FormulaResult<CellRef> {
        let start = self.pos;
        let token = self.scan_name();
        if token.is_empty() {
            return Err(self.error("expected cell reference after ':'"));
        }

        if self.peek_char() == Some('!') {
            if !is_valid_sheet_name(token) {
                return Err(self.error_at(start, format!("invalid sheet name '{}'", token)));
            }
            self.advance();
            let addr = self.parse_cell_after_bang()?;
            return Ok(CellRef {
                sheet: Some(token.to_string()),
                addr,
            });
        }

        let addr = CellAddress::parse(token)
            .map_err(|_| self.error_at(start, format!("invalid cell reference '{}'", token)))?;
        Ok(CellRef { sheet: None, addr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mica_core::CellAddress;

    fn cell(col: u32, row: u32) -> CellRef {
        CellRef {
            sheet: None,
            addr: CellAddress::new(col, row),
        }
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse("42").unwrap(), Expr::Number(42.0));
        assert_eq!(parse("3.14").unwrap(), Expr::Number(3.14));
        assert_eq!(parse("-7").unwrap(), Expr::Number(-7.0));
        assert_eq!(parse("+2.5").unwrap(), Expr::Number(2.5));
    }

    #[test]
    fn test_parse_number_errors() {
        assert!(parse("-").is_err());
        assert!(parse("+").is_err());
        assert!(parse("1.").is_err());
        assert!(parse(".5").is_err());
    }

    #[test]
    fn test_parse_string() {
        assert_eq!(parse("\"Hello\"").unwrap(), Expr::Text("Hello".into()));
        assert_eq!(
            parse(r#""a\"b""#).unwrap(),
            Expr::Text("a\"b".into())
        );
        assert_eq!(parse(r#""a\\b""#).unwrap(), Expr::Text("a\\b".into()));
        assert_eq!(parse(r#""a\nb""#).unwrap(), Expr::Text("a\nb".into()));
        assert_eq!(parse(r#""a\tb""#).unwrap(), Expr::Text("a\tb".into()));
        // Unknown escapes yield the character itself
        assert_eq!(parse(r#""a\qb""#).unwrap(), Expr::Text("aqb".into()));
        assert!(parse("\"unterminated").is_err());
    }

    #[test]
    fn test_parse_boolean() {
        assert_eq!(parse("TRUE").unwrap(), Expr::Bool(true));
        assert_eq!(parse("false").unwrap(), Expr::Bool(false));
        assert_eq!(parse("True").unwrap(), Expr::Bool(true));
    }

    #[test]
    fn test_parse_arithmetic_precedence() {
        // 1+(2*3) due to precedence
        let expr = parse("1+2*3").unwrap();
        if let Expr::BinaryOp { op, left, right } = expr {
            assert_eq!(op, BinaryOperator::Add);
            assert_eq!(*left, Expr::Number(1.0));
            assert!(matches!(
                *right,
                Expr::BinaryOp {
                    op: BinaryOperator::Multiply,
                    ..
                }
            ));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_left_associativity() {
        // (1-2)-3
        let expr = parse("1-2-3").unwrap();
        if let Expr::BinaryOp { op, left, right } = expr {
            assert_eq!(op, BinaryOperator::Subtract);
            assert!(matches!(*left, Expr::BinaryOp { .. }));
            assert_eq!(*right, Expr::Number(3.0));
        } else {
            panic!("Expected BinaryOp");
        }
    }

    #[test]
    fn test_parse_parentheses() {
        let expr = parse("(1+2)*3").unwrap();
        if let Expr::BinaryOp { op, left, right } = expr {
            assert_eq!(op, BinaryOperator::Multiply);
            assert!(matches!(
                *left,
                Expr::BinaryOp {
                    op: BinaryOperator::Add,
                    ..
                }
            ));
            assert_eq!(*right, Expr::Number(3.0));
        } else {
            panic!("Expected BinaryOp");
        }

        assert!(parse("(1+2").is_err());
    }

    #[test]
    fn test_parse_cell_reference() {
        assert_eq!(parse("A1").unwrap(), Expr::CellRef(cell(1, 1)));
        assert_eq!(parse("b2").unwrap(), Expr::CellRef(cell(2, 2)));

        // Absolute markers are stripped in the tree
        assert_eq!(parse("$B$2").unwrap(), Expr::CellRef(cell(2, 2)));
        assert_eq!(parse("B$2").unwrap(), Expr::CellRef(cell(2, 2)));
    }

    #[test]
    fn test_parse_sheet_qualified() {
        let expr = parse("Sheet1!A1").unwrap();
        if let Expr::CellRef(r) = expr {
            assert_eq!(r.sheet.as_deref(), Some("Sheet1"));
            assert_eq!(r.addr, CellAddress::new(1, 1));
        } else {
            panic!("Expected CellRef");
        }

        assert!(parse("Sheet1!").is_err());
        assert!(parse("Sheet1!XYZ").is_err());
    }

    #[test]
    fn test_parse_range() {
        let expr = parse("A1:B2").unwrap();
        if let Expr::Range(r) = expr {
            assert_eq!(r.start, cell(1, 1));
            assert_eq!(r.end, cell(2, 2));
        } else {
            panic!("Expected Range");
        }

        // Qualified on the left only
        let expr = parse("Data!A1:B2").unwrap();
        if let Expr::Range(r) = expr {
            assert_eq!(r.start.sheet.as_deref(), Some("Data"));
            assert_eq!(r.end.sheet, None);
        } else {
            panic!("Expected Range");
        }

        // Each endpoint may carry its own qualifier
        let expr = parse("One!A1:Two!B2").unwrap();
        if let Expr::Range(r) = expr {
            assert_eq!(r.start.sheet.as_deref(), Some("One"));
            assert_eq!(r.end.sheet.as_deref(), Some("Two"));
        } else {
            panic!("Expected Range");
        }

        assert!(parse("A1:").is_err());
    }

    #[test]
    fn test_parse_function() {
        let expr = parse("sum(1,2,3)").unwrap();
        if let Expr::Call { name, args } = expr {
            assert_eq!(name, "SUM");
            assert_eq!(args.len(), 3);
        } else {
            panic!("Expected Call");
        }

        let expr = parse("SUM(A1:A10)").unwrap();
        if let Expr::Call { name, args } = expr {
            assert_eq!(name, "SUM");
            assert_eq!(args.len(), 1);
            assert!(matches!(&args[0], Expr::Range(_)));
        } else {
            panic!("Expected Call");
        }

        // Empty argument list
        let expr = parse("NOW()").unwrap();
        assert!(matches!(expr, Expr::Call { ref args, .. } if args.is_empty()));

        assert!(parse("SUM(1,2").is_err());
    }

    #[test]
    fn test_parse_nested_function() {
        let expr = parse("IF(A1, SUM(B1:B10), 0)").unwrap();
        if let Expr::Call { name, args } = expr {
            assert_eq!(name, "IF");
            assert_eq!(args.len(), 3);
        } else {
            panic!("Expected Call");
        }
    }

    #[test]
    fn test_whitespace_insignificant() {
        assert_eq!(parse(" 1 + 2 ").unwrap(), parse("1+2").unwrap());
        assert_eq!(
            parse("SUM( 1 , 2 )").unwrap(),
            parse("SUM(1,2)").unwrap()
        );
    }

    #[test]
    fn test_trailing_input_rejected() {
        let err = parse("1 2").unwrap_err();
        match err {
            FormulaError::Parse { offset, .. } => assert_eq!(offset, 2),
            other => panic!("Expected parse error, got {:?}", other),
        }
        assert!(parse("A1 B2").is_err());
    }

    #[test]
    fn test_unrecognized_token() {
        assert!(parse("nonsense").is_err());
        assert!(parse("@").is_err());
    }
}
