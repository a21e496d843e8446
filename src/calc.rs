//! A four-function calculator.
//!
//! Grammar:
//! ```text
//! expr   := term (('+' | '-') term)*
//! term   := unary (('*' | '/') unary)*
//! unary  := '-' unary | primary
//! primary:= number | '(' expr ')'
//! number := digits ('.' digits)?
//! ```
//! Whitespace between tokens is ignored. Nothing else is accepted. Parentheses and unary minus
//! nest at most `MAX_DEPTH` levels.

use std::iter::Peekable;
use std::str::CharIndices;

/// How deeply parentheses and unary minus may nest.
pub const MAX_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalcError {
    #[error("the expression is empty")]
    Empty,
    #[error("unexpected '{found}' at position {position}")]
    Unexpected { found: char, position: usize },
    #[error("the expression ended early")]
    UnexpectedEnd,
    #[error("'{0}' is not a number")]
    BadNumber(String),
    #[error("division by zero")]
    DivisionByZero,
    #[error("the expression nests deeper than {0} levels")]
    TooDeep(usize),
}

/// Evaluates `expression`.
///
/// ```
/// # use mototaxi_ledger::calc::evaluate;
/// assert_eq!(evaluate("(3000 + 4500) * 2").unwrap(), 15000.0);
/// assert!(evaluate("1 / 0").is_err());
/// ```
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let mut parser = Parser {
        chars: expression.char_indices().peekable(),
        depth: 0,
    };
    parser.skip_whitespace();
    if parser.chars.peek().is_none() {
        return Err(CalcError::Empty);
    }
    let value = parser.expr()?;
    parser.skip_whitespace();
    match parser.chars.next() {
        None => Ok(value),
        Some((position, found)) => Err(CalcError::Unexpected { found, position }),
    }
}

/// Renders a result the way the calculator displays it: whole numbers without decimals,
/// everything else with two.
pub fn format_result(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

struct Parser<'a> {
    chars: Peekable<CharIndices<'a>>,
    depth: usize,
}

impl Parser<'_> {
    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        loop {
            match self.peek_op() {
                Some('+') => {
                    self.chars.next();
                    value += self.term()?;
                }
                Some('-') => {
                    self.chars.next();
                    value -= self.term()?;
                }
                _ => return Ok(value),
            }
        }
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        loop {
            match self.peek_op() {
                Some('*') => {
                    self.chars.next();
                    value *= self.unary()?;
                }
                Some('/') => {
                    self.chars.next();
                    let divisor = self.unary()?;
                    if divisor == 0.0 {
                        return Err(CalcError::DivisionByZero);
                    }
                    value /= divisor;
                }
                _ => return Ok(value),
            }
        }
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        if self.peek_op() == Some('-') {
            self.chars.next();
            return Ok(-self.nested(Self::unary)?);
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<f64, CalcError> {
        self.skip_whitespace();
        match self.chars.peek().copied() {
            None => Err(CalcError::UnexpectedEnd),
            Some((_, '(')) => {
                self.chars.next();
                let value = self.nested(Self::expr)?;
                self.skip_whitespace();
                match self.chars.next() {
                    Some((_, ')')) => Ok(value),
                    Some((position, found)) => Err(CalcError::Unexpected { found, position }),
                    None => Err(CalcError::UnexpectedEnd),
                }
            }
            Some((_, c)) if c.is_ascii_digit() || c == '.' => self.number(),
            Some((position, found)) => Err(CalcError::Unexpected { found, position }),
        }
    }

    fn nested(
        &mut self,
        parse: fn(&mut Self) -> Result<f64, CalcError>,
    ) -> Result<f64, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn number(&mut self) -> Result<f64, CalcError> {
        let mut text = String::new();
        while let Some(&(_, c)) = self.chars.peek() {
            if c.is_ascii_digit() || c == '.' {
                text.push(c);
                self.chars.next();
            } else {
                break;
            }
        }
        // Rust's float parser would accept "5." and ".5"; a number needs digits on both sides
        // of the point.
        let well_formed = match text.split_once('.') {
            Some((int, frac)) => !int.is_empty() && !frac.is_empty() && !frac.contains('.'),
            None => true,
        };
        if !well_formed {
            return Err(CalcError::BadNumber(text));
        }
        text.parse().map_err(|_| CalcError::BadNumber(text))
    }

    fn peek_op(&mut self) -> Option<char> {
        self.skip_whitespace();
        self.chars.peek().map(|&(_, c)| c)
    }

    fn skip_whitespace(&mut self) {
        while self.chars.next_if(|&(_, c)| c.is_whitespace()).is_some() {}
    }
}
