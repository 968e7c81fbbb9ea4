use crate::CalcError;
use std::iter::Peekable;
use std::str::Chars;

const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, PartialEq)]
pub enum CalcExpr {
    Number(f64),
    Unary {
        op: CalcUnaryOp,
        expr: Box<CalcExpr>,
    },
    Binary {
        left: Box<CalcExpr>,
        op: CalcBinaryOp,
        right: Box<CalcExpr>,
    },
    /// Left-associative run of same-precedence operators, `a + b - c`.
    /// Kept flat so long sums evaluate and drop without recursing per term.
    Chain {
        first: Box<CalcExpr>,
        rest: Vec<(CalcBinaryOp, CalcExpr)>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcUnaryOp {
    Plus,
    Neg,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcBinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
}

impl CalcExpr {
    pub fn eval(&self) -> f64 {
        match self {
            Self::Number(value) => *value,
            Self::Unary { op, expr } => {
                let value = expr.eval();
                match op {
                    CalcUnaryOp::Plus => value,
                    CalcUnaryOp::Neg => -value,
                }
            }
            Self::Binary { left, op, right } => apply(*op, left.eval(), right.eval()),
            Self::Chain { first, rest } => rest
                .iter()
                .fold(first.eval(), |acc, (op, operand)| apply(*op, acc, operand.eval())),
        }
    }
}

fn apply(op: CalcBinaryOp, left: f64, right: f64) -> f64 {
    match op {
        CalcBinaryOp::Add => left + right,
        CalcBinaryOp::Sub => left - right,
        CalcBinaryOp::Mul => left * right,
        CalcBinaryOp::Div => left / right,
        CalcBinaryOp::Rem => left % right,
        CalcBinaryOp::Pow => pow(left, right),
    }
}

// powf treats 1^NaN and 1^inf as 1; the calculator reports NaN for both.
fn pow(base: f64, exponent: f64) -> f64 {
    if exponent.is_nan() || (base.abs() == 1.0 && exponent.is_infinite()) {
        return f64::NAN;
    }
    base.powf(exponent)
}

/// Evaluates a plain arithmetic expression: numbers, `+ - * / % **` and
/// parentheses. Anything else is rejected before parsing.
pub fn safe_evaluate_expression(input: &str) -> Result<f64, CalcError> {
    if input.trim().is_empty() {
        return Err(CalcError::Empty);
    }
    if !input.chars().all(is_allowed_char) {
        return Err(CalcError::DisallowedCharacters);
    }
    let value = parse_calc_expr(input)?.eval();
    if !value.is_finite() {
        return Err(CalcError::NotFinite);
    }
    Ok(value)
}

fn is_allowed_char(ch: char) -> bool {
    ch.is_ascii_digit() || ch.is_whitespace() || "+-*/().%".contains(ch)
}

pub fn parse_calc_expr(input: &str) -> Result<CalcExpr, CalcError> {
    let mut parser = CalcParser::new(input)?;
    let expr = parser.parse_additive()?;
    if parser.peek_token().is_some() {
        return Err(CalcError::Syntax);
    }
    Ok(expr)
}

#[derive(Debug, Clone, PartialEq)]
enum CalcToken {
    Number(f64),
    Op(&'static str),
    LParen,
    RParen,
}

fn chain(first: CalcExpr, rest: Vec<(CalcBinaryOp, CalcExpr)>) -> CalcExpr {
    if rest.is_empty() {
        return first;
    }
    CalcExpr::Chain {
        first: Box::new(first),
        rest,
    }
}

struct CalcParser {
    tokens: Vec<CalcToken>,
    pos: usize,
    depth: usize,
}

impl CalcParser {
    fn new(input: &str) -> Result<Self, CalcError> {
        let tokens = tokenize_calc(input)?;
        Ok(Self {
            tokens,
            pos: 0,
            depth: 0,
        })
    }

    fn parse_additive(&mut self) -> Result<CalcExpr, CalcError> {
        let first = self.parse_multiplicative()?;
        let mut rest = Vec::new();
        loop {
            let op = if self.match_op("+") {
                CalcBinaryOp::Add
            } else if self.match_op("-") {
                CalcBinaryOp::Sub
            } else {
                break;
            };
            rest.push((op, self.parse_multiplicative()?));
        }
        Ok(chain(first, rest))
    }

    fn parse_multiplicative(&mut self) -> Result<CalcExpr, CalcError> {
        let first = self.parse_exponent()?;
        let mut rest = Vec::new();
        loop {
            let op = if self.match_op("*") {
                CalcBinaryOp::Mul
            } else if self.match_op("/") {
                CalcBinaryOp::Div
            } else if self.match_op("%") {
                CalcBinaryOp::Rem
            } else {
                break;
            };
            rest.push((op, self.parse_exponent()?));
        }
        Ok(chain(first, rest))
    }

    /// `**` is right associative and may not follow a signed operand:
    /// `-2 ** 2` is rejected, `(-2) ** 2` and `2 ** -2` are fine.
    fn parse_exponent(&mut self) -> Result<CalcExpr, CalcError> {
        if self.peek_op("+") || self.peek_op("-") {
            let operand = self.parse_unary()?;
            if self.peek_op("**") {
                return Err(CalcError::Syntax);
            }
            return Ok(operand);
        }
        let base = self.parse_primary()?;
        if self.match_op("**") {
            self.enter()?;
            let exponent = self.parse_exponent()?;
            self.depth -= 1;
            return Ok(CalcExpr::Binary {
                left: Box::new(base),
                op: CalcBinaryOp::Pow,
                right: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn parse_unary(&mut self) -> Result<CalcExpr, CalcError> {
        let op = if self.match_op("+") {
            CalcUnaryOp::Plus
        } else if self.match_op("-") {
            CalcUnaryOp::Neg
        } else {
            return self.parse_primary();
        };
        self.enter()?;
        let expr = self.parse_unary()?;
        self.depth -= 1;
        Ok(CalcExpr::Unary {
            op,
            expr: Box::new(expr),
        })
    }

    fn parse_primary(&mut self) -> Result<CalcExpr, CalcError> {
        match self.next_token() {
            Some(CalcToken::Number(value)) => Ok(CalcExpr::Number(value)),
            Some(CalcToken::LParen) => {
                self.enter()?;
                let expr = self.parse_additive()?;
                self.depth -= 1;
                match self.next_token() {
                    Some(CalcToken::RParen) => Ok(expr),
                    _ => Err(CalcError::Syntax),
                }
            }
            _ => Err(CalcError::Syntax),
        }
    }

    fn enter(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_NESTING {
            return Err(CalcError::Syntax);
        }
        Ok(())
    }

    fn peek_op(&self, op: &str) -> bool {
        matches!(self.peek_token(), Some(CalcToken::Op(value)) if *value == op)
    }

    fn match_op(&mut self, op: &str) -> bool {
        if self.peek_op(op) {
            self.pos += 1;
            return true;
        }
        false
    }

    fn peek_token(&self) -> Option<&CalcToken> {
        self.tokens.get(self.pos)
    }

    fn next_token(&mut self) -> Option<CalcToken> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }
}

// `++` and `--` lex as single tokens that no rule accepts, so `1--1` fails
// while `1 - -1` evaluates.
fn tokenize_calc(input: &str) -> Result<Vec<CalcToken>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();
    while let Some(ch) = chars.peek().copied() {
        if ch.is_whitespace() {
            chars.next();
            continue;
        }
        if ch.is_ascii_digit() || ch == '.' {
            let mut literal = String::new();
            while let Some(next) = chars.peek().copied() {
                if !next.is_ascii_digit() && next != '.' {
                    break;
                }
                literal.push(next);
                chars.next();
            }
            tokens.push(CalcToken::Number(parse_literal(&literal)?));
            continue;
        }

        let next = chars.clone().nth(1);
        if ch == '/' && next == Some('*') {
            chars.next();
            chars.next();
            skip_block_comment(&mut chars)?;
            continue;
        }
        if ch == '/' && next == Some('/') {
            skip_line_comment(&mut chars)?;
            continue;
        }
        let pair = match (ch, next) {
            ('*', Some('*')) => Some("**"),
            ('+', Some('+')) => Some("++"),
            ('-', Some('-')) => Some("--"),
            _ => None,
        };
        if let Some(op) = pair {
            tokens.push(CalcToken::Op(op));
            chars.next();
            chars.next();
            continue;
        }

        let token = match ch {
            '(' => CalcToken::LParen,
            ')' => CalcToken::RParen,
            '+' => CalcToken::Op("+"),
            '-' => CalcToken::Op("-"),
            '*' => CalcToken::Op("*"),
            '/' => CalcToken::Op("/"),
            '%' => CalcToken::Op("%"),
            _ => return Err(CalcError::DisallowedCharacters),
        };
        tokens.push(token);
        chars.next();
    }
    Ok(tokens)
}

/// `/* ... */` counts as whitespace; an unterminated comment is an error.
fn skip_block_comment(chars: &mut Peekable<Chars<'_>>) -> Result<(), CalcError> {
    let mut prev = None;
    for ch in chars.by_ref() {
        if prev == Some('*') && ch == '/' {
            return Ok(());
        }
        prev = Some(ch);
    }
    Err(CalcError::Syntax)
}

// The expression is evaluated as if wrapped in parentheses, so a `//`
// comment only works when a line break ends it before the closing paren.
fn skip_line_comment(chars: &mut Peekable<Chars<'_>>) -> Result<(), CalcError> {
    for ch in chars.by_ref() {
        if matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
            return Ok(());
        }
    }
    Err(CalcError::Syntax)
}

fn parse_literal(literal: &str) -> Result<f64, CalcError> {
    if literal == "." || literal.matches('.').count() > 1 {
        return Err(CalcError::Syntax);
    }
    let bytes = literal.as_bytes();
    if bytes.len() > 1 && bytes[0] == b'0' && bytes[1].is_ascii_digit() {
        return Err(CalcError::Syntax);
    }
    literal.parse::<f64>().map_err(|_| CalcError::Syntax)
}
