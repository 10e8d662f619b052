//! Tokenizer, parser, and evaluator for the session script language.
//!
//! A session script is line-oriented. The leading run of `#` comment lines
//! forms the session docstring. Statements are `use <session>`, parameter
//! declarations, `lock`/`unlock`, assignments, and (in the shell) bare
//! expressions. Values are strings or quantities: an `f64` magnitude with an
//! optional unit symbol. Assigning to a declared parameter enforces, in
//! order: lock, access mode, unit compatibility, and limits.

use std::collections::BTreeMap;
use std::fmt;

use crate::internal::error::ScriptError;

/// Keywords that terminate the value expression of a `param` declaration,
/// so they are never taken as a unit symbol.
const STOP_KEYWORDS: [&str; 3] = ["limits", "readonly", "writeonly"];

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Quantity { magnitude: f64, unit: Option<String> },
}

impl Value {
    pub fn scalar(magnitude: f64) -> Self {
        Value::Quantity {
            magnitude,
            unit: None,
        }
    }

    pub fn quantity(magnitude: f64, unit: &str) -> Self {
        Value::Quantity {
            magnitude,
            unit: Some(unit.to_owned()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{s}"),
            Value::Quantity {
                magnitude,
                unit: Some(unit),
            } => write!(f, "{magnitude} {unit}"),
            Value::Quantity {
                magnitude,
                unit: None,
            } => write!(f, "{magnitude}"),
        }
    }
}

/// Access mode of a declared parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

#[derive(Debug, Clone)]
pub struct Parameter {
    pub value: Value,
    pub unit: Option<String>,
    pub limits: Option<(f64, f64)>,
    pub access: Access,
    pub locked: bool,
}

#[derive(Debug, Clone)]
pub enum Entry {
    Binding(Value),
    Parameter(Parameter),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    fn symbol(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Value),
    Ident(String),
    Neg(Box<Expr>),
    Binary {
        op: BinOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Use(String),
    Declare {
        name: String,
        unit: Option<String>,
        value: Option<Expr>,
        limits: Option<(f64, f64)>,
        access: Access,
    },
    Assign {
        name: String,
        value: Expr,
    },
    Lock(String),
    Unlock(String),
    Expr(Expr),
}

/// A fully parsed session script: docstring plus numbered statements.
#[derive(Debug, Clone)]
pub struct ParsedScript {
    pub docstring: Option<String>,
    pub statements: Vec<(usize, Statement)>,
}

// ------------------------------------------------------------------
// Tokenizer
// ------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
enum Tok {
    Ident(String),
    Number(f64),
    Str(String),
    Plus,
    Minus,
    Star,
    Slash,
    Eq,
    Colon,
    LParen,
    RParen,
    DotDot,
}

impl Tok {
    fn describe(&self) -> String {
        match self {
            Tok::Ident(name) => format!("`{name}'"),
            Tok::Number(n) => format!("`{n}'"),
            Tok::Str(_) => "string literal".to_owned(),
            Tok::Plus => "`+'".to_owned(),
            Tok::Minus => "`-'".to_owned(),
            Tok::Star => "`*'".to_owned(),
            Tok::Slash => "`/'".to_owned(),
            Tok::Eq => "`='".to_owned(),
            Tok::Colon => "`:'".to_owned(),
            Tok::LParen => "`('".to_owned(),
            Tok::RParen => "`)'".to_owned(),
            Tok::DotDot => "`..'".to_owned(),
        }
    }
}

fn lex(line: &str) -> Result<Vec<Tok>, String> {
    let chars: Vec<char> = line.chars().collect();
    let mut toks = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            ' ' | '\t' | '\r' => i += 1,
            '#' => break,
            '"' => {
                let mut s = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        Some('"') => {
                            i += 1;
                            break;
                        }
                        Some(&ch) => {
                            s.push(ch);
                            i += 1;
                        }
                        None => return Err("unterminated string literal".to_owned()),
                    }
                }
                toks.push(Tok::Str(s));
            }
            '+' => {
                toks.push(Tok::Plus);
                i += 1;
            }
            '-' => {
                toks.push(Tok::Minus);
                i += 1;
            }
            '*' => {
                toks.push(Tok::Star);
                i += 1;
            }
            '/' => {
                toks.push(Tok::Slash);
                i += 1;
            }
            '=' => {
                toks.push(Tok::Eq);
                i += 1;
            }
            ':' => {
                toks.push(Tok::Colon);
                i += 1;
            }
            '(' => {
                toks.push(Tok::LParen);
                i += 1;
            }
            ')' => {
                toks.push(Tok::RParen);
                i += 1;
            }
            '.' if chars.get(i + 1) == Some(&'.') => {
                toks.push(Tok::DotDot);
                i += 2;
            }
            _ if c.is_ascii_digit()
                || (c == '.' && matches!(chars.get(i + 1), Some(d) if d.is_ascii_digit())) =>
            {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                if i < chars.len() && chars[i] == '.' && chars.get(i + 1) != Some(&'.') {
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let number = text
                    .parse::<f64>()
                    .map_err(|_| format!("invalid number `{text}'"))?;
                toks.push(Tok::Number(number));
            }
            _ if c.is_ascii_alphabetic() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                toks.push(Tok::Ident(chars[start..i].iter().collect()));
            }
            _ => return Err(format!("unexpected character `{c}'")),
        }
    }
    Ok(toks)
}

// ------------------------------------------------------------------
// Parser
// ------------------------------------------------------------------

struct Parser {
    toks: Vec<Tok>,
    pos: usize,
}

impl Parser {
    fn new(toks: Vec<Tok>) -> Self {
        Parser { toks, pos: 0 }
    }

    fn peek(&self) -> Option<&Tok> {
        self.toks.get(self.pos)
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.toks.get(self.pos).cloned();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn peek_keyword(&self, keyword: &str) -> bool {
        matches!(self.peek(), Some(Tok::Ident(word)) if word == keyword)
    }

    fn expect_ident(&mut self, what: &str) -> Result<String, String> {
        match self.advance() {
            Some(Tok::Ident(name)) => Ok(name),
            Some(tok) => Err(format!("expected {what}, found {}", tok.describe())),
            None => Err(format!("expected {what}")),
        }
    }

    fn expect_end(&mut self) -> Result<(), String> {
        match self.peek() {
            None => Ok(()),
            Some(tok) => Err(format!("unexpected {}", tok.describe())),
        }
    }

    fn parse_statement(&mut self) -> Result<Statement, String> {
        let keyword = match self.peek() {
            Some(Tok::Ident(word)) => Some(word.clone()),
            _ => None,
        };
        match keyword.as_deref() {
            Some("use") => {
                self.advance();
                let name = self.expect_ident("session name")?;
                self.expect_end()?;
                Ok(Statement::Use(name))
            }
            Some("lock") => {
                self.advance();
                let name = self.expect_ident("parameter name")?;
                self.expect_end()?;
                Ok(Statement::Lock(name))
            }
            Some("unlock") => {
                self.advance();
                let name = self.expect_ident("parameter name")?;
                self.expect_end()?;
                Ok(Statement::Unlock(name))
            }
            Some("param") => self.parse_declaration(),
            _ => {
                if matches!(self.peek(), Some(Tok::Ident(_)))
                    && matches!(self.toks.get(self.pos + 1), Some(Tok::Eq))
                {
                    let name = self.expect_ident("name")?;
                    self.advance(); // '='
                    let value = self.parse_expr()?;
                    self.expect_end()?;
                    Ok(Statement::Assign { name, value })
                } else {
                    let expr = self.parse_expr()?;
                    self.expect_end()?;
                    Ok(Statement::Expr(expr))
                }
            }
        }
    }

    fn parse_declaration(&mut self) -> Result<Statement, String> {
        self.advance(); // 'param'
        let name = self.expect_ident("parameter name")?;
        let mut unit = None;
        if matches!(self.peek(), Some(Tok::Colon)) {
            self.advance();
            unit = Some(self.expect_ident("unit symbol")?);
        }
        let mut value = None;
        if matches!(self.peek(), Some(Tok::Eq)) {
            self.advance();
            value = Some(self.parse_expr()?);
        }
        let mut limits = None;
        if self.peek_keyword("limits") {
            self.advance();
            let lo = self.parse_signed_number()?;
            match self.advance() {
                Some(Tok::DotDot) => {}
                _ => return Err("expected `..' in limits range".to_owned()),
            }
            let hi = self.parse_signed_number()?;
            if hi < lo {
                return Err(format!("empty limits range {lo}..{hi}"));
            }
            limits = Some((lo, hi));
        }
        let mut access = Access::ReadWrite;
        if self.peek_keyword("readonly") {
            self.advance();
            access = Access::ReadOnly;
        } else if self.peek_keyword("writeonly") {
            self.advance();
            access = Access::WriteOnly;
        }
        self.expect_end()?;
        Ok(Statement::Declare {
            name,
            unit,
            value,
            limits,
            access,
        })
    }

    fn parse_signed_number(&mut self) -> Result<f64, String> {
        let negative = if matches!(self.peek(), Some(Tok::Minus)) {
            self.advance();
            true
        } else {
            false
        };
        match self.advance() {
            Some(Tok::Number(n)) => Ok(if negative { -n } else { n }),
            Some(tok) => Err(format!("expected number, found {}", tok.describe())),
            None => Err("expected number".to_owned()),
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_term()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Plus) => Some(BinOp::Add),
                Some(Tok::Minus) => Some(BinOp::Sub),
                _ => None,
            };
            let Some(op) = op else { break };
            self.advance();
            let rhs = self.parse_term()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_term(&mut self) -> Result<Expr, String> {
        let mut lhs = self.parse_factor()?;
        loop {
            let op = match self.peek() {
                Some(Tok::Star) => Some(BinOp::Mul),
                Some(Tok::Slash) => Some(BinOp::Div),
                _ => None,
            };
            let Some(op) = op else { break };
            self.advance();
            let rhs = self.parse_factor()?;
            lhs = Expr::Binary {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            };
        }
        Ok(lhs)
    }

    fn parse_factor(&mut self) -> Result<Expr, String> {
        match self.advance() {
            Some(Tok::Number(n)) => {
                let unit = match self.peek() {
                    Some(Tok::Ident(word)) if !STOP_KEYWORDS.contains(&word.as_str()) => {
                        Some(word.clone())
                    }
                    _ => None,
                };
                if let Some(unit) = unit {
                    self.advance();
                    Ok(Expr::Literal(Value::quantity(n, &unit)))
                } else {
                    Ok(Expr::Literal(Value::scalar(n)))
                }
            }
            Some(Tok::Str(s)) => Ok(Expr::Literal(Value::Str(s))),
            Some(Tok::Ident(name)) => Ok(Expr::Ident(name)),
            Some(Tok::Minus) => Ok(Expr::Neg(Box::new(self.parse_factor()?))),
            Some(Tok::LParen) => {
                let expr = self.parse_expr()?;
                match self.advance() {
                    Some(Tok::RParen) => Ok(expr),
                    _ => Err("expected `)'".to_owned()),
                }
            }
            Some(tok) => Err(format!("unexpected {}", tok.describe())),
            None => Err("unexpected end of input".to_owned()),
        }
    }
}

/// Parse one input line. `Ok(None)` for blank and comment-only lines.
pub fn parse_line(line: &str) -> Result<Option<Statement>, ScriptError> {
    parse_numbered(line, 1)
}

fn parse_numbered(line: &str, line_no: usize) -> Result<Option<Statement>, ScriptError> {
    let toks = lex(line).map_err(|message| ScriptError::Parse {
        line: line_no,
        message,
    })?;
    if toks.is_empty() {
        return Ok(None);
    }
    let mut parser = Parser::new(toks);
    parser
        .parse_statement()
        .map(Some)
        .map_err(|message| ScriptError::Parse {
            line: line_no,
            message,
        })
}

/// Parse a whole script into its docstring and numbered statements.
pub fn parse_script(source: &str) -> Result<ParsedScript, ScriptError> {
    let mut statements = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        if let Some(statement) = parse_numbered(line, idx + 1)? {
            statements.push((idx + 1, statement));
        }
    }
    Ok(ParsedScript {
        docstring: docstring(source),
        statements,
    })
}

/// Extract the docstring: the leading run of `#` comment lines, markers
/// stripped. A blank or non-comment line ends the block.
pub fn docstring(source: &str) -> Option<String> {
    let mut lines = Vec::new();
    for line in source.lines() {
        let trimmed = line.trim_start();
        if let Some(rest) = trimmed.strip_prefix('#') {
            lines.push(rest.strip_prefix(' ').unwrap_or(rest).to_owned());
        } else {
            break;
        }
    }
    while matches!(lines.last(), Some(l) if l.is_empty()) {
        lines.pop();
    }
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

// ------------------------------------------------------------------
// Evaluation
// ------------------------------------------------------------------

/// The evaluated contents of a session: bindings and parameters by name.
#[derive(Debug, Clone, Default)]
pub struct Namespace {
    entries: BTreeMap<String, Entry>,
}

impl Namespace {
    pub fn new() -> Self {
        Namespace::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Entry)> {
        self.entries.iter()
    }

    /// Names not prefixed with an underscore, sorted.
    pub fn public_names(&self) -> Vec<String> {
        self.entries
            .keys()
            .filter(|name| !name.starts_with('_'))
            .cloned()
            .collect()
    }

    /// Merge another namespace's public entries into this one, overwriting
    /// same-named entries.
    pub fn merge_public(&mut self, other: &Namespace) {
        for (name, entry) in other.iter() {
            if !name.starts_with('_') {
                self.entries.insert(name.clone(), entry.clone());
            }
        }
    }

    /// Read a name, honoring parameter access rights.
    pub fn get(&self, name: &str) -> Result<Value, ScriptError> {
        match self.entries.get(name) {
            None => Err(ScriptError::Parameter(name.to_owned())),
            Some(Entry::Binding(value)) => Ok(value.clone()),
            Some(Entry::Parameter(param)) => {
                if param.access == Access::WriteOnly {
                    return Err(ScriptError::ReadAccess(name.to_owned()));
                }
                Ok(param.value.clone())
            }
        }
    }

    /// Write a name. For parameters this enforces, in order: lock, access
    /// mode, unit compatibility, and limits. Unknown names become bindings.
    pub fn assign(&mut self, name: &str, value: Value) -> Result<(), ScriptError> {
        match self.entries.get_mut(name) {
            Some(Entry::Parameter(param)) => {
                if param.locked {
                    return Err(ScriptError::Lock(name.to_owned()));
                }
                if param.access == Access::ReadOnly {
                    return Err(ScriptError::WriteAccess(name.to_owned()));
                }
                let magnitude = match (&param.unit, &value) {
                    (
                        Some(unit),
                        Value::Quantity {
                            magnitude,
                            unit: Some(value_unit),
                        },
                    ) if value_unit == unit => *magnitude,
                    (Some(unit), other) => {
                        return Err(ScriptError::Unit(format!(
                            "`{name}' can only receive values of unit {unit} but got {other}"
                        )));
                    }
                    (
                        None,
                        Value::Quantity {
                            magnitude,
                            unit: None,
                        },
                    ) => *magnitude,
                    (None, other) => {
                        return Err(ScriptError::Unit(format!(
                            "`{name}' can only receive plain values but got {other}"
                        )));
                    }
                };
                if let Some((lo, hi)) = param.limits
                    && (magnitude < lo || magnitude > hi)
                {
                    return Err(ScriptError::Limit(format!(
                        "{value} for `{name}' is out of range"
                    )));
                }
                param.value = value;
                Ok(())
            }
            Some(Entry::Binding(slot)) => {
                *slot = value;
                Ok(())
            }
            None => {
                self.entries.insert(name.to_owned(), Entry::Binding(value));
                Ok(())
            }
        }
    }

    fn declare(&mut self, name: &str, param: Parameter) -> Result<(), ScriptError> {
        if self.entries.contains_key(name) {
            return Err(ScriptError::Eval(format!("`{name}' is already defined")));
        }
        self.entries
            .insert(name.to_owned(), Entry::Parameter(param));
        Ok(())
    }

    fn set_locked(&mut self, name: &str, locked: bool) -> Result<(), ScriptError> {
        match self.entries.get_mut(name) {
            Some(Entry::Parameter(param)) => {
                param.locked = locked;
                Ok(())
            }
            _ => Err(ScriptError::Parameter(name.to_owned())),
        }
    }

    /// Execute a single non-import statement against this namespace.
    /// Returns the value of a bare expression statement, `None` otherwise.
    /// `use` statements must be resolved by the session loader, which has
    /// access to the store.
    pub fn execute(&mut self, statement: &Statement) -> Result<Option<Value>, ScriptError> {
        match statement {
            Statement::Use(name) => Err(ScriptError::Eval(format!(
                "`use {name}' can only appear in a session script"
            ))),
            Statement::Declare {
                name,
                unit,
                value,
                limits,
                access,
            } => {
                let initial = match value {
                    Some(expr) => eval(expr, self)?,
                    None => Value::Quantity {
                        magnitude: 0.0,
                        unit: unit.clone(),
                    },
                };
                let (value, unit) = match (unit, initial) {
                    (
                        Some(declared),
                        Value::Quantity {
                            magnitude,
                            unit: None,
                        },
                    ) => (
                        Value::quantity(magnitude, declared),
                        Some(declared.clone()),
                    ),
                    (
                        Some(declared),
                        Value::Quantity {
                            magnitude,
                            unit: Some(actual),
                        },
                    ) if actual == *declared => (
                        Value::quantity(magnitude, declared),
                        Some(declared.clone()),
                    ),
                    (Some(declared), other) => {
                        return Err(ScriptError::Unit(format!(
                            "`{name}' can only receive values of unit {declared} but got {other}"
                        )));
                    }
                    (
                        None,
                        Value::Quantity {
                            magnitude,
                            unit: inferred,
                        },
                    ) => (
                        Value::Quantity {
                            magnitude,
                            unit: inferred.clone(),
                        },
                        inferred,
                    ),
                    (None, Value::Str(_)) => {
                        return Err(ScriptError::Eval(format!(
                            "parameter `{name}' must hold a quantity; use a plain binding for strings"
                        )));
                    }
                };
                if let (Some((lo, hi)), Value::Quantity { magnitude, .. }) = (limits, &value)
                    && (*magnitude < *lo || *magnitude > *hi)
                {
                    return Err(ScriptError::Limit(format!(
                        "{value} for `{name}' is out of range"
                    )));
                }
                self.declare(
                    name,
                    Parameter {
                        value,
                        unit,
                        limits: *limits,
                        access: *access,
                        locked: false,
                    },
                )?;
                Ok(None)
            }
            Statement::Assign { name, value } => {
                let value = eval(value, self)?;
                self.assign(name, value)?;
                Ok(None)
            }
            Statement::Lock(name) => {
                self.set_locked(name, true)?;
                Ok(None)
            }
            Statement::Unlock(name) => {
                self.set_locked(name, false)?;
                Ok(None)
            }
            Statement::Expr(expr) => Ok(Some(eval(expr, self)?)),
        }
    }
}

fn display_unit(unit: &Option<String>) -> &str {
    unit.as_deref().unwrap_or("1")
}

/// Evaluate an expression against a namespace.
pub fn eval(expr: &Expr, ns: &Namespace) -> Result<Value, ScriptError> {
    match expr {
        Expr::Literal(value) => Ok(value.clone()),
        Expr::Ident(name) => ns.get(name),
        Expr::Neg(inner) => match eval(inner, ns)? {
            Value::Quantity { magnitude, unit } => Ok(Value::Quantity {
                magnitude: -magnitude,
                unit,
            }),
            Value::Str(_) => Err(ScriptError::Eval("cannot negate a string".to_owned())),
        },
        Expr::Binary { op, lhs, rhs } => apply(*op, eval(lhs, ns)?, eval(rhs, ns)?),
    }
}

fn apply(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, ScriptError> {
    let (a, unit_a, b, unit_b) = match (&lhs, &rhs) {
        (
            Value::Quantity {
                magnitude: a,
                unit: ua,
            },
            Value::Quantity {
                magnitude: b,
                unit: ub,
            },
        ) => (*a, ua.clone(), *b, ub.clone()),
        _ => {
            return Err(ScriptError::Eval(format!(
                "cannot apply `{}' to a string",
                op.symbol()
            )));
        }
    };
    match op {
        BinOp::Add | BinOp::Sub => {
            if unit_a != unit_b {
                return Err(ScriptError::Unit(format!(
                    "incompatible units `{}' and `{}'",
                    display_unit(&unit_a),
                    display_unit(&unit_b)
                )));
            }
            let magnitude = if op == BinOp::Add { a + b } else { a - b };
            Ok(Value::Quantity {
                magnitude,
                unit: unit_a,
            })
        }
        BinOp::Mul => match (unit_a, unit_b) {
            (Some(_), Some(_)) => Err(ScriptError::Unit(
                "cannot multiply two united quantities".to_owned(),
            )),
            (unit_a, unit_b) => Ok(Value::Quantity {
                magnitude: a * b,
                unit: unit_a.or(unit_b),
            }),
        },
        BinOp::Div => {
            if b == 0.0 {
                return Err(ScriptError::Eval("division by zero".to_owned()));
            }
            match (unit_a, unit_b) {
                (unit, None) => Ok(Value::Quantity {
                    magnitude: a / b,
                    unit,
                }),
                (Some(unit_a), Some(unit_b)) if unit_a == unit_b => Ok(Value::scalar(a / b)),
                (_, Some(unit_b)) => Err(ScriptError::Unit(format!(
                    "cannot divide by a quantity in `{unit_b}'"
                ))),
            }
        }
    }
}
