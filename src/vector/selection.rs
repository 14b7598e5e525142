//! Attribute predicates and queries for narrowing a feature layer
//!
//! Supports the subset of OGR SQL that clip selections use in practice:
//! comparisons, `LIKE`, `IS [NOT] NULL`, `NOT`, `AND`/`OR` and parentheses,
//! plus `SELECT * FROM <layer> [WHERE ...]` queries.

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;

use crate::errors::{ClipError, ClipResult};
use crate::vector::feature::{Feature, FeatureCollection};

lazy_static! {
    static ref TOKEN: Regex = Regex::new(
        r#"^\s*(?:(?P<str>'(?:[^']|'')*')|(?P<num>-?\d+(?:\.\d+)?(?:[eE][-+]?\d+)?)|(?P<op><>|!=|<=|>=|=|<|>)|(?P<lparen>\()|(?P<rparen>\))|(?P<ident>"[^"]+"|[A-Za-z_][A-Za-z0-9_.]*))"#
    ).expect("valid token pattern");

    static ref SELECT: Regex = Regex::new(
        r#"(?is)^\s*SELECT\s+\*\s+FROM\s+(?:"(?P<quoted>[^"]+)"|(?P<layer>[A-Za-z_][A-Za-z0-9_.\-]*))(?:\s+WHERE\s+(?P<where>.+?))?\s*;?\s*$"#
    ).expect("valid select pattern");
}

/// Feature selection supplied by the caller
///
/// Both parts are optional; when both are present a feature must satisfy
/// the predicate and the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureSelection {
    /// Attribute predicate, e.g. `zone = 'A' AND area > 10`
    pub where_clause: Option<String>,
    /// Query of the form `SELECT * FROM layer [WHERE ...]`
    pub sql: Option<String>,
}

impl FeatureSelection {
    pub fn new(where_clause: Option<String>, sql: Option<String>) -> Self {
        FeatureSelection {
            where_clause: where_clause.filter(|w| !w.trim().is_empty()),
            sql: sql.filter(|s| !s.trim().is_empty()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.where_clause.is_none() && self.sql.is_none()
    }

    /// Parse the predicate and query
    pub fn compile(&self) -> ClipResult<CompiledSelection> {
        let mut predicates = Vec::new();
        let mut layer = None;

        if let Some(where_clause) = &self.where_clause {
            predicates.push(parse_predicate(where_clause)?);
        }

        if let Some(sql) = &self.sql {
            let captures = SELECT.captures(sql).ok_or_else(|| {
                ClipError::InvalidSelection(format!("unsupported query (expected SELECT * FROM <layer> [WHERE ...]): {}", sql))
            })?;
            layer = captures
                .name("quoted")
                .or_else(|| captures.name("layer"))
                .map(|m| m.as_str().to_string());
            if let Some(where_clause) = captures.name("where") {
                predicates.push(parse_predicate(where_clause.as_str())?);
            }
        }

        Ok(CompiledSelection { layer, predicates })
    }

    /// Compile the selection and keep only matching features
    ///
    /// Feature indices are preserved so warnings keep pointing at the
    /// source layer.
    pub fn apply(&self, collection: &FeatureCollection) -> ClipResult<FeatureCollection> {
        let compiled = self.compile()?;
        compiled.check_layer(collection)?;

        let features = collection
            .features
            .iter()
            .filter(|feature| compiled.matches(feature))
            .cloned()
            .collect::<Vec<_>>();

        debug!("Selection kept {} of {} features", features.len(), collection.len());
        Ok(FeatureCollection::new(collection.name.clone(), collection.crs.clone(), features))
    }
}

/// A parsed selection, ready to test features
#[derive(Debug, Clone)]
pub struct CompiledSelection {
    layer: Option<String>,
    predicates: Vec<Expr>,
}

impl CompiledSelection {
    /// Reject queries addressing a different layer than the collection
    pub fn check_layer(&self, collection: &FeatureCollection) -> ClipResult<()> {
        match (&self.layer, &collection.name) {
            (Some(wanted), Some(actual)) if !wanted.eq_ignore_ascii_case(actual) => Err(
                ClipError::InvalidSelection(format!("query addresses layer {} but the source layer is {}", wanted, actual)),
            ),
            _ => Ok(()),
        }
    }

    pub fn matches(&self, feature: &Feature) -> bool {
        self.predicates.iter().all(|predicate| predicate.eval(feature) == Some(true))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum CompareOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

#[derive(Debug, Clone, PartialEq)]
enum Literal {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone)]
enum Expr {
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
    Not(Box<Expr>),
    Compare { field: String, op: CompareOp, literal: Literal },
    IsNull { field: String, negated: bool },
    Like { field: String, pattern: Regex, negated: bool },
}

impl Expr {
    /// Three-valued evaluation: `None` is SQL's UNKNOWN (null operands)
    fn eval(&self, feature: &Feature) -> Option<bool> {
        match self {
            Expr::And(a, b) => match (a.eval(feature), b.eval(feature)) {
                (Some(false), _) | (_, Some(false)) => Some(false),
                (Some(true), Some(true)) => Some(true),
                _ => None,
            },
            Expr::Or(a, b) => match (a.eval(feature), b.eval(feature)) {
                (Some(true), _) | (_, Some(true)) => Some(true),
                (Some(false), Some(false)) => Some(false),
                _ => None,
            },
            Expr::Not(inner) => inner.eval(feature).map(|value| !value),
            Expr::Compare { field, op, literal } => match feature.property(field) {
                None | Some(JsonValue::Null) => None,
                Some(value) => compare(value, literal).map(|ordering| op.accepts(ordering)),
            },
            Expr::IsNull { field, negated } => {
                let is_null = matches!(feature.property(field), None | Some(JsonValue::Null));
                Some(is_null != *negated)
            },
            Expr::Like { field, pattern, negated } => match feature.property(field) {
                None | Some(JsonValue::Null) => None,
                Some(value) => Some(pattern.is_match(&text_of(value)) != *negated),
            },
        }
    }
}

impl CompareOp {
    fn accepts(&self, ordering: Ordering) -> bool {
        match self {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
        }
    }
}

fn text_of(value: &JsonValue) -> String {
    match value {
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Numeric comparison when both sides are numeric, text comparison otherwise
fn compare(value: &JsonValue, literal: &Literal) -> Option<Ordering> {
    let numeric = match value {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    match (numeric, literal) {
        (Some(lhs), Literal::Number(rhs)) => lhs.partial_cmp(rhs),
        (_, Literal::Text(rhs)) => Some(text_of(value).as_str().cmp(rhs.as_str())),
        (None, Literal::Number(rhs)) => Some(text_of(value).as_str().cmp(rhs.to_string().as_str())),
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Text(String),
    Number(f64),
    Op(CompareOp),
    LParen,
    RParen,
    Ident(String),
}

fn tokenize(input: &str) -> ClipResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut rest = input;

    while !rest.trim().is_empty() {
        let captures = TOKEN
            .captures(rest)
            .ok_or_else(|| ClipError::InvalidSelection(format!("unexpected input near '{}'", rest.trim())))?;

        let token = if let Some(m) = captures.name("str") {
            let inner = &m.as_str()[1..m.as_str().len() - 1];
            Token::Text(inner.replace("''", "'"))
        } else if let Some(m) = captures.name("num") {
            let number = m
                .as_str()
                .parse::<f64>()
                .map_err(|_| ClipError::InvalidSelection(format!("bad number {}", m.as_str())))?;
            Token::Number(number)
        } else if let Some(m) = captures.name("op") {
            Token::Op(match m.as_str() {
                "=" => CompareOp::Eq,
                "<>" | "!=" => CompareOp::Ne,
                "<" => CompareOp::Lt,
                "<=" => CompareOp::Le,
                ">" => CompareOp::Gt,
                _ => CompareOp::Ge,
            })
        } else if captures.name("lparen").is_some() {
            Token::LParen
        } else if captures.name("rparen").is_some() {
            Token::RParen
        } else {
            let ident = captures.name("ident").map(|m| m.as_str()).unwrap_or_default();
            Token::Ident(ident.trim_matches('"').to_string())
        };

        tokens.push(token);
        rest = &rest[captures.get(0).map(|m| m.end()).unwrap_or(rest.len())..];
    }

    Ok(tokens)
}

fn parse_predicate(input: &str) -> ClipResult<Expr> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let expr = parser.parse_or()?;
    if parser.pos != parser.tokens.len() {
        return Err(ClipError::InvalidSelection(format!("trailing input in predicate: {}", input)));
    }
    Ok(expr)
}

/// Recursive-descent parser; AND binds tighter than OR
struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        self.pos += 1;
        token
    }

    fn eat_keyword(&mut self, keyword: &str) -> bool {
        match self.peek() {
            Some(Token::Ident(word)) if word.eq_ignore_ascii_case(keyword) => {
                self.pos += 1;
                true
            },
            _ => false,
        }
    }

    fn parse_or(&mut self) -> ClipResult<Expr> {
        let mut lhs = self.parse_and()?;
        while self.eat_keyword("OR") {
            let rhs = self.parse_and()?;
            lhs = Expr::Or(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> ClipResult<Expr> {
        let mut lhs = self.parse_unary()?;
        while self.eat_keyword("AND") {
            let rhs = self.parse_unary()?;
            lhs = Expr::And(Box::new(lhs), Box::new(rhs));
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> ClipResult<Expr> {
        if self.eat_keyword("NOT") {
            return Ok(Expr::Not(Box::new(self.parse_unary()?)));
        }
        if self.peek() == Some(&Token::LParen) {
            self.pos += 1;
            let inner = self.parse_or()?;
            return match self.next() {
                Some(Token::RParen) => Ok(inner),
                _ => Err(ClipError::InvalidSelection("missing closing parenthesis".to_string())),
            };
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> ClipResult<Expr> {
        let field = match self.next() {
            Some(Token::Ident(name)) => name,
            other => {
                return Err(ClipError::InvalidSelection(format!("expected a field name, found {:?}", other)))
            },
        };

        if self.eat_keyword("IS") {
            let negated = self.eat_keyword("NOT");
            if !self.eat_keyword("NULL") {
                return Err(ClipError::InvalidSelection(format!("expected NULL after {} IS", field)));
            }
            return Ok(Expr::IsNull { field, negated });
        }

        let negated = self.eat_keyword("NOT");
        if self.eat_keyword("LIKE") {
            let pattern = match self.next() {
                Some(Token::Text(pattern)) => like_to_regex(&pattern)?,
                other => {
                    return Err(ClipError::InvalidSelection(format!("LIKE expects a quoted pattern, found {:?}", other)))
                },
            };
            return Ok(Expr::Like { field, pattern, negated });
        }
        if negated {
            return Err(ClipError::InvalidSelection(format!("expected LIKE after {} NOT", field)));
        }

        let op = match self.next() {
            Some(Token::Op(op)) => op,
            other => {
                return Err(ClipError::InvalidSelection(format!("expected a comparison after {}, found {:?}", field, other)))
            },
        };
        let literal = match self.next() {
            Some(Token::Number(n)) => Literal::Number(n),
            Some(Token::Text(s)) => Literal::Text(s),
            other => {
                return Err(ClipError::InvalidSelection(format!("expected a literal after {}, found {:?}", field, other)))
            },
        };

        Ok(Expr::Compare { field, op, literal })
    }
}

/// Translate a LIKE pattern into a case-insensitive anchored regex
fn like_to_regex(pattern: &str) -> ClipResult<Regex> {
    let mut translated = String::from("(?is)^");
    for c in pattern.chars() {
        match c {
            '%' => translated.push_str(".*"),
            '_' => translated.push('.'),
            other => translated.push_str(&regex::escape(&other.to_string())),
        }
    }
    translated.push('$');
    Regex::new(&translated).map_err(|e| ClipError::InvalidSelection(format!("bad LIKE pattern {}: {}", pattern, e)))
}
