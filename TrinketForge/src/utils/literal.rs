//! Parser for list/dict literals as written by chat models
//!
//! Generators answer with Python-style literals (`['+Accuracy', '-Stress']`,
//! `{'Stress': '-20'}`) or with JSON. Both are accepted here: strings may use
//! single or double quotes, `True`/`False`/`None` and `true`/`false`/`null`
//! are all recognised, tuples read as lists, and a trailing comma is allowed.

use std::fmt;

use thiserror::Error;

/// A parsed literal value.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    None,
    List(Vec<Literal>),
    /// Key/value pairs in source order.
    Dict(Vec<(Literal, Literal)>),
}

impl Literal {
    /// Short type name used in diagnostics.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Literal::Str(_) => "string",
            Literal::Int(_) => "int",
            Literal::Float(_) => "float",
            Literal::Bool(_) => "bool",
            Literal::None => "none",
            Literal::List(_) => "list",
            Literal::Dict(_) => "dict",
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Str(s) => write!(f, "'{s}'"),
            Literal::Int(i) => write!(f, "{i}"),
            Literal::Float(x) => write!(f, "{x}"),
            Literal::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Literal::None => write!(f, "None"),
            Literal::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Literal::Dict(pairs) => {
                write!(f, "{{")?;
                for (i, (k, v)) in pairs.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
        }
    }
}

/// Error from [`parse_literal`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    /// Byte offset into the input.
    pub offset: usize,
    /// What was expected.
    pub message: String,
}

/// Parse a complete literal. Leading and trailing whitespace is ignored, any
/// other trailing content is an error.
pub fn parse_literal(text: &str) -> Result<Literal, LiteralError> {
    let mut parser = Parser { src: text, pos: 0 };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos < parser.src.len() {
        return Err(parser.error("unexpected trailing content"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.bump();
        }
    }

    fn error(&self, message: &str) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.to_string(),
        }
    }

    fn value(&mut self) -> Result<Literal, LiteralError> {
        self.skip_ws();
        match self.peek() {
            Some('[') => self.sequence('[', ']').map(Literal::List),
            Some('(') => self.sequence('(', ')').map(Literal::List),
            Some('{') => self.dict(),
            Some(q @ ('\'' | '"')) => self.string(q).map(Literal::Str),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_ascii_alphabetic() => self.keyword(),
            Some(_) => Err(self.error("unexpected character")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn sequence(&mut self, open: char, close: char) -> Result<Vec<Literal>, LiteralError> {
        debug_assert_eq!(self.peek(), Some(open));
        self.bump();
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok(items);
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some(c) if c == close => return Ok(items),
                _ => return Err(self.error("expected ',' or closing bracket")),
            }
        }
    }

    fn dict(&mut self) -> Result<Literal, LiteralError> {
        self.bump();
        let mut pairs = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some('}') {
                self.bump();
                return Ok(Literal::Dict(pairs));
            }
            let key = self.value()?;
            self.skip_ws();
            if self.bump() != Some(':') {
                return Err(self.error("expected ':'"));
            }
            let value = self.value()?;
            pairs.push((key, value));
            self.skip_ws();
            match self.bump() {
                Some(',') => {}
                Some('}') => return Ok(Literal::Dict(pairs)),
                _ => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        self.bump();
        let mut out = String::new();
        loop {
            match self.bump() {
                Some('\\') => match self.bump() {
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some(c) => out.push(c),
                    None => return Err(self.error("unterminated escape")),
                },
                Some(c) if c == quote => return Ok(out),
                Some(c) => out.push(c),
                None => return Err(self.error("unterminated string")),
            }
        }
    }

    fn number(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('-' | '+')) {
            self.bump();
        }
        while self
            .peek()
            .is_some_and(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '_'))
        {
            // exponent sign
            if matches!(self.peek(), Some('e' | 'E')) {
                self.bump();
                if matches!(self.peek(), Some('-' | '+')) {
                    self.bump();
                }
                continue;
            }
            self.bump();
        }
        let text: String = self.src[start..self.pos].chars().filter(|c| *c != '_').collect();
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Literal::Int(i));
        }
        text.parse::<f64>().map(Literal::Float).map_err(|_| LiteralError {
            offset: start,
            message: format!("invalid number '{text}'"),
        })
    }

    fn keyword(&mut self) -> Result<Literal, LiteralError> {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Literal::Bool(true)),
            "False" | "false" => Ok(Literal::Bool(false)),
            "None" | "null" => Ok(Literal::None),
            word => Err(LiteralError {
                offset: start,
                message: format!("unknown bare word '{word}'"),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Literal {
        Literal::Str(v.to_string())
    }

    #[test]
    fn test_python_list() {
        let parsed = parse_literal("['+Accuracy', \"-Stress\",]").unwrap();
        assert_eq!(parsed, Literal::List(vec![s("+Accuracy"), s("-Stress")]));
    }

    #[test]
    fn test_dict_mixed_values() {
        let parsed = parse_literal("{'Bleed Resist': '-10', 'Stress': -20, \"Damage\": 1.5}").unwrap();
        assert_eq!(
            parsed,
            Literal::Dict(vec![
                (s("Bleed Resist"), s("-10")),
                (s("Stress"), Literal::Int(-20)),
                (s("Damage"), Literal::Float(1.5)),
            ])
        );
    }

    #[test]
    fn test_tuple_and_keywords() {
        let parsed = parse_literal("(True, None, null)").unwrap();
        assert_eq!(
            parsed,
            Literal::List(vec![Literal::Bool(true), Literal::None, Literal::None])
        );
    }

    #[test]
    fn test_rejects_trailing_prose() {
        let err = parse_literal("['+Accuracy'] hope this helps").unwrap_err();
        assert!(err.message.contains("trailing"));
    }

    #[test]
    fn test_rejects_unterminated() {
        assert!(parse_literal("['+Accuracy").is_err());
        assert!(parse_literal("{'a': }").is_err());
        assert!(parse_literal("").is_err());
    }

    #[test]
    fn test_display_roundtrip_shape() {
        let parsed = parse_literal("[\"+Accuracy\" ,  '-Stress']").unwrap();
        assert_eq!(parsed.to_string(), "['+Accuracy', '-Stress']");
    }
}
