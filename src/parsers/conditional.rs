//! Conditional-compilation directive evaluation.
//!
//! Supports `#if`, `#elif`, `#else`, `#endif`, the C-style `#ifdef` and
//! `#ifndef`, and `#define`/`#undef` of single symbols. Expressions combine
//! symbols with `!`, `&&`, `||`, `==`, `!=`, parentheses and the literals
//! `true`/`false`.

use crate::error::{DeclDiffError, ParseErrorKind, Result};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

static DIRECTIVE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*#[ \t]*(if|ifdef|ifndef|elif|else|endif|define|undef)\b(.*)$").expect("static regex")
});

/// A recognized directive on one source line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Directive {
    If(String),
    IfDef(String),
    IfNDef(String),
    Elif(String),
    Else,
    EndIf,
    Define(String),
    Undef(String),
}

impl Directive {
    /// Recognize a directive line, or `None` for ordinary text.
    pub(crate) fn parse(line: &str) -> Option<Self> {
        let caps = DIRECTIVE_LINE.captures(line)?;
        let argument = strip_trailing_comment(caps.get(2).map_or("", |m| m.as_str())).to_string();
        let directive = match caps.get(1).map_or("", |m| m.as_str()) {
            "if" => Self::If(argument),
            "ifdef" => Self::IfDef(first_word(&argument)),
            "ifndef" => Self::IfNDef(first_word(&argument)),
            "elif" => Self::Elif(argument),
            "else" => Self::Else,
            "endif" => Self::EndIf,
            "define" => Self::Define(first_word(&argument)),
            _ => Self::Undef(first_word(&argument)),
        };
        Some(directive)
    }
}

fn first_word(text: &str) -> String {
    text.split_whitespace().next().unwrap_or_default().to_string()
}

fn strip_trailing_comment(text: &str) -> &str {
    text.find("//").map_or(text, |i| &text[..i]).trim()
}

#[derive(Debug, Clone, Copy)]
struct Frame {
    /// Enclosing region is active
    parent_active: bool,
    /// Some branch of this group has been taken
    taken: bool,
    active: bool,
    seen_else: bool,
    opened_at: usize,
}

/// Tracks which source lines are active under a set of defined symbols.
#[derive(Debug, Clone)]
pub(crate) struct ConditionalState {
    symbols: HashSet<String>,
    stack: Vec<Frame>,
}

impl ConditionalState {
    pub(crate) fn new<'a>(symbols: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            symbols: symbols.into_iter().map(str::to_string).collect(),
            stack: Vec::new(),
        }
    }

    /// Whether ordinary lines at the current position are kept.
    pub(crate) fn is_active(&self) -> bool {
        self.stack.last().map_or(true, |f| f.active)
    }

    /// Apply a directive found on 1-based line `line`.
    pub(crate) fn apply(&mut self, directive: &Directive, line: usize) -> Result<()> {
        match directive {
            Directive::If(expr) => {
                let value = self.evaluate(expr, line)?;
                self.open(value, line);
            }
            Directive::IfDef(symbol) => {
                let value = self.symbols.contains(symbol.as_str());
                self.open(value, line);
            }
            Directive::IfNDef(symbol) => {
                let value = !self.symbols.contains(symbol.as_str());
                self.open(value, line);
            }
            Directive::Elif(expr) => {
                let value = self.evaluate(expr, line)?;
                let frame = self.top(line, "#elif without matching #if")?;
                if frame.seen_else {
                    return Err(unbalanced(line, "#elif after #else"));
                }
                frame.active = frame.parent_active && !frame.taken && value;
                frame.taken |= value;
            }
            Directive::Else => {
                let frame = self.top(line, "#else without matching #if")?;
                if frame.seen_else {
                    return Err(unbalanced(line, "duplicate #else"));
                }
                frame.seen_else = true;
                frame.active = frame.parent_active && !frame.taken;
                frame.taken = true;
            }
            Directive::EndIf => {
                if self.stack.pop().is_none() {
                    return Err(unbalanced(line, "#endif without matching #if"));
                }
            }
            Directive::Define(symbol) => {
                if self.is_active() {
                    self.symbols.insert(symbol.clone());
                }
            }
            Directive::Undef(symbol) => {
                if self.is_active() {
                    self.symbols.remove(symbol);
                }
            }
        }
        Ok(())
    }

    /// Fail when a group is still open at end of input.
    pub(crate) fn finish(&self) -> Result<()> {
        match self.stack.last() {
            Some(frame) => Err(unbalanced(frame.opened_at, "#if without matching #endif")),
            None => Ok(()),
        }
    }

    fn open(&mut self, value: bool, line: usize) {
        let parent_active = self.is_active();
        self.stack.push(Frame {
            parent_active,
            taken: value,
            active: parent_active && value,
            seen_else: false,
            opened_at: line,
        });
    }

    fn top(&mut self, line: usize, message: &str) -> Result<&mut Frame> {
        self.stack.last_mut().ok_or_else(|| unbalanced(line, message))
    }

    fn evaluate(&self, expr: &str, line: usize) -> Result<bool> {
        let tokens = tokenize(expr).ok_or_else(|| invalid_expression(expr, line))?;
        let mut parser = ExprParser {
            tokens: &tokens,
            pos: 0,
            depth: 0,
            symbols: &self.symbols,
        };
        let value = parser.or().ok_or_else(|| invalid_expression(expr, line))?;
        if parser.pos != tokens.len() {
            return Err(invalid_expression(expr, line));
        }
        Ok(value)
    }
}

fn unbalanced(line: usize, message: &str) -> DeclDiffError {
    DeclDiffError::parse(
        "evaluating conditional directives",
        ParseErrorKind::UnbalancedDirective {
            line,
            message: message.to_string(),
        },
    )
}

fn invalid_expression(expr: &str, line: usize) -> DeclDiffError {
    DeclDiffError::parse(
        "evaluating conditional directives",
        ParseErrorKind::Diagnostics(format!("line {line}: invalid condition '{expr}'")),
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Ident(String),
    Not,
    And,
    Or,
    Eq,
    Ne,
    Open,
    Close,
}

fn tokenize(expr: &str) -> Option<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = expr.chars().peekable();
    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '!' => {
                chars.next();
                if chars.peek() == Some(&'=') {
                    chars.next();
                    tokens.push(Token::Ne);
                } else {
                    tokens.push(Token::Not);
                }
            }
            '&' | '|' | '=' => {
                chars.next();
                if chars.next() != Some(c) {
                    return None;
                }
                tokens.push(match c {
                    '&' => Token::And,
                    '|' => Token::Or,
                    _ => Token::Eq,
                });
            }
            c if c.is_alphanumeric() || c == '_' => {
                let mut ident = String::new();
                while let Some(&c) = chars.peek() {
                    if c.is_alphanumeric() || c == '_' {
                        ident.push(c);
                        chars.next();
                    } else {
                        break;
                    }
                }
                tokens.push(Token::Ident(ident));
            }
            _ => return None,
        }
    }
    Some(tokens)
}

/// Deepest `(` / `!` nesting accepted in one condition.
const MAX_NESTING: usize = 256;

/// Recursive-descent evaluator; `None` signals a malformed expression.
struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
    depth: usize,
    symbols: &'a HashSet<String>,
}

impl ExprParser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn or(&mut self) -> Option<bool> {
        let mut value = self.and()?;
        while self.eat(&Token::Or) {
            let rhs = self.and()?;
            value = value || rhs;
        }
        Some(value)
    }

    fn and(&mut self) -> Option<bool> {
        let mut value = self.equality()?;
        while self.eat(&Token::And) {
            let rhs = self.equality()?;
            value = value && rhs;
        }
        Some(value)
    }

    fn equality(&mut self) -> Option<bool> {
        let mut value = self.unary()?;
        loop {
            if self.eat(&Token::Eq) {
                value = value == self.unary()?;
            } else if self.eat(&Token::Ne) {
                value = value != self.unary()?;
            } else {
                return Some(value);
            }
        }
    }

    fn nested(&mut self, parse: impl FnOnce(&mut Self) -> Option<bool>) -> Option<bool> {
        if self.depth >= MAX_NESTING {
            return None;
        }
        self.depth += 1;
        let value = parse(self);
        self.depth -= 1;
        value
    }

    fn unary(&mut self) -> Option<bool> {
        if self.eat(&Token::Not) {
            return self.nested(Self::unary).map(|v| !v);
        }
        self.primary()
    }

    fn primary(&mut self) -> Option<bool> {
        if self.eat(&Token::Open) {
            let value = self.nested(Self::or)?;
            return self.eat(&Token::Close).then_some(value);
        }
        match self.peek()? {
            Token::Ident(name) => {
                let value = match name.as_str() {
                    "true" => true,
                    "false" => false,
                    symbol => self.symbols.contains(symbol),
                };
                self.pos += 1;
                Some(value)
            }
            _ => None,
        }
    }
}
