//! Lexer module for XY - turns source text into tokens
//!
//! The lexer is pulled by the parser one token at a time: [`Lexer::current`]
//! is the lookahead and [`Lexer::advance`] scans the next one. [`tokenize`]
//! drains a whole source for tooling such as `xy tokens`.

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};

/// Where a token starts in the source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourcePosition {
    pub file: Option<Arc<str>>,
    pub line: usize,
    pub column: usize,
}

impl fmt::Display for SourcePosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(file) = &self.file {
            write!(f, "in '{}': ", file)?;
        }
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// A token with its kind and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub position: SourcePosition,
}

/// Token types
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Keywords
    Let,
    With,
    Use,
    True,
    False,
    Or,
    And,

    // Literals
    Number(f64),
    String(String),
    Symbol(String),

    // Two-character operators
    EqualEqual,   // ==
    NotEqual,     // !=
    GreaterEqual, // >=
    LessEqual,    // <=
    DotDot,       // ..
    Arrow,        // ->

    // Single-character operators
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Caret,     // ^
    Less,      // <
    Greater,   // >
    Equal,     // =
    Bang,      // !
    Dot,       // .
    Dollar,    // $
    At,        // @
    Backtick,  // `
    Ampersand, // &

    // Punctuation
    LeftParen,    // (
    RightParen,   // )
    LeftBracket,  // [
    RightBracket, // ]
    LeftBrace,    // {
    RightBrace,   // }
    Comma,        // ,
    Colon,        // :

    /// Any character the language has no use for
    Other(char),
    Eof,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("let", TokenKind::Let),
    ("with", TokenKind::With),
    ("use", TokenKind::Use),
    ("true", TokenKind::True),
    ("false", TokenKind::False),
    ("or", TokenKind::Or),
    ("and", TokenKind::And),
];

const TWO_CHAR_OPERATORS: &[(char, char, TokenKind)] = &[
    ('=', '=', TokenKind::EqualEqual),
    ('!', '=', TokenKind::NotEqual),
    ('>', '=', TokenKind::GreaterEqual),
    ('<', '=', TokenKind::LessEqual),
    ('.', '.', TokenKind::DotDot),
    ('-', '>', TokenKind::Arrow),
];

impl TokenKind {
    fn from_char(c: char) -> TokenKind {
        match c {
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '*' => TokenKind::Star,
            '/' => TokenKind::Slash,
            '^' => TokenKind::Caret,
            '<' => TokenKind::Less,
            '>' => TokenKind::Greater,
            '=' => TokenKind::Equal,
            '!' => TokenKind::Bang,
            '.' => TokenKind::Dot,
            '$' => TokenKind::Dollar,
            '@' => TokenKind::At,
            '`' => TokenKind::Backtick,
            '&' => TokenKind::Ampersand,
            '(' => TokenKind::LeftParen,
            ')' => TokenKind::RightParen,
            '[' => TokenKind::LeftBracket,
            ']' => TokenKind::RightBracket,
            '{' => TokenKind::LeftBrace,
            '}' => TokenKind::RightBrace,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,
            other => TokenKind::Other(other),
        }
    }

    /// Source text of operator and punctuation tokens
    fn text(&self) -> Option<&'static str> {
        let text = match self {
            TokenKind::EqualEqual => "==",
            TokenKind::NotEqual => "!=",
            TokenKind::GreaterEqual => ">=",
            TokenKind::LessEqual => "<=",
            TokenKind::DotDot => "..",
            TokenKind::Arrow => "->",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Caret => "^",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::Equal => "=",
            TokenKind::Bang => "!",
            TokenKind::Dot => ".",
            TokenKind::Dollar => "$",
            TokenKind::At => "@",
            TokenKind::Backtick => "`",
            TokenKind::Ampersand => "&",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
            TokenKind::LeftBracket => "[",
            TokenKind::RightBracket => "]",
            TokenKind::LeftBrace => "{",
            TokenKind::RightBrace => "}",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            _ => return None,
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(text) = self.text() {
            return write!(f, "'{}'", text);
        }
        match self {
            TokenKind::Number(n) => write!(f, "number {}", n),
            TokenKind::String(s) => write!(f, "string \"{}\"", s),
            TokenKind::Symbol(s) => write!(f, "symbol {}", s),
            TokenKind::Other(c) => write!(f, "'{}'", c),
            TokenKind::Eof => f.write_str("end of input"),
            keyword => {
                let name = KEYWORDS
                    .iter()
                    .find(|(_, kind)| kind == keyword)
                    .map(|(name, _)| *name)
                    .unwrap_or("?");
                write!(f, "keyword {}", name)
            }
        }
    }
}

fn is_symbol_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '#' || c == '?'
}

/// Single-token lookahead scanner
pub struct Lexer {
    chars: Vec<char>,
    offset: usize,
    line: usize,
    column: usize,
    file: Option<Arc<str>>,
    current: Token,
}

impl Lexer {
    /// Create a lexer and scan the first token
    pub fn new(source: &str, file: Option<Arc<str>>) -> Result<Self> {
        let mut lexer = Self {
            chars: source.chars().collect(),
            offset: 0,
            line: 1,
            column: 1,
            current: Token {
                kind: TokenKind::Eof,
                position: SourcePosition::default(),
            },
            file,
        };
        lexer.advance()?;
        Ok(lexer)
    }

    /// The lookahead token
    pub fn current(&self) -> &Token {
        &self.current
    }

    /// Consume the lookahead and scan the next token
    pub fn advance(&mut self) -> Result<()> {
        self.current = self.scan()?;
        Ok(())
    }

    /// Position of the next unread character
    pub fn position(&self) -> SourcePosition {
        SourcePosition {
            file: self.file.clone(),
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.offset).copied()
    }

    fn peek_at(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.offset + ahead).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.offset += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.bump();
            } else if c == ';' {
                while let Some(c) = self.bump() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn scan(&mut self) -> Result<Token> {
        self.skip_trivia();
        let position = self.position();

        let Some(c) = self.peek() else {
            return Ok(Token {
                kind: TokenKind::Eof,
                position,
            });
        };

        let kind = if c.is_ascii_digit() {
            self.scan_number()?
        } else if c == '"' {
            self.scan_string(&position)?
        } else if is_symbol_char(c) {
            self.scan_symbol()
        } else {
            self.bump();
            let two_char = self.peek().and_then(|next| {
                TWO_CHAR_OPERATORS
                    .iter()
                    .find(|(a, b, _)| *a == c && *b == next)
                    .map(|(_, _, kind)| kind.clone())
            });
            match two_char {
                Some(kind) => {
                    self.bump();
                    kind
                }
                None => TokenKind::from_char(c),
            }
        };

        Ok(Token { kind, position })
    }

    fn digit(&mut self, base: u32) -> Result<u32> {
        let position = self.position();
        let c = self.bump().unwrap_or('\0');
        c.to_digit(base)
            .ok_or_else(|| Error::lexical(position, "Unexpected token in number literal"))
    }

    fn scan_number(&mut self) -> Result<TokenKind> {
        let mut base = 10;
        if self.peek() == Some('0') {
            self.bump();
            match self.peek() {
                Some('x') => {
                    self.bump();
                    base = 16;
                }
                Some(c) if c.is_ascii_digit() => base = 8,
                _ => {}
            }
        }

        let mut n = 0.0;
        while self.peek().is_some_and(is_symbol_char) {
            let digit = self.digit(base)?;
            n = n * base as f64 + digit as f64;
        }

        // `1..5` is a range, not a decimal point
        if self.peek() == Some('.') && self.peek_at(1) != Some('.') {
            let position = self.position();
            self.bump();
            if base != 10 {
                return Err(Error::lexical(position, "Non-base 10 decimals not supported"));
            }
            let mut mag = 1.0;
            while self.peek().is_some_and(is_symbol_char) {
                let digit = self.digit(base)?;
                mag /= base as f64;
                n += mag * digit as f64;
            }
        }

        Ok(TokenKind::Number(n))
    }

    fn scan_string(&mut self, start: &SourcePosition) -> Result<TokenKind> {
        self.bump();
        let mut text = String::new();
        loop {
            match self.bump() {
                Some('"') => return Ok(TokenKind::String(text)),
                Some('\\') => match self.bump() {
                    Some('n') => text.push('\n'),
                    Some('t') => text.push('\t'),
                    Some('r') => text.push('\r'),
                    Some(other) => text.push(other),
                    None => break,
                },
                Some(c) => text.push(c),
                None => break,
            }
        }
        Err(Error::lexical(start.clone(), "Unterminated string literal"))
    }

    fn scan_symbol(&mut self) -> TokenKind {
        let mut text = String::new();
        while let Some(c) = self.peek().filter(|c| is_symbol_char(*c)) {
            text.push(c);
            self.bump();
        }

        KEYWORDS
            .iter()
            .find(|(name, _)| *name == text)
            .map(|(_, kind)| kind.clone())
            .unwrap_or(TokenKind::Symbol(text))
    }
}

/// Tokenize a whole source, including the trailing end-of-input token
pub fn tokenize(source: &str, file: Option<Arc<str>>) -> Result<Vec<Token>> {
    let mut lexer = Lexer::new(source, file)?;
    let mut tokens = Vec::new();
    loop {
        let token = lexer.current().clone();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
        lexer.advance()?;
    }
}
