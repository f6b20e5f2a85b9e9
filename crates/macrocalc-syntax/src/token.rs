//! Token definitions for the MacroCalc language.
//!
//! A token is a kind tag plus the exact source text it was scanned from and
//! its position. The parser decides what the text means: number literals are
//! converted to `f64` only when a `Number` node is built, and string literals
//! are split into interpolation pieces only when a `print` consumes them.
//!
//! # Examples
//!
//! ```rust
//! use macrocalc_syntax::{Token, TokenKind};
//!
//! let ident = Token::new(TokenKind::Ident, "counter", 1, 5);
//! assert!(ident.is(TokenKind::Ident));
//! assert_eq!(ident.lexeme, "counter");
//! ```

use std::fmt;

/// Token types that can be produced by the MacroCalc lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // === Literals ===
    /// An identifier: `x`, `total_sum`
    Ident,

    /// A decimal number literal: `42`, `3.25`
    Number,

    /// A string literal; the lexeme has its quotes stripped but escapes and
    /// `{name}` interpolations left untouched
    String,

    // === Keywords ===
    /// `var`
    Var,
    /// `print`
    Print,
    /// `if`
    If,
    /// `else`
    Else,
    /// `while`
    While,

    // === Punctuation ===
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `;`
    Semicolon,

    // === Operators ===
    /// `=`
    Equal,
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `**`
    StarStar,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `==`
    EqEq,
    /// `!=`
    NotEq,
    /// `<`
    Less,
    /// `<=`
    LessEq,
    /// `>`
    Greater,
    /// `>=`
    GreaterEq,
    /// `&&`
    AndAnd,
    /// `||`
    OrOr,
    /// `!`
    Bang,

    /// End-of-file marker; always the last token of a stream
    Eof,
}

impl TokenKind {
    /// Human-readable description used in "expected ..." diagnostics.
    pub fn describe(self) -> &'static str {
        match self {
            TokenKind::Ident => "identifier",
            TokenKind::Number => "number",
            TokenKind::String => "string literal",
            TokenKind::Var => "'var'",
            TokenKind::Print => "'print'",
            TokenKind::If => "'if'",
            TokenKind::Else => "'else'",
            TokenKind::While => "'while'",
            TokenKind::LParen => "'('",
            TokenKind::RParen => "')'",
            TokenKind::LBrace => "'{'",
            TokenKind::RBrace => "'}'",
            TokenKind::Semicolon => "';'",
            TokenKind::Equal => "'='",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::Star => "'*'",
            TokenKind::StarStar => "'**'",
            TokenKind::Slash => "'/'",
            TokenKind::Percent => "'%'",
            TokenKind::EqEq => "'=='",
            TokenKind::NotEq => "'!='",
            TokenKind::Less => "'<'",
            TokenKind::LessEq => "'<='",
            TokenKind::Greater => "'>'",
            TokenKind::GreaterEq => "'>='",
            TokenKind::AndAnd => "'&&'",
            TokenKind::OrOr => "'||'",
            TokenKind::Bang => "'!'",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// A token with its source text and location.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The syntactic category of this token
    pub kind: TokenKind,

    /// The source text this token was scanned from
    pub lexeme: String,

    /// Line number in the source file (1-based)
    pub line: usize,

    /// Column number in the source file (1-based)
    pub col: usize,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, line: usize, col: usize) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            line,
            col,
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}
