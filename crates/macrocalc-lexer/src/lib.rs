//! MacroCalc lexer: converts source text into tokens.
//!
//! Two scanners live here. [`Lexer`] turns a whole source file into a token
//! stream terminated by [`TokenKind::Eof`]. [`StringLexer`] splits the body of
//! a string literal into literal text, escape characters and `{name}`
//! interpolations for `print`.

pub mod string_lexer;

pub use string_lexer::{StringLexer, StringPiece};

use macrocalc_syntax::error::{error_at, ErrorKind, Result};
use macrocalc_syntax::token::{Token, TokenKind};

/// Streaming character scanner that produces tokens with positions.
pub struct Lexer {
    src: Vec<char>,
    pos: usize,
    line: usize,
    col: usize,
}

impl Lexer {
    /// Create a new lexer over the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            src: input.chars().collect(),
            pos: 0,
            line: 1,
            col: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.src.get(self.pos).copied()
    }
    fn peek_next(&self) -> Option<char> {
        self.src.get(self.pos + 1).copied()
    }
    fn advance(&mut self) -> Option<char> {
        let ch = self.src.get(self.pos).copied();
        if let Some(c) = ch {
            self.pos += 1;
            if c == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
        }
        ch
    }

    /// Skips whitespace and `#` comments running to end of line.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.advance();
            } else if c == '#' {
                while let Some(c2) = self.peek() {
                    if c2 == '\n' {
                        break;
                    }
                    self.advance();
                }
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self, line: usize, col: usize) -> Result<Token> {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        if self.peek() == Some('.') {
            s.push('.');
            self.advance();
            let mut fraction = false;
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    s.push(c);
                    self.advance();
                    fraction = true;
                } else {
                    break;
                }
            }
            if !fraction {
                return error_at(line, col, ErrorKind::InvalidNumber(s));
            }
        }
        Ok(Token::new(TokenKind::Number, s, line, col))
    }

    fn read_ident_or_keyword(&mut self, line: usize, col: usize) -> Token {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = match s.as_str() {
            "var" => TokenKind::Var,
            "print" => TokenKind::Print,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            _ => TokenKind::Ident,
        };
        Token::new(kind, s, line, col)
    }

    /// Reads a string literal body after the opening quote.
    ///
    /// Escapes are kept verbatim (backslash included) so that the string
    /// lexer can tell `\{` from an interpolation; only `\"` matters here,
    /// because it must not close the literal.
    fn read_string(&mut self, line: usize, col: usize) -> Result<Token> {
        let mut s = String::new();
        while let Some(c) = self.advance() {
            match c {
                '"' => return Ok(Token::new(TokenKind::String, s, line, col)),
                '\\' => {
                    s.push('\\');
                    match self.advance() {
                        Some(n) => s.push(n),
                        None => break,
                    }
                }
                '\n' => break,
                other => s.push(other),
            }
        }
        error_at(line, col, ErrorKind::UnterminatedString)
    }

    /// Consumes the current character and, when the next one is `second`,
    /// that one too.
    fn one_or_two(&mut self, second: char, single: TokenKind, double: TokenKind) -> (TokenKind, &'static str) {
        self.advance();
        if self.peek() == Some(second) {
            self.advance();
            (double, lexeme_of(double))
        } else {
            (single, lexeme_of(single))
        }
    }

    /// Tokenize the entire input into a vector of tokens ending with Eof.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace();
            let line = self.line;
            let col = self.col;
            let (kind, lexeme) = match self.peek() {
                None => {
                    tokens.push(Token::new(TokenKind::Eof, "", line, col));
                    break;
                }
                Some('"') => {
                    self.advance();
                    tokens.push(self.read_string(line, col)?);
                    continue;
                }
                Some(c) if c.is_ascii_digit() => {
                    tokens.push(self.read_number(line, col)?);
                    continue;
                }
                Some(c) if c.is_ascii_alphabetic() || c == '_' => {
                    tokens.push(self.read_ident_or_keyword(line, col));
                    continue;
                }
                Some('*') => self.one_or_two('*', TokenKind::Star, TokenKind::StarStar),
                Some('=') => self.one_or_two('=', TokenKind::Equal, TokenKind::EqEq),
                Some('!') => self.one_or_two('=', TokenKind::Bang, TokenKind::NotEq),
                Some('<') => self.one_or_two('=', TokenKind::Less, TokenKind::LessEq),
                Some('>') => self.one_or_two('=', TokenKind::Greater, TokenKind::GreaterEq),
                Some('&') if self.peek_next() == Some('&') => {
                    self.advance();
                    self.advance();
                    (TokenKind::AndAnd, "&&")
                }
                Some('|') if self.peek_next() == Some('|') => {
                    self.advance();
                    self.advance();
                    (TokenKind::OrOr, "||")
                }
                Some(c) => {
                    let kind = match c {
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '{' => TokenKind::LBrace,
                        '}' => TokenKind::RBrace,
                        ';' => TokenKind::Semicolon,
                        '+' => TokenKind::Plus,
                        '-' => TokenKind::Minus,
                        '/' => TokenKind::Slash,
                        '%' => TokenKind::Percent,
                        other => return error_at(line, col, ErrorKind::UnexpectedChar(other)),
                    };
                    self.advance();
                    (kind, lexeme_of(kind))
                }
            };
            tokens.push(Token::new(kind, lexeme, line, col));
        }
        Ok(tokens)
    }
}

/// Fixed source text of punctuation and operator tokens.
fn lexeme_of(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::LParen => "(",
        TokenKind::RParen => ")",
        TokenKind::LBrace => "{",
        TokenKind::RBrace => "}",
        TokenKind::Semicolon => ";",
        TokenKind::Equal => "=",
        TokenKind::Plus => "+",
        TokenKind::Minus => "-",
        TokenKind::Star => "*",
        TokenKind::StarStar => "**",
        TokenKind::Slash => "/",
        TokenKind::Percent => "%",
        TokenKind::EqEq => "==",
        TokenKind::NotEq => "!=",
        TokenKind::Less => "<",
        TokenKind::LessEq => "<=",
        TokenKind::Greater => ">",
        TokenKind::GreaterEq => ">=",
        TokenKind::AndAnd => "&&",
        TokenKind::OrOr => "||",
        TokenKind::Bang => "!",
        _ => "",
    }
}
