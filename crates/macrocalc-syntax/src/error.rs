//! Error handling types and utilities for the MacroCalc toolchain.
//!
//! Every failure the lexer, parser, symbol table or evaluator can hit is a
//! variant of [`ErrorKind`]. None of them are recoverable: they travel up as
//! `Err` values until the command-line driver renders them and exits.
//!
//! Errors fall into two classes (see [`ErrorClass`]):
//!
//! - **Syntax**: the source text is malformed (unexpected token, unterminated
//!   string, empty condition, ...).
//! - **Semantic**: the program is well-formed but violates a scoping or
//!   runtime rule (undeclared variable, division by zero, ...). Some of these
//!   are detected while parsing, because names are resolved at parse time.
//!
//! # Examples
//!
//! ```rust
//! use macrocalc_syntax::error::{error_at, Error, ErrorKind, Result};
//!
//! fn must_be_nonzero(n: f64, line: usize) -> Result<f64> {
//!     if n == 0.0 {
//!         error_at(line, 1, ErrorKind::DivisionByZero)
//!     } else {
//!         Ok(n)
//!     }
//! }
//!
//! let err = must_be_nonzero(0.0, 3).unwrap_err();
//! assert_eq!(err.to_string(), "Division by zero at 3:1");
//!
//! let unlocated = Error::new(ErrorKind::ModulusByZero);
//! assert_eq!(unlocated.to_string(), "Modulus by zero");
//! ```

use std::fmt;

use thiserror::Error as ThisError;

/// The two error taxonomies of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Malformed source text.
    Syntax,
    /// Scoping and runtime rule violations.
    Semantic,
}

/// Every fatal condition the toolchain can report.
#[derive(Debug, Clone, PartialEq, ThisError)]
pub enum ErrorKind {
    // === Lexical ===
    #[error("Unexpected character '{0}'")]
    UnexpectedChar(char),

    #[error("Unterminated string")]
    UnterminatedString,

    #[error("Invalid number '{0}'")]
    InvalidNumber(String),

    // === Syntax ===
    #[error("Unexpected token '{found}', expected {expected}")]
    UnexpectedToken { found: String, expected: String },

    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Expected condition body, found empty condition")]
    EmptyCondition,

    #[error("Assignment target is not an identifier")]
    InvalidAssignTarget,

    // === Scoping ===
    #[error("Redeclaration of variable '{0}' in the same scope")]
    Redeclaration(String),

    #[error("Tried to pop outermost scope")]
    PopOutermostScope,

    #[error("Tried to pop nonexistent scope")]
    PopEmptyScope,

    #[error("No open scope to declare '{0}' in")]
    NoScope(String),

    #[error("Undeclared variable '{0}'")]
    UndeclaredVariable(String),

    #[error("Use of uninitialized variable '{0}'")]
    UninitializedVariable(String),

    // === Runtime ===
    #[error("Division by zero")]
    DivisionByZero,

    #[error("Modulus by zero")]
    ModulusByZero,

    #[error("Unknown operator '{0}'")]
    UnknownOperator(String),

    #[error("Operator '{op}' takes {expected} operand(s), got {found}")]
    OperatorArity {
        op: String,
        expected: usize,
        found: usize,
    },

    #[error("No value produced by {0} node")]
    NoValue(&'static str),

    #[error("Failed to write output: {0}")]
    Output(String),
}

impl ErrorKind {
    /// Which taxonomy this error belongs to.
    pub fn class(&self) -> ErrorClass {
        match self {
            ErrorKind::UnexpectedChar(_)
            | ErrorKind::UnterminatedString
            | ErrorKind::InvalidNumber(_)
            | ErrorKind::UnexpectedToken { .. }
            | ErrorKind::UnexpectedEof { .. }
            | ErrorKind::EmptyCondition
            | ErrorKind::InvalidAssignTarget => ErrorClass::Syntax,
            _ => ErrorClass::Semantic,
        }
    }
}

/// An error with optional source location.
///
/// The location is 1-based. Errors raised by components that do not see
/// tokens (the symbol table, operator evaluation) start out unlocated; the
/// caller that knows the offending token attaches it with [`Error::at`].
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    /// What went wrong
    pub kind: ErrorKind,

    /// Optional line number in source file (1-based)
    pub line: Option<usize>,

    /// Optional column number in source file (1-based)
    pub col: Option<usize>,
}

impl Error {
    /// Creates an error without location information.
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            line: None,
            col: None,
        }
    }

    /// Creates an error located at `line`:`col`.
    pub fn with_span(kind: ErrorKind, line: usize, col: usize) -> Self {
        Self {
            kind,
            line: Some(line),
            col: Some(col),
        }
    }

    /// Attaches a location unless the error already carries one.
    ///
    /// The innermost location wins, so wrapping an already-located error in
    /// an outer `at` keeps the more precise position.
    pub fn at(mut self, line: usize, col: usize) -> Self {
        if self.line.is_none() {
            self.line = Some(line);
            self.col = Some(col);
        }
        self
    }

    pub fn class(&self) -> ErrorClass {
        self.kind.class()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.line, self.col) {
            (Some(l), Some(c)) => write!(f, "{} at {}:{}", self.kind, l, c),
            (Some(l), None) => write!(f, "{} at line {}", self.kind, l),
            _ => write!(f, "{}", self.kind),
        }
    }
}

impl std::error::Error for Error {}

impl From<ErrorKind> for Error {
    fn from(kind: ErrorKind) -> Self {
        Error::new(kind)
    }
}

/// A specialized `Result` type for MacroCalc operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for `Err(Error::new(kind))`.
pub fn error<T>(kind: ErrorKind) -> Result<T> {
    Err(Error::new(kind))
}

/// Shorthand for `Err(Error::with_span(kind, line, col))`.
pub fn error_at<T>(line: usize, col: usize, kind: ErrorKind) -> Result<T> {
    Err(Error::with_span(kind, line, col))
}
