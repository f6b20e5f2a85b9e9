//! MacroCalc interpreter: evaluates AST nodes with a simple tree-walking interpreter.
//!
//! The parser has already resolved every identifier to a slot in a
//! [`SymbolTable`](macrocalc_syntax::SymbolTable), so evaluation only reads
//! and writes slots; there is no name lookup and no scope handling at run
//! time. `print` output goes to any [`std::io::Write`] sink.

pub mod interpreter;
pub mod value;

pub use interpreter::Interpreter;
pub use value::format_number;
