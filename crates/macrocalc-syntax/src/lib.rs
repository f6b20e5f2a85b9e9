pub mod ast;
pub mod error;
pub mod symbols;
pub mod token;

pub use ast::*;
pub use error::*;
pub use symbols::*;
pub use token::*;
