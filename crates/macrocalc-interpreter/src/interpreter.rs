//! Main interpreter engine.

use std::io::Write;

use macrocalc_syntax::ast::*;
use macrocalc_syntax::error::{error, ErrorKind, Result};
use macrocalc_syntax::symbols::SymbolTable;
use tracing::{debug, trace};

use crate::value::{format_number, from_bool, is_truthy, truncated_rem};

/// Evaluates a parsed program, writing `print` output to `out`.
pub struct Interpreter<W: Write> {
    out: W,
}

impl<W: Write> Interpreter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs `program` against the variable slots its parser assigned in
    /// `symbols`.
    pub fn run(&mut self, program: &Node, symbols: &mut SymbolTable) -> Result<()> {
        debug!(variables = symbols.len(), "running program");
        self.eval(program, symbols)?;
        self.out.flush().map_err(|e| ErrorKind::Output(e.to_string()))?;
        debug!("program finished");
        Ok(())
    }

    /// Evaluates `node`, returning its numeric value if it has one.
    pub fn eval(&mut self, node: &Node, symbols: &mut SymbolTable) -> Result<Option<f64>> {
        match node {
            Node::Empty | Node::String(_) => Ok(None),
            Node::Number(n) => Ok(Some(*n)),
            Node::Scope(body) => {
                for stmt in body {
                    self.eval(stmt, symbols)?;
                }
                Ok(None)
            }
            Node::Print(parts) => {
                for part in parts {
                    match part {
                        Node::String(text) => self.emit(text)?,
                        other => {
                            let value = self.eval_value(other, symbols)?;
                            self.emit(&format_number(value))?;
                        }
                    }
                }
                self.emit("\n")?;
                self.out.flush().map_err(|e| ErrorKind::Output(e.to_string()))?;
                Ok(None)
            }
            Node::Assign { target, value } => {
                let value = self.eval_value(value, symbols)?;
                symbols.write(target.slot, value);
                Ok(Some(value))
            }
            Node::Identifier(ident) => symbols
                .read(ident.slot)
                .map(Some)
                .map_err(|e| e.at(ident.line, ident.col)),
            Node::Conditional {
                cond,
                then_branch,
                else_branch,
            } => {
                if is_truthy(self.eval_value(cond, symbols)?) {
                    self.eval(then_branch, symbols)?;
                } else if let Some(else_branch) = else_branch {
                    self.eval(else_branch, symbols)?;
                }
                Ok(None)
            }
            Node::While { cond, body } => {
                let mut iterations = 0usize;
                while is_truthy(self.eval_value(cond, symbols)?) {
                    iterations += 1;
                    trace!(iterations, "loop iteration");
                    self.eval(body, symbols)?;
                }
                Ok(None)
            }
            Node::Operation(op) => self.eval_operation(op, symbols).map(Some),
        }
    }

    /// Evaluates `node` and demands a value from it.
    pub fn eval_value(&mut self, node: &Node, symbols: &mut SymbolTable) -> Result<f64> {
        match self.eval(node, symbols)? {
            Some(value) => Ok(value),
            None => error(ErrorKind::NoValue(node.kind_name())),
        }
    }

    fn eval_operation(&mut self, op: &Operation, symbols: &mut SymbolTable) -> Result<f64> {
        let (op, lhs, rhs) = match op {
            Operation::Unary(UnaryOp::Not, operand) => {
                return Ok(from_bool(!is_truthy(self.eval_value(operand, symbols)?)));
            }
            Operation::Unary(UnaryOp::Negate, operand) => {
                return Ok(-self.eval_value(operand, symbols)?);
            }
            Operation::Binary(op, lhs, rhs) => (*op, lhs, rhs),
        };

        let a = self.eval_value(lhs, symbols)?;
        match op {
            BinaryOp::And if !is_truthy(a) => return Ok(0.0),
            BinaryOp::Or if is_truthy(a) => return Ok(1.0),
            _ => {}
        }
        let b = self.eval_value(rhs, symbols)?;

        match op {
            BinaryOp::And | BinaryOp::Or => Ok(from_bool(is_truthy(b))),
            BinaryOp::Pow => Ok(a.powf(b)),
            BinaryOp::Mul => Ok(a * b),
            BinaryOp::Add => Ok(a + b),
            BinaryOp::Sub => Ok(a - b),
            BinaryOp::Div => {
                if b == 0.0 {
                    return error(ErrorKind::DivisionByZero);
                }
                Ok(a / b)
            }
            BinaryOp::Mod => match truncated_rem(a, b) {
                Some(r) => Ok(r),
                None => error(ErrorKind::ModulusByZero),
            },
            BinaryOp::Less => Ok(from_bool(a < b)),
            BinaryOp::Greater => Ok(from_bool(a > b)),
            BinaryOp::LessEq => Ok(from_bool(a <= b)),
            BinaryOp::GreaterEq => Ok(from_bool(a >= b)),
            BinaryOp::Eq => Ok(from_bool(a == b)),
            BinaryOp::NotEq => Ok(from_bool(a != b)),
        }
    }

    fn emit(&mut self, text: &str) -> Result<()> {
        self.out
            .write_all(text.as_bytes())
            .map_err(|e| ErrorKind::Output(e.to_string()).into())
    }
}
