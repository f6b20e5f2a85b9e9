//! AST (abstract syntax tree) types for the MacroCalc language.
//!
//! The tree is a strict ownership hierarchy: every node owns its children and
//! nothing is shared. Identifiers are resolved to [`Slot`]s by the parser, so
//! the tree never needs to be re-walked for name resolution.
//!
//! Arity rules are carried by the types. `Assign` always targets an
//! [`Ident`], an [`Operation`] holds exactly the operands its operator needs,
//! and `Conditional` has an optional else-branch. [`Node::operation`] is the
//! only fallible constructor: it builds an operation from a textual operator
//! and a child list, rejecting unknown symbols and wrong operand counts.

use std::fmt;

use crate::error::{error, ErrorKind, Result};
use crate::symbols::Slot;

/// A resolved reference to a declared variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub slot: Slot,
    /// Source position of the reference, for diagnostics
    pub line: usize,
    pub col: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `!`: 1 if the operand is 0, else 0
    Not,
    /// unary `-`
    Negate,
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "!" => Some(UnaryOp::Not),
            "-" => Some(UnaryOp::Negate),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    // logical
    And,
    Or,
    // arithmetic
    Pow,
    Mul,
    Div,
    Mod,
    Add,
    Sub,
    // comparisons
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Eq,
    NotEq,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
            BinaryOp::Pow => "**",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Less => "<",
            BinaryOp::Greater => ">",
            BinaryOp::LessEq => "<=",
            BinaryOp::GreaterEq => ">=",
            BinaryOp::Eq => "==",
            BinaryOp::NotEq => "!=",
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            "**" => BinaryOp::Pow,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Mod,
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "<" => BinaryOp::Less,
            ">" => BinaryOp::Greater,
            "<=" => BinaryOp::LessEq,
            ">=" => BinaryOp::GreaterEq,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::NotEq,
            _ => return None,
        };
        Some(op)
    }
}

/// An operator applied to one or two operands.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Unary(UnaryOp, Box<Node>),
    Binary(BinaryOp, Box<Node>, Box<Node>),
}

impl Operation {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operation::Unary(op, _) => op.symbol(),
            Operation::Binary(op, _, _) => op.symbol(),
        }
    }
}

/// A node of the syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// No-op placeholder, e.g. a declaration without initializer
    Empty,
    /// Statements run in order; scope frames were handled at parse time
    Scope(Vec<Node>),
    /// `String` children are printed verbatim, all others are evaluated
    Print(Vec<Node>),
    Assign { target: Ident, value: Box<Node> },
    Identifier(Ident),
    Conditional {
        cond: Box<Node>,
        then_branch: Box<Node>,
        else_branch: Option<Box<Node>>,
    },
    Operation(Operation),
    Number(f64),
    While { cond: Box<Node>, body: Box<Node> },
    /// Literal text for printing; never has a numeric value
    String(String),
}

impl Node {
    pub fn assign(target: Ident, value: Node) -> Self {
        Node::Assign {
            target,
            value: Box::new(value),
        }
    }

    pub fn conditional(cond: Node, then_branch: Node, else_branch: Option<Node>) -> Self {
        Node::Conditional {
            cond: Box::new(cond),
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
        }
    }

    pub fn while_loop(cond: Node, body: Node) -> Self {
        Node::While {
            cond: Box::new(cond),
            body: Box::new(body),
        }
    }

    pub fn unary(op: UnaryOp, operand: Node) -> Self {
        Node::Operation(Operation::Unary(op, Box::new(operand)))
    }

    pub fn binary(op: BinaryOp, lhs: Node, rhs: Node) -> Self {
        Node::Operation(Operation::Binary(op, Box::new(lhs), Box::new(rhs)))
    }

    /// Builds an operation node from an operator symbol and its operands.
    ///
    /// `!` takes one operand, every other operator two; `-` is unary with one
    /// operand and binary with two.
    ///
    /// ```rust
    /// use macrocalc_syntax::{ErrorKind, Node};
    ///
    /// let sum = Node::operation("+", vec![Node::Number(1.0), Node::Number(2.0)]).unwrap();
    /// assert_eq!(sum.to_string(), "(+ 1 2)");
    ///
    /// let err = Node::operation("^", vec![Node::Number(1.0), Node::Number(2.0)]).unwrap_err();
    /// assert_eq!(err.kind, ErrorKind::UnknownOperator("^".into()));
    /// ```
    pub fn operation(symbol: &str, operands: Vec<Node>) -> Result<Self> {
        let unary = UnaryOp::from_symbol(symbol);
        let binary = BinaryOp::from_symbol(symbol);
        if unary.is_none() && binary.is_none() {
            return error(ErrorKind::UnknownOperator(symbol.to_string()));
        }
        let found = operands.len();
        let mut operands = operands.into_iter();
        match (unary, binary, operands.next(), operands.next(), operands.next()) {
            (Some(op), _, Some(operand), None, None) => Ok(Node::unary(op, operand)),
            (_, Some(op), Some(lhs), Some(rhs), None) => Ok(Node::binary(op, lhs, rhs)),
            _ => error(ErrorKind::OperatorArity {
                op: symbol.to_string(),
                expected: if binary.is_some() { 2 } else { 1 },
                found,
            }),
        }
    }

    /// Short lowercase name of the node kind.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Empty => "empty",
            Node::Scope(_) => "scope",
            Node::Print(_) => "print",
            Node::Assign { .. } => "assign",
            Node::Identifier(_) => "identifier",
            Node::Conditional { .. } => "conditional",
            Node::Operation(_) => "operation",
            Node::Number(_) => "number",
            Node::While { .. } => "while",
            Node::String(_) => "string",
        }
    }

    /// Child nodes in evaluation order. An assignment target is an [`Ident`],
    /// not a node, so only its value is listed.
    pub fn children(&self) -> Vec<&Node> {
        match self {
            Node::Empty | Node::Identifier(_) | Node::Number(_) | Node::String(_) => Vec::new(),
            Node::Scope(nodes) | Node::Print(nodes) => nodes.iter().collect(),
            Node::Assign { value, .. } => vec![&**value],
            Node::Conditional {
                cond,
                then_branch,
                else_branch,
            } => {
                let mut out = vec![&**cond, &**then_branch];
                out.extend(else_branch.as_deref());
                out
            }
            Node::Operation(Operation::Unary(_, operand)) => vec![&**operand],
            Node::Operation(Operation::Binary(_, lhs, rhs)) => vec![&**lhs, &**rhs],
            Node::While { cond, body } => vec![&**cond, &**body],
        }
    }
}

impl fmt::Display for Ident {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.name, self.slot)
    }
}

/// S-expression rendering, e.g. `(scope (= x#0 (+ 1 2)) (print x#0))`.
impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let head = match self {
            Node::Empty => return write!(f, "(empty)"),
            Node::Identifier(ident) => return write!(f, "{}", ident),
            Node::Number(n) => return write!(f, "{}", n),
            Node::String(s) => return write!(f, "{:?}", s),
            Node::Assign { target, value } => return write!(f, "(= {} {})", target, value),
            Node::Scope(_) => "scope",
            Node::Print(_) => "print",
            Node::Conditional { .. } => "if",
            Node::While { .. } => "while",
            Node::Operation(op) => op.symbol(),
        };
        write!(f, "({}", head)?;
        for child in self.children() {
            write!(f, " {}", child)?;
        }
        write!(f, ")")
    }
}
