//! Recursive-descent parser producing slot-resolved ASTs.
//!
//! Grammar, loosest binding first:
//!
//! ```text
//! program        := statement*
//! statement      := scope | decl ';' | print ';'? | if | while | expr ';'
//! scope          := '{' statement* '}'
//! decl           := 'var' ident ('=' expr)?
//! print          := 'print' '(' (expr | string) ')'
//! if             := 'if' '(' expr ')' statement ('else' statement)?
//! while          := 'while' '(' expr ')' statement
//! expr           := assign
//! assign         := or | ident '=' assign
//! or             := and ('||' and)*
//! and            := equality ('&&' equality)*
//! equality       := relational (('==' | '!=') relational)?
//! relational     := additive (('<' | '>' | '<=' | '>=') additive)?
//! additive       := multiplicative (('+' | '-') multiplicative)*
//! multiplicative := power (('*' | '/' | '%') power)*
//! power          := unary ('**' power)?
//! unary          := '-' unary | '!' unary | term
//! term           := number | ident | '(' expr ')'
//! ```
//!
//! Scopes are pushed and popped on the [`SymbolTable`] while parsing, and
//! every identifier is resolved to its slot the moment it is read.

use macrocalc_lexer::{StringLexer, StringPiece};
use macrocalc_syntax::ast::{BinaryOp, Ident, Node, UnaryOp};
use macrocalc_syntax::error::{error_at, Error, ErrorKind, Result};
use macrocalc_syntax::symbols::SymbolTable;
use macrocalc_syntax::token::{Token, TokenKind};
use tracing::debug;

const EQUALITY_OPS: &[(TokenKind, BinaryOp)] =
    &[(TokenKind::EqEq, BinaryOp::Eq), (TokenKind::NotEq, BinaryOp::NotEq)];

const RELATIONAL_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Less, BinaryOp::Less),
    (TokenKind::Greater, BinaryOp::Greater),
    (TokenKind::LessEq, BinaryOp::LessEq),
    (TokenKind::GreaterEq, BinaryOp::GreaterEq),
];

const ADDITIVE_OPS: &[(TokenKind, BinaryOp)] =
    &[(TokenKind::Plus, BinaryOp::Add), (TokenKind::Minus, BinaryOp::Sub)];

const MULTIPLICATIVE_OPS: &[(TokenKind, BinaryOp)] = &[
    (TokenKind::Star, BinaryOp::Mul),
    (TokenKind::Slash, BinaryOp::Div),
    (TokenKind::Percent, BinaryOp::Mod),
];

/// Token-stream parser bound to the symbol table it declares into.
pub struct Parser<'s> {
    tokens: Vec<Token>,
    pos: usize,
    symbols: &'s mut SymbolTable,
    strings: StringLexer,
}

impl<'s> Parser<'s> {
    pub fn new(tokens: Vec<Token>, symbols: &'s mut SymbolTable) -> Self {
        Self {
            tokens,
            pos: 0,
            symbols,
            strings: StringLexer::new(),
        }
    }

    /// Parses every statement up to end of input into one root scope.
    ///
    /// The root scope is the symbol table's outermost frame; no frame is
    /// pushed for it.
    pub fn parse_program(&mut self) -> Result<Node> {
        let mut body = Vec::new();
        while let Some(token) = self.tokens.get(self.pos) {
            if token.is(TokenKind::Eof) {
                break;
            }
            push_statement(&mut body, self.parse_statement()?);
        }
        debug!(
            statements = body.len(),
            variables = self.symbols.len(),
            "parsed program"
        );
        Ok(Node::Scope(body))
    }

    /// Parses a single expression against the current scope.
    pub fn parse_expression(&mut self) -> Result<Node> {
        self.parse_assign()
    }

    // ---- token cursor ----

    fn peek(&self) -> Result<&Token> {
        match self.tokens.get(self.pos) {
            Some(token) => Ok(token),
            None => Err(self.eof_error("more input")),
        }
    }

    fn check(&self, kind: TokenKind) -> Result<bool> {
        Ok(self.peek()?.is(kind))
    }

    fn advance(&mut self) -> Result<Token> {
        let token = self.peek()?.clone();
        self.pos += 1;
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(kind)? {
            self.advance()
        } else {
            self.unexpected(kind.describe())
        }
    }

    /// Consumes the current token if it has the given kind.
    fn eat(&mut self, kind: TokenKind) -> Result<Option<Token>> {
        if self.check(kind)? {
            self.advance().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Consumes the current token if it is one of `ops`.
    fn eat_op(&mut self, ops: &[(TokenKind, BinaryOp)]) -> Result<Option<BinaryOp>> {
        let kind = self.peek()?.kind;
        match ops.iter().find(|(k, _)| *k == kind) {
            Some((_, op)) => {
                self.pos += 1;
                Ok(Some(*op))
            }
            None => Ok(None),
        }
    }

    fn eof_error(&self, expected: &str) -> Error {
        let kind = ErrorKind::UnexpectedEof {
            expected: expected.to_string(),
        };
        match self.tokens.last() {
            Some(last) => Error::with_span(kind, last.line, last.col),
            None => Error::new(kind),
        }
    }

    fn unexpected<T>(&self, expected: &str) -> Result<T> {
        match self.tokens.get(self.pos) {
            Some(token) if token.is(TokenKind::Eof) => error_at(
                token.line,
                token.col,
                ErrorKind::UnexpectedEof {
                    expected: expected.to_string(),
                },
            ),
            Some(token) => error_at(
                token.line,
                token.col,
                ErrorKind::UnexpectedToken {
                    found: token.lexeme.clone(),
                    expected: expected.to_string(),
                },
            ),
            None => Err(self.eof_error(expected)),
        }
    }

    fn resolve(&self, token: &Token, name: String) -> Result<Node> {
        let slot = self
            .symbols
            .resolve(&name)
            .map_err(|e| e.at(token.line, token.col))?;
        Ok(Node::Identifier(Ident {
            name,
            slot,
            line: token.line,
            col: token.col,
        }))
    }

    // ---- statements ----

    fn parse_statement(&mut self) -> Result<Node> {
        let kind = self.peek()?.kind;
        match kind {
            TokenKind::LBrace => self.parse_scope(),
            TokenKind::Var => {
                let decl = self.parse_decl()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(decl)
            }
            TokenKind::Print => {
                let print = self.parse_print()?;
                self.eat(TokenKind::Semicolon)?;
                Ok(print)
            }
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Ident
            | TokenKind::Number
            | TokenKind::LParen
            | TokenKind::Minus
            | TokenKind::Bang => {
                let expr = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(expr)
            }
            _ => self.unexpected("a statement"),
        }
    }

    fn parse_scope(&mut self) -> Result<Node> {
        self.expect(TokenKind::LBrace)?;
        self.symbols.push_scope();
        let mut body = Vec::new();
        loop {
            let kind = self.peek()?.kind;
            match kind {
                TokenKind::RBrace => break,
                TokenKind::Eof => return self.unexpected(TokenKind::RBrace.describe()),
                _ => push_statement(&mut body, self.parse_statement()?),
            }
        }
        let close = self.advance()?;
        self.symbols
            .pop_scope()
            .map_err(|e| e.at(close.line, close.col))?;
        Ok(Node::Scope(body))
    }

    /// `var name` yields [`Node::Empty`]; `var name = expr` yields an
    /// assignment. The name is declared only after the initializer has been
    /// parsed, so `var x = x;` cannot see itself.
    fn parse_decl(&mut self) -> Result<Node> {
        self.expect(TokenKind::Var)?;
        let name = self.expect(TokenKind::Ident)?;
        let init = if self.eat(TokenKind::Equal)?.is_some() {
            Some(self.parse_expression()?)
        } else if self.check(TokenKind::Semicolon)? {
            None
        } else {
            return self.unexpected("'=' or ';'");
        };

        let slot = self
            .symbols
            .declare(&name.lexeme, name.line)
            .map_err(|e| e.at(name.line, name.col))?;
        Ok(match init {
            None => Node::Empty,
            Some(value) => {
                let target = Ident {
                    name: name.lexeme,
                    slot,
                    line: name.line,
                    col: name.col,
                };
                Node::assign(target, value)
            }
        })
    }

    fn parse_print(&mut self) -> Result<Node> {
        self.expect(TokenKind::Print)?;
        self.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        if let Some(literal) = self.eat(TokenKind::String)? {
            for piece in self.strings.tokenize(&literal.lexeme) {
                match piece {
                    StringPiece::Literal(text) => args.push(Node::String(text)),
                    StringPiece::Escape(c) => args.push(Node::String(c.to_string())),
                    StringPiece::Interpolation(name) => args.push(self.resolve(&literal, name)?),
                }
            }
            if args.is_empty() {
                args.push(Node::String(String::new()));
            }
        } else {
            args.push(self.parse_expression()?);
        }
        self.expect(TokenKind::RParen)?;
        Ok(Node::Print(args))
    }

    fn parse_condition(&mut self) -> Result<Node> {
        self.expect(TokenKind::LParen)?;
        if self.check(TokenKind::RParen)? {
            let token = self.peek()?;
            return error_at(token.line, token.col, ErrorKind::EmptyCondition);
        }
        let cond = self.parse_expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(cond)
    }

    fn parse_if(&mut self) -> Result<Node> {
        self.expect(TokenKind::If)?;
        let cond = self.parse_condition()?;
        let then_branch = self.parse_statement()?;
        let else_branch = if self.eat(TokenKind::Else)?.is_some() {
            Some(self.parse_statement()?)
        } else {
            None
        };
        Ok(Node::conditional(cond, then_branch, else_branch))
    }

    fn parse_while(&mut self) -> Result<Node> {
        self.expect(TokenKind::While)?;
        let cond = self.parse_condition()?;
        let body = self.parse_statement()?;
        Ok(Node::while_loop(cond, body))
    }

    // ---- expressions ----

    fn parse_assign(&mut self) -> Result<Node> {
        let lhs = self.parse_or()?;
        let Some(eq) = self.eat(TokenKind::Equal)? else {
            return Ok(lhs);
        };
        let target = match lhs {
            Node::Identifier(ident) => ident,
            _ => return error_at(eq.line, eq.col, ErrorKind::InvalidAssignTarget),
        };
        let value = self.parse_assign()?;
        Ok(Node::assign(target, value))
    }

    fn parse_or(&mut self) -> Result<Node> {
        let mut lhs = self.parse_and()?;
        while self.eat(TokenKind::OrOr)?.is_some() {
            let rhs = self.parse_and()?;
            lhs = Node::binary(BinaryOp::Or, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_and(&mut self) -> Result<Node> {
        let mut lhs = self.parse_equality()?;
        while self.eat(TokenKind::AndAnd)?.is_some() {
            let rhs = self.parse_equality()?;
            lhs = Node::binary(BinaryOp::And, lhs, rhs);
        }
        Ok(lhs)
    }

    // Comparisons do not chain: at most one operator per level.
    fn parse_equality(&mut self) -> Result<Node> {
        let lhs = self.parse_relational()?;
        match self.eat_op(EQUALITY_OPS)? {
            Some(op) => Ok(Node::binary(op, lhs, self.parse_relational()?)),
            None => Ok(lhs),
        }
    }

    fn parse_relational(&mut self) -> Result<Node> {
        let lhs = self.parse_additive()?;
        match self.eat_op(RELATIONAL_OPS)? {
            Some(op) => Ok(Node::binary(op, lhs, self.parse_additive()?)),
            None => Ok(lhs),
        }
    }

    fn parse_additive(&mut self) -> Result<Node> {
        let mut lhs = self.parse_multiplicative()?;
        while let Some(op) = self.eat_op(ADDITIVE_OPS)? {
            let rhs = self.parse_multiplicative()?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> Result<Node> {
        let mut lhs = self.parse_power()?;
        while let Some(op) = self.eat_op(MULTIPLICATIVE_OPS)? {
            let rhs = self.parse_power()?;
            lhs = Node::binary(op, lhs, rhs);
        }
        Ok(lhs)
    }

    fn parse_power(&mut self) -> Result<Node> {
        let base = self.parse_unary()?;
        if self.eat(TokenKind::StarStar)?.is_some() {
            let exponent = self.parse_power()?;
            return Ok(Node::binary(BinaryOp::Pow, base, exponent));
        }
        Ok(base)
    }

    /// Unary minus becomes `-1 * operand`, binding tighter than `**`.
    fn parse_unary(&mut self) -> Result<Node> {
        let kind = self.peek()?.kind;
        match kind {
            TokenKind::Minus => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(Node::binary(BinaryOp::Mul, Node::Number(-1.0), operand))
            }
            TokenKind::Bang => {
                self.advance()?;
                let operand = self.parse_unary()?;
                Ok(Node::unary(UnaryOp::Not, operand))
            }
            _ => self.parse_term(),
        }
    }

    fn parse_term(&mut self) -> Result<Node> {
        let kind = self.peek()?.kind;
        match kind {
            TokenKind::Number => {
                let token = self.advance()?;
                match token.lexeme.parse::<f64>() {
                    Ok(value) => Ok(Node::Number(value)),
                    Err(_) => error_at(token.line, token.col, ErrorKind::InvalidNumber(token.lexeme)),
                }
            }
            TokenKind::Ident => {
                let token = self.advance()?;
                let name = token.lexeme.clone();
                self.resolve(&token, name)
            }
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(inner)
            }
            _ => self.unexpected("an expression"),
        }
    }
}

/// Bodiless declarations are no-ops and are left out of statement lists.
fn push_statement(body: &mut Vec<Node>, stmt: Node) {
    if !matches!(stmt, Node::Empty) {
        body.push(stmt);
    }
}

