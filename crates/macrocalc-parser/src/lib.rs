pub mod parser;

pub use parser::Parser;

#[cfg(test)]
mod tests {
    use super::*;
    use macrocalc_lexer::Lexer;
    use macrocalc_syntax::ast::*;
    use macrocalc_syntax::error::{Error, ErrorKind};
    use macrocalc_syntax::symbols::SymbolTable;
    use macrocalc_syntax::token::{Token, TokenKind};

    fn tokens(input: &str) -> Vec<Token> {
        Lexer::new(input).tokenize().expect("Lexing should succeed")
    }

    fn try_parse(input: &str) -> Result<(Node, SymbolTable), Error> {
        let mut symbols = SymbolTable::new();
        let program = Parser::new(tokens(input), &mut symbols).parse_program()?;
        Ok((program, symbols))
    }

    fn parse_program_str(input: &str) -> String {
        let (program, _) = try_parse(input).expect("Parsing should succeed");
        program.to_string()
    }

    fn parse_expr_str(input: &str) -> String {
        let mut symbols = SymbolTable::new();
        let mut parser = Parser::new(tokens(input), &mut symbols);
        parser.parse_expression().expect("Parsing should succeed").to_string()
    }

    fn parse_error(input: &str) -> Error {
        try_parse(input).expect_err("Parsing should fail")
    }

    #[test]
    fn test_literal_expressions() {
        assert_eq!(parse_expr_str("42"), "42");
        assert_eq!(parse_expr_str("3.25"), "3.25");
        assert_eq!(parse_expr_str("(7)"), "7");
    }

    #[test]
    fn test_operator_precedence() {
        assert_eq!(parse_expr_str("1 + 2 * 3"), "(+ 1 (* 2 3))");
        assert_eq!(parse_expr_str("(1 + 2) * 3"), "(* (+ 1 2) 3)");
        assert_eq!(parse_expr_str("(1 + 2 * 3) == 7"), "(== (+ 1 (* 2 3)) 7)");
        assert_eq!(parse_expr_str("1 < 2 == 1"), "(== (< 1 2) 1)");
        assert_eq!(parse_expr_str("1 || 0 && 0"), "(|| 1 (&& 0 0))");
        assert_eq!(parse_expr_str("1 + 2 < 4 && 1"), "(&& (< (+ 1 2) 4) 1)");
        assert_eq!(parse_expr_str("2 * 3 ** 2"), "(* 2 (** 3 2))");
    }

    #[test]
    fn test_associativity() {
        assert_eq!(parse_expr_str("1 - 2 - 3"), "(- (- 1 2) 3)");
        assert_eq!(parse_expr_str("8 / 4 % 3"), "(% (/ 8 4) 3)");
        assert_eq!(parse_expr_str("1 || 0 || 1"), "(|| (|| 1 0) 1)");
        assert_eq!(parse_expr_str("2 ** 3 ** 2"), "(** 2 (** 3 2))");
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(parse_expr_str("-2 ** 2"), "(** (* -1 2) 2)");
        assert_eq!(parse_expr_str("-(1 + 2)"), "(* -1 (+ 1 2))");
        assert_eq!(parse_expr_str("!((1 + 2 * 3) == 7)"), "(! (== (+ 1 (* 2 3)) 7))");
        assert_eq!(parse_expr_str("- -2"), "(* -1 (* -1 2))");
        assert_eq!(parse_expr_str("!!0"), "(! (! 0))");
        assert_eq!(parse_expr_str("2 ** -1"), "(** 2 (* -1 1))");
    }

    #[test]
    fn test_comparisons_do_not_chain() {
        let err = parse_error("1 == 1 == 1;");
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken { found: "==".into(), expected: "';'".into() }
        );
        assert_eq!((err.line, err.col), (Some(1), Some(8)));

        assert!(try_parse("1 < 2 < 3;").is_err());
        assert!(try_parse("1 < 2 == 1 != 0;").is_err());
    }

    #[test]
    fn test_declarations() {
        assert_eq!(parse_program_str("var x = 1 + 2;"), "(scope (= x#0 (+ 1 2)))");
        assert_eq!(parse_program_str("var x; x = 5;"), "(scope (= x#0 5))");
        assert_eq!(parse_program_str("var a; var b; a = b = 3;"), "(scope (= a#0 (= b#1 3)))");
    }

    #[test]
    fn test_declaration_initializer_cannot_see_itself() {
        let err = parse_error("var x = x;");
        assert_eq!(err.kind, ErrorKind::UndeclaredVariable("x".into()));
        assert_eq!((err.line, err.col), (Some(1), Some(9)));
    }

    #[test]
    fn test_redeclaration_in_same_scope() {
        let err = parse_error("var x;\nvar x = 2;");
        assert_eq!(err.kind, ErrorKind::Redeclaration("x".into()));
        assert_eq!(err.line, Some(2));

        assert!(try_parse("var x; { var x; }").is_ok());
    }

    #[test]
    fn test_scope_exit_hides_declarations() {
        let err = parse_error("{ var x = 1; }\nx = 2;");
        assert_eq!(err.kind, ErrorKind::UndeclaredVariable("x".into()));
        assert_eq!((err.line, err.col), (Some(2), Some(1)));
    }

    #[test]
    fn test_shadowing_resolves_to_inner_slot() {
        assert_eq!(
            parse_program_str("var x = 1; { var x = 2; print(x); } print(x);"),
            "(scope (= x#0 1) (scope (= x#1 2) (print x#1)) (print x#0))"
        );

        let (_, symbols) = try_parse("var x = 1; { var x = 2; { x = 3; } }").unwrap();
        assert_eq!(symbols.depth(), 1);
        assert_eq!(symbols.len(), 2);
    }

    #[test]
    fn test_print_statements() {
        assert_eq!(parse_program_str("print(1 + 1);"), "(scope (print (+ 1 1)))");
        assert_eq!(parse_program_str("print(\"\");"), "(scope (print \"\"))");
        assert_eq!(
            parse_program_str(r#"var n = 3; print("n = {n}\n");"#),
            r#"(scope (= n#0 3) (print "n = " n#0 "\n"))"#
        );
        // the trailing semicolon is optional after print
        assert_eq!(parse_program_str("print(1) print(2)"), "(scope (print 1) (print 2))");
    }

    #[test]
    fn test_print_interpolation_must_be_declared() {
        let err = parse_error("print(\"value: {missing}\");");
        assert_eq!(err.kind, ErrorKind::UndeclaredVariable("missing".into()));
        assert_eq!((err.line, err.col), (Some(1), Some(7)));
    }

    #[test]
    fn test_control_flow() {
        assert_eq!(
            parse_program_str("var i = 0; while (i < 3) { i = i + 1; } if (i == 3) print(1); else print(0);"),
            "(scope (= i#0 0) (while (< i#0 3) (scope (= i#0 (+ i#0 1)))) (if (== i#0 3) (print 1) (print 0)))"
        );
        assert_eq!(parse_program_str("if (1) { }"), "(scope (if 1 (scope)))");
        assert_eq!(parse_program_str("while (0) var y;"), "(scope (while 0 (empty)))");
    }

    #[test]
    fn test_empty_condition() {
        let err = parse_error("if () print(1);");
        assert_eq!(err.kind, ErrorKind::EmptyCondition);
        assert_eq!(err.col, Some(5));

        assert_eq!(parse_error("while () { }").kind, ErrorKind::EmptyCondition);
    }

    #[test]
    fn test_invalid_assignment_target() {
        assert_eq!(parse_error("var a = 1; 1 = a;").kind, ErrorKind::InvalidAssignTarget);
        assert_eq!(parse_error("var a = 1; a + 1 = 2;").kind, ErrorKind::InvalidAssignTarget);
    }

    #[test]
    fn test_unexpected_tokens() {
        let err = parse_error("var 1 = 2;");
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken { found: "1".into(), expected: "identifier".into() }
        );

        let err = parse_error("else print(1);");
        assert_eq!(
            err.kind,
            ErrorKind::UnexpectedToken { found: "else".into(), expected: "a statement".into() }
        );

        assert!(matches!(parse_error("var x 5;").kind, ErrorKind::UnexpectedToken { .. }));
        assert!(matches!(parse_error("print(1 +);").kind, ErrorKind::UnexpectedToken { .. }));
    }

    #[test]
    fn test_unexpected_end_of_input() {
        assert!(matches!(parse_error("var x = 1").kind, ErrorKind::UnexpectedEof { .. }));
        assert_eq!(
            parse_error("{ var x = 1;").kind,
            ErrorKind::UnexpectedEof { expected: "'}'".into() }
        );
        assert!(matches!(parse_error("if (1)").kind, ErrorKind::UnexpectedEof { .. }));
    }

    #[test]
    fn test_stream_without_eof_token_is_guarded() {
        let mut symbols = SymbolTable::new();
        let stream = vec![
            Token::new(TokenKind::Var, "var", 1, 1),
            Token::new(TokenKind::Ident, "x", 1, 5),
        ];
        let err = Parser::new(stream, &mut symbols).parse_program().unwrap_err();
        assert!(matches!(err.kind, ErrorKind::UnexpectedEof { .. }));
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn test_parsing_is_repeatable() {
        let source = "var a = 2; { var b = a ** 2; print(\"b={b}\"); } while (a > 0) a = a - 1;";
        let stream = tokens(source);

        let mut first_symbols = SymbolTable::new();
        let first = Parser::new(stream.clone(), &mut first_symbols).parse_program().unwrap();
        let mut second_symbols = SymbolTable::new();
        let second = Parser::new(stream, &mut second_symbols).parse_program().unwrap();

        assert_eq!(first, second);
        let slots = |t: &SymbolTable| t.variables().map(|(s, r)| (s, r.name.clone())).collect::<Vec<_>>();
        assert_eq!(slots(&first_symbols), slots(&second_symbols));
    }

    #[test]
    fn test_identifier_nodes_record_position() {
        let (program, _) = try_parse("var total = 1;\n  total = total + 1;").unwrap();
        let Node::Scope(body) = program else { panic!("Expected Scope") };
        match &body[1] {
            Node::Assign { target, value } => {
                assert_eq!((target.line, target.col), (2, 3));
                assert_eq!(target.slot.index(), 0);
                assert!(matches!(**value, Node::Operation(Operation::Binary(BinaryOp::Add, _, _))));
            }
            other => panic!("Expected Assign, got {:?}", other),
        }
    }
}
