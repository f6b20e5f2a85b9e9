//! Splits string literal bodies into printable pieces.
//!
//! Input is the literal with its quotes already stripped. Output pieces are:
//!
//! - literal text, copied as-is;
//! - an escape character (`\n`, `\t`, `\\`, `\"`, `\{`, `\}`, ...), decoded
//!   to the character it stands for;
//! - an interpolation `{name}`, where `name` is an identifier. The braces are
//!   stripped; the parser resolves the name in the current scope.
//!
//! A `{` that does not open a well-formed `{identifier}` is literal text.

/// One piece of a string literal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringPiece {
    Literal(String),
    Escape(char),
    Interpolation(String),
}

#[derive(Debug, Default)]
pub struct StringLexer;

impl StringLexer {
    pub fn new() -> Self {
        StringLexer
    }

    pub fn tokenize(&self, raw: &str) -> Vec<StringPiece> {
        let chars: Vec<char> = raw.chars().collect();
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut i = 0;

        while i < chars.len() {
            match chars[i] {
                '\\' if i + 1 < chars.len() => {
                    flush(&mut literal, &mut pieces);
                    pieces.push(StringPiece::Escape(decode_escape(chars[i + 1])));
                    i += 2;
                }
                '{' => match interpolation_at(&chars, i) {
                    Some((name, next)) => {
                        flush(&mut literal, &mut pieces);
                        pieces.push(StringPiece::Interpolation(name));
                        i = next;
                    }
                    None => {
                        literal.push('{');
                        i += 1;
                    }
                },
                c => {
                    literal.push(c);
                    i += 1;
                }
            }
        }
        flush(&mut literal, &mut pieces);
        pieces
    }
}

fn flush(literal: &mut String, pieces: &mut Vec<StringPiece>) {
    if !literal.is_empty() {
        pieces.push(StringPiece::Literal(std::mem::take(literal)));
    }
}

fn decode_escape(c: char) -> char {
    match c {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

/// If `chars[start]` opens `{identifier}`, returns the identifier and the
/// index just past the closing brace.
fn interpolation_at(chars: &[char], start: usize) -> Option<(String, usize)> {
    let first = *chars.get(start + 1)?;
    if !(first.is_ascii_alphabetic() || first == '_') {
        return None;
    }
    let mut end = start + 1;
    while end < chars.len() && (chars[end].is_ascii_alphanumeric() || chars[end] == '_') {
        end += 1;
    }
    if chars.get(end) != Some(&'}') {
        return None;
    }
    Some((chars[start + 1..end].iter().collect(), end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use StringPiece::*;

    fn pieces(raw: &str) -> Vec<StringPiece> {
        StringLexer::new().tokenize(raw)
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(pieces("hello world"), vec![Literal("hello world".into())]);
        assert!(pieces("").is_empty());
    }

    #[test]
    fn test_interpolation_splits_text() {
        assert_eq!(
            pieces("x = {x}, y = {y_2}!"),
            vec![
                Literal("x = ".into()),
                Interpolation("x".into()),
                Literal(", y = ".into()),
                Interpolation("y_2".into()),
                Literal("!".into()),
            ]
        );
    }

    #[test]
    fn test_escapes_are_decoded() {
        assert_eq!(
            pieces(r#"a\nb\"\{x}"#),
            vec![
                Literal("a".into()),
                Escape('\n'),
                Literal("b".into()),
                Escape('"'),
                Escape('{'),
                Literal("x}".into()),
            ]
        );
    }

    #[test]
    fn test_malformed_braces_are_literal() {
        assert_eq!(pieces("{ x }"), vec![Literal("{ x }".into())]);
        assert_eq!(pieces("{1}"), vec![Literal("{1}".into())]);
        assert_eq!(pieces("open {x"), vec![Literal("open {x".into())]);
        assert_eq!(pieces("{}"), vec![Literal("{}".into())]);
    }

    #[test]
    fn test_trailing_backslash_is_literal() {
        assert_eq!(pieces("end\\"), vec![Literal("end\\".into())]);
    }
}
