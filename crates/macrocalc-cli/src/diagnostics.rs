use owo_colors::OwoColorize;
use macrocalc_syntax::error::{Error, ErrorClass, ErrorKind};

/// Pipeline stage that reported an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Lex,
    Parse,
    Run,
}

impl Stage {
    /// Heading for an error of `class` raised during this stage.
    ///
    /// Scoping violations found while parsing (undeclared or redeclared
    /// names) are semantic, not syntax, errors.
    pub fn label(self, class: ErrorClass) -> &'static str {
        match (self, class) {
            (Stage::Lex, _) => "Lex error",
            (Stage::Parse, ErrorClass::Syntax) => "Parse error",
            (Stage::Parse, ErrorClass::Semantic) => "Semantic error",
            (Stage::Run, _) => "Runtime error",
        }
    }
}

/// Prints `err` to stderr with its source line and a caret under the column.
pub fn render_error(stage: Stage, source: &str, err: &Error) {
    let label = stage.label(err.class());
    eprintln!("{}: {}", label.red().bold(), err.kind.to_string().red());
    match (err.line, err.col) {
        (Some(line), Some(col)) => {
            eprintln!("  --> line {}, column {}", line, col);
            if let Some(src_line) = line.checked_sub(1).and_then(|i| source.lines().nth(i)) {
                let line_num_str = format!("{:3} | ", line);
                eprintln!("     |");
                eprintln!("{}{}", line_num_str.bright_black(), src_line);

                let mut marker = " ".repeat(line_num_str.len());
                marker.push_str(&" ".repeat(col.saturating_sub(1)));
                marker.push('^');
                eprintln!("{}{}", marker.red(), " error here".red());
                eprintln!("     |");
            }
        }
        (Some(line), None) => eprintln!("  --> line {}", line),
        _ => {}
    }

    if let Some(help) = suggestion(&err.kind) {
        eprintln!("{}", format!("Help: {}", help).yellow());
    }
}

fn suggestion(kind: &ErrorKind) -> Option<&'static str> {
    let help = match kind {
        ErrorKind::UndeclaredVariable(_) => {
            "Declare it with 'var' in this block or an enclosing one before using it."
        }
        ErrorKind::UninitializedVariable(_) => {
            "Assign a value before reading it, e.g. 'var x = 0;'."
        }
        ErrorKind::Redeclaration(_) => {
            "A block declares each name once. Assign to it instead, or declare it in an inner block."
        }
        ErrorKind::DivisionByZero | ErrorKind::ModulusByZero => {
            "Check the divisor with an 'if' before the operation."
        }
        ErrorKind::EmptyCondition => "Conditions need an expression, e.g. 'while (i < 10)'.",
        ErrorKind::InvalidAssignTarget => "Only a variable name may appear on the left of '='.",
        ErrorKind::UnterminatedString => "String literals must be closed on the line they start.",
        ErrorKind::UnexpectedEof { .. } => "Check for a missing ';', ')' or '}'.",
        _ => return None,
    };
    Some(help)
}
