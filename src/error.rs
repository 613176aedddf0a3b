// ABOUTME: Error types for lexing, parsing, and evaluation failures

use thiserror::Error;

/// The full AISL error taxonomy. `Lex` and `Parse` are always driver-fatal;
/// every other variant is a `RuntimeError` in the language's terms and can
/// be caught by `try`/`catch`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AislError {
    #[error("Lexer error: {0}")]
    Lex(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: String, actual: String },

    #[error("Undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("{function}: {message}")]
    InvalidArguments { function: String, message: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Index out of bounds: index {index}, length {length}")]
    IndexOutOfBounds { index: i64, length: usize },

    #[error("Key not found: {0}")]
    KeyNotFound(String),

    #[error("IO error: {0}")]
    IoError(String),

    #[error("Label not found: {0}")]
    LabelNotFound(String),

    #[error("{0}")]
    Runtime(String),
}

impl AislError {
    /// Renders the message a `try`/`catch` binds to the catch variable —
    /// the bare message, without the `Kind:` prefix used on stderr.
    pub fn catch_message(&self) -> String {
        match self {
            AislError::TypeMismatch { expected, actual } => {
                format!("expected {expected}, got {actual}")
            }
            AislError::UndefinedVariable(name) => format!("Undefined variable: {name}"),
            AislError::UnknownFunction(name) => format!("Unknown function: {name}"),
            AislError::InvalidArguments { function, message } => {
                format!("{function}: {message}")
            }
            AislError::DivisionByZero => "Division by zero".to_string(),
            AislError::IndexOutOfBounds { index, length } => {
                format!("Index out of bounds: index {index}, length {length}")
            }
            AislError::KeyNotFound(key) => format!("Key not found: {key}"),
            AislError::IoError(msg) => msg.clone(),
            AislError::LabelNotFound(label) => format!("Label not found: {label}"),
            AislError::Runtime(msg) => msg.clone(),
            AislError::Lex(msg) => msg.clone(),
            AislError::Parse(msg) => msg.clone(),
        }
    }

    /// True for the `RuntimeError` class that `try`/`catch` is allowed to catch.
    pub fn is_catchable(&self) -> bool {
        !matches!(self, AislError::Lex(_) | AislError::Parse(_))
    }

    pub fn invalid_arguments(function: &str, message: impl Into<String>) -> Self {
        AislError::InvalidArguments {
            function: function.to_string(),
            message: message.into(),
        }
    }

    pub fn type_mismatch(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        AislError::TypeMismatch {
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catchable_excludes_lex_and_parse() {
        assert!(!AislError::Lex("x".into()).is_catchable());
        assert!(!AislError::Parse("x".into()).is_catchable());
        assert!(AislError::DivisionByZero.is_catchable());
        assert!(AislError::Runtime("boom".into()).is_catchable());
    }

    #[test]
    fn division_by_zero_catch_message() {
        assert_eq!(AislError::DivisionByZero.catch_message(), "Division by zero");
    }

    #[test]
    fn display_prefixes_match_driver_contract() {
        assert_eq!(
            format!("{}", AislError::Lex("bad char".into())),
            "Lexer error: bad char"
        );
        assert_eq!(
            format!("{}", AislError::Parse("unexpected )".into())),
            "Parse error: unexpected )"
        );
    }
}
