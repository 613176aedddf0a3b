// ABOUTME: Single place stderr diagnostics are routed through — fatal errors and warnings

use crate::error::AislError;

/// Prefix matching the `Kind: message` convention the driver's stderr
/// contract expects for a fatal lex/parse/runtime error.
fn kind_prefix(err: &AislError) -> &'static str {
    match err {
        AislError::Lex(_) => "Lexer error",
        AislError::Parse(_) => "Parse error",
        _ => "Runtime error",
    }
}

/// Prints a driver-fatal error to stderr in `Kind: message` form.
pub fn report_fatal(err: &AislError) {
    eprintln!("{}: {}", kind_prefix(err), err);
}

/// Prints a non-fatal warning (currently only the module loader's
/// "could not resolve import" case) to stderr.
pub fn warn(message: &str) {
    eprintln!("warning: {message}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_prefix_distinguishes_lex_parse_and_runtime() {
        assert_eq!(kind_prefix(&AislError::Lex("x".into())), "Lexer error");
        assert_eq!(kind_prefix(&AislError::Parse("x".into())), "Parse error");
        assert_eq!(kind_prefix(&AislError::DivisionByZero), "Runtime error");
    }
}
