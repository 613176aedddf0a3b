// ABOUTME: Version constants and the fixed stdlib directory layout used by the module loader

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const WELCOME_MESSAGE: &str = "AISL";
pub const WELCOME_SUBTITLE: &str = "A small systems-oriented s-expression language";

/// Subdirectories of a `stdlib/` root searched, in this order, for an
/// `(import NAME)`'s `<NAME>.aisl` file.
pub const STDLIB_SUBDIRS: &[&str] = &["core", "data", "net", "sys", "crypto", "pattern", "db"];

pub const STDLIB_ROOT: &str = "stdlib";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stdlib_subdirs_match_the_fixed_catalog() {
        assert_eq!(STDLIB_SUBDIRS.len(), 7);
        assert!(STDLIB_SUBDIRS.contains(&"core"));
        assert!(STDLIB_SUBDIRS.contains(&"db"));
    }
}
