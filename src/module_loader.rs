// ABOUTME: Resolves (import NAME) by searching the fixed stdlib/<category>/ layout, recursively

use crate::ast::Module;
use crate::config::STDLIB_SUBDIRS;
use crate::env::Environment;
use crate::error::AislError;
use crate::value::Value;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Walks upward from `start` looking for the first ancestor (inclusive) that
/// contains a `stdlib/` subdirectory.
fn find_stdlib_root(start: &Path) -> Option<PathBuf> {
    let mut dir = if start.is_dir() { Some(start) } else { start.parent() };
    while let Some(d) = dir {
        if d.join("stdlib").is_dir() {
            return Some(d.to_path_buf());
        }
        dir = d.parent();
    }
    None
}

/// Candidate `stdlib/<category>/` directories searched for `<NAME>.aisl`, in
/// first-seen order, built from the source file's location, the running
/// binary's location, and the current directory.
fn candidate_dirs(source_path: Option<&Path>) -> Vec<PathBuf> {
    let mut roots = Vec::new();
    if let Some(p) = source_path {
        if let Some(root) = find_stdlib_root(p) {
            roots.push(root);
        }
    }
    if let Ok(exe) = std::env::current_exe() {
        if let Some(root) = find_stdlib_root(&exe) {
            roots.push(root);
        }
    }
    if let Ok(cwd) = std::env::current_dir() {
        if let Some(root) = find_stdlib_root(&cwd) {
            roots.push(root);
        }
    }

    let mut seen = HashSet::new();
    let mut dirs = Vec::new();
    for root in roots {
        for sub in STDLIB_SUBDIRS {
            let dir = root.join("stdlib").join(sub);
            if seen.insert(dir.clone()) {
                dirs.push(dir);
            }
        }
    }
    dirs
}

fn resolve(name: &str, source_path: Option<&Path>) -> Option<PathBuf> {
    for dir in candidate_dirs(source_path) {
        let candidate = dir.join(format!("{name}.aisl"));
        if candidate.is_file() {
            return Some(candidate);
        }
    }
    None
}

/// Loads `module` into `env` (registering its functions), then recursively
/// loads everything it imports. `loaded` is keyed by each import's resolved
/// absolute path: once a file has been fully read and parsed, a second
/// import reaching it by a different name or through a different branch of
/// the import graph registers its functions again without re-reading or
/// re-parsing the file — a diamond-shaped import graph parses each file
/// once. The same set doubles as the cycle guard, since a path can only be
/// `in_flight` by being absent from `loaded` and present in `in_flight`.
pub fn load_module(module: &Module, env: &Rc<Environment>, source_path: Option<&Path>) -> Result<(), AislError> {
    let mut loaded: HashMap<PathBuf, Module> = HashMap::new();
    let mut in_flight = HashSet::new();
    register_functions(module, env);
    for name in &module.imports {
        load_import(name, env, source_path, &mut loaded, &mut in_flight)?;
    }
    Ok(())
}

fn register_functions(module: &Module, env: &Rc<Environment>) {
    for f in &module.functions {
        env.define_function(f.name.clone(), Value::Function(Rc::new(f.clone())));
    }
}

fn load_import(
    name: &str,
    env: &Rc<Environment>,
    source_path: Option<&Path>,
    loaded: &mut HashMap<PathBuf, Module>,
    in_flight: &mut HashSet<PathBuf>,
) -> Result<(), AislError> {
    let Some(path) = resolve(name, source_path) else {
        crate::diagnostics::warn(&format!("could not resolve import '{name}'; skipping"));
        return Ok(());
    };
    if let Some(module) = loaded.get(&path) {
        register_functions(module, env);
        return Ok(());
    }
    if in_flight.contains(&path) {
        return Ok(());
    }

    let text = std::fs::read_to_string(&path).map_err(|e| AislError::IoError(e.to_string()))?;
    let module = crate::parser::parse(&text)?;

    in_flight.insert(path.clone());
    register_functions(&module, env);
    for imported in &module.imports {
        load_import(imported, env, Some(path.as_path()), loaded, in_flight)?;
    }
    in_flight.remove(&path);
    loaded.insert(path, module);
    Ok(())
}
