// ABOUTME: Evaluator environment: a flat name-to-value map, no closures over outer locals

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// A name→value map created per function call.
/// There is no parent chain: a function call's environment inherits only the
/// `VFunction` bindings from the *top-level* module environment, then gets
/// its parameters added. Ordinary locals come into existence as `Set`
/// statements execute, in this same flat map — `if`/`while`/`for-each`/`try`
/// bodies do not get their own child scope.
#[derive(Debug, Default)]
pub struct Environment {
    bindings: RefCell<HashMap<String, Value>>,
    /// The true top-level module environment this one was ultimately built
    /// from by `for_call`. `None` for the module-level environment itself;
    /// always `Some` for a call environment. Kept so a nested call can
    /// rebuild its own call environment from the *module*'s function table
    /// rather than from whatever locals the currently executing call has
    /// accumulated via `Set` — otherwise a local bound to a function value
    /// would leak into callees, breaking the no-closures invariant.
    module: Option<Rc<Environment>>,
}

impl Environment {
    /// A fresh environment with no bindings — used to build up the
    /// module-level function table as modules are loaded.
    pub fn new() -> Rc<Self> {
        Rc::new(Environment {
            bindings: RefCell::new(HashMap::new()),
            module: None,
        })
    }

    /// Builds a call environment: copies only the `VFunction` bindings out
    /// of the true top-level module environment (resolved from `caller_env`,
    /// not `caller_env` itself), then adds `params`. This is the one place
    /// AISL's environment model diverges from a lexical-closure chain — a
    /// function body can never see the caller's local variables, even
    /// transitively through a chain of calls.
    pub fn for_call(caller_env: &Rc<Environment>, params: Vec<(String, Value)>) -> Rc<Self> {
        let module_env: &Rc<Environment> = caller_env.module.as_ref().unwrap_or(caller_env);
        let mut bindings = HashMap::new();
        for (name, value) in module_env.bindings.borrow().iter() {
            if matches!(value, Value::Function(_)) {
                bindings.insert(name.clone(), value.clone());
            }
        }
        for (name, value) in params {
            bindings.insert(name, value);
        }
        Rc::new(Environment {
            bindings: RefCell::new(bindings),
            module: Some(module_env.clone()),
        })
    }

    /// Registers a function binding in the module-level environment.
    pub fn define_function(&self, name: String, value: Value) {
        debug_assert!(matches!(value, Value::Function(_)));
        self.bindings.borrow_mut().insert(name, value);
    }

    /// `Set(x, t, e)`: always overwrites any prior binding for `x`.
    pub fn set(&self, name: &str, value: Value) {
        self.bindings.borrow_mut().insert(name.to_string(), value);
    }

    pub fn get(&self, name: &str) -> Option<Value> {
        self.bindings.borrow().get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bindings.borrow().contains_key(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Function, TypeName};

    fn function_value(name: &str) -> Value {
        Value::Function(Rc::new(Function {
            name: name.to_string(),
            params: vec![],
            return_type: TypeName::Unit,
            body: vec![],
        }))
    }

    #[test]
    fn set_and_get_roundtrip() {
        let env = Environment::new();
        env.set("x", Value::Int(42));
        match env.get("x") {
            Some(Value::Int(42)) => {}
            other => panic!("expected Int(42), got {other:?}"),
        }
    }

    #[test]
    fn undefined_variable_is_none() {
        let env = Environment::new();
        assert!(env.get("missing").is_none());
    }

    #[test]
    fn for_call_inherits_only_function_bindings() {
        let module_env = Environment::new();
        module_env.define_function("helper".to_string(), function_value("helper"));
        module_env.set("not_a_function_binding_in_module_env", Value::Int(1));

        let call_env = Environment::for_call(&module_env, vec![("n".to_string(), Value::Int(5))]);
        assert!(matches!(call_env.get("helper"), Some(Value::Function(_))));
        assert!(matches!(call_env.get("n"), Some(Value::Int(5))));
        // Module-env locals (not functions) are never inherited — no closures.
        assert!(call_env.get("not_a_function_binding_in_module_env").is_none());
    }

    #[test]
    fn set_overwrites_prior_binding() {
        let env = Environment::new();
        env.set("x", Value::Int(1));
        env.set("x", Value::Str("now a string".into()));
        assert!(matches!(env.get("x"), Some(Value::Str(_))));
    }

    #[test]
    fn caller_locals_never_leak_into_callee_even_with_same_env_kind() {
        // A second call built from the same module env does not see
        // bindings a *different* call environment happened to set, because
        // each call gets its own fresh Environment — there is no sharing.
        let module_env = Environment::new();
        module_env.define_function("f".to_string(), function_value("f"));

        let call_a = Environment::for_call(&module_env, vec![]);
        call_a.set("local_to_a", Value::Int(99));

        let call_b = Environment::for_call(&module_env, vec![]);
        assert!(call_b.get("local_to_a").is_none());
    }

    #[test]
    fn function_typed_local_does_not_leak_through_a_nested_call() {
        // A call environment that picks up a `Value::Function`-typed local
        // via `set` (e.g. `(set other function leaked)`) must not pass that
        // binding on to a function it then calls — `for_call` must always
        // rebuild from the true module environment, not from whichever
        // call environment happens to be handed to it.
        let module_env = Environment::new();
        module_env.define_function("leaked".to_string(), function_value("leaked"));
        module_env.define_function("callee".to_string(), function_value("callee"));

        let caller_call_env = Environment::for_call(&module_env, vec![]);
        caller_call_env.set("other", function_value("leaked"));
        assert!(matches!(caller_call_env.get("other"), Some(Value::Function(_))));

        // Simulate callee's own fresh call environment being built while
        // `caller_call_env` (which now has a function-typed local) is the
        // environment in scope at the call site.
        let callee_call_env = Environment::for_call(&caller_call_env, vec![]);
        assert!(callee_call_env.get("other").is_none());
        assert!(matches!(callee_call_env.get("leaked"), Some(Value::Function(_))));
        assert!(matches!(callee_call_env.get("callee"), Some(Value::Function(_))));
    }
}
