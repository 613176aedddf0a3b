// ABOUTME: Tree-walking evaluator: block execution with goto, control flow as a sum type

use crate::ast::{Expr, Function};
use crate::bigdecimal;
use crate::builtins;
use crate::env::Environment;
use crate::error::AislError;
use crate::value::{type_matches, Value};
use std::rc::Rc;

/// A control-flow unwind. `Goto` is resolved entirely within `eval_block`
/// and never escapes it; `Return`/`Break`/`Continue` bubble up to the
/// nearest function call / loop that can consume them.
#[derive(Debug)]
pub enum Flow {
    Value(Value),
    Return(Value),
    Break,
    Continue,
    Goto(String),
}

fn find_label(body: &[Expr], label: &str) -> Option<usize> {
    body.iter()
        .position(|e| matches!(e, Expr::Label(name) if name == label))
        .map(|i| i + 1)
}

/// Runs a block with a program counter. `goto` jumps to the statement
/// right after the matching `label` in this same block; a label outside
/// the block is a runtime error, not an upward search.
pub fn eval_block(body: &[Expr], env: &Rc<Environment>) -> Result<Flow, AislError> {
    let mut pc = 0usize;
    let mut last = Value::Unit;
    while pc < body.len() {
        match eval_expr(&body[pc], env)? {
            Flow::Value(v) => {
                last = v;
                pc += 1;
            }
            Flow::Goto(label) => match find_label(body, &label) {
                Some(idx) => pc = idx,
                None => return Err(AislError::LabelNotFound(label)),
            },
            other @ (Flow::Return(_) | Flow::Break | Flow::Continue) => return Ok(other),
        }
    }
    Ok(Flow::Value(last))
}

pub fn eval_value(expr: &Expr, env: &Rc<Environment>) -> Result<Value, AislError> {
    match eval_expr(expr, env)? {
        Flow::Value(v) => Ok(v),
        _ => Err(AislError::Runtime(
            "break/continue/return/goto used in value position".to_string(),
        )),
    }
}

fn eval_bool(expr: &Expr, env: &Rc<Environment>) -> Result<bool, AislError> {
    match eval_value(expr, env)? {
        Value::Bool(b) => Ok(b),
        other => Err(AislError::type_mismatch("bool", other.kind_name())),
    }
}

/// Calls a user function. Builds a fresh call environment that inherits
/// only the function bindings reachable from `caller_env` — never its
/// locals (see `Environment::for_call`) — binds parameters after a type
/// check, and runs the body catching `Return`. A body that falls through
/// without an explicit `ret` yields `Unit`, regardless of its last
/// statement's value.
pub fn call_function(func: &Function, args: Vec<Value>, caller_env: &Rc<Environment>) -> Result<Value, AislError> {
    if args.len() != func.params.len() {
        return Err(AislError::invalid_arguments(
            &func.name,
            format!("expected {} argument(s), got {}", func.params.len(), args.len()),
        ));
    }
    let mut params = Vec::with_capacity(args.len());
    for (param, arg) in func.params.iter().zip(args) {
        if !type_matches(&param.ty, &arg) {
            return Err(AislError::type_mismatch(param.ty.as_str(), arg.kind_name()));
        }
        params.push((param.name.clone(), arg));
    }
    let call_env = Environment::for_call(caller_env, params);
    match eval_block(&func.body, &call_env)? {
        Flow::Return(v) => Ok(v),
        Flow::Value(_) => Ok(Value::Unit),
        Flow::Break | Flow::Continue => Err(AislError::Runtime(format!(
            "{}: break/continue used outside a loop",
            func.name
        ))),
        Flow::Goto(label) => Err(AislError::LabelNotFound(label)),
    }
}

pub fn eval_expr(expr: &Expr, env: &Rc<Environment>) -> Result<Flow, AislError> {
    match expr {
        Expr::LitInt(i) => Ok(Flow::Value(Value::Int(*i))),
        Expr::LitFloat(f) => Ok(Flow::Value(Value::Float(*f))),
        Expr::LitDecimal(s) => Ok(Flow::Value(Value::Decimal(bigdecimal::normalize(s)?))),
        Expr::LitString(s) => Ok(Flow::Value(Value::Str(s.clone()))),
        Expr::LitBool(b) => Ok(Flow::Value(Value::Bool(*b))),
        Expr::LitUnit => Ok(Flow::Value(Value::Unit)),

        Expr::LitArray(items) => {
            let mut values = Vec::with_capacity(items.len());
            for item in items {
                values.push(eval_value(item, env)?);
            }
            Ok(Flow::Value(Value::new_array(values)))
        }

        Expr::LitMap(pairs) => {
            let mut map = crate::value::OrderedMap::new();
            for (k, v) in pairs {
                let key = match eval_value(k, env)? {
                    Value::Str(s) => s,
                    other => return Err(AislError::type_mismatch("string", other.kind_name())),
                };
                let value = eval_value(v, env)?;
                map.set(key, value);
            }
            Ok(Flow::Value(Value::new_map(map)))
        }

        Expr::Var(name) => env
            .get(name)
            .map(Flow::Value)
            .ok_or_else(|| AislError::UndefinedVariable(name.clone())),

        Expr::Call(name, args) => {
            let mut values = Vec::with_capacity(args.len());
            for a in args {
                values.push(eval_value(a, env)?);
            }
            if let Some(result) = builtins::dispatch(name, &values) {
                return Ok(Flow::Value(result?));
            }
            match env.get(name) {
                Some(Value::Function(f)) => Ok(Flow::Value(call_function(&f, values, env)?)),
                _ => Err(AislError::UnknownFunction(name.clone())),
            }
        }

        Expr::If(cond, then_body, else_body) => {
            if eval_bool(cond, env)? {
                eval_block(then_body, env)
            } else if let Some(eb) = else_body {
                eval_block(eb, env)
            } else {
                Ok(Flow::Value(Value::Unit))
            }
        }

        Expr::Cond(branches) => {
            for (cond, body) in branches {
                if eval_bool(cond, env)? {
                    return eval_block(body, env);
                }
            }
            Ok(Flow::Value(Value::Unit))
        }

        Expr::While(cond, body) => {
            while eval_bool(cond, env)? {
                match eval_block(body, env)? {
                    Flow::Value(_) | Flow::Continue => {}
                    Flow::Break => break,
                    other @ Flow::Return(_) => return Ok(other),
                    Flow::Goto(label) => return Err(AislError::LabelNotFound(label)),
                }
            }
            Ok(Flow::Value(Value::Unit))
        }

        Expr::Loop(body) => loop {
            match eval_block(body, env)? {
                Flow::Value(_) | Flow::Continue => {}
                Flow::Break => return Ok(Flow::Value(Value::Unit)),
                other @ Flow::Return(_) => return Ok(other),
                Flow::Goto(label) => return Err(AislError::LabelNotFound(label)),
            }
        },

        Expr::ForEach(var, ty, coll, body) => {
            let collection = eval_value(coll, env)?;
            match collection {
                Value::Array(items) => {
                    let snapshot: Vec<Value> = items.borrow().clone();
                    for item in snapshot {
                        if !type_matches(ty, &item) {
                            return Err(AislError::type_mismatch(ty.as_str(), item.kind_name()));
                        }
                        env.set(var, item);
                        match eval_block(body, env)? {
                            Flow::Value(_) | Flow::Continue => {}
                            Flow::Break => break,
                            other @ Flow::Return(_) => return Ok(other),
                            Flow::Goto(label) => return Err(AislError::LabelNotFound(label)),
                        }
                    }
                    Ok(Flow::Value(Value::Unit))
                }
                Value::Map(map) => {
                    let keys: Vec<String> = map.borrow().keys().to_vec();
                    for key in keys {
                        let key_value = Value::Str(key);
                        if !type_matches(ty, &key_value) {
                            return Err(AislError::type_mismatch(ty.as_str(), key_value.kind_name()));
                        }
                        env.set(var, key_value);
                        match eval_block(body, env)? {
                            Flow::Value(_) | Flow::Continue => {}
                            Flow::Break => break,
                            other @ Flow::Return(_) => return Ok(other),
                            Flow::Goto(label) => return Err(AislError::LabelNotFound(label)),
                        }
                    }
                    Ok(Flow::Value(Value::Unit))
                }
                other => Err(AislError::type_mismatch("array or map", other.kind_name())),
            }
        }

        Expr::Break => Ok(Flow::Break),
        Expr::Continue => Ok(Flow::Continue),

        Expr::Set(name, ty, value_expr) => {
            let value = eval_value(value_expr, env)?;
            if !type_matches(ty, &value) {
                return Err(AislError::type_mismatch(ty.as_str(), value.kind_name()));
            }
            env.set(name, value);
            Ok(Flow::Value(Value::Unit))
        }

        Expr::Return(value_expr) => Ok(Flow::Return(eval_value(value_expr, env)?)),

        Expr::Label(_) => Ok(Flow::Value(Value::Unit)),
        Expr::Goto(name) => Ok(Flow::Goto(name.clone())),

        Expr::IfNot(cond, label) => {
            if eval_bool(cond, env)? {
                Ok(Flow::Value(Value::Unit))
            } else {
                Ok(Flow::Goto(label.clone()))
            }
        }

        Expr::Try(body, catch_var, _catch_ty, catch_body) => match eval_block(body, env) {
            Ok(flow) => Ok(flow),
            Err(e) if e.is_catchable() => {
                env.set(catch_var, Value::Str(e.catch_message()));
                eval_block(catch_body, env)
            }
            Err(e) => Err(e),
        },

        Expr::And(l, r) => {
            if !eval_bool(l, env)? {
                Ok(Flow::Value(Value::Bool(false)))
            } else {
                Ok(Flow::Value(Value::Bool(eval_bool(r, env)?)))
            }
        }

        Expr::Or(l, r) => {
            if eval_bool(l, env)? {
                Ok(Flow::Value(Value::Bool(true)))
            } else {
                Ok(Flow::Value(Value::Bool(eval_bool(r, env)?)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn build_module_env(source: &str) -> (Rc<Environment>, crate::ast::Module) {
        let module = parse(source).unwrap();
        let env = Environment::new();
        for f in &module.functions {
            env.define_function(f.name.clone(), Value::Function(Rc::new(f.clone())));
        }
        (env, module)
    }

    fn run_main(source: &str) -> Value {
        let (env, module) = build_module_env(source);
        let main = module.functions.iter().find(|f| f.name == "main").unwrap();
        call_function(main, vec![], &env).unwrap()
    }

    #[test]
    fn factorial_scenario() {
        let src = r#"(module t (fn fact n int -> int
          (if (eq n 0) (ret 1))
          (ret (mul n (fact (sub n 1)))))
        (fn main -> int (ret (fact 5))))"#;
        assert!(matches!(run_main(src), Value::Int(120)));
    }

    #[test]
    fn decimal_literal_normalizes() {
        let src = r#"(module t (fn main -> int
          (set a decimal 0.1d)
          (ret 0)))"#;
        assert!(matches!(run_main(src), Value::Int(0)));
    }

    #[test]
    fn try_catch_division_by_zero() {
        let src = r#"(module t (fn main -> string
          (set msg string "none")
          (try (set x int (div 10 0))
               (catch e string (set msg string e)))
          (ret msg)))"#;
        match run_main(src) {
            Value::Str(s) => assert_eq!(s, "Division by zero"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn cond_and_short_circuit_scenario() {
        let src = r#"(module t (fn grade s int -> string
          (set r string "F")
          (cond ((ge s 90) (set r string "A"))
                ((ge s 80) (set r string "B"))
                ((ge s 70) (set r string "C"))
                (true (set r string "F")))
          (ret r))
        (fn main -> string (ret (grade 85))))"#;
        let (env, module) = build_module_env(src);
        let main = module.functions.iter().find(|f| f.name == "main").unwrap();
        match call_function(main, vec![], &env).unwrap() {
            Value::Str(s) => assert_eq!(s, "B"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn goto_label_in_same_block_works() {
        let src = r#"(module t (fn main -> int
          (set n int 0)
          (label top)
          (set n int (add n 1))
          (ifnot (ge n 3) top)
          (ret n)))"#;
        assert!(matches!(run_main(src), Value::Int(3)));
    }

    #[test]
    fn goto_missing_label_is_runtime_error() {
        let src = r#"(module t (fn main -> int (goto nope) (ret 0)))"#;
        let (env, module) = build_module_env(src);
        let main = module.functions.iter().find(|f| f.name == "main").unwrap();
        let err = call_function(main, vec![], &env).unwrap_err();
        assert!(matches!(err, AislError::LabelNotFound(_)));
    }

    #[test]
    fn no_closures_function_cannot_see_caller_locals() {
        let src = r#"(module t
          (fn helper -> int (ret secret))
          (fn main -> int (set secret int 99) (ret (helper))))"#;
        let (env, module) = build_module_env(src);
        let main = module.functions.iter().find(|f| f.name == "main").unwrap();
        let err = call_function(main, vec![], &env).unwrap_err();
        assert!(matches!(err, AislError::UndefinedVariable(_)));
    }

    #[test]
    fn function_typed_local_cannot_be_called_through_a_nested_call() {
        // `main` binds a local `other` of type `function` to `leaked`, then
        // calls `callee`. `callee` must not inherit `other` just because it
        // happens to be a `Value::Function` sitting in `main`'s call
        // environment — only module-level functions and its own parameters
        // are visible to it.
        let src = r#"(module t
          (fn leaked -> int (ret 1))
          (fn callee -> int (ret (other)))
          (fn main -> int (set other function leaked) (ret (callee))))"#;
        let (env, module) = build_module_env(src);
        let main = module.functions.iter().find(|f| f.name == "main").unwrap();
        let err = call_function(main, vec![], &env).unwrap_err();
        assert!(matches!(err, AislError::UnknownFunction(name) if name == "other"));
    }

    #[test]
    fn missing_return_yields_unit() {
        let src = r#"(module t (fn f -> int (set x int 1)) (fn main -> int (f) (ret 0)))"#;
        let (env, module) = build_module_env(src);
        let f = module.functions.iter().find(|f| f.name == "f").unwrap();
        assert!(matches!(call_function(f, vec![], &env).unwrap(), Value::Unit));
    }

    #[test]
    fn while_loop_break_and_continue() {
        let src = r#"(module t (fn main -> int
          (set i int 0)
          (set sum int 0)
          (while (lt i 10)
            (set i int (add i 1))
            (ifnot (ne (mod i 2) 0) skip)
            (goto after)
            (label skip)
            (continue)
            (label after)
            (set sum int (add sum i)))
          (ret sum)))"#;
        assert!(matches!(run_main(src), Value::Int(25)));
    }
}
