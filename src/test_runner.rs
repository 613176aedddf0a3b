// ABOUTME: Executes a module's declarative test-spec cases and reports pass/fail

use crate::ast::Module;
use crate::env::Environment;
use crate::error::AislError;
use crate::eval::{call_function, eval_value};
use crate::value::{string_of_value, values_equal, Value};
use std::rc::Rc;

/// Runs every `test-spec` in `module` against the function table already
/// registered in `module_env`. Returns `true` if every case passed.
pub fn run(module: &Module, module_env: &Rc<Environment>) -> bool {
    let mut passed = 0usize;
    let mut failed = 0usize;

    for spec in &module.test_specs {
        println!("Test: {}", spec.function);
        let Some(Value::Function(target)) = module_env.get(&spec.function) else {
            for case in &spec.cases {
                println!("  {} (unknown function '{}')", case.description, spec.function);
                failed += 1;
            }
            continue;
        };

        for case in &spec.cases {
            match run_case(&target, case, module_env) {
                Ok(true) => {
                    println!("  {}", case.description);
                    passed += 1;
                }
                Ok(false) => {
                    println!("  {}", case.description);
                    failed += 1;
                }
                Err(e) => {
                    println!("  {} (error: {e})", case.description);
                    failed += 1;
                }
            }
        }
    }

    println!("{passed} passed, {failed} failed");
    failed == 0
}

fn run_case(
    target: &Rc<crate::ast::Function>,
    case: &crate::ast::Case,
    module_env: &Rc<Environment>,
) -> Result<bool, AislError> {
    let mut args = Vec::with_capacity(case.inputs.len());
    for input in &case.inputs {
        args.push(eval_value(input, module_env)?);
    }
    let result = call_function(target, args, module_env)?;
    let expected = eval_value(&case.expect, module_env)?;

    let ok = values_equal(&result, &expected);
    if !ok {
        println!("    Expected: {}", string_of_value(&expected));
        println!("    Got: {}", string_of_value(&result));
    }
    Ok(ok)
}
