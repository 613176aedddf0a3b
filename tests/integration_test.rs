// ABOUTME: Black-box end-to-end tests running whole AISL programs through parse -> load -> eval

use aisl::env::Environment;
use aisl::eval::call_function;
use aisl::module_loader::load_module;
use aisl::parser::parse;
use aisl::value::Value;
use std::rc::Rc;

fn run_main(source: &str) -> Result<Value, aisl::error::AislError> {
    let module = parse(source).expect("parse");
    let env = Environment::new();
    load_module(&module, &env, None).expect("load");
    match env.get("main") {
        Some(Value::Function(f)) => call_function(&f, vec![], &env),
        _ => panic!("no main function"),
    }
}

#[test]
fn factorial_of_five_is_one_twenty() {
    let source = r#"
        (module t
          (fn fact n int -> int
            (if (eq n 0) (ret 1))
            (ret (mul n (fact (sub n 1)))))
          (fn main -> int (ret (fact 5))))
    "#;
    assert!(matches!(run_main(source), Ok(Value::Int(120))));
}

#[test]
fn decimal_addition_avoids_float_rounding() {
    let source = r#"
        (module t (fn main -> int
          (set a decimal 0.1d)
          (set b decimal 0.2d)
          (set c decimal (add a b))
          (print c) (ret 0)))
    "#;
    assert!(matches!(run_main(source), Ok(Value::Int(0))));
}

#[test]
fn test_spec_runner_counts_passes_and_failures() {
    let source = r#"
        (module t
          (fn add2 a int b int -> int (ret (add a b)))
          (test-spec add2
            (case "pos" (input 2 3) (expect 5))
            (case "neg" (input -5 -3) (expect -8))))
    "#;
    let module = parse(source).unwrap();
    let env = Environment::new();
    load_module(&module, &env, None).unwrap();
    assert!(aisl::test_runner::run(&module, &env));
}

#[test]
fn test_spec_runner_reports_failure_without_panicking() {
    let source = r#"
        (module t
          (fn add2 a int b int -> int (ret (add a b)))
          (test-spec add2
            (case "wrong" (input 2 3) (expect 999))))
    "#;
    let module = parse(source).unwrap();
    let env = Environment::new();
    load_module(&module, &env, None).unwrap();
    assert!(!aisl::test_runner::run(&module, &env));
}

#[test]
fn map_insertion_order_survives_json_round_trip() {
    let source = r#"
        (module t (fn main -> int
          (set m map (map_new))
          (map_set m "b" "1") (map_set m "a" "2") (map_set m "c" "3")
          (println (json_stringify m)) (ret 0)))
    "#;
    assert!(matches!(run_main(source), Ok(Value::Int(0))));
}

#[test]
fn try_catch_handles_division_by_zero() {
    let source = r#"
        (module t (fn main -> int
          (try (set x int (div 10 0))
               (catch e string (print "caught: ") (println e)))
          (ret 0)))
    "#;
    assert!(matches!(run_main(source), Ok(Value::Int(0))));
}

#[test]
fn cond_picks_the_first_matching_branch() {
    let source = r#"
        (module t
          (fn grade s int -> string
            (set r string "F")
            (cond ((ge s 90) (set r string "A"))
                  ((ge s 80) (set r string "B"))
                  ((ge s 70) (set r string "C"))
                  (true (set r string "F")))
            (ret r))
          (fn main -> int (println (grade 85)) (ret 0)))
    "#;
    assert!(matches!(run_main(source), Ok(Value::Int(0))));
}

#[test]
fn file_read_of_missing_file_raises_io_error() {
    let source = r#"
        (module t (fn main -> int
          (set contents string (file_read "/nonexistent/path/does-not-exist.txt"))
          (ret 0)))
    "#;
    assert!(matches!(run_main(source), Err(aisl::error::AislError::IoError(_))));
}

#[test]
fn string_find_reports_minus_one_when_absent_and_zero_for_empty_needle() {
    let source = r#"
        (module t (fn main -> int
          (set a int (string_find "hello" "z"))
          (set b int (string_find "hello" ""))
          (ifnot (eq a -1) fail)
          (ifnot (eq b 0) fail)
          (ret 0)
          (label fail)
          (ret 1)))
    "#;
    assert!(matches!(run_main(source), Ok(Value::Int(0))));
}
