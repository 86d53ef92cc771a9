//! A restricted expression language for report fields and aggregates.
//!
//! Expressions see exactly five root names: `system`, `vars`, `parameters`,
//! `funcs` and `row`. There are no imports, no attribute walking into host
//! objects and no callable other than the whitelisted `funcs.*` entries, so
//! the sandbox holds regardless of which backend evaluates it.

pub mod ast;
pub mod engine;
pub mod env;
pub mod error;
mod format;
pub mod functions;
pub mod operators;
mod parser;
pub mod value;

// --- Public API ---
pub use ast::{BinaryOperator, Expression, UnaryOperator};
pub use engine::{evaluate, safe_eval};
pub use env::{Environment, Scope, SystemInfo, builtin_functions};
pub use error::EvalError;
pub use functions::{FunctionRegistry, SandboxFunction};
pub use parser::parse_expression;
pub use value::{Number, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use indexmap::IndexMap;

    fn env_parts() -> (SystemInfo, IndexMap<String, Value>, IndexMap<String, Value>) {
        let system = SystemInfo::new(1, NaiveDate::from_ymd_opt(2024, 1, 15).unwrap());
        let mut vars = IndexMap::new();
        vars.insert("csum".to_string(), Value::Int(120));
        let mut params = IndexMap::new();
        params.insert("rate".to_string(), Value::Float(0.5));
        (system, vars, params)
    }

    #[test]
    fn test_parse_once_evaluate_many() {
        let (system, vars, params) = env_parts();
        let expr = parse_expression("vars.csum + row * parameters.rate").unwrap();
        for (row, expected) in [(2, 121.0), (10, 125.0)] {
            let row = Value::Int(row);
            let env = Environment::new(system, &vars, &params).with_row(Some(&row));
            assert_eq!(evaluate(&expr, &env), Ok(Value::Float(expected)));
        }
    }

    #[test]
    fn test_report_style_expressions() {
        let (system, vars, params) = env_parts();
        let row = Value::Int(41);
        let env = Environment::new(system, &vars, &params).with_row(Some(&row));
        assert_eq!(
            safe_eval(r#""Value %s" % (row + 1)"#, &env),
            Ok(Value::from("Value 42"))
        );
        assert_eq!(
            safe_eval("'Total: %.2f' % funcs.float(vars.csum)", &env),
            Ok(Value::from("Total: 120.00"))
        );
        assert_eq!(
            safe_eval("funcs.max(row, vars.csum) // 7", &env),
            Ok(Value::Int(17))
        );
    }

    #[test]
    fn test_custom_function_registry() {
        fn double(args: Vec<Value>) -> Result<Value, EvalError> {
            match args.as_slice() {
                [Value::Int(i)] => Ok(Value::Int(i * 2)),
                _ => Err(EvalError::TypeError("double expects an int".to_string())),
            }
        }
        let mut functions = FunctionRegistry::new();
        functions.register("double", double);
        let env = Environment::empty().with_functions(&functions);
        assert_eq!(safe_eval("funcs.double(21)", &env), Ok(Value::Int(42)));
        assert!(safe_eval("funcs.str(1)", &env).is_err());
    }

    #[test]
    fn test_parse_errors_carry_the_expression() {
        let err = safe_eval("row +", &Environment::empty()).unwrap_err();
        match err {
            EvalError::Parse { expression, .. } => assert_eq!(expression, "row +"),
            other => panic!("unexpected error {:?}", other),
        }
    }
}
