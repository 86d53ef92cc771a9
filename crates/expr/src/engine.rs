//! The evaluator: walks an [`Expression`] against an [`Environment`].

use crate::ast::{BinaryOperator, Expression};
use crate::env::Environment;
use crate::error::{EvalError, LookupFailure};
use crate::functions::SandboxFunction;
use crate::operators;
use crate::parser::parse_expression;
use crate::value::Value;
use chrono::Datelike;
use indexmap::IndexMap;
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Namespace {
    System,
    Vars,
    Parameters,
    Funcs,
}

impl Namespace {
    fn name(self) -> &'static str {
        match self {
            Namespace::System => "system",
            Namespace::Vars => "vars",
            Namespace::Parameters => "parameters",
            Namespace::Funcs => "funcs",
        }
    }
}

/// An intermediate result: namespaces and functions are only meaningful as
/// the target of an attribute access or a call.
enum Resolved {
    Value(Value),
    Namespace(Namespace),
    Function(String, SandboxFunction),
    Method { receiver: Value, name: String },
}

/// Parses and evaluates `expression` in one step.
pub fn safe_eval(expression: &str, env: &Environment<'_>) -> Result<Value, EvalError> {
    let parsed = parse_expression(expression)?;
    evaluate(&parsed, env)
}

/// Evaluates an already parsed expression.
pub fn evaluate(expr: &Expression, env: &Environment<'_>) -> Result<Value, EvalError> {
    let resolved = resolve(expr, env)?;
    into_value(resolved, env)
}

fn into_value(resolved: Resolved, env: &Environment<'_>) -> Result<Value, EvalError> {
    match resolved {
        Resolved::Value(value) => Ok(value),
        Resolved::Namespace(Namespace::System) => Ok(env.system.to_record()),
        Resolved::Namespace(Namespace::Vars) => Ok(scope_record(env.vars)),
        Resolved::Namespace(Namespace::Parameters) => Ok(scope_record(env.parameters)),
        Resolved::Namespace(ns @ Namespace::Funcs) => Err(EvalError::TypeError(format!(
            "namespace '{}' cannot be used as a value",
            ns.name()
        ))),
        Resolved::Function(name, _) | Resolved::Method { name, .. } => Err(
            EvalError::TypeError(format!("function '{}' must be called", name)),
        ),
    }
}

fn scope_record(scope: &dyn crate::env::Scope) -> Value {
    let fields: IndexMap<String, Value> = scope
        .names()
        .into_iter()
        .filter_map(|name| scope.lookup(&name).map(|value| (name, value)))
        .collect();
    Value::Record(fields)
}

fn resolve(expr: &Expression, env: &Environment<'_>) -> Result<Resolved, EvalError> {
    match expr {
        Expression::Literal(value) => Ok(Resolved::Value(value.clone())),
        Expression::Name(name) => resolve_root(name, env),
        Expression::Attribute { object, attribute } => {
            let target = resolve(object, env)?;
            Ok(attribute_of(target, attribute, env)?)
        }
        Expression::Index { object, index } => {
            let target = evaluate(object, env)?;
            let index = evaluate(index, env)?;
            index_into(&target, &index).map(Resolved::Value)
        }
        Expression::Call { callee, args } => {
            let callee = resolve(callee, env)?;
            let args = args
                .iter()
                .map(|arg| evaluate(arg, env))
                .collect::<Result<Vec<_>, _>>()?;
            call(callee, args, env).map(Resolved::Value)
        }
        Expression::Tuple(items) => items
            .iter()
            .map(|item| evaluate(item, env))
            .collect::<Result<Vec<_>, _>>()
            .map(|items| Resolved::Value(Value::Tuple(items))),
        Expression::List(items) => items
            .iter()
            .map(|item| evaluate(item, env))
            .collect::<Result<Vec<_>, _>>()
            .map(|items| Resolved::Value(Value::List(items))),
        Expression::UnaryOp { op, expr } => {
            let value = evaluate(expr, env)?;
            operators::unary(*op, &value).map(Resolved::Value)
        }
        Expression::BinaryOp { left, op, right } => {
            let left = evaluate(left, env)?;
            let value = match op {
                BinaryOperator::And if !left.is_truthy() => left,
                BinaryOperator::Or if left.is_truthy() => left,
                BinaryOperator::And | BinaryOperator::Or => evaluate(right, env)?,
                _ => {
                    let right = evaluate(right, env)?;
                    operators::binary(*op, &left, &right)?
                }
            };
            Ok(Resolved::Value(value))
        }
    }
}

fn resolve_root(name: &str, env: &Environment<'_>) -> Result<Resolved, EvalError> {
    match name {
        "system" => Ok(Resolved::Namespace(Namespace::System)),
        "vars" => Ok(Resolved::Namespace(Namespace::Vars)),
        "parameters" => Ok(Resolved::Namespace(Namespace::Parameters)),
        "funcs" => Ok(Resolved::Namespace(Namespace::Funcs)),
        "row" => Ok(Resolved::Value(env.row.cloned().unwrap_or_default())),
        other => Err(EvalError::UndefinedName(other.to_string())),
    }
}

fn attribute_of(
    target: Resolved,
    attribute: &str,
    env: &Environment<'_>,
) -> Result<Resolved, LookupFailure> {
    let found = match target {
        Resolved::Namespace(Namespace::System) => env.system.lookup(attribute).map(Resolved::Value),
        Resolved::Namespace(Namespace::Vars) => env.vars.lookup(attribute).map(Resolved::Value),
        Resolved::Namespace(Namespace::Parameters) => {
            env.parameters.lookup(attribute).map(Resolved::Value)
        }
        Resolved::Namespace(Namespace::Funcs) => env
            .functions
            .get(attribute)
            .map(|f| Resolved::Function(attribute.to_string(), f)),
        Resolved::Value(Value::Record(mut fields)) => {
            fields.shift_remove(attribute).map(Resolved::Value)
        }
        Resolved::Value(Value::Date(date)) => match attribute {
            "year" => Some(Resolved::Value(Value::Int(i64::from(date.year())))),
            "month" => Some(Resolved::Value(Value::Int(i64::from(date.month())))),
            "day" => Some(Resolved::Value(Value::Int(i64::from(date.day())))),
            "strftime" | "isoformat" => Some(Resolved::Method {
                receiver: Value::Date(date),
                name: attribute.to_string(),
            }),
            _ => None,
        },
        _ => None,
    };
    found.ok_or_else(|| LookupFailure::new(attribute))
}

fn index_into(target: &Value, index: &Value) -> Result<Value, EvalError> {
    match (target, index) {
        (Value::List(items) | Value::Tuple(items), Value::Int(i)) => {
            let len = items.len() as i64;
            let position = if *i < 0 { len + i } else { *i };
            usize::try_from(position)
                .ok()
                .and_then(|p| items.get(p))
                .cloned()
                .ok_or_else(|| EvalError::IndexError(format!("index {} out of range", i)))
        }
        (Value::Str(s), Value::Int(i)) => {
            let len = s.chars().count() as i64;
            let position = if *i < 0 { len + i } else { *i };
            usize::try_from(position)
                .ok()
                .and_then(|p| s.chars().nth(p))
                .map(|c| Value::Str(c.to_string()))
                .ok_or_else(|| EvalError::IndexError(format!("string index {} out of range", i)))
        }
        (Value::Record(fields), Value::Str(key)) => fields
            .get(key)
            .cloned()
            .ok_or_else(|| EvalError::IndexError(format!("key '{}' not found", key))),
        (Value::Record(fields), Value::Int(i)) => usize::try_from(*i)
            .ok()
            .and_then(|p| fields.get_index(p))
            .map(|(_, value)| value.clone())
            .ok_or_else(|| EvalError::IndexError(format!("index {} out of range", i))),
        _ => Err(EvalError::TypeError(format!(
            "'{}' object is not subscriptable by '{}'",
            target.type_name(),
            index.type_name()
        ))),
    }
}

fn call(callee: Resolved, args: Vec<Value>, env: &Environment<'_>) -> Result<Value, EvalError> {
    match callee {
        Resolved::Function(_, function) => function(args),
        Resolved::Method { receiver, name } => call_method(&receiver, &name, args),
        other => {
            let value = into_value(other, env)?;
            Err(EvalError::TypeError(format!(
                "'{}' object is not callable",
                value.type_name()
            )))
        }
    }
}

fn call_method(receiver: &Value, name: &str, args: Vec<Value>) -> Result<Value, EvalError> {
    let Value::Date(date) = receiver else {
        return Err(EvalError::UndefinedName(name.to_string()));
    };
    match (name, args.as_slice()) {
        ("isoformat", []) => Ok(Value::Str(date.format("%Y-%m-%d").to_string())),
        ("strftime", [Value::Str(pattern)]) => {
            let mut out = String::new();
            // An invalid pattern surfaces as a formatting error instead of a panic.
            write!(out, "{}", date.format(pattern)).map_err(|_| {
                EvalError::function("strftime", format!("invalid format '{}'", pattern))
            })?;
            Ok(Value::Str(out))
        }
        _ => Err(EvalError::function(
            name,
            format!("unexpected arguments ({} given)", args.len()),
        )),
    }
}
