//! Report variables and parameters.

use banded_expr::{Scope, Value};
use banded_types::ConfigError;
use chrono::NaiveDate;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarType {
    Integer,
    String,
    Decimal,
    Float,
    Date,
}

impl VarType {
    pub fn parse(name: &str, type_name: &str) -> Result<Self, ConfigError> {
        match type_name {
            "integer" => Ok(VarType::Integer),
            "string" => Ok(VarType::String),
            "decimal" => Ok(VarType::Decimal),
            "float" => Ok(VarType::Float),
            "date" => Ok(VarType::Date),
            other => Err(ConfigError::InvalidVariableType {
                name: name.to_string(),
                type_name: other.to_string(),
            }),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VarType::Integer => "integer",
            VarType::String => "string",
            VarType::Decimal => "decimal",
            VarType::Float => "float",
            VarType::Date => "date",
        }
    }

    /// Converts `value` to this type. Anything that does not convert
    /// becomes `Null`.
    pub fn coerce(self, value: Value) -> Value {
        let coerced = match (self, value) {
            (_, Value::Null) => None,
            (VarType::Integer, Value::Int(i)) => Some(Value::Int(i)),
            (VarType::Integer, Value::Bool(b)) => Some(Value::Int(i64::from(b))),
            (VarType::Integer, Value::Float(f)) => float_to_int(f),
            (VarType::Integer, Value::Decimal(d)) => d.trunc().to_i64().map(Value::Int),
            (VarType::Integer, Value::Str(s)) => s.trim().parse::<i64>().ok().map(Value::Int),

            (VarType::String, Value::Str(s)) => Some(Value::Str(s)),
            (VarType::String, other) => Some(Value::Str(other.to_string())),

            (VarType::Decimal, Value::Decimal(d)) => Some(Value::Decimal(d)),
            (VarType::Decimal, Value::Int(i)) => Some(Value::Decimal(Decimal::from(i))),
            (VarType::Decimal, Value::Bool(b)) => Some(Value::Decimal(Decimal::from(i64::from(b)))),
            (VarType::Decimal, Value::Float(f)) => Value::decimal_from_f64(f),
            (VarType::Decimal, Value::Str(s)) => Decimal::from_str(s.trim()).ok().map(Value::Decimal),

            (VarType::Float, Value::Float(f)) => Some(Value::Float(f)),
            (VarType::Float, Value::Int(i)) => Some(Value::Float(i as f64)),
            (VarType::Float, Value::Bool(b)) => Some(Value::Float(if b { 1.0 } else { 0.0 })),
            (VarType::Float, Value::Decimal(d)) => d.to_f64().map(Value::Float),
            (VarType::Float, Value::Str(s)) => s.trim().parse::<f64>().ok().map(Value::Float),

            (VarType::Date, Value::Date(d)) => Some(Value::Date(d)),
            (VarType::Date, Value::Str(s)) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                .ok()
                .map(Value::Date),

            _ => None,
        };
        coerced.unwrap_or(Value::Null)
    }
}

fn float_to_int(f: f64) -> Option<Value> {
    let truncated = f.trunc();
    if truncated.is_finite() && truncated >= i64::MIN as f64 && truncated <= i64::MAX as f64 {
        Some(Value::Int(truncated as i64))
    } else {
        None
    }
}

impl FromStr for VarType {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VarType::parse("", s)
    }
}

impl fmt::Display for VarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A named, typed report variable.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: String,
    var_type: VarType,
    value: Value,
}

impl Variable {
    /// Creates a variable, coercing `initial` to `var_type`.
    pub fn new(name: impl Into<String>, var_type: VarType, initial: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            var_type,
            value: var_type.coerce(initial.into()),
        }
    }

    /// Creates a variable from a type name such as `"integer"`.
    pub fn with_type_name(
        name: impl Into<String>,
        type_name: &str,
        initial: impl Into<Value>,
    ) -> Result<Self, ConfigError> {
        let name = name.into();
        let var_type = VarType::parse(&name, type_name)?;
        Ok(Self::new(name, var_type, initial))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn var_type(&self) -> VarType {
        self.var_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replaces the value as-is, e.g. with a running aggregate.
    pub fn set_value(&mut self, value: Value) {
        self.value = value;
    }

    /// Replaces the value, coercing it to the declared type.
    pub fn assign(&mut self, value: impl Into<Value>) {
        self.value = self.var_type.coerce(value.into());
    }
}

/// A variable whose initial value is supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter(Variable);

impl Parameter {
    pub fn new(name: impl Into<String>, var_type: VarType, value: impl Into<Value>) -> Self {
        Parameter(Variable::new(name, var_type, value))
    }

    pub fn with_type_name(
        name: impl Into<String>,
        type_name: &str,
        value: impl Into<Value>,
    ) -> Result<Self, ConfigError> {
        Variable::with_type_name(name, type_name, value).map(Parameter)
    }

    pub fn into_variable(self) -> Variable {
        self.0
    }
}

impl Deref for Parameter {
    type Target = Variable;

    fn deref(&self) -> &Variable {
        &self.0
    }
}

/// Variables by name, in registration order. This is the `vars` (or
/// `parameters`) namespace of the expression environment.
#[derive(Debug, Clone, Default)]
pub struct VariableTable(IndexMap<String, Variable>);

impl VariableTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a variable, replacing any previous one with the same name.
    pub fn insert(&mut self, variable: Variable) -> Option<Variable> {
        self.0.insert(variable.name.clone(), variable)
    }

    pub fn get(&self, name: &str) -> Option<&Variable> {
        self.0.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.0.get_mut(name)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.0.get(name).map(Variable::value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.0.values()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Scope for VariableTable {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.value(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.0.keys().cloned().collect()
    }
}
