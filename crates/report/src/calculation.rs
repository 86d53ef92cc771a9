//! Per-row aggregates bound to report variables.

use crate::error::ReportError;
use banded_expr::operators::binary;
use banded_expr::{BinaryOperator, Environment, EvalError, Value};
use banded_render_core::Renderer;
use banded_types::ConfigError;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculationKind {
    Sum,
    Avg,
    Min,
    Max,
}

impl FromStr for CalculationKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(CalculationKind::Sum),
            "avg" => Ok(CalculationKind::Avg),
            "min" => Ok(CalculationKind::Min),
            "max" => Ok(CalculationKind::Max),
            other => Err(ConfigError::InvalidCalculationKind(other.to_string())),
        }
    }
}

impl fmt::Display for CalculationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CalculationKind::Sum => "sum",
            CalculationKind::Avg => "avg",
            CalculationKind::Min => "min",
            CalculationKind::Max => "max",
        };
        f.write_str(name)
    }
}

/// When a calculation's running value starts over.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResetScope {
    /// Runs for the whole report.
    #[default]
    End,
    /// Starts over on every page.
    Page,
}

impl FromStr for ResetScope {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "end" => Ok(ResetScope::End),
            "page" => Ok(ResetScope::Page),
            other => Err(ConfigError::InvalidResetScope(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    kind: CalculationKind,
    variable: String,
    expression: String,
    reset: ResetScope,
    start_value: Option<Value>,
    partial: Option<Value>,
    count: usize,
}

impl Calculation {
    /// Binds an aggregate of `expression` to the variable named `variable`.
    /// The variable is looked up when the calculation runs, not here.
    pub fn new(
        kind: CalculationKind,
        variable: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            variable: variable.into(),
            expression: expression.into(),
            reset: ResetScope::End,
            start_value: None,
            partial: None,
            count: 0,
        }
    }

    /// Parses the kind and reset scope from their names (`"sum"`, `"page"`).
    pub fn parse(
        kind: &str,
        variable: impl Into<String>,
        expression: impl Into<String>,
        reset: &str,
    ) -> Result<Self, ConfigError> {
        Ok(Self::new(kind.parse()?, variable, expression).with_reset(reset.parse()?))
    }

    pub fn with_reset(mut self, reset: ResetScope) -> Self {
        self.reset = reset;
        self
    }

    /// The partial value a reset returns to.
    pub fn with_start_value(mut self, value: impl Into<Value>) -> Self {
        let value = value.into();
        self.partial = Some(value.clone());
        self.start_value = Some(value);
        self
    }

    pub fn kind(&self) -> CalculationKind {
        self.kind
    }

    pub fn variable(&self) -> &str {
        &self.variable
    }

    pub fn expression(&self) -> &str {
        &self.expression
    }

    pub fn reset_scope(&self) -> ResetScope {
        self.reset
    }

    pub fn partial(&self) -> Option<&Value> {
        self.partial.as_ref()
    }

    /// Rows processed since the last reset.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn reset(&mut self) {
        self.partial = self.start_value.clone();
        self.count = 0;
    }

    /// Processes one row and returns the value to publish on the bound
    /// variable.
    pub fn execute<R: Renderer + ?Sized>(
        &mut self,
        renderer: &R,
        env: &Environment<'_>,
    ) -> Result<Value, ReportError> {
        self.count += 1;
        if !env.has_variable(&self.variable) {
            return Err(ReportError::Reference {
                variable: self.variable.clone(),
                kind: self.kind,
            });
        }
        let value = renderer.safe_eval(&self.expression, env)?;
        self.accumulate(value)
    }

    /// Folds an evaluated row value into the running aggregate.
    fn accumulate(&mut self, value: Value) -> Result<Value, ReportError> {
        let Some(partial) = self.partial.take() else {
            self.partial = Some(value.clone());
            return match self.kind {
                CalculationKind::Avg => Ok(self.average(&value)?),
                _ => Ok(value),
            };
        };

        let next = match self.kind {
            CalculationKind::Sum | CalculationKind::Avg => {
                binary(BinaryOperator::Plus, &partial, &value)?
            }
            CalculationKind::Min => pick(partial, value, Ordering::Less)?,
            CalculationKind::Max => pick(partial, value, Ordering::Greater)?,
        };
        let published = match self.kind {
            CalculationKind::Avg => self.average(&next)?,
            _ => next.clone(),
        };
        self.partial = Some(next);
        Ok(published)
    }

    fn average(&self, total: &Value) -> Result<Value, EvalError> {
        let count = i64::try_from(self.count).map_err(|_| EvalError::Overflow("row count"))?;
        binary(BinaryOperator::Divide, total, &Value::Int(count))
    }
}

/// Keeps `partial` unless `value` compares as `wanted` against it.
fn pick(partial: Value, value: Value, wanted: Ordering) -> Result<Value, EvalError> {
    match value.compare(&partial) {
        Some(ordering) if ordering == wanted => Ok(value),
        Some(_) => Ok(partial),
        None => Err(EvalError::TypeError(format!(
            "cannot compare '{}' with '{}'",
            value.type_name(),
            partial.type_name()
        ))),
    }
}
