//! The restricted binding set an expression is evaluated against.

use crate::functions::FunctionRegistry;
use crate::value::Value;
use chrono::NaiveDate;
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::hash::BuildHasher;

static BUILTIN_FUNCTIONS: Lazy<FunctionRegistry> = Lazy::new(FunctionRegistry::default);

/// The whitelisted functions shared by every environment that does not
/// bring its own registry.
pub fn builtin_functions() -> &'static FunctionRegistry {
    &BUILTIN_FUNCTIONS
}

/// A read-only name -> value table (the `vars` and `parameters` namespaces).
pub trait Scope {
    fn lookup(&self, name: &str) -> Option<Value>;

    /// All names, in a stable order.
    fn names(&self) -> Vec<String>;

    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

impl<S: BuildHasher> Scope for HashMap<String, Value, S> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys().cloned().collect();
        names.sort();
        names
    }
}

impl Scope for IndexMap<String, Value> {
    fn lookup(&self, name: &str) -> Option<Value> {
        self.get(name).cloned()
    }

    fn names(&self) -> Vec<String> {
        self.keys().cloned().collect()
    }
}

struct EmptyScope;

impl Scope for EmptyScope {
    fn lookup(&self, _name: &str) -> Option<Value> {
        None
    }

    fn names(&self) -> Vec<String> {
        Vec::new()
    }
}

static EMPTY_SCOPE: EmptyScope = EmptyScope;

/// Values of the `system` namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SystemInfo {
    /// The current page number (0 before the first page is opened).
    pub page: u32,
    pub date: NaiveDate,
}

impl SystemInfo {
    pub fn new(page: u32, date: NaiveDate) -> Self {
        Self { page, date }
    }

    /// Page 0, dated with today's local date.
    pub fn today() -> Self {
        Self {
            page: 0,
            date: chrono::Local::now().date_naive(),
        }
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<Value> {
        match name {
            "page" => Some(Value::Int(i64::from(self.page))),
            "date" => Some(Value::Date(self.date)),
            _ => None,
        }
    }

    pub(crate) fn to_record(self) -> Value {
        let mut fields = IndexMap::new();
        fields.insert("page".to_string(), Value::Int(i64::from(self.page)));
        fields.insert("date".to_string(), Value::Date(self.date));
        Value::Record(fields)
    }
}

/// Everything an expression can see: `system`, `vars`, `parameters`,
/// `funcs` and `row`. There is no other root name.
#[derive(Clone, Copy)]
pub struct Environment<'a> {
    pub system: SystemInfo,
    pub vars: &'a dyn Scope,
    pub parameters: &'a dyn Scope,
    /// The current data-source record; `row` is `None` when absent.
    pub row: Option<&'a Value>,
    pub functions: &'a FunctionRegistry,
}

impl<'a> Environment<'a> {
    pub fn new(system: SystemInfo, vars: &'a dyn Scope, parameters: &'a dyn Scope) -> Self {
        Self {
            system,
            vars,
            parameters,
            row: None,
            functions: builtin_functions(),
        }
    }

    /// An environment with no variables, parameters or row.
    pub fn empty() -> Environment<'static> {
        Environment {
            system: SystemInfo::today(),
            vars: &EMPTY_SCOPE,
            parameters: &EMPTY_SCOPE,
            row: None,
            functions: builtin_functions(),
        }
    }

    pub fn with_row(mut self, row: Option<&'a Value>) -> Self {
        self.row = row;
        self
    }

    pub fn with_functions(mut self, functions: &'a FunctionRegistry) -> Self {
        self.functions = functions;
        self
    }

    pub fn has_variable(&self, name: &str) -> bool {
        self.vars.contains(name)
    }
}

impl std::fmt::Debug for Environment<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Environment")
            .field("system", &self.system)
            .field("vars", &self.vars.names())
            .field("parameters", &self.parameters.names())
            .field("row", &self.row)
            .finish()
    }
}
