use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Expression parse error in '{expression}': {message}")]
    Parse { expression: String, message: String },

    #[error("Invalid variable/function name: {0}")]
    UndefinedName(String),

    #[error("Type error: {0}")]
    TypeError(String),

    #[error("Function '{function}' error: {message}")]
    FunctionError { function: String, message: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow in {0}")]
    Overflow(&'static str),

    #[error("Index error: {0}")]
    IndexError(String),

    #[error("Format error: {0}")]
    FormatError(String),

    #[error("Result too large: {0}")]
    TooLarge(String),
}

impl EvalError {
    pub(crate) fn function(function: &str, message: impl Into<String>) -> Self {
        EvalError::FunctionError {
            function: function.to_string(),
            message: message.into(),
        }
    }
}

/// The failure of a name lookup inside one of the sandbox namespaces.
///
/// The evaluator never inspects which names exist up front: it attempts the
/// lookup and turns the failure into an [`EvalError::UndefinedName`] carrying
/// the attribute that could not be resolved.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct LookupFailure {
    pub attribute: String,
}

impl LookupFailure {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            attribute: attribute.into(),
        }
    }
}

impl From<LookupFailure> for EvalError {
    fn from(failure: LookupFailure) -> Self {
        EvalError::UndefinedName(failure.attribute)
    }
}
