//! Defines the registry and built-in implementations for the `funcs` namespace.
//!
//! Only pure value functions are registered. Nothing here can reach the
//! filesystem, the process or any state outside its arguments.

use crate::ast::BinaryOperator;
use crate::error::EvalError;
use crate::operators;
use crate::value::{MAX_SEQUENCE_LEN, Number, Value};
use indexmap::IndexMap;
use rust_decimal::{Decimal, RoundingStrategy};
use std::cmp::Ordering;

/// The signature for a sandbox function implementation.
pub type SandboxFunction = fn(args: Vec<Value>) -> Result<Value, EvalError>;

/// Upper bound on the length of a list produced by `range()`.
pub const MAX_RANGE_LEN: usize = MAX_SEQUENCE_LEN;

/// A registry to hold all functions reachable through `funcs`.
#[derive(Clone)]
pub struct FunctionRegistry {
    functions: IndexMap<String, SandboxFunction>,
}

impl FunctionRegistry {
    /// Creates a new, empty function registry.
    pub fn new() -> Self {
        Self {
            functions: IndexMap::new(),
        }
    }

    /// Registers a new function, replacing any previous one with that name.
    pub fn register(&mut self, name: &str, func: SandboxFunction) {
        self.functions.insert(name.to_string(), func);
    }

    /// Finds a function by name (case-sensitive).
    pub fn get(&self, name: &str) -> Option<SandboxFunction> {
        self.functions.get(name).copied()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.functions.keys()).finish()
    }
}

impl Default for FunctionRegistry {
    /// Creates a new registry populated with the whitelisted built-ins.
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register("abs", abs);
        registry.register("bool", bool_);
        registry.register("chr", chr);
        registry.register("cmp", cmp);
        registry.register("divmod", divmod);
        registry.register("float", float);
        registry.register("hex", hex);
        registry.register("int", int);
        registry.register("len", len);
        registry.register("max", max);
        registry.register("min", min);
        registry.register("oct", oct);
        registry.register("ord", ord);
        registry.register("pow", pow);
        registry.register("range", range);
        registry.register("round", round);
        registry.register("str", str_);
        registry.register("sum", sum);
        registry.register("unichr", chr);
        registry.register("unicode", str_);
        registry
    }
}

// --- Argument helpers ---

fn arity(name: &str, args: &[Value], min: usize, max: usize) -> Result<(), EvalError> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("exactly {}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(EvalError::function(
            name,
            format!("takes {} arguments ({} given)", expected, args.len()),
        ));
    }
    Ok(())
}

fn integer_arg(name: &str, value: &Value) -> Result<i64, EvalError> {
    match value {
        Value::Int(i) => Ok(*i),
        Value::Bool(b) => Ok(i64::from(*b)),
        other => Err(EvalError::function(
            name,
            format!("an integer is required, got {}", other.type_name()),
        )),
    }
}

/// `f(iterable)` or `f(a, b, ...)`.
fn spread_args(name: &str, mut args: Vec<Value>) -> Result<Vec<Value>, EvalError> {
    if args.len() == 1 {
        return match args.pop() {
            Some(Value::List(items)) | Some(Value::Tuple(items)) => Ok(items),
            Some(Value::Str(s)) => Ok(s.chars().map(|c| Value::Str(c.to_string())).collect()),
            Some(other) => Err(EvalError::function(
                name,
                format!("'{}' object is not iterable", other.type_name()),
            )),
            None => Ok(vec![]),
        };
    }
    Ok(args)
}

fn extreme(name: &str, args: Vec<Value>, keep: Ordering) -> Result<Value, EvalError> {
    let items = spread_args(name, args)?;
    let mut iter = items.into_iter();
    let mut best = iter
        .next()
        .ok_or_else(|| EvalError::function(name, "arg is an empty sequence"))?;
    for item in iter {
        let ordering = item.compare(&best).ok_or_else(|| {
            EvalError::function(
                name,
                format!(
                    "cannot compare '{}' and '{}'",
                    item.type_name(),
                    best.type_name()
                ),
            )
        })?;
        if ordering == keep {
            best = item;
        }
    }
    Ok(best)
}

// --- Built-in Function Implementations ---

fn abs(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("abs", &args, 1, 1)?;
    match args[0].as_number() {
        Some(Number::Int(i)) => i
            .checked_abs()
            .map(Value::Int)
            .ok_or(EvalError::Overflow("abs")),
        Some(Number::Decimal(d)) => Ok(Value::Decimal(d.abs())),
        Some(Number::Float(f)) => Ok(Value::Float(f.abs())),
        None => Err(EvalError::function(
            "abs",
            format!("bad operand type: '{}'", args[0].type_name()),
        )),
    }
}

fn bool_(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("bool", &args, 0, 1)?;
    Ok(Value::Bool(args.first().is_some_and(Value::is_truthy)))
}

fn chr(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("chr", &args, 1, 1)?;
    let code = integer_arg("chr", &args[0])?;
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map(|c| Value::Str(c.to_string()))
        .ok_or_else(|| EvalError::function("chr", format!("arg {} not in range", code)))
}

fn cmp(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("cmp", &args, 2, 2)?;
    let ordering = args[0].compare(&args[1]).ok_or_else(|| {
        EvalError::function(
            "cmp",
            format!(
                "cannot compare '{}' and '{}'",
                args[0].type_name(),
                args[1].type_name()
            ),
        )
    })?;
    Ok(Value::Int(ordering as i64))
}

fn divmod(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("divmod", &args, 2, 2)?;
    let quotient = operators::binary(BinaryOperator::FloorDivide, &args[0], &args[1])?;
    let remainder = operators::binary(BinaryOperator::Modulo, &args[0], &args[1])?;
    Ok(Value::Tuple(vec![quotient, remainder]))
}

fn float(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("float", &args, 0, 1)?;
    match args.first() {
        None => Ok(Value::Float(0.0)),
        Some(Value::Str(s)) => s
            .trim()
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|_| EvalError::function("float", format!("could not convert string: '{}'", s))),
        Some(other) => other
            .as_number()
            .map(|n| Value::Float(n.to_f64()))
            .ok_or_else(|| {
                EvalError::function(
                    "float",
                    format!("argument must be a string or a number, not '{}'", other.type_name()),
                )
            }),
    }
}

fn hex(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("hex", &args, 1, 1)?;
    let i = integer_arg("hex", &args[0])?;
    let sign = if i < 0 { "-" } else { "" };
    Ok(Value::Str(format!("{}{:#x}", sign, i.unsigned_abs())))
}

fn oct(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("oct", &args, 1, 1)?;
    let i = integer_arg("oct", &args[0])?;
    let sign = if i < 0 { "-" } else { "" };
    Ok(Value::Str(format!("{}{:#o}", sign, i.unsigned_abs())))
}

fn int(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("int", &args, 0, 2)?;
    let base = match args.get(1) {
        Some(base) => {
            let base = integer_arg("int", base)?;
            u32::try_from(base)
                .ok()
                .filter(|b| (2..=36).contains(b))
                .ok_or_else(|| EvalError::function("int", "base must be >= 2 and <= 36"))?
        }
        None => 10,
    };
    match args.first() {
        None => Ok(Value::Int(0)),
        Some(Value::Str(s)) => i64::from_str_radix(s.trim(), base)
            .map(Value::Int)
            .map_err(|_| {
                EvalError::function(
                    "int",
                    format!("invalid literal with base {}: '{}'", base, s),
                )
            }),
        Some(_) if args.len() == 2 => Err(EvalError::function(
            "int",
            "can't convert non-string with explicit base",
        )),
        Some(other) => match other.as_number() {
            Some(Number::Int(i)) => Ok(Value::Int(i)),
            Some(Number::Decimal(d)) => {
                use rust_decimal::prelude::ToPrimitive;
                d.trunc()
                    .to_i64()
                    .map(Value::Int)
                    .ok_or(EvalError::Overflow("int"))
            }
            Some(Number::Float(f)) => {
                let t = f.trunc();
                if t.is_finite() && t.abs() < 9.2e18 {
                    Ok(Value::Int(t as i64))
                } else {
                    Err(EvalError::function("int", format!("cannot convert {} to integer", f)))
                }
            }
            None => Err(EvalError::function(
                "int",
                format!("argument must be a string or a number, not '{}'", other.type_name()),
            )),
        },
    }
}

fn len(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("len", &args, 1, 1)?;
    let n = match &args[0] {
        Value::Str(s) => s.chars().count(),
        Value::List(items) | Value::Tuple(items) => items.len(),
        Value::Record(fields) => fields.len(),
        other => {
            return Err(EvalError::function(
                "len",
                format!("object of type '{}' has no len()", other.type_name()),
            ));
        }
    };
    Ok(Value::Int(n as i64))
}

fn max(args: Vec<Value>) -> Result<Value, EvalError> {
    extreme("max", args, Ordering::Greater)
}

fn min(args: Vec<Value>) -> Result<Value, EvalError> {
    extreme("min", args, Ordering::Less)
}

fn ord(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("ord", &args, 1, 1)?;
    let mut chars = args[0].as_str().map(str::chars).into_iter().flatten();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Value::Int(i64::from(u32::from(c)))),
        _ => Err(EvalError::function(
            "ord",
            "expected a character (string of length 1)",
        )),
    }
}

fn pow(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("pow", &args, 2, 3)?;
    let Some(modulus) = args.get(2) else {
        return operators::power(&args[0], &args[1]);
    };
    let base = integer_arg("pow", &args[0])?;
    let exp = integer_arg("pow", &args[1])?;
    let modulus = integer_arg("pow", modulus)?;
    if modulus == 0 {
        return Err(EvalError::function("pow", "3rd argument cannot be 0"));
    }
    if exp < 0 {
        return Err(EvalError::function(
            "pow",
            "2nd argument cannot be negative when 3rd argument specified",
        ));
    }
    let m = i128::from(modulus);
    let mut result: i128 = 1;
    let mut b = i128::from(base).rem_euclid(m);
    let mut e = exp;
    while e > 0 {
        if e & 1 == 1 {
            result = (result * b).rem_euclid(m);
        }
        b = (b * b).rem_euclid(m);
        e >>= 1;
    }
    // Result takes the sign of the modulus.
    if result != 0 && modulus < 0 {
        result += m;
    }
    Ok(Value::Int(result as i64))
}

fn range(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("range", &args, 1, 3)?;
    let ints = args
        .iter()
        .map(|a| integer_arg("range", a))
        .collect::<Result<Vec<_>, _>>()?;
    let (start, stop, step) = match ints.as_slice() {
        [stop] => (0, *stop, 1),
        [start, stop] => (*start, *stop, 1),
        [start, stop, step] => (*start, *stop, *step),
        _ => return Err(EvalError::function("range", "expected 1 to 3 arguments")),
    };
    if step == 0 {
        return Err(EvalError::function("range", "step argument must not be zero"));
    }
    let span = if step > 0 {
        i128::from(stop) - i128::from(start)
    } else {
        i128::from(start) - i128::from(stop)
    };
    let step_abs = i128::from(step).abs();
    let count = if span <= 0 { 0 } else { (span + step_abs - 1) / step_abs };
    if count > MAX_RANGE_LEN as i128 {
        return Err(EvalError::function(
            "range",
            format!("result longer than {} elements", MAX_RANGE_LEN),
        ));
    }
    let items = (0..count)
        .map(|k| Value::Int((i128::from(start) + k * i128::from(step)) as i64))
        .collect();
    Ok(Value::List(items))
}

/// Rounds half to even, like Python 3.
fn round(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("round", &args, 1, 2)?;
    let ndigits = match args.get(1) {
        None | Some(Value::Null) => None,
        Some(n) => Some(integer_arg("round", n)?),
    };
    let number = args[0].as_number().ok_or_else(|| {
        EvalError::function(
            "round",
            format!("type {} doesn't define rounding", args[0].type_name()),
        )
    })?;

    match (number, ndigits) {
        (Number::Int(i), None) => Ok(Value::Int(i)),
        (Number::Int(i), Some(n)) if n >= 0 => Ok(Value::Int(i)),
        (Number::Int(i), Some(n)) => {
            let factor = 10_i64
                .checked_pow(u32::try_from(-n).map_err(|_| EvalError::Overflow("round"))?)
                .ok_or(EvalError::Overflow("round"))?;
            let rounded = (i as f64 / factor as f64).round_ties_even() as i64;
            rounded
                .checked_mul(factor)
                .map(Value::Int)
                .ok_or(EvalError::Overflow("round"))
        }
        (Number::Float(f), None) => {
            let r = f.round_ties_even();
            if r.is_finite() && r.abs() < 9.2e18 {
                Ok(Value::Int(r as i64))
            } else {
                Err(EvalError::function("round", format!("cannot convert {} to integer", f)))
            }
        }
        (Number::Float(f), Some(n)) => {
            let factor = 10_f64.powi(n.clamp(-308, 308) as i32);
            Ok(Value::Float((f * factor).round_ties_even() / factor))
        }
        (Number::Decimal(d), None) => {
            use rust_decimal::prelude::ToPrimitive;
            d.round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven)
                .to_i64()
                .map(Value::Int)
                .ok_or(EvalError::Overflow("round"))
        }
        (Number::Decimal(d), Some(n)) if n >= 0 => Ok(Value::Decimal(
            d.round_dp_with_strategy(n.min(28) as u32, RoundingStrategy::MidpointNearestEven),
        )),
        (Number::Decimal(d), Some(n)) => {
            let factor = Decimal::from(
                10_i64
                    .checked_pow(u32::try_from(-n).map_err(|_| EvalError::Overflow("round"))?)
                    .ok_or(EvalError::Overflow("round"))?,
            );
            let scaled = (d / factor)
                .round_dp_with_strategy(0, RoundingStrategy::MidpointNearestEven);
            scaled
                .checked_mul(factor)
                .map(Value::Decimal)
                .ok_or(EvalError::Overflow("round"))
        }
    }
}

fn str_(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("str", &args, 0, 1)?;
    Ok(Value::Str(
        args.first().map(ToString::to_string).unwrap_or_default(),
    ))
}

fn sum(args: Vec<Value>) -> Result<Value, EvalError> {
    arity("sum", &args, 1, 2)?;
    let mut args = args.into_iter();
    let items = match args.next() {
        Some(Value::List(items)) | Some(Value::Tuple(items)) => items,
        Some(other) => {
            return Err(EvalError::function(
                "sum",
                format!("'{}' object is not iterable", other.type_name()),
            ));
        }
        None => vec![],
    };
    let start = args.next().unwrap_or(Value::Int(0));
    if matches!(start, Value::Str(_)) {
        return Err(EvalError::function("sum", "can't sum strings"));
    }
    items
        .iter()
        .try_fold(start, |acc, item| operators::add(&acc, item))
}
