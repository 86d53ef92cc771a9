//! Arithmetic and comparison semantics.
//!
//! Numbers promote int -> decimal -> float. Integer arithmetic is checked;
//! floor division and modulo round toward negative infinity.

use crate::ast::{BinaryOperator, UnaryOperator};
use crate::error::EvalError;
use crate::format::format_string;
use crate::value::{MAX_SEQUENCE_LEN, Number, NumberPair, Value};
use rust_decimal::Decimal;
use std::cmp::Ordering;

fn unsupported(op: BinaryOperator, left: &Value, right: &Value) -> EvalError {
    EvalError::TypeError(format!(
        "unsupported operand type(s) for {}: '{}' and '{}'",
        op.symbol(),
        left.type_name(),
        right.type_name()
    ))
}

/// Applies a non short-circuiting binary operator.
pub fn binary(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    match op {
        BinaryOperator::Plus => add(left, right),
        BinaryOperator::Minus => numeric(op, left, right),
        BinaryOperator::Multiply => multiply(left, right),
        BinaryOperator::Divide => divide(left, right),
        BinaryOperator::FloorDivide => numeric(op, left, right),
        BinaryOperator::Modulo => match left {
            Value::Str(template) => format_string(template, right).map(Value::Str),
            _ => numeric(op, left, right),
        },
        BinaryOperator::Power => power(left, right),
        BinaryOperator::Equals => Ok(Value::Bool(left.loose_eq(right))),
        BinaryOperator::NotEquals => Ok(Value::Bool(!left.loose_eq(right))),
        BinaryOperator::LessThan
        | BinaryOperator::LessThanOrEqual
        | BinaryOperator::GreaterThan
        | BinaryOperator::GreaterThanOrEqual => compare(op, left, right),
        BinaryOperator::And | BinaryOperator::Or => Err(EvalError::TypeError(format!(
            "'{}' must be evaluated lazily",
            op.symbol()
        ))),
    }
}

pub fn unary(op: UnaryOperator, value: &Value) -> Result<Value, EvalError> {
    match op {
        UnaryOperator::Not => Ok(Value::Bool(!value.is_truthy())),
        UnaryOperator::Plus => match value.as_number() {
            Some(n) => Ok(n.into_value()),
            None => Err(bad_unary("+", value)),
        },
        UnaryOperator::Minus => match value.as_number() {
            Some(Number::Int(i)) => i
                .checked_neg()
                .map(Value::Int)
                .ok_or(EvalError::Overflow("negation")),
            Some(Number::Decimal(d)) => Ok(Value::Decimal(-d)),
            Some(Number::Float(f)) => Ok(Value::Float(-f)),
            None => Err(bad_unary("-", value)),
        },
    }
}

fn bad_unary(symbol: &str, value: &Value) -> EvalError {
    EvalError::TypeError(format!(
        "bad operand type for unary {}: '{}'",
        symbol,
        value.type_name()
    ))
}

fn compare(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let ordering = left.compare(right).ok_or_else(|| {
        EvalError::TypeError(format!(
            "'{}' not supported between instances of '{}' and '{}'",
            op.symbol(),
            left.type_name(),
            right.type_name()
        ))
    })?;
    let result = match op {
        BinaryOperator::LessThan => ordering == Ordering::Less,
        BinaryOperator::LessThanOrEqual => ordering != Ordering::Greater,
        BinaryOperator::GreaterThan => ordering == Ordering::Greater,
        _ => ordering != Ordering::Less,
    };
    Ok(Value::Bool(result))
}

pub fn add(left: &Value, right: &Value) -> Result<Value, EvalError> {
    match (left, right) {
        (Value::Str(a), Value::Str(b)) => Ok(Value::Str(format!("{}{}", a, b))),
        (Value::List(a), Value::List(b)) => Ok(Value::List([a.as_slice(), b.as_slice()].concat())),
        (Value::Tuple(a), Value::Tuple(b)) => Ok(Value::Tuple([a.as_slice(), b.as_slice()].concat())),
        _ => numeric(BinaryOperator::Plus, left, right),
    }
}

fn multiply(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let repeat_count = |n: &Value| match n {
        Value::Int(i) => Some(usize::try_from(*i).unwrap_or(0)),
        Value::Bool(b) => Some(usize::from(*b)),
        _ => None,
    };
    match (left, right) {
        (Value::Str(s), n) | (n, Value::Str(s)) if repeat_count(n).is_some() => {
            let times = repeat_count(n).unwrap_or(0);
            check_repeat(s.len(), times)?;
            Ok(Value::Str(s.repeat(times)))
        }
        (Value::List(items), n) | (n, Value::List(items)) if repeat_count(n).is_some() => {
            let times = repeat_count(n).unwrap_or(0);
            check_repeat(items.len(), times)?;
            Ok(Value::List(
                std::iter::repeat_n(items.iter().cloned(), times)
                    .flatten()
                    .collect(),
            ))
        }
        _ => numeric(BinaryOperator::Multiply, left, right),
    }
}

fn check_repeat(len: usize, times: usize) -> Result<(), EvalError> {
    match len.checked_mul(times) {
        Some(total) if total <= MAX_SEQUENCE_LEN => Ok(()),
        _ => Err(EvalError::TooLarge(format!(
            "repetition longer than {} elements",
            MAX_SEQUENCE_LEN
        ))),
    }
}

/// True division: integers divide into a float.
fn divide(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
        return Err(unsupported(BinaryOperator::Divide, left, right));
    };
    match Number::pair(a, b) {
        NumberPair::Int(_, 0) => Err(EvalError::DivisionByZero),
        NumberPair::Int(x, y) => Ok(Value::Float(x as f64 / y as f64)),
        NumberPair::Decimal(x, y) => x
            .checked_div(y)
            .map(Value::Decimal)
            .ok_or(EvalError::DivisionByZero),
        NumberPair::Float(_, y) if y == 0.0 => Err(EvalError::DivisionByZero),
        NumberPair::Float(x, y) => Ok(Value::Float(x / y)),
    }
}

fn numeric(op: BinaryOperator, left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
        return Err(unsupported(op, left, right));
    };
    match Number::pair(a, b) {
        NumberPair::Int(x, y) => int_op(op, x, y).map(Value::Int),
        NumberPair::Decimal(x, y) => decimal_op(op, x, y).map(Value::Decimal),
        NumberPair::Float(x, y) => float_op(op, x, y).map(Value::Float),
    }
}

fn int_op(op: BinaryOperator, x: i64, y: i64) -> Result<i64, EvalError> {
    match op {
        BinaryOperator::Plus => x.checked_add(y).ok_or(EvalError::Overflow("addition")),
        BinaryOperator::Minus => x.checked_sub(y).ok_or(EvalError::Overflow("subtraction")),
        BinaryOperator::Multiply => x
            .checked_mul(y)
            .ok_or(EvalError::Overflow("multiplication")),
        BinaryOperator::FloorDivide => {
            if y == 0 {
                return Err(EvalError::DivisionByZero);
            }
            let q = x.checked_div(y).ok_or(EvalError::Overflow("division"))?;
            if x % y != 0 && ((x < 0) != (y < 0)) {
                Ok(q - 1)
            } else {
                Ok(q)
            }
        }
        BinaryOperator::Modulo => {
            if y == 0 {
                return Err(EvalError::DivisionByZero);
            }
            let r = x.checked_rem(y).ok_or(EvalError::Overflow("modulo"))?;
            if r != 0 && ((r < 0) != (y < 0)) {
                Ok(r + y)
            } else {
                Ok(r)
            }
        }
        _ => Err(EvalError::TypeError(format!(
            "operator '{}' is not arithmetic",
            op.symbol()
        ))),
    }
}

fn decimal_op(op: BinaryOperator, x: Decimal, y: Decimal) -> Result<Decimal, EvalError> {
    match op {
        BinaryOperator::Plus => x.checked_add(y).ok_or(EvalError::Overflow("addition")),
        BinaryOperator::Minus => x.checked_sub(y).ok_or(EvalError::Overflow("subtraction")),
        BinaryOperator::Multiply => x
            .checked_mul(y)
            .ok_or(EvalError::Overflow("multiplication")),
        BinaryOperator::FloorDivide => {
            if y.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            x.checked_div(y)
                .map(|q| q.floor())
                .ok_or(EvalError::Overflow("division"))
        }
        BinaryOperator::Modulo => {
            if y.is_zero() {
                return Err(EvalError::DivisionByZero);
            }
            let r = x.checked_rem(y).ok_or(EvalError::Overflow("modulo"))?;
            if !r.is_zero() && (r.is_sign_negative() != y.is_sign_negative()) {
                Ok(r + y)
            } else {
                Ok(r)
            }
        }
        _ => Err(EvalError::TypeError(format!(
            "operator '{}' is not arithmetic",
            op.symbol()
        ))),
    }
}

fn float_op(op: BinaryOperator, x: f64, y: f64) -> Result<f64, EvalError> {
    match op {
        BinaryOperator::Plus => Ok(x + y),
        BinaryOperator::Minus => Ok(x - y),
        BinaryOperator::Multiply => Ok(x * y),
        BinaryOperator::FloorDivide if y == 0.0 => Err(EvalError::DivisionByZero),
        BinaryOperator::FloorDivide => Ok((x / y).floor()),
        BinaryOperator::Modulo if y == 0.0 => Err(EvalError::DivisionByZero),
        BinaryOperator::Modulo => Ok(x - y * (x / y).floor()),
        _ => Err(EvalError::TypeError(format!(
            "operator '{}' is not arithmetic",
            op.symbol()
        ))),
    }
}

/// Exponentiation. Negative integer exponents and decimals fall back to float.
pub fn power(left: &Value, right: &Value) -> Result<Value, EvalError> {
    let (Some(a), Some(b)) = (left.as_number(), right.as_number()) else {
        return Err(unsupported(BinaryOperator::Power, left, right));
    };
    match (a, b) {
        (Number::Int(x), Number::Int(y)) if y >= 0 => {
            let exp = u32::try_from(y).map_err(|_| EvalError::Overflow("power"))?;
            x.checked_pow(exp)
                .map(Value::Int)
                .ok_or(EvalError::Overflow("power"))
        }
        (a, b) => {
            let (x, y) = (a.to_f64(), b.to_f64());
            if x == 0.0 && y < 0.0 {
                return Err(EvalError::DivisionByZero);
            }
            Ok(Value::Float(x.powf(y)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_semantics_match_python() {
        let div = |a, b| binary(BinaryOperator::FloorDivide, &Value::Int(a), &Value::Int(b));
        let rem = |a, b| binary(BinaryOperator::Modulo, &Value::Int(a), &Value::Int(b));
        assert_eq!(div(7, 2), Ok(Value::Int(3)));
        assert_eq!(div(-7, 2), Ok(Value::Int(-4)));
        assert_eq!(rem(-7, 2), Ok(Value::Int(1)));
        assert_eq!(rem(7, -2), Ok(Value::Int(-1)));
        assert_eq!(div(1, 0), Err(EvalError::DivisionByZero));
    }

    #[test]
    fn test_true_division_and_promotion() {
        assert_eq!(
            binary(BinaryOperator::Divide, &Value::Int(7), &Value::Int(2)),
            Ok(Value::Float(3.5))
        );
        assert_eq!(
            binary(
                BinaryOperator::Plus,
                &Value::Decimal(Decimal::new(150, 2)),
                &Value::Int(1)
            ),
            Ok(Value::Decimal(Decimal::new(250, 2)))
        );
        assert_eq!(
            binary(BinaryOperator::Plus, &Value::Int(1), &Value::Float(0.5)),
            Ok(Value::Float(1.5))
        );
    }

    #[test]
    fn test_sequences() {
        assert_eq!(
            binary(BinaryOperator::Plus, &Value::from("ab"), &Value::from("cd")),
            Ok(Value::from("abcd"))
        );
        assert_eq!(
            binary(BinaryOperator::Multiply, &Value::Int(3), &Value::from("-")),
            Ok(Value::from("---"))
        );
        assert_eq!(
            binary(
                BinaryOperator::Multiply,
                &Value::List(vec![Value::Int(1), Value::Int(2)]),
                &Value::Int(2)
            ),
            Ok(Value::List(vec![
                Value::Int(1),
                Value::Int(2),
                Value::Int(1),
                Value::Int(2)
            ]))
        );
        assert_eq!(
            binary(BinaryOperator::Multiply, &Value::from("ab"), &Value::Int(-3)),
            Ok(Value::from(""))
        );
        assert!(matches!(
            binary(BinaryOperator::Plus, &Value::from("a"), &Value::Int(1)),
            Err(EvalError::TypeError(_))
        ));
    }

    #[test]
    fn test_repetition_is_capped() {
        assert!(matches!(
            binary(
                BinaryOperator::Multiply,
                &Value::from("x"),
                &Value::Int(100_000_000_000_000)
            ),
            Err(EvalError::TooLarge(_))
        ));
        assert!(matches!(
            binary(
                BinaryOperator::Multiply,
                &Value::Int(i64::MAX),
                &Value::List(vec![Value::Null, Value::Null])
            ),
            Err(EvalError::TooLarge(_))
        ));
        let at_limit = binary(
            BinaryOperator::Multiply,
            &Value::from("x"),
            &Value::Int(MAX_SEQUENCE_LEN as i64),
        );
        assert!(matches!(at_limit, Ok(Value::Str(s)) if s.len() == MAX_SEQUENCE_LEN));
    }

    #[test]
    fn test_overflow_is_an_error() {
        assert_eq!(
            binary(BinaryOperator::Plus, &Value::Int(i64::MAX), &Value::Int(1)),
            Err(EvalError::Overflow("addition"))
        );
        assert_eq!(
            power(&Value::Int(2), &Value::Int(-1)),
            Ok(Value::Float(0.5))
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(
            binary(BinaryOperator::LessThan, &Value::Int(1), &Value::Float(1.5)),
            Ok(Value::Bool(true))
        );
        assert!(binary(BinaryOperator::LessThan, &Value::Int(1), &Value::from("x")).is_err());
        assert_eq!(
            binary(BinaryOperator::Equals, &Value::from("x"), &Value::Int(1)),
            Ok(Value::Bool(false))
        );
    }
}
