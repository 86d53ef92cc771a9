//! printf-style string interpolation (`"Page %d of %s" % (a, b)`).

use crate::error::EvalError;
use crate::value::{MAX_SEQUENCE_LEN, Number, Value};
use std::iter::Peekable;
use std::str::Chars;

#[derive(Debug, Default)]
struct Spec {
    key: Option<String>,
    left_align: bool,
    zero_pad: bool,
    plus_sign: bool,
    space_sign: bool,
    alternate: bool,
    width: Option<usize>,
    precision: Option<usize>,
    conversion: char,
}

enum Arguments<'a> {
    Positional(std::slice::Iter<'a, Value>),
    Mapping(&'a Value),
}

/// Formats `template` with `args`. A tuple supplies positional arguments, a
/// record supplies `%(key)s` lookups and anything else is a single argument.
pub fn format_string(template: &str, args: &Value) -> Result<String, EvalError> {
    let single;
    let mut arguments = match args {
        Value::Tuple(items) => Arguments::Positional(items.iter()),
        Value::Record(_) => Arguments::Mapping(args),
        other => {
            single = [other.clone()];
            Arguments::Positional(single.iter())
        }
    };

    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        let spec = parse_spec(&mut chars)?;
        if spec.conversion == '%' {
            out.push('%');
            continue;
        }
        let value = match (&mut arguments, &spec.key) {
            (Arguments::Mapping(Value::Record(fields)), Some(key)) => fields
                .get(key)
                .ok_or_else(|| EvalError::FormatError(format!("missing key '{}'", key)))?,
            (Arguments::Mapping(_), None) => {
                return Err(EvalError::FormatError(
                    "format requires a mapping key".to_string(),
                ));
            }
            (Arguments::Positional(_), Some(_)) => {
                return Err(EvalError::FormatError("format requires a mapping".to_string()));
            }
            (Arguments::Positional(iter), None) => iter.next().ok_or_else(|| {
                EvalError::FormatError("not enough arguments for format string".to_string())
            })?,
            (Arguments::Mapping(_), Some(_)) => {
                return Err(EvalError::FormatError("format requires a mapping".to_string()));
            }
        };
        out.push_str(&convert(&spec, value)?);
    }

    if let Arguments::Positional(mut rest) = arguments {
        if rest.next().is_some() {
            return Err(EvalError::FormatError(
                "not all arguments converted during string formatting".to_string(),
            ));
        }
    }
    Ok(out)
}

/// Reads a width or precision. Values above [`MAX_SEQUENCE_LEN`] are
/// rejected before anything is padded.
fn read_number(chars: &mut Peekable<Chars<'_>>) -> Result<Option<usize>, EvalError> {
    let mut digits = String::new();
    while let Some(c) = chars.peek().copied().filter(char::is_ascii_digit) {
        digits.push(c);
        chars.next();
    }
    if digits.is_empty() {
        return Ok(None);
    }
    match digits.parse::<usize>() {
        Ok(n) if n <= MAX_SEQUENCE_LEN => Ok(Some(n)),
        _ => Err(EvalError::TooLarge(format!(
            "format width or precision {} exceeds {}",
            digits, MAX_SEQUENCE_LEN
        ))),
    }
}

fn parse_spec(chars: &mut Peekable<Chars<'_>>) -> Result<Spec, EvalError> {
    let mut spec = Spec::default();

    if chars.peek() == Some(&'(') {
        chars.next();
        let mut key = String::new();
        loop {
            match chars.next() {
                Some(')') => break,
                Some(c) => key.push(c),
                None => return Err(EvalError::FormatError("incomplete format key".to_string())),
            }
        }
        spec.key = Some(key);
    }

    while let Some(&c) = chars.peek() {
        match c {
            '-' => spec.left_align = true,
            '0' => spec.zero_pad = true,
            '+' => spec.plus_sign = true,
            ' ' => spec.space_sign = true,
            '#' => spec.alternate = true,
            _ => break,
        }
        chars.next();
    }

    spec.width = read_number(chars)?;
    if chars.peek() == Some(&'.') {
        chars.next();
        spec.precision = Some(read_number(chars)?.unwrap_or(0));
    }

    spec.conversion = chars
        .next()
        .ok_or_else(|| EvalError::FormatError("incomplete format".to_string()))?;
    Ok(spec)
}

fn number_required(spec: &Spec, value: &Value) -> EvalError {
    EvalError::FormatError(format!(
        "%{} format: a number is required, not {}",
        spec.conversion,
        value.type_name()
    ))
}

fn as_integer(spec: &Spec, value: &Value) -> Result<i64, EvalError> {
    match value.as_number() {
        Some(Number::Int(i)) => Ok(i),
        Some(n) => {
            let f = n.to_f64().trunc();
            if f.is_finite() && f.abs() < 9.2e18 {
                Ok(f as i64)
            } else {
                Err(EvalError::Overflow("integer format"))
            }
        }
        None => Err(number_required(spec, value)),
    }
}

fn sign_prefix(spec: &Spec, negative: bool) -> &'static str {
    if negative {
        "-"
    } else if spec.plus_sign {
        "+"
    } else if spec.space_sign {
        " "
    } else {
        ""
    }
}

/// Python-style exponent: at least two digits and an explicit sign.
fn scientific(value: f64, precision: usize, upper: bool) -> String {
    let formatted = format!("{:.*e}", precision, value);
    let (mantissa, exp) = formatted.split_once('e').unwrap_or((&formatted, "0"));
    let (exp_sign, exp_digits) = match exp.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exp),
    };
    let e = if upper { 'E' } else { 'e' };
    format!("{}{}{}{:0>2}", mantissa, e, exp_sign, exp_digits)
}

fn convert(spec: &Spec, value: &Value) -> Result<String, EvalError> {
    // (sign, digits) for numeric conversions, whole text otherwise.
    let (sign, body, numeric) = match spec.conversion {
        's' => (
            "",
            truncate(value.to_string(), spec.precision),
            false,
        ),
        'r' => ("", truncate(value.repr(), spec.precision), false),
        'd' | 'i' | 'u' => {
            let i = as_integer(spec, value)?;
            (sign_prefix(spec, i < 0), i.unsigned_abs().to_string(), true)
        }
        'f' | 'F' | 'e' | 'E' => {
            let f = value
                .as_number()
                .ok_or_else(|| number_required(spec, value))?
                .to_f64();
            let precision = spec.precision.unwrap_or(6);
            let digits = match spec.conversion {
                'e' => scientific(f.abs(), precision, false),
                'E' => scientific(f.abs(), precision, true),
                _ => format!("{:.*}", precision, f.abs()),
            };
            (sign_prefix(spec, f.is_sign_negative() && f != 0.0), digits, true)
        }
        'x' | 'X' | 'o' => {
            let i = as_integer(spec, value)?;
            let magnitude = i.unsigned_abs();
            let digits = match (spec.conversion, spec.alternate) {
                ('x', false) => format!("{:x}", magnitude),
                ('x', true) => format!("{:#x}", magnitude),
                ('X', false) => format!("{:X}", magnitude),
                ('X', true) => format!("0X{:X}", magnitude),
                (_, false) => format!("{:o}", magnitude),
                (_, true) => format!("{:#o}", magnitude),
            };
            (sign_prefix(spec, i < 0), digits, true)
        }
        'c' => {
            let c = match value {
                Value::Str(s) if s.chars().count() == 1 => s.clone(),
                Value::Int(i) => u32::try_from(*i)
                    .ok()
                    .and_then(char::from_u32)
                    .map(String::from)
                    .ok_or_else(|| EvalError::FormatError("%c arg not in range".to_string()))?,
                _ => {
                    return Err(EvalError::FormatError(
                        "%c requires int or char".to_string(),
                    ));
                }
            };
            ("", c, false)
        }
        other => {
            return Err(EvalError::FormatError(format!(
                "unsupported format character '{}'",
                other
            )));
        }
    };

    let len = sign.chars().count() + body.chars().count();
    let width = spec.width.unwrap_or(0);
    if len >= width {
        return Ok(format!("{}{}", sign, body));
    }
    let fill = width - len;
    Ok(if spec.left_align {
        format!("{}{}{}", sign, body, " ".repeat(fill))
    } else if spec.zero_pad && numeric {
        format!("{}{}{}", sign, "0".repeat(fill), body)
    } else {
        format!("{}{}{}", " ".repeat(fill), sign, body)
    })
}

fn truncate(text: String, precision: Option<usize>) -> String {
    match precision {
        Some(p) => text.chars().take(p).collect(),
        None => text,
    }
}
