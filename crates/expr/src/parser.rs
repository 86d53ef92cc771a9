//! A `nom`-based parser for the restricted expression grammar.
//!
//! The grammar is a small Python-like subset: literals, tuples and lists,
//! arithmetic, comparisons, boolean keywords, attribute access, indexing
//! and calls. Precedence, lowest first:
//! `or`, `and`, `not`, comparisons, `+ -`, `* / // %`, unary `- +`, `**`,
//! then postfix `.name`, `[index]` and `(args)`.

use super::ast::*;
use crate::error::EvalError;
use crate::value::Value;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::{tag, take_while},
    character::complete::{char, digit0, digit1, multispace0, one_of, satisfy},
    combinator::{map, not, opt, recognize, verify},
    error::{Error, ErrorKind},
    multi::{many0, separated_list0},
    sequence::{delimited, pair, preceded, terminated},
};

const RESERVED: &[&str] = &[
    "and", "or", "not", "True", "False", "None", "true", "false", "none",
];

// --- Main Public Parser ---

pub fn parse_expression(input: &str) -> Result<Expression, EvalError> {
    match expression_list(input.trim()) {
        Ok(("", expr)) => Ok(expr),
        Ok((rem, _)) => Err(EvalError::Parse {
            expression: input.to_string(),
            message: format!("Parser did not consume all input. Remainder: '{}'", rem),
        }),
        Err(e) => Err(EvalError::Parse {
            expression: input.to_string(),
            message: e.to_string(),
        }),
    }
}

// --- Combinators & Helpers ---

fn ws<'a, F, O, E>(inner: F) -> impl Parser<&'a str, Output = O, Error = E>
where
    F: Parser<&'a str, Output = O, Error = E>,
    E: nom::error::ParseError<&'a str>,
{
    delimited(multispace0, inner, multispace0)
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Matches a keyword that is not the prefix of a longer identifier.
fn keyword<'a>(word: &'static str) -> impl Parser<&'a str, Output = &'a str, Error = Error<&'a str>> {
    terminated(tag(word), not(satisfy(is_ident_char)))
}

fn build_binary_expr_parser<'a, F, G>(
    sub_expr_parser: F,
    op_parser: G,
) -> impl FnMut(&'a str) -> IResult<&'a str, Expression>
where
    F: Parser<&'a str, Output = Expression, Error = Error<&'a str>> + Clone,
    G: Parser<&'a str, Output = BinaryOperator, Error = Error<&'a str>> + Clone,
{
    move |input: &str| {
        let (input, mut left) = sub_expr_parser.clone().parse(input)?;
        let (input, remainder) =
            many0(pair(ws(op_parser.clone()), sub_expr_parser.clone())).parse(input)?;

        for (op, right) in remainder {
            left = Expression::BinaryOp {
                left: Box::new(left),
                op,
                right: Box::new(right),
            };
        }
        Ok((input, left))
    }
}

// --- Expression Parsers (in order of precedence) ---

/// A bare comma-separated list at the top level is a tuple (`1, 2`).
fn expression_list(input: &str) -> IResult<&str, Expression> {
    let (i, first) = expression(input)?;
    let (i, rest) = many0(preceded(ws(char(',')), expression)).parse(i)?;
    let (i, trailing) = opt(ws(char(','))).parse(i)?;
    if rest.is_empty() && trailing.is_none() {
        return Ok((i, first));
    }
    let mut items = vec![first];
    items.extend(rest);
    Ok((i, Expression::Tuple(items)))
}

fn expression(input: &str) -> IResult<&str, Expression> {
    or_expr(input)
}

fn or_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(keyword("or"), |_| BinaryOperator::Or).parse(input)
}

fn and_op(input: &str) -> IResult<&str, BinaryOperator> {
    map(keyword("and"), |_| BinaryOperator::And).parse(input)
}

fn or_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(and_expr, or_op)(input)
}

fn and_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(not_expr, and_op)(input)
}

fn not_expr(input: &str) -> IResult<&str, Expression> {
    alt((
        map(preceded(ws(keyword("not")), not_expr), |expr| {
            Expression::UnaryOp {
                op: UnaryOperator::Not,
                expr: Box::new(expr),
            }
        }),
        comparison_expr,
    ))
    .parse(input)
}

fn comparison_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(tag("=="), |_| BinaryOperator::Equals),
        map(tag("!="), |_| BinaryOperator::NotEquals),
        map(tag("<>"), |_| BinaryOperator::NotEquals),
        map(tag("<="), |_| BinaryOperator::LessThanOrEqual),
        map(tag(">="), |_| BinaryOperator::GreaterThanOrEqual),
        map(char('<'), |_| BinaryOperator::LessThan),
        map(char('>'), |_| BinaryOperator::GreaterThan),
    ))
    .parse(input)
}

fn additive_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(char('+'), |_| BinaryOperator::Plus),
        map(char('-'), |_| BinaryOperator::Minus),
    ))
    .parse(input)
}

fn multiplicative_op(input: &str) -> IResult<&str, BinaryOperator> {
    alt((
        map(terminated(char('*'), not(char('*'))), |_| BinaryOperator::Multiply),
        map(tag("//"), |_| BinaryOperator::FloorDivide),
        map(char('/'), |_| BinaryOperator::Divide),
        map(char('%'), |_| BinaryOperator::Modulo),
    ))
    .parse(input)
}

fn comparison_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(additive_expr, comparison_op)(input)
}

fn additive_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(multiplicative_expr, additive_op)(input)
}

fn multiplicative_expr(input: &str) -> IResult<&str, Expression> {
    build_binary_expr_parser(unary_expr, multiplicative_op)(input)
}

fn unary_expr(input: &str) -> IResult<&str, Expression> {
    let sign = alt((
        map(char('-'), |_| UnaryOperator::Minus),
        map(char('+'), |_| UnaryOperator::Plus),
    ));
    alt((
        map(pair(ws(sign), unary_expr), |(op, expr)| Expression::UnaryOp {
            op,
            expr: Box::new(expr),
        }),
        power_expr,
    ))
    .parse(input)
}

// `**` binds tighter than a unary minus on its left and is right-associative.
fn power_expr(input: &str) -> IResult<&str, Expression> {
    let (i, base) = postfix_expr(input)?;
    let (i, exponent) = opt(preceded(ws(tag("**")), unary_expr)).parse(i)?;
    match exponent {
        Some(exponent) => Ok((
            i,
            Expression::BinaryOp {
                left: Box::new(base),
                op: BinaryOperator::Power,
                right: Box::new(exponent),
            },
        )),
        None => Ok((i, base)),
    }
}

enum Postfix {
    Attribute(String),
    Index(Expression),
    Call(Vec<Expression>),
}

fn postfix_op(input: &str) -> IResult<&str, Postfix> {
    alt((
        map(preceded(ws(char('.')), identifier), Postfix::Attribute),
        map(
            delimited(ws(char('[')), expression, ws(char(']'))),
            Postfix::Index,
        ),
        map(call_arguments, Postfix::Call),
    ))
    .parse(input)
}

fn postfix_expr(input: &str) -> IResult<&str, Expression> {
    let (i, start) = primary_expr(input)?;
    let (i, ops) = many0(postfix_op).parse(i)?;
    let expr = ops.into_iter().fold(start, |object, op| match op {
        Postfix::Attribute(attribute) => Expression::Attribute {
            object: Box::new(object),
            attribute,
        },
        Postfix::Index(index) => Expression::Index {
            object: Box::new(object),
            index: Box::new(index),
        },
        Postfix::Call(args) => Expression::Call {
            callee: Box::new(object),
            args,
        },
    });
    Ok((i, expr))
}

fn call_arguments(input: &str) -> IResult<&str, Vec<Expression>> {
    delimited(
        ws(char('(')),
        terminated(
            separated_list0(ws(char(',')), expression),
            opt(ws(char(','))),
        ),
        ws(char(')')),
    )
    .parse(input)
}

fn primary_expr(input: &str) -> IResult<&str, Expression> {
    ws(alt((
        map(number_literal, Expression::Literal),
        map(string_literal, |s| Expression::Literal(Value::Str(s))),
        keyword_literal,
        map(identifier, Expression::Name),
        parenthesized,
        list_display,
    )))
    .parse(input)
}

fn parenthesized(input: &str) -> IResult<&str, Expression> {
    let (i, _) = ws(char('(')).parse(input)?;
    if let Ok((i, _)) = char::<&str, Error<&str>>(')').parse(i) {
        return Ok((i, Expression::Tuple(vec![])));
    }
    let (i, first) = expression(i)?;
    let (i, rest) = many0(preceded(ws(char(',')), expression)).parse(i)?;
    let (i, trailing) = opt(ws(char(','))).parse(i)?;
    let (i, _) = ws(char(')')).parse(i)?;
    if rest.is_empty() && trailing.is_none() {
        return Ok((i, first));
    }
    let mut items = vec![first];
    items.extend(rest);
    Ok((i, Expression::Tuple(items)))
}

fn list_display(input: &str) -> IResult<&str, Expression> {
    map(
        delimited(
            ws(char('[')),
            terminated(
                separated_list0(ws(char(',')), expression),
                opt(ws(char(','))),
            ),
            ws(char(']')),
        ),
        Expression::List,
    )
    .parse(input)
}

// --- Literal Parsers ---

fn keyword_literal(input: &str) -> IResult<&str, Expression> {
    alt((
        map(alt((keyword("True"), keyword("true"))), |_| {
            Expression::Literal(Value::Bool(true))
        }),
        map(alt((keyword("False"), keyword("false"))), |_| {
            Expression::Literal(Value::Bool(false))
        }),
        map(alt((keyword("None"), keyword("none"))), |_| {
            Expression::Literal(Value::Null)
        }),
    ))
    .parse(input)
}

fn exponent(input: &str) -> IResult<&str, &str> {
    recognize((one_of("eE"), opt(one_of("+-")), digit1)).parse(input)
}

fn number_literal(input: &str) -> IResult<&str, Value> {
    let (i, text) = alt((
        recognize((digit1, opt((char('.'), digit0)), opt(exponent))),
        recognize((char('.'), digit1, opt(exponent))),
    ))
    .parse(input)?;

    let is_float = text.contains(['.', 'e', 'E']);
    let value = if is_float {
        text.parse::<f64>().map(Value::Float).ok()
    } else {
        // Integers too large for i64 degrade to floats.
        text.parse::<i64>()
            .map(Value::Int)
            .ok()
            .or_else(|| text.parse::<f64>().map(Value::Float).ok())
    };
    match value {
        Some(value) => Ok((i, value)),
        None => Err(nom::Err::Error(Error::new(input, ErrorKind::Float))),
    }
}

/// Single- or double-quoted string with backslash escapes.
fn string_literal(input: &str) -> IResult<&str, String> {
    let mut chars = input.char_indices();
    let quote = match chars.next() {
        Some((_, c @ ('\'' | '"'))) => c,
        _ => return Err(nom::Err::Error(Error::new(input, ErrorKind::Char))),
    };

    let mut out = String::new();
    let mut escaped = false;
    for (idx, c) in chars {
        if escaped {
            let unescaped = match c {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                '\\' | '\'' | '"' => c,
                other => {
                    out.push('\\');
                    other
                }
            };
            out.push(unescaped);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == quote {
            return Ok((&input[idx + c.len_utf8()..], out));
        } else {
            out.push(c);
        }
    }
    Err(nom::Err::Error(Error::new(input, ErrorKind::Char)))
}

// --- Name Parser ---

fn identifier(input: &str) -> IResult<&str, String> {
    map(
        verify(
            recognize(pair(satisfy(is_ident_start), take_while(is_ident_char))),
            |name: &str| !RESERVED.contains(&name),
        ),
        |name: &str| name.to_string(),
    )
    .parse(input)
}
