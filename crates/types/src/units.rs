//! Measurement units. Millimetres are the normalised unit everywhere.

use crate::error::ConfigError;
use nom::{
    IResult, Parser,
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::space0,
    combinator::{map, opt},
    number::complete::float,
    sequence::delimited,
};

/// Returns the value in millimetres (the identity, millimetres are the default).
pub fn mm(value: f32) -> f32 {
    value
}

/// Converts centimetres to millimetres.
pub fn cm(value: f32) -> f32 {
    Unit::Centimetre.to_mm(value)
}

pub fn mm_pair(a: f32, b: f32) -> (f32, f32) {
    (mm(a), mm(b))
}

pub fn cm_pair(a: f32, b: f32) -> (f32, f32) {
    (cm(a), cm(b))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    #[default]
    Millimetre,
    Centimetre,
    Inch,
    Point,
}

impl Unit {
    pub fn to_mm(self, value: f32) -> f32 {
        match self {
            Unit::Millimetre => value,
            Unit::Centimetre => value * 10.0,
            Unit::Inch => value * 25.4,
            Unit::Point => value * 25.4 / 72.0,
        }
    }
}

fn unit(input: &str) -> IResult<&str, Unit> {
    alt((
        map(tag_no_case("mm"), |_| Unit::Millimetre),
        map(tag_no_case("cm"), |_| Unit::Centimetre),
        map(tag_no_case("in"), |_| Unit::Inch),
        map(tag_no_case("pt"), |_| Unit::Point),
    ))
    .parse(input)
}

fn length(input: &str) -> IResult<&str, f32> {
    let (input, value) = delimited(space0, float, space0).parse(input)?;
    let (input, unit) = opt(unit).parse(input)?;
    Ok((input, unit.unwrap_or_default().to_mm(value)))
}

/// Parses a length such as `"12"`, `"2.5cm"` or `"1in"` into millimetres.
/// A bare number is taken as millimetres.
pub fn parse_length(input: &str) -> Result<f32, ConfigError> {
    match length(input.trim()) {
        Ok(("", value)) => Ok(value),
        _ => Err(ConfigError::InvalidLength(input.to_string())),
    }
}
