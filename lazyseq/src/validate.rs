//! Argument preconditions.
//!
//! Every operation runs these checks when it is called, so a malformed call
//! fails immediately rather than on the first pull. Positions are 1-based and
//! refer to the argument order of the operation.

use crate::error::{self, Error, Expected, Kind};
use crate::value::{Traversable, Value};

/// Require a traversable value.
pub fn traversable(value: &Value, position: usize) -> error::Result<Traversable> {
    Traversable::new(value)
        .ok_or_else(|| Error::invalid_argument(position, Expected::Traversable, value.kind()))
}

/// Require a traversable value whose length is known without traversing it.
pub fn countable(value: &Value, position: usize) -> error::Result<(Traversable, usize)> {
    let traversable = traversable(value, position)?;
    match traversable.known_len() {
        Some(len) => Ok((traversable, len)),
        None => Err(Error::invalid_argument(
            position,
            Expected::Countable,
            Kind::Unsized,
        )),
    }
}

/// Require an iterator that reports its exact length.
pub fn exact_len<I: Iterator>(iter: &I, position: usize) -> error::Result<usize> {
    match iter.size_hint() {
        (lower, Some(upper)) if lower == upper => Ok(lower),
        _ => Err(Error::invalid_argument(
            position,
            Expected::Countable,
            Kind::Unsized,
        )),
    }
}

pub fn positive(n: i64, position: usize) -> error::Result<usize> {
    match usize::try_from(n) {
        Ok(0) => Err(Error::invalid_argument(
            position,
            Expected::PositiveInteger,
            Kind::Zero,
        )),
        Ok(n) => Ok(n),
        Err(_) => Err(Error::invalid_argument(
            position,
            Expected::PositiveInteger,
            Kind::Negative,
        )),
    }
}

pub fn non_zero(n: usize, position: usize) -> error::Result<usize> {
    if n == 0 {
        Err(Error::invalid_argument(
            position,
            Expected::PositiveInteger,
            Kind::Zero,
        ))
    } else {
        Ok(n)
    }
}

pub fn non_negative(n: i64, position: usize) -> error::Result<usize> {
    usize::try_from(n).map_err(|_| {
        Error::invalid_argument(position, Expected::NonNegativeInteger, Kind::Negative)
    })
}

/// Require at least two sources for a combinator taking a variable number
/// of sequences.
///
/// A missing source is reported at the position it should have been
/// supplied in.
pub fn arity(count: usize, first_position: usize) -> error::Result<()> {
    if count < 2 {
        Err(Error::invalid_argument(
            first_position + count,
            Expected::Traversable,
            Kind::Missing,
        ))
    } else {
        Ok(())
    }
}

/// Require at least two traversable sources.
pub fn sources(values: &[Value], first_position: usize) -> error::Result<Vec<Traversable>> {
    let traversables = values
        .iter()
        .enumerate()
        .map(|(i, value)| traversable(value, first_position + i))
        .collect::<error::Result<Vec<_>>>()?;
    arity(traversables.len(), first_position)?;
    Ok(traversables)
}
