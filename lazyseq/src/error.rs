use strum::EnumMessage;
use strum_macros::{Display, EnumMessage};
use thiserror::Error;

/// The capability an argument is required to have.
///
/// The message is shown in error output, the detailed message explains
/// which values satisfy it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumMessage)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Expected {
    /// Anything that can produce key/value pairs.
    #[strum(
        to_string = "traversable",
        detailed_message = "a list, a map or a lazy sequence"
    )]
    Traversable,
    /// A traversable with a length known up front.
    #[strum(
        to_string = "countable",
        detailed_message = "a list, a map or a lazy sequence that reports its exact length"
    )]
    Countable,
    #[strum(
        to_string = "a positive integer",
        detailed_message = "an integer greater than zero"
    )]
    PositiveInteger,
    #[strum(
        to_string = "a non-negative integer",
        detailed_message = "zero or an integer greater than zero"
    )]
    NonNegativeInteger,
}

/// What was supplied in place of a valid argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Kind {
    #[strum(to_string = "null")]
    Null,
    #[strum(to_string = "bool")]
    Bool,
    #[strum(to_string = "int")]
    Int,
    #[strum(to_string = "float")]
    Float,
    #[strum(to_string = "string")]
    Str,
    #[strum(to_string = "list")]
    List,
    #[strum(to_string = "map")]
    Map,
    #[strum(to_string = "sequence")]
    Seq,
    /// A source that cannot report how many items it holds.
    #[strum(to_string = "sequence of unknown length")]
    Unsized,
    /// Nothing was supplied.
    #[strum(to_string = "nothing")]
    Missing,
    #[strum(to_string = "zero")]
    Zero,
    #[strum(to_string = "negative integer")]
    Negative,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// An argument failed its precondition.
    ///
    /// This is raised when the operation is called, before anything is
    /// produced. `position` is 1-based.
    #[error("argument {position} must be {expected}, {found} given")]
    InvalidArgument {
        position: usize,
        expected: Expected,
        found: Kind,
    },
    /// A callable returned something the operation cannot use.
    #[error("callable must return {expected}, {found} returned")]
    InvalidReturn { expected: Expected, found: Kind },
    /// Raised by a caller-supplied callable.
    #[error("{0}")]
    Raised(String),
}

impl Error {
    pub fn raised(message: impl Into<String>) -> Self {
        Error::Raised(message.into())
    }

    pub(crate) fn invalid_argument(position: usize, expected: Expected, found: Kind) -> Self {
        Error::InvalidArgument {
            position,
            expected,
            found,
        }
    }

    /// A longer explanation of what would have been accepted.
    pub fn help(&self) -> Option<&'static str> {
        match self {
            Error::InvalidArgument { expected, .. } | Error::InvalidReturn { expected, .. } => {
                expected.get_detailed_message()
            }
            Error::Raised(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use insta::assert_snapshot;

    use super::*;

    #[test]
    fn test_invalid_argument_message() {
        let error = Error::invalid_argument(2, Expected::Traversable, Kind::Int);
        assert_snapshot!(error.to_string(), @"argument 2 must be traversable, int given");
        assert_eq!(error.help(), Some("a list, a map or a lazy sequence"));
    }

    #[test]
    fn test_invalid_return_message() {
        let error = Error::InvalidReturn {
            expected: Expected::Traversable,
            found: Kind::Bool,
        };
        assert_snapshot!(error.to_string(), @"callable must return traversable, bool returned");
    }

    #[test]
    fn test_raised_has_no_help() {
        let error = Error::raised("boom");
        assert_snapshot!(error.to_string(), @"boom");
        assert_eq!(error.help(), None);
    }
}
