//! Errors raised while compiling or running a program.
//!
//! Every condition is fatal for the current run. Compile-time errors surface
//! before any snapshot exists; run-time errors end the snapshot sequence right
//! after the last good snapshot.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// More than one `str ` statement in a program.
    #[error("Multiple str statements found")]
    MultipleStr,

    /// A `xyz ` prefix on a rule key that is not a known keyword.
    #[error("Undefined keyword {0}, escape with backslash for literal string")]
    UndefinedKeyword(String),

    /// Text ending in a lone backslash was unescaped.
    #[error("Unexpected backslash immediately before end of text")]
    TrailingBackslash,

    #[error("Too many rules")]
    TooManyRules,

    #[error("Too many meta rules")]
    TooManyMetaRules,

    /// A meta-rule tried to clone `rule` while the rule list was already full.
    #[error("Too many rules created by meta rule {rule}")]
    TooManyRulesFromMetaRule { rule: String },

    /// The initial string is over the size ceiling.
    #[error("String too long")]
    StringTooLong,

    /// A rewrite step produced a string over the size ceiling.
    #[error("String became too long")]
    StringBecameTooLong,

    #[error("Too many iterations")]
    TooManyIterations,

    /// A `chr` substitution got text that is not a Unicode scalar value.
    #[error("Invalid code point {0}")]
    InvalidCodePoint(String),

    /// A rule key could not be turned into a matcher.
    #[error("Invalid rule pattern: {0}")]
    InvalidPattern(String),
}

/// Coarse classification of an [`Error`], for hosts that map errors to
/// user-facing messages by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The program text is malformed.
    Syntax,
    /// A configured ceiling was exceeded.
    Limit,
    /// A substitution could not be rendered.
    Substitution,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MultipleStr | Error::UndefinedKeyword(_) | Error::TrailingBackslash | Error::InvalidPattern(_) => {
                ErrorKind::Syntax
            }
            Error::TooManyRules
            | Error::TooManyMetaRules
            | Error::TooManyRulesFromMetaRule { .. }
            | Error::StringTooLong
            | Error::StringBecameTooLong
            | Error::TooManyIterations => ErrorKind::Limit,
            Error::InvalidCodePoint(_) => ErrorKind::Substitution,
        }
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::InvalidPattern(err.to_string())
    }
}
