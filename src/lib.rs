#[macro_use]
mod macros;
mod api;
mod engine;
mod error;

use once_cell::sync::Lazy;

pub use api::{CodepointFormat, Options, Outcome, codepoints, compile, escape_text, evaluate, run};
pub use engine::{CompileMetrics, Halt, Program, RuleView, Run, unescape};
pub use error::{Error, ErrorKind, Result};

// --- Shared types -----------------------------------------------------------

/// What a single capture slot (`%` in a rule key) consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Exactly one code point, newlines included.
    Char,
    /// A run of ASCII digits without a leading zero (a code point in decimal).
    Digits,
}

/// Keyword prefix of an ordinary rule statement.
///
/// `rep`/`for` never reach this type: they produce [`MetaRule`]s instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Keyword {
    Plain,
    Fin,
    Chr,
    Ord,
}

impl Keyword {
    pub(crate) fn slot_kind(self) -> SlotKind {
        match self {
            Keyword::Chr => SlotKind::Digits,
            _ => SlotKind::Char,
        }
    }

    pub(crate) fn is_final(self) -> bool {
        self == Keyword::Fin
    }
}

/// An ordinary rule as written in the source. `key` and `value` are still
/// escaped text; they are only unescaped segment by segment at compile time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawRule {
    pub key: String,
    pub value: String,
    pub keyword: Keyword,
}

/// A `rep`/`for` directive. `token` is unescaped once during expansion;
/// `values` stays raw and is split on unescaped commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MetaRule {
    pub token: String,
    pub values: String,
}

// --- Diagnostics ------------------------------------------------------------

static DEBUG: Lazy<bool> = Lazy::new(|| std::env::var_os("MARKOV_DEBUG").is_some());

/// Whether `MARKOV_DEBUG` was set when the process first asked.
pub(crate) fn debug_enabled() -> bool {
    *DEBUG
}
