use crate::engine::{self, Program, Run};
use crate::{Error, Result};

/// Resource ceilings for one compilation and run.
///
/// Every limit is hard: crossing it ends the run with an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Ordinary rules allowed in the source, and the list size above which a
    /// meta-rule may no longer clone rules.
    pub max_rules: usize,
    /// `rep`/`for` directives allowed in the source.
    pub max_meta_rules: usize,
    /// Rewrite steps allowed before the run is considered non-terminating.
    pub max_iterations: usize,
    /// Longest allowed string, in UTF-16 code units.
    pub max_string_size: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self { max_rules: 1000, max_meta_rules: 100, max_iterations: 10_000, max_string_size: 1000 }
    }
}

impl Options {
    /// Limits used when the interpreter is hosted behind a chat command,
    /// where longer programs are expected and output is truncated anyway.
    pub fn hosted() -> Self {
        Self { max_iterations: 100_000, max_string_size: 100_000, ..Self::default() }
    }
}

/// Summary of a run that was driven to completion by [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// The last snapshot produced. `None` only when compilation failed.
    pub last: Option<String>,
    /// Rewrite steps performed.
    pub steps: usize,
    /// Set when compilation or execution failed.
    pub error: Option<Error>,
}

impl Outcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Parse, expand and compile `source`.
///
/// # Example
/// ```
/// use markov_rewrite::{Options, compile};
///
/// let program = compile("rep X=1,2;str aXb;aXb=Y", &Options::default()).unwrap();
/// assert_eq!(program.len(), 2);
/// ```
pub fn compile(source: &str, options: &Options) -> Result<Program> {
    Program::compile(source, options)
}

/// Compile `source` and start a lazy run over it.
///
/// # Example
/// ```
/// use markov_rewrite::{Options, run};
///
/// let snapshots: Vec<String> =
///     run("str abc;a=x", &Options::default()).unwrap().collect::<Result<_, _>>().unwrap();
/// assert_eq!(snapshots, ["abc", "xbc"]);
/// ```
pub fn run(source: &str, options: &Options) -> Result<Run> {
    Ok(compile(source, options)?.run())
}

/// Run `source` to the end, keeping only the last snapshot.
pub fn evaluate(source: &str, options: &Options) -> Outcome {
    let mut run = match run(source, options) {
        Ok(run) => run,
        Err(error) => return Outcome { last: None, steps: 0, error: Some(error) },
    };

    let mut last = None;
    let mut error = None;
    for item in run.by_ref() {
        match item {
            Ok(snapshot) => last = Some(snapshot),
            Err(err) => error = Some(err),
        }
    }

    Outcome { last, steps: run.steps(), error }
}

/// Escape `text` so it can be pasted into a program and read back verbatim.
pub fn escape_text(text: &str) -> String {
    engine::escape_text(text)
}

/// Number base used by [`codepoints`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodepointFormat {
    Decimal,
    /// Lowercase, without a `0x` prefix.
    Hex,
}

/// Render each code point of `text` as a number, separated by spaces.
///
/// # Example
/// ```
/// use markov_rewrite::{CodepointFormat, codepoints};
///
/// assert_eq!(codepoints("Hi", CodepointFormat::Decimal), "72 105");
/// assert_eq!(codepoints("Hi", CodepointFormat::Hex), "48 69");
/// ```
pub fn codepoints(text: &str, format: CodepointFormat) -> String {
    text.chars()
        .map(|c| match format {
            CodepointFormat::Decimal => u32::from(c).to_string(),
            CodepointFormat::Hex => format!("{:x}", u32::from(c)),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
