use markov_rewrite::{CompileMetrics, Error, ErrorKind, Run};
use std::collections::VecDeque;

mod ansi {
    pub const RESET: &str = "\x1b[0m";
    pub const DIM: &str = "\x1b[2m";
    pub const BOLD: &str = "\x1b[1m";

    pub const GREEN: &str = "\x1b[32m";
    pub const YELLOW: &str = "\x1b[33m";
    pub const RED: &str = "\x1b[31m";
    pub const CYAN: &str = "\x1b[36m";
    pub const GRAY: &str = "\x1b[90m";
}

pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    fn paint(&self, s: impl AsRef<str>, color: &str) -> String {
        if self.enabled { format!("{}{}{}", color, s.as_ref(), ansi::RESET) } else { s.as_ref().to_string() }
    }

    fn bold(&self, s: impl AsRef<str>) -> String {
        self.paint(s, ansi::BOLD)
    }

    fn dim(&self, s: impl AsRef<str>) -> String {
        self.paint(s, ansi::DIM)
    }
}

// --- Transcript -------------------------------------------------------------

/// How much of a long run is kept for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TranscriptLimits {
    /// Snapshots kept from the start of the run.
    pub head: usize,
    /// Snapshots kept from the end of the run.
    pub tail: usize,
    /// Total UTF-16 units kept across head and tail.
    pub render_budget: usize,
}

impl Default for TranscriptLimits {
    fn default() -> Self {
        Self { head: 50, tail: 50, render_budget: 100_000 }
    }
}

/// Head and tail windows over a snapshot stream; everything between them is
/// counted but dropped as it arrives.
///
/// ```text
/// [ head (filled first) ] … elided … [ tail (sliding) ]
/// ```
///
/// The head closes once it holds `head` snapshots or the budget is spent.
/// The tail then slides, always keeping at least the newest snapshot.
#[derive(Debug)]
pub struct Transcript {
    limits: TranscriptLimits,
    head: Vec<String>,
    tail: VecDeque<String>,
    elided: usize,
    size: usize,
    head_closed: bool,
}

impl Transcript {
    pub fn new(limits: TranscriptLimits) -> Self {
        Self { limits, head: Vec::new(), tail: VecDeque::new(), elided: 0, size: 0, head_closed: false }
    }

    pub fn push(&mut self, snapshot: String) {
        self.size += utf16_len(&snapshot);

        if !self.head_closed {
            self.head.push(snapshot);
            if self.size > self.limits.render_budget || self.head.len() >= self.limits.head {
                self.head_closed = true;
            }
            return;
        }

        self.tail.push_back(snapshot);
        while self.tail.len() > 1 && (self.size > self.limits.render_budget || self.tail.len() > self.limits.tail) {
            if let Some(dropped) = self.tail.pop_front() {
                self.size -= utf16_len(&dropped);
                self.elided += 1;
            }
        }
    }

    /// The final string, or `None` if only the initial snapshot was seen.
    pub fn result(&self) -> Option<&str> {
        if self.total() > 1 { self.last() } else { None }
    }

    /// Number of snapshots seen, shown or not.
    pub fn total(&self) -> usize {
        self.head.len() + self.elided + self.tail.len()
    }

    pub fn elided(&self) -> usize {
        self.elided
    }

    pub fn last(&self) -> Option<&str> {
        self.tail.back().or(self.head.last()).map(String::as_str)
    }
}

fn utf16_len(s: &str) -> usize {
    s.encode_utf16().count()
}

// --- Printing ---------------------------------------------------------------

pub fn print_transcript(transcript: &Transcript, palette: &Palette) {
    let width = transcript.total().to_string().len();

    for (idx, snapshot) in transcript.head.iter().enumerate() {
        print_snapshot(idx + 1, width, snapshot, palette);
    }
    if transcript.elided() > 0 {
        println!("{}", palette.dim(format!("{:>width$}  … {} snapshots elided …", "", transcript.elided())));
    }
    let offset = transcript.head.len() + transcript.elided();
    for (idx, snapshot) in transcript.tail.iter().enumerate() {
        print_snapshot(offset + idx + 1, width, snapshot, palette);
    }
}

fn print_snapshot(number: usize, width: usize, snapshot: &str, palette: &Palette) {
    println!("{} {}", palette.paint(format!("{number:>width$}."), ansi::GRAY), palette.paint(snapshot, ansi::GREEN));
}

pub fn print_error(err: &Error, palette: &Palette) {
    let label = match err.kind() {
        ErrorKind::Syntax => "syntax error",
        ErrorKind::Limit => "limit exceeded",
        ErrorKind::Substitution => "substitution error",
    };
    eprintln!("{} {}", palette.bold(palette.paint(format!("{label}:"), ansi::RED)), err);
}

pub fn print_stats(metrics: &CompileMetrics, rules: usize, palette: &Palette) {
    println!("{}", palette.paint("━━━ Compilation ━━━", ansi::GRAY));
    println!(
        "  Statements: {}  │  Rules: {} → {}  │  Meta rules: {}",
        palette.paint(metrics.statements.to_string(), ansi::CYAN),
        palette.paint(metrics.rules_parsed.to_string(), ansi::CYAN),
        palette.paint(rules.to_string(), ansi::CYAN),
        palette.paint(metrics.meta_rules.to_string(), ansi::CYAN),
    );
    println!(
        "  Total: {}  │  Parse: {}  │  Expand: {}  │  Compile: {}",
        palette.paint(format!("{:?}", metrics.total()), ansi::GREEN),
        palette.dim(format!("{:?}", metrics.parse)),
        palette.dim(format!("{:?}", metrics.expand)),
        palette.dim(format!("{:?}", metrics.compile)),
    );
    println!("{}", palette.paint("━━━━━━━━━━━━━━━━━━━", ansi::GRAY));
}

/// What to tell the user about a run's final string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultReport<'a> {
    /// No rewrite step happened.
    NoOperation,
    /// The result is empty or only whitespace.
    Empty,
    /// The result is longer than the printable cap.
    TooLong,
    Text(&'a str),
}

/// Classify a run's final string. `result` is `None` when the run stopped
/// at its initial snapshot.
pub fn classify(result: Option<&str>, max_result_size: usize) -> ResultReport<'_> {
    match result {
        None => ResultReport::NoOperation,
        Some(text) if text.trim().is_empty() => ResultReport::Empty,
        Some(text) if utf16_len(text) > max_result_size => ResultReport::TooLong,
        Some(text) => ResultReport::Text(text),
    }
}

pub fn print_report(report: ResultReport<'_>, palette: &Palette) {
    match report {
        ResultReport::NoOperation => println!("{}", palette.paint("No rule was applied.", ansi::YELLOW)),
        ResultReport::Empty => println!("{}", palette.paint("The result is empty.", ansi::YELLOW)),
        ResultReport::TooLong => println!("{}", palette.paint("The result is too long to print.", ansi::YELLOW)),
        ResultReport::Text(text) => println!("{text}"),
    }
}

/// Drain `run` and print only its final string. Returns the exit code.
pub fn print_result(mut run: Run, max_result_size: usize, palette: &Palette) -> i32 {
    // The initial string is not a result: a run with no steps did nothing.
    let mut result = None;
    let mut error = None;
    for item in run.by_ref().skip(1) {
        match item {
            Ok(snapshot) => result = Some(snapshot),
            Err(err) => error = Some(err),
        }
    }

    if let Some(err) = error {
        print_error(&err, palette);
        return 1;
    }
    print_report(classify(result.as_deref(), max_result_size), palette);
    0
}
