//! Compilation metrics.
//!
//! Collected on every `compile` call: the counts are needed anyway and the
//! timings are three `Instant::now()` calls. Hosts can surface them when
//! debugging slow or oversized programs (the CLI prints them with `--stats`).

use std::time::Duration;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompileMetrics {
    /// Statements the source split into, comments included.
    pub statements: usize,
    /// Ordinary rules as written, before meta-rule expansion.
    pub rules_parsed: usize,
    /// `rep`/`for` directives.
    pub meta_rules: usize,
    /// Ordinary rules after expansion; this is what gets compiled.
    pub rules_expanded: usize,
    /// Time spent splitting and classifying statements.
    pub parse: Duration,
    /// Time spent applying meta-rules.
    pub expand: Duration,
    /// Time spent building matchers.
    pub compile: Duration,
}

impl CompileMetrics {
    pub fn total(&self) -> Duration {
        self.parse + self.expand + self.compile
    }
}
