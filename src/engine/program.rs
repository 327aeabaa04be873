//! Compiled programs.
//!
//! `Program::compile` runs the parser, the meta-rule expander and the rule
//! compiler in order. Any error aborts before a single snapshot exists.

use super::compiled_rules::{CompiledRule, RuleView};
use super::expand::expand;
use super::metrics::CompileMetrics;
use super::parser::parse_statements;
use super::rewriter::Run;
use crate::{Options, Result};
use std::time::Instant;

/// A program ready to run: the initial string plus its rules in priority
/// order (source order, with meta-rule clones adjacent).
#[derive(Debug, Clone)]
pub struct Program {
    initial: String,
    rules: Vec<CompiledRule>,
    options: Options,
    metrics: CompileMetrics,
}

impl Program {
    pub fn compile(source: &str, options: &Options) -> Result<Self> {
        let parse_start = Instant::now();
        let parsed = parse_statements(source, options)?;
        let parse = parse_start.elapsed();

        let rules_parsed = parsed.rules.len();
        let expand_start = Instant::now();
        let expanded = expand(parsed.rules, &parsed.meta_rules, options.max_rules)?;
        let expand = expand_start.elapsed();

        let compile_start = Instant::now();
        let rules = expanded.iter().map(CompiledRule::compile).collect::<Result<Vec<_>>>()?;
        let compile = compile_start.elapsed();

        let metrics = CompileMetrics {
            statements: parsed.statements,
            rules_parsed,
            meta_rules: parsed.meta_rules.len(),
            rules_expanded: rules.len(),
            parse,
            expand,
            compile,
        };

        trace!("[compile] {} rules ready in {:?}", rules.len(), metrics.total());

        Ok(Program { initial: parsed.initial, rules, options: *options, metrics })
    }

    /// The string the first snapshot shows.
    pub fn initial(&self) -> &str {
        &self.initial
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rules(&self) -> impl Iterator<Item = RuleView<'_>> {
        self.rules.iter().map(CompiledRule::view)
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    pub fn metrics(&self) -> &CompileMetrics {
        &self.metrics
    }

    /// Start executing. Nothing is computed until the run is pulled.
    pub fn run(self) -> Run {
        Run::new(self)
    }

    pub(crate) fn compiled_rules(&self) -> &[CompiledRule] {
        &self.rules
    }
}
