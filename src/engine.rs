//! Compilation and execution engine.
//!
//! A program goes through a strictly forward pipeline. Each stage lives in its
//! own submodule under `src/engine/`:
//!
//! ```text
//! source text
//!     │  split_unescaped(';' | '\n')                  (lexer.rs)
//!     v
//! statements ── parse_statements ──┬── initial string  (parser.rs)
//!                                  ├── ordinary rules
//!                                  └── meta-rules
//!                                         │
//!                  expand (one pass per meta-rule)     (expand.rs)
//!                                         │
//!                                         v
//!                               expanded ordinary rules
//!                                         │
//!                  CompiledRule::compile               (compiled_rules.rs)
//!                                         v
//!                                      Program         (program.rs)
//!                                         │
//!                  Run (lazy iterator, one step/pull)  (rewriter.rs)
//!                                         v
//!                                  snapshot sequence
//! ```
//!
//! ## Responsibilities by module
//!
//! - `lexer.rs`: backslash escapes and escape-aware splitting. Everything else
//!   goes through these helpers so escaping stays consistent.
//! - `parser.rs`: turns statements into raw rules, meta-rules and the initial
//!   string, enforcing the rule and meta-rule ceilings.
//! - `expand.rs`: applies meta-rules in source order, cloning rules whose key
//!   contains a meta token.
//! - `compiled_rules.rs`: builds a matcher and a replacement builder per rule.
//! - `program.rs`: wires the stages together and records `CompileMetrics`.
//! - `rewriter.rs`: the bounded rewrite loop, exposed as an iterator.
//! - `metrics.rs`: timings and counts for a compilation.
//!
//! ## Debugging
//!
//! Set `MARKOV_DEBUG=1` to print per-stage traces to stderr.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/expand.rs"]
mod expand;
#[path = "engine/lexer.rs"]
mod lexer;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/parser.rs"]
mod parser;
#[path = "engine/program.rs"]
mod program;
#[path = "engine/rewriter.rs"]
mod rewriter;
#[cfg(test)]
#[path = "engine/tests.rs"]
mod tests;

pub use compiled_rules::RuleView;
pub(crate) use lexer::escape_text;
pub use lexer::unescape;
pub use metrics::CompileMetrics;
pub use program::Program;
pub use rewriter::{Halt, Run};
