//! The rewrite loop.
//!
//! `Run` is a pull-based state machine. Each call to `next` does exactly one
//! unit of work and returns:
//!
//! ```text
//! pull 0          -> Ok(initial string)            (always)
//! pull n (n >= 1) -> scan rules in priority order
//!                      ├─ none matches   -> None    (halt: NoRuleApplies)
//!                      ├─ rule i matches -> rewrite leftmost match
//!                      │     ├─ too long -> Err(StringBecameTooLong)
//!                      │     └─ ok       -> Ok(new string)
//!                      │                    (fin rule: halt after it)
//!                      └─ n > max_iterations -> Err(TooManyIterations)
//! after Err       -> None forever
//! ```
//!
//! Only the *first* rule that matches anywhere is applied, however far into
//! the string its match lies; the scan restarts from rule 0 on every step.

use super::lexer::utf16_len;
use super::program::Program;
use crate::{Error, Result};

/// Why a run stopped without an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Halt {
    /// No rule matched the current string.
    NoRuleApplies,
    /// A `fin` rule was applied.
    FinalRule,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// The initial snapshot has not been handed out yet.
    Fresh,
    Running,
    Halted(Halt),
    Failed,
}

/// A lazy, single-pass sequence of snapshots.
///
/// Items are `Ok(snapshot)` until the run halts (`None`) or fails (one
/// `Err`, then `None`). Dropping a `Run` part-way is the way to cancel it.
#[derive(Debug)]
pub struct Run {
    program: Program,
    current: String,
    steps: usize,
    last_rule: Option<usize>,
    state: State,
}

impl Run {
    pub(crate) fn new(program: Program) -> Self {
        let current = program.initial().to_string();
        Run { program, current, steps: 0, last_rule: None, state: State::Fresh }
    }

    /// Rewrite steps performed so far.
    pub fn steps(&self) -> usize {
        self.steps
    }

    /// The most recently emitted snapshot.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// Index (into [`Program::rules`]) of the rule applied by the last step.
    pub fn last_rule(&self) -> Option<usize> {
        self.last_rule
    }

    /// Set once the run has stopped normally.
    pub fn halt(&self) -> Option<Halt> {
        match self.state {
            State::Halted(halt) => Some(halt),
            _ => None,
        }
    }

    /// True once `next` will only ever return `None`.
    pub fn is_finished(&self) -> bool {
        matches!(self.state, State::Halted(_) | State::Failed)
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Perform one rewrite step. `Ok(None)` means no rule applied.
    fn step(&mut self) -> Result<Option<String>> {
        let options = *self.program.options();
        if self.steps >= options.max_iterations {
            return Err(Error::TooManyIterations);
        }

        for (index, rule) in self.program.compiled_rules().iter().enumerate() {
            let Some(rewritten) = rule.apply(&self.current).transpose()? else {
                continue;
            };
            if utf16_len(&rewritten) > options.max_string_size {
                return Err(Error::StringBecameTooLong);
            }

            self.current = rewritten;
            self.steps += 1;
            self.last_rule = Some(index);
            trace!("[step] n={} rule={} len={}", self.steps, index, self.current.len());

            if rule.is_final() {
                self.state = State::Halted(Halt::FinalRule);
            }
            return Ok(Some(self.current.clone()));
        }

        self.state = State::Halted(Halt::NoRuleApplies);
        Ok(None)
    }
}

impl Iterator for Run {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Fresh => {
                self.state = State::Running;
                return Some(Ok(self.current.clone()));
            }
            State::Running => {}
            State::Halted(_) | State::Failed => return None,
        }

        match self.step() {
            Ok(Some(snapshot)) => Some(Ok(snapshot)),
            Ok(None) => {
                trace!("[halt] no rule applies after {} steps", self.steps);
                None
            }
            Err(err) => {
                trace!("[halt] {} after {} steps", err, self.steps);
                self.state = State::Failed;
                Some(Err(err))
            }
        }
    }
}
