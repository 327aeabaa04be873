//! Rule compilation.
//!
//! A rule's key and value are split on unescaped `%`. Key segments become the
//! literal runs of a matcher, with a capture slot between each pair. Value
//! segments become the literal runs of the replacement, with a captured group
//! spliced between each pair.
//!
//! ```text
//! ord x%y=[%]
//!
//! key   "x%y" -> ["x", "y"]   matcher  x(.)y      (1 slot)
//! value "[%]" -> ["[", "]"]   output   "[" + ord(group 1) + "]"
//! ```
//!
//! ## Slot semantics
//!
//! - `chr` slots match `[1-9][0-9]*` and the group is rendered as the character
//!   with that code point.
//! - Every other slot matches exactly one code point, newlines included; `ord`
//!   renders it as its decimal code point, the rest pass it through.
//!
//! ## Group selection
//!
//! The value segment at position `i` (1-based, after the leading segment) is
//! preceded by group `min(slots, i)`. Extra value segments therefore reuse the
//! last slot. A key with no slots has no group to offer, and the literal `%`
//! is spliced instead (then rendered by the keyword like any captured text).

use super::lexer::{escape_literal, split_unescaped, unescape};
use crate::{Error, Keyword, RawRule, Result, SlotKind};
use regex::{Captures, Regex, RegexBuilder};
use std::borrow::Cow;

/// Text used in place of a group when the key has no capture slots.
const MISSING_GROUP: &str = "%";

/// Compiled-size ceiling for one matcher. The regex default (10 MiB) is
/// spent by keys with a few thousand slots.
const MATCHER_SIZE_LIMIT: usize = 1 << 28;

/// A rule ready to be applied to the live string.
#[derive(Debug, Clone)]
pub(crate) struct CompiledRule {
    matcher: Regex,
    keyword: Keyword,
    key_segments: Vec<String>,
    value_segments: Vec<String>,
}

impl CompiledRule {
    pub(crate) fn compile(rule: &RawRule) -> Result<Self> {
        let key_segments = unescape_segments(&rule.key)?;
        let value_segments = unescape_segments(&rule.value)?;

        let slot = match rule.keyword.slot_kind() {
            SlotKind::Digits => "([1-9][0-9]*)",
            SlotKind::Char => "(.)",
        };
        let pattern = key_segments.iter().map(|s| escape_literal(s)).collect::<Vec<_>>().join(slot);
        let matcher = RegexBuilder::new(&pattern).dot_matches_new_line(true).size_limit(MATCHER_SIZE_LIMIT).build()?;

        trace!("[compile] {:?} {:?} -> /{}/", rule.keyword, rule.key, pattern);

        Ok(CompiledRule { matcher, keyword: rule.keyword, key_segments, value_segments })
    }

    /// Number of capture slots in the key.
    pub(crate) fn slots(&self) -> usize {
        self.key_segments.len() - 1
    }

    pub(crate) fn is_final(&self) -> bool {
        self.keyword.is_final()
    }

    /// Rewrite the leftmost match in `subject`, or `None` if the rule does not
    /// match anywhere.
    pub(crate) fn apply(&self, subject: &str) -> Option<Result<String>> {
        let captures = self.matcher.captures(subject)?;
        let whole = captures.get(0)?;
        Some(self.replacement(&captures).map(|replacement| {
            let mut out = String::with_capacity(subject.len() - whole.len() + replacement.len());
            out.push_str(&subject[..whole.start()]);
            out.push_str(&replacement);
            out.push_str(&subject[whole.end()..]);
            out
        }))
    }

    fn replacement(&self, captures: &Captures<'_>) -> Result<String> {
        let mut out = self.value_segments[0].clone();
        for (idx, segment) in self.value_segments.iter().enumerate().skip(1) {
            let group = match self.slots().min(idx) {
                0 => MISSING_GROUP,
                n => captures.get(n).map_or("", |m| m.as_str()),
            };
            out.push_str(&render_group(self.keyword, group)?);
            out.push_str(segment);
        }
        Ok(out)
    }

    pub(crate) fn view(&self) -> RuleView<'_> {
        RuleView {
            key_segments: &self.key_segments,
            value_segments: &self.value_segments,
            slot: self.keyword.slot_kind(),
            is_final: self.is_final(),
        }
    }
}

fn unescape_segments(text: &str) -> Result<Vec<String>> {
    split_unescaped(text, |c| c == '%').into_iter().map(unescape).collect()
}

/// Render captured text the way the rule's keyword asks for.
fn render_group(keyword: Keyword, group: &str) -> Result<Cow<'_, str>> {
    match keyword {
        Keyword::Chr => group
            .parse::<u32>()
            .ok()
            .and_then(char::from_u32)
            .map(|c| Cow::Owned(c.to_string()))
            .ok_or_else(|| Error::InvalidCodePoint(group.to_string())),
        Keyword::Ord => Ok(Cow::Owned(group.chars().next().map(|c| u32::from(c).to_string()).unwrap_or_default())),
        Keyword::Plain | Keyword::Fin => Ok(Cow::Borrowed(group)),
    }
}

/// Read-only view of a compiled rule, in unescaped form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuleView<'a> {
    /// Literal runs of the key; there is a capture slot between each pair.
    pub key_segments: &'a [String],
    /// Literal runs of the replacement; a group is spliced between each pair.
    pub value_segments: &'a [String],
    pub slot: SlotKind,
    pub is_final: bool,
}

impl RuleView<'_> {
    pub fn slots(&self) -> usize {
        self.key_segments.len() - 1
    }
}
