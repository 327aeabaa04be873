//! Meta-rule expansion.
//!
//! Each `rep`/`for` directive rewrites the whole ordinary-rule list, in source
//! order, before anything is compiled:
//!
//! ```text
//! rep X=1,2
//!
//! aXb=Y    ──▶  a1b=Y      (key contains X: one clone per value)
//!               a2b=Y
//! c=X      ──▶  c=1        (key lacks X: value gets the first value)
//! ```
//!
//! Every pass consumes the previous list and builds a fresh one, so a later
//! meta-rule sees the clones produced by an earlier one.
//!
//! ## Rule ceiling
//!
//! Before cloning a rule into more than one copy, the pass checks that the
//! list it started from is below `max_rules`. The check looks at the length
//! *before* the pass, not the length the pass produces, so the expanded list
//! can end up larger than `max_rules`.

use super::lexer::{split_unescaped, unescape};
use crate::{Error, MetaRule, RawRule, Result};

/// Apply all meta-rules in order.
pub(crate) fn expand(rules: Vec<RawRule>, meta_rules: &[MetaRule], max_rules: usize) -> Result<Vec<RawRule>> {
    meta_rules.iter().try_fold(rules, |rules, meta| apply_meta_rule(rules, meta, max_rules))
}

/// Apply one meta-rule to the full rule list.
fn apply_meta_rule(rules: Vec<RawRule>, meta: &MetaRule, max_rules: usize) -> Result<Vec<RawRule>> {
    let token = unescape(&meta.token)?;
    let values = split_unescaped(&meta.values, |c| c == ',');
    let first = values[0];
    let before = rules.len();

    let mut expanded = Vec::with_capacity(before);
    for rule in rules {
        if !rule.key.contains(token.as_str()) {
            expanded.push(RawRule { value: rule.value.replace(token.as_str(), first), ..rule });
            continue;
        }

        if values.len() > 1 && before >= max_rules {
            return Err(Error::TooManyRulesFromMetaRule { rule: format!("{}={}", rule.key, rule.value) });
        }

        expanded.extend(values.iter().map(|value| RawRule {
            key: rule.key.replace(token.as_str(), value),
            value: rule.value.replace(token.as_str(), value),
            keyword: rule.keyword,
        }));
    }

    trace!("[expand] token={:?} values={} rules {} -> {}", token, values.len(), before, expanded.len());

    Ok(expanded)
}
