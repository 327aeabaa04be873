//! Statement parser.
//!
//! Turns program source into its three raw ingredients:
//!
//! ```text
//! "str abc;rep X=1,2;fin aXb=Y;just a comment"
//!   │
//!   ├─ str abc        -> initial string "abc"
//!   ├─ rep X=1,2      -> MetaRule { token: "X", values: "1,2" }
//!   ├─ fin aXb=Y      -> RawRule { key: "aXb", value: "Y", keyword: Fin }
//!   └─ just a comment -> ignored (no unescaped '=')
//! ```
//!
//! Keys and values stay escaped here. Meta-rule expansion works on the raw
//! text and the compiler unescapes each `%` segment afterwards.

use super::lexer::{split_key_value, split_unescaped, unescape, utf16_len};
use crate::{Error, Keyword, MetaRule, Options, RawRule, Result};

/// Raw output of the statement pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ParsedSource {
    pub initial: String,
    pub rules: Vec<RawRule>,
    pub meta_rules: Vec<MetaRule>,
    /// Number of statements the source split into, comments included.
    pub statements: usize,
}

/// What a three-letter key prefix selects.
enum Prefix {
    Meta,
    Rule(Keyword),
}

fn keyword_prefix(word: &str) -> Result<Prefix> {
    match word {
        "rep" | "for" => Ok(Prefix::Meta),
        "fin" => Ok(Prefix::Rule(Keyword::Fin)),
        "chr" => Ok(Prefix::Rule(Keyword::Chr)),
        "ord" => Ok(Prefix::Rule(Keyword::Ord)),
        other => Err(Error::UndefinedKeyword(other.to_string())),
    }
}

/// Split `source` into statements and sort them into rules, meta-rules and
/// the initial string.
pub(crate) fn parse_statements(source: &str, options: &Options) -> Result<ParsedSource> {
    let statements = split_unescaped(source, |c| c == ';' || c == '\n');
    let mut initial: Option<String> = None;
    let mut rules: Vec<RawRule> = Vec::new();
    let mut meta_rules: Vec<MetaRule> = Vec::new();

    for statement in &statements {
        if let Some(rest) = statement.strip_prefix("str ") {
            if initial.is_some() {
                return Err(Error::MultipleStr);
            }
            initial = Some(unescape(rest)?);
            continue;
        }

        let Some((key, value)) = split_key_value(statement) else {
            continue;
        };

        let (prefix, key) = if regex!(r"^[a-z]{3} ").is_match(key) {
            (keyword_prefix(&key[..3])?, &key[4..])
        } else {
            (Prefix::Rule(Keyword::Plain), key)
        };

        match prefix {
            Prefix::Meta => {
                if meta_rules.len() >= options.max_meta_rules {
                    return Err(Error::TooManyMetaRules);
                }
                meta_rules.push(MetaRule { token: key.to_string(), values: value.to_string() });
            }
            Prefix::Rule(keyword) => {
                if rules.len() >= options.max_rules {
                    return Err(Error::TooManyRules);
                }
                rules.push(RawRule { key: key.to_string(), value: value.to_string(), keyword });
            }
        }
    }

    let initial = initial.unwrap_or_default();
    if utf16_len(&initial) > options.max_string_size {
        return Err(Error::StringTooLong);
    }

    trace!(
        "[parse] statements={} rules={} meta_rules={} initial_len={}",
        statements.len(),
        rules.len(),
        meta_rules.len(),
        initial.len()
    );

    Ok(ParsedSource { initial, rules, meta_rules, statements: statements.len() })
}
