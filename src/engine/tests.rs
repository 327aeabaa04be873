use crate::{Error, Halt, Options, SlotKind, compile, run};

/// Drain a run, returning every snapshot and the terminal error, if any.
fn snapshots(source: &str, options: &Options) -> (Vec<String>, Option<Error>) {
    let mut out = Vec::new();
    for item in run(source, options).unwrap() {
        match item {
            Ok(snapshot) => out.push(snapshot),
            Err(err) => return (out, Some(err)),
        }
    }
    (out, None)
}

fn ok(source: &str) -> Vec<String> {
    let (out, err) = snapshots(source, &Options::default());
    assert_eq!(err, None, "program {source:?} failed");
    out
}

#[test]
fn program_examples() {
    // (program, expected snapshots)
    let cases: Vec<(&str, &[&str])> = vec![
        ("", &[""]),
        ("str hello", &["hello"]),
        ("str hello;just some words", &["hello"]),
        ("str abc;a=x", &["abc", "xbc"]),
        ("str aa;fin a=b", &["aa", "ba"]),
        ("str aa;a=b", &["aa", "ba", "bb"]),
        // Unary addition.
        ("str 11+111;1+=+1;+=", &["11+111", "1+1111", "+11111", "11111"]),
        // Binary to unary.
        (
            "str 101;|0=0||;1=0|;0=",
            &["101", "0|01", "00||1", "00||0|", "00|0|||", "000|||||", "00|||||", "0|||||", "|||||"],
        ),
        // Escaped separators and newlines.
        ("str a\\;b\\nc;\\;=\\=", &["a;b\nc", "a=b\nc"]),
        ("str x y;\\ =_", &["x y", "x_y"]),
        // Statements separated by real newlines.
        ("str ab\nb=c\na=b", &["ab", "ac", "bc", "cc"]),
    ];

    for (source, expected) in cases {
        let (out, err) = snapshots(source, &Options::default());
        assert_eq!(err, None, "program {source:?}");
        assert_eq!(out, expected, "program {source:?}");
    }
}

#[test]
fn rule_without_matches_is_a_noop() {
    assert_eq!(ok("str abc;z=y"), vec!["abc"]);
    assert_eq!(ok("z=y"), vec![""]);
}

#[test]
fn final_rule_stops_even_if_it_still_matches() {
    let mut run = run("str aa;fin a=b", &Options::default()).unwrap();
    assert_eq!(run.by_ref().map(Result::unwrap).collect::<Vec<_>>(), vec!["aa", "ba"]);
    assert_eq!(run.halt(), Some(Halt::FinalRule));
}

#[test]
fn earlier_rule_wins_regardless_of_match_position() {
    // Rule 0 matches at the end, rule 1 at the start: rule 0 is applied.
    assert_eq!(ok("str ab;b=B;a=A"), vec!["ab", "aB", "AB"]);
    // Within one rule, the leftmost occurrence is rewritten.
    assert_eq!(ok("str xaxa;fin a=b"), vec!["xaxa", "xbxa"]);
}

#[test]
fn meta_rule_clones_matching_rules() {
    let program = compile("rep X=1,2;str aXb;aXb=Y", &Options::default()).unwrap();
    assert_eq!(program.len(), 2);

    let keys: Vec<Vec<String>> = program.rules().map(|r| r.key_segments.to_vec()).collect();
    assert_eq!(keys, vec![vec!["a1b".to_string()], vec!["a2b".to_string()]]);
    assert_eq!(program.metrics().rules_parsed, 1);
    assert_eq!(program.metrics().meta_rules, 1);
    assert_eq!(program.metrics().rules_expanded, 2);

    // The initial string is not touched by expansion: "aXb" matches neither clone.
    assert_eq!(ok("rep X=1,2;str aXb;aXb=Y"), vec!["aXb"]);
    assert_eq!(ok("rep X=1,2;str a2b;aXb=Y"), vec!["a2b", "Y"]);
}

#[test]
fn empty_meta_token_clones_every_rule() {
    let program = compile("str 1b1;rep =1,2;fin b=c", &Options::default()).unwrap();
    let keys: Vec<Vec<String>> = program.rules().map(|r| r.key_segments.to_vec()).collect();
    assert_eq!(keys, vec![vec!["1b1".to_string()], vec!["2b2".to_string()]]);

    assert_eq!(ok("str 1b1;rep =1,2;fin b=c"), vec!["1b1", "1c1"]);
    // The plain key no longer exists after expansion.
    assert_eq!(ok("str ab;rep =1,2;fin b=c"), vec!["ab"]);
}

#[test]
fn meta_rule_builds_a_character_table() {
    let source = "for D=0,1,2,3,4,5,6,7,8,9;str 2024;fin D=<D>";
    assert_eq!(ok(source), vec!["2024", "2<0>24"]);

    let program = compile(source, &Options::default()).unwrap();
    assert_eq!(program.len(), 10);
    assert!(program.rules().all(|r| r.is_final));
}

#[test]
fn ord_and_chr_round_trip_a_character() {
    assert_eq!(ok("str <A>;ord <%>=[%]"), vec!["<A>", "[65]"]);
    assert_eq!(ok("str [65];chr [%]=%"), vec!["[65]", "A"]);

    let program = compile("chr [%]=%", &Options::default()).unwrap();
    assert_eq!(program.rules().next().map(|r| r.slot), Some(SlotKind::Digits));
}

#[test]
fn zero_slot_keys_emit_literal_percent() {
    // The key has no `%`, so each extra value segment gets a literal `%`.
    assert_eq!(ok("str a;fin a=1%2"), vec!["a", "1%2"]);
    assert_eq!(ok("str a;fin a=1\\%2"), vec!["a", "1%2"]);
}

#[test]
fn iteration_ceiling_is_exact() {
    for max_iterations in [0, 1, 5, 50] {
        let options = Options { max_iterations, ..Options::default() };
        let (out, err) = snapshots("str x;x=x", &options);
        assert_eq!(err, Some(Error::TooManyIterations));
        assert_eq!(out.len(), max_iterations + 1);
    }
}

#[test]
fn iteration_ceiling_applies_even_if_the_run_would_halt_next() {
    let options = Options { max_iterations: 2, ..Options::default() };
    let (out, err) = snapshots("str aa;a=b", &options);
    assert_eq!(out, vec!["aa", "ba", "bb"]);
    assert_eq!(err, Some(Error::TooManyIterations));

    let options = Options { max_iterations: 3, ..Options::default() };
    assert_eq!(snapshots("str aa;a=b", &options), (vec!["aa".into(), "ba".into(), "bb".into()], None));
}

#[test]
fn size_ceiling_counts_utf16_units() {
    let options = Options { max_string_size: 4, ..Options::default() };
    let (out, err) = snapshots("str 😀;fin 😀=😀😀", &options);
    assert_eq!(out, vec!["😀", "😀😀"]);
    assert_eq!(err, None);

    let (out, err) = snapshots("str 😀;😀=😀😀", &options);
    assert_eq!(out, vec!["😀", "😀😀"]);
    assert_eq!(err, Some(Error::StringBecameTooLong));
}

#[test]
fn runs_are_lazy() {
    // Would run forever without a ceiling; pulling a few items must be cheap.
    let options = Options { max_iterations: usize::MAX, max_string_size: usize::MAX, ..Options::default() };
    let mut run = run("=a", &options).unwrap();
    let head: Vec<String> = run.by_ref().take(4).map(Result::unwrap).collect();
    assert_eq!(head, vec!["", "a", "aa", "aaa"]);
    assert_eq!(run.steps(), 3);
    assert!(!run.is_finished());
}

#[test]
fn compile_errors_come_before_any_snapshot() {
    let cases: Vec<(&str, Error)> = vec![
        ("str a;str b", Error::MultipleStr),
        ("xyz a=b", Error::UndefinedKeyword("xyz".into())),
        ("a=b\\", Error::TrailingBackslash),
        ("str a\\", Error::TrailingBackslash),
        ("X=a;rep X=1\\", Error::TrailingBackslash),
    ];
    for (source, expected) in cases {
        assert_eq!(run(source, &Options::default()).err(), Some(expected), "program {source:?}");
    }
}

#[test]
fn limit_errors_from_compilation() {
    let options = Options { max_rules: 2, max_meta_rules: 1, max_string_size: 3, ..Options::default() };
    let cases: Vec<(&str, Error)> = vec![
        ("a=b;b=c;c=d", Error::TooManyRules),
        ("rep A=1;rep B=2", Error::TooManyMetaRules),
        ("str abcd", Error::StringTooLong),
        ("rep X=1,2;X=a;Xb=c", Error::TooManyRulesFromMetaRule { rule: "X=a".into() }),
    ];
    for (source, expected) in cases {
        assert_eq!(compile(source, &options).err(), Some(expected), "program {source:?}");
    }

    // One rule below the ceiling may still clone past it.
    let program = compile("rep X=1,2,3;X=a", &options).unwrap();
    assert_eq!(program.len(), 3);
}

#[test]
fn invalid_code_point_ends_the_run() {
    let (out, err) = snapshots("str 55296;chr %=%", &Options::default());
    assert_eq!(out, vec!["55296"]);
    assert_eq!(err, Some(Error::InvalidCodePoint("55296".into())));
}
