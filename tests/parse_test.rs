//! End-to-end grammar scenarios: author a specification, compile it once,
//! and run it against real inputs.

use pretty_assertions::assert_eq;
use tracing::debug;

use peglet::prelude::*;
use peglet::Spec;

/// Opt-in log output for debugging, e.g. `RUST_LOG=peglet=debug`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn whitespace() -> Spec {
    many(choice(vec![ch(' '), ch('\t'), ch('\r'), ch('\n')])).skip()
}

fn digit() -> Spec {
    range('0', '9')
}

/// Signed integer: optional sign, one or more digits, text-accumulated.
fn number() -> Spec {
    tuple(vec![optional(choice(vec![ch('+'), ch('-')])), many1(digit())])
        .text()
        .tag("number")
}

#[test]
fn it_parses_a_signed_number() {
    init_tracing();
    let grammar = number().compile().unwrap();

    let value = grammar.parse_str("-42").unwrap();
    debug!("{value:?}");
    assert_eq!(value.tag(), Some("number"));
    assert_eq!(value.to_text(), "-42");

    let value = grammar.parse_str("7").unwrap();
    assert_eq!(value.to_text(), "7");

    assert!(grammar.parse_str("abc").is_err());
}

#[test]
fn it_parses_an_iso_date_with_fixed_width_fields() {
    init_tracing();
    let dash = ch('-').skip();
    let grammar = tuple(vec![
        times(4, digit()).text().tag("year"),
        dash.clone(),
        times(2, digit()).text().tag("month"),
        dash,
        times(2, digit()).text().tag("day"),
    ])
    .compile()
    .unwrap();

    let value = grammar.parse_str("2026-08-30").unwrap();
    let Value::Seq(fields) = value else {
        panic!("expected a sequence of date fields");
    };
    assert_eq!(fields.len(), 3);
    assert_eq!(fields[0].tag(), Some("year"));
    assert_eq!(fields[0].to_text(), "2026");
    assert_eq!(fields[1].tag(), Some("month"));
    assert_eq!(fields[1].to_text(), "08");
    assert_eq!(fields[2].tag(), Some("day"));
    assert_eq!(fields[2].to_text(), "30");

    let failure = grammar.parse_str("2026-8-30").unwrap_err();
    assert!(failure.message.contains("child 2"));
}

#[test]
fn it_parses_a_comma_separated_list_of_numbers() {
    let item = number();
    let rest = many(tuple(vec![
        whitespace(),
        ch(',').skip(),
        whitespace(),
        item.clone(),
    ]));
    let grammar = tuple(vec![item, rest]).compile().unwrap();

    let value = grammar.parse_str("1, -2,  +30").unwrap();
    assert_eq!(value.to_text(), "1-2+30");
}

#[test]
fn it_keeps_whitespace_out_of_results() {
    let grammar = tuple(vec![whitespace(), digit(), whitespace(), digit()])
        .compile()
        .unwrap();

    assert_eq!(
        grammar.parse_str("  \r\n   33"),
        Ok(Value::Seq(vec![Value::Char('3'), Value::Char('3')]))
    );
}

#[test]
fn it_prefers_earlier_alternatives() {
    let keyword = choice(vec![
        lit("let").tag("let"),
        lit("letrec").tag("letrec"),
    ]);
    let grammar = keyword.compile().unwrap();

    // No longest-match rule: "let" wins even though "letrec" would fit.
    let mut source = CharSource::from("letrec");
    let value = grammar.parse(&mut source).unwrap();
    assert_eq!(value.tag(), Some("let"));
    assert_eq!(source.read(), Some('r'));
}

#[test]
fn it_reports_the_failure_of_the_last_alternative() {
    let grammar = choice(vec![lit("foo"), lit("bar")])
        .compile()
        .unwrap();
    let failure = grammar.parse_str("baz").unwrap_err();
    assert!(failure.message.contains("\"bar\""));
}

#[test]
fn it_parses_case_insensitive_keywords() {
    let grammar = lit("SELECT").case_insensitive().tag("kw").compile().unwrap();
    assert_eq!(grammar.parse_str("select").unwrap().to_text(), "select");
    assert_eq!(grammar.parse_str("Select").unwrap().tag(), Some("kw"));
    assert!(grammar.parse_str("SELEC_").is_err());
}

#[test]
fn it_parses_identifiers_with_excluded_characters() {
    // Lowercase words, but 'q' is not allowed.
    let grammar = many1(range('a', 'z').exclude(['q'])).text().compile().unwrap();
    assert_eq!(grammar.parse_str("parser").unwrap(), Value::Text("parser".into()));
    let failure = grammar.parse_str("quit").unwrap_err();
    assert!(failure.message.contains("required at least one match"));
}

#[test]
fn it_coerces_values_during_post_processing() {
    let grammar = many1(digit())
        .text()
        .coerce(|value| Value::Text(value.to_text().trim_start_matches('0').to_string()))
        .compile()
        .unwrap();
    assert_eq!(grammar.parse_str("007"), Ok(Value::Text("7".into())));
}

#[test]
fn it_parses_the_same_grammar_from_two_sources_independently() {
    let grammar = number().compile().unwrap();
    let mut left = CharSource::from("1x");
    let mut right = CharSource::from("2y");
    assert_eq!(grammar.parse(&mut left).unwrap().to_text(), "1");
    assert_eq!(grammar.parse(&mut right).unwrap().to_text(), "2");
    assert_eq!(left.read(), Some('x'));
    assert_eq!(right.read(), Some('y'));
}
