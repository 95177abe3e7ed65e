//! End-to-end tests for the parse orchestrator: metadata, typed parameters,
//! prefix shorthand, and error propagation.
//!
//! Pipe and alias specifics live in `pipe.rs` and `alias.rs`.

mod common;

use common::{Harness, args};
use svd_core::params::render_arguments;
use svd_core::{
    FetchError, ParamValue, ParseError, Tokenized, TokenizeError, Variant, to_pretty_json,
};

// ─── Plain commands ──────────────────────────────────────────────────────────

#[test]
fn plain_command_keeps_raw_arguments() {
    let h = Harness::new();
    let cmd = h.parser().parse("ping", &args("hello  there")).unwrap();
    assert_eq!(cmd.invocation, "ping");
    assert_eq!(cmd.metadata.name, "ping");
    assert_eq!(cmd.metadata.cooldown_ms, 5000);
    assert_eq!(cmd.raw_arguments, vec!["hello", "", "there"]);
    assert_eq!(cmd.arguments, vec!["hello", "there"]);
    assert!(cmd.parameters.is_empty());
    assert_eq!(cmd.variant, Variant::None);
}

#[test]
fn command_alias_names_resolve_to_the_canonical_command() {
    let h = Harness::new();
    let cmd = h.parser().parse("PENG", &[]).unwrap();
    assert_eq!(cmd.invocation, "PENG");
    assert_eq!(cmd.metadata.name, "ping");
}

#[test]
fn parse_line_strips_one_prefix() {
    let h = Harness::new();
    let cmd = h.parser().parse_line("$rw words:3 extra").unwrap();
    assert_eq!(cmd.invocation, "rw");
    assert_eq!(cmd.parameters["words"].as_f64(), Some(3.0));
    assert_eq!(cmd.arguments, vec!["extra"]);
}

// ─── Typed parameters ────────────────────────────────────────────────────────

#[test]
fn number_and_boolean_parameters() {
    let h = Harness::new();
    let cmd = h
        .parser()
        .parse("remind", &args("private:true at:2024-05-01 buy milk"))
        .unwrap();
    assert_eq!(cmd.parameters["private"].as_bool(), Some(true));
    match &cmd.parameters["at"] {
        ParamValue::Date(d) => assert_eq!(d.to_rfc3339(), "2024-05-01T00:00:00+00:00"),
        other => panic!("expected a date, got {other:?}"),
    }
    assert_eq!(cmd.arguments, vec!["buy", "milk"]);
}

#[test]
fn language_parameters_resolve_codes_and_names() {
    let h = Harness::new();
    let cmd = h
        .parser()
        .parse("translate", &args("from:german to:EN guten tag"))
        .unwrap();
    let ParamValue::Language(from) = &cmd.parameters["from"] else {
        panic!("expected a language");
    };
    assert_eq!(from.code, "de");
    let ParamValue::Language(to) = &cmd.parameters["to"] else {
        panic!("expected a language");
    };
    assert_eq!(to.name, "English");
}

#[test]
fn unknown_language_is_a_tokenize_error() {
    let h = Harness::new();
    let err = h
        .parser()
        .parse("translate", &args("to:klingon hello"))
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::Tokenize(TokenizeError::InvalidValue { ref name }) if name == "to"
    ));
    assert_eq!(err.to_string(), "could not parse parameter `to`");
}

#[test]
fn regex_parameter_compiles_with_flags() {
    let h = Harness::new();
    let cmd = h.parser().parse("rl", &args("regex:/^a.c$/i")).unwrap();
    let ParamValue::Regex(re) = &cmd.parameters["regex"] else {
        panic!("expected a regex");
    };
    assert_eq!(re.source(), "^a.c$");
    assert_eq!(re.flags(), "i");
    assert!(re.regex().is_match("ABC"));
}

#[test]
fn invalid_regex_is_a_tokenize_error() {
    let h = Harness::new();
    assert!(matches!(
        h.parser().parse("rl", &args("regex:/(/")),
        Err(ParseError::Tokenize(TokenizeError::InvalidValue { .. }))
    ));
}

#[test]
fn object_parameters_accumulate_across_occurrences() {
    let h = Harness::new();
    let cmd = h
        .parser()
        .parse("news", &args(r#"filter:lang=en filter:"topic=rust lang" today"#))
        .unwrap();
    let map = cmd.parameters["filter"].as_object().unwrap();
    assert_eq!(map["lang"], "en");
    assert_eq!(map["topic"], "rust lang");
    assert_eq!(cmd.arguments, vec!["today"]);
}

#[test]
fn duplicate_object_key_is_an_error() {
    let h = Harness::new();
    let err = h
        .parser()
        .parse("news", &args("filter:lang=en filter:lang=de"))
        .unwrap_err();
    assert!(matches!(
        err,
        ParseError::Tokenize(TokenizeError::DuplicateKey { ref key, .. }) if key == "lang"
    ));
}

#[test]
fn implicit_empty_string_is_rejected_but_quoted_empty_is_not() {
    let h = Harness::new();
    assert!(h.parser().parse("news", &args("source: x")).is_err());

    let cmd = h.parser().parse("news", &args(r#"source:"" x"#)).unwrap();
    assert_eq!(cmd.parameters["source"].as_str(), Some(""));
    assert_eq!(cmd.arguments, vec!["x"]);
}

#[test]
fn unclosed_quote_aborts_the_parse() {
    let h = Harness::new();
    let err = h
        .parser()
        .parse("news", &args(r#"source:"bbc world"#))
        .unwrap_err();
    assert_eq!(err.to_string(), "unclosed quoted parameter `source`");
}

#[test]
fn double_dash_passes_the_rest_through() {
    let h = Harness::new();
    let cmd = h
        .parser()
        .parse("news", &args("source:bbc -- filter:x=y c"))
        .unwrap();
    assert_eq!(cmd.parameters.len(), 1);
    assert_eq!(cmd.arguments, vec!["filter:x=y", "c"]);
}

#[test]
fn rendered_arguments_parse_to_the_same_result() {
    let h = Harness::new();
    let parser = h.parser();
    let first = parser
        .parse(
            "news",
            &args(r#"source:"the \"daily\" post" filter:a=1 word -- source:x"#),
        )
        .unwrap();

    let rendered = render_arguments(
        &first.metadata.params,
        &Tokenized {
            arguments: first.arguments.clone(),
            parameters: first.parameters.clone(),
        },
    );
    let second = parser.parse("news", &rendered).unwrap();
    assert_eq!(second.arguments, first.arguments);
    assert_eq!(second.parameters, first.parameters);
}

// ─── Failures ────────────────────────────────────────────────────────────────

#[test]
fn unknown_command_is_a_fetch_error() {
    let h = Harness::new();
    let err = h.parser().parse("nope", &[]).unwrap_err();
    assert!(matches!(err, ParseError::Fetch(FetchError::Api { .. })));
}

#[test]
fn empty_invocation_is_rejected_without_a_lookup() {
    let h = Harness::new();
    assert!(matches!(
        h.parser().parse("", &args("x")),
        Err(ParseError::EmptyInvocation)
    ));
    assert!(h.source.calls().is_empty());
}

// ─── Serialization ───────────────────────────────────────────────────────────

#[test]
fn pretty_json_uses_camel_case_and_tagged_variants() {
    let h = Harness::new();
    let cmd = h.parser().parse("rw", &args("words:2 x")).unwrap();
    let json: serde_json::Value = serde_json::from_str(&to_pretty_json(&cmd).unwrap()).unwrap();
    assert_eq!(json["invocation"], "rw");
    assert_eq!(json["metadata"]["name"], "randomword");
    assert_eq!(json["rawArguments"], serde_json::json!(["words:2", "x"]));
    assert_eq!(json["parameters"]["words"], 2.0);
    assert_eq!(json["variant"]["kind"], "none");
}
