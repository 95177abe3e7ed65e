//! Pipe decomposition through the full parser.

mod common;

use common::{Harness, args};
use svd_core::pipe::Delimiter;
use svd_core::{FetchError, ParseError, PipeSlot};

fn invocations(slots: &[PipeSlot]) -> Vec<&str> {
    slots.iter().map(PipeSlot::invocation).collect()
}

#[test]
fn spaced_pipe_splits_and_parses_each_segment() {
    let h = Harness::new();
    let cmd = h.parser().parse("pipe", &args("rw words:2 | tt fancy")).unwrap();
    let pipe = cmd.pipe().unwrap();
    assert_eq!(pipe.delimiter, Delimiter::Pipe);
    assert_eq!(invocations(&pipe.subcommands), vec!["rw", "tt"]);

    let rw = pipe.subcommands[0].command().unwrap();
    assert_eq!(rw.parameters["words"].as_f64(), Some(2.0));
    let tt = pipe.subcommands[1].command().unwrap();
    assert_eq!(tt.metadata.name, "texttransform");
    assert_eq!(tt.arguments, vec!["fancy"]);
}

#[test]
fn nested_pipe_is_deferred_in_place() {
    let h = Harness::new();
    let cmd = h
        .parser()
        .parse("pipe", &args("ping | pipe rw | tt | tt fancy"))
        .unwrap();
    let slots = &cmd.pipe().unwrap().subcommands;
    assert_eq!(invocations(slots), vec!["ping", "pipe", "tt", "tt"]);
    match &slots[1] {
        PipeSlot::Deferred { invocation, args } => {
            assert_eq!(invocation, "pipe");
            assert_eq!(args, &vec!["rw".to_owned()]);
        }
        other => panic!("expected a deferred slot, got {other:?}"),
    }
    // The deferred pipe's own segments are never looked up.
    assert!(!h.source.calls().contains(&"command:rw".to_owned()));
}

#[test]
fn pipe_alias_name_decomposes_too() {
    let h = Harness::new();
    let cmd = h.parser().parse_line("$| ping | ping").unwrap();
    assert_eq!(cmd.invocation, "|");
    assert_eq!(invocations(&cmd.pipe().unwrap().subcommands), vec!["ping", "ping"]);
}

#[test]
fn custom_char_overrides_detection() {
    let h = Harness::new();
    let cmd = h
        .parser()
        .parse("pipe", &args("_char:; rw words:2; tt a | b"))
        .unwrap();
    let pipe = cmd.pipe().unwrap();
    assert_eq!(pipe.delimiter, Delimiter::Custom(";".into()));
    assert_eq!(invocations(&pipe.subcommands), vec!["rw", "tt"]);
    assert_eq!(
        pipe.subcommands[1].command().unwrap().arguments,
        vec!["a", "|", "b"]
    );
}

#[test]
fn brackets_win_when_strictly_more_frequent() {
    let h = Harness::new();
    let cmd = h
        .parser()
        .parse("pipe", &args("tt a | b > ping > ping"))
        .unwrap();
    let pipe = cmd.pipe().unwrap();
    assert_eq!(pipe.delimiter, Delimiter::Bracket);
    assert_eq!(invocations(&pipe.subcommands), vec!["tt", "ping", "ping"]);
}

#[test]
fn ties_prefer_the_pipe_character() {
    let h = Harness::new();
    let cmd = h
        .parser()
        .parse("pipe", &args("ping | tt a > b > c | ping"))
        .unwrap();
    let pipe = cmd.pipe().unwrap();
    assert_eq!(pipe.delimiter, Delimiter::Pipe);
    assert_eq!(
        pipe.subcommands[1].command().unwrap().arguments,
        vec!["a", ">", "b", ">", "c"]
    );
}

#[test]
fn isolated_characters_split_and_doubled_ones_stay_literal() {
    let h = Harness::new();
    let cmd = h.parser().parse("pipe", &args("tt a||b|ping>tt")).unwrap();
    let pipe = cmd.pipe().unwrap();
    assert_eq!(pipe.delimiter, Delimiter::Isolated);
    assert_eq!(invocations(&pipe.subcommands), vec!["tt", "ping", "tt"]);
    assert_eq!(pipe.subcommands[0].command().unwrap().arguments, vec!["a||b"]);
}

#[test]
fn alias_segments_are_expanded() {
    let h = Harness::new();
    let cmd = h.parser().parse("pipe", &args("$fish 3 | tt")).unwrap();
    let fish = cmd.pipe().unwrap().subcommands[0].command().unwrap();
    let alias = fish.alias().unwrap();
    assert_eq!(alias.alias_name, "fish");
    assert_eq!(
        alias.command_equivalent.parsed.parameters["words"].as_f64(),
        Some(3.0)
    );
}

#[test]
fn a_failing_segment_fails_the_whole_pipe() {
    let h = Harness::new();
    let err = h.parser().parse("pipe", &args("ping | nope | tt")).unwrap_err();
    assert!(matches!(err, ParseError::Fetch(FetchError::Api { .. })));
    // Segments after the failure are not looked at.
    assert!(!h.source.calls().contains(&"command:tt".to_owned()));
}

#[test]
fn trailing_delimiter_leaves_an_empty_segment() {
    let h = Harness::new();
    assert!(matches!(
        h.parser().parse("pipe", &args("ping |")),
        Err(ParseError::EmptyInvocation)
    ));
}

#[test]
fn pipe_serializes_slots_with_status() {
    let h = Harness::new();
    let cmd = h.parser().parse("pipe", &args("ping | pipe tt")).unwrap();
    let json = serde_json::to_value(&cmd).unwrap();
    assert_eq!(json["variant"]["kind"], "pipe");
    assert_eq!(json["variant"]["delimiter"]["kind"], "pipe");
    assert_eq!(json["variant"]["subcommands"][0]["status"], "resolved");
    assert_eq!(json["variant"]["subcommands"][1]["status"], "deferred");
}
