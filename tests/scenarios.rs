use xmlscan::{parse_next, Error, Node, ParseState, Position, Reader};

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<!-- generated
     by hand -->
<config env='prod' debug>
  <server host="example.org" port=8080/>
  <motd>Hello &amp; welcome,
   &quot;friend&quot;</motd>
  <empty   />
</config>
"#;

fn newlines(s: &[u8]) -> usize {
    s.iter().filter(|&&ch| ch == b'\n').count()
}

#[test]
fn every_call_makes_progress_and_counts_lines() {
    let mut state = ParseState::new(DOCUMENT.as_bytes());
    let mut units = 0;
    while !state.is_eof() {
        let before = state.position();
        parse_next(&mut state).unwrap();
        let consumed = &DOCUMENT.as_bytes()[before.offset..state.offset()];
        assert!(!consumed.is_empty());
        assert_eq!(state.line(), before.line + newlines(consumed));
        units += 1;
    }
    assert_eq!(units, 16);
    assert_eq!(state.line(), 1 + newlines(DOCUMENT.as_bytes()));
}

#[test]
fn reads_a_small_config() {
    let mut reader = Reader::from_str(DOCUMENT);
    reader.skip_blank_text(true);
    let nodes = reader.collect::<Result<Vec<_>, _>>().unwrap();

    let tags: Vec<_> = nodes.iter().filter_map(Node::as_tag).collect();
    let names: Vec<_> = tags.iter().map(|tag| tag.name()).collect();
    let expected: [&[u8]; 7] = [
        b"?xml", b"config", b"server", b"motd", b"/motd", b"empty", b"/config",
    ];
    assert_eq!(names, expected);

    let config = tags[1];
    assert_eq!(config.get("env"), Some(&b"prod"[..]));
    assert_eq!(config.get("debug"), Some(&b"debug"[..]));

    let server = tags[2];
    assert!(server.is_self_closing());
    assert_eq!(server.get("port"), Some(&b"8080"[..]));
    assert!(tags[5].is_self_closing());

    let comment = nodes[1].as_comment().unwrap();
    assert_eq!(comment.text(), b" generated\n     by hand ");

    let motd = nodes
        .iter()
        .filter_map(Node::as_text)
        .next()
        .unwrap();
    assert_eq!(motd.content(), b"Hello & welcome,\n   \"friend\"");
}

#[test]
fn scenario_tag_with_attribute() {
    let mut state = ParseState::new(b"<tag attr=\"val\">");
    let node = parse_next(&mut state).unwrap();
    let tag = node.as_tag().unwrap();
    assert_eq!(tag.name(), b"tag");
    assert_eq!(tag.get("attr"), Some(&b"val"[..]));
    assert_eq!(tag.attributes().len(), 1);
    assert!(!tag.is_self_closing());
    assert_eq!(state.position(), Position { offset: 16, line: 1 });
}

#[test]
fn scenario_text_before_tag() {
    let mut state = ParseState::new(b"plain text<end>");
    let node = parse_next(&mut state).unwrap();
    assert_eq!(node.as_text().unwrap().content(), b"plain text");
    assert_eq!(state.offset(), 10);
    assert_eq!(state.remaining(), b"<end>");
}

#[test]
fn scenario_unterminated_quote() {
    let mut state = ParseState::new(b"<tag attr=\"unterminated");
    let err = parse_next(&mut state).unwrap_err();
    assert!(matches!(err, Error::UnclosedQuotedValue { .. }));
    assert_eq!(err.position(), Position { offset: 10, line: 1 });
    assert_eq!(
        err.to_string(),
        "unclosed quote in <tag attr= at line 1, offset 10"
    );
    // nothing was consumed, so the same error comes back
    assert_eq!(parse_next(&mut state).unwrap_err(), err);
}

#[test]
fn shared_buffer_independent_states() {
    let buffer = b"<a/><b/>";
    let mut first = ParseState::new(buffer);
    let mut second = ParseState::new(buffer);
    parse_next(&mut first).unwrap();
    parse_next(&mut first).unwrap();
    assert!(first.is_eof());
    assert_eq!(second.offset(), 0);
    let node = parse_next(&mut second).unwrap();
    assert_eq!(node.as_tag().unwrap().name(), b"a");
}
