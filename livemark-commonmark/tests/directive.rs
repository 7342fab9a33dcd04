use livemark_commonmark::DirectiveAttributes;

#[test]
fn test_explicit_pairs_round_trip() {
  let inputs = [
    r#"jsx template="react" autorun="false""#,
    r#"ts title="hello world" template="vanilla-ts""#,
    r#"js a="" b="x=y" c="<tag>""#,
  ];

  for input in inputs {
    let attrs = DirectiveAttributes::parse(input);
    let reparsed = DirectiveAttributes::parse(&attrs.to_attribute_string());
    assert_eq!(
      reparsed.iter().collect::<Vec<_>>(),
      attrs.iter().collect::<Vec<_>>(),
      "round trip failed for {input:?}"
    );
  }
}

#[test]
fn test_lang_is_first_whitespace_delimited_token() {
  let cases = [
    ("jsx template=\"react\"", Some("jsx")),
    ("rust", Some("rust")),
    ("c++\tmore", Some("c++")),
    ("", None),
  ];
  for (input, expected) in cases {
    assert_eq!(DirectiveAttributes::parse(input).lang(), expected);
  }
}

#[test]
fn test_pair_without_language_is_also_the_lang_token() {
  // The positional token is taken verbatim, even when it is itself a pair
  let attrs = DirectiveAttributes::parse(r#"template="react""#);
  assert_eq!(attrs.template(), Some("react"));
  assert_eq!(attrs.lang(), Some(r#"template="react""#));
}

#[test]
fn test_malformed_fragments_are_ignored() {
  let attrs =
    DirectiveAttributes::parse(r#"js template=react autorun="false broken="x""#);
  assert_eq!(attrs.template(), None);
  // `autorun="false broken="` is the only quoted pair the pattern sees
  assert_eq!(attrs.get("autorun"), Some("false broken="));
  assert!(attrs.autorun());
}
