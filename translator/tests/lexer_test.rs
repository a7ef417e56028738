use stackharv_translator::lexer::{TokenKind, tokenize};

#[test]
fn test_keywords_and_idents() {
    let toks = tokenize("func main while x y1 _tmp printInt").unwrap();
    let kinds: Vec<TokenKind> = toks.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Keyword,
            TokenKind::Ident,
            TokenKind::Keyword,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Ident,
            TokenKind::Keyword,
        ]
    );
}

#[test]
fn test_integers_and_punctuation() {
    let toks = tokenize("x = 42 + 7;").unwrap();
    let values: Vec<&str> = toks.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["x", "=", "42", "+", "7", ";"]);
    assert_eq!(toks[2].kind, TokenKind::Int);
}

#[test]
fn test_two_char_operators_lex_as_one_token() {
    let toks = tokenize("a <= b == c").unwrap();
    let values: Vec<&str> = toks.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["a", "<=", "b", "==", "c"]);
}

#[test]
fn test_string_literal_has_no_escapes() {
    let toks = tokenize(r#"print("hi there");"#).unwrap();
    assert_eq!(toks[2].kind, TokenKind::Str);
    assert_eq!(toks[2].value, "hi there");
}

#[test]
fn test_line_comment_is_skipped() {
    let toks = tokenize("x // the rest is gone\ny").unwrap();
    let values: Vec<&str> = toks.iter().map(|t| t.value.as_str()).collect();
    assert_eq!(values, vec!["x", "y"]);
    assert_eq!(toks[1].line, 2);
}

#[test]
fn test_unexpected_character_reports_position() {
    let err = tokenize("x = 1;\n  @").unwrap_err();
    assert_eq!(err.ch, '@');
    assert_eq!(err.line, 2);
    assert_eq!(err.col, 3);
}
