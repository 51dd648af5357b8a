//! Unit tests for the lexer module.
//!
//! This module contains tests for tokenization including:
//! - Keywords and identifiers
//! - Integer and float literals
//! - String literals with escape sequences
//! - Operators and punctuation
//! - Comments
//! - Line and column tracking
//! - Error cases

use super::{lexer::tokenize, tokens::TokenKind};

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source.to_string(), Some("test.glua".to_string()))
        .unwrap()
        .iter()
        .map(|token| token.kind)
        .collect()
}

#[test]
fn test_tokenize_keywords() {
    let source = "local let var function if then elseif else end while do repeat until for in return break goto and or not nil true false".to_string();
    let tokens = tokenize(source, Some("test.glua".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Local);
    assert_eq!(tokens[1].kind, TokenKind::Let);
    assert_eq!(tokens[2].kind, TokenKind::Var);
    assert_eq!(tokens[3].kind, TokenKind::Function);
    assert_eq!(tokens[4].kind, TokenKind::If);
    assert_eq!(tokens[5].kind, TokenKind::Then);
    assert_eq!(tokens[6].kind, TokenKind::Elseif);
    assert_eq!(tokens[7].kind, TokenKind::Else);
    assert_eq!(tokens[8].kind, TokenKind::End);
    assert_eq!(tokens[9].kind, TokenKind::While);
    assert_eq!(tokens[10].kind, TokenKind::Do);
    assert_eq!(tokens[11].kind, TokenKind::Repeat);
    assert_eq!(tokens[12].kind, TokenKind::Until);
    assert_eq!(tokens[13].kind, TokenKind::For);
    assert_eq!(tokens[14].kind, TokenKind::In);
    assert_eq!(tokens[15].kind, TokenKind::Return);
    assert_eq!(tokens[16].kind, TokenKind::Break);
    assert_eq!(tokens[17].kind, TokenKind::Goto);
    assert_eq!(tokens[18].kind, TokenKind::And);
    assert_eq!(tokens[19].kind, TokenKind::Or);
    assert_eq!(tokens[20].kind, TokenKind::Not);
    assert_eq!(tokens[21].kind, TokenKind::Nil);
    assert_eq!(tokens[22].kind, TokenKind::True);
    assert_eq!(tokens[23].kind, TokenKind::False);
    assert_eq!(tokens[24].kind, TokenKind::EOF);
}

#[test]
fn test_contextual_keywords_are_identifiers() {
    let source = "type record emit offline".to_string();
    let tokens = tokenize(source, Some("test.glua".to_string())).unwrap();

    for token in &tokens[0..4] {
        assert_eq!(token.kind, TokenKind::Identifier);
    }
    assert!(tokens[0].is_word("type"));
    assert!(tokens[2].is_word("emit"));
}

#[test]
fn test_tokenize_identifiers() {
    let source = "foo bar baz_123 _underscore CamelCase".to_string();
    let tokens = tokenize(source, Some("test.glua".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Identifier);
    assert_eq!(tokens[0].value, "foo");
    assert_eq!(tokens[2].value, "baz_123");
    assert_eq!(tokens[3].value, "_underscore");
    assert_eq!(tokens[4].value, "CamelCase");
    assert_eq!(tokens[5].kind, TokenKind::EOF);
}

#[test]
fn test_tokenize_numbers() {
    let source = "42 3.14 0 100.5 0xff 1e10".to_string();
    let tokens = tokenize(source, Some("test.glua".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::Integer);
    assert_eq!(tokens[0].value, "42");
    assert_eq!(tokens[1].kind, TokenKind::Float);
    assert_eq!(tokens[1].value, "3.14");
    assert_eq!(tokens[2].kind, TokenKind::Integer);
    assert_eq!(tokens[3].kind, TokenKind::Float);
    assert_eq!(tokens[4].kind, TokenKind::Integer);
    assert_eq!(tokens[4].value, "0xff");
    assert_eq!(tokens[5].kind, TokenKind::Float);
}

#[test]
fn test_tokenize_strings() {
    let source = r#""hello" 'world' "with \"escape\"" 'it\'s'"#.to_string();
    let tokens = tokenize(source, Some("test.glua".to_string())).unwrap();

    assert_eq!(tokens[0].kind, TokenKind::String);
    assert_eq!(tokens[0].value, "hello");
    assert_eq!(tokens[1].kind, TokenKind::String);
    assert_eq!(tokens[1].value, "world");
    assert_eq!(tokens[2].value, "with \"escape\"");
    assert_eq!(tokens[3].value, "it's");
}

#[test]
fn test_tokenize_string_escapes() {
    let source = r#""line\nnext\ttab\x41""#.to_string();
    let tokens = tokenize(source, Some("test.glua".to_string())).unwrap();

    assert_eq!(tokens[0].value, "line\nnext\ttabA");
}

#[test]
fn test_tokenize_operators() {
    assert_eq!(
        kinds("+ - * / // % ^ # .. == ~= <= >= < > = & | ~ << >>"),
        vec![
            TokenKind::Plus,
            TokenKind::Dash,
            TokenKind::Star,
            TokenKind::Slash,
            TokenKind::DoubleSlash,
            TokenKind::Percent,
            TokenKind::Caret,
            TokenKind::Hash,
            TokenKind::DotDot,
            TokenKind::Equals,
            TokenKind::NotEquals,
            TokenKind::LessEquals,
            TokenKind::GreaterEquals,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::Assignment,
            TokenKind::Ampersand,
            TokenKind::Pipe,
            TokenKind::Tilde,
            TokenKind::ShiftLeft,
            TokenKind::ShiftRight,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_punctuation() {
    assert_eq!(
        kinds("( ) { } [ ] ; , . ... : :: ? =>"),
        vec![
            TokenKind::OpenParen,
            TokenKind::CloseParen,
            TokenKind::OpenCurly,
            TokenKind::CloseCurly,
            TokenKind::OpenBracket,
            TokenKind::CloseBracket,
            TokenKind::Semicolon,
            TokenKind::Comma,
            TokenKind::Dot,
            TokenKind::Ellipsis,
            TokenKind::Colon,
            TokenKind::DoubleColon,
            TokenKind::Question,
            TokenKind::FatArrow,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_comments() {
    let source = "local x = 1 -- trailing comment\n--[[ block\ncomment ]] local y = 2".to_string();
    let tokens = tokenize(source, Some("test.glua".to_string())).unwrap();

    assert_eq!(tokens.len(), 9);
    assert_eq!(tokens[4].kind, TokenKind::Local);
    assert_eq!(tokens[5].value, "y");
}

#[test]
fn test_tokenize_tracks_lines_and_columns() {
    let source = "local a = 1\n  local b = 2".to_string();
    let tokens = tokenize(source, Some("test.glua".to_string())).unwrap();

    assert_eq!(tokens[0].span.start.line, 1);
    assert_eq!(tokens[0].span.start.column, 1);
    assert_eq!(tokens[3].span.start.column, 11);
    assert_eq!(tokens[4].span.start.line, 2);
    assert_eq!(tokens[4].span.start.column, 3);
    assert_eq!(tokens[5].span.start.offset, 20);
}

#[test]
fn test_tokenize_method_call() {
    assert_eq!(
        kinds("self.storage:get(1)"),
        vec![
            TokenKind::Identifier,
            TokenKind::Dot,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::Identifier,
            TokenKind::OpenParen,
            TokenKind::Integer,
            TokenKind::CloseParen,
            TokenKind::EOF,
        ]
    );
}

#[test]
fn test_tokenize_unrecognised_character() {
    let result = tokenize("local a = @".to_string(), Some("test.glua".to_string()));

    let error = result.err().unwrap();
    assert_eq!(error.get_error_name(), "UnrecognisedToken");
    assert_eq!(error.get_position().offset, 10);
}

#[test]
fn test_tokenize_empty_source() {
    assert_eq!(kinds(""), vec![TokenKind::EOF]);
    assert_eq!(kinds("   \n\t "), vec![TokenKind::EOF]);
}
