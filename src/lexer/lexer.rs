use std::rc::Rc;

use lazy_static::lazy_static;
use regex::Regex;

use crate::{errors::errors::{Error, ErrorImpl}, Position, Span, MK_DEFAULT_HANDLER, MK_TOKEN};

use super::tokens::{Token, TokenKind, RESERVED_LOOKUP};

pub type RegexHandler = fn(&mut Lexer, &Regex);

pub struct RegexPattern {
    regex: Regex,
    handler: RegexHandler
}

fn pattern(source: &str, handler: RegexHandler) -> RegexPattern {
    // Every pattern is a literal in this file, so a failure here is a typo caught by the first test run.
    RegexPattern { regex: Regex::new(source).unwrap(), handler }
}

lazy_static! {
    // Order matters: the first pattern matching at the cursor wins, so longer operators come first.
    static ref PATTERNS: Vec<RegexPattern> = vec![
        pattern("^\\s+", skip_handler),
        pattern("^--\\[\\[(?s:.*?)\\]\\]", skip_handler),
        pattern("^--[^\\n]*", skip_handler),
        pattern("^[a-zA-Z_][a-zA-Z0-9_]*", symbol_handler),
        pattern("^(0[xX][0-9a-fA-F]+|[0-9]+(\\.[0-9]+)?([eE][+-]?[0-9]+)?)", number_handler),
        pattern("^\"(?:[^\"\\\\\\n]|\\\\.)*\"", string_handler),
        pattern("^'(?:[^'\\\\\\n]|\\\\.)*'", string_handler),
        pattern("^\\.\\.\\.", MK_DEFAULT_HANDLER!(TokenKind::Ellipsis, "...")),
        pattern("^\\.\\.", MK_DEFAULT_HANDLER!(TokenKind::DotDot, "..")),
        pattern("^\\.", MK_DEFAULT_HANDLER!(TokenKind::Dot, ".")),
        pattern("^::", MK_DEFAULT_HANDLER!(TokenKind::DoubleColon, "::")),
        pattern("^:", MK_DEFAULT_HANDLER!(TokenKind::Colon, ":")),
        pattern("^==", MK_DEFAULT_HANDLER!(TokenKind::Equals, "==")),
        pattern("^=>", MK_DEFAULT_HANDLER!(TokenKind::FatArrow, "=>")),
        pattern("^=", MK_DEFAULT_HANDLER!(TokenKind::Assignment, "=")),
        pattern("^~=", MK_DEFAULT_HANDLER!(TokenKind::NotEquals, "~=")),
        pattern("^~", MK_DEFAULT_HANDLER!(TokenKind::Tilde, "~")),
        pattern("^<=", MK_DEFAULT_HANDLER!(TokenKind::LessEquals, "<=")),
        pattern("^<<", MK_DEFAULT_HANDLER!(TokenKind::ShiftLeft, "<<")),
        pattern("^<", MK_DEFAULT_HANDLER!(TokenKind::Less, "<")),
        pattern("^>=", MK_DEFAULT_HANDLER!(TokenKind::GreaterEquals, ">=")),
        pattern("^>>", MK_DEFAULT_HANDLER!(TokenKind::ShiftRight, ">>")),
        pattern("^>", MK_DEFAULT_HANDLER!(TokenKind::Greater, ">")),
        pattern("^//", MK_DEFAULT_HANDLER!(TokenKind::DoubleSlash, "//")),
        pattern("^/", MK_DEFAULT_HANDLER!(TokenKind::Slash, "/")),
        pattern("^\\[", MK_DEFAULT_HANDLER!(TokenKind::OpenBracket, "[")),
        pattern("^\\]", MK_DEFAULT_HANDLER!(TokenKind::CloseBracket, "]")),
        pattern("^\\{", MK_DEFAULT_HANDLER!(TokenKind::OpenCurly, "{")),
        pattern("^\\}", MK_DEFAULT_HANDLER!(TokenKind::CloseCurly, "}")),
        pattern("^\\(", MK_DEFAULT_HANDLER!(TokenKind::OpenParen, "(")),
        pattern("^\\)", MK_DEFAULT_HANDLER!(TokenKind::CloseParen, ")")),
        pattern("^;", MK_DEFAULT_HANDLER!(TokenKind::Semicolon, ";")),
        pattern("^,", MK_DEFAULT_HANDLER!(TokenKind::Comma, ",")),
        pattern("^\\?", MK_DEFAULT_HANDLER!(TokenKind::Question, "?")),
        pattern("^\\+", MK_DEFAULT_HANDLER!(TokenKind::Plus, "+")),
        pattern("^-", MK_DEFAULT_HANDLER!(TokenKind::Dash, "-")),
        pattern("^\\*", MK_DEFAULT_HANDLER!(TokenKind::Star, "*")),
        pattern("^%", MK_DEFAULT_HANDLER!(TokenKind::Percent, "%")),
        pattern("^\\^", MK_DEFAULT_HANDLER!(TokenKind::Caret, "^")),
        pattern("^#", MK_DEFAULT_HANDLER!(TokenKind::Hash, "#")),
        pattern("^&", MK_DEFAULT_HANDLER!(TokenKind::Ampersand, "&")),
        pattern("^\\|", MK_DEFAULT_HANDLER!(TokenKind::Pipe, "|")),
    ];
}

pub struct Lexer {
    tokens: Vec<Token>,
    source: String,
    pos: usize,
    line: u32,
    column: u32,
    file: Rc<String>,
}

impl Lexer {
    pub fn new(source: String, file: Option<String>) -> Lexer {
        let file_name = if let Some(file) = file {
            Rc::new(file)
        } else {
            Rc::new(String::from("shell"))
        };

        Lexer {
            tokens: vec![],
            source,
            pos: 0,
            line: 1,
            column: 1,
            file: file_name,
        }
    }

    /// Consumes `n` bytes, keeping the line and column counters in sync.
    pub fn advance_n(&mut self, n: usize) {
        let end = (self.pos + n).min(self.source.len());
        for ch in self.source[self.pos..end].chars() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.pos = end;
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    pub fn at(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    pub fn remainder(&self) -> &str {
        &self.source[self.pos..]
    }

    pub fn at_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    pub fn position(&self) -> Position {
        Position::new(self.pos as u32, self.line, self.column, Rc::clone(&self.file))
    }

    fn matched(&self, regex: &Regex) -> String {
        regex.find(self.remainder()).map(|m| m.as_str().to_string()).unwrap_or_default()
    }
}

fn number_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let is_hex = matched.starts_with("0x") || matched.starts_with("0X");
    let kind = if !is_hex && matched.contains(['.', 'e', 'E']) {
        TokenKind::Float
    } else {
        TokenKind::Integer
    };

    let start = lexer.position();
    lexer.advance_n(matched.len());
    let end = lexer.position();
    lexer.push(MK_TOKEN!(kind, matched, Span { start, end }));
}

fn skip_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    lexer.advance_n(matched.len());
}

fn string_handler(lexer: &mut Lexer, regex: &Regex) {
    let matched = lexer.matched(regex);
    let string_literal = &matched[1..matched.len() - 1];

    let start = lexer.position();
    lexer.advance_n(matched.len());
    let end = lexer.position();

    let mut result = String::new();
    let mut chars = string_literal.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if let Some(next_ch) = chars.peek() {
                match next_ch {
                    'n' => {
                        result.push('\n');
                        chars.next();
                    }
                    't' => {
                        result.push('\t');
                        chars.next();
                    }
                    '\\' => {
                        result.push('\\');
                        chars.next();
                    }
                    'r' => {
                        result.push('\r');
                        chars.next();
                    }
                    '"' => {
                        result.push('"');
                        chars.next();
                    }
                    '\'' => {
                        result.push('\'');
                        chars.next();
                    }
                    '0' => {
                        result.push('\0');
                        chars.next();
                    }
                    'x' => {
                        let mut hex = String::new();
                        chars.next();

                        for _ in 0..2 {
                            if let Some(ch) = chars.peek() {
                                if ch.is_ascii_hexdigit() {
                                    hex.push(*ch);
                                    chars.next();
                                } else {
                                    break;
                                }
                            }
                        }

                        match u8::from_str_radix(&hex, 16) {
                            Ok(byte) => result.push(byte as char),
                            Err(_) => result.push_str("\\x"),
                        }
                    }
                    _ => {
                        result.push(ch); // Keep the backslash
                    }
                }
            } else {
                result.push(ch); // Keep the lone backslash
            }
        } else {
            result.push(ch);
        }
    }

    lexer.push(MK_TOKEN!(TokenKind::String, result, Span { start, end }));
}

fn symbol_handler(lexer: &mut Lexer, regex: &Regex) {
    let value = lexer.matched(regex);
    let kind = RESERVED_LOOKUP.get(value.as_str()).copied().unwrap_or(TokenKind::Identifier);

    let start = lexer.position();
    lexer.advance_n(value.len());
    let end = lexer.position();
    lexer.push(MK_TOKEN!(kind, value, Span { start, end }));
}

pub fn tokenize(source: String, file: Option<String>) -> Result<Vec<Token>, Error> {
    let mut lex = Lexer::new(source, file);

    while !lex.at_eof() {
        let handler = PATTERNS
            .iter()
            .find(|pattern| pattern.regex.is_match(lex.remainder()))
            .map(|pattern| (pattern.handler, &pattern.regex));

        match handler {
            Some((handler, regex)) => handler(&mut lex, regex),
            None => {
                let token = lex.at().map(|c| c.to_string()).unwrap_or_default();
                return Err(Error::new(ErrorImpl::UnrecognisedToken { token }, lex.position()));
            }
        }
    }

    let eof = lex.position();
    lex.push(MK_TOKEN!(TokenKind::EOF, String::from("EOF"), Span { start: eof.clone(), end: eof }));
    Ok(lex.tokens)
}
