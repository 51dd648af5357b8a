use lazy_static::lazy_static;
use std::{collections::HashMap, fmt::Display};

use crate::Span;

lazy_static! {
    pub static ref RESERVED_LOOKUP: HashMap<&'static str, TokenKind> = {
        let mut map = HashMap::new();
        map.insert("local", TokenKind::Local);
        map.insert("let", TokenKind::Let);
        map.insert("var", TokenKind::Var);
        map.insert("function", TokenKind::Function);
        map.insert("if", TokenKind::If);
        map.insert("then", TokenKind::Then);
        map.insert("elseif", TokenKind::Elseif);
        map.insert("else", TokenKind::Else);
        map.insert("end", TokenKind::End);
        map.insert("while", TokenKind::While);
        map.insert("do", TokenKind::Do);
        map.insert("repeat", TokenKind::Repeat);
        map.insert("until", TokenKind::Until);
        map.insert("for", TokenKind::For);
        map.insert("in", TokenKind::In);
        map.insert("return", TokenKind::Return);
        map.insert("break", TokenKind::Break);
        map.insert("goto", TokenKind::Goto);
        map.insert("and", TokenKind::And);
        map.insert("or", TokenKind::Or);
        map.insert("not", TokenKind::Not);
        map.insert("nil", TokenKind::Nil);
        map.insert("true", TokenKind::True);
        map.insert("false", TokenKind::False);
        map
    };
}

/// Words that only act as keywords in statement position.
///
/// `type` is also the runtime's `type(x)` function and `emit` has to reach the
/// checker as a name so misuse can be reported, so the parser decides on these
/// by looking one token ahead.
pub const CONTEXTUAL_KEYWORDS: [&str; 4] = ["type", "record", "emit", "offline"];

#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum TokenKind {
    EOF,
    Integer,
    Float,
    String,
    Identifier,

    OpenBracket,
    CloseBracket,
    OpenCurly,
    CloseCurly,
    OpenParen,
    CloseParen,

    Assignment, // =
    Equals,     // ==
    NotEquals,  // ~=
    FatArrow,   // =>

    Less,
    LessEquals,
    Greater,
    GreaterEquals,
    ShiftLeft,
    ShiftRight,

    Dot,
    DotDot,
    Ellipsis,
    Semicolon,
    Colon,
    DoubleColon,
    Question,
    Comma,

    Plus,
    Dash,
    Slash,
    DoubleSlash,
    Star,
    Percent,
    Caret,
    Hash,
    Ampersand,
    Pipe,
    Tilde,

    // Reserved
    Local,
    Let,
    Var,
    Function,
    If,
    Then,
    Elseif,
    Else,
    End,
    While,
    Do,
    Repeat,
    Until,
    For,
    In,
    Return,
    Break,
    Goto,
    And,
    Or,
    Not,
    Nil,
    True,
    False,
}

impl Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token {{\nkind: {},\nvalue: {}}}", self.kind, self.value)
    }
}

impl Token {
    pub fn is_one_of_many(&self, tokens: &[TokenKind]) -> bool {
        tokens.contains(&self.kind)
    }

    /// True for an identifier spelled like the given contextual keyword.
    pub fn is_word(&self, word: &str) -> bool {
        self.kind == TokenKind::Identifier && self.value == word
    }

    pub fn debug(&self) {
        if self.is_one_of_many(&[
            TokenKind::String,
            TokenKind::Identifier,
            TokenKind::Integer,
            TokenKind::Float,
        ]) {
            log::debug!("{} ({}) at {}:{}", self.kind, self.value, self.span.start.line, self.span.start.column);
        } else {
            log::debug!("{} () at {}:{}", self.kind, self.span.start.line, self.span.start.column);
        }
    }
}
