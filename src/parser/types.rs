//! Type annotation parsing.
//!
//! Annotations appear after `:` in declarations, parameters and record
//! fields, and as generic arguments. Supported forms:
//!
//! - Names and generic instances: `int`, `Array<int>`, `Person<T, string>`
//! - Literal options: `"red"`, `1`, `true`
//! - Function types: `(int, string) => bool`
//! - Unions: `int | string | nil`
//!
//! Like expressions, types are parsed with NUD/LED handlers and binding powers.

use std::collections::HashMap;

use crate::{
    ast::{
        ast::TypeExpr,
        expressions::{LiteralExpr, LiteralKind},
        types::{FunctionType, GenericType, LiteralType, SymbolType, UnionType},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
    Span,
};

use super::{lookups::BindingPower, parser::Parser};

/// Type alias for type null denotation handler functions.
pub type TypeNUDHandler = fn(&mut Parser) -> Result<TypeExpr, Error>;

/// Type alias for type left denotation handler functions.
pub type TypeLEDHandler = fn(&mut Parser, TypeExpr, BindingPower) -> Result<TypeExpr, Error>;

/// Type alias for type NUD lookup table.
pub type TypeNUDLookup = HashMap<TokenKind, TypeNUDHandler>;

/// Type alias for type LED lookup table.
pub type TypeLEDLookup = HashMap<TokenKind, TypeLEDHandler>;

/// Type alias for type binding power lookup table.
pub type TypeBPLookup = HashMap<TokenKind, BindingPower>;

/// Initializes the type parsing lookup tables.
///
/// # Arguments
///
/// * `parser` - Mutable reference to the parser to initialize
pub fn create_token_type_lookups(parser: &mut Parser) {
    parser.type_nud(TokenKind::Identifier, parse_symbol_type);
    parser.type_nud(TokenKind::Nil, parse_nil_type);
    parser.type_nud(TokenKind::String, parse_literal_type);
    parser.type_nud(TokenKind::Integer, parse_literal_type);
    parser.type_nud(TokenKind::Float, parse_literal_type);
    parser.type_nud(TokenKind::True, parse_literal_type);
    parser.type_nud(TokenKind::False, parse_literal_type);
    parser.type_nud(TokenKind::OpenParen, parse_function_type);

    parser.type_led(TokenKind::Pipe, BindingPower::BitwiseOr, parse_union_type);
}

/// `Name` or `Name<T, ...>`.
pub fn parse_symbol_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.expect(TokenKind::Identifier)?;

    if parser.current_token_kind() != TokenKind::Less {
        return Ok(TypeExpr::Symbol(SymbolType {
            name: token.value,
            span: token.span,
        }));
    }

    parser.advance();
    let mut arguments = vec![parse_type(parser, BindingPower::Default)?];
    while parser.eat(TokenKind::Comma) {
        arguments.push(parse_type(parser, BindingPower::Default)?);
    }
    parser.expect_closing_angle()?;

    Ok(TypeExpr::Generic(GenericType {
        name: token.value,
        arguments,
        span: parser.span_from(token.span.start),
    }))
}

pub fn parse_nil_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.expect(TokenKind::Nil)?;
    Ok(TypeExpr::Symbol(SymbolType {
        name: String::from("nil"),
        span: token.span,
    }))
}

pub fn parse_literal_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let token = parser.advance().clone();
    let kind = match token.kind {
        TokenKind::String => LiteralKind::String,
        TokenKind::Integer => LiteralKind::Integer,
        TokenKind::Float => LiteralKind::Float,
        TokenKind::True => LiteralKind::True,
        _ => LiteralKind::False,
    };

    Ok(TypeExpr::Literal(LiteralType {
        literal: LiteralExpr { kind, value: token.value, span: token.span.clone() },
        span: token.span,
    }))
}

/// `(A, B, ...) => R`, or a parenthesised type when no `=>` follows.
pub fn parse_function_type(parser: &mut Parser) -> Result<TypeExpr, Error> {
    let start = parser.expect(TokenKind::OpenParen)?.span.start;

    let mut parameters = vec![];
    let mut is_vararg = false;
    while parser.current_token_kind() != TokenKind::CloseParen {
        if parser.eat(TokenKind::Ellipsis) {
            is_vararg = true;
            break;
        }
        // parameter names are allowed and ignored: `(a: int) => int`
        if parser.current_token_kind() == TokenKind::Identifier && parser.peek(1).kind == TokenKind::Colon {
            parser.advance();
            parser.advance();
        }
        parameters.push(parse_type(parser, BindingPower::Default)?);
        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }
    parser.expect(TokenKind::CloseParen)?;

    if !parser.eat(TokenKind::FatArrow) {
        if parameters.len() == 1 && !is_vararg {
            return Ok(parameters.remove(0));
        }
        return Err(Error::new(
            ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected `=>` after function type parameters"),
            },
            parser.get_position(),
        ));
    }

    let return_type = match parser.current_token_kind() {
        TokenKind::Identifier | TokenKind::Nil | TokenKind::OpenParen | TokenKind::String
        | TokenKind::Integer | TokenKind::Float | TokenKind::True | TokenKind::False => {
            Some(Box::new(parse_type(parser, BindingPower::Default)?))
        }
        _ => None,
    };

    Ok(TypeExpr::Function(FunctionType {
        parameters,
        is_vararg,
        return_type,
        span: parser.span_from(start),
    }))
}

pub fn parse_union_type(
    parser: &mut Parser,
    left: TypeExpr,
    bp: BindingPower,
) -> Result<TypeExpr, Error> {
    parser.expect(TokenKind::Pipe)?;
    let right = parse_type(parser, bp)?;

    let start = left.get_span().start.clone();
    let end = right.get_span().end.clone();

    let mut members = match left {
        TypeExpr::Union(union) => union.members,
        other => vec![other],
    };
    members.push(right);

    Ok(TypeExpr::Union(UnionType {
        members,
        span: Span { start, end },
    }))
}

pub fn parse_type(parser: &mut Parser, bp: BindingPower) -> Result<TypeExpr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_type_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => {
            return Err(Error::new(
                ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("expected a type"),
                },
                parser.get_position(),
            ))
        }
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let current_bp = *parser
            .get_type_bp_lookup()
            .get(&token_kind)
            .unwrap_or(&BindingPower::Default);
        if current_bp <= bp {
            break;
        }

        let led = match parser.get_type_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };

        left = led(parser, left, current_bp)?;
    }

    Ok(left)
}
