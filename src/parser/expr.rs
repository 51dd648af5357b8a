use crate::{ast::{ast::{Expr, TypeExpr}, expressions::{BinaryExpr, CallExpr, FunctionBody, FunctionExpr, GenericInstanceExpr, IndexExpr, IndexKey, LambdaBody, LambdaExpr, LiteralExpr, LiteralKind, Param, ParenExpr, PrefixExpr, SymbolExpr, TableExpr, TableField, VarargExpr}}, errors::errors::{Error, ErrorImpl}, lexer::tokens::TokenKind, Position, Span};

use super::{lookups::BindingPower, parser::Parser, stmt::parse_block, types::parse_type};

pub fn parse_expr(parser: &mut Parser, bp: BindingPower) -> Result<Expr, Error> {
    // First parse NUD
    let token_kind = parser.current_token_kind();
    let nud = match parser.get_nud_lookup().get(&token_kind) {
        Some(nud) => *nud,
        None => return Err(Error::new(ErrorImpl::UnexpectedToken { token: parser.current_token().value.clone() }, parser.get_position())),
    };

    let mut left = nud(parser)?;

    // While LED and current BP is less than BP of current token, continue parsing lhs
    loop {
        let token_kind = parser.current_token_kind();
        let current_bp = *parser.get_bp_lookup().get(&token_kind).unwrap_or(&BindingPower::Default);
        if current_bp <= bp {
            break;
        }

        let led = match parser.get_led_lookup().get(&token_kind) {
            Some(led) => *led,
            None => break,
        };

        left = led(parser, left, current_bp)?;
    }

    Ok(left)
}

pub fn parse_primary_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let token = parser.advance().clone();
    let kind = match token.kind {
        TokenKind::Integer => LiteralKind::Integer,
        TokenKind::Float => LiteralKind::Float,
        TokenKind::String => LiteralKind::String,
        TokenKind::Nil => LiteralKind::Nil,
        TokenKind::True => LiteralKind::True,
        TokenKind::False => LiteralKind::False,
        TokenKind::Ellipsis => return Ok(Expr::Vararg(VarargExpr { span: token.span })),
        _ => return Err(Error::new(ErrorImpl::UnexpectedToken { token: token.value }, token.span.start)),
    };

    Ok(Expr::Literal(LiteralExpr { kind, value: token.value, span: token.span }))
}

pub fn parse_symbol_expr(parser: &mut Parser) -> Result<Expr, Error> {
    if parser.peek(1).kind == TokenKind::FatArrow {
        return parse_single_param_lambda(parser);
    }

    if parser.peek(1).kind == TokenKind::Less {
        if let Some(instance) = try_parse_generic_instance(parser) {
            return Ok(instance);
        }
    }

    let token = parser.expect(TokenKind::Identifier)?;
    Ok(Expr::Symbol(SymbolExpr { value: token.value, span: token.span }))
}

/// `Name<T, ...>` directly followed by `(`. Anything else is left for the comparison operators.
fn try_parse_generic_instance(parser: &mut Parser) -> Option<Expr> {
    let checkpoint = parser.checkpoint();
    let result = parse_generic_instance(parser);
    match result {
        Ok(expr) if parser.current_token_kind() == TokenKind::OpenParen => Some(expr),
        _ => {
            parser.rewind(checkpoint);
            None
        }
    }
}

fn parse_generic_instance(parser: &mut Parser) -> Result<Expr, Error> {
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::Less)?;

    let mut type_arguments = vec![parse_type(parser, BindingPower::Default)?];
    while parser.eat(TokenKind::Comma) {
        type_arguments.push(parse_type(parser, BindingPower::Default)?);
    }
    parser.expect_closing_angle()?;

    Ok(Expr::GenericInstance(GenericInstanceExpr {
        name: name.value,
        type_arguments,
        span: parser.span_from(name.span.start),
    }))
}

fn parse_single_param_lambda(parser: &mut Parser) -> Result<Expr, Error> {
    let name = parser.expect(TokenKind::Identifier)?;
    parser.expect(TokenKind::FatArrow)?;
    let body = parse_lambda_body(parser)?;

    Ok(Expr::Lambda(LambdaExpr {
        parameters: vec![Param { name: name.value, explicit_type: None, span: name.span.clone() }],
        is_vararg: false,
        body,
        span: parser.span_from(name.span.start),
    }))
}

fn parse_lambda_body(parser: &mut Parser) -> Result<LambdaBody, Error> {
    if parser.eat(TokenKind::Do) {
        let body = parse_block(parser, &[TokenKind::End])?;
        parser.expect_block_end(TokenKind::End, "do")?;
        Ok(LambdaBody::Block(body))
    } else {
        Ok(LambdaBody::Expr(Box::new(parse_expr(parser, BindingPower::Default)?)))
    }
}

pub fn parse_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();

    let right = parse_expr(parser, bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone()
        },
        left: Box::new(left),
        operator: operator_token,
        right: Box::new(right),
    }))
}

/// `..` and `^` bind to the right: the right operand is parsed one level lower.
pub fn parse_right_assoc_binary_expr(parser: &mut Parser, left: Expr, bp: BindingPower) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();

    let right_bp = match bp {
        BindingPower::Power => BindingPower::Unary,
        _ => BindingPower::Shift,
    };
    let right = parse_expr(parser, right_bp)?;

    Ok(Expr::Binary(BinaryExpr {
        span: Span {
            start: left.get_span().start.clone(),
            end: right.get_span().end.clone()
        },
        left: Box::new(left),
        operator: operator_token,
        right: Box::new(right),
    }))
}

pub fn parse_prefix_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let operator_token = parser.advance().clone();
    let rhs = parse_expr(parser, BindingPower::Unary)?;

    Ok(Expr::Prefix(PrefixExpr {
        span: Span {
            start: operator_token.span.start.clone(),
            end: rhs.get_span().end.clone()
        },
        operator: operator_token,
        right_expr: Box::new(rhs)
    }))
}

/// `( ... )` is either a lambda parameter list followed by `=>` or a parenthesised expression.
pub fn parse_grouping_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let checkpoint = parser.checkpoint();
    if let Ok(lambda) = parse_paren_lambda(parser) {
        return Ok(lambda);
    }
    parser.rewind(checkpoint);

    let start = parser.expect(TokenKind::OpenParen)?.span.start;
    let expr = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseParen)?;

    Ok(Expr::Paren(ParenExpr {
        inner: Box::new(expr),
        span: parser.span_from(start),
    }))
}

fn parse_paren_lambda(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.get_position();
    let (parameters, is_vararg) = parse_parameter_list(parser)?;
    parser.expect(TokenKind::FatArrow)?;
    let body = parse_lambda_body(parser)?;

    Ok(Expr::Lambda(LambdaExpr {
        parameters,
        is_vararg,
        body,
        span: parser.span_from(start),
    }))
}

/// `(a: int, b, ...)`, shared by function definitions and lambdas.
pub fn parse_parameter_list(parser: &mut Parser) -> Result<(Vec<Param>, bool), Error> {
    parser.expect(TokenKind::OpenParen)?;

    let mut parameters = vec![];
    let mut is_vararg = false;

    while parser.current_token_kind() != TokenKind::CloseParen {
        if parser.current_token_kind() == TokenKind::Ellipsis {
            parser.advance();
            // `...: T` is accepted; the rest arguments are always Array<object>
            if parser.eat(TokenKind::Colon) {
                parse_type(parser, BindingPower::Default)?;
            }
            is_vararg = true;
            break;
        }

        let name = parser.expect(TokenKind::Identifier)?;
        let explicit_type = if parser.eat(TokenKind::Colon) {
            Some(parse_type(parser, BindingPower::Default)?)
        } else {
            None
        };
        parameters.push(Param { name: name.value, explicit_type, span: name.span });

        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }

    parser.expect(TokenKind::CloseParen)?;
    Ok((parameters, is_vararg))
}

/// Parameters, optional `: ReturnType`, body and the closing `end`.
pub fn parse_function_body(parser: &mut Parser, start: Position) -> Result<FunctionBody, Error> {
    let (parameters, is_vararg) = parse_parameter_list(parser)?;

    let return_type: Option<TypeExpr> = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    let body = parse_block(parser, &[TokenKind::End])?;
    parser.expect_block_end(TokenKind::End, "function")?;

    Ok(FunctionBody {
        parameters,
        is_vararg,
        return_type,
        body,
        span: parser.span_from(start),
    })
}

pub fn parse_function_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let start = parser.expect(TokenKind::Function)?.span.start;
    let function = parse_function_body(parser, start.clone())?;

    Ok(Expr::Function(FunctionExpr {
        function,
        span: parser.span_from(start),
    }))
}

fn parse_call_arguments(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    match parser.current_token_kind() {
        TokenKind::String => Ok(vec![parse_primary_expr(parser)?]),
        TokenKind::OpenCurly => Ok(vec![parse_table_expr(parser)?]),
        _ => {
            parser.expect(TokenKind::OpenParen)?;

            let mut args = vec![];
            while parser.current_token_kind() != TokenKind::CloseParen {
                args.push(parse_expr(parser, BindingPower::Default)?);
                if !parser.eat(TokenKind::Comma) {
                    break;
                }
            }

            parser.expect(TokenKind::CloseParen)?;
            Ok(args)
        }
    }
}

pub fn parse_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    let arguments = parse_call_arguments(parser)?;
    let start = left.get_span().start.clone();

    Ok(Expr::Call(CallExpr {
        span: parser.span_from(start),
        callee: Box::new(left),
        method: None,
        arguments
    }))
}

pub fn parse_method_call_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::Colon)?;
    let method = parser.expect(TokenKind::Identifier)?.value;
    let arguments = parse_call_arguments(parser)?;
    let start = left.get_span().start.clone();

    Ok(Expr::Call(CallExpr {
        span: parser.span_from(start),
        callee: Box::new(left),
        method: Some(method),
        arguments
    }))
}

pub fn parse_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::Dot)?;
    let member = parser.expect(TokenKind::Identifier)?;
    let start = left.get_span().start.clone();

    Ok(Expr::Index(IndexExpr {
        span: parser.span_from(start),
        object: Box::new(left),
        key: IndexKey::Name(member.value),
    }))
}

pub fn parse_computed_member_expr(parser: &mut Parser, left: Expr, _bp: BindingPower) -> Result<Expr, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let key = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;
    let start = left.get_span().start.clone();

    Ok(Expr::Index(IndexExpr {
        span: parser.span_from(start),
        object: Box::new(left),
        key: IndexKey::Expr(Box::new(key)),
    }))
}

/// `{ ... }` tables and `[ ... ]` array literals.
pub fn parse_table_expr(parser: &mut Parser) -> Result<Expr, Error> {
    let open = parser.advance().clone();
    let is_array_literal = open.kind == TokenKind::OpenBracket;
    let closing = if is_array_literal { TokenKind::CloseBracket } else { TokenKind::CloseCurly };

    let mut fields = vec![];

    while parser.current_token_kind() != closing {
        fields.push(parse_table_field(parser, is_array_literal)?);

        if !parser.eat(TokenKind::Comma) && !parser.eat(TokenKind::Semicolon) {
            break;
        }
    }

    parser.expect(closing)?;

    Ok(Expr::Table(TableExpr {
        fields,
        is_array_literal,
        span: parser.span_from(open.span.start),
    }))
}

fn parse_table_field(parser: &mut Parser, is_array_literal: bool) -> Result<TableField, Error> {
    let next = parser.peek(1).kind;
    match parser.current_token_kind() {
        TokenKind::Identifier if next == TokenKind::Assignment || next == TokenKind::Colon => {
            let name = parser.advance().value.clone();
            let colon_syntax = parser.advance().kind == TokenKind::Colon;
            let value = parse_expr(parser, BindingPower::Default)?;
            Ok(TableField::Named { name, value, colon_syntax })
        }
        TokenKind::String if next == TokenKind::Colon => {
            let key = parser.advance().clone();
            parser.advance();
            let value = parse_expr(parser, BindingPower::Default)?;
            Ok(TableField::StringKeyed { key: key.value, value, span: key.span })
        }
        TokenKind::OpenBracket if !is_array_literal => {
            let checkpoint = parser.checkpoint();
            if let Ok(field) = parse_keyed_field(parser) {
                return Ok(field);
            }
            parser.rewind(checkpoint);
            Ok(TableField::Positional(parse_expr(parser, BindingPower::Default)?))
        }
        _ => Ok(TableField::Positional(parse_expr(parser, BindingPower::Default)?)),
    }
}

fn parse_keyed_field(parser: &mut Parser) -> Result<TableField, Error> {
    parser.expect(TokenKind::OpenBracket)?;
    let key = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::CloseBracket)?;
    parser.expect(TokenKind::Assignment)?;
    let value = parse_expr(parser, BindingPower::Default)?;
    Ok(TableField::Keyed { key, value })
}
