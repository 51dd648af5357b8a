use crate::{ast::{ast::{Expr, Stmt}, expressions::{LiteralExpr, LiteralKind}, statements::{AssignmentStmt, BlockStmt, BreakStmt, DeclKind, DoStmt, EmitStmt, ExpressionStmt, ForInStmt, FunctionName, FunctionStmt, GotoStmt, IfBranch, IfStmt, LabelStmt, LocalFunctionStmt, LocalName, LocalStmt, NumericForStmt, RecordField, RecordStmt, RepeatStmt, ReturnStmt, TypeAliasStmt, WhileStmt}}, errors::errors::{Error, ErrorImpl}, lexer::tokens::TokenKind, parser::{expr::{parse_expr, parse_function_body}, lookups::BindingPower}, Position, Span};

use super::{parser::Parser, types::parse_type};

pub fn parse_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token_kind = parser.current_token_kind();
    if let Some(handler) = parser.get_stmt_lookup().get(&token_kind) {
        let handler = *handler;
        return handler(parser);
    }

    if token_kind == TokenKind::Identifier {
        let next = parser.peek(1).kind;
        let word = parser.current_token().value.clone();
        match (word.as_str(), next) {
            ("type", TokenKind::Identifier) => return parse_type_decl_stmt(parser),
            ("record", TokenKind::Identifier) => return parse_record_stmt(parser),
            ("emit", TokenKind::Identifier) => return parse_emit_stmt(parser),
            ("offline", TokenKind::Function) => return parse_offline_function_stmt(parser),
            _ => {}
        }
    }

    parse_expression_or_assignment_stmt(parser)
}

/// Parses statements until one of `terminators` (or EOF) is reached. The terminator is not consumed.
pub fn parse_block(parser: &mut Parser, terminators: &[TokenKind]) -> Result<BlockStmt, Error> {
    let start = parser.get_position();
    let mut body = Vec::new();

    loop {
        let kind = parser.current_token_kind();
        if kind == TokenKind::EOF || terminators.contains(&kind) {
            break;
        }
        if parser.eat(TokenKind::Semicolon) {
            continue;
        }
        body.push(parse_stmt(parser)?);
    }

    Ok(BlockStmt {
        body,
        id: parser.advance_id(),
        span: parser.span_from(start),
    })
}

fn parse_expression_or_assignment_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    let first = parse_expr(parser, BindingPower::Default)?;

    if parser.current_token_kind() != TokenKind::Comma && parser.current_token_kind() != TokenKind::Assignment {
        if !matches!(first, Expr::Call(_)) {
            return Err(Error::new(ErrorImpl::UnexpectedTokenDetailed {
                token: parser.current_token().value.clone(),
                message: String::from("expected a function call or an assignment")
            }, first.get_span().start.clone()));
        }

        return Ok(Stmt::Expression(ExpressionStmt {
            span: first.get_span().clone(),
            expression: first,
        }));
    }

    let mut targets = vec![first];
    while parser.eat(TokenKind::Comma) {
        targets.push(parse_expr(parser, BindingPower::Default)?);
    }

    for target in &targets {
        if !matches!(target, Expr::Symbol(_) | Expr::Index(_)) {
            return Err(Error::new(ErrorImpl::InvalidAssignmentTarget {
                target: target.head_token().text
            }, target.get_span().start.clone()));
        }
    }

    parser.expect(TokenKind::Assignment)?;
    let values = parse_expr_list(parser)?;

    Ok(Stmt::Assignment(AssignmentStmt {
        targets,
        values,
        span: parser.span_from(start),
    }))
}

fn parse_expr_list(parser: &mut Parser) -> Result<Vec<Expr>, Error> {
    let mut values = vec![parse_expr(parser, BindingPower::Default)?];
    while parser.eat(TokenKind::Comma) {
        values.push(parse_expr(parser, BindingPower::Default)?);
    }
    Ok(values)
}

fn parse_local_name(parser: &mut Parser) -> Result<LocalName, Error> {
    let error = Error::new(ErrorImpl::UnexpectedTokenDetailed { token: parser.current_token().value.clone(), message: String::from("expected identifier during variable declaration") }, parser.get_position());
    let name = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let explicit_type = if parser.eat(TokenKind::Colon) {
        Some(parse_type(parser, BindingPower::Default)?)
    } else {
        None
    };

    Ok(LocalName {
        name: name.value,
        explicit_type,
        span: name.span,
    })
}

pub fn parse_local_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start_token = parser.advance().clone();
    let kind = match start_token.kind {
        TokenKind::Let => DeclKind::Let,
        TokenKind::Var => DeclKind::Var,
        _ => DeclKind::Local,
    };

    if parser.current_token_kind() == TokenKind::Function {
        parser.advance();
        let name = parser.expect(TokenKind::Identifier)?.value;
        let function = parse_function_body(parser, start_token.span.start.clone())?;
        return Ok(Stmt::LocalFunction(LocalFunctionStmt {
            name,
            function,
            span: parser.span_from(start_token.span.start),
        }));
    }

    let mut names = vec![parse_local_name(parser)?];
    while parser.eat(TokenKind::Comma) {
        names.push(parse_local_name(parser)?);
    }

    let values = if parser.eat(TokenKind::Assignment) {
        parse_expr_list(parser)?
    } else {
        vec![]
    };

    Ok(Stmt::Local(LocalStmt {
        kind,
        names,
        values,
        span: parser.span_from(start_token.span.start),
    }))
}

fn parse_function_name(parser: &mut Parser) -> Result<FunctionName, Error> {
    let base = parser.expect(TokenKind::Identifier)?.value;

    let mut fields = vec![];
    while parser.eat(TokenKind::Dot) {
        fields.push(parser.expect(TokenKind::Identifier)?.value);
    }

    let method = if parser.eat(TokenKind::Colon) {
        Some(parser.expect(TokenKind::Identifier)?.value)
    } else {
        None
    };

    Ok(FunctionName { base, fields, method })
}

fn parse_named_function(parser: &mut Parser, start: Position, is_offline: bool) -> Result<Stmt, Error> {
    parser.expect(TokenKind::Function)?;
    let name = parse_function_name(parser)?;
    let function = parse_function_body(parser, start.clone())?;

    Ok(Stmt::Function(FunctionStmt {
        name,
        function,
        is_offline,
        span: parser.span_from(start),
    }))
}

pub fn parse_function_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.get_position();
    parse_named_function(parser, start, false)
}

fn parse_offline_function_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    parse_named_function(parser, start, true)
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let mut branches = vec![];
    loop {
        let condition = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Then)?;
        let body = parse_block(parser, &[TokenKind::Elseif, TokenKind::Else, TokenKind::End])?;
        branches.push(IfBranch { condition, body });

        if !parser.eat(TokenKind::Elseif) {
            break;
        }
    }

    let else_body = if parser.eat(TokenKind::Else) {
        Some(parse_block(parser, &[TokenKind::End])?)
    } else {
        None
    };

    parser.expect_block_end(TokenKind::End, "if")?;

    Ok(Stmt::If(IfStmt {
        branches,
        else_body,
        span: parser.span_from(start),
    }))
}

pub fn parse_while_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let condition = parse_expr(parser, BindingPower::Default)?;
    parser.expect(TokenKind::Do)?;
    let body = parse_block(parser, &[TokenKind::End])?;
    parser.expect_block_end(TokenKind::End, "while")?;

    Ok(Stmt::While(WhileStmt {
        condition,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_do_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let body = parse_block(parser, &[TokenKind::End])?;
    parser.expect_block_end(TokenKind::End, "do")?;

    Ok(Stmt::Do(DoStmt {
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_repeat_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let body = parse_block(parser, &[TokenKind::Until])?;
    parser.expect_block_end(TokenKind::Until, "repeat")?;
    let condition = parse_expr(parser, BindingPower::Default)?;

    Ok(Stmt::Repeat(RepeatStmt {
        body,
        condition,
        span: parser.span_from(start),
    }))
}

/// Numeric `for i = a, b[, c] do ... end` or generic `for k, v in f do ... end`.
pub fn parse_for_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let first = parse_local_name(parser)?;

    if parser.eat(TokenKind::Assignment) {
        let range_start = parse_expr(parser, BindingPower::Default)?;
        parser.expect(TokenKind::Comma)?;
        let stop = parse_expr(parser, BindingPower::Default)?;
        let step = if parser.eat(TokenKind::Comma) {
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };

        parser.expect(TokenKind::Do)?;
        let body = parse_block(parser, &[TokenKind::End])?;
        parser.expect_block_end(TokenKind::End, "for")?;

        return Ok(Stmt::NumericFor(NumericForStmt {
            variable: first,
            start: range_start,
            stop,
            step,
            body,
            span: parser.span_from(start),
        }));
    }

    let mut names = vec![first];
    while parser.eat(TokenKind::Comma) {
        names.push(parse_local_name(parser)?);
    }

    parser.expect(TokenKind::In)?;
    let iterators = parse_expr_list(parser)?;
    parser.expect(TokenKind::Do)?;
    let body = parse_block(parser, &[TokenKind::End])?;
    parser.expect_block_end(TokenKind::End, "for")?;

    Ok(Stmt::ForIn(ForInStmt {
        names,
        iterators,
        body,
        span: parser.span_from(start),
    }))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();

    let ends_block = matches!(
        parser.current_token_kind(),
        TokenKind::EOF | TokenKind::End | TokenKind::Else | TokenKind::Elseif | TokenKind::Until | TokenKind::Semicolon
    );

    let values = if ends_block {
        vec![]
    } else {
        parse_expr_list(parser)?
    };

    Ok(Stmt::Return(ReturnStmt {
        values,
        span: parser.span_from(start),
    }))
}

pub fn parse_break_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let token = parser.advance().clone();
    Ok(Stmt::Break(BreakStmt { span: token.span }))
}

pub fn parse_goto_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let label = parser.expect(TokenKind::Identifier)?.value;

    Ok(Stmt::Goto(GotoStmt {
        label,
        span: parser.span_from(start),
    }))
}

pub fn parse_label_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let name = parser.expect(TokenKind::Identifier)?.value;
    parser.expect(TokenKind::DoubleColon)?;

    Ok(Stmt::Label(LabelStmt {
        name,
        span: parser.span_from(start),
    }))
}

fn parse_generic_params(parser: &mut Parser) -> Result<Vec<String>, Error> {
    let mut generics = vec![];
    if !parser.eat(TokenKind::Less) {
        return Ok(generics);
    }

    loop {
        generics.push(parser.expect(TokenKind::Identifier)?.value);
        if !parser.eat(TokenKind::Comma) {
            break;
        }
    }
    parser.expect_closing_angle()?;

    Ok(generics)
}

/// `{ name: T, other?: int = 1 }` as used by record declarations.
fn parse_record_fields(parser: &mut Parser) -> Result<Vec<RecordField>, Error> {
    parser.expect(TokenKind::OpenCurly)?;

    let mut fields = vec![];
    while parser.current_token_kind() != TokenKind::CloseCurly {
        let name = parser.expect(TokenKind::Identifier)?;
        let optional = parser.eat(TokenKind::Question);

        let explicit_type = if parser.eat(TokenKind::Colon) {
            Some(parse_type(parser, BindingPower::Default)?)
        } else {
            None
        };

        let default_value = if parser.eat(TokenKind::Assignment) {
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };

        fields.push(RecordField {
            name: name.value,
            optional,
            explicit_type,
            default_value,
            span: name.span,
        });

        if !parser.eat(TokenKind::Comma) && !parser.eat(TokenKind::Semicolon) {
            break;
        }
    }

    parser.expect_block_end(TokenKind::CloseCurly, "record")?;
    Ok(fields)
}

/// `type Name<T> = { ... }` declares a record, `type Name<T> = Type` an alias.
fn parse_type_decl_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let name = parser.expect(TokenKind::Identifier)?.value;
    let generics = parse_generic_params(parser)?;
    parser.expect(TokenKind::Assignment)?;

    if parser.current_token_kind() == TokenKind::OpenCurly {
        let fields = parse_record_fields(parser)?;
        return Ok(Stmt::Record(RecordStmt {
            name,
            generics,
            fields,
            installs_metatable: false,
            span: parser.span_from(start),
        }));
    }

    let value = parse_type(parser, BindingPower::Default)?;
    Ok(Stmt::TypeAlias(TypeAliasStmt {
        name,
        generics,
        value,
        span: parser.span_from(start),
    }))
}

/// `record Name<T> { ... }`
fn parse_record_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let name = parser.expect(TokenKind::Identifier)?.value;
    let generics = parse_generic_params(parser)?;
    parser.eat(TokenKind::Assignment);
    let fields = parse_record_fields(parser)?;

    Ok(Stmt::Record(RecordStmt {
        name,
        generics,
        fields,
        installs_metatable: false,
        span: parser.span_from(start),
    }))
}

/// `emit EventName(argument)`
fn parse_emit_stmt(parser: &mut Parser) -> Result<Stmt, Error> {
    let start = parser.advance().span.start.clone();
    let event = parser.expect(TokenKind::Identifier)?.value;

    let argument = if parser.current_token_kind() == TokenKind::String {
        let token = parser.advance().clone();
        Some(Expr::Literal(LiteralExpr { kind: LiteralKind::String, value: token.value, span: token.span }))
    } else {
        parser.expect(TokenKind::OpenParen)?;
        let argument = if parser.current_token_kind() != TokenKind::CloseParen {
            Some(parse_expr(parser, BindingPower::Default)?)
        } else {
            None
        };
        parser.expect(TokenKind::CloseParen)?;
        argument
    };

    Ok(Stmt::Emit(EmitStmt {
        event,
        argument,
        span: Span { start, end: parser.previous_end() },
    }))
}
