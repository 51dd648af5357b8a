//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Declarations and assignments
//! - Function declarations and lambdas
//! - Expressions and precedence
//! - Control flow statements
//! - Records, type aliases and emit
//! - Type annotations

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, Stmt, TypeExpr},
        expressions::{IndexKey, LambdaBody, TableField},
        statements::{BlockStmt, DeclKind},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
};

use super::parser::parse;

fn parse_source(source: &str) -> Result<BlockStmt, Error> {
    let tokens = tokenize(source.to_string(), Some("test.glua".to_string()))?;
    let (_, result) = parse(tokens, Rc::new("test.glua".to_string()));
    result
}

fn first_stmt(source: &str) -> Stmt {
    parse_source(source).unwrap().body.remove(0)
}

fn local_value(source: &str) -> Expr {
    match first_stmt(source) {
        Stmt::Local(mut stmt) => stmt.values.remove(0),
        other => panic!("expected local statement, got {}", other.node_name()),
    }
}

#[test]
fn test_parse_local_declarations() {
    match first_stmt("local a: int, b = 1, 2") {
        Stmt::Local(stmt) => {
            assert_eq!(stmt.kind, DeclKind::Local);
            assert_eq!(stmt.names.len(), 2);
            assert!(matches!(stmt.names[0].explicit_type, Some(TypeExpr::Symbol(_))));
            assert!(stmt.names[1].explicit_type.is_none());
            assert_eq!(stmt.values.len(), 2);
        }
        other => panic!("unexpected {}", other.node_name()),
    }

    match first_stmt("let x = 1") {
        Stmt::Local(stmt) => assert_eq!(stmt.kind, DeclKind::Let),
        other => panic!("unexpected {}", other.node_name()),
    }

    match first_stmt("var y") {
        Stmt::Local(stmt) => {
            assert_eq!(stmt.kind, DeclKind::Var);
            assert!(stmt.values.is_empty());
        }
        other => panic!("unexpected {}", other.node_name()),
    }
}

#[test]
fn test_parse_without_semicolons() {
    let block = parse_source("local a = 1\nlocal b = a\nprint(b)").unwrap();
    assert_eq!(block.body.len(), 3);
    assert_eq!(block.id, 0);
    assert!(matches!(block.body[2], Stmt::Expression(_)));
}

#[test]
fn test_parse_semicolons_are_skipped() {
    let block = parse_source("local a = 1; ; a = 2;").unwrap();
    assert_eq!(block.body.len(), 2);
}

#[test]
fn test_parse_function_declarations() {
    match first_stmt("function M:init(a: int, ...): string return 'x' end") {
        Stmt::Function(stmt) => {
            assert_eq!(stmt.name.base, "M");
            assert_eq!(stmt.name.method.as_deref(), Some("init"));
            assert_eq!(stmt.name.full_name(), "M:init");
            assert_eq!(stmt.function.parameters.len(), 1);
            assert!(stmt.function.is_vararg);
            assert!(stmt.function.return_type.is_some());
            assert!(!stmt.is_offline);
        }
        other => panic!("unexpected {}", other.node_name()),
    }

    match first_stmt("offline function M:query() end") {
        Stmt::Function(stmt) => assert!(stmt.is_offline),
        other => panic!("unexpected {}", other.node_name()),
    }

    match first_stmt("local function helper(x) return x end") {
        Stmt::LocalFunction(stmt) => assert_eq!(stmt.name, "helper"),
        other => panic!("unexpected {}", other.node_name()),
    }

    match first_stmt("function a.b.c() end") {
        Stmt::Function(stmt) => {
            assert_eq!(stmt.name.fields, vec!["b".to_string(), "c".to_string()]);
            assert!(!stmt.name.is_simple());
        }
        other => panic!("unexpected {}", other.node_name()),
    }
}

#[test]
fn test_parse_control_flow() {
    let source = "
        if a then b() elseif c then d() else e() end
        while x < 10 do x = x + 1 end
        repeat x = x - 1 until x == 0
        do local y = 1 end
        for i = 1, 10, 2 do print(i) end
        for k, v in pairs(t) do print(k) end
        goto done
        ::done::
    ";
    let block = parse_source(source).unwrap();
    let names: Vec<&str> = block.body.iter().map(|stmt| stmt.node_name()).collect();
    assert_eq!(names, vec!["if_stat", "while_stat", "repeat_stat", "do_stat", "for_step_stat", "for_range_stat", "goto_stat", "label"]);

    match &block.body[0] {
        Stmt::If(stmt) => {
            assert_eq!(stmt.branches.len(), 2);
            assert!(stmt.else_body.is_some());
        }
        _ => unreachable!(),
    }
}

#[test]
fn test_parse_return_forms() {
    let block = parse_source("function f() return end function g() return 1, 2 end").unwrap();
    let returns: Vec<usize> = block
        .body
        .iter()
        .map(|stmt| match stmt {
            Stmt::Function(function) => match &function.function.body.body[0] {
                Stmt::Return(ret) => ret.values.len(),
                _ => usize::MAX,
            },
            _ => usize::MAX,
        })
        .collect();
    assert_eq!(returns, vec![0, 2]);
}

#[test]
fn test_parse_binary_precedence() {
    // 1 + (2 * 3)
    match local_value("local a = 1 + 2 * 3") {
        Expr::Binary(expr) => {
            assert_eq!(expr.operator.value, "+");
            assert!(matches!(*expr.right, Expr::Binary(_)));
        }
        _ => panic!("expected binary expression"),
    }

    // a .. (b .. c)
    match local_value("local s = a .. b .. c") {
        Expr::Binary(expr) => {
            assert!(matches!(*expr.left, Expr::Symbol(_)));
            assert!(matches!(*expr.right, Expr::Binary(_)));
        }
        _ => panic!("expected binary expression"),
    }

    // (not a) == b
    match local_value("local c = not a == b") {
        Expr::Binary(expr) => {
            assert_eq!(expr.operator.value, "==");
            assert!(matches!(*expr.left, Expr::Prefix(_)));
        }
        _ => panic!("expected binary expression"),
    }
}

#[test]
fn test_parse_calls_and_members() {
    match local_value("local v = obj.field[1]:method('x')") {
        Expr::Call(call) => {
            assert_eq!(call.method.as_deref(), Some("method"));
            assert_eq!(call.arguments.len(), 1);
            match *call.callee {
                Expr::Index(index) => assert!(matches!(index.key, IndexKey::Expr(_))),
                _ => panic!("expected index callee"),
            }
        }
        _ => panic!("expected call"),
    }

    match local_value("local v = require 'module'") {
        Expr::Call(call) => assert_eq!(call.arguments.len(), 1),
        _ => panic!("expected call"),
    }
}

#[test]
fn test_parse_table_literals() {
    match local_value("local t = { 1, name = 2, label: 3, 'quoted': 4, [k] = 5 }") {
        Expr::Table(table) => {
            assert!(!table.is_array_literal);
            assert!(matches!(table.fields[0], TableField::Positional(_)));
            assert!(matches!(table.fields[1], TableField::Named { colon_syntax: false, .. }));
            assert!(matches!(table.fields[2], TableField::Named { colon_syntax: true, .. }));
            assert!(matches!(table.fields[3], TableField::StringKeyed { .. }));
            assert!(matches!(table.fields[4], TableField::Keyed { .. }));
        }
        _ => panic!("expected table"),
    }

    match local_value("local arr = [1, 2, 3]") {
        Expr::Table(table) => {
            assert!(table.is_array_literal);
            assert_eq!(table.fields.len(), 3);
        }
        _ => panic!("expected array literal"),
    }

    match local_value("local nested = { [1, 2] }") {
        Expr::Table(table) => match &table.fields[0] {
            TableField::Positional(Expr::Table(inner)) => assert!(inner.is_array_literal),
            _ => panic!("expected positional array literal"),
        },
        _ => panic!("expected table"),
    }
}

#[test]
fn test_parse_lambdas() {
    match local_value("local f = (a: int, b) => a + b") {
        Expr::Lambda(lambda) => {
            assert_eq!(lambda.parameters.len(), 2);
            assert!(lambda.parameters[0].explicit_type.is_some());
            assert!(matches!(lambda.body, LambdaBody::Expr(_)));
        }
        _ => panic!("expected lambda"),
    }

    match local_value("local g = x => do return x end") {
        Expr::Lambda(lambda) => assert!(matches!(lambda.body, LambdaBody::Block(_))),
        _ => panic!("expected lambda"),
    }

    assert!(matches!(local_value("local p = (a + b)"), Expr::Paren(_)));
}

#[test]
fn test_parse_generic_instance_and_comparison() {
    match local_value("local c = Contract<Storage>()") {
        Expr::Call(call) => assert!(matches!(*call.callee, Expr::GenericInstance(_))),
        _ => panic!("expected generic instance call"),
    }

    match local_value("local d = Map<Array<int>>()") {
        Expr::Call(call) => match *call.callee {
            Expr::GenericInstance(instance) => {
                assert_eq!(instance.name, "Map");
                assert!(matches!(instance.type_arguments[0], TypeExpr::Generic(_)));
            }
            _ => panic!("expected generic instance"),
        },
        _ => panic!("expected call"),
    }

    // plain comparison falls back after the speculative parse fails
    match local_value("local lt = a < b") {
        Expr::Binary(expr) => assert_eq!(expr.operator.value, "<"),
        _ => panic!("expected comparison"),
    }

    match local_value("local shifted = a >> 2") {
        Expr::Binary(expr) => assert_eq!(expr.operator.value, ">>"),
        _ => panic!("expected shift"),
    }
}

#[test]
fn test_parse_records_and_aliases() {
    match first_stmt("type Person<T> = { name: string, age?: int = 18; extra: T }") {
        Stmt::Record(record) => {
            assert_eq!(record.name, "Person");
            assert_eq!(record.generics, vec!["T".to_string()]);
            assert_eq!(record.fields.len(), 3);
            assert!(record.fields[1].optional);
            assert!(record.fields[1].default_value.is_some());
        }
        other => panic!("unexpected {}", other.node_name()),
    }

    match first_stmt("record Box<T> { value: T }") {
        Stmt::Record(record) => assert_eq!(record.fields.len(), 1),
        other => panic!("unexpected {}", other.node_name()),
    }

    match first_stmt("type Names = Array<string>") {
        Stmt::TypeAlias(alias) => {
            assert_eq!(alias.name, "Names");
            assert!(matches!(alias.value, TypeExpr::Generic(_)));
        }
        other => panic!("unexpected {}", other.node_name()),
    }

    // `type` stays a usable name outside declarations
    assert!(matches!(first_stmt("type(a)"), Stmt::Expression(_)));
}

#[test]
fn test_parse_type_annotations() {
    match first_stmt("local a: int | string | nil") {
        Stmt::Local(stmt) => match &stmt.names[0].explicit_type {
            Some(TypeExpr::Union(union)) => assert_eq!(union.members.len(), 3),
            _ => panic!("expected union"),
        },
        other => panic!("unexpected {}", other.node_name()),
    }

    match first_stmt("local f: (int, string) => bool") {
        Stmt::Local(stmt) => match &stmt.names[0].explicit_type {
            Some(TypeExpr::Function(function)) => {
                assert_eq!(function.parameters.len(), 2);
                assert!(function.return_type.is_some());
            }
            _ => panic!("expected function type"),
        },
        other => panic!("unexpected {}", other.node_name()),
    }

    match first_stmt("local color: \"red\" | \"blue\" = \"red\"") {
        Stmt::Local(stmt) => match &stmt.names[0].explicit_type {
            Some(TypeExpr::Union(union)) => assert!(matches!(union.members[0], TypeExpr::Literal(_))),
            _ => panic!("expected literal union"),
        },
        other => panic!("unexpected {}", other.node_name()),
    }
}

#[test]
fn test_parse_emit() {
    match first_stmt("emit Transfer(\"done\")") {
        Stmt::Emit(emit) => {
            assert_eq!(emit.event, "Transfer");
            assert!(emit.argument.is_some());
        }
        other => panic!("unexpected {}", other.node_name()),
    }
}

#[test]
fn test_parse_invalid_assignment_target() {
    let error = parse_source("f() = 1").unwrap_err();
    assert!(matches!(error.get_internal_error(), ErrorImpl::InvalidAssignmentTarget { .. }));
}

#[test]
fn test_parse_bare_expression_rejected() {
    assert!(parse_source("a + 1").is_err());
}

#[test]
fn test_parse_unterminated_block() {
    let error = parse_source("if a then b()").unwrap_err();
    match error.get_internal_error() {
        ErrorImpl::UnterminatedBlock { construct, expected } => {
            assert_eq!(construct, "if");
            assert_eq!(expected, "end");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_parse_positions() {
    let block = parse_source("local a = 1\n  local b = 2").unwrap();
    let span = block.body[1].get_span();
    assert_eq!(span.start.line, 2);
    assert_eq!(span.start.column, 3);
}

#[test]
fn test_parse_block_ids_are_unique() {
    let block = parse_source("do end do end").unwrap();
    let ids: Vec<i32> = block
        .body
        .iter()
        .filter_map(|stmt| match stmt {
            Stmt::Do(stmt) => Some(stmt.body.id),
            _ => None,
        })
        .collect();
    assert_eq!(ids.len(), 2);
    assert_ne!(ids[0], ids[1]);
    assert!(ids.iter().all(|id| *id > 0));
}
