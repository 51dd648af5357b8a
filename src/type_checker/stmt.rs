use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Expr, HeadToken, Stmt, TypeExpr},
        expressions::{IndexKey, LiteralKind},
        statements::{
            AssignmentStmt, BlockStmt, DeclKind, EmitStmt, ForInStmt, FunctionStmt, LocalFunctionStmt,
            LocalStmt, NumericForStmt, RecordStmt, ReturnStmt, TypeAliasStmt,
        },
    },
    errors::errors::ErrorCode,
    Span,
};

use super::{
    annotations::{check_is_correct_type_to_use, resolve_type_expr, type_expr_text},
    expr::{access_prop, build_function_type, check_expr, check_function_body, key_token},
    globals::EMIT_EVENT_NAME_MAX_LEN,
    matching::{match_declare_type, merge_union_types},
    scope::DefineFlags,
    type_checker::TypeChecker,
    types::{TypeId, TypeKind},
};

/// Contract properties that can not be assigned to.
const CONTRACT_FIXED_PROPS: &[&str] = &["id", "name", "storage"];

pub fn check_block(checker: &mut TypeChecker, block: &mut BlockStmt) {
    for stmt in block.iter_mut() {
        check_stmt(checker, stmt);
    }
}

pub fn check_stmt(checker: &mut TypeChecker, stmt: &mut Stmt) {
    let at = stmt.head_token();
    match stmt {
        Stmt::Local(local) => check_local(checker, local),
        Stmt::Assignment(assignment) => check_assignment(checker, &at, assignment),
        Stmt::Expression(stmt) => {
            check_expr(checker, &mut stmt.expression);
        }
        Stmt::Do(stmt) => check_scoped_block(checker, &at, "do", &mut stmt.body),
        Stmt::While(stmt) => {
            check_expr(checker, &mut stmt.condition);
            check_scoped_block(checker, &at, "while", &mut stmt.body);
        }
        Stmt::Repeat(stmt) => {
            // the condition sees the locals of the body
            let span = stmt.body.span.clone();
            checker.enter_proto(&at, "repeat", &span, None, vec![]);
            check_block(checker, &mut stmt.body);
            check_expr(checker, &mut stmt.condition);
            checker.exit_proto();
        }
        Stmt::If(stmt) => {
            for branch in stmt.branches.iter_mut() {
                check_expr(checker, &mut branch.condition);
                check_scoped_block(checker, &at, "if", &mut branch.body);
            }
            if let Some(else_body) = &mut stmt.else_body {
                check_scoped_block(checker, &at, "else", else_body);
            }
        }
        Stmt::NumericFor(stmt) => check_numeric_for(checker, &at, stmt),
        Stmt::ForIn(stmt) => check_for_in(checker, &at, stmt),
        Stmt::Function(stmt) => check_function_stmt(checker, &at, stmt),
        Stmt::LocalFunction(stmt) => check_local_function(checker, &at, stmt),
        Stmt::Return(stmt) => check_return(checker, &at, stmt),
        Stmt::Record(stmt) => check_record(checker, &at, stmt),
        Stmt::TypeAlias(stmt) => check_type_alias(checker, &at, stmt),
        Stmt::Emit(stmt) => check_emit(checker, &at, stmt),
        Stmt::Break(_) | Stmt::Goto(_) | Stmt::Label(_) => {}
    }
}

fn check_scoped_block(checker: &mut TypeChecker, at: &HeadToken, name: &str, block: &mut BlockStmt) {
    let span = block.span.clone();
    checker.enter_proto(at, name, &span, None, vec![]);
    check_block(checker, block);
    checker.exit_proto();
}

fn name_token(name: &str, span: &Span) -> HeadToken {
    HeadToken {
        text: name.to_string(),
        line: span.start.line,
        column: span.start.column,
    }
}

/// An annotation usable for a declaration, or `object` after reporting why it is not.
fn declared_type(checker: &mut TypeChecker, at: &HeadToken, annotation: &TypeExpr) -> TypeId {
    let resolved = resolve_type_expr(checker, annotation, &HashMap::new());
    if check_is_correct_type_to_use(checker, at, resolved, &type_expr_text(annotation)) {
        resolved
    } else {
        checker.types.create(TypeKind::Object)
    }
}

fn check_local(checker: &mut TypeChecker, local: &mut LocalStmt) {
    let values = local
        .values
        .iter_mut()
        .map(|value| check_expr(checker, value))
        .collect::<Vec<TypeId>>();
    let changable = local.kind != DeclKind::Let;

    for (i, name) in local.names.iter().enumerate() {
        let at = name_token(&name.name, &name.span);
        let value = values.get(i).copied();
        let ty = match (&name.explicit_type, value) {
            (Some(annotation), value) => {
                let declared = declared_type(checker, &at, annotation);
                if let Some(value) = value {
                    if !match_declare_type(&checker.types, declared, value, true) {
                        let detail = format!(
                            "declare variable {} type {} but got {}",
                            name.name,
                            checker.types.str(declared),
                            checker.types.str(value)
                        );
                        checker.error_at(&at, ErrorCode::TypeMismatch, &detail);
                    }
                }
                declared
            }
            (None, Some(value)) if !checker.types.get(value).is_undefined() => value,
            (None, _) => checker.types.create(TypeKind::Object),
        };
        checker.define(&at, &name.name, ty, DefineFlags::new_local(changable, value.is_some()));
    }
}

fn check_assignment(checker: &mut TypeChecker, at: &HeadToken, assignment: &mut AssignmentStmt) {
    let values = assignment
        .values
        .iter_mut()
        .map(|value| check_expr(checker, value))
        .collect::<Vec<TypeId>>();

    // targets without a value of their own are left untouched
    for (target, value) in assignment.targets.iter_mut().zip(values) {
        let target_at = target.head_token();
        match target {
            Expr::Symbol(symbol) => {
                let name = symbol.value.clone();
                if checker.lookup_binding(&name).is_none() {
                    let flags = DefineFlags {
                        is_new: true,
                        is_new_global: true,
                        ..DefineFlags::default()
                    };
                    checker.define(&target_at, &name, value, flags);
                    checker.add_created_global(&name, target_at.line);
                } else {
                    checker.define(&target_at, &name, value, DefineFlags::default());
                }
            }
            Expr::Index(index) => {
                let object = check_expr(checker, &mut index.object);
                let prop_at = key_token(index);
                let (name, key) = match &mut index.key {
                    IndexKey::Name(name) => (name.clone(), checker.types.create(TypeKind::String)),
                    IndexKey::Expr(key) => {
                        let name = match key.as_ref() {
                            Expr::Literal(literal) => literal.value.clone(),
                            other => other.head_token().text,
                        };
                        (name, check_expr(checker, key))
                    }
                };
                if checker.checking_contract
                    && checker.types.get(object).is_contract_type()
                    && CONTRACT_FIXED_PROPS.contains(&name.as_str())
                {
                    checker.error_at(
                        &target_at,
                        ErrorCode::AccessContractPropertyDisabled,
                        &format!("Can't change contract's {} property", name),
                    );
                    continue;
                }
                let declared = access_prop(checker, &prop_at, object, &name, key);
                if !match_declare_type(&checker.types, declared, value, true) {
                    let detail = format!(
                        "assign statement type error, declare type is {} and value type is {}",
                        checker.types.str(declared),
                        checker.types.str(value)
                    );
                    checker.error_at(&target_at, ErrorCode::TypeMismatch, &detail);
                }
            }
            other => {
                check_expr(checker, other);
                checker.error_at(at, ErrorCode::SimpleError, "can't assign to this expression");
            }
        }
    }
}

fn check_numeric_for(checker: &mut TypeChecker, at: &HeadToken, stmt: &mut NumericForStmt) {
    let number = checker.types.create(TypeKind::Number);
    let mut bounds = vec![&mut stmt.start, &mut stmt.stop];
    if let Some(step) = &mut stmt.step {
        bounds.push(step);
    }
    let mut all_int = true;
    let mut all_numbers = true;
    for bound in bounds {
        let ty = check_expr(checker, bound);
        all_numbers = all_numbers && match_declare_type(&checker.types, number, ty, true);
        all_int = all_int && checker.types.get(ty).is_int();
    }
    if !all_numbers {
        checker.error_at(
            at,
            ErrorCode::TypeMismatch,
            "for step statement's expressions after `=` keyword must be int/number type",
        );
    }

    let variable_at = name_token(&stmt.variable.name, &stmt.variable.span);
    let ty = match &stmt.variable.explicit_type {
        Some(annotation) => declared_type(checker, &variable_at, annotation),
        None if all_int => checker.types.create(TypeKind::Int),
        None => checker.types.create(TypeKind::Number),
    };
    let span = stmt.body.span.clone();
    checker.enter_proto(at, "for", &span, None, vec![]);
    checker.define(&variable_at, &stmt.variable.name, ty, DefineFlags::new_local(true, true));
    check_block(checker, &mut stmt.body);
    checker.exit_proto();
}

/// `for k, v in pairs(t)` binds `k`/`v` from the collection when it is an `Array` or `Map`.
fn check_for_in(checker: &mut TypeChecker, at: &HeadToken, stmt: &mut ForInStmt) {
    let span = stmt.body.span.clone();
    let proto = checker.enter_proto(at, "for", &span, None, vec![]);

    let mut iterated = vec![];
    for iterator in stmt.iterators.iter_mut() {
        check_expr(checker, iterator);
    }
    if let Some(Expr::Call(call)) = stmt.iterators.first() {
        let iterator_name = call.callee.as_symbol().unwrap_or("");
        if call.method.is_none() && (iterator_name == "pairs" || iterator_name == "ipairs") {
            if let Some(collection) = call.arguments.first() {
                let collection = collection_type(checker, collection);
                let info = checker.types.get(collection).clone();
                if let Some(item) = info.item {
                    if info.is_array() {
                        iterated = vec![checker.types.create(TypeKind::Int), item];
                    } else if info.is_map() {
                        iterated = vec![checker.types.create(TypeKind::String), item];
                    }
                }
            }
        }
    }

    for (i, name) in stmt.names.iter().enumerate() {
        let name_at = name_token(&name.name, &name.span);
        let mut ty = match &name.explicit_type {
            Some(annotation) => declared_type(checker, &name_at, annotation),
            None => checker.types.create(TypeKind::Object),
        };
        if let Some(value) = iterated.get(i).copied() {
            if !checker.types.get(value).is_object() {
                if !match_declare_type(&checker.types, ty, value, true) {
                    let detail = format!(
                        "variable expect {} but got {}",
                        checker.types.str(ty),
                        checker.types.str(value)
                    );
                    checker.error_at(&name_at, ErrorCode::TypeMismatch, &detail);
                }
                ty = value;
            }
        }
        checker.protos[proto]
            .for_namelist
            .push((name.name.clone(), ty, name.explicit_type.is_some()));
        checker.define(&name_at, &name.name, ty, DefineFlags::new_local(true, true));
    }

    check_block(checker, &mut stmt.body);
    checker.exit_proto();
}

/// Type of an already checked expression that only names a variable; `object` otherwise.
fn collection_type(checker: &mut TypeChecker, expr: &Expr) -> TypeId {
    match expr {
        Expr::Symbol(symbol) => match checker.lookup_binding(&symbol.value) {
            Some(binding) => binding.ty,
            None => checker.types.create(TypeKind::Object),
        },
        Expr::Paren(paren) => collection_type(checker, &paren.inner),
        _ => {
            let mut copy = expr.clone();
            check_expr(checker, &mut copy)
        }
    }
}

/// `function f()`, `function a.b()`, `function M:f()` and `offline function M:f()`.
fn check_function_stmt(checker: &mut TypeChecker, at: &HeadToken, stmt: &mut FunctionStmt) {
    let base = stmt.name.base.clone();

    if stmt.name.is_simple() {
        let existed = checker.lookup_binding(&base).is_some();
        let signature = build_function_type(checker, at, &stmt.function, None);
        checker.types.get_mut(signature.ty).is_offline = stmt.is_offline;
        if !existed {
            let flags = DefineFlags {
                is_new: true,
                is_new_global: true,
                ..DefineFlags::default()
            };
            checker.define(at, &base, signature.ty, flags);
            checker.add_created_global(&base, at.line);
        }
        check_function_body(checker, at, &base, &mut stmt.function, &signature);
        if existed {
            checker.define(at, &base, signature.ty, DefineFlags::default());
        }
        return;
    }

    let fields = stmt.name.fields.clone();
    let (path, last_field) = match (&stmt.name.method, fields.split_last()) {
        (Some(_), _) => (fields.as_slice(), None),
        (None, Some((last, path))) => (path, Some(last.clone())),
        (None, None) => (fields.as_slice(), None),
    };
    let mut owner = checker.lookup(at, &base, true);
    let mut owner_name = base.clone();
    for field in path {
        let key = checker.types.create(TypeKind::String);
        owner = access_prop(checker, at, owner, field, key);
        owner_name = format!("{}.{}", owner_name, field);
    }
    let full_name = stmt.name.full_name();

    match (&stmt.name.method, last_field) {
        (None, Some(field)) => {
            if checker.types.get(owner).is_record() {
                let detail = format!(
                    "should use '{}:{}' to define record's member function, don't use '{}.{}' when varname is record type",
                    owner_name, field, owner_name, field
                );
                checker.error_at(at, ErrorCode::TypeMismatch, &detail);
                return;
            }
            let signature = build_function_type(checker, at, &stmt.function, None);
            checker.types.get_mut(signature.ty).is_offline = stmt.is_offline;
            check_function_body(checker, at, &full_name, &mut stmt.function, &signature);
        }
        (Some(method), _) => {
            let method = method.clone();
            let owner_info = checker.types.get(owner).clone();
            let self_type = if owner_info.is_record() {
                owner
            } else if owner_info.is_table() && path.is_empty() {
                let copy = checker.types.duplicate(owner);
                checker.redefine(&base, copy);
                copy
            } else {
                checker.types.create(TypeKind::Table)
            };
            let signature = build_function_type(checker, at, &stmt.function, Some(self_type));
            checker.types.get_mut(signature.ty).is_offline = stmt.is_offline;
            if checker.types.get(self_type).is_like_table() {
                checker.types.get_mut(self_type).props.insert(method, signature.ty);
            }
            check_function_body(checker, at, &full_name, &mut stmt.function, &signature);
        }
        (None, None) => {}
    }
}

fn check_local_function(checker: &mut TypeChecker, at: &HeadToken, stmt: &mut LocalFunctionStmt) {
    let signature = build_function_type(checker, at, &stmt.function, None);
    // visible inside its own body
    checker.define(at, &stmt.name, signature.ty, DefineFlags::new_local(true, true));
    check_function_body(checker, at, &stmt.name, &mut stmt.function, &signature);
}

fn check_return(checker: &mut TypeChecker, at: &HeadToken, stmt: &mut ReturnStmt) {
    if stmt.values.len() > 1 {
        checker.error_at(
            at,
            ErrorCode::ReturnTooManyValues,
            "return too more values(can only accept 1 or 0 value)",
        );
    }
    let values = stmt
        .values
        .iter_mut()
        .map(|value| check_expr(checker, value))
        .collect::<Vec<TypeId>>();
    let ty = match values.first() {
        Some(ty) => *ty,
        None => checker.types.create(TypeKind::Object),
    };

    let Some(frame) = checker.return_frames.last().copied() else {
        return;
    };
    if let Some(declared) = frame.declared {
        if !match_declare_type(&checker.types, declared, ty, true) {
            let detail = format!(
                "function declared return type {} but got {}",
                checker.types.str(declared),
                checker.types.str(ty)
            );
            checker.error_at(at, ErrorCode::TypeMismatch, &detail);
        }
    }
    let left = if checker.types.get(frame.merged).is_undefined() {
        frame.merged
    } else {
        checker.types.duplicate(frame.merged)
    };
    let merged = merge_union_types(&mut checker.types, left, ty);
    if let Some(frame) = checker.return_frames.last_mut() {
        frame.merged = merged;
    }
}

/// Declares the generic parameters of a record or alias as fresh generic types.
fn generic_bindings(
    checker: &mut TypeChecker,
    at: &HeadToken,
    owner: &str,
    generics: &[String],
) -> (HashMap<String, TypeId>, Vec<TypeId>) {
    let mut bindings = HashMap::new();
    let mut ids = vec![];
    for generic in generics {
        if bindings.contains_key(generic) {
            checker.error_at(
                at,
                ErrorCode::TypeMismatch,
                &format!("duplicate generic type {} in {}", generic, owner),
            );
            continue;
        }
        let id = checker.types.create_generic(generic);
        bindings.insert(generic.clone(), id);
        ids.push(id);
    }
    (bindings, ids)
}

/// Binds `Name:new`, the constructor `Name(...)` resolves to.
fn define_constructor(checker: &mut TypeChecker, at: &HeadToken, name: &str, record: TypeId) {
    let object = checker.types.create(TypeKind::Object);
    let rest = checker.types.create_array(object);
    let constructor = checker
        .types
        .create_function(vec![String::from("...")], vec![rest], vec![record]);
    checker.define(at, &format!("{}:new", name), constructor, DefineFlags::new_local(true, true));
}

fn check_record(checker: &mut TypeChecker, at: &HeadToken, record: &mut RecordStmt) {
    let (bindings, generics) = generic_bindings(checker, at, &record.name, &record.generics);

    let ty = checker.types.create(TypeKind::Record);
    {
        let info = checker.types.get_mut(ty);
        info.record_name = record.name.clone();
        info.origin_name = record.name.clone();
        info.all_generics = generics.clone();
        info.generics = generics;
        info.declared = true;
    }
    checker.define_local_type(at, &record.name, ty);

    for field in record.fields.iter_mut() {
        let field_at = name_token(&field.name, &field.span);
        let mut prop = match &field.explicit_type {
            Some(annotation) => {
                let resolved = resolve_type_expr(checker, annotation, &bindings);
                let info = checker.types.get(resolved);
                if info.is_nil() || info.is_undefined() {
                    let written = type_expr_text(annotation);
                    if written == "nil" || written == "undefined" {
                        checker.error_at(
                            &field_at,
                            ErrorCode::TypeMismatch,
                            "Can't use nil or undefined type in record definition",
                        );
                    } else {
                        checker.error_at(
                            &field_at,
                            ErrorCode::TypeNotFound,
                            &format!("Can't find type {}", written),
                        );
                    }
                    checker.types.create(TypeKind::Object)
                } else {
                    resolved
                }
            }
            None => {
                checker.error_at(
                    &field_at,
                    ErrorCode::TypeMismatch,
                    "when define record type, property's type declaration is required",
                );
                continue;
            }
        };
        if field.optional {
            let nil = checker.types.create(TypeKind::Nil);
            prop = checker.types.create_union(&[prop, nil]);
        }

        if let Some(default) = &mut field.default_value {
            let value = check_expr(checker, default);
            if !match_declare_type(&checker.types, prop, value, true) {
                checker.error_at(
                    &field_at,
                    ErrorCode::TypeMismatch,
                    &format!(
                        "default value type error of record {} property {}",
                        record.name, field.name
                    ),
                );
            }
            let text = match default {
                Expr::Literal(literal) if literal.kind == LiteralKind::String => {
                    format!("\"{}\"", literal.value)
                }
                Expr::Literal(literal) => literal.value.clone(),
                other => other.head_token().text,
            };
            checker
                .types
                .get_mut(ty)
                .default_values
                .insert(field.name.clone(), text);
        }
        checker.types.get_mut(ty).props.insert(field.name.clone(), prop);
    }

    record.installs_metatable = checker.types.get(ty).has_meta_method();
    checker.define(at, &record.name, ty, DefineFlags::new_local(true, true));
    define_constructor(checker, at, &record.name, ty);
    log::debug!("record {} declared", checker.types.str(ty));
}

fn check_type_alias(checker: &mut TypeChecker, at: &HeadToken, alias: &mut TypeAliasStmt) {
    let (bindings, _) = generic_bindings(checker, at, &alias.name, &alias.generics);

    // bound before the value so it can refer to itself
    let placeholder = checker.types.create(TypeKind::Record);
    {
        let info = checker.types.get_mut(placeholder);
        info.record_name = alias.name.clone();
        info.origin_name = alias.name.clone();
    }
    checker.define_local_type(at, &alias.name, placeholder);

    let resolved = resolve_type_expr(checker, &alias.value, &bindings);
    let info = checker.types.get(resolved);
    if info.is_nil() || info.is_undefined() {
        let written = type_expr_text(&alias.value);
        if written != "nil" {
            checker.error_at(at, ErrorCode::TypeNotFound, &format!("Can't find type {}", written));
            return;
        }
    }

    checker.types.copy_into(placeholder, resolved);
    if checker.types.get(placeholder).is_record() {
        checker.types.get_mut(placeholder).record_name = alias.name.clone();
        checker.define(at, &alias.name, placeholder, DefineFlags::new_local(true, true));
        define_constructor(checker, at, &alias.name, placeholder);
    }
}

/// `emit Event(arg)`: the event name is recorded for the contract's event list.
fn check_emit(checker: &mut TypeChecker, at: &HeadToken, stmt: &mut EmitStmt) {
    let shadowed = match checker.lookup_binding("emit") {
        Some(binding) => {
            let info = checker.types.get(binding.ty);
            !info.is_nil() && !info.is_undefined()
        }
        None => false,
    };
    if shadowed {
        checker.error_at(
            at,
            ErrorCode::UseWrongSymbolAsName,
            "Can't define variable emit, emit is a keyword",
        );
        return;
    }
    if stmt.event.len() > EMIT_EVENT_NAME_MAX_LEN {
        checker.error_at(
            at,
            ErrorCode::SimpleError,
            &format!(
                "emit event name must be at most {} but got {}",
                EMIT_EVENT_NAME_MAX_LEN, stmt.event
            ),
        );
        return;
    }

    checker.add_emitted_event(&stmt.event);
    let Some(argument) = &mut stmt.argument else {
        return;
    };
    let argument_type = check_expr(checker, argument);
    let info = checker.types.get(argument_type);
    if let Expr::Symbol(symbol) = argument {
        if info.is_nil() || info.is_undefined() {
            checker.error_at(
                at,
                ErrorCode::UseUndefinedVariable,
                &format!("Can't find symbol {}", symbol.value),
            );
            return;
        }
    }
    if !info.is_string() {
        let detail = format!(
            "emit statement argument must be string, but got {}",
            checker.types.str(argument_type)
        );
        checker.error_at(at, ErrorCode::TypeMismatch, &detail);
    }
}
