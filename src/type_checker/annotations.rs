//! Turns type annotations into types.

use std::collections::HashMap;

use crate::{
    ast::ast::{HeadToken, TypeExpr},
    errors::errors::ErrorCode,
};

use super::{
    generics::instantiate_record,
    matching::merge_union_types,
    signature::primitive_type,
    type_checker::TypeChecker,
    types::{LiteralToken, TypeId, TypeKind},
};

/// Resolves an annotation. `extra` binds the generic parameters in scope.
///
/// Unknown names resolve to `nil`; [`check_is_correct_type_to_use`] reports them.
pub fn resolve_type_expr(checker: &mut TypeChecker, ty: &TypeExpr, extra: &HashMap<String, TypeId>) -> TypeId {
    match ty {
        TypeExpr::Symbol(symbol) => match checker.lookup_type(&symbol.name, extra) {
            Some(found) => found,
            None => match primitive_type(&mut checker.types, &symbol.name) {
                Some(primitive) => primitive,
                None => checker.types.create(TypeKind::Nil),
            },
        },
        TypeExpr::Generic(generic) => {
            let arguments = generic
                .arguments
                .iter()
                .map(|argument| resolve_type_expr(checker, argument, extra))
                .collect::<Vec<TypeId>>();
            resolve_generic(checker, &ty.head_token(), &generic.name, arguments, extra)
        }
        TypeExpr::Union(union) => {
            let mut merged = checker.types.create(TypeKind::Union);
            for member in &union.members {
                let member = resolve_type_expr(checker, member, extra);
                merged = merge_union_types(&mut checker.types, merged, member);
            }
            merged
        }
        TypeExpr::Literal(literal) => {
            let token = LiteralToken::new(literal.literal.kind, literal.literal.value.clone());
            checker.types.create_literal_type(vec![token])
        }
        TypeExpr::Function(function) => {
            let mut arg_names = vec![];
            let mut arg_types = vec![];
            for parameter in &function.parameters {
                arg_names.push(String::new());
                arg_types.push(resolve_type_expr(checker, parameter, extra));
            }
            if function.is_vararg {
                arg_names.push(String::from("..."));
                arg_types.push(checker.types.create(TypeKind::Object));
            }
            let ret = match &function.return_type {
                Some(ret) => resolve_type_expr(checker, ret, extra),
                None => checker.types.create(TypeKind::Object),
            };
            checker.types.create_function(arg_names, arg_types, vec![ret])
        }
    }
}

/// `Array<T>`, `Map<T>` or an instance of a generic record.
pub fn resolve_generic(
    checker: &mut TypeChecker,
    at: &HeadToken,
    name: &str,
    arguments: Vec<TypeId>,
    extra: &HashMap<String, TypeId>,
) -> TypeId {
    match name {
        "Array" | "array" | "Map" | "map" => {
            if arguments.len() != 1 {
                checker.error_at(
                    at,
                    ErrorCode::TypeMismatch,
                    &format!("{} need 1 generic types but got {}", name, arguments.len()),
                );
                return checker.types.create(TypeKind::Object);
            }
            if name.eq_ignore_ascii_case("array") {
                checker.types.create_array(arguments[0])
            } else {
                checker.types.create_map(arguments[0])
            }
        }
        _ => match checker.lookup_type(name, extra) {
            Some(template) if checker.types.get(template).is_record() => {
                instantiate_record(checker, at, template, &arguments)
            }
            _ => {
                checker.error_at(at, ErrorCode::TypeNotFound, &format!("Can't find type {}", name));
                checker.types.create(TypeKind::Object)
            }
        },
    }
}

/// Source form of an annotation, for messages.
pub fn type_expr_text(ty: &TypeExpr) -> String {
    match ty {
        TypeExpr::Symbol(symbol) => symbol.name.clone(),
        TypeExpr::Generic(generic) => format!(
            "{}<{}>",
            generic.name,
            generic
                .arguments
                .iter()
                .map(type_expr_text)
                .collect::<Vec<String>>()
                .join(", ")
        ),
        TypeExpr::Union(union) => union
            .members
            .iter()
            .map(type_expr_text)
            .collect::<Vec<String>>()
            .join(" | "),
        TypeExpr::Literal(literal) => {
            LiteralToken::new(literal.literal.kind, literal.literal.value.clone()).render()
        }
        TypeExpr::Function(function) => {
            let mut parameters = function
                .parameters
                .iter()
                .map(type_expr_text)
                .collect::<Vec<String>>();
            if function.is_vararg {
                parameters.push(String::from("..."));
            }
            let ret = match &function.return_type {
                Some(ret) => type_expr_text(ret),
                None => String::from("object"),
            };
            format!("({}) => {}", parameters.join(", "), ret)
        }
    }
}

/// Rejects types that can not be used for a declaration: unknown names and
/// generic types whose parameters were never filled in.
pub fn check_is_correct_type_to_use(checker: &mut TypeChecker, at: &HeadToken, ty: TypeId, written: &str) -> bool {
    let info = checker.types.get(ty);
    if info.is_nil() || info.is_undefined() {
        checker.error_at(at, ErrorCode::TypeNotFound, &format!("Can't find type {}", written));
        return false;
    }
    let unfilled = ((info.is_array() || info.is_map()) && info.item.is_none())
        || (info.is_record() && !info.generics.is_empty());
    if unfilled {
        checker.error_at(
            at,
            ErrorCode::TypeMismatch,
            &format!("must fill type generic type {}'s type parameters", written),
        );
        return false;
    }
    true
}
