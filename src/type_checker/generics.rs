//! Instantiation of generic records.
//!
//! `G<string>` copies the record `G<T>` and replaces every occurrence of `T`
//! inside its properties, walking through functions, unions, arrays, maps and
//! nested generic records. Parameters are matched by name. An argument that is
//! itself a generic parameter stays free, so `type A<U> = G<U>` works.

use std::collections::HashMap;

use crate::{ast::ast::HeadToken, errors::errors::ErrorCode};

use super::{
    type_checker::TypeChecker,
    types::{TypeArena, TypeId, TypeKind},
};

/// Substitution stops below this depth.
const MAX_SUBSTITUTION_DEPTH: usize = 32;

pub fn instantiate_record(checker: &mut TypeChecker, at: &HeadToken, template: TypeId, arguments: &[TypeId]) -> TypeId {
    let template_info = checker.types.get(template);
    if template_info.generics.len() != arguments.len() {
        let detail = format!(
            "record {} need {} generic types but got {}",
            template_info.record_name,
            template_info.generics.len(),
            arguments.len()
        );
        checker.error_at(at, ErrorCode::TypeMismatch, &detail);
        return checker.types.create(TypeKind::Object);
    }
    if arguments.is_empty() {
        return template;
    }

    let mut bindings = HashMap::new();
    for (parameter, argument) in template_info.generics.iter().zip(arguments) {
        bindings.insert(checker.types.get(*parameter).generic_name.clone(), *argument);
    }

    let instance = checker.types.duplicate(template);
    let rendered_arguments = arguments
        .iter()
        .map(|argument| checker.types.str(*argument))
        .collect::<Vec<String>>()
        .join(",");
    {
        let info = checker.types.get_mut(instance);
        info.record_name = format!("{}<{}>", info.record_name, rendered_arguments);
        info.applied_generics = arguments.to_vec();
    }
    let still_free = arguments
        .iter()
        .copied()
        .filter(|argument| checker.types.get(*argument).is_generic())
        .collect::<Vec<TypeId>>();
    checker.types.get_mut(instance).generics = still_free;

    let mut visited = HashMap::new();
    visited.insert(template, instance);
    let props = checker.types.get(template).props.clone();
    for (name, prop) in props {
        let substituted = substitute(&mut checker.types, prop, &bindings, &mut visited, 0);
        checker.types.get_mut(instance).props.insert(name, substituted);
    }
    log::debug!(
        "instantiated {} from {}",
        checker.types.str(instance),
        checker.types.get(template).record_name
    );
    instance
}

/// Replaces bound generic parameters inside `id`. Returns `id` itself when nothing changed.
fn substitute(
    types: &mut TypeArena,
    id: TypeId,
    bindings: &HashMap<String, TypeId>,
    visited: &mut HashMap<TypeId, TypeId>,
    depth: usize,
) -> TypeId {
    if let Some(done) = visited.get(&id) {
        return *done;
    }
    if depth > MAX_SUBSTITUTION_DEPTH {
        return id;
    }
    let info = types.get(id).clone();
    match info.kind {
        TypeKind::Generic => bindings.get(&info.generic_name).copied().unwrap_or(id),
        TypeKind::Array | TypeKind::Map => {
            let Some(item) = info.item else {
                return id;
            };
            let substituted = substitute(types, item, bindings, visited, depth + 1);
            if substituted == item {
                return id;
            }
            let copy = types.duplicate(id);
            types.get_mut(copy).item = Some(substituted);
            copy
        }
        TypeKind::Union => {
            let members = info
                .union_members
                .iter()
                .map(|member| substitute(types, *member, bindings, visited, depth + 1))
                .collect::<Vec<TypeId>>();
            if members == info.union_members {
                return id;
            }
            let copy = types.duplicate(id);
            types.get_mut(copy).union_members = members;
            copy
        }
        TypeKind::Function => {
            let arg_types = info
                .arg_types
                .iter()
                .map(|arg| substitute(types, *arg, bindings, visited, depth + 1))
                .collect::<Vec<TypeId>>();
            let ret_types = info
                .ret_types
                .iter()
                .map(|ret| substitute(types, *ret, bindings, visited, depth + 1))
                .collect::<Vec<TypeId>>();
            if arg_types == info.arg_types && ret_types == info.ret_types {
                return id;
            }
            let copy = types.duplicate(id);
            let copy_info = types.get_mut(copy);
            copy_info.arg_types = arg_types;
            copy_info.ret_types = ret_types;
            copy
        }
        TypeKind::Record if !info.generics.is_empty() => {
            let copy = types.duplicate(id);
            visited.insert(id, copy);
            let mut props = info.props.clone();
            for prop in props.values_mut() {
                *prop = substitute(types, *prop, bindings, visited, depth + 1);
            }
            let applied = info
                .generics
                .iter()
                .map(|generic| substitute(types, *generic, bindings, visited, depth + 1))
                .collect::<Vec<TypeId>>();
            let generics = applied
                .iter()
                .copied()
                .filter(|generic| types.get(*generic).is_generic())
                .collect::<Vec<TypeId>>();
            let rendered = applied
                .iter()
                .map(|ty| types.str(*ty))
                .collect::<Vec<String>>()
                .join(",");
            let copy_info = types.get_mut(copy);
            copy_info.props = props;
            copy_info.generics = generics;
            copy_info.applied_generics = applied;
            copy_info.record_name = format!("{}<{}>", info.origin_name, rendered);
            copy
        }
        _ => id,
    }
}
