//! Assignability, union merging and common supertypes.

use super::types::{TypeArena, TypeId, TypeKind};

/// Nested types deeper than this are assumed to match.
const MAX_MATCH_DEPTH: usize = 32;

/// Whether a value of type `real` may be stored where `declare` is expected.
///
/// `type_up` forbids narrowing a `number` into an `int`.
pub fn match_declare_type(types: &TypeArena, declare: TypeId, real: TypeId, type_up: bool) -> bool {
    match_at(types, declare, real, type_up, 0)
}

fn match_at(types: &TypeArena, declare_id: TypeId, real_id: TypeId, type_up: bool, depth: usize) -> bool {
    if declare_id == real_id || depth > MAX_MATCH_DEPTH {
        return true;
    }
    let declare = types.get(declare_id);
    let real = types.get(real_id);

    // TODO: only accept nil where the declaration allows it (unions, optional fields), and make
    // `Map<T>[key]` yield `T | nil`
    if real.is_nil() {
        return true;
    }
    if declare.is_object() {
        return true;
    }

    if declare.kind == TypeKind::Number && real.kind == TypeKind::Int {
        return true;
    }
    if type_up && declare.kind == TypeKind::Int && real.kind == TypeKind::Number {
        return false;
    }

    if declare.is_like_table() && real.is_like_table() {
        if declare.is_narrow_table() {
            return true;
        }
        match declare.kind {
            TypeKind::Record => {
                if real.is_narrow_table() || real.is_map() {
                    return true;
                }
                if real.is_array() {
                    return false;
                }
                // two records fall through to the property comparison below
            }
            TypeKind::Map => {
                if real.is_narrow_table() {
                    return true;
                }
                if real.is_record() || real.is_array() {
                    return false;
                }
                if is_empty_literal_of_object(types, real_id) {
                    return true;
                }
                return match_items(types, declare.item, real.item, type_up, depth);
            }
            TypeKind::Array => {
                if real.is_narrow_table() {
                    return true;
                }
                if real.is_record() || real.is_map() {
                    return false;
                }
                if is_empty_literal_of_object(types, real_id) {
                    return true;
                }
                return match_items(types, declare.item, real.item, type_up, depth);
            }
            _ => {}
        }
    }

    if matches!(declare.kind, TypeKind::Table | TypeKind::Map)
        && matches!(real.kind, TypeKind::Record | TypeKind::Array | TypeKind::Map)
    {
        return true;
    }
    if (declare.is_record() || real.is_array() || real.is_map())
        && matches!(real.kind, TypeKind::Table | TypeKind::Map)
    {
        return true;
    }

    if declare.is_union() {
        if real.is_union() {
            if declare.union_members.len() != real.union_members.len() {
                return false;
            }
            return declare.union_members.iter().all(|wanted| {
                real.union_members
                    .iter()
                    .any(|member| match_at(types, *wanted, *member, true, depth + 1))
            });
        }
        return declare
            .union_members
            .iter()
            .any(|member| match_at(types, *member, real_id, true, depth + 1));
    }

    if declare.is_literal_type() {
        if declare.match_literal_type(real) {
            return true;
        }
        if real.is_literal_token_value && real.is_literal_item_type() {
            return match &real.literal_value_token {
                Some(token) => declare.match_literal_value(token),
                None => false,
            };
        }
        return false;
    }
    if real.is_literal_type() {
        if declare.is_literal_item_type() {
            return real.contains_literal_item_type(declare);
        }
        return false;
    }

    if (declare.kind == TypeKind::Table && matches!(real.kind, TypeKind::Array | TypeKind::Map))
        || (matches!(declare.kind, TypeKind::Array | TypeKind::Map) && real.kind == TypeKind::Table)
    {
        return true;
    }

    if declare.kind != real.kind {
        return false;
    }

    match declare.kind {
        TypeKind::Record => {
            if !types.is_same_record(declare_id, real_id) {
                return false;
            }
            declare.props.iter().all(|(name, prop)| match real.props.get(name) {
                Some(other) => match_at(types, *prop, *other, true, depth + 1),
                None => false,
            })
        }
        TypeKind::Array | TypeKind::Map => match_items(types, declare.item, real.item, true, depth),
        TypeKind::Function => {
            if declare.is_any_function {
                return true;
            }
            if declare.arg_types.len() != real.arg_types.len()
                || declare.ret_types.len() != real.ret_types.len()
            {
                return false;
            }
            declare
                .arg_types
                .iter()
                .zip(real.arg_types.iter())
                .chain(declare.ret_types.iter().zip(real.ret_types.iter()))
                .all(|(wanted, got)| match_at(types, *wanted, *got, true, depth + 1))
        }
        _ => true,
    }
}

fn match_items(
    types: &TypeArena,
    declare: Option<TypeId>,
    real: Option<TypeId>,
    type_up: bool,
    depth: usize,
) -> bool {
    match (declare, real) {
        (Some(declare), Some(real)) => match_at(types, declare, real, type_up, depth + 1),
        (None, _) => true,
        (Some(declare), None) => types.get(declare).is_object(),
    }
}

/// `{}` or `[]` written in source, whose element type is still `object`.
fn is_empty_literal_of_object(types: &TypeArena, id: TypeId) -> bool {
    let info = types.get(id);
    info.is_literal_empty_table
        && match info.item {
            Some(item) => types.get(item).is_object(),
            None => true,
        }
}

/// Merges two types into a union, reusing one of the inputs where possible.
///
/// A union on the left absorbs the right side in place, so callers that must not
/// disturb the left type pass a copy.
pub fn merge_union_types(types: &mut TypeArena, t1: TypeId, t2: TypeId) -> TypeId {
    if types.get(t1).is_undefined() {
        return types.duplicate(t2);
    }
    if types.get(t1).is_union() {
        if types.get(t1).union_members.is_empty() && types.get(t2).is_literal_type() {
            types.copy_into(t1, t2);
            return t1;
        }
        if !types.get(t2).is_union() {
            types.union_insert(t1, t2);
            return t1;
        }
        let members = types.get(t2).union_members.clone();
        for member in members {
            types.union_insert(t1, member);
        }
        return t1;
    }
    if types.get(t2).is_union() {
        if types.get(t2).union_members.is_empty() && types.get(t1).is_literal_type() {
            return types.duplicate(t1);
        }
        types.union_insert(t2, t1);
        return t2;
    }
    if types.get(t1).is_literal_type() && types.get(t2).is_literal_type() {
        let mut options = types.get(t1).literal_options.clone();
        for option in types.get(t2).literal_options.clone() {
            if !options.contains(&option) {
                options.push(option);
            }
        }
        let merged = types.create_literal_type(options);
        types.copy_into(t1, merged);
        return t1;
    }
    if types.kind(t1) == types.kind(t2) {
        return t2;
    }
    if types.get(t1).is_record() && types.get(t2).is_narrow_table() {
        return t1;
    }
    types.create_union(&[t1, t2])
}

fn parent_types(types: &mut TypeArena, id: TypeId) -> Vec<TypeId> {
    let object = types.create(TypeKind::Object);
    match types.kind(id) {
        TypeKind::Int => vec![types.create(TypeKind::Number), object],
        TypeKind::Array | TypeKind::Map | TypeKind::Record => vec![types.create(TypeKind::Table), object],
        _ => vec![object],
    }
}

/// The narrowest type both `t1` and `t2` can be stored in.
pub fn min_sharing_declarative_type(types: &mut TypeArena, t1: TypeId, t2: TypeId) -> TypeId {
    if t1 == t2 || match_declare_type(types, t1, t2, true) {
        return t1;
    }
    if match_declare_type(types, t2, t1, true) {
        return t2;
    }
    for parent in parent_types(types, t1) {
        if match_declare_type(types, parent, t2, true) {
            return parent;
        }
    }
    types.create(TypeKind::Object)
}
