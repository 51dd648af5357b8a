//! The signature grammar used by the built-in globals table.
//!
//! ```text
//! object | ... | void | nil | bool | table | int | number | string | Array | Map | function
//! (A, B, ...) => R
//! R (A, B)
//! record { name: T; other: U }
//! Name            -- a type bound earlier in the table, else object
//! ```
//!
//! Function signatures do not nest parentheses and records do not nest records.

use std::collections::HashMap;

use super::types::{TypeArena, TypeId, TypeKind};

/// Parses `text` into a type. `bindings` holds the named types defined so far.
pub fn of_type_str(types: &mut TypeArena, text: &str, bindings: &HashMap<String, TypeId>) -> TypeId {
    let text = text.trim();

    if let Some(primitive) = primitive_type(types, text) {
        return primitive;
    }

    if text.starts_with('(') {
        let close = text.find(')').unwrap_or(text.len());
        let args = &text[1..close];
        let ret = match text.rfind('>') {
            Some(arrow) => &text[arrow + 1..],
            None => "object",
        };
        return function_type(types, args, ret, bindings);
    }

    if let Some(body) = text.strip_prefix("record") {
        let record = types.create(TypeKind::Record);
        let (Some(open), Some(close)) = (body.find('{'), body.rfind('}')) else {
            return record;
        };
        for prop in body[open + 1..close].split(';') {
            let Some((name, ty)) = prop.split_once(':') else {
                continue;
            };
            let (name, ty) = (name.trim(), ty.trim());
            if name.is_empty() || ty.is_empty() {
                continue;
            }
            let prop_type = of_type_str(types, ty, bindings);
            types.get_mut(record).props.insert(name.to_string(), prop_type);
        }
        return record;
    }

    // legacy `R (A, B)` form
    if let Some(open) = text.find('(') {
        if open > 0 && open < text.len() - 1 && text.ends_with(')') {
            let ret = &text[..open];
            let args = &text[open + 1..text.len() - 1];
            return function_type(types, args, ret, bindings);
        }
    }

    match bindings.get(text) {
        Some(bound) if !types.get(*bound).is_nil() && !types.get(*bound).is_undefined() => *bound,
        _ => types.create(TypeKind::Object),
    }
}

/// The fixed words of the grammar, or `None` for anything else.
pub fn primitive_type(types: &mut TypeArena, word: &str) -> Option<TypeId> {
    let id = match word {
        "object" | "..." => types.create(TypeKind::Object),
        "void" | "nil" => types.create(TypeKind::Nil),
        "bool" | "boolean" => types.create(TypeKind::Bool),
        "table" => types.create(TypeKind::Table),
        "int" | "integer" => types.create(TypeKind::Int),
        "number" | "float" | "double" => types.create(TypeKind::Number),
        "string" => types.create(TypeKind::String),
        "array" | "Array" => {
            let item = types.create(TypeKind::Object);
            types.create_array(item)
        }
        "map" | "Map" => {
            let item = types.create(TypeKind::Object);
            types.create_map(item)
        }
        "function" | "Function" => types.create_any_function(),
        _ => return None,
    };
    Some(id)
}

fn function_type(
    types: &mut TypeArena,
    args: &str,
    ret: &str,
    bindings: &HashMap<String, TypeId>,
) -> TypeId {
    let ret_type = of_type_str(types, ret, bindings);
    let mut arg_names = vec![];
    let mut arg_types = vec![];
    for arg in args.split(',').map(str::trim).filter(|arg| !arg.is_empty()) {
        arg_names.push(if arg == "..." { String::from("...") } else { String::new() });
        arg_types.push(of_type_str(types, arg, bindings));
    }
    types.create_function(arg_names, arg_types, vec![ret_type])
}
