use std::collections::HashMap;

use crate::{
    ast::{
        ast::{Expr, HeadToken, Stmt},
        expressions::{
            BinaryExpr, CallExpr, FunctionBody, FunctionExpr, IndexExpr, IndexKey, LambdaBody, LiteralExpr,
            LiteralKind, PrefixExpr, TableExpr, TableField, VarargExpr,
        },
        statements::{BlockStmt, ReturnStmt},
    },
    errors::errors::ErrorCode,
};

use super::{
    annotations::{check_is_correct_type_to_use, resolve_generic, resolve_type_expr, type_expr_text},
    globals::{CONTRACT_SPECIAL_APIS, RESERVED_NAMES},
    matching::{match_declare_type, min_sharing_declarative_type},
    scope::DefineFlags,
    stmt::check_block,
    type_checker::{ReturnFrame, TypeChecker},
    types::{TypeId, TypeKind},
};

/// Infers the type of an expression. Problems are recorded on the checker and a
/// fallback type (usually `object`) is returned so checking can go on.
pub fn check_expr(checker: &mut TypeChecker, expr: &mut Expr) -> TypeId {
    if matches!(expr, Expr::Lambda(_)) {
        desugar_lambda(expr);
    }
    let at = expr.head_token();

    match expr {
        Expr::Literal(literal) => checker
            .types
            .create_literal_value(literal.kind, &literal.value),
        Expr::Vararg(_) => match checker.lookup_binding("...") {
            Some(binding) => binding.ty,
            None => checker.types.create(TypeKind::Object),
        },
        Expr::Symbol(symbol) => checker.lookup(&at, &symbol.value, true),
        Expr::Index(index) => check_index(checker, index),
        Expr::Call(call) => check_call(checker, &at, call),
        Expr::Function(function) => {
            let signature = build_function_type(checker, &at, &function.function, None);
            check_function_body(checker, &at, "function", &mut function.function, &signature);
            signature.ty
        }
        Expr::Binary(binary) => check_binary(checker, &at, binary),
        Expr::Prefix(prefix) => check_unary(checker, &at, prefix),
        Expr::Paren(paren) => check_expr(checker, &mut paren.inner),
        Expr::Table(table) => check_table(checker, &at, table),
        Expr::GenericInstance(instance) => {
            let arguments = instance
                .type_arguments
                .iter()
                .map(|argument| resolve_type_expr(checker, argument, &HashMap::new()))
                .collect::<Vec<TypeId>>();
            resolve_generic(checker, &at, &instance.name, arguments, &HashMap::new())
        }
        Expr::Lambda(_) => checker.types.create(TypeKind::Object),
    }
}

/// Rewrites `(a) => a + 1` and `a => do ... end` into a function expression.
pub fn desugar_lambda(expr: &mut Expr) {
    if !matches!(expr, Expr::Lambda(_)) {
        return;
    }
    let span = expr.get_span().clone();
    let placeholder = Expr::Vararg(VarargExpr { span: span.clone() });
    let Expr::Lambda(lambda) = std::mem::replace(expr, placeholder) else {
        return;
    };

    let body = match lambda.body {
        LambdaBody::Expr(value) => {
            let value_span = value.get_span().clone();
            BlockStmt {
                body: vec![Stmt::Return(ReturnStmt {
                    values: vec![*value],
                    span: value_span.clone(),
                })],
                id: 0,
                span: value_span,
            }
        }
        LambdaBody::Block(block) => block,
    };

    *expr = Expr::Function(FunctionExpr {
        function: FunctionBody {
            parameters: lambda.parameters,
            is_vararg: lambda.is_vararg,
            return_type: None,
            body,
            span: span.clone(),
        },
        span,
    });
}

/// A function type built from a definition, before its body is checked.
#[derive(Debug, Clone)]
pub struct FunctionSignature {
    pub ty: TypeId,
    pub args: Vec<(String, TypeId)>,
    pub declared_ret: Option<TypeId>,
}

/// Parameter types come from annotations, `object` otherwise; `...` is `Array<object>`.
/// `self_type` prepends a `self` parameter for method definitions.
pub fn build_function_type(
    checker: &mut TypeChecker,
    at: &HeadToken,
    function: &FunctionBody,
    self_type: Option<TypeId>,
) -> FunctionSignature {
    let mut args = vec![];
    if let Some(self_type) = self_type {
        args.push((String::from("self"), self_type));
    }
    for parameter in &function.parameters {
        let ty = match &parameter.explicit_type {
            Some(annotation) => {
                let resolved = resolve_type_expr(checker, annotation, &HashMap::new());
                if check_is_correct_type_to_use(checker, at, resolved, &type_expr_text(annotation)) {
                    resolved
                } else {
                    checker.types.create(TypeKind::Object)
                }
            }
            None => checker.types.create(TypeKind::Object),
        };
        args.push((parameter.name.clone(), ty));
    }
    if function.is_vararg {
        let object = checker.types.create(TypeKind::Object);
        args.push((String::from("..."), checker.types.create_array(object)));
    }

    let declared_ret = function.return_type.as_ref().and_then(|annotation| {
        let resolved = resolve_type_expr(checker, annotation, &HashMap::new());
        check_is_correct_type_to_use(checker, at, resolved, &type_expr_text(annotation)).then_some(resolved)
    });

    let object = checker.types.create(TypeKind::Object);
    let ty = checker.types.create_function(
        args.iter().map(|(name, _)| name.clone()).collect(),
        args.iter().map(|(_, ty)| *ty).collect(),
        vec![declared_ret.unwrap_or(object)],
    );
    FunctionSignature {
        ty,
        args,
        declared_ret,
    }
}

/// Checks a function body in its own frame and fills in the return type from its `return`s.
pub fn check_function_body(
    checker: &mut TypeChecker,
    at: &HeadToken,
    name: &str,
    function: &mut FunctionBody,
    signature: &FunctionSignature,
) {
    checker.enter_proto(at, name, &function.span, Some(signature.ty), signature.args.clone());
    let undefined = checker.types.create(TypeKind::Undefined);
    checker.return_frames.push(ReturnFrame {
        merged: undefined,
        declared: signature.declared_ret,
    });
    check_block(checker, &mut function.body);
    let frame = checker.return_frames.pop();
    checker.exit_proto();

    let ret = match (signature.declared_ret, frame) {
        (Some(declared), _) => declared,
        (None, Some(frame)) => {
            let merged = checker.types.get(frame.merged);
            if merged.is_undefined() || (merged.is_union() && merged.union_members.is_empty()) {
                checker.types.create(TypeKind::Object)
            } else if merged.is_union() && merged.union_members.len() == 1 {
                merged.union_members[0]
            } else {
                frame.merged
            }
        }
        (None, None) => checker.types.create(TypeKind::Object),
    };
    checker.types.get_mut(signature.ty).ret_types = vec![ret];
}

fn check_index(checker: &mut TypeChecker, index: &mut IndexExpr) -> TypeId {
    let object = check_expr(checker, &mut index.object);
    let at = key_token(index);
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
    access_prop(checker, &at, object, &name, key)
}

/// The token of the accessed segment: `c` in `a.b.c`, the key expression in `a[k]`.
pub fn key_token(index: &IndexExpr) -> HeadToken {
    match &index.key {
        IndexKey::Name(name) => HeadToken {
            text: name.clone(),
            line: index.span.end.line,
            column: index.span.end.column.saturating_sub(name.len() as u32),
        },
        IndexKey::Expr(key) => key.head_token(),
    }
}

/// The type of `object.name` / `object[key]`. When the access is not allowed the
/// accessed type itself is returned.
pub fn access_prop(checker: &mut TypeChecker, at: &HeadToken, object: TypeId, name: &str, key: TypeId) -> TypeId {
    if checker.checking_contract && checker.types.get(object).is_contract_type() {
        let is_self = checker
            .lookup_binding("self")
            .map(|binding| binding.ty == object)
            .unwrap_or(false);
        let special = CONTRACT_SPECIAL_APIS.contains(&name);
        if special || (!is_self && name == "storage") {
            checker.error_at(
                at,
                ErrorCode::AccessContractPropertyDisabled,
                &format!("Can't access contract's {} property", name),
            );
            return checker.types.create(TypeKind::Object);
        }
    }

    let key_kind = checker.types.kind(key);
    if !can_access_prop_of_type(checker, at, object, name, key_kind) {
        let detail = format!(
            "type {} can't access property {}",
            checker.types.str(object),
            name
        );
        checker.error_at(at, ErrorCode::TypeMismatch, &detail);
        return object;
    }

    let info = checker.types.get(object).clone();
    let by_number = matches!(key_kind, TypeKind::Int | TypeKind::Number);
    match info.kind {
        TypeKind::Record if by_number => index_by_number_type(checker, object),
        TypeKind::Record => match info.prop(name) {
            Some(prop) => prop,
            None => {
                let detail = format!("Can't access {} of {}", name, checker.types.str(object));
                checker.error_at(at, ErrorCode::TypeMismatch, &detail);
                object
            }
        },
        TypeKind::Array | TypeKind::Map => match info.item {
            Some(item) => item,
            None => checker.types.create(TypeKind::Object),
        },
        _ => checker.types.create(TypeKind::Object),
    }
}

pub fn can_access_prop_of_type(
    checker: &mut TypeChecker,
    at: &HeadToken,
    ty: TypeId,
    name: &str,
    key_kind: TypeKind,
) -> bool {
    let info = checker.types.get(ty).clone();
    match info.kind {
        TypeKind::Object | TypeKind::Table | TypeKind::Map => {
            if matches!(key_kind, TypeKind::Nil | TypeKind::Undefined) {
                let detail = format!(
                    "Can't access type {}'s property by nil property",
                    checker.types.str(ty)
                );
                checker.error_at(at, ErrorCode::TypeMismatch, &detail);
                return false;
            }
            matches!(key_kind, TypeKind::String | TypeKind::Int | TypeKind::Number)
        }
        TypeKind::Union => {
            info.union_members
                .into_iter()
                .any(|member| can_access_prop_of_type(checker, at, member, name, key_kind))
        }
        TypeKind::Record => match key_kind {
            TypeKind::Int | TypeKind::Number => {
                let indexed = index_by_number_type(checker, ty);
                let indexed = checker.types.get(indexed);
                !indexed.is_nil() && !indexed.is_undefined()
            }
            TypeKind::String | TypeKind::Object => info.props.contains_key(name),
            _ => false,
        },
        TypeKind::Array => matches!(key_kind, TypeKind::Int | TypeKind::Number),
        _ => false,
    }
}

/// The type of `value[number]`, or `undefined` when numeric indexing is not allowed.
fn index_by_number_type(checker: &mut TypeChecker, ty: TypeId) -> TypeId {
    let info = checker.types.get(ty).clone();
    match info.kind {
        TypeKind::Object => checker.types.create(TypeKind::Object),
        TypeKind::Array => match info.item {
            Some(item) => item,
            None => checker.types.create(TypeKind::Object),
        },
        TypeKind::Record => {
            let Some(index) = info.prop("__index") else {
                return checker.types.create(TypeKind::Undefined);
            };
            let index = checker.types.get(index);
            if index.is_any_function {
                return checker.types.create(TypeKind::Object);
            }
            if index.is_function()
                && index.arg_types.len() == 1
                && checker.types.get(index.arg_types[0]).is_number()
            {
                if let Some(ret) = index.ret_types.first() {
                    return *ret;
                }
            }
            checker.types.create(TypeKind::Undefined)
        }
        TypeKind::Union => {
            for member in info.union_members {
                let indexed = index_by_number_type(checker, member);
                let indexed_info = checker.types.get(indexed);
                if !indexed_info.is_nil() && !indexed_info.is_undefined() {
                    return indexed;
                }
            }
            checker.types.create(TypeKind::Undefined)
        }
        _ => checker.types.create(TypeKind::Undefined),
    }
}

fn check_call(checker: &mut TypeChecker, at: &HeadToken, call: &mut CallExpr) -> TypeId {
    let arguments = call
        .arguments
        .iter_mut()
        .map(|argument| check_expr(checker, argument))
        .collect::<Vec<TypeId>>();

    if let Some(method) = call.method.clone() {
        return check_method_call(checker, at, &mut call.callee, &method, arguments);
    }

    match call.callee.as_mut() {
        Expr::Symbol(symbol) => {
            let name = symbol.value.clone();
            if RESERVED_NAMES.contains(&name.as_str()) {
                checker.error_at(
                    at,
                    ErrorCode::FunctionNotFound,
                    &format!("Can't use keyword {} as function name", name),
                );
                return checker.types.create(TypeKind::Object);
            }
            let callee = checker.lookup(at, &name, true);
            let info = checker.types.get(callee).clone();
            if info.is_nil() {
                checker.error_at(at, ErrorCode::FunctionNotFound, &format!("Can't find function {}", name));
                return checker.types.create(TypeKind::Object);
            }
            if info.is_record() && (info.record_name == name || info.origin_name == name) {
                return call_constructor(checker, at, &name, callee, arguments);
            }
            if !info.is_function() && info.has_call_prop() {
                if !checker.config.open_record_call_syntax {
                    checker.error_at(
                        at,
                        ErrorCode::RecordCallSyntaxDisabled,
                        "now syntax of treat record as function is not supported",
                    );
                    return checker.types.create(TypeKind::Object);
                }
                let Some(call_prop) = info.prop("__call") else {
                    return checker.types.create(TypeKind::Object);
                };
                return match_call(checker, at, call_prop, vec![callee], arguments, None);
            }
            if name == "import_contract" || name == "import_contract_from_address" {
                if let Some(Expr::Literal(literal)) = call.arguments.first() {
                    if literal.kind == LiteralKind::String {
                        checker.add_imported_contract(&literal.value, at.line);
                    }
                }
                let contract = checker.types.create(TypeKind::Object);
                checker.types.get_mut(contract).is_any_contract = true;
                return contract;
            }
            if info.is_array() {
                let constructor = array_constructor(checker, at, callee);
                return match_call(checker, at, constructor, vec![], arguments, Some(callee));
            }
            match_call(checker, at, callee, vec![], arguments, None)
        }
        Expr::GenericInstance(instance) => {
            let name = instance.name.clone();
            let callee = check_expr(checker, &mut call.callee);
            let info = checker.types.get(callee).clone();
            if info.is_record() {
                call_constructor(checker, at, &name, callee, arguments)
            } else if info.is_array() {
                let constructor = array_constructor(checker, at, callee);
                match_call(checker, at, constructor, vec![], arguments, Some(callee))
            } else {
                checker.call_error(at, callee, None);
                checker.types.create(TypeKind::Object)
            }
        }
        callee_expr => {
            let callee = check_expr(checker, callee_expr);
            if checker.types.get(callee).is_object() {
                let any = checker.types.create_any_function();
                return match_call(checker, at, any, vec![], arguments, None);
            }
            match_call(checker, at, callee, vec![], arguments, None)
        }
    }
}

/// `Name(...)` where `Name` is a record: calls the generated `Name:new` and yields the record.
fn call_constructor(
    checker: &mut TypeChecker,
    at: &HeadToken,
    name: &str,
    record: TypeId,
    arguments: Vec<TypeId>,
) -> TypeId {
    let origin = checker.types.get(record).origin_name.clone();
    let constructor = [format!("{}:new", name), format!("{}:new", origin)]
        .iter()
        .find_map(|constructor| checker.lookup_binding(constructor).map(|binding| binding.ty))
        .filter(|constructor| checker.types.may_be_callable(*constructor));
    match constructor {
        Some(constructor) => match_call(checker, at, constructor, vec![], arguments, Some(record)),
        None => {
            checker.error_at(
                at,
                ErrorCode::TypeMismatch,
                &format!("Can't find constructor of record {}", name),
            );
            checker.types.create(TypeKind::Object)
        }
    }
}

/// `Array<T>(...)`: a variadic constructor registered under the array's rendered name.
fn array_constructor(checker: &mut TypeChecker, at: &HeadToken, array: TypeId) -> TypeId {
    let name = checker.types.str(array);
    if let Some(binding) = checker.lookup_binding(&name) {
        let found = checker.types.get(binding.ty);
        if !found.is_nil() && !found.is_undefined() {
            return binding.ty;
        }
    }
    let object = checker.types.create(TypeKind::Object);
    let constructor = checker
        .types
        .create_function(vec![String::from("...")], vec![object], vec![array]);
    checker.define(at, &name, constructor, DefineFlags::default());
    constructor
}

fn check_method_call(
    checker: &mut TypeChecker,
    at: &HeadToken,
    object_expr: &mut Expr,
    method: &str,
    arguments: Vec<TypeId>,
) -> TypeId {
    let object = check_expr(checker, object_expr);
    if checker.types.get(object).is_contract_type() && CONTRACT_SPECIAL_APIS.contains(&method) {
        checker.error_at(
            at,
            ErrorCode::AccessContractPropertyDisabled,
            &format!("Can't call {} api of contract", method),
        );
        return checker.types.create(TypeKind::Object);
    }

    if !(can_access_prop_of_type(checker, at, object, method, TypeKind::String) || checker.types.get(object).is_object()) {
        let detail = format!("Can't access {} of type {}", method, checker.types.str(object));
        checker.error_at(at, ErrorCode::TypeMismatch, &detail);
        return checker.types.create(TypeKind::Object);
    }

    let object_info = checker.types.get(object).clone();
    let func = match object_info.prop(method) {
        Some(func) if object_info.is_record() => func,
        _ => checker.types.create_any_function(),
    };
    match_call(checker, at, func, vec![object], arguments, None)
}

/// Checks a call against the callee's signature and yields its first return type.
///
/// `pre_args` are implicit leading arguments such as `self`. A callee whose first
/// parameter is `object` accepts anything.
pub fn match_call(
    checker: &mut TypeChecker,
    at: &HeadToken,
    func: TypeId,
    pre_args: Vec<TypeId>,
    arguments: Vec<TypeId>,
    constructed: Option<TypeId>,
) -> TypeId {
    if !checker.types.may_be_callable(func) {
        checker.call_error(at, func, None);
        return checker.types.create(TypeKind::Object);
    }
    let info = checker.types.get(func).clone();
    let checks_args = match info.arg_types.first() {
        None => true,
        Some(first) => !checker.types.get(*first).is_object(),
    };
    if checks_args {
        if info.is_any_function {
            return checker.types.create(TypeKind::Object);
        }
        let mut used = pre_args;
        used.extend(arguments);
        let required = info.min_args_count_require();
        let arity_error = (used.is_empty() && required > 0)
            || used.len() < required
            || (used.len() > info.arg_types.len() && !info.has_var_args());
        if arity_error {
            checker.call_error(at, func, Some(&used));
            return checker.types.create(TypeKind::Object);
        }
        for (declared, real) in info.arg_types.iter().zip(used.iter()).take(required) {
            if !match_declare_type(&checker.types, *declared, *real, true) {
                checker.call_error(at, func, Some(&used));
                return checker.types.create(TypeKind::Object);
            }
        }
    }

    if info.is_function() {
        if let Some(constructed) = constructed {
            return constructed;
        }
        if let Some(ret) = info.ret_types.first() {
            return *ret;
        }
    }
    checker.types.create(TypeKind::Object)
}

fn check_binary(checker: &mut TypeChecker, at: &HeadToken, binary: &mut BinaryExpr) -> TypeId {
    let left = check_expr(checker, &mut binary.left);
    let right = check_expr(checker, &mut binary.right);
    let operator = binary.operator.value.clone();

    let Some(found) = checker.find_operator_func_by_name(&operator, &[left, right]) else {
        checker.set_error(ErrorCode::OperatorNotFound, format!("Can't find bin op {}", operator));
        return checker.types.create(TypeKind::Object);
    };
    let info = checker.types.get(found).clone();
    if info.arg_types.len() != 2 {
        checker.set_error(
            ErrorCode::BinExpError,
            format!("bin operand {} need 2 arguments", operator),
        );
        return checker.types.create(TypeKind::Object);
    }
    operator_result(checker, at, &operator, &info.arg_types, &info.ret_types, &[left, right])
}

fn check_unary(checker: &mut TypeChecker, at: &HeadToken, prefix: &mut PrefixExpr) -> TypeId {
    let operand = check_expr(checker, &mut prefix.right_expr);
    let operator = prefix.operator.value.clone();

    let Some(found) = checker.find_function_by_name(&operator, &[operand]) else {
        checker.set_error(ErrorCode::OperatorNotFound, format!("Can't find un op {}", operator));
        return checker.types.create(TypeKind::Object);
    };
    let info = checker.types.get(found).clone();
    if info.arg_types.len() != 1 {
        checker.set_error(
            ErrorCode::UnExpError,
            format!("un_exp operand {} need 1 arguments", operator),
        );
        return checker.types.create(TypeKind::Object);
    }
    operator_result(checker, at, &operator, &info.arg_types, &info.ret_types, &[operand])
}

/// A fresh value of the operator's return kind; wrong operands are reported but do not change it.
fn operator_result(
    checker: &mut TypeChecker,
    at: &HeadToken,
    operator: &str,
    arg_types: &[TypeId],
    ret_types: &[TypeId],
    operands: &[TypeId],
) -> TypeId {
    let matched = arg_types
        .iter()
        .zip(operands)
        .all(|(declared, real)| match_declare_type(&checker.types, *declared, *real, true));
    if !matched {
        let expected = checker.types.kind(arg_types[0]).name();
        checker.error_at(
            at,
            ErrorCode::FunctionCallWrongType,
            &format!(
                "call {} with wrong type args at line {}, expected {}",
                operator, at.line, expected
            ),
        );
    }
    let kind = match ret_types.first() {
        Some(ret) => checker.types.kind(*ret),
        None => TypeKind::Object,
    };
    checker.types.create(kind)
}

/// Normalises the table literal syntaxes, then infers `Array<T>` for `[...]` and `Map<T>` otherwise.
fn check_table(checker: &mut TypeChecker, at: &HeadToken, table: &mut TableExpr) -> TypeId {
    for field in table.fields.iter_mut() {
        match field {
            TableField::Named { colon_syntax, .. } => *colon_syntax = false,
            TableField::StringKeyed { key, value, span } => {
                let key = Expr::Literal(LiteralExpr {
                    kind: LiteralKind::String,
                    value: key.clone(),
                    span: span.clone(),
                });
                let value = std::mem::replace(value, Expr::Vararg(VarargExpr { span: span.clone() }));
                *field = TableField::Keyed { key, value };
            }
            _ => {}
        }
    }

    let is_array = table.is_array_literal;
    let mut has_array_part = false;
    let mut has_map_part = false;
    let mut item: Option<TypeId> = None;

    for field in table.fields.iter_mut() {
        let value_type = match field {
            TableField::Positional(value) => {
                if !is_array {
                    checker.error_at(at, ErrorCode::TypeMismatch, "Can't put array part in Map");
                }
                has_array_part = true;
                check_expr(checker, value)
            }
            TableField::Named { value, .. } | TableField::StringKeyed { value, .. } => {
                if is_array {
                    checker.error_at(at, ErrorCode::TypeMismatch, "can't add hashmap part in array");
                }
                has_map_part = true;
                check_expr(checker, value)
            }
            TableField::Keyed { key, value } => {
                if is_array {
                    checker.error_at(at, ErrorCode::TypeMismatch, "can't add hashmap part in array");
                }
                has_map_part = true;
                let key_type = check_expr(checker, key);
                if !checker.types.get(key_type).is_string() {
                    checker.error_at(at, ErrorCode::TypeMismatch, "only string can be table key");
                }
                check_expr(checker, value)
            }
        };
        item = Some(match item {
            None => value_type,
            Some(current) => {
                if checker.types.kind(current) != checker.types.kind(value_type)
                    && !checker.types.get(current).is_object()
                {
                    min_sharing_declarative_type(&mut checker.types, current, value_type)
                } else {
                    current
                }
            }
        });
    }

    if has_array_part && has_map_part {
        checker.error_at(
            at,
            ErrorCode::TypeMismatch,
            "Can't put array and hashmap items in one table together",
        );
    }

    let item = match item {
        Some(item) => item,
        None => checker.types.create(TypeKind::Object),
    };
    let result = if is_array {
        checker.types.create_array(item)
    } else {
        checker.types.create_map(item)
    };
    checker.types.get_mut(result).is_literal_empty_table = table.fields.is_empty();
    result
}
