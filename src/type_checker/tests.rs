//! Unit tests for the type checker.
//!
//! Covers the match engine and union merging directly on a type arena, and
//! the inferencer, generic records and contract rules through small programs.

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Expr, Stmt},
        expressions::LiteralKind,
        statements::BlockStmt,
    },
    errors::errors::{Diagnostic, ErrorCode},
    lexer::lexer::tokenize,
    parser::parser::parse,
};

use super::{
    matching::{match_declare_type, merge_union_types, min_sharing_declarative_type},
    type_checker::{CheckerConfig, TypeChecker},
    types::{LiteralToken, TypeArena, TypeId, TypeKind},
};

fn parse_program(source: &str) -> BlockStmt {
    let tokens = tokenize(source.to_string(), Some("test.glua".to_string())).unwrap();
    let (_, ast) = parse(tokens, Rc::new("test.glua".to_string()));
    ast.unwrap()
}

fn check_with(source: &str, config: CheckerConfig) -> (TypeChecker, Result<TypeId, Vec<Diagnostic>>, BlockStmt) {
    let mut ast = parse_program(source);
    let contract_mode = config.contract_mode;
    let mut checker = TypeChecker::new(config);
    let result = checker.check(&mut ast, contract_mode);
    (checker, result, ast)
}

fn check(source: &str) -> (TypeChecker, Result<TypeId, Vec<Diagnostic>>) {
    let (checker, result, _) = check_with(source, CheckerConfig::default());
    (checker, result)
}

fn check_contract(source: &str) -> (TypeChecker, Result<TypeId, Vec<Diagnostic>>) {
    let config = CheckerConfig {
        contract_mode: true,
        ..CheckerConfig::default()
    };
    let (checker, result, _) = check_with(source, config);
    (checker, result)
}

fn assert_ok(source: &str) -> TypeChecker {
    let (checker, result) = check(source);
    if let Err(errors) = result {
        panic!("expected no type errors, got {:?}", errors);
    }
    checker
}

fn errors_of(result: Result<TypeId, Vec<Diagnostic>>) -> Vec<Diagnostic> {
    match result {
        Ok(_) => panic!("expected type errors"),
        Err(errors) => errors,
    }
}

fn assert_error(result: Result<TypeId, Vec<Diagnostic>>, code: ErrorCode, fragment: &str) {
    let errors = errors_of(result);
    assert!(
        errors
            .iter()
            .any(|error| error.code == code && error.message.contains(fragment)),
        "no {:?} error containing {:?} in {:?}",
        code,
        fragment,
        errors
    );
}

/// Type of the most recently created binding called `name`, in any frame.
fn binding_type(checker: &TypeChecker, name: &str) -> TypeId {
    checker
        .protos
        .iter()
        .rev()
        .find_map(|proto| proto.localvars.get(name))
        .map(|binding| binding.ty)
        .unwrap_or_else(|| panic!("no binding named {}", name))
}

fn record(types: &mut TypeArena, name: &str, props: &[(&str, TypeId)]) -> TypeId {
    let id = types.create(TypeKind::Record);
    let info = types.get_mut(id);
    info.record_name = name.to_string();
    info.origin_name = name.to_string();
    for (prop, ty) in props {
        info.props.insert(prop.to_string(), *ty);
    }
    id
}

fn string_literal_type(types: &mut TypeArena, options: &[&str]) -> TypeId {
    types.create_literal_type(
        options
            .iter()
            .map(|option| LiteralToken::new(LiteralKind::String, *option))
            .collect(),
    )
}

#[test]
fn test_match_is_reflexive() {
    let mut types = TypeArena::new();
    let int = types.create(TypeKind::Int);
    let string = types.create(TypeKind::String);
    let array = types.create_array(int);
    let map = types.create_map(string);
    let person = record(&mut types, "Person", &[("name", string)]);
    let function = types.create_function(vec![String::from("a")], vec![int], vec![string]);
    let union = types.create_union(&[int, string]);
    let literal = string_literal_type(&mut types, &["a", "b"]);

    for ty in [int, string, array, map, person, function, union, literal] {
        assert!(match_declare_type(&types, ty, ty, true), "{}", types.str(ty));
        let copy = types.duplicate(ty);
        assert!(match_declare_type(&types, ty, copy, true), "{}", types.str(ty));
    }

    let other_array = types.create_array(int);
    assert!(match_declare_type(&types, array, other_array, true));
}

#[test]
fn test_int_number_asymmetry() {
    let mut types = TypeArena::new();
    let int = types.create(TypeKind::Int);
    let number = types.create(TypeKind::Number);

    assert!(match_declare_type(&types, number, int, true));
    assert!(!match_declare_type(&types, int, number, true));
}

#[test]
fn test_nil_matches_every_declared_type() {
    let mut types = TypeArena::new();
    let nil = types.create(TypeKind::Nil);
    let int = types.create(TypeKind::Int);
    let array = types.create_array(int);
    let person = record(&mut types, "Person", &[]);
    let function = types.create_function(vec![], vec![], vec![int]);
    let literal = string_literal_type(&mut types, &["a"]);

    for declared in [int, array, person, function, literal] {
        assert!(match_declare_type(&types, declared, nil, true));
    }
}

#[test]
fn test_table_lattice() {
    let mut types = TypeArena::new();
    let int = types.create(TypeKind::Int);
    let string = types.create(TypeKind::String);
    let object = types.create(TypeKind::Object);
    let table = types.create(TypeKind::Table);
    let person = record(&mut types, "Person", &[("name", string)]);
    let other_person = record(&mut types, "Person", &[("name", string)]);
    let animal = record(&mut types, "Animal", &[("name", string)]);
    let map_int = types.create_map(int);
    let map_string = types.create_map(string);
    let array_int = types.create_array(int);
    let array_string = types.create_array(string);

    let empty_map = types.create_map(object);
    types.get_mut(empty_map).is_literal_empty_table = true;
    let empty_array = types.create_array(object);
    types.get_mut(empty_array).is_literal_empty_table = true;

    let matches = |declared: TypeId, real: TypeId| match_declare_type(&types, declared, real, true);

    for real in [table, person, map_int, array_int] {
        assert!(matches(table, real));
    }

    assert!(matches(person, table));
    assert!(matches(person, other_person));
    assert!(!matches(person, animal));
    assert!(matches(person, map_int));
    assert!(!matches(person, array_int));

    assert!(matches(map_int, table));
    assert!(!matches(map_int, person));
    assert!(matches(map_int, map_int));
    assert!(!matches(map_int, map_string));
    assert!(matches(map_int, empty_map));
    assert!(!matches(map_int, array_int));

    assert!(matches(array_int, table));
    assert!(!matches(array_int, person));
    assert!(!matches(array_int, map_int));
    assert!(matches(array_int, array_int));
    assert!(!matches(array_int, array_string));
    assert!(matches(array_int, empty_array));
}

#[test]
fn test_merge_literal_types_deduplicates_options() {
    let mut types = TypeArena::new();
    let left = string_literal_type(&mut types, &["a", "b"]);
    let right = string_literal_type(&mut types, &["b", "c"]);

    let merged = merge_union_types(&mut types, left, right);
    let options = types
        .get(merged)
        .literal_options
        .iter()
        .map(|option| option.text.clone())
        .collect::<Vec<String>>();
    assert_eq!(options, vec!["a", "b", "c"]);
}

#[test]
fn test_merge_union_types() {
    let mut types = TypeArena::new();
    let undefined = types.create(TypeKind::Undefined);
    let int = types.create(TypeKind::Int);
    let string = types.create(TypeKind::String);

    let copied = merge_union_types(&mut types, undefined, int);
    assert_ne!(copied, int);
    assert_eq!(types.kind(copied), TypeKind::Int);

    let union = merge_union_types(&mut types, int, string);
    assert_eq!(types.str(union), "int|string");

    let same = merge_union_types(&mut types, union, string);
    assert_eq!(same, union);
    assert_eq!(types.get(union).union_members.len(), 2);
}

#[test]
fn test_min_sharing_declarative_type() {
    let mut types = TypeArena::new();
    let int = types.create(TypeKind::Int);
    let number = types.create(TypeKind::Number);
    let string = types.create(TypeKind::String);
    let array = types.create_array(int);
    let map = types.create_map(string);

    let shared = min_sharing_declarative_type(&mut types, int, number);
    assert_eq!(types.kind(shared), TypeKind::Number);
    let shared = min_sharing_declarative_type(&mut types, int, string);
    assert_eq!(types.kind(shared), TypeKind::Object);
    let shared = min_sharing_declarative_type(&mut types, array, map);
    assert_eq!(types.kind(shared), TypeKind::Table);
}

#[test]
fn test_duplicate_local_in_one_frame() {
    let (_, result) = check("local x = 1\nlocal x = 2");
    assert_error(result, ErrorCode::DuplicateVariable, "can't declare duplicate variable x");

    assert_ok("local x = 1\ndo\n    local x = 2\nend");
}

#[test]
fn test_let_binding_is_initialized_once() {
    assert_ok("let a\na = 1");

    let (_, result) = check("let a\na = 1\na = 2");
    assert_error(result, ErrorCode::ImmutableReassignment, "changing variable a that can't be changed");

    let (_, result) = check("let b = 1\nb = 2");
    assert_error(result, ErrorCode::ImmutableReassignment, "changing variable b");
}

#[test]
fn test_declared_int_stays_int_after_arithmetic() {
    let checker = assert_ok("var a: int = 1\na = a + 1");
    let a = binding_type(&checker, "a");
    assert_eq!(checker.type_str(a), "int");

    let (_, result) = check("var b: int = 1\nb = 1.5");
    assert_error(result, ErrorCode::TypeMismatch, "variable declared as type int but got number");
}

#[test]
fn test_generic_record_instantiation() {
    let checker = assert_ok("record G<T> { v: T }\nlocal g = G<string>()\nlocal s: string = g.v");
    let g = checker.type_info(binding_type(&checker, "g"));
    assert!(g.is_record());
    assert!(g.generics.is_empty());
    assert_eq!(g.applied_generics.len(), 1);
    let v = g.prop("v").unwrap();
    assert_eq!(checker.type_info(v).kind, TypeKind::String);
}

#[test]
fn test_nested_generic_substitution() {
    let checker = assert_ok("record Box<T> { items: Array<T> }\nlocal b = Box<int>()\nlocal xs: Array<int> = b.items");
    let b = checker.type_info(binding_type(&checker, "b"));
    let items = b.prop("items").unwrap();
    assert_eq!(checker.type_str(items), "Array<int>");
}

#[test]
fn test_generic_arity_and_unfilled_parameters() {
    let (_, result) = check("record G<T> { v: T }\nlocal g: G<int, string>");
    assert_error(result, ErrorCode::TypeMismatch, "record G need 1 generic types but got 2");

    let (_, result) = check("record G<T> { v: T }\nlocal g: G");
    assert_error(result, ErrorCode::TypeMismatch, "must fill type generic type G's type parameters");
}

#[test]
fn test_generic_instances_with_different_arguments_do_not_match() {
    let (_, result) = check("record G<T> { v: T }\nlocal a = G<string>()\nlocal b: G<int> = a");
    assert_error(result, ErrorCode::TypeMismatch, "declare variable b type");

    assert_ok("record G<T> { v: T }\nlocal a = G<string>()\nlocal b: G<string> = a");
}

#[test]
fn test_array_literal_infers_common_number_type() {
    let checker = assert_ok("local xs = [1, 2.5, 3]");
    assert_eq!(checker.type_str(binding_type(&checker, "xs")), "Array<number>");

    let checker = assert_ok("local names = { first = \"a\", second = \"b\" }");
    assert_eq!(checker.type_str(binding_type(&checker, "names")), "Map<string>");
}

#[test]
fn test_table_literal_errors() {
    let (_, result) = check("local t = { 1, name = 2 }");
    assert_error(result, ErrorCode::TypeMismatch, "Can't put array part in Map");

    let (_, result) = check("local t = { 1, name = 2 }");
    assert_error(result, ErrorCode::TypeMismatch, "Can't put array and hashmap items in one table together");

    let (_, result) = check("local t = { [1] = 2 }");
    assert_error(result, ErrorCode::TypeMismatch, "only string can be table key");
}

#[test]
fn test_function_call_arguments_are_checked() {
    let (_, result) = check("local function apply(f: (int, string) => bool)\n    return f(1, 2)\nend");
    assert_error(result, ErrorCode::FunctionCallArityOrTypeError, "function args types are: (int, string)");

    let checker = assert_ok("local function apply(f: (int, string) => bool)\n    local ok = f(1, \"x\")\n    return ok\nend");
    assert_eq!(checker.type_info(binding_type(&checker, "ok")).kind, TypeKind::Bool);
}

#[test]
fn test_call_arity() {
    let (_, result) = check("local function add(a: int, b: int)\n    return a + b\nend\nlocal c = add(1)");
    assert_error(result, ErrorCode::FunctionCallArityOrTypeError, "using args are: (int)");

    assert_ok("print(1, \"a\", nil)");
}

#[test]
fn test_unknown_function() {
    let (_, result) = check("missing(1)");
    assert_error(result, ErrorCode::FunctionNotFound, "Can't find function missing");
}

#[test]
fn test_operators() {
    assert_ok("local s = \"a\" .. 1\nlocal n = -1\nlocal b = not true\nlocal l = #\"abc\"");

    let (_, result) = check("local a = \"x\" + 1");
    assert_error(result, ErrorCode::FunctionCallWrongType, "call + with wrong type args");

    let (_, result) = check("local a = -\"x\"");
    assert_error(result, ErrorCode::FunctionCallWrongType, "call - with wrong type args");
}

#[test]
fn test_lambda_is_rewritten_into_function() {
    let source = "local f = (a: int) => a + 1\nlocal r: int = f(2)";
    let (checker, result, ast) = check_with(source, CheckerConfig::default());
    assert!(result.is_ok(), "{:?}", result);
    match &ast.body[0] {
        Stmt::Local(local) => assert!(matches!(local.values[0], Expr::Function(_))),
        other => panic!("unexpected {}", other.node_name()),
    }
    let f = checker.type_info(binding_type(&checker, "f"));
    assert!(f.is_function());
    assert_eq!(checker.type_str(f.ret_types[0]), "int");
}

#[test]
fn test_use_before_init() {
    let (_, result) = check("local a: int\nlocal b = a");
    assert_error(result, ErrorCode::UseBeforeInit, "use variable a not inited");
}

#[test]
fn test_unknown_type_annotation() {
    let (_, result) = check("local a: Foo = 1");
    assert_error(result, ErrorCode::TypeNotFound, "Can't find type Foo");
}

#[test]
fn test_union_and_literal_annotations() {
    assert_ok("local a: int | string = 1\na = \"x\"");
    let (_, result) = check("local a: int | string = true");
    assert_error(result, ErrorCode::TypeMismatch, "declare variable a type int|string but got bool");

    assert_ok("local color: \"red\" | \"blue\" = \"red\"");
    let (_, result) = check("local color: \"red\" | \"blue\" = \"green\"");
    assert_error(result, ErrorCode::TypeMismatch, "declare variable color");
}

#[test]
fn test_record_constructor_fields_and_defaults() {
    let checker = assert_ok("type Person = { name: string, age?: int = 18 }\nlocal p = Person()\nlocal n: string = p.name");
    let p = checker.type_info(binding_type(&checker, "p"));
    assert_eq!(p.record_name, "Person");
    assert_eq!(p.default_values.get("age").map(String::as_str), Some("18"));
    assert_eq!(checker.type_str(p.prop("age").unwrap()), "int|nil");

    let (_, result) = check("type Person = { name: string }\nlocal p = Person()\nlocal a = p.age");
    assert_error(result, ErrorCode::TypeMismatch, "can't access property age");

    let (_, result) = check("type Person = { age: int = \"old\" }");
    assert_error(result, ErrorCode::TypeMismatch, "default value type error of record Person property age");
}

#[test]
fn test_record_member_functions() {
    let checker = assert_ok(
        "type Point = { x: int }\nlocal p = Point()\nfunction p:getx()\n    return self.x\nend\nlocal v: int = p:getx()",
    );
    let p = checker.type_info(binding_type(&checker, "p"));
    assert!(p.props.contains_key("getx"));

    let (_, result) = check("type Point = { x: int }\nlocal p = Point()\nfunction p.f() end");
    assert_error(result, ErrorCode::TypeMismatch, "should use 'p:f' to define record's member function");
}

#[test]
fn test_offline_function_is_flagged() {
    let checker = assert_ok("type T = { x: int }\nlocal t = T()\noffline function t:query() end");
    let t = checker.type_info(binding_type(&checker, "t"));
    let query = t.prop("query").unwrap();
    assert!(checker.type_info(query).is_offline);
}

#[test]
fn test_record_call_syntax_switch() {
    let source = "type Callable = { __call: (object, int) => int }\nlocal c = Callable()\nlocal r = c(1)";
    let (_, result) = check(source);
    assert_error(result, ErrorCode::RecordCallSyntaxDisabled, "now syntax of treat record as function is not supported");

    let config = CheckerConfig {
        open_record_call_syntax: true,
        ..CheckerConfig::default()
    };
    let (checker, result, ast) = check_with(source, config);
    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(checker.type_str(binding_type(&checker, "r")), "int");
    match &ast.body[0] {
        Stmt::Record(record) => assert!(record.installs_metatable),
        other => panic!("unexpected {}", other.node_name()),
    }
}

#[test]
fn test_return_rules() {
    let (_, result) = check("function f()\n    return 1, 2\nend");
    assert_error(result, ErrorCode::ReturnTooManyValues, "return too more values");

    let (_, result) = check("local function f(): string\n    return 1\nend");
    assert_error(result, ErrorCode::TypeMismatch, "function declared return type string but got int");

    let checker = assert_ok("local function pick(flag: bool)\n    if flag then\n        return 1\n    end\n    return \"one\"\nend");
    let pick = checker.type_info(binding_type(&checker, "pick"));
    assert_eq!(checker.type_str(pick.ret_types[0]), "int|string");
}

#[test]
fn test_loops() {
    assert_ok("for i = 1, 10 do\n    local x: int = i\nend");
    let (_, result) = check("for i = 1, \"a\" do end");
    assert_error(result, ErrorCode::TypeMismatch, "for step statement's expressions");

    assert_ok("local xs: Array<int> = [1, 2]\nfor i, v in ipairs(xs) do\n    local n: int = v\nend");
    let (_, result) = check("local xs: Array<int> = [1, 2]\nfor k: string, v in ipairs(xs) do end");
    assert_error(result, ErrorCode::TypeMismatch, "variable expect string but got int");
}

#[test]
fn test_type_aliases() {
    assert_ok("type Names = Array<string>\nlocal n: Names = [\"a\"]");
    let checker = assert_ok("record G<T> { v: T }\ntype GS = G<string>\nlocal g = GS()\nlocal s: string = g.v");
    let g = checker.type_info(binding_type(&checker, "g"));
    assert_eq!(g.record_name, "GS");
    assert_eq!(g.origin_name, "G");
}

#[test]
fn test_emit() {
    let (checker, result) = check("emit Transfer(\"done\")\nemit Transfer(\"again\")\nemit Burn(\"x\")");
    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(checker.emitted_event_names(), ["Transfer", "Burn"]);

    let (_, result) = check("emit Transfer(1)");
    assert_error(result, ErrorCode::TypeMismatch, "emit statement argument must be string, but got int");

    let (_, result) = check("emit Transfer(missing)");
    assert_error(result, ErrorCode::UseUndefinedVariable, "Can't find symbol missing");

    let long_name = "E".repeat(50);
    let (_, result) = check(&format!("emit {}(\"x\")", long_name));
    assert_error(result, ErrorCode::SimpleError, "emit event name must be at most 49");
}

#[test]
fn test_keyword_names() {
    let (_, result) = check("local emit = 1");
    assert_error(result, ErrorCode::UseWrongSymbolAsName, "Can't define variable of keyword name emit");
}

#[test]
fn test_import_contract_is_recorded() {
    let (checker, result) = check("local a = 1\nlocal token = import_contract(\"token\")");
    assert!(result.is_ok(), "{:?}", result);
    assert_eq!(checker.imported_contract_names().get("token"), Some(&2));
    assert!(checker.type_info(binding_type(&checker, "token")).is_any_contract);
}

#[test]
fn test_new_globals_are_tracked() {
    let checker = assert_ok("counter = 1\nfunction helper() end");
    let globals = checker
        .created_globals()
        .iter()
        .map(|(name, line)| (name.as_str(), *line))
        .collect::<Vec<(&str, u32)>>();
    assert_eq!(globals, vec![("counter", 1), ("helper", 2)]);
}

#[test]
fn test_too_many_local_variables() {
    let config = CheckerConfig {
        max_local_vars: 2,
        ..CheckerConfig::default()
    };
    let (_, result, _) = check_with("local a = 1\nlocal b = 2\nlocal c = 3", config);
    assert_error(
        result,
        ErrorCode::TooManyLocalVariables,
        "too many local variables(3 variables), but limit count is 2",
    );
}

#[test]
fn test_dump_scopes() {
    let checker = assert_ok("local a = 1\nlocal function f(x: string)\n    return x\nend");
    let dump = checker.dump_scopes();
    assert!(dump.contains("main"));
    assert!(dump.contains("a: int"));
    assert!(dump.contains("  x: string"));
}

const STORAGE_CONTRACT: &str = "type Storage = { name: string, count: int, balances: Map<int> }
local M = Contract<Storage>()
function M:init()
    self.storage.count = 0
end
function M:on_deposit(amount: int)
    self.storage.count = self.storage.count + amount
end
function M:hello(name: string)
    emit Hello(name)
end
return M
";

#[test]
fn test_valid_contract() {
    let (checker, result) = check_contract(STORAGE_CONTRACT);
    assert!(result.is_ok(), "{:?}", result);
    let storage = checker.contract_storage_type().unwrap();
    assert!(checker.type_info(storage).props.contains_key("balances"));
    assert_eq!(checker.emitted_event_names(), ["Hello"]);
}

#[test]
fn test_contract_storage_allow_list() {
    let source = STORAGE_CONTRACT.replace("balances: Map<int>", "callback: (int) => int");
    let (_, result) = check_contract(&source);
    assert_error(result, ErrorCode::ContractStorageTypeError, "property callback's type error");
}

#[test]
fn test_contract_must_return_contract() {
    let (_, result) = check_contract("return 1");
    assert_error(result, ErrorCode::ContractNotReturnContractType, "contract must return contract type");

    let (_, result) = check_contract("local M = Contract<int>()\nreturn M");
    assert_error(
        result,
        ErrorCode::ContractNotReturnContractType,
        "contract storage's type must be record type",
    );
}

#[test]
fn test_contract_api_arguments() {
    let cases = [
        ("function M:init(a: int) end", "contract api init expect no arguments except self"),
        ("function M:on_deposit(a: string) end", "contract api on_deposit's arg(except self)'s type must be int"),
        ("function M:hello(a: int) end", "contract api hello's first arg(except self)'s type must be string"),
        ("function M:hello(a: string, b: string) end", "contract api hello can only have one argument(except self)"),
    ];
    for (api, message) in cases {
        let source = format!("type Storage = {{ count: int }}\nlocal M = Contract<Storage>()\n{}\nreturn M", api);
        let (_, result) = check_contract(&source);
        assert_error(result, ErrorCode::ContractApiWrongArgs, message);
    }
}

#[test]
fn test_contract_forbids_new_globals() {
    let source = "type Storage = { count: int }\nlocal M = Contract<Storage>()\ncounter = 1\nreturn M";
    let (_, result) = check_contract(source);
    assert_error(
        result,
        ErrorCode::ContractNotAllowDefineNewVariable,
        "line 3 token counter , contract not allow define new variable",
    );

    let config = CheckerConfig {
        contract_mode: true,
        in_repl: true,
        ..CheckerConfig::default()
    };
    let (_, result, _) = check_with(source, config);
    assert!(result.is_ok(), "{:?}", result);
}

#[test]
fn test_contract_property_protection() {
    let source = "type Storage = { count: int }
local M = Contract<Storage>()
function M:hello(arg: string)
    self.id = \"x\"
end
return M";
    let (_, result) = check_contract(source);
    assert_error(result, ErrorCode::AccessContractPropertyDisabled, "Can't change contract's id property");

    let source = "type Storage = { count: int }\nlocal M = Contract<Storage>()\nlocal s = M.storage\nreturn M";
    let (_, result) = check_contract(source);
    assert_error(result, ErrorCode::AccessContractPropertyDisabled, "Can't access contract's storage property");

    let source = "type Storage = { count: int }\nlocal M = Contract<Storage>()\nfunction M:init() end\nM:init()\nreturn M";
    let (_, result) = check_contract(source);
    assert_error(result, ErrorCode::AccessContractPropertyDisabled, "Can't call init api of contract");
}

#[test]
fn test_contract_globals_are_read_only() {
    let source = "type Storage = { count: int }\nlocal M = Contract<Storage>()\nprint = 1\nreturn M";
    let (_, result) = check_contract(source);
    assert_error(result, ErrorCode::TypeMismatch, "global variable print can't be changed");
}

#[test]
fn test_record_field_requires_type() {
    let (checker, result) = check("type P = { name, age: int }\nlocal p = P()");
    assert_error(
        result,
        ErrorCode::TypeMismatch,
        "token name, when define record type, property's type declaration is required",
    );
    let person = checker.type_info(binding_type(&checker, "p"));
    assert!(!person.props.contains_key("name"));
    assert!(person.props.contains_key("age"));
}

#[test]
fn test_checker_reuse_starts_clean() {
    let mut checker = TypeChecker::new(CheckerConfig::default());

    let mut first = parse_program("local a: int = \"s\"\ncounter = 1\nemit Done(\"x\")");
    assert!(checker.check(&mut first, false).is_err());
    assert_eq!(checker.emitted_event_names(), ["Done"]);

    let mut second = parse_program("local b = 1");
    assert!(checker.check(&mut second, false).is_ok());
    assert!(checker.errors().is_empty());
    assert!(checker.created_globals().is_empty());
    assert!(checker.emitted_event_names().is_empty());

    let mut with_global = parse_program("counter = 1");
    assert!(checker.check(&mut with_global, false).is_ok());
    let mut contract = parse_program(STORAGE_CONTRACT);
    let result = checker.check(&mut contract, true);
    assert!(result.is_ok(), "{:?}", result);
    assert!(checker.contract_storage_type().is_some());
}

#[test]
fn test_nested_generic_record_instance() {
    let source = "record Inner<T> { v: T }
record Outer<T> { inner: Inner<T> }
local o = Outer<int>()
local n: int = o.inner.v";
    let checker = assert_ok(source);
    let outer = checker.type_info(binding_type(&checker, "o"));
    let inner = checker.type_info(outer.props["inner"]);
    assert_eq!(inner.record_name, "Inner<int>");
    assert!(inner.generics.is_empty());
    assert_eq!(inner.applied_generics.len(), 1);
}

#[test]
fn test_failed_access_reports_segment() {
    let source = "type Inner = { x: int }
type Outer = { inner: Inner }
local o = Outer()
local m = o.inner.missing";
    let (checker, result) = check(source);
    assert_error(result, ErrorCode::TypeMismatch, "token missing, type record Inner{x} can't access property missing");
    assert_eq!(checker.type_info(binding_type(&checker, "m")).record_name, "Inner");
}

#[test]
fn test_operator_error_names_line() {
    let (_, result) = check("local a = 1\nlocal s = \"x\" + a");
    assert_error(
        result,
        ErrorCode::FunctionCallWrongType,
        "call + with wrong type args at line 2, expected number",
    );
}

#[test]
fn test_assignment_skips_targets_without_values() {
    let checker = assert_ok("x, y = 1");
    let globals = checker
        .created_globals()
        .iter()
        .map(|(name, line)| (name.as_str(), *line))
        .collect::<Vec<(&str, u32)>>();
    assert_eq!(globals, vec![("x", 1)]);
}

#[test]
fn test_system_libraries() {
    let checker = assert_ok(
        "local started: int = os.clock()
local home: string = os.getenv(\"HOME\")
local size: int = utf8.len(\"abc\", 1, 3)
local line = io.read(\"l\")
local server = http.listen(\"127.0.0.1\", 8080)
local socket = net.connect(\"127.0.0.1\", 9000)",
    );
    assert_eq!(checker.type_str(binding_type(&checker, "line")), "string");
}
