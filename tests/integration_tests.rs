//! End-to-end tests for the checking pipeline.
//!
//! Source text goes through tokenization, parsing and type checking via
//! `check_source`, the same entry point the binary uses.

use checker::{
    check_source,
    errors::errors::ErrorCode,
    type_checker::{type_checker::CheckerConfig, types::TypeKind},
};

fn contract_config() -> CheckerConfig {
    CheckerConfig {
        contract_mode: true,
        ..CheckerConfig::default()
    }
}

#[test]
fn test_check_simple_program() {
    let source = "local function add(a: int, b: int): int
    return a + b
end
local total = add(1, 2)
print(total)
return total
"
    .to_string();
    let (checker, result) = check_source(source, Some("simple.glua".to_string()), CheckerConfig::default()).unwrap();
    let ret = result.expect("program should type check");
    assert_eq!(checker.types.kind(ret), TypeKind::Int);
}

#[test]
fn test_check_records_and_generics() {
    let source = "record Box<T> { value: T }
type Person = { name: string, age?: int = 18 }
local b = Box<string>()
local p = Person()
local label: string = b.value .. p.name
return label
"
    .to_string();
    let (_, result) = check_source(source, None, CheckerConfig::default()).unwrap();
    assert!(result.is_ok(), "{:?}", result);
}

#[test]
fn test_check_contract() {
    let source = "type Storage = { owner: string, supply: int }
local M = Contract<Storage>()
function M:init()
    self.storage.supply = 100
end
function M:transfer(to: string)
    emit Transfer(to)
end
offline function M:owner(arg: string)
    return self.storage.owner
end
return M
"
    .to_string();
    let (checker, result) = check_source(source, Some("token.glua".to_string()), contract_config()).unwrap();
    assert!(result.is_ok(), "{:?}", result);
    assert!(checker.contract_storage_type().is_some());
    assert_eq!(checker.emitted_event_names(), ["Transfer"]);
}

#[test]
fn test_type_error_is_reported() {
    let source = "local a: int = \"text\"\nlocal b = missing(a)\n".to_string();
    let (_, result) = check_source(source, None, CheckerConfig::default()).unwrap();
    let diagnostics = result.unwrap_err();
    let codes: Vec<ErrorCode> = diagnostics.iter().map(|diagnostic| diagnostic.code).collect();
    assert_eq!(codes, vec![ErrorCode::TypeMismatch, ErrorCode::FunctionNotFound]);
}

#[test]
fn test_contract_without_storage_record_fails() {
    let source = "local M = {}\nreturn M\n".to_string();
    let (checker, result) = check_source(source, None, contract_config()).unwrap();
    let diagnostics = result.unwrap_err();
    assert_eq!(diagnostics[0].code, ErrorCode::ContractNotReturnContractType);
    assert!(checker.contract_storage_type().is_none());
}

#[test]
fn test_parse_error_is_outer_error() {
    let source = "local = 1".to_string();
    assert!(check_source(source, None, CheckerConfig::default()).is_err());
}
