//! Rules a contract program must satisfy once the whole program has been checked.
//!
//! The program's top level `return` must be a contract record: a record with a
//! `storage` property whose type is itself a record of storable values. The
//! APIs the chain calls take fixed arguments, and a contract may not introduce
//! globals.

use crate::errors::errors::ErrorCode;

use super::{
    globals::{CONTRACT_INT_ARG_APIS, CONTRACT_SPECIAL_APIS},
    type_checker::TypeChecker,
    types::{TypeId, TypeKind},
};

/// Kinds a storage property may have.
const STORAGE_PROP_KINDS: &[TypeKind] = &[
    TypeKind::Int,
    TypeKind::Number,
    TypeKind::String,
    TypeKind::Bool,
    TypeKind::Table,
    TypeKind::Record,
    TypeKind::Array,
    TypeKind::Map,
];

pub fn validate_contract(checker: &mut TypeChecker, ret: TypeId) {
    let contract = checker.types.get(ret).clone();
    let Some(storage) = contract.prop("storage").filter(|_| contract.is_record()) else {
        let message = format!(
            "contract must return contract type, but get {}",
            checker.types.str(ret)
        );
        checker.set_error(ErrorCode::ContractNotReturnContractType, message);
        return;
    };

    let storage_info = checker.types.get(storage).clone();
    if !storage_info.is_record() {
        let message = format!(
            "contract storage's type must be record type, but get {}",
            checker.types.str(ret)
        );
        checker.set_error(ErrorCode::ContractNotReturnContractType, message);
        return;
    }

    for (name, prop) in &storage_info.props {
        if !STORAGE_PROP_KINDS.contains(&checker.types.kind(*prop)) {
            let message = format!(
                "contract storage type {} error, property {}'s type error, all storage record type's properties' types must be one of int/number/bool/string/table/record/Array/Map",
                checker.types.str(storage),
                name
            );
            checker.set_error(ErrorCode::ContractStorageTypeError, message);
            return;
        }
    }

    for (name, prop) in &contract.props {
        let api = checker.types.get(*prop);
        if !api.is_function() {
            continue;
        }
        let argument_count = api.arg_types.len();
        let argument = api.arg_types.get(1).map(|arg| checker.types.get(*arg).clone());
        let is_special = CONTRACT_SPECIAL_APIS.contains(&name.as_str());
        let takes_int = CONTRACT_INT_ARG_APIS.contains(&name.as_str());

        let problem = if is_special && !takes_int {
            (argument_count > 1).then(|| format!("contract api {} expect no arguments except self", name))
        } else if argument_count > 2 {
            Some(format!("contract api {} can only have one argument(except self)", name))
        } else {
            match argument {
                Some(argument) if takes_int && !argument.is_int() => Some(format!(
                    "contract api {}'s arg(except self)'s type must be int",
                    name
                )),
                Some(argument) if !takes_int && !argument.is_string() => Some(format!(
                    "contract api {}'s first arg(except self)'s type must be string",
                    name
                )),
                _ => None,
            }
        };
        if let Some(message) = problem {
            checker.set_error(ErrorCode::ContractApiWrongArgs, message);
        }
    }

    if !checker.config.in_repl {
        for (name, line) in checker.created_globals().to_vec() {
            checker.set_error(
                ErrorCode::ContractNotAllowDefineNewVariable,
                format!("line {} token {} , contract not allow define new variable", line, name),
            );
        }
    }

    checker.set_contract_storage_type(storage);
    log::info!("contract storage type is {}", checker.types.str(storage));
}
