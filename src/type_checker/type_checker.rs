use std::{
    collections::{BTreeMap, HashMap},
    panic::{self, AssertUnwindSafe},
    rc::Rc,
};

use crate::{
    ast::{ast::HeadToken, statements::BlockStmt},
    errors::errors::{Diagnostic, ErrorCode},
    lexer::lexer::tokenize,
    parser::parser::parse,
    Span,
};

use super::{
    contract::validate_contract,
    globals::{GLOBALS, TYPED_PRELUDE, TYPE_NAMESPACE_PREFIX},
    scope::{Binding, Proto, GLOBAL_PROTO},
    signature::of_type_str,
    stmt::check_block,
    types::{TypeArena, TypeId, TypeInfo, TypeKind},
};

#[derive(Debug, Clone)]
pub struct CheckerConfig {
    /// Check the program as a contract: run the contract validator and protect globals.
    pub contract_mode: bool,
    /// Most local variables one scope frame may hold
    pub max_local_vars: usize,
    /// Allow calling records through their `__call` property
    pub open_record_call_syntax: bool,
    /// Interactive sessions may create globals even in contract mode
    pub in_repl: bool,
    /// Check the typed prelude (`Contract<S>`) before a contract
    pub include_typed_lib: bool,
}

impl Default for CheckerConfig {
    fn default() -> Self {
        CheckerConfig {
            contract_mode: false,
            max_local_vars: 128,
            open_record_call_syntax: false,
            in_repl: false,
            include_typed_lib: true,
        }
    }
}

/// Return types collected while checking one function body.
#[derive(Debug, Clone, Copy)]
pub struct ReturnFrame {
    pub merged: TypeId,
    pub declared: Option<TypeId>,
}

#[derive(Debug)]
pub struct TypeChecker {
    pub config: CheckerConfig,
    pub types: TypeArena,
    pub protos: Vec<Proto>,
    pub proto_path: Vec<usize>,
    pub return_frames: Vec<ReturnFrame>,
    pub checking_contract: bool,
    errors: Vec<Diagnostic>,
    emitted_event_names: Vec<String>,
    imported_contract_names: BTreeMap<String, u32>,
    created_globals: Vec<(String, u32)>,
    contract_storage_type: Option<TypeId>,
}

impl TypeChecker {
    pub fn new(config: CheckerConfig) -> Self {
        TypeChecker {
            config,
            types: TypeArena::new(),
            protos: vec![],
            proto_path: vec![],
            return_frames: vec![],
            checking_contract: false,
            errors: vec![],
            emitted_event_names: vec![],
            imported_contract_names: BTreeMap::new(),
            created_globals: vec![],
            contract_storage_type: None,
        }
    }

    /// Checks a whole program and returns the type of its top level `return`.
    ///
    /// Problems never stop the walk; every distinct diagnostic is collected and returned
    /// together. A panic inside the walk is logged and then re-raised to the caller.
    pub fn check(&mut self, ast: &mut BlockStmt, contract_mode: bool) -> Result<TypeId, Vec<Diagnostic>> {
        match panic::catch_unwind(AssertUnwindSafe(|| self.check_program(ast, contract_mode))) {
            Ok(result) => result,
            Err(payload) => {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|message| message.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| String::from("unknown panic"));
                log::error!("type checking aborted: {}", message);
                panic::resume_unwind(payload)
            }
        }
    }

    fn check_program(&mut self, ast: &mut BlockStmt, contract_mode: bool) -> Result<TypeId, Vec<Diagnostic>> {
        self.reset();
        self.checking_contract = contract_mode;
        self.seed_globals();
        if contract_mode && self.config.include_typed_lib {
            self.check_prelude();
        }

        let at = HeadToken {
            text: String::from("main"),
            line: ast.span.start.line,
            column: ast.span.start.column,
        };
        self.enter_proto(&at, "main", &ast.span, None, vec![]);
        let undefined = self.types.create(TypeKind::Undefined);
        self.return_frames.push(ReturnFrame {
            merged: undefined,
            declared: None,
        });
        check_block(self, ast);
        let frame = self.return_frames.pop();
        self.exit_proto();

        let ret = match frame {
            Some(frame) if !self.types.get(frame.merged).is_undefined() => frame.merged,
            _ => self.types.create(TypeKind::Object),
        };

        if contract_mode && self.errors.is_empty() {
            validate_contract(self, ret);
        }

        if self.errors.is_empty() {
            Ok(ret)
        } else {
            Err(self.errors.clone())
        }
    }

    /// Drops everything a previous run left behind.
    fn reset(&mut self) {
        self.types = TypeArena::new();
        self.return_frames.clear();
        self.checking_contract = false;
        self.errors.clear();
        self.emitted_event_names.clear();
        self.imported_contract_names.clear();
        self.created_globals.clear();
        self.contract_storage_type = None;
    }

    /// Installs the built-in globals into a fresh global frame.
    fn seed_globals(&mut self) {
        self.protos.clear();
        self.proto_path.clear();
        self.protos.push(Proto::new(GLOBAL_PROTO, "global", None, Span::null()));
        self.proto_path.push(GLOBAL_PROTO);

        let mut bindings: HashMap<String, TypeId> = HashMap::new();
        for (name, signature) in GLOBALS {
            let ty = of_type_str(&mut self.types, signature, &bindings);
            if let Some(type_name) = name.strip_prefix(TYPE_NAMESPACE_PREFIX) {
                let info = self.types.get_mut(ty);
                if info.is_record() && info.record_name.is_empty() {
                    info.record_name = type_name.to_string();
                    info.origin_name = type_name.to_string();
                }
                if type_name == "Stream" {
                    info.is_stream_type = true;
                }
                bindings.insert(type_name.to_string(), ty);
                self.protos[GLOBAL_PROTO]
                    .local_types
                    .insert(type_name.to_string(), ty);
            } else {
                let info = self.types.get_mut(ty);
                if info.is_record() && info.record_name.is_empty() {
                    info.record_name = name.to_string();
                    info.origin_name = name.to_string();
                }
                self.protos[GLOBAL_PROTO]
                    .localvars
                    .insert(name.to_string(), Binding::new(ty, true, true));
            }
        }
        log::debug!("seeded {} globals", GLOBALS.len());
    }

    fn check_prelude(&mut self) {
        let file = String::from("prelude");
        let tokens = match tokenize(TYPED_PRELUDE.to_string(), Some(file.clone())) {
            Ok(tokens) => tokens,
            Err(error) => {
                log::error!("failed to tokenize the typed prelude: {}", error.get_error_name());
                return;
            }
        };
        match parse(tokens, Rc::new(file)).1 {
            Ok(mut prelude) => check_block(self, &mut prelude),
            Err(error) => log::error!("failed to parse the typed prelude: {}", error.get_error_name()),
        }
    }

    /// Records a diagnostic unless the same code and message were already recorded.
    pub fn set_error(&mut self, code: ErrorCode, message: impl Into<String>) {
        let diagnostic = Diagnostic::new(code, message);
        if self.errors.contains(&diagnostic) {
            return;
        }
        log::debug!("error {}: {}", diagnostic.code.code(), diagnostic.message);
        self.errors.push(diagnostic);
    }

    /// Records a diagnostic located at a token.
    pub fn error_at(&mut self, at: &HeadToken, code: ErrorCode, detail: &str) {
        let mut message = format!(
            "type error in line {} position {} token {}",
            at.line, at.column, at.text
        );
        if !detail.is_empty() {
            message.push_str(", ");
            message.push_str(detail);
        }
        self.set_error(code, message);
    }

    /// Records a call that does not fit the callee's signature.
    pub fn call_error(&mut self, at: &HeadToken, func: TypeId, used: Option<&[TypeId]>) {
        let declared = self
            .types
            .get(func)
            .arg_types
            .iter()
            .map(|ty| self.types.str(*ty))
            .collect::<Vec<String>>()
            .join(", ");
        let mut message = format!(
            "type error of function args in line {} position {} token {}, function args types are: ({})",
            at.line, at.column, at.text, declared
        );
        if let Some(used) = used {
            let used = used
                .iter()
                .map(|ty| self.types.str(*ty))
                .collect::<Vec<String>>()
                .join(", ");
            message.push_str(&format!(", using args are: ({})", used));
        }
        self.set_error(ErrorCode::FunctionCallArityOrTypeError, message);
    }

    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(|error| error.message.as_str())
    }

    pub fn emitted_event_names(&self) -> &[String] {
        &self.emitted_event_names
    }

    pub fn imported_contract_names(&self) -> &BTreeMap<String, u32> {
        &self.imported_contract_names
    }

    /// Globals introduced by the program, with the line of their first definition.
    pub fn created_globals(&self) -> &[(String, u32)] {
        &self.created_globals
    }

    pub fn contract_storage_type(&self) -> Option<TypeId> {
        self.contract_storage_type
    }

    pub fn type_str(&self, id: TypeId) -> String {
        self.types.str(id)
    }

    pub fn type_info(&self, id: TypeId) -> &TypeInfo {
        self.types.get(id)
    }

    pub fn add_emitted_event(&mut self, name: &str) {
        if !self.emitted_event_names.iter().any(|event| event == name) {
            self.emitted_event_names.push(name.to_string());
        }
    }

    pub fn add_imported_contract(&mut self, name: &str, line: u32) {
        self.imported_contract_names.insert(name.to_string(), line);
    }

    pub fn add_created_global(&mut self, name: &str, line: u32) {
        if !self.created_globals.iter().any(|(global, _)| global == name) {
            self.created_globals.push((name.to_string(), line));
        }
    }

    pub fn set_contract_storage_type(&mut self, storage: TypeId) {
        self.contract_storage_type = Some(storage);
    }

    /// Renders every frame the program created with its variables and their types.
    pub fn dump_scopes(&self) -> String {
        let mut dump = String::new();
        for proto in self.protos.iter().skip(1) {
            let depth = self.proto_depth(proto.id);
            let indent = "  ".repeat(depth);
            dump.push_str(&format!(
                "{}{} (line {})\n",
                indent,
                proto.name,
                proto.span.line()
            ));
            for (name, ty) in &proto.local_types {
                dump.push_str(&format!("{}  type {} = {}\n", indent, name, self.types.str(*ty)));
            }
            for (name, binding) in &proto.localvars {
                dump.push_str(&format!("{}  {}: {}\n", indent, name, self.types.str(binding.ty)));
            }
        }
        dump
    }

    fn proto_depth(&self, id: usize) -> usize {
        let mut depth = 0;
        let mut current = self.protos[id].parent;
        while let Some(parent) = current {
            if parent == GLOBAL_PROTO {
                break;
            }
            depth += 1;
            current = self.protos[parent].parent;
        }
        depth
    }
}
