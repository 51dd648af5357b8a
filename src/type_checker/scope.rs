//! Scope frames ("protos") and the variable and type bindings they hold.
//!
//! Frames are stored flat in `TypeChecker::protos` and linked by index; the
//! frames currently being checked are listed innermost-last in `proto_path`.
//! Frame 0 holds the built-in globals and every global the program creates.

use std::collections::{BTreeMap, HashMap};

use crate::{ast::ast::HeadToken, errors::errors::ErrorCode, Span};

use super::{
    globals::RESERVED_NAMES,
    matching::{match_declare_type, merge_union_types},
    type_checker::TypeChecker,
    types::{TypeId, TypeKind},
};

pub const GLOBAL_PROTO: usize = 0;

#[derive(Debug, Clone)]
pub struct Binding {
    pub ty: TypeId,
    pub changable: bool,
    pub inited: bool,
}

impl Binding {
    pub fn new(ty: TypeId, changable: bool, inited: bool) -> Self {
        Binding {
            ty,
            changable,
            inited,
        }
    }
}

#[derive(Debug)]
pub struct Proto {
    pub id: usize,
    pub name: String,
    pub parent: Option<usize>,
    pub args: Vec<String>,
    /// Function type of the frame, for function bodies
    pub type_info: Option<TypeId>,
    pub localvars: BTreeMap<String, Binding>,
    pub local_types: BTreeMap<String, TypeId>,
    /// Loop variables of a `for ... in`: name, type and whether it was annotated
    pub for_namelist: Vec<(String, TypeId, bool)>,
    pub sub_protos: Vec<usize>,
    pub span: Span,
}

impl Proto {
    pub fn new(id: usize, name: &str, parent: Option<usize>, span: Span) -> Self {
        Proto {
            id,
            name: name.to_string(),
            parent,
            args: vec![],
            type_info: None,
            localvars: BTreeMap::new(),
            local_types: BTreeMap::new(),
            for_namelist: vec![],
            sub_protos: vec![],
            span,
        }
    }
}

/// How `define` treats a name.
#[derive(Debug, Clone, Copy)]
pub struct DefineFlags {
    /// Declare a new binding instead of updating a visible one
    pub is_new: bool,
    pub changable: bool,
    /// Store the given type as is instead of merging it into the old one
    pub replace: bool,
    pub inited: bool,
    /// Declare in the global frame
    pub is_new_global: bool,
}

impl Default for DefineFlags {
    fn default() -> Self {
        DefineFlags {
            is_new: false,
            changable: true,
            replace: false,
            inited: true,
            is_new_global: false,
        }
    }
}

impl DefineFlags {
    pub fn new_local(changable: bool, inited: bool) -> Self {
        DefineFlags {
            is_new: true,
            changable,
            inited,
            ..DefineFlags::default()
        }
    }
}

impl TypeChecker {
    pub fn current_proto(&self) -> usize {
        self.proto_path.last().copied().unwrap_or(GLOBAL_PROTO)
    }

    /// Pushes a new frame under the current one and binds `args` in it.
    pub fn enter_proto(
        &mut self,
        at: &HeadToken,
        name: &str,
        span: &Span,
        type_info: Option<TypeId>,
        args: Vec<(String, TypeId)>,
    ) -> usize {
        let id = self.protos.len();
        let parent = self.proto_path.last().copied();
        let mut proto = Proto::new(id, name, parent, span.clone());
        proto.type_info = type_info;
        proto.args = args.iter().map(|(name, _)| name.clone()).collect();
        self.protos.push(proto);
        if let Some(parent) = parent {
            self.protos[parent].sub_protos.push(id);
        }
        self.proto_path.push(id);
        log::debug!("enter proto {} ({}) at line {}", id, name, span.line());

        for (arg, ty) in args {
            self.define(at, &arg, ty, DefineFlags::new_local(true, true));
        }
        id
    }

    /// Pops the current frame, reporting it when it holds too many locals.
    pub fn exit_proto(&mut self) {
        let Some(id) = self.proto_path.pop() else {
            return;
        };
        let count = self.protos[id].localvars.len();
        log::debug!("exit proto {} with {} locals", id, count);
        if count > self.config.max_local_vars {
            self.set_error(
                ErrorCode::TooManyLocalVariables,
                format!(
                    "too many local variables({} variables), but limit count is {}",
                    count, self.config.max_local_vars
                ),
            );
        }
    }

    /// Innermost visible frame declaring `name`.
    pub fn first_proto_with_var(&self, name: &str) -> Option<usize> {
        self.proto_path
            .iter()
            .rev()
            .copied()
            .find(|id| self.protos[*id].localvars.contains_key(name))
    }

    pub fn lookup_binding(&self, name: &str) -> Option<&Binding> {
        self.first_proto_with_var(name)
            .and_then(|id| self.protos[id].localvars.get(name))
    }

    /// Declares or updates a variable. Returns `false` when a diagnostic was recorded.
    pub fn define(&mut self, at: &HeadToken, name: &str, ty: TypeId, flags: DefineFlags) -> bool {
        if name.is_empty() {
            return true;
        }
        if RESERVED_NAMES.contains(&name) {
            self.error_at(
                at,
                ErrorCode::UseWrongSymbolAsName,
                &format!("Can't define variable of keyword name {}", name),
            );
            return true;
        }

        let owner = self.first_proto_with_var(name);
        let owner = match owner {
            Some(owner) if !flags.is_new => owner,
            _ => {
                let target = if flags.is_new_global {
                    GLOBAL_PROTO
                } else {
                    self.current_proto()
                };
                if flags.is_new && self.protos[target].localvars.contains_key(name) {
                    self.error_at(
                        at,
                        ErrorCode::DuplicateVariable,
                        &format!("can't declare duplicate variable {}", name),
                    );
                    return false;
                }
                self.protos[target]
                    .localvars
                    .insert(name.to_string(), Binding::new(ty, flags.changable, flags.inited));
                return true;
            }
        };

        if owner == GLOBAL_PROTO && self.checking_contract {
            self.error_at(
                at,
                ErrorCode::TypeMismatch,
                &format!("global variable {} can't be changed", name),
            );
            return false;
        }

        let Some(binding) = self.protos[owner].localvars.get(name).cloned() else {
            return true;
        };
        if !binding.changable && binding.inited {
            self.error_at(
                at,
                ErrorCode::ImmutableReassignment,
                &format!("changing variable {} that can't be changed", name),
            );
            return false;
        }
        let old = binding.ty;
        if !match_declare_type(&self.types, old, ty, true) {
            let detail = format!(
                "variable declared as type {} but got {}",
                self.types.kind(old).name(),
                self.types.kind(ty).name()
            );
            self.error_at(at, ErrorCode::TypeMismatch, &detail);
            return false;
        }

        let stored = if matches!(
            self.types.kind(old),
            TypeKind::Nil | TypeKind::Undefined | TypeKind::Union | TypeKind::Object
        ) {
            let left = if self.types.get(old).is_union() {
                self.types.duplicate(old)
            } else {
                old
            };
            let merged = merge_union_types(&mut self.types, left, ty);
            if flags.replace && merged == old {
                self.types.duplicate(ty)
            } else {
                merged
            }
        } else {
            old
        };
        if let Some(binding) = self.protos[owner].localvars.get_mut(name) {
            binding.ty = stored;
            binding.inited = binding.inited || flags.inited;
        }
        true
    }

    /// Overwrites the type of a visible binding without any check.
    pub fn redefine(&mut self, name: &str, ty: TypeId) {
        if let Some(owner) = self.first_proto_with_var(name) {
            if let Some(binding) = self.protos[owner].localvars.get_mut(name) {
                binding.ty = ty;
                binding.inited = true;
            }
        }
    }

    /// Type of a visible variable, or a fresh `nil` when there is none.
    ///
    /// With `only_inited` a binding that was declared but never given a value is reported.
    pub fn lookup(&mut self, at: &HeadToken, name: &str, only_inited: bool) -> TypeId {
        match self.lookup_binding(name).cloned() {
            Some(binding) => {
                if only_inited && !binding.inited {
                    self.error_at(
                        at,
                        ErrorCode::UseBeforeInit,
                        &format!("use variable {} not inited", name),
                    );
                }
                binding.ty
            }
            None => self.types.create(TypeKind::Nil),
        }
    }

    pub fn define_local_type(&mut self, at: &HeadToken, name: &str, ty: TypeId) {
        if RESERVED_NAMES.contains(&name) {
            self.error_at(
                at,
                ErrorCode::UseWrongSymbolAsName,
                &format!("Can't define type of keyword name {}", name),
            );
            return;
        }
        let current = self.current_proto();
        self.protos[current].local_types.insert(name.to_string(), ty);
    }

    /// Resolves a type name: `extra` bindings first, then frames innermost to outermost.
    pub fn lookup_type(&self, name: &str, extra: &HashMap<String, TypeId>) -> Option<TypeId> {
        if let Some(bound) = extra.get(name) {
            return Some(*bound);
        }
        self.proto_path
            .iter()
            .rev()
            .find_map(|id| self.protos[*id].local_types.get(name).copied())
    }

    /// Probes the overload `name$T1$T2...` before `name`.
    pub fn find_function_by_name(&self, name: &str, args: &[TypeId]) -> Option<TypeId> {
        let mut mangled = name.to_string();
        for arg in args {
            mangled.push('$');
            mangled.push_str(&self.types.str(*arg));
        }
        self.find_callable(&mangled)
            .or_else(|| self.find_callable(name))
    }

    /// Probes the overload `(op$T1$T2)` before `(op)`.
    pub fn find_operator_func_by_name(&self, operator: &str, args: &[TypeId]) -> Option<TypeId> {
        let mut mangled = format!("({}", operator);
        for arg in args {
            mangled.push('$');
            mangled.push_str(&self.types.str(*arg));
        }
        mangled.push(')');
        self.find_callable(&mangled)
            .or_else(|| self.find_callable(&format!("({})", operator)))
    }

    fn find_callable(&self, name: &str) -> Option<TypeId> {
        self.lookup_binding(name)
            .map(|binding| binding.ty)
            .filter(|ty| self.types.get(*ty).is_function())
    }
}
