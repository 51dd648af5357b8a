//! The type model.
//!
//! Every type lives in a [`TypeArena`] owned by the checker and is addressed
//! by a copyable [`TypeId`]. Types are mutable in place: declaring
//! `function M:f()` adds `f` to the record behind `M`, and [`TypeArena::copy_into`]
//! overwrites one type with the contents of another. Self references (a
//! record whose constructor returns the record) are plain handles.

use std::collections::BTreeMap;

use crate::ast::expressions::LiteralKind;

/// Handle of a type inside a [`TypeArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Nil,
    Bool,
    Int,
    Number,
    String,
    /// The top type, accepts everything
    Object,
    /// Placeholder for "no information yet"
    Undefined,
    Table,
    Array,
    Map,
    Record,
    Function,
    Union,
    Generic,
    LiteralType,
}

impl TypeKind {
    /// Short kind name used in assignment messages.
    pub fn name(&self) -> &'static str {
        match self {
            TypeKind::Nil => "nil",
            TypeKind::Bool => "bool",
            TypeKind::Int => "int",
            TypeKind::Number => "number",
            TypeKind::String => "string",
            TypeKind::Object => "object",
            TypeKind::Undefined => "undefined",
            TypeKind::Table => "table",
            TypeKind::Array => "array",
            TypeKind::Map => "map",
            TypeKind::Record => "record",
            TypeKind::Function => "function",
            TypeKind::Union => "union",
            TypeKind::Generic => "generic",
            TypeKind::LiteralType => "literal",
        }
    }
}

/// One option of a literal type such as `"red"` or `1`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LiteralToken {
    pub kind: LiteralKind,
    pub text: String,
}

impl LiteralToken {
    pub fn new(kind: LiteralKind, text: impl Into<String>) -> Self {
        LiteralToken {
            kind,
            text: text.into(),
        }
    }

    pub fn render(&self) -> String {
        match self.kind {
            LiteralKind::String => format!("\"{}\"", self.text),
            _ => self.text.clone(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TypeInfo {
    pub kind: TypeKind,

    /// Element type of `Array<T>` and `Map<T>`. `None` means the parameter was never filled in.
    pub item: Option<TypeId>,

    pub record_name: String,
    pub origin_name: String,
    /// Record properties. Tables collect properties too when methods are declared on them.
    pub props: BTreeMap<String, TypeId>,
    /// Source text of record field default values
    pub default_values: BTreeMap<String, String>,
    /// Generic parameters still free
    pub generics: Vec<TypeId>,
    /// Generic parameters of the template this record came from
    pub all_generics: Vec<TypeId>,
    /// Concrete types bound at instantiation
    pub applied_generics: Vec<TypeId>,

    pub generic_name: String,

    pub arg_names: Vec<String>,
    pub arg_types: Vec<TypeId>,
    pub ret_types: Vec<TypeId>,
    pub is_any_function: bool,

    /// Union members with set semantics on the handle
    pub union_members: Vec<TypeId>,

    pub literal_options: Vec<LiteralToken>,

    /// The value came straight from a literal token, e.g. `"red"`
    pub is_literal_token_value: bool,
    pub literal_value_token: Option<LiteralToken>,
    pub is_offline: bool,
    pub declared: bool,
    pub is_literal_empty_table: bool,
    pub is_stream_type: bool,
    pub is_any_contract: bool,
}

impl TypeInfo {
    pub fn new(kind: TypeKind) -> Self {
        TypeInfo {
            kind,
            item: None,
            record_name: String::new(),
            origin_name: String::new(),
            props: BTreeMap::new(),
            default_values: BTreeMap::new(),
            generics: vec![],
            all_generics: vec![],
            applied_generics: vec![],
            generic_name: String::new(),
            arg_names: vec![],
            arg_types: vec![],
            ret_types: vec![],
            is_any_function: false,
            union_members: vec![],
            literal_options: vec![],
            is_literal_token_value: false,
            literal_value_token: None,
            is_offline: false,
            declared: false,
            is_literal_empty_table: false,
            is_stream_type: false,
            is_any_contract: false,
        }
    }

    pub fn is_nil(&self) -> bool {
        self.kind == TypeKind::Nil
    }

    pub fn is_undefined(&self) -> bool {
        self.kind == TypeKind::Undefined
    }

    pub fn is_object(&self) -> bool {
        self.kind == TypeKind::Object
    }

    pub fn is_string(&self) -> bool {
        self.kind == TypeKind::String
    }

    pub fn is_int(&self) -> bool {
        self.kind == TypeKind::Int
    }

    /// Int is a number.
    pub fn is_number(&self) -> bool {
        matches!(self.kind, TypeKind::Number | TypeKind::Int)
    }

    /// Nil counts as a boolean.
    pub fn is_bool(&self) -> bool {
        matches!(self.kind, TypeKind::Bool | TypeKind::Nil)
    }

    pub fn is_record(&self) -> bool {
        self.kind == TypeKind::Record
    }

    pub fn is_array(&self) -> bool {
        self.kind == TypeKind::Array
    }

    pub fn is_map(&self) -> bool {
        self.kind == TypeKind::Map
    }

    pub fn is_function(&self) -> bool {
        self.kind == TypeKind::Function
    }

    pub fn is_union(&self) -> bool {
        self.kind == TypeKind::Union
    }

    pub fn is_generic(&self) -> bool {
        self.kind == TypeKind::Generic
    }

    pub fn is_literal_type(&self) -> bool {
        self.kind == TypeKind::LiteralType
    }

    /// Plain `table`, without a known shape.
    pub fn is_narrow_table(&self) -> bool {
        self.kind == TypeKind::Table
    }

    pub fn is_table(&self) -> bool {
        matches!(self.kind, TypeKind::Table | TypeKind::Map | TypeKind::Array)
    }

    pub fn is_like_table(&self) -> bool {
        matches!(
            self.kind,
            TypeKind::Table | TypeKind::Map | TypeKind::Array | TypeKind::Record
        )
    }

    /// Kinds a literal option can stand for.
    pub fn is_literal_item_type(&self) -> bool {
        self.is_string() || self.is_number() || self.is_bool() || self.is_nil()
    }

    pub fn has_call_prop(&self) -> bool {
        self.is_record() && self.props.contains_key("__call")
    }

    pub fn has_var_args(&self) -> bool {
        self.arg_names.last().map(|name| name == "...").unwrap_or(false)
    }

    /// Declares any `__name` property.
    pub fn has_meta_method(&self) -> bool {
        self.props
            .keys()
            .any(|name| name.len() > 2 && name.starts_with("__"))
    }

    pub fn min_args_count_require(&self) -> usize {
        if self.has_var_args() {
            self.arg_types.len().saturating_sub(1)
        } else {
            self.arg_types.len()
        }
    }

    pub fn is_contract_type(&self) -> bool {
        self.is_any_contract || self.origin_name.contains("Contract")
    }

    pub fn prop(&self, name: &str) -> Option<TypeId> {
        self.props.get(name).copied()
    }

    /// Every option of `value` is among this literal type's options.
    pub fn match_literal_type(&self, value: &TypeInfo) -> bool {
        if !self.is_literal_type() || !value.is_literal_type() {
            return false;
        }
        if self.literal_options.len() < value.literal_options.len() {
            return false;
        }
        value
            .literal_options
            .iter()
            .all(|option| self.literal_options.contains(option))
    }

    pub fn match_literal_value(&self, token: &LiteralToken) -> bool {
        self.is_literal_type() && self.literal_options.contains(token)
    }

    /// Some option of this literal type has the primitive kind of `value`.
    pub fn contains_literal_item_type(&self, value: &TypeInfo) -> bool {
        if !self.is_literal_type() || !value.is_literal_item_type() {
            return false;
        }
        self.literal_options.iter().any(|option| match option.kind {
            LiteralKind::String => value.is_string(),
            LiteralKind::Integer | LiteralKind::Float => value.is_number(),
            LiteralKind::True | LiteralKind::False => value.is_bool(),
            LiteralKind::Nil => value.is_nil(),
        })
    }
}

/// Rendering gives up below this depth; self-referencing unions would never end.
const MAX_RENDER_DEPTH: usize = 12;

#[derive(Debug, Default)]
pub struct TypeArena {
    types: Vec<TypeInfo>,
}

impl TypeArena {
    pub fn new() -> Self {
        TypeArena { types: vec![] }
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    pub fn alloc(&mut self, info: TypeInfo) -> TypeId {
        self.types.push(info);
        TypeId(self.types.len() - 1)
    }

    pub fn create(&mut self, kind: TypeKind) -> TypeId {
        self.alloc(TypeInfo::new(kind))
    }

    pub fn get(&self, id: TypeId) -> &TypeInfo {
        &self.types[id.0]
    }

    pub fn get_mut(&mut self, id: TypeId) -> &mut TypeInfo {
        &mut self.types[id.0]
    }

    pub fn kind(&self, id: TypeId) -> TypeKind {
        self.get(id).kind
    }

    /// Overwrites every field of `dst` with the fields of `src`.
    pub fn copy_into(&mut self, dst: TypeId, src: TypeId) {
        if dst == src {
            return;
        }
        let info = self.get(src).clone();
        *self.get_mut(dst) = info;
    }

    /// A fresh shallow copy of `src`. Nested handles are shared.
    pub fn duplicate(&mut self, src: TypeId) -> TypeId {
        let info = self.get(src).clone();
        self.alloc(info)
    }

    pub fn create_array(&mut self, item: TypeId) -> TypeId {
        let mut info = TypeInfo::new(TypeKind::Array);
        info.item = Some(item);
        self.alloc(info)
    }

    pub fn create_map(&mut self, item: TypeId) -> TypeId {
        let mut info = TypeInfo::new(TypeKind::Map);
        info.item = Some(item);
        self.alloc(info)
    }

    /// `(...) => object`, which skips argument checks entirely.
    pub fn create_any_function(&mut self) -> TypeId {
        let object = self.create(TypeKind::Object);
        let mut info = TypeInfo::new(TypeKind::Function);
        info.arg_names = vec![String::new()];
        info.arg_types = vec![object];
        info.ret_types = vec![object];
        info.is_any_function = true;
        self.alloc(info)
    }

    pub fn create_function(
        &mut self,
        arg_names: Vec<String>,
        arg_types: Vec<TypeId>,
        ret_types: Vec<TypeId>,
    ) -> TypeId {
        let mut info = TypeInfo::new(TypeKind::Function);
        info.arg_names = arg_names;
        info.arg_types = arg_types;
        info.ret_types = ret_types;
        info.is_any_function = false;
        self.alloc(info)
    }

    pub fn create_union(&mut self, members: &[TypeId]) -> TypeId {
        let union = self.create(TypeKind::Union);
        for member in members {
            self.union_insert(union, *member);
        }
        union
    }

    pub fn create_generic(&mut self, name: &str) -> TypeId {
        let mut info = TypeInfo::new(TypeKind::Generic);
        info.generic_name = name.to_string();
        self.alloc(info)
    }

    pub fn create_literal_type(&mut self, options: Vec<LiteralToken>) -> TypeId {
        let mut info = TypeInfo::new(TypeKind::LiteralType);
        info.literal_options = options;
        self.alloc(info)
    }

    /// The type of a literal token in an expression: `1` is an `int` that remembers it was `1`.
    pub fn create_literal_value(&mut self, kind: LiteralKind, text: &str) -> TypeId {
        let type_kind = match kind {
            LiteralKind::Nil => TypeKind::Nil,
            LiteralKind::True | LiteralKind::False => TypeKind::Bool,
            LiteralKind::Integer => TypeKind::Int,
            LiteralKind::Float => TypeKind::Number,
            LiteralKind::String => TypeKind::String,
        };
        let mut info = TypeInfo::new(type_kind);
        info.is_literal_token_value = true;
        info.literal_value_token = Some(LiteralToken::new(kind, text));
        self.alloc(info)
    }

    /// Adds `member` to a union unless the union itself or a structurally equal member is there.
    pub fn union_insert(&mut self, union: TypeId, member: TypeId) {
        if union == member {
            return;
        }
        let rendered = self.str(member);
        let duplicate = self
            .get(union)
            .union_members
            .iter()
            .any(|existing| *existing == member || self.str(*existing) == rendered);
        if !duplicate {
            self.get_mut(union).union_members.push(member);
        }
    }

    pub fn is_same_record(&self, a: TypeId, b: TypeId) -> bool {
        if a == b {
            return true;
        }
        let (a, b) = (self.get(a), self.get(b));
        if !a.is_record() || !b.is_record() {
            return false;
        }
        (a.record_name == b.record_name || a.origin_name == b.origin_name)
            && a.props.len() == b.props.len()
            && a.all_generics.len() == b.all_generics.len()
            && a.generics.len() == b.generics.len()
            && a.applied_generics.len() == b.applied_generics.len()
    }

    pub fn may_be_callable(&self, id: TypeId) -> bool {
        self.may_be_callable_at(id, 0)
    }

    fn may_be_callable_at(&self, id: TypeId, depth: usize) -> bool {
        let info = self.get(id);
        match info.kind {
            TypeKind::Object | TypeKind::Table | TypeKind::Function => true,
            TypeKind::Union if depth < MAX_RENDER_DEPTH => info
                .union_members
                .iter()
                .any(|member| self.may_be_callable_at(*member, depth + 1)),
            TypeKind::Record => info.has_call_prop(),
            _ => false,
        }
    }

    /// Renders a type for messages and for overload name mangling.
    pub fn str(&self, id: TypeId) -> String {
        self.render(id, 0)
    }

    fn render(&self, id: TypeId, depth: usize) -> String {
        if depth > MAX_RENDER_DEPTH {
            return String::from("...");
        }
        let info = self.get(id);
        match info.kind {
            TypeKind::Object => String::from("object"),
            TypeKind::Nil => String::from("nil"),
            TypeKind::String => String::from("string"),
            TypeKind::Int => String::from("int"),
            TypeKind::Number => String::from("number"),
            TypeKind::Bool => String::from("bool"),
            TypeKind::Table => String::from("table"),
            TypeKind::Undefined => String::from("undefined"),
            TypeKind::Function => {
                if info.is_any_function {
                    return String::from("function");
                }
                let rets = info
                    .ret_types
                    .iter()
                    .map(|ty| self.render(*ty, depth + 1))
                    .collect::<Vec<String>>()
                    .join(", ");
                let args = info
                    .arg_types
                    .iter()
                    .map(|ty| self.render(*ty, depth + 1))
                    .collect::<Vec<String>>()
                    .join(", ");
                if rets.is_empty() {
                    format!("function ({})", args)
                } else {
                    format!("function {} ({})", rets, args)
                }
            }
            TypeKind::Union => info
                .union_members
                .iter()
                .map(|ty| self.render(*ty, depth + 1))
                .collect::<Vec<String>>()
                .join("|"),
            TypeKind::Array => format!("Array<{}>", self.render_item(info.item, depth)),
            TypeKind::Map => format!("Map<{}>", self.render_item(info.item, depth)),
            TypeKind::LiteralType => info
                .literal_options
                .iter()
                .map(LiteralToken::render)
                .collect::<Vec<String>>()
                .join(" | "),
            TypeKind::Record => {
                let mut rendered = format!("record {}", info.record_name);
                if !info.generics.is_empty() {
                    let generics = info
                        .generics
                        .iter()
                        .map(|ty| self.render(*ty, depth + 1))
                        .collect::<Vec<String>>()
                        .join(",");
                    rendered.push_str(&format!("<{}>", generics));
                }
                let props = info.props.keys().cloned().collect::<Vec<String>>().join(",");
                rendered.push_str(&format!("{{{}}}", props));
                rendered
            }
            TypeKind::Generic => info.generic_name.clone(),
        }
    }

    fn render_item(&self, item: Option<TypeId>, depth: usize) -> String {
        match item {
            Some(item) => self.render(item, depth + 1),
            None => String::from("object"),
        }
    }
}
