//! Built-in names visible to every program.
//!
//! Entries are parsed in order with the signature grammar, so a type must be
//! defined before a signature refers to it. Names starting with `$type$` define
//! types; operators are stored as `(op)`, specialised overloads as `(op$T1$T2)`.

pub const TYPE_NAMESPACE_PREFIX: &str = "$type$";

pub const GLOBALS: &[(&str, &str)] = &[
    ("$type$string", "string"),
    ("$type$int", "int"),
    ("$type$number", "number"),
    ("$type$bool", "bool"),
    ("$type$table", "table"),
    ("$type$Array", "Array"),
    ("$type$Map", "Map"),
    ("$type$Nil", "nil"),
    ("$type$Function", "function"),
    ("$type$object", "object"),
    (
        "$type$Stream",
        "record {
            size: (table) => int;
            pos: (table) => int;
            reset_pos: (table) => void;
            current: (table) => int;
            eof: (table) => bool;
            push: (table, int) => void;
            push_string: (table, string) => void;
            next: (table) => bool
        }",
    ),
    // binary operators
    ("(+)", "(number, number) => number"),
    ("(-)", "(number, number) => number"),
    ("(*)", "(number, number) => number"),
    ("(+$int$int)", "(int, int) => int"),
    ("(-$int$int)", "(int, int) => int"),
    ("(*$int$int)", "(int, int) => int"),
    ("(^$int$int)", "(int, int) => int"),
    ("(/)", "(number, number) => number"),
    ("(//)", "(number, number) => int"),
    ("(^)", "(number, number) => number"),
    ("(%)", "(number, number) => number"),
    ("(%$int$int)", "(int, int) => int"),
    ("(&)", "(int, int) => int"),
    ("(~)", "(int, int) => int"),
    ("(|)", "(number, number) => int"),
    ("(>>)", "(number, number) => number"),
    ("(<<)", "(number, number) => number"),
    ("(<)", "(number, number) => bool"),
    ("(<=)", "(number, number) => bool"),
    ("(>)", "(number, number) => bool"),
    ("(>=)", "(number, number) => bool"),
    ("(==)", "(object, object) => bool"),
    ("(~=)", "(object, object) => bool"),
    ("(and)", "(object, object) => object"),
    ("(or)", "(object, object) => object"),
    ("(..)", "(string, string) => string"),
    ("(..$string$int)", "(string, int) => string"),
    ("(..$string$number)", "(string, number) => string"),
    // unary operators
    ("-", "(number) => number"),
    ("-$int", "(int) => int"),
    ("not", "(object) => bool"),
    ("#", "(object) => int"),
    ("~", "(int) => int"),
    // library
    ("print", "(...) => void"),
    ("pprint", "(...) => void"),
    (
        "table",
        "record {
            concat: (table, string, ...) => string;
            insert: (table, ...) => void;
            append: (table, object) => void;
            length: (table) => int;
            remove: (table, ...) => object;
            sort: (table, ...) => void
        }",
    ),
    (
        "string",
        "record {
            split: (string, string) => table;
            byte: (string) => int;
            char: (...) => string;
            find: (string, string, ...) => string;
            format: (string, ...) => string;
            gmatch: (string, string) => function;
            gsub: (string, string, string, ...) => string;
            len: (string) => int;
            match: (string, string, ...) => string;
            rep: (string, int, ...) => string;
            reverse: (string) => string;
            sub: (string, int, ...) => string;
            upper: (string) => string
        }",
    ),
    ("Array", "(object) => table"),
    (
        "time",
        "record {
            add: (int, string, int) => int;
            tostr: (int) => string;
            difftime: (int, int) => int
        }",
    ),
    (
        "math",
        "record {
            abs$int: (int) => int;
            abs: (number) => number;
            ceil: (number) => int;
            floor: (number) => int;
            max: (...) => number;
            maxinteger: int;
            min: (...) => number;
            mininteger: int;
            pi: number;
            tointeger: (number) => int;
            type: (number) => string
        }",
    ),
    (
        "json",
        "record {
            dumps: (object) => string;
            loads: (string) => object
        }",
    ),
    (
        "utf8",
        "record {
            char: (...) => string;
            charpattern: string;
            codes: (string) => function;
            codepoint: (string, int, int) => int;
            len: (string, int, int) => int;
            offset: (string, int, int) => int
        }",
    ),
    (
        "os",
        "record {
            clock: () => int;
            date: (string, int) => string;
            difftime: (int, int) => int;
            execute: (string) => void;
            exit: (int, bool) => void;
            getenv: (string) => string;
            remove: (string) => void;
            rename: (string, string) => void;
            setlocale: (string, string) => void;
            time: (...) => int;
            tmpname: () => string
        }",
    ),
    (
        "io",
        "record {
            close: (...) => void;
            flush: () => void;
            input: (...) => void;
            lines: (string) => function;
            open: (string, string) => void;
            read: (string) => string;
            seek: (...) => int;
            write: (string) => void
        }",
    ),
    (
        "net",
        "record {
            listen: (string, int) => object;
            connect: (string, int) => object;
            accept: (object) => object;
            accept_async: (object, function) => void;
            start_io_loop: (object) => void;
            read: (object, int) => string;
            read_until: (object, string) => string;
            write: (object, object) => void;
            close_socket: (object) => void;
            close_server: (object) => void;
            shutdown: () => void
        }",
    ),
    (
        "http",
        "record {
            listen: (string, int) => object;
            connect: (string, int) => object;
            request: (string, string, string, table) => object;
            close: (object) => void;
            accept: (object) => object;
            accept_async: (object, function) => void;
            start_io_loop: (object) => void;
            get_req_header: (object, string) => string;
            get_res_header: (object, string) => string;
            get_req_http_method: (object) => string;
            get_req_path: (object) => string;
            get_req_http_protocol: (object) => string;
            get_req_body: (object) => string;
            set_res_header: (object, string, string) => void;
            write_res_body: (object, string) => void;
            set_status: (object, int, string) => void;
            get_status: (object) => int;
            get_status_message: (object) => string;
            get_res_body: (object) => string;
            finish_res: (object) => void
        }",
    ),
    ("Stream", "() => Stream"),
    ("jsonrpc", "record {}"),
    ("type", "(object) => string"),
    ("require", "(string) => object"),
    ("import_contract_from_address", "(string) => table"),
    ("import_contract", "(string) => table"),
    ("thinkyoung", "table"),
    ("storage", "table"),
    ("repl", "() => void"),
    ("exit", "(object) => object"),
    ("exit_repl", "object (object)"),
    ("debugger", "(...) => void"),
    ("exit_debugger", "() => void"),
    ("caller", "string"),
    ("caller_address", "string"),
    ("param", "string"),
    ("truncated", "bool"),
    ("contract_id", "string"),
    ("event_type", "string"),
    // chain
    ("contract_transfer", "(...) => object"),
    ("contract_transfer_to", "(...) => object"),
    ("transfer_from_contract_to_address", "(string, string, int) => int"),
    ("transfer_from_contract_to_public_account", "(string, string, int) => int"),
    ("get_chain_random", "() => number"),
    ("get_transaction_fee", "() => int"),
    ("get_transaction_id", "() => string"),
    ("get_header_block_num", "() => int"),
    ("wait_for_future_random", "(int) => int"),
    ("get_waited", "(int) => int"),
    ("get_contract_balance_amount", "(string, string) => int"),
    ("get_chain_now", "() => int"),
    ("get_current_contract_address", "() => string"),
    // iteration, conversion and metatables
    ("pairs", "(table) => object"),
    ("ipairs", "(table) => object"),
    ("pairsByKeys", "(table) => object"),
    ("collectgarbage", "object (...)"),
    ("error", "(...) => object"),
    ("getmetatable", "(table) => table"),
    ("_VERSION", "string"),
    ("_ENV", "table"),
    ("_G", "table"),
    ("tostring", "(object) => string"),
    ("tojsonstring", "(object) => string"),
    ("tonumber", "(object) => number"),
    ("tointeger", "(object) => int"),
    ("todouble", "(object) => number"),
    ("totable", "(object) => table"),
    ("toboolean", "(object) => bool"),
    ("next", "(...) => object"),
    ("rawequal", "(object, object) => bool"),
    ("rawlen", "(object) => int"),
    ("rawget", "(object, object) => object"),
    ("rawset", "(object, object, object) => void"),
    ("select", "(...) => object"),
    ("setmetatable", "(table, table) => void"),
];

/// Methods of a contract the chain calls directly.
pub const CONTRACT_SPECIAL_APIS: &[&str] = &["init", "on_deposit", "on_destroy", "on_upgrade"];

/// Special APIs taking a single `int` besides `self`.
pub const CONTRACT_INT_ARG_APIS: &[&str] = &["on_deposit"];

/// Names that can never be bound.
pub const RESERVED_NAMES: &[&str] = &["emit"];

pub const EMIT_EVENT_NAME_MAX_LEN: usize = 49;

/// Checked before the program in contract mode.
pub const TYPED_PRELUDE: &str = "type Contract<S> = {\n    id: string,\n    name: string,\n    storage: S\n}\n";
