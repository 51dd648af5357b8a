#![allow(clippy::module_inception)]

use std::{path::Path, rc::Rc};

use crate::{
    errors::errors::{Diagnostic, Error, ErrorTip},
    lexer::lexer::tokenize,
    parser::parser::parse,
    type_checker::{
        type_checker::{CheckerConfig, TypeChecker},
        types::TypeId,
    },
};

pub mod ast;
pub mod errors;
pub mod lexer;
pub mod logger;
pub mod macros;
pub mod parser;
pub mod type_checker;

extern crate regex;

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub offset: u32,
    pub line: u32,
    pub column: u32,
    pub file: Rc<String>,
}

impl Position {
    pub fn new(offset: u32, line: u32, column: u32, file: Rc<String>) -> Self {
        Position {
            offset,
            line,
            column,
            file,
        }
    }

    pub fn null() -> Self {
        Position::new(0, 0, 0, Rc::new(String::from("<null>")))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub fn null() -> Self {
        Span {
            start: Position::null(),
            end: Position::null(),
        }
    }

    pub fn line(&self) -> u32 {
        self.start.line
    }
}

/// A finished checker together with the program's return type or its diagnostics.
pub type CheckOutcome = (TypeChecker, Result<TypeId, Vec<Diagnostic>>);

/// Runs the whole pipeline over a source string: tokenize, parse, then type check.
///
/// Lexer and parser failures come back as the outer `Err`. Type errors never abort the run;
/// they are returned alongside the checker so callers can also inspect its side channels
/// (emitted events, imported contracts, scope dump).
pub fn check_source(
    source: String,
    file: Option<String>,
    config: CheckerConfig,
) -> Result<CheckOutcome, Error> {
    let file_name = Rc::new(file.clone().unwrap_or_else(|| String::from("shell")));
    let tokens = tokenize(source, file)?;
    let (_, ast) = parse(tokens, file_name);
    let mut ast = ast?;

    let mut checker = TypeChecker::new(config);
    let contract_mode = checker.config.contract_mode;
    let result = checker.check(&mut ast, contract_mode);
    Ok((checker, result))
}

pub fn get_line_at_position(content: &str, position: u32) -> Option<(usize, String, usize)> {
    let pos = position as usize;

    if pos > content.len() {
        return None;
    }

    let mut start = 0;
    let mut line_number = 1;

    for line in content.split_inclusive('\n') {
        let end = start + line.len();

        if (start..end).contains(&pos) {
            let line_pos = pos - start;
            return Some((line_number, line.to_string(), line_pos));
        }

        start = end;
        line_number += 1;
    }

    None
}

pub fn display_error(error: &Error, source: &str, file: &Path) {
    /*
        error: message
        -> contract.glua
           |
        20 | local a = @
           | ----------^
    */

    let position = error.get_position();

    if let ErrorTip::None = error.get_tip() {
        println!("Error: {}", error.get_error_name());
    } else {
        println!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    println!("-> {}", file.as_os_str().to_string_lossy());

    let Some((line, line_text, line_pos)) = get_line_at_position(source, position.offset) else {
        return;
    };

    let line_string = line.to_string();
    let padding = line_string.len() + 2;

    println!("{:>padding$}", "|");

    let (line_text_removed, removed_whitespace) = remove_starting_whitespace(&line_text);
    println!("{} | {}", line_string, line_text_removed.trim_end());

    let arrows = line_pos.saturating_sub(removed_whitespace) + 1;

    println!("{:>padding$} {:->arrows$}", "|", "^");
}

pub fn display_diagnostic(diagnostic: &Diagnostic) {
    println!("error[{}]: {}", diagnostic.code.code(), diagnostic.message);
}

fn remove_starting_whitespace(string: &str) -> (String, usize) {
    let mut start = 0;
    for c in string.chars() {
        if c == ' ' || c == '\t' {
            start += 1;
        } else {
            break;
        }
    }

    (String::from(&string[start..]), start)
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_get_line_at_position() {
        let content = "Hello, world!\n\nlocal a = 1\nTesting { }\n";
        let (line_number, line, line_pos) = super::get_line_at_position(content, 10).unwrap();
        assert_eq!(line_number, 1);
        assert_eq!(line, "Hello, world!\n");
        assert_eq!(line_pos, 10);

        let (line_number, line, line_pos) = super::get_line_at_position(content, 35).unwrap();
        assert_eq!(line_number, 4);
        assert_eq!(line, "Testing { }\n");
        assert_eq!(line_pos, 8);

        assert!(super::get_line_at_position(content, 500).is_none());
    }
}
