use std::{env, fs::read_to_string, path::PathBuf, process, time::Instant};

use checker::{check_source, display_diagnostic, display_error, logger, type_checker::type_checker::CheckerConfig};

const USAGE: &str = "usage: checker <file> [--contract] [--verbose] [--open-record-call] [--dump-types]";

fn main() {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut config = CheckerConfig::default();
    let mut verbose = false;
    let mut dump_types = false;
    let mut file_path = None;

    for arg in &args {
        match arg.as_str() {
            "--contract" => config.contract_mode = true,
            "--verbose" => verbose = true,
            "--open-record-call" => config.open_record_call_syntax = true,
            "--dump-types" => dump_types = true,
            flag if flag.starts_with("--") => {
                eprintln!("unknown flag {}\n{}", flag, USAGE);
                process::exit(2);
            }
            path if file_path.is_none() => file_path = Some(PathBuf::from(path)),
            _ => {
                eprintln!("{}", USAGE);
                process::exit(2);
            }
        }
    }

    let Some(file_path) = file_path else {
        eprintln!("{}", USAGE);
        process::exit(2);
    };

    let level = if verbose { log::LevelFilter::Debug } else { log::LevelFilter::Warn };
    if let Err(err) = logger::init(level) {
        eprintln!("failed to install logger: {}", err);
    }

    let source = match read_to_string(&file_path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("failed to read {}: {}", file_path.display(), err);
            process::exit(2);
        }
    };

    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string());

    let start = Instant::now();
    let (checker, result) = match check_source(source.clone(), file_name, config) {
        Ok(outcome) => outcome,
        Err(err) => {
            display_error(&err, &source, &file_path);
            process::exit(1);
        }
    };
    log::debug!("checked {} in {:?}", file_path.display(), start.elapsed());

    if dump_types {
        print!("{}", checker.dump_scopes());
    }

    match result {
        Ok(ret) => {
            log::info!("program returns {}", checker.types.str(ret));
        }
        Err(diagnostics) => {
            for diagnostic in &diagnostics {
                display_diagnostic(diagnostic);
            }
            println!("{} error(s) found", diagnostics.len());
            process::exit(1);
        }
    }
}
