use std::{
    env,
    fs::read_to_string,
    path::{Path, PathBuf},
    process::exit,
};

use tigr::{
    errors::errors::{Error, ErrorList, ErrorTip, MAX_RENDERED_ERRORS},
    lexer::lexer::tokenize,
    parse,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: tigr [--tokens] <file>";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tigr=warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut dump_tokens = false;
    let mut file_path = None;

    for arg in env::args().skip(1) {
        match arg.as_str() {
            "--tokens" => dump_tokens = true,
            _ if file_path.is_none() => file_path = Some(PathBuf::from(arg)),
            _ => {
                eprintln!("{}", USAGE);
                exit(2);
            }
        }
    }

    let Some(file_path) = file_path else {
        eprintln!("{}", USAGE);
        exit(2);
    };

    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.to_string_lossy().into_owned());

    let file_contents = match read_to_string(&file_path) {
        Ok(contents) => contents,
        Err(err) => {
            eprintln!("Failed to read {}: {}", file_path.display(), err);
            exit(1);
        }
    };

    if dump_tokens {
        for token in tokenize(&file_contents, Some(&file_name)) {
            token.debug();
        }
        return;
    }

    info!(file = %file_name, bytes = file_contents.len(), "parsing");
    let (program, bridge_modules, errors) = parse(&file_name, &file_contents);

    if !errors.is_empty() {
        display_errors(&errors, &file_path);
        exit(1);
    }

    debug!(modules = ?bridge_modules, "go modules");
    for module in &bridge_modules {
        println!("// go module {}", module);
    }
    println!("{}", program);
}

fn display_errors(errors: &ErrorList, file: &Path) {
    for error in errors.iter().take(MAX_RENDERED_ERRORS) {
        display_error(error, file);
    }

    if errors.count() > MAX_RENDERED_ERRORS {
        eprintln!(
            "More than {} errors, {} hidden",
            MAX_RENDERED_ERRORS,
            errors.count() - MAX_RENDERED_ERRORS
        );
    }
}

fn display_error(error: &Error, file: &Path) {
    /*
        Error: VariableNotDeclared (Declare `x` with `:=` first)
        -> main.tigr:1:3
          |
        1 | x = 5
          | --^
    */

    let position = error.get_position();

    let line_str = position.row.to_string();
    let padding = line_str.len() + 2;

    if let ErrorTip::None = error.get_tip() {
        eprintln!("Error: {}", error.get_error_name());
    } else {
        eprintln!("Error: {} ({})", error.get_error_name(), error.get_tip());
    }
    eprintln!("  {}", error.get_message());
    eprintln!("-> {}:{}", file.display(), position.line_col());
    eprintln!("{:>padding$}", "|");

    let (line_text, removed_whitespace) = remove_starting_whitespace(error.get_line());
    eprintln!("{} | {}", line_str, line_text.trim_end());

    let arrows = position.col.saturating_sub(removed_whitespace).max(1);

    eprintln!("{:>padding$} {:->arrows$}", "|", "^");
}

fn remove_starting_whitespace(string: &str) -> (&str, usize) {
    let trimmed = string.trim_start();
    (trimmed, string.len() - trimmed.len())
}
