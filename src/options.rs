use std::path::PathBuf;

use crate::interpreter::DEFAULT_MAX_DEPTH;

pub const DEFAULT_STACK_SIZE: usize = 256 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq)]
pub struct ReplOptions {
    pub files: Vec<PathBuf>,
    pub max_depth: usize,
    pub stack_size: usize,
}

impl Default for ReplOptions {
    fn default() -> Self {
        ReplOptions {
            files: vec![],
            max_depth: DEFAULT_MAX_DEPTH,
            stack_size: DEFAULT_STACK_SIZE,
        }
    }
}

impl ReplOptions {
    pub fn parse() -> Result<Self, String> {
        let mut args = pico_args::Arguments::from_env();
        if args.contains(["-h", "--help"]) {
            print_help();
            std::process::exit(0);
        }
        Self::from_arguments(args)
    }

    pub fn from_arguments(mut args: pico_args::Arguments) -> Result<Self, String> {
        let mut options = ReplOptions::default();
        match args.opt_value_from_str::<_, usize>("--max-depth") {
            Ok(Some(max_depth)) => options.max_depth = max_depth,
            Ok(None) => (),
            Err(e) => return Err(e.to_string()),
        }
        match args.opt_value_from_str::<_, usize>("--stack-size") {
            Ok(Some(stack_size)) => options.stack_size = stack_size,
            Ok(None) => (),
            Err(e) => return Err(e.to_string()),
        }
        for file in args.finish() {
            let file = PathBuf::from(file);
            if file.to_string_lossy().starts_with('-') {
                return Err(format!("unknown option {}", file.display()));
            }
            options.files.push(file);
        }
        Ok(options)
    }
}

fn print_help() {
    println!("Usage: framelisp [options] [FILE...]");
    println!("Evaluates each FILE, then starts an interactive session.");
    println!("Options:");
    println!("  -h, --help: Print this help message");
    println!(
        "  --max-depth <n>: Maximum nesting of procedure calls (default: {})",
        DEFAULT_MAX_DEPTH
    );
    println!("  --stack-size <bytes>: Interpreter thread stack size (default: 256m)");
}

#[cfg(test)]
fn arguments(args: &[&str]) -> pico_args::Arguments {
    pico_args::Arguments::from_vec(args.iter().map(std::ffi::OsString::from).collect())
}

#[test]
fn defaults() {
    assert_eq!(
        ReplOptions::from_arguments(arguments(&[])),
        Ok(ReplOptions::default())
    );
}

#[test]
fn options_and_files() {
    let options =
        ReplOptions::from_arguments(arguments(&["--max-depth", "300", "a.scm", "b.scm"]));
    assert_eq!(
        options,
        Ok(ReplOptions {
            files: vec![PathBuf::from("a.scm"), PathBuf::from("b.scm")],
            max_depth: 300,
            stack_size: DEFAULT_STACK_SIZE,
        })
    );
}

#[test]
fn invalid_options() {
    assert!(ReplOptions::from_arguments(arguments(&["--max-depth", "many"])).is_err());
    assert!(ReplOptions::from_arguments(arguments(&["--verbose"])).is_err());
}
