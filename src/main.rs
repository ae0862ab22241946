use std::{process, thread};

use framelisp::{options::ReplOptions, repl};

fn main() {
    env_logger::init();
    let options = match ReplOptions::parse() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(2);
        }
    };
    // deep recursion needs more stack than the main thread offers
    let session = thread::Builder::new()
        .name("framelisp".to_string())
        .stack_size(options.stack_size)
        .spawn(move || repl::run(&options));
    match session {
        Ok(handle) => {
            if handle.join().is_err() {
                process::exit(1);
            }
        }
        Err(e) => {
            eprintln!("cannot start interpreter thread: {}", e);
            process::exit(1);
        }
    }
}
