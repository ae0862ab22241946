use std::io::{self, Write};

use rustyline::error::ReadlineError;
use rustyline::Editor;

use crate::interpreter::Interpreter;
use crate::options::ReplOptions;

fn check_bracket_closed(chars: impl Iterator<Item = char>) -> bool {
    let mut count = 0;
    let mut in_comment = false;
    for c in chars {
        match (c, in_comment) {
            ('(', false) => count += 1,
            (')', false) => count -= 1,
            (';', false) => in_comment = true,
            ('\n', true) => in_comment = false,
            _ => (),
        }
    }
    count <= 0
}

fn is_exit_command(line: &str) -> bool {
    line.trim().eq_ignore_ascii_case("exit")
}

/// Text printed for one complete input.
pub fn evaluate_input(interpreter: &Interpreter, source: &str) -> Option<String> {
    match interpreter.eval_program(source) {
        Ok(Some(value)) => Some(format!("  out> {}", value)),
        Ok(None) => None,
        Err(e) => Some(format!("  {}", e)),
    }
}

pub fn run(options: &ReplOptions) {
    let interpreter = Interpreter::new().with_max_depth(options.max_depth);
    for file in &options.files {
        match interpreter.eval_file(file) {
            Ok(value) => log::debug!("{} evaluated to {}", file.display(), value),
            Err(e) => eprintln!("{}: {}", file.display(), e),
        }
    }

    let mut rl = Editor::<()>::new();
    // a failed flush only delays the prompt
    io::stdout().flush().ok();
    let mut source = String::new();

    const VERSION: &str = env!("CARGO_PKG_VERSION");
    println!("framelisp version {}", VERSION);
    loop {
        let readline = match source.is_empty() {
            true => rl.readline("in> "),
            false => rl.readline("... "),
        };
        match readline {
            Ok(line) => {
                if source.is_empty() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if is_exit_command(&line) {
                        break;
                    }
                }
                source.push_str(line.as_str());
                source.push('\n');
                if check_bracket_closed(source.chars()) {
                    rl.add_history_entry(source.trim_end());
                    if let Some(output) = evaluate_input(&interpreter, &source) {
                        println!("{}", output);
                    }
                    source.clear();
                }
            }
            Err(ReadlineError::Interrupted) => {
                source.clear();
                println!("Interrupted input by ctrl-c, use ctrl-d or exit to quit.");
                continue;
            }
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }
    println!("bye bye!");
}

#[test]
fn bracket_balance() {
    assert!(check_bracket_closed("(+ 1 2)".chars()));
    assert!(!check_bracket_closed("(define (f x)\n".chars()));
    assert!(check_bracket_closed("x".chars()));
    assert!(!check_bracket_closed("(f ; closing ) in a comment\n".chars()));
    assert!(check_bracket_closed("(f ; comment\n)".chars()));
}

#[test]
fn exit_in_any_case() {
    assert!(is_exit_command("exit"));
    assert!(is_exit_command("  EXIT "));
    assert!(is_exit_command("Exit"));
    assert!(!is_exit_command("(exit)"));
}

#[test]
fn session_output() {
    let interpreter = Interpreter::new();
    assert_eq!(
        evaluate_input(&interpreter, "(define x 4)\n"),
        Some("  out> 4".to_string())
    );
    assert_eq!(
        evaluate_input(&interpreter, "(list x 2.0 #t)\n"),
        Some("  out> (4 2.0 #t)".to_string())
    );
    assert_eq!(
        evaluate_input(&interpreter, "y\n"),
        Some("  SchemeNameError: unbound symbol y (at 1:1)".to_string())
    );
    assert_eq!(evaluate_input(&interpreter, "; only a comment\n"), None);
}
