use std::fs;

use clap::Parser;
use maple::Interpreter;

/// maple is a tree-walking interpreter for a small statically-typed
/// imperative language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Tells maple to look at a file instead of a script.
    #[arg(short, long)]
    file: bool,

    /// Prints the value surfaced by a top-level `return`, if any.
    #[arg(short, long)]
    print_result: bool,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    let mut interpreter = Interpreter::with_builtins();
    match interpreter.run(&script) {
        Ok(result) => {
            if args.print_result
               && let Some(slot) = result
               && let Some(value) = slot.as_value()
            {
                println!("{value}");
            }
        },
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        },
    }
}
