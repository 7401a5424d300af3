// ABOUTME: CLI/REPL driver - clap-parsed arguments, rustyline-backed interactive loop

use clap::Parser;
use mal::config;
use mal::env::Environment;
use mal::error::EvalError;
use mal::eval::eval;
use mal::printer::pr_str;
use mal::reader::read_str;
use mal::types::Value;
use rustyline::error::ReadlineError;
use rustyline::{Config, Editor};
use std::path::PathBuf;
use std::rc::Rc;

/// A small tree-walking Lisp interpreter (MAL).
#[derive(Parser, Debug)]
#[command(name = "mal")]
#[command(version = config::VERSION)]
#[command(about = "A self-hosting Make-A-Lisp interpreter")]
struct CliArgs {
    /// Script file to run. With none, starts the interactive REPL.
    #[arg(value_name = "FILE")]
    script: Option<PathBuf>,

    /// Extra arguments bound to `*ARGV*` in the script's environment.
    #[arg(trailing_var_arg = true)]
    args: Vec<String>,
}

fn main() {
    let cli = CliArgs::parse();
    let env = match mal::root_environment() {
        Ok(env) => env,
        Err(e) => {
            eprintln!("ERROR: failed to initialize builtins: {e}");
            std::process::exit(1);
        }
    };

    match cli.script {
        Some(path) => run_script(&path, &cli.args, &env),
        None => run_repl(&env),
    }
}

fn run_script(path: &PathBuf, args: &[String], env: &Rc<Environment>) {
    let argv = Value::list(args.iter().map(|a| Value::string(a.clone())).collect());
    env.define("*ARGV*".into(), argv);

    let path_str = path.display().to_string();
    let load_form = Value::list(vec![Value::symbol("load-file"), Value::string(path_str)]);

    match eval(load_form, env.clone()) {
        Ok(_) => {}
        Err(EvalError::Thrown(value)) => {
            eprintln!("Uncaught exception: {}", pr_str(&value, true));
        }
        Err(e) => eprintln!("ERROR: {e}"),
    }
}

fn run_repl(env: &Rc<Environment>) {
    println!("{}", config::WELCOME_MESSAGE);
    println!("{}", config::WELCOME_SUBTITLE);

    let config = Config::builder().auto_add_history(true).build();
    let mut rl: Editor<(), rustyline::history::DefaultHistory> = match Editor::with_config(config) {
        Ok(rl) => rl,
        Err(e) => {
            eprintln!("ERROR: failed to initialize REPL: {e}");
            std::process::exit(1);
        }
    };

    let history_file = ".mal_history";
    let _ = rl.load_history(history_file);

    loop {
        match rl.readline(config::PROMPT) {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                rep(&line, env);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("ERROR: {e}");
                break;
            }
        }
    }

    let _ = rl.save_history(history_file);
}

/// Read-eval-print one line: reader diagnostics go to stderr prefixed
/// `ERROR:`; an uncaught exception prints and the REPL continues.
fn rep(line: &str, env: &Rc<Environment>) {
    let form = match read_str(line) {
        Ok(form) => form,
        Err(e) => {
            eprintln!("ERROR: {e}");
            return;
        }
    };

    match eval(form, env.clone()) {
        Ok(value) => println!("{}", pr_str(&value, true)),
        Err(EvalError::Thrown(value)) => {
            eprintln!("Uncaught exception: {}", pr_str(&value, true));
        }
        Err(e) => eprintln!("ERROR: {e}"),
    }
}
