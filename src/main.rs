use std::{fs, io::Read, process};

use log::debug;
use slr_course_helper::{analyze, grammar::ARITHMETIC_GRAMMAR, Grammar, ParseConfig};

const OUTPUTS: [&str; 5] = ["prod", "ff", "states", "table", "parse"];

fn print_help() {
    println!("Usage: slr-course-helper outputs [options] [grammar file]");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  ff: First and follow sets");
    println!("  states: LR(0) canonical collection");
    println!("  table: SLR(1) parsing table");
    println!("  parse: Shift-reduce trace of the input given with -i");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -d: Use the built-in arithmetic expression grammar");
    println!("  -i TOKENS: Whitespace separated input to parse, e.g. \"id * id + id\"");
    println!("  -m N: Give up parsing after N steps (default 50)");
}

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

fn fail(message: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", message);
    process::exit(1);
}

fn main() {
    env_logger::init();

    let mut outputs: Vec<&str> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len() && OUTPUTS.contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    let mut output_format = OutputFormat::Plain;
    let mut use_default = false;
    let mut input: Option<&str> = None;
    let mut config = ParseConfig::default();

    while i < args.len() && args[i].starts_with('-') {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-l" => output_format = OutputFormat::LaTeX,
            "-j" => output_format = OutputFormat::JSON,
            "-d" => use_default = true,
            "-i" => {
                i += 1;
                match args.get(i) {
                    Some(tokens) => input = Some(tokens.as_str()),
                    None => fail("-i needs an input string"),
                }
            }
            "-m" => {
                i += 1;
                match args.get(i).map(|n| n.parse::<usize>()) {
                    Some(Ok(n)) if n > 0 => config.max_steps = n,
                    _ => fail("-m needs a positive step count"),
                }
            }
            other => fail(format!("unknown option {}", other)),
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() || (use_default && i < args.len()) {
        print_help();
        return;
    }

    let text: String = if use_default {
        ARITHMETIC_GRAMMAR.to_string()
    } else if i == args.len() {
        let mut buf = String::new();
        if let Err(e) = std::io::stdin().read_to_string(&mut buf) {
            fail(e);
        }
        buf
    } else {
        fs::read_to_string(args[i].as_str()).unwrap_or_else(|e| fail(e))
    };

    let g = Grammar::parse(&text);
    debug!("read {} productions", g.productions.len());
    let analysis = analyze(&g).unwrap_or_else(|e| fail(e));

    for output in outputs {
        let printed = match output {
            "prod" => {
                let t = g.to_production_output_vec();
                match output_format {
                    OutputFormat::Plain => Ok(t.to_plaintext()),
                    OutputFormat::LaTeX => Ok(t.to_latex()),
                    OutputFormat::JSON => serde_json::to_string(&t),
                }
            }
            "ff" => {
                let t = analysis.to_non_terminal_output_vec();
                match output_format {
                    OutputFormat::Plain => Ok(t.to_plaintext()),
                    OutputFormat::LaTeX => Ok(t.to_latex()),
                    OutputFormat::JSON => t.to_json(),
                }
            }
            "states" => {
                let t = analysis.to_state_output_vec();
                match output_format {
                    OutputFormat::Plain => Ok(t.to_plaintext()),
                    OutputFormat::LaTeX => Ok(t.to_latex()),
                    OutputFormat::JSON => serde_json::to_string(&t),
                }
            }
            "table" => {
                let t = analysis.to_slr_table_output();
                match output_format {
                    OutputFormat::Plain => Ok(t.to_plaintext()),
                    OutputFormat::LaTeX => Ok(t.to_latex()),
                    OutputFormat::JSON => serde_json::to_string(&t),
                }
            }
            "parse" => {
                let tokens = input.unwrap_or_else(|| fail("parse needs -i TOKENS"));
                let t = analysis.parse_with(tokens, config).to_output();
                match output_format {
                    OutputFormat::Plain => Ok(t.to_plaintext()),
                    OutputFormat::LaTeX => Ok(t.to_latex()),
                    OutputFormat::JSON => t.to_json(),
                }
            }
            _ => continue,
        };

        match printed {
            Ok(s) => println!("{}", s),
            Err(e) => fail(e),
        }
    }
}
