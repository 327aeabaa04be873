mod report;

use markov_rewrite::{CodepointFormat, Options, codepoints, escape_text, run};
use report::{Transcript, TranscriptLimits};
use std::io::{self, IsTerminal, Read};

fn main() {
    let config = match parse_args() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2);
        }
    };

    let code = match config.mode {
        Mode::Escape => {
            println!("{}", escape_text(&config.input));
            0
        }
        Mode::Ord => {
            println!("{}", codepoints(&config.input, CodepointFormat::Decimal));
            0
        }
        Mode::HexOrd => {
            println!("{}", codepoints(&config.input, CodepointFormat::Hex));
            0
        }
        Mode::Run => execute(&config),
    };
    std::process::exit(code);
}

fn execute(config: &CliConfig) -> i32 {
    let palette = report::Palette::new(config.color);
    let run = match run(&config.input, &config.options) {
        Ok(run) => run,
        Err(err) => {
            report::print_error(&err, &palette);
            return 1;
        }
    };

    if config.stats {
        report::print_stats(run.program().metrics(), run.program().len(), &palette);
    }

    if config.result_only {
        return report::print_result(run, config.max_result_size, &palette);
    }

    let mut transcript = Transcript::new(config.limits);
    let mut error = None;
    for item in run {
        match item {
            Ok(snapshot) => transcript.push(snapshot),
            Err(err) => {
                error = Some(err);
                break;
            }
        }
    }

    report::print_transcript(&transcript, &palette);
    match error {
        Some(err) => {
            report::print_error(&err, &palette);
            1
        }
        None => {
            report::print_report(report::classify(transcript.result(), config.max_result_size), &palette);
            0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Run,
    Escape,
    Ord,
    HexOrd,
}

struct CliConfig {
    input: String,
    mode: Mode,
    options: Options,
    limits: TranscriptLimits,
    result_only: bool,
    max_result_size: usize,
    stats: bool,
    color: bool,
}

fn parse_args() -> Result<CliConfig, String> {
    let mut input: Option<String> = None;
    let mut mode: Option<Mode> = None;
    let mut options = Options::hosted();
    let mut limits = TranscriptLimits::default();
    let mut result_only = false;
    let mut max_result_size = 1000;
    let mut stats = false;
    let mut color = io::stdout().is_terminal();
    let mut args = std::env::args().skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                println!("markov-rewrite {}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            "--color" => color = true,
            "--no-color" => color = false,
            "--stats" => stats = true,
            "--result-only" => result_only = true,
            "-e" | "--escape" => mode = select_mode(mode, Mode::Escape)?,
            "-o" | "--ord" => mode = select_mode(mode, Mode::Ord)?,
            "-x" | "--hex-ord" => mode = select_mode(mode, Mode::HexOrd)?,
            "--max-rules" => options.max_rules = number_arg(&arg, args.next())?,
            "--max-meta-rules" => options.max_meta_rules = number_arg(&arg, args.next())?,
            "--max-iterations" => options.max_iterations = number_arg(&arg, args.next())?,
            "--max-string-size" => options.max_string_size = number_arg(&arg, args.next())?,
            "--max-result-size" => max_result_size = number_arg(&arg, args.next())?,
            "--head" => limits.head = number_arg(&arg, args.next())?,
            "--tail" => limits.tail = number_arg(&arg, args.next())?,
            "--render-budget" => limits.render_budget = number_arg(&arg, args.next())?,
            "--input" | "-i" => {
                let value = args.next().ok_or_else(|| "error: --input expects a value".to_string())?;
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value);
            }
            "--" => {
                let rest = args.collect::<Vec<_>>().join(" ");
                if !rest.is_empty() {
                    if input.is_some() {
                        return Err("error: input provided multiple times".to_string());
                    }
                    input = Some(rest);
                }
                break;
            }
            _ if arg.starts_with("--input=") => {
                let value = arg.trim_start_matches("--input=");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(value.to_string());
            }
            _ if arg.starts_with('-') => {
                return Err(format!("error: unknown option '{arg}'"));
            }
            _ => {
                let rest = std::iter::once(arg).chain(args).collect::<Vec<_>>().join(" ");
                if input.is_some() {
                    return Err("error: input provided multiple times".to_string());
                }
                input = Some(rest);
                break;
            }
        }
    }

    let mode = mode.unwrap_or(Mode::Run);

    let input = match input {
        Some(value) => value,
        None if io::stdin().is_terminal() => return Err(format!("error: no input provided\n\n{}", help_text())),
        None => read_stdin_input()?,
    };

    Ok(CliConfig { input, mode, options, limits, result_only, max_result_size, stats, color })
}

/// Repeating a mode flag is harmless; combining two different ones is not.
fn select_mode(current: Option<Mode>, next: Mode) -> Result<Option<Mode>, String> {
    match current {
        Some(mode) if mode != next => {
            Err("error: --escape, --ord and --hex-ord are mutually exclusive".to_string())
        }
        _ => Ok(Some(next)),
    }
}

fn number_arg(flag: &str, value: Option<String>) -> Result<usize, String> {
    let value = value.ok_or_else(|| format!("error: {flag} expects a value"))?;
    value.parse().map_err(|_| format!("error: invalid {flag} '{value}' (expected a non-negative integer)"))
}

fn read_stdin_input() -> Result<String, String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer).map_err(|err| format!("error: failed to read stdin: {err}"))?;
    Ok(buffer)
}

fn print_help() {
    println!("{}", help_text());
}

fn help_text() -> String {
    let defaults = Options::hosted();
    let limits = TranscriptLimits::default();
    format!(
        "markov-rewrite {version}

Run a Markov-algorithm string rewriting program and print its snapshots.

Usage:
  markov-rewrite [OPTIONS] [--] <program...>
  markov-rewrite [OPTIONS] --input <program>

Program syntax:
  str <text>             Initial string (at most once).
  key=value              Rewrite the first occurrence of key with value.
  fin key=value          Same, then stop.
  chr / ord key=value    '%' slots capture decimal code points / characters.
  rep / for X=a,b        Clone rules whose key contains X, once per value.
  ';' or newline separates statements, '\\' escapes, '\\n' is a newline.

Options:
  -i, --input <text>         Program text. If omitted, reads remaining args
                             or stdin.
  --max-rules <n>            Rule ceiling. Default: {max_rules}
  --max-meta-rules <n>       Meta-rule ceiling. Default: {max_meta_rules}
  --max-iterations <n>       Step ceiling. Default: {max_iterations}
  --max-string-size <n>      String ceiling in UTF-16 units. Default: {max_string_size}
  --head <n>                 Snapshots always shown from the start. Default: {head}
  --tail <n>                 Snapshots always shown from the end. Default: {tail}
  --render-budget <n>        UTF-16 units shown before eliding. Default: {render_budget}
  --result-only              Print only the final string.
  --max-result-size <n>      Longest final string printed by --result-only.
                             Default: 1000
  -e, --escape               Print the input escaped for use inside a program.
  -o, --ord                  Print the input's code points in decimal.
  -x, --hex-ord              Print the input's code points in hexadecimal.
  --stats                    Print compilation statistics.
  --color                    Force ANSI color output.
  --no-color                 Disable ANSI color output.
  -h, --help                 Show this help message.
  -V, --version              Print version information.

Environment:
  MARKOV_DEBUG=1             Trace parsing, expansion and each step to stderr.

Exit codes:
  0  Success.
  1  The program failed (syntax error or limit exceeded).
  2  Invalid arguments or missing input.
",
        version = env!("CARGO_PKG_VERSION"),
        max_rules = defaults.max_rules,
        max_meta_rules = defaults.max_meta_rules,
        max_iterations = defaults.max_iterations,
        max_string_size = defaults.max_string_size,
        head = limits.head,
        tail = limits.tail,
        render_budget = limits.render_budget,
    )
}
