use anyhow::Context;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use tcghub_core::{
    format_number, safe_evaluate_expression, AppConfig, CoinGameRequest, LogLevel,
};
use tcghub_data::{default_config_path, load_app_config, ValidatedConfig};
use tcghub_replay::{
    build_replay, join_coins, play, write_json, write_text, ReplayConfig, ReplayError,
    ReplayFrame, ReplaySink, ReplayStatus,
};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "\
usage:
  tcghub coins <list> <threshold> [--json] [--no-delay] [--report <path>] [--json-out <path>]
  tcghub calc <expression>
  tcghub                        interactive prompt
options:
  --config <path>   config file (default: $TCGHUB_CONFIG)
  --delay <ms>      pause between replayed operations";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
enum Command {
    #[default]
    Interactive,
    Help,
    Coins {
        coins: String,
        threshold: String,
    },
    Calc {
        expression: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct CliOptions {
    command: Command,
    config_path: Option<PathBuf>,
    delay_ms: Option<u64>,
    no_delay: bool,
    json: bool,
    report_path: Option<PathBuf>,
    json_out: Option<PathBuf>,
}

impl CliOptions {
    fn replay_config(&self, config: &AppConfig) -> ReplayConfig {
        if self.no_delay {
            return ReplayConfig { step_delay_ms: 0 };
        }
        match self.delay_ms {
            Some(step_delay_ms) => ReplayConfig { step_delay_ms },
            None => ReplayConfig::from(config),
        }
    }
}

fn parse_cli_options(args: &[String]) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut positional: Vec<String> = Vec::new();
    let mut idx = 0usize;
    while idx < args.len() {
        match args[idx].as_str() {
            "--json" => options.json = true,
            "--no-delay" => options.no_delay = true,
            "--help" | "-h" => options.command = Command::Help,
            "--config" => {
                options.config_path = Some(PathBuf::from(flag_value(args, idx)?));
                idx += 1;
            }
            "--report" => {
                options.report_path = Some(PathBuf::from(flag_value(args, idx)?));
                idx += 1;
            }
            "--json-out" => {
                options.json_out = Some(PathBuf::from(flag_value(args, idx)?));
                idx += 1;
            }
            "--delay" => {
                let value = flag_value(args, idx)?;
                let delay = value
                    .parse::<u64>()
                    .map_err(|_| format!("--delay expects milliseconds, got {value}"))?;
                options.delay_ms = Some(delay);
                idx += 1;
            }
            other => positional.push(other.to_string()),
        }
        idx += 1;
    }
    if options.command == Command::Help {
        return Ok(options);
    }
    let Some((name, rest)) = positional.split_first() else {
        return Ok(options);
    };
    options.command = match name.as_str() {
        "coins" => match rest {
            [coins, threshold] => Command::Coins {
                coins: coins.clone(),
                threshold: threshold.clone(),
            },
            _ => return Err("coins expects <list> <threshold>".to_string()),
        },
        "calc" => Command::Calc {
            expression: rest.join(" "),
        },
        "help" => Command::Help,
        other => return Err(format!("unknown command: {other}")),
    };
    Ok(options)
}

fn flag_value(args: &[String], idx: usize) -> Result<&str, String> {
    args.get(idx + 1)
        .map(String::as_str)
        .ok_or_else(|| format!("{} expects a value", args[idx]))
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_cli_options(&args) {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            eprintln!("{USAGE}");
            std::process::exit(2);
        }
    };
    let validated = match load_config(options.config_path.as_deref()) {
        Ok(validated) => validated,
        Err(err) => {
            eprintln!("config error: {err:#}");
            std::process::exit(1);
        }
    };
    init_tracing(validated.config.log_level);
    if !validated.errors.is_empty() {
        warn!(
            errors = ?validated.errors,
            "Invalid app config detected. Using safe defaults."
        );
    }
    let config = validated.config;
    debug!(?config, "config loaded");

    let outcome = match &options.command {
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::Coins { coins, threshold } => run_coins(&options, &config, coins, threshold),
        Command::Calc { expression } => run_calc(expression),
        Command::Interactive => run_interactive(&options, &config),
    };
    if let Err(err) = outcome {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> anyhow::Result<ValidatedConfig> {
    match path.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => load_app_config(&path),
        None => Ok(ValidatedConfig {
            config: AppConfig::default(),
            errors: Vec::new(),
        }),
    }
}

fn init_tracing(level: LogLevel) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn run_coins(
    options: &CliOptions,
    config: &AppConfig,
    coins_text: &str,
    threshold_text: &str,
) -> anyhow::Result<()> {
    let request = CoinGameRequest::parse(coins_text, threshold_text)?;
    let result = request.solve(config.solver_limits());
    info!(
        coins = request.coins.len(),
        threshold = request.threshold,
        operations = result.operations,
        success = result.success,
        "coin game solved"
    );
    let replay = build_replay(&request.coins, request.threshold, &result);

    if options.json {
        let body = serde_json::to_string_pretty(&result).context("serialize result")?;
        println!("{body}");
    } else {
        let mut sink = TerminalSink::new(io::stdout());
        play(&replay, &options.replay_config(config), &mut sink).context("write replay")?;
    }
    if let Some(path) = options.report_path.as_deref() {
        write_text(path, &replay).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "text report written");
    }
    if let Some(path) = options.json_out.as_deref() {
        write_json(path, &replay).with_context(|| format!("write {}", path.display()))?;
        info!(path = %path.display(), "json report written");
    }
    Ok(())
}

fn run_calc(expression: &str) -> anyhow::Result<()> {
    let value = safe_evaluate_expression(expression)?;
    println!("Result: {}", format_number(value));
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PromptCommand {
    Empty,
    Help,
    Quit,
    Coins { coins: String, threshold: String },
    Calc { expression: String },
    Unknown(String),
}

/// `coins` takes the last word as the threshold and everything before it as
/// the coin list, so `coins 1, 2, 3 7` works without quoting. A list whose
/// last word follows a comma (`coins 1, 2, 3`) has no threshold.
fn parse_prompt_command(line: &str) -> PromptCommand {
    let input = line.trim();
    if input.is_empty() {
        return PromptCommand::Empty;
    }
    let (head, rest) = match input.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (input, ""),
    };
    match head {
        "help" | "h" | "?" => PromptCommand::Help,
        "quit" | "exit" | "q" => PromptCommand::Quit,
        "calc" => PromptCommand::Calc {
            expression: rest.to_string(),
        },
        "coins" => match rest.rsplit_once(char::is_whitespace) {
            Some((coins, threshold)) if !coins.trim_end().ends_with(',') => {
                PromptCommand::Coins {
                    coins: coins.trim().to_string(),
                    threshold: threshold.to_string(),
                }
            }
            _ => PromptCommand::Coins {
                coins: rest.to_string(),
                threshold: String::new(),
            },
        },
        other => PromptCommand::Unknown(other.to_string()),
    }
}

fn print_prompt_help() {
    println!("Commands:");
    println!("  coins <list> <threshold>   merge coins until all reach the threshold");
    println!("  calc <expression>          evaluate + - * / % ** and parentheses");
    println!("  help|h|?                   show help");
    println!("  quit|exit|q                exit");
}

fn run_interactive(options: &CliOptions, config: &AppConfig) -> anyhow::Result<()> {
    println!("Tokyo TCG Hub");
    print_prompt_help();
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush().context("flush prompt")?;
        let Some(line) = lines.next() else {
            println!();
            break;
        };
        let line = line.context("read input")?;
        let outcome = match parse_prompt_command(&line) {
            PromptCommand::Empty => continue,
            PromptCommand::Quit => break,
            PromptCommand::Help => {
                print_prompt_help();
                Ok(())
            }
            PromptCommand::Coins { coins, threshold } => {
                run_coins(options, config, &coins, &threshold)
            }
            PromptCommand::Calc { expression } => run_calc(&expression),
            PromptCommand::Unknown(name) => {
                println!("unknown command: {name} (type help)");
                Ok(())
            }
        };
        if let Err(err) = outcome {
            println!("{err:#}");
        }
    }
    Ok(())
}

/// Writes replay events as plain lines.
struct TerminalSink<W: Write> {
    out: W,
}

impl<W: Write> TerminalSink<W> {
    fn new(out: W) -> Self {
        Self { out }
    }

    fn line(&mut self, text: &str) -> Result<(), ReplayError> {
        writeln!(self.out, "{text}")?;
        self.out.flush()?;
        Ok(())
    }
}

impl<W: Write> ReplaySink for TerminalSink<W> {
    fn show_coins(&mut self, coins: &[f64]) -> Result<(), ReplayError> {
        self.line(&format!("coins: {}", join_coins(coins)))
    }

    fn log_step(&mut self, frame: &ReplayFrame) -> Result<(), ReplayError> {
        self.line(&frame.message())
    }

    fn finish(&mut self, status: ReplayStatus, summary: &str) -> Result<(), ReplayError> {
        self.line(status.message())?;
        self.line(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn no_arguments_starts_the_prompt() {
        let options = parse_cli_options(&[]).expect("parse");
        assert_eq!(options.command, Command::Interactive);
    }

    #[test]
    fn parses_coins_command_with_flags() {
        let options = parse_cli_options(&args(&[
            "coins",
            "1, 2, 3",
            "7",
            "--json",
            "--report",
            "out/report.txt",
            "--delay",
            "150",
        ]))
        .expect("parse");
        assert_eq!(
            options.command,
            Command::Coins {
                coins: "1, 2, 3".to_string(),
                threshold: "7".to_string(),
            }
        );
        assert!(options.json);
        assert_eq!(options.report_path, Some(PathBuf::from("out/report.txt")));
        assert_eq!(options.delay_ms, Some(150));
    }

    #[test]
    fn negative_numbers_stay_positional() {
        let options = parse_cli_options(&args(&["calc", "-2", "*", "3"])).expect("parse");
        assert_eq!(
            options.command,
            Command::Calc {
                expression: "-2 * 3".to_string(),
            }
        );
    }

    #[test]
    fn rejects_bad_invocations() {
        assert!(parse_cli_options(&args(&["coins", "1,2"])).is_err());
        assert!(parse_cli_options(&args(&["deal"])).is_err());
        assert!(parse_cli_options(&args(&["coins", "1", "2", "--delay", "soon"])).is_err());
        assert!(parse_cli_options(&args(&["--config"])).is_err());
    }

    #[test]
    fn replay_delay_prefers_flags_over_config() {
        let config = AppConfig::default();
        let mut options = CliOptions::default();
        assert_eq!(
            options.replay_config(&config).step_delay_ms,
            config.coin_game_step_delay_ms
        );
        options.delay_ms = Some(5);
        assert_eq!(options.replay_config(&config).step_delay_ms, 5);
        options.no_delay = true;
        assert_eq!(options.replay_config(&config).step_delay_ms, 0);
    }

    #[test]
    fn prompt_splits_threshold_from_coin_list() {
        assert_eq!(
            parse_prompt_command("coins 1, 2, 3 7"),
            PromptCommand::Coins {
                coins: "1, 2, 3".to_string(),
                threshold: "7".to_string(),
            }
        );
        assert_eq!(
            parse_prompt_command("coins 1, 2, 3"),
            PromptCommand::Coins {
                coins: "1, 2, 3".to_string(),
                threshold: String::new(),
            }
        );
        assert_eq!(
            parse_prompt_command("coins 4,5 , 6"),
            PromptCommand::Coins {
                coins: "4,5 , 6".to_string(),
                threshold: String::new(),
            }
        );
        assert_eq!(
            parse_prompt_command("calc 2 + 3 * 4"),
            PromptCommand::Calc {
                expression: "2 + 3 * 4".to_string(),
            }
        );
        assert_eq!(parse_prompt_command("   "), PromptCommand::Empty);
        assert_eq!(parse_prompt_command("q"), PromptCommand::Quit);
        assert_eq!(
            parse_prompt_command("shop"),
            PromptCommand::Unknown("shop".to_string())
        );
    }

    #[test]
    fn terminal_sink_prints_replay_lines() {
        let coins = [1.0, 2.0, 3.0, 9.0, 10.0, 12.0];
        let result = tcghub_core::compute_coin_operations(&coins, 7.0);
        let replay = build_replay(&coins, 7.0, &result);
        let mut sink = TerminalSink::new(Vec::new());
        play(&replay, &ReplayConfig { step_delay_ms: 0 }, &mut sink).expect("play");
        let output = String::from_utf8(sink.out).expect("utf8");
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(
            lines,
            vec![
                "coins: 1, 2, 3, 9, 10, 12",
                "Operation 1: Combined 1 and 2 to create 4",
                "coins: 3, 9, 10, 12, 4",
                "Operation 2: Combined 3 and 4 to create 10",
                "coins: 9, 10, 12, 10",
                "Threshold reached!",
                "Minimum operations required: 2",
            ]
        );
    }

    struct ClosedPipe;

    impl Write for ClosedPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn terminal_sink_reports_write_failures() {
        let coins = [1.0, 1.0, 1.0];
        let result = tcghub_core::compute_coin_operations(&coins, 50.0);
        let replay = build_replay(&coins, 50.0, &result);
        let mut sink = TerminalSink::new(ClosedPipe);
        let err = play(&replay, &ReplayConfig { step_delay_ms: 60_000 }, &mut sink)
            .expect_err("closed pipe");
        assert!(matches!(err, ReplayError::Io(_)));
    }

    #[test]
    fn prompt_coins_without_threshold_is_rejected() {
        let PromptCommand::Coins { coins, threshold } = parse_prompt_command("coins 1, 2, 3")
        else {
            panic!("expected coins command");
        };
        let err = CoinGameRequest::parse(&coins, &threshold).expect_err("missing threshold");
        assert_eq!(err.to_string(), "Threshold must be a number greater than 0.");
    }
}
