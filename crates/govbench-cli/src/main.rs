//! `govbench`: inspect scenario catalogs and saved benchmark results

mod commands;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use govbench_report::ReportFormat;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn cli() -> Command {
    Command::new("govbench")
        .version(govbench_core::VERSION)
        .about("Governance benchmark harness")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .global(true)
                .action(ArgAction::Count)
                .help("Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence"),
        )
        .subcommand(
            Command::new("catalog")
                .about("Load a scenario tree and list its contents")
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .value_parser(value_parser!(PathBuf))
                        .help("TOML configuration file"),
                )
                .arg(
                    Arg::new("scenarios")
                        .long("scenarios")
                        .short('s')
                        .value_parser(value_parser!(PathBuf))
                        .help("Scenario root, overriding the configuration"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(ArgAction::SetTrue)
                        .help("Output as JSON"),
                ),
        )
        .subcommand(
            Command::new("report")
                .about("Render a saved benchmark result")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Result JSON file"),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .default_value("summary")
                        .value_parser(["summary", "markdown", "json"])
                        .help("Output format"),
                ),
        )
        .subcommand(
            Command::new("check")
                .about("Verify the counting invariants of a saved benchmark result")
                .arg(
                    Arg::new("file")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                        .help("Result JSON file"),
                ),
        )
}

fn init_tracing(verbosity: u8) {
    let fallback = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

async fn dispatch(matches: &ArgMatches) -> anyhow::Result<ExitCode> {
    match matches.subcommand() {
        Some(("catalog", args)) => {
            let dir = commands::scenario_dir(
                args.get_one::<PathBuf>("config").map(PathBuf::as_path),
                args.get_one::<PathBuf>("scenarios").map(PathBuf::as_path),
            )?;
            println!("{}", commands::catalog(&dir, args.get_flag("json")).await?);
            Ok(ExitCode::SUCCESS)
        }
        Some(("report", args)) => {
            let file = required_path(args, "file")?;
            let format: ReportFormat = args
                .get_one::<String>("format")
                .map_or(Ok(ReportFormat::default()), |name| name.parse())?;
            println!("{}", commands::report(file, format)?);
            Ok(ExitCode::SUCCESS)
        }
        Some(("check", args)) => {
            let file = required_path(args, "file")?;
            match commands::check(file)? {
                Ok(result) => {
                    println!(
                        "ok: {} ({} scenarios, {} categories)",
                        file.display(),
                        result.aggregate.total_scenarios(),
                        result.categories_run.len()
                    );
                    Ok(ExitCode::SUCCESS)
                }
                Err(violation) => {
                    println!("invariant violated in {}: {violation}", file.display());
                    Ok(ExitCode::FAILURE)
                }
            }
        }
        _ => anyhow::bail!("unknown command"),
    }
}

fn required_path<'a>(args: &'a ArgMatches, name: &str) -> anyhow::Result<&'a std::path::Path> {
    args.get_one::<PathBuf>(name)
        .map(PathBuf::as_path)
        .ok_or_else(|| anyhow::anyhow!("missing argument <{name}>"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let matches = cli().get_matches();
    init_tracing(matches.get_count("verbose"));

    match dispatch(&matches).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}
