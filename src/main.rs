//! swc-command - Build and run swc CLI commands from a TOML options file.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swc_command::command::{build_command_args, build_command_with, Quoting, SPAWN_OPTIONS_KEY};
use swc_command::config::{ConfigLoader, RunConfig};
use swc_command::exec::{swc, swc_sync, Chunk, ResolveEvent};
use swc_command::is_compilation_successful;

#[derive(Parser)]
#[command(
    name = "swc-command",
    about = "Build and run swc CLI commands from typed options",
    version
)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short = 'v', long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Options file (defaults to .swc-command.toml, then the user config dir).
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the shell command string.
    Print {
        /// Escape spaces instead of wrapping values in double quotes.
        #[arg(long)]
        no_quote: bool,
    },
    /// Print the argument vector, one token per line.
    Args {
        /// Print as a JSON array instead.
        #[arg(long)]
        json: bool,
    },
    /// Run swc and report whether compilation succeeded.
    Run {
        /// Block until swc exits instead of streaming through the async runtime.
        #[arg(long)]
        sync: bool,
        /// Resolve as soon as the process exits, without waiting for output to close.
        #[arg(long)]
        exit: bool,
    },
}

fn init_tracing(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn exit_code(code: Option<i32>) -> ExitCode {
    match code.map(u8::try_from) {
        Some(Ok(code)) => ExitCode::from(code),
        _ => ExitCode::FAILURE,
    }
}

fn write_chunks(out: &mut impl Write, chunks: &[Chunk]) -> std::io::Result<()> {
    for chunk in chunks {
        out.write_all(chunk.as_bytes())?;
    }
    out.flush()
}

fn report(success: bool) {
    if success {
        tracing::info!("swc compilation succeeded");
    } else {
        tracing::warn!("swc output has no success marker");
    }
}

fn run_sync(config: &RunConfig) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let output = swc_sync(&config.exec)?;
    if let Some(err) = output.error {
        return Err(err.into());
    }
    write_chunks(&mut std::io::stdout(), std::slice::from_ref(&output.stdout))?;
    write_chunks(&mut std::io::stderr(), std::slice::from_ref(&output.stderr))?;
    report(is_compilation_successful(&*output.stdout.to_text()));
    Ok(exit_code(output.status))
}

async fn run_async(config: &RunConfig, exit: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let mut options = config.promise_options();
    if exit {
        options = options.resolve_event(ResolveEvent::Exit);
    }
    let output = swc(options)?.await?;

    let stdout = output.stdout.unwrap_or_default();
    write_chunks(&mut std::io::stdout(), &stdout)?;
    write_chunks(&mut std::io::stderr(), &output.stderr.unwrap_or_default())?;
    report(is_compilation_successful(&stdout));
    Ok(exit_code(output.exit_code))
}

async fn dispatch(cli: Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let loader = cli.config.map_or_else(ConfigLoader::new, ConfigLoader::with_path);
    let config = loader.load()?;
    let ignore = [SPAWN_OPTIONS_KEY];

    match cli.command {
        Commands::Print { no_quote } => {
            let quoting = Quoting::from_double_quote(!no_quote);
            println!("{}", build_command_with(&config.exec.command, &ignore, quoting)?);
            Ok(ExitCode::SUCCESS)
        }
        Commands::Args { json } => {
            let args = build_command_args(&config.exec.command, &ignore)?;
            if json {
                println!("{}", serde_json::to_string(&args)?);
            } else {
                for arg in args {
                    println!("{arg}");
                }
            }
            Ok(ExitCode::SUCCESS)
        }
        Commands::Run { sync: true, .. } => run_sync(&config),
        Commands::Run { sync: false, exit } => run_async(&config, exit).await,
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match dispatch(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "swc-command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
