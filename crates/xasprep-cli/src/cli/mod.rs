mod commands;
mod helpers;

use clap::Parser;
use std::path::PathBuf;
use xasprep_core::domain::XasPrepError;

pub fn run_from_env() -> i32 {
    let args: Vec<String> = std::env::args().skip(1).collect();

    match run(args) {
        Ok(code) => code,
        Err(error) => {
            let planner_error = error.as_xasprep_error();
            eprintln!("{}", planner_error.diagnostic_line());
            if let Some(summary_line) = planner_error.fatal_exit_line() {
                eprintln!("{}", summary_line);
            }
            planner_error.exit_code()
        }
    }
}

pub fn run<I, S>(args: I) -> Result<i32, CliError>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let full_args = std::iter::once("xasprep".to_string())
        .chain(args.into_iter().map(Into::into))
        .collect::<Vec<_>>();
    parse_and_dispatch(full_args)
}

fn parse_and_dispatch(args: Vec<String>) -> Result<i32, CliError> {
    match Cli::try_parse_from(&args) {
        Ok(cli) => {
            helpers::init_tracing(cli.global.verbose);
            dispatch_parsed(cli.global, cli.command)
        }
        Err(err) => match err.kind() {
            clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion => {
                print!("{}", err);
                Ok(0)
            }
            _ => Err(CliError::Usage(err.to_string())),
        },
    }
}

#[derive(Parser)]
#[command(
    name = "xasprep",
    version,
    about = "XAS sample and ion-chamber fill-gas planner"
)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(clap::Args)]
pub(crate) struct GlobalArgs {
    /// Planner config JSON (target absorption, scan point limit, display precision)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log solver decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(clap::Subcommand)]
enum CliCommand {
    /// Split a pellet mass between sample and diluent for a target edge-step
    Mix(commands::MixArgs),
    /// Search for the edge-step whose mass split reaches the target absorption
    Suggest(commands::SuggestArgs),
    /// Classify transmission and fluorescence suitability
    Classify(commands::ClassifyArgs),
    /// Edit an ion-chamber fill-gas mixture
    Gas(commands::GasArgs),
    /// Validate an energy scan range
    Range(commands::RangeArgs),
}

fn dispatch_parsed(global: GlobalArgs, command: CliCommand) -> Result<i32, CliError> {
    let context = helpers::load_context(&global)?;
    tracing::debug!(config = ?context.config, json = context.json, "resolved planner context");
    match command {
        CliCommand::Mix(args) => commands::run_mix_command(&context, args),
        CliCommand::Suggest(args) => commands::run_suggest_command(&context, args),
        CliCommand::Classify(args) => commands::run_classify_command(&context, args),
        CliCommand::Gas(args) => commands::run_gas_command(&context, args),
        CliCommand::Range(args) => commands::run_range_command(&context, args),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("{0}")]
    Usage(String),
    #[error("{0}")]
    Compute(XasPrepError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<XasPrepError> for CliError {
    fn from(error: XasPrepError) -> Self {
        Self::Compute(error)
    }
}

impl CliError {
    fn as_xasprep_error(&self) -> XasPrepError {
        match self {
            Self::Usage(message) => XasPrepError::input_validation("INPUT.CLI_USAGE", message.clone()),
            Self::Compute(error) => error.clone(),
            Self::Internal(error) => XasPrepError::internal("SYS.CLI", format!("{error:#}")),
        }
    }
}
