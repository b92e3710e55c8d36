use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::debug;

mod generate;
mod interactive;
mod table;

/// Generate passwords from letters, numbers and symbols.
///
/// Without a subcommand, this behaves like `pswd generate`.
#[derive(Parser)]
#[command(name = "pswd", version, args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
    #[command(flatten)]
    generate: GenerateArgs,
}

#[derive(clap::Subcommand)]
enum Command {
    /// Generate passwords from the selected character types.
    ///
    /// With no type flags, the types come from the request file, or letters only.
    Generate(GenerateArgs),
    /// Choose the length and character types through prompts, then generate until you are
    /// happy with the result.
    Interactive,
}

#[derive(clap::Args)]
pub(crate) struct GenerateArgs {
    /// Password length.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(6..=80))]
    length: Option<u8>,
    /// Include letters.
    #[arg(short, long)]
    alpha: bool,
    /// Include numbers.
    #[arg(short, long)]
    numeric: bool,
    /// Include symbols.
    #[arg(short, long)]
    symbols: bool,
    /// How many passwords to generate; more than one are shown as a table.
    #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    count: u16,
    /// Copy the password to the clipboard instead of printing it.
    #[arg(long)]
    copy: bool,
    /// Print the result as JSON.
    #[arg(long, conflicts_with = "copy")]
    json: bool,
    /// Read the length and types from a YAML file. Flags given on the command line win.
    #[arg(long)]
    request: Option<PathBuf>,
}

fn run() -> Result<(), ProgError> {
    let args = Args::parse();

    match args.command {
        Some(Command::Generate(args)) => generate::generate(args)?,
        Some(Command::Interactive) => interactive::run_interactive()?,
        None => generate::generate(args.generate)?,
    }

    Ok(())
}

fn main() {
    env_logger::init();
    match run() {
        Ok(()) => debug!("done"),
        Err(ProgError::Other(err)) => {
            eprintln!("Error: {err:?}");
            process::exit(1);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum ProgError {
    #[error("Prompt cancelled; exiting.")]
    PromptCancelled,
    #[error("--copy only works with a single password, but --count was {0}.")]
    CopyNeedsSinglePassword(u16),
    #[error("{0}")]
    Generate(pswd::GenerateError),
    #[error("Bad request: {0}")]
    Request(pswd::RequestError),
    #[error(transparent)]
    Other(anyhow::Error),
}

impl From<anyhow::Error> for ProgError {
    fn from(err: anyhow::Error) -> ProgError {
        ProgError::Other(err)
    }
}

impl From<pswd::GenerateError> for ProgError {
    fn from(err: pswd::GenerateError) -> ProgError {
        ProgError::Generate(err)
    }
}

impl From<pswd::RequestError> for ProgError {
    fn from(err: pswd::RequestError) -> ProgError {
        ProgError::Request(err)
    }
}
