use clap::Parser;
use ctf_cli::commands::Commands;
use std::process::ExitCode;

/// Typography formatter for mixed CJK and Latin text
#[derive(Debug, Parser)]
#[command(name = "ctf", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command.execute() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
