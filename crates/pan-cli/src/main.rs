use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod formatters;
use formatters::FormatMode;

#[derive(Parser)]
#[command(name = "pan-reader")]
#[command(about = "Read the card number, expiry date and network from a contactless payment card")]
#[command(version)]
struct Args {
    /// Reader to use (default: first reader found)
    #[arg(short, long, global = true)]
    reader: Option<String>,

    /// Output format mode
    #[arg(short, long, value_enum, default_value_t = FormatMode::Raw, global = true)]
    format: FormatMode,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Read card number, expiry date and network (default)
    Read,
    /// Read the contactless card UID
    Uid,
    /// List available card readers
    Readers,
}

fn main() -> ExitCode {
    // Set RUST_LOG=debug for per-application logs, RUST_LOG=trace for every record read
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let reader = args.reader.as_deref();

    match args.command.unwrap_or(Command::Read) {
        Command::Read => commands::read::cmd_read(reader, args.format),
        Command::Uid => commands::uid::cmd_uid(reader, args.format),
        Command::Readers => commands::readers::cmd_readers(),
    }
}
