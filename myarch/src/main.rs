mod cli;
mod commands;
mod error;
mod util;

use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

use cli::{CliOpts, Commands};

fn main() -> anyhow::Result<()> {
    let opts = CliOpts::from_iter(wild::args_os());

    // RUST_LOG wins; -v only changes the fallback
    let fallback = if opts.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match opts.cmd {
        Commands::Create(args) => commands::create(args)?,
        Commands::Extract(args) => commands::extract(args, opts.verbose)?,
        Commands::List(args) => commands::list(args)?,
        Commands::Validate(args) => commands::validate(args)?,
        Commands::Info(args) => commands::info(args)?,
    };

    Ok(())
}
