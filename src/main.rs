use clap::Parser;
use miette::Result;
use jop::cli::{Cli, Commands};
use jop::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = Printer::new();

    match cli.command {
        Commands::Import(args) => {
            jop::cli::import::run(args, &printer)?;
        }
        Commands::Export(args) => {
            jop::cli::export::run(args, &printer)?;
        }
        Commands::Inspect(args) => jop::cli::inspect::run(args, &printer)?,
        Commands::Palette(args) => jop::cli::palette::run(args, &printer)?,
        Commands::Sizes(args) => jop::cli::sizes::run(args, &printer)?,
        Commands::Completions(args) => jop::cli::completions::run(args)?,
    }

    Ok(())
}
