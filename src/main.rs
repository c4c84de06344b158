use clap::Parser;
use miette::Result;
use xstitch::cli::{Cli, Commands};
use xstitch::output::Printer;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let printer = if cli.quiet {
        Printer::quiet()
    } else {
        Printer::new()
    };

    match cli.command {
        Commands::Prep(args) => xstitch::cli::prep::run(args, &printer)?,
        Commands::Chart(args) => xstitch::cli::chart::run(args, &printer)?,
        Commands::Palette(args) => xstitch::cli::palette::run(args, &printer)?,
        Commands::Completions(args) => xstitch::cli::completions::run(args)?,
    }

    Ok(())
}
