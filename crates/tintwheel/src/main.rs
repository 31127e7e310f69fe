use clap::Parser;
use tintwheel::{logging, run, Cli};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::setup(cli.verbose)?;
    let output = run(&cli)?;
    print!("{}", output);
    Ok(())
}
