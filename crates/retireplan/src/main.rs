use clap::Parser;
use retireplan::{Args, init_logging, run};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let output = run(&args)?;
    println!("{output}");

    tracing::debug!("done");
    Ok(())
}
