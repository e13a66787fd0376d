use std::env;
use std::io;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::Parser;

use tiff2movie::config::{Cli, EncoderConfig};
use tiff2movie::ffmpeg::SystemRunner;
use tiff2movie::logging::init_logging;
use tiff2movie::prompt::{AssumeDefault, Confirm, LineConfirm};
use tiff2movie::workflow::Workflow;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        // Usage errors are reported like any other failure.
        Err(err) => {
            println!("{}", err);
            return;
        }
    };
    init_logging();

    // Failures are reported on stdout and the process still exits normally.
    if let Err(err) = run(&cli) {
        println!("{:#}", err);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cwd = env::current_dir().context("Unable to determine the working directory")?;
    let config = EncoderConfig::from_cli(cli, cwd);

    let confirm: Box<dyn Confirm> = if cli.yes {
        Box::new(AssumeDefault)
    } else {
        Box::new(LineConfirm::new(io::stdin().lock(), io::stdout()))
    };

    let mut workflow = Workflow::new(&config, SystemRunner::new(&config.working_dir), confirm);
    let first = &cli.folders[0];
    let second = cli.folders.get(1).map(String::as_str);
    let report = workflow
        .run(first, second)
        .context("Conversion stopped")?;

    if let Some(joined) = report.concatenated.filter(|joined| joined.outcome.success()) {
        println!("Joined movie: {}", joined.output.display());
    }
    Ok(())
}
