pub use anyhow::{Result as R, anyhow};
use affix_lib::{Options, dprintln, run};
use clap::Parser;
use log::LevelFilter;
use std::io::Write;
use std::path::PathBuf;

/// Print the sample rate of AIFF and AIFF-C files, and optionally reset it
#[derive(Parser, Debug)]
#[command(name = "affix", version)]
#[command(about = "Inspect or reset the sample rate of AIFF/AIFF-C files", long_about = None)]
struct Cli {
    /// Reset the sample rate of every file to RATE
    #[arg(short = 's', long = "sample-rate", value_name = "RATE")]
    sample_rate: Option<u32>,

    /// With -s, find the sample rate field but leave the file untouched
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Also print channels, frames, bits, form type and compression name
    #[arg(short, long)]
    verbose: bool,

    /// Trace chunk parsing on stderr
    #[arg(short, long)]
    debug: bool,

    #[arg(required = true, value_name = "FILE")]
    files: Vec<PathBuf>,
}

fn init_logging(debug: bool) {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() -> R<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);

    let options = Options {
        rewrite: cli.sample_rate,
        dry_run: cli.dry_run,
        verbose: cli.verbose,
    };
    dprintln!("{:?}", options);

    let stdout = std::io::stdout();
    let summary = run(&cli.files, &options, &mut stdout.lock())?;
    dprintln!(
        "{} processed, {} with problems",
        summary.processed,
        summary.failed
    );

    if summary.failed > 0 {
        return Err(anyhow!(
            "{} of {} file(s) had problems",
            summary.failed,
            cli.files.len()
        ));
    }
    Ok(())
}
