use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use memorylane_core::{ConflictPolicy, LogFacade, Logger, Mode, Options, Transfer};

const DATE_FORMAT_HELP: &str = "\
Date format for organizing files.
Directives:
  %Y - Year with 4 digits (e.g., 2021)
  %y - Year with 2 digits (e.g., 21)
  %m - Month in numbers (01-12)
  %B - Full month name (e.g., April)
  %d - Day of the month (01-31)
Examples:
  '%Y/%B/%d' -> '2021/April/12'
  '%y/%m/%d' -> '21/04/12'
  '%Y/%m'    -> '2021/04'
  '%d/%m/%y' -> '12/04/21'";

#[derive(Parser, Debug)]
#[command(name = "memorylane", version, about = "Organize photos and videos by date")]
struct Cli {
    /// Directory containing the photos and videos
    #[arg(short, long)]
    input: PathBuf,

    /// Directory to store organized files
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Date format for organizing files
    #[arg(long, default_value = memorylane_core::DEFAULT_DATE_FORMAT, long_help = DATE_FORMAT_HELP)]
    date_format: String,

    /// Move files instead of copying them
    #[arg(long = "move")]
    move_files: bool,

    /// Report the date of each photo and video without touching anything
    #[arg(long, conflicts_with = "validate_dir")]
    check_date: bool,

    /// Validate that an existing folder follows the date format
    #[arg(long)]
    validate_dir: bool,

    /// What to do when the destination file already exists
    #[arg(long, value_enum, default_value_t = ConflictPolicy::Overwrite)]
    on_conflict: ConflictPolicy,

    /// MediaInfo executable used to read video dates
    #[arg(long, default_value = "mediainfo")]
    mediainfo: PathBuf,

    /// Also print which source each date came from
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn options(&self) -> Options {
        let mode = if self.check_date {
            Mode::Check
        } else if self.validate_dir {
            Mode::Validate
        } else {
            Mode::Organize
        };
        Options {
            input: self.input.clone(),
            output: self.output.clone(),
            date_format: self.date_format.clone(),
            mode,
            transfer: if self.move_files {
                Transfer::Move
            } else {
                Transfer::Copy
            },
            on_conflict: self.on_conflict,
            mediainfo: self.mediainfo.clone(),
        }
    }
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format(|buf, record| writeln!(buf, "{}", record.args()))
        .init();
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(1);
        }
    };
    init_logging(cli.verbose);
    let logger = LogFacade;

    match memorylane_core::run(&cli.options(), &logger) {
        Ok(summary) => {
            logger.info(&format!("\n\n✅✅ Process completed successfully ({}) ✅✅", summary));
            ExitCode::SUCCESS
        }
        Err(e) => {
            logger.error(&format!("❌ {:#}", e));
            ExitCode::from(1)
        }
    }
}
