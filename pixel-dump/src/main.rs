use clap::Parser;
use log::{LevelFilter, error, info};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use pixel_dump::{DumpConfig, ScanOrder, config::MAX_CHANNEL};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(help = "Directory of images to dump", required = true)]
    directory: PathBuf,

    #[clap(long, short)]
    /// TOML file to load the dump settings from
    config: Option<PathBuf>,

    #[clap(long, short)]
    /// Values strictly below this are written as 0
    threshold: Option<u8>,

    #[clap(long, value_parser = clap::value_parser!(u8).range(0..=i64::from(MAX_CHANNEL)))]
    /// Channel to read from each pixel (0 = red/luma, 3 = alpha)
    channel: Option<u8>,

    #[clap(long)]
    /// Iterate rows in the outer loop instead of columns
    row_major: bool,

    #[clap(long, short)]
    /// Name of the output file created in the scanned directory
    output_name: Option<String>,

    #[clap(long)]
    /// Skip entries that can't be decoded as images instead of failing
    skip_invalid: bool,

    #[clap(long)]
    /// Process entries in file name order
    sort: bool,

    #[clap(long, short, action(clap::ArgAction::Count))]
    /// Increase the log verbosity
    verbose: u8,
}

const APP_NAME: &str = "pixel_dump";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    let console = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("[{d} {h({l:5})} {M}] {m}{n}")))
        .build();

    let root = Root::builder().appender("console").build(LevelFilter::Error);

    let log_config = LogConfig::builder()
        .appender(Appender::builder().build("console", Box::new(console)))
        .logger(Logger::builder().build(APP_NAME, log_level))
        .build(root)?;

    log4rs::init_config(log_config)?;
    if args.verbose > 0 {
        log_panics::init();
    }

    let mut config = match args.config {
        Some(ref path) => {
            info!("Loading settings from {}", path.display());
            DumpConfig::new_from_file(path)?
        }
        None => DumpConfig::default(),
    };

    if let Some(threshold) = args.threshold {
        config.threshold = threshold;
    }
    if let Some(channel) = args.channel {
        config.channel = channel;
    }
    if args.row_major {
        config.order = ScanOrder::RowMajor;
    }
    if let Some(name) = args.output_name {
        config.output_name = name;
    }
    config.skip_invalid |= args.skip_invalid;
    config.sort_entries |= args.sort;
    config.validate()?;

    if !args.directory.is_dir() {
        error!("{} is not a directory", args.directory.display());
        return Err(format!("{} is not a directory", args.directory.display()).into());
    }

    info!(
        "Threshold {}, channel {}, {} order",
        config.threshold, config.channel, config.order
    );

    match pixel_dump::dump_directory(&args.directory, &config) {
        Ok(summary) => {
            info!(
                "Wrote {} values from {} images to {}",
                summary.values,
                summary.images,
                summary.output.display()
            );
            if !summary.skipped.is_empty() {
                info!("Skipped {} entries", summary.skipped.len());
            }
            Ok(())
        }
        Err(e) => {
            error!("{e}");
            Err(e.into())
        }
    }
}
