use clap::Parser;
use log::{LevelFilter, error, info};
use log4rs::{
    append::console::{ConsoleAppender, Target},
    config::{Appender, Config as LogConfig, Logger, Root},
    encode::pattern::PatternEncoder,
};
use std::{fs, path::PathBuf};
use voxel_octree::{Octree, color::unpack_rgba, load_voxel_data};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    #[clap(help = "Pixel dump to load as a voxel cube", required = true)]
    dump: PathBuf,

    #[clap(
        long,
        num_args = 3,
        value_names = ["X", "Y", "Z"],
        allow_hyphen_values = true,
        action = clap::ArgAction::Set,
        default_values_t = [0.0, 0.0, 0.0]
    )]
    /// World position of the volume, a repeated flag replaces earlier ones
    position: Vec<f32>,

    #[clap(long, default_value = "1.0")]
    /// Number of voxels per world unit
    voxel_freq: f32,

    #[clap(long, short)]
    /// Write the node array to this file as little-endian u32 pairs
    output: Option<PathBuf>,

    #[clap(long, short, action(clap::ArgAction::Count))]
    /// Increase the log verbosity
    verbose: u8,
}

const APP_NAME: &str = "voxel_stats";

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
        .logger(Logger::builder().build("voxel_octree", log_level))
        .build(root)?;

    log4rs::init_config(log_config)?;
    if args.verbose > 0 {
        log_panics::init();
    }

    let position = [args.position[0], args.position[1], args.position[2]];

    info!(
        "Volume at ({}, {}, {}), {} voxels per unit",
        position[0], position[1], position[2], args.voxel_freq
    );

    let tree = load_voxel_data(&args.dump).and_then(|voxels| {
        info!("Loaded {} voxels from {}", voxels.len(), args.dump.display());
        Octree::new(&voxels, position, args.voxel_freq)
    });
    let tree = match tree {
        Ok(t) => t,
        Err(e) => {
            error!("{e}");
            return Err(e.into());
        }
    };

    let [r, g, b, a] = unpack_rgba(tree.root().color);
    info!(
        "Side length {}, {} nodes, root color ({r}, {g}, {b}, {a})",
        tree.num_voxels_side(),
        tree.num_nodes()
    );

    if let Some(path) = args.output {
        let bytes = tree.to_le_bytes();
        if let Err(e) = fs::write(&path, &bytes) {
            error!("Couldn't write nodes to {}: {e}", path.display());
            return Err(e.into());
        }
        info!("Wrote {} bytes to {}", bytes.len(), path.display());
    }

    Ok(())
}
