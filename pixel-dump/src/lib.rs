use image::{DynamicImage, ImageError, ImageReader, RgbaImage};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::{
    fs,
    io::{self, BufWriter, Cursor, Write},
    path::{Path, PathBuf},
};
use thiserror::Error;

pub mod config;

pub use config::{ConfigError, DumpConfig, ScanOrder};

pub const SEPARATOR: u8 = b';';

#[derive(Debug, Error)]
pub enum DumpError {
    #[error("Couldn't read directory {path:?}: {source}")]
    ReadDir { path: PathBuf, source: io::Error },
    #[error("Couldn't open image at {path:?}: {source}")]
    Open { path: PathBuf, source: ImageError },
    #[error("Couldn't decode image data: {0}")]
    Decode(#[from] ImageError),
    #[error("Couldn't write to {path:?}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Invalid dump settings: {0}")]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, DumpError>;

/// Outcome of a directory dump
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DumpSummary {
    pub output: PathBuf,
    pub images: usize,
    pub values: u64,
    pub skipped: Vec<PathBuf>,
}

/// The rendered text of a single image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub values: u64,
    pub data: Vec<u8>,
}

/// Values strictly below `threshold` become 0, everything else passes through.
pub const fn threshold_value(value: u8, threshold: u8) -> u8 {
    if value < threshold { 0 } else { value }
}

/// Writes one `value;` token per pixel of `img` to `writer`, returning the
/// number of tokens written. An invalid `config` is reported as
/// `ErrorKind::InvalidInput` before anything is written.
pub fn write_image_values<W: Write>(
    img: &DynamicImage,
    config: &DumpConfig,
    writer: &mut W,
) -> io::Result<u64> {
    config
        .validate()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
    let rgba = img.to_rgba8();
    write_rgba_values(&rgba, config, writer)
}

fn write_rgba_values<W: Write>(
    rgba: &RgbaImage,
    config: &DumpConfig,
    writer: &mut W,
) -> io::Result<u64> {
    let (width, height) = rgba.dimensions();
    let channel = usize::from(config.channel);
    let mut write_pixel = |x: u32, y: u32| -> io::Result<()> {
        let value = threshold_value(rgba.get_pixel(x, y).0[channel], config.threshold);
        write!(writer, "{value}")?;
        writer.write_all(&[SEPARATOR])
    };

    match config.order {
        ScanOrder::ColumnMajor => {
            for x in 0..width {
                for y in 0..height {
                    write_pixel(x, y)?;
                }
            }
        }
        ScanOrder::RowMajor => {
            for y in 0..height {
                for x in 0..width {
                    write_pixel(x, y)?;
                }
            }
        }
    }

    Ok(u64::from(width) * u64::from(height))
}

/// Renders `img` into an in-memory segment
pub fn render_image(img: &DynamicImage, config: &DumpConfig) -> Result<Segment> {
    config.validate()?;
    let rgba = img.to_rgba8();
    // Two to four bytes per token
    let mut data = Vec::with_capacity(rgba.width() as usize * rgba.height() as usize * 3);
    let values = write_rgba_values(&rgba, config, &mut data)
        .expect("writing to a Vec can't fail");
    Ok(Segment { values, data })
}

/// Process raw encoded image data, guessing the format from its contents
pub fn dump_raw(input: &[u8], config: &DumpConfig) -> Result<String> {
    config.validate()?;
    let img = ImageReader::new(Cursor::new(input))
        .with_guessed_format()
        .map_err(ImageError::IoError)?
        .decode()?;
    let segment = render_image(&img, config)?;
    Ok(String::from_utf8_lossy(&segment.data).into_owned())
}

/// Opens the image at `path` and renders it
pub fn dump_image_file(path: &Path, config: &DumpConfig) -> Result<Segment> {
    let img = image::open(path).map_err(|source| DumpError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        "Decoded {} ({}x{}, {:?})",
        path.display(),
        img.width(),
        img.height(),
        img.color()
    );
    render_image(&img, config)
}

/// Lists the entries of `dir` that will be dumped. The output file is never
/// listed, so a directory can be dumped again after a previous run.
pub fn list_entries(dir: &Path, config: &DumpConfig) -> Result<Vec<PathBuf>> {
    let read_dir_err = |source| DumpError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let entry = entry.map_err(read_dir_err)?;
        if entry.file_name() == config.output_name.as_str() {
            debug!("Not reading output file {}", entry.path().display());
            continue;
        }
        entries.push(entry.path());
    }

    if config.sort_entries {
        entries.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    }
    Ok(entries)
}

/// Dumps every image in `dir` into `dir/<output_name>`.
///
/// Images are decoded in parallel in batches, but segments are written in
/// listing order with no separator between one image and the next.
pub fn dump_directory(dir: &Path, config: &DumpConfig) -> Result<DumpSummary> {
    config.validate()?;
    let entries = list_entries(dir, config)?;
    let output = dir.join(&config.output_name);
    info!(
        "Dumping {} entries from {} to {}",
        entries.len(),
        dir.display(),
        output.display()
    );

    let write_err = |source| DumpError::Write {
        path: output.clone(),
        source,
    };
    let file = fs::File::create(&output).map_err(write_err)?;
    let mut writer = BufWriter::new(file);

    let mut summary = DumpSummary {
        output: output.clone(),
        ..Default::default()
    };

    let batch_size = rayon::current_num_threads().max(1);
    for batch in entries.chunks(batch_size) {
        let segments: Vec<Result<Segment>> = batch
            .par_iter()
            .map(|path| dump_image_file(path, config))
            .collect();

        for (path, segment) in batch.iter().zip(segments) {
            match segment {
                Ok(segment) => {
                    writer.write_all(&segment.data).map_err(write_err)?;
                    summary.images += 1;
                    summary.values += segment.values;
                    info!("Completed: {}", path.display());
                }
                Err(e) if config.skip_invalid => {
                    warn!("{e}. Skipping.");
                    summary.skipped.push(path.clone());
                }
                Err(e) => return Err(e),
            }
        }
    }

    writer.flush().map_err(write_err)?;
    Ok(summary)
}
