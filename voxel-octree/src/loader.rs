use crate::{Result, VoxelError, color::intensity_to_color};
use log::{debug, warn};
use std::{fs, path::Path};

pub const TERMINATOR: char = ';';

/// Parses a pixel dump into voxel colors, one per `;`-terminated value.
///
/// Whitespace anywhere in the input is ignored. A trailing value with no
/// terminator is dropped.
pub fn parse_voxel_data(text: &str) -> Result<Vec<u32>> {
    let mut voxels = Vec::with_capacity(text.len() / 3);
    let mut token = String::new();

    for c in text.chars().filter(|c| !c.is_whitespace()) {
        if c != TERMINATOR {
            token.push(c);
            continue;
        }
        let intensity = token.parse::<u8>().map_err(|_| VoxelError::InvalidToken {
            index: voxels.len(),
            token: token.clone(),
        })?;
        voxels.push(intensity_to_color(intensity));
        token.clear();
    }

    if !token.is_empty() {
        warn!("Ignoring unterminated trailing value {token:?}");
    }
    Ok(voxels)
}

/// Reads and parses the dump at `path`
pub fn load_voxel_data(path: &Path) -> Result<Vec<u32>> {
    let text = fs::read_to_string(path).map_err(|source| VoxelError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let voxels = parse_voxel_data(&text)?;
    debug!("Loaded {} voxels from {}", voxels.len(), path.display());
    Ok(voxels)
}
