use std::{io, path::PathBuf};
use thiserror::Error;

pub mod color;
pub mod loader;
pub mod octree;

pub use loader::{load_voxel_data, parse_voxel_data};
pub use octree::{Node, Octree};

#[derive(Debug, Error)]
pub enum VoxelError {
    #[error("Couldn't read voxel data from {path:?}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Value {index} ({token:?}) is not an integer between 0 and 255")]
    InvalidToken { index: usize, token: String },
    #[error("No voxels to build a tree from")]
    Empty,
    #[error("{0} voxels can't be arranged as a cube with a power of two side")]
    NotACube(usize),
    #[error("{0} voxels need more nodes than a u32 can index")]
    TooLarge(usize),
}

pub type Result<T> = std::result::Result<T, VoxelError>;
