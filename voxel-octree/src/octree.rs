//! Flat, breadth-first octree over a cube of voxels.
//!
//! Level `k` of the tree holds `8^k` nodes and starts right after level
//! `k - 1`. Within a level, every run of 8 nodes is one 2x2x2 brick of
//! cells, ordered `(0,0,0) (1,0,0) (0,1,0) (1,1,0) (0,0,1) (1,0,1) (0,1,1)
//! (1,1,1)`, and the bricks themselves follow the linear order of the
//! coarser grid. This puts the 8 children of a node next to each other, so
//! a node only needs the index of its first child.
use crate::{Result, VoxelError, color::mean_color};
use log::debug;

pub const CHILDREN: usize = 8;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Node {
    pub color: u32,
    /// Index of the first of 8 consecutive children, 0 for leaves
    pub first_child: u32,
}

impl Node {
    pub const ENCODED_LEN: usize = 8;
}

#[derive(Debug, Clone, PartialEq)]
pub struct Octree {
    nodes: Vec<Node>,
    num_voxels_side: u32,
    position: [f32; 3],
    voxel_freq: f32,
}

/// Number of subdivisions needed for a cube of `len` voxels
pub fn cube_levels(len: usize) -> Result<u32> {
    if len == 0 {
        return Err(VoxelError::Empty);
    }
    let mut levels = 0;
    let mut size = 1usize;
    while size < len {
        size = size.checked_mul(CHILDREN).ok_or(VoxelError::NotACube(len))?;
        levels += 1;
    }
    if size != len {
        return Err(VoxelError::NotACube(len));
    }
    Ok(levels)
}

/// Index of the first node of `level`
fn level_start(level: u32) -> usize {
    (0..level).map(|l| CHILDREN.pow(l)).sum()
}

/// Position of cell `(x, y, z)` of a grid with `side` cells per axis within
/// its level
fn brick_offset(x: usize, y: usize, z: usize, side: usize) -> usize {
    let half = side / 2;
    let brick = x / 2 + (y / 2) * half + (z / 2) * half * half;
    let corner = x % 2 + 2 * (y % 2) + 4 * (z % 2);
    CHILDREN * brick + corner
}

impl Octree {
    /// Builds the tree over `voxels`, which holds `N^3` colors with `N` a
    /// power of two, indexed as `x + y * N + z * N * N`.
    pub fn new(voxels: &[u32], position: [f32; 3], voxel_freq: f32) -> Result<Self> {
        let levels = cube_levels(voxels.len())?;
        let total = level_start(levels + 1);
        if u32::try_from(total).is_err() {
            return Err(VoxelError::TooLarge(voxels.len()));
        }

        let mut nodes = vec![Node::default(); total];

        for level in 0..levels {
            let side = 1usize << level;
            let start = level_start(level);
            let next_start = level_start(level + 1);
            for z in 0..side {
                for y in 0..side {
                    for x in 0..side {
                        let linear = x + y * side + z * side * side;
                        let idx = start + Self::cell_offset(x, y, z, side);
                        // Bounded by `total`, checked above
                        nodes[idx].first_child = (next_start + CHILDREN * linear) as u32;
                    }
                }
            }
        }

        let side = 1usize << levels;
        let start = level_start(levels);
        for z in 0..side {
            for y in 0..side {
                for x in 0..side {
                    let idx = start + Self::cell_offset(x, y, z, side);
                    nodes[idx].color = voxels[x + y * side + z * side * side];
                }
            }
        }

        // Children always sit after their parent
        for idx in (0..start).rev() {
            let first = nodes[idx].first_child as usize;
            let children: [u32; CHILDREN] = core::array::from_fn(|j| nodes[first + j].color);
            nodes[idx].color = mean_color(&children);
        }

        debug!(
            "Built octree with {} levels and {} nodes over {} voxels",
            levels + 1,
            nodes.len(),
            voxels.len()
        );

        Ok(Self {
            nodes,
            num_voxels_side: side as u32,
            position,
            voxel_freq,
        })
    }

    fn cell_offset(x: usize, y: usize, z: usize, side: usize) -> usize {
        if side == 1 { 0 } else { brick_offset(x, y, z, side) }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn root(&self) -> Node {
        self.nodes[0]
    }

    pub fn num_voxels_side(&self) -> u32 {
        self.num_voxels_side
    }

    pub fn position(&self) -> [f32; 3] {
        self.position
    }

    pub fn voxel_freq(&self) -> f32 {
        self.voxel_freq
    }

    /// The node array as `color, first_child` pairs of little-endian `u32`s
    pub fn to_le_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.nodes.len() * Node::ENCODED_LEN);
        for node in &self.nodes {
            bytes.extend_from_slice(&node.color.to_le_bytes());
            bytes.extend_from_slice(&node.first_child.to_le_bytes());
        }
        bytes
    }
}
