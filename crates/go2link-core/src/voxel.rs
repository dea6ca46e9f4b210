//! Voxel occupancy decoding (LiDAR frames).
//!
//! The robot ships its voxel map as an LZ4 block holding a bit-packed
//! occupancy grid: one bit per voxel, MSB first, 8 voxels per byte, 16 bytes
//! per row (128 voxels along x), 128 rows per z slice (2048 bytes).
//!
//! Decoding is a pure function of its inputs, so independent frames may be
//! decoded concurrently.

use serde::Deserialize;
use serde_json::Value;

use crate::error::{Go2Error, Result};

/// Bytes per z slice of the occupancy grid.
pub const SLICE_BYTES: usize = 2048;
/// Bytes per y row within a slice.
pub const ROW_BYTES: usize = 16;

/// World-space points, in grid scan order.
pub type PointCloud = Vec<[f32; 3]>;

/// Voxel metadata carried in the JSON half of a binary frame (`data`).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct VoxelFrameMeta {
    pub origin: [f32; 3],
    pub resolution: f32,
    pub src_size: u32,
}

impl VoxelFrameMeta {
    /// Read the metadata from a frame's `data` object. `None` when the frame
    /// is not a voxel frame.
    pub fn from_data(data: &Value) -> Option<Self> {
        let obj = data.as_object()?;
        if !(obj.contains_key("origin") && obj.contains_key("resolution") && obj.contains_key("src_size")) {
            return None;
        }
        Self::deserialize(data).ok()
    }

    /// Reject frames announcing a decompressed grid larger than `max` bytes.
    /// `src_size` sizes the decompression buffer, so it is checked first.
    pub fn ensure_within(&self, max: usize) -> Result<()> {
        let size = self.src_size as usize;
        if size > max {
            return Err(Go2Error::Decode(format!(
                "voxel src_size {size} exceeds limit {max}"
            )));
        }
        Ok(())
    }
}

/// Decoder seam. The native implementation below is the default; alternative
/// (e.g. mesh-producing) decoders plug in behind the same interface.
pub trait VoxelDecoder: Send + Sync {
    fn name(&self) -> &'static str;
    fn decode(&self, compressed: &[u8], meta: &VoxelFrameMeta) -> Result<PointCloud>;
}

/// LZ4 + bit scan, no external state.
#[derive(Debug, Default, Clone, Copy)]
pub struct NativeVoxelDecoder;

impl VoxelDecoder for NativeVoxelDecoder {
    fn name(&self) -> &'static str {
        "native"
    }

    fn decode(&self, compressed: &[u8], meta: &VoxelFrameMeta) -> Result<PointCloud> {
        decode(compressed, meta)
    }
}

/// Decompress and scan a voxel payload.
pub fn decode(compressed: &[u8], meta: &VoxelFrameMeta) -> Result<PointCloud> {
    let grid = decompress(compressed, meta.src_size as usize)?;
    Ok(bits_to_points(&grid, meta))
}

/// LZ4 block decompression into exactly `src_size` bytes.
pub fn decompress(compressed: &[u8], src_size: usize) -> Result<Vec<u8>> {
    let out = lz4_flex::block::decompress(compressed, src_size)
        .map_err(|e| Go2Error::Decode(format!("lz4: {e}")))?;
    if out.len() != src_size {
        return Err(Go2Error::DecodeSizeMismatch {
            expected: src_size,
            actual: out.len(),
        });
    }
    Ok(out)
}

/// Emit one point per set bit.
pub fn bits_to_points(grid: &[u8], meta: &VoxelFrameMeta) -> PointCloud {
    let [ox, oy, oz] = meta.origin;
    let res = meta.resolution;
    let mut points = Vec::new();

    for (n, &byte) in grid.iter().enumerate() {
        if byte == 0 {
            continue;
        }
        let z = (n / SLICE_BYTES) as f32;
        let slice = n % SLICE_BYTES;
        let y = (slice / ROW_BYTES) as f32;
        let x_base = (slice % ROW_BYTES) * 8;

        for bit in 0..8 {
            if byte & (0x80 >> bit) != 0 {
                let x = (x_base + bit) as f32;
                points.push([x * res + ox, y * res + oy, z * res + oz]);
            }
        }
    }
    points
}
