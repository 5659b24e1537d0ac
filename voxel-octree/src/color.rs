/// Packs `[r, g, b, a]` as `r << 24 | g << 16 | b << 8 | a`
pub const fn pack_rgba(rgba: [u8; 4]) -> u32 {
    u32::from_be_bytes(rgba)
}

pub const fn unpack_rgba(color: u32) -> [u8; 4] {
    color.to_be_bytes()
}

/// Color of a voxel with the given intensity. Empty voxels are fully
/// transparent, all others are opaque: alpha is 0 or 255, never the
/// intensity itself, so a dimmed voxel keeps full coverage in the node blob.
pub const fn intensity_to_color(intensity: u8) -> u32 {
    let alpha = if intensity == 0 { 0 } else { u8::MAX };
    pack_rgba([intensity, intensity, intensity, alpha])
}

/// Per-channel mean of `colors`, truncated
pub fn mean_color(colors: &[u32]) -> u32 {
    if colors.is_empty() {
        return 0;
    }
    let mut sums = [0u32; 4];
    for color in colors {
        for (sum, channel) in sums.iter_mut().zip(unpack_rgba(*color)) {
            *sum += u32::from(channel);
        }
    }
    let count = colors.len() as u32;
    // The mean of u8 values always fits in a u8
    pack_rgba(sums.map(|sum| (sum / count) as u8))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pack_layout() {
        assert_eq!(pack_rgba([0x12, 0x34, 0x56, 0x78]), 0x1234_5678);
        assert_eq!(unpack_rgba(0x1234_5678), [0x12, 0x34, 0x56, 0x78]);
        assert_eq!(pack_rgba([0, 0, 0, 255]), 0xFF);
    }

    #[test]
    fn test_intensity_to_color() {
        assert_eq!(intensity_to_color(0), 0);
        assert_eq!(intensity_to_color(50), pack_rgba([50, 50, 50, 255]));
        assert_eq!(intensity_to_color(255), u32::MAX);
    }

    #[test]
    fn test_mean_color() {
        let colors = [pack_rgba([10, 0, 255, 255]), pack_rgba([13, 0, 255, 0])];
        assert_eq!(mean_color(&colors), pack_rgba([11, 0, 255, 127]));
        assert_eq!(mean_color(&[]), 0);
        assert_eq!(mean_color(&[u32::MAX; 8]), u32::MAX);
    }
}
