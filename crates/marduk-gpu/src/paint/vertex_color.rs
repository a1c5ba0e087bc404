use super::Color;

/// Per-vertex color in one of two encodings.
///
/// - narrow: one `u32` word holding premultiplied RGBA8 (bytes R, G, B, A in
///   memory order);
/// - wide: four `u32` words holding the bit patterns of the `f32` channels.
///
/// The encoding is chosen when the value is built and travels with it; the
/// shader side must be compiled for the same choice.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct VertexColor {
    words: [u32; 4],
    wide: bool,
}

impl VertexColor {
    #[inline]
    pub fn new(color: Color, wide: bool) -> Self {
        if wide {
            Self::wide(color)
        } else {
            Self::narrow(color)
        }
    }

    /// RGBA8 encoding. Channels outside [0, 1] are clamped.
    #[inline]
    pub fn narrow(color: Color) -> Self {
        Self {
            words: [u32::from_ne_bytes(color.to_rgba8()), 0, 0, 0],
            wide: false,
        }
    }

    /// Full `f32` encoding.
    #[inline]
    pub fn wide(color: Color) -> Self {
        Self {
            words: color.to_array().map(f32::to_bits),
            wide: true,
        }
    }

    /// Picks the narrow encoding when it is lossless for the range,
    /// otherwise wide.
    #[inline]
    pub fn fitted(color: Color) -> Self {
        Self::new(color, !color.fits_in_bytes())
    }

    #[inline]
    pub fn is_wide(&self) -> bool {
        self.wide
    }

    /// The words that get serialized: 1 when narrow, 4 when wide.
    #[inline]
    pub fn words(&self) -> &[u32] {
        if self.wide { &self.words } else { &self.words[..1] }
    }

    /// Serialized size in bytes.
    #[inline]
    pub fn byte_size(&self) -> usize {
        self.words().len() * std::mem::size_of::<u32>()
    }
}
