/// Linear premultiplied RGBA color.
///
/// Invariant:
/// - `rgb` components are expected to be multiplied by `a` (premultiplied alpha).
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32, // premultiplied
    pub g: f32, // premultiplied
    pub b: f32, // premultiplied
    pub a: f32,
}

impl Color {
    #[inline]
    pub const fn transparent() -> Self {
        Self { r: 0.0, g: 0.0, b: 0.0, a: 0.0 }
    }

    /// Creates a premultiplied color from premultiplied components.
    #[inline]
    pub const fn from_premul(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// True when every channel survives quantization to 8 bits, i.e. lies in
    /// [0, 1]. Colors outside that range (extended range, HDR) need the wide
    /// vertex encoding.
    #[inline]
    pub fn fits_in_bytes(self) -> bool {
        [self.r, self.g, self.b, self.a]
            .iter()
            .all(|c| (0.0..=1.0).contains(c))
    }

    /// Quantizes to premultiplied RGBA8, rounding to nearest.
    ///
    /// Out-of-range channels are clamped.
    #[inline]
    pub fn to_rgba8(self) -> [u8; 4] {
        #[inline]
        fn q(c: f32) -> u8 {
            // NaN clamps to 0 through the saturating cast.
            (c.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
        }
        [q(self.r), q(self.g), q(self.b), q(self.a)]
    }

    /// Channels as `[r, g, b, a]`.
    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
