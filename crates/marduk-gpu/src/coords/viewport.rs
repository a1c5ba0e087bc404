/// Native viewport transform: origin and size in framebuffer pixels plus the
/// depth range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub origin_x: f32,
    pub origin_y: f32,
    pub width: f32,
    pub height: f32,
    pub znear: f32,
    pub zfar: f32,
}

impl Viewport {
    /// Full-depth viewport covering `width` x `height` from the origin.
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { origin_x: 0.0, origin_y: 0.0, width, height, znear: 0.0, zfar: 1.0 }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0
            && self.height > 0.0
            && self.width.is_finite()
            && self.height.is_finite()
            && (0.0..=1.0).contains(&self.znear)
            && (0.0..=1.0).contains(&self.zfar)
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}
