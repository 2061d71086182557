#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextureTarget {
    #[default]
    Texture2D,
    CubeMap,
}

/// Cube map faces in upload order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PositiveX,
    NegativeX,
    PositiveY,
    NegativeY,
    PositiveZ,
    NegativeZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PositiveX,
        CubeFace::NegativeX,
        CubeFace::PositiveY,
        CubeFace::NegativeY,
        CubeFace::PositiveZ,
        CubeFace::NegativeZ,
    ];
}

/// Where an image upload lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageTarget {
    Texture2D,
    CubeFace(CubeFace),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
    Rgb8,
    Rgba8,
}

impl PixelFormat {
    pub fn from_channels(channels: u8) -> Option<Self> {
        match channels {
            3 => Some(PixelFormat::Rgb8),
            4 => Some(PixelFormat::Rgba8),
            _ => None,
        }
    }

    pub fn bytes_per_pixel(&self) -> u8 {
        match self {
            PixelFormat::Rgb8 => 3,
            PixelFormat::Rgba8 => 4,
        }
    }
}

/// Decoded image in host memory. Moved, never cloned.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TextureCpu {
    pub width: u32,
    pub height: u32,
    /// Bytes per pixel (3 or 4).
    pub channels: u8,
    pub pixels: Vec<u8>,
}

impl TextureCpu {
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            channels,
            pixels,
        }
    }

    pub fn empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.pixels.is_empty()
    }

    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }

    pub fn format(&self) -> Option<PixelFormat> {
        PixelFormat::from_channels(self.channels)
    }

    /// Same dimensions and pixel size as `other`.
    pub fn matches(&self, other: &TextureCpu) -> bool {
        self.width == other.width && self.height == other.height && self.channels == other.channels
    }

    /// Releases the pixel buffer; dimensions stay readable.
    pub fn free_pixels(&mut self) {
        self.pixels = Vec::new();
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

/// Device-side texture id and its binding target.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TextureGpu {
    pub id: u32,
    pub target: TextureTarget,
}

impl TextureGpu {
    pub fn is_zeroed(&self) -> bool {
        self.id == 0
    }

    pub fn take(&mut self) -> Self {
        std::mem::take(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_predicate() {
        assert!(TextureCpu::default().empty());
        assert!(TextureCpu::new(0, 4, 4, vec![0; 16]).empty());
        assert!(TextureCpu::new(2, 2, 4, vec![]).empty());
        assert!(!TextureCpu::new(2, 2, 4, vec![0; 16]).empty());
    }

    #[test]
    fn free_pixels_keeps_dimensions() {
        let mut texture = TextureCpu::new(2, 2, 3, vec![0; 12]);
        texture.free_pixels();
        assert!(texture.empty());
        assert_eq!((texture.width, texture.height), (2, 2));
    }

    #[test]
    fn pixel_formats() {
        assert_eq!(PixelFormat::from_channels(3), Some(PixelFormat::Rgb8));
        assert_eq!(PixelFormat::from_channels(2), None);
        assert_eq!(PixelFormat::Rgba8.bytes_per_pixel(), 4);
    }
}
