//! Background picture under the strokes.

use crate::renderer::{RenderResult, RendererError};
use image::RgbaImage;

/// Decoded background image, drawn at the surface origin.
#[derive(Debug, Clone)]
pub struct Background {
    image: RgbaImage,
}

impl Background {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode any format the `image` crate was built with.
    pub fn from_bytes(bytes: &[u8]) -> RenderResult<Self> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| RendererError::Decode(e.to_string()))?;
        Ok(Self::new(decoded.to_rgba8()))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba};
    use std::io::Cursor;

    #[test]
    fn test_decode_png() {
        let img = RgbaImage::from_pixel(3, 2, Rgba([10, 20, 30, 255]));
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png).unwrap();

        let bg = Background::from_bytes(&bytes).unwrap();
        assert_eq!((bg.width(), bg.height()), (3, 2));
        assert_eq!(bg.image().get_pixel(2, 1), &Rgba([10, 20, 30, 255]));
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(
            Background::from_bytes(b"not an image"),
            Err(RendererError::Decode(_))
        ));
    }
}
