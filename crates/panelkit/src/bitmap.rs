//! Rendered widget snapshots.

use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::WidgetResult;
use crate::geometry::Size;

/// An RGBA8 snapshot of a widget.
///
/// Pixels are stored row-major, top row first, four bytes per pixel. The
/// dimensions equal the widget's displayed size when it was rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Bitmap {
    image: RgbaImage,
}

impl Bitmap {
    /// A transparent bitmap of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
        }
    }

    pub fn from_image(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn size(&self) -> Size {
        Size::new(self.width(), self.height())
    }

    /// RGBA components of one pixel, or `None` outside the bitmap.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|Rgba(p)| *p)
    }

    /// The raw RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Write the bitmap as a PNG file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> WidgetResult<()> {
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }
}
