

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::{ImageFormat, imageops};
use thiserror::Error;

use crate::prelude::*;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode failed: {0}")]
    Decode(#[from] image::ImageError),
    #[error("png encode failed: {0}")]
    PngEncode(#[from] png::EncodingError),
    #[error("unsupported image extension '{0}'")]
    UnsupportedExtension(String),
    #[error("no data provided")]
    NoData,
    #[error("image is empty")]
    EmptyImage,
}

/// An RGBA color with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SmartDefault)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    #[default = 255]
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::new(0, 0, 0, 255);
    pub const WHITE: Self = Self::new(255, 255, 255, 255);
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }
}

/// A CPU-side image: a flat RGBA8 pixel buffer plus its size.
/// Decoding, encoding and resampling are delegated to the image
/// and png crates; everything else operates on the buffer directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Image {
    pixels: Vec<u8>, // RGBA, row major
    size: Vector2u,
}

impl Image {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill the image with a solid color. A zero dimension clears
    /// the image instead.
    pub fn create(&mut self, width: u32, height: u32, color: Color) {
        if width > 0 && height > 0 {
            let count = (width as usize) * (height as usize);
            self.pixels = [color.r, color.g, color.b, color.a].repeat(count);
            self.size = Vector2u::new(width, height);
        } else {
            self.clear();
        }
    }

    /// Replace the buffer with a verbatim copy of `pixels` (RGBA,
    /// row major). Too-short input or a zero dimension clears the
    /// image instead.
    pub fn create_from_pixels(&mut self, width: u32, height: u32, pixels: &[u8]) {
        let len = (width as usize) * (height as usize) * 4;
        if len > 0 && pixels.len() >= len {
            self.pixels = pixels[..len].to_vec();
            self.size = Vector2u::new(width, height);
        } else {
            self.clear();
        }
    }

    pub fn clear(&mut self) {
        self.pixels = Vec::new();
        self.size = Vector2u::ZERO;
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ImageError> {
        let path = path.as_ref();
        match image::open(path) {
            Ok(decoded) => Ok(Self::from_decoded(decoded)),
            Err(e) => {
                error!("Failed to load image {}: {}", path.display(), e);
                Err(e.into())
            }
        }
    }

    pub fn load_from_memory(data: &[u8]) -> Result<Self, ImageError> {
        if data.is_empty() {
            error!("Failed to load image from memory, no data provided");
            return Err(ImageError::NoData);
        }
        match image::load_from_memory(data) {
            Ok(decoded) => Ok(Self::from_decoded(decoded)),
            Err(e) => {
                error!("Failed to load image from memory: {}", e);
                Err(e.into())
            }
        }
    }

    fn from_decoded(decoded: image::DynamicImage) -> Self {
        let rgba = decoded.into_rgba8();
        let (width, height) = rgba.dimensions();
        Self {
            pixels: rgba.into_raw(),
            size: Vector2u::new(width, height),
        }
    }

    /// Write the image to disk, picking the codec from the
    /// lower-cased file extension (png, bmp, tga, jpg/jpeg).
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageError> {
        let path = path.as_ref();
        if self.size.x == 0 || self.size.y == 0 {
            error!("Failed to save image {}: image is empty", path.display());
            return Err(ImageError::EmptyImage);
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "png" => self.save_png(path)?,
            "bmp" => self.save_rgba(path, ImageFormat::Bmp)?,
            "tga" => self.save_rgba(path, ImageFormat::Tga)?,
            // JPEG has no alpha channel, so it is dropped here
            "jpg" | "jpeg" => {
                let rgb: Vec<u8> = self
                    .pixels
                    .chunks_exact(4)
                    .flat_map(|px| [px[0], px[1], px[2]])
                    .collect();
                image::save_buffer_with_format(
                    path,
                    &rgb,
                    self.size.x,
                    self.size.y,
                    image::ExtendedColorType::Rgb8,
                    ImageFormat::Jpeg,
                )?;
            }
            _ => {
                error!(
                    "Failed to save image {}: unsupported extension",
                    path.display()
                );
                return Err(ImageError::UnsupportedExtension(extension));
            }
        }

        info!("Image saved to {}", path.display());
        Ok(())
    }

    // DISCLAIMER: This function is based on https://docs.rs/png/0.18.0/png/
    fn save_png(&self, path: &Path) -> Result<(), ImageError> {
        let file = File::create(path)?;
        let w = &mut BufWriter::new(file);
        let mut encoder = png::Encoder::new(w, self.size.x, self.size.y);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&self.pixels)?;
        Ok(())
    }

    fn save_rgba(&self, path: &Path, format: ImageFormat) -> Result<(), ImageError> {
        image::save_buffer_with_format(
            path,
            &self.pixels,
            self.size.x,
            self.size.y,
            image::ExtendedColorType::Rgba8,
            format,
        )?;
        Ok(())
    }

    pub fn size(&self) -> Vector2u {
        self.size
    }

    /// Raw RGBA bytes, row major. Empty for an empty image.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// `x` and `y` must be within `size()`.
    pub fn pixel(&self, x: u32, y: u32) -> Color {
        let i = ((x + y * self.size.x) * 4) as usize;
        Color::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    /// `x` and `y` must be within `size()`.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        let i = ((x + y * self.size.x) * 4) as usize;
        self.pixels[i] = color.r;
        self.pixels[i + 1] = color.g;
        self.pixels[i + 2] = color.b;
        self.pixels[i + 3] = color.a;
    }

    /// Rewrite the alpha of every pixel that matches `color` exactly.
    pub fn mask_from_color(&mut self, color: Color, alpha: u8) {
        for px in self.pixels.chunks_exact_mut(4) {
            if px[0] == color.r && px[1] == color.g && px[2] == color.b && px[3] == color.a {
                px[3] = alpha;
            }
        }
    }

    pub fn flip_horizontally(&mut self) {
        if self.pixels.is_empty() {
            return;
        }
        let width = self.size.x as usize;
        for row in self.pixels.chunks_exact_mut(width * 4) {
            for x in 0..width / 2 {
                let (left, right) = (x * 4, (width - 1 - x) * 4);
                for k in 0..4 {
                    row.swap(left + k, right + k);
                }
            }
        }
    }

    pub fn flip_vertically(&mut self) {
        if self.pixels.is_empty() {
            return;
        }
        let row_size = (self.size.x * 4) as usize;
        let height = self.size.y as usize;
        for y in 0..height / 2 {
            let top = y * row_size;
            let bottom = (height - 1 - y) * row_size;
            for k in 0..row_size {
                self.pixels.swap(top + k, bottom + k);
            }
        }
    }

    /// Resample to the new size with a linear filter. A zero target
    /// dimension clears the image; resizing an empty image yields a
    /// black fill of the requested size.
    pub fn resize(&mut self, new_width: u32, new_height: u32) {
        if new_width == 0 || new_height == 0 {
            self.clear();
            return;
        }
        if self.pixels.is_empty() {
            self.create(new_width, new_height, Color::BLACK);
            return;
        }

        let pixels = std::mem::take(&mut self.pixels);
        if let Some(source) =
            image::RgbaImage::from_raw(self.size.x, self.size.y, pixels)
        {
            let resized = imageops::resize(&source, new_width, new_height, imageops::FilterType::Triangle);
            self.pixels = resized.into_raw();
            self.size = Vector2u::new(new_width, new_height);
        } else {
            self.clear();
        }
    }

    pub fn resize_scaled(&mut self, width_scale: Float, height_scale: Float) {
        let new_width = (self.size.x as Float * width_scale) as u32;
        let new_height = (self.size.y as Float * height_scale) as u32;
        self.resize(new_width, new_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::Vector2u;

    #[test]
    fn create_fills_with_color() {
        let mut im = Image::new();
        im.create(2, 3, Color::rgb(10, 20, 30));
        assert_eq!(im.size(), Vector2u::new(2, 3));
        assert_eq!(im.pixels().len(), 2 * 3 * 4);
        for y in 0..3 {
            for x in 0..2 {
                assert_eq!(im.pixel(x, y), Color::rgb(10, 20, 30));
            }
        }
    }

    #[test]
    fn zero_dimension_clears() {
        let mut im = Image::new();
        im.create(4, 4, Color::WHITE);
        im.create(0, 4, Color::WHITE);
        assert_eq!(im.size(), Vector2u::ZERO);
        assert!(im.pixels().is_empty());
    }

    #[test]
    fn create_from_pixels_copies_verbatim() {
        let raw = [
            1u8, 2, 3, 4, //
            5, 6, 7, 8,
        ];
        let mut im = Image::new();
        im.create_from_pixels(2, 1, &raw);
        assert_eq!(im.pixel(0, 0), Color::new(1, 2, 3, 4));
        assert_eq!(im.pixel(1, 0), Color::new(5, 6, 7, 8));

        im.create_from_pixels(2, 2, &raw); // too short
        assert_eq!(im.size(), Vector2u::ZERO);
    }

    #[test]
    fn set_and_get_pixel() {
        let mut im = Image::new();
        im.create(2, 2, Color::BLACK);
        im.set_pixel(1, 0, Color::new(9, 8, 7, 6));
        assert_eq!(im.pixel(1, 0), Color::new(9, 8, 7, 6));
        assert_eq!(im.pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn mask_rewrites_matching_alpha_only() {
        let key = Color::rgb(255, 0, 255);
        let mut im = Image::new();
        im.create(2, 1, key);
        im.set_pixel(1, 0, Color::WHITE);
        im.mask_from_color(key, 0);
        assert_eq!(im.pixel(0, 0), Color::new(255, 0, 255, 0));
        assert_eq!(im.pixel(1, 0), Color::WHITE);
    }

    #[test]
    fn flip_horizontally_mirrors_rows() {
        let mut im = Image::new();
        im.create(2, 2, Color::BLACK);
        im.set_pixel(0, 0, Color::WHITE);
        im.set_pixel(0, 1, Color::rgb(1, 2, 3));
        im.flip_horizontally();
        assert_eq!(im.pixel(1, 0), Color::WHITE);
        assert_eq!(im.pixel(1, 1), Color::rgb(1, 2, 3));
        assert_eq!(im.pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn flip_vertically_mirrors_columns() {
        let mut im = Image::new();
        im.create(2, 2, Color::BLACK);
        im.set_pixel(0, 0, Color::WHITE);
        im.set_pixel(1, 0, Color::rgb(1, 2, 3));
        im.flip_vertically();
        assert_eq!(im.pixel(0, 1), Color::WHITE);
        assert_eq!(im.pixel(1, 1), Color::rgb(1, 2, 3));
        assert_eq!(im.pixel(0, 0), Color::BLACK);
    }

    #[test]
    fn resize_changes_dimensions() {
        let mut im = Image::new();
        im.create(2, 2, Color::rgb(100, 100, 100));
        im.resize(4, 4);
        assert_eq!(im.size(), Vector2u::new(4, 4));
        assert_eq!(im.pixel(0, 0), Color::rgb(100, 100, 100));
    }

    #[test]
    fn resize_to_zero_clears() {
        let mut im = Image::new();
        im.create(4, 4, Color::WHITE);
        im.resize(0, 2);
        assert_eq!(im.size(), Vector2u::ZERO);
    }

    #[test]
    fn resize_of_empty_image_fills_black() {
        let mut im = Image::new();
        im.resize(3, 2);
        assert_eq!(im.size(), Vector2u::new(3, 2));
        assert_eq!(im.pixel(2, 1), Color::BLACK);
    }

    #[test]
    fn resize_scaled_applies_factors() {
        let mut im = Image::new();
        im.create(4, 6, Color::WHITE);
        im.resize_scaled(0.5, 0.5);
        assert_eq!(im.size(), Vector2u::new(2, 3));
    }

    #[test]
    fn save_of_empty_image_is_an_error() {
        let im = Image::new();
        let path = std::env::temp_dir().join("nu_empty.png");
        assert!(matches!(
            im.save_to_file(&path),
            Err(ImageError::EmptyImage)
        ));
    }

    #[test]
    fn save_with_unknown_extension_is_an_error() {
        let mut im = Image::new();
        im.create(1, 1, Color::WHITE);
        let path = std::env::temp_dir().join("nu_unknown.xyz");
        assert!(matches!(
            im.save_to_file(&path),
            Err(ImageError::UnsupportedExtension(e)) if e == "xyz"
        ));
    }

    #[test]
    fn png_save_load_round_trip() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let mut im = Image::new();
        im.create(3, 2, Color::rgb(10, 200, 30));
        im.set_pixel(2, 1, Color::new(1, 2, 3, 128));

        let path = std::env::temp_dir().join("nu_roundtrip.png");
        im.save_to_file(&path).unwrap();

        let loaded = Image::load_from_file(&path).unwrap();
        assert_eq!(loaded, im);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn memory_load_round_trips_through_encoded_png() {
        let mut im = Image::new();
        im.create(2, 2, Color::rgb(50, 60, 70));

        let path = std::env::temp_dir().join("nu_memory.png");
        im.save_to_file(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        std::fs::remove_file(&path).ok();

        let loaded = Image::load_from_memory(&bytes).unwrap();
        assert_eq!(loaded, im);
        assert!(matches!(
            Image::load_from_memory(&[]),
            Err(ImageError::NoData)
        ));
    }
}
