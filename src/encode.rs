//
// encode.rs
// dicom2bmp
//
// Writes display-ready rasters to disk as bitmaps through the `image` crate.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::Path;

use image::{GrayImage, ImageFormat, RgbImage};
use ndarray::Array2;

use crate::error::ConvertError;

/// 8-bit raster ready to be written.
#[derive(Debug, Clone)]
pub enum DisplayImage {
    Gray(GrayImage),
    Rgb(RgbImage),
}

impl DisplayImage {
    /// Build a grayscale raster from a `rows x columns` array.
    pub fn from_gray_array(pixels: &Array2<u8>) -> Result<Self, ConvertError> {
        let (rows, columns) = pixels.dim();
        let raw: Vec<u8> = pixels.iter().copied().collect();
        GrayImage::from_raw(columns as u32, rows as u32, raw)
            .map(DisplayImage::Gray)
            .ok_or_else(|| ConvertError::Shape {
                rows: rows as u32,
                columns: columns as u32,
                reason: "buffer length mismatch".to_string(),
            })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        match self {
            DisplayImage::Gray(img) => img.dimensions(),
            DisplayImage::Rgb(img) => img.dimensions(),
        }
    }
}

/// Encoding seam: anything able to persist a raster at a path.
pub trait ImageSink: Send + Sync {
    /// File extension of the produced files, without the dot.
    fn extension(&self) -> &'static str;
    fn encode(&self, image: &DisplayImage, path: &Path) -> Result<(), ConvertError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BmpEncoder;

impl ImageSink for BmpEncoder {
    fn extension(&self) -> &'static str {
        "bmp"
    }

    fn encode(&self, image: &DisplayImage, path: &Path) -> Result<(), ConvertError> {
        let result = match image {
            DisplayImage::Gray(img) => img.save_with_format(path, ImageFormat::Bmp),
            DisplayImage::Rgb(img) => img.save_with_format(path, ImageFormat::Bmp),
        };
        result.map_err(|source| ConvertError::Encode {
            path: path.to_path_buf(),
            source,
        })
    }
}
