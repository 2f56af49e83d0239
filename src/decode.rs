//
// decode.rs
// dicom2bmp
//
// Reads a DICOM file into a pixel buffer plus the metadata needed to normalize it for display.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::Path;

use dicom::object::open_file;
use dicom_pixeldata::{ConvertOptions, ModalityLutOption, PixelDecoder, VoiLutOption};
use image::RgbImage;
use ndarray::Array2;
use tracing::debug;

use crate::dicom_access::{self as tags, ElementAccess};
use crate::error::ConvertError;
use crate::normalize::{VoiFunction, Window};

/// SOP classes that carry no convertible image.
const UNSUPPORTED_SOP_CLASSES: &[(&str, &str)] = &[
    ("1.2.840.10008.5.1.4.1.1.104.1", "Encapsulated PDF Storage"),
    ("1.2.840.10008.5.1.4.1.1.88.59", "Key Object Selection Document"),
];

/// Attributes that drive intensity normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct PixelMetadata {
    pub rescale_slope: f64,
    pub rescale_intercept: f64,
    pub window: Option<Window>,
    pub voi_function: VoiFunction,
    pub photometric_interpretation: String,
}

impl PixelMetadata {
    pub fn read(obj: &impl ElementAccess) -> Self {
        let window = match (
            obj.element_f64(tags::WINDOW_CENTER),
            obj.element_f64(tags::WINDOW_WIDTH),
        ) {
            (Some(center), Some(width)) => Some(Window { center, width }),
            _ => None,
        };

        PixelMetadata {
            rescale_slope: obj.element_f64(tags::RESCALE_SLOPE).unwrap_or(1.0),
            rescale_intercept: obj.element_f64(tags::RESCALE_INTERCEPT).unwrap_or(0.0),
            window,
            voi_function: VoiFunction::parse(obj.element_str(tags::VOI_LUT_FUNCTION).as_deref()),
            photometric_interpretation: obj
                .element_str(tags::PHOTOMETRIC_INTERPRETATION)
                .unwrap_or_else(|| "MONOCHROME2".to_string()),
        }
    }

    pub fn is_monochrome1(&self) -> bool {
        self.photometric_interpretation == "MONOCHROME1"
    }

    pub fn is_color(&self) -> bool {
        !self.photometric_interpretation.starts_with("MONOCHROME")
    }
}

/// One decoded frame, owned by the conversion of a single file.
#[derive(Debug, Clone)]
pub enum DecodedImage {
    /// Stored values of a single-sample image, `rows x columns`.
    Gray {
        pixels: Array2<f64>,
        metadata: PixelMetadata,
    },
    /// Colour images are already display-ready once decoded.
    Rgb(RgbImage),
}

/// Decoding seam: anything able to turn a path into a pixel buffer.
pub trait PixelSource: Send + Sync {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ConvertError>;
}

/// Decoder backed by `dicom-object` and `dicom-pixeldata`.
#[derive(Debug, Clone, Default)]
pub struct DicomDecoder {
    frame: Option<u32>,
}

impl DicomDecoder {
    pub fn new(frame: Option<u32>) -> Self {
        Self { frame }
    }

    fn select_frame(&self, available: u32) -> Result<u32, ConvertError> {
        match self.frame {
            Some(requested) if requested >= available => Err(ConvertError::FrameOutOfRange {
                requested,
                available,
            }),
            Some(requested) => Ok(requested),
            None if available <= 1 => Ok(0),
            None => Err(ConvertError::MultiFrame(available)),
        }
    }
}

impl PixelSource for DicomDecoder {
    fn decode(&self, path: &Path) -> Result<DecodedImage, ConvertError> {
        let obj = open_file(path)?;

        if let Some(uid) = obj.sop_class_uid() {
            if let Some((_, name)) = UNSUPPORTED_SOP_CLASSES.iter().find(|(u, _)| *u == uid) {
                return Err(ConvertError::UnsupportedSopClass(*name));
            }
        }
        if !obj.has_element(tags::PIXEL_DATA) {
            return Err(ConvertError::MissingPixelData);
        }

        let metadata = PixelMetadata::read(&obj);
        let decoded = obj.decode_pixel_data()?;
        let frame = self.select_frame(decoded.number_of_frames())?;
        let rows = decoded.rows();
        let columns = decoded.columns();
        debug!(
            ?path,
            rows,
            columns,
            frame,
            photometric = %metadata.photometric_interpretation,
            "decoded pixel data"
        );

        if decoded.samples_per_pixel() > 1 || metadata.is_color() {
            let options = ConvertOptions::new().force_8bit();
            let image = decoded.to_dynamic_image_with_options(frame, &options)?;
            return Ok(DecodedImage::Rgb(image.to_rgb8()));
        }

        // Raw stored values; rescale and windowing are applied by `normalize`.
        let options = ConvertOptions::new()
            .with_modality_lut(ModalityLutOption::None)
            .with_voi_lut(VoiLutOption::Identity);
        let values = decoded.to_vec_with_options::<f64>(&options)?;

        let frame_len = rows as usize * columns as usize;
        let start = frame as usize * frame_len;
        let shape_error = |reason: String| ConvertError::Shape {
            rows,
            columns,
            reason,
        };
        let frame_values = values.get(start..start + frame_len).ok_or_else(|| {
            shape_error(format!(
                "{} samples decoded, frame {} needs {}",
                values.len(),
                frame,
                start + frame_len
            ))
        })?;
        let pixels = Array2::from_shape_vec((rows as usize, columns as usize), frame_values.to_vec())
            .map_err(|e| shape_error(e.to_string()))?;

        Ok(DecodedImage::Gray { pixels, metadata })
    }
}
