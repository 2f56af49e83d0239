//
// normalize.rs
// dicom2bmp
//
// Maps stored grayscale values onto the 8-bit display range: modality LUT, VOI windowing, fallback rescale and MONOCHROME1 inversion.
//
// Thales Matheus Mendonça Santos - November 2025

use ndarray::Array2;

use crate::config::VoiPolicy;
use crate::decode::PixelMetadata;

const DISPLAY_MAX: f64 = 255.0;

/// Window center/width pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Window {
    pub center: f64,
    pub width: f64,
}

/// Curve used to map the window onto the display range, per (0028,1056).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiFunction {
    #[default]
    Linear,
    LinearExact,
    Sigmoid,
}

impl VoiFunction {
    /// Unknown or absent values fall back to LINEAR.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_uppercase()).as_deref() {
            Some("LINEAR_EXACT") => VoiFunction::LinearExact,
            Some("SIGMOID") => VoiFunction::Sigmoid,
            _ => VoiFunction::Linear,
        }
    }
}

/// Convert stored pixel values into display-ready 8-bit intensities.
pub fn to_display(
    stored: &Array2<f64>,
    metadata: &PixelMetadata,
    policy: VoiPolicy,
    apply_modality_lut: bool,
) -> Array2<u8> {
    let values = if apply_modality_lut {
        modality_lut(stored, metadata.rescale_slope, metadata.rescale_intercept)
    } else {
        stored.clone()
    };

    let windowed = match policy {
        VoiPolicy::Auto => match metadata.window.filter(|w| w.width > 0.0) {
            Some(window) => apply_window(&values, window, metadata.voi_function),
            None if within_display_range(&values) => values,
            None => min_max(&values),
        },
        VoiPolicy::Window { center, width } if width > 0.0 => {
            apply_window(&values, Window { center, width }, VoiFunction::Linear)
        }
        VoiPolicy::Window { .. } | VoiPolicy::MinMax => min_max(&values),
        VoiPolicy::Identity => values,
    };

    let invert = metadata.is_monochrome1();
    windowed.mapv(|v| {
        let clipped = if v.is_nan() { 0.0 } else { v.clamp(0.0, DISPLAY_MAX) };
        let shown = if invert { DISPLAY_MAX - clipped } else { clipped };
        shown.round() as u8
    })
}

pub fn modality_lut(values: &Array2<f64>, slope: f64, intercept: f64) -> Array2<f64> {
    values.mapv(|v| v * slope + intercept)
}

pub fn apply_window(values: &Array2<f64>, window: Window, function: VoiFunction) -> Array2<f64> {
    values.mapv(|x| window_value(x, window, function))
}

fn window_value(x: f64, Window { center, width }: Window, function: VoiFunction) -> f64 {
    match function {
        VoiFunction::Linear => {
            let c = center - 0.5;
            let w = width - 1.0;
            if w <= 0.0 {
                // Sub-unit width degenerates to a threshold at the center.
                return if x <= c { 0.0 } else { DISPLAY_MAX };
            }
            if x <= c - w / 2.0 {
                0.0
            } else if x > c + w / 2.0 {
                DISPLAY_MAX
            } else {
                ((x - c) / w + 0.5) * DISPLAY_MAX
            }
        }
        VoiFunction::LinearExact => {
            if x <= center - width / 2.0 {
                0.0
            } else if x > center + width / 2.0 {
                DISPLAY_MAX
            } else {
                ((x - center) / width + 0.5) * DISPLAY_MAX
            }
        }
        VoiFunction::Sigmoid => DISPLAY_MAX / (1.0 + (-4.0 * (x - center) / width).exp()),
    }
}

/// Stretch the observed range to 0-255. Constant images map to 0.
pub fn min_max(values: &Array2<f64>) -> Array2<f64> {
    if values.is_empty() {
        return values.clone();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if !range.is_finite() || range <= f64::EPSILON {
        return Array2::zeros(values.raw_dim());
    }
    values.mapv(|v| (v - min) / range * DISPLAY_MAX)
}

fn within_display_range(values: &Array2<f64>) -> bool {
    values.iter().all(|&v| (0.0..=DISPLAY_MAX).contains(&v))
}
