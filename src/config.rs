//
// config.rs
// dicom2bmp
//
// Converter configuration: input/output locations with their conventional defaults and the conversion knobs.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::{Path, PathBuf};

/// Conventional input location, relative to the working directory.
pub const DEFAULT_INPUT_DIR: &str = "./DICOM_files";
/// Conventional output location, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "./BMP_files";

/// How stored intensities are mapped onto the 0-255 display range.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum VoiPolicy {
    /// Use the file's window when present, otherwise pass through values
    /// already in range and min-max rescale the rest.
    #[default]
    Auto,
    /// Fixed window supplied by the caller.
    Window { center: f64, width: f64 },
    /// Always stretch the observed range to 0-255.
    MinMax,
    /// No VOI transform; values are only clipped.
    Identity,
}

#[derive(Debug, Clone)]
pub struct ConverterConfig {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Frame to export from multi-frame files. `None` rejects multi-frame input.
    pub frame: Option<u32>,
    pub voi: VoiPolicy,
    pub apply_modality_lut: bool,
    pub recursive: bool,
    /// Number of worker threads; 1 keeps processing strictly sequential.
    pub jobs: usize,
}

impl Default for ConverterConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            frame: None,
            voi: VoiPolicy::Auto,
            apply_modality_lut: true,
            recursive: false,
            jobs: 1,
        }
    }
}

impl ConverterConfig {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_frame(mut self, frame: Option<u32>) -> Self {
        self.frame = frame;
        self
    }

    pub fn with_voi(mut self, voi: VoiPolicy) -> Self {
        self.voi = voi;
        self
    }

    pub fn with_modality_lut(mut self, apply: bool) -> Self {
        self.apply_modality_lut = apply;
        self
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Zero is treated as one worker.
    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.jobs = jobs.max(1);
        self
    }

    pub fn input_dir(&self) -> &Path {
        &self.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
