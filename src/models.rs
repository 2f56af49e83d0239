//
// models.rs
// dicom2bmp
//
// Serializable outcome of a conversion run.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// A bitmap written for one input file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConvertedFile {
    pub source: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// An input that was skipped, with the reason shown to the user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FailedFile {
    pub source: PathBuf,
    pub reason: String,
}

/// Aggregated results, in input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
    pub converted: Vec<ConvertedFile>,
    pub failed: Vec<FailedFile>,
}

impl BatchReport {
    pub fn total(&self) -> usize {
        self.converted.len() + self.failed.len()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed.is_empty()
    }
}
