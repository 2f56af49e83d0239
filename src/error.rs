//
// error.rs
// dicom2bmp
//
// Per-file failure taxonomy. These errors are caught by the batch loop and never abort a run.
//
// Thales Matheus Mendonça Santos - November 2025

use std::path::PathBuf;

use thiserror::Error;

/// Why a single input file could not be converted.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The file could not be parsed as DICOM at all.
    #[error("not a readable DICOM file: {0}")]
    Open(#[from] dicom::object::ReadError),

    #[error("{0} is currently not supported")]
    UnsupportedSopClass(&'static str),

    #[error("no pixel data element present")]
    MissingPixelData,

    #[error("failed to decode pixel data: {0}")]
    Decode(String),

    #[error("multi-frame image with {0} frames needs an explicit frame selection")]
    MultiFrame(u32),

    #[error("requested frame {requested} but file has {available} frame(s)")]
    FrameOutOfRange { requested: u32, available: u32 },

    #[error("pixel buffer does not match {rows}x{columns}: {reason}")]
    Shape {
        rows: u32,
        columns: u32,
        reason: String,
    },

    #[error("failed to encode bitmap {path:?}: {source}")]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// An earlier input in the batch already claimed the same output file.
    #[error("output {output:?} is already written for {claimed_by:?}")]
    OutputCollision { output: PathBuf, claimed_by: PathBuf },

    #[error("unreadable directory entry: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<dicom_pixeldata::Error> for ConvertError {
    fn from(e: dicom_pixeldata::Error) -> Self {
        ConvertError::Decode(e.to_string())
    }
}
