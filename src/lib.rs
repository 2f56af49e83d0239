//
// lib.rs
// dicom2bmp
//
// Exposes the converter modules and re-exports the CLI entry point for both binary and library consumers.
//
// Thales Matheus Mendonça Santos - November 2025

// Decode -> normalize -> encode, driven per file by `batch`.
pub mod batch;
pub mod cli;
pub mod config;
pub mod decode;
pub mod dicom_access;
pub mod encode;
pub mod error;
pub mod models;
pub mod normalize;

pub use batch::{convert_directory, Converter};
pub use cli::{run as run_cli, Cli};
pub use config::{ConverterConfig, VoiPolicy};
pub use error::ConvertError;
