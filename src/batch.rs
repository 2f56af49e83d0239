//
// batch.rs
// dicom2bmp
//
// Walks the input directory and converts every file, isolating per-file failures and collecting a report.
//
// Thales Matheus Mendonça Santos - November 2025

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rayon::prelude::*;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::config::ConverterConfig;
use crate::decode::{DecodedImage, DicomDecoder, PixelSource};
use crate::encode::{BmpEncoder, DisplayImage, ImageSink};
use crate::error::ConvertError;
use crate::models::{BatchReport, ConvertedFile, FailedFile};
use crate::normalize;

/// Convert a directory with the DICOM decoder and the BMP encoder.
pub fn convert_directory(config: &ConverterConfig) -> Result<BatchReport> {
    let decoder = DicomDecoder::new(config.frame);
    Converter::new(config.clone(), decoder, BmpEncoder).run()
}

/// Files found under the input directory, plus entries that could not be read.
#[derive(Debug, Default)]
pub struct InputListing {
    pub files: Vec<PathBuf>,
    pub unreadable: Vec<(PathBuf, ConvertError)>,
}

/// Candidate input files in sorted order. No filename pattern is enforced.
///
/// Only a failure on the input directory itself is fatal; broken entries below it
/// (dangling links, unreadable sub-folders) are returned in `unreadable`.
pub fn list_input_files(config: &ConverterConfig) -> Result<InputListing> {
    let dir = config.input_dir();
    if !dir.is_dir() {
        bail!("Input directory {:?} does not exist or is not a directory", dir);
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut listing = InputListing::default();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(max_depth)
        .follow_links(true)
        .sort_by_file_name()
    {
        match entry {
            Ok(entry) if entry.file_type().is_file() => listing.files.push(entry.into_path()),
            Ok(_) => {}
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| format!("Failed to read input directory {:?}", dir));
            }
            Err(e) => {
                let path = e.path().unwrap_or(dir).to_path_buf();
                listing.unreadable.push((path, ConvertError::from(e)));
            }
        }
    }
    Ok(listing)
}

/// Output location for `input`: `<output_dir>/<relative subdir>/<stem>.<extension>`.
pub fn output_path_for(config: &ConverterConfig, input: &Path, extension: &str) -> PathBuf {
    let mut name = input
        .file_stem()
        .or_else(|| input.file_name())
        .map(|s| s.to_os_string())
        .unwrap_or_else(|| OsString::from("image"));
    name.push(".");
    name.push(extension);

    let subdir = input
        .strip_prefix(config.input_dir())
        .ok()
        .and_then(Path::parent)
        .unwrap_or_else(|| Path::new(""));

    config.output_dir().join(subdir).join(name)
}

/// Batch driver, generic over the decoding and encoding backends.
pub struct Converter<S, K> {
    config: ConverterConfig,
    source: S,
    sink: K,
}

impl<S: PixelSource, K: ImageSink> Converter<S, K> {
    pub fn new(config: ConverterConfig, source: S, sink: K) -> Self {
        Self {
            config,
            source,
            sink,
        }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Decode, normalize and write a single file to its conventional output path.
    pub fn convert_file(&self, input: &Path) -> Result<ConvertedFile, ConvertError> {
        let output = output_path_for(&self.config, input, self.sink.extension());
        self.convert_to(input, output)
    }

    /// Pair every input with its output path. A later input whose output is already
    /// claimed by an earlier one (same stem, e.g. `a` and `a.dcm`) is refused.
    fn plan_outputs(
        &self,
        files: Vec<PathBuf>,
    ) -> (Vec<(PathBuf, PathBuf)>, Vec<(PathBuf, ConvertError)>) {
        let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
        let mut planned = Vec::with_capacity(files.len());
        let mut refused = Vec::new();
        for input in files {
            let output = output_path_for(&self.config, &input, self.sink.extension());
            match claimed.get(&output) {
                Some(first) => {
                    let collision = ConvertError::OutputCollision {
                        output,
                        claimed_by: first.clone(),
                    };
                    refused.push((input, collision));
                }
                None => {
                    claimed.insert(output.clone(), input.clone());
                    planned.push((input, output));
                }
            }
        }
        (planned, refused)
    }

    fn convert_to(&self, input: &Path, output: PathBuf) -> Result<ConvertedFile, ConvertError> {
        let image = match self.source.decode(input)? {
            DecodedImage::Gray { pixels, metadata } => {
                let display = normalize::to_display(
                    &pixels,
                    &metadata,
                    self.config.voi,
                    self.config.apply_modality_lut,
                );
                DisplayImage::from_gray_array(&display)?
            }
            DecodedImage::Rgb(rgb) => DisplayImage::Rgb(rgb),
        };

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent).map_err(|source| ConvertError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        self.sink.encode(&image, &output)?;

        let (width, height) = image.dimensions();
        debug!(?input, ?output, width, height, "bitmap written");
        Ok(ConvertedFile {
            source: input.to_path_buf(),
            output,
            width,
            height,
        })
    }

    /// Convert every candidate file. Only environment-level failures are returned as errors.
    pub fn run(&self) -> Result<BatchReport> {
        let listing = list_input_files(&self.config)?;
        let output_dir = self.config.output_dir();
        fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", output_dir))?;

        info!(
            count = listing.files.len(),
            input = ?self.config.input_dir(),
            output = ?output_dir,
            "converting files"
        );

        let (planned, refused) = self.plan_outputs(listing.files);
        let convert = |(input, output): &(PathBuf, PathBuf)| {
            (input.clone(), self.convert_to(input, output.clone()))
        };
        let converted: Vec<_> = if self.config.jobs > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.config.jobs)
                .build()
                .context("Failed to start worker pool")?;
            pool.install(|| planned.par_iter().map(convert).collect())
        } else {
            planned.iter().map(convert).collect()
        };
        let outcomes = listing
            .unreadable
            .into_iter()
            .chain(refused)
            .map(|(source, e)| (source, Err(e)))
            .chain(converted);

        let mut report = BatchReport {
            input_dir: self.config.input_dir().to_path_buf(),
            output_dir: output_dir.to_path_buf(),
            ..BatchReport::default()
        };
        for (source, outcome) in outcomes {
            match outcome {
                Ok(converted) => report.converted.push(converted),
                Err(e) => {
                    warn!(?source, error = %e, "skipping file");
                    report.failed.push(FailedFile {
                        source,
                        reason: e.to_string(),
                    });
                }
            }
        }

        info!(
            converted = report.converted.len(),
            failed = report.failed.len(),
            "conversion finished"
        );
        Ok(report)
    }
}
