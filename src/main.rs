//
// main.rs
// dicom2bmp
//
// Binary entry point that hands off execution to the CLI layer.
//
// Thales Matheus Mendonça Santos - November 2025

use dicom2bmp::cli;

fn main() -> anyhow::Result<()> {
    cli::run()
}
