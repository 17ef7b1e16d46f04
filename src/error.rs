//! Error taxonomy shared by the three mask tools.
//!
//! Library functions return `anyhow::Result`; when a failure belongs to one of
//! the categories below the root cause is a [`MaskError`], so callers can
//! `downcast_ref` it to decide whether a failure is fatal.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    /// Settings document, image or search root does not exist
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// Settings document is not a JSON object
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    /// `image_settings` or `masks` has an unexpected JSON type
    #[error("unexpected layout in {}: {message}", path.display())]
    Schema { path: PathBuf, message: String },

    /// Mask entry is not valid base64
    #[error("mask {index} could not be decoded: {message}")]
    Decode { index: usize, message: String },

    /// Extractor derived an empty output prefix
    #[error("cannot derive an output prefix from {}", path.display())]
    EmptyPrefix { path: PathBuf },
}

impl MaskError {
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }
}
