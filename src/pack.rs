use anyhow::{Context, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::codec::encode_mask;
use crate::document::SettingsDocument;
use crate::error::MaskError;

/// Read and base64-encode each image, preserving the given order
pub fn encode_images(images: &[PathBuf]) -> Result<Vec<String>> {
    images
        .iter()
        .map(|path| -> Result<String> {
            let data = match fs::read(path) {
                Ok(data) => data,
                Err(err) if err.kind() == io::ErrorKind::NotFound => {
                    return Err(MaskError::NotFound { path: path.clone() }.into());
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("Failed to read image: {}", path.display()))
                }
            };
            Ok(encode_mask(&data))
        })
        .collect()
}

/// Embed `images` as the masks of `settings_path` and return the serialized
/// document. The settings file itself is never modified.
pub fn pack_masks(settings_path: &Path, images: &[PathBuf]) -> Result<String> {
    let mut document = SettingsDocument::load(settings_path)?;
    let masks = encode_images(images)?;
    document.replace_masks(masks);
    document.to_pretty_string()
}
