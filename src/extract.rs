use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::codec::decode_mask;
use crate::document::SettingsDocument;
use crate::error::MaskError;

pub const MASK_FILE_EXTENSION: &str = "png";

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    /// Target directory; `None` writes bare file names relative to the working directory
    pub output_dir: Option<PathBuf>,
    pub dry_run: bool,
}

/// Output prefix for a settings file: its file name minus the last extension.
///
/// `a/b/settings.v2.mbi` gives `settings.v2`; a name without any dot is used
/// whole. An empty result (e.g. `.mbi`) is an error.
pub fn output_prefix(settings_path: &Path) -> Result<String, MaskError> {
    let name = settings_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let prefix = match name.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => name.as_str(),
    };

    if prefix.is_empty() {
        return Err(MaskError::EmptyPrefix {
            path: settings_path.to_path_buf(),
        });
    }

    Ok(prefix.to_string())
}

pub fn mask_file_name(prefix: &str, index: usize) -> String {
    format!("{}_mask{}.{}", prefix, index, MASK_FILE_EXTENSION)
}

/// Write every mask of `settings_path` to its own file.
///
/// `on_written` is called with each path right after it is written (or, in
/// dry-run mode, instead of writing). Files written before a failing mask are
/// left in place.
pub fn extract_masks<F>(
    settings_path: &Path,
    options: &ExtractOptions,
    mut on_written: F,
) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path),
{
    let document = SettingsDocument::load(settings_path)?;
    let prefix = output_prefix(settings_path)?;
    let masks = document.masks()?;

    if let Some(dir) = &options.output_dir {
        if !options.dry_run && !masks.is_empty() && !dir.exists() {
            fs::create_dir_all(dir).with_context(|| {
                format!("Failed to create output directory '{}'", dir.display())
            })?;
        }
    }

    let mut written = Vec::with_capacity(masks.len());
    for (index, mask) in masks.iter().enumerate() {
        let data = decode_mask(index, mask)
            .with_context(|| format!("Failed to extract from {}", settings_path.display()))?;

        let file_name = mask_file_name(&prefix, index);
        let save_path = match &options.output_dir {
            Some(dir) => dir.join(file_name),
            None => PathBuf::from(file_name),
        };

        if !options.dry_run {
            fs::write(&save_path, &data)
                .with_context(|| format!("Failed to write mask to '{}'", save_path.display()))?;
        }

        on_written(&save_path);
        written.push(save_path);
    }

    Ok(written)
}
