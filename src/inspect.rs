//! Directory walk that reports the real format of every embedded mask

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::codec::decode_mask;
use crate::detect::{detect, Detection};
use crate::document::SettingsDocument;
use crate::error::MaskError;
use crate::utils::has_settings_extension;

#[derive(Debug, Clone)]
pub struct InspectOptions {
    pub extensions: Vec<String>,
    /// Abort on the first failure instead of reporting it and moving on
    pub strict: bool,
}

/// Something the inspector found, in walk order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InspectEvent {
    /// A settings document with at least one mask; emitted once, before its masks
    Document { path: PathBuf, mask_count: usize },
    Mask {
        path: PathBuf,
        index: usize,
        detection: Detection,
    },
    /// A document or mask that could not be read; `index` is set for masks
    Failed {
        path: PathBuf,
        index: Option<usize>,
        error: String,
    },
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InspectSummary {
    pub documents_scanned: usize,
    pub documents_with_masks: usize,
    pub masks_inspected: usize,
    pub failures: usize,
}

/// Walk `root` and report every mask of every settings document below it.
///
/// Entries are visited sorted by file name and symlinked directories are not
/// followed. A root that is not a directory yields nothing.
pub fn inspect_tree<F>(
    root: &Path,
    options: &InspectOptions,
    mut on_event: F,
) -> Result<InspectSummary>
where
    F: FnMut(InspectEvent),
{
    if !root.exists() {
        return Err(MaskError::NotFound {
            path: root.to_path_buf(),
        }
        .into());
    }

    let mut summary = InspectSummary::default();
    if !root.is_dir() {
        return Ok(summary);
    }

    let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if !options.strict => {
                summary.failures += 1;
                on_event(InspectEvent::Failed {
                    path: err.path().unwrap_or(root).to_path_buf(),
                    index: None,
                    error: err.to_string(),
                });
                continue;
            }
            Err(err) => return Err(err).context("Failed to read directory entry"),
        };

        let path = entry.path();
        if !path.is_file() || !has_settings_extension(path, &options.extensions) {
            continue;
        }

        summary.documents_scanned += 1;
        inspect_document(path, options, &mut summary, &mut on_event)?;
    }

    Ok(summary)
}

fn inspect_document<F>(
    path: &Path,
    options: &InspectOptions,
    summary: &mut InspectSummary,
    on_event: &mut F,
) -> Result<()>
where
    F: FnMut(InspectEvent),
{
    let loaded = SettingsDocument::load(path).and_then(|document| Ok(document.masks()?.to_vec()));

    let masks = match loaded {
        Ok(masks) => masks,
        Err(err) if !options.strict => {
            summary.failures += 1;
            on_event(InspectEvent::Failed {
                path: path.to_path_buf(),
                index: None,
                error: format!("{:#}", err),
            });
            return Ok(());
        }
        Err(err) => return Err(err),
    };

    if masks.is_empty() {
        return Ok(());
    }

    summary.documents_with_masks += 1;
    on_event(InspectEvent::Document {
        path: path.to_path_buf(),
        mask_count: masks.len(),
    });

    for (index, mask) in masks.iter().enumerate() {
        match decode_mask(index, mask) {
            Ok(data) => {
                summary.masks_inspected += 1;
                on_event(InspectEvent::Mask {
                    path: path.to_path_buf(),
                    index,
                    detection: detect(&data),
                });
            }
            Err(err) if !options.strict => {
                summary.failures += 1;
                on_event(InspectEvent::Failed {
                    path: path.to_path_buf(),
                    index: Some(index),
                    error: err.to_string(),
                });
            }
            Err(err) => {
                return Err(err).with_context(|| format!("Failed to inspect {}", path.display()))
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_mask;
    use crate::detect::tests::png_bytes;
    use crate::detect::MaskKind;
    use std::fs;

    fn options(strict: bool) -> InspectOptions {
        InspectOptions {
            extensions: vec!["mbi".to_string(), "myb".to_string()],
            strict,
        }
    }

    fn write_settings(path: &Path, masks: &[&str]) {
        let doc = serde_json::json!({
            "name": "brush",
            "image_settings": { "masks": masks },
        });
        fs::write(path, doc.to_string()).unwrap();
    }

    fn collect(root: &Path, strict: bool) -> (Result<InspectSummary>, Vec<InspectEvent>) {
        let mut events = Vec::new();
        let result = inspect_tree(root, &options(strict), |event| events.push(event));
        (result, events)
    }

    #[test]
    fn test_inspect_reports_each_mask_once_per_document() {
        let dir = tempfile::tempdir().unwrap();
        let png = encode_mask(&png_bytes(4, 2));
        let text = encode_mask(b"not an image");
        write_settings(&dir.path().join("a.mbi"), &[&png, &text]);

        let (result, events) = collect(dir.path(), false);
        let summary = result.unwrap();

        assert_eq!(summary.documents_scanned, 1);
        assert_eq!(summary.documents_with_masks, 1);
        assert_eq!(summary.masks_inspected, 2);
        assert_eq!(events.len(), 3);

        assert_eq!(
            events[0],
            InspectEvent::Document {
                path: dir.path().join("a.mbi"),
                mask_count: 2
            }
        );
        match &events[1] {
            InspectEvent::Mask {
                index, detection, ..
            } => {
                assert_eq!(*index, 0);
                assert_eq!(detection.description(), "PNG image data, 4 x 2");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        match &events[2] {
            InspectEvent::Mask {
                index, detection, ..
            } => {
                assert_eq!(*index, 1);
                assert_eq!(detection.kind, MaskKind::Text);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_inspect_skips_documents_without_masks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("plain.myb"), r#"{"name": "plain"}"#).unwrap();
        write_settings(&dir.path().join("empty.mbi"), &[]);
        fs::write(dir.path().join("notes.txt"), "{}").unwrap();

        let (result, events) = collect(dir.path(), false);
        let summary = result.unwrap();

        assert!(events.is_empty());
        assert_eq!(summary.documents_scanned, 2);
        assert_eq!(summary.documents_with_masks, 0);
    }

    #[test]
    fn test_inspect_walks_recursively_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested/deeper");
        fs::create_dir_all(&nested).unwrap();
        let mask = encode_mask(b"x");
        write_settings(&dir.path().join("b.mbi"), &[&mask]);
        write_settings(&dir.path().join("a.myb"), &[&mask]);
        write_settings(&nested.join("c.mbi"), &[&mask]);

        let (result, events) = collect(dir.path(), false);
        result.unwrap();

        let documents: Vec<PathBuf> = events
            .into_iter()
            .filter_map(|event| match event {
                InspectEvent::Document { path, .. } => Some(path),
                _ => None,
            })
            .collect();
        assert_eq!(
            documents,
            vec![
                dir.path().join("a.myb"),
                dir.path().join("b.mbi"),
                nested.join("c.mbi"),
            ]
        );
    }

    #[test]
    fn test_inspect_continues_past_failures() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a_broken.mbi"), "{oops").unwrap();
        write_settings(&dir.path().join("b.mbi"), &["@@@", &encode_mask(b"ok")]);

        let (result, events) = collect(dir.path(), false);
        let summary = result.unwrap();

        assert_eq!(summary.failures, 2);
        assert_eq!(summary.masks_inspected, 1);
        assert!(matches!(
            &events[0],
            InspectEvent::Failed { index: None, .. }
        ));
        assert!(matches!(&events[1], InspectEvent::Document { .. }));
        assert!(matches!(
            &events[2],
            InspectEvent::Failed { index: Some(0), .. }
        ));
        assert!(matches!(&events[3], InspectEvent::Mask { index: 1, .. }));
    }

    #[test]
    fn test_inspect_strict_aborts_on_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        write_settings(&dir.path().join("a.mbi"), &["@@@"]);

        let (result, events) = collect(dir.path(), true);
        let err = result.unwrap_err();

        assert!(matches!(
            err.downcast_ref::<MaskError>(),
            Some(MaskError::Decode { index: 0, .. })
        ));
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_inspect_strict_aborts_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.mbi"), "[").unwrap();

        let (result, _) = collect(dir.path(), true);
        assert!(matches!(
            result.unwrap_err().downcast_ref::<MaskError>(),
            Some(MaskError::Parse { .. })
        ));
    }

    #[test]
    fn test_inspect_file_root_scans_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let document = dir.path().join("a.mbi");
        write_settings(&document, &[&encode_mask(b"x")]);

        let (result, events) = collect(&document, false);
        let summary = result.unwrap();

        assert!(events.is_empty());
        assert_eq!(summary.documents_scanned, 0);
    }

    #[test]
    fn test_inspect_missing_root() {
        let dir = tempfile::tempdir().unwrap();
        let (result, _) = collect(&dir.path().join("missing"), false);
        assert!(matches!(
            result.unwrap_err().downcast_ref::<MaskError>(),
            Some(MaskError::NotFound { .. })
        ));
    }
}
