//! JSON lines output for the inspector
//!
//! When --json is enabled, every inspection event is emitted as one JSON
//! object per line on stdout, suppressing all other output.

use serde::{Deserialize, Serialize};

use crate::inspect::{InspectEvent, InspectSummary};

#[derive(Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum JsonMessage {
    /// Settings document containing masks
    Document { path: String, masks: usize },
    /// One decoded mask
    Mask {
        path: String,
        index: usize,
        format: String,
        description: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        width: Option<u32>,
        #[serde(skip_serializing_if = "Option::is_none")]
        height: Option<u32>,
        bytes: usize,
    },
    /// Document or mask that could not be read
    Failed {
        path: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        index: Option<usize>,
        error: String,
    },
    /// Walk summary
    Summary {
        documents: usize,
        with_masks: usize,
        masks: usize,
        failed: usize,
        duration_secs: f64,
    },
}

impl JsonMessage {
    /// Emit JSON message to stdout
    pub fn emit(&self) {
        if let Ok(json) = serde_json::to_string(self) {
            println!("{}", json);
        }
    }

    pub fn summary(summary: &InspectSummary, duration_secs: f64) -> Self {
        Self::Summary {
            documents: summary.documents_scanned,
            with_masks: summary.documents_with_masks,
            masks: summary.masks_inspected,
            failed: summary.failures,
            duration_secs,
        }
    }
}

impl From<&InspectEvent> for JsonMessage {
    fn from(event: &InspectEvent) -> Self {
        match event {
            InspectEvent::Document { path, mask_count } => Self::Document {
                path: path.display().to_string(),
                masks: *mask_count,
            },
            InspectEvent::Mask {
                path,
                index,
                detection,
            } => Self::Mask {
                path: path.display().to_string(),
                index: *index,
                format: detection.kind.name(),
                description: detection.description(),
                width: detection.dimensions.map(|(w, _)| w),
                height: detection.dimensions.map(|(_, h)| h),
                bytes: detection.size,
            },
            InspectEvent::Failed { path, index, error } => Self::Failed {
                path: path.display().to_string(),
                index: *index,
                error: error.clone(),
            },
        }
    }
}
