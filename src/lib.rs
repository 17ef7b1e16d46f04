// Library exports shared by the mask-inspect, mask-extract and mask-pack binaries
pub mod cli;
pub mod codec;
pub mod config_file;
pub mod detect;
pub mod document;
pub mod error;
pub mod extract;
pub mod inspect;
pub mod json_output;
pub mod pack;
pub mod report;
pub mod utils;

// Re-export commonly used types
pub use detect::{Detection, MaskKind};
pub use document::SettingsDocument;
pub use error::MaskError;
pub use extract::{extract_masks, output_prefix, ExtractOptions};
pub use inspect::{inspect_tree, InspectEvent, InspectOptions, InspectSummary};
pub use json_output::JsonMessage;
pub use pack::pack_masks;
