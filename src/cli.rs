use clap::error::ErrorKind;
use clap::Parser;
use std::path::PathBuf;

use crate::utils::parse_extension_list;

pub const DEFAULT_EXTENSIONS: &str = "mbi,myb";

#[derive(Parser, Debug)]
#[command(
    name = "mask-inspect",
    version,
    about = "Report the real file type of every mask embedded in .mbi/.myb settings files",
    long_about = "
Walks a directory tree, opens every settings document (.mbi / .myb), decodes each
base64 mask found in image_settings.masks and reports what the payload actually is.

Documents that fail to parse and masks that fail to decode are reported as warnings
and skipped; use --strict to stop at the first failure instead.

Example Usage:
  mask-inspect ~/brushes
  mask-inspect ~/brushes --report
  mask-inspect ~/brushes --json > masks.jsonl"
)]
pub struct InspectArgs {
    /// Directory tree to search for settings documents
    #[arg(value_name = "SEARCH_PATH")]
    pub search_path: PathBuf,

    /// Comma-separated list of settings file extensions
    #[arg(long = "extensions", default_value = DEFAULT_EXTENSIONS, value_name = "LIST")]
    pub extensions_str: String,

    /// Abort on the first malformed document or undecodable mask
    #[arg(long = "strict")]
    pub strict: bool,

    /// Emit one JSON object per line instead of human-readable output
    #[arg(long = "json", conflicts_with = "report")]
    pub json: bool,

    /// Print a per-document table of mask formats at the end
    #[arg(long = "report")]
    pub report: bool,

    /// JSON config file with default option values
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose output on standard error
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

impl InspectArgs {
    pub fn extensions(&self) -> Vec<String> {
        parse_extension_list(&self.extensions_str)
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "mask-extract",
    version,
    about = "Extract the masks embedded in a settings file to standalone PNG files",
    long_about = "
Decodes every mask in image_settings.masks and writes mask i to <prefix>_mask<i>.png,
where <prefix> is the settings file name without its last extension.
Existing files with the same name are overwritten.

Example Usage:
  mask-extract brush.mbi                 # writes brush_mask0.png, brush_mask1.png, ...
  mask-extract brush.v2.mbi -o masks/    # writes masks/brush.v2_mask0.png, ..."
)]
pub struct ExtractArgs {
    /// Settings document to read
    #[arg(value_name = "SETTINGS_FILE")]
    pub settings_file: PathBuf,

    /// Directory for the extracted files (default: current directory)
    #[arg(short = 'o', long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the paths that would be written without writing anything
    #[arg(long = "dry-run")]
    pub dry_run: bool,

    /// JSON config file with default option values
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose output on standard error
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[derive(Parser, Debug)]
#[command(
    name = "mask-pack",
    version,
    about = "Embed image files as masks in a settings file and print the result",
    long_about = "
Base64-encodes each image (in the order given) and replaces image_settings with
{\"masks\": [...]}. Without images the document is only re-serialized.
The updated document is written to standard output with sorted keys; the input
file is never modified.

Example Usage:
  mask-pack brush.mbi mask0.png mask1.png > brush-new.mbi"
)]
pub struct PackArgs {
    /// Settings document to read
    #[arg(value_name = "SETTINGS_FILE")]
    pub settings_file: PathBuf,

    /// Image files to embed, in mask order
    #[arg(value_name = "IMAGE")]
    pub images: Vec<PathBuf>,

    /// JSON config file with default option values
    #[arg(short = 'c', long = "config", value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Enable verbose output on standard error
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Parse the command line, exiting with status 1 on usage errors.
///
/// `--help` and `--version` still exit 0.
pub fn parse_or_exit<T: Parser>() -> T {
    match T::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let code = match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
            let _ = err.print();
            std::process::exit(code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inspect_args() {
        let args = InspectArgs::try_parse_from(["mask-inspect", "brushes"]).unwrap();
        assert_eq!(args.search_path, PathBuf::from("brushes"));
        assert_eq!(args.extensions(), vec!["mbi", "myb"]);
        assert!(!args.strict);

        let args = InspectArgs::try_parse_from([
            "mask-inspect",
            "--extensions",
            "mbi, json",
            "--strict",
            "brushes",
        ])
        .unwrap();
        assert_eq!(args.extensions(), vec!["mbi", "json"]);
        assert!(args.strict);
    }

    #[test]
    fn test_inspect_arity() {
        assert!(InspectArgs::try_parse_from(["mask-inspect"]).is_err());
        assert!(InspectArgs::try_parse_from(["mask-inspect", "a", "b"]).is_err());
    }

    #[test]
    fn test_inspect_json_conflicts_with_report() {
        assert!(InspectArgs::try_parse_from(["mask-inspect", "--json", "--report", "a"]).is_err());
    }

    #[test]
    fn test_extract_args() {
        let args = ExtractArgs::try_parse_from(["mask-extract", "brush.mbi"]).unwrap();
        assert_eq!(args.settings_file, PathBuf::from("brush.mbi"));
        assert!(args.output_dir.is_none());

        let args =
            ExtractArgs::try_parse_from(["mask-extract", "-o", "out", "--dry-run", "brush.mbi"])
                .unwrap();
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
        assert!(args.dry_run);

        assert!(ExtractArgs::try_parse_from(["mask-extract"]).is_err());
        assert!(ExtractArgs::try_parse_from(["mask-extract", "a.mbi", "b.mbi"]).is_err());
    }

    #[test]
    fn test_pack_args() {
        let args = PackArgs::try_parse_from(["mask-pack", "brush.myb"]).unwrap();
        assert!(args.images.is_empty());

        let args = PackArgs::try_parse_from(["mask-pack", "brush.myb", "c.png", "a.png", "b.png"])
            .unwrap();
        assert_eq!(
            args.images,
            vec![
                PathBuf::from("c.png"),
                PathBuf::from("a.png"),
                PathBuf::from("b.png")
            ]
        );

        assert!(PackArgs::try_parse_from(["mask-pack"]).is_err());
    }
}
