//! Settings documents (`.mbi` / `.myb`)
//!
//! A settings document is an arbitrary JSON object. Only
//! `image_settings.masks` is interpreted; every other key is carried through
//! untouched so that re-serializing the document never drops data.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::{Map, Value};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::MaskError;

pub const IMAGE_SETTINGS_KEY: &str = "image_settings";
pub const MASKS_KEY: &str = "masks";

#[derive(Debug, Clone)]
pub struct SettingsDocument {
    path: PathBuf,
    root: Map<String, Value>,
}

impl SettingsDocument {
    /// Read and parse a settings document from disk
    pub fn load(path: &Path) -> Result<Self> {
        let contents = match fs::read(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(MaskError::NotFound {
                    path: path.to_path_buf(),
                }
                .into());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read settings file: {}", path.display()))
            }
        };

        Self::from_slice(path, &contents)
    }

    /// Parse a settings document from raw bytes; `path` is only used for messages
    pub fn from_slice(path: &Path, contents: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(contents)
            .map_err(|err| MaskError::parse(path, err.to_string()))?;

        match value {
            Value::Object(root) => Ok(Self {
                path: path.to_path_buf(),
                root,
            }),
            other => Err(MaskError::parse(
                path,
                format!("expected a JSON object, found {}", json_type_name(&other)),
            )
            .into()),
        }
    }

    /// The embedded masks in index order.
    ///
    /// A missing `image_settings` or `masks` key yields an empty slice.
    pub fn masks(&self) -> Result<&[Value], MaskError> {
        let image_settings = match self.root.get(IMAGE_SETTINGS_KEY) {
            None => return Ok(&[]),
            Some(Value::Object(settings)) => settings,
            Some(other) => {
                return Err(MaskError::schema(
                    &self.path,
                    format!(
                        "'{}' is {}, expected an object",
                        IMAGE_SETTINGS_KEY,
                        json_type_name(other)
                    ),
                ))
            }
        };

        match image_settings.get(MASKS_KEY) {
            None => Ok(&[]),
            Some(Value::Array(masks)) => Ok(masks.as_slice()),
            Some(other) => Err(MaskError::schema(
                &self.path,
                format!(
                    "'{}.{}' is {}, expected an array",
                    IMAGE_SETTINGS_KEY,
                    MASKS_KEY,
                    json_type_name(other)
                ),
            )),
        }
    }

    /// Replace `image_settings` with a fresh object holding only `masks`.
    ///
    /// An empty list leaves the document untouched.
    pub fn replace_masks(&mut self, masks: Vec<String>) {
        if masks.is_empty() {
            return;
        }

        let mut image_settings = Map::new();
        image_settings.insert(
            MASKS_KEY.to_string(),
            Value::Array(masks.into_iter().map(Value::String).collect()),
        );
        self.root
            .insert(IMAGE_SETTINGS_KEY.to_string(), Value::Object(image_settings));
    }

    /// Serialize with sorted keys, two-space indentation, ASCII-only string
    /// escapes and no trailing whitespace on any line.
    pub fn to_pretty_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let mut serializer =
            serde_json::Serializer::with_formatter(&mut buffer, AsciiPrettyFormatter::new());
        self.root
            .serialize(&mut serializer)
            .context("Failed to serialize settings document")?;

        let text = String::from_utf8(buffer).context("Serialized document is not UTF-8")?;
        Ok(trim_line_ends(&text))
    }
}

fn trim_line_ends(text: &str) -> String {
    text.split('\n')
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Pretty printer that escapes every non-ASCII character as `\uXXXX`,
/// splitting characters outside the BMP into surrogate pairs.
struct AsciiPrettyFormatter<'a> {
    inner: PrettyFormatter<'a>,
}

impl<'a> AsciiPrettyFormatter<'a> {
    fn new() -> Self {
        Self {
            inner: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for AsciiPrettyFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        self.inner.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inner.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        fragment: &str,
    ) -> io::Result<()> {
        if fragment.is_ascii() {
            return writer.write_all(fragment.as_bytes());
        }

        let mut units = [0u16; 2];
        for ch in fragment.chars() {
            if ch.is_ascii() {
                writer.write_all(&[ch as u8])?;
            } else {
                for unit in ch.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
        }
        Ok(())
    }
}
