//! In-process content sniffing for decoded masks
//!
//! Image containers are recognised by the `image` crate's magic-byte guesser;
//! a handful of common non-image signatures are checked afterwards so that a
//! corrupt or mislabeled mask still gets a useful description.

use image::{ImageFormat, ImageReader};
use std::fmt;
use std::io::Cursor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskKind {
    Image(ImageFormat),
    Pdf,
    Zip,
    Gzip,
    Text,
    Data,
    Empty,
}

/// Non-image signatures, checked in order after the image guesser
const SIGNATURES: &[(&[u8], MaskKind)] = &[
    (b"%PDF-", MaskKind::Pdf),
    (b"PK\x03\x04", MaskKind::Zip),
    (b"\x1f\x8b", MaskKind::Gzip),
];

impl MaskKind {
    /// Short label used in reports and JSON output
    pub fn name(&self) -> String {
        match self {
            MaskKind::Image(format) => image_format_name(*format),
            MaskKind::Pdf => "PDF".to_string(),
            MaskKind::Zip => "ZIP".to_string(),
            MaskKind::Gzip => "GZIP".to_string(),
            MaskKind::Text => "TEXT".to_string(),
            MaskKind::Data => "DATA".to_string(),
            MaskKind::Empty => "EMPTY".to_string(),
        }
    }
}

impl fmt::Display for MaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

fn image_format_name(format: ImageFormat) -> String {
    match format {
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::WebP => "WebP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Ico => "ICO".to_string(),
        other => format!("{:?}", other).to_uppercase(),
    }
}

/// Result of sniffing one decoded mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub kind: MaskKind,
    pub dimensions: Option<(u32, u32)>,
    pub size: usize,
}

impl Detection {
    /// Human-readable description in the spirit of `file(1)`
    pub fn description(&self) -> String {
        match self.kind {
            MaskKind::Image(_) => match self.dimensions {
                Some((width, height)) => {
                    format!("{} image data, {} x {}", self.kind, width, height)
                }
                None => format!("{} image data", self.kind),
            },
            MaskKind::Pdf => "PDF document".to_string(),
            MaskKind::Zip => "Zip archive data".to_string(),
            MaskKind::Gzip => "gzip compressed data".to_string(),
            MaskKind::Text => "ASCII text".to_string(),
            MaskKind::Data => "data".to_string(),
            MaskKind::Empty => "empty".to_string(),
        }
    }
}

/// Identify the payload of a decoded mask
pub fn detect(data: &[u8]) -> Detection {
    let mut kind = sniff(data);
    let dimensions = match kind {
        MaskKind::Image(format) => ImageReader::with_format(Cursor::new(data), format)
            .into_dimensions()
            .ok(),
        _ => None,
    };

    // The PNM magic is just "P1".."P7", which plain text hits too
    if kind == MaskKind::Image(ImageFormat::Pnm) && dimensions.is_none() {
        kind = sniff_non_image(data);
    }

    Detection {
        kind,
        dimensions,
        size: data.len(),
    }
}

fn sniff(data: &[u8]) -> MaskKind {
    if data.is_empty() {
        return MaskKind::Empty;
    }

    if let Ok(format) = image::guess_format(data) {
        return MaskKind::Image(format);
    }

    sniff_non_image(data)
}

fn sniff_non_image(data: &[u8]) -> MaskKind {
    for (magic, kind) in SIGNATURES {
        if data.starts_with(magic) {
            return *kind;
        }
    }

    if data
        .iter()
        .all(|&b| b.is_ascii_graphic() || b.is_ascii_whitespace())
    {
        MaskKind::Text
    } else {
        MaskKind::Data
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{GrayImage, Luma};

    /// Encode a tiny grayscale PNG in memory
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = GrayImage::from_pixel(width, height, Luma([255u8]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_detect_png_with_dimensions() {
        let detection = detect(&png_bytes(64, 32));
        assert_eq!(detection.kind, MaskKind::Image(ImageFormat::Png));
        assert_eq!(detection.dimensions, Some((64, 32)));
        assert_eq!(detection.description(), "PNG image data, 64 x 32");
    }

    #[test]
    fn test_detect_truncated_png_header() {
        let detection = detect(b"\x89PNG\r\n\x1a\n");
        assert_eq!(detection.kind, MaskKind::Image(ImageFormat::Png));
        assert_eq!(detection.dimensions, None);
        assert_eq!(detection.description(), "PNG image data");
    }

    #[test]
    fn test_detect_jpeg_signature() {
        let detection = detect(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]);
        assert_eq!(detection.kind.name(), "JPEG");
        assert_eq!(detection.kind, MaskKind::Image(ImageFormat::Jpeg));
    }

    #[test]
    fn test_detect_non_images() {
        assert_eq!(detect(b"%PDF-1.4\n").kind, MaskKind::Pdf);
        assert_eq!(detect(b"PK\x03\x04rest").kind, MaskKind::Zip);
        assert_eq!(detect(b"\x1f\x8b\x08\x00").kind, MaskKind::Gzip);
        assert_eq!(detect(b"hello world\n").description(), "ASCII text");
        assert_eq!(detect(&[0x00, 0x01, 0xFE]).description(), "data");
        assert_eq!(detect(&[]).description(), "empty");
    }

    #[test]
    fn test_detect_pnm_lookalike_text() {
        let detection = detect(b"P1 hello");
        assert_eq!(detection.kind, MaskKind::Text);
        assert_eq!(detection.description(), "ASCII text");

        assert_eq!(detect(b"P6\xff\x00").kind, MaskKind::Data);
    }

    #[test]
    fn test_detect_pnm_with_dimensions() {
        let detection = detect(b"P1\n2 2\n0 1\n1 0\n");
        assert_eq!(detection.kind, MaskKind::Image(ImageFormat::Pnm));
        assert_eq!(detection.dimensions, Some((2, 2)));
    }

    #[test]
    fn test_detection_size() {
        assert_eq!(detect(b"abc").size, 3);
    }
}
