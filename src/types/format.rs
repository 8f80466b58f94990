//! Image container format labels

use std::fmt;

/// Container format recognized by a format handler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum ImageFormat {
    /// PNG
    Png,
    /// WebP (lossy, lossless or extended)
    Webp,
    /// GIF89a
    Gif,
    /// GIF87a, which cannot carry extension blocks
    OldStyleGif,
    /// JPEG (JFIF and Exif)
    Jpeg,
    /// JPEG 2000 (`jP  ` signature box)
    Jpeg2000,
    /// HEIC (ISO box family, `heic` brand)
    Heic,
    /// AVIF (ISO box family, `avif` brand)
    Avif,
    /// TIFF, either byte order
    Tiff,
    /// Unrecognized container holding a wrapped XMP packet
    Unknown,
}

impl ImageFormat {
    /// Human-readable label of the format
    pub fn name(&self) -> &'static str {
        match self {
            ImageFormat::Png => "PNG",
            ImageFormat::Webp => "WEBP",
            ImageFormat::Gif => "GIF",
            ImageFormat::OldStyleGif => "Old-style GIF",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Jpeg2000 => "JPEG2000",
            ImageFormat::Heic => "HEIC",
            ImageFormat::Avif => "AVIF",
            ImageFormat::Tiff => "TIFF",
            ImageFormat::Unknown => "unknown image",
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
