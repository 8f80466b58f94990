//! Tests for the public scanning API
//!
//! These tests cover the stream, byte slice and path entry points and the
//! optional serde support.

mod fixtures;

use fixtures::{jpeg, jpeg_sof, jpeg_standard_xmp, png, wrapped, PAYLOAD};
use std::io::{Cursor, Write};
use xmpblock::files::{default_registry, FormatHandler};
use xmpblock::{
    scan, scan_bytes, scan_path, ImageFormat, ParseResult, ScanOptions, XmpError,
    XmpScanner,
};

mod native_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn scan_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&png(300, 200, Some(&wrapped(PAYLOAD)))).unwrap();
        file.flush().unwrap();

        let result = scan_path(file.path()).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Png));
        assert_eq!(result.dimensions(), Some((300, 200)));
        assert_eq!(result.packets, vec![PAYLOAD.to_vec()]);
    }

    #[test]
    fn scan_path_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = scan_path(dir.path().join("doesnotexist.jpg"));
        assert!(matches!(result, Err(XmpError::IoError(_))));
    }

    #[test]
    fn scan_open_file() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(&jpeg(&[jpeg_sof(12, 34)])).unwrap();

        let result = scan(&mut file).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Jpeg));
        assert_eq!(result.dimensions(), Some((12, 34)));
    }
}

mod in_memory_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_input_is_unrecognized() {
        assert_eq!(scan_bytes(&[]).unwrap(), ParseResult::unrecognized());
    }

    #[test]
    fn scan_ignores_reader_position() {
        let mut reader = Cursor::new(png(7, 9, None));
        reader.set_position(20);
        let result = scan(&mut reader).unwrap();
        assert_eq!(result.dimensions(), Some((7, 9)));
    }

    #[test]
    fn registry_detect() {
        let registry = default_registry();
        assert!(registry.handlers().iter().any(|h| h.format_name() == "JPEG"));

        let mut reader = Cursor::new(jpeg(&[jpeg_standard_xmp(&wrapped(PAYLOAD))]));
        let result = registry.detect(&mut reader, &ScanOptions::default()).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Jpeg));
        assert_eq!(result.dimensions(), None);
        assert_eq!(result.packets, vec![PAYLOAD.to_vec()]);
    }

    #[test]
    fn generic_scan_keeps_first_packet_by_default() {
        let first = wrapped(b"<first/>");
        let second = wrapped(b"<second/>");
        let data = [&b"opaque "[..], &first[..], &b" gap "[..], &second[..]].concat();

        let result = scan_bytes(&data).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Unknown));
        assert_eq!(result.packets, vec![b"<first/>".to_vec()]);

        let scanner = XmpScanner::with_options(ScanOptions::default().all_packets());
        let result = scanner.scan_bytes(&data).unwrap();
        assert_eq!(result.packets, vec![b"<first/>".to_vec(), b"<second/>".to_vec()]);
    }
}

#[cfg(feature = "serde")]
mod serde_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn result_serializes() {
        let result = scan_bytes(&png(2, 3, None)).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["format"], "Png");
        assert_eq!(json["width"], 2);
        assert_eq!(json["height"], 3);
        assert_eq!(json["packets"], serde_json::json!([]));
    }
}
