//! Format detection tests
//!
//! Each test feeds a synthetic file through the public scanning API and
//! checks the detected format, the dimensions and the extracted packets.

mod fixtures;

use fixtures::*;
use xmpblock::{scan_bytes, ImageFormat};

mod minimal_files {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn png() {
        let result = scan_bytes(&fixtures::png(640, 480, None)).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Png));
        assert_eq!(result.dimensions(), Some((640, 480)));
        assert!(result.packets.is_empty());
    }

    #[test]
    fn gif() {
        let result = scan_bytes(&fixtures::gif(33, 17, None)).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Gif));
        assert_eq!(result.dimensions(), Some((33, 17)));
        assert!(result.packets.is_empty());
    }

    #[test]
    fn old_style_gif() {
        let result = scan_bytes(b"GIF87a\x0A\x00\x14\x00\x00\x00\x00;").unwrap();
        assert_eq!(result.format, Some(ImageFormat::OldStyleGif));
        assert_eq!(result.dimensions(), Some((10, 20)));
    }

    #[test]
    fn webp_lossy() {
        let result = scan_bytes(&fixtures::webp_lossy(550, 368)).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Webp));
        assert_eq!(result.dimensions(), Some((550, 368)));
        assert!(result.packets.is_empty());
    }

    #[test]
    fn webp_extended() {
        let result = scan_bytes(&fixtures::webp_extended(4096, 2160, None)).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Webp));
        assert_eq!(result.dimensions(), Some((4096, 2160)));
        assert!(result.packets.is_empty());
    }

    #[test]
    fn jpeg() {
        let result = scan_bytes(&fixtures::jpeg(&[jpeg_sof(1920, 1080)])).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Jpeg));
        assert_eq!(result.dimensions(), Some((1920, 1080)));
        assert!(result.packets.is_empty());
    }

    #[test]
    fn tiff() {
        let result = scan_bytes(&fixtures::tiff(3000, 2000, None)).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Tiff));
        assert_eq!(result.dimensions(), Some((3000, 2000)));
        assert!(result.packets.is_empty());
    }

    #[test]
    fn heic() {
        let result = scan_bytes(&fixtures::heic(4032, 3024, None)).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Heic));
        assert_eq!(result.dimensions(), Some((4032, 3024)));
        assert!(result.packets.is_empty());
    }

    #[test]
    fn avif() {
        let mut file = ftyp(&[b"mif1", b"avif"]);
        file.extend(meta(&[iprp(&[ispe(64, 32)])]));
        let result = scan_bytes(&file).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Avif));
        assert_eq!(result.dimensions(), Some((64, 32)));
    }

    #[test]
    fn jpeg2000() {
        let result = scan_bytes(&fixtures::jp2(800, 600)).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Jpeg2000));
        assert_eq!(result.dimensions(), Some((800, 600)));
        assert!(result.packets.is_empty());
    }
}

mod packets {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn png() {
        let result = scan_bytes(&fixtures::png(1, 1, Some(&wrapped(PAYLOAD)))).unwrap();
        assert_eq!(result.packets, vec![PAYLOAD.to_vec()]);
    }

    #[test]
    fn gif() {
        let result = scan_bytes(&fixtures::gif(1, 1, Some(&wrapped(PAYLOAD)))).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Gif));
        assert_eq!(result.packets, vec![PAYLOAD.to_vec()]);
    }

    #[test]
    fn webp() {
        let result = scan_bytes(&webp_extended(2, 2, Some(&wrapped(PAYLOAD)))).unwrap();
        assert_eq!(result.packets, vec![PAYLOAD.to_vec()]);
    }

    #[test]
    fn jpeg() {
        let file = fixtures::jpeg(&[jpeg_standard_xmp(&wrapped(PAYLOAD)), jpeg_sof(4, 4)]);
        let result = scan_bytes(&file).unwrap();
        assert_eq!(result.packets, vec![PAYLOAD.to_vec()]);
    }

    #[test]
    fn tiff() {
        let result = scan_bytes(&fixtures::tiff(5, 6, Some(&wrapped(PAYLOAD)))).unwrap();
        assert_eq!(result.dimensions(), Some((5, 6)));
        assert_eq!(result.packets, vec![PAYLOAD.to_vec()]);
    }

    #[test]
    fn heic() {
        let result = scan_bytes(&fixtures::heic(5, 6, Some(&wrapped(PAYLOAD)))).unwrap();
        assert_eq!(result.packets, vec![PAYLOAD.to_vec()]);
    }

    #[test]
    fn unwrapped_packet_is_kept_whole() {
        let result = scan_bytes(&fixtures::png(1, 1, Some(b"  <x:xmpmeta/>  "))).unwrap();
        assert_eq!(result.packets, vec![b"<x:xmpmeta/>".to_vec()]);
    }

    #[test]
    fn empty_packet_is_dropped() {
        let result = scan_bytes(&fixtures::png(1, 1, Some(&wrapped(b"")))).unwrap();
        assert_eq!(result.format, Some(ImageFormat::Png));
        assert!(result.packets.is_empty());
    }
}
