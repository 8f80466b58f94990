//! Synthetic image builders shared by the integration tests
//!
//! Every builder produces the smallest structurally valid file of its format.

#![allow(dead_code)]

/// Inner payload used by the packet tests
pub const PAYLOAD: &[u8] = b"<x:xmpmeta xmlns:x='adobe:ns:meta/'><rdf:RDF/></x:xmpmeta>";

/// `PAYLOAD` inside a well-formed xpacket envelope with surrounding whitespace
pub fn wrapped(payload: &[u8]) -> Vec<u8> {
    let mut out = b"\n  <?xpacket begin='\xEF\xBB\xBF' id='W5M0MpCehiHzreSzNTczkc9d'?>\n".to_vec();
    out.extend_from_slice(payload);
    out.extend_from_slice(b"\n   \n<?xpacket end='w'?>\t\n");
    out
}

// ============================================================================
// PNG
// ============================================================================

pub fn png_chunk(chunk_type: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = (data.len() as u32).to_be_bytes().to_vec();
    out.extend_from_slice(chunk_type);
    out.extend_from_slice(data);
    let mut crc_input = chunk_type.to_vec();
    crc_input.extend_from_slice(data);
    out.extend_from_slice(&crc32fast::hash(&crc_input).to_be_bytes());
    out
}

pub fn png(width: u32, height: u32, xmp: Option<&[u8]>) -> Vec<u8> {
    let mut out = b"\x89PNG\r\n\x1a\n".to_vec();
    let mut ihdr = width.to_be_bytes().to_vec();
    ihdr.extend_from_slice(&height.to_be_bytes());
    ihdr.extend_from_slice(&[8, 6, 0, 0, 0]);
    out.extend(png_chunk(b"IHDR", &ihdr));
    if let Some(xmp) = xmp {
        let mut text = b"XML:com.adobe.xmp\0\0\0\0\0".to_vec();
        text.extend_from_slice(xmp);
        out.extend(png_chunk(b"iTXt", &text));
    }
    out.extend(png_chunk(b"IDAT", &[0x78, 0x9C, 0x63, 0x00, 0x00, 0x00, 0x01, 0x00, 0x01]));
    out.extend(png_chunk(b"IEND", &[]));
    out
}

// ============================================================================
// GIF
// ============================================================================

pub fn gif(width: u16, height: u16, xmp: Option<&[u8]>) -> Vec<u8> {
    let mut out = b"GIF89a".to_vec();
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&[0x80, 0, 0]);
    out.extend_from_slice(&[0, 0, 0, 0xFF, 0xFF, 0xFF]);
    if let Some(xmp) = xmp {
        out.extend_from_slice(&[0x21, 0xFF, 11]);
        out.extend_from_slice(b"XMP DataXMP");
        out.extend_from_slice(xmp);
        out.push(0x01);
        out.extend((0..=0xFFu8).rev());
        out.push(0x00);
    }
    // Image descriptor, no local color table, one data sub-block
    out.push(0x2C);
    out.extend_from_slice(&[0; 4]);
    out.extend_from_slice(&width.to_le_bytes());
    out.extend_from_slice(&height.to_le_bytes());
    out.extend_from_slice(&[0x00, 0x02, 0x02, 0x4C, 0x01, 0x00]);
    out.push(0x3B);
    out
}

/// Offset of the 256 descending trailer bytes in `gif(_, _, Some(xmp))`
pub fn gif_trailer_offset(xmp: &[u8]) -> usize {
    13 + 6 + 14 + xmp.len() + 1
}

// ============================================================================
// WebP
// ============================================================================

pub fn riff_chunk(id: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = id.to_vec();
    out.extend_from_slice(&(data.len() as u32).to_le_bytes());
    out.extend_from_slice(data);
    if data.len() % 2 == 1 {
        out.push(0);
    }
    out
}

fn riff_webp(chunks: &[Vec<u8>]) -> Vec<u8> {
    let body = chunks.concat();
    let mut out = b"RIFF".to_vec();
    out.extend_from_slice(&(body.len() as u32 + 4).to_le_bytes());
    out.extend_from_slice(b"WEBP");
    out.extend(body);
    out
}

pub fn webp_lossy(width: u16, height: u16) -> Vec<u8> {
    let mut frame = vec![0x30, 0x01, 0x00, 0x9D, 0x01, 0x2A];
    frame.extend_from_slice(&width.to_le_bytes());
    frame.extend_from_slice(&height.to_le_bytes());
    riff_webp(&[riff_chunk(b"VP8 ", &frame)])
}

pub fn webp_extended(width: u32, height: u32, xmp: Option<&[u8]>) -> Vec<u8> {
    let mut vp8x = vec![if xmp.is_some() { 0x04 } else { 0 }, 0, 0, 0];
    vp8x.extend_from_slice(&(width - 1).to_le_bytes()[..3]);
    vp8x.extend_from_slice(&(height - 1).to_le_bytes()[..3]);
    let mut chunks = vec![riff_chunk(b"VP8X", &vp8x), riff_chunk(b"VP8L", &[0x2F, 0, 0, 0, 0])];
    if let Some(xmp) = xmp {
        chunks.push(riff_chunk(b"XMP ", xmp));
    }
    riff_webp(&chunks)
}

// ============================================================================
// JPEG
// ============================================================================

pub fn jpeg_segment(marker: u8, data: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, marker];
    out.extend_from_slice(&(data.len() as u16 + 2).to_be_bytes());
    out.extend_from_slice(data);
    out
}

pub fn jpeg_sof(width: u16, height: u16) -> Vec<u8> {
    let mut data = vec![8];
    data.extend_from_slice(&height.to_be_bytes());
    data.extend_from_slice(&width.to_be_bytes());
    data.extend_from_slice(&[3, 1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    jpeg_segment(0xC0, &data)
}

pub fn jpeg_standard_xmp(packet: &[u8]) -> Vec<u8> {
    let mut data = b"http://ns.adobe.com/xap/1.0/\0".to_vec();
    data.extend_from_slice(packet);
    jpeg_segment(0xE1, &data)
}

pub fn jpeg_extended_xmp(guid: &[u8; 32], total: u32, offset: u32, part: &[u8]) -> Vec<u8> {
    let mut data = b"http://ns.adobe.com/xmp/extension/\0".to_vec();
    data.extend_from_slice(guid);
    data.extend_from_slice(&total.to_be_bytes());
    data.extend_from_slice(&offset.to_be_bytes());
    data.extend_from_slice(part);
    jpeg_segment(0xE1, &data)
}

pub fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
    let mut out = vec![0xFF, 0xD8];
    out.extend(jpeg_segment(0xE0, b"JFIF\0\x01\x02\0\0\x01\0\x01\0\0"));
    for segment in segments {
        out.extend_from_slice(segment);
    }
    out.extend_from_slice(&[0xFF, 0xD9]);
    out
}

// ============================================================================
// TIFF
// ============================================================================

/// Little-endian TIFF with LONG width/height and an optional XMP tag
pub fn tiff(width: u32, height: u32, xmp: Option<&[u8]>) -> Vec<u8> {
    let entries: u16 = if xmp.is_some() { 3 } else { 2 };
    let data_offset = 8 + 2 + u32::from(entries) * 12 + 4;

    let mut out = b"II".to_vec();
    out.extend_from_slice(&42u16.to_le_bytes());
    out.extend_from_slice(&8u32.to_le_bytes());
    out.extend_from_slice(&entries.to_le_bytes());
    for (tag, value) in [(256u16, width), (257, height)] {
        out.extend_from_slice(&tag.to_le_bytes());
        out.extend_from_slice(&4u16.to_le_bytes());
        out.extend_from_slice(&1u32.to_le_bytes());
        out.extend_from_slice(&value.to_le_bytes());
    }
    if let Some(xmp) = xmp {
        out.extend_from_slice(&700u16.to_le_bytes());
        out.extend_from_slice(&7u16.to_le_bytes());
        out.extend_from_slice(&(xmp.len() as u32).to_le_bytes());
        out.extend_from_slice(&data_offset.to_le_bytes());
    }
    out.extend_from_slice(&0u32.to_le_bytes());
    if let Some(xmp) = xmp {
        out.extend_from_slice(xmp);
    }
    out
}

// ============================================================================
// ISO box family
// ============================================================================

pub const XMP_UUID: [u8; 16] = [
    0xBE, 0x7A, 0xCF, 0xCB, 0x97, 0xA9, 0x42, 0xE8, 0x9C, 0x71, 0x99, 0x94, 0x91, 0xE3, 0xAF, 0xAC,
];

pub fn iso_box(box_type: &[u8; 4], payload: &[u8]) -> Vec<u8> {
    let mut out = (payload.len() as u32 + 8).to_be_bytes().to_vec();
    out.extend_from_slice(box_type);
    out.extend_from_slice(payload);
    out
}

pub fn ftyp(brands: &[&[u8; 4]]) -> Vec<u8> {
    let mut payload = b"mif1".to_vec();
    payload.extend_from_slice(&0u32.to_be_bytes());
    for brand in brands {
        payload.extend_from_slice(*brand);
    }
    iso_box(b"ftyp", &payload)
}

pub fn ispe(width: u32, height: u32) -> Vec<u8> {
    let mut payload = vec![0; 4];
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    iso_box(b"ispe", &payload)
}

pub fn idat(width: u16, height: u16) -> Vec<u8> {
    let mut payload = vec![0, 0, 0, 0];
    payload.extend_from_slice(&width.to_be_bytes());
    payload.extend_from_slice(&height.to_be_bytes());
    iso_box(b"idat", &payload)
}

pub fn iprp(properties: &[Vec<u8>]) -> Vec<u8> {
    iso_box(b"iprp", &iso_box(b"ipco", &properties.concat()))
}

pub fn meta(children: &[Vec<u8>]) -> Vec<u8> {
    let mut payload = vec![0; 4];
    payload.extend(iso_box(b"hdlr", &[0; 24]));
    payload.extend(children.concat());
    iso_box(b"meta", &payload)
}

pub fn xmp_uuid(xmp: &[u8]) -> Vec<u8> {
    let mut payload = XMP_UUID.to_vec();
    payload.extend_from_slice(xmp);
    iso_box(b"uuid", &payload)
}

pub fn heic(width: u32, height: u32, xmp: Option<&[u8]>) -> Vec<u8> {
    let mut out = ftyp(&[b"mif1", b"heic"]);
    out.extend(meta(&[iprp(&[ispe(width, height)])]));
    if let Some(xmp) = xmp {
        out.extend(xmp_uuid(xmp));
    }
    out.extend(iso_box(b"mdat", &[0; 16]));
    out
}

pub fn jp2(width: u32, height: u32) -> Vec<u8> {
    let mut ihdr = height.to_be_bytes().to_vec();
    ihdr.extend_from_slice(&width.to_be_bytes());
    ihdr.extend_from_slice(&[0, 3, 7, 7, 0, 0]);
    let mut out = iso_box(b"jP  ", &[0x0D, 0x0A, 0x87, 0x0A]);
    out.extend(iso_box(b"ftyp", b"jp2 \0\0\0\0jp2 "));
    out.extend(iso_box(b"jp2h", &iso_box(b"ihdr", &ihdr)));
    // Codestream box running to the end of the file
    out.extend_from_slice(&0u32.to_be_bytes());
    out.extend_from_slice(b"jp2c");
    out.extend_from_slice(&[0xFF, 0x4F, 0xFF, 0x51]);
    out
}
