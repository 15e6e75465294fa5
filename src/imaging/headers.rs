//! Minimal readers for the header fields the decoders do not expose.
//!
//! - JPEG: chroma subsampling from the frame header (SOFn marker).
//! - PNG: whether the image is palette-indexed (IHDR color type 3). The `image`
//!   crate expands palettes on decode, so the decoded buffer cannot tell.
//!
//! Both work on the raw file bytes and return "unknown" on anything malformed.

use super::params::Subsampling;

const PNG_SIGNATURE: &[u8] = b"\x89PNG\r\n\x1a\n";
const PNG_COLOR_TYPE_INDEXED: u8 = 3;

// ---------------------------------------------------------------------------
// JPEG
// ---------------------------------------------------------------------------

/// Read the chroma subsampling of a baseline or progressive JPEG.
///
/// Only three-component images whose chroma planes are both sampled 1x1 are
/// classified; the luma sampling factors decide the scheme:
///
/// | Y (h, v) | Scheme |
/// |---|---|
/// | 1, 1 | 4:4:4 |
/// | 2, 1 | 4:2:2 |
/// | 2, 2 | 4:2:0 |
///
/// Everything else (grayscale, CMYK, 4:1:1, unusual layouts) returns `None`.
pub fn read_jpeg_subsampling(data: &[u8]) -> Option<Subsampling> {
    let factors = find_frame_sampling_factors(data)?;
    let [(y_h, y_v), cb, cr] = factors.as_slice() else {
        return None;
    };
    if *cb != (1, 1) || *cr != (1, 1) {
        return None;
    }
    match (*y_h, *y_v) {
        (1, 1) => Some(Subsampling::Yuv444),
        (2, 1) => Some(Subsampling::Yuv422),
        (2, 2) => Some(Subsampling::Yuv420),
        _ => None,
    }
}

/// Is this marker a start-of-frame? C4 (DHT), C8 (JPG) and CC (DAC) share
/// the range but are not frame headers.
fn is_sof_marker(marker: u8) -> bool {
    (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC)
}

/// Walk the marker segments up to the first frame header and return the
/// (horizontal, vertical) sampling factors of each component.
fn find_frame_sampling_factors(data: &[u8]) -> Option<Vec<(u8, u8)>> {
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }
    let mut pos = 2;

    while pos + 1 < data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        // Fill bytes: a run of 0xFF before the actual marker code
        if marker == 0xFF {
            pos += 1;
            continue;
        }
        // Markers without a length field
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        // Scan data or end of image before any frame header
        if marker == 0xDA || marker == 0xD9 {
            return None;
        }
        if pos + 4 > data.len() {
            return None;
        }
        let seg_len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if seg_len < 2 || pos + 2 + seg_len > data.len() {
            return None;
        }
        let segment = &data[pos + 4..pos + 2 + seg_len];

        if is_sof_marker(marker) {
            return parse_frame_header(segment);
        }
        pos += 2 + seg_len;
    }
    None
}

/// Frame header layout (after the length field):
///   Byte 0:    Sample precision
///   Bytes 1-2: Number of lines
///   Bytes 3-4: Samples per line
///   Byte 5:    Component count (Nf)
///   Then Nf x 3 bytes: component id, sampling factors (H << 4 | V), quant table
fn parse_frame_header(segment: &[u8]) -> Option<Vec<(u8, u8)>> {
    let count = *segment.get(5)? as usize;
    let components = segment.get(6..6 + count * 3)?;
    Some(
        components
            .chunks_exact(3)
            .map(|c| (c[1] >> 4, c[1] & 0x0F))
            .collect(),
    )
}

// ---------------------------------------------------------------------------
// PNG
// ---------------------------------------------------------------------------

/// Does this PNG use an indexed (palette) color type?
///
/// IHDR is always the first chunk: signature (8) + length (4) + "IHDR" (4) +
/// width (4) + height (4) + bit depth (1), then the color type byte.
pub fn is_indexed_png(data: &[u8]) -> bool {
    data.starts_with(PNG_SIGNATURE)
        && data.get(12..16) == Some(b"IHDR".as_slice())
        && data.get(25) == Some(&PNG_COLOR_TYPE_INDEXED)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Build SOI + optional APP0 + SOF0 with the given component factors + SOS.
    fn jpeg_with_factors(factors: &[(u8, u8)]) -> Vec<u8> {
        let mut data = vec![0xFF, 0xD8];
        // APP0 with a short dummy payload
        data.extend_from_slice(&[0xFF, 0xE0, 0x00, 0x06, b'J', b'F', b'I', b'F']);

        let seg_len = 8 + factors.len() * 3;
        data.extend_from_slice(&[0xFF, 0xC0]);
        data.extend_from_slice(&(seg_len as u16).to_be_bytes());
        data.extend_from_slice(&[8, 0x00, 0x10, 0x00, 0x10, factors.len() as u8]);
        for (i, (h, v)) in factors.iter().enumerate() {
            data.extend_from_slice(&[i as u8 + 1, (h << 4) | v, 0]);
        }
        data.extend_from_slice(&[0xFF, 0xDA, 0x00, 0x02]);
        data
    }

    #[test]
    fn classifies_standard_schemes() {
        let cases = [
            ((1, 1), Subsampling::Yuv444),
            ((2, 1), Subsampling::Yuv422),
            ((2, 2), Subsampling::Yuv420),
        ];
        for (luma, expected) in cases {
            let data = jpeg_with_factors(&[luma, (1, 1), (1, 1)]);
            assert_eq!(read_jpeg_subsampling(&data), Some(expected));
        }
    }

    #[test]
    fn grayscale_is_unclassified() {
        let data = jpeg_with_factors(&[(1, 1)]);
        assert_eq!(read_jpeg_subsampling(&data), None);
    }

    #[test]
    fn four_one_one_is_unclassified() {
        let data = jpeg_with_factors(&[(4, 1), (1, 1), (1, 1)]);
        assert_eq!(read_jpeg_subsampling(&data), None);
    }

    #[test]
    fn subsampled_chroma_plane_is_unclassified() {
        let data = jpeg_with_factors(&[(2, 2), (2, 1), (1, 1)]);
        assert_eq!(read_jpeg_subsampling(&data), None);
    }

    #[test]
    fn progressive_frame_header_is_found() {
        let mut data = jpeg_with_factors(&[(2, 1), (1, 1), (1, 1)]);
        // Rewrite SOF0 as SOF2 (progressive)
        let sof = data.windows(2).position(|w| w == [0xFF, 0xC0]).unwrap();
        data[sof + 1] = 0xC2;
        assert_eq!(read_jpeg_subsampling(&data), Some(Subsampling::Yuv422));
    }

    #[test]
    fn huffman_table_marker_is_not_a_frame() {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xC4, 0x00, 0x03, 0x00];
        data.extend_from_slice(&jpeg_with_factors(&[(1, 1), (1, 1), (1, 1)])[2..]);
        assert_eq!(read_jpeg_subsampling(&data), Some(Subsampling::Yuv444));
    }

    #[test]
    fn truncated_or_foreign_data_is_unknown() {
        assert_eq!(read_jpeg_subsampling(&[]), None);
        assert_eq!(read_jpeg_subsampling(b"not a jpeg"), None);
        let data = jpeg_with_factors(&[(2, 2), (1, 1), (1, 1)]);
        assert_eq!(read_jpeg_subsampling(&data[..14]), None);
    }

    fn png_header(color_type: u8) -> Vec<u8> {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&4u32.to_be_bytes());
        data.extend_from_slice(&4u32.to_be_bytes());
        data.extend_from_slice(&[8, color_type, 0, 0, 0]);
        data
    }

    #[test]
    fn detects_indexed_png() {
        assert!(is_indexed_png(&png_header(3)));
        assert!(!is_indexed_png(&png_header(6)));
        assert!(!is_indexed_png(&png_header(2)));
    }

    #[test]
    fn non_png_is_not_indexed() {
        assert!(!is_indexed_png(&[0xFF, 0xD8, 0xFF]));
        assert!(!is_indexed_png(&PNG_SIGNATURE[..4]));
    }
}
