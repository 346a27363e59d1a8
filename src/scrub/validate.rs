//! Image payload validation: cheap marker checks first, full decode second.

use thiserror::Error;

/// JPEG start-of-image marker.
const JPEG_SOI: [u8; 2] = [0xFF, 0xD8];
/// JPEG end-of-image marker.
const JPEG_EOI: [u8; 2] = [0xFF, 0xD9];
/// PNG file signature.
const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
}

impl ImageKind {
    /// Classify an object key by extension; None for non-image keys.
    pub fn from_key(key: &str) -> Option<Self> {
        let lower = key.to_lowercase();
        if lower.ends_with(".jpg") || lower.ends_with(".jpeg") {
            Some(ImageKind::Jpeg)
        } else if lower.ends_with(".png") {
            Some(ImageKind::Png)
        } else {
            None
        }
    }
}

#[derive(Debug, Error)]
pub enum ImageDefect {
    #[error("truncated ({len} bytes)")]
    Truncated { len: usize },
    #[error("missing JPEG start marker")]
    MissingStartMarker,
    #[error("missing JPEG end marker")]
    MissingEndMarker,
    #[error("missing PNG signature")]
    MissingPngSignature,
    #[error("decode failed: {0}")]
    DecodeFailed(String),
}

/// Validate an image payload. The marker checks reject obviously corrupt
/// payloads before any decode is attempted; survivors get a full decode.
pub fn validate(kind: ImageKind, data: &[u8]) -> Result<(), ImageDefect> {
    match kind {
        ImageKind::Jpeg => {
            if data.len() < 4 {
                return Err(ImageDefect::Truncated { len: data.len() });
            }
            if data[..2] != JPEG_SOI {
                return Err(ImageDefect::MissingStartMarker);
            }
            if data[data.len() - 2..] != JPEG_EOI {
                return Err(ImageDefect::MissingEndMarker);
            }
            image::load_from_memory_with_format(data, image::ImageFormat::Jpeg)
                .map(|_| ())
                .map_err(|e| ImageDefect::DecodeFailed(e.to_string()))
        }
        ImageKind::Png => {
            if data.len() < PNG_SIGNATURE.len() {
                return Err(ImageDefect::Truncated { len: data.len() });
            }
            if data[..PNG_SIGNATURE.len()] != PNG_SIGNATURE {
                return Err(ImageDefect::MissingPngSignature);
            }
            image::load_from_memory_with_format(data, image::ImageFormat::Png)
                .map(|_| ())
                .map_err(|e| ImageDefect::DecodeFailed(e.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn encoded(format: image::ImageFormat) -> Vec<u8> {
        let img = image::DynamicImage::new_rgb8(4, 4);
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, format).unwrap();
        buf.into_inner()
    }

    #[test]
    fn key_classification_is_case_insensitive() {
        assert_eq!(ImageKind::from_key("a/b/photo.JPG"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_key("a/b/photo.jpeg"), Some(ImageKind::Jpeg));
        assert_eq!(ImageKind::from_key("a/b/photo.PNG"), Some(ImageKind::Png));
        assert_eq!(ImageKind::from_key("a/b/notes.txt"), None);
        assert_eq!(ImageKind::from_key("a/b/manifest.json"), None);
    }

    #[test]
    fn payload_without_soi_marker_is_rejected_without_decoding() {
        let err = validate(ImageKind::Jpeg, b"not a jpeg at all").unwrap_err();
        assert!(matches!(err, ImageDefect::MissingStartMarker));
    }

    #[test]
    fn jpeg_missing_eoi_marker_is_rejected() {
        let mut data = encoded(image::ImageFormat::Jpeg);
        data.truncate(data.len() - 2);
        let err = validate(ImageKind::Jpeg, &data).unwrap_err();
        assert!(matches!(err, ImageDefect::MissingEndMarker));
    }

    #[test]
    fn tiny_payload_is_truncated() {
        let err = validate(ImageKind::Jpeg, &[0xFF, 0xD8]).unwrap_err();
        assert!(matches!(err, ImageDefect::Truncated { len: 2 }));
    }

    #[test]
    fn valid_jpeg_passes_full_decode() {
        let data = encoded(image::ImageFormat::Jpeg);
        validate(ImageKind::Jpeg, &data).unwrap();
    }

    #[test]
    fn valid_png_passes_full_decode() {
        let data = encoded(image::ImageFormat::Png);
        validate(ImageKind::Png, &data).unwrap();
    }

    #[test]
    fn png_with_wrong_signature_is_rejected() {
        let err = validate(ImageKind::Png, b"\xff\xd8 jpeg pretending to be png").unwrap_err();
        assert!(matches!(err, ImageDefect::MissingPngSignature));
    }

    #[test]
    fn markers_alone_do_not_make_a_decodeable_jpeg() {
        // SOI + garbage + EOI passes the marker check but fails the decode
        let mut data = vec![0xFF, 0xD8];
        data.extend_from_slice(&[0x00; 32]);
        data.extend_from_slice(&[0xFF, 0xD9]);
        let err = validate(ImageKind::Jpeg, &data).unwrap_err();
        assert!(matches!(err, ImageDefect::DecodeFailed(_)));
    }
}
