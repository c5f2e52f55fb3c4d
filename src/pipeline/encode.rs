//! Image encoding: rendered page → PNG bytes → base64 inline part.
//!
//! PNG is lossless, which keeps rendered glyph edges crisp for the vision
//! model. Pages stay as raw PNG bytes until the request is built so the
//! extractor's output is independent of the wire format.

use crate::pipeline::payload::Part;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::DynamicImage;
use std::io::Cursor;
use tracing::debug;

/// MIME type declared for every page image.
pub const PNG_MIME_TYPE: &str = "image/png";

/// Encode a rasterised page as PNG bytes.
pub fn encode_png(img: &DynamicImage) -> Result<Vec<u8>, image::ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    debug!("Encoded {}x{} page → {} PNG bytes", img.width(), img.height(), buf.len());
    Ok(buf)
}

/// Wrap PNG bytes as a base64 `inlineData` request part.
pub fn inline_png(png: &[u8]) -> Part {
    Part::inline_data(PNG_MIME_TYPE, STANDARD.encode(png))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    #[test]
    fn encode_small_image() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([255, 0, 0, 255])));
        let png = encode_png(&img).expect("encode should succeed");
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn inline_png_declares_mime_and_base64() {
        match inline_png(b"\x89PNG") {
            Part::InlineData { inline_data } => {
                assert_eq!(inline_data.mime_type, "image/png");
                assert_eq!(inline_data.data, "iVBORw==");
            }
            other => panic!("expected inline data, got {other:?}"),
        }
    }
}
