//! Image decoding and encoding

use crate::{Result, SheetError};
use base64::Engine as _;
use image::{DynamicImage, ImageFormat, ImageReader, RgbaImage};
use std::io::Cursor;

/// Strip a `data:<mime>;base64,` prefix, returning the payload
///
/// Input without a data-URI prefix is returned unchanged.
pub fn strip_data_uri(uri: &str) -> &str {
    let trimmed = uri.trim();
    if !trimmed.starts_with("data:") {
        return trimmed;
    }
    match trimmed.find(";base64,") {
        Some(pos) => &trimmed[pos + ";base64,".len()..],
        None => match trimmed.find(',') {
            Some(pos) => &trimmed[pos + 1..],
            None => trimmed,
        },
    }
}

/// Decode a data URI (or bare base64) into raw bytes
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let payload = strip_data_uri(uri);
    base64::engine::general_purpose::STANDARD
        .decode(payload.as_bytes())
        .map_err(|e| SheetError::Decode(e.to_string()))
}

/// Decode an encoded image (PNG, JPEG, GIF, BMP)
pub fn decode_image(data: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(data).map_err(|e| SheetError::ImageDecode(e.to_string()))
}

/// Read image dimensions from the header without decoding pixels
pub fn image_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    let reader = ImageReader::new(Cursor::new(data))
        .with_guessed_format()
        .map_err(|e| SheetError::ImageDecode(e.to_string()))?;
    reader
        .into_dimensions()
        .map_err(|e| SheetError::ImageDecode(e.to_string()))
}

/// Encode an RGBA image as PNG
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes: Vec<u8> = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| SheetError::ImageEncode(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;
    use pretty_assertions::assert_eq;

    fn sample_png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbaImage::from_pixel(width, height, Rgba([10, 20, 30, 255]));
        encode_png(&image).unwrap()
    }

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("data:image/svg+xml;base64,BBBB"), "BBBB");
        assert_eq!(strip_data_uri("CCCC"), "CCCC");
        assert_eq!(strip_data_uri("  data:image/jpeg;base64,DDDD\n"), "DDDD");
    }

    #[test]
    fn test_decode_data_uri_roundtrip() {
        let png = sample_png(3, 2);
        let encoded = base64::engine::general_purpose::STANDARD.encode(&png);
        let uri = format!("data:image/png;base64,{encoded}");
        assert_eq!(decode_data_uri(&uri).unwrap(), png);
        assert_eq!(decode_data_uri(&encoded).unwrap(), png);
    }

    #[test]
    fn test_decode_data_uri_malformed() {
        let result = decode_data_uri("data:image/png;base64,@@not base64@@");
        assert!(matches!(result, Err(SheetError::Decode(_))));
    }

    #[test]
    fn test_decode_image_invalid() {
        let result = decode_image(b"definitely not an image");
        assert!(matches!(result, Err(SheetError::ImageDecode(_))));
    }

    #[test]
    fn test_dimensions_and_decode() {
        let png = sample_png(40, 25);
        assert_eq!(image_dimensions(&png).unwrap(), (40, 25));
        let decoded = decode_image(&png).unwrap();
        assert_eq!(decoded.width(), 40);
        assert_eq!(decoded.height(), 25);
    }
}
