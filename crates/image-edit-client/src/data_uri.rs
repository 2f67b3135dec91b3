//! `data:image/...;base64,` helpers.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::EditError;

const DATA_PREFIX: &str = "data:";
const BASE64_MARKER: &str = ";base64,";

/// Mimetype of an image data URI (`data:image/jpeg;base64,...` → `image/jpeg`).
pub fn data_uri_mime(value: &str) -> Option<&str> {
    let rest = value.strip_prefix(DATA_PREFIX)?;
    let end = rest.find(BASE64_MARKER)?;
    let mime = &rest[..end];
    mime.starts_with("image/").then_some(mime)
}

/// Raw base64 payload: strips a leading `data:image/<subtype>;base64,` if present.
pub fn strip_data_uri_prefix(value: &str) -> &str {
    match data_uri_mime(value) {
        Some(mime) => &value[DATA_PREFIX.len() + mime.len() + BASE64_MARKER.len()..],
        None => value,
    }
}

/// Mimetype for an image file path; anything not PNG or WebP is treated as JPEG.
pub fn mime_for_path(path: &str) -> &'static str {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".png") {
        "image/png"
    } else if lower.ends_with(".webp") {
        "image/webp"
    } else {
        "image/jpeg"
    }
}

/// Wraps bytes as `data:<mime>;base64,<payload>`.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("{}{}{}{}", DATA_PREFIX, mime, BASE64_MARKER, BASE64.encode(bytes))
}

/// Decodes the payload of a data URI (or a bare base64 string) into bytes.
pub fn decode_data_uri(value: &str) -> Result<Vec<u8>, EditError> {
    BASE64
        .decode(strip_data_uri_prefix(value).trim().as_bytes())
        .map_err(|e| EditError::Decode(format!("invalid base64 image: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mime_for_path() {
        assert_eq!(mime_for_path("photos/file_1.jpg"), "image/jpeg");
        assert_eq!(mime_for_path("documents/file_2.PNG"), "image/png");
        assert_eq!(mime_for_path("stickers/file_3.webp"), "image/webp");
        assert_eq!(mime_for_path("photos/file_4"), "image/jpeg");
    }

    #[test]
    fn test_strip_jpeg_prefix() {
        assert_eq!(strip_data_uri_prefix("data:image/jpeg;base64,/9j/4AAQ"), "/9j/4AAQ");
        assert_eq!(strip_data_uri_prefix("data:image/png;base64,iVBOR"), "iVBOR");
        assert_eq!(strip_data_uri_prefix("data:image/webp;base64,UklG"), "UklG");
    }

    #[test]
    fn test_bare_base64_untouched() {
        assert_eq!(strip_data_uri_prefix("/9j/4AAQ"), "/9j/4AAQ");
        assert_eq!(strip_data_uri_prefix("data:text/plain;base64,aGk="), "data:text/plain;base64,aGk=");
    }

    #[test]
    fn test_mime() {
        assert_eq!(data_uri_mime("data:image/jpg;base64,xx"), Some("image/jpg"));
        assert_eq!(data_uri_mime("xx"), None);
    }

    #[test]
    fn test_encode_then_decode_bytes() {
        let bytes = vec![0x89, b'P', b'N', b'G', 0, 1, 2];
        let uri = to_data_uri("image/png", &bytes);
        assert!(uri.starts_with("data:image/png;base64,"));
        assert_eq!(decode_data_uri(&uri).unwrap(), bytes);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
    }
}
