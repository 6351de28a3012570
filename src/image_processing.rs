use anyhow::{Result, anyhow};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Raw image bytes recovered from an inline reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

pub fn is_data_url(url: &str) -> bool {
    url.starts_with("data:")
}

/// Decodes a `data:<mime>;base64,<payload>` reference.
///
/// The content type comes from sniffing the bytes; the declared type is only used
/// when the format is not recognised.
pub fn decode_data_url(url: &str) -> Result<DecodedImage> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| anyhow!("not a data URL"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| anyhow!("data URL has no payload"))?;
    let declared = header
        .strip_suffix(";base64")
        .ok_or_else(|| anyhow!("data URL is not base64 encoded"))?;
    let bytes = STANDARD
        .decode(payload.trim())
        .map_err(|err| anyhow!("invalid base64 payload: {err}"))?;
    if bytes.is_empty() {
        return Err(anyhow!("data URL payload is empty"));
    }

    let mime_type = match image::guess_format(&bytes) {
        Ok(format) => format.to_mime_type().to_string(),
        Err(_) if declared.starts_with("image/") => declared.to_string(),
        Err(_) => return Err(anyhow!("payload is not a recognised image")),
    };
    Ok(DecodedImage { mime_type, bytes })
}

pub fn get_extension_from_mime_type(mime_type: &str) -> &str {
    match mime_type.to_lowercase().as_str() {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/png" => "png",
        "image/webp" => "webp",
        "image/gif" => "gif",
        "image/bmp" => "bmp",
        _ => "bin",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn sniffed_format_wins_over_declared_type() {
        let url = format!("data:image/jpeg;base64,{}", STANDARD.encode(PNG_SIGNATURE));
        let decoded = decode_data_url(&url).unwrap();
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.bytes, PNG_SIGNATURE);
    }

    #[test]
    fn unknown_bytes_keep_declared_image_type() {
        let url = format!("data:image/webp;base64,{}", STANDARD.encode(b"opaque"));
        assert_eq!(decode_data_url(&url).unwrap().mime_type, "image/webp");

        let text = format!("data:text/plain;base64,{}", STANDARD.encode(b"opaque"));
        assert!(decode_data_url(&text).is_err());
    }

    #[test]
    fn rejects_malformed_references() {
        assert!(decode_data_url("https://example.com/a.png").is_err());
        assert!(decode_data_url("data:image/png;base64").is_err());
        assert!(decode_data_url("data:image/png,plain").is_err());
        assert!(decode_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn maps_mime_to_extension() {
        assert_eq!(get_extension_from_mime_type("IMAGE/PNG"), "png");
        assert_eq!(get_extension_from_mime_type("image/jpg"), "jpg");
        assert_eq!(get_extension_from_mime_type("application/pdf"), "bin");
    }
}
