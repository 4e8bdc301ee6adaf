use base64::{engine::general_purpose, Engine as _};

pub const DEFAULT_REFERENCE_MIME: &str = "image/jpeg";

/// Returns the payload after the data-URL header. Values without a header pass through.
pub fn strip_data_url_header(value: &str) -> &str {
    value
        .split_once(',')
        .map(|(_, data)| data)
        .unwrap_or(value)
        .trim()
}

pub fn data_url_mime_type(value: &str) -> Option<&str> {
    let (header, _) = value.split_once(',')?;
    let header = header.strip_prefix("data:")?;
    let mime = header.split(';').next()?.trim();
    if mime.is_empty() {
        None
    } else {
        Some(mime)
    }
}

pub fn to_data_url(mime_type: &str, base64_data: &str) -> String {
    format!("data:{mime_type};base64,{base64_data}")
}

/// Encodes raw image bytes, sniffing the mime type from the content.
pub fn encode_data_url(bytes: &[u8]) -> String {
    let mime_type = infer::get(bytes)
        .map(|kind| kind.mime_type())
        .filter(|mime| mime.starts_with("image/"))
        .unwrap_or(DEFAULT_REFERENCE_MIME);
    to_data_url(mime_type, &general_purpose::STANDARD.encode(bytes))
}

pub fn decode_data_url(value: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(strip_data_url_header(value))
}

pub fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" | "image/jpg" => "jpg",
        "image/webp" => "webp",
        "image/gif" => "gif",
        _ => "png",
    }
}
