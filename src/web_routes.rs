use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tracing::warn;

use crate::image_processing::{decode_data_url, get_extension_from_mime_type, is_data_url};
use crate::storage::compute_hash;
use crate::studio::Studio;

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(ErrorResponse { error: message.to_string() })).into_response()
}

/// Weak comparison against an `If-None-Match` value, which may list several tags.
fn etag_matches(if_none_match: &str, etag: &str) -> bool {
    if_none_match.split(',').map(str::trim).any(|candidate| {
        candidate == "*" || candidate.strip_prefix("W/").unwrap_or(candidate) == etag
    })
}

/// Serves a saved gallery image as a download.
pub async fn download_image(
    State(studio): State<Arc<Studio>>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Response {
    let image = match studio.gallery().get(&id).await {
        Some(image) => image,
        None => return json_error(StatusCode::NOT_FOUND, "image not found"),
    };
    if !is_data_url(&image.url) {
        return Redirect::temporary(&image.url).into_response();
    }
    let decoded = match decode_data_url(&image.url) {
        Ok(decoded) => decoded,
        Err(err) => {
            warn!(id = %image.id, error = %err, "stored image reference is not decodable");
            return json_error(StatusCode::UNPROCESSABLE_ENTITY, "stored image is not decodable");
        }
    };

    let etag = format!("\"{}\"", compute_hash(&decoded.bytes));
    let not_modified = headers
        .get(header::IF_NONE_MATCH)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| etag_matches(value, &etag));
    if not_modified {
        return StatusCode::NOT_MODIFIED.into_response();
    }

    let ext = get_extension_from_mime_type(&decoded.mime_type);
    let disposition = format!("attachment; filename=\"generated-image-{}.{ext}\"", image.id);
    let mut response = decoded.bytes.into_response();
    let response_headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&decoded.mime_type) {
        response_headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response_headers.insert(header::ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(&disposition) {
        response_headers.insert(header::CONTENT_DISPOSITION, value);
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn if_none_match_accepts_lists_and_weak_tags() {
        let etag = "\"abc\"";
        assert!(etag_matches("\"abc\"", etag));
        assert!(etag_matches("\"old\", W/\"abc\"", etag));
        assert!(etag_matches("*", etag));
        assert!(!etag_matches("\"old\",\"other\"", etag));
        assert!(!etag_matches("abc", etag));
    }
}
