/// Prediction route handler.
///
/// POST /predict  multipart/form-data, file field `file` = image bytes
/// Returns 200 {"prediction": "<label>"} on success,
/// 400 for a missing or unselected file, 500 for anything that goes wrong
/// between decoding and inference.

use std::convert::Infallible;

use hyper::{Body, Request, Response, StatusCode};
use serde::Serialize;

use crate::model::SharedClassifier;
use crate::web::request_parsing::{find_part, multipart_boundary, parse_multipart};
use crate::web::response_helpers::{json_error, json_response};
use crate::{log_debug, log_error, log_info};

#[derive(Serialize)]
struct PredictionResponse {
    prediction: String,
}

pub async fn handle(
    req: Request<Body>,
    classifier: SharedClassifier,
) -> Result<Response<Body>, Infallible> {
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|h| h.to_str().ok())
        .unwrap_or("")
        .to_string();

    let body_bytes = match hyper::body::to_bytes(req.into_body()).await {
        Ok(bytes) => bytes,
        Err(_) => {
            return Ok(json_error(
                StatusCode::BAD_REQUEST,
                "Failed to read request body",
            ));
        }
    };
    log_debug!("[PREDICT] Received request ({} bytes)", body_bytes.len());

    let parts = match multipart_boundary(&content_type) {
        Some(boundary) => parse_multipart(&body_bytes, &boundary),
        None => Vec::new(),
    };

    // A form field only counts as an upload when it carries a filename
    let file = match find_part(&parts, "file") {
        Some(part) if part.filename.is_some() => part,
        _ => {
            log_debug!("[PREDICT] No file field in request");
            return Ok(json_error(StatusCode::BAD_REQUEST, "No file uploaded"));
        }
    };

    let filename = file.filename.clone().unwrap_or_default();
    if filename.is_empty() {
        log_debug!("[PREDICT] Empty filename");
        return Ok(json_error(StatusCode::BAD_REQUEST, "No file selected"));
    }

    // Everything from decode through inference collapses into one generic
    // error at this boundary; the cause only goes to the log.
    let image_bytes = file.data.clone();
    let result = tokio::task::spawn_blocking(move || {
        let mut guard = classifier.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.predict(&image_bytes)
    })
    .await;

    match result {
        Ok(Ok(label)) => {
            log_info!("[PREDICT] {} -> {}", filename, label);
            Ok(json_response(
                StatusCode::OK,
                &PredictionResponse { prediction: label },
            ))
        }
        Ok(Err(e)) => {
            log_error!("[PREDICT] {}: {}", filename, e);
            Ok(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process image",
            ))
        }
        Err(e) => {
            log_error!("[PREDICT] inference task panicked: {}", e);
            Ok(json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to process image",
            ))
        }
    }
}
