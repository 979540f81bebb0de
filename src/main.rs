// Web server for wheat leaf disease prediction

mod model;
mod web;

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use anyhow::Context;
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Method, Request, Response, Server, StatusCode};

use model::classifier::WheatClassifier;
use model::provisioner::{ensure_model, DRIVE_FILE_ID, MODEL_FILE};
use model::SharedClassifier;
use web::response_helpers::cors_preflight;
use web::routes;

const DEFAULT_PORT: u16 = 5000;

async fn handle_request(
    req: Request<Body>,
    classifier: SharedClassifier,
) -> Result<Response<Body>, Infallible> {
    match (req.method(), req.uri().path()) {
        (&Method::GET, "/health") => routes::health::handle().await,

        (&Method::POST, "/predict") => routes::predict::handle(req, classifier).await,

        (&Method::OPTIONS, _) => Ok(cors_preflight()),

        _ => Ok(Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from("Not Found"))
            .unwrap()),
    }
}

/// Bind port from the PORT environment variable, defaulting to 5000.
fn bind_port() -> u16 {
    parse_port(std::env::var("PORT").ok())
}

fn parse_port(raw: Option<String>) -> u16 {
    raw.and_then(|p| p.parse().ok()).unwrap_or(DEFAULT_PORT)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Provision and load the model before binding the listener. Requests are
    // only ever served against the already-loaded session.
    let model_path = ensure_model(MODEL_FILE, DRIVE_FILE_ID)?;

    println!("Loading model...");
    let classifier: SharedClassifier = Arc::new(Mutex::new(
        WheatClassifier::load(&model_path)
            .with_context(|| format!("loading model from {}", model_path.display()))?,
    ));
    println!("Model loaded.");

    let make_svc = make_service_fn({
        let classifier = classifier.clone();
        move |_conn| {
            let classifier = classifier.clone();
            async move {
                Ok::<_, Infallible>(service_fn(move |req| {
                    handle_request(req, classifier.clone())
                }))
            }
        }
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], bind_port()));
    let server = Server::bind(&addr).serve(make_svc);

    println!("Wheat disease web server starting on http://{}", addr);
    println!("Available endpoints:");
    println!("  GET  /health   - Health check");
    println!("  POST /predict  - Predict disease from an uploaded leaf image");

    server.await.context("server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_port_default() {
        assert_eq!(parse_port(None), 5000);
    }

    #[test]
    fn test_parse_port_valid() {
        assert_eq!(parse_port(Some("8080".to_string())), 8080);
    }

    #[test]
    fn test_parse_port_garbage_falls_back() {
        assert_eq!(parse_port(Some("not-a-port".to_string())), 5000);
        assert_eq!(parse_port(Some("".to_string())), 5000);
        assert_eq!(parse_port(Some("70000".to_string())), 5000);
    }
}
