use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::application::use_cases::substitution::count_placeholders;
use crate::application::GenerateUseCase;
use crate::domain::dataset::DatasetSummary;
use crate::domain::error::{AppError, Result};
use crate::infrastructure::config::AppConfig;

pub struct HttpState {
    pub generate_use_case: Arc<GenerateUseCase>,
    /// Deepest nesting accepted in a request body
    pub max_depth: usize,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub rows: usize,
    pub pools: DatasetSummary,
}

#[post("/generate")]
async fn generate(data: web::Data<HttpState>, body: web::Bytes) -> impl Responder {
    // Decoded here, once; the engine only ever sees a well-formed tree.
    let document = match decode_document(&body, data.max_depth) {
        Ok(document) => document,
        Err(err) => {
            warn!(error = %err, bytes = body.len(), "Rejected request body");
            return HttpResponse::BadRequest().json(json!({
                "error": "Invalid request body",
                "detail": err.to_string(),
            }));
        }
    };

    debug!(
        placeholders = count_placeholders(&document),
        "Filling placeholders"
    );

    HttpResponse::Ok().json(data.generate_use_case.execute(&document))
}

/// Decode a request body into a JSON tree.
///
/// serde_json's fixed 128-level recursion limit is lifted; nesting is instead
/// bounded by `max_depth`, checked on the raw bytes before any recursive
/// decoding starts.
fn decode_document(body: &[u8], max_depth: usize) -> Result<Value> {
    let depth = nesting_depth(body);
    if depth > max_depth {
        return Err(AppError::DecodeError(format!(
            "document nests {} levels deep, limit is {}",
            depth, max_depth
        )));
    }

    let mut deserializer = serde_json::Deserializer::from_slice(body);
    deserializer.disable_recursion_limit();
    let document = Value::deserialize(&mut deserializer)?;
    deserializer.end()?;
    Ok(document)
}

/// Deepest array/object nesting in raw JSON text. Brackets inside string
/// literals are skipped; malformed input is left for the decoder to reject.
fn nesting_depth(body: &[u8]) -> usize {
    let mut depth = 0usize;
    let mut deepest = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for &byte in body {
        if in_string {
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
            continue;
        }

        match byte {
            b'"' => in_string = true,
            b'[' | b'{' => {
                depth += 1;
                deepest = deepest.max(depth);
            }
            b']' | b'}' => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    deepest
}

#[get("/health")]
async fn health(data: web::Data<HttpState>) -> impl Responder {
    let pools = data.generate_use_case.dataset().summary();
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        rows: pools.rows,
        pools,
    })
}

/// Routes shared by the server and the tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(generate).service(health);
}

pub fn start_server(
    generate_use_case: Arc<GenerateUseCase>,
    config: &AppConfig,
) -> std::io::Result<Server> {
    let state = web::Data::new(HttpState {
        generate_use_case,
        max_depth: config.max_depth,
    });
    let payload_limit = config.max_body_bytes;

    let mut server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Allow all origins for local tool

        App::new()
            .wrap(cors)
            .app_data(state.clone())
            .app_data(web::PayloadConfig::new(payload_limit))
            .configure(configure)
    });
    if let Some(workers) = config.workers {
        server = server.workers(workers);
    }

    let server = server.bind(config.bind_address())?.run();
    info!(
        host = %config.host,
        port = config.port,
        "Placeholder service listening"
    );

    Ok(server)
}
