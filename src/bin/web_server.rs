//! Web server exposing the steganography pipeline over HTTP.

use axum::{
    extract::{multipart::Multipart, DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose, Engine as _};
use clap::Parser;
use log::{error, info};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use uuid::Uuid;

use rsa_stego::config::WebConfig;
use rsa_stego::pipeline::{decode_plain, encode_plain};
use rsa_stego::StegoError;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/web.toml")]
    config: String,
}

#[derive(Error, Debug)]
enum ApiError {
    #[error("No file part")]
    MissingImage,

    #[error("No selected file")]
    EmptyFilename,

    #[error("File type not allowed")]
    DisallowedExtension,

    #[error("No message provided")]
    EmptyMessage,

    #[error("Uploaded file exceeds the size limit")]
    UploadTooLarge,

    #[error("Invalid multipart request: {0}")]
    Multipart(String),

    #[error("Invalid image: {0}")]
    Image(#[from] image::ImageError),

    #[error("{0}")]
    Stego(#[from] StegoError),

    #[error("Internal error: {0}")]
    Internal(#[from] std::io::Error),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::MissingImage
            | ApiError::EmptyFilename
            | ApiError::DisallowedExtension
            | ApiError::EmptyMessage
            | ApiError::UploadTooLarge
            | ApiError::Multipart(_)
            | ApiError::Image(_) => StatusCode::BAD_REQUEST,
            ApiError::Stego(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!("request failed: {}", self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct EncodeResponse {
    message: String,
    output_image: String,
    output_image_base64: String,
}

#[derive(Serialize)]
struct DecodeResponse {
    message: String,
    decoded_text: String,
}

struct AppState {
    config: WebConfig,
}

/// The `image` field of a multipart request, validated against the
/// upload policy.
struct Upload {
    filename: String,
    data: Vec<u8>,
}

async fn read_upload(
    multipart: &mut Multipart,
    state: &AppState,
) -> Result<(Option<Upload>, Option<String>), ApiError> {
    let mut upload = None;
    let mut message = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Multipart(e.to_string()))?
    {
        match field.name().unwrap_or("") {
            "image" => {
                let filename = field.file_name().unwrap_or("").to_string();
                if filename.is_empty() {
                    return Err(ApiError::EmptyFilename);
                }
                if !state.config.uploads.is_allowed(&filename) {
                    return Err(ApiError::DisallowedExtension);
                }
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Multipart(e.to_string()))?;
                if data.len() > state.config.uploads.max_upload_bytes {
                    return Err(ApiError::UploadTooLarge);
                }
                upload = Some(Upload {
                    filename: sanitize_filename(&filename),
                    data: data.to_vec(),
                });
            }
            "message" => {
                message = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| ApiError::Multipart(e.to_string()))?,
                );
            }
            _ => {}
        }
    }

    Ok((upload, message))
}

/// Reduce a client-supplied filename to its final path component.
fn sanitize_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload".to_string())
}

async fn encode_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (upload, message) = read_upload(&mut multipart, &state).await?;
    let upload = upload.ok_or(ApiError::MissingImage)?;
    let message = message
        .filter(|m| !m.is_empty())
        .ok_or(ApiError::EmptyMessage)?;

    info!(
        "encode request: {} ({} bytes, {} chars)",
        upload.filename,
        upload.data.len(),
        message.chars().count()
    );

    let carrier = image::load_from_memory(&upload.data)?.to_rgb8();
    let stego = encode_plain(&carrier, &message)?;

    // Output is always PNG: a lossy format would destroy the LSBs.
    let stem = Path::new(&upload.filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "image".to_string());
    let output_name = format!("encoded_{}_{}.png", Uuid::new_v4(), stem);
    let output_path = Path::new(&state.config.uploads.folder).join(&output_name);

    let mut png_bytes = Vec::new();
    stego.write_to(
        &mut std::io::Cursor::new(&mut png_bytes),
        image::ImageFormat::Png,
    )?;
    tokio::fs::write(&output_path, &png_bytes).await?;

    info!("encoded image written to {}", output_path.display());

    Ok(Json(EncodeResponse {
        message: "Image encoded successfully".to_string(),
        output_image: output_path.to_string_lossy().into_owned(),
        output_image_base64: general_purpose::STANDARD.encode(&png_bytes),
    }))
}

async fn decode_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let (upload, _) = read_upload(&mut multipart, &state).await?;
    let upload = upload.ok_or(ApiError::MissingImage)?;

    info!(
        "decode request: {} ({} bytes)",
        upload.filename,
        upload.data.len()
    );

    let stego = image::load_from_memory(&upload.data)?.to_rgb8();
    let decoded_text = decode_plain(&stego)?;

    Ok(Json(DecodeResponse {
        message: "Image decoded successfully".to_string(),
        decoded_text,
    }))
}

async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "rsa-stego-api",
    }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = WebConfig::from_file(&args.config)?;

    tokio::fs::create_dir_all(&config.uploads.folder).await?;

    let body_limit = config.uploads.max_upload_bytes + 64 * 1024;
    let uploads_dir = config.uploads.folder.clone();
    let address = config.server.address.clone();

    let state = Arc::new(AppState { config });

    let app = Router::new()
        .route("/encode", post(encode_handler))
        .route("/decode", post(decode_handler))
        .route("/health", get(health_check))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .with_state(state);

    info!("web server running on http://{}", address);

    let listener = tokio::net::TcpListener::bind(&address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
