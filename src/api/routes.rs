use axum::{
    routing::{get, post},
    Router,
    extract::{multipart::MultipartError, DefaultBodyLimit, Json, Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use validator::Validate;

use crate::api::models::{
    AnalyzeRequest, ChatRequest, ChatResponse, DraftRequest, DraftResponse, HealthResponse,
    ImportantInfoRequest, NextStepsRequest, NextStepsResponse, SimplifyRequest, TranslateRequest,
    TranslateResponse, TtsRequest, UploadQuery,
};
use crate::api::response::UploadError;
use crate::assistant::AnalysisRequest;
use crate::document::DocumentContent;
use crate::error::{AppError, Result};
use crate::normalize::{DocumentAnalysis, ImportantInfo, SimplifyResult};
use crate::AppState;

pub fn create_router(app_state: AppState) -> Router {
    let upload_limit = app_state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health_handler))
        .route("/analyze_doc", post(analyze_handler))
        .route("/analyze_doc/upload", post(upload_handler))
        .route("/simplify", post(simplify_handler))
        .route("/translate", post(translate_handler))
        .route("/next_steps", post(next_steps_handler))
        .route("/draft_response", post(draft_response_handler))
        .route("/important_info", post(important_info_handler))
        .route("/chat", post(chat_handler))
        .route("/tts", post(tts_handler))
        .layer(DefaultBodyLimit::max(upload_limit))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(app_state)
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn analyze_handler(
    State(state): State<AppState>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<DocumentAnalysis>> {
    req.validate()?;
    let request = req.into_analysis_request()?;
    let analysis = state.assistant.analyze(request, None).await?;
    Ok(Json(analysis))
}

async fn upload_handler(
    State(state): State<AppState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> std::result::Result<Json<DocumentAnalysis>, UploadError> {
    let (bytes, content_type) = read_upload(&mut multipart).await?;
    tracing::info!(%content_type, size = bytes.len(), "document uploaded");

    let request = AnalysisRequest {
        content: DocumentContent::Bytes(bytes),
        is_image: content_type.starts_with("image/"),
        mime_type: content_type,
    };
    let analysis = state.assistant.analyze(request, query.model.as_deref()).await?;
    Ok(Json(analysis))
}

/// Pulls the `file` part out of the form, insisting on a declared content type.
async fn read_upload(multipart: &mut Multipart) -> Result<(Vec<u8>, String)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Invalid multipart body", e))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let content_type = field
            .content_type()
            .map(str::to_string)
            .ok_or_else(|| AppError::Validation("Missing content type".to_string()))?;
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read upload", e))?;

        return Ok((bytes.to_vec(), content_type));
    }

    Err(AppError::Validation("Missing file field".to_string()))
}

fn multipart_error(context: &str, err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("Upload exceeds the size limit: {}", err.body_text()))
    } else {
        AppError::Validation(format!("{}: {}", context, err.body_text()))
    }
}

async fn simplify_handler(
    State(state): State<AppState>,
    Json(req): Json<SimplifyRequest>,
) -> Result<Json<SimplifyResult>> {
    req.validate()?;
    let result = state
        .assistant
        .simplify(&req.selected_text, &req.document_context, req.model.as_deref())
        .await?;
    Ok(Json(result))
}

async fn translate_handler(
    State(state): State<AppState>,
    Json(req): Json<TranslateRequest>,
) -> Result<Json<TranslateResponse>> {
    req.validate()?;
    let translated_text = state.assistant.translate(&req.text, &req.target_language).await?;
    Ok(Json(TranslateResponse { translated_text }))
}

async fn next_steps_handler(
    State(state): State<AppState>,
    Json(req): Json<NextStepsRequest>,
) -> Result<Json<NextStepsResponse>> {
    req.validate()?;
    let steps = state.assistant.next_steps(&req.form_context).await?;
    Ok(Json(NextStepsResponse { steps }))
}

async fn draft_response_handler(
    State(state): State<AppState>,
    Json(req): Json<DraftRequest>,
) -> Result<Json<DraftResponse>> {
    req.validate()?;
    let draft = state
        .assistant
        .draft_response(&req.document_type, &req.document_context, &req.language)
        .await?;
    Ok(Json(DraftResponse { draft }))
}

async fn important_info_handler(
    State(state): State<AppState>,
    Json(req): Json<ImportantInfoRequest>,
) -> Result<Json<ImportantInfo>> {
    req.validate()?;
    let info = state.assistant.important_info(&req.document_context).await?;
    Ok(Json(info))
}

async fn chat_handler(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>> {
    req.validate()?;
    let answer = state.assistant.chat(&req.question, &req.document_context).await?;
    Ok(Json(ChatResponse { answer }))
}

async fn tts_handler(
    State(state): State<AppState>,
    Json(req): Json<TtsRequest>,
) -> Result<Response> {
    req.validate()?;
    let clip = state.speech.synthesize(req.into()).await?;
    Ok(([(header::CONTENT_TYPE, clip.media_type)], clip.bytes).into_response())
}
