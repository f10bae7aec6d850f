use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use log::{error, info};
use serde::{Deserialize, Serialize};
use time::Duration;
use tower_sessions::{Expiry, MemoryStore, Session, SessionManagerLayer};

use crate::error::Error;
use crate::session::{self, Credential};
use crate::summarize::{self, Provider};
use crate::{CaptionTrack, extract_video_id, youtube};

#[derive(Clone)]
pub struct AppState {
    pub client: reqwest::Client,
}

impl AppState {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

/// Build the full application: routes plus the in-memory session layer.
///
/// The session store lives in this process only, so a multi-instance
/// deployment needs sticky sessions.
pub fn app(state: AppState) -> Router {
    let session_store = MemoryStore::default();
    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));

    router(state).layer(session_layer)
}

fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/get_languages", post(get_languages))
        .route("/get_transcript", post(get_transcript))
        .route("/set_api_key", post(set_api_key))
        .with_state(state)
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self {
            Error::Validation(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::Auth(_) => StatusCode::UNAUTHORIZED,
            Error::Upstream(_) => StatusCode::BAD_GATEWAY,
        };
        error!("Request failed ({status}): {self}");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

async fn health() -> impl IntoResponse {
    (StatusCode::OK, "healthy")
}

#[derive(Debug, Deserialize)]
struct LanguagesRequest {
    url: Option<String>,
}

#[derive(Debug, Serialize)]
struct LanguagesResponse {
    languages: Vec<CaptionTrack>,
}

async fn get_languages(
    State(state): State<AppState>,
    Json(req): Json<LanguagesRequest>,
) -> Result<Json<LanguagesResponse>, Error> {
    let video_id = required_video_id(req.url.as_deref())?;
    info!("Listing caption tracks for video {video_id}");

    let languages = youtube::list_tracks(&state.client, &video_id).await?;
    Ok(Json(LanguagesResponse { languages }))
}

#[derive(Debug, Deserialize)]
struct TranscriptRequest {
    url: Option<String>,
    lang_code: Option<String>,
    service: Option<String>,
}

#[derive(Debug, Serialize)]
struct TranscriptResponse {
    transcript: String,
    processed_content: String,
}

async fn get_transcript(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<TranscriptRequest>,
) -> Result<Json<TranscriptResponse>, Error> {
    let video_id = required_video_id(req.url.as_deref())?;
    let lang_code = req
        .lang_code
        .filter(|l| !l.is_empty())
        .ok_or_else(|| Error::Validation("no language code provided".to_string()))?;
    let service: Provider = req.service.as_deref().unwrap_or("gemini").parse()?;

    // Resolve the credential before touching the network, so a missing key is
    // reported without spending a caption fetch.
    let credential = session::load_credential(&session)
        .await?
        .filter(|c| c.service == service)
        .ok_or_else(|| {
            Error::Auth(format!("no API key found for {service}; please set an API key first"))
        })?;

    info!("Processing video {video_id}: lang={lang_code} service={service}");

    let transcript = youtube::fetch_text(&state.client, &video_id, &lang_code).await?;
    let summary = summarize::summarize(&state.client, service, &credential.api_key, &transcript).await?;

    info!("Transcript and summary ready for video {video_id}");
    Ok(Json(TranscriptResponse {
        transcript,
        processed_content: summary,
    }))
}

#[derive(Debug, Deserialize)]
struct ApiKeyRequest {
    service: Option<String>,
    api_key: Option<String>,
}

#[derive(Debug, Serialize)]
struct MessageResponse {
    message: String,
}

async fn set_api_key(
    session: Session,
    Json(req): Json<ApiKeyRequest>,
) -> Result<Json<MessageResponse>, Error> {
    let (Some(service), Some(api_key)) = (req.service, req.api_key) else {
        return Err(Error::Validation("service and API key are required".to_string()));
    };
    if api_key.trim().is_empty() {
        return Err(Error::Validation("service and API key are required".to_string()));
    }

    let provider: Provider = service.parse()?;
    session::save_credential(
        &session,
        Credential {
            service: provider,
            api_key,
        },
    )
    .await?;

    info!("Saved {provider} API key for session");
    Ok(Json(MessageResponse {
        message: format!("{} API key set successfully", provider.title()),
    }))
}

fn required_video_id(url: Option<&str>) -> Result<String, Error> {
    let url = url
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| Error::Validation("no URL provided".to_string()))?;
    extract_video_id(url).ok_or_else(|| Error::Validation("invalid YouTube URL format".to_string()))
}
