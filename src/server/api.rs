use super::{ dispatch_send, AppState, SendRejection };
use crate::chat::store::SharedSession;
use crate::chat::ChatSession;
use crate::models::chat::{ ApiStatus, ChatMessage, Language };

use axum::{
    extract::{ Path, State },
    http::StatusCode,
    response::{ IntoResponse, Response },
    Json,
};
use log::{ info, warn };
use serde::{ Deserialize, Serialize };
use uuid::Uuid;

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
}

pub(crate) fn error_response(code: StatusCode, message: &str) -> Response {
    (code, Json(ErrorBody { success: false, error: message.to_string() })).into_response()
}

pub(crate) fn rejection_response(rejection: SendRejection) -> Response {
    match rejection {
        SendRejection::RateLimited =>
            error_response(StatusCode::TOO_MANY_REQUESTS, "Too many messages, slow down"),
        SendRejection::Busy =>
            error_response(StatusCode::CONFLICT, "A reply is already pending for this session"),
        SendRejection::Internal =>
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Chat task failed"),
    }
}

pub(crate) async fn find_session(state: &AppState, id: &Uuid) -> Result<SharedSession, Response> {
    state.sessions
        .get(id).await
        .ok_or_else(|| error_response(StatusCode::NOT_FOUND, "Unknown chat session"))
}

#[derive(Serialize)]
struct SessionSnapshot<'a> {
    id: Uuid,
    #[serde(flatten)]
    session: &'a ChatSession,
}

fn snapshot(id: Uuid, session: &ChatSession) -> Response {
    Json(SessionSnapshot { id, session }).into_response()
}

pub async fn data_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.content.current().await.data.clone())
}

#[derive(Serialize)]
struct StatusBody {
    status: ApiStatus,
    backend: String,
}

pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let status = match state.client.health().await {
        Ok(_) => ApiStatus::Online,
        Err(e) => {
            warn!("Backend health check failed: {}", e);
            ApiStatus::Offline
        }
    };
    Json(StatusBody { status, backend: state.client.base_url().to_string() })
}

pub async fn create_session_handler(State(state): State<AppState>) -> Response {
    let (id, session) = state.sessions.create().await;
    let mut session = session.lock().await;
    session.check_api_status(state.client.as_ref()).await;
    info!("Created chat session {}", id);
    (StatusCode::CREATED, snapshot(id, &session)).into_response()
}

pub async fn session_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let session = match find_session(&state, &id).await {
        Ok(s) => s,
        Err(resp) => {
            return resp;
        }
    };
    let session = session.lock().await;
    snapshot(id, &session)
}

#[derive(Deserialize)]
pub struct SendRequest {
    pub message: String,
}

#[derive(Serialize)]
struct SendResponse {
    success: bool,
    reply: ChatMessage,
}

pub async fn send_message_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<SendRequest>
) -> Response {
    let session = match find_session(&state, &id).await {
        Ok(s) => s,
        Err(resp) => {
            return resp;
        }
    };

    match dispatch_send(&state, session, req.message).await {
        Ok(Some(reply)) => Json(SendResponse { success: true, reply }).into_response(),
        Ok(None) => error_response(StatusCode::UNPROCESSABLE_ENTITY, "Message is empty"),
        Err(rejection) => rejection_response(rejection),
    }
}

#[derive(Deserialize)]
pub struct LanguageRequest {
    pub language: Language,
}

#[derive(Serialize)]
struct LanguageResponse {
    language: Language,
    notice: Option<ChatMessage>,
}

pub async fn language_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<LanguageRequest>
) -> Response {
    let session = match find_session(&state, &id).await {
        Ok(s) => s,
        Err(resp) => {
            return resp;
        }
    };
    let mut session = session.lock().await;
    let notice = session.set_language(req.language);
    Json(LanguageResponse { language: session.language(), notice }).into_response()
}

#[derive(Serialize)]
struct StepsResponse {
    show_processing_steps: bool,
}

pub async fn steps_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    let session = match find_session(&state, &id).await {
        Ok(s) => s,
        Err(resp) => {
            return resp;
        }
    };
    let show = session.lock().await.toggle_processing_steps();
    Json(StepsResponse { show_processing_steps: show }).into_response()
}

#[derive(Serialize)]
struct ReloadResponse {
    success: bool,
    message: String,
}

pub async fn reload_content_handler(State(state): State<AppState>) -> impl IntoResponse {
    let (code, success, message) = match state.content.reload_if_changed().await {
        Ok(true) => (StatusCode::OK, true, "Site content reloaded".to_string()),
        Ok(false) => (StatusCode::OK, true, "Site content unchanged".to_string()),
        Err(e) => {
            warn!("Site content reload failed: {}", e);
            (StatusCode::BAD_REQUEST, false, format!("Reload error: {}", e))
        }
    };
    (code, Json(ReloadResponse { success, message }))
}
