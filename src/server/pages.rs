use super::api::{ find_session, rejection_response };
use super::{ dispatch_send, views, AppState };
use crate::models::chat::{ Language, QuickAction };

use axum::{
    extract::{ Form, Path, Query, State },
    response::{ Html, IntoResponse, Redirect, Response },
};
use log::info;
use serde::Deserialize;
use uuid::Uuid;

fn back_to(id: &Uuid) -> Response {
    Redirect::to(&format!("/chat/{}", id)).into_response()
}

pub async fn home_handler(State(state): State<AppState>) -> Html<String> {
    let content = state.content.current().await;
    Html(views::home_page(&content).into_string())
}

#[derive(Deserialize, Default)]
pub struct SignupQuery {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

pub async fn signup_handler(
    State(state): State<AppState>,
    Query(query): Query<SignupQuery>
) -> Html<String> {
    let content = state.content.current().await;
    Html(views::signup_page(&content, &query.name, &query.email).into_string())
}

pub async fn new_chat_page_handler(State(state): State<AppState>) -> Response {
    let (id, session) = state.sessions.create().await;
    session.lock().await.check_api_status(state.client.as_ref()).await;
    info!("Opened chat page session {}", id);
    back_to(&id)
}

#[derive(Deserialize)]
pub struct ChatPageQuery {
    pub quick: Option<String>,
}

pub async fn chat_page_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<ChatPageQuery>
) -> Response {
    let session = match find_session(&state, &id).await {
        Ok(s) => s,
        Err(resp) => {
            return resp;
        }
    };
    let prefill = query.quick.as_deref().and_then(QuickAction::from_slug).map(|a| a.prompt());
    let session = session.lock().await;
    Html(views::chat_page(id, &session, prefill).into_string()).into_response()
}

#[derive(Deserialize)]
pub struct SendForm {
    #[serde(default)]
    pub message: String,
}

pub async fn send_form_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<SendForm>
) -> Response {
    let session = match find_session(&state, &id).await {
        Ok(s) => s,
        Err(resp) => {
            return resp;
        }
    };
    session.lock().await.set_draft("");
    match dispatch_send(&state, session, form.message).await {
        Ok(_) => back_to(&id),
        Err(rejection) => rejection_response(rejection),
    }
}

pub async fn new_conversation_form_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>
) -> Response {
    match find_session(&state, &id).await {
        Ok(session) => {
            session.lock().await.new_chat();
            back_to(&id)
        }
        Err(resp) => resp,
    }
}

#[derive(Deserialize)]
pub struct LanguageForm {
    pub language: Language,
}

pub async fn language_form_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Form(form): Form<LanguageForm>
) -> Response {
    match find_session(&state, &id).await {
        Ok(session) => {
            session.lock().await.set_language(form.language);
            back_to(&id)
        }
        Err(resp) => resp,
    }
}

pub async fn steps_form_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match find_session(&state, &id).await {
        Ok(session) => {
            session.lock().await.toggle_processing_steps();
            back_to(&id)
        }
        Err(resp) => resp,
    }
}

pub async fn sidebar_form_handler(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match find_session(&state, &id).await {
        Ok(session) => {
            session.lock().await.toggle_sidebar();
            back_to(&id)
        }
        Err(resp) => resp,
    }
}

pub async fn select_conversation_form_handler(
    State(state): State<AppState>,
    Path((id, conv)): Path<(Uuid, String)>
) -> Response {
    match find_session(&state, &id).await {
        Ok(session) => {
            session.lock().await.select_conversation(&conv);
            back_to(&id)
        }
        Err(resp) => resp,
    }
}
