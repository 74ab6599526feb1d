pub mod api;
pub mod pages;
pub mod views;

use crate::backend::BackendClient;
use crate::chat::store::{ SessionStore, SharedSession };
use crate::cli::ServeArgs;
use crate::config::SiteContentStore;
use crate::models::chat::ChatMessage;

use std::error::Error;
use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

use axum::{ routing::{ get, post }, Router };
use governor::{ RateLimiter, Quota, state::{ InMemoryState, NotKeyed }, clock::DefaultClock };
use lazy_static::lazy_static;
use log::{ info, warn, error };
use tower_http::cors::{ Any, CorsLayer };
use tower_http::services::ServeDir;

lazy_static! {
    static ref CHAT_LIMITER: RateLimiter<NotKeyed, InMemoryState, DefaultClock> = RateLimiter::direct(
        Quota::per_second(NonZeroU32::new(10).unwrap())
    );
}

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<dyn BackendClient>,
    pub sessions: Arc<SessionStore>,
    pub content: Arc<SiteContentStore>,
}

#[derive(Debug, PartialEq, Eq)]
pub enum SendRejection {
    RateLimited,
    Busy,
    Internal,
}

/// Sends `text` on behalf of a web session. The session is only locked to record the user line
/// and to append the reply, so readers see the pending state while the backend answers. The
/// round trip runs in its own task so a dropped request cannot leave the session pending.
pub async fn dispatch_send(
    state: &AppState,
    session: SharedSession,
    text: String
) -> Result<Option<ChatMessage>, SendRejection> {
    if CHAT_LIMITER.check().is_err() {
        warn!("Chat rate limit exceeded, rejecting message");
        return Err(SendRejection::RateLimited);
    }

    let request = {
        let mut guard = session.lock().await;
        if guard.is_bot_typing() {
            return Err(SendRejection::Busy);
        }
        match guard.begin_send(&text) {
            Some(request) => request,
            None => {
                return Ok(None);
            }
        }
    };

    let client = state.client.clone();
    let task = tokio::spawn(async move {
        let result = client.send_message(request).await;
        let reply = session.lock().await.finish_send(&text, result);
        reply
    });
    task.await.map(Some).map_err(|e| {
        error!("Chat task failed: {}", e);
        SendRejection::Internal
    })
}

pub fn build_router(state: AppState, assets_dir: &str) -> Router {
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);

    Router::new()
        .route("/", get(pages::home_handler))
        .route("/signup", get(pages::signup_handler))
        .route("/chat", get(pages::new_chat_page_handler))
        .route("/chat/{id}", get(pages::chat_page_handler))
        .route("/chat/{id}/send", post(pages::send_form_handler))
        .route("/chat/{id}/new", post(pages::new_conversation_form_handler))
        .route("/chat/{id}/language", post(pages::language_form_handler))
        .route("/chat/{id}/steps", post(pages::steps_form_handler))
        .route("/chat/{id}/sidebar", post(pages::sidebar_form_handler))
        .route("/chat/{id}/conversations/{conv}", post(pages::select_conversation_form_handler))
        .route("/api/data", get(api::data_handler))
        .route("/api/status", get(api::status_handler))
        .route("/api/sessions", post(api::create_session_handler))
        .route("/api/sessions/{id}", get(api::session_handler))
        .route("/api/sessions/{id}/messages", post(api::send_message_handler))
        .route("/api/sessions/{id}/language", post(api::language_handler))
        .route("/api/sessions/{id}/steps", post(api::steps_handler))
        .route("/api/reload-content", get(api::reload_content_handler))
        .nest_service("/images", ServeDir::new(assets_dir))
        .layer(cors)
        .with_state(state)
}

pub struct Server {
    args: ServeArgs,
    state: AppState,
}

impl Server {
    pub fn new(
        args: ServeArgs,
        client: Arc<dyn BackendClient>,
        content: Arc<SiteContentStore>
    ) -> Self {
        let sessions = Arc::new(SessionStore::new(args.max_sessions, args.language));
        Self {
            args,
            state: AppState { client, sessions, content },
        }
    }

    pub async fn run(&self) -> Result<(), Box<dyn Error + Send + Sync>> {
        let addr = self.args.server_addr.parse::<SocketAddr>()?;
        let app = build_router(self.state.clone(), &self.args.assets_dir);

        if self.args.enable_tls {
            let (cert_path, key_path) = match (&self.args.tls_cert_path, &self.args.tls_key_path) {
                (Some(cert), Some(key)) => (cert, key),
                (Some(_), None) | (None, Some(_)) => {
                    error!("Both --tls-cert-path and --tls-key-path must be provided to enable TLS.");
                    return Err("Missing TLS certificate or key path".into());
                }
                (None, None) => {
                    error!("--enable-tls was set but no certificate/key paths provided.");
                    return Err("TLS enabled without cert/key".into());
                }
            };
            info!(
                "TLS enabled. Loading certificate from '{}' and key from '{}'",
                cert_path,
                key_path
            );
            let tls_config = axum_server::tls_rustls::RustlsConfig::from_pem_file(
                cert_path,
                key_path
            ).await?;

            info!("HTTPS server listening on: https://{}", addr);
            axum_server::bind_rustls(addr, tls_config).serve(app.into_make_service()).await?;
        } else {
            let listener = tokio::net::TcpListener::bind(addr).await.map_err(|e| {
                error!("Failed to bind HTTP server to {}: {}. Try a different port.", addr, e);
                e
            })?;
            info!("HTTP server listening on: http://{}", addr);
            axum::serve(listener, app.into_make_service()).await?;
        }

        Ok(())
    }
}
