use async_trait::async_trait;
use log::{ debug, info, error };
use reqwest::{ Client as HttpClient, header::{ HeaderMap, HeaderValue, CONTENT_TYPE, ACCEPT } };
use serde::de::DeserializeOwned;
use serde_json::{ json, Value as JsonValue };
use url::Url;

use super::{ BackendClient, BackendConfig, BackendError };
use crate::models::backend::{ BackendReply, ChatRequest, ChatResponseBody, SystemStats, UserHistory };

pub struct HttpBackendClient {
    http: HttpClient,
    base_url: String,
    user_id: Option<String>,
}

impl HttpBackendClient {
    pub fn from_config(config: &BackendConfig) -> Result<Self, BackendError> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        Url::parse(&base_url).map_err(|e|
            BackendError::InvalidUrl(format!("{}: {}", config.base_url, e))
        )?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            http,
            base_url,
            user_id: config.user_id.clone().filter(|id| !id.trim().is_empty()),
        })
    }

    fn url(&self, route: &str) -> String {
        format!("{}{}", self.base_url, route)
    }

    fn with_user_id(&self, mut body: JsonValue) -> JsonValue {
        if let (Some(user_id), Some(obj)) = (&self.user_id, body.as_object_mut()) {
            obj.insert("user_id".to_string(), json!(user_id));
        }
        body
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        route: &str,
        resp: reqwest::Response
    ) -> Result<T, BackendError> {
        let status = resp.status();
        if !status.is_success() {
            error!("Backend {} answered with status {}", route, status);
            return Err(BackendError::Status(status.as_u16()));
        }
        let bytes = resp.bytes().await?;
        serde_json::from_slice::<T>(&bytes).map_err(|e| BackendError::Decode(e.to_string()))
    }

    async fn get_json<T: DeserializeOwned>(&self, route: &str) -> Result<T, BackendError> {
        let resp = self.http.get(self.url(route)).send().await?;
        self.decode(route, resp).await
    }

    async fn post_json<T: DeserializeOwned>(
        &self,
        route: &str,
        body: JsonValue
    ) -> Result<T, BackendError> {
        let resp = self.http.post(self.url(route)).json(&self.with_user_id(body)).send().await?;
        self.decode(route, resp).await
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn health(&self) -> Result<JsonValue, BackendError> {
        let report: JsonValue = self.get_json("/health").await?;
        info!("Backend health: {}", report);
        Ok(report)
    }

    async fn send_message(&self, request: ChatRequest) -> Result<BackendReply, BackendError> {
        info!("Sending message to backend ({} chars)", request.message.chars().count());
        let body = serde_json::to_value(&request).map_err(|e| BackendError::Decode(e.to_string()))?;
        let response: ChatResponseBody = self.post_json("/chat", body).await?;
        debug!("Backend chat response: {:?}", response);
        response.into_reply()
    }

    async fn user_history(&self, user_id: &str, limit: usize) -> Result<UserHistory, BackendError> {
        self.get_json(&format!("/history/{}?limit={}", user_id, limit)).await
    }

    async fn system_stats(&self) -> Result<SystemStats, BackendError> {
        self.get_json("/stats").await
    }

    async fn train_models(&self) -> Result<JsonValue, BackendError> {
        self.post_json("/train", json!({})).await
    }

    async fn export_dataset(&self) -> Result<JsonValue, BackendError> {
        self.get_json("/export/dataset").await
    }

    async fn create_backup(&self) -> Result<JsonValue, BackendError> {
        self.post_json("/backup", json!({})).await
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use wiremock::matchers::{ body_json, method, path, query_param };
    use wiremock::{ Mock, MockServer, ResponseTemplate };

    fn client_for(server: &MockServer, user_id: Option<&str>) -> HttpBackendClient {
        HttpBackendClient::from_config(
            &(BackendConfig {
                base_url: format!("{}/", server.uri()),
                timeout: Duration::from_secs(5),
                user_id: user_id.map(str::to_string),
            })
        ).unwrap()
    }

    #[tokio::test]
    async fn health_returns_report() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
            .mount(&server).await;

        let report = client_for(&server, None).health().await.unwrap();
        assert_eq!(report["status"], "ok");
    }

    #[tokio::test]
    async fn health_maps_non_ok_to_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server).await;

        let err = client_for(&server, None).health().await.unwrap_err();
        assert!(matches!(err, BackendError::Status(503)));
    }

    #[tokio::test]
    async fn send_message_posts_request_with_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(
                body_json(
                    json!({
                "message": "azul",
                "conversation_id": "1",
                "language": "ber",
                "user_id": "u-42"
            })
                )
            )
            .respond_with(
                ResponseTemplate::new(200).set_body_json(
                    json!({
                "success": true,
                "response": { "text": "Azul fell-ak", "metadata": {} }
            })
                )
            )
            .expect(1)
            .mount(&server).await;

        let reply = client_for(&server, Some("u-42"))
            .send_message(ChatRequest {
                message: "azul".into(),
                conversation_id: Some("1".into()),
                language: Some("ber".into()),
                user_id: None,
            }).await
            .unwrap();
        assert_eq!(reply.text, "Azul fell-ak");
    }

    #[tokio::test]
    async fn send_message_surfaces_rejection() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(
                    json!({ "success": false, "error": "quota" })
                )
            )
            .mount(&server).await;

        let err = client_for(&server, None)
            .send_message(ChatRequest { message: "x".into(), ..Default::default() }).await
            .unwrap_err();
        assert!(matches!(err, BackendError::Rejected(ref m) if m == "quota"));
    }

    #[tokio::test]
    async fn send_message_rejects_garbage_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server).await;

        let err = client_for(&server, None)
            .send_message(ChatRequest { message: "x".into(), ..Default::default() }).await
            .unwrap_err();
        assert!(matches!(err, BackendError::Decode(_)));
    }

    #[tokio::test]
    async fn history_passes_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/history/u-1"))
            .and(query_param("limit", "5"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(
                    json!({
                "success": true,
                "user_id": "u-1",
                "conversations": [{
                    "timestamp": "2026-01-01T10:00:00",
                    "original_message": "salut",
                    "response": "azul",
                    "intent": "greeting",
                    "dialect": "tarifit",
                    "processing_time_ms": 4.0
                }],
                "total": 1
            })
                )
            )
            .mount(&server).await;

        let history = client_for(&server, None).user_history("u-1", 5).await.unwrap();
        assert_eq!(history.total, 1);
        assert_eq!(history.conversations[0].response, "azul");
    }

    #[tokio::test]
    async fn train_and_backup_post_empty_objects() {
        let server = MockServer::start().await;
        for route in ["/train", "/backup"] {
            Mock::given(method("POST"))
                .and(path(route))
                .and(body_json(json!({})))
                .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
                .expect(1)
                .mount(&server).await;
        }

        let client = client_for(&server, None);
        assert_eq!(client.train_models().await.unwrap()["success"], true);
        assert_eq!(client.create_backup().await.unwrap()["success"], true);
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let result = HttpBackendClient::from_config(
            &(BackendConfig { base_url: "not a url".into(), ..Default::default() })
        );
        assert!(matches!(result, Err(BackendError::InvalidUrl(_))));
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = HttpBackendClient::from_config(
            &(BackendConfig { base_url: "http://localhost:3000/".into(), ..Default::default() })
        ).unwrap();
        assert_eq!(client.url("/health"), "http://localhost:3000/health");
    }
}
