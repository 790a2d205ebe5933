use futures_util::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::TranslateError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TranslationResponse {
    pub translation: String,
    pub mode: String,
    /// Echo of the submitted text, when the endpoint sends one back.
    #[serde(default)]
    pub original: Option<String>,
}

/// Anything that can resolve a translation request exactly once.
pub trait TranslationBackend: Send + Sync {
    fn translate(
        &self,
        request: TranslationRequest,
    ) -> BoxFuture<'_, Result<TranslationResponse, TranslateError>>;
}

pub struct HttpBackend {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpBackend {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = cfg.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint: cfg.endpoint.clone(),
        })
    }

    async fn post(&self, request: TranslationRequest) -> Result<TranslationResponse, TranslateError> {
        // `.json()` sets Content-Type: application/json
        let resp = self.client.post(&self.endpoint).json(&request).send().await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::warn!("Endpoint answered {}", status);
            return Err(TranslateError::Http(status.as_u16()));
        }

        let bytes = resp.bytes().await?;
        let parsed: TranslationResponse = serde_json::from_slice(&bytes)?;
        Ok(parsed)
    }
}

impl TranslationBackend for HttpBackend {
    fn translate(
        &self,
        request: TranslationRequest,
    ) -> BoxFuture<'_, Result<TranslationResponse, TranslateError>> {
        Box::pin(self.post(request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn backend_for(server: &Server) -> HttpBackend {
        let cfg = Config {
            endpoint: format!("{}/translate", server.url()),
            request_timeout_secs: 5,
        };
        HttpBackend::new(&cfg).unwrap()
    }

    #[tokio::test]
    async fn posts_json_and_parses_reply() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/translate")
            .match_header("content-type", "application/json")
            .match_body(Matcher::Json(json!({ "text": "prompt here" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                json!({ "original": "prompt here", "translation": "سلام صاحبي", "mode": "gemini" })
                    .to_string(),
            )
            .expect(1)
            .create_async()
            .await;

        let out = backend_for(&server)
            .translate(TranslationRequest { text: "prompt here".into() })
            .await
            .unwrap();

        assert_eq!(out.translation, "سلام صاحبي");
        assert_eq!(out.mode, "gemini");
        assert_eq!(out.original.as_deref(), Some("prompt here"));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/translate")
            .with_status(500)
            .with_body(r#"{"error": "boom"}"#)
            .create_async()
            .await;

        let err = backend_for(&server)
            .translate(TranslationRequest { text: "x".into() })
            .await
            .unwrap_err();
        assert_eq!(err, TranslateError::Http(500));
    }

    #[tokio::test]
    async fn wrong_shape_is_parse_error() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("POST", "/translate")
            .with_status(200)
            .with_body(r#"{"result": "missing fields"}"#)
            .create_async()
            .await;

        let err = backend_for(&server)
            .translate(TranslationRequest { text: "x".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Parse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn refused_connection_is_network_error() {
        // Nothing listens on port 1.
        let cfg = Config {
            endpoint: "http://127.0.0.1:1/translate".into(),
            request_timeout_secs: 5,
        };
        let err = HttpBackend::new(&cfg)
            .unwrap()
            .translate(TranslationRequest { text: "x".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, TranslateError::Network(_)), "got {err:?}");
    }
}
