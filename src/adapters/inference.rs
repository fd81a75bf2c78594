use crate::config::toml_config::ModelConfig;
use crate::domain::model::ModelResponse;
use crate::domain::ports::SentimentModel;
use crate::utils::error::{EtlError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// 推論端點的回應：每筆輸入一個結果，或每筆輸入一組候選 (取最高分)
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InferenceOutput {
    Candidates(Vec<Vec<ModelResponse>>),
    Single(Vec<ModelResponse>),
}

/// 透過 HTTP 推論端點 (HuggingFace Inference API 相容) 進行情感分類
pub struct InferenceApiModel {
    client: Client,
    endpoint: String,
    api_token: Option<String>,
    batch_size: usize,
    retry_attempts: u32,
    retry_delay: Duration,
}

impl InferenceApiModel {
    pub fn from_config(config: &ModelConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            endpoint: config.endpoint.clone(),
            api_token: config.api_token.clone().filter(|token| !token.is_empty()),
            batch_size: config.batch_size.max(1),
            retry_attempts: config.retry_attempts,
            retry_delay: Duration::from_secs(config.retry_delay_seconds),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn request_batch(&self, batch: &[String]) -> Result<Vec<ModelResponse>> {
        let mut attempt = 0;
        loop {
            match self.send(batch).await {
                Ok(responses) => return Ok(responses),
                Err(e) if e.is_retryable() && attempt < self.retry_attempts => {
                    attempt += 1;
                    tracing::warn!(
                        "Model request failed ({}), retrying {}/{} in {:?}",
                        e,
                        attempt,
                        self.retry_attempts,
                        self.retry_delay
                    );
                    tokio::time::sleep(self.retry_delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send(&self, batch: &[String]) -> Result<Vec<ModelResponse>> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "inputs": batch }));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        tracing::debug!("Sending {} texts to {}", batch.len(), self.endpoint);
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::debug!("Cannot read error body from {}: {}", self.endpoint, e);
                    format!("<unreadable response body: {}>", e)
                }
            };
            return Err(EtlError::ModelError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.bytes().await?;
        let output: InferenceOutput = serde_json::from_slice(&body)?;

        let responses = match output {
            InferenceOutput::Single(responses) => responses,
            InferenceOutput::Candidates(candidates) => candidates
                .into_iter()
                .map(|options| {
                    options
                        .into_iter()
                        .max_by(|a, b| a.score.total_cmp(&b.score))
                        .ok_or_else(|| EtlError::ProcessingError {
                            message: "Model returned an empty candidate list".to_string(),
                        })
                })
                .collect::<Result<Vec<_>>>()?,
        };

        if responses.len() != batch.len() {
            return Err(EtlError::ProcessingError {
                message: format!(
                    "Model returned {} results for {} inputs",
                    responses.len(),
                    batch.len()
                ),
            });
        }

        Ok(responses)
    }
}

#[async_trait]
impl SentimentModel for InferenceApiModel {
    async fn analyze(&self, texts: &[String]) -> Result<Vec<ModelResponse>> {
        let mut results = Vec::with_capacity(texts.len());
        for batch in texts.chunks(self.batch_size) {
            results.extend(self.request_batch(batch).await?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn config(endpoint: String) -> ModelConfig {
        ModelConfig {
            endpoint,
            api_token: None,
            batch_size: 2,
            timeout_seconds: 5,
            retry_attempts: 1,
            retry_delay_seconds: 0,
        }
    }

    #[tokio::test]
    async fn test_analyze_flat_response() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/classify")
                .json_body(serde_json::json!({"inputs": ["良い", "悪い"]}));
            then.status(200).json_body(serde_json::json!([
                {"label": "POSITIVE", "score": 0.9},
                {"label": "NEGATIVE", "score": 0.8}
            ]));
        });

        let model = InferenceApiModel::from_config(&config(server.url("/classify"))).unwrap();
        let result = model
            .analyze(&["良い".to_string(), "悪い".to_string()])
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].label, "POSITIVE");
        assert_eq!(result[1].label, "NEGATIVE");
    }

    #[tokio::test]
    async fn test_analyze_candidate_lists_pick_highest() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/classify");
            then.status(200).json_body(serde_json::json!([
                [
                    {"label": "NEGATIVE", "score": 0.1},
                    {"label": "POSITIVE", "score": 0.7},
                    {"label": "NEUTRAL", "score": 0.2}
                ]
            ]));
        });

        let model = InferenceApiModel::from_config(&config(server.url("/classify"))).unwrap();
        let result = model.analyze(&["最高".to_string()]).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(result[0].label, "POSITIVE");
        assert!((result[0].score - 0.7).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn test_analyze_batches_requests() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/classify");
            then.status(200).json_body(serde_json::json!([
                {"label": "POSITIVE", "score": 0.9},
                {"label": "POSITIVE", "score": 0.9}
            ]));
        });

        let model = InferenceApiModel::from_config(&config(server.url("/classify"))).unwrap();
        let texts: Vec<String> = (0..4).map(|i| format!("text {}", i)).collect();
        let result = model.analyze(&texts).await.unwrap();

        api_mock.assert_hits(2);
        assert_eq!(result.len(), 4);
    }

    #[tokio::test]
    async fn test_empty_input_makes_no_request() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/classify");
            then.status(200).json_body(serde_json::json!([]));
        });

        let model = InferenceApiModel::from_config(&config(server.url("/classify"))).unwrap();
        let result = model.analyze(&[]).await.unwrap();

        api_mock.assert_hits(0);
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_bearer_token_is_sent() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/classify")
                .header("Authorization", "Bearer hf_test");
            then.status(200)
                .json_body(serde_json::json!([{"label": "NEUTRAL", "score": 0.5}]));
        });

        let mut cfg = config(server.url("/classify"));
        cfg.api_token = Some("hf_test".to_string());
        let model = InferenceApiModel::from_config(&cfg).unwrap();
        model.analyze(&["x".to_string()]).await.unwrap();

        api_mock.assert();
    }

    #[tokio::test]
    async fn test_server_error_is_retried_then_reported() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/classify");
            then.status(503).body("model loading");
        });

        let model = InferenceApiModel::from_config(&config(server.url("/classify"))).unwrap();
        let err = model.analyze(&["x".to_string()]).await.unwrap_err();

        // one initial attempt plus one retry
        api_mock.assert_hits(2);
        match err {
            EtlError::ModelError { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "model loading");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_client_error_is_not_retried() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/classify");
            then.status(400).body("bad request");
        });

        let model = InferenceApiModel::from_config(&config(server.url("/classify"))).unwrap();
        let err = model.analyze(&["x".to_string()]).await.unwrap_err();

        api_mock.assert_hits(1);
        assert!(matches!(err, EtlError::ModelError { status: 400, .. }));
    }

    #[tokio::test]
    async fn test_result_count_mismatch_is_processing_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/classify");
            then.status(200)
                .json_body(serde_json::json!([{"label": "POSITIVE", "score": 0.9}]));
        });

        let model = InferenceApiModel::from_config(&config(server.url("/classify"))).unwrap();
        let err = model
            .analyze(&["a".to_string(), "b".to_string()])
            .await
            .unwrap_err();

        assert!(matches!(err, EtlError::ProcessingError { .. }));
    }
}
