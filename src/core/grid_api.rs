use std::time::Instant;

use reqwest::{Client, StatusCode};

use crate::domain::model::{GridDocument, GridReference};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{ConvertError, HttpFailure, Result};

/// Client for the grid service (`GET /v2/grids/grid/{id}`).
pub struct GridClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl GridClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.grid_base_url().trim_end_matches('/').to_string(),
            api_key: config.grid_api_key().to_string(),
        })
    }

    pub async fn fetch(&self, reference: &GridReference) -> Result<GridDocument> {
        let url = format!("{}/v2/grids/grid/{}", self.base_url, reference.id());
        tracing::debug!("Fetching grid document from: {}", url);

        let started = Instant::now();
        let response = self
            .client
            .get(&url)
            .header("accept", "application/json")
            .header("X-API-KEY", &self.api_key)
            .send()
            .await
            .map_err(|e| Self::transport_failure(started, e))?;

        let status = response.status();
        tracing::debug!("Grid API response status: {}", status);

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ConvertError::GridFetchFailed {
                reason: HttpFailure::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_failure(started, e))?;

        serde_json::from_str(&body).map_err(|e| ConvertError::MalformedGridDocument {
            message: e.to_string(),
        })
    }

    fn transport_failure(started: Instant, err: reqwest::Error) -> ConvertError {
        ConvertError::GridFetchFailed {
            reason: HttpFailure::Transport {
                elapsed: started.elapsed(),
                detail: err.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::TemplateType;
    use httpmock::prelude::*;
    use std::time::Duration;

    struct MockConfig {
        base_url: String,
    }

    impl ConfigProvider for MockConfig {
        fn grid_base_url(&self) -> &str {
            &self.base_url
        }

        fn grid_api_key(&self) -> &str {
            "grid-test-key"
        }

        fn pptx_base_url(&self) -> &str {
            &self.base_url
        }

        fn pptx_api_key(&self) -> &str {
            "pptx-test-key"
        }

        fn tab(&self) -> &str {
            "Tab 1"
        }

        fn template_type(&self) -> TemplateType {
            TemplateType::TwoColumn
        }

        fn output_path(&self) -> &str {
            "./output"
        }

        fn request_timeout(&self) -> Option<Duration> {
            None
        }
    }

    fn client_for(server: &MockServer) -> GridClient {
        GridClient::new(&MockConfig {
            base_url: server.base_url(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_parses_grid_document() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(GET)
                .path("/v2/grids/grid/abc-123")
                .header("X-API-KEY", "grid-test-key");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({
                    "data": [{
                        "columns": [{"id": "c1", "name": "Title"}],
                        "rows": [{"id": "r1"}],
                        "cells": [{"row_id": "r1", "column_id": "c1", "content": "Hello"}]
                    }]
                }));
        });

        let reference = GridReference::parse("abc-123").unwrap();
        let document = client_for(&server).fetch(&reference).await.unwrap();

        api_mock.assert();
        assert_eq!(document.data.len(), 1);
        assert_eq!(document.data[0].columns[0].name, "Title");
        assert_eq!(document.data[0].cells[0].content, "Hello");
    }

    #[tokio::test]
    async fn test_fetch_sparse_document_degrades_to_empty() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/grids/grid/abc-123");
            then.status(200)
                .header("Content-Type", "application/json")
                .body("{}");
        });

        let reference = GridReference::parse("abc-123").unwrap();
        let document = client_for(&server).fetch(&reference).await.unwrap();

        assert!(document.data.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_non_200_is_typed_failure() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/grids/grid/missing");
            then.status(404).body("grid not found");
        });

        let reference = GridReference::parse("missing").unwrap();
        let err = client_for(&server).fetch(&reference).await.unwrap_err();

        match err {
            ConvertError::GridFetchFailed {
                reason: HttpFailure::Status { status, body },
            } => {
                assert_eq!(status, 404);
                assert_eq!(body, "grid not found");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_unparseable_body_is_malformed_document() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/v2/grids/grid/abc-123");
            then.status(200).body("<html>definitely not json</html>");
        });

        let reference = GridReference::parse("abc-123").unwrap();
        let err = client_for(&server).fetch(&reference).await.unwrap_err();

        assert!(matches!(err, ConvertError::MalformedGridDocument { .. }));
    }

    #[tokio::test]
    async fn test_fetch_transport_fault_is_typed_failure() {
        // Nothing listens on this port.
        let client = GridClient::new(&MockConfig {
            base_url: "http://127.0.0.1:1".to_string(),
        })
        .unwrap();

        let reference = GridReference::parse("abc-123").unwrap();
        let err = client.fetch(&reference).await.unwrap_err();

        assert!(matches!(
            err,
            ConvertError::GridFetchFailed {
                reason: HttpFailure::Transport { .. }
            }
        ));
    }
}
