use std::time::Instant;

use futures::StreamExt;
use reqwest::{Client, StatusCode};
use serde::Serialize;

use crate::domain::model::{FlatEntry, FlattenedGrid, GenerateOptions, TemplateType};
use crate::domain::ports::{ConfigProvider, ProgressObserver};
use crate::utils::error::{ConvertError, HttpFailure, Result};

pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

#[derive(Serialize)]
struct GeneratePayload<'a> {
    tab: &'a str,
    columns: &'a [String],
    entries: &'a [FlatEntry],
    template_type: TemplateType,
}

/// Client for the presentation rendering service.
///
/// The generated deck is downloaded in streaming mode: chunks are accumulated
/// into a single buffer that is byte-identical to a non-streamed read, and an
/// observer is notified after every chunk. When the server declares a content
/// length the reported count is clamped to it.
pub struct PresentationClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl PresentationClient {
    pub fn new<C: ConfigProvider>(config: &C) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: config.pptx_base_url().trim_end_matches('/').to_string(),
            api_key: config.pptx_api_key().to_string(),
        })
    }

    pub async fn generate(
        &self,
        flattened: &FlattenedGrid,
        options: &GenerateOptions,
        progress: &dyn ProgressObserver,
    ) -> Result<Vec<u8>> {
        let url = format!("{}/modelml/generate-presentation", self.base_url);
        let payload = GeneratePayload {
            tab: &options.tab,
            columns: &flattened.columns,
            entries: &flattened.entries,
            template_type: options.template_type,
        };
        let body = serde_json::to_vec(&payload)?;

        tracing::debug!(
            "Sending generation request to {} ({} columns, {} entries, {:.1} KB payload)",
            url,
            flattened.columns.len(),
            flattened.entries.len(),
            body.len() as f64 / 1024.0
        );

        let started = Instant::now();
        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("Accept", PPTX_MIME)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| Self::transport_failure(started, e))?;

        let status = response.status();
        tracing::debug!("Generation API response status: {}", status);

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ConvertError::PresentationGenerationFailed {
                reason: HttpFailure::Status {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let total = response.content_length();
        let mut content = Vec::with_capacity(total.unwrap_or(0) as usize);

        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| Self::transport_failure(started, e))?;
            content.extend_from_slice(&chunk);

            let received = match total {
                Some(declared) => (content.len() as u64).min(declared),
                None => content.len() as u64,
            };
            progress.on_progress(received, total);
        }

        tracing::debug!(
            "Downloaded presentation: {} bytes in {:.1}s",
            content.len(),
            started.elapsed().as_secs_f64()
        );
        Ok(content)
    }

    fn transport_failure(started: Instant, err: reqwest::Error) -> ConvertError {
        ConvertError::PresentationGenerationFailed {
            reason: HttpFailure::Transport {
                elapsed: started.elapsed(),
                detail: err.to_string(),
            },
        }
    }
}
