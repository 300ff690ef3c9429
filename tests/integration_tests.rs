use grid2pptx::core::flatten::PLACEHOLDER_IMAGE_URL;
use grid2pptx::domain::model::{GridReference, TemplateType};
use grid2pptx::{ConversionEngine, ConversionPipeline, ConvertError, LocalStorage, ResolvedConfig};
use grid2pptx::utils::error::HttpFailure;
use httpmock::prelude::*;
use tempfile::TempDir;

const GRID_ID: &str = "0195cce0-897e-79e7-b5f0-ef3f9ad09b86";

fn test_config(server: &MockServer, output_path: &str) -> ResolvedConfig {
    ResolvedConfig {
        grid_base_url: server.base_url(),
        grid_api_key: "grid-secret".to_string(),
        pptx_base_url: server.base_url(),
        pptx_api_key: "pptx-secret".to_string(),
        tab: "Tab 1".to_string(),
        template_type: TemplateType::TwoColumn,
        output_path: output_path.to_string(),
        request_timeout: None,
    }
}

fn pptx_files(output_path: &str) -> Vec<std::path::PathBuf> {
    match std::fs::read_dir(output_path) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|ext| ext == "pptx"))
            .collect(),
        Err(_) => Vec::new(),
    }
}

#[tokio::test]
async fn test_end_to_end_conversion_with_real_http() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();

    let grid_mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("/v2/grids/grid/{}", GRID_ID))
            .header("X-API-KEY", "grid-secret");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "data": [{
                    "columns": [
                        {"id": "c1", "name": "Company"},
                        {"id": "c2", "name": "Logo"}
                    ],
                    "rows": [
                        {"id": "r1"},
                        {"id": "r2"}
                    ],
                    "cells": [
                        {
                            "row_id": "r1",
                            "column_id": "c1",
                            "content": "Acme<<url_source>{https://acme.test}<url_source>> Corp"
                        },
                        {
                            "row_id": "r1",
                            "column_id": "c2",
                            "content": "![logo](attachment:1234)"
                        },
                        {"row_id": "r2", "column_id": "c1", "content": "Globex"}
                    ]
                }]
            }));
    });

    let deck: Vec<u8> = (0..32_768u32).map(|i| (i % 251) as u8).collect();
    let pptx_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/modelml/generate-presentation")
            .header("x-api-key", "pptx-secret")
            .json_body(serde_json::json!({
                "tab": "Tab 1",
                "columns": ["Company", "Logo"],
                "entries": [
                    {"Company": "Acme Corp", "Logo": PLACEHOLDER_IMAGE_URL},
                    {"Company": "Globex", "Logo": ""}
                ],
                "template_type": "TWO_COLUMN"
            }));
        then.status(200).body(&deck);
    });

    let config = test_config(&server, &output_path);
    let reference =
        GridReference::parse(&format!("https://app.modelml.com/grid/{}", GRID_ID)).unwrap();
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ConversionPipeline::new(storage, config, reference).unwrap();
    let engine = ConversionEngine::new(pipeline);

    let artifact_path = engine.run().await.unwrap();

    grid_mock.assert();
    pptx_mock.assert();

    assert!(artifact_path.contains(&format!("grid_{}_", GRID_ID)));
    assert!(artifact_path.ends_with(".pptx"));

    let written = pptx_files(&output_path);
    assert_eq!(written.len(), 1);
    assert_eq!(std::fs::read(&written[0]).unwrap(), deck);
}

#[tokio::test]
async fn test_grid_fetch_failure_ends_conversion() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    let grid_mock = server.mock(|when, then| {
        when.method(GET).path(format!("/v2/grids/grid/{}", GRID_ID));
        then.status(500).body("backend down");
    });

    let config = test_config(&server, &output_path);
    let reference = GridReference::parse(GRID_ID).unwrap();
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ConversionPipeline::new(storage, config, reference).unwrap();
    let engine = ConversionEngine::new(pipeline);

    let err = engine.run().await.unwrap_err();

    grid_mock.assert();
    match err {
        ConvertError::GridFetchFailed {
            reason: HttpFailure::Status { status, body },
        } => {
            assert_eq!(status, 500);
            assert_eq!(body, "backend down");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(pptx_files(&output_path).is_empty());
}

#[tokio::test]
async fn test_generation_failure_leaves_no_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/v2/grids/grid/{}", GRID_ID));
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"data": []}));
    });
    server.mock(|when, then| {
        when.method(POST).path("/modelml/generate-presentation");
        then.status(404).body("unknown template");
    });

    let config = test_config(&server, &output_path);
    let reference = GridReference::parse(GRID_ID).unwrap();
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ConversionPipeline::new(storage, config, reference).unwrap();
    let engine = ConversionEngine::new(pipeline);

    let err = engine.run().await.unwrap_err();

    match err {
        ConvertError::PresentationGenerationFailed {
            reason: HttpFailure::Status { status, body },
        } => {
            assert_eq!(status, 404);
            assert_eq!(body, "unknown template");
        }
        other => panic!("unexpected error: {other:?}"),
    }

    assert!(pptx_files(&output_path).is_empty());
}

#[tokio::test]
async fn test_empty_grid_still_produces_a_deck() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("/v2/grids/grid/{}", GRID_ID));
        then.status(200)
            .header("Content-Type", "application/json")
            .body("{}");
    });
    let pptx_mock = server.mock(|when, then| {
        when.method(POST)
            .path("/modelml/generate-presentation")
            .json_body(serde_json::json!({
                "tab": "Tab 1",
                "columns": [],
                "entries": [],
                "template_type": "TWO_COLUMN"
            }));
        then.status(200).body("empty deck");
    });

    let config = test_config(&server, &output_path);
    let reference = GridReference::parse(GRID_ID).unwrap();
    let storage = LocalStorage::new(output_path.clone());
    let pipeline = ConversionPipeline::new(storage, config, reference).unwrap();
    let engine = ConversionEngine::new(pipeline);

    engine.run().await.unwrap();

    pptx_mock.assert();
    let written = pptx_files(&output_path);
    assert_eq!(written.len(), 1);
    assert_eq!(std::fs::read(&written[0]).unwrap(), b"empty deck");
}
