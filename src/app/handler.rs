//! API Gateway proxy event in, API Gateway proxy response out.

use crate::core::engine::PackingListEngine;
use crate::core::Pipeline;
use crate::utils::error::{PackingListError, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiGatewayRequest {
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiGatewayResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl ApiGatewayResponse {
    fn json(status_code: u16, body: Value) -> Self {
        let mut headers = HashMap::new();
        headers.insert("Access-Control-Allow-Origin".to_string(), "*".to_string());
        Self {
            status_code,
            headers,
            body: body.to_string(),
        }
    }

    pub fn success(download: &str) -> Self {
        Self::json(
            200,
            json!({
                "message": "A new packaging list is generated and attached to the Airtable",
                "download": download,
            }),
        )
    }

    pub fn failure(error: &PackingListError) -> Self {
        Self::json(
            500,
            json!({
                "error": "Error occured",
                "message": error.to_string(),
            }),
        )
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    record_id: Option<String>,
}

/// Extracts `recordId` from the request body.
pub fn parse_request(body: Option<&str>) -> Result<String> {
    let body = body.ok_or_else(|| PackingListError::RequestError {
        message: "request body is missing".to_string(),
    })?;

    let request: GenerateRequest =
        serde_json::from_str(body).map_err(|e| PackingListError::RequestError {
            message: e.to_string(),
        })?;

    match request.record_id {
        Some(id) if !id.trim().is_empty() => Ok(id),
        _ => Err(PackingListError::RequestError {
            message: "recordId is required".to_string(),
        }),
    }
}

pub async fn handle_request<P: Pipeline>(
    engine: &PackingListEngine<P>,
    body: Option<&str>,
) -> ApiGatewayResponse {
    let result = async {
        let record_id = parse_request(body)?;
        engine.run(&record_id).await
    }
    .await;

    match result {
        Ok(download) => ApiGatewayResponse::success(&download),
        Err(e) => {
            tracing::error!("❌ Packing list request failed ({:?}): {}", e.category(), e);
            ApiGatewayResponse::failure(&e)
        }
    }
}
