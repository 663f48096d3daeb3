use std::collections::HashMap;

use reqwest::StatusCode;
use tracing::{error, info_span, warn, Instrument};

use crate::fetch::Fetcher;
use crate::pipeline::Pipeline;

pub const ADDRESS_PARAM: &str = "address";

/// What goes back to the caller: a status code and a body.
#[derive(Debug)]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: String,
}

impl ApiResponse {
    pub fn ok(body: String) -> Self {
        Self {
            status_code: StatusCode::OK.as_u16(),
            body,
        }
    }

    /// Body is the bare reason phrase, details only go to the log.
    pub fn error(status: StatusCode) -> Self {
        Self {
            status_code: status.as_u16(),
            body: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status_code == StatusCode::OK.as_u16()
    }
}

/// Handle one `?address=...` request. Either the full JSON array or a single
/// error status, never a partial list.
pub async fn handle<F: Fetcher>(
    pipeline: &Pipeline<F>,
    query: &HashMap<String, String>,
) -> ApiResponse {
    let Some(address) = query.get(ADDRESS_PARAM) else {
        warn!("Request without '{}' parameter", ADDRESS_PARAM);
        return ApiResponse::error(StatusCode::BAD_REQUEST);
    };

    let span = info_span!("find", address = %address);
    async {
        let pharmacies = match pipeline.run(address).await {
            Ok(pharmacies) => pharmacies,
            Err(e) => {
                error!("{}", e);
                return ApiResponse::error(StatusCode::INTERNAL_SERVER_ERROR);
            }
        };

        match serde_json::to_string(&pharmacies) {
            Ok(body) => ApiResponse::ok(body),
            Err(e) => {
                error!("Failed to encode pharmacies: {}", e);
                ApiResponse::error(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
    .instrument(span)
    .await
}
