use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use gleaner_core::{ErrorClass, ExtractedArticle, GleanError};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::AppState;
use crate::auth::Identity;
use crate::store::{ArticleStore, NewArticle};

#[derive(Debug, Deserialize)]
pub struct ScrapeRequest {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub article: ExtractedArticle,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error response: status code plus `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    fn unauthorized() -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "Unauthorized")
    }

    fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

/// Map a scrape failure to its response. Bad input and upstream failures
/// are the caller's to fix; anything else is reported generically.
fn scrape_error(err: &GleanError) -> ApiError {
    match err.class() {
        ErrorClass::BadInput | ErrorClass::Upstream => ApiError::bad_request(err.to_string()),
        ErrorClass::Internal => ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to scrape article"),
    }
}

fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<Identity, ApiError> {
    state.auth.authenticate(headers).map_err(|rejection| {
        warn!(%rejection, "rejected unauthenticated request");
        ApiError::unauthorized()
    })
}

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn scrape_article(
    State(state): State<AppState>, headers: HeaderMap, body: Result<Json<ScrapeRequest>, JsonRejection>,
) -> Result<Json<ScrapeResponse>, ApiError> {
    let identity = authenticate(&state, &headers)?;

    let url = body
        .ok()
        .and_then(|Json(request)| request.url)
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| ApiError::bad_request("URL is required"))?;

    match state.scraper.scrape(&url).await {
        Ok(article) => {
            info!(subject = %identity.subject, %url, blocks = article.content.len(), "scraped article");
            Ok(Json(ScrapeResponse { article }))
        }
        Err(err) => {
            match err.class() {
                ErrorClass::Internal => error!(%url, error = %err, "scrape failed"),
                _ => warn!(%url, error = %err, "scrape failed"),
            }
            Err(scrape_error(&err))
        }
    }
}

pub async fn create_article(
    State(state): State<AppState>, headers: HeaderMap, body: Result<Json<NewArticle>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), ApiError> {
    let identity = authenticate(&state, &headers)?;

    let Json(new) = body.map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
    if new.article.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title is required"));
    }

    match state.store.insert(new).await {
        Ok(id) => {
            info!(subject = %identity.subject, %id, "saved article");
            Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
        }
        Err(err) => {
            error!(error = %format!("{err:#}"), "failed to save article");
            Err(ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrape_error_mapping() {
        let bad = scrape_error(&GleanError::InvalidInput("URL is required".to_string()));
        assert_eq!(bad.status, StatusCode::BAD_REQUEST);

        let upstream = scrape_error(&GleanError::FetchFailed { reason: "404 Not Found".to_string() });
        assert_eq!(upstream.status, StatusCode::BAD_REQUEST);
        assert_eq!(upstream.message, "Failed to fetch URL: 404 Not Found");

        let internal = scrape_error(&GleanError::Serialization("boom".to_string()));
        assert_eq!(internal.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.message, "Failed to scrape article");
    }
}
