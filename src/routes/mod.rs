// Route exports
pub mod health;
pub mod subscriptions;

use actix_web::{error, http::StatusCode, web, HttpResponse};
use crate::models::ErrorResponse;
use crate::services::SubscriptionService;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub subscriptions: SubscriptionService,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(subscriptions::configure),
    );
}

/// Register extractor error handlers and routes on an app
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(handle_json_payload_error))
        .app_data(web::QueryConfig::default().error_handler(handle_query_payload_error))
        .app_data(web::PathConfig::default().error_handler(handle_path_error))
        .configure(configure_routes);
}

impl error::ResponseError for ErrorResponse {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::BAD_REQUEST)
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}

fn bad_request(error: &str, message: String) -> actix_web::Error {
    ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    }
    .into()
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(err: error::JsonPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    bad_request("invalid_json", format!("Invalid JSON: {}", err))
}

/// Handle query payload errors
pub fn handle_query_payload_error(err: error::QueryPayloadError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Query error on {}: {}", req.path(), err);
    bad_request("invalid_query", format!("Invalid query: {}", err))
}

/// Handle path parameter errors, e.g. a malformed subscription ID
pub fn handle_path_error(err: error::PathError, req: &actix_web::HttpRequest) -> actix_web::Error {
    tracing::info!("Path error on {}: {}", req.path(), err);
    bad_request("invalid_path", format!("Invalid path parameter: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{body::to_bytes, ResponseError};

    #[actix_web::test]
    async fn test_error_response_is_the_reply_body() {
        let err = ErrorResponse {
            error: "invalid_query".to_string(),
            message: "Invalid query: bad".to_string(),
            status_code: 400,
        };
        assert_eq!(err.to_string(), "invalid_query: Invalid query: bad");

        let resp = err.error_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body = to_bytes(resp.into_body()).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(parsed.error, "invalid_query");
        assert_eq!(parsed.status_code, 400);
    }

    #[test]
    fn test_unknown_status_falls_back_to_bad_request() {
        let err = ErrorResponse {
            error: "x".to_string(),
            message: String::new(),
            status_code: 1,
        };
        assert_eq!(ResponseError::status_code(&err), StatusCode::BAD_REQUEST);
    }
}
