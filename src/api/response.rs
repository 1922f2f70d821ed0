use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use chrono::Utc;

#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: String,
    pub status_code: u16,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    pub message: Option<String>,
}

impl ResponseMeta {
    fn new(status: StatusCode, message: Option<String>) -> Self {
        Self {
            status: if status.is_success() { "success" } else { "error" }.to_string(),
            status_code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339(),
            count: None,
            message,
        }
    }
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(data),
            meta: ResponseMeta::new(StatusCode::OK, None),
        }),
    )
}

/// Like [`success`], with the number of items in `meta.count`.
pub fn list<T: Serialize>(items: Vec<T>) -> (StatusCode, Json<ApiResponse<Vec<T>>>) {
    let mut meta = ResponseMeta::new(StatusCode::OK, None);
    meta.count = Some(items.len());
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(items),
            meta,
        }),
    )
}

pub fn error<T>(status: StatusCode, message: String) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            data: None,
            meta: ResponseMeta::new(status, Some(message)),
        }),
    )
}

/// Like [`error`], with details such as rejected fields in `data`.
pub fn error_with<T: Serialize>(status: StatusCode, message: String, data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            data: Some(data),
            meta: ResponseMeta::new(status, Some(message)),
        }),
    )
}
